use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub, Neg};
use std::fmt;

pub const KOBO_PER_NAIRA: i64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(i64);  // Signed amount in kobo (minor units)

impl Money {
    pub fn from_kobo(value: i64) -> Self {
        Money(value)
    }

    pub fn to_kobo(&self) -> i64 {
        self.0
    }

    pub fn from_naira(value: i64) -> Self {
        Money(value * KOBO_PER_NAIRA)
    }

    pub fn zero() -> Self {
        Money(0)
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
