use crate::types::money::Money;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FeeTier {
    pub up_to_naira: i64,  // Inclusive upper bound
    pub fee_naira: i64,
}

/// Flat platform fee per repayment, tiered by amount. Not a percentage.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FeeSchedule {
    pub tiers: Vec<FeeTier>,
    pub top_fee_naira: i64,  // Above the last tier
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeSchedule {
            tiers: vec![
                FeeTier { up_to_naira: 20_000, fee_naira: 100 },
                FeeTier { up_to_naira: 50_000, fee_naira: 200 },
                FeeTier { up_to_naira: 100_000, fee_naira: 500 },
                FeeTier { up_to_naira: 200_000, fee_naira: 1_000 },
            ],
            top_fee_naira: 1_500,
        }
    }
}

impl FeeSchedule {
    /// Fee for a repayment amount. Pure lookup; callers reject non-positive
    /// amounts before getting here.
    pub fn fee_for(&self, amount: Money) -> Money {
        debug_assert!(amount.is_positive());

        for tier in &self.tiers {
            if amount <= Money::from_naira(tier.up_to_naira) {
                return Money::from_naira(tier.fee_naira);
            }
        }
        Money::from_naira(self.top_fee_naira)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee_naira(amount_naira: i64) -> i64 {
        FeeSchedule::default()
            .fee_for(Money::from_naira(amount_naira))
            .to_kobo()
            / 100
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(fee_naira(19_999), 100);
        assert_eq!(fee_naira(20_000), 100);  // Ties take the tier's own bound
        assert_eq!(fee_naira(20_001), 200);
        assert_eq!(fee_naira(50_000), 200);
        assert_eq!(fee_naira(50_001), 500);
        assert_eq!(fee_naira(100_000), 500);
        assert_eq!(fee_naira(100_001), 1_000);
        assert_eq!(fee_naira(200_000), 1_000);
        assert_eq!(fee_naira(200_001), 1_500);
    }

    #[test]
    fn test_small_and_large_amounts() {
        assert_eq!(fee_naira(1), 100);
        assert_eq!(fee_naira(45_000), 200);
        assert_eq!(fee_naira(10_000_000), 1_500);
    }

    #[test]
    fn test_sub_naira_amounts_stay_in_first_tier() {
        let schedule = FeeSchedule::default();
        assert_eq!(
            schedule.fee_for(Money::from_kobo(50)),
            Money::from_naira(100)
        );
    }
}
