use lazy_static::lazy_static;
use prometheus::{
    Counter, Histogram, HistogramOpts, Registry,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Settlement metrics
    pub static ref SETTLEMENTS_INITIATED: Counter = Counter::new(
        "settlements_initiated_total",
        "Total number of repayments initiated"
    ).unwrap();

    pub static ref SETTLEMENTS_COMPLETED: Counter = Counter::new(
        "settlements_completed_total",
        "Total number of settlements completed"
    ).unwrap();

    pub static ref DUPLICATE_SETTLEMENTS: Counter = Counter::new(
        "duplicate_settlements_total",
        "Settlement calls short-circuited by the idempotency gate"
    ).unwrap();

    pub static ref VERIFICATION_FAILURES: Counter = Counter::new(
        "verification_failures_total",
        "Gateway verifications that did not confirm the payment"
    ).unwrap();

    pub static ref UNCREDITED_SETTLEMENTS: Counter = Counter::new(
        "uncredited_settlements_total",
        "References marked completed whose wallet credit failed"
    ).unwrap();

    // Wallet metrics
    pub static ref WALLET_CREDIT_VOLUME: Counter = Counter::new(
        "wallet_credit_volume_kobo_total",
        "Total amount credited to lender wallets, in kobo"
    ).unwrap();

    // Loan metrics
    pub static ref LOANS_CLOSED: Counter = Counter::new(
        "loans_closed_total",
        "Loan contracts closed after full repayment"
    ).unwrap();

    // Latency metrics
    pub static ref SETTLEMENT_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "settlement_latency_seconds",
            "End-to-end settlement latency"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0])
    ).unwrap();
}

pub fn register_metrics() {
    REGISTRY.register(Box::new(SETTLEMENTS_INITIATED.clone())).unwrap();
    REGISTRY.register(Box::new(SETTLEMENTS_COMPLETED.clone())).unwrap();
    REGISTRY.register(Box::new(DUPLICATE_SETTLEMENTS.clone())).unwrap();
    REGISTRY.register(Box::new(VERIFICATION_FAILURES.clone())).unwrap();
    REGISTRY.register(Box::new(UNCREDITED_SETTLEMENTS.clone())).unwrap();
    REGISTRY.register(Box::new(WALLET_CREDIT_VOLUME.clone())).unwrap();
    REGISTRY.register(Box::new(LOANS_CLOSED.clone())).unwrap();
    REGISTRY.register(Box::new(SETTLEMENT_LATENCY.clone())).unwrap();
}
