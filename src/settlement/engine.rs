//! Settlement orchestrator
//!
//! Sequences verification, the idempotency gate, the ledger write, fee
//! collection and loan closure for one payment reference.

use std::sync::Arc;
use chrono::Utc;
use serde::Serialize;
use tracing::Instrument;
use crate::config::LoanConfig;
use crate::config::fees::FeeSchedule;
use crate::error::{Error, Result, Warning};
use crate::gateway::VerifiedPayment;
use crate::interfaces::gateway::PaymentGateway;
use crate::interfaces::store::{Claim, SettlementStore};
use crate::observability::metrics;
use crate::observability::tracing::trace_verification;
use crate::settlement::ledger_writer::{LedgerWriter, SettlementEntry};
use crate::settlement::loan_closer::LoanCloser;
use crate::types::ids::{FarmerId, FeeId, LenderId, LoanContractId, RepaymentId};
use crate::types::money::Money;
use crate::types::payment::{FeeStatus, PaymentRecord, PaymentStatus, PlatformFee};
use crate::utils::helper::{alert_operations_team_critical, alert_operations_team_warning};

/// Interest share of one repayment. Owned by whichever component does loan
/// amortization; injected here so the ledger can record the split.
pub type InterestSplit = fn(amount: Money, interest_rate: f64, schedule_position: u32) -> Money;

/// Default split under a flat rate: every repayment carries interest in the
/// contract's overall proportion. Computed in basis points over an i128
/// intermediate so the result stays exact at any amount.
pub fn flat_rate_split(amount: Money, interest_rate: f64, _schedule_position: u32) -> Money {
    let rate_bps = (interest_rate * 100.0).round() as i128;
    let denominator = 10_000 + rate_bps;
    let numerator = amount.to_kobo() as i128 * rate_bps;
    Money::from_kobo(((numerator + denominator / 2) / denominator) as i64)
}

/// Where the settlement context came from: our own tracking row, or a row
/// rebuilt from the metadata the gateway echoed back.
enum PaymentContext {
    Existing(PaymentRecord),
    Reconstructed(PaymentRecord),
}

impl PaymentContext {
    fn into_record(self) -> PaymentRecord {
        match self {
            PaymentContext::Existing(record) => record,
            PaymentContext::Reconstructed(record) => record,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SettlementData {
    pub contract_id: LoanContractId,
    pub repayment_id: Option<RepaymentId>,
    pub amount: Money,
    pub platform_fee: Money,
}

#[derive(Clone, Debug, Serialize)]
pub struct SettlementOutcome {
    pub already_processed: bool,
    pub message: String,
    pub data: SettlementData,
}

pub struct SettlementEngine {
    store: Arc<dyn SettlementStore>,
    gateway: Arc<dyn PaymentGateway>,
    ledger: LedgerWriter,
    closer: LoanCloser,
    fees: FeeSchedule,
    interest_split: InterestSplit,
}

impl SettlementEngine {
    pub fn new(
        store: Arc<dyn SettlementStore>,
        gateway: Arc<dyn PaymentGateway>,
        fees: FeeSchedule,
        loan_config: LoanConfig,
    ) -> Self {
        SettlementEngine {
            ledger: LedgerWriter::new(store.clone(), loan_config),
            closer: LoanCloser::new(store.clone()),
            store,
            gateway,
            fees,
            interest_split: flat_rate_split,
        }
    }

    pub fn with_interest_split(mut self, split: InterestSplit) -> Self {
        self.interest_split = split;
        self
    }

    /// Create the pending tracking rows for a repayment before the payer is
    /// redirected to the gateway, so settlement finds them later.
    pub fn initiate_repayment(
        &self,
        loan_contract_id: LoanContractId,
        amount: Money,
        reference: &str,
    ) -> Result<PaymentRecord> {
        if !amount.is_positive() {
            return Err(Error::InvalidAmount(amount));
        }

        let loan = self.store.loan(loan_contract_id)?;
        let platform_fee = self.fees.fee_for(amount);

        let record = PaymentRecord {
            reference: reference.to_string(),
            gateway_reference: None,
            status: PaymentStatus::Pending,
            loan_contract_id,
            farmer_id: loan.borrower,
            lender_id: loan.lender,
            amount,
            platform_fee,
            repayment_id: None,
            created_at: Utc::now(),
        };
        self.store.insert_payment(record.clone())?;
        self.store.insert_fee(PlatformFee::pending(loan_contract_id, platform_fee))?;

        metrics::SETTLEMENTS_INITIATED.inc();
        tracing::info!(
            "Initiated repayment {} of {} kobo on loan {}",
            reference,
            amount,
            loan_contract_id
        );

        Ok(record)
    }

    /// Settle one payment reference. Safe to call any number of times, from
    /// the UI confirmation and the gateway webhook alike: the wallet is
    /// credited at most once per reference.
    pub async fn settle_payment(&self, reference: &str) -> Result<SettlementOutcome> {
        let timer = metrics::SETTLEMENT_LATENCY.start_timer();
        let result = self.settle_inner(reference).await;
        timer.observe_duration();
        result
    }

    async fn settle_inner(&self, reference: &str) -> Result<SettlementOutcome> {
        // Idempotency gate, first pass: duplicate webhook deliveries and
        // double clicks short-circuit with the prior result before we go
        // back to the gateway.
        if let Some(existing) = self.store.payment_by_reference(reference) {
            if existing.status == PaymentStatus::Completed {
                metrics::DUPLICATE_SETTLEMENTS.inc();
                tracing::info!("Reference {} already settled", reference);
                return Ok(Self::already_processed(existing));
            }
        }

        // Nothing has been persisted yet; a failure here is cleanly
        // retryable by the caller.
        let verify = self.gateway
            .verify(reference)
            .instrument(trace_verification(reference));
        let verified = match verify.await {
            Ok(verified) => verified,
            Err(e) => {
                metrics::VERIFICATION_FAILURES.inc();
                return Err(e);
            }
        };

        // Resolve the settlement context once: our own tracking row when it
        // exists, otherwise rebuilt from the gateway metadata.
        let context = match self.store.payment_by_reference(&verified.reference) {
            Some(record) => PaymentContext::Existing(record),
            None => PaymentContext::Reconstructed(self.reconstruct_record(&verified)?),
        };

        let mut record = context.into_record();
        if record.gateway_reference.is_none() {
            record.gateway_reference = verified.gateway_reference.clone();
        }
        if record.amount != verified.amount {
            tracing::warn!(
                "Reference {}: initiated amount {} differs from charged amount {}, crediting the charged amount",
                reference,
                record.amount,
                verified.amount
            );
            record.amount = verified.amount;
        }

        // Second pass, atomic: claim the reference before touching the
        // ledger. The loser of a duplicate race sees the winner's record
        // here and credits nothing.
        let record = match self.store.claim_payment(record)? {
            Claim::AlreadyCompleted(prior) => {
                metrics::DUPLICATE_SETTLEMENTS.inc();
                tracing::info!("Reference {} claimed by a concurrent settlement", reference);
                return Ok(Self::already_processed(prior));
            }
            Claim::Claimed(record) => record,
        };

        // The reference is now marked completed. A failure past this point
        // strands it without funds credited; it is surfaced loudly for
        // manual reconciliation, never rolled back or silently retried.
        let entry = match self.apply_settlement(&record, &verified) {
            Ok(entry) => entry,
            Err(e) => {
                metrics::UNCREDITED_SETTLEMENTS.inc();
                alert_operations_team_critical(format!(
                    "Settlement {} verified and claimed but not credited: {}; gateway payload: {}",
                    record.reference, e, verified.raw
                ));
                return Err(Error::UncreditedSettlement {
                    reference: record.reference.clone(),
                    reason: e.to_string(),
                });
            }
        };

        // Persist the repayment id on the tracking row; duplicate calls for
        // this reference return it alongside the rest of the first result.
        if let Err(e) = self.store.attach_repayment(&record.reference, entry.repayment.id) {
            tracing::warn!("Repayment id not recorded on {}: {}", record.reference, e);
        }

        if let Err(warning) = self.collect_platform_fee(&record) {
            tracing::warn!("Fee bookkeeping failed for {}: {}", record.reference, warning);
        }

        if let Err(warning) = self.closer.maybe_close(record.loan_contract_id) {
            alert_operations_team_warning(format!(
                "Loan closure check failed for {}: {}",
                record.loan_contract_id, warning
            ));
        }

        metrics::SETTLEMENTS_COMPLETED.inc();
        tracing::info!(
            "Settled {}: credited {} kobo to lender {}, platform fee {}",
            record.reference,
            record.amount,
            record.lender_id,
            record.platform_fee
        );

        Ok(SettlementOutcome {
            already_processed: false,
            message: "Payment settled".to_string(),
            data: SettlementData {
                contract_id: record.loan_contract_id,
                repayment_id: Some(entry.repayment.id),
                amount: record.amount,
                platform_fee: record.platform_fee,
            },
        })
    }

    fn apply_settlement(
        &self,
        record: &PaymentRecord,
        verified: &VerifiedPayment,
    ) -> Result<SettlementEntry> {
        let loan = self.store.loan(record.loan_contract_id)?;

        let schedule_position = self.store
            .repayments_for_loan(loan.id)
            .iter()
            .filter(|r| r.is_settled())
            .count() as u32;
        let interest_portion = (self.interest_split)(record.amount, loan.interest_rate, schedule_position);
        let penalty = verified.metadata.penalty_naira
            .map(Money::from_naira)
            .unwrap_or_else(Money::zero);

        self.ledger.record_settlement(
            loan.id,
            record.lender_id,
            record.amount,
            interest_portion,
            penalty,
            &record.reference,
        )
    }

    fn reconstruct_record(&self, verified: &VerifiedPayment) -> Result<PaymentRecord> {
        let loan_contract_id = Self::required_id(
            verified,
            verified.metadata.contract_id.as_deref(),
            "contract_id",
            |s| LoanContractId::from_string(s).ok(),
        )?;
        let farmer_id = Self::required_id(
            verified,
            verified.metadata.farmer_id.as_deref(),
            "farmer_id",
            |s| FarmerId::from_string(s).ok(),
        )?;
        let lender_id = Self::required_id(
            verified,
            verified.metadata.lender_id.as_deref(),
            "lender_id",
            |s| LenderId::from_string(s).ok(),
        )?;

        let platform_fee = verified.metadata.platform_fee_naira
            .map(Money::from_naira)
            .unwrap_or_else(|| self.fees.fee_for(verified.amount));

        Ok(PaymentRecord {
            reference: verified.reference.clone(),
            gateway_reference: verified.gateway_reference.clone(),
            status: PaymentStatus::Pending,
            loan_contract_id,
            farmer_id,
            lender_id,
            amount: verified.amount,
            platform_fee,
            repayment_id: None,
            created_at: Utc::now(),
        })
    }

    fn required_id<T>(
        verified: &VerifiedPayment,
        value: Option<&str>,
        field: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T> {
        value.and_then(|s| parse(s)).ok_or_else(|| Error::MissingMetadata {
            reference: verified.reference.clone(),
            missing: field,
            payload: verified.raw.to_string(),
        })
    }

    fn collect_platform_fee(&self, record: &PaymentRecord) -> std::result::Result<(), Warning> {
        match self.store.pending_fee_for_loan(record.loan_contract_id) {
            Some(fee) => self.store.collect_fee(fee.id).map_err(|e| Warning {
                step: "platform_fee",
                details: e.to_string(),
            }),
            None => {
                // The pending row from initiation is missing; record the
                // collection directly.
                tracing::warn!(
                    "No pending platform fee for loan {}, inserting collected row",
                    record.loan_contract_id
                );
                let fee = PlatformFee {
                    id: FeeId::new(),
                    loan_contract_id: record.loan_contract_id,
                    amount: record.platform_fee,
                    status: FeeStatus::Collected,
                    collected_at: Some(Utc::now()),
                    created_at: Utc::now(),
                };
                self.store.insert_fee(fee).map_err(|e| Warning {
                    step: "platform_fee",
                    details: e.to_string(),
                })
            }
        }
    }

    fn already_processed(record: PaymentRecord) -> SettlementOutcome {
        SettlementOutcome {
            already_processed: true,
            message: "Payment already processed".to_string(),
            data: SettlementData {
                contract_id: record.loan_contract_id,
                repayment_id: record.repayment_id,
                amount: record.amount,
                platform_fee: record.platform_fee,
            },
        }
    }
}
