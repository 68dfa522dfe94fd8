use axum::{
    Router,
    routing::{get, post},
    extract::{Path, State, Json},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::Instrument;
use crate::error::Error;
use crate::interfaces::store::SettlementStore;
use crate::observability::metrics::REGISTRY;
use crate::observability::tracing::trace_settlement;
use crate::settlement::engine::{SettlementData, SettlementEngine};
use crate::settlement::reconciliation::Reconciliation;
use crate::types::ids::{LenderId, LoanContractId};
use crate::types::money::Money;

pub struct ApiState {
    pub engine: Arc<SettlementEngine>,
    pub store: Arc<dyn SettlementStore>,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/repayments/initiate", post(initiate_repayment))
        .route("/repayments/settle/:reference", post(settle_payment))
        .route("/wallets/:lender_id/reconciliation", get(reconcile_wallet))
        .route("/metrics", get(metrics))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(serde::Deserialize)]
struct InitiateRequest {
    loan_contract_id: String,
    amount_kobo: i64,
    reference: String,
}

#[derive(serde::Serialize)]
struct InitiateResponse {
    reference: String,
    amount_kobo: i64,
    platform_fee_kobo: i64,
}

async fn initiate_repayment(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<InitiateRequest>,
) -> Result<Json<InitiateResponse>, StatusCode> {
    let loan_contract_id = LoanContractId::from_string(&req.loan_contract_id)
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    if req.amount_kobo <= 0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let record = state.engine
        .initiate_repayment(loan_contract_id, Money::from_kobo(req.amount_kobo), &req.reference)
        .map_err(|e| match e {
            Error::ContractNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            Error::PaymentRecordAlreadyExists(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    Ok(Json(InitiateResponse {
        reference: record.reference,
        amount_kobo: record.amount.to_kobo(),
        platform_fee_kobo: record.platform_fee.to_kobo(),
    }))
}

/// Settlement result rendered to the UI and webhook callers. On failure the
/// gateway's reported reason is passed through verbatim where available.
#[derive(serde::Serialize)]
struct SettlementResponse {
    success: bool,
    already_processed: bool,
    message: Option<String>,
    data: Option<SettlementData>,
    error: Option<String>,
}

async fn settle_payment(
    State(state): State<Arc<ApiState>>,
    Path(reference): Path<String>,
) -> (StatusCode, Json<SettlementResponse>) {
    let result = state.engine
        .settle_payment(&reference)
        .instrument(trace_settlement(&reference))
        .await;

    match result {
        Ok(outcome) => (
            StatusCode::OK,
            Json(SettlementResponse {
                success: true,
                already_processed: outcome.already_processed,
                message: Some(outcome.message),
                data: Some(outcome.data),
                error: None,
            }),
        ),
        Err(e) => {
            let status = match &e {
                Error::VerificationFailed { .. } => StatusCode::PAYMENT_REQUIRED,
                Error::GatewayUnreachable(_) => StatusCode::BAD_GATEWAY,
                Error::MissingMetadata { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(SettlementResponse {
                    success: false,
                    already_processed: false,
                    message: None,
                    data: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

#[derive(serde::Serialize)]
struct ReconciliationResponse {
    lender_id: String,
    balance_kobo: i64,
    consistent: bool,
    detail: Option<String>,
}

async fn reconcile_wallet(
    State(state): State<Arc<ApiState>>,
    Path(lender_id): Path<String>,
) -> Result<Json<ReconciliationResponse>, StatusCode> {
    let lender = LenderId::from_string(&lender_id)
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    let wallet = state.store
        .wallet_for_lender(lender)
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let check = Reconciliation::reconcile_wallet(state.store.as_ref(), lender)
        .and_then(|_| Reconciliation::verify_running_balances(state.store.as_ref(), lender));

    Ok(Json(ReconciliationResponse {
        lender_id,
        balance_kobo: wallet.balance.to_kobo(),
        consistent: check.is_ok(),
        detail: check.err().map(|e| e.to_string()),
    }))
}

async fn metrics() -> Result<String, StatusCode> {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
