use tracing::Span;

pub fn trace_settlement(reference: &str) -> Span {
    tracing::info_span!(
        "settlement",
        reference = %reference,
    )
}

pub fn trace_verification(reference: &str) -> Span {
    tracing::info_span!(
        "gateway_verify",
        reference = %reference,
    )
}
