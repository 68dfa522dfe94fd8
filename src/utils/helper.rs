/// Alert operations team (critical). Used when a reference has been marked
/// completed but the lender was not credited; those need a human.
pub fn alert_operations_team_critical(message: String) {
    tracing::error!("CRITICAL ALERT: {}", message);

    send_slack_alert(&message, "critical");
    send_email_alert(&message, "critical");
}

/// Alert operations team (warning)
pub fn alert_operations_team_warning(message: String) {
    tracing::warn!("WARNING ALERT: {}", message);

    send_slack_alert(&message, "warning");
}

/// Send Slack alert
fn send_slack_alert(message: &str, severity: &str) {
    tracing::info!("[Slack] {} - {}", severity, message);

    // Example integration:
    // let webhook_url = env::var("SLACK_WEBHOOK_URL");
    // let client = reqwest::Client::new();
    // client.post(&webhook_url)
    //     .json(&json!({
    //         "text": format!("[{}] {}", severity.to_uppercase(), message)
    //     }))
    //     .send().await;
}

/// Send email alert
fn send_email_alert(message: &str, severity: &str) {
    tracing::info!("[Email] {} - {}", severity, message);
}
