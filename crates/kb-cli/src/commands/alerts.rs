use kb_config::KbConfig;
use kb_core::entities::Alert;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AlertsArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct AlertsResponse {
    alerts: Vec<Alert>,
    count: usize,
}

/// Handle `kb alerts`: the queued outbox, oldest first.
pub async fn handle(args: &AlertsArgs, config: &KbConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = super::open_service(config).await?;
    let alerts = match args.question {
        Some(question_id) => service.alerts_for_question(question_id).await?,
        None => {
            let limit = args.limit.unwrap_or(config.general.default_limit);
            service.list_alerts(limit).await?
        }
    };

    let count = alerts.len();
    output(&AlertsResponse { alerts, count }, flags.format)
}
