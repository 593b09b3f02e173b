pub mod alerts;
pub mod category;
pub mod dispatch;
pub mod init;
pub mod serve;
pub mod user;

use anyhow::Context;
use kb_config::KbConfig;
use kb_db::service::KbService;

/// Open the configured database, running migrations.
pub async fn open_service(config: &KbConfig) -> anyhow::Result<KbService> {
    KbService::new_local(&config.database.path, config.general.clone())
        .await
        .with_context(|| format!("failed to open database '{}'", config.database.path))
}
