use std::path::Path;

use anyhow::Context;
use kb_config::KbConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

const CONFIG_DIR: &str = ".knowledge";

const CONFIG_TEMPLATE: &str = r#"# Knowledge base settings. Environment variables (KNOWLEDGE_SECTION__KEY)
# take precedence over this file.

[general]
login_required = false
allow_anonymous = false
auto_publicize = false
free_response = true
slug_urls = true
alerts = false
default_limit = 20

[database]
path = "knowledge.db"

[server]
host = "127.0.0.1"
port = 8000
"#;

#[derive(Debug, Serialize)]
struct InitResponse {
    database: String,
    config: Option<String>,
    categories: usize,
    users: usize,
}

/// Handle `kb init`.
pub async fn handle(args: &InitArgs, config: &KbConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config_path = if args.no_config {
        None
    } else {
        write_config_template(Path::new(CONFIG_DIR))?
    };

    let service = super::open_service(config).await?;
    let categories = service.list_categories().await?.len();
    let users = service.list_users().await?.len();
    tracing::info!(database = %config.database.path, "knowledge base initialized");

    output(
        &InitResponse {
            database: config.database.path.clone(),
            config: config_path,
            categories,
            users,
        },
        flags.format,
    )
}

/// Write `config.toml` under `dir` unless one exists. Returns the path written.
fn write_config_template(dir: &Path) -> anyhow::Result<Option<String>> {
    let path = dir.join("config.toml");
    if path.exists() {
        return Ok(None);
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Some(path.display().to_string()))
}
