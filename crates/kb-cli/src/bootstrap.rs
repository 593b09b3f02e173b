use anyhow::Context;
use kb_config::KbConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<KbConfig> {
    let mut config = KbConfig::load_with_dotenv().context("failed to load configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut KbConfig, flags: &GlobalFlags) {
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
}
