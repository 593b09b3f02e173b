use kb_config::KbConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &KbConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Init(args) => commands::init::handle(&args, config, flags).await,
        Commands::Serve(args) => commands::serve::handle(&args, config).await,
        Commands::Category { action } => commands::category::handle(&action, config, flags).await,
        Commands::User { action } => commands::user::handle(&action, config, flags).await,
        Commands::Alerts(args) => commands::alerts::handle(&args, config, flags).await,
    }
}
