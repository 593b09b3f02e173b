use kb_config::KbConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::output::output;

/// Handle `kb user`.
pub async fn handle(
    action: &UserCommands,
    config: &KbConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = super::open_service(config).await?;
    match action {
        UserCommands::Add(args) => {
            let user = service
                .create_user(
                    &args.username,
                    &args.first_name,
                    &args.last_name,
                    args.email.as_deref(),
                    args.staff,
                )
                .await?;
            output(&user, flags.format)
        }
        UserCommands::List => output(&service.list_users().await?, flags.format),
    }
}
