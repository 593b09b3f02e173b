use kb_config::KbConfig;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CategoryCommands;
use crate::output::output;

/// Handle `kb category`.
pub async fn handle(
    action: &CategoryCommands,
    config: &KbConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = super::open_service(config).await?;
    match action {
        CategoryCommands::Add(args) => {
            let category = service
                .create_category(&args.title, args.slug.as_deref())
                .await?;
            output(&category, flags.format)
        }
        CategoryCommands::List => output(&service.list_categories().await?, flags.format),
    }
}
