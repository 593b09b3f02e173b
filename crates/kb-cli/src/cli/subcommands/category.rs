use clap::{Args, Subcommand};

/// Category management commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CategoryCommands {
    /// Create a category.
    Add(CategoryAddArgs),
    /// List categories by title.
    List,
}

#[derive(Clone, Debug, Args)]
pub struct CategoryAddArgs {
    /// Display title.
    pub title: String,
    /// URL slug (`[a-z0-9-_]+`, defaults to the slugified title).
    #[arg(long)]
    pub slug: Option<String>,
}
