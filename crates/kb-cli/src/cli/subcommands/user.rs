use clap::{Args, Subcommand};

/// User management commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create a user.
    Add(UserAddArgs),
    /// List users by username.
    List,
}

#[derive(Clone, Debug, Args)]
pub struct UserAddArgs {
    pub username: String,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long)]
    pub email: Option<String>,
    /// Grant moderation rights.
    #[arg(long)]
    pub staff: bool,
}
