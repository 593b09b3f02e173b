mod category;
mod user;

pub use category::CategoryCommands;
pub use user::UserCommands;
