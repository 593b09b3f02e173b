//! Repository modules implementing persistence for every knowledge base entity.
//!
//! Each module adds methods to `KbService` via `impl KbService` blocks.

pub mod alert;
pub mod audit;
pub mod browse;
pub mod category;
pub mod moderation;
pub mod question;
pub mod response;
pub mod user;
