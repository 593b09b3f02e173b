//! Entity structs for all knowledge base domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `kb-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip
//! and schema validation.

mod alert;
mod audit;
mod authorship;
mod category;
mod question;
mod response;
mod user;

pub use alert::Alert;
pub use audit::AuditEntry;
pub use authorship::{Author, Authorship, MAX_NAME_LEN};
pub use category::Category;
pub use question::{MAX_TITLE_LEN, Question};
pub use response::Response;
pub use user::User;
