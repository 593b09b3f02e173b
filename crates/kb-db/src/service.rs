//! Service layer orchestrating database mutations with the audit trail.
//!
//! `KbService` wraps `KbDb` (raw database access) and the `general` settings
//! that drive posting rules. All repo methods are implemented as
//! `impl KbService` blocks under [`crate::repos`].

use kb_config::GeneralConfig;
use tokio::sync::{Mutex, MutexGuard};

use crate::KbDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with the audit trail.
///
/// Every multi-statement mutation follows this protocol:
/// 1. Take the write lock
/// 2. Begin transaction
/// 3. Execute SQL
/// 4. Append audit entry (inside transaction)
/// 5. Commit transaction
pub struct KbService {
    db: KbDb,
    settings: GeneralConfig,
    write_lock: Mutex<()>,
}

impl KbService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `settings` - Posting and listing rules.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, settings: GeneralConfig) -> Result<Self, DatabaseError> {
        let db = KbDb::open_local(db_path).await?;
        Ok(Self::from_db(db, settings))
    }

    /// Create from an existing `KbDb`.
    #[must_use]
    pub fn from_db(db: KbDb, settings: GeneralConfig) -> Self {
        Self {
            db,
            settings,
            write_lock: Mutex::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &KbDb {
        &self.db
    }

    /// Posting and listing rules this service was built with.
    #[must_use]
    pub const fn settings(&self) -> &GeneralConfig {
        &self.settings
    }

    /// Serialize writes on the shared connection.
    pub(crate) async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}
