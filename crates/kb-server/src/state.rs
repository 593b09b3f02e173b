use kb_config::GeneralConfig;
use kb_db::service::KbService;

/// Shared by every handler behind an `Arc`.
pub struct AppState {
    pub service: KbService,
}

impl AppState {
    #[must_use]
    pub const fn new(service: KbService) -> Self {
        Self { service }
    }

    #[must_use]
    pub const fn settings(&self) -> &GeneralConfig {
        self.service.settings()
    }
}
