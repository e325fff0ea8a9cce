use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    AssignmentRepository, FloorPlanRepository, GuestRepository, MessageLogRepository,
    SeatingTableRepository, SettingsRepository,
};
use crate::messaging::MmsClient;
use crate::utils::AppResult;

/// Shared server state handed to every handler
///
/// Cloning is cheap: repositories hold a shared database handle and the
/// remaining services are behind Arc.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub jwt: Arc<JwtService>,
    /// None when gateway credentials are not configured; messaging
    /// endpoints report the misconfiguration instead of crashing startup
    pub mms: Option<Arc<MmsClient>>,

    pub settings: SettingsRepository,
    pub guests: GuestRepository,
    pub floor_plans: FloorPlanRepository,
    pub tables: SeatingTableRepository,
    pub assignments: AssignmentRepository,
    pub message_logs: MessageLogRepository,
}

impl ServerState {
    pub fn new(config: Config, db: DbService) -> Self {
        let jwt = Arc::new(JwtService::new(config.jwt.clone()));
        let mms = MmsClient::from_config(&config).ok().map(Arc::new);
        if mms.is_none() {
            tracing::warn!("SMS/MMS gateway credentials not configured, messaging disabled");
        }

        let handle = db.db.clone();
        Self {
            config: Arc::new(config),
            jwt,
            mms,
            settings: SettingsRepository::new(handle.clone()),
            guests: GuestRepository::new(handle.clone()),
            floor_plans: FloorPlanRepository::new(handle.clone()),
            tables: SeatingTableRepository::new(handle.clone()),
            assignments: AssignmentRepository::new(handle.clone()),
            message_logs: MessageLogRepository::new(handle),
            db,
        }
    }

    /// Open the on-disk database under the work dir and build the state
    pub async fn initialize(config: Config) -> AppResult<Self> {
        std::fs::create_dir_all(config.images_dir())
            .map_err(|e| crate::utils::AppError::config(format!("Cannot create work dir: {e}")))?;

        let db = DbService::new(&config.db_path().display().to_string()).await?;
        Ok(Self::new(config, db))
    }

    /// In-memory state, used by the test harness
    pub async fn initialize_memory(config: Config) -> AppResult<Self> {
        std::fs::create_dir_all(config.images_dir())
            .map_err(|e| crate::utils::AppError::config(format!("Cannot create work dir: {e}")))?;

        let db = DbService::memory().await?;
        Ok(Self::new(config, db))
    }

    /// Gateway client, or a config error when credentials are absent
    pub fn mms_client(&self) -> AppResult<&MmsClient> {
        self.mms
            .as_deref()
            .ok_or_else(|| crate::utils::AppError::config("SMS/MMS gateway is not configured"))
    }
}
