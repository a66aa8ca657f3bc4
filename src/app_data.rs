use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::{AppSettings, DatabaseConnections, SecretManager};
use crate::errors::InternalError;
use crate::providers::{
    AuthenticationProvider, CryptoProvider, PhaseProgressProvider, RoleOverrideStep, RoleResolver, TokenProvider,
};
use crate::stores::{
    AcademicStore, AuditStore, DiaryStore, DocumentStore, GroupStore, MeetingStore, NotificationStore, PhaseStore,
    QueryCache, RoleStore, UserStore,
};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(connections, settings, secrets)
///   ├─ stores (one per table family, sharing the main connection)
///   ├─ audit_store / audit_logger (audit connection)
///   ├─ query_cache
///   └─ providers (crypto, token, authentication, role override, phase progress)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub settings: AppSettings,
    pub secret_manager: Arc<SecretManager>,

    pub audit_store: Arc<AuditStore>,
    pub audit_logger: Arc<AuditLogger>,

    pub user_store: Arc<UserStore>,
    pub role_store: Arc<RoleStore>,
    pub group_store: Arc<GroupStore>,
    pub phase_store: Arc<PhaseStore>,
    pub diary_store: Arc<DiaryStore>,
    pub document_store: Arc<DocumentStore>,
    pub meeting_store: Arc<MeetingStore>,
    pub notification_store: Arc<NotificationStore>,
    pub academic_store: Arc<AcademicStore>,

    pub query_cache: Arc<QueryCache>,

    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub authentication_provider: Arc<AuthenticationProvider>,
    pub role_resolver: RoleResolver,
    pub role_override: RoleOverrideStep,
    pub phase_progress: Arc<PhaseProgressProvider>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// Database connections should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when the role override allowlist is invalid
    pub async fn init(
        connections: DatabaseConnections,
        settings: AppSettings,
        secret_manager: Arc<SecretManager>,
    ) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");
        let db = connections.main.clone();

        let audit_store = Arc::new(AuditStore::new(connections.audit.clone()));
        let audit_logger = Arc::new(AuditLogger::new(audit_store.clone()));

        tracing::debug!("Creating stores...");
        let user_store = Arc::new(UserStore::new(db.clone()));
        let role_store = Arc::new(RoleStore::new(db.clone()));
        let group_store = Arc::new(GroupStore::new(db.clone()));
        let phase_store = Arc::new(PhaseStore::new(db.clone()));
        let diary_store = Arc::new(DiaryStore::new(db.clone()));
        let document_store = Arc::new(DocumentStore::new(db.clone()));
        let meeting_store = Arc::new(MeetingStore::new(db.clone()));
        let notification_store = Arc::new(NotificationStore::new(db.clone()));
        let academic_store = Arc::new(AcademicStore::new(db));
        tracing::debug!("Stores created");

        let query_cache = Arc::new(QueryCache::new(settings.query_cache_ttl()));

        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.clone()));
        let token_provider = Arc::new(TokenProvider::new(
            secret_manager.clone(),
            settings.jwt_expiration_minutes(),
        ));
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            user_store.clone(),
            crypto_provider.clone(),
        ));
        let role_override = RoleOverrideStep::from_settings(settings.role_override())?;
        let phase_progress = Arc::new(PhaseProgressProvider::new(phase_store.clone(), query_cache.clone()));

        tracing::info!(role_override = role_override.policy_name(), "AppData initialization complete");

        Ok(Self {
            connections,
            settings,
            secret_manager,
            audit_store,
            audit_logger,
            user_store,
            role_store,
            group_store,
            phase_store,
            diary_store,
            document_store,
            meeting_store,
            notification_store,
            academic_store,
            query_cache,
            crypto_provider,
            token_provider,
            authentication_provider,
            role_resolver: RoleResolver::new(),
            role_override,
            phase_progress,
        })
    }
}
