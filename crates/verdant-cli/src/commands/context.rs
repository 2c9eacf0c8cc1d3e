//! Shared wiring for every command.

use std::sync::Arc;

use anyhow::{Context, Result};
use verdant_api::{ApiClient, AuthApiClient, ProfileApiClient};
use verdant_application::{LanguageBridge, SessionUseCase};
use verdant_core::locale::LocaleCache;
use verdant_core::session::{CredentialStore, SessionManager};
use verdant_core::storage::KeyValueStorage;
use verdant_infrastructure::{ConfigService, JsonFileStorage};

/// Fully wired client, built once per invocation.
///
/// Construction runs the startup restore, so commands always see a
/// settled session and never a `Loading` state.
pub struct AppContext {
    pub session: SessionUseCase,
    pub language: LanguageBridge,
}

impl AppContext {
    pub async fn init() -> Result<Self> {
        let config = ConfigService::at_default_path()
            .context("Failed to resolve the config path")?
            .get()
            .context("Failed to load configuration")?;

        let api = ApiClient::from_config(&config).context("Failed to build the backend client")?;
        let auth = Arc::new(AuthApiClient::new(api.clone()));
        let profile = Arc::new(ProfileApiClient::new(api));

        let storage: Arc<dyn KeyValueStorage> = Arc::new(
            JsonFileStorage::at_default_path().context("Failed to open device storage")?,
        );

        let manager = SessionManager::shared(CredentialStore::new(storage.clone()));
        let session = SessionUseCase::new(manager.clone(), auth, profile.clone());
        let language = LanguageBridge::new(LocaleCache::new(storage), profile, manager);

        session.initialize().await;
        language
            .initialize()
            .await
            .context("Failed to load the language cache")?;

        Ok(Self { session, language })
    }
}
