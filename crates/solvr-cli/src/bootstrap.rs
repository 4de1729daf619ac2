use anyhow::Context;
use solvr_auth::{FileIdentityStore, SessionContext};
use solvr_client::MarketplaceClient;
use solvr_config::SolvrConfig;
use solvr_core::enums::UserRole;
use solvr_session::GeolocationProvider;
use solvr_session::geo::{CachedLocation, provider_from_config};

pub fn load_config() -> anyhow::Result<SolvrConfig> {
    SolvrConfig::load_with_dotenv().context("failed to load solvr configuration")
}

pub fn client(config: &SolvrConfig) -> anyhow::Result<MarketplaceClient> {
    MarketplaceClient::from_config(&config.backend).context("failed to build marketplace client")
}

pub fn identity_store(config: &SolvrConfig) -> anyhow::Result<FileIdentityStore> {
    FileIdentityStore::from_config(&config.session)
        .context("failed to open identity store")
}

/// The stored session, or an anonymous requester.
pub fn session_context(config: &SolvrConfig) -> anyhow::Result<SessionContext> {
    let store = identity_store(config)?;
    Ok(solvr_auth::current_context(&store, UserRole::Buyer))
}

/// Configured location source, reusing a fix within `maximum_age_ms`.
pub fn geolocation(config: &SolvrConfig) -> impl GeolocationProvider {
    CachedLocation::new(provider_from_config(&config.geolocation))
}
