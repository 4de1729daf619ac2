//! # solvr-auth
//!
//! Marketplace login and registration, plus persistence of the resulting
//! session identity.
//!
//! The backend issues no session credential the client needs to keep: it
//! answers with the user's id, and that id plus the role is the whole
//! identity. Flows take the backend and the store as parameters so tests can
//! swap either.

mod context;
mod error;
mod store;

pub use context::SessionContext;
pub use error::AuthError;
pub use store::{FileIdentityStore, IdentityStore, MemoryIdentityStore};

use solvr_client::{AuthResponse, ClientError, LoginRequest, MarketplaceApi, RegisterRequest};
use solvr_core::enums::UserRole;
use solvr_core::identity::SessionIdentity;

/// Log in and persist the identity.
///
/// # Errors
///
/// - [`AuthError::Validation`] for a blank email or password (no request is made).
/// - [`AuthError::InvalidCredentials`] when the backend answers 401.
/// - [`AuthError::MissingUserId`] when the backend answers without an id.
/// - [`AuthError::Client`] for other backend failures.
pub async fn login(
    api: &dyn MarketplaceApi,
    store: &dyn IdentityStore,
    email: &str,
    password: &str,
    role: UserRole,
) -> Result<SessionIdentity, AuthError> {
    let email = required("email", email)?;
    let password = required("password", password)?;

    let response = api
        .login(&LoginRequest {
            email,
            password,
            role,
        })
        .await
        .map_err(map_credentials_error)?;
    persist(store, &response, role)
}

/// Create an account and persist the identity.
///
/// # Errors
///
/// Same as [`login`], with `name` also required.
pub async fn register(
    api: &dyn MarketplaceApi,
    store: &dyn IdentityStore,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> Result<SessionIdentity, AuthError> {
    let name = required("name", name)?;
    let email = required("email", email)?;
    let password = required("password", password)?;

    let response = api
        .register(&RegisterRequest {
            name,
            email,
            password,
            role,
        })
        .await?;
    persist(store, &response, role)
}

/// Forget the stored identity.
///
/// # Errors
///
/// Returns [`AuthError::IdentityStore`] if the store cannot be cleared.
pub fn logout(store: &dyn IdentityStore) -> Result<(), AuthError> {
    store.clear()?;
    tracing::info!("logged out");
    Ok(())
}

/// The stored identity.
///
/// # Errors
///
/// [`AuthError::NotAuthenticated`] when nobody is logged in.
pub fn status(store: &dyn IdentityStore) -> Result<SessionIdentity, AuthError> {
    store.load()?.ok_or(AuthError::NotAuthenticated)
}

/// Session context for the stored identity, or an anonymous one in
/// `fallback_role` when nobody is logged in or the store is unreadable.
#[must_use]
pub fn current_context(store: &dyn IdentityStore, fallback_role: UserRole) -> SessionContext {
    match store.load() {
        Ok(Some(identity)) => SessionContext::from(identity),
        Ok(None) => SessionContext::anonymous(fallback_role),
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable identity store");
            SessionContext::anonymous(fallback_role)
        }
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

fn map_credentials_error(error: ClientError) -> AuthError {
    match error {
        ClientError::Api { status: 401, .. } => AuthError::InvalidCredentials,
        other => AuthError::Client(other),
    }
}

fn persist(
    store: &dyn IdentityStore,
    response: &AuthResponse,
    role: UserRole,
) -> Result<SessionIdentity, AuthError> {
    let user_id = response.user_id().ok_or(AuthError::MissingUserId)?;
    let identity = SessionIdentity::new(user_id, role);
    store.save(&identity)?;
    tracing::info!(user_id, %role, "session identity stored");
    Ok(identity)
}
