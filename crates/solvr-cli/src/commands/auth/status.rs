use serde::Serialize;
use solvr_auth::AuthError;
use solvr_config::SolvrConfig;
use solvr_core::enums::UserRole;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    user_id: Option<String>,
    role: Option<UserRole>,
    note: Option<String>,
}

pub fn handle(flags: &GlobalFlags, config: &SolvrConfig) -> anyhow::Result<()> {
    let store = bootstrap::identity_store(config)?;

    let status = match solvr_auth::status(&store) {
        Ok(identity) => AuthStatusResponse {
            authenticated: true,
            user_id: Some(identity.user_id),
            role: Some(identity.role),
            note: None,
        },
        Err(AuthError::NotAuthenticated) => AuthStatusResponse {
            authenticated: false,
            user_id: None,
            role: None,
            note: Some("not logged in".into()),
        },
        Err(error) => AuthStatusResponse {
            authenticated: false,
            user_id: None,
            role: None,
            note: Some(error.to_string()),
        },
    };

    output(&status, flags.format)
}
