//! Session-based authentication primitives.

mod credentials;
mod session;

pub use credentials::{CredentialProvider, EnvCredentials};
pub use session::{
    clear_session_cookie, session_cookie, token_from_headers, Session, SessionStore,
    SESSION_COOKIE,
};

use axum::http::HeaderMap;

use crate::state::AppState;

/// Resolve the caller's session, if any.
pub async fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let token = token_from_headers(headers)?;
    state.sessions().resolve(&token).await
}
