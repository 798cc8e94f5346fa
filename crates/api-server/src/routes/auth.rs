//! Login and logout routes.
//!
//! Authentication is form based: a successful login stores a server-side
//! session and hands the browser an HttpOnly cookie. API clients may
//! replay the same token as a bearer header.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::auth::{clear_session_cookie, session_cookie, token_from_headers};
use crate::routes::pages;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LoginPageQuery {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    logout: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let mut notices = String::new();
    if query.error.is_some() {
        notices.push_str("<p class=\"notice error\">Invalid username or password.</p>\n");
    }
    if query.logout.is_some() {
        notices.push_str("<p class=\"notice\">You have been signed out.</p>\n");
    }

    let body = format!(
        "<h1>Sign in</h1>\n{notices}<form method=\"post\" action=\"/login\">\n\
         <p><label>Username <input type=\"text\" name=\"username\" required></label></p>\n\
         <p><label>Password <input type=\"password\" name=\"password\" required></label></p>\n\
         <p><button type=\"submit\">Sign in</button></p>\n\
         </form>"
    );
    pages::layout("Sign in", &body)
}

async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if !state.credentials().verify(&form.username, &form.password) {
        tracing::warn!("rejected login for {}", form.username);
        return Redirect::to("/login?error").into_response();
    }

    let token = state.sessions().create(&form.username).await;
    tracing::info!("user {} signed in", form.username);
    (
        [(header::SET_COOKIE, session_cookie(&token))],
        Redirect::to("/tasks"),
    )
        .into_response()
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = token_from_headers(&headers) {
        state.sessions().revoke(&token).await;
    }
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/login?logout"),
    )
        .into_response()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}
