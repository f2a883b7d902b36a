//! Authentication route handlers.
//!
//! Customers log in with a one-time link: the commerce backend e-mails a
//! token, and the callback exchanges it for the customer's ID.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_customer, set_current_customer, take_return_to};
use crate::models::CurrentCustomer;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub site_name: String,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "email" => "Please enter a valid email address.",
        "send" => "We could not send a login link. Please try again.",
        "link" => "That login link is invalid or has expired.",
        _ => "Something went wrong. Please try again.",
    }
}

fn success_message(code: &str) -> Option<&'static str> {
    match code {
        "sent" => Some("Check your inbox for a login link."),
        "signed_in" => Some("You are logged in."),
        "signed_out" => Some("You have been logged out."),
        _ => None,
    }
}

/// Where the backend's login e-mail should point; the token is appended.
fn login_callback_url(base_url: &str) -> String {
    format!("{base_url}/auth/callback/")
}

fn looks_like_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        site_name: state.config().site_name.clone(),
        error: query.error.as_deref().map(error_message),
        success: query.success.as_deref().and_then(success_message),
    }
}

/// Handle login form submission.
///
/// Asks the commerce backend to e-mail a one-time login link.
#[instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let email = form.email.trim();
    if !looks_like_email(email) {
        return Redirect::to("/auth/login?error=email").into_response();
    }

    let callback_url = login_callback_url(&state.config().base_url);
    match state
        .commerce()
        .request_login_email(email, &callback_url)
        .await
    {
        Ok(()) => Redirect::to("/auth/login?success=sent").into_response(),
        Err(e) => {
            tracing::warn!("Failed to request login email: {e}");
            Redirect::to("/auth/login?error=send").into_response()
        }
    }
}

/// Handle the link from the login e-mail.
///
/// Exchanges the token for the customer ID and stores it in the session.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Path(token): Path<String>,
) -> Result<Response> {
    let login = match state.commerce().exchange_login_token(&token).await {
        Ok(login) => login,
        Err(e) => {
            tracing::warn!("Login token exchange failed: {e}");
            return Ok(Redirect::to("/auth/login?error=link").into_response());
        }
    };

    let customer = CurrentCustomer {
        id: login.customer_id,
    };
    let return_to = take_return_to(&session).await;

    set_current_customer(&session, &customer).await?;

    set_sentry_user(&customer.id);
    tracing::info!(customer_id = %customer.id, "Customer logged in");

    let destination = return_to.unwrap_or_else(|| "/auth/login?success=signed_in".to_string());
    Ok(Redirect::to(&destination).into_response())
}

/// Handle logout.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_customer(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/auth/login?success=signed_out").into_response())
}
