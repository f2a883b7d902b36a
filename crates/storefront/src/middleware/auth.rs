//! Customer authentication extractors.
//!
//! The logged-in customer is read from the session and handed to handlers as
//! an explicit value, so order lookups never reach for ambient state.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentCustomer, session_keys};

/// Login page that unauthenticated HTML requests are sent to.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires a logged-in customer.
///
/// HTML requests without a customer are redirected to the login page; HTMX
/// fragment requests get `401` with an `HX-Redirect` to the login page, so a
/// panel whose session expired does not sit on "Loading".
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireCustomer(customer): RequireCustomer,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", customer.id)
/// }
/// ```
pub struct RequireCustomer(pub CurrentCustomer);

/// Error returned when a customer is required but nobody is logged in.
#[derive(Debug)]
pub enum CustomerRejection {
    /// Redirect to login page (for full page requests).
    RedirectToLogin,
    /// Unauthorized response (for HTMX fragments).
    Unauthorized,
    /// The session itself could not be read.
    Error(AppError),
}

impl IntoResponse for CustomerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => {
                (StatusCode::UNAUTHORIZED, [("HX-Redirect", LOGIN_PATH)]).into_response()
            }
            Self::Error(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = CustomerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_fragment = parts.headers.contains_key("hx-request");
        let rejection = || {
            if is_fragment {
                CustomerRejection::Unauthorized
            } else {
                CustomerRejection::RedirectToLogin
            }
        };

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or_else(|| {
            CustomerRejection::Error(AppError::Internal("session layer missing".to_string()))
        })?;

        let customer: Option<CurrentCustomer> = session
            .get(session_keys::CURRENT_CUSTOMER)
            .await
            .map_err(|e| CustomerRejection::Error(AppError::Session(e)))?;

        match customer {
            Some(customer) => Ok(Self(customer)),
            None => {
                if !is_fragment {
                    let path = requested_path(parts);
                    if let Err(e) = session.insert(session_keys::RETURN_TO, path).await {
                        tracing::warn!("Failed to remember return path: {e}");
                    }
                }
                Err(rejection())
            }
        }
    }
}

/// Helper to store the logged-in customer in the session.
///
/// Cycles the session ID first so a pre-login session cannot be fixated.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_customer(
    session: &Session,
    customer: &CurrentCustomer,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_CUSTOMER, customer)
        .await
}

/// Take the page remembered before the login redirect, if it is a local path.
pub async fn take_return_to(session: &Session) -> Option<String> {
    let path: String = session
        .remove(session_keys::RETURN_TO)
        .await
        .ok()
        .flatten()?;

    is_local_path(&path).then_some(path)
}

/// Path and query the client asked for, including any prefix stripped by
/// nested routers.
fn requested_path(parts: &Parts) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0);

    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Helper to clear the logged-in customer from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_customer(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentCustomer>(session_keys::CURRENT_CUSTOMER)
        .await?;
    Ok(())
}
