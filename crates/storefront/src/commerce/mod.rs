//! Commerce backend API client.
//!
//! # Architecture
//!
//! - The hosted commerce backend is the source of truth for orders and
//!   customers; nothing is stored or cached locally
//! - Route handlers depend on the [`CommerceApi`] trait so tests can swap in
//!   a fake backend
//! - [`CommerceClient`] is the production implementation over `reqwest`
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront::commerce::{CommerceApi, CommerceClient};
//!
//! let client = CommerceClient::new(&config.commerce);
//!
//! match client.get_order(&order_id, &customer_id).await? {
//!     Some(order) => println!("{} items", order.order.line_items.len()),
//!     None => println!("no such order"),
//! }
//! ```

mod client;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod types;

pub use client::CommerceClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::{CustomerId, OrderId};

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error(
        "Commerce API error ({status}): {}",
        .message.as_deref().unwrap_or("(no message)")
    )]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the backend's error body, if it sent one.
        message: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl CommerceError {
    /// Message text the backend attached to the failure, if any.
    ///
    /// Transport and parse errors never produce a message: their text comes
    /// from our own stack and is not meant for customers.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Operations the storefront needs from the commerce backend.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Look up one order belonging to `customer_id`.
    ///
    /// Returns `Ok(None)` when the backend answers successfully without an
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it
    /// (including unknown or foreign orders).
    async fn get_order(
        &self,
        order_id: &OrderId,
        customer_id: &CustomerId,
    ) -> Result<Option<Order>, CommerceError>;

    /// Ask the backend to e-mail a one-time login link.
    ///
    /// The backend appends the login token to `callback_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn request_login_email(&self, email: &str, callback_url: &str)
    -> Result<(), CommerceError>;

    /// Exchange a one-time login token for the customer's identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown, expired, or the request fails.
    async fn exchange_login_token(&self, token: &str) -> Result<CustomerLogin, CommerceError>;
}
