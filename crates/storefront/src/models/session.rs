//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use storefront_core::CustomerId;

/// Session-stored customer identity.
///
/// Minimal data stored in the session to scope order lookups to the
/// logged-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// Customer ID issued by the commerce backend.
    pub id: CustomerId,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";

    /// Key for the page to return to after logging in.
    pub const RETURN_TO: &str = "return_to";
}
