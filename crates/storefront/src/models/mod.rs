//! Domain models for storefront.
//!
//! Orders themselves are never stored locally; the only model the storefront
//! owns is the customer identity kept in the session.

pub mod session;

pub use session::CurrentCustomer;
pub use session::keys as session_keys;
