//! Business logic services for storefront.
//!
//! # Services
//!
//! - `order_view` - Order detail view state machine and the registry of live
//!   views (one per rendered order page)

pub mod order_view;

pub use order_view::{Navigation, OrderViewController, OrderViews, ViewState};
