//! Newtype IDs for type-safe entity references.
//!
//! The commerce backend issues opaque string identifiers (`ord_...`,
//! `cstmr_...`, `item_...`). Use the `define_id!` macro to wrap them so that
//! an order ID can never be passed where a customer ID is expected.

use thiserror::Error;

/// Error returned when parsing an ID from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The input was empty or only whitespace.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `new()` (unchecked), `parse()` (presence check), `as_str()`
/// - `Display`, `AsRef<str>` and `From<$name> for String`
///
/// # Example
///
/// ```rust
/// # use storefront_core::define_id;
/// define_id!(CartId);
/// define_id!(ProductId);
///
/// let cart = CartId::new("cart_1");
/// let product = ProductId::new("prod_1");
///
/// // These are different types, so this won't compile:
/// // let _: CartId = product;
/// # let _ = (cart, product);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend-issued identifier without checking it.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse an identifier from untrusted input (route params, forms).
            ///
            /// Only presence is checked: surrounding whitespace is trimmed and
            /// an empty result is rejected.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::Empty`] if nothing remains after trimming.
            pub fn parse(input: &str) -> ::core::result::Result<Self, $crate::IdError> {
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Empty(stringify!($name)));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(OrderId);
define_id!(CustomerId);
define_id!(LineItemId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = OrderId::parse("  ord_1001 ").unwrap();
        assert_eq!(id.as_str(), "ord_1001");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(OrderId::parse("   "), Err(IdError::Empty("OrderId")));
        assert_eq!(
            CustomerId::parse("").unwrap_err().to_string(),
            "CustomerId cannot be empty"
        );
    }

    #[test]
    fn test_serde_is_transparent() {
        let id: CustomerId = serde_json::from_str("\"cstmr_42\"").unwrap();
        assert_eq!(id, CustomerId::new("cstmr_42"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cstmr_42\"");
    }

    #[test]
    fn test_display_matches_inner() {
        assert_eq!(LineItemId::new("item_7").to_string(), "item_7");
    }
}
