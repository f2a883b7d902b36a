//! Money values formatted by the commerce backend.
//!
//! The backend returns every amount with a `formatted_with_symbol` rendering
//! (e.g. `"$19.99"`, `"£4.00"`). The storefront never parses or recomputes
//! these strings; it only carries them to the template.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A currency amount pre-rendered for display, symbol included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FormattedMoney(String);

impl FormattedMoney {
    /// Wrap a display string produced by the backend.
    #[must_use]
    pub fn new(formatted: impl Into<String>) -> Self {
        Self(formatted.into())
    }

    /// The display string, exactly as received.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormattedMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
