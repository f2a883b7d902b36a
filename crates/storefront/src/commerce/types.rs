//! Types for commerce backend responses.
//!
//! Field names follow the backend's snake_case JSON. Only the fields the
//! storefront renders are modelled; everything else is ignored by serde.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use storefront_core::{CustomerId, FormattedMoney, LineItemId, OrderId};

// ─────────────────────────────────────────────────────────────────────────────
// Order Types
// ─────────────────────────────────────────────────────────────────────────────

/// A placed order, scoped to the customer it was fetched for.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// The order ID.
    pub id: OrderId,
    /// When the order was created (seconds since the Unix epoch).
    pub created: i64,
    /// Line items and totals.
    pub order: OrderContents,
    /// Billing address, `None` when the backend sends an empty collection.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub billing: Option<Address>,
    /// Shipping address, `None` when the backend sends an empty collection.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub shipping: Option<Address>,
}

/// The priced contents of an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderContents {
    /// Line items in the order they were placed.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping charge.
    pub shipping: ShippingCharge,
    /// Tax charge.
    pub tax: TaxCharge,
    /// Grand total.
    pub total: Money,
}

/// Shipping block of an order; only the price is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingCharge {
    pub price: Money,
}

/// Tax block of an order; only the amount is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxCharge {
    pub amount: Money,
}

/// One product entry within an order.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    /// The line item ID.
    pub id: LineItemId,
    /// Product name at the time of purchase.
    pub product_name: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price.
    pub price: Money,
    /// Unit price times quantity, as computed by the backend.
    pub line_total: Money,
    /// Product image, if the product has one.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub media: Option<Media>,
}

/// A media asset attached to a line item.
#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    /// Public URL of the asset.
    pub source: String,
}

/// A money value. The backend sends several renderings; the storefront only
/// ever displays the one with the currency symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct Money {
    pub formatted_with_symbol: FormattedMoney,
}

/// A postal address attached to an order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Recipient name.
    pub name: String,
    /// Street line.
    pub street: String,
    /// Town or city.
    pub town_city: String,
    /// County, state or province.
    pub county_state: String,
    /// Postal or ZIP code.
    pub postal_zip_code: String,
    /// Country (code or name, as stored by the backend).
    pub country: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Customer Login Types
// ─────────────────────────────────────────────────────────────────────────────

/// Result of exchanging an e-mailed login token.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerLogin {
    /// The customer the token belongs to.
    pub customer_id: CustomerId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Envelope around an order lookup.
#[derive(Debug, Deserialize)]
pub(super) struct OrderResponse {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub data: Option<Order>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

/// Treat `null`, `[]` and `{}` as an absent value.
///
/// The backend encodes "no address" / "no media" as an empty array rather
/// than omitting the field.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let is_empty = match &value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    };
    if is_empty {
        return Ok(None);
    }

    T::deserialize(value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}
