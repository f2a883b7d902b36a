//! Sample orders shared by unit tests.

use serde_json::{Value, json};

use super::types::Order;

fn money(formatted: &str) -> Value {
    json!({ "formatted_with_symbol": formatted })
}

fn shipping_address() -> Value {
    json!({
        "name": "Ada Lovelace",
        "street": "12 St James's Square",
        "town_city": "London",
        "county_state": "Greater London",
        "postal_zip_code": "SW1Y 4JH",
        "country": "GB",
    })
}

/// Order `id` created at 1700000000 with two items (first has an image),
/// empty billing and a populated shipping address.
#[allow(clippy::unwrap_used)]
pub fn sample_order(id: &str) -> Order {
    serde_json::from_value(json!({
        "id": id,
        "created": 1_700_000_000,
        "order": {
            "line_items": [
                {
                    "id": "item_1",
                    "product_name": "Coconut Soap",
                    "quantity": 2,
                    "price": money("$6.00"),
                    "line_total": money("$12.00"),
                    "media": { "type": "image", "source": "https://cdn.example/soap.png" },
                },
                {
                    "id": "item_2",
                    "product_name": "Gift Wrap",
                    "quantity": 1,
                    "price": money("$3.50"),
                    "line_total": money("$3.50"),
                    "media": [],
                },
            ],
            "subtotal": money("$15.50"),
            "shipping": { "price": money("$4.00") },
            "tax": { "amount": money("$1.55") },
            "total": money("$21.05"),
        },
        "billing": [],
        "shipping": shipping_address(),
    }))
    .unwrap()
}

/// Order `id` with no line items and both addresses missing.
#[allow(clippy::unwrap_used)]
pub fn empty_order(id: &str) -> Order {
    serde_json::from_value(json!({
        "id": id,
        "created": 1_700_000_000,
        "order": {
            "line_items": [],
            "subtotal": money("$0.00"),
            "shipping": { "price": money("$0.00") },
            "tax": { "amount": money("$0.00") },
            "total": money("$0.00"),
        },
        "billing": [],
        "shipping": [],
    }))
    .unwrap()
}
