//! Order detail route handlers.
//!
//! The page route renders a shell in the loading state; HTMX then requests the
//! panel, which drives the customer's order view and renders whatever state it
//! settles in.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use storefront_core::OrderId;

use crate::commerce::{Address, LineItem, Order};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireCustomer;
use crate::services::order_view::LOADING_MESSAGE;
use crate::services::{Navigation, OrderViews, ViewState};
use crate::state::AppState;

/// Longest view token accepted from the client.
const MAX_VIEW_TOKEN_LEN: usize = 64;

// =============================================================================
// View Types
// =============================================================================

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub id: String,
    /// Seconds since the Unix epoch.
    pub created: i64,
    pub items: Vec<LineItemRow>,
    pub totals: Vec<TotalLine>,
    pub billing: Option<AddressBlock>,
    pub shipping: Option<AddressBlock>,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        let contents = &order.order;

        Self {
            id: order.id.to_string(),
            created: order.created,
            items: contents.line_items.iter().map(LineItemRow::from).collect(),
            totals: vec![
                TotalLine::new("Subtotal", contents.subtotal.formatted_with_symbol.as_str()),
                TotalLine::new(
                    "Shipping",
                    contents.shipping.price.formatted_with_symbol.as_str(),
                ),
                TotalLine::new("Tax", contents.tax.amount.formatted_with_symbol.as_str()),
                TotalLine {
                    emphasized: true,
                    ..TotalLine::new("Total", contents.total.formatted_with_symbol.as_str())
                },
            ],
            billing: AddressBlock::from_address("Billing address", order.billing.as_ref()),
            shipping: AddressBlock::from_address("Shipping address", order.shipping.as_ref()),
        }
    }
}

/// One row of the items table.
#[derive(Debug, Clone)]
pub struct LineItemRow {
    pub id: String,
    pub product_name: String,
    /// Image source, only when the item has media.
    pub thumbnail: Option<String>,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&LineItem> for LineItemRow {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            product_name: item.product_name.clone(),
            thumbnail: item.media.as_ref().map(|media| media.source.clone()),
            price: item.price.formatted_with_symbol.to_string(),
            quantity: item.quantity,
            line_total: item.line_total.formatted_with_symbol.to_string(),
        }
    }
}

/// A labelled address card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBlock {
    pub label: &'static str,
    pub name: String,
    pub lines: Vec<String>,
}

impl AddressBlock {
    /// Build the card for `address`, or nothing when there is no address.
    #[must_use]
    pub fn from_address(label: &'static str, address: Option<&Address>) -> Option<Self> {
        let address = address?;

        Some(Self {
            label,
            name: address.name.clone(),
            lines: vec![
                address.street.clone(),
                format!("{}, {}", address.town_city, address.county_state),
                format!("{}, {}", address.country, address.postal_zip_code),
            ],
        })
    }
}

/// One row of the totals summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalLine {
    pub label: &'static str,
    pub amount: String,
    pub emphasized: bool,
}

impl TotalLine {
    fn new(label: &'static str, amount: &str) -> Self {
        Self {
            label,
            amount: amount.to_string(),
            emphasized: false,
        }
    }
}

/// Headline (and optional backend detail) for the non-loaded states.
#[derive(Debug, Clone)]
pub struct StatusView {
    pub headline: &'static str,
    pub detail: Option<String>,
}

/// Page title: the order id when one is loaded, else just the site name.
fn page_title(site_name: &str, order_id: Option<&str>) -> String {
    order_id.map_or_else(|| site_name.to_string(), |id| format!("{id} | {site_name}"))
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the order panel.
#[derive(Debug, Deserialize)]
pub struct PanelQuery {
    /// Token of the page that requested the panel.
    pub view: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Order page shell, rendered in the loading state.
#[derive(Template, WebTemplate)]
#[template(path = "account/order_show.html")]
pub struct OrderPageTemplate {
    pub title: String,
    pub site_name: String,
    /// Panel URL for this page, carrying its view token.
    pub panel_url: String,
    pub status: StatusView,
}

/// Order panel fragment (for HTMX), rendered in a terminal state.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_panel.html")]
pub struct OrderPanelTemplate {
    pub title: String,
    pub status: Option<StatusView>,
    pub order: Option<OrderDetailView>,
}

impl OrderPanelTemplate {
    /// Render data for `state`.
    #[must_use]
    pub fn from_state(state: &ViewState, site_name: &str) -> Self {
        let order = state.order().map(OrderDetailView::from);
        let status = state.headline().map(|headline| StatusView {
            headline,
            detail: match state {
                ViewState::Error { detail } => detail.clone(),
                _ => None,
            },
        });

        Self {
            title: page_title(site_name, order.as_ref().map(|order| order.id.as_str())),
            status,
            order,
        }
    }
}

// =============================================================================
// Routes
// =============================================================================

fn panel_url(order_id: &OrderId, view_token: &str) -> String {
    format!(
        "/account/orders/{}/panel?view={view_token}",
        urlencoding::encode(order_id.as_str())
    )
}

fn parse_order_id(raw: &str) -> Result<OrderId> {
    OrderId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Display the order page shell.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(_customer): RequireCustomer,
    Path(id): Path<String>,
) -> Result<OrderPageTemplate> {
    let order_id = parse_order_id(&id)?;
    let site_name = state.config().site_name.clone();

    Ok(OrderPageTemplate {
        title: page_title(&site_name, None),
        site_name,
        panel_url: panel_url(&order_id, &OrderViews::new_token()),
        status: StatusView {
            headline: LOADING_MESSAGE,
            detail: None,
        },
    })
}

/// Fetch the order and render the panel (HTMX).
///
/// Answers `204 No Content` when a newer request for the same page won the
/// race, so the client keeps the newer markup.
#[instrument(skip_all, fields(order_id = %id, customer_id = %customer.id))]
pub async fn panel(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<String>,
    Query(query): Query<PanelQuery>,
) -> Result<Response> {
    let order_id = parse_order_id(&id)?;
    let token = query.view.filter(|token| !token.is_empty());
    if token.as_ref().is_some_and(|token| token.len() > MAX_VIEW_TOKEN_LEN) {
        return Err(AppError::BadRequest("view token too long".to_string()));
    }

    add_breadcrumb("orders", "Viewed order", Some(&[("order_id", order_id.as_str())]));

    let views = state.order_views();
    let navigation = match token {
        Some(token) => {
            views
                .controller(&customer.id, &token)
                .await
                .navigate(order_id)
                .await
        }
        None => views.detached(&customer.id).navigate(order_id).await,
    };

    match navigation {
        Navigation::Settled(view) => {
            Ok(OrderPanelTemplate::from_state(&view, &state.config().site_name).into_response())
        }
        Navigation::Superseded => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
