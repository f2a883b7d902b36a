//! Order detail view state machine.
//!
//! An order view starts in [`ViewState::Loading`] and settles into exactly one
//! terminal state per fetch attempt. Navigating the same view to another
//! order re-enters `Loading`; the older fetch is cancelled and its result is
//! never published.
//!
//! # Epoch guard
//!
//! Every navigation takes a ticket from a monotonically increasing epoch.
//! A fetch publishes its result only while its ticket is still the current
//! epoch, and it is dropped as soon as the epoch moves on. Both checks happen
//! while the state channel is locked (state first, then epoch), so a stale
//! response can never overwrite a newer one.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use storefront_core::{CustomerId, OrderId};

use crate::commerce::{CommerceApi, CommerceError, Order};

/// Headline shown while the order is being fetched.
pub const LOADING_MESSAGE: &str = "Loading";

/// Headline shown for any failed fetch.
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry something went wrong.";

/// Headline shown when the backend has no matching order.
pub const NOT_FOUND_MESSAGE: &str = "Sorry we cannot find an order with that number, if you think this is in error please contact us!";

/// How long an idle view controller is kept around.
const VIEW_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Upper bound on concurrently tracked views.
const MAX_TRACKED_VIEWS: u64 = 10_000;

/// Render mode of an order view. Exactly one holds at a time.
#[derive(Debug, Clone)]
pub enum ViewState {
    /// Fetch in flight.
    Loading,
    /// Fetch failed. `detail` is the backend's own message, if it sent one.
    Error { detail: Option<String> },
    /// Backend answered without an order.
    NotFound,
    /// Order fetched.
    Loaded(Box<Order>),
}

impl ViewState {
    /// Map the outcome of one fetch attempt to its terminal state.
    #[must_use]
    pub fn from_fetch(result: Result<Option<Order>, CommerceError>) -> Self {
        match result {
            Ok(Some(order)) => Self::Loaded(Box::new(order)),
            Ok(None) => Self::NotFound,
            Err(err) => Self::Error {
                detail: err.user_message().map(str::to_string),
            },
        }
    }

    /// The order, only once it has been loaded.
    #[must_use]
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Loaded(order) => Some(order.as_ref()),
            _ => None,
        }
    }

    /// Headline for the status page shown in every state but `Loaded`.
    #[must_use]
    pub const fn headline(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING_MESSAGE),
            Self::Error { .. } => Some(GENERIC_ERROR_MESSAGE),
            Self::NotFound => Some(NOT_FOUND_MESSAGE),
            Self::Loaded(_) => None,
        }
    }
}

/// Outcome of [`OrderViewController::navigate`].
#[derive(Debug, Clone)]
pub enum Navigation {
    /// The fetch finished and its state is now the view's state.
    Settled(ViewState),
    /// A newer navigation started first; this one was cancelled.
    Superseded,
}

/// Drives one order view for one customer.
pub struct OrderViewController {
    api: Arc<dyn CommerceApi>,
    customer_id: CustomerId,
    epoch: watch::Sender<u64>,
    state: watch::Sender<ViewState>,
}

impl OrderViewController {
    /// Create a controller in the `Loading` state.
    #[must_use]
    pub fn new(api: Arc<dyn CommerceApi>, customer_id: CustomerId) -> Self {
        Self {
            api,
            customer_id,
            epoch: watch::Sender::new(0),
            state: watch::Sender::new(ViewState::Loading),
        }
    }

    /// The customer this view fetches orders for.
    #[must_use]
    pub const fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// The most recently published state.
    #[must_use]
    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Point the view at `order_id` and fetch it.
    ///
    /// Issues exactly one backend call. Returns [`Navigation::Superseded`]
    /// if another navigation starts before this one settles; in that case the
    /// in-flight request is dropped and nothing is published.
    #[instrument(skip(self), fields(customer_id = %self.customer_id))]
    pub async fn navigate(&self, order_id: OrderId) -> Navigation {
        let mut epoch = self.epoch.subscribe();
        let ticket = self.begin();

        let fetch = self.api.get_order(&order_id, &self.customer_id);
        let result = tokio::select! {
            result = fetch => result,
            () = superseded(&mut epoch, ticket) => {
                debug!(ticket, "order fetch superseded before completion");
                return Navigation::Superseded;
            }
        };

        if let Err(err) = &result {
            warn!(error = %err, "order fetch failed");
        }

        let next = ViewState::from_fetch(result);
        if self.publish(ticket, next.clone()) {
            Navigation::Settled(next)
        } else {
            debug!(ticket, "discarding stale order fetch result");
            Navigation::Superseded
        }
    }

    /// Take a new ticket and reset the view to `Loading`.
    fn begin(&self) -> u64 {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            self.epoch.send_modify(|epoch| {
                *epoch += 1;
                ticket = *epoch;
            });
            *state = ViewState::Loading;
        });
        ticket
    }

    /// Publish `next` if `ticket` is still current.
    fn publish(&self, ticket: u64, next: ViewState) -> bool {
        self.state.send_if_modified(|state| {
            if *self.epoch.borrow() != ticket {
                return false;
            }
            *state = next;
            true
        })
    }
}

/// Resolves once the epoch no longer equals `ticket`.
async fn superseded(epoch: &mut watch::Receiver<u64>, ticket: u64) {
    loop {
        if *epoch.borrow_and_update() != ticket {
            return;
        }
        if epoch.changed().await.is_err() {
            // Controller dropped; nothing can supersede us any more.
            std::future::pending::<()>().await;
        }
    }
}

/// Registry of live order views, keyed by customer and view token.
///
/// Each rendered order page carries its own token, so two tabs never
/// supersede each other; only re-navigation within one page does.
#[derive(Clone)]
pub struct OrderViews {
    api: Arc<dyn CommerceApi>,
    views: Cache<ViewKey, Arc<OrderViewController>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ViewKey {
    customer_id: CustomerId,
    token: String,
}

impl OrderViews {
    /// Create an empty registry over `api`.
    #[must_use]
    pub fn new(api: Arc<dyn CommerceApi>) -> Self {
        let views = Cache::builder()
            .max_capacity(MAX_TRACKED_VIEWS)
            .time_to_idle(VIEW_IDLE_TTL)
            .build();

        Self { api, views }
    }

    /// Generate a token for a freshly rendered page.
    #[must_use]
    pub fn new_token() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// The controller for this customer's view, created on first use.
    pub async fn controller(
        &self,
        customer_id: &CustomerId,
        token: &str,
    ) -> Arc<OrderViewController> {
        let key = ViewKey {
            customer_id: customer_id.clone(),
            token: token.to_string(),
        };
        let api = Arc::clone(&self.api);
        let customer_id = customer_id.clone();

        self.views
            .get_with(key, async move {
                Arc::new(OrderViewController::new(api, customer_id))
            })
            .await
    }

    /// A controller that is not tracked, for requests without a view token.
    #[must_use]
    pub fn detached(&self, customer_id: &CustomerId) -> OrderViewController {
        OrderViewController::new(Arc::clone(&self.api), customer_id.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::commerce::CustomerLogin;
    use crate::commerce::fixtures::sample_order;

    /// Backend whose behaviour is chosen by the requested order id.
    #[derive(Default)]
    struct ScriptedApi {
        slow_started: Notify,
        release_slow: Notify,
    }

    #[async_trait]
    impl CommerceApi for ScriptedApi {
        async fn get_order(
            &self,
            order_id: &OrderId,
            _customer_id: &CustomerId,
        ) -> Result<Option<Order>, CommerceError> {
            match order_id.as_str() {
                "slow" => {
                    self.slow_started.notify_one();
                    self.release_slow.notified().await;
                    Ok(Some(sample_order("slow")))
                }
                "missing" => Ok(None),
                "broken" => Err(CommerceError::Api {
                    status: 503,
                    message: Some("Store is under maintenance".to_string()),
                }),
                "limited" => Err(CommerceError::RateLimited(5)),
                id => Ok(Some(sample_order(id))),
            }
        }

        async fn request_login_email(&self, _: &str, _: &str) -> Result<(), CommerceError> {
            Ok(())
        }

        async fn exchange_login_token(&self, _: &str) -> Result<CustomerLogin, CommerceError> {
            Err(CommerceError::Api {
                status: 404,
                message: None,
            })
        }
    }

    fn controller(api: Arc<ScriptedApi>) -> Arc<OrderViewController> {
        Arc::new(OrderViewController::new(api, CustomerId::new("cstmr_1")))
    }

    #[test]
    fn test_from_fetch_maps_every_outcome() {
        let loaded = ViewState::from_fetch(Ok(Some(sample_order("1001"))));
        assert_eq!(loaded.order().unwrap().id.as_str(), "1001");
        assert_eq!(loaded.headline(), None);

        assert!(matches!(ViewState::from_fetch(Ok(None)), ViewState::NotFound));

        let failed = ViewState::from_fetch(Err(CommerceError::RateLimited(1)));
        assert!(matches!(failed, ViewState::Error { detail: None }));
        assert_eq!(failed.headline(), Some(GENERIC_ERROR_MESSAGE));
        assert!(failed.order().is_none());
    }

    #[tokio::test]
    async fn test_navigate_loads_order() {
        let view = controller(Arc::new(ScriptedApi::default()));
        assert!(matches!(view.current(), ViewState::Loading));

        let Navigation::Settled(state) = view.navigate(OrderId::new("1001")).await else {
            panic!("navigation should settle");
        };
        assert_eq!(state.order().unwrap().id.as_str(), "1001");
        assert_eq!(view.current().order().unwrap().id.as_str(), "1001");
    }

    #[tokio::test]
    async fn test_empty_result_is_not_found_not_error() {
        let view = controller(Arc::new(ScriptedApi::default()));
        let outcome = view.navigate(OrderId::new("missing")).await;
        assert!(matches!(outcome, Navigation::Settled(ViewState::NotFound)));
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_only_backend_message() {
        let view = controller(Arc::new(ScriptedApi::default()));

        let outcome = view.navigate(OrderId::new("broken")).await;
        let Navigation::Settled(ViewState::Error { detail }) = outcome else {
            panic!("expected error state");
        };
        assert_eq!(detail.as_deref(), Some("Store is under maintenance"));

        let outcome = view.navigate(OrderId::new("limited")).await;
        assert!(matches!(
            outcome,
            Navigation::Settled(ViewState::Error { detail: None })
        ));
        assert!(view.current().order().is_none());
    }

    #[tokio::test]
    async fn test_newer_navigation_supersedes_in_flight_fetch() {
        let api = Arc::new(ScriptedApi::default());
        let view = controller(Arc::clone(&api));

        let slow = tokio::spawn({
            let view = Arc::clone(&view);
            async move { view.navigate(OrderId::new("slow")).await }
        });
        api.slow_started.notified().await;
        assert!(matches!(view.current(), ViewState::Loading));

        let fast = view.navigate(OrderId::new("1002")).await;
        assert!(matches!(fast, Navigation::Settled(ViewState::Loaded(_))));

        // Releasing the old request must not overwrite the newer order.
        api.release_slow.notify_one();
        assert!(matches!(slow.await.unwrap(), Navigation::Superseded));
        assert_eq!(view.current().order().unwrap().id.as_str(), "1002");
    }

    #[test]
    fn test_stale_publish_is_rejected() {
        let view = controller(Arc::new(ScriptedApi::default()));
        let old_ticket = view.begin();
        let _new_ticket = view.begin();

        assert!(!view.publish(old_ticket, ViewState::NotFound));
        assert!(matches!(view.current(), ViewState::Loading));
    }

    #[tokio::test]
    async fn test_registry_scopes_views_by_customer_and_token() {
        let views = OrderViews::new(Arc::new(ScriptedApi::default()));
        let alice = CustomerId::new("cstmr_alice");
        let bob = CustomerId::new("cstmr_bob");

        let first = views.controller(&alice, "tab-1").await;
        let again = views.controller(&alice, "tab-1").await;
        let other_tab = views.controller(&alice, "tab-2").await;
        let other_customer = views.controller(&bob, "tab-1").await;

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other_tab));
        assert!(!Arc::ptr_eq(&first, &other_customer));
        assert_eq!(other_customer.customer_id(), &bob);
    }

    #[test]
    fn test_new_token_is_unique() {
        assert_ne!(OrderViews::new_token(), OrderViews::new_token());
        assert_eq!(OrderViews::new_token().len(), 32);
    }
}
