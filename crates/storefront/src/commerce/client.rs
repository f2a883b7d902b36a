//! REST client for the commerce backend.
//!
//! All requests authenticate with the storefront's secret key via the
//! `X-Authorization` header. The client has no request timeout and never
//! retries; a call waits until the backend answers or the connection fails.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument};

use storefront_core::{CustomerId, OrderId};

use super::types::{CustomerLogin, ErrorResponse, Order, OrderResponse};
use super::{CommerceApi, CommerceError};
use crate::config::CommerceConfig;

/// Client for the commerce backend REST API.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    api_url: String,
    secret_key: SecretString,
}

#[derive(Debug, Serialize)]
struct EmailTokenRequest<'a> {
    email: &'a str,
    base_url: &'a str,
}

#[derive(Debug, Serialize)]
struct ExchangeTokenRequest<'a> {
    token: &'a str,
}

impl CommerceClient {
    /// Create a new commerce API client.
    #[must_use]
    pub fn new(config: &CommerceConfig) -> Self {
        Self {
            inner: Arc::new(CommerceClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                secret_key: config.secret_key.clone(),
            }),
        }
    }

    /// URL of a single customer-scoped order.
    fn order_url(&self, order_id: &OrderId, customer_id: &CustomerId) -> String {
        format!(
            "{}/customers/{}/orders/{}",
            self.inner.api_url,
            urlencoding::encode(customer_id.as_str()),
            urlencoding::encode(order_id.as_str())
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.api_url)
    }

    /// Send a request and return the raw success body.
    async fn execute(&self, request: RequestBuilder) -> Result<String, CommerceError> {
        let response = request
            .header("X-Authorization", self.inner.secret_key.expose_secret())
            .header("Accept", "application/json")
            .header("User-Agent", "Storefront/1.0")
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CommerceError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            debug!(status = %status, "commerce API returned an error status");
            return Err(CommerceError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl CommerceApi for CommerceClient {
    #[instrument(skip(self), fields(order_id = %order_id, customer_id = %customer_id))]
    async fn get_order(
        &self,
        order_id: &OrderId,
        customer_id: &CustomerId,
    ) -> Result<Option<Order>, CommerceError> {
        let url = self.order_url(order_id, customer_id);
        let body = self.execute(self.inner.client.get(&url)).await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        let response: OrderResponse = serde_json::from_str(&body)?;
        Ok(response.data)
    }

    #[instrument(skip(self, email))]
    async fn request_login_email(
        &self,
        email: &str,
        callback_url: &str,
    ) -> Result<(), CommerceError> {
        let request = EmailTokenRequest {
            email,
            base_url: callback_url,
        };
        self.execute(
            self.inner
                .client
                .post(self.endpoint("customers/email-token"))
                .json(&request),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn exchange_login_token(&self, token: &str) -> Result<CustomerLogin, CommerceError> {
        let body = self
            .execute(
                self.inner
                    .client
                    .post(self.endpoint("customers/exchange-token"))
                    .json(&ExchangeTokenRequest { token }),
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Extract the backend's message from an error body, if it is the usual
/// `{"error": {"message": ...}}` shape.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error.message)
}
