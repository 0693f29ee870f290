//! Portal HTTP client
//!
//! One request per call, strictly sequential, no retries and no caching:
//! the portal is a third party whose concurrency tolerance is unknown.
//! Redirects are disabled so that a login redirect surfaces as a signal
//! instead of being silently followed.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::PortalConfig;
use crate::error::Result;
use crate::extract::extract_order_numbers;
use crate::session::Session;

const ORDERS_PATH: &str = "/us-east1/api/v6/orders";
const ORDER_DETAILS_PATH: &str = "/us-east1/api/v5/order-details";

/// Fixed addressing constants for the order-detail endpoint
pub const ORDER_TYPE: &str = "STORE_FULFILLMENT";
pub const GROUP_NUMBER: &str = "01";

/// A historical order, as addressed by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReference {
    pub order_number: String,
}

impl OrderReference {
    pub fn new(order_number: impl Into<String>) -> Self {
        Self {
            order_number: order_number.into(),
        }
    }
}

/// Raw order-detail response. Non-JSON bodies are kept as-is; extraction
/// degrades to an empty line set downstream.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    raw: String,
}

impl OrderDetail {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn material_numbers(&self) -> Vec<String> {
        crate::extract::extract_material_numbers(self.raw.as_str())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderDetailRequest<'a> {
    order_number: &'a str,
    order_type: &'a str,
    group_number: &'a str,
}

pub struct OrderClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrderClient {
    pub fn new(portal: &PortalConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(portal.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            base_url: portal.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List historical orders. Entries without an order number are skipped.
    pub async fn list_orders(&self, session: &Session) -> Result<Vec<OrderReference>> {
        let url = format!("{}{}", self.base_url, ORDERS_PATH);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(base_headers(session))
            .send()
            .await?;
        let body = response.text().await?;

        let orders: Vec<OrderReference> = extract_order_numbers(&body)
            .into_iter()
            .map(OrderReference::new)
            .collect();
        debug!("Order list returned {} orders", orders.len());
        Ok(orders)
    }

    /// Fetch one order's line items. The body is returned raw; a non-JSON
    /// response is not an error here.
    pub async fn get_order_detail(
        &self,
        order: &OrderReference,
        session: &Session,
    ) -> Result<OrderDetail> {
        let url = format!("{}{}", self.base_url, ORDER_DETAILS_PATH);
        debug!("POST {} for order {}", url, order.order_number);

        let request = OrderDetailRequest {
            order_number: &order.order_number,
            order_type: ORDER_TYPE,
            group_number: GROUP_NUMBER,
        };
        let response = self
            .client
            .post(&url)
            .headers(base_headers(session))
            .json(&request)
            .send()
            .await?;
        let raw = response.text().await?;
        Ok(OrderDetail { raw })
    }

    /// Fetch the nutrition document for one material, raw
    pub async fn get_nutrition(&self, material: &str, session: &Session) -> Result<String> {
        let url = format!("{}/api/v1/materials/{}/nutrition", self.base_url, material);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(base_headers(session))
            .send()
            .await?;
        Ok(response.text().await?)
    }
}

// The portal rejects requests that don't look like its own browser app
fn base_headers(session: &Session) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "accept",
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert("accept-language", HeaderValue::from_static("en_US"));
    headers.insert(
        "x-requested-with",
        HeaderValue::from_static("XMLHttpRequest"),
    );
    if let Ok(value) = session.header_value().parse() {
        headers.insert("cookie", value);
    }
    if let Some(token) = session.xsrf_token() {
        if let Ok(value) = token.parse() {
            headers.insert("x-xsrf-token", value);
        }
    }
    headers
}
