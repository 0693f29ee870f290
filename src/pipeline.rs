//! Order-to-material collection pipeline
//!
//! Walks the two-level API (order list, then one detail call per order) and
//! accumulates every material number ever ordered into a deduplicated set.
//! Detail fetches are strictly sequential.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::client::OrderClient;
use crate::error::Result;
use crate::session::Session;

/// What to do when a single order-detail fetch fails at the transport level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole run on the first error
    #[default]
    Abort,
    /// Log the failed order and keep going
    Skip,
}

/// Every material number across all historical orders, deduplicated
pub async fn collect_all_materials(
    client: &OrderClient,
    session: &Session,
    policy: FailurePolicy,
) -> Result<BTreeSet<String>> {
    let orders = client.list_orders(session).await?;
    info!("Collecting materials from {} orders", orders.len());

    let mut materials = BTreeSet::new();
    let mut failed = 0usize;

    for order in &orders {
        let detail = match client.get_order_detail(order, session).await {
            Ok(detail) => detail,
            Err(e) => match policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Skip => {
                    warn!("Skipping order {}: {}", order.order_number, e);
                    failed += 1;
                    continue;
                }
            },
        };
        materials.extend(detail.material_numbers());
    }

    if failed > 0 {
        warn!("{} of {} orders failed and were skipped", failed, orders.len());
    }
    info!("Collected {} distinct materials", materials.len());
    Ok(materials)
}
