use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub item_id: Uuid,
    /// Price in minor currency units.
    pub price: u64,
    pub quantity: u64,
}

/// An order as persisted in the key-value store.
///
/// Unset timestamps serialize as `null`; records written by older services
/// may omit them entirely or carry `"line_items": null`, both of which decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub order_id: u64,
    pub customer_id: Uuid,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<LineItem>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Shipped,
    Completed,
}

impl Order {
    pub fn new(
        order_id: u64,
        customer_id: Uuid,
        line_items: Vec<LineItem>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id,
            customer_id,
            line_items,
            created_at: Some(now),
            shipped_at: None,
            completed_at: None,
        }
    }

    /// Moves the order forward to `status`, stamping the transition with `now`.
    ///
    /// Timestamps only ever go from unset to set, and an order cannot be
    /// completed before it has shipped.
    pub fn advance(&mut self, status: OrderStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
        match status {
            OrderStatus::Shipped => {
                if self.shipped_at.is_some() {
                    return Err(DomainError::InvalidInput(format!(
                        "order {} has already shipped",
                        self.order_id
                    )));
                }
                self.shipped_at = Some(now);
            }
            OrderStatus::Completed => {
                if self.completed_at.is_some() {
                    return Err(DomainError::InvalidInput(format!(
                        "order {} is already completed",
                        self.order_id
                    )));
                }
                if self.shipped_at.is_none() {
                    return Err(DomainError::InvalidInput(format!(
                        "order {} cannot complete before it ships",
                        self.order_id
                    )));
                }
                self.completed_at = Some(now);
            }
        }
        Ok(())
    }
}
