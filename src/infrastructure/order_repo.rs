use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::pagination::{Cursor, OrderPage, PageRequest};
use crate::domain::ports::OrderRepository;

use super::codec;
use super::keys::{order_key, ORDER_INDEX};
use super::kv::KeyValueStore;

// ── Repository ────────────────────────────────────────────────────────────────

/// Orders stored as JSON values under `order:<id>`, with every live key
/// tracked in the `orders` set.
///
/// The index set is only ever written through the store's atomic compound
/// operations, so a record and its index entry appear and disappear together.
pub struct KvOrderRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvOrderRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl OrderRepository for KvOrderRepository {
    fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let data = codec::encode(order)?;
        let key = order_key(order.order_id);

        if self.store.insert_indexed(ORDER_INDEX, &key, &data)? {
            Ok(())
        } else {
            Err(DomainError::Conflict)
        }
    }

    fn find_by_id(&self, id: u64) -> Result<Order, DomainError> {
        let value = self.store.get(&order_key(id))?;
        let Some(bytes) = value else {
            return Err(DomainError::NotFound);
        };
        Ok(codec::decode(&bytes)?)
    }

    fn update_by_id(&self, order: &Order) -> Result<(), DomainError> {
        let data = codec::encode(order)?;
        let key = order_key(order.order_id);

        if self.store.set_if_present(&key, &data)? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    fn delete_by_id(&self, id: u64) -> Result<(), DomainError> {
        if self.store.delete_indexed(ORDER_INDEX, &order_key(id))? {
            Ok(())
        } else {
            Err(DomainError::NotFound)
        }
    }

    fn find_all(&self, page: PageRequest) -> Result<OrderPage, DomainError> {
        // A backend may return an empty batch mid-scan; keep going so that a
        // zero cursor alongside no orders always means the listing is done.
        let mut cursor = page.offset.position();
        let keys = loop {
            let scan = self.store.scan_set(ORDER_INDEX, cursor, page.size)?;
            cursor = scan.cursor;
            if !scan.members.is_empty() || cursor == 0 {
                break scan.members;
            }
        };

        if keys.is_empty() {
            return Ok(OrderPage::empty());
        }

        let values = self.store.mget(&keys)?;
        let mut orders = Vec::with_capacity(values.len());
        for (key, value) in keys.iter().zip(values) {
            match value {
                Some(bytes) => orders.push(codec::decode(&bytes)?),
                None => log::debug!("Skipping {}: removed after the index scan", key),
            }
        }

        Ok(OrderPage {
            orders,
            cursor: Cursor::new(cursor),
        })
    }
}
