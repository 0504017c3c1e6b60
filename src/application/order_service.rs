use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{LineItem, Order, OrderStatus};
use crate::domain::pagination::{OrderPage, PageRequest};
use crate::domain::ports::OrderRepository;

const MAX_CREATE_ATTEMPTS: usize = 3;

/// Full-width random order id, folded from both halves of a v4 UUID.
pub fn next_order_id() -> u64 {
    let (hi, lo) = Uuid::new_v4().as_u64_pair();
    hi ^ lo
}

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an order stamped with the current time, drawing a fresh id
    /// if the first one happens to be taken.
    pub fn create_order(
        &self,
        customer_id: Uuid,
        line_items: Vec<LineItem>,
    ) -> Result<Order, DomainError> {
        let mut order = Order::new(next_order_id(), customer_id, line_items, Utc::now());
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            match self.repo.insert(&order) {
                Ok(()) => return Ok(order),
                Err(DomainError::Conflict) if attempt < MAX_CREATE_ATTEMPTS => {
                    log::warn!("Order id {} already taken, retrying", order.order_id);
                    order.order_id = next_order_id();
                }
                Err(e) => return Err(e),
            }
        }
        Err(DomainError::Conflict)
    }

    pub fn get_order(&self, id: u64) -> Result<Order, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(&self, page: PageRequest) -> Result<OrderPage, DomainError> {
        self.repo.find_all(page)
    }

    pub fn update_status(&self, id: u64, status: OrderStatus) -> Result<Order, DomainError> {
        let mut order = self.repo.find_by_id(id)?;
        order.advance(status, Utc::now())?;
        self.repo.update_by_id(&order)?;
        Ok(order)
    }

    pub fn delete_order(&self, id: u64) -> Result<(), DomainError> {
        self.repo.delete_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::domain::pagination::Cursor;
    use crate::infrastructure::memory::MemoryStore;
    use crate::infrastructure::order_repo::KvOrderRepository;

    fn service() -> OrderService<KvOrderRepository> {
        OrderService::new(KvOrderRepository::new(Arc::new(MemoryStore::new())))
    }

    fn items() -> Vec<LineItem> {
        vec![
            LineItem {
                item_id: Uuid::new_v4(),
                price: 100,
                quantity: 2,
            },
            LineItem {
                item_id: Uuid::new_v4(),
                price: 50,
                quantity: 1,
            },
        ]
    }

    #[test]
    fn ids_are_not_confined_to_32_bits() {
        let wide = (0..64).map(|_| next_order_id()).any(|id| id > u64::from(u32::MAX));
        assert!(wide);
    }

    #[test]
    fn create_then_get() {
        let svc = service();
        let customer_id = Uuid::new_v4();

        let created = svc.create_order(customer_id, items()).expect("create failed");
        let fetched = svc.get_order(created.order_id).expect("get failed");

        assert_eq!(fetched, created);
        assert_eq!(fetched.customer_id, customer_id);
        assert!(fetched.created_at.is_some());
        assert!(fetched.shipped_at.is_none());
    }

    #[test]
    fn ship_twice_is_rejected_and_leaves_order_untouched() {
        let svc = service();
        let created = svc.create_order(Uuid::new_v4(), items()).unwrap();

        let shipped = svc.update_status(created.order_id, OrderStatus::Shipped).unwrap();
        assert!(shipped.shipped_at.is_some());

        let err = svc
            .update_status(created.order_id, OrderStatus::Shipped)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(svc.get_order(created.order_id).unwrap(), shipped);
    }

    #[test]
    fn complete_requires_shipping_first() {
        let svc = service();
        let created = svc.create_order(Uuid::new_v4(), items()).unwrap();

        assert!(matches!(
            svc.update_status(created.order_id, OrderStatus::Completed),
            Err(DomainError::InvalidInput(_))
        ));

        svc.update_status(created.order_id, OrderStatus::Shipped).unwrap();
        let done = svc
            .update_status(created.order_id, OrderStatus::Completed)
            .unwrap();
        assert!(done.completed_at.is_some());
    }

    #[test]
    fn update_status_of_unknown_order_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.update_status(1, OrderStatus::Shipped),
            Err(DomainError::NotFound)
        ));
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let svc = service();
        let created = svc.create_order(Uuid::new_v4(), items()).unwrap();

        svc.delete_order(created.order_id).unwrap();

        assert!(matches!(svc.get_order(created.order_id), Err(DomainError::NotFound)));
        assert!(matches!(svc.delete_order(created.order_id), Err(DomainError::NotFound)));
    }

    #[test]
    fn list_returns_created_orders() {
        let svc = service();
        for _ in 0..3 {
            svc.create_order(Uuid::new_v4(), items()).unwrap();
        }
        let page = svc.list_orders(PageRequest::new(Cursor::START, Some(10))).unwrap();
        assert_eq!(page.orders.len(), 3);
        assert!(!page.has_more());
    }

    /// Reports `Conflict` for the first `conflicts` inserts.
    struct CollidingRepo {
        conflicts: usize,
        calls: AtomicUsize,
    }

    impl OrderRepository for CollidingRepo {
        fn insert(&self, _: &Order) -> Result<(), DomainError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.conflicts {
                Err(DomainError::Conflict)
            } else {
                Ok(())
            }
        }
        fn find_by_id(&self, _: u64) -> Result<Order, DomainError> {
            Err(DomainError::NotFound)
        }
        fn update_by_id(&self, _: &Order) -> Result<(), DomainError> {
            Err(DomainError::NotFound)
        }
        fn delete_by_id(&self, _: u64) -> Result<(), DomainError> {
            Err(DomainError::NotFound)
        }
        fn find_all(&self, _: PageRequest) -> Result<OrderPage, DomainError> {
            Ok(OrderPage::empty())
        }
    }

    #[test]
    fn create_retries_with_fresh_id_on_collision() {
        let svc = OrderService::new(CollidingRepo {
            conflicts: 2,
            calls: AtomicUsize::new(0),
        });
        assert!(svc.create_order(Uuid::new_v4(), vec![]).is_ok());
        assert_eq!(svc.repo.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn create_gives_up_after_bounded_attempts() {
        let svc = OrderService::new(CollidingRepo {
            conflicts: usize::MAX,
            calls: AtomicUsize::new(0),
        });
        assert!(matches!(
            svc.create_order(Uuid::new_v4(), vec![]),
            Err(DomainError::Conflict)
        ));
        assert_eq!(svc.repo.calls.load(Ordering::SeqCst), MAX_CREATE_ATTEMPTS);
    }
}
