use super::errors::DomainError;
use super::order::Order;
use super::pagination::{OrderPage, PageRequest};

pub trait OrderRepository: Send + Sync + 'static {
    /// Stores a new order; fails with `Conflict` if the id is taken.
    fn insert(&self, order: &Order) -> Result<(), DomainError>;
    fn find_by_id(&self, id: u64) -> Result<Order, DomainError>;
    /// Overwrites an existing order; fails with `NotFound` rather than creating one.
    fn update_by_id(&self, order: &Order) -> Result<(), DomainError>;
    fn delete_by_id(&self, id: u64) -> Result<(), DomainError>;
    fn find_all(&self, page: PageRequest) -> Result<OrderPage, DomainError>;
}
