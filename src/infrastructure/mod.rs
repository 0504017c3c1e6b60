pub mod codec;
pub mod keys;
pub mod kv;
pub mod memory;
pub mod order_repo;
pub mod redis_store;
