use std::time::Duration;

use r2d2::{CustomizeConnection, Pool};
use redis::{Client, Connection, RedisError};

use crate::infrastructure::kv::KvError;

pub type RedisPool = Pool<Client>;

/// Applies read/write timeouts to every connection handed out by the pool.
#[derive(Debug)]
struct SocketTimeouts(Duration);

impl CustomizeConnection<Connection, RedisError> for SocketTimeouts {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), RedisError> {
        conn.set_read_timeout(Some(self.0))?;
        conn.set_write_timeout(Some(self.0))
    }
}

pub fn create_pool(
    redis_url: &str,
    max_size: u32,
    timeout: Duration,
) -> Result<RedisPool, KvError> {
    let client = Client::open(redis_url)?;
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(timeout)
        .connection_customizer(Box::new(SocketTimeouts(timeout)))
        .build(client)?;
    Ok(pool)
}
