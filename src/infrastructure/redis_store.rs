use redis::Script;

use crate::db::RedisPool;

use super::kv::{KeyValueStore, KvError, SetScan};

// Both scripts validate before their first write: Redis does not roll back
// a script that fails halfway through.
const INSERT_INDEXED: &str = r"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
local kind = redis.call('TYPE', KEYS[2]).ok
if kind ~= 'none' and kind ~= 'set' then
  return redis.error_reply('index key does not hold a set')
end
redis.call('SET', KEYS[1], ARGV[1])
redis.call('SADD', KEYS[2], KEYS[1])
return 1
";

const DELETE_INDEXED: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return 0
end
local kind = redis.call('TYPE', KEYS[2]).ok
if kind ~= 'none' and kind ~= 'set' then
  return redis.error_reply('index key does not hold a set')
end
redis.call('DEL', KEYS[1])
redis.call('SREM', KEYS[2], KEYS[1])
return 1
";

pub struct RedisStore {
    pool: RedisPool,
    insert_indexed: Script,
    delete_indexed: Script,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            insert_indexed: Script::new(INSERT_INDEXED),
            delete_indexed: Script::new(DELETE_INDEXED),
        }
    }
}

impl KeyValueStore for RedisStore {
    fn ping(&self) -> Result<(), KvError> {
        let mut conn = self.pool.get()?;
        redis::cmd("PING").query::<String>(&mut *conn)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let mut conn = self.pool.get()?;
        Ok(redis::cmd("GET").arg(key).query(&mut *conn)?)
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>, KvError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get()?;
        Ok(redis::cmd("MGET").arg(keys).query(&mut *conn)?)
    }

    fn set_if_present(&self, key: &str, value: &[u8]) -> Result<bool, KvError> {
        let mut conn = self.pool.get()?;
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("XX")
            .query(&mut *conn)?;
        Ok(reply.is_some())
    }

    fn insert_indexed(&self, set: &str, key: &str, value: &[u8]) -> Result<bool, KvError> {
        let mut conn = self.pool.get()?;
        let applied: i64 = self
            .insert_indexed
            .key(key)
            .key(set)
            .arg(value)
            .invoke(&mut *conn)?;
        Ok(applied == 1)
    }

    fn delete_indexed(&self, set: &str, key: &str) -> Result<bool, KvError> {
        let mut conn = self.pool.get()?;
        let applied: i64 = self.delete_indexed.key(key).key(set).invoke(&mut *conn)?;
        Ok(applied == 1)
    }

    fn scan_set(&self, set: &str, cursor: u64, count: u64) -> Result<SetScan, KvError> {
        let mut conn = self.pool.get()?;
        let (cursor, members): (u64, Vec<String>) = redis::cmd("SSCAN")
            .arg(set)
            .arg(cursor)
            .arg("COUNT")
            .arg(count)
            .query(&mut *conn)?;
        Ok(SetScan { cursor, members })
    }

    fn set_members(&self, set: &str) -> Result<Vec<String>, KvError> {
        let mut conn = self.pool.get()?;
        Ok(redis::cmd("SMEMBERS").arg(set).query(&mut *conn)?)
    }
}
