use std::env;
use std::io;
use std::io::ErrorKind;

use redis::{AsyncCommands, IntoConnectionInfo};

pub const URL_ENV: &str = "SCRIBED_REDIS_URL";
pub const TOKEN_ENV: &str = "SCRIBED_REDIS_TOKEN";

/// The handful of key-value primitives the view counter needs. The store's
/// INCR is the only atomicity guarantee in the whole counter path.
#[allow(async_fn_in_trait)]
pub trait ViewStore {
    async fn incr(&self, key: &str) -> io::Result<u64>;
    async fn get(&self, key: &str) -> io::Result<Option<u64>>;
    async fn get_matching(&self, pattern: &str) -> io::Result<Vec<(String, u64)>>;
}

pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn connect(url: &str, token: Option<&str>) -> io::Result<Self> {
        let mut info = url.into_connection_info().map_err(redis_to_io)?;
        if let Some(token) = token {
            info.redis.password = Some(token.to_string());
        }

        let client = redis::Client::open(info).map_err(redis_to_io)?;
        Ok(RedisStore { client })
    }

    /// Store location comes from the environment. A missing URL is a
    /// configuration error at startup, never a per-request failure.
    pub fn from_env() -> io::Result<Self> {
        let url = match env::var(URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                return Err(io::Error::new(
                    ErrorKind::NotFound,
                    format!("{} is not set", URL_ENV),
                ));
            }
        };

        let token = env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
        Self::connect(&url, token.as_deref())
    }
}

impl ViewStore for RedisStore {
    async fn incr(&self, key: &str) -> io::Result<u64> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(redis_to_io)?;
        conn.incr(key, 1i64).await.map_err(redis_to_io)
    }

    async fn get(&self, key: &str) -> io::Result<Option<u64>> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(redis_to_io)?;
        conn.get(key).await.map_err(redis_to_io)
    }

    async fn get_matching(&self, pattern: &str) -> io::Result<Vec<(String, u64)>> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(redis_to_io)?;

        let keys: Vec<String> = conn.keys(pattern).await.map_err(redis_to_io)?;
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let values: Vec<Option<u64>> = conn.mget(&keys).await.map_err(redis_to_io)?;
        let pairs = keys
            .into_iter()
            .zip(values)
            .map(|(key, value)| (key, value.unwrap_or(0)))
            .collect();

        Ok(pairs)
    }
}

fn redis_to_io(e: redis::RedisError) -> io::Error {
    io::Error::new(ErrorKind::Other, format!("View store error: {}", e))
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::io;
    use std::io::ErrorKind;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    use super::ViewStore;

    /// In-memory stand-in with the same atomicity contract as the real
    /// store. Counts reads so memoization behavior can be asserted.
    #[derive(Default)]
    pub struct MemoryStore {
        map: Mutex<HashMap<String, u64>>,
        pub get_calls: AtomicU64,
        pub unreachable: AtomicBool,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Default::default()
        }

        pub fn set_unreachable(&self, unreachable: bool) {
            self.unreachable.store(unreachable, Ordering::SeqCst);
        }

        fn check_reachable(&self) -> io::Result<()> {
            if self.unreachable.load(Ordering::SeqCst) {
                return Err(io::Error::new(ErrorKind::Other, "View store error: store unreachable"));
            }
            Ok(())
        }
    }

    impl ViewStore for MemoryStore {
        async fn incr(&self, key: &str) -> io::Result<u64> {
            self.check_reachable()?;
            let mut map = self.map.lock().unwrap();
            let counter = map.entry(key.to_string()).or_insert(0);
            *counter += 1;
            Ok(*counter)
        }

        async fn get(&self, key: &str) -> io::Result<Option<u64>> {
            self.check_reachable()?;
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            let map = self.map.lock().unwrap();
            Ok(map.get(key).copied())
        }

        async fn get_matching(&self, pattern: &str) -> io::Result<Vec<(String, u64)>> {
            self.check_reachable()?;
            let prefix = pattern.trim_end_matches('*');
            let map = self.map.lock().unwrap();
            let mut pairs: Vec<(String, u64)> = map
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, value)| (key.clone(), *value))
                .collect();
            pairs.sort();
            Ok(pairs)
        }
    }
}
