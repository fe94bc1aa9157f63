use std::collections::HashMap;
use std::sync::Mutex;

use crate::views::store::ViewStore;
use crate::views::ViewCounter;

/// Memoizes view-count reads for the lifetime of a single logical request.
/// Best-effort only: the memo is dropped with the request, so it never
/// becomes a stale mirror of the store.
pub struct ViewMemo<'a, S> {
    counter: &'a ViewCounter<S>,
    seen: Mutex<HashMap<String, u64>>,
}

impl<'a, S: ViewStore> ViewMemo<'a, S> {
    pub fn for_request(counter: &'a ViewCounter<S>) -> Self {
        ViewMemo {
            counter,
            seen: Mutex::new(HashMap::new()),
        }
    }

    pub async fn views(&self, slug: &str) -> u64 {
        if let Some(views) = self.seen.lock().unwrap().get(slug) {
            return *views;
        }

        let views = self.counter.get(slug).await;
        self.seen.lock().unwrap().insert(slug.to_string(), views);
        views
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use crate::views::store::testing::MemoryStore;
    use crate::views::DEFAULT_KEY_PREFIX;

    use super::*;

    #[tokio::test]
    async fn test_store_is_consulted_once_per_slug() {
        let counter = ViewCounter::new(MemoryStore::new(), DEFAULT_KEY_PREFIX);
        counter.incr("my-post").await.unwrap();

        let memo = ViewMemo::for_request(&counter);
        assert_eq!(memo.views("my-post").await, 1);
        assert_eq!(memo.views("my-post").await, 1);
        assert_eq!(memo.views("other-post").await, 0);
        assert_eq!(memo.views("other-post").await, 0);

        let store = &counter.store;
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fresh_memo_sees_new_counts() {
        let counter = ViewCounter::new(MemoryStore::new(), DEFAULT_KEY_PREFIX);

        let memo = ViewMemo::for_request(&counter);
        assert_eq!(memo.views("my-post").await, 0);

        counter.incr("my-post").await.unwrap();

        // The old memo keeps its snapshot; the next request sees the write
        assert_eq!(memo.views("my-post").await, 0);
        let next_request = ViewMemo::for_request(&counter);
        assert_eq!(next_request.views("my-post").await, 1);
    }
}
