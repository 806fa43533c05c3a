use std::time::Duration;

use moka::sync::Cache;

/// Tracks, per invoking message, the id of the fallback message the bot
/// had to send when the invoking message could not be edited any more.
/// Later renders of the same invocation edit the fallback instead.
pub struct Replies(Cache<i64, i64>);

impl Replies {
    pub fn new() -> Self {
        Self(
            Cache::builder()
                .max_capacity(1000)
                .time_to_idle(Duration::from_secs(60 * 5))
                .build(),
        )
    }

    pub fn insert(&self, invoking_id: i64, reply_id: i64) {
        self.0.insert(invoking_id, reply_id);
    }

    pub fn get(&self, invoking_id: i64) -> Option<i64> {
        self.0.get(&invoking_id)
    }
}
