//! In-memory implementations of the store ports.

mod store;

use std::sync::Arc;

use scribe_core::ports::Repositories;

pub use store::InMemoryStore;

impl InMemoryStore {
    /// Repositories that all share this store.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            posts: self.clone(),
            comments: self.clone(),
            reactions: self.clone(),
        }
    }
}
