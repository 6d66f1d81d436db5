use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog article written by a staff user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace title and content, refreshing `updated_at`.
    pub fn revise(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
        self.updated_at = Utc::now();
    }

    /// Substring match on title or content, case-sensitive.
    pub fn matches(&self, query: &str) -> bool {
        self.title.contains(query) || self.content.contains(query)
    }
}
