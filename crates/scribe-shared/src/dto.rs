//! Data Transfer Objects - form bodies and JSON responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `POST /login/`
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /signup/`
#[derive(Clone, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// `POST /new_post/` and `POST /edit_blog/{id}/`
#[derive(Debug, Clone, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// `POST /blog/{id}/` - a comment, a reaction, or both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailForm {
    pub content: Option<String>,
    pub reaction_type: Option<String>,
}

/// `POST /my_account/`
#[derive(Debug, Clone, Deserialize)]
pub struct AccountForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Query string of the home listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<String>,
}

impl ListQuery {
    /// Requested page; missing or non-numeric means the first page.
    pub fn page_number(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoteTallyResponse {
    pub upvotes: u64,
    pub downvotes: u64,
    /// Upvotes minus downvotes.
    pub score: i64,
}

/// `GET /blog/{id}/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub votes: VoteTallyResponse,
}

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPageResponse {
    pub posts: Vec<PostResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// A user's own account, as shown on `/my_account/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

/// One input of an HTML-less form description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FormField {
    pub fn text(name: &str, required: bool, max_length: usize) -> Self {
        Self {
            name: name.to_string(),
            kind: "text".to_string(),
            required,
            max_length: Some(max_length),
        }
    }

    pub fn password(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: "password".to_string(),
            required: true,
            max_length: None,
        }
    }
}

/// Answer to the `GET` side of a form route: where to post and what to send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormPage {
    pub action: String,
    pub fields: Vec<FormField>,
}

/// `GET /edit_blog/{id}/`: the post as stored plus the form to change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPostResponse {
    pub post: PostResponse,
    pub form: FormPage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_defaults_to_first() {
        let query = |page: Option<&str>| ListQuery {
            search: None,
            page: page.map(str::to_string),
        };

        assert_eq!(query(None).page_number(), 1);
        assert_eq!(query(Some("abc")).page_number(), 1);
        assert_eq!(query(Some("3")).page_number(), 3);
        assert_eq!(query(Some("0")).page_number(), 0);
    }

    #[test]
    fn test_empty_page_response_skips_search() {
        let page = PostPageResponse {
            posts: vec![],
            search: None,
            page: 1,
            page_size: 5,
            total: 0,
            total_pages: 0,
            has_next: false,
            has_previous: false,
        };

        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("search").is_none());
        assert_eq!(json["page_size"], 5);
    }
}
