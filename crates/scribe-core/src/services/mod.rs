//! Services - the operations the HTTP layer calls, composed from policy,
//! validation and the repository ports.

mod accounts;
mod comments;
mod listing;
mod posts;
mod reactions;

use std::sync::Arc;

use crate::ports::{PasswordService, Repositories};

pub use accounts::AccountService;
pub use comments::CommentService;
pub use listing::{PAGE_SIZE, PostListing, PostPage};
pub use posts::{PostDetail, PostService};
pub use reactions::ReactionEngine;

/// All services, wired to one set of repositories.
#[derive(Clone)]
pub struct BlogServices {
    pub accounts: AccountService,
    pub posts: PostService,
    pub comments: CommentService,
    pub reactions: ReactionEngine,
    pub listing: PostListing,
}

impl BlogServices {
    pub fn new(repos: Repositories, passwords: Arc<dyn PasswordService>) -> Self {
        let reactions = ReactionEngine::new(repos.posts.clone(), repos.reactions.clone());

        Self {
            accounts: AccountService::new(repos.users.clone(), passwords),
            posts: PostService::new(repos.posts.clone(), repos.comments.clone(), reactions.clone()),
            comments: CommentService::new(repos.posts.clone(), repos.comments.clone()),
            listing: PostListing::new(repos.posts),
            reactions,
        }
    }
}
