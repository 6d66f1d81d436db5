//! Domain values rendered as response DTOs.

use scribe_core::domain::{Comment, Post, User, VoteTally};
use scribe_core::services::{PostDetail, PostPage};
use scribe_core::validation::{CONTENT_MAX_CHARS, TITLE_MAX_CHARS};
use scribe_shared::dto::{
    CommentResponse, EditPostResponse, FormField, FormPage, PostDetailResponse, PostPageResponse, PostResponse,
    UserResponse, VoteTallyResponse,
};

pub fn post(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        title: post.title.clone(),
        content: post.content.clone(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn comment(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        author_id: comment.author_id,
        content: comment.content.clone(),
        created_at: comment.created_at,
    }
}

fn votes(tally: VoteTally) -> VoteTallyResponse {
    VoteTallyResponse {
        upvotes: tally.upvotes,
        downvotes: tally.downvotes,
        score: tally.score(),
    }
}

pub fn detail(detail: &PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(&detail.post),
        comments: detail.comments.iter().map(comment).collect(),
        votes: votes(detail.votes),
    }
}

pub fn page(page: &PostPage, search: Option<&str>) -> PostPageResponse {
    PostPageResponse {
        posts: page.posts.iter().map(post).collect(),
        search: search.map(str::to_string),
        page: page.page,
        page_size: page.page_size,
        total: page.total,
        total_pages: page.total_pages,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    }
}

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_staff: user.is_staff,
        created_at: user.created_at,
    }
}

pub fn edit_page(post: &Post) -> EditPostResponse {
    EditPostResponse {
        post: self::post(post),
        form: post_form(&format!("/edit_blog/{}/", post.id)),
    }
}

pub fn post_form(action: &str) -> FormPage {
    FormPage {
        action: action.to_string(),
        fields: vec![
            FormField::text("title", true, TITLE_MAX_CHARS),
            FormField::text("content", true, CONTENT_MAX_CHARS),
        ],
    }
}
