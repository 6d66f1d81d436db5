use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;
use uuid::Uuid;

use scribe_core::domain::{Actor, Principal, User};
use scribe_core::ports::{
    AuthError, BaseRepository, CommentRepository, PasswordService, PostFilter, PostRepository,
};
use scribe_core::validation::PostInput;
use scribe_infra::{InMemoryStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::config::SessionConfig;
use crate::middleware::session::session_cookie;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::{AppState, Storage};

struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }

    fn verify_decoy(&self, _password: &str) {}
}

struct Blog {
    state: web::Data<AppState>,
    store: Arc<InMemoryStore>,
}

impl Blog {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "route-test-secret".to_string(),
            ..JwtConfig::default()
        }));
        let state = AppState::from_parts(
            store.repositories(),
            Arc::new(PlainPasswords),
            tokens,
            SessionConfig::default(),
            Storage::Memory,
        );

        Self {
            state: web::Data::new(state),
            store,
        }
    }

    /// A stored user (password "pw") and a session cookie for them.
    async fn user(&self, username: &str, is_staff: bool) -> (User, Cookie<'static>) {
        let user = User::new(username.to_string(), "plain$pw".to_string()).with_staff(is_staff);
        let user = self.store.repositories().users.insert(user).await.unwrap();
        let token = self.state.tokens.issue(&Principal::from(&user)).unwrap();
        let cookie = session_cookie(&self.state.session, token, 3600);
        (user, cookie)
    }

    async fn post(&self, author: &User, title: &str, content: &str) -> Uuid {
        self.state
            .services
            .posts
            .create_post(&Actor::from(author), PostInput::new(title, content))
            .await
            .unwrap()
            .applied()
            .unwrap()
            .id
    }

    async fn post_count(&self) -> u64 {
        self.store
            .repositories()
            .posts
            .count(&PostFilter::all())
            .await
            .unwrap()
    }

    async fn comment_count(&self, post_id: Uuid) -> u64 {
        self.store
            .repositories()
            .comments
            .count_by_post(post_id)
            .await
            .unwrap()
    }
}

macro_rules! app {
    ($blog:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data($blog.state.clone())
                .configure(configure_routes),
        )
        .await
    };
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[actix_web::test]
async fn test_health_reports_storage_and_request_id() {
    let blog = Blog::new();
    let app = app!(blog);

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((REQUEST_ID_HEADER, "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["request_id"], "abc-123");
}

// Sessions

#[actix_web::test]
async fn test_login_sets_session_and_redirects_home() {
    let blog = Blog::new();
    blog.user("testusername", false).await;
    let app = app!(blog);

    let req = test::TestRequest::post()
        .uri("/login/")
        .set_form([("username", "testusername"), ("password", "pw")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "scribe_session")
        .expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert!(!cookie.value().is_empty());
}

#[actix_web::test]
async fn test_login_with_bad_credentials_is_unauthorized() {
    let blog = Blog::new();
    blog.user("testusername", false).await;
    let app = app!(blog);

    for (username, password) in [("testusername", "wrong"), ("invalidusername", "invalidpassword")] {
        let req = test::TestRequest::post()
            .uri("/login/")
            .set_form([("username", username), ("password", password)])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.response().cookies().count(), 0);
    }
}

#[actix_web::test]
async fn test_logged_in_user_is_sent_home_from_login() {
    let blog = Blog::new();
    let (_, cookie) = blog.user("reader", false).await;
    let app = app!(blog);

    let anonymous = test::call_service(&app, test::TestRequest::get().uri("/login/").to_request()).await;
    assert_eq!(anonymous.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/login/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn test_bearer_header_is_accepted() {
    let blog = Blog::new();
    let (_, cookie) = blog.user("reader", false).await;
    let app = app!(blog);

    let req = test::TestRequest::get()
        .uri("/my_account/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", cookie.value())))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_forged_session_is_anonymous() {
    let blog = Blog::new();
    let app = app!(blog);

    let req = test::TestRequest::get()
        .uri("/my_account/")
        .cookie(Cookie::new("scribe_session", "not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login/");
}

#[actix_web::test]
async fn test_logout_clears_cookie() {
    let blog = Blog::new();
    let (_, cookie) = blog.user("reader", false).await;
    let app = app!(blog);

    let req = test::TestRequest::get().uri("/logout/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == "scribe_session")
        .expect("removal cookie");
    assert_eq!(cleared.value(), "");
}

// Accounts

#[actix_web::test]
async fn test_signup_redirects_to_login_and_rejects_taken_username() {
    let blog = Blog::new();
    let app = app!(blog);

    let form = [
        ("username", "newcomer"),
        ("password", "secret"),
        ("email", "new@example.com"),
    ];
    let req = test::TestRequest::post().uri("/signup/").set_form(form).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login/");

    let req = test::TestRequest::post().uri("/signup/").set_form(form).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "username");
}

#[actix_web::test]
async fn test_account_page() {
    let blog = Blog::new();
    let (_, cookie) = blog.user("reader", false).await;
    let app = app!(blog);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/my_account/").to_request()).await;
    assert_eq!(location(&resp), "/login/");

    let req = test::TestRequest::post()
        .uri("/my_account/")
        .cookie(cookie)
        .set_form([
            ("username", "reader2"),
            ("email", "r@example.com"),
            ("first_name", "Rea"),
            ("last_name", "Der"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().any(|c| c.name() == "scribe_session"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "reader2");
    assert_eq!(body["data"]["email"], "r@example.com");
}

// Posts

#[actix_web::test]
async fn test_new_post_requires_staff() {
    let blog = Blog::new();
    let (_, member) = blog.user("member", false).await;
    let (_, editor) = blog.user("editor", true).await;
    let app = app!(blog);
    let form = [("title", "test title"), ("content", "test content")];

    let req = test::TestRequest::get().uri("/new_post/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login/");

    let req = test::TestRequest::post()
        .uri("/new_post/")
        .cookie(member.clone())
        .set_form(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert_eq!(blog.post_count().await, 0);

    let req = test::TestRequest::get().uri("/new_post/").cookie(editor.clone()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/new_post/")
        .cookie(editor)
        .set_form(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert_eq!(blog.post_count().await, 1);
}

#[actix_web::test]
async fn test_new_post_validation_errors() {
    let blog = Blog::new();
    let (_, editor) = blog.user("editor", true).await;
    let app = app!(blog);
    let long_title = "t".repeat(101);

    let req = test::TestRequest::post()
        .uri("/new_post/")
        .cookie(editor)
        .set_form([("title", long_title.as_str()), ("content", "ok")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(blog.post_count().await, 0);
}

#[actix_web::test]
async fn test_home_search_and_paging() {
    let blog = Blog::new();
    let (editor, _) = blog.user("editor", true).await;
    blog.post(&editor, "blog test 1", "blog content item one").await;
    blog.post(&editor, "blog test 2", "blog content item two").await;
    blog.post(&editor, "blog test 3", "blog content item three").await;
    let app = app!(blog);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?search=one").to_request(),
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["posts"][0]["title"], "blog test 1");
    assert_eq!(body["search"], "one");

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/?page=2").to_request(),
    )
    .await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 3);
}

#[actix_web::test]
async fn test_unknown_or_malformed_post_id_is_not_found() {
    let blog = Blog::new();
    let app = app!(blog);

    let uri = format!("/blog/{}/", Uuid::new_v4());
    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/blog/42/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_edit_by_non_author_leaves_post_unchanged() {
    let blog = Blog::new();
    let (owner, owner_cookie) = blog.user("owner", true).await;
    let (_, other_cookie) = blog.user("other", true).await;
    let post_id = blog.post(&owner, "original", "content").await;
    let app = app!(blog);
    let uri = format!("/edit_blog/{post_id}/");

    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(other_cookie)
        .set_form([("title", "hijacked"), ("content", "content")])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "original");

    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(owner_cookie)
        .set_form([("title", "revised"), ("content", "content")])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "revised");

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_form([("title", "anon"), ("content", "content")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login/");
}

#[actix_web::test]
async fn test_edit_form_is_for_the_author_only() {
    let blog = Blog::new();
    let (owner, owner_cookie) = blog.user("owner", true).await;
    let (_, other_cookie) = blog.user("other", true).await;
    let post_id = blog.post(&owner, "original", "content").await;
    let app = app!(blog);
    let uri = format!("/edit_blog/{post_id}/");

    let req = test::TestRequest::get().uri(&uri).cookie(owner_cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["title"], "original");
    assert_eq!(body["form"]["action"], uri);

    let req = test::TestRequest::get().uri(&uri).cookie(other_cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/blog/{post_id}/"));

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(location(&resp), "/login/");
}

// Sessions follow the stored account

#[actix_web::test]
async fn test_session_uses_stored_staff_flag() {
    let blog = Blog::new();
    let (editor, editor_cookie) = blog.user("editor", true).await;
    let (member, member_cookie) = blog.user("member", false).await;
    let users = blog.store.repositories().users;

    users.update(editor.clone().with_staff(false)).await.unwrap();
    users.update(member.clone().with_staff(true)).await.unwrap();
    let app = app!(blog);
    let form = [("title", "test title"), ("content", "test content")];

    let req = test::TestRequest::post()
        .uri("/new_post/")
        .cookie(editor_cookie)
        .set_form(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(blog.post_count().await, 0);

    let req = test::TestRequest::post()
        .uri("/new_post/")
        .cookie(member_cookie)
        .set_form(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(blog.post_count().await, 1);
}

#[actix_web::test]
async fn test_deactivated_user_session_is_anonymous() {
    let blog = Blog::new();
    let (mut editor, cookie) = blog.user("editor", true).await;
    editor.is_active = false;
    blog.store.repositories().users.update(editor).await.unwrap();
    let app = app!(blog);

    let req = test::TestRequest::post()
        .uri("/new_post/")
        .cookie(cookie.clone())
        .set_form([("title", "test title"), ("content", "test content")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login/");
    assert_eq!(blog.post_count().await, 0);

    let req = test::TestRequest::get().uri("/my_account/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login/");
}

#[actix_web::test]
async fn test_deleted_user_session_cannot_comment_or_react() {
    let blog = Blog::new();
    let (owner, _) = blog.user("owner", true).await;
    let (gone, cookie) = blog.user("gone", false).await;
    let post_id = blog.post(&owner, "title", "content").await;
    blog.store.repositories().users.delete(gone.id).await.unwrap();
    let app = app!(blog);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{post_id}/"))
        .cookie(cookie)
        .set_form([("content", "still here?"), ("reaction_type", "upvote")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login/");
    assert_eq!(blog.comment_count(post_id).await, 0);
    assert_eq!(blog.store.reaction_rows().await, 0);
}

// Post detail: comments and reactions

#[actix_web::test]
async fn test_anonymous_detail_post_goes_to_login() {
    let blog = Blog::new();
    let (owner, _) = blog.user("owner", true).await;
    let post_id = blog.post(&owner, "title", "content").await;
    let app = app!(blog);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/{post_id}/"))
        .set_form([("content", "hello"), ("reaction_type", "upvote")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login/");
    assert_eq!(blog.comment_count(post_id).await, 0);
    assert_eq!(blog.store.reaction_rows().await, 0);
}

#[actix_web::test]
async fn test_reaction_last_kind_wins() {
    let blog = Blog::new();
    let (owner, _) = blog.user("owner", true).await;
    let (_, reader) = blog.user("reader", false).await;
    let post_id = blog.post(&owner, "title", "content").await;
    let app = app!(blog);
    let uri = format!("/blog/{post_id}/");

    for kind in ["upvote", "downvote"] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .cookie(reader.clone())
            .set_form([("reaction_type", kind)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), uri);
    }

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(body["votes"]["upvotes"], 0);
    assert_eq!(body["votes"]["downvotes"], 1);
    assert_eq!(body["votes"]["score"], -1);
    assert_eq!(blog.store.reaction_rows().await, 1);
}

#[actix_web::test]
async fn test_invalid_detail_submission_writes_nothing() {
    let blog = Blog::new();
    let (owner, _) = blog.user("owner", true).await;
    let (_, reader) = blog.user("reader", false).await;
    let post_id = blog.post(&owner, "title", "content").await;
    let app = app!(blog);
    let uri = format!("/blog/{post_id}/");

    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(reader.clone())
        .set_form([("content", "fine"), ("reaction_type", "sideways")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(reader.clone())
        .set_form([("reaction_type", " upvote ")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let long_comment = "c".repeat(1001);
    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(reader)
        .set_form([("content", long_comment.as_str()), ("reaction_type", "upvote")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(blog.comment_count(post_id).await, 0);
    assert_eq!(blog.store.reaction_rows().await, 0);
}

#[actix_web::test]
async fn test_comment_delete_only_by_author() {
    let blog = Blog::new();
    let (owner, _) = blog.user("owner", true).await;
    let (_, commenter) = blog.user("commenter", false).await;
    let (_, stranger) = blog.user("stranger", false).await;
    let post_id = blog.post(&owner, "title", "content").await;
    let app = app!(blog);
    let uri = format!("/blog/{post_id}/");

    let req = test::TestRequest::post()
        .uri(&uri)
        .cookie(commenter.clone())
        .set_form([("content", "test content")])
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(blog.comment_count(post_id).await, 1);

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let comment_id = body["comments"][0]["id"].as_str().unwrap().to_string();
    let delete_uri = format!("/del_comment/{post_id}/{comment_id}/");

    let req = test::TestRequest::get().uri(&delete_uri).cookie(stranger).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), uri);
    assert_eq!(blog.comment_count(post_id).await, 1);

    let req = test::TestRequest::get().uri(&delete_uri).cookie(commenter).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), uri);
    assert_eq!(blog.comment_count(post_id).await, 0);
}
