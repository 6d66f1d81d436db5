//! Home listing, post creation, post detail and editing.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::ReactionKind;
use scribe_core::policy::{self, Denial, Outcome};
use scribe_core::validation::{CommentInput, PostInput};
use scribe_shared::dto::{DetailForm, ListQuery, PostForm};

use super::{HOME_PATH, post_path, redirect_denied, see_other, views};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::CurrentActor;
use crate::state::AppState;

/// GET /?search=&page=
pub async fn home(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let search = query.search.as_deref();
    let page = state
        .services
        .listing
        .list_posts(search, query.page_number())
        .await?;

    Ok(HttpResponse::Ok().json(views::page(&page, search)))
}

/// GET /new_post/
pub async fn new_post_form(current: CurrentActor) -> HttpResponse {
    let actor = current.actor();
    match Outcome::check(actor, policy::can_create_post(actor)) {
        Outcome::Applied(()) => HttpResponse::Ok().json(views::post_form("/new_post/")),
        Outcome::Denied(denial) => redirect_denied(denial, HOME_PATH),
    }
}

/// POST /new_post/
pub async fn create_post(
    state: web::Data<AppState>,
    current: CurrentActor,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let input = PostInput::new(form.title, form.content);

    match state.services.posts.create_post(current.actor(), input).await? {
        Outcome::Applied(_) => Ok(see_other(HOME_PATH)),
        Outcome::Denied(denial) => Ok(redirect_denied(denial, HOME_PATH)),
    }
}

/// GET /blog/{post_id}/
pub async fn blog_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state.services.posts.post_detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::detail(&detail)))
}

/// POST /blog/{post_id}/ with `content`, `reaction_type`, or both.
///
/// Both fields are checked before either is written.
pub async fn blog_detail_submit(
    state: web::Data<AppState>,
    current: CurrentActor,
    path: web::Path<Uuid>,
    form: web::Form<DetailForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let actor = current.actor();
    let services = &state.services;

    services.posts.get_post(post_id).await?;
    if !actor.is_authenticated() {
        return Ok(redirect_denied(Denial::LoginRequired, HOME_PATH));
    }

    let DetailForm {
        content,
        reaction_type,
    } = form.into_inner();

    let reaction = reaction_type
        .as_deref()
        .filter(|kind| !kind.is_empty())
        .map(str::parse::<ReactionKind>)
        .transpose()?;

    let comment = content
        .filter(|text| !text.trim().is_empty())
        .map(CommentInput::new);
    if let Some(input) = &comment {
        input.validate().map_err(AppError::Validation)?;
    }

    let back = post_path(post_id);

    if let Some(input) = comment {
        if let Outcome::Denied(denial) = services.comments.add_comment(actor, post_id, input).await? {
            return Ok(redirect_denied(denial, &back));
        }
    }

    if let Some(kind) = reaction {
        if let Outcome::Denied(denial) = services.reactions.apply_reaction(actor, post_id, kind).await? {
            return Ok(redirect_denied(denial, &back));
        }
    }

    Ok(see_other(&back))
}

/// GET /edit_blog/{post_id}/
///
/// Only the author gets the form; anyone else is sent to the post.
pub async fn edit_form(
    state: web::Data<AppState>,
    current: CurrentActor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let actor = current.actor();
    if !actor.is_authenticated() {
        return Ok(redirect_denied(Denial::LoginRequired, HOME_PATH));
    }

    let post = state.services.posts.get_post(path.into_inner()).await?;
    match Outcome::check(actor, policy::can_edit_post(actor, &post)) {
        Outcome::Applied(()) => Ok(HttpResponse::Ok().json(views::edit_page(&post))),
        Outcome::Denied(denial) => Ok(redirect_denied(denial, &post_path(post.id))),
    }
}

/// POST /edit_blog/{post_id}/
///
/// Someone other than the author gets the post back unchanged.
pub async fn edit_blog(
    state: web::Data<AppState>,
    current: CurrentActor,
    path: web::Path<Uuid>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let actor = current.actor();
    if !actor.is_authenticated() {
        return Ok(redirect_denied(Denial::LoginRequired, HOME_PATH));
    }

    let form = form.into_inner();
    let input = PostInput::new(form.title, form.content);

    let post = match state.services.posts.edit_post(actor, post_id, input).await? {
        Outcome::Applied(post) => post,
        Outcome::Denied(Denial::LoginRequired) => {
            return Ok(redirect_denied(Denial::LoginRequired, HOME_PATH));
        }
        Outcome::Denied(Denial::NotPermitted) => {
            tracing::info!(post_id = %post_id, "Edit by non-author ignored");
            state.services.posts.get_post(post_id).await?
        }
    };

    Ok(HttpResponse::Ok().json(views::post(&post)))
}
