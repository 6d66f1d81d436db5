use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::policy::Outcome;

use super::{post_path, see_other};
use crate::middleware::error::AppResult;
use crate::middleware::session::CurrentActor;
use crate::state::AppState;

/// GET /del_comment/{post_id}/{comment_id}/
///
/// Always lands back on the post, whether or not anything was deleted.
pub async fn del_comment(
    state: web::Data<AppState>,
    current: CurrentActor,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let outcome = state
        .services
        .comments
        .delete_comment(current.actor(), post_id, comment_id)
        .await?;

    match outcome {
        Outcome::Applied(true) => {}
        Outcome::Applied(false) => {
            tracing::debug!(post_id = %post_id, comment_id = %comment_id, "No such comment on post");
        }
        Outcome::Denied(denial) => {
            tracing::info!(comment_id = %comment_id, ?denial, "Comment deletion denied");
        }
    }

    Ok(see_other(&post_path(post_id)))
}
