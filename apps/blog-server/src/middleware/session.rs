//! Session cookie handling and the current-actor extractor.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Future, ready};
use std::pin::Pin;

use scribe_core::domain::Actor;

use crate::config::SessionConfig;
use crate::state::AppState;

/// Who is making the request. Never fails: a missing, expired or forged
/// session yields [`Actor::Anonymous`], and so does a session whose account
/// has since been deleted or deactivated.
///
/// The token is read from the session cookie, or from an
/// `Authorization: Bearer` header for non-browser clients. The token only
/// names the user; staff status is taken from the stored account.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl CurrentActor {
    pub fn actor(&self) -> &Actor {
        &self.0
    }
}

impl FromRequest for CurrentActor {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            tracing::error!("AppState not found in app data");
            return Box::pin(ready(Ok(CurrentActor(Actor::Anonymous))));
        };

        let user_id = session_token(req, &state.session).and_then(|token| {
            state
                .tokens
                .validate(&token)
                .map(|claims| claims.user_id)
                .inspect_err(|e| tracing::debug!(error = %e, "Ignoring invalid session token"))
                .ok()
        });

        Box::pin(async move {
            let Some(user_id) = user_id else {
                return Ok(CurrentActor(Actor::Anonymous));
            };

            let actor = match state.services.accounts.resolve_actor(user_id).await {
                Ok(actor) => actor,
                Err(e) => {
                    tracing::error!(error = %e, user_id = %user_id, "Session lookup failed");
                    Actor::Anonymous
                }
            };

            Ok(CurrentActor(actor))
        })
    }
}

fn session_token(req: &HttpRequest, config: &SessionConfig) -> Option<String> {
    if let Some(cookie) = req.cookie(&config.cookie_name) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(config: &SessionConfig, token: String, ttl_seconds: i64) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(ttl_seconds))
        .finish()
}

/// Cookie that makes the browser drop the session.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}
