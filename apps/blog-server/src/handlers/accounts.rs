//! Login, logout, signup and the account page.

use actix_web::{HttpResponse, web};

use scribe_core::domain::{Principal, User};
use scribe_core::policy::Outcome;
use scribe_core::validation::{
    EMAIL_MAX_CHARS, NAME_MAX_CHARS, ProfileInput, SignupInput, USERNAME_MAX_CHARS,
};
use scribe_shared::ApiResponse;
use scribe_shared::dto::{AccountForm, FormField, FormPage, LoginRequest, SignupRequest};

use super::{HOME_PATH, LOGIN_PATH, redirect_denied, see_other, views};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::{CurrentActor, removal_cookie, session_cookie};
use crate::state::AppState;

/// GET /login/
pub async fn login_form(current: CurrentActor) -> HttpResponse {
    if current.actor().is_authenticated() {
        return see_other(HOME_PATH);
    }

    HttpResponse::Ok().json(FormPage {
        action: LOGIN_PATH.to_string(),
        fields: vec![
            FormField::text("username", true, USERNAME_MAX_CHARS),
            FormField::password("password"),
        ],
    })
}

/// POST /login/
pub async fn login(
    state: web::Data<AppState>,
    current: CurrentActor,
    form: web::Form<LoginRequest>,
) -> AppResult<HttpResponse> {
    if current.actor().is_authenticated() {
        return Ok(see_other(HOME_PATH));
    }

    let LoginRequest { username, password } = form.into_inner();
    let Some(user) = state
        .services
        .accounts
        .authenticate(&username, &password)
        .await?
    else {
        tracing::info!(username = %username, "Login rejected");
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };

    start_session(&state, &user, see_other(HOME_PATH))
}

/// GET /logout/
pub async fn logout(state: web::Data<AppState>, current: CurrentActor) -> HttpResponse {
    if let Some(principal) = current.actor().principal() {
        tracing::info!(user_id = %principal.id, "User logged out");
    }

    let mut response = see_other(HOME_PATH);
    if let Err(e) = response.add_cookie(&removal_cookie(&state.session)) {
        tracing::warn!(error = %e, "Failed to clear session cookie");
    }
    response
}

/// GET /signup/
pub async fn signup_form() -> HttpResponse {
    HttpResponse::Ok().json(FormPage {
        action: "/signup/".to_string(),
        fields: vec![
            FormField::text("username", true, USERNAME_MAX_CHARS),
            FormField::password("password"),
            FormField::text("email", false, EMAIL_MAX_CHARS),
            FormField::text("first_name", false, NAME_MAX_CHARS),
            FormField::text("last_name", false, NAME_MAX_CHARS),
        ],
    })
}

/// POST /signup/
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupRequest>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let input = SignupInput::new(form.username, form.password)
        .with_email(form.email)
        .with_name(form.first_name, form.last_name);

    state.services.accounts.register(input).await?;

    Ok(see_other(LOGIN_PATH))
}

/// GET /my_account/
pub async fn my_account(
    state: web::Data<AppState>,
    current: CurrentActor,
) -> AppResult<HttpResponse> {
    match state.services.accounts.profile(current.actor()).await? {
        Outcome::Applied(user) => Ok(HttpResponse::Ok().json(views::user(&user))),
        Outcome::Denied(denial) => Ok(redirect_denied(denial, HOME_PATH)),
    }
}

/// POST /my_account/
///
/// The session is reissued so it carries the possibly changed username.
pub async fn update_account(
    state: web::Data<AppState>,
    current: CurrentActor,
    form: web::Form<AccountForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let input = ProfileInput::new(form.username, form.email, form.first_name, form.last_name);

    match state
        .services
        .accounts
        .update_profile(current.actor(), input)
        .await?
    {
        Outcome::Applied(user) => {
            let response = HttpResponse::Ok()
                .json(ApiResponse::ok_with_message(views::user(&user), "Account updated"));
            start_session(&state, &user, response)
        }
        Outcome::Denied(denial) => Ok(redirect_denied(denial, HOME_PATH)),
    }
}

fn start_session(
    state: &AppState,
    user: &User,
    mut response: HttpResponse,
) -> AppResult<HttpResponse> {
    let token = state.tokens.issue(&Principal::from(user))?;
    let cookie = session_cookie(&state.session, token, state.tokens.ttl_seconds());

    response
        .add_cookie(&cookie)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::debug!(user_id = %user.id, "Session started");
    Ok(response)
}
