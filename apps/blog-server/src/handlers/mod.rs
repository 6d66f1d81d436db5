//! HTTP handlers and route configuration.

mod accounts;
mod comments;
mod health;
mod posts;
mod views;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, http::header, web};

use scribe_core::policy::Denial;

pub const LOGIN_PATH: &str = "/login/";
pub const HOME_PATH: &str = "/";

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route(HOME_PATH, web::get().to(posts::home))
        .service(
            web::resource(LOGIN_PATH)
                .route(web::get().to(accounts::login_form))
                .route(web::post().to(accounts::login)),
        )
        .route("/logout/", web::get().to(accounts::logout))
        .service(
            web::resource("/signup/")
                .route(web::get().to(accounts::signup_form))
                .route(web::post().to(accounts::signup)),
        )
        .service(
            web::resource("/my_account/")
                .route(web::get().to(accounts::my_account))
                .route(web::post().to(accounts::update_account)),
        )
        .service(
            web::resource("/new_post/")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource("/blog/{post_id}/")
                .route(web::get().to(posts::blog_detail))
                .route(web::post().to(posts::blog_detail_submit)),
        )
        .service(
            web::resource("/edit_blog/{post_id}/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::edit_blog)),
        )
        .route(
            "/del_comment/{post_id}/{comment_id}/",
            web::get().to(comments::del_comment),
        );
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Where a denied request goes: the login page when nobody is signed in,
/// `fallback` otherwise.
pub(crate) fn redirect_denied(denial: Denial, fallback: &str) -> HttpResponse {
    match denial {
        Denial::LoginRequired => see_other(LOGIN_PATH),
        Denial::NotPermitted => see_other(fallback),
    }
}

pub(crate) fn post_path(post_id: uuid::Uuid) -> String {
    format!("/blog/{post_id}/")
}
