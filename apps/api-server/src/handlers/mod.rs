//! HTTP handlers and route configuration.

mod accounts;
mod blogs;
mod comments;
mod dashboard;
mod health;
mod mappers;


use actix_web::web;

use crate::middleware::error::{json_error_handler, path_error_handler, query_error_handler};
#[cfg(feature = "rate-limit")]
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(auth_scope())
                .service(blog_scope())
                .route("/dashboard/stats", web::get().to(dashboard::stats)),
        );
}

fn auth_scope() -> actix_web::Scope {
    let register = web::resource("/register").route(web::post().to(accounts::register));
    let login = web::resource("/login").route(web::post().to(accounts::login));

    #[cfg(feature = "rate-limit")]
    let (register, login) = (
        register.wrap(RateLimitMiddleware),
        login.wrap(RateLimitMiddleware),
    );

    web::scope("/auth")
        .service(register)
        .service(login)
        .route("/me", web::get().to(accounts::me))
}

/// Literal segments are registered before `{id}` so they are not parsed as ids.
fn blog_scope() -> actix_web::Scope {
    web::scope("/blogs")
        .route("", web::get().to(blogs::list))
        .route("", web::post().to(blogs::create))
        .route("/search", web::get().to(blogs::list))
        .route("/categories", web::get().to(blogs::categories))
        .route("/{id}", web::get().to(blogs::get))
        .route("/{id}", web::put().to(blogs::update))
        .route("/{id}", web::delete().to(blogs::delete))
        .route("/{id}/similar", web::get().to(blogs::similar))
        .route("/{blog_id}/comments", web::post().to(comments::add))
        .route(
            "/{blog_id}/comments/{comment_id}",
            web::delete().to(comments::delete),
        )
        .route("/{blog_id}/like", web::post().to(comments::toggle_like))
}
