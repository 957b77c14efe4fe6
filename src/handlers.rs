pub mod account;
pub mod activity;
pub mod auth;

use actix_web::web::{delete, get, post, put, scope, ServiceConfig};

use crate::middlewares::jwt::Jwt;

/// Mounts every endpoint. Scopes under `/dashboard`, `/settings` and
/// `/session` require a bearer token signed with `secret`.
pub fn routes(secret: Vec<u8>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.route("/signup", post().to(auth::signup))
            .route("/signin", post().to(auth::signin))
            .route("/signout", post().to(auth::signout))
            .service(
                scope("/session")
                    .wrap(Jwt::new(secret.clone()))
                    .route("", get().to(auth::session))
                    .route("/refresh", post().to(auth::refresh)),
            )
            .service(scope("/settings").wrap(Jwt::new(secret.clone())).route("/account", put().to(account::update)))
            .service(
                scope("/activities")
                    .route("", get().to(activity::list))
                    .route("/search", get().to(activity::search))
                    .route("/{id}", get().to(activity::detail)),
            )
            .service(
                scope("/dashboard")
                    .wrap(Jwt::new(secret))
                    .route("/activities", get().to(activity::mine))
                    .route("/activities", post().to(activity::create))
                    .route("/activities/{id}", put().to(activity::update))
                    .route("/activities/{id}", delete().to(activity::delete)),
            );
    }
}
