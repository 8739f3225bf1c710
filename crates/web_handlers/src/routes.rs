use actix_web::web;
use auth_services::middleware::AuthMiddleware;

use crate::*;

/// Registers the `/api` routes.
///
/// Expects a `web::Data<dyn EntityStore>` in the app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/campgrounds")
                    .service(
                        web::resource("")
                            .wrap(AuthMiddleware)
                            .route(web::post().to(create_campground)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(get_campground)))
                    .service(
                        web::resource("/{id}/comments")
                            .wrap(AuthMiddleware)
                            .route(web::post().to(add_comment)),
                    )
                    .service(
                        web::resource("/{id}/reviews")
                            .wrap(AuthMiddleware)
                            .route(web::post().to(add_review)),
                    ),
            )
            .service(web::resource("/users/{id}").route(web::get().to(get_user_profile)))
            .service(
                web::resource("/follow/{id}")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(follow_user)),
            )
            // Protected routes (require authentication)
            .service(
                web::scope("/notifications")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(list_notifications))
                    // before /{id} so "unread" is not parsed as an id
                    .route("/unread", web::get().to(list_unread_notifications))
                    .route("/{id}", web::get().to(open_notification)),
            ),
    );
}
