use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use auth_services::middleware::AuthenticatedUser;
use entity_store::EntityStore;
use user_services::*;

use crate::redirect::see_other;

/// Gets a user's public profile with the campgrounds they authored
pub async fn get_user_profile(
    store: web::Data<dyn EntityStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, UserError> {
    let user_id = path.into_inner();
    let service = ProfileService::new(store.into_inner());
    let profile = service.user_profile(&user_id).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Makes the authenticated user follow the user in the path, then redirects to their profile
pub async fn follow_user(
    store: web::Data<dyn EntityStore>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, UserError> {
    let target_id = path.into_inner();
    let service = FollowService::new(store.into_inner());
    let target = service.follow(&user.0, &target_id).await?;

    Ok(see_other(
        format!("/api/users/{}", target.id),
        format!("Successfully followed {}!", target.username),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, http::header, test};
    use entity_store::{EntityStore, InMemoryStore};

    use crate::configure_routes;
    use crate::test_support::*;

    #[actix_web::test]
    async fn test_follow_redirects_to_profile() {
        let store = Arc::new(InMemoryStore::new());
        let alice = create_user(&store, "alice").await;
        let bob = create_user(&store, "bob").await;
        let app = test::init_service(
            App::new()
                .app_data(store_data(&store))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/follow/{}", alice.id))
            .insert_header(bearer(&bob))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = format!("/api/users/{}", alice.id);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            location
        );
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Successfully followed alice!");
        assert_eq!(body["location"], location);

        let stored = store.find_user(&alice.id).await.unwrap();
        assert_eq!(stored.followers, vec![bob.id]);
    }

    #[actix_web::test]
    async fn test_follow_unknown_user_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let bob = create_user(&store, "bob").await;
        let app = test::init_service(
            App::new()
                .app_data(store_data(&store))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/follow/{}", uuid::Uuid::new_v4()))
            .insert_header(bearer(&bob))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_profile_is_public() {
        let store = Arc::new(InMemoryStore::new());
        let alice = create_user(&store, "alice").await;
        let app = test::init_service(
            App::new()
                .app_data(store_data(&store))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", alice.id))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["follower_count"], 0);
        assert_eq!(body["campgrounds"], serde_json::json!([]));
        assert!(body["user"].get("email").is_none());
        assert!(body["user"].get("notifications").is_none());
        assert!(body["user"].get("followers").is_none());
    }
}
