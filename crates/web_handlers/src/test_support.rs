use std::sync::Arc;

use auth_services::jwt::JwtService;
use entity_store::{EntityStore, InMemoryStore, NewUser, User};

pub(crate) async fn create_user(store: &InMemoryStore, name: &str) -> User {
    store
        .create_user(&NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            avatar: None,
        })
        .await
        .unwrap()
}

pub(crate) fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtService::new()
        .generate_access_token(&user.id, &user.username)
        .unwrap();
    ("Authorization", format!("Bearer {}", token))
}

pub(crate) fn store_data(store: &Arc<InMemoryStore>) -> actix_web::web::Data<dyn EntityStore> {
    let store: Arc<dyn EntityStore> = store.clone();
    actix_web::web::Data::from(store)
}
