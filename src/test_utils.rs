//! Shared fixtures for handler tests.

use std::sync::Arc;

use actix_web::{test as actix_test, web, App};
use chrono::Duration;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::TokenCodec;
use crate::db::MemoryStore;
use crate::images::InlineImageStore;
use crate::models::{NewLocation, NewUser, Role};
use crate::routes;
use crate::state::AppState;

pub const TEST_SECRET: &[u8] = b"test-secret";
/// Lowest cost bcrypt accepts; keeps hashing fast under test.
pub const TEST_HASH_COST: u32 = 4;

pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState {
        store: Arc::new(MemoryStore::new()),
        tokens: TokenCodec::new(TEST_SECRET, Duration::hours(1)),
        images: Arc::new(InlineImageStore::new("travel-uploads".into())),
        hash_cost: TEST_HASH_COST,
    })
}

pub fn test_app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(routes::configure)
}

pub fn bearer(state: &AppState, id: Uuid, role: Role) -> (&'static str, String) {
    let token = state.tokens.issue(id, role).expect("sign test token");
    ("Authorization", format!("Bearer {token}"))
}

pub async fn body_json(response: actix_web::dev::ServiceResponse) -> Value {
    actix_test::read_body_json(response).await
}

pub async fn seed_user(state: &AppState, email: &str, role: Role) -> Uuid {
    state
        .store
        .create_user(NewUser {
            username: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role,
        })
        .await
        .expect("seed user")
        .id
}

pub async fn seed_location(state: &AppState, name: &str) -> Uuid {
    state
        .store
        .create_location(NewLocation {
            name: name.to_string(),
            country: Some("India".into()),
            description: String::new(),
            price: 100.0,
            image_url: String::new(),
            admin_id: Uuid::new_v4(),
        })
        .await
        .expect("seed location")
        .id
}
