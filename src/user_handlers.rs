use actix_web::{get, post, web, HttpResponse};
use bcrypt::{hash, verify};
use serde_json::json;
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::{non_blank, Destination, LoginRequest, NewUser, Role, SignupRequest};
use crate::state::AppState;

#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    data: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        username,
        email,
        password,
        role,
    } = data.into_inner();

    let (Some(username), Some(email), Some(password)) = (
        non_blank(username),
        non_blank(email),
        password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::validation(
            "Username, email and password are required",
        ));
    };

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let cost = state.hash_cost;
    let password_hash = web::block(move || hash(password, cost)).await??;
    let user = state
        .store
        .create_user(NewUser {
            username,
            email,
            password_hash,
            role: Role::from_requested(role.as_deref()),
        })
        .await?;

    let token = state.tokens.issue(user.id, user.role)?;
    info!(user = %user.id, role = ?user.role, "user signed up");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Signup successful",
        "user": { "username": user.username, "email": user.email, "role": user.role },
        "token": token,
    })))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    data: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = data.into_inner();
    let (Some(email), Some(password)) = (non_blank(email), password) else {
        return Err(ApiError::validation("Email and password are required"));
    };

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        return Err(ApiError::not_found("User not found"));
    };

    let stored = user.password_hash.clone();
    let valid = web::block(move || verify(password, &stored)).await?.unwrap_or(false);
    if !valid {
        warn!(user = %user.id, "login with wrong password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let token = state.tokens.issue(user.id, user.role)?;
    info!(user = %user.id, "user logged in");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "user": {
            "id": user.id,
            "name": user.username,
            "email": user.email,
            "role": user.role,
        },
        "token": token,
    })))
}

#[get("/check")]
pub async fn check(user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Authenticated",
        "user": { "id": user.id, "role": user.role },
    }))
}

#[get("/FetchTravelLocation")]
pub async fn fetch_travel_locations(
    state: web::Data<AppState>,
    _user: AuthUser,
) -> ApiResult<HttpResponse> {
    let destinations: Vec<Destination> = state
        .store
        .list_locations()
        .await?
        .into_iter()
        .map(Destination::from)
        .collect();
    info!(count = destinations.len(), "fetched travel locations");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Items fetched successfully",
        "destinations": destinations,
    })))
}
