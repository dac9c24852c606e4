use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::auth::AdminUser;
use crate::booking_handlers::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    non_blank, BookingStatus, BookingView, LocationRequest, LocationSummary, NewLocation,
    StatusRequest, UploadImageRequest, UserSummary,
};
use crate::state::AppState;

#[post("/AdminDashboard")]
pub async fn list_locations(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> ApiResult<HttpResponse> {
    let items = state.store.list_locations().await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Here is all location data",
        "items": items,
    })))
}

#[post("/AdminUploadItem")]
pub async fn create_location(
    state: web::Data<AppState>,
    admin: AdminUser,
    data: web::Json<LocationRequest>,
) -> ApiResult<HttpResponse> {
    let LocationRequest {
        name,
        country,
        description,
        price,
        img_url,
    } = data.into_inner();

    let (Some(name), Some(price)) = (non_blank(name), price) else {
        return Err(ApiError::validation("Name and price are required"));
    };
    if !price.is_finite() || price <= 0.0 {
        return Err(ApiError::validation("Price must be a positive number"));
    }

    let item = state
        .store
        .create_location(NewLocation {
            name,
            country: non_blank(country),
            description: description.unwrap_or_default(),
            price,
            image_url: img_url.unwrap_or_default(),
            admin_id: admin.id,
        })
        .await?;
    info!(location = %item.id, admin = %admin.id, "travel location created");

    Ok(HttpResponse::Created().json(json!({
        "message": "Item created successfully",
        "item": item,
    })))
}

#[post("/upload-image")]
pub async fn upload_image(
    state: web::Data<AppState>,
    admin: AdminUser,
    data: web::Json<UploadImageRequest>,
) -> ApiResult<HttpResponse> {
    let Some(image) = non_blank(data.into_inner().image) else {
        return Err(ApiError::validation("Image is required"));
    };

    let uploaded = state.images.upload(&image).await?;
    info!(public_id = %uploaded.public_id, admin = %admin.id, "image stored");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Image uploaded successfully",
        "imageUrl": uploaded.image_url,
        "publicId": uploaded.public_id,
    })))
}

#[get("/admin/bookings")]
pub async fn list_all_bookings(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> ApiResult<HttpResponse> {
    let bookings: Vec<BookingView> = state
        .store
        .list_bookings(None)
        .await?
        .into_iter()
        .map(|record| BookingView {
            location: LocationSummary::card(&record.location),
            user: Some(UserSummary::from(&record.user)),
            booking: record.booking,
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "message": "All bookings fetched successfully",
        "bookings": bookings,
    })))
}

#[put("/admin/bookings/{id}/status")]
pub async fn update_booking_status(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
    data: web::Json<StatusRequest>,
) -> ApiResult<HttpResponse> {
    let Some(status) = data.into_inner().status.as_deref().and_then(BookingStatus::parse) else {
        return Err(ApiError::validation("Invalid status"));
    };
    let id = parse_id(&path.into_inner(), "Booking")?;

    let record = state
        .store
        .set_booking_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;
    info!(booking = %id, status = ?status, admin = %admin.id, "booking status changed");

    let view = BookingView {
        location: LocationSummary::name_only(&record.location),
        user: Some(UserSummary::from(&record.user)),
        booking: record.booking,
    };
    Ok(HttpResponse::Ok().json(json!({
        "message": "Booking status updated successfully",
        "booking": view,
    })))
}

#[delete("/admin/items/{id}")]
pub async fn delete_location(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path.into_inner(), "Travel location")?;

    let removed = state
        .store
        .delete_location(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Travel location not found"))?;
    info!(location = %id, bookings = removed, admin = %admin.id, "travel location deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Location and all associated bookings deleted successfully",
        "deletedBookings": removed,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewBooking, Role};
    use crate::test_utils::{bearer, body_json, seed_location, seed_user, test_app, test_state};
    use actix_web::{http::StatusCode, test as actix_test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    async fn seed_booking(state: &AppState, user_id: Uuid, location_id: Uuid) -> Uuid {
        state
            .store
            .create_booking(NewBooking {
                user_id,
                location_id,
                check_in: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                check_out: Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap(),
                guests: 2,
                total_price: 200.0,
            })
            .await
            .unwrap()
            .booking
            .id
    }

    #[rstest]
    #[case("POST", "/api/AdminDashboard")]
    #[case("POST", "/api/AdminUploadItem")]
    #[case("POST", "/api/upload-image")]
    #[case("GET", "/api/admin/bookings")]
    #[case("PUT", "/api/admin/bookings/00000000-0000-0000-0000-000000000000/status")]
    #[case("DELETE", "/api/admin/items/00000000-0000-0000-0000-000000000000")]
    #[actix_web::test]
    async fn user_tokens_are_forbidden(#[case] method: &str, #[case] uri: &str) {
        let state = test_state();
        let auth = bearer(&state, Uuid::new_v4(), Role::User);
        let app = actix_test::init_service(test_app(state)).await;

        let req = match method {
            "GET" => actix_test::TestRequest::get(),
            "PUT" => actix_test::TestRequest::put(),
            "DELETE" => actix_test::TestRequest::delete(),
            _ => actix_test::TestRequest::post(),
        }
        .uri(uri)
        .insert_header(auth)
        .set_json(serde_json::json!({}))
        .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(res).await["message"], "Access denied: Admins only");
    }

    #[actix_web::test]
    async fn create_then_list_locations() {
        let state = test_state();
        let admin = Uuid::new_v4();
        let auth = bearer(&state, admin, Role::Admin);
        let app = actix_test::init_service(test_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/AdminDashboard")
            .insert_header(auth.clone())
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["items"], serde_json::json!([]));

        let req = actix_test::TestRequest::post()
            .uri("/api/AdminUploadItem")
            .insert_header(auth.clone())
            .set_json(LocationRequest {
                name: Some("Goa".into()),
                price: Some(100.0),
                ..Default::default()
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = body_json(res).await;
        assert_eq!(body["item"]["adminId"], admin.to_string());
        assert_eq!(body["item"]["description"], "");

        let req = actix_test::TestRequest::post()
            .uri("/api/AdminDashboard")
            .insert_header(auth)
            .to_request();
        let body = body_json(actix_test::call_service(&app, req).await).await;
        assert_eq!(body["items"][0]["name"], "Goa");
    }

    #[rstest]
    #[case(LocationRequest { price: Some(10.0), ..Default::default() })]
    #[case(LocationRequest { name: Some("Goa".into()), ..Default::default() })]
    #[case(LocationRequest { name: Some("Goa".into()), price: Some(-1.0), ..Default::default() })]
    #[case(LocationRequest { name: Some("Goa".into()), price: Some(0.0), ..Default::default() })]
    #[actix_web::test]
    async fn create_location_validation(#[case] body: LocationRequest) {
        let state = test_state();
        let auth = bearer(&state, Uuid::new_v4(), Role::Admin);
        let app = actix_test::init_service(test_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/AdminUploadItem")
            .insert_header(auth)
            .set_json(body)
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn status_changes_are_unrestricted() {
        let state = test_state();
        let user = seed_user(&state, "a@x.com", Role::User).await;
        let location = seed_location(&state, "Goa").await;
        let booking = seed_booking(&state, user, location).await;
        let auth = bearer(&state, Uuid::new_v4(), Role::Admin);
        let app = actix_test::init_service(test_app(state)).await;
        let uri = format!("/api/admin/bookings/{booking}/status");

        for status in ["CANCELLED", "CONFIRMED", "PENDING"] {
            let req = actix_test::TestRequest::put()
                .uri(&uri)
                .insert_header(auth.clone())
                .set_json(StatusRequest {
                    status: Some(status.into()),
                })
                .to_request();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            let body = body_json(res).await;
            assert_eq!(body["booking"]["status"], status);
            assert_eq!(body["booking"]["user"]["username"], "a");
        }
    }

    #[actix_web::test]
    async fn status_update_errors() {
        let state = test_state();
        let auth = bearer(&state, Uuid::new_v4(), Role::Admin);
        let app = actix_test::init_service(test_app(state)).await;

        let cases = [
            ("SHIPPED", Uuid::new_v4().to_string(), StatusCode::BAD_REQUEST),
            ("CONFIRMED", Uuid::new_v4().to_string(), StatusCode::NOT_FOUND),
            ("CONFIRMED", "not-a-uuid".to_string(), StatusCode::NOT_FOUND),
        ];
        for (status, id, expected) in cases {
            let req = actix_test::TestRequest::put()
                .uri(&format!("/api/admin/bookings/{id}/status"))
                .insert_header(auth.clone())
                .set_json(StatusRequest {
                    status: Some(status.into()),
                })
                .to_request();
            assert_eq!(actix_test::call_service(&app, req).await.status(), expected);
        }
    }

    #[actix_web::test]
    async fn delete_location_removes_its_bookings() {
        let state = test_state();
        let user = seed_user(&state, "a@x.com", Role::User).await;
        let goa = seed_location(&state, "Goa").await;
        let kerala = seed_location(&state, "Kerala").await;
        seed_booking(&state, user, goa).await;
        seed_booking(&state, user, goa).await;
        seed_booking(&state, user, kerala).await;
        let store = state.store.clone();
        let auth = bearer(&state, Uuid::new_v4(), Role::Admin);
        let app = actix_test::init_service(test_app(state)).await;

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/admin/items/{goa}"))
            .insert_header(auth.clone())
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["deletedBookings"], 2);

        let remaining = store.list_bookings(None).await.unwrap();
        assert!(remaining.iter().all(|r| r.booking.location_id != goa));
        assert_eq!(remaining.len(), 1);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/admin/items/{goa}"))
            .insert_header(auth)
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn upload_image_requires_an_image() {
        let state = test_state();
        let auth = bearer(&state, Uuid::new_v4(), Role::Admin);
        let app = actix_test::init_service(test_app(state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/upload-image")
            .insert_header(auth.clone())
            .set_json(UploadImageRequest::default())
            .to_request();
        assert_eq!(
            actix_test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = actix_test::TestRequest::post()
            .uri("/api/upload-image")
            .insert_header(auth)
            .set_json(UploadImageRequest {
                image: Some("https://cdn.example/goa.jpg".into()),
            })
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["imageUrl"], "https://cdn.example/goa.jpg");
        assert!(body["publicId"]
            .as_str()
            .is_some_and(|id| id.starts_with("travel-uploads/")));
    }
}
