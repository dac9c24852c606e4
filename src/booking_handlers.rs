use actix_web::{get, post, put, web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::CancelOutcome;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    non_blank, BookingRequest, BookingView, LocationSummary, NewBooking,
    UserSummary,
};
use crate::state::AppState;

/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Unknown or malformed ids are reported the same way as missing records.
pub fn parse_id(raw: &str, what: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{what} not found")))
}

fn validate(user: &AuthUser, req: BookingRequest) -> ApiResult<NewBooking> {
    let (Some(location_id), Some(check_in), Some(check_out), Some(guests), Some(total_price)) = (
        non_blank(req.location_id),
        non_blank(req.check_in),
        non_blank(req.check_out),
        req.guests.filter(|g| *g > 0),
        req.total_price.filter(|p| *p > 0.0),
    ) else {
        return Err(ApiError::validation("All fields are required"));
    };

    let location_id = parse_id(&location_id, "Travel location")?;
    let (Some(check_in), Some(check_out)) = (parse_date(&check_in), parse_date(&check_out)) else {
        return Err(ApiError::validation("Invalid check-in or check-out date"));
    };
    if check_out <= check_in {
        return Err(ApiError::validation("Check-out must be after check-in"));
    }

    // totalPrice is taken as sent; pricing rules live with the client.
    Ok(NewBooking {
        user_id: user.id,
        location_id,
        check_in,
        check_out,
        guests,
        total_price,
    })
}

#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<AppState>,
    user: AuthUser,
    data: web::Json<BookingRequest>,
) -> ApiResult<HttpResponse> {
    let booking = validate(&user, data.into_inner())?;

    if state.store.find_location(booking.location_id).await?.is_none() {
        return Err(ApiError::not_found("Travel location not found"));
    }

    let record = state.store.create_booking(booking).await?;
    info!(
        booking = %record.booking.id,
        user = %user.id,
        location = %record.location.id,
        "booking created"
    );

    let view = BookingView {
        location: LocationSummary::card(&record.location),
        user: Some(UserSummary::from(&record.user)),
        booking: record.booking,
    };
    Ok(HttpResponse::Created().json(json!({
        "message": "Booking created successfully",
        "booking": view,
    })))
}

#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<AppState>,
    user: AuthUser,
) -> ApiResult<HttpResponse> {
    let bookings: Vec<BookingView> = state
        .store
        .list_bookings(Some(user.id))
        .await?
        .into_iter()
        .map(|record| BookingView {
            location: LocationSummary::priced(&record.location),
            user: None,
            booking: record.booking,
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "message": "Bookings fetched successfully",
        "bookings": bookings,
    })))
}

#[put("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path.into_inner(), "Booking")?;

    let record = match state.store.cancel_booking(id, user.id).await? {
        CancelOutcome::Cancelled(record) => record,
        CancelOutcome::AlreadyCancelled => return Err(ApiError::AlreadyCancelled),
        CancelOutcome::NotFound => return Err(ApiError::not_found("Booking not found")),
    };
    info!(booking = %id, user = %user.id, "booking cancelled");

    let view = BookingView {
        location: LocationSummary::name_only(&record.location),
        user: None,
        booking: record.booking,
    };
    Ok(HttpResponse::Ok().json(json!({
        "message": "Booking cancelled successfully",
        "booking": view,
    })))
}
