use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse authorization tag carried in every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Signup only grants `ADMIN` when it is asked for verbatim.
    pub fn from_requested(requested: Option<&str>) -> Self {
        match requested {
            Some("ADMIN") => Role::Admin,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelLocation {
    pub id: Uuid,
    pub name: String,
    pub country: Option<String>,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub admin_id: Uuid,
}

pub struct NewLocation {
    pub name: String,
    pub country: Option<String>,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub admin_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub guests: u32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewBooking {
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub guests: u32,
    pub total_price: f64,
}

/// A booking joined with the user who owns it and the location it references.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub booking: Booking,
    pub user: User,
    pub location: TravelLocation,
}

// Request bodies. Every field is optional so that absent values surface as
// validation errors with the usual envelope instead of a deserializer message.

/// Treats a blank string the same as a missing one.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub location_id: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub guests: Option<u32>,
    pub total_price: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(alias = "imageUrl")]
    pub img_url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UploadImageRequest {
    pub image: Option<String>,
}

// Response projections.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl LocationSummary {
    pub fn name_only(location: &TravelLocation) -> Self {
        LocationSummary {
            name: location.name.clone(),
            country: None,
            image_url: None,
            price: None,
        }
    }

    pub fn card(location: &TravelLocation) -> Self {
        LocationSummary {
            country: location.country.clone(),
            image_url: Some(location.image_url.clone()),
            ..Self::name_only(location)
        }
    }

    pub fn priced(location: &TravelLocation) -> Self {
        LocationSummary {
            price: Some(location.price),
            ..Self::card(location)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub location: LocationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

/// Location as shown to travellers; the owning admin stays private.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: Uuid,
    pub name: String,
    pub country: Option<String>,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<TravelLocation> for Destination {
    fn from(location: TravelLocation) -> Self {
        Destination {
            id: location.id,
            name: location.name,
            country: location.country,
            description: location.description,
            price: location.price,
            image_url: location.image_url,
            created_at: location.created_at,
        }
    }
}
