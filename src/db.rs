use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    Booking, BookingRecord, BookingStatus, NewBooking, NewLocation, NewUser, TravelLocation, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a user with email {0} already exists")]
    DuplicateEmail(String),
    #[error("travel location {0} does not exist")]
    UnknownLocation(Uuid),
    #[error("user {0} does not exist")]
    UnknownUser(Uuid),
}

/// Result of an owner cancelling one of their bookings.
#[derive(Debug)]
pub enum CancelOutcome {
    Cancelled(BookingRecord),
    AlreadyCancelled,
    /// No such booking, or it belongs to someone else.
    NotFound,
}

/// Persistence for users, travel locations and bookings.
///
/// Listings come back newest first. Booking reads are joined with the owning
/// user and the referenced location.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create_location(&self, location: NewLocation) -> Result<TravelLocation, StoreError>;
    async fn find_location(&self, id: Uuid) -> Result<Option<TravelLocation>, StoreError>;
    async fn list_locations(&self) -> Result<Vec<TravelLocation>, StoreError>;
    /// Removes the location and every booking referencing it as one unit.
    /// Returns the number of bookings removed, or `None` if the location is
    /// unknown (in which case nothing is touched).
    async fn delete_location(&self, id: Uuid) -> Result<Option<usize>, StoreError>;

    async fn create_booking(&self, booking: NewBooking) -> Result<BookingRecord, StoreError>;
    /// All bookings, or only those owned by `owner`.
    async fn list_bookings(&self, owner: Option<Uuid>) -> Result<Vec<BookingRecord>, StoreError>;
    async fn set_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<BookingRecord>, StoreError>;
    /// Checks ownership and current status and writes the cancellation in
    /// one step, so two racing cancels cannot both succeed.
    async fn cancel_booking(&self, id: Uuid, owner: Uuid) -> Result<CancelOutcome, StoreError>;
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    locations: Vec<TravelLocation>,
    bookings: Vec<Booking>,
}

impl Tables {
    fn join(&self, booking: &Booking) -> Result<BookingRecord, StoreError> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == booking.user_id)
            .ok_or(StoreError::UnknownUser(booking.user_id))?;
        let location = self
            .locations
            .iter()
            .find(|l| l.id == booking.location_id)
            .ok_or(StoreError::UnknownLocation(booking.location_id))?;

        Ok(BookingRecord {
            booking: booking.clone(),
            user: user.clone(),
            location: location.clone(),
        })
    }
}

/// Newest first; among equal timestamps the later insertion wins.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    out
}

/// In-process store. A single lock guards all tables, so every operation,
/// including the cascading delete, is atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_location(&self, location: NewLocation) -> Result<TravelLocation, StoreError> {
        let location = TravelLocation {
            id: Uuid::new_v4(),
            name: location.name,
            country: location.country,
            description: location.description,
            price: location.price,
            image_url: location.image_url,
            created_at: Utc::now(),
            admin_id: location.admin_id,
        };
        self.tables.lock().await.locations.push(location.clone());
        Ok(location)
    }

    async fn find_location(&self, id: Uuid) -> Result<Option<TravelLocation>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.locations.iter().find(|l| l.id == id).cloned())
    }

    async fn list_locations(&self) -> Result<Vec<TravelLocation>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(newest_first(&tables.locations, |l| l.created_at))
    }

    async fn delete_location(&self, id: Uuid) -> Result<Option<usize>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables.locations.iter().position(|l| l.id == id) else {
            return Ok(None);
        };

        let before = tables.bookings.len();
        tables.bookings.retain(|b| b.location_id != id);
        let removed = before - tables.bookings.len();
        tables.locations.remove(index);
        Ok(Some(removed))
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<BookingRecord, StoreError> {
        let mut tables = self.tables.lock().await;
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            location_id: booking.location_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests: booking.guests,
            total_price: booking.total_price,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };
        // Join before inserting so a dangling reference is never stored.
        let record = tables.join(&booking)?;
        tables.bookings.push(booking);
        Ok(record)
    }

    async fn list_bookings(&self, owner: Option<Uuid>) -> Result<Vec<BookingRecord>, StoreError> {
        let tables = self.tables.lock().await;
        let owned: Vec<Booking> = tables
            .bookings
            .iter()
            .filter(|b| owner.map_or(true, |id| b.user_id == id))
            .cloned()
            .collect();

        newest_first(&owned, |b| b.created_at)
            .iter()
            .map(|b| tables.join(b))
            .collect()
    }

    async fn set_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<BookingRecord>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(booking) = tables.bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        booking.status = status;
        let booking = booking.clone();
        tables.join(&booking).map(Some)
    }

    async fn cancel_booking(&self, id: Uuid, owner: Uuid) -> Result<CancelOutcome, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(booking) = tables
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.user_id == owner)
        else {
            return Ok(CancelOutcome::NotFound);
        };
        if booking.status == BookingStatus::Cancelled {
            return Ok(CancelOutcome::AlreadyCancelled);
        }
        booking.status = BookingStatus::Cancelled;
        let booking = booking.clone();
        tables.join(&booking).map(CancelOutcome::Cancelled)
    }
}
