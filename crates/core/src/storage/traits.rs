use async_trait::async_trait;

use crate::rental::{GuestReservation, NewProperty, NewUser, Property, PropertyListing, User};
use crate::search::PropertySearchFilters;

use super::Result;

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their email address.
    async fn get_user_with_email(&self, email: &str) -> Result<Option<User>>;

    /// Gets a user by their id.
    async fn get_user_with_id(&self, id: i64) -> Result<Option<User>>;

    /// Inserts a new user and returns the stored row with its generated id.
    async fn add_user(&self, new_user: &NewUser) -> Result<User>;
}

/// Repository for reservation display queries.
///
/// Reservations are never mutated by this layer.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Gets a guest's reservations joined with their property and average
    /// review rating, ordered by start date, capped at `limit` rows.
    async fn reservations_for_guest(
        &self,
        guest_id: i64,
        limit: u32,
    ) -> Result<Vec<GuestReservation>>;
}

/// Repository for property operations.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Searches properties by the given filters, ordered by nightly cost
    /// ascending, capped at `limit` rows.
    async fn search_properties(
        &self,
        filters: &PropertySearchFilters,
        limit: u32,
    ) -> Result<Vec<PropertyListing>>;

    /// Inserts a new property and returns the stored row with its generated id.
    async fn add_property(&self, new_property: &NewProperty) -> Result<Property>;
}
