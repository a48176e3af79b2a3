//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use shortstay_core::rental::{
    GuestReservation, NewProperty, NewUser, Property, PropertyListing, PropertyReview, Reservation,
    User,
};
use shortstay_core::search::PropertySearchFilters;
use shortstay_core::storage::{
    PropertyRepository, RepositoryError, ReservationRepository, Result, UserRepository,
};

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access. Data is
/// not persisted and will be lost when the repository is dropped. Search and
/// reservation queries mirror the SQL backend's semantics, including the
/// inner-join behavior: properties without reviews do not appear in
/// review-joined results.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    properties: Arc<RwLock<HashMap<i64, Property>>>,
    reservations: Arc<RwLock<Vec<Reservation>>>,
    reviews: Arc<RwLock<Vec<PropertyReview>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Seeds a reservation. Reservations are never mutated through the
    /// repository traits, so tests insert them directly.
    pub async fn insert_reservation(
        &self,
        guest_id: i64,
        property_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Reservation {
        let reservation = Reservation {
            id: self.next_id(),
            guest_id,
            property_id,
            start_date,
            end_date,
        };
        self.reservations.write().await.push(reservation.clone());
        reservation
    }

    /// Seeds a property review. Reviews are only read in aggregate through
    /// the repository traits, so tests insert them directly.
    pub async fn insert_review(
        &self,
        property_id: i64,
        guest_id: i64,
        rating: i64,
        message: Option<String>,
    ) -> PropertyReview {
        let review = PropertyReview {
            id: self.next_id(),
            property_id,
            guest_id,
            rating,
            message,
        };
        self.reviews.write().await.push(review.clone());
        review
    }

    fn average_rating(reviews: &[PropertyReview], property_id: i64) -> Option<f64> {
        let ratings: Vec<i64> = reviews
            .iter()
            .filter(|review| review.property_id == property_id)
            .map(|review| review.rating)
            .collect();
        if ratings.is_empty() {
            return None;
        }
        Some(ratings.iter().sum::<i64>() as f64 / ratings.len() as f64)
    }

    fn matches_filters(
        property: &Property,
        average_rating: f64,
        filters: &PropertySearchFilters,
    ) -> bool {
        if let Some(city) = filters.city.as_deref().filter(|c| !c.trim().is_empty()) {
            // SQLite LIKE folds case for ASCII only, so non-ASCII letters
            // must compare exactly
            if !property
                .city
                .to_ascii_lowercase()
                .contains(&city.to_ascii_lowercase())
            {
                return false;
            }
        }

        if let Some(owner_id) = filters.owner_id {
            if property.owner_id != owner_id {
                return false;
            }
        }

        if let (Some(minimum), Some(maximum)) = (
            filters.minimum_price_per_night,
            filters.maximum_price_per_night,
        ) {
            if property.cost_per_night < minimum.saturating_mul(100)
                || property.cost_per_night > maximum.saturating_mul(100)
            {
                return false;
            }
        }

        if let Some(minimum_rating) = filters.minimum_rating {
            if average_rating < minimum_rating {
                return false;
            }
        }

        true
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user_with_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn get_user_with_id(&self, id: i64) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn add_user(&self, new_user: &NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == new_user.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: new_user.email.clone(),
            });
        }
        let user = new_user.clone().into_user(self.next_id());
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRepository {
    async fn reservations_for_guest(
        &self,
        guest_id: i64,
        limit: u32,
    ) -> Result<Vec<GuestReservation>> {
        let reservations = self.reservations.read().await;
        let properties = self.properties.read().await;
        let reviews = self.reviews.read().await;

        let mut results: Vec<GuestReservation> = reservations
            .iter()
            .filter(|reservation| reservation.guest_id == guest_id)
            .filter_map(|reservation| {
                let property = properties.get(&reservation.property_id)?;
                let average_rating = Self::average_rating(&reviews, property.id)?;
                Some(GuestReservation {
                    id: reservation.id,
                    title: property.title.clone(),
                    cost_per_night: property.cost_per_night,
                    start_date: reservation.start_date,
                    end_date: reservation.end_date,
                    average_rating,
                })
            })
            .collect();

        results.sort_by_key(|reservation| reservation.start_date);
        results.truncate(limit as usize);
        Ok(results)
    }
}

#[async_trait]
impl PropertyRepository for InMemoryRepository {
    async fn search_properties(
        &self,
        filters: &PropertySearchFilters,
        limit: u32,
    ) -> Result<Vec<PropertyListing>> {
        let properties = self.properties.read().await;
        let reviews = self.reviews.read().await;

        let mut listings: Vec<PropertyListing> = properties
            .values()
            .filter_map(|property| {
                let average_rating = Self::average_rating(&reviews, property.id)?;
                if !Self::matches_filters(property, average_rating, filters) {
                    return None;
                }
                Some(PropertyListing {
                    property: property.clone(),
                    average_rating,
                })
            })
            .collect();

        listings.sort_by_key(|listing| (listing.property.cost_per_night, listing.property.id));
        listings.truncate(limit as usize);
        Ok(listings)
    }

    async fn add_property(&self, new_property: &NewProperty) -> Result<Property> {
        // Same contract as the SQL backend's foreign key on owner_id
        if !self.users.read().await.contains_key(&new_property.owner_id) {
            return Err(RepositoryError::InvalidData(format!(
                "Unknown owner: {}",
                new_property.owner_id
            )));
        }
        let mut properties = self.properties.write().await;
        let property = new_property.clone().into_property(self.next_id());
        properties.insert(property.id, property.clone());
        Ok(property)
    }
}
