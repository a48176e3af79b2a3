//! SQLite repository implementation.
//!
//! Implements the repository traits from `shortstay_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use tracing::debug;

use shortstay_core::rental::{GuestReservation, NewProperty, NewUser, Property, PropertyListing, User};
use shortstay_core::search::{build_property_search, PropertySearchFilters};
use shortstay_core::storage::{
    PropertyRepository, RepositoryError, ReservationRepository, Result, UserRepository,
};

use super::conversions::{
    row_to_guest_reservation, row_to_listing, row_to_property, row_to_user, sql_value_to_sqlite,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for users, properties, and
/// reservations.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Raw connection access for test seeding.
    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user_with_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_USER_BY_EMAIL)
                    .map_err(wrap_err)?;
                match stmt.query_row([&email], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn get_user_with_id(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn add_user(&self, new_user: &NewUser) -> Result<User> {
        let user = new_user.clone();
        let email = new_user.email.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::INSERT_USER).map_err(wrap_err)?;
                stmt.query_row(
                    rusqlite::params![user.name, user.email, user.password],
                    row_to_user,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", email))
    }
}

#[async_trait]
impl ReservationRepository for SqliteRepository {
    async fn reservations_for_guest(
        &self,
        guest_id: i64,
        limit: u32,
    ) -> Result<Vec<GuestReservation>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RESERVATIONS_FOR_GUEST)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![guest_id, limit],
                        row_to_guest_reservation,
                    )
                    .map_err(wrap_err)?;

                let mut reservations = Vec::new();
                for row_result in rows {
                    reservations.push(row_result.map_err(wrap_err)?);
                }
                Ok(reservations)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Reservation"))
    }
}

#[async_trait]
impl PropertyRepository for SqliteRepository {
    async fn search_properties(
        &self,
        filters: &PropertySearchFilters,
        limit: u32,
    ) -> Result<Vec<PropertyListing>> {
        let query = build_property_search(filters, limit);
        debug!(sql = %query.sql, params = query.params.len(), "running property search");

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&query.sql).map_err(wrap_err)?;
                let values: Vec<rusqlite::types::Value> =
                    query.params.iter().map(sql_value_to_sqlite).collect();
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(values), row_to_listing)
                    .map_err(wrap_err)?;

                let mut listings = Vec::new();
                for row_result in rows {
                    listings.push(row_result.map_err(wrap_err)?);
                }
                Ok(listings)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Property"))
    }

    async fn add_property(&self, new_property: &NewProperty) -> Result<Property> {
        let property = new_property.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::INSERT_PROPERTY).map_err(wrap_err)?;
                stmt.query_row(
                    rusqlite::params![
                        property.owner_id,
                        property.title,
                        property.description,
                        property.thumbnail_photo_url,
                        property.cover_photo_url,
                        property.cost_per_night,
                        property.parking_spaces,
                        property.number_of_bathrooms,
                        property.number_of_bedrooms,
                        property.country,
                        property.street,
                        property.city,
                        property.province,
                        property.post_code,
                    ],
                    row_to_property,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Property"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            name: "Eva Stanley".to_string(),
            email: email.to_string(),
            password: "password".to_string(),
        }
    }

    fn sample_property(owner_id: i64, city: &str, cost_per_night: i64) -> NewProperty {
        NewProperty {
            owner_id,
            title: "Speed lamp".to_string(),
            description: "description".to_string(),
            thumbnail_photo_url: "https://example.com/thumb.jpg".to_string(),
            cover_photo_url: "https://example.com/cover.jpg".to_string(),
            cost_per_night,
            parking_spaces: 2,
            number_of_bathrooms: 1,
            number_of_bedrooms: 3,
            country: "Canada".to_string(),
            street: "536 Namsub Highway".to_string(),
            city: city.to_string(),
            province: "British Columbia".to_string(),
            post_code: "28142".to_string(),
        }
    }

    async fn seed_review(repo: &SqliteRepository, property_id: i64, guest_id: i64, rating: i64) {
        repo.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO property_reviews (property_id, guest_id, rating, message) \
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![property_id, guest_id, rating, "fine stay"],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .unwrap();
    }

    async fn seed_reservation(
        repo: &SqliteRepository,
        guest_id: i64,
        property_id: i64,
        start_date: &str,
        end_date: &str,
    ) {
        let start_date = start_date.to_string();
        let end_date = end_date.to_string();
        repo.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO reservations (guest_id, property_id, start_date, end_date) \
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![guest_id, property_id, start_date, end_date],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_user_assigns_id_and_round_trips() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let created = repo.add_user(&sample_user("eva@example.com")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.email, "eva@example.com");

        let by_email = repo.get_user_with_email("eva@example.com").await.unwrap();
        assert_eq!(by_email, Some(created.clone()));

        let by_id = repo.get_user_with_id(created.id).await.unwrap();
        assert_eq!(by_id, Some(created));
    }

    #[tokio::test]
    async fn test_missing_user_is_none_not_an_error() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        assert_eq!(repo.get_user_with_email("nobody@example.com").await.unwrap(), None);
        assert_eq!(repo.get_user_with_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_already_exists() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        repo.add_user(&sample_user("eva@example.com")).await.unwrap();
        let err = repo
            .add_user(&sample_user("eva@example.com"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RepositoryError::AlreadyExists {
                entity_type: "User",
                id: "eva@example.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_add_property_generates_distinct_ids() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let owner = repo.add_user(&sample_user("owner@example.com")).await.unwrap();

        let mut ids = HashSet::new();
        for cost in [10_000, 20_000, 30_000] {
            let property = repo
                .add_property(&sample_property(owner.id, "Vancouver", cost))
                .await
                .unwrap();
            assert_eq!(property.owner_id, owner.id);
            assert!(ids.insert(property.id), "duplicate property id");
        }
    }

    #[tokio::test]
    async fn test_add_property_with_unknown_owner_is_invalid_data() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let err = repo
            .add_property(&sample_property(999, "Vancouver", 10_000))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_search_orders_by_price_and_respects_limit() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let owner = repo.add_user(&sample_user("owner@example.com")).await.unwrap();
        let guest = repo.add_user(&sample_user("guest@example.com")).await.unwrap();

        for cost in [30_000, 10_000, 20_000] {
            let property = repo
                .add_property(&sample_property(owner.id, "Vancouver", cost))
                .await
                .unwrap();
            seed_review(&repo, property.id, guest.id, 4).await;
        }

        let listings = repo
            .search_properties(&PropertySearchFilters::default(), 2)
            .await
            .unwrap();

        let costs: Vec<i64> = listings.iter().map(|l| l.property.cost_per_night).collect();
        assert_eq!(costs, vec![10_000, 20_000]);
    }

    #[tokio::test]
    async fn test_search_filters_by_city_substring() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let owner = repo.add_user(&sample_user("owner@example.com")).await.unwrap();
        let guest = repo.add_user(&sample_user("guest@example.com")).await.unwrap();

        let vancouver = repo
            .add_property(&sample_property(owner.id, "Vancouver", 10_000))
            .await
            .unwrap();
        let toronto = repo
            .add_property(&sample_property(owner.id, "Toronto", 20_000))
            .await
            .unwrap();
        seed_review(&repo, vancouver.id, guest.id, 4).await;
        seed_review(&repo, vancouver.id, guest.id, 5).await;
        seed_review(&repo, toronto.id, guest.id, 5).await;

        let filters = PropertySearchFilters::default().with_city("couv");
        let listings = repo.search_properties(&filters, 10).await.unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].property.id, vancouver.id);
        assert_eq!(listings[0].average_rating, 4.5);
    }

    #[tokio::test]
    async fn test_search_filters_by_owner_and_price_range() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let alice = repo.add_user(&sample_user("alice@example.com")).await.unwrap();
        let bob = repo.add_user(&sample_user("bob@example.com")).await.unwrap();
        let guest = repo.add_user(&sample_user("guest@example.com")).await.unwrap();

        // Costs in cents; filter bounds below are whole currency units.
        let cheap = repo
            .add_property(&sample_property(alice.id, "Vancouver", 4_000))
            .await
            .unwrap();
        let mid = repo
            .add_property(&sample_property(alice.id, "Vancouver", 10_000))
            .await
            .unwrap();
        let bobs = repo
            .add_property(&sample_property(bob.id, "Vancouver", 10_000))
            .await
            .unwrap();
        for property_id in [cheap.id, mid.id, bobs.id] {
            seed_review(&repo, property_id, guest.id, 4).await;
        }

        let filters = PropertySearchFilters::default()
            .with_owner_id(alice.id)
            .with_price_range(50, 150);
        let listings = repo.search_properties(&filters, 10).await.unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].property.id, mid.id);
    }

    #[tokio::test]
    async fn test_search_minimum_rating_filters_on_the_aggregate() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let owner = repo.add_user(&sample_user("owner@example.com")).await.unwrap();
        let guest = repo.add_user(&sample_user("guest@example.com")).await.unwrap();

        let poor = repo
            .add_property(&sample_property(owner.id, "Vancouver", 10_000))
            .await
            .unwrap();
        let great = repo
            .add_property(&sample_property(owner.id, "Vancouver", 20_000))
            .await
            .unwrap();
        seed_review(&repo, poor.id, guest.id, 3).await;
        seed_review(&repo, great.id, guest.id, 5).await;

        let filters = PropertySearchFilters::default().with_minimum_rating(4.0);
        let listings = repo.search_properties(&filters, 10).await.unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].property.id, great.id);
    }

    #[tokio::test]
    async fn test_property_without_reviews_is_excluded_from_search() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let owner = repo.add_user(&sample_user("owner@example.com")).await.unwrap();

        repo.add_property(&sample_property(owner.id, "Vancouver", 10_000))
            .await
            .unwrap();

        let listings = repo
            .search_properties(&PropertySearchFilters::default(), 10)
            .await
            .unwrap();

        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn test_reservations_for_guest_joins_property_data() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let owner = repo.add_user(&sample_user("owner@example.com")).await.unwrap();
        let guest = repo.add_user(&sample_user("guest@example.com")).await.unwrap();

        let property = repo
            .add_property(&sample_property(owner.id, "Vancouver", 10_000))
            .await
            .unwrap();
        seed_review(&repo, property.id, guest.id, 4).await;
        seed_reservation(&repo, guest.id, property.id, "2024-09-11", "2024-09-26").await;
        seed_reservation(&repo, guest.id, property.id, "2024-06-01", "2024-06-05").await;

        let reservations = repo.reservations_for_guest(guest.id, 10).await.unwrap();

        assert_eq!(reservations.len(), 2);
        // Ordered by start date
        assert_eq!(reservations[0].start_date.to_string(), "2024-06-01");
        assert_eq!(reservations[1].start_date.to_string(), "2024-09-11");
        assert_eq!(reservations[0].title, "Speed lamp");
        assert_eq!(reservations[0].cost_per_night, 10_000);
        assert_eq!(reservations[0].average_rating, 4.0);

        let capped = repo.reservations_for_guest(guest.id, 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_reservations_for_other_guests_are_not_returned() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let owner = repo.add_user(&sample_user("owner@example.com")).await.unwrap();
        let guest = repo.add_user(&sample_user("guest@example.com")).await.unwrap();
        let other = repo.add_user(&sample_user("other@example.com")).await.unwrap();

        let property = repo
            .add_property(&sample_property(owner.id, "Vancouver", 10_000))
            .await
            .unwrap();
        seed_review(&repo, property.id, guest.id, 4).await;
        seed_reservation(&repo, other.id, property.id, "2024-09-11", "2024-09-26").await;

        let reservations = repo.reservations_for_guest(guest.id, 10).await.unwrap();
        assert!(reservations.is_empty());
    }
}
