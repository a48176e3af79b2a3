//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::NaiveDate;
use rusqlite::Row;

use shortstay_core::rental::{GuestReservation, Property, PropertyListing, User};
use shortstay_core::search::SqlValue;

/// Convert a SQLite row to a User.
///
/// Expected columns: id, name, email, password
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}

/// Convert a SQLite row to a Property.
///
/// Expected columns: id, owner_id, title, description, thumbnail_photo_url,
/// cover_photo_url, cost_per_night, parking_spaces, number_of_bathrooms,
/// number_of_bedrooms, country, street, city, province, post_code
pub fn row_to_property(row: &Row) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        thumbnail_photo_url: row.get(4)?,
        cover_photo_url: row.get(5)?,
        cost_per_night: row.get(6)?,
        parking_spaces: row.get(7)?,
        number_of_bathrooms: row.get(8)?,
        number_of_bedrooms: row.get(9)?,
        country: row.get(10)?,
        street: row.get(11)?,
        city: row.get(12)?,
        province: row.get(13)?,
        post_code: row.get(14)?,
    })
}

/// Convert a search result row to a PropertyListing.
///
/// Expected columns: the property columns followed by average_rating.
pub fn row_to_listing(row: &Row) -> rusqlite::Result<PropertyListing> {
    let property = row_to_property(row)?;
    let average_rating: f64 = row.get(15)?;
    Ok(PropertyListing {
        property,
        average_rating,
    })
}

/// Convert a reservation display row to a GuestReservation.
///
/// Expected columns: id, title, cost_per_night, start_date, end_date, average_rating
pub fn row_to_guest_reservation(row: &Row) -> rusqlite::Result<GuestReservation> {
    let start_date: String = row.get(3)?;
    let end_date: String = row.get(4)?;

    Ok(GuestReservation {
        id: row.get(0)?,
        title: row.get(1)?,
        cost_per_night: row.get(2)?,
        start_date: parse_date(&start_date)?,
        end_date: parse_date(&end_date)?,
        average_rating: row.get(5)?,
    })
}

/// Convert a driver-agnostic parameter value to a SQLite value.
pub fn sql_value_to_sqlite(value: &SqlValue) -> rusqlite::types::Value {
    match value {
        SqlValue::Text(text) => rusqlite::types::Value::Text(text.clone()),
        SqlValue::Integer(integer) => rusqlite::types::Value::Integer(*integer),
        SqlValue::Real(real) => rusqlite::types::Value::Real(*real),
    }
}

/// Parse a date from ISO 8601 string (YYYY-MM-DD).
fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}
