//! Property search query construction.
//!
//! Builds one parameterized `SELECT` over properties joined with their
//! average review rating from a sparse set of filters. Predicates are
//! collected as an ordered list and the `WHERE`/`AND` keyword is chosen from
//! that list's own size, never from the parameter count: the price-range
//! filter contributes two parameters behind a single predicate, so the two
//! counts diverge.

use serde::{Deserialize, Serialize};

/// Optional filters for a property search. Absent fields emit no predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySearchFilters {
    /// Substring match against the property city.
    pub city: Option<String>,
    /// Exact match against the property owner.
    pub owner_id: Option<i64>,
    /// Lower price bound in whole currency units. Only applied together
    /// with `maximum_price_per_night`.
    pub minimum_price_per_night: Option<i64>,
    /// Upper price bound in whole currency units. Only applied together
    /// with `minimum_price_per_night`.
    pub maximum_price_per_night: Option<i64>,
    /// Minimum average review rating.
    pub minimum_rating: Option<f64>,
}

impl PropertySearchFilters {
    /// Sets the city substring filter.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the owner filter.
    pub fn with_owner_id(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets both price bounds, in whole currency units.
    pub fn with_price_range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum_price_per_night = Some(minimum);
        self.maximum_price_per_night = Some(maximum);
        self
    }

    /// Sets the minimum average rating filter.
    pub fn with_minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }
}

/// A parameter value bound to a placeholder at execution time.
///
/// Driver-agnostic so this crate stays free of database dependencies;
/// storage backends convert to their driver's value type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

/// A rendered SQL statement plus its ordered parameter list.
///
/// The nth parameter binds to the `?n` marker in the statement text.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

const PROPERTY_SEARCH_BASE: &str = "\
SELECT properties.id, properties.owner_id, properties.title, properties.description,
       properties.thumbnail_photo_url, properties.cover_photo_url, properties.cost_per_night,
       properties.parking_spaces, properties.number_of_bathrooms, properties.number_of_bedrooms,
       properties.country, properties.street, properties.city, properties.province,
       properties.post_code, avg(property_reviews.rating) AS average_rating
FROM properties
JOIN property_reviews ON property_reviews.property_id = properties.id
";

/// Builds the property search statement for the given filters and result cap.
///
/// Grouping by property is always applied, exactly once, before any
/// `HAVING`; results are ordered by nightly cost ascending and the limit is
/// always the final parameter. Properties without reviews do not appear in
/// the results (inner join).
pub fn build_property_search(filters: &PropertySearchFilters, limit: u32) -> SearchQuery {
    let mut params: Vec<SqlValue> = Vec::new();
    let mut predicates: Vec<String> = Vec::new();

    if let Some(city) = filters.city.as_deref().filter(|c| !c.trim().is_empty()) {
        params.push(SqlValue::Text(format!("%{city}%")));
        predicates.push(format!("properties.city LIKE ?{}", params.len()));
    }

    if let Some(owner_id) = filters.owner_id {
        params.push(SqlValue::Integer(owner_id));
        predicates.push(format!("properties.owner_id = ?{}", params.len()));
    }

    // Both bounds or neither; asymmetric ranges are not supported. Filter
    // values are whole currency units, the column stores cents; bounds too
    // large to express in cents saturate rather than wrap.
    if let (Some(minimum), Some(maximum)) = (
        filters.minimum_price_per_night,
        filters.maximum_price_per_night,
    ) {
        params.push(SqlValue::Integer(minimum.saturating_mul(100)));
        let minimum_marker = params.len();
        params.push(SqlValue::Integer(maximum.saturating_mul(100)));
        predicates.push(format!(
            "properties.cost_per_night >= ?{minimum_marker} AND properties.cost_per_night <= ?{}",
            params.len()
        ));
    }

    let mut sql = String::from(PROPERTY_SEARCH_BASE);
    if !predicates.is_empty() {
        sql.push_str("WHERE ");
        sql.push_str(&predicates.join("\n  AND "));
        sql.push('\n');
    }

    sql.push_str("GROUP BY properties.id\n");

    if let Some(minimum_rating) = filters.minimum_rating {
        params.push(SqlValue::Real(minimum_rating));
        sql.push_str(&format!(
            "HAVING avg(property_reviews.rating) >= ?{}\n",
            params.len()
        ));
    }

    params.push(SqlValue::Integer(i64::from(limit)));
    sql.push_str(&format!(
        "ORDER BY properties.cost_per_night\nLIMIT ?{}",
        params.len()
    ));

    SearchQuery { sql, params }
}
