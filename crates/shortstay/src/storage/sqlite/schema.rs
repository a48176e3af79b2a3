//! SQLite schema definitions and SQL statement constants.
//!
//! Static statements live here; the property search statement is built
//! dynamically by `shortstay_core::search::build_property_search`.

/// SQL statement to create all tables.
///
/// Foreign key enforcement is off by default in SQLite, so the pragma is
/// part of schema initialization.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
);

-- Properties table
CREATE TABLE IF NOT EXISTS properties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    thumbnail_photo_url TEXT NOT NULL,
    cover_photo_url TEXT NOT NULL,
    cost_per_night INTEGER NOT NULL,
    parking_spaces INTEGER NOT NULL,
    number_of_bathrooms INTEGER NOT NULL,
    number_of_bedrooms INTEGER NOT NULL,
    country TEXT NOT NULL,
    street TEXT NOT NULL,
    city TEXT NOT NULL,
    province TEXT NOT NULL,
    post_code TEXT NOT NULL,
    FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Reservations table
CREATE TABLE IF NOT EXISTS reservations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    guest_id INTEGER NOT NULL,
    property_id INTEGER NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    FOREIGN KEY (guest_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (property_id) REFERENCES properties(id) ON DELETE CASCADE
);

-- Property reviews table
CREATE TABLE IF NOT EXISTS property_reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    property_id INTEGER NOT NULL,
    guest_id INTEGER NOT NULL,
    rating INTEGER NOT NULL,
    message TEXT,
    FOREIGN KEY (property_id) REFERENCES properties(id) ON DELETE CASCADE,
    FOREIGN KEY (guest_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_properties_owner_id ON properties(owner_id);
CREATE INDEX IF NOT EXISTS idx_properties_city ON properties(city);
CREATE INDEX IF NOT EXISTS idx_reservations_guest_id ON reservations(guest_id);
CREATE INDEX IF NOT EXISTS idx_property_reviews_property_id ON property_reviews(property_id);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
"#;

// User queries
pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, name, email, password
FROM users
WHERE email = ?1
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, name, email, password
FROM users
WHERE id = ?1
"#;

pub const INSERT_USER: &str = r#"
INSERT INTO users (name, email, password)
VALUES (?1, ?2, ?3)
RETURNING id, name, email, password
"#;

// Reservation queries
pub const SELECT_RESERVATIONS_FOR_GUEST: &str = r#"
SELECT reservations.id, properties.title, properties.cost_per_night,
       reservations.start_date, reservations.end_date,
       avg(property_reviews.rating) AS average_rating
FROM reservations
JOIN properties ON reservations.property_id = properties.id
JOIN property_reviews ON properties.id = property_reviews.property_id
WHERE reservations.guest_id = ?1
GROUP BY properties.id, reservations.id
ORDER BY reservations.start_date
LIMIT ?2
"#;

// Property queries
pub const INSERT_PROPERTY: &str = r#"
INSERT INTO properties (owner_id, title, description, thumbnail_photo_url, cover_photo_url,
                        cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
                        country, street, city, province, post_code)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
RETURNING id, owner_id, title, description, thumbnail_photo_url, cover_photo_url,
          cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
          country, street, city, province, post_code
"#;
