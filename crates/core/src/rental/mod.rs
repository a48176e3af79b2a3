mod types;

pub use types::{
    GuestReservation, NewProperty, NewUser, Property, PropertyListing, PropertyReview, Reservation,
    User,
};
