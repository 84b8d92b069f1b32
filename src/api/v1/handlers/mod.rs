pub mod bookings;
pub mod events;
pub mod fallback;
pub mod health;
pub mod me;
pub mod users;
