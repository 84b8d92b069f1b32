pub mod bookings;
pub mod events;
pub mod me;
pub mod users;
