pub mod admin;
pub mod auth;
pub mod blog;
pub mod booking;
pub mod inquiry;
pub mod metrics;
pub mod profile;
pub mod seminar;
