pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;

pub use routes::{admin_routes, public_routes};
