pub mod completion;
pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;

pub use completion::{calculate_completion, ProfileCompletion};
pub use routes::user_routes;
