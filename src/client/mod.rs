//! Client side of the session: a cookie-carrying API client whose
//! concurrent requests share a single token refresh.

pub mod api;
pub mod refresh;

pub use api::{ApiClient, ClientError, RefreshError, MAX_REFRESH_ATTEMPTS};
pub use refresh::RefreshCoordinator;
