use std::future::Future;
use std::sync::{Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

type SharedRefresh<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Single-slot coordinator: concurrent callers that need a fresh session
/// await the one refresh already in flight instead of starting their own.
///
/// The slot is cleared once the refresh settles, so a later caller starts
/// a new one.
pub struct RefreshCoordinator<T, E>
where
    T: Clone,
    E: Clone,
{
    in_flight: Mutex<Option<SharedRefresh<T, E>>>,
}

impl<T, E> Default for RefreshCoordinator<T, E>
where
    T: Clone,
    E: Clone,
{
    fn default() -> Self {
        Self {
            in_flight: Mutex::new(None),
        }
    }
}

impl<T, E> RefreshCoordinator<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the in-flight refresh, or starts one with `start` when idle.
    pub async fn run<F, Fut>(&self, start: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let shared = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let fresh = start().boxed().shared();
                    *slot = Some(fresh.clone());
                    fresh
                }
            }
        };

        let result = shared.clone().await;

        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot
            .as_ref()
            .is_some_and(|current| Shared::ptr_eq(current, &shared))
        {
            *slot = None;
        }

        result
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
