pub mod memory;

use std::sync::Arc;

use crate::config::DbPool;
use crate::modules::auth::crud::{RefreshTokenCrud, UserCrud};
use crate::modules::auth::interface::{RefreshTokenRepository, UserRepository};
use crate::modules::blog::crud::BlogCrud;
use crate::modules::blog::interface::BlogRepository;
use crate::modules::booking::crud::BookingCrud;
use crate::modules::booking::interface::BookingRepository;
use crate::modules::inquiry::crud::InquiryCrud;
use crate::modules::inquiry::interface::InquiryRepository;
use crate::modules::profile::crud::ProfileCrud;
use crate::modules::profile::interface::ProfileRepository;
use crate::modules::seminar::crud::SeminarCrud;
use crate::modules::seminar::interface::SeminarRepository;

pub use memory::MemoryStore;

/// Storage handles shared by every request handler.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub seminars: Arc<dyn SeminarRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub inquiries: Arc<dyn InquiryRepository>,
    pub blogs: Arc<dyn BlogRepository>,
}

impl Repositories {
    pub fn mysql(pool: DbPool) -> Self {
        Self {
            users: Arc::new(UserCrud::new(pool.clone())),
            refresh_tokens: Arc::new(RefreshTokenCrud::new(pool.clone())),
            profiles: Arc::new(ProfileCrud::new(pool.clone())),
            seminars: Arc::new(SeminarCrud::new(pool.clone())),
            bookings: Arc::new(BookingCrud::new(pool.clone())),
            inquiries: Arc::new(InquiryCrud::new(pool.clone())),
            blogs: Arc::new(BlogCrud::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Every handle points at the same store.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            refresh_tokens: store.clone(),
            profiles: store.clone(),
            seminars: store.clone(),
            bookings: store.clone(),
            inquiries: store.clone(),
            blogs: store,
        }
    }
}
