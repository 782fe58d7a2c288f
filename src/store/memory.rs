//! In-memory storage for tests and local runs without MySQL.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::modules::auth::interface::{RefreshTokenRepository, UserRepository};
use crate::modules::auth::model::{RefreshToken, User};
use crate::modules::blog::interface::BlogRepository;
use crate::modules::blog::model::Blog;
use crate::modules::booking::interface::{
    BookingRepository, ConfirmOutcome, PaymentConfirmation, ReserveOutcome,
};
use crate::modules::booking::model::{Booking, BookingStatus, BookingSummary, Ticket};
use crate::modules::inquiry::interface::InquiryRepository;
use crate::modules::inquiry::model::{Inquiry, InquiryStatus};
use crate::modules::profile::interface::ProfileRepository;
use crate::modules::profile::model::{Child, Profile};
use crate::modules::seminar::interface::SeminarRepository;
use crate::modules::seminar::model::Seminar;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    refresh_tokens: Vec<RefreshToken>,
    profiles: HashMap<String, Profile>,
    children: Vec<Child>,
    seminars: Vec<Seminar>,
    bookings: Vec<Booking>,
    tickets: Vec<Ticket>,
    inquiries: Vec<Inquiry>,
    blogs: Vec<Blog>,
}

impl Tables {
    fn paid_seats(&self, seminar_id: &str) -> i64 {
        self.bookings
            .iter()
            .filter(|b| b.seminar_id == seminar_id && b.status == BookingStatus::Paid)
            .map(|b| i64::from(b.quantity))
            .sum()
    }

    fn available_seats(&self, seminar_id: &str) -> Option<i64> {
        self.seminars
            .iter()
            .find(|s| s.id == seminar_id)
            .map(|s| (i64::from(s.capacity) - self.paid_seats(seminar_id)).max(0))
    }

    fn tickets_for(&self, booking_id: &str) -> Vec<Ticket> {
        self.tickets
            .iter()
            .filter(|t| t.booking_id == booking_id)
            .cloned()
            .collect()
    }

    fn summarize(&self, booking: &Booking) -> BookingSummary {
        let seminar_title = self
            .seminars
            .iter()
            .find(|s| s.id == booking.seminar_id)
            .map(|s| s.title.clone())
            .unwrap_or_default();
        let username = self
            .users
            .iter()
            .find(|u| u.id == booking.user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default();

        BookingSummary {
            booking: booking.clone(),
            seminar_title,
            username,
        }
    }
}

/// Newest first; rows created at the same instant keep reverse insertion order.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

/// Every repository over one lock, so reserve and confirm are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

// =============================================================================
// USERS
// =============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<()> {
        let mut tables = self.write()?;
        let clash = tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.phone == user.phone);
        if clash {
            return Err(AppError::Conflict(
                "Username or phone already registered".to_string(),
            ));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update_registration(&self, user: &User) -> Result<()> {
        let mut tables = self.write()?;
        let clash = tables
            .users
            .iter()
            .any(|u| u.id != user.id && (u.username == user.username || u.phone == user.phone));
        if clash {
            return Err(AppError::Conflict(
                "Username or phone already registered".to_string(),
            ));
        }

        if let Some(existing) = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id && !u.is_verified)
        {
            existing.username = user.username.clone();
            existing.phone = user.phone.clone();
            existing.email = user.email.clone();
            existing.password_hash = user.password_hash.clone();
            existing.otp_hash = user.otp_hash.clone();
            existing.otp_expires_at = user.otp_expires_at;
            existing.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.phone == phone).cloned())
    }

    async fn set_otp(
        &self,
        user_id: &str,
        otp_hash: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut tables = self.write()?;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.otp_hash = otp_hash.map(str::to_string);
            user.otp_expires_at = expires_at;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn mark_verified(&self, user_id: &str) -> Result<()> {
        let mut tables = self.write()?;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.is_verified = true;
            user.otp_hash = None;
            user.otp_expires_at = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(newest_first(&self.read()?.users, |u| u.created_at))
    }
}

// =============================================================================
// REFRESH TOKENS
// =============================================================================

#[async_trait]
impl RefreshTokenRepository for MemoryStore {
    async fn create(&self, token: &RefreshToken) -> Result<()> {
        let mut tables = self.write()?;
        if tables.refresh_tokens.iter().any(|t| t.token == token.token) {
            return Err(AppError::Conflict("Refresh token already stored".to_string()));
        }
        tables.refresh_tokens.push(token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>> {
        Ok(self
            .read()?
            .refresh_tokens
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn rotate(&self, old_id: &str, replacement: &RefreshToken) -> Result<bool> {
        let mut tables = self.write()?;
        if tables.refresh_tokens.iter().any(|t| t.token == replacement.token) {
            return Err(AppError::Conflict("Refresh token already stored".to_string()));
        }

        let Some(old) = tables
            .refresh_tokens
            .iter_mut()
            .find(|t| t.id == old_id && !t.revoked)
        else {
            return Ok(false);
        };
        old.revoked = true;
        old.replaced_by_id = Some(replacement.id.clone());

        tables.refresh_tokens.push(replacement.clone());
        Ok(true)
    }

    async fn revoke(&self, id: &str) -> Result<()> {
        let mut tables = self.write()?;
        if let Some(token) = tables.refresh_tokens.iter_mut().find(|t| t.id == id) {
            token.revoked = true;
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> Result<u64> {
        let mut tables = self.write()?;
        let mut revoked = 0;
        for token in tables
            .refresh_tokens
            .iter_mut()
            .filter(|t| t.user_id == user_id && !t.revoked)
        {
            token.revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<RefreshToken>> {
        let tables = self.read()?;
        let tokens: Vec<RefreshToken> = tables
            .refresh_tokens
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(&tokens, |t| t.created_at))
    }
}

// =============================================================================
// PROFILES
// =============================================================================

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.read()?.profiles.get(user_id).cloned())
    }

    async fn find_children(&self, user_id: &str) -> Result<Vec<Child>> {
        Ok(self
            .read()?
            .children
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save(&self, profile: &Profile, children: &[Child]) -> Result<()> {
        let mut tables = self.write()?;
        tables
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        tables.children.retain(|c| c.user_id != profile.user_id);
        tables.children.extend(children.iter().cloned());
        Ok(())
    }
}

// =============================================================================
// SEMINARS
// =============================================================================

#[async_trait]
impl SeminarRepository for MemoryStore {
    async fn create(&self, seminar: &Seminar) -> Result<()> {
        let mut tables = self.write()?;
        if tables.seminars.iter().any(|s| s.id == seminar.id) {
            return Err(AppError::Conflict("Seminar already exists".to_string()));
        }
        tables.seminars.push(seminar.clone());
        Ok(())
    }

    async fn update(&self, seminar: &Seminar) -> Result<()> {
        let mut tables = self.write()?;
        if let Some(existing) = tables.seminars.iter_mut().find(|s| s.id == seminar.id) {
            *existing = seminar.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tables = self.write()?;
        let before = tables.seminars.len();
        tables.seminars.retain(|s| s.id != id);
        Ok(tables.seminars.len() < before)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Seminar>> {
        Ok(self.read()?.seminars.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Seminar>> {
        let mut seminars = self.read()?.seminars.clone();
        seminars.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
        Ok(seminars)
    }
}

// =============================================================================
// BOOKINGS
// =============================================================================

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn reserve(&self, booking: &Booking) -> Result<ReserveOutcome> {
        let mut tables = self.write()?;
        let Some(available) = tables.available_seats(&booking.seminar_id) else {
            return Ok(ReserveOutcome::SeminarNotFound);
        };
        if i64::from(booking.quantity) > available {
            return Ok(ReserveOutcome::Insufficient { available });
        }
        tables.bookings.push(booking.clone());
        Ok(ReserveOutcome::Reserved)
    }

    async fn set_order_id(&self, booking_id: &str, order_id: &str) -> Result<()> {
        let mut tables = self.write()?;
        if let Some(booking) = tables.bookings.iter_mut().find(|b| b.id == booking_id) {
            booking.order_id = Some(order_id.to_string());
            booking.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn confirm_payment(
        &self,
        booking_id: &str,
        payment: &PaymentConfirmation,
        tickets: &[Ticket],
    ) -> Result<ConfirmOutcome> {
        let mut tables = self.write()?;
        let Some(index) = tables.bookings.iter().position(|b| b.id == booking_id) else {
            return Ok(ConfirmOutcome::NotFound);
        };

        let booking = tables.bookings[index].clone();
        match booking.status {
            BookingStatus::Paid => {
                let existing = tables.tickets_for(booking_id);
                return Ok(ConfirmOutcome::AlreadyPaid(booking, existing));
            }
            BookingStatus::Cancelled => return Ok(ConfirmOutcome::Cancelled),
            BookingStatus::Pending => {}
        }

        let available = tables.available_seats(&booking.seminar_id).unwrap_or(0);
        let now = Utc::now();

        if i64::from(booking.quantity) > available {
            let cancelled = &mut tables.bookings[index];
            cancelled.status = BookingStatus::Cancelled;
            cancelled.updated_at = now;
            return Ok(ConfirmOutcome::SoldOut { available });
        }

        let collision = tickets
            .iter()
            .any(|t| tables.tickets.iter().any(|existing| existing.code == t.code));
        if collision {
            return Err(AppError::Conflict(
                "Ticket code collision, please retry".to_string(),
            ));
        }

        let paid = &mut tables.bookings[index];
        paid.status = BookingStatus::Paid;
        paid.payment_id = Some(payment.payment_id.clone());
        paid.order_id = Some(payment.order_id.clone());
        paid.payment_method = payment.method.clone();
        paid.updated_at = now;
        let paid = paid.clone();

        tables.tickets.extend(tickets.iter().cloned());
        Ok(ConfirmOutcome::Confirmed(paid, tickets.to_vec()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        Ok(self.read()?.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn tickets_for(&self, booking_id: &str) -> Result<Vec<Ticket>> {
        Ok(self.read()?.tickets_for(booking_id))
    }

    async fn paid_seats(&self, seminar_id: &str) -> Result<i64> {
        Ok(self.read()?.paid_seats(seminar_id))
    }

    async fn paid_seat_totals(&self) -> Result<HashMap<String, i64>> {
        let tables = self.read()?;
        let mut totals = HashMap::new();
        for booking in tables
            .bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Paid)
        {
            *totals.entry(booking.seminar_id.clone()).or_insert(0) += i64::from(booking.quantity);
        }
        Ok(totals)
    }

    async fn count_for_seminar(&self, seminar_id: &str) -> Result<i64> {
        let count = self
            .read()?
            .bookings
            .iter()
            .filter(|b| b.seminar_id == seminar_id)
            .count();
        Ok(count as i64)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<BookingSummary>> {
        let tables = self.read()?;
        let own: Vec<Booking> = tables
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(&own, |b| b.created_at)
            .iter()
            .map(|b| tables.summarize(b))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<BookingSummary>> {
        let tables = self.read()?;
        Ok(newest_first(&tables.bookings, |b| b.created_at)
            .iter()
            .map(|b| tables.summarize(b))
            .collect())
    }
}

// =============================================================================
// INQUIRIES
// =============================================================================

#[async_trait]
impl InquiryRepository for MemoryStore {
    async fn create(&self, inquiry: &Inquiry) -> Result<()> {
        self.write()?.inquiries.push(inquiry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>> {
        Ok(self.read()?.inquiries.iter().find(|i| i.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Inquiry>> {
        Ok(newest_first(&self.read()?.inquiries, |i| i.created_at))
    }

    async fn update_status(&self, id: &str, status: InquiryStatus) -> Result<()> {
        let mut tables = self.write()?;
        if let Some(inquiry) = tables.inquiries.iter_mut().find(|i| i.id == id) {
            inquiry.status = status;
            inquiry.updated_at = Utc::now();
        }
        Ok(())
    }
}

// =============================================================================
// BLOGS
// =============================================================================

#[async_trait]
impl BlogRepository for MemoryStore {
    async fn create(&self, blog: &Blog) -> Result<()> {
        let mut tables = self.write()?;
        if tables.blogs.iter().any(|b| b.slug == blog.slug) {
            return Err(AppError::Conflict(
                "A post with this slug already exists".to_string(),
            ));
        }
        tables.blogs.push(blog.clone());
        Ok(())
    }

    async fn update(&self, blog: &Blog) -> Result<()> {
        let mut tables = self.write()?;
        if tables
            .blogs
            .iter()
            .any(|b| b.slug == blog.slug && b.id != blog.id)
        {
            return Err(AppError::Conflict(
                "A post with this slug already exists".to_string(),
            ));
        }
        if let Some(existing) = tables.blogs.iter_mut().find(|b| b.id == blog.id) {
            *existing = blog.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tables = self.write()?;
        let before = tables.blogs.len();
        tables.blogs.retain(|b| b.id != id);
        Ok(tables.blogs.len() < before)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Blog>> {
        Ok(self.read()?.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        Ok(self.read()?.blogs.iter().find(|b| b.slug == slug).cloned())
    }

    async fn list(&self, published_only: bool) -> Result<Vec<Blog>> {
        let tables = self.read()?;
        let blogs: Vec<Blog> = tables
            .blogs
            .iter()
            .filter(|b| b.published || !published_only)
            .cloned()
            .collect();
        Ok(newest_first(&blogs, |b| b.created_at))
    }
}
