pub mod cookies;
pub mod export;
pub mod guard;
pub mod hashing;
pub mod jwt;
pub mod metrics;
pub mod otp;
pub mod payment;
pub mod rate_limit;
pub mod security;
pub mod sms;
pub mod tickets;
