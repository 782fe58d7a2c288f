use rand::Rng;

use super::hashing::{constant_time_eq, sha256_hex};

pub const OTP_LENGTH: usize = 6;

/// Random numeric one-time code, zero padded.
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{:06}", code)
}

pub fn hash_otp(code: &str) -> String {
    sha256_hex(code.trim())
}

pub fn otp_matches(code: &str, stored_hash: &str) -> bool {
    constant_time_eq(hash_otp(code).as_bytes(), stored_hash.as_bytes())
}
