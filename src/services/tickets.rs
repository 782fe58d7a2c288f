use std::collections::HashSet;

use rand::Rng;

pub const TICKET_PREFIX: &str = "STT-";
const CODE_LENGTH: usize = 10;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_ticket_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..CODE_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    format!("{}{}", TICKET_PREFIX, suffix)
}

/// `count` codes, pairwise distinct.
pub fn generate_ticket_codes(count: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(count);
    let mut codes = Vec::with_capacity(count);

    while codes.len() < count {
        let code = generate_ticket_code();
        if seen.insert(code.clone()) {
            codes.push(code);
        }
    }

    codes
}
