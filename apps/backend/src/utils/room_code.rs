//! Room code generation.
//!
//! Room codes are 5-character strings of upper-case letters and digits,
//! short enough to read out across a table.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const ROOM_CODE_LEN: usize = 5;

/// Generate a room code from the thread-local RNG.
pub fn generate_room_code() -> String {
    generate_room_code_with(&mut rand::rng())
}

pub fn generate_room_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Normalize a user-typed code: trimmed and upper-cased.
pub fn normalize_room_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
