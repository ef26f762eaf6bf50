//! Secret, session-cookie and CSRF token generation.
//!
//! Tokens are strings over Crockford's Base32 alphabet drawn from the
//! game's random source, so seeded games produce reproducible links.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const SECRET_LEN: usize = 20;
pub const COOKIE_LEN: usize = 32;
pub const CSRF_LEN: usize = 24;

fn token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut s = String::with_capacity(len);
    for _ in 0..len {
        s.push(CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char);
    }
    s
}

/// Secret embedded in a player's private link.
pub fn generate_secret<R: Rng + ?Sized>(rng: &mut R) -> String {
    token(rng, SECRET_LEN)
}

/// Opaque value of the session-recovery cookie.
pub fn generate_cookie<R: Rng + ?Sized>(rng: &mut R) -> String {
    token(rng, COOKIE_LEN)
}

pub fn generate_csrf_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    token(rng, CSRF_LEN)
}

/// Short public digest of an invite secret. Safe to show to other players:
/// the secret cannot be recovered from it.
pub fn public_digest(secret: &str) -> String {
    let hash = blake3::hash(secret.as_bytes());
    hash.to_hex()[..10].to_string()
}

/// Constant-time comparison for secrets supplied by clients.
pub fn tokens_match(expected: &str, supplied: &str) -> bool {
    let (a, b) = (expected.as_bytes(), supplied.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
