use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

const ALGORITHM: &str = "sha256";
const SALT_LENGTH: usize = 22;

/// Hashes `password` as `sha256$<rounds>$<salt>$<hex digest>`.
pub fn hash_password(password: &str, rounds: u32) -> String {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();
    let rounds = rounds.max(1);
    let hashed = digest(password, &salt, rounds);
    format!("{}${}${}${}", ALGORITHM, rounds, salt, hashed)
}

/// Checks `password` against a stored hash. A hash this module did not
/// produce never verifies.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.splitn(4, '$');
    let (algorithm, rounds, salt, expected) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(r), Some(s), Some(d)) => (a, r, s, d),
        _ => return false,
    };
    if algorithm != ALGORITHM {
        return false;
    }
    match rounds.parse::<u32>() {
        Ok(rounds) if rounds > 0 => {
            constant_time_eq(digest(password, salt, rounds).as_bytes(), expected.as_bytes())
        }
        _ => false,
    }
}

fn digest(password: &str, salt: &str, rounds: u32) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..rounds {
        digest = Sha256::new()
            .chain_update(salt.as_bytes())
            .chain_update(digest)
            .finalize();
    }
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
