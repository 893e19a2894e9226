//! Coupon code and display-name generation.
//!
//! Codes are `prefix + NNN + XXXXXX`: a zero-padded number in `0..1000`
//! followed by six uppercase base-36 characters. The generator is not
//! cryptographically secure and collisions are possible, so callers check
//! candidates against the codes they already know about.

use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of the random tail appended to a prefix by [`generate_code`].
pub const CODE_SUFFIX_LEN: usize = 3 + 6;

/// Generates a coupon code using the thread-local RNG.
#[must_use]
pub fn generate_code(prefix: &str) -> String {
    generate_code_with(&mut rand::rng(), prefix)
}

/// Generates a coupon code from the supplied RNG.
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    let number = rng.random_range(0..1000u32);
    let tail = base36_string(rng, 6);
    format!("{prefix}{number:03}{tail}")
}

/// Display name for the `iteration`-th coupon (1-based) of a batch.
#[must_use]
pub fn generate_name(prefix: &str, iteration: u32, total: u32) -> String {
    format!("{prefix} {iteration} of {total}")
}

/// Replacement code used after the remote store reports a duplicate.
///
/// `stamp` is a timestamp fragment fixed for the unit being created and
/// `attempt` the 1-based create attempt that just failed.
pub fn conflict_code<R: Rng + ?Sized>(rng: &mut R, prefix: &str, stamp: u64, attempt: u32) -> String {
    let tail = base36_string(rng, 4);
    format!("{prefix}{stamp}{attempt}{tail}")
}

/// Like [`conflict_code`] with an `X` marker after the prefix, used when the
/// plain replacement collides with a code already tracked.
pub fn conflict_code_escalated<R: Rng + ?Sized>(
    rng: &mut R,
    prefix: &str,
    stamp: u64,
    attempt: u32,
) -> String {
    let tail = base36_string(rng, 4);
    format!("{prefix}X{stamp}{attempt}{tail}")
}

/// Last four decimal digits of the current epoch milliseconds.
#[must_use]
pub fn timestamp_fragment() -> u64 {
    let millis = chrono::Utc::now().timestamp_millis().unsigned_abs();
    millis % 10_000
}

fn base36_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect()
}
