//! Short identifier generation.
//!
//! Identifiers are drawn uniformly from the 64-character URL-safe alphabet
//! (`A-Z a-z 0-9 _ -`), the same alphabet nanoid uses.

/// URL-safe alphabet. Its length divides 256, so `byte % 64` is unbiased.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Default identifier length.
pub const DEFAULT_ID_LENGTH: usize = 7;

/// Generates a random identifier of exactly `length` characters.
///
/// Uses `getrandom` for entropy.
///
/// # Errors
///
/// Returns an error if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let id = generate_id(7)?;
/// assert_eq!(id.len(), 7);
/// assert!(is_valid_id(&id));
/// ```
pub fn generate_id(length: usize) -> Result<String, getrandom::Error> {
    let mut buffer = vec![0u8; length];
    getrandom::fill(&mut buffer)?;

    Ok(buffer
        .into_iter()
        .map(|b| ALPHABET[(b as usize) % ALPHABET.len()] as char)
        .collect())
}

/// Returns true if `id` is non-empty and made only of alphabet characters.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| ALPHABET.contains(&b))
}
