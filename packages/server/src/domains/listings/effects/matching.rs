//! Pairwise matching rules for duplicate listings.
//!
//! Only strong signals count. Two distinct businesses on the same street or
//! sharing a switchboard number must never be paired, so every rule requires
//! either an exact normalized name or a near-identical one.

use crate::common::utils::{digits_only, normalize_text, token_set_similarity};
use crate::domains::listings::models::Listing;

/// Token similarity above which two addresses count as the same place
pub const ADDRESS_SIMILARITY_THRESHOLD: f64 = 0.70;

/// Token similarity above which two names count as the same business
pub const NAME_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Number of trailing digits compared, so country-code prefixes are ignored
const PHONE_DIGITS: usize = 10;

/// Same place: exact, one contains the other, or strong word overlap.
/// Expects normalized input; empty never matches.
pub fn addresses_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b
        || a.contains(b)
        || b.contains(a)
        || token_set_similarity(a, b) > ADDRESS_SIMILARITY_THRESHOLD
}

/// Compare the last 10 digits; both numbers need at least 10.
pub fn phones_match(a: &str, b: &str) -> bool {
    let a = digits_only(a);
    let b = digits_only(b);
    if a.len() < PHONE_DIGITS || b.len() < PHONE_DIGITS {
        return false;
    }
    a[a.len() - PHONE_DIGITS..] == b[b.len() - PHONE_DIGITS..]
}

/// Normalized fields of a listing, computed once per grouping pass.
#[derive(Debug, Clone)]
pub struct MatchKey {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl MatchKey {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            name: normalize_text(&listing.business_name),
            address: normalize_text(&listing.address),
            phone: listing.phone.clone().unwrap_or_default(),
        }
    }

    /// Any of:
    /// (a) same name and same address
    /// (b) same phone and same name
    /// (c) near-identical name and same address
    pub fn is_duplicate_of(&self, other: &MatchKey) -> bool {
        let same_name = !self.name.is_empty() && self.name == other.name;
        let same_address = addresses_match(&self.address, &other.address);

        if same_name && same_address {
            return true;
        }
        if same_name && phones_match(&self.phone, &other.phone) {
            return true;
        }
        same_address && token_set_similarity(&self.name, &other.name) > NAME_SIMILARITY_THRESHOLD
    }
}
