//! Checksum calculation for change detection on availability records.

use sha2::{Digest, Sha256};

use crate::api::AvailabilityRecord;

/// Calculate SHA-256 checksum of JSON content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checksum of the canonical JSON form of a record.
///
/// Field order is fixed by the record's type and days are always emitted
/// Sunday-first by the mapper, so equal profiles hash equally.
pub fn record_checksum(record: &AvailabilityRecord) -> String {
    // Serializing plain structs of strings and integers cannot fail.
    let content = serde_json::to_string(record).unwrap_or_default();
    calculate_checksum(&content)
}
