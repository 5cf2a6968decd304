use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hasher;
use twox_hash::XxHash64;
use uuid::Uuid;

use crate::models::Identifiable;

/// Hashes serializable data into an i64 using CBOR serialization and XxHash64.
///
/// The result is stable across runs and hosts, which makes it usable as a
/// Postgres advisory lock key shared by every process touching the same row set.
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let mut hasher = XxHash64::with_seed(0);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}

/// Advisory lock key guarding one student's edge set.
pub fn student_lock_key(student_id: Uuid) -> Result<i64, String> {
    hash_as_i64(&("guardian_student", student_id))
}

/// Canonical form of a phone number used for guardian dedup.
///
/// Strips spaces, dashes, dots and parentheses; keeps a leading `+`.
pub fn normalize_phone_number(phone_number: &str) -> String {
    let trimmed = phone_number.trim();
    let mut normalized = String::with_capacity(trimmed.len());
    for (i, c) in trimmed.chars().enumerate() {
        match c {
            '+' if i == 0 => normalized.push(c),
            c if c.is_ascii_digit() => normalized.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            c => normalized.push(c),
        }
    }
    normalized
}

/// Reorders `items` to follow `ids`, with `None` for ids that were not found.
pub fn order_by_ids<T: Identifiable>(ids: &[Uuid], items: Vec<T>) -> Vec<Option<T>> {
    let mut map: HashMap<Uuid, T> = items.into_iter().map(|item| (item.get_id(), item)).collect();
    ids.iter().map(|id| map.remove(id)).collect()
}
