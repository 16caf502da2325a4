// 🪣 Key-Grouping Engine - flat batch result → one bucket per requested key
//
// A batch query returns rows for many keys at once. Callers need them back
// aligned with the keys they asked for: bucket i belongs to keys[i], a key
// without rows still gets an (empty) bucket, and rows keep their input order.

use std::collections::HashMap;
use std::hash::Hash;

/// A record that can be bucketed by a discriminator value.
///
/// Replaces a runtime field-name lookup: a record type that cannot name its
/// discriminator does not compile.
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> &Self::Key;
}

/// Group `records` into one bucket per entry of `keys`.
///
/// - output length == `keys.len()`, same order
/// - duplicate keys each receive their own copy of the bucket
/// - records whose key was not requested are dropped
///
/// Runs in O(R + K): one pass to index records, one pass over the keys.
pub fn group_by<R>(keys: &[R::Key], records: Vec<R>) -> Vec<Vec<R>>
where
    R: Keyed + Clone,
{
    let mut index: HashMap<R::Key, Vec<R>> = HashMap::new();
    for record in records {
        index.entry(record.key().clone()).or_default().push(record);
    }

    // Last occurrence of a key takes the bucket, earlier duplicates clone it.
    let mut remaining: HashMap<&R::Key, usize> = HashMap::with_capacity(keys.len());
    for key in keys {
        *remaining.entry(key).or_insert(0) += 1;
    }

    let mut buckets = Vec::with_capacity(keys.len());
    for key in keys {
        let left = remaining
            .get_mut(key)
            .map(|n| {
                *n -= 1;
                *n
            })
            .unwrap_or(0);

        let bucket = if left == 0 {
            index.remove(key).unwrap_or_default()
        } else {
            index.get(key).cloned().unwrap_or_default()
        };
        buckets.push(bucket);
    }

    if !index.is_empty() {
        let dropped: usize = index.values().map(Vec::len).sum();
        tracing::warn!(
            dropped,
            keys = index.len(),
            "dropping rows for keys that were not requested"
        );
    }

    buckets
}
