use std::collections::HashSet;
use std::hash::Hash;

/// Drop exact repeats, keeping the first occurrence and the original order.
/// Returns the surviving rows and how many were dropped.
pub fn dedupe_exact<T>(rows: Vec<T>) -> (Vec<T>, usize)
where
    T: Hash + Eq + Clone,
{
    let mut seen = HashSet::with_capacity(rows.len());
    let total = rows.len();
    let unique: Vec<T> = rows.into_iter().filter(|row| seen.insert(row.clone())).collect();
    let dropped = total - unique.len();
    (unique, dropped)
}
