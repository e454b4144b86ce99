// Edit-distance similarity - scores how close a spoken phrase is to a known name

use strsim::normalized_levenshtein;

/// Normalized Levenshtein similarity between two strings (0.0 to 1.0)
///
/// Computed as `1 - distance / max(len(a), len(b))` with lengths counted in
/// chars and unit cost for insert, delete and substitute. Two empty strings
/// are identical and score 1.0.
///
/// Resolver thresholds are tuned against this exact metric, so it must not be
/// swapped for an approximate one.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

#[cfg(test)]
#[path = "similarity_test.rs"]
mod tests;
