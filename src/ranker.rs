use crate::matcher::MatchResult;

/// Orders matches best first.
///
/// `sort_by` is stable, so equal coverage keeps the incoming (catalog) order
/// and ranking a ranked list changes nothing.
pub fn rank(mut results: Vec<MatchResult>) -> Vec<MatchResult> {
    results.sort_by(|a, b| b.coverage.total_cmp(&a.coverage));
    results
}
