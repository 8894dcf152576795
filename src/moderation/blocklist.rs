/// Known regional-discrimination terms and their common spelling variants.
/// Matching any of these is a deterministic block that no later stage can
/// overturn.
const REGIONAL_TERMS: &[&str] = &[
    "backy",
    "bắc kỳ",
    "namky",
    "nam kỳ",
    "trungky",
    "trung kỳ",
];

pub fn matches_regional_term(comment: &str) -> bool {
    let lower = comment.to_lowercase();
    REGIONAL_TERMS.iter().any(|term| lower.contains(term))
}
