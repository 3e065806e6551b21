//! Fuzzy matching suggestions for mistyped function names

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// All functions a value expression may call
pub const AVAILABLE_FUNCTIONS: &[&str] = &[
    // Static context
    "Now",
    "NowFmt",
    "TrimSpace",
    "Trim",
    "Lower",
    "Upper",
    "Base64Encode",
    "Base64Decode",
    "Sha256",
    "RandomString",
    // Config context
    "ConfigOption",
    "ConfigOptionEquals",
    "ConfigOptionNotEquals",
    "ConfigOptionData",
];

/// Find the closest candidates, best first
pub fn find_closest_matches<'a>(
    input: &str,
    candidates: &[&'a str],
    max_results: usize,
) -> Vec<&'a str> {
    let mut matches: Vec<(usize, &str)> = candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = strsim::levenshtein(input, candidate);
            (distance <= MAX_SUGGESTION_DISTANCE && distance > 0).then_some((distance, candidate))
        })
        .collect();

    matches.sort_by_key(|(distance, _)| *distance);
    matches.truncate(max_results);
    matches.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Suggest corrections for an unknown function
pub fn suggest_unknown_function(func_name: &str) -> Option<String> {
    let matches = find_closest_matches(func_name, AVAILABLE_FUNCTIONS, 3);

    if !matches.is_empty() {
        let suggestions: Vec<String> = matches.iter().map(|s| format!("`{}`", s)).collect();
        Some(format!("Did you mean {}?", suggestions.join(" or ")))
    } else {
        Some(format!(
            "Unknown function `{}`. Available functions: {}",
            func_name,
            AVAILABLE_FUNCTIONS.join(", ")
        ))
    }
}
