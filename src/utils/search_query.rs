// Builds the expression handed to `to_tsquery('english', $1)`.

/// Characters with meaning inside a tsquery. Leaving them in user input turns
/// a harmless keyword into a syntax error or an unintended operator.
const TSQUERY_OPERATORS: &[char] = &['&', '|', '!', '(', ')', ':', '*', '<', '>', '\'', '\\', '"'];

/// Splits `keyword` on whitespace and AND-joins every surviving term, so a
/// row must match all of them. Returns `None` when nothing searchable is left,
/// which callers treat as an empty search.
pub fn build_tsquery(keyword: &str) -> Option<String> {
    let terms: Vec<String> = keyword
        .split_whitespace()
        .map(|token| token.chars().filter(|c| !TSQUERY_OPERATORS.contains(c)).collect::<String>())
        .filter(|token| !token.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" & "))
    }
}

/// Term list the expression was built from, lowercased. Used for logging and
/// by in-memory stores that need to evaluate the same predicate.
pub fn tsquery_terms(expression: &str) -> Vec<String> {
    expression
        .split('&')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}
