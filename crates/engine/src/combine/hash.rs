/// Order- and whitespace-insensitive fingerprint of a query expression.
///
/// Different sources render an equivalent query differently: one may wrap the
/// whole expression in parens, reformat whitespace, or reorder label
/// matchers. Stripping one enclosing paren layer, dropping whitespace and
/// sorting the remaining characters compares the character multiset instead.
/// Collisions are accepted false-positive matches.
pub fn hash_query(query: &str) -> String {
    let mut query = query;
    let bytes = query.as_bytes();
    if query.len() > 1 && bytes[0] == b'(' && bytes[bytes.len() - 1] == b')' {
        query = &query[1..query.len() - 1];
    }

    let mut chars: Vec<char> = query.chars().filter(|c| !c.is_whitespace()).collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}
