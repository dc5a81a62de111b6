//! Request path construction for the Indico HTTP API.

use url::form_urlencoded;

/// Append `params` to `path` as an urlencoded query string.
///
/// Returns `path` untouched when there is nothing to encode. With
/// `only_public`, `onlypublic=yes` is appended after the caller's params.
pub fn build_indico_request(path: &str, params: &[(&str, &str)], only_public: bool) -> String {
    let mut items: Vec<(&str, &str)> = params.to_vec();
    if only_public {
        items.push(("onlypublic", "yes"));
    }

    if items.is_empty() {
        return path.to_string();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(items)
        .finish();

    format!("{path}?{query}")
}
