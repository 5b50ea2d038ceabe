/// Build a search link asking to explain `keyword`, with the summary as context.
///
/// Returns `None` for a blank keyword.
pub fn keyword_search_url(base: &str, keyword: &str, summary: Option<&str>) -> Option<String> {
    if keyword.trim().is_empty() {
        return None;
    }

    let mut query = format!("Explain the concept of \"{}\"", keyword);
    if let Some(context) = summary.map(str::trim).filter(|s| !s.is_empty()) {
        query.push_str(&format!(" in the context of: \"{}\"", context));
    }

    Some(format!("{}?q={}", base, urlencoding::encode(&query)))
}
