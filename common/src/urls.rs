//! URL helpers shared by the scoring endpoint and its client.

use url::Url;

/// Query parameters removed before a URL is submitted for analysis.
const STRIPPED_PARAMS: [&str; 2] = ["javascript", "data"];

/// True when `raw` is an absolute `http` or `https` URL.
pub fn validate_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Drop the `javascript` and `data` query parameters, keeping every other
/// parameter in order. Input that does not parse is returned unchanged.
pub fn sanitize_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !STRIPPED_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    url.into()
}

/// Hostname of `raw`, or `"Unknown"` when it does not parse or has no host.
pub fn extract_domain(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}
