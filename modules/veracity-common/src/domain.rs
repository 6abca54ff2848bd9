use url::Url;

/// Host of a URL, lowercased. Falls back to a plain split when the input does
/// not parse as an absolute URL (e.g. `example.com/path`).
pub fn extract_domain(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            return host.to_lowercase();
        }
    }
    url.split("://")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Normalize a source string (bare domain, host with port, or full URL) for
/// trust matching: lowercase, no scheme/path/port, no leading `www.`, no
/// trailing dot. Returns `None` when nothing usable remains.
pub fn normalize_domain(source: &str) -> Option<String> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return None;
    }

    let host = extract_domain(trimmed);
    let host = host.split(':').next().unwrap_or("");
    let host = host.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}
