/// Prefixes `http://` onto a URL that carries neither an `http://` nor an `https://` scheme
pub fn ensure_http_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}
