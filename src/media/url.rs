//! URL normalization

use url::form_urlencoded;

const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=";

/// Rewrite a URL that carries a `list` query parameter into the canonical
/// playlist URL so the engine treats it as a list.
///
/// URLs without a non-empty `list` parameter are returned unchanged. The
/// input is not validated; malformed URLs pass through to the engine.
pub fn normalize_url(raw: &str) -> String {
    match playlist_id(raw) {
        Some(id) => format!("{}{}", PLAYLIST_URL, encode_component(&id)),
        None => raw.to_string(),
    }
}

/// First non-empty `list` value in the query string, if any
pub fn playlist_id(raw: &str) -> Option<String> {
    let query = raw.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or_default();

    form_urlencoded::parse(query.as_bytes())
        .find(|(k, v)| k == "list" && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
