//! Claude.ai endpoint and request-header construction.
//!
//! The remote service expects requests shaped like a browser tab's: the
//! session key travels in a cookie header and a fixed set of descriptive
//! headers (user-agent, origin, referer, fetch metadata) accompanies every
//! call. Endpoints are built against an injectable base URL so tests can
//! point the client at a local mock server.

use crate::traits::Headers;

/// Default base URL for the Claude.ai backend.
pub const DEFAULT_BASE_URL: &str = "https://claude.ai";

/// Descriptive headers the remote service expects of a browser-origin
/// request. The cookie header is added per request on top of these.
const BROWSER_HEADERS: [(&str, &str); 8] = [
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    ),
    ("accept", "application/json"),
    ("accept-language", "en-US,en;q=0.9"),
    ("origin", "https://claude.ai"),
    ("referer", "https://claude.ai/chats"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
];

/// Shape the stored token into a cookie header value.
///
/// A token containing `=` is assumed to be a fully formatted cookie string
/// and passes through verbatim; a bare token is wrapped as `sessionKey=`.
pub fn cookie_value(token: &str) -> String {
    if token.contains('=') {
        token.to_string()
    } else {
        format!("sessionKey={token}")
    }
}

/// Build the header map for a request carrying the given session token.
pub fn request_headers(token: &str) -> Headers {
    let mut headers: Headers = BROWSER_HEADERS
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    headers.insert("cookie".to_string(), cookie_value(token));
    headers
}

/// `GET` endpoint listing the account's organizations.
pub fn organizations_url(base: &str) -> String {
    format!("{}/api/organizations", base.trim_end_matches('/'))
}

/// `POST` endpoint creating a conversation within an organization.
pub fn conversations_url(base: &str, organization_id: &str) -> String {
    format!(
        "{}/api/organizations/{organization_id}/chat_conversations",
        base.trim_end_matches('/')
    )
}

/// `POST` endpoint streaming a completion for one conversation.
pub fn completion_url(base: &str, organization_id: &str, conversation_id: &str) -> String {
    format!(
        "{}/api/organizations/{organization_id}/chat_conversations/{conversation_id}/completion",
        base.trim_end_matches('/')
    )
}
