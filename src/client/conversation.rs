//! The conversation client and its bootstrap state machine.

use uuid::Uuid;

use crate::api;
use crate::error::ChatError;
use crate::models::{
    CompletionRequest, ConversationCreated, Message, NewConversation, OrganizationSummary,
};
use crate::sse::{SseDecoder, StreamEvent};
use crate::traits::{DisplayEvent, DisplaySink, Headers, HttpClient, SessionStore};

use futures_util::StreamExt;

/// Chat client over a captured browser session key.
///
/// One instance drives one logical conversation. The organization is
/// resolved once per instance lifetime and cached in memory only; the
/// conversation is created lazily on the first send and replaced wholesale
/// by [`ChatClient::reset_conversation`]. The session key is re-fetched
/// from the store on every send - it may have been changed or cleared
/// out-of-band between calls.
///
/// `send_prompt` takes `&mut self`, so two sends can never interleave their
/// chunk events on one instance; callers wanting cross-task access wrap the
/// client in a mutex, which serializes sends the same way. Dropping the
/// client (or an in-flight send future) tears the stream down and stops
/// further display events.
///
/// # Example
///
/// ```ignore
/// use claw::adapters::{FileSessionStore, ReqwestHttpClient, TerminalDisplay};
/// use claw::client::ChatClient;
///
/// let mut client = ChatClient::new(
///     ReqwestHttpClient::new(),
///     FileSessionStore::new()?,
///     TerminalDisplay::new(),
/// );
/// client.send_prompt("Explain lifetimes in one paragraph").await;
/// ```
pub struct ChatClient<H, S, D> {
    http: H,
    store: S,
    display: D,
    base_url: String,
    timezone: String,
    organization_id: Option<String>,
    conversation_id: Option<String>,
    history: Vec<Message>,
}

impl<H, S, D> ChatClient<H, S, D>
where
    H: HttpClient,
    S: SessionStore,
    D: DisplaySink,
{
    /// Create a client against the production base URL and host timezone.
    pub fn new(http: H, store: S, display: D) -> Self {
        Self {
            http,
            store,
            display,
            base_url: api::DEFAULT_BASE_URL.to_string(),
            timezone: detect_timezone(),
            organization_id: None,
            conversation_id: None,
            history: Vec::new(),
        }
    }

    /// Override the base URL (tests point this at a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the IANA timezone sent with completion requests.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// The transcript so far, in insertion order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The active conversation identifier, if one was created.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Whether a session key is currently stored. Pure read, no side
    /// effects; store errors read as "not authenticated".
    pub async fn check_auth_status(&self) -> bool {
        matches!(self.store.get().await, Ok(Some(_)))
    }

    /// Emit the `CookieStatus` banner event reflecting the current store.
    pub async fn publish_auth_status(&mut self) {
        let has_cookie = self.check_auth_status().await;
        self.display.handle(DisplayEvent::CookieStatus { has_cookie });
    }

    /// Clear the conversation identifier and the full transcript.
    ///
    /// Both are replaced in one step - there is no state in which the old
    /// identifier pairs with a cleared history. The cached organization and
    /// the stored credential are untouched, so the next send creates a
    /// fresh conversation without re-resolving the organization.
    pub fn reset_conversation(&mut self) {
        self.conversation_id = None;
        self.history.clear();
        self.display.handle(DisplayEvent::ClearChat);
    }

    /// Send a user prompt and stream the assistant's reply to the display.
    ///
    /// A prompt that is empty after trimming is a deliberate no-op: no
    /// display events, no network calls. Otherwise the call ends with
    /// exactly one terminal display event - `Done` on success, `Error` on
    /// any failure - and a failure never records a partial assistant
    /// message. The client stays reusable after a failure: a cached
    /// organization survives a failed conversation creation, while a failed
    /// organization resolution caches nothing.
    pub async fn send_prompt(&mut self, text: &str) {
        let prompt = text.trim();
        if prompt.is_empty() {
            return;
        }

        if let Err(err) = self.dispatch(prompt).await {
            tracing::warn!(error = %err, "prompt dispatch failed");
            self.display.handle(DisplayEvent::Error {
                text: err.to_string(),
            });
        }
    }

    async fn dispatch(&mut self, prompt: &str) -> Result<(), ChatError> {
        // Auth check comes first so the unauthenticated path emits nothing
        // but the error - no transcript mutation, no network calls.
        let session_key = match self.store.get().await {
            Ok(Some(key)) => key,
            _ => return Err(ChatError::NotAuthenticated),
        };

        self.history.push(Message::user(prompt));
        self.display.handle(DisplayEvent::UserMessage {
            text: prompt.to_string(),
        });
        self.display.handle(DisplayEvent::Thinking);

        let organization_id = self.ensure_organization(&session_key).await?;
        let conversation_id = self
            .ensure_conversation(&session_key, &organization_id)
            .await?;

        self.stream_completion(&session_key, &organization_id, &conversation_id, prompt)
            .await
    }

    /// Resolve and cache the organization, if not already cached.
    ///
    /// Any failure leaves the cache empty, forcing a fresh resolution on
    /// the next send.
    async fn ensure_organization(&mut self, session_key: &str) -> Result<String, ChatError> {
        if let Some(id) = &self.organization_id {
            return Ok(id.clone());
        }

        self.display.handle(DisplayEvent::Status {
            text: "resolving organization...".to_string(),
        });

        let organizations = self
            .fetch_organizations(session_key)
            .await
            .map_err(|err| ChatError::Bootstrap(format!("organization lookup failed: {err}")))?;

        let first = organizations.into_iter().next().ok_or_else(|| {
            ChatError::Bootstrap("no organizations available for this account".to_string())
        })?;

        tracing::debug!(organization = %first.uuid, "resolved organization");
        self.organization_id = Some(first.uuid.clone());
        Ok(first.uuid)
    }

    async fn fetch_organizations(
        &self,
        session_key: &str,
    ) -> Result<Vec<OrganizationSummary>, ChatError> {
        let url = api::organizations_url(&self.base_url);
        let response = self.http.get(&url, &api::request_headers(session_key)).await?;

        if !response.is_success() {
            return Err(ChatError::Protocol {
                status: response.status,
                body: response.text_lossy(),
            });
        }

        response.json().map_err(|err| ChatError::Protocol {
            status: response.status,
            body: format!("malformed organization list: {err}"),
        })
    }

    /// Create and cache a conversation, if none is active.
    ///
    /// The identifier is generated client-side (any v4 UUID does - it is
    /// not a security-sensitive value) and the backend adopts it. A failure
    /// here does not evict the cached organization.
    async fn ensure_conversation(
        &mut self,
        session_key: &str,
        organization_id: &str,
    ) -> Result<String, ChatError> {
        if let Some(id) = &self.conversation_id {
            return Ok(id.clone());
        }

        self.display.handle(DisplayEvent::Status {
            text: "creating conversation...".to_string(),
        });

        let created = self
            .create_conversation(session_key, organization_id)
            .await
            .map_err(|err| ChatError::Bootstrap(format!("conversation creation failed: {err}")))?;

        tracing::debug!(conversation = %created, "created conversation");
        self.conversation_id = Some(created.clone());
        Ok(created)
    }

    async fn create_conversation(
        &self,
        session_key: &str,
        organization_id: &str,
    ) -> Result<String, ChatError> {
        let request = NewConversation {
            uuid: Uuid::new_v4().to_string(),
            name: String::new(),
        };
        let body = serde_json::to_string(&request)
            .map_err(|err| ChatError::Bootstrap(format!("failed to encode request: {err}")))?;

        let url = api::conversations_url(&self.base_url, organization_id);
        let mut headers = api::request_headers(session_key);
        headers.insert("content-type".to_string(), "application/json".to_string());

        let response = self.http.post(&url, &body, &headers).await?;
        if !response.is_success() {
            // 403/404 come through here verbatim, status and body intact.
            return Err(ChatError::Protocol {
                status: response.status,
                body: response.text_lossy(),
            });
        }

        let created: ConversationCreated =
            response.json().map_err(|err| ChatError::Protocol {
                status: response.status,
                body: format!("malformed conversation response: {err}"),
            })?;
        Ok(created.uuid)
    }

    /// Open the streaming completion exchange and pump decoded deltas to
    /// the display.
    ///
    /// Only the latest prompt travels on the wire; the backend keeps its
    /// own conversation-side history. The assistant message is appended to
    /// the transcript only after the stream completes - a failure mid-way
    /// records nothing.
    async fn stream_completion(
        &mut self,
        session_key: &str,
        organization_id: &str,
        conversation_id: &str,
        prompt: &str,
    ) -> Result<(), ChatError> {
        self.display.handle(DisplayEvent::StartAssistantMessage);

        let request = CompletionRequest::new(prompt, self.timezone.clone());
        let body = serde_json::to_string(&request)
            .map_err(|err| ChatError::Stream(format!("failed to encode completion: {err}")))?;

        let url = api::completion_url(&self.base_url, organization_id, conversation_id);
        let headers = completion_headers(session_key);

        let mut stream = self
            .http
            .post_stream(&url, &body, &headers)
            .await
            .map_err(ChatError::from_stream_open)?;

        let mut decoder = SseDecoder::new();
        let mut assistant_text = String::new();
        let mut completed = false;

        while let Some(next) = stream.next().await {
            let chunk =
                next.map_err(|err| ChatError::Stream(format!("stream interrupted: {err}")))?;
            for event in decoder.feed(&chunk) {
                match event {
                    StreamEvent::Delta { text } => {
                        assistant_text.push_str(&text);
                        self.display.handle(DisplayEvent::Chunk { text });
                    }
                    StreamEvent::Done => completed = true,
                }
            }
            if completed {
                break;
            }
        }
        drop(stream);

        if !completed {
            // Stream closed without a terminator; drain the final line and
            // take the decoder's synthetic completion.
            for event in decoder.finish() {
                if let StreamEvent::Delta { text } = event {
                    assistant_text.push_str(&text);
                    self.display.handle(DisplayEvent::Chunk { text });
                }
            }
        }

        self.history.push(Message::assistant(assistant_text));
        self.display.handle(DisplayEvent::Done);
        Ok(())
    }
}

/// Headers for the streaming completion exchange.
fn completion_headers(session_key: &str) -> Headers {
    let mut headers = api::request_headers(session_key);
    headers.insert("content-type".to_string(), "application/json".to_string());
    headers.insert("accept".to_string(), "text/event-stream".to_string());
    headers
}

/// Host IANA zone for the completion payload, falling back to UTC.
fn detect_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MemorySessionStore, MockHttpClient, MockResponse, RecordingDisplay};
    use crate::traits::{HttpError, Response};
    use bytes::Bytes;

    const BASE: &str = "https://backend.test";

    fn test_client(
        http: MockHttpClient,
        store: MemorySessionStore,
        display: RecordingDisplay,
    ) -> ChatClient<MockHttpClient, MemorySessionStore, RecordingDisplay> {
        ChatClient::new(http, store, display)
            .with_base_url(BASE)
            .with_timezone("UTC")
    }

    fn json_response(status: u16, body: &str) -> MockResponse {
        MockResponse::Response(Response::new(status, Bytes::from(body.to_string())))
    }

    fn delta_line(text: &str) -> String {
        format!(
            "data: {{\"type\":\"content_block_delta\",\"delta\":{{\"type\":\"text_delta\",\"text\":\"{text}\"}}}}\n"
        )
    }

    fn script_organizations(http: &MockHttpClient) {
        http.script(
            "GET",
            &format!("{BASE}/api/organizations"),
            json_response(200, r#"[{"uuid":"org-1"}]"#),
        );
    }

    fn script_conversation_creation(http: &MockHttpClient) {
        http.script(
            "POST",
            &format!("{BASE}/api/organizations/org-1/chat_conversations"),
            json_response(200, r#"{"uuid":"conv-1"}"#),
        );
    }

    fn script_completion_stream(http: &MockHttpClient, chunks: Vec<Result<Bytes, HttpError>>) {
        http.script(
            "POST",
            &format!("{BASE}/api/organizations/org-1/chat_conversations/conv-1/completion"),
            MockResponse::Stream(chunks),
        );
    }

    fn script_happy_path(http: &MockHttpClient) {
        script_organizations(http);
        script_conversation_creation(http);
        script_completion_stream(
            http,
            vec![
                Ok(Bytes::from(delta_line("Hel"))),
                Ok(Bytes::from(delta_line("lo"))),
                Ok(Bytes::from_static(b"data: [DONE]\n")),
            ],
        );
    }

    fn conversation_creations(http: &MockHttpClient) -> usize {
        http.requests()
            .iter()
            .filter(|request| {
                request.method == "POST" && request.url.ends_with("/chat_conversations")
            })
            .count()
    }

    #[tokio::test]
    async fn test_happy_path_event_sequence_and_history() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();
        script_happy_path(&http);

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            display.clone(),
        );
        client.send_prompt("hi").await;

        let events = display.events();
        assert_eq!(
            events,
            vec![
                DisplayEvent::UserMessage {
                    text: "hi".to_string()
                },
                DisplayEvent::Thinking,
                DisplayEvent::Status {
                    text: "resolving organization...".to_string()
                },
                DisplayEvent::Status {
                    text: "creating conversation...".to_string()
                },
                DisplayEvent::StartAssistantMessage,
                DisplayEvent::Chunk {
                    text: "Hel".to_string()
                },
                DisplayEvent::Chunk {
                    text: "lo".to_string()
                },
                DisplayEvent::Done,
            ]
        );

        assert_eq!(
            client.history(),
            &[Message::user("hi"), Message::assistant("Hello")]
        );
        assert_eq!(client.conversation_id(), Some("conv-1"));
    }

    #[tokio::test]
    async fn test_completion_request_carries_prompt_and_timezone() {
        let http = MockHttpClient::new();
        script_happy_path(&http);

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            RecordingDisplay::new(),
        );
        client.send_prompt("hi").await;

        let completion = http
            .requests()
            .into_iter()
            .find(|request| request.url.ends_with("/completion"))
            .expect("completion request sent");
        let body: serde_json::Value =
            serde_json::from_str(completion.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["prompt"], "hi");
        assert_eq!(body["timezone"], "UTC");
        assert_eq!(
            completion.headers.get("accept"),
            Some(&"text/event-stream".to_string())
        );
        assert_eq!(
            completion.headers.get("cookie"),
            Some(&"sessionKey=sk-ant-abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_token_yields_single_error_and_no_network() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();

        let mut client = test_client(http.clone(), MemorySessionStore::new(), display.clone());
        client.send_prompt("hi").await;

        let events = display.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DisplayEvent::Error { .. }));
        assert!(http.requests().is_empty());
        assert!(client.history().is_empty());
    }

    #[tokio::test]
    async fn test_blank_prompt_is_a_noop() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            display.clone(),
        );
        client.send_prompt("").await;
        client.send_prompt("   ").await;
        client.send_prompt("\n\t").await;

        assert!(display.events().is_empty());
        assert!(http.requests().is_empty());
        assert!(client.history().is_empty());
    }

    #[tokio::test]
    async fn test_second_send_reuses_org_and_conversation() {
        let http = MockHttpClient::new();
        script_happy_path(&http);

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            RecordingDisplay::new(),
        );
        client.send_prompt("first").await;
        client.send_prompt("second").await;

        assert_eq!(http.request_count("GET", "/api/organizations"), 1);
        assert_eq!(conversation_creations(&http), 1);
        assert_eq!(client.history().len(), 4);
    }

    #[tokio::test]
    async fn test_reset_creates_fresh_conversation_without_reresolving_org() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();
        script_happy_path(&http);

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            display.clone(),
        );
        client.send_prompt("hi").await;

        client.reset_conversation();
        assert!(client.history().is_empty());
        assert_eq!(client.conversation_id(), None);
        assert_eq!(display.events().last(), Some(&DisplayEvent::ClearChat));

        client.send_prompt("again").await;
        assert_eq!(http.request_count("GET", "/api/organizations"), 1);
        assert_eq!(conversation_creations(&http), 2);
    }

    #[tokio::test]
    async fn test_empty_organization_list_fails_and_caches_nothing() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();
        http.script(
            "GET",
            &format!("{BASE}/api/organizations"),
            json_response(200, "[]"),
        );

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            display.clone(),
        );
        client.send_prompt("hi").await;

        let events = display.events();
        match events.last() {
            Some(DisplayEvent::Error { text }) => {
                assert!(text.contains("no organizations"), "got: {text}")
            }
            other => panic!("expected terminal error, got {other:?}"),
        }

        // Nothing cached: the retry resolves again.
        script_happy_path(&http);
        client.send_prompt("hi").await;
        assert_eq!(http.request_count("GET", "/api/organizations"), 2);
        assert_eq!(display.events().last(), Some(&DisplayEvent::Done));
    }

    #[tokio::test]
    async fn test_failed_creation_keeps_org_cached_and_surfaces_status_verbatim() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();
        script_organizations(&http);
        http.script(
            "POST",
            &format!("{BASE}/api/organizations/org-1/chat_conversations"),
            json_response(403, "Invalid session"),
        );

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            display.clone(),
        );
        client.send_prompt("hi").await;

        match display.events().last() {
            Some(DisplayEvent::Error { text }) => {
                assert!(text.contains("403"), "got: {text}");
                assert!(text.contains("Invalid session"), "got: {text}");
            }
            other => panic!("expected terminal error, got {other:?}"),
        }

        // Organization survives the failed creation.
        script_conversation_creation(&http);
        script_completion_stream(&http, vec![Ok(Bytes::from_static(b"data: [DONE]\n"))]);
        client.send_prompt("hi").await;
        assert_eq!(http.request_count("GET", "/api/organizations"), 1);
        assert_eq!(conversation_creations(&http), 2);
    }

    #[tokio::test]
    async fn test_mid_stream_error_records_no_assistant_message() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();
        script_organizations(&http);
        script_conversation_creation(&http);
        script_completion_stream(
            &http,
            vec![
                Ok(Bytes::from(delta_line("Hel"))),
                Err(HttpError::Io("connection reset".to_string())),
            ],
        );

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            display.clone(),
        );
        client.send_prompt("hi").await;

        let events = display.events();
        assert!(matches!(events.last(), Some(DisplayEvent::Error { .. })));
        // The partial delta reached the display but never the transcript.
        assert!(events.contains(&DisplayEvent::Chunk {
            text: "Hel".to_string()
        }));
        assert_eq!(client.history(), &[Message::user("hi")]);
    }

    #[tokio::test]
    async fn test_stream_without_terminator_completes_synthetically() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();
        script_organizations(&http);
        script_conversation_creation(&http);
        script_completion_stream(&http, vec![Ok(Bytes::from(delta_line("All of it")))]);

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sk-ant-abc"),
            display.clone(),
        );
        client.send_prompt("hi").await;

        assert_eq!(display.events().last(), Some(&DisplayEvent::Done));
        assert_eq!(
            client.history().last(),
            Some(&Message::assistant("All of it"))
        );
    }

    #[tokio::test]
    async fn test_token_cleared_between_sends_is_refetched() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();
        script_happy_path(&http);

        let store = MemorySessionStore::with_key("sk-ant-abc");
        let mut client = test_client(http.clone(), store.clone(), display.clone());
        client.send_prompt("hi").await;
        assert_eq!(display.events().last(), Some(&DisplayEvent::Done));

        // Out-of-band logout between sends.
        store.delete().await.unwrap();
        let requests_before = http.requests().len();
        client.send_prompt("again").await;

        assert!(matches!(
            display.events().last(),
            Some(DisplayEvent::Error { .. })
        ));
        assert_eq!(http.requests().len(), requests_before);
    }

    #[tokio::test]
    async fn test_check_and_publish_auth_status() {
        let http = MockHttpClient::new();
        let display = RecordingDisplay::new();
        let store = MemorySessionStore::new();

        let mut client = test_client(http, store.clone(), display.clone());
        assert!(!client.check_auth_status().await);
        client.publish_auth_status().await;

        store.set("sk-ant-abc").await.unwrap();
        assert!(client.check_auth_status().await);
        client.publish_auth_status().await;

        assert_eq!(
            display.events(),
            vec![
                DisplayEvent::CookieStatus { has_cookie: false },
                DisplayEvent::CookieStatus { has_cookie: true },
            ]
        );
    }

    #[tokio::test]
    async fn test_formatted_cookie_token_passes_through_verbatim() {
        let http = MockHttpClient::new();
        script_happy_path(&http);

        let mut client = test_client(
            http.clone(),
            MemorySessionStore::with_key("sessionKey=sk-ant-abc; cf_clearance=xyz"),
            RecordingDisplay::new(),
        );
        client.send_prompt("hi").await;

        let first = &http.requests()[0];
        assert_eq!(
            first.headers.get("cookie"),
            Some(&"sessionKey=sk-ant-abc; cf_clearance=xyz".to_string())
        );
    }
}
