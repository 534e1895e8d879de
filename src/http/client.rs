use super::redact::HttpDebugConfig;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    debug: HttpDebugConfig,
    sink: LogSink,
}

#[derive(Clone)]
enum LogSink {
    Tracing,
    #[cfg(test)]
    Buffer(Arc<Mutex<Vec<String>>>),
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("debug", &self.debug)
            .finish()
    }
}

impl HttpClient {
    pub fn new(inner: Client, debug: HttpDebugConfig) -> Self {
        Self {
            inner,
            debug,
            sink: LogSink::Tracing,
        }
    }

    /// Builds a client whose every request is bounded by `timeout`.
    pub fn with_timeout(timeout: Duration, debug: HttpDebugConfig) -> reqwest::Result<Self> {
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(inner, debug))
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        bearer: Option<&str>,
        payload: &T,
    ) -> Result<HttpResponseData, reqwest::Error> {
        let mut builder = self.inner.post(url).json(payload);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        let request = builder.build()?;
        if self.debug.enabled {
            let body_json = serde_json::to_string(payload)
                .unwrap_or_else(|err| format!("{{\"_serialization_error\":\"{err}\"}}"));
            self.emit(request_log_lines(self.debug, &request, &body_json));
        }

        let response = self.inner.execute(request).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if self.debug.enabled {
            self.emit(response_log_lines(self.debug, status, &headers, &body));
        }

        Ok(HttpResponseData { status, body })
    }

    fn emit(&self, lines: Vec<String>) {
        for line in lines {
            match &self.sink {
                LogSink::Tracing => debug!(target: "json2toon::http", "{line}"),
                #[cfg(test)]
                LogSink::Buffer(buffer) => {
                    if let Ok(mut b) = buffer.lock() {
                        b.push(line);
                    }
                }
            }
        }
    }

    #[cfg(test)]
    pub fn with_buffer_sink(
        inner: Client,
        debug: HttpDebugConfig,
    ) -> (Self, Arc<Mutex<Vec<String>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let client = Self {
            inner,
            debug,
            sink: LogSink::Buffer(Arc::clone(&buffer)),
        };
        (client, buffer)
    }
}

fn request_log_lines(
    debug: HttpDebugConfig,
    request: &reqwest::Request,
    body_json: &str,
) -> Vec<String> {
    let mut lines = vec![format!("> {} {}", request.method(), request.url())];
    append_header_lines(&mut lines, '>', debug, request.headers());
    append_body_lines(&mut lines, '>', &debug.body(body_json));
    lines
}

fn response_log_lines(
    debug: HttpDebugConfig,
    status: u16,
    headers: &HeaderMap,
    body: &str,
) -> Vec<String> {
    let mut lines = vec![format!("< HTTP {status}")];
    append_header_lines(&mut lines, '<', debug, headers);
    append_body_lines(&mut lines, '<', &debug.body(body));
    lines
}

fn append_header_lines(
    lines: &mut Vec<String>,
    direction: char,
    debug: HttpDebugConfig,
    headers: &HeaderMap,
) {
    for (name, value) in headers {
        lines.push(format!(
            "{direction} {}: {}",
            name.as_str(),
            debug.header_value(name.as_str(), value)
        ));
    }
}

fn append_body_lines(lines: &mut Vec<String>, direction: char, body: &str) {
    if body.is_empty() {
        lines.push(format!("{direction} <empty body>"));
        return;
    }

    for line in body.lines() {
        lines.push(format!("{direction} {line}"));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponseData {
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::{HttpClient, HttpResponseData};
    use crate::http::redact::HttpDebugConfig;
    use reqwest::Client;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn post_json_sends_bearer_and_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(Client::new(), HttpDebugConfig::disabled());
        let response = client
            .post_json(
                &format!("{}/v1/chat", server.uri()),
                Some("sk-test"),
                &json!({"ok": true}),
            )
            .await
            .expect("request should succeed");

        assert_eq!(
            response,
            HttpResponseData {
                status: 201,
                body: "created".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn post_json_logs_redacted_exchange_when_enabled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"api_key": "response-secret", "ok": true})),
            )
            .mount(&server)
            .await;

        let (client, logs) =
            HttpClient::with_buffer_sink(Client::new(), HttpDebugConfig::from_verbose(true));
        client
            .post_json(
                &format!("{}/v1/chat", server.uri()),
                Some("sk-very-secret"),
                &json!({"token": "request-secret", "messages": []}),
            )
            .await
            .expect("request should succeed");

        let logged = logs.lock().expect("logs lock").join("\n");
        assert!(logged.contains("> POST"));
        assert!(logged.contains("< HTTP 200"));
        assert!(logged.contains("authorization: ***REDACTED***"));
        assert!(!logged.contains("sk-very-secret"));
        assert!(!logged.contains("request-secret"));
        assert!(!logged.contains("response-secret"));
    }

    #[tokio::test]
    async fn post_json_emits_no_logs_when_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let (client, logs) =
            HttpClient::with_buffer_sink(Client::new(), HttpDebugConfig::disabled());
        client
            .post_json(&server.uri(), None, &json!({"ok": true}))
            .await
            .expect("request should succeed");

        assert!(logs.lock().expect("logs lock").is_empty());
    }

    #[tokio::test]
    async fn with_timeout_aborts_slow_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(
            Duration::from_millis(100),
            HttpDebugConfig::disabled(),
        )
        .expect("client");
        let err = client
            .post_json(&server.uri(), None, &json!({}))
            .await
            .expect_err("slow upstream should time out");

        assert!(err.is_timeout());
    }
}
