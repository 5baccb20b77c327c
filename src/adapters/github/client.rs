//! GitHub adapter. Implements IssueTrackerPort by reading issues via the GitHub REST API.

use crate::adapters::github::mapper::{self, GithubIssue};
use crate::domain::{DomainError, Issue};
use crate::ports::IssueTrackerPort;
use crate::shared::config::GithubConfig;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Max page size the issues endpoint accepts.
const PER_PAGE: usize = 100;

/// Error bodies are cut to this many chars before landing in a DomainError.
const MAX_ERROR_BODY: usize = 200;

/// GitHub REST adapter for one repository.
///
/// Works anonymously; a token only lifts the rate limit.
pub struct GithubIssueTracker {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
}

impl GithubIssueTracker {
    /// Create a new GitHub adapter.
    ///
    /// # Errors
    /// Returns `DomainError::Config` if the token is not a valid header value
    /// or the HTTP client cannot be built.
    pub fn new(cfg: &GithubConfig) -> Result<Self, DomainError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("irc-issue-bot/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        if let Some(token) = cfg.token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| DomainError::Config(format!("invalid github.token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::Config(format!("build http client: {}", e)))?;

        Ok(Self {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            owner: cfg.owner.clone(),
            repo: cfg.repo.clone(),
        })
    }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.api_base, self.owner, self.repo)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        what: &str,
        request: RequestBuilder,
    ) -> Result<T, DomainError> {
        let res = request
            .send()
            .await
            .map_err(|e| DomainError::Tracker(format!("{}: request failed: {}", what, e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Tracker(format!(
                "{}: GitHub API error {}: {}",
                what,
                status,
                text.chars().take(MAX_ERROR_BODY).collect::<String>()
            )));
        }

        res.json::<T>()
            .await
            .map_err(|e| DomainError::Tracker(format!("{}: invalid response: {}", what, e)))
    }
}

#[async_trait::async_trait]
impl IssueTrackerPort for GithubIssueTracker {
    async fn get_issue(&self, number: u64) -> Result<Issue, DomainError> {
        let url = format!("{}/{}", self.issues_url(), number);
        let raw: GithubIssue = self
            .request_json("get issue", self.client.get(&url))
            .await?;
        Ok(mapper::issue_to_domain(raw))
    }

    async fn list_open_issues(&self) -> Result<Vec<Issue>, DomainError> {
        let url = self.issues_url();
        let mut issues = Vec::new();
        let mut page = 1_u32;
        loop {
            let page_value = page.to_string();
            let per_page = PER_PAGE.to_string();
            let chunk: Vec<GithubIssue> = self
                .request_json(
                    "list open issues",
                    self.client.get(&url).query(&[
                        ("state", "open"),
                        ("per_page", per_page.as_str()),
                        ("page", page_value.as_str()),
                    ]),
                )
                .await?;
            let chunk_len = chunk.len();
            issues.extend(chunk.into_iter().map(mapper::issue_to_domain));
            debug!(page, chunk_len, total = issues.len(), "fetched open issues page");
            if chunk_len < PER_PAGE {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn issue_json(number: u64, labels: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "number": number,
            "title": format!("Issue {}", number),
            "state": "open",
            "created_at": "2014-03-04T10:05:00Z",
            "user": {"login": "octocat"},
            "comments": 0,
            "labels": labels.iter().map(|l| serde_json::json!({"name": l})).collect::<Vec<_>>(),
            "html_url": format!("https://github.com/o/r/issues/{}", number),
        })
    }

    /// Serves `responses` one per connection and records each request head.
    async fn serve(responses: Vec<(u16, String)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_task = Arc::clone(&seen);
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut sock, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = sock.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                seen_task
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&buf).into_owned());
                let reply = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                sock.write_all(reply.as_bytes()).await.unwrap();
                sock.shutdown().await.ok();
            }
        });
        (format!("http://{}", addr), seen)
    }

    fn tracker(api_base: String, token: Option<&str>) -> GithubIssueTracker {
        GithubIssueTracker::new(&GithubConfig {
            owner: "o".into(),
            repo: "r".into(),
            token: token.map(String::from),
            api_base,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_issue() {
        let (base, seen) = serve(vec![(200, issue_json(64, &["bug"]).to_string())]).await;
        let issue = tracker(base, Some("t0k")).get_issue(64).await.unwrap();
        assert_eq!(issue.number, 64);
        assert_eq!(issue.labels, vec!["bug".to_string()]);

        let head = seen.lock().unwrap()[0].to_lowercase();
        assert!(head.starts_with("get /repos/o/r/issues/64 "));
        assert!(head.contains("authorization: bearer t0k"));
        assert!(head.contains("user-agent: irc-issue-bot/"));
    }

    #[tokio::test]
    async fn test_list_open_issues_walks_pages() {
        let first: Vec<_> = (1..=100).map(|n| issue_json(n, &[])).collect();
        let second = vec![issue_json(101, &["ui"])];
        let (base, seen) = serve(vec![
            (200, serde_json::Value::from(first).to_string()),
            (200, serde_json::Value::from(second).to_string()),
        ])
        .await;

        let issues = tracker(base, None).list_open_issues().await.unwrap();
        assert_eq!(issues.len(), 101);
        assert_eq!(issues[100].number, 101);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("state=open"));
        assert!(seen[0].contains("page=1"));
        assert!(seen[1].contains("page=2"));
        assert!(!seen[0].to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_error_status_is_tracker_error() {
        let (base, _) = serve(vec![(404, r#"{"message":"Not Found"}"#.to_string())]).await;
        let err = tracker(base, None).get_issue(1).await.unwrap_err();
        match err {
            DomainError::Tracker(msg) => {
                assert!(msg.contains("404"));
                assert!(msg.contains("Not Found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_tracker_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = tracker(format!("http://{}", addr), None)
            .list_open_issues()
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Tracker(_)));
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let result = GithubIssueTracker::new(&GithubConfig {
            owner: "o".into(),
            repo: "r".into(),
            token: Some("bad\ntoken".into()),
            api_base: "https://api.github.com/".into(),
        });
        assert!(matches!(result, Err(DomainError::Config(_))));
    }
}
