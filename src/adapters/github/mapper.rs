//! Map GitHub REST payloads to domain entities.

use crate::domain::{Issue, IssueState};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Issue as returned by `GET /repos/{owner}/{repo}/issues[/{number}]`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubIssue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub user: Option<GithubUser>,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubLabel {
    pub name: String,
}

/// Author display name: the profile name when present, else the login.
fn author_name(user: Option<GithubUser>) -> String {
    match user {
        Some(GithubUser {
            name: Some(name), ..
        }) if !name.trim().is_empty() => name,
        Some(user) => user.login,
        None => "unknown".to_string(),
    }
}

pub fn issue_to_domain(raw: GithubIssue) -> Issue {
    let state = if raw.state.eq_ignore_ascii_case("closed") {
        IssueState::Closed
    } else {
        IssueState::Open
    };
    Issue {
        number: raw.number,
        title: raw.title,
        state,
        created_at: raw.created_at,
        author: author_name(raw.user),
        comments: raw.comments,
        labels: raw.labels.into_iter().map(|l| l.name).collect(),
        url: raw.html_url,
    }
}
