//! Issue tracker outbound port. Read issues from an external tracker (e.g. GitHub).

use crate::domain::{DomainError, Issue};

/// Port for reading issues of one tracker project.
///
/// The owner/repository pair is bound when the adapter is built, so the core
/// only deals in issue numbers.
#[async_trait::async_trait]
pub trait IssueTrackerPort: Send + Sync {
    /// Fetch a single issue by number.
    ///
    /// # Errors
    /// Returns `DomainError::Tracker` if the request fails or the issue does not exist.
    async fn get_issue(&self, number: u64) -> Result<Issue, DomainError>;

    /// Fetch every open issue, in the order the tracker returns them.
    ///
    /// # Errors
    /// Returns `DomainError::Tracker` if any page request fails.
    async fn list_open_issues(&self) -> Result<Vec<Issue>, DomainError>;
}
