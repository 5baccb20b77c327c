//! GitHub issue tracker adapter. Implements IssueTrackerPort over the REST API.

pub mod client;
pub mod mapper;

pub use client::GithubIssueTracker;
