//! Port traits. API boundaries for the hexagon.
//!
//! - Outbound: Called by the application into infrastructure
//!   (chat network, transcript, diagnostics, issue tracker)

pub mod issue_tracker;
pub mod outbound;

pub use issue_tracker::IssueTrackerPort;
pub use outbound::{ChatLogPort, ChatTransport, DiagnosticSink};
