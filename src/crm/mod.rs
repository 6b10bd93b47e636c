//! GoHighLevel lead submission.
//!
//! Two delivery paths exist: the REST contacts endpoint (Bearer token) and an
//! inbound webhook with flattened `contact.*` field names. Each submission is
//! a single attempt.

pub mod client;
pub mod error;
pub mod payload;

pub use client::{CrmSubmission, GoHighLevelClient, SubmissionChannel};
pub use error::CrmError;
pub use payload::{ContactDetails, QuoteSummary};
