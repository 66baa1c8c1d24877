//! pathwise-engine — Runs enrichment analyses off the caller's control flow
//! and ranks the results.
//!
//! A caller builds an [`AnalysisRequest`] snapshot, hands it to the
//! [`Scheduler`], and receives one [`AnalysisOutcome`] per executed request on
//! a channel. While an analysis is running, later submissions coalesce into a
//! single pending request; only the newest survives.

pub mod request;
pub mod outcome;
pub mod executor;
pub mod scheduler;
pub mod ranking;
pub mod export;
pub mod session;

pub use executor::{AnalysisExecutor, EnrichmentExecutor};
pub use outcome::{AnalysisOutcome, EnrichmentResult, OutcomeStatus, PathwayFailure};
pub use ranking::{RankedResults, ResultPage, ResultQuery};
pub use request::{AnalysisRequest, RequestId};
pub use scheduler::{Admission, Scheduler, SchedulerHandle, SchedulerState, SchedulerStatus};
pub use session::AnalysisSession;
