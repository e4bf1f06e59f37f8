//! Async client for OpenAI-compatible evaluation APIs.
//!
//! This crate talks to the `/files` and `/evals` endpoints of OpenAI or an
//! Azure OpenAI resource, providing:
//!
//! - File upload with name-based dedup (list, then upload only if absent)
//! - Evaluation create / list / retrieve / update / delete
//! - Evaluation run create / list / retrieve / cancel / delete
//! - Output item listing and retrieval
//! - Lazy, restartable pagination over every list endpoint
//!
//! Two surfaces share one connection handle: [`EvalClient`] returns a
//! [`EvalsResult`] from every call, [`LenientClient`] logs failures and
//! returns fixed sentinels instead.
//!
//! # Quick Start
//!
//! ```no_run
//! use evals_client::{EvalClient, EvalsConfig, EVALS_PURPOSE};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = EvalClient::new(EvalsConfig::from_dotenv())?;
//!
//! let file = client
//!     .upload_file_if_absent("qa.jsonl", "data/qa.jsonl", EVALS_PURPOSE)
//!     .await?;
//! println!("data file: {}", file.id());
//!
//! let evals = client.evals(Default::default()).collect_all().await?;
//! println!("{} evaluations", evals.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `OAI_API_TYPE` | `openai` or `azure` (default `azure`) |
//! | `AZURE_API_KEY` / `AZURE_API_ENDPOINT` | Azure credential and resource endpoint |
//! | `OPENAI_API_KEY` / `OPENAI_API_BASE` | OpenAI credential and endpoint |
//! | `EVALS_TIMEOUT_SECS` | Request timeout in seconds (default: transport default) |
//! | `EVALS_MAX_RETRIES` | Max retries of reads and deletes on transient failures (default: 0) |

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod lenient;
pub mod pagination;
pub mod types;

// Re-export main types
pub use auth::Credential;
pub use client::{EvalClient, UploadOutcome, EVALS_USER_AGENT};
pub use config::{EvalsConfig, Provider, AZURE_EVALS_QUERY};
pub use error::{EvalsError, EvalsResult};
pub use lenient::LenientClient;
pub use pagination::Paginator;
pub use types::{
    CriteriaResult, Deleted, Evaluation, EvaluationRun, EvaluationUpdate, Identified, ListParams,
    Metadata, NewEvaluation, NewRun, OutputItem, Page, RemoteFile, ResultCounts, RunStatus,
    SortOrder, EVALS_PURPOSE,
};
