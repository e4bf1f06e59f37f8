//! Wire types for the files and evals endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default purpose tag for evaluation data files.
pub const EVALS_PURPOSE: &str = "evals";

/// Key-value metadata attached to evaluations and runs.
pub type Metadata = BTreeMap<String, String>;

/// Records that carry a service-assigned identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

fn timestamp(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
}

macro_rules! identified {
    ($($ty:ty),*) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }

            impl $ty {
                /// Creation time, if the service reported one.
                pub fn created(&self) -> Option<DateTime<Utc>> {
                    timestamp(self.created_at)
                }
            }
        )*
    };
}

/// A file stored by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteFile {
    pub id: String,
    pub object: String,
    pub filename: String,
    pub purpose: String,
    pub bytes: Option<u64>,
    pub created_at: Option<i64>,
    pub status: Option<String>,

    /// Fields this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An evaluation definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evaluation {
    pub id: String,
    pub object: String,
    pub name: String,
    pub data_source_config: Value,
    pub testing_criteria: Vec<Value>,
    pub metadata: Option<Metadata>,
    pub created_at: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Evaluation {
    /// Stand-in record for an evaluation that could not be fetched.
    ///
    /// Only `name` is set: `Unknown Evaluation (<id>)`.
    pub fn placeholder(eval_id: &str) -> Self {
        Self {
            name: format!("Unknown Evaluation ({})", eval_id),
            ..Default::default()
        }
    }
}

/// Run lifecycle as reported by the service.
///
/// queued -> in_progress -> completed | failed | canceled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    #[serde(alias = "running")]
    InProgress,
    Completed,
    Failed,
    #[serde(alias = "cancelled")]
    Canceled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }

    /// Cancel only has an effect before the run finishes.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Queued | Self::InProgress)
    }
}

/// Aggregate pass/fail counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultCounts {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub errored: u64,
}

/// Pass/fail counts for one testing criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaResult {
    pub testing_criteria: String,
    pub passed: u64,
    pub failed: u64,
}

/// One execution of an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationRun {
    pub id: String,
    pub object: String,
    pub eval_id: String,
    pub name: String,
    pub status: RunStatus,
    pub model: Option<String>,
    pub data_source: Value,
    pub metadata: Option<Metadata>,
    pub result_counts: Option<ResultCounts>,
    pub per_testing_criteria_results: Vec<CriteriaResult>,
    pub report_url: Option<String>,
    pub error: Option<Value>,
    pub created_at: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-sample result produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputItem {
    pub id: String,
    pub object: String,
    pub eval_id: String,
    pub run_id: String,
    pub status: String,
    pub datasource_item_id: Option<i64>,
    pub datasource_item: Value,
    pub results: Vec<Value>,
    pub sample: Option<Value>,
    pub created_at: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

identified!(RemoteFile, Evaluation, EvaluationRun, OutputItem);

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    // Explicit constructor keeps `T: Default` out of the derived bound.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T: Identified> Page<T> {
    /// Cursor for the following page, if the service says there is one.
    pub fn next_cursor(&self) -> Option<String> {
        if !self.has_more || self.data.is_empty() {
            return None;
        }
        self.last_id
            .clone()
            .or_else(|| self.data.last().map(|item| item.id().to_string()))
    }
}

/// Deletion acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deleted {
    pub object: String,
    pub deleted: bool,
    #[serde(alias = "eval_id", alias = "run_id")]
    pub id: Option<String>,
}

impl Deleted {
    /// Acknowledgement for a successful delete that returned no body.
    pub(crate) fn confirmed(object: &str, id: &str) -> Self {
        Self {
            object: object.to_string(),
            deleted: true,
            id: Some(id.to_string()),
        }
    }
}

/// Sort order for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Cursor and filters for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub after: Option<String>,
    pub limit: Option<u32>,
    pub order: Option<SortOrder>,
    pub filters: Vec<(String, String)>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Endpoint-specific filter, e.g. `purpose` for files or `status` for runs.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Query pairs with `after` replaced by `cursor`.
    pub(crate) fn query_from(&self, cursor: Option<&str>) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(after) = cursor {
            query.push(("after".to_string(), after.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(order) = self.order {
            query.push(("order".to_string(), order.as_str().to_string()));
        }
        query.extend(self.filters.iter().cloned());
        query
    }

    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        self.query_from(self.after.as_deref())
    }
}

/// Request body for `POST /evals`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvaluation {
    pub name: String,
    pub data_source_config: Value,
    pub testing_criteria: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Request body for `POST /evals/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Request body for `POST /evals/{id}/runs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRun {
    pub name: String,
    pub data_source: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}
