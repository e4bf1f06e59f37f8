//! Log-and-sentinel facade over [`EvalClient`].
//!
//! Each method makes the same remote call as its [`EvalClient`] counterpart
//! but absorbs failures: the error is logged and a fixed placeholder is
//! returned instead.
//!
//! | Operation | Sentinel |
//! |-----------|----------|
//! | upload | `""` (local I/O and listing errors still propagate) |
//! | create evaluation | `None` |
//! | retrieve evaluation | [`Evaluation::placeholder`] |
//! | create / retrieve run, retrieve output item | `None` |
//! | list evaluations / runs / output items | empty `Vec` |
//! | delete / cancel | `false` |

use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::client::EvalClient;
use crate::config::{EvalsConfig, Provider};
use crate::error::{EvalsError, EvalsResult};
use crate::types::{
    Evaluation, EvaluationRun, ListParams, Metadata, OutputItem, EVALS_PURPOSE,
};

/// [`EvalClient`] that never fails on remote errors.
#[derive(Debug, Clone)]
pub struct LenientClient {
    inner: EvalClient,
}

impl LenientClient {
    pub fn new(inner: EvalClient) -> Self {
        Self { inner }
    }

    pub fn from_config(config: EvalsConfig) -> EvalsResult<Self> {
        EvalClient::new(config).map(Self::new)
    }

    pub fn from_env() -> EvalsResult<Self> {
        EvalClient::from_env().map(Self::new)
    }

    /// Typed client underneath.
    pub fn inner(&self) -> &EvalClient {
        &self.inner
    }

    fn provider(&self) -> Provider {
        self.inner.provider()
    }

    // ---------------------------- files ----------------------------

    /// Id of the remote file named `file_name`, uploading `local_path` if absent.
    ///
    /// Returns `Ok("")` if the upload itself fails. Errors listing remote
    /// files or reading `local_path` are returned as `Err`.
    pub async fn upload_file(
        &self,
        file_name: &str,
        local_path: impl AsRef<Path>,
        purpose: &str,
    ) -> EvalsResult<String> {
        if let Some(existing) = self.inner.find_file_by_name(file_name).await? {
            info!(
                file_name = %file_name,
                file_id = %existing.id,
                "file already exists, returning existing file id"
            );
            return Ok(existing.id);
        }

        match self.inner.upload_file(file_name, local_path, purpose).await {
            Ok(file) => {
                info!(
                    file_id = %file.id,
                    provider = %self.provider(),
                    "file uploaded successfully to {}",
                    self.provider()
                );
                Ok(file.id)
            }
            Err(e @ EvalsError::Io { .. }) => Err(e),
            Err(e) => {
                warn!(
                    error = %e,
                    provider = %self.provider(),
                    "failed to upload file to {}",
                    self.provider()
                );
                Ok(String::new())
            }
        }
    }

    /// [`upload_file`](Self::upload_file) with the `evals` purpose.
    pub async fn upload_eval_file(
        &self,
        file_name: &str,
        local_path: impl AsRef<Path>,
    ) -> EvalsResult<String> {
        self.upload_file(file_name, local_path, EVALS_PURPOSE).await
    }

    // ---------------------------- evaluations ----------------------------

    pub async fn create_eval(
        &self,
        name: &str,
        data_source_config: Value,
        testing_criteria: Vec<Value>,
    ) -> Option<String> {
        match self
            .inner
            .create_eval(name, data_source_config, testing_criteria)
            .await
        {
            Ok(eval) => {
                info!(eval_id = %eval.id, "evaluation created");
                Some(eval.id)
            }
            Err(e) => {
                warn!(error = %e, name = %name, "failed to create evaluation");
                None
            }
        }
    }

    /// Evaluations on the first page the service returns.
    pub async fn list_evals(&self) -> Vec<Evaluation> {
        match self.inner.list_evals(&ListParams::default()).await {
            Ok(page) => {
                info!(count = page.data.len(), "fetched evaluations");
                page.data
            }
            Err(e) => {
                warn!(error = %e, "failed to list evaluations");
                Vec::new()
            }
        }
    }

    /// The evaluation, or a placeholder named `Unknown Evaluation (<id>)`.
    pub async fn retrieve_eval(&self, eval_id: &str) -> Evaluation {
        match self.inner.retrieve_eval(eval_id).await {
            Ok(eval) => eval,
            Err(e) => {
                warn!(error = %e, eval_id = %eval_id, "failed to fetch evaluation details");
                Evaluation::placeholder(eval_id)
            }
        }
    }

    pub async fn delete_eval(&self, eval_id: &str) -> bool {
        match self.inner.delete_eval(eval_id).await {
            Ok(_) => {
                info!(eval_id = %eval_id, "evaluation deleted");
                true
            }
            Err(e) => {
                warn!(error = %e, eval_id = %eval_id, "failed to delete evaluation");
                false
            }
        }
    }

    // ---------------------------- runs ----------------------------

    pub async fn create_run(
        &self,
        eval_id: &str,
        name: &str,
        data_source: Value,
        metadata: Option<Metadata>,
    ) -> Option<EvaluationRun> {
        match self
            .inner
            .create_run(eval_id, name, data_source, metadata)
            .await
        {
            Ok(run) => {
                let run_id = if run.id.is_empty() {
                    "Unknown ID"
                } else {
                    run.id.as_str()
                };
                info!(eval_id = %eval_id, run_id = %run_id, "created evaluation run for {}", name);
                Some(run)
            }
            Err(e) => {
                warn!(error = %e, eval_id = %eval_id, "failed to create evaluation run");
                None
            }
        }
    }

    /// Runs on the first page the service returns.
    pub async fn list_runs(&self, eval_id: &str) -> Vec<EvaluationRun> {
        match self.inner.list_runs(eval_id, &ListParams::default()).await {
            Ok(page) => page.data,
            Err(e) => {
                warn!(error = %e, eval_id = %eval_id, "failed to list evaluation runs");
                Vec::new()
            }
        }
    }

    pub async fn retrieve_run(&self, eval_id: &str, run_id: &str) -> Option<EvaluationRun> {
        match self.inner.retrieve_run(eval_id, run_id).await {
            Ok(run) => Some(run),
            Err(e) => {
                warn!(error = %e, run_id = %run_id, "failed to fetch evaluation run details");
                None
            }
        }
    }

    /// Output items on the first page the service returns.
    pub async fn list_output_items(&self, eval_id: &str, run_id: &str) -> Vec<OutputItem> {
        match self
            .inner
            .list_output_items(eval_id, run_id, &ListParams::default())
            .await
        {
            Ok(page) => page.data,
            Err(e) => {
                warn!(error = %e, run_id = %run_id, "failed to fetch output items");
                Vec::new()
            }
        }
    }

    pub async fn retrieve_output_item(
        &self,
        eval_id: &str,
        run_id: &str,
        item_id: &str,
    ) -> Option<OutputItem> {
        match self
            .inner
            .retrieve_output_item(eval_id, run_id, item_id)
            .await
        {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(
                    error = %e,
                    run_id = %run_id,
                    item_id = %item_id,
                    "failed to fetch output item"
                );
                None
            }
        }
    }

    pub async fn cancel_run(&self, eval_id: &str, run_id: &str) -> bool {
        match self.inner.cancel_run(eval_id, run_id).await {
            Ok(_) => {
                info!(run_id = %run_id, "evaluation run cancelled");
                true
            }
            Err(e) => {
                warn!(error = %e, run_id = %run_id, "failed to cancel evaluation run");
                false
            }
        }
    }

    pub async fn delete_run(&self, eval_id: &str, run_id: &str) -> bool {
        match self.inner.delete_run(eval_id, run_id).await {
            Ok(_) => {
                info!(run_id = %run_id, "evaluation run deleted");
                true
            }
            Err(e) => {
                warn!(error = %e, run_id = %run_id, "failed to delete evaluation run");
                false
            }
        }
    }
}

impl From<EvalClient> for LenientClient {
    fn from(inner: EvalClient) -> Self {
        Self::new(inner)
    }
}
