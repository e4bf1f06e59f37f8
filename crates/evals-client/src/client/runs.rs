//! Evaluation run and output item endpoints.
//!
//! Run state is owned by the service; cancel and delete are sent as-is and
//! invalid transitions come back as [`EvalsError::Rejected`](crate::EvalsError::Rejected).

use serde_json::Value;
use tracing::debug;

use crate::error::EvalsResult;
use crate::pagination::Paginator;
use crate::types::{Deleted, EvaluationRun, ListParams, Metadata, NewRun, OutputItem, Page};

use super::helpers::{output_item_path, output_items_path, run_path, runs_path};
use super::EvalClient;

impl EvalClient {
    /// Start a run of `eval_id` against `data_source`.
    pub async fn create_run(
        &self,
        eval_id: &str,
        name: &str,
        data_source: Value,
        metadata: Option<Metadata>,
    ) -> EvalsResult<EvaluationRun> {
        let request = NewRun {
            name: name.to_string(),
            data_source,
            metadata,
        };
        debug!(eval_id = %eval_id, name = %name, "creating evaluation run");
        self.http.post_json(&runs_path(eval_id), &request).await
    }

    /// First page of runs for an evaluation.
    pub async fn list_runs(
        &self,
        eval_id: &str,
        params: &ListParams,
    ) -> EvalsResult<Page<EvaluationRun>> {
        self.http
            .get_json(&runs_path(eval_id), &params.to_query())
            .await
    }

    /// All runs for an evaluation, page by page.
    pub fn runs(&self, eval_id: &str, params: ListParams) -> Paginator<EvaluationRun> {
        Paginator::new(self.http.clone(), runs_path(eval_id), params)
    }

    pub async fn retrieve_run(&self, eval_id: &str, run_id: &str) -> EvalsResult<EvaluationRun> {
        self.http.get_json(&run_path(eval_id, run_id), &[]).await
    }

    /// Ask the service to cancel a queued or in-progress run.
    ///
    /// If the service acknowledges without a body, the returned run carries
    /// only the ids and [`RunStatus::Unknown`](crate::RunStatus::Unknown).
    pub async fn cancel_run(&self, eval_id: &str, run_id: &str) -> EvalsResult<EvaluationRun> {
        self.http
            .post_empty(&run_path(eval_id, run_id), || EvaluationRun {
                id: run_id.to_string(),
                eval_id: eval_id.to_string(),
                ..Default::default()
            })
            .await
    }

    pub async fn delete_run(&self, eval_id: &str, run_id: &str) -> EvalsResult<Deleted> {
        self.http
            .delete_json(&run_path(eval_id, run_id), || {
                Deleted::confirmed("eval.run.deleted", run_id)
            })
            .await
    }

    /// First page of per-sample results of a run.
    pub async fn list_output_items(
        &self,
        eval_id: &str,
        run_id: &str,
        params: &ListParams,
    ) -> EvalsResult<Page<OutputItem>> {
        self.http
            .get_json(&output_items_path(eval_id, run_id), &params.to_query())
            .await
    }

    /// All per-sample results of a run, page by page.
    pub fn output_items(
        &self,
        eval_id: &str,
        run_id: &str,
        params: ListParams,
    ) -> Paginator<OutputItem> {
        Paginator::new(
            self.http.clone(),
            output_items_path(eval_id, run_id),
            params,
        )
    }

    pub async fn retrieve_output_item(
        &self,
        eval_id: &str,
        run_id: &str,
        item_id: &str,
    ) -> EvalsResult<OutputItem> {
        self.http
            .get_json(&output_item_path(eval_id, run_id, item_id), &[])
            .await
    }
}
