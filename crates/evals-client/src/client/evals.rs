//! Evaluation endpoints.

use serde_json::Value;
use tracing::debug;

use crate::error::EvalsResult;
use crate::pagination::Paginator;
use crate::types::{Deleted, Evaluation, EvaluationUpdate, ListParams, NewEvaluation, Page};

use super::helpers::{eval_path, evals_path};
use super::EvalClient;

impl EvalClient {
    /// Create an evaluation from a data source configuration and testing criteria.
    pub async fn create_eval(
        &self,
        name: &str,
        data_source_config: Value,
        testing_criteria: Vec<Value>,
    ) -> EvalsResult<Evaluation> {
        self.create_eval_with(&NewEvaluation {
            name: name.to_string(),
            data_source_config,
            testing_criteria,
            metadata: None,
        })
        .await
    }

    pub async fn create_eval_with(&self, request: &NewEvaluation) -> EvalsResult<Evaluation> {
        debug!(name = %request.name, criteria = request.testing_criteria.len(), "creating evaluation");
        self.http.post_json(&evals_path(), request).await
    }

    /// First page of evaluations, in service order.
    pub async fn list_evals(&self, params: &ListParams) -> EvalsResult<Page<Evaluation>> {
        self.http.get_json(&evals_path(), &params.to_query()).await
    }

    /// All evaluations, page by page.
    pub fn evals(&self, params: ListParams) -> Paginator<Evaluation> {
        Paginator::new(self.http.clone(), evals_path(), params)
    }

    pub async fn retrieve_eval(&self, eval_id: &str) -> EvalsResult<Evaluation> {
        self.http.get_json(&eval_path(eval_id), &[]).await
    }

    /// Rename an evaluation or replace its metadata.
    pub async fn update_eval(
        &self,
        eval_id: &str,
        update: &EvaluationUpdate,
    ) -> EvalsResult<Evaluation> {
        self.http.post_json(&eval_path(eval_id), update).await
    }

    pub async fn delete_eval(&self, eval_id: &str) -> EvalsResult<Deleted> {
        self.http
            .delete_json(&eval_path(eval_id), || {
                Deleted::confirmed("eval.deleted", eval_id)
            })
            .await
    }
}
