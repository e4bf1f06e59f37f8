//! Files endpoints and upload-with-dedup.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::error::{EvalsError, EvalsResult};
use crate::pagination::Paginator;
use crate::types::{Deleted, ListParams, Page, RemoteFile};

use super::helpers::{file_path, files_path};
use super::EvalClient;

/// Result of [`EvalClient::upload_file_if_absent`].
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// A file with the requested name already existed; nothing was uploaded.
    Reused(RemoteFile),
    /// The file was uploaded.
    Created(RemoteFile),
}

impl UploadOutcome {
    pub fn file(&self) -> &RemoteFile {
        match self {
            Self::Reused(file) | Self::Created(file) => file,
        }
    }

    pub fn id(&self) -> &str {
        &self.file().id
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

impl EvalClient {
    /// First page of stored files.
    pub async fn list_files(&self, params: &ListParams) -> EvalsResult<Page<RemoteFile>> {
        self.http.get_json(&files_path(), &params.to_query()).await
    }

    /// All stored files, page by page.
    pub fn files(&self, params: ListParams) -> Paginator<RemoteFile> {
        Paginator::new(self.http.clone(), files_path(), params)
    }

    /// First file whose `filename` equals `file_name`, in listing order.
    pub async fn find_file_by_name(&self, file_name: &str) -> EvalsResult<Option<RemoteFile>> {
        self.files(ListParams::default())
            .find(|file| file.filename == file_name)
            .await
    }

    /// Upload a local file under `file_name` with the given purpose.
    ///
    /// The local file is read before any request is made; a missing or
    /// unreadable path yields [`EvalsError::Io`].
    pub async fn upload_file(
        &self,
        file_name: &str,
        local_path: impl AsRef<Path>,
        purpose: &str,
    ) -> EvalsResult<RemoteFile> {
        let local_path = local_path.as_ref();
        let content = tokio::fs::read(local_path)
            .await
            .map_err(|source| EvalsError::Io {
                path: local_path.to_path_buf(),
                source,
            })?;

        debug!(
            file_name = %file_name,
            bytes = content.len(),
            purpose = %purpose,
            "uploading file"
        );

        let form = || {
            Form::new()
                .text("purpose", purpose.to_string())
                .part(
                    "file",
                    Part::bytes(content.clone()).file_name(file_name.to_string()),
                )
        };

        self.http.post_multipart(&files_path(), form).await
    }

    /// Return the existing file named `file_name`, or upload it.
    ///
    /// Listing stops at the first name match, so at most one file per name is
    /// created by a sequence of calls.
    pub async fn upload_file_if_absent(
        &self,
        file_name: &str,
        local_path: impl AsRef<Path>,
        purpose: &str,
    ) -> EvalsResult<UploadOutcome> {
        if let Some(existing) = self.find_file_by_name(file_name).await? {
            info!(file_name = %file_name, file_id = %existing.id, "file already exists, reusing");
            return Ok(UploadOutcome::Reused(existing));
        }

        let created = self.upload_file(file_name, local_path, purpose).await?;
        Ok(UploadOutcome::Created(created))
    }

    pub async fn retrieve_file(&self, file_id: &str) -> EvalsResult<RemoteFile> {
        self.http.get_json(&file_path(file_id), &[]).await
    }

    pub async fn delete_file(&self, file_id: &str) -> EvalsResult<Deleted> {
        self.http
            .delete_json(&file_path(file_id), || Deleted::confirmed("file", file_id))
            .await
    }
}
