//! Cursor pagination over list endpoints.
//!
//! A [`Paginator`] is a description of a listing, not an in-flight request:
//! every call to [`Paginator::pages`] or [`Paginator::items`] starts again
//! from the configured cursor and fetches pages lazily as the stream is
//! polled.

use std::marker::PhantomData;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::http::HttpBackend;
use crate::error::{EvalsError, EvalsResult};
use crate::types::{Identified, ListParams, Page};

/// Lazy, restartable listing across all pages of an endpoint.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    http: HttpBackend,
    path: String,
    params: ListParams,
    _marker: PhantomData<fn() -> T>,
}

enum Cursor {
    Start(Option<String>),
    Next(String),
    Done,
}

impl<T> Paginator<T>
where
    T: DeserializeOwned + Identified,
{
    pub(crate) fn new(http: HttpBackend, path: String, params: ListParams) -> Self {
        Self {
            http,
            path,
            params,
            _marker: PhantomData,
        }
    }

    /// Endpoint path relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch a single page starting after `cursor` (or at the beginning).
    pub async fn fetch_page(&self, cursor: Option<&str>) -> EvalsResult<Page<T>> {
        let query = self.params.query_from(cursor);
        debug!(path = %self.path, cursor = ?cursor, "fetching page");
        self.http.get_json(&self.path, &query).await
    }

    /// Stream of pages, following `last_id` until `has_more` is false.
    pub fn pages(&self) -> impl Stream<Item = EvalsResult<Page<T>>> + '_ {
        let start = Cursor::Start(self.params.after.clone());
        stream::try_unfold(start, move |cursor| self.advance(cursor))
    }

    async fn advance(&self, cursor: Cursor) -> EvalsResult<Option<(Page<T>, Cursor)>> {
        let previous = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start(after) => after,
            Cursor::Next(after) => Some(after),
        };

        let page = self.fetch_page(previous.as_deref()).await?;

        let next = match page.next_cursor() {
            // A cursor that does not advance would loop forever.
            Some(cursor) if previous.as_deref() != Some(cursor.as_str()) => Cursor::Next(cursor),
            _ => Cursor::Done,
        };

        Ok(Some((page, next)))
    }

    /// Stream of records across all pages, in service order.
    pub fn items(&self) -> impl Stream<Item = EvalsResult<T>> + '_ {
        self.pages()
            .map_ok(|page| stream::iter(page.data.into_iter().map(Ok::<T, EvalsError>)))
            .try_flatten()
    }

    /// Drain every page into a vector.
    pub async fn collect_all(&self) -> EvalsResult<Vec<T>> {
        self.items().try_collect().await
    }

    /// First record matching `predicate`; stops fetching once found.
    pub async fn find<P>(&self, mut predicate: P) -> EvalsResult<Option<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let items = self.items();
        futures::pin_mut!(items);

        while let Some(item) = items.next().await {
            let item = item?;
            if predicate(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}
