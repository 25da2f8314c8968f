//! Auto-paginator
//!
//! Repeatedly fetches pages, forwarding continuation tokens, one request at
//! a time.

use super::types::{
    CancelFlag, NextPage, Page, PaginationState, PaginationSummary, PagingMode, StopReason,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::Stream;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A remote paged listing operation
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Result batch type
    type Item: Send;

    /// Fetch the page that starts at `token` (`None` for the first page)
    async fn fetch_page(&self, token: Option<&str>) -> Result<Page<Self::Item>>;
}

/// Adapts an async closure into a [`PageFetcher`]
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap an async closure taking the current token as a fetcher
pub fn fn_fetcher<F, Fut, T>(f: F) -> FnFetcher<F>
where
    F: Fn(Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send,
    T: Send,
{
    FnFetcher { f }
}

#[async_trait]
impl<F, Fut, T> PageFetcher for FnFetcher<F>
where
    F: Fn(Option<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send,
    T: Send,
{
    type Item = T;

    async fn fetch_page(&self, token: Option<&str>) -> Result<Page<T>> {
        (self.f)(token.map(str::to_string)).await
    }
}

/// A shared fetcher pages the same way as the one it wraps
#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    type Item = F::Item;

    async fn fetch_page(&self, token: Option<&str>) -> Result<Page<F::Item>> {
        (**self).fetch_page(token).await
    }
}

impl<F> std::fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

/// Drives a [`PageFetcher`] until the service runs out of pages
pub struct AutoPaginator<F> {
    fetcher: F,
    initial_token: Option<String>,
    mode: PagingMode,
    cancel: CancelFlag,
}

impl<F: PageFetcher> AutoPaginator<F> {
    /// Create a paginator in automatic mode starting at the first page
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            initial_token: None,
            mode: PagingMode::Automatic,
            cancel: CancelFlag::new(),
        }
    }

    /// Start from a token instead of the first page
    #[must_use]
    pub fn with_initial_token(mut self, token: Option<String>) -> Self {
        self.initial_token = token;
        self
    }

    /// Set the paging mode
    #[must_use]
    pub fn with_mode(mut self, mode: PagingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Share a cancellation flag with the caller
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle to this paginator's cancellation flag
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// The wrapped fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch pages and hand each one to `consumer`.
    ///
    /// A fetch failure stops iteration and is returned as
    /// [`Error::PageFetch`]; a consumer error stops iteration and is returned
    /// unchanged. Pages delivered before the failure stay delivered.
    /// Cancellation is not an error: it ends with [`StopReason::Cancelled`].
    pub async fn run<C>(&self, mut consumer: C) -> Result<PaginationSummary>
    where
        C: FnMut(Page<F::Item>) -> Result<()>,
    {
        let mut state = PaginationState::new(self.initial_token.clone(), self.mode);

        loop {
            if self.cancel.is_cancelled() {
                state.stop(StopReason::Cancelled);
                info!(
                    pages = state.pages_fetched(),
                    "Pagination cancelled before next fetch"
                );
                return Ok(state.summary());
            }

            let page_number = state.pages_fetched() + 1;
            state.begin_fetch();
            debug!(page = page_number, token = ?state.token(), "Fetching page");

            let fetched = self.fetcher.fetch_page(state.token()).await;
            let page = match fetched {
                Ok(page) => page,
                Err(e) => {
                    state.stop(StopReason::Failed);
                    warn!(page = page_number, error = %e, "Page fetch failed, stopping pagination");
                    return Err(Error::page_fetch(page_number, e));
                }
            };

            state.begin_delivery();
            let next_token = page.continuation().map(str::to_string);
            if let Err(e) = consumer(page) {
                state.stop(StopReason::Failed);
                warn!(page = page_number, error = %e, "Consumer rejected page, stopping pagination");
                return Err(e);
            }

            match state.advance(next_token) {
                NextPage::Continue { .. } => {}
                NextPage::Done => {
                    let summary = state.summary();
                    if let Some(token) = &summary.resume_token {
                        info!(
                            pages = summary.pages,
                            next_token = %token,
                            "More results available; resume with this token"
                        );
                    } else {
                        debug!(pages = summary.pages, reason = ?summary.stop_reason, "Pagination complete");
                    }
                    return Ok(summary);
                }
            }
        }
    }

    /// Fetch every page and gather the batches in order
    pub async fn collect(&self) -> Result<Vec<F::Item>> {
        let mut batches = Vec::new();
        self.run(|page| {
            batches.push(page.batch);
            Ok(())
        })
        .await?;
        Ok(batches)
    }

    /// Expose the pages as a stream.
    ///
    /// The stream ends after the stopping page, after yielding the first
    /// error, or when the cancel flag is observed between pages.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page<F::Item>>> {
        let state = PaginationState::new(self.initial_token.clone(), self.mode);

        futures::stream::unfold((self, state), |(pager, mut state)| async move {
            if state.is_stopped() {
                return None;
            }
            if pager.cancel.is_cancelled() {
                state.stop(StopReason::Cancelled);
                info!(pages = state.pages_fetched(), "Pagination stream cancelled");
                return None;
            }

            let page_number = state.pages_fetched() + 1;
            state.begin_fetch();
            debug!(page = page_number, token = ?state.token(), "Fetching page");

            let fetched = pager.fetcher.fetch_page(state.token()).await;
            match fetched {
                Ok(page) => {
                    state.begin_delivery();
                    state.advance(page.continuation().map(str::to_string));
                    Some((Ok(page), (pager, state)))
                }
                Err(e) => {
                    state.stop(StopReason::Failed);
                    warn!(page = page_number, error = %e, "Page fetch failed, ending stream");
                    Some((Err(Error::page_fetch(page_number, e)), (pager, state)))
                }
            }
        })
    }
}

impl<F> std::fmt::Debug for AutoPaginator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoPaginator")
            .field("initial_token", &self.initial_token)
            .field("mode", &self.mode)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
