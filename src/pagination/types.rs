//! Pagination types
//!
//! Pages, paging modes and the state tracked while iterating.

use crate::types::OptionStringExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One batch of results plus the token for the next batch
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The result batch, opaque to the paginator
    pub batch: T,
    /// Continuation token returned by the service
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(batch: T, next_token: Option<String>) -> Self {
        Self { batch, next_token }
    }

    /// Create a page that has a continuation token
    pub fn with_token(batch: T, token: impl Into<String>) -> Self {
        Self {
            batch,
            next_token: Some(token.into()),
        }
    }

    /// Create a final page (no continuation token)
    pub fn last(batch: T) -> Self {
        Self {
            batch,
            next_token: None,
        }
    }

    /// The continuation token, treating an empty token as absent
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Check if the service reported more data
    pub fn has_more(&self) -> bool {
        self.continuation().is_some()
    }

    /// Map the batch, keeping the token
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Page<U> {
        Page {
            batch: f(self.batch),
            next_token: self.next_token,
        }
    }
}

/// Who decides whether another page is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingMode {
    /// Follow continuation tokens until the service returns none
    #[default]
    Automatic,
    /// Fetch a single page; the caller resumes with the returned token
    CallerControlled,
}

impl PagingMode {
    /// Derive the mode from command flags.
    ///
    /// Supplying a token explicitly, or turning off automatic iteration,
    /// hands paging over to the caller.
    pub fn from_flags(no_auto_iteration: bool, token_supplied: bool) -> Self {
        if no_auto_iteration || token_supplied {
            Self::CallerControlled
        } else {
            Self::Automatic
        }
    }

    /// Check if the caller controls paging
    pub fn is_caller_controlled(&self) -> bool {
        matches!(self, Self::CallerControlled)
    }
}

/// Why iteration stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The service returned no continuation token
    Exhausted,
    /// One page was fetched on the caller's behalf
    CallerControlled,
    /// The cancel flag was set between pages
    Cancelled,
    /// A fetch or the consumer failed
    Failed,
}

/// Phase of the pagination state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationPhase {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// A fetch is in flight
    Fetching,
    /// A page is being handed to the consumer
    Delivering,
    /// Terminal
    Stopped(StopReason),
}

/// Result of advancing the state after a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch again with this token
    Continue {
        /// Token to send with the next request
        token: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state during one paginated call
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Token sent with the next fetch
    token: Option<String>,
    /// Paging mode
    mode: PagingMode,
    /// Current phase
    phase: PaginationPhase,
    /// Pages successfully fetched so far
    pages_fetched: usize,
    /// Token left unconsumed when iteration stopped early
    resume_token: Option<String>,
}

impl PaginationState {
    /// Create state for a new paginated call
    pub fn new(initial_token: Option<String>, mode: PagingMode) -> Self {
        Self {
            token: initial_token.none_if_empty(),
            mode,
            ..Default::default()
        }
    }

    /// Token for the next fetch
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Paging mode
    pub fn mode(&self) -> PagingMode {
        self.mode
    }

    /// Current phase
    pub fn phase(&self) -> PaginationPhase {
        self.phase
    }

    /// Pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Check if iteration has stopped
    pub fn is_stopped(&self) -> bool {
        matches!(self.phase, PaginationPhase::Stopped(_))
    }

    /// Enter the fetching phase
    pub fn begin_fetch(&mut self) {
        self.phase = PaginationPhase::Fetching;
    }

    /// Record a successful fetch and enter the delivering phase
    pub fn begin_delivery(&mut self) {
        self.pages_fetched += 1;
        self.phase = PaginationPhase::Delivering;
    }

    /// Stop iterating
    pub fn stop(&mut self, reason: StopReason) {
        if matches!(reason, StopReason::Cancelled) {
            self.resume_token.clone_from(&self.token);
        }
        self.phase = PaginationPhase::Stopped(reason);
    }

    /// Decide what happens after a delivered page
    pub fn advance(&mut self, next_token: Option<String>) -> NextPage {
        let next_token = next_token.none_if_empty();

        if self.mode.is_caller_controlled() {
            self.resume_token = next_token;
            self.stop(StopReason::CallerControlled);
            return NextPage::Done;
        }

        match next_token {
            Some(token) => {
                self.token = Some(token.clone());
                NextPage::Continue { token }
            }
            None => {
                self.token = None;
                self.stop(StopReason::Exhausted);
                NextPage::Done
            }
        }
    }

    /// Summarize a stopped iteration
    pub fn summary(&self) -> PaginationSummary {
        let stop_reason = match self.phase {
            PaginationPhase::Stopped(reason) => reason,
            _ => StopReason::Failed,
        };
        PaginationSummary {
            pages: self.pages_fetched,
            stop_reason,
            resume_token: self.resume_token.clone(),
        }
    }
}

/// Outcome of a completed (not failed) paginated call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSummary {
    /// Pages fetched and delivered
    pub pages: usize,
    /// Why iteration stopped
    pub stop_reason: StopReason,
    /// Token to resume from, when iteration stopped before the service ran out
    pub resume_token: Option<String>,
}

/// Shared cancellation signal, observed between pages
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a new, unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
