//! Delayed search assertions
//!
//! GeoNetwork indexes inserted and deleted metadata asynchronously, so a
//! search issued right after a mutation may still see the old state. The
//! [`DelayedSearch`] verifier repeats the search with linearly growing waits
//! until the hit count matches or the attempt budget is spent.
//!
//! With the default [`RetryPolicy`] the search runs at most 5 times and the
//! waits after each failed attempt are 1s, 2s, 3s, 4s and 5s, so a
//! verification that never matches gives up after 15s of waiting.
//!
//! # Interruption
//!
//! Waits go through a [`Waiter`]. An [`InterruptibleWaiter`] can be woken
//! early from another thread through its [`InterruptHandle`]; what happens
//! next is decided by [`InterruptPolicy`]:
//! - `Continue`: start the next attempt right away. The interrupted wait is
//!   not counted and the next wait does not grow.
//! - `Abort`: stop with `GnError::SearchInterrupted`.

use crate::geonetwork::client::CatalogClient;
use crate::geonetwork::error::{GnError, GnResult};
use crate::geonetwork::search::{SearchRequest, SearchResponse};
use log::{debug, error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// What to do when a wait between attempts is interrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptPolicy {
    /// Proceed to the next attempt immediately
    #[default]
    Continue,
    /// Give up with `GnError::SearchInterrupted`
    Abort,
}

/// Attempt budget and wait schedule for delayed searches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of searches
    pub max_attempts: u32,
    /// Wait after the first failed attempt
    pub initial_wait: Duration,
    /// Added to the wait after every completed wait
    pub wait_increment: Duration,
    pub on_interrupt: InterruptPolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_wait: Duration::from_millis(1000),
            wait_increment: Duration::from_millis(1000),
            on_interrupt: InterruptPolicy::Continue,
        }
    }
}

impl RetryPolicy {
    /// Validate the policy
    pub fn validate(&self) -> GnResult<()> {
        if self.max_attempts == 0 {
            return Err(GnError::config("max_attempts must be greater than 0"));
        }
        Ok(())
    }

    /// Total wait if every attempt fails and no wait is interrupted
    pub fn worst_case_wait(&self) -> Duration {
        (0..self.max_attempts).fold(Duration::ZERO, |total, i| {
            total + self.initial_wait + self.wait_increment * i
        })
    }
}

/// Result of a single wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration elapsed
    Elapsed,
    /// The wait ended early
    Interrupted,
}

/// Blocking wait between search attempts
pub trait Waiter {
    fn wait(&self, duration: Duration) -> WaitOutcome;
}

/// Plain `thread::sleep`; never interrupted
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadWaiter;

impl Waiter for ThreadWaiter {
    fn wait(&self, duration: Duration) -> WaitOutcome {
        std::thread::sleep(duration);
        WaitOutcome::Elapsed
    }
}

/// Cloneable handle used to interrupt an [`InterruptibleWaiter`]
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl InterruptHandle {
    /// Wake the current wait, or the next one if none is in progress
    pub fn interrupt(&self) {
        let (lock, cvar) = &*self.state;
        let mut interrupted = lock.lock().unwrap_or_else(|e| e.into_inner());
        *interrupted = true;
        cvar.notify_all();
    }
}

/// Condvar-backed wait that can be cut short through an [`InterruptHandle`]
#[derive(Debug, Clone, Default)]
pub struct InterruptibleWaiter {
    handle: InterruptHandle,
}

impl InterruptibleWaiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> InterruptHandle {
        self.handle.clone()
    }
}

impl Waiter for InterruptibleWaiter {
    fn wait(&self, duration: Duration) -> WaitOutcome {
        let (lock, cvar) = &*self.handle.state;
        let guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let (mut interrupted, _) = cvar
            .wait_timeout_while(guard, duration, |interrupted| !*interrupted)
            .unwrap_or_else(|e| e.into_inner());

        if *interrupted {
            // Consumed: one interrupt ends one wait
            *interrupted = false;
            WaitOutcome::Interrupted
        } else {
            WaitOutcome::Elapsed
        }
    }
}

/// The search to repeat: a structured request or a raw request document.
///
/// Exactly one form must be set when the expectation is verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchExpectation {
    request: Option<SearchRequest>,
    document: Option<PathBuf>,
}

/// Borrowed, validated form of a [`SearchExpectation`]
#[derive(Debug, Clone, Copy)]
pub enum SearchQuery<'a> {
    Request(&'a SearchRequest),
    Document(&'a Path),
}

impl SearchExpectation {
    pub fn request(request: SearchRequest) -> Self {
        Self {
            request: Some(request),
            document: None,
        }
    }

    pub fn document(path: impl Into<PathBuf>) -> Self {
        Self {
            request: None,
            document: Some(path.into()),
        }
    }

    pub fn with_request(mut self, request: SearchRequest) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.document = Some(path.into());
        self
    }

    /// The single query form, or `InvalidExpectation` if both or neither are set
    pub fn query(&self) -> GnResult<SearchQuery<'_>> {
        match (&self.request, &self.document) {
            (Some(request), None) => Ok(SearchQuery::Request(request)),
            (None, Some(document)) => Ok(SearchQuery::Document(document)),
            (Some(_), Some(_)) => Err(GnError::InvalidExpectation {
                reason: "both a search request and a request document were supplied".to_string(),
            }),
            (None, None) => Err(GnError::InvalidExpectation {
                reason: "neither a search request nor a request document was supplied"
                    .to_string(),
            }),
        }
    }
}

impl SearchQuery<'_> {
    fn run<C: CatalogClient + ?Sized>(&self, client: &mut C) -> GnResult<SearchResponse> {
        match self {
            SearchQuery::Request(request) => client.search(request),
            SearchQuery::Document(path) => client.search_document(path),
        }
    }
}

/// Outcome of a successful verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Searches issued, including the matching one
    pub attempts: u32,
    /// Time spent in completed waits
    pub waited_ms: u64,
}

impl VerifyReport {
    pub fn waited(&self) -> Duration {
        Duration::from_millis(self.waited_ms)
    }
}

/// Repeats searches until the index catches up
#[derive(Debug, Clone)]
pub struct DelayedSearch<W: Waiter = ThreadWaiter> {
    policy: RetryPolicy,
    waiter: W,
    label: String,
}

impl DelayedSearch<ThreadWaiter> {
    /// Default policy, real sleeps
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            waiter: ThreadWaiter,
            label: "delayed search".to_string(),
        }
    }

    pub fn with_policy(policy: RetryPolicy) -> GnResult<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            ..Self::new()
        })
    }
}

impl Default for DelayedSearch<ThreadWaiter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Waiter> DelayedSearch<W> {
    /// Replace the waiter, keeping policy and label
    pub fn with_waiter<V: Waiter>(self, waiter: V) -> DelayedSearch<V> {
        DelayedSearch {
            policy: self.policy,
            waiter,
            label: self.label,
        }
    }

    /// Name used as prefix in log lines, typically the running scenario
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn waiter(&self) -> &W {
        &self.waiter
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Search until the hit count equals `expected`.
    ///
    /// Search errors are returned immediately; only count mismatches are
    /// retried.
    pub fn verify_count<C: CatalogClient + ?Sized>(
        &self,
        client: &mut C,
        expectation: &SearchExpectation,
        expected: usize,
    ) -> GnResult<VerifyReport> {
        let query = expectation.query()?;

        let mut wait = self.policy.initial_wait;
        let mut waited = Duration::ZERO;
        let mut actual = 0;

        for attempt in 0..self.policy.max_attempts {
            actual = query.run(client)?.count();

            if actual == expected {
                if attempt > 0 {
                    info!(
                        "{}: search count passed after {} ms",
                        self.label,
                        waited.as_millis()
                    );
                }
                return Ok(VerifyReport {
                    attempts: attempt + 1,
                    waited_ms: waited.as_millis() as u64,
                });
            }

            info!(
                "{}: search failed (got:{} != exp:{}), retrying in {} ms...",
                self.label,
                actual,
                expected,
                wait.as_millis()
            );

            match self.waiter.wait(wait) {
                WaitOutcome::Elapsed => {
                    waited += wait;
                    wait += self.policy.wait_increment;
                }
                WaitOutcome::Interrupted => match self.policy.on_interrupt {
                    InterruptPolicy::Continue => {
                        debug!("{}: wait interrupted, retrying now", self.label);
                    }
                    InterruptPolicy::Abort => {
                        let err = GnError::SearchInterrupted {
                            expected,
                            actual,
                            attempts: attempt + 1,
                        };
                        error!("{}: {}", self.label, err);
                        return Err(err);
                    }
                },
            }
        }

        let err = GnError::ConsistencyTimeout {
            expected,
            actual,
            retries: self.policy.max_attempts,
            waited_ms: waited.as_millis() as u64,
        };
        error!("{}: {}", self.label, err);
        Err(err)
    }

    /// [`DelayedSearch::verify_count`] with a structured request
    pub fn assert_count<C: CatalogClient + ?Sized>(
        &self,
        expected: usize,
        client: &mut C,
        request: &SearchRequest,
    ) -> GnResult<VerifyReport> {
        self.verify_count(client, &SearchExpectation::request(request.clone()), expected)
    }

    /// [`DelayedSearch::verify_count`] with a request document on disk
    pub fn assert_count_document<C: CatalogClient + ?Sized>(
        &self,
        expected: usize,
        client: &mut C,
        document: &Path,
    ) -> GnResult<VerifyReport> {
        self.verify_count(client, &SearchExpectation::document(document), expected)
    }
}
