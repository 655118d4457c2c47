//! Async driver for a [`FeedBuffer`].
//!
//! The session turns the buffer's page requests into background fetches on
//! the tokio runtime and feeds the responses back in arrival order. Fetches
//! are tagged with the buffer's request generation, so a response that
//! lands after [`FeedSession::reset`] is discarded instead of cancelled.
//! Dropping the session drops the receiving end; late responses then go
//! nowhere.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use matchfeed_engine::{
    Direction, FeedBuffer, FeedNavigator, Ingestion, NavEffect, PageRequest, Screen, Swipe,
};
use matchfeed_types::{Card, FeedPage, LikeOutcome, SuperlikeStatus, UserId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::source::FeedSource;
use crate::{Error, Result};

/// Retry behaviour of the fetch layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub attempts: u32,
    /// Delay before retry `n` is `backoff * n`
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Config::default().retry_policy()
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff: Duration::ZERO,
        }
    }
}

struct Completion {
    request: PageRequest,
    attempts: u32,
    result: anyhow::Result<FeedPage>,
}

pub struct FeedSession<S: FeedSource> {
    source: Arc<S>,
    buffer: FeedBuffer,
    navigator: FeedNavigator,
    retry: RetryPolicy,
    superlikes: Option<SuperlikeStatus>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<S: FeedSource> FeedSession<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self::with_buffer(source, FeedBuffer::new(config.buffer()), config.retry_policy())
    }

    pub fn with_buffer(source: S, buffer: FeedBuffer, retry: RetryPolicy) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            buffer,
            navigator: FeedNavigator::new(),
            retry,
            superlikes: None,
            tx,
            rx,
        }
    }

    pub fn buffer(&self) -> &FeedBuffer {
        &self.buffer
    }

    pub fn navigator(&self) -> &FeedNavigator {
        &self.navigator
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn screen(&self) -> Screen {
        self.navigator.screen()
    }

    pub fn current(&self) -> Option<&Card> {
        self.buffer.current()
    }

    /// Start a background fetch if the buffer wants one. Returns the request.
    ///
    /// The fetch runs in its own task and a second task waits on its handle,
    /// so a panicking source still reports back as a failed fetch.
    pub fn dispatch(&mut self) -> Option<PageRequest> {
        let request = self.buffer.poll_request()?;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let retry = self.retry;
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);

        let fetch = tokio::spawn(async move {
            let mut attempt = 1;
            loop {
                counter.store(attempt, Ordering::Relaxed);
                match source.fetch_page(request.limit, request.offset).await {
                    Ok(page) => break Ok(page),
                    Err(err) if attempt < retry.attempts => {
                        debug!(
                            offset = request.offset,
                            attempt,
                            error = %err,
                            "feed fetch failed, retrying"
                        );
                        tokio::time::sleep(retry.backoff * attempt).await;
                        attempt += 1;
                    }
                    Err(err) => break Err(err),
                }
            }
        });

        tokio::spawn(async move {
            let result = match fetch.await {
                Ok(result) => result,
                Err(err) => Err(anyhow!("feed fetch task failed: {}", err)),
            };

            // Receiver gone means the session was dropped; nothing to do.
            let _ = tx.send(Completion {
                request,
                attempts: attempts.load(Ordering::Relaxed).max(1),
                result,
            });
        });

        Some(request)
    }

    /// Wait for the outstanding fetch and apply it. Returns `None` when
    /// nothing is in flight. A failed fetch is reported as an error and
    /// leaves the buffer stalled until [`FeedSession::retry`].
    pub async fn settle(&mut self) -> Result<Option<Ingestion>> {
        if !self.buffer.is_fetching() {
            return Ok(None);
        }

        let Some(done) = self.rx.recv().await else {
            return Ok(None);
        };
        let generation = done.request.generation;

        match done.result {
            Ok(page) => {
                let ingestion = self.buffer.ingest(generation, page);
                self.dispatch();
                Ok(Some(ingestion))
            }
            Err(source) => {
                if !self.buffer.fail(generation) {
                    return Ok(Some(Ingestion::Stale));
                }
                warn!(
                    offset = done.request.offset,
                    attempts = done.attempts,
                    error = %source,
                    "feed fetch failed"
                );
                Err(Error::Fetch {
                    offset: done.request.offset,
                    attempts: done.attempts,
                    source,
                })
            }
        }
    }

    /// Dispatch and settle until the buffer has nothing left to fetch right
    /// now (cursor not at the tail, feed exhausted, or a fetch failed).
    pub async fn pump(&mut self) -> Result<()> {
        self.dispatch();
        while self.buffer.is_fetching() {
            self.settle().await?;
        }
        Ok(())
    }

    /// Load the first page
    pub async fn open(&mut self) -> Result<()> {
        self.pump().await
    }

    /// Apply a swipe and start any fetch it triggered
    pub fn swipe(&mut self, swipe: Swipe) -> Vec<NavEffect> {
        let effects = self.navigator.on_swipe(&mut self.buffer, swipe);
        self.dispatch();
        effects
    }

    /// Move the cursor directly, bypassing interstitial screens
    pub fn advance(&mut self, direction: Direction) -> bool {
        let moved = self.buffer.advance(direction);
        self.dispatch();
        moved
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.navigator.set_expanded(expanded);
    }

    /// Fold a like/superlike result into the buffered card
    pub fn apply_like(&mut self, user_id: &UserId, outcome: LikeOutcome) -> bool {
        self.buffer.record_like(user_id, outcome.liked)
    }

    /// Allowance as last fetched from the backend
    pub fn superlike_status(&self) -> Option<SuperlikeStatus> {
        self.superlikes
    }

    pub fn set_superlike_status(&mut self, status: SuperlikeStatus) {
        self.superlikes = Some(status);
    }

    /// Fold a superlike result into the buffered card and the allowance.
    /// The allowance is only touched once it has been fetched.
    pub fn apply_superlike(
        &mut self,
        user_id: &UserId,
        outcome: LikeOutcome,
        remaining: Option<u32>,
    ) -> bool {
        if let Some(status) = self.superlikes.as_mut() {
            status.consume(remaining);
        }
        self.buffer.record_like(user_id, outcome.liked)
    }

    /// Re-request the page whose fetch failed
    pub fn retry(&mut self) -> Option<PageRequest> {
        self.buffer.retry();
        self.dispatch()
    }

    /// Start over with an empty buffer; responses still in flight are ignored
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.navigator = FeedNavigator::new();
    }
}
