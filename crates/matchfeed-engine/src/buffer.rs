//! Paged feed buffer with session-wide deduplication.
//!
//! The buffer owns everything the feed screen knows about candidates: the
//! accumulated card list, a cursor into it, the dedup set and the paging
//! offset. It never talks to the network. Instead, [`FeedBuffer::poll_request`]
//! hands out a [`PageRequest`] whenever the cursor reaches the tail, and the
//! caller reports back through [`FeedBuffer::ingest`] or [`FeedBuffer::fail`].
//!
//! Each request carries a generation number. Only the response for the
//! latest outstanding generation is applied; anything else is reported as
//! [`Ingestion::Stale`] and dropped. [`FeedBuffer::reset`] bumps the
//! generation, which is how a torn-down feed ignores late responses.

use std::collections::HashSet;

use matchfeed_types::{Card, FeedPage, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_DUPLICATE_PAGES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Page size requested per fetch
    pub batch_size: usize,

    /// Consecutive all-duplicate pages tolerated before the feed is treated
    /// as exhausted. `0` disables the bound.
    pub max_duplicate_pages: u32,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_duplicate_pages: DEFAULT_MAX_DUPLICATE_PAGES,
        }
    }
}

impl BufferConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_max_duplicate_pages(mut self, max: u32) -> Self {
        self.max_duplicate_pages = max;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

/// A page fetch the caller must perform: `fetch_page(limit, offset)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub generation: u64,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// New cards appended to the buffer
    pub appended: usize,
    /// Cards dropped because their id was already seen
    pub duplicates: usize,
    /// The page ended the feed (`has_more` is now false)
    pub exhausted: bool,
    /// A follow-up request was scheduled because the page held nothing new
    pub refetch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingestion {
    /// Response did not belong to the outstanding request
    Stale,
    Applied(IngestReport),
}

/// Serializable view of the buffer's bookkeeping, for logs and tooling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferSnapshot {
    pub cards: usize,
    pub current_index: usize,
    pub offset: usize,
    pub has_more: bool,
    pub recommended_count: Option<usize>,
    pub in_flight: Option<PageRequest>,
    pub stalled: bool,
}

#[derive(Debug, Clone)]
pub struct FeedBuffer {
    config: BufferConfig,
    cards: Vec<Card>,
    seen: HashSet<UserId>,
    offset: usize,
    current: usize,
    has_more: bool,
    recommended_count: Option<usize>,

    started: bool,
    in_flight: Option<PageRequest>,
    generation: u64,
    follow_up: bool,
    stalled: bool,
    duplicate_streak: u32,
}

impl Default for FeedBuffer {
    fn default() -> Self {
        Self::new(BufferConfig::default())
    }
}

impl FeedBuffer {
    pub fn new(config: BufferConfig) -> Self {
        let config = config.with_batch_size(config.batch_size);
        Self {
            config,
            cards: Vec::new(),
            seen: HashSet::new(),
            offset: 0,
            current: 0,
            has_more: true,
            recommended_count: None,
            started: false,
            in_flight: None,
            generation: 0,
            follow_up: false,
            stalled: false,
            duplicate_streak: 0,
        }
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Card> {
        self.cards.get(self.current)
    }

    /// Card right after the cursor, if already buffered
    pub fn peek_next(&self) -> Option<&Card> {
        self.cards.get(self.current + 1)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Size of the recommended prefix, frozen from the first page
    pub fn recommended_count(&self) -> Option<usize> {
        self.recommended_count
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// First page still loading and nothing to show yet
    pub fn is_loading(&self) -> bool {
        self.cards.is_empty() && (self.in_flight.is_some() || !self.started)
    }

    /// Last fetch failed and no retry has been requested
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    pub fn is_at_tail(&self) -> bool {
        !self.cards.is_empty() && self.current == self.cards.len() - 1
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            cards: self.cards.len(),
            current_index: self.current,
            offset: self.offset,
            has_more: self.has_more,
            recommended_count: self.recommended_count,
            in_flight: self.in_flight,
            stalled: self.stalled,
        }
    }

    /// Move the cursor one card in `direction`. Returns whether it moved.
    pub fn advance(&mut self, direction: Direction) -> bool {
        if self.cards.is_empty() {
            return false;
        }

        match direction {
            Direction::Forward if self.current + 1 < self.cards.len() => {
                self.current += 1;
                true
            }
            Direction::Backward if self.current > 0 => {
                self.current -= 1;
                true
            }
            _ => false,
        }
    }

    /// Patch the liked flag of a buffered card. Unknown ids are ignored.
    pub fn record_like(&mut self, user_id: &UserId, liked: bool) -> bool {
        match self.cards.iter_mut().find(|card| &card.user_id == user_id) {
            Some(card) => {
                card.is_liked = liked;
                true
            }
            None => false,
        }
    }

    /// The fetch trigger. Returns the next page request if one is due and
    /// marks it as in flight; returns `None` while a request is outstanding,
    /// after a failure, or once the feed is exhausted.
    pub fn poll_request(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || self.stalled || !self.has_more {
            return None;
        }

        if !self.started {
            self.started = true;
            return Some(self.issue());
        }

        if self.follow_up {
            self.follow_up = false;
            return Some(self.issue());
        }

        if self.is_at_tail() {
            self.offset += self.config.batch_size;
            return Some(self.issue());
        }

        None
    }

    fn issue(&mut self) -> PageRequest {
        self.generation += 1;
        let request = PageRequest {
            generation: self.generation,
            limit: self.config.batch_size,
            offset: self.offset,
        };
        debug!(
            generation = request.generation,
            limit = request.limit,
            offset = request.offset,
            "requesting feed page"
        );
        self.in_flight = Some(request);
        request
    }

    fn take_in_flight(&mut self, generation: u64) -> Option<PageRequest> {
        match self.in_flight {
            Some(request) if request.generation == generation => self.in_flight.take(),
            _ => None,
        }
    }

    /// Apply a fetched page
    pub fn ingest(&mut self, generation: u64, page: FeedPage) -> Ingestion {
        let Some(request) = self.take_in_flight(generation) else {
            debug!(generation, "discarding stale feed page");
            return Ingestion::Stale;
        };

        if self.recommended_count.is_none() {
            self.recommended_count = Some(page.recommended_count);
        }

        let received = page.users.len();
        let mut appended = 0;
        for card in page.users {
            if self.seen.insert(card.user_id.clone()) {
                self.cards.push(card);
                appended += 1;
            }
        }
        let duplicates = received - appended;

        let mut report = IngestReport {
            appended,
            duplicates,
            exhausted: false,
            refetch: false,
        };

        if received < request.limit {
            self.has_more = false;
            report.exhausted = true;
        } else if appended == 0 {
            self.duplicate_streak += 1;
            let bound = self.config.max_duplicate_pages;
            if bound > 0 && self.duplicate_streak >= bound {
                warn!(
                    offset = self.offset,
                    pages = self.duplicate_streak,
                    "feed keeps serving already-seen cards, treating it as exhausted"
                );
                self.has_more = false;
                report.exhausted = true;
            } else {
                self.offset += self.config.batch_size;
                self.follow_up = true;
                report.refetch = true;
            }
        }

        if appended > 0 {
            self.duplicate_streak = 0;
        }

        debug!(
            generation,
            appended,
            duplicates,
            has_more = self.has_more,
            total = self.cards.len(),
            "ingested feed page"
        );

        Ingestion::Applied(report)
    }

    /// Record a failed fetch. Buffer contents, cursor and offset stay as they
    /// were; no further request is issued until [`FeedBuffer::retry`].
    pub fn fail(&mut self, generation: u64) -> bool {
        if self.take_in_flight(generation).is_none() {
            return false;
        }
        debug!(generation, offset = self.offset, "feed page request failed");
        self.stalled = true;
        true
    }

    /// Re-request the page that failed, at the same limit and offset.
    pub fn retry(&mut self) {
        if self.stalled {
            self.stalled = false;
            self.follow_up = true;
        }
    }

    /// Drop all cards and start over. Outstanding responses become stale.
    pub fn reset(&mut self) {
        let generation = self.generation;
        *self = Self::new(self.config);
        self.generation = generation + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Card {
        Card::new(id)
    }

    fn page(ids: impl IntoIterator<Item = usize>, recommended: usize) -> FeedPage {
        FeedPage::new(
            ids.into_iter().map(|i| card(&format!("u{}", i))).collect(),
            recommended,
        )
    }

    fn ids(buffer: &FeedBuffer) -> Vec<String> {
        buffer
            .cards()
            .iter()
            .map(|c| c.user_id.to_string())
            .collect()
    }

    /// Ingest one page for whatever request is due; panics if none is.
    fn serve(buffer: &mut FeedBuffer, page: FeedPage) -> IngestReport {
        let request = buffer.poll_request().expect("a request should be due");
        match buffer.ingest(request.generation, page) {
            Ingestion::Applied(report) => report,
            Ingestion::Stale => panic!("response unexpectedly stale"),
        }
    }

    fn move_to_tail(buffer: &mut FeedBuffer) {
        while buffer.advance(Direction::Forward) {}
    }

    #[test]
    fn test_first_full_page_does_not_trigger_second_fetch() {
        let mut buffer = FeedBuffer::default();

        let first = buffer.poll_request().unwrap();
        assert_eq!((first.limit, first.offset), (10, 0));
        assert!(buffer.is_loading());

        buffer.ingest(first.generation, page(0..10, 3));
        assert!(buffer.has_more());
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.poll_request(), None);

        for _ in 0..8 {
            assert!(buffer.advance(Direction::Forward));
            assert_eq!(buffer.poll_request(), None);
        }
        assert_eq!(buffer.current_index(), 8);
    }

    #[test]
    fn test_tail_issues_next_offset_exactly_once() {
        let mut buffer = FeedBuffer::default();
        serve(&mut buffer, page(0..10, 0));
        move_to_tail(&mut buffer);
        assert_eq!(buffer.current_index(), 9);

        let next = buffer.poll_request().unwrap();
        assert_eq!(next.offset, 10);
        assert_eq!(buffer.offset(), 10);
        assert_eq!(buffer.poll_request(), None);
        assert_eq!(buffer.poll_request(), None);
    }

    #[test]
    fn test_all_duplicate_page_refetches_without_navigation() {
        let mut buffer = FeedBuffer::default();
        serve(&mut buffer, page(0..10, 0));
        move_to_tail(&mut buffer);

        let report = serve(&mut buffer, page(0..10, 0));
        assert_eq!(report.appended, 0);
        assert_eq!(report.duplicates, 10);
        assert!(report.refetch);
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.offset(), 20);

        let third = buffer.poll_request().unwrap();
        assert_eq!(third.offset, 20);
        assert_eq!(buffer.current_index(), 9);
    }

    #[test]
    fn test_short_page_ends_feed() {
        let mut buffer = FeedBuffer::default();
        serve(&mut buffer, page(0..10, 0));
        move_to_tail(&mut buffer);

        let report = serve(&mut buffer, page(10..14, 0));
        assert_eq!(report.appended, 4);
        assert!(report.exhausted);
        assert!(!buffer.has_more());
        assert_eq!(buffer.len(), 14);

        move_to_tail(&mut buffer);
        assert_eq!(buffer.poll_request(), None);
        assert!(!buffer.advance(Direction::Forward));
        assert_eq!(buffer.current_index(), 13);
    }

    #[test]
    fn test_empty_first_page_ends_feed() {
        let mut buffer = FeedBuffer::default();
        let report = serve(&mut buffer, FeedPage::default());
        assert!(report.exhausted);
        assert!(buffer.is_empty());
        assert!(!buffer.is_loading());
        assert_eq!(buffer.poll_request(), None);
        assert!(!buffer.advance(Direction::Forward));
        assert!(!buffer.advance(Direction::Backward));
    }

    #[test]
    fn test_record_like_patches_only_matching_card() {
        let mut buffer = FeedBuffer::default();
        serve(&mut buffer, page(0..10, 0));

        assert!(buffer.record_like(&UserId::new("u7"), true));
        for card in buffer.cards() {
            assert_eq!(card.is_liked, card.user_id.as_str() == "u7");
        }

        assert!(!buffer.record_like(&UserId::new("missing"), true));
        assert_eq!(buffer.cards().iter().filter(|c| c.is_liked).count(), 1);
    }

    #[test]
    fn test_recommended_count_frozen_after_first_page() {
        let mut buffer = FeedBuffer::default();
        serve(&mut buffer, page(0..10, 4));
        move_to_tail(&mut buffer);
        serve(&mut buffer, page(10..20, 9));
        move_to_tail(&mut buffer);
        serve(&mut buffer, page(20..22, 0));

        assert_eq!(buffer.recommended_count(), Some(4));
    }

    #[test]
    fn test_partial_duplicates_are_filtered() {
        let mut buffer = FeedBuffer::default();
        serve(&mut buffer, page(0..10, 0));
        move_to_tail(&mut buffer);

        let report = serve(&mut buffer, page(5..15, 0));
        assert_eq!(report.appended, 5);
        assert_eq!(report.duplicates, 5);
        assert!(!report.refetch);
        assert_eq!(ids(&buffer)[10..], ["u10", "u11", "u12", "u13", "u14"]);
    }

    #[test]
    fn test_duplicates_inside_one_page() {
        let mut buffer = FeedBuffer::new(BufferConfig::default().with_batch_size(3));
        let report = serve(
            &mut buffer,
            FeedPage::new(vec![card("a"), card("a"), card("b")], 0),
        );
        assert_eq!(report.appended, 2);
        assert_eq!(ids(&buffer), ["a", "b"]);
        assert!(buffer.has_more());
    }

    #[test]
    fn test_backward_clamps_at_zero() {
        let mut buffer = FeedBuffer::default();
        assert!(!buffer.advance(Direction::Backward));

        serve(&mut buffer, page(0..10, 0));
        assert!(!buffer.advance(Direction::Backward));
        assert!(buffer.advance(Direction::Forward));
        assert!(buffer.advance(Direction::Backward));
        assert_eq!(buffer.current_index(), 0);
    }

    #[test]
    fn test_failure_leaves_state_and_waits_for_retry() {
        let mut buffer = FeedBuffer::default();
        serve(&mut buffer, page(0..10, 2));
        move_to_tail(&mut buffer);

        let request = buffer.poll_request().unwrap();
        let before = (buffer.len(), buffer.offset(), buffer.current_index());
        assert!(buffer.fail(request.generation));
        assert_eq!(
            (buffer.len(), buffer.offset(), buffer.current_index()),
            before
        );
        assert!(buffer.is_stalled());
        assert_eq!(buffer.poll_request(), None);

        buffer.retry();
        let again = buffer.poll_request().unwrap();
        assert_eq!((again.limit, again.offset), (request.limit, request.offset));
        assert_ne!(again.generation, request.generation);
    }

    #[test]
    fn test_stale_responses_are_ignored() {
        let mut buffer = FeedBuffer::default();
        let request = buffer.poll_request().unwrap();
        buffer.reset();

        assert_eq!(buffer.ingest(request.generation, page(0..10, 1)), Ingestion::Stale);
        assert!(!buffer.fail(request.generation));
        assert!(buffer.is_empty());
        assert_eq!(buffer.recommended_count(), None);

        let fresh = buffer.poll_request().unwrap();
        assert!(fresh.generation > request.generation);
        assert_eq!(fresh.offset, 0);
    }

    #[test]
    fn test_duplicate_streak_is_bounded() {
        let config = BufferConfig::default().with_max_duplicate_pages(3);
        let mut buffer = FeedBuffer::new(config);
        serve(&mut buffer, page(0..10, 0));
        move_to_tail(&mut buffer);

        assert!(serve(&mut buffer, page(0..10, 0)).refetch);
        assert!(serve(&mut buffer, page(0..10, 0)).refetch);
        let last = serve(&mut buffer, page(0..10, 0));
        assert!(!last.refetch);
        assert!(last.exhausted);
        assert!(!buffer.has_more());
        assert_eq!(buffer.poll_request(), None);
        assert_eq!(buffer.offset(), 30);
    }

    #[test]
    fn test_unbounded_duplicate_refetch_when_disabled() {
        let config = BufferConfig::default().with_max_duplicate_pages(0);
        let mut buffer = FeedBuffer::new(config);
        serve(&mut buffer, page(0..10, 0));
        move_to_tail(&mut buffer);

        for _ in 0..20 {
            assert!(serve(&mut buffer, page(0..10, 0)).refetch);
        }
        assert!(buffer.has_more());
        assert_eq!(buffer.offset(), 210);
    }

    #[test]
    fn test_streak_resets_after_new_cards() {
        let config = BufferConfig::default().with_max_duplicate_pages(2);
        let mut buffer = FeedBuffer::new(config);
        serve(&mut buffer, page(0..10, 0));
        move_to_tail(&mut buffer);

        assert!(serve(&mut buffer, page(0..10, 0)).refetch);
        serve(&mut buffer, page(10..20, 0));
        move_to_tail(&mut buffer);
        assert!(serve(&mut buffer, page(10..20, 0)).refetch);
        assert!(buffer.has_more());
    }

    #[test]
    fn test_invariants_over_mixed_page_sequence() {
        // (start, len) of each page the backend serves, overlapping on purpose
        let script = [(0, 10), (5, 10), (5, 10), (12, 10), (30, 10), (31, 10), (50, 3)];
        let mut buffer = FeedBuffer::default();
        let mut last_offset = 0;

        for (start, len) in script {
            move_to_tail(&mut buffer);
            let Some(request) = buffer.poll_request() else {
                break;
            };
            assert!(request.offset >= last_offset);
            assert!(request.offset - last_offset <= 10);
            last_offset = request.offset;
            buffer.ingest(request.generation, page(start..start + len, 0));

            let unique: HashSet<_> = buffer.cards().iter().map(|c| &c.user_id).collect();
            assert_eq!(unique.len(), buffer.len());
        }

        assert!(!buffer.has_more());
        move_to_tail(&mut buffer);
        assert_eq!(buffer.poll_request(), None);
    }
}
