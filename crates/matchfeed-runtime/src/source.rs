use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;
use std::sync::Mutex;

use anyhow::anyhow;
use matchfeed_types::FeedPage;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Paged access to the candidate feed.
///
/// `fetch_page(limit, offset)` must tolerate being called again with the
/// same arguments after a failure.
pub trait FeedSource: Send + Sync + 'static {
    fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = anyhow::Result<FeedPage>> + Send;
}

/// On-disk recording of a feed: the pages the backend served, in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recording {
    pub pages: Vec<FeedPage>,
}

/// Serves recorded pages one per request, regardless of offset.
/// Past the end of the recording every request gets an empty page.
#[derive(Debug, Default)]
pub struct ReplaySource {
    pages: Mutex<VecDeque<FeedPage>>,
}

impl ReplaySource {
    pub fn new(pages: Vec<FeedPage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let recording: Recording = serde_json::from_str(&content)?;
        Ok(Self::new(recording.pages))
    }

    pub fn remaining(&self) -> usize {
        self.pages.lock().map(|pages| pages.len()).unwrap_or(0)
    }
}

impl FeedSource for ReplaySource {
    fn fetch_page(
        &self,
        limit: usize,
        _offset: usize,
    ) -> impl Future<Output = anyhow::Result<FeedPage>> + Send {
        let next = self
            .pages
            .lock()
            .map_err(|_| anyhow!("replay source lock poisoned"))
            .map(|mut pages| {
                let mut page = pages.pop_front().unwrap_or_default();
                page.users.truncate(limit);
                page
            });
        std::future::ready(next)
    }
}
