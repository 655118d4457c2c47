//! `FeedSource` doubles.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use matchfeed_runtime::FeedSource;
use matchfeed_types::{Card, FeedPage};
use tokio::sync::Notify;

/// One scripted response
#[derive(Debug)]
pub enum Step {
    Page(FeedPage),
    Fail(String),
    /// The fetch future panics with this message
    Panic(String),
    /// Respond with the page only after the gate is notified
    Gated(Arc<Notify>, FeedPage),
}

/// Serves a fixed script of responses in call order and records every
/// `(limit, offset)` it was asked for. An exhausted script serves empty pages.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<(usize, usize)>>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(pages: impl IntoIterator<Item = FeedPage>) -> Self {
        Self::new(pages.into_iter().map(Step::Page))
    }

    /// `(limit, offset)` of every fetch so far
    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn offsets(&self) -> Vec<usize> {
        self.calls().into_iter().map(|(_, offset)| offset).collect()
    }
}

impl FeedSource for ScriptedSource {
    fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = anyhow::Result<FeedPage>> + Send {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((limit, offset));
        }
        let step = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(Step::Page(FeedPage::default()));

        async move {
            match step {
                Step::Page(page) => Ok(page),
                Step::Fail(msg) => Err(anyhow!(msg)),
                Step::Panic(msg) => panic!("{}", msg),
                Step::Gated(gate, page) => {
                    gate.notified().await;
                    Ok(page)
                }
            }
        }
    }
}

/// Backend stand-in that slices a fixed population by offset
#[derive(Debug, Clone)]
pub struct SliceSource {
    users: Vec<Card>,
    recommended_count: usize,
}

impl SliceSource {
    pub fn new(users: Vec<Card>, recommended_count: usize) -> Self {
        Self {
            users,
            recommended_count,
        }
    }
}

impl FeedSource for SliceSource {
    fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = anyhow::Result<FeedPage>> + Send {
        let users = self
            .users
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        std::future::ready(Ok(FeedPage::new(users, self.recommended_count)))
    }
}
