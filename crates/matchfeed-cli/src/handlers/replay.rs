use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result, bail};
use matchfeed_engine::{BufferSnapshot, NavEffect, Screen, Swipe};
use matchfeed_runtime::{Config, FeedSession, ReplaySource};
use matchfeed_types::UserId;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info};

use crate::types::OutputFormat;

#[derive(Debug, Serialize)]
struct ReplayStep {
    step: usize,
    swipe: Swipe,
    screen: Screen,
    index: usize,
    user_id: Option<UserId>,
    effects: Vec<NavEffect>,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    loaded: usize,
    steps: Vec<ReplayStep>,
    buffer: BufferSnapshot,
}

pub fn handle(config: &Config, pages: &Path, swipes: &str, format: OutputFormat) -> Result<()> {
    let script = parse_swipes(swipes)?;
    let source = ReplaySource::from_file(pages)
        .with_context(|| format!("failed to read recording {}", pages.display()))?;

    debug!(
        recording = %pages.display(),
        pages = source.remaining(),
        swipes = script.len(),
        batch_size = config.feed.batch_size,
        "starting replay"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(replay(source, config, &script))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => print_plain(&report),
    }
    Ok(())
}

fn parse_swipes(swipes: &str) -> Result<Vec<Swipe>> {
    swipes
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match Swipe::from_char(c) {
            Some(swipe) => Ok(swipe),
            None => bail!("invalid swipe '{}': expected 'u' or 'd'", c),
        })
        .collect()
}

async fn replay(source: ReplaySource, config: &Config, script: &[Swipe]) -> Result<ReplayReport> {
    let mut session = FeedSession::new(source, config);
    session.open().await?;
    let loaded = session.buffer().len();

    let mut steps = Vec::with_capacity(script.len());
    for (i, &swipe) in script.iter().enumerate() {
        let effects = session.swipe(swipe);
        session.pump().await?;

        steps.push(ReplayStep {
            step: i + 1,
            swipe,
            screen: session.screen(),
            index: session.buffer().current_index(),
            user_id: session.current().map(|card| card.user_id.clone()),
            effects,
        });
    }

    info!(
        cards = session.buffer().len(),
        unused_pages = session.source().remaining(),
        has_more = session.buffer().has_more(),
        "replay finished"
    );

    Ok(ReplayReport {
        loaded,
        steps,
        buffer: session.buffer().snapshot(),
    })
}

fn print_plain(report: &ReplayReport) {
    let color = std::io::stdout().is_terminal();

    println!("loaded {} cards", report.loaded);

    for step in &report.steps {
        let arrow = match step.swipe {
            Swipe::Up => "up  ",
            Swipe::Down => "down",
        };
        let position = match step.screen {
            Screen::Card => format!(
                "#{} {}",
                step.index,
                step.user_id.as_ref().map(UserId::as_str).unwrap_or("-")
            ),
            Screen::RecommendationEnd => "end of recommendations".to_string(),
            Screen::EndOfFeed => "end of feed".to_string(),
        };
        let viewed = step.effects.iter().find_map(|effect| match effect {
            NavEffect::RecordView(id) => Some(id.as_str()),
            NavEffect::Prefetch(_) => None,
        });

        let line = match viewed {
            Some(id) => format!("{:>3} {} {}  (view {})", step.step, arrow, position, id),
            None => format!("{:>3} {} {}", step.step, arrow, position),
        };
        if color && step.screen != Screen::Card {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }

    let summary = format!(
        "cards: {}  index: {}  offset: {}  has_more: {}",
        report.buffer.cards,
        report.buffer.current_index,
        report.buffer.offset,
        report.buffer.has_more
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}
