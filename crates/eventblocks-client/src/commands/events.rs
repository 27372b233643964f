//! The "get events" command: fetch a journal day's events and insert them as blocks.

use chrono::NaiveDate;
use eventblocks_core::{EventRecord, RenderConfig, render_day};
use tracing::{debug, error, info, warn};

use crate::blocks::{BlockId, BlockSink, InsertError};
use crate::error::ClientResult;
use crate::journal::{ContextError, JournalContext};
use crate::source::EventSource;

/// Inserted when the command runs outside a journal page.
pub const NOT_JOURNAL_PAGE_NOTICE: &str = "Error: This command only works on journal pages";

/// Notice for a day without events, or whose events could not be fetched.
pub fn no_events_notice(date: NaiveDate) -> String {
    format!("No events found for {}", date.format("%Y-%m-%d"))
}

/// Notice for an unexpected failure.
pub fn error_notice(message: impl std::fmt::Display) -> String {
    format!("Error fetching events: {}", message)
}

/// What a run of [`get_events`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not on a journal page; a notice was inserted.
    NotJournalPage,
    /// Nothing to insert for the day; a notice was inserted.
    NoEvents { date: NaiveDate },
    /// Event blocks were inserted.
    Inserted { date: NaiveDate, events: usize },
}

/// Fetches the events of the context's journal day and inserts one block
/// per event, earliest first, before the trigger block.
///
/// Upstream failures are logged and reported like an empty day. Exactly one
/// notice is inserted when no event blocks are.
pub async fn get_events<S, K>(
    ctx: &JournalContext,
    config: &RenderConfig,
    source: &S,
    sink: &mut K,
) -> ClientResult<Outcome>
where
    S: EventSource + ?Sized,
    K: BlockSink + ?Sized,
{
    let anchor = &ctx.trigger_block;

    let date = match ctx.date() {
        Ok(date) => date,
        Err(ContextError::NotJournalPage) => {
            info!("Not on a journal page");
            sink.insert_block(anchor, NOT_JOURNAL_PAGE_NOTICE)?;
            return Ok(Outcome::NotJournalPage);
        }
        Err(e) => {
            error!(error = %e, "Unusable journal context");
            sink.insert_block(anchor, &error_notice(&e))?;
            return Err(e.into());
        }
    };

    debug!(source = source.name(), date = %date, "Fetching events");
    let events = match source.fetch_events(date).await {
        Ok(events) => events,
        Err(e) => {
            warn!(source = source.name(), date = %date, error = %e, "Failed to fetch events");
            Vec::new()
        }
    };

    if events.is_empty() {
        info!(date = %date, "No events");
        sink.insert_block(anchor, &no_events_notice(date))?;
        return Ok(Outcome::NoEvents { date });
    }

    match insert_events(anchor, &events, config, sink) {
        Ok(count) => {
            info!(date = %date, events = count, "Inserted events");
            Ok(Outcome::Inserted { date, events: count })
        }
        Err(e) => {
            error!(error = %e, "Failed to insert events");
            if let Err(notice_err) = sink.insert_block(anchor, &error_notice(&e)) {
                warn!(error = %notice_err, "Failed to insert error notice");
            }
            Err(e.into())
        }
    }
}

fn insert_events<K>(
    anchor: &BlockId,
    events: &[EventRecord],
    config: &RenderConfig,
    sink: &mut K,
) -> Result<usize, InsertError>
where
    K: BlockSink + ?Sized,
{
    let rendered = render_day(events, config);

    for event in &rendered {
        let parent = sink.insert_block(anchor, &event.main_content)?;
        for child in &event.child_blocks {
            sink.insert_child(&parent, child)?;
        }
    }

    Ok(rendered.len())
}
