//! Invocation context: which block triggered the command and on which page.
//!
//! Journal pages are identified by a `YYYYMMDD` integer ("journal day"),
//! e.g. `20250818` for 18 August 2025.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::blocks::BlockId;

/// Errors resolving the invocation context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The trigger block is not on a journal page.
    #[error("this command only works on journal pages")]
    NotJournalPage,

    /// The journal day is not a real calendar date.
    #[error("invalid journal day {0}, expected YYYYMMDD")]
    InvalidJournalDay(u32),
}

/// Converts a `YYYYMMDD` journal day to a date.
pub fn journal_day_to_date(journal_day: u32) -> Result<NaiveDate, ContextError> {
    let year = journal_day / 10_000;
    let month = (journal_day / 100) % 100;
    let day = journal_day % 100;

    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or(ContextError::InvalidJournalDay(journal_day))
}

/// Converts a date to its `YYYYMMDD` journal day.
pub fn date_to_journal_day(date: NaiveDate) -> u32 {
    let year = u32::try_from(date.year()).unwrap_or_default();
    year * 10_000 + date.month() * 100 + date.day()
}

/// The block and page a command was invoked from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalContext {
    /// Block the command was typed into. New blocks go right before it.
    pub trigger_block: BlockId,
    /// Journal day of the page, if it is a journal page.
    pub journal_day: Option<u32>,
}

impl JournalContext {
    /// Creates a context on a page that is not a journal page.
    pub fn new(trigger_block: BlockId) -> Self {
        Self {
            trigger_block,
            journal_day: None,
        }
    }

    /// Creates a context on the journal page of `date`.
    pub fn for_date(trigger_block: BlockId, date: NaiveDate) -> Self {
        Self::new(trigger_block).with_journal_day(date_to_journal_day(date))
    }

    /// Builder method to set the journal day.
    #[must_use]
    pub fn with_journal_day(mut self, journal_day: u32) -> Self {
        self.journal_day = Some(journal_day);
        self
    }

    /// Returns the date of the journal page.
    pub fn date(&self) -> Result<NaiveDate, ContextError> {
        self.journal_day
            .ok_or(ContextError::NotJournalPage)
            .and_then(journal_day_to_date)
    }
}
