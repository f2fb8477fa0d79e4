//! Interactive session: a menu loop over fetch / table / single-record.
//!
//! The record cursor is owned by the session and survives leaving and
//! re-entering single-record mode.

use anyhow::{Context, Result};
use inquire::{InquireError, Select};
use std::fmt;

use weatherlog_core::{
    Config, Navigation, RecordCursor, ViewMode, WeatherStore, action::SAVED_MESSAGE,
    fetch_and_save, provider::fetcher_from_config, view,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Fetch,
    View(ViewMode),
    Quit,
}

impl MenuItem {
    fn all() -> Vec<MenuItem> {
        let mut items = vec![MenuItem::Fetch];
        items.extend(ViewMode::all().iter().copied().map(MenuItem::View));
        items.push(MenuItem::Quit);
        items
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Fetch => f.write_str("Fetch and save weather data"),
            MenuItem::View(ViewMode::Table) => f.write_str("Table view"),
            MenuItem::View(ViewMode::SingleRecord) => f.write_str("Single record"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordAction {
    Previous,
    Next,
    Back,
}

impl fmt::Display for RecordAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordAction::Previous => "Previous",
            RecordAction::Next => "Next",
            RecordAction::Back => "Back",
        })
    }
}

pub struct Session {
    config: Config,
    store: WeatherStore,
    cursor: RecordCursor,
}

impl Session {
    pub fn new(config: Config, store: WeatherStore) -> Self {
        Self {
            config,
            store,
            cursor: RecordCursor::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("Weather app");

        loop {
            let Some(choice) = prompt(Select::new("Choose an action:", MenuItem::all()))? else {
                return Ok(());
            };

            match choice {
                MenuItem::Fetch => self.fetch().await,
                MenuItem::View(ViewMode::Table) => {
                    println!("\n{}\n", view::table_view(&self.store)?);
                }
                MenuItem::View(ViewMode::SingleRecord) => self.browse_records()?,
                MenuItem::Quit => return Ok(()),
            }
        }
    }

    /// A failed fetch is reported and the session carries on.
    async fn fetch(&self) {
        let result = match fetcher_from_config(&self.config) {
            Ok(fetcher) => fetch_and_save(fetcher.as_ref(), &self.store).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(summary) => println!("{SAVED_MESSAGE} ({})", summary.timestamp),
            Err(err) => {
                tracing::warn!(error = %err, "fetch failed");
                eprintln!("Error: {err:#}");
            }
        }
    }

    fn browse_records(&mut self) -> Result<()> {
        let mut shown = view::single_record_view(&self.store, self.cursor, None)?;

        loop {
            self.cursor = shown.cursor;
            let Some(text) = shown.rendered.take() else {
                return Ok(());
            };
            println!("\n{text}\n");

            let actions = vec![RecordAction::Previous, RecordAction::Next, RecordAction::Back];
            let nav = match prompt(Select::new("Navigate:", actions))? {
                Some(RecordAction::Previous) => Navigation::Previous,
                Some(RecordAction::Next) => Navigation::Next,
                Some(RecordAction::Back) | None => return Ok(()),
            };

            shown = view::single_record_view(&self.store, self.cursor, Some(nav))?;
        }
    }
}

/// Run a prompt; Esc or Ctrl-C yields `None` instead of an error.
fn prompt<T: fmt::Display>(select: Select<'_, T>) -> Result<Option<T>> {
    match select.prompt() {
        Ok(choice) => Ok(Some(choice)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read selection"),
    }
}
