use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::future::Future;
use std::time::Duration;

use super::events::EventSource;
use super::pages::{self, Page};
use super::surface::RenderSurface;
use super::widgets::Widget;
use crate::api::{ApiError, DataClient, REPO_PAGE_SIZE};

/// Page shown when the session starts
pub const INITIAL_PAGE: Page = Page::Repository;

/// What a key press asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show(Page),
    Quit,
}

impl Command {
    /// Map a key press to a command. Releases, repeats and unbound keys map
    /// to nothing.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Command::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('h') => Some(Command::Show(Page::Help)),
            KeyCode::Char('u') => Some(Command::Show(Page::Account)),
            KeyCode::Char('p') => Some(Command::Show(Page::Repository)),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Why the event loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `q` or Ctrl+C
    Quit,
    /// The event source ran dry
    EventsClosed,
}

/// Interactive session: one page at a time, every transition re-fetches and
/// repaints the whole surface.
pub struct Session<C> {
    client: C,
    current_page: Page,
    fetch_timeout: Duration,
}

impl<C: DataClient> Session<C> {
    pub fn new(client: C, fetch_timeout: Duration) -> Self {
        Self {
            client,
            current_page: INITIAL_PAGE,
            fetch_timeout,
        }
    }

    pub fn current_page(&self) -> Page {
        self.current_page
    }

    /// Show the initial page, then process events until exit.
    ///
    /// Fetch failures are drawn as an error page and the loop keeps going.
    /// Only surface and event source errors end the session with `Err`.
    pub async fn run<S, E>(&mut self, surface: &mut S, events: &mut E) -> Result<Exit>
    where
        S: RenderSurface,
        E: EventSource,
    {
        self.show(INITIAL_PAGE, surface).await?;

        loop {
            let Some(event) = events.next_event()? else {
                tracing::debug!("Event source closed");
                return Ok(Exit::EventsClosed);
            };

            match event {
                Event::Key(key) => match Command::from_key(&key) {
                    Some(Command::Quit) => {
                        tracing::info!("Quit requested from {:?} page", self.current_page);
                        return Ok(Exit::Quit);
                    }
                    Some(Command::Show(page)) => self.show(page, surface).await?,
                    None => tracing::trace!("Ignoring unbound key {:?}", key.code),
                },
                // Layout is fixed; the next transition redraws at the new size.
                Event::Resize(columns, rows) => {
                    tracing::debug!("Terminal resized to {}x{}, not redrawing", columns, rows);
                }
                _ => {}
            }
        }
    }

    /// Transition to `page`: fetch what it needs, then clear and draw
    pub async fn show<S: RenderSurface>(&mut self, page: Page, surface: &mut S) -> Result<()> {
        tracing::debug!("Showing {:?} page", page);
        self.current_page = page;

        let widgets = self.build(page).await;

        surface.clear()?;
        surface.draw(&widgets)
    }

    async fn build(&self, page: Page) -> Vec<Widget> {
        let result = match page {
            Page::Help => return pages::help_page(),
            Page::Account => self
                .bounded(self.client.fetch_account())
                .await
                .map(|account| pages::account_page(&account)),
            Page::Repository => self
                .bounded(self.client.fetch_repositories(REPO_PAGE_SIZE))
                .await
                .map(|repositories| pages::repository_page(&repositories)),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!("Failed to load {:?} page: {}", page, e);
            pages::error_page(page, &e)
        })
    }

    async fn bounded<T>(&self, fetch: impl Future<Output = Result<T, ApiError>>) -> Result<T, ApiError> {
        tokio::time::timeout(self.fetch_timeout, fetch)
            .await
            .unwrap_or(Err(ApiError::Timeout(self.fetch_timeout)))
    }
}
