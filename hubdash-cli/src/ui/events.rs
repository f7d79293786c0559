use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;

/// Source of terminal input events, consumed by exactly one session
pub trait EventSource {
    /// Block until the next event. `None` means the source is exhausted.
    fn next_event(&mut self) -> Result<Option<Event>>;
}

/// Events read from the real terminal. Never exhausted.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> Result<Option<Event>> {
        let event = event::read().context("Failed to read terminal event")?;
        Ok(Some(event))
    }
}

/// Replays a fixed queue of events, then reports exhaustion
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<Event>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// One plain key press per character
    pub fn from_keys(keys: &str) -> Self {
        let mut events = Self::new();
        for c in keys.chars() {
            events.push_char(c);
        }
        events
    }

    pub fn push_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> &mut Self {
        self.queue
            .push_back(Event::Key(KeyEvent::new(code, modifiers)));
        self
    }

    pub fn push_char(&mut self, c: char) -> &mut Self {
        self.push_key(KeyCode::Char(c), KeyModifiers::NONE)
    }

    pub fn push_ctrl(&mut self, c: char) -> &mut Self {
        self.push_key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn push_resize(&mut self, columns: u16, rows: u16) -> &mut Self {
        self.push_event(Event::Resize(columns, rows))
    }

    pub fn push_event(&mut self, event: Event) -> &mut Self {
        self.queue.push_back(event);
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Result<Option<Event>> {
        Ok(self.queue.pop_front())
    }
}
