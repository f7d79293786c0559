// Terminal UI module using ratatui

pub mod events;
pub mod pages;
pub mod session;
pub mod surface;
pub mod widgets;

pub use events::{CrosstermEvents, EventSource, ScriptedEvents};
pub use pages::Page;
pub use session::{Command, Exit, Session};
pub use surface::{RenderSurface, TerminalSurface};
pub use widgets::{CellRect, Widget, WidgetKind};
