//! Page models: pure functions turning fetched data into widgets.
//!
//! Layouts are fixed rectangles chosen for an 80x25 terminal. Anything that
//! falls outside a smaller viewport is clipped when drawn.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use super::widgets::{CellRect, Widget, WidgetKind};
use crate::api::ApiError;
use crate::models::{AccountSnapshot, PageMarkers, RepositoryPage};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// The fixed set of full-screen views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Account,
    Repository,
    Help,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Account => "UserInfo",
            Page::Repository => "Repositories",
            Page::Help => "Usage",
        }
    }

    /// Key that navigates to this page
    pub fn key(self) -> char {
        match self {
            Page::Account => 'u',
            Page::Repository => 'p',
            Page::Help => 'h',
        }
    }
}

/// Share of the private repository quota in use, 0-100.
///
/// `None` when the plan reports no quota at all.
pub fn usage_percent(used: u64, quota: u64) -> Option<u16> {
    if quota == 0 {
        return None;
    }

    let percent = used.saturating_mul(100) / quota;
    Some(percent.min(100) as u16)
}

/// One-line summary of the pagination markers
pub fn pagination_status(markers: &PageMarkers) -> String {
    format!(
        "[First:{} ({}/{}) Last:{}]",
        markers.first, markers.prev, markers.next, markers.last
    )
}

pub fn account_page(account: &AccountSnapshot) -> Vec<Widget> {
    let avatar = Widget::new(
        "Avatar",
        CellRect::new(0, 0, 20, 10),
        WidgetKind::Image(account.avatar.clone()),
    );

    let info = Widget::new(
        Page::Account.title(),
        CellRect::new(21, 0, 61, 10),
        WidgetKind::Text(account_text(account)),
    );

    let plan = Widget::new(
        format!("UserPlan({})", account.plan_name),
        CellRect::new(0, 15, 61, 12),
        WidgetKind::Gauge {
            percent: usage_percent(account.total_private_repos, account.plan_private_repos)
                .unwrap_or(0),
            label: format!(
                "{}/{}",
                account.total_private_repos, account.plan_private_repos
            ),
        },
    );

    let usage = Widget::new(
        "Usage",
        CellRect::new(0, 17, 61, 23),
        WidgetKind::Text(usage_text()),
    );

    vec![avatar, info, plan, usage]
}

fn account_text(account: &AccountSnapshot) -> Text<'static> {
    let stamp = |label: &'static str, color: Color, at: String| {
        Line::from(vec![
            Span::raw(format!("{} (", at)),
            Span::styled(label, Style::default().fg(color)),
            Span::raw(")"),
        ])
    };

    Text::from(vec![
        Line::from(vec![
            Span::raw("Name: "),
            Span::styled(
                account.name.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("Login: {}", account.login)),
        Line::from(format!("Location: {}", account.location)),
        Line::from(format!("Blog: {}", account.blog)),
        stamp(
            "C",
            Color::Red,
            account.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ),
        stamp(
            "U",
            Color::Green,
            account.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ),
    ])
}

pub fn repository_page(page: &RepositoryPage) -> Vec<Widget> {
    let list = Widget::new(
        Page::Repository.title(),
        CellRect::new(0, 0, 50, 22),
        WidgetKind::List {
            rows: page.names.clone(),
        },
    );

    let status = Widget::new(
        "",
        CellRect::new(0, 22, 50, 25),
        WidgetKind::Text(Text::from(pagination_status(&page.markers))),
    );

    vec![list, status]
}

pub fn help_page() -> Vec<Widget> {
    vec![Widget::new(
        Page::Help.title(),
        CellRect::new(0, 0, 50, 25),
        WidgetKind::Text(usage_text()),
    )]
}

/// Placeholder shown when fetching the data for `page` failed
pub fn error_page(page: Page, error: &ApiError) -> Vec<Widget> {
    let text = Text::from(vec![
        Line::from(Span::styled(
            format!("Could not load {}", page.title()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("[{}] {}", error.kind(), error)),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled(page.key().to_string(), Style::default().fg(Color::Yellow)),
            Span::raw(" to try again"),
        ]),
    ]);

    let report = Widget::new(
        format!("{} (error)", page.title()),
        CellRect::new(0, 0, 61, 10),
        WidgetKind::Text(text),
    );

    let usage = Widget::new(
        "Usage",
        CellRect::new(0, 11, 61, 17),
        WidgetKind::Text(usage_text()),
    );

    vec![report, usage]
}

fn usage_text() -> Text<'static> {
    let hint = |key: &'static str, color: Color, action: &'static str| {
        Line::from(vec![
            Span::raw("Press "),
            Span::styled(key, Style::default().fg(color)),
            Span::raw(format!(" to {}", action)),
        ])
    };

    Text::from(vec![
        hint("h", Color::Green, "show help"),
        hint("u", Color::Yellow, "show user info"),
        hint("p", Color::Blue, "show repo list"),
        hint("q", Color::Red, "exit."),
    ])
}
