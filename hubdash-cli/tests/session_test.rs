use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use crossterm::event::Event;
use ratatui::backend::TestBackend;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hubdash_cli::api::{ApiError, DataClient};
use hubdash_cli::models::{AccountSnapshot, Avatar, PageMarkers, RepositoryPage};
use hubdash_cli::ui::pages::{account_page, help_page, repository_page};
use hubdash_cli::ui::{
    Exit, Page, RenderSurface, ScriptedEvents, Session, TerminalSurface, Widget, WidgetKind,
};

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Surface that records every call instead of drawing
#[derive(Default)]
struct RecordingSurface {
    clears: usize,
    frames: Vec<Vec<Widget>>,
}

impl RecordingSurface {
    fn draws(&self) -> usize {
        self.frames.len()
    }

    fn last_titles(&self) -> Vec<String> {
        self.frames
            .last()
            .map(|frame| frame.iter().map(|w| w.title.clone()).collect())
            .unwrap_or_default()
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn draw(&mut self, widgets: &[Widget]) -> Result<()> {
        self.frames.push(widgets.to_vec());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Calls {
    account: Arc<AtomicUsize>,
    repositories: Arc<AtomicUsize>,
}

/// Data client serving fixed data; `None` simulates a failing query
struct StubClient {
    account: Option<AccountSnapshot>,
    repositories: Option<RepositoryPage>,
    delay: Option<Duration>,
    calls: Calls,
}

impl StubClient {
    fn healthy() -> Self {
        Self {
            account: Some(ada()),
            repositories: Some(two_repos()),
            delay: None,
            calls: Calls::default(),
        }
    }
}

#[async_trait]
impl DataClient for StubClient {
    async fn fetch_account(&self) -> Result<AccountSnapshot, ApiError> {
        self.calls.account.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.account
            .clone()
            .ok_or_else(|| ApiError::NetworkError("connection refused".to_string()))
    }

    async fn fetch_repositories(&self, page_size: u8) -> Result<RepositoryPage, ApiError> {
        assert_eq!(page_size, 15);
        self.calls.repositories.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.repositories
            .clone()
            .ok_or_else(|| ApiError::ServerError("bad gateway".to_string()))
    }
}

fn ada() -> AccountSnapshot {
    AccountSnapshot {
        name: "Ada".to_string(),
        login: "ada".to_string(),
        location: "London".to_string(),
        blog: String::new(),
        created_at: Utc.with_ymd_and_hms(2015, 12, 10, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        plan_name: "pro".to_string(),
        plan_private_repos: 10,
        total_private_repos: 3,
        avatar: Avatar {
            width: 1,
            height: 1,
            pixels: vec![[200, 100, 50]],
        },
    }
}

fn two_repos() -> RepositoryPage {
    RepositoryPage {
        names: vec!["repo-a".to_string(), "repo-b".to_string()],
        markers: PageMarkers {
            first: 1,
            prev: 0,
            next: 2,
            last: 5,
        },
    }
}

fn text_of(widget: &Widget) -> String {
    match &widget.kind {
        WidgetKind::Text(text) => text
            .lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        other => panic!("expected text widget, got {:?}", other),
    }
}

fn screen(surface: &TerminalSurface<TestBackend>) -> String {
    let buffer = surface.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[tokio::test]
async fn test_starts_on_repository_page() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::new();

    let exit = session.run(&mut surface, &mut events).await?;

    assert_eq!(exit, Exit::EventsClosed);
    assert_eq!(session.current_page(), Page::Repository);
    assert_eq!(surface.clears, 1);
    assert_eq!(surface.draws(), 1);
    assert_eq!(surface.last_titles(), vec!["Repositories", ""]);
    Ok(())
}

#[tokio::test]
async fn test_navigation_keys_never_exit() -> Result<()> {
    let keys = "hupuhpphuuhhpu";
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::from_keys(keys);

    let exit = session.run(&mut surface, &mut events).await?;

    assert_eq!(exit, Exit::EventsClosed);
    assert_eq!(surface.draws(), 1 + keys.len());
    assert_eq!(surface.clears, surface.draws());
    assert_eq!(session.current_page(), Page::Account);
    Ok(())
}

#[tokio::test]
async fn test_each_key_shows_its_page() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::from_keys("uhp");

    session.run(&mut surface, &mut events).await?;

    let titles: Vec<String> = surface.frames.iter().map(|f| f[0].title.clone()).collect();
    assert_eq!(titles, vec!["Repositories", "Avatar", "Usage", "Repositories"]);
    Ok(())
}

#[tokio::test]
async fn test_q_exits_and_stops_reading_events() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::from_keys("hqu");

    let exit = session.run(&mut surface, &mut events).await?;

    assert_eq!(exit, Exit::Quit);
    assert_eq!(events.remaining(), 1);
    assert_eq!(surface.draws(), 2);
    assert_eq!(session.current_page(), Page::Help);
    Ok(())
}

#[tokio::test]
async fn test_ctrl_c_exits() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::new();
    events.push_char('u').push_ctrl('c').push_char('h');

    let exit = session.run(&mut surface, &mut events).await?;

    assert_eq!(exit, Exit::Quit);
    assert_eq!(events.remaining(), 1);
    assert_eq!(surface.draws(), 2);
    Ok(())
}

struct Outcome {
    page: Page,
    clears: usize,
    draws: usize,
    account_fetches: usize,
    repository_fetches: usize,
}

async fn drive(keys: &str) -> Result<Outcome> {
    let client = StubClient::healthy();
    let calls = client.calls.clone();
    let mut session = Session::new(client, FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::from_keys(keys);

    session.run(&mut surface, &mut events).await?;

    Ok(Outcome {
        page: session.current_page(),
        clears: surface.clears,
        draws: surface.draws(),
        account_fetches: calls.account.load(Ordering::SeqCst),
        repository_fetches: calls.repositories.load(Ordering::SeqCst),
    })
}

#[tokio::test]
async fn test_unbound_key_is_idle() -> Result<()> {
    for prefix in ["", "u", "h"] {
        let before = drive(prefix).await?;
        let after = drive(&format!("{}xX1 ", prefix)).await?;

        assert_eq!(after.page, before.page);
        assert_eq!(after.clears, before.clears);
        assert_eq!(after.draws, before.draws);
        assert_eq!(after.account_fetches, before.account_fetches);
        assert_eq!(after.repository_fetches, before.repository_fetches);
    }
    Ok(())
}

#[tokio::test]
async fn test_resize_is_ignored() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::new();
    events.push_char('h').push_resize(120, 40).push_resize(40, 10);

    session.run(&mut surface, &mut events).await?;

    assert_eq!(surface.draws(), 2);
    assert_eq!(session.current_page(), Page::Help);
    Ok(())
}

#[tokio::test]
async fn test_focus_and_paste_events_are_ignored() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::new();
    events
        .push_event(Event::FocusLost)
        .push_event(Event::Paste("hup".to_string()))
        .push_event(Event::FocusGained);

    session.run(&mut surface, &mut events).await?;

    assert_eq!(surface.draws(), 1);
    assert_eq!(session.current_page(), Page::Repository);
    Ok(())
}

#[tokio::test]
async fn test_revisiting_a_page_refetches() -> Result<()> {
    let outcome = drive("ppuu").await?;

    assert_eq!(outcome.repository_fetches, 3);
    assert_eq!(outcome.account_fetches, 2);
    assert_eq!(outcome.draws, 5);
    Ok(())
}

#[tokio::test]
async fn test_help_page_does_not_fetch() -> Result<()> {
    let outcome = drive("hhh").await?;

    assert_eq!(outcome.account_fetches, 0);
    assert_eq!(outcome.repository_fetches, 1);
    assert_eq!(outcome.page, Page::Help);
    Ok(())
}

#[tokio::test]
async fn test_account_failure_is_recoverable() -> Result<()> {
    let client = StubClient {
        account: None,
        ..StubClient::healthy()
    };
    let mut session = Session::new(client, FETCH_TIMEOUT);
    let mut surface = TerminalSurface::with_backend(TestBackend::new(80, 25))?;
    let mut events = ScriptedEvents::from_keys("uuu");

    let exit = session.run(&mut surface, &mut events).await?;

    assert_eq!(exit, Exit::EventsClosed);
    assert_eq!(session.current_page(), Page::Account);
    assert!(!surface.is_closed());

    let text = screen(&surface);
    assert!(text.contains("UserInfo (error)"));
    assert!(text.contains("connection refused"));
    assert!(text.contains("Press u to try again"));
    Ok(())
}

#[tokio::test]
async fn test_account_failure_then_navigation_continues() -> Result<()> {
    let client = StubClient {
        account: None,
        ..StubClient::healthy()
    };
    let mut session = Session::new(client, FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::from_keys("uphq");

    let exit = session.run(&mut surface, &mut events).await?;

    assert_eq!(exit, Exit::Quit);
    let titles: Vec<String> = surface.frames.iter().map(|f| f[0].title.clone()).collect();
    assert_eq!(
        titles,
        vec!["Repositories", "UserInfo (error)", "Repositories", "Usage"]
    );
    Ok(())
}

#[tokio::test]
async fn test_repository_failure_is_recoverable() -> Result<()> {
    let client = StubClient {
        repositories: None,
        ..StubClient::healthy()
    };
    let mut session = Session::new(client, FETCH_TIMEOUT);
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::from_keys("pu");

    let exit = session.run(&mut surface, &mut events).await?;

    assert_eq!(exit, Exit::EventsClosed);
    assert_eq!(surface.draws(), 3);
    assert_eq!(surface.frames[0][0].title, "Repositories (error)");
    assert!(text_of(&surface.frames[1][0]).contains("[server] Server error: bad gateway"));
    assert_eq!(surface.last_titles()[1], "UserInfo");
    Ok(())
}

#[tokio::test]
async fn test_hung_fetch_times_out_recoverably() -> Result<()> {
    let client = StubClient {
        delay: Some(Duration::from_secs(30)),
        ..StubClient::healthy()
    };
    let mut session = Session::new(client, Duration::from_millis(50));
    let mut surface = RecordingSurface::default();
    let mut events = ScriptedEvents::from_keys("hu");

    let exit = session.run(&mut surface, &mut events).await?;

    assert_eq!(exit, Exit::EventsClosed);
    assert_eq!(surface.draws(), 3);
    assert_eq!(surface.frames[0][0].title, "Repositories (error)");
    assert_eq!(surface.frames[1][0].title, "Usage");
    assert_eq!(surface.frames[2][0].title, "UserInfo (error)");
    assert!(text_of(&surface.frames[2][0]).contains("[timeout] Timed out after 50ms"));
    Ok(())
}

#[tokio::test]
async fn test_account_page_renders_on_terminal() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = TerminalSurface::with_backend(TestBackend::new(80, 25))?;
    let mut events = ScriptedEvents::from_keys("u");

    session.run(&mut surface, &mut events).await?;

    let text = screen(&surface);
    assert!(text.contains("Name: Ada"));
    assert!(text.contains("Login: ada"));
    assert!(text.contains("UserPlan(pro)"));
    assert!(text.contains("3/10"));
    assert!(!text.contains("repo-a"));
    Ok(())
}

#[tokio::test]
async fn test_repository_page_renders_on_small_terminal() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = TerminalSurface::with_backend(TestBackend::new(40, 12))?;
    let mut events = ScriptedEvents::new();

    session.run(&mut surface, &mut events).await?;

    let text = screen(&surface);
    assert!(text.contains("repo-a"));
    assert!(text.contains("repo-b"));
    Ok(())
}

#[tokio::test]
async fn test_pagination_status_visible_on_standard_terminal() -> Result<()> {
    let mut session = Session::new(StubClient::healthy(), FETCH_TIMEOUT);
    let mut surface = TerminalSurface::with_backend(TestBackend::new(80, 25))?;
    let mut events = ScriptedEvents::new();

    session.run(&mut surface, &mut events).await?;

    let text = screen(&surface);
    assert!(text.contains("repo-a"));
    assert!(text.contains("[First:1 (0/2) Last:5]"));
    Ok(())
}

#[test]
fn test_account_fixture_gauge() {
    let widgets = account_page(&ada());

    let gauge = widgets
        .iter()
        .find(|w| matches!(w.kind, WidgetKind::Gauge { .. }))
        .expect("account page has a gauge");
    assert_eq!(
        gauge.kind,
        WidgetKind::Gauge {
            percent: 30,
            label: "3/10".to_string()
        }
    );
}

#[test]
fn test_repository_fixture_rows_and_status() {
    let widgets = repository_page(&two_repos());

    assert_eq!(
        widgets[0].kind,
        WidgetKind::List {
            rows: vec!["repo-a".to_string(), "repo-b".to_string()]
        }
    );

    let status = text_of(&widgets[1]);
    assert_eq!(status, "[First:1 (0/2) Last:5]");
    for marker in ["1", "0", "2", "5"] {
        assert!(status.contains(marker));
    }
}

#[test]
fn test_help_page_is_stable() {
    let first = help_page();
    let second = help_page();

    assert_eq!(first, second);
    assert_eq!(format!("{:?}", first), format!("{:?}", second));
}
