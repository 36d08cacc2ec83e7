//! Application state and key dispatcher for the forecast TUI.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use swell_core::{
  ProviderError,
  forecast::{ForecastKind, ForecastRequest, LookoutWindow},
  provider::ForecastProvider,
  session::ForecastSession,
};
use tokio::sync::mpsc;

// ─── Focus ────────────────────────────────────────────────────────────────────

/// The form control receiving keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Kind,
  Location,
  Window,
  Question,
}

impl Focus {
  fn next(self) -> Self {
    match self {
      Focus::Kind => Focus::Location,
      Focus::Location => Focus::Window,
      Focus::Window => Focus::Question,
      Focus::Question => Focus::Kind,
    }
  }

  fn prev(self) -> Self {
    match self {
      Focus::Kind => Focus::Question,
      Focus::Location => Focus::Kind,
      Focus::Window => Focus::Location,
      Focus::Question => Focus::Window,
    }
  }
}

/// A provider call finishing on a background task.
#[derive(Debug)]
pub enum Reply {
  Forecast(Result<String, ProviderError>),
  FollowUp(Result<String, ProviderError>),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<P> {
  pub session:    ForecastSession,
  pub focus:      Focus,
  pub kind:       ForecastKind,
  pub location:   String,
  pub window:     LookoutWindow,
  pub question:   String,
  /// One-line status message shown in the status bar.
  pub status_msg: String,
  /// Lines scrolled in the forecast pane.
  pub scroll:     u16,

  provider: Arc<P>,
  tx:       mpsc::UnboundedSender<Reply>,
  rx:       mpsc::UnboundedReceiver<Reply>,
}

impl<P: ForecastProvider + 'static> App<P> {
  pub fn new(provider: P) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      session: ForecastSession::new(),
      focus: Focus::Location,
      kind: ForecastKind::Surf,
      location: String::new(),
      window: LookoutWindow::Next3Days,
      question: String::new(),
      status_msg: String::new(),
      scroll: 0,
      provider: Arc::new(provider),
      tx,
      rx,
    }
  }

  // ── Provider calls ────────────────────────────────────────────────────────

  /// Start a forecast for the form's current values.
  pub fn submit_forecast(&mut self) {
    let request = ForecastRequest::new(self.kind, self.location.trim(), self.window);
    match self.session.begin_forecast(request) {
      Ok(request) => {
        self.status_msg = format!("Fetching forecast for {}…", request.location);
        self.scroll = 0;
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
          let result = provider.forecast(&request).await;
          let _ = tx.send(Reply::Forecast(result));
        });
      }
      Err(e) => self.status_msg = e.to_string(),
    }
  }

  /// Ask the typed follow-up question about the forecast on screen.
  pub fn submit_follow_up(&mut self) {
    match self.session.begin_follow_up(&self.question) {
      Ok(request) => {
        self.status_msg = "Asking…".into();
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
          let result = provider.follow_up(&request).await;
          let _ = tx.send(Reply::FollowUp(result));
        });
      }
      Err(e) => self.status_msg = e.to_string(),
    }
  }

  /// Feed a finished provider call back into the session.
  pub fn apply(&mut self, reply: Reply) {
    match reply {
      Reply::Forecast(result) => self.session.finish_forecast(result),
      Reply::FollowUp(result) => {
        self.session.finish_follow_up(result);
        self.question.clear();
      }
    }
    self.status_msg = self.session.error().map(str::to_owned).unwrap_or_default();
  }

  /// Apply every reply that has already arrived.
  pub fn drain_replies(&mut self) {
    while let Ok(reply) = self.rx.try_recv() {
      self.apply(reply);
    }
  }

  /// Wait for the next reply and apply it. Returns `false` if none can
  /// arrive.
  #[cfg(test)]
  pub async fn await_reply(&mut self) -> bool {
    match self.rx.recv().await {
      Some(reply) => {
        self.apply(reply);
        true
      }
      None => false,
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match key.code {
      KeyCode::Esc => return false,
      KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
      KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
      KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
      KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
      KeyCode::Enter => match self.focus {
        Focus::Question => self.submit_follow_up(),
        _ => self.submit_forecast(),
      },
      code => match self.focus {
        Focus::Kind => self.handle_toggle(code, Toggle::Kind),
        Focus::Window => self.handle_toggle(code, Toggle::Window),
        Focus::Location => edit(&mut self.location, code),
        Focus::Question => edit(&mut self.question, code),
      },
    }
    true
  }

  fn handle_toggle(&mut self, code: KeyCode, toggle: Toggle) {
    if !matches!(code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
      return;
    }
    match toggle {
      Toggle::Kind => {
        self.kind = match self.kind {
          ForecastKind::Surf => ForecastKind::Kitesurf,
          ForecastKind::Kitesurf => ForecastKind::Surf,
        }
      }
      Toggle::Window => {
        self.window = match self.window {
          LookoutWindow::Next3Days => LookoutWindow::NextWeek,
          LookoutWindow::NextWeek => LookoutWindow::Next3Days,
        }
      }
    }
  }
}

#[derive(Clone, Copy)]
enum Toggle {
  Kind,
  Window,
}

fn edit(field: &mut String, code: KeyCode) {
  match code {
    KeyCode::Backspace => {
      field.pop();
    }
    KeyCode::Char(c) => field.push(c),
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use swell_core::{mock::MockForecasts, session::FORECAST_FAILED};

  use super::*;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn type_text<P: ForecastProvider + 'static>(app: &mut App<P>, text: &str) {
    for c in text.chars() {
      assert!(app.handle_key(key(KeyCode::Char(c))));
    }
  }

  #[tokio::test]
  async fn typed_location_is_forecast() {
    let mut app = App::new(MockForecasts::new());
    type_text(&mut app, "Bali");
    app.handle_key(key(KeyCode::Enter));
    assert!(app.session.is_busy());

    assert!(app.await_reply().await);
    let shown = app.session.shown().unwrap();
    assert_eq!(shown.request.location, "Bali");
    assert_eq!(shown.text, "surf forecast for Bali over the next three days");
    assert!(app.status_msg.is_empty());
  }

  #[tokio::test]
  async fn toggles_change_kind_and_window() {
    let mut app = App::new(MockForecasts::new());
    app.handle_key(key(KeyCode::BackTab));
    assert_eq!(app.focus, Focus::Kind);
    app.handle_key(key(KeyCode::Right));
    assert_eq!(app.kind, ForecastKind::Kitesurf);

    app.handle_key(key(KeyCode::Tab));
    type_text(&mut app, "Tarifa");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Char(' ')));
    assert_eq!(app.window, LookoutWindow::NextWeek);

    app.handle_key(key(KeyCode::Enter));
    app.await_reply().await;
    assert_eq!(
      app.session.shown().unwrap().text,
      "kitesurf forecast for Tarifa over the coming week"
    );
  }

  #[tokio::test]
  async fn second_submit_while_loading_is_rejected() {
    let mut app = App::new(MockForecasts::new());
    type_text(&mut app, "Bali");
    app.submit_forecast();
    app.submit_forecast();
    assert_eq!(app.status_msg, "a request is already in progress");

    app.await_reply().await;
    assert!(app.session.shown().is_some());
  }

  #[tokio::test]
  async fn blank_location_is_not_submitted() {
    let mut app = App::new(MockForecasts::new());
    type_text(&mut app, "   ");
    app.handle_key(key(KeyCode::Enter));
    assert!(!app.session.is_busy());
    assert_eq!(app.status_msg, "please enter a location");
  }

  #[tokio::test]
  async fn failed_forecast_shows_message() {
    let mut app = App::new(MockForecasts::failing_for(&["Atlantis"]));
    type_text(&mut app, "Atlantis");
    app.handle_key(key(KeyCode::Enter));
    app.await_reply().await;
    assert!(app.session.shown().is_none());
    assert_eq!(app.status_msg, FORECAST_FAILED);
  }

  #[tokio::test]
  async fn follow_up_answer_is_attached_and_input_cleared() {
    let mut app = App::new(MockForecasts::new());
    type_text(&mut app, "Bali");
    app.handle_key(key(KeyCode::Enter));
    app.await_reply().await;

    app.focus = Focus::Question;
    type_text(&mut app, "Best tide?");
    app.handle_key(key(KeyCode::Enter));
    assert!(app.session.is_busy());
    app.await_reply().await;

    let answer = app.session.shown().unwrap().follow_up.as_ref().unwrap();
    assert_eq!(answer.question, "Best tide?");
    assert_eq!(answer.answer, "answer to \"Best tide?\"");
    assert!(app.question.is_empty());
  }

  #[tokio::test]
  async fn esc_quits() {
    let mut app = App::new(MockForecasts::new());
    assert!(!app.handle_key(key(KeyCode::Esc)));
  }
}
