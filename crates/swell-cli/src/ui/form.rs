//! Forecast form, left panel.

use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use swell_core::forecast::{ForecastKind, LookoutWindow};

use crate::app::{App, Focus};

pub fn draw<P>(f: &mut Frame, area: Rect, app: &App<P>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // sport
      Constraint::Length(3), // location
      Constraint::Length(3), // window
      Constraint::Length(3), // submit
      Constraint::Length(3), // follow-up
      Constraint::Min(0),
    ])
    .split(area);

  let kind = [
    ("Surf", app.kind == ForecastKind::Surf),
    ("Kitesurf", app.kind == ForecastKind::Kitesurf),
  ];
  draw_toggle(f, rows[0], " Sport ", &kind, app.focus == Focus::Kind);

  draw_input(
    f,
    rows[1],
    " Location ",
    &app.location,
    "Enter location",
    app.focus == Focus::Location,
  );

  let window = [
    (LookoutWindow::Next3Days.label(), app.window == LookoutWindow::Next3Days),
    (LookoutWindow::NextWeek.label(), app.window == LookoutWindow::NextWeek),
  ];
  draw_toggle(f, rows[2], " Time frame ", &window, app.focus == Focus::Window);

  draw_submit(f, rows[3], app.session.is_busy());

  if app.session.shown().is_some() {
    draw_input(
      f,
      rows[4],
      " Follow-up ",
      &app.question,
      "Ask a follow-up question",
      app.focus == Focus::Question,
    );
  }
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
  let border = if focused { Color::Cyan } else { Color::DarkGray };
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border))
}

fn draw_toggle(f: &mut Frame, area: Rect, title: &str, options: &[(&str, bool)], focused: bool) {
  let mut spans = Vec::new();
  for (label, selected) in options {
    let style = if *selected {
      Style::default()
        .fg(Color::White)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(format!(" {label} "), style));
    spans.push(Span::raw(" "));
  }
  f.render_widget(Paragraph::new(Line::from(spans)).block(field_block(title, focused)), area);
}

fn draw_input(
  f:           &mut Frame,
  area:        Rect,
  title:       &str,
  value:       &str,
  placeholder: &str,
  focused:     bool,
) {
  let line = if value.is_empty() && !focused {
    Line::from(Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)))
  } else if focused {
    Line::from(vec![Span::raw(value.to_string()), Span::styled("▏", Style::default().fg(Color::Cyan))])
  } else {
    Line::from(value.to_string())
  };
  f.render_widget(Paragraph::new(line).block(field_block(title, focused)), area);
}

fn draw_submit(f: &mut Frame, area: Rect, busy: bool) {
  let (label, style) = if busy {
    ("Loading…", Style::default().fg(Color::DarkGray))
  } else {
    (
      "Get Forecast",
      Style::default()
        .fg(Color::White)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD),
    )
  };
  let para = Paragraph::new(Line::from(Span::styled(format!(" {label} "), style)))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
  f.render_widget(para, area);
}
