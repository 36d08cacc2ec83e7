//! Forecast pane on the right, with the follow-up answer underneath.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use swell_core::session::{SessionState, ShownForecast};

use crate::{
  app::App,
  sections::{self, Section},
};

pub fn draw<P>(f: &mut Frame, area: Rect, app: &App<P>) {
  match app.session.state() {
    SessionState::Idle => draw_placeholder(f, area, "Fill in the form and press Enter."),
    SessionState::Loading { request } => {
      draw_placeholder(f, area, &format!("Fetching forecast for {}…", request.location))
    }
    SessionState::ShowingForecast(shown) => draw_shown(f, area, shown, None, app.scroll),
    SessionState::LoadingFollowUp { shown, question } => {
      draw_shown(f, area, shown, Some(question.as_str()), app.scroll)
    }
  }
}

fn draw_placeholder(f: &mut Frame, area: Rect, message: &str) {
  let block = Block::default()
    .title(" Forecast ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(message.to_string()).style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

fn draw_shown(
  f:       &mut Frame,
  area:    Rect,
  shown:   &ShownForecast,
  pending: Option<&str>,
  scroll:  u16,
) {
  let has_extra = pending.is_some() || shown.follow_up.is_some();
  let constraints = if has_extra {
    [Constraint::Percentage(65), Constraint::Percentage(35)]
  } else {
    [Constraint::Percentage(100), Constraint::Length(0)]
  };
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(area);

  let block = Block::default()
    .title(format!(" Forecast for {} ", shown.request.location))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));
  let para = Paragraph::new(section_lines(&shown.text))
    .block(block)
    .wrap(Wrap { trim: false })
    .scroll((scroll, 0));
  f.render_widget(para, rows[0]);

  if !has_extra {
    return;
  }

  let block = Block::default()
    .title(" Additional Information ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let lines = match (pending, &shown.follow_up) {
    (Some(question), _) => vec![
      question_line(question),
      Line::from(Span::styled("Thinking…", Style::default().fg(Color::DarkGray))),
    ],
    (None, Some(answer)) => {
      let mut lines = vec![question_line(&answer.question), Line::from("")];
      lines.extend(section_lines(&answer.answer));
      lines
    }
    (None, None) => Vec::new(),
  };
  f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), rows[1]);
}

fn question_line(question: &str) -> Line<'static> {
  Line::from(Span::styled(
    format!("Q: {question}"),
    Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
  ))
}

/// Day headings in bold, their lines as bullets, everything else plain.
fn section_lines(text: &str) -> Vec<Line<'static>> {
  let mut lines = Vec::new();
  for section in sections::split(text) {
    match section {
      Section::Paragraph(p) => lines.push(Line::from(p)),
      Section::Day { heading, items } => {
        if !lines.is_empty() {
          lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
          heading,
          Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        )));
        for item in items {
          let item = item.trim_start_matches(['-', '*', '•']).trim_start();
          lines.push(Line::from(format!("  • {item}")));
        }
      }
    }
  }
  lines
}
