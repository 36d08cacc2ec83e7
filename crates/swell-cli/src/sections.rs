//! Day grouping for forecast text.
//!
//! Display only: the text itself is never altered, and nothing outside the
//! terminal UI looks at the grouping.

const WEEKDAYS: [&str; 7] =
  ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
  /// A line before the first day heading.
  Paragraph(String),
  Day { heading: String, items: Vec<String> },
}

fn is_heading(line: &str) -> bool {
  let lower = line.to_lowercase();
  WEEKDAYS.iter().any(|d| lower.starts_with(d)) || lower.contains("day")
}

/// Split `text` into paragraphs and day sections. Lines are trimmed and
/// blank lines dropped.
pub fn split(text: &str) -> Vec<Section> {
  let mut sections = Vec::new();
  for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
    if is_heading(line) {
      sections.push(Section::Day { heading: line.to_owned(), items: Vec::new() });
      continue;
    }
    match sections.last_mut() {
      Some(Section::Day { items, .. }) => items.push(line.to_owned()),
      _ => sections.push(Section::Paragraph(line.to_owned())),
    }
  }
  sections
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(heading: &str, items: &[&str]) -> Section {
    Section::Day {
      heading: heading.into(),
      items:   items.iter().map(|s| s.to_string()).collect(),
    }
  }

  #[test]
  fn groups_lines_under_weekday_headings() {
    let text = "Here is your forecast for Bali.\n\n\
                Monday:\n  - Swell: 4ft\n  - Wind: offshore\n\
                Tuesday:\n  - Swell: 5ft\n";
    assert_eq!(split(text), vec![
      Section::Paragraph("Here is your forecast for Bali.".into()),
      day("Monday:", &["- Swell: 4ft", "- Wind: offshore"]),
      day("Tuesday:", &["- Swell: 5ft"]),
    ]);
  }

  #[test]
  fn headings_are_case_insensitive() {
    assert_eq!(split("FRIDAY\nflat"), vec![day("FRIDAY", &["flat"])]);
  }

  #[test]
  fn any_line_mentioning_day_is_a_heading() {
    // Matches the loose rule: "today" and "Best day" both contain "day".
    let text = "Conditions today\nclean\nBest day to surf: Wednesday";
    assert_eq!(split(text), vec![
      day("Conditions today", &["clean"]),
      day("Best day to surf: Wednesday", &[]),
    ]);
  }

  #[test]
  fn text_without_headings_is_all_paragraphs() {
    assert_eq!(split("  one \n\n two"), vec![
      Section::Paragraph("one".into()),
      Section::Paragraph("two".into()),
    ]);
  }

  #[test]
  fn empty_text_has_no_sections() {
    assert!(split("\n  \n").is_empty());
  }
}
