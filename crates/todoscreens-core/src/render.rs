//! Todo list rendering
//!
//! Turns a list of [`Todo`]s into a [`Layout`] for a 400x300 panel: a title
//! bar, one row per task with a priority icon and an optional overdue
//! notice, and the four bottom buttons.

use crate::layout::{BottomButtons, Button, Color, Font, Layout, Text};
use crate::todo::{sort_by_priority, Todo};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

/// Vertical position of the first task row
pub const FIRST_ROW_Y: i32 = 34;
/// Height of a task row without an overdue notice
pub const ROW_HEIGHT: i32 = 36;
/// Extra height taken by an overdue notice
pub const NOTICE_HEIGHT: i32 = 12;

/// Number of "done" buttons; the last hardware button is always refresh
pub const DONE_BUTTONS: usize = 3;

/// Rendering failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Task priority has no icon
    #[error("Invalid task priority: {0} (expected 0-3)")]
    InvalidPriority(u8),
}

/// Font Awesome glyph for a priority level
pub fn priority_icon(priority: u8) -> Result<&'static str, RenderError> {
    match priority {
        3 => Ok("\u{f102}"),
        2 => Ok("\u{f106}"),
        1 => Ok("\u{f107}"),
        0 => Ok("\u{f103}"),
        other => Err(RenderError::InvalidPriority(other)),
    }
}

/// Text shown under an overdue task
pub fn overdue_notice(days: u32) -> String {
    if days == 1 {
        "1 day overdue".to_string()
    } else {
        format!("{days} days overdue")
    }
}

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Title bar text
    pub title: String,
    /// Draw a render timestamp in the footer
    pub show_timestamp: bool,
    /// Node poll rate in milliseconds
    pub poll_rate: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Todos".to_string(),
            show_timestamp: false,
            poll_rate: 10_000,
        }
    }
}

/// Builds layouts from todo lists
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Renderer with `config`
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `todos` as of `now`
    ///
    /// Todos are drawn in descending priority order. Fails without producing
    /// a layout if any todo has a priority outside 0..=3.
    pub fn render(&self, todos: &[Todo], now: NaiveDateTime) -> Result<Layout, RenderError> {
        let today = now.date();
        let mut todos = todos.to_vec();
        sort_by_priority(&mut todos);

        let mut layout = Layout::new().with_poll_rate(self.config.poll_rate);

        layout.add(
            Text::new(self.config.title.as_str(), (0, 0))
                .size(400, 30)
                .offset(4, 0)
                .font(Font::Ddin24)
                .color(Color::White)
                .background(Color::Black),
        );

        layout.add(bottom_buttons(todos.len()));

        let mut y = FIRST_ROW_Y;
        for todo in &todos {
            let icon = priority_icon(todo.priority)?;

            layout.add(
                Text::new(todo.title.as_str(), (0, y + 2))
                    .offset(30, 0)
                    .font(Font::RobotoCondensed24),
            );
            layout.add(
                Text::new(icon, (0, y))
                    .size(30, 30)
                    .offset(3, 0)
                    .font(Font::IconFaSolid),
            );

            let days = todo.days_overdue(today);
            if days > 0 {
                layout.add(
                    Text::new(overdue_notice(days), (37, y + 28))
                        .size(200, 20)
                        .font(Font::AprilSans16),
                );
                y += NOTICE_HEIGHT;
            }
            y += ROW_HEIGHT;
        }

        if self.config.show_timestamp {
            layout.add(
                Text::new(now.format("%Y-%m-%d %H:%M").to_string(), (0, 280))
                    .size(200, 16)
                    .font(Font::AprilSans16),
            );
        }

        Ok(layout)
    }
}

/// Render with the default settings
pub fn render_todos(todos: &[Todo], today: NaiveDate) -> Result<Layout, RenderError> {
    Renderer::default().render(todos, today.and_time(chrono::NaiveTime::MIN))
}

fn bottom_buttons(task_count: usize) -> BottomButtons {
    let mut buttons: Vec<Button> = (1..=DONE_BUTTONS)
        .map(|n| Button::new(format!("#{n} done"), task_count >= n))
        .collect();
    buttons.push(Button::new("Refresh", true));
    BottomButtons::new(buttons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ButtonStyle, Item};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - chrono::Duration::days(n)
    }

    #[test]
    fn test_empty_list_renders_title_and_buttons_only() {
        let layout = render_todos(&[], today()).unwrap();
        assert_eq!(layout.items().len(), 2);
        assert!(matches!(layout.items()[0], Item::Text(ref t) if t.text == "Todos"));
        let slots = layout.bottom_buttons().unwrap().slots();
        let styles: Vec<_> = slots.iter().map(|s| s.style).collect();
        assert_eq!(
            styles,
            [
                ButtonStyle::Disabled,
                ButtonStyle::Disabled,
                ButtonStyle::Disabled,
                ButtonStyle::Enabled
            ]
        );
        assert_eq!(slots[3].title, "Refresh");
    }

    #[test]
    fn test_rows_follow_offsets() {
        let todos = vec![
            Todo::new(1u64, "overdue", 3, days_ago(2)),
            Todo::new(2u64, "today", 2, today()),
            Todo::new(3u64, "yesterday", 1, days_ago(1)),
        ];
        let layout = render_todos(&todos, today()).unwrap();

        let titles: Vec<_> = layout
            .texts()
            .filter(|t| t.font == Font::RobotoCondensed24)
            .map(|t| (t.text.as_str(), t.position.1))
            .collect();
        assert_eq!(titles, [("overdue", 36), ("today", 84), ("yesterday", 120)]);

        let notices: Vec<_> = layout
            .texts()
            .filter(|t| t.font == Font::AprilSans16)
            .map(|t| (t.text.as_str(), t.position))
            .collect();
        assert_eq!(
            notices,
            [("2 days overdue", (37, 62)), ("1 day overdue", (37, 146))]
        );

        let icons: Vec<_> = layout
            .texts()
            .filter(|t| t.font == Font::IconFaSolid)
            .map(|t| (t.text.as_str(), t.position.1))
            .collect();
        assert_eq!(icons, [("\u{f102}", 34), ("\u{f106}", 82), ("\u{f107}", 118)]);
    }

    #[test]
    fn test_render_sorts_by_priority() {
        let todos = vec![
            Todo::new(1u64, "low", 0, today()),
            Todo::new(2u64, "high", 3, today()),
        ];
        let layout = render_todos(&todos, today()).unwrap();
        let first = layout
            .texts()
            .find(|t| t.font == Font::RobotoCondensed24)
            .unwrap();
        assert_eq!(first.text, "high");
    }

    #[test]
    fn test_invalid_priority_fails() {
        let todos = vec![Todo::new(1u64, "p4", 4, today())];
        assert_eq!(
            render_todos(&todos, today()),
            Err(RenderError::InvalidPriority(4))
        );
    }

    #[test]
    fn test_timestamp_footer() {
        let renderer = Renderer::new(RenderConfig {
            show_timestamp: true,
            ..RenderConfig::default()
        });
        let now = today().and_hms_opt(9, 5, 0).unwrap();
        let layout = renderer.render(&[], now).unwrap();
        let footer = layout.texts().last().unwrap();
        assert_eq!(footer.text, "2024-05-20 09:05");
        assert_eq!(footer.position, (0, 280));
    }

    #[test]
    fn test_custom_title_and_poll_rate() {
        let renderer = Renderer::new(RenderConfig {
            title: "Today".to_string(),
            poll_rate: 30_000,
            ..RenderConfig::default()
        });
        let layout = renderer
            .render(&[], today().and_hms_opt(0, 0, 0).unwrap())
            .unwrap();
        assert_eq!(layout.texts().next().unwrap().text, "Today");
        assert_eq!(layout.poll_rate, 30_000);
    }
}
