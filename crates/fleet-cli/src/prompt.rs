//! Terminal prompts: a refreshable chooser and a loading spinner
//!
//! dialoguer's `Select` cannot report custom keystrokes, so the chooser reads
//! keys through the `console` terminal dialoguer itself is built on.

use crate::error::CliResult;
use dialoguer::console::{style, truncate_str, Key, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::future::Future;
use std::ops::Range;
use std::time::Duration;

/// Outcome of one chooser interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Entry at this index was picked
    Selected(usize),
    /// The user asked for fresh data
    Refresh,
    /// The user backed out
    Back,
}

/// Cursor position, scroll offset and key handling, independent of the terminal
#[derive(Debug, Clone, Default)]
pub struct ChooserState {
    cursor: usize,
    offset: usize,
    len: usize,
}

impl ChooserState {
    pub fn new(len: usize) -> Self {
        Self {
            cursor: 0,
            offset: 0,
            len,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the number of entries, keeping the cursor in range
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.cursor = self.cursor.min(len.saturating_sub(1));
        self.offset = self.offset.min(self.cursor);
    }

    /// Entries that fit in `rows` terminal lines, given each entry's height.
    /// Scrolls just enough to keep the cursor entry on screen; that entry is
    /// always included even when it alone is taller than `rows`.
    pub fn window(&mut self, heights: &[usize], rows: usize) -> Range<usize> {
        let height = |i: usize| heights[i].max(1);
        let rows = rows.max(1);
        let len = heights.len().min(self.len);
        if len == 0 {
            self.offset = 0;
            return 0..0;
        }

        let cursor = self.cursor.min(len - 1);
        self.offset = self.offset.min(cursor);
        while self.offset < cursor && (self.offset..=cursor).map(height).sum::<usize>() > rows {
            self.offset += 1;
        }

        let mut used = 0;
        let mut end = self.offset;
        while end < len && (end == self.offset || used + height(end) <= rows) {
            used += height(end);
            end += 1;
        }
        self.offset..end
    }

    /// Apply a key press; returns a choice when the interaction is over
    pub fn handle_key(&mut self, key: &Key) -> Option<Choice> {
        match key {
            Key::ArrowUp | Key::Char('k') if self.len > 0 => {
                self.cursor = (self.cursor + self.len - 1) % self.len;
                None
            }
            Key::ArrowDown | Key::Char('j') if self.len > 0 => {
                self.cursor = (self.cursor + 1) % self.len;
                None
            }
            Key::Home => {
                self.cursor = 0;
                None
            }
            Key::End => {
                self.cursor = self.len.saturating_sub(1);
                None
            }
            Key::Enter if self.len > 0 => Some(Choice::Selected(self.cursor)),
            Key::Char('r') | Key::Char('R') => Some(Choice::Refresh),
            Key::Escape | Key::Char('q') => Some(Choice::Back),
            _ => None,
        }
    }
}

/// Interactive list chooser drawn on stderr
pub struct Chooser {
    term: Term,
    prompt: String,
}

impl Chooser {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            term: Term::stderr(),
            prompt: prompt.into(),
        }
    }

    /// Draw `items` and wait for a choice. Items may span several lines.
    pub fn interact(&self, items: &[String], state: &mut ChooserState) -> CliResult<Choice> {
        state.set_len(items.len());
        self.term.hide_cursor()?;
        let result = self.run(items, state);
        self.term.show_cursor()?;
        result
    }

    fn run(&self, items: &[String], state: &mut ChooserState) -> CliResult<Choice> {
        loop {
            let drawn = self.draw(items, state)?;
            let key = self.term.read_key()?;
            let choice = state.handle_key(&key);
            self.term.clear_last_lines(drawn)?;
            if let Some(choice) = choice {
                return Ok(choice);
            }
        }
    }

    fn draw(&self, items: &[String], state: &mut ChooserState) -> CliResult<usize> {
        let (rows, width) = self.term.size();
        let width = width as usize;
        // prompt and hint lines
        let capacity = (rows as usize).saturating_sub(2).max(1);
        let heights: Vec<usize> = items.iter().map(|item| item.lines().count()).collect();
        let visible = state.window(&heights, capacity);
        let mut lines = 0;

        self.term.write_line(&format!(
            "{} {}",
            style("?").yellow(),
            style(&self.prompt).bold()
        ))?;
        lines += 1;

        if items.is_empty() {
            self.term
                .write_line(&format!("  {}", style("(nothing to show)").dim()))?;
            lines += 1;
        }

        for i in visible {
            for (j, line) in items[i].lines().enumerate() {
                if lines > capacity {
                    break;
                }
                let marker = if j == 0 && i == state.cursor() {
                    style("❯").cyan().to_string()
                } else {
                    " ".to_string()
                };
                let text = format!("{} {}", marker, line);
                self.term
                    .write_line(&truncate_str(&text, width.saturating_sub(1), "…"))?;
                lines += 1;
            }
        }

        let position = if items.is_empty() {
            String::new()
        } else {
            format!("{}/{} · ", state.cursor() + 1, items.len())
        };
        self.term.write_line(
            &style(format!(
                "{}↑/↓ move · enter select · r refresh · esc back",
                position
            ))
            .dim()
            .to_string(),
        )?;
        Ok(lines + 1)
    }

    /// Print the most recent `lines` that fit, then block until any key is pressed
    pub fn show_and_wait(&self, title: &str, lines: &[String]) -> CliResult<()> {
        let (rows, width) = self.term.size();
        let width = (width as usize).saturating_sub(1);
        let capacity = (rows as usize).saturating_sub(3).max(1);
        let hidden = if lines.len() > capacity {
            lines.len() + 1 - capacity
        } else {
            0
        };

        self.term
            .write_line(&truncate_str(&style(title).bold().to_string(), width, "…"))?;
        let mut drawn = 1;
        if hidden > 0 {
            self.term.write_line(
                &style(format!("  … {} earlier", hidden))
                    .dim()
                    .to_string(),
            )?;
            drawn += 1;
        }
        for line in &lines[hidden..] {
            self.term
                .write_line(&truncate_str(&format!("  {}", line), width, "…"))?;
            drawn += 1;
        }
        self.term
            .write_line(&style("press any key to go back").dim().to_string())?;
        self.term.read_key()?;
        self.term.clear_last_lines(drawn + 1)?;
        Ok(())
    }
}

/// Spinner on stderr; hidden when `visible` is false
pub fn spinner(message: impl Into<Cow<'static, str>>, visible: bool) -> ProgressBar {
    let pb = if visible {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run `fut` while a spinner shows `message`
pub async fn with_spinner<T, F>(
    message: impl Into<Cow<'static, str>>,
    visible: bool,
    fut: F,
) -> CliResult<T>
where
    F: Future<Output = CliResult<T>>,
{
    let pb = spinner(message, visible);
    let result = fut.await;
    pb.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps() {
        let mut state = ChooserState::new(3);
        assert_eq!(state.handle_key(&Key::ArrowUp), None);
        assert_eq!(state.cursor(), 2);
        assert_eq!(state.handle_key(&Key::ArrowDown), None);
        assert_eq!(state.cursor(), 0);
        state.handle_key(&Key::Char('j'));
        assert_eq!(state.cursor(), 1);
        state.handle_key(&Key::Char('k'));
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_choices() {
        let mut state = ChooserState::new(2);
        state.handle_key(&Key::End);
        assert_eq!(state.handle_key(&Key::Enter), Some(Choice::Selected(1)));
        assert_eq!(state.handle_key(&Key::Char('R')), Some(Choice::Refresh));
        assert_eq!(state.handle_key(&Key::Char('r')), Some(Choice::Refresh));
        assert_eq!(state.handle_key(&Key::Escape), Some(Choice::Back));
        assert_eq!(state.handle_key(&Key::Char('q')), Some(Choice::Back));
        assert_eq!(state.handle_key(&Key::Char('x')), None);
    }

    #[test]
    fn test_empty_list_cannot_select_but_can_refresh() {
        let mut state = ChooserState::new(0);
        assert_eq!(state.handle_key(&Key::ArrowDown), None);
        assert_eq!(state.handle_key(&Key::Enter), None);
        assert_eq!(state.handle_key(&Key::Char('r')), Some(Choice::Refresh));
    }

    #[test]
    fn test_window_fits_everything_when_small() {
        let mut state = ChooserState::new(3);
        assert_eq!(state.window(&[1, 1, 1], 10), 0..3);
    }

    #[test]
    fn test_window_follows_cursor_down_and_up() {
        // three placements with ten events each on a 24-row terminal
        let heights = [11, 11, 11];
        let mut state = ChooserState::new(3);
        assert_eq!(state.window(&heights, 22), 0..2);

        state.handle_key(&Key::ArrowDown);
        assert_eq!(state.window(&heights, 22), 0..2);
        state.handle_key(&Key::ArrowDown);
        assert_eq!(state.window(&heights, 22), 1..3);

        state.handle_key(&Key::ArrowUp);
        assert_eq!(state.window(&heights, 22), 1..3);
        state.handle_key(&Key::ArrowUp);
        assert_eq!(state.window(&heights, 22), 0..2);
    }

    #[test]
    fn test_window_after_wrapping() {
        let heights = [1; 10];
        let mut state = ChooserState::new(10);
        state.handle_key(&Key::ArrowUp);
        assert_eq!(state.cursor(), 9);
        assert_eq!(state.window(&heights, 4), 6..10);
        state.handle_key(&Key::ArrowDown);
        assert_eq!(state.window(&heights, 4), 0..4);
    }

    #[test]
    fn test_window_keeps_oversized_entry() {
        let mut state = ChooserState::new(2);
        state.handle_key(&Key::End);
        assert_eq!(state.window(&[3, 40], 20), 1..2);
        assert_eq!(ChooserState::new(0).window(&[], 20), 0..0);
    }

    #[test]
    fn test_window_total_never_exceeds_rows() {
        let heights = [2, 5, 1, 7, 3, 3, 1, 4];
        let mut state = ChooserState::new(heights.len());
        for _ in 0..heights.len() * 2 {
            let range = state.window(&heights, 8);
            assert!(range.contains(&state.cursor()));
            let used: usize = heights[range].iter().sum();
            assert!(used <= 8, "{used}");
            state.handle_key(&Key::ArrowDown);
        }
    }

    #[test]
    fn test_cursor_survives_shrinking_list() {
        let mut state = ChooserState::new(5);
        state.handle_key(&Key::End);
        assert_eq!(state.cursor(), 4);
        state.set_len(2);
        assert_eq!(state.cursor(), 1);
        state.set_len(0);
        assert_eq!(state.cursor(), 0);
    }
}
