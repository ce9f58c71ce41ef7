//! TextBlock Widget
//!
//! A borderless, wrapped text region that can follow its tail while text is
//! still arriving, with an optional cursor marker after the last character.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// Marker drawn after streaming text
pub const CURSOR_MARKER: &str = "▌";

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines
    pub total_lines: usize,
    /// Keep the last line in view as content grows
    pub follow: bool,
}

impl TextBlockState {
    /// State that keeps the newest line visible
    pub fn following() -> Self {
        Self {
            follow: true,
            ..Self::default()
        }
    }

    /// Scroll by delta (positive = down); manual scrolling stops following
    pub fn scroll(&mut self, delta: i32) {
        let step = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
        self.scroll_offset = if delta < 0 {
            self.scroll_offset.saturating_sub(step)
        } else {
            self.scroll_offset.saturating_add(step)
        };
        self.follow = false;
    }

    /// Scroll to bottom and resume following
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.total_lines.saturating_sub(1);
        self.follow = true;
    }
}

/// Wrap `content` to `width`, keeping explicit line breaks and blank lines
pub fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    content
        .split('\n')
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect()
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
    cursor: Option<Style>,
}

impl<'a> TextBlock<'a> {
    /// Block showing `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
            cursor: None,
        }
    }

    /// Text style
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Draw the cursor marker after the last character
    pub fn cursor(mut self, style: Style) -> Self {
        self.cursor = Some(style);
        self
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Leave one column free for the cursor marker
        let width = area.width.saturating_sub(1).max(1) as usize;
        let mut wrapped = wrap_lines(self.content, width);
        if wrapped.is_empty() {
            wrapped.push(String::new());
        }

        state.total_lines = wrapped.len();

        let max_scroll = state.total_lines.saturating_sub(area.height as usize);
        state.scroll_offset = if state.follow {
            max_scroll
        } else {
            state.scroll_offset.min(max_scroll)
        };

        let last = wrapped.len() - 1;
        for (i, line) in wrapped
            .iter()
            .enumerate()
            .skip(state.scroll_offset)
            .take(area.height as usize)
        {
            let y = area.y + (i - state.scroll_offset) as u16;
            let (end_x, _) = buf.set_stringn(area.x, y, line, area.width as usize, self.style);

            if i == last {
                if let Some(cursor_style) = self.cursor {
                    if end_x < area.x + area.width {
                        buf.set_string(end_x, y, CURSOR_MARKER, cursor_style);
                    }
                }
            }
        }
    }
}
