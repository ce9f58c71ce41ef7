//! Form Editing State
//!
//! Local edit buffers for the five inputs. The form only knows how to edit
//! text and move focus; every change is handed back as a `(Field, value)` pair
//! for the app to forward to the Conductor, which owns the real values.

use unicode_width::UnicodeWidthStr;

use pitch_conductor::{Field, PitchInput, Tone};

/// Focusable parts of the form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    /// A text field or the tone selector
    Field(Field),
    /// The Generate action
    Generate,
}

impl Focus {
    /// Focus order, top to bottom
    pub const ORDER: [Focus; 6] = [
        Focus::Field(Field::Company),
        Focus::Field(Field::Problem),
        Focus::Field(Field::Solution),
        Focus::Field(Field::Ask),
        Focus::Field(Field::Tone),
        Focus::Generate,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next focus target (wraps)
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    /// Previous focus target (wraps)
    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }
}

/// An edit the Conductor needs to hear about
pub type FieldEdit = (Field, String);

/// Edit buffers and focus
#[derive(Clone, Debug)]
pub struct FormState {
    values: PitchInput,
    focus: Focus,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(PitchInput::default())
    }
}

impl FormState {
    /// Form showing `values`, focused on the first field
    pub fn new(values: PitchInput) -> Self {
        Self {
            values,
            focus: Focus::Field(Field::Company),
        }
    }

    /// Replace every value (e.g. from a `FormSnapshot`)
    pub fn load(&mut self, values: PitchInput) {
        self.values = values;
    }

    /// Current values
    pub fn values(&self) -> &PitchInput {
        &self.values
    }

    /// Current focus
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Focused field, if focus is on one
    pub fn focused_field(&self) -> Option<Field> {
        match self.focus {
            Focus::Field(field) => Some(field),
            Focus::Generate => None,
        }
    }

    /// Move focus directly
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Move focus down
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Move focus up
    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// The tone the selector shows (unrecognized values show as confident)
    pub fn tone(&self) -> Tone {
        self.values.effective_tone()
    }

    /// Type a character into the focused text field
    pub fn insert_char(&mut self, c: char) -> Option<FieldEdit> {
        let field = self.text_field()?;
        if c == '\n' && !field.is_multiline() {
            return None;
        }
        let mut value = self.values.get(field).to_string();
        value.push(c);
        Some(self.commit(field, value))
    }

    /// Insert a line break (multi-line fields only)
    pub fn insert_newline(&mut self) -> Option<FieldEdit> {
        self.insert_char('\n')
    }

    /// Delete the last character of the focused text field
    pub fn backspace(&mut self) -> Option<FieldEdit> {
        let field = self.text_field()?;
        let mut value = self.values.get(field).to_string();
        value.pop()?;
        Some(self.commit(field, value))
    }

    /// Step the tone selector forward or backward
    pub fn cycle_tone(&mut self, forward: bool) -> FieldEdit {
        let current = self.tone();
        let tone = if forward {
            current.next()
        } else {
            current.prev()
        };
        self.commit(Field::Tone, tone.adjective().to_string())
    }

    /// Display width of the last line of the focused field
    pub fn cursor_column(&self) -> usize {
        self.focused_field()
            .map(|f| {
                self.values
                    .get(f)
                    .rsplit('\n')
                    .next()
                    .map_or(0, UnicodeWidthStr::width)
            })
            .unwrap_or(0)
    }

    fn text_field(&self) -> Option<Field> {
        self.focused_field().filter(|f| *f != Field::Tone)
    }

    fn commit(&mut self, field: Field, value: String) -> FieldEdit {
        self.values.set(field, value.clone());
        (field, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_typing_reports_full_value() {
        let mut form = FormState::default();
        form.insert_char('A');
        let edit = form.insert_char('c');
        assert_eq!(edit, Some((Field::Company, "Ac".to_string())));
        assert_eq!(form.values().company, "Ac");
    }

    #[test]
    fn test_newline_only_in_multiline_fields() {
        let mut form = FormState::default();
        assert_eq!(form.insert_newline(), None);

        form.focus_next();
        assert_eq!(form.focused_field(), Some(Field::Problem));
        assert_eq!(
            form.insert_newline(),
            Some((Field::Problem, "\n".to_string()))
        );
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut form = FormState::default();
        assert_eq!(form.backspace(), None);
        form.insert_char('x');
        assert_eq!(form.backspace(), Some((Field::Company, String::new())));
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut form = FormState::default();
        form.focus_prev();
        assert_eq!(form.focus(), Focus::Generate);
        form.focus_next();
        assert_eq!(form.focus(), Focus::Field(Field::Company));
    }

    #[test]
    fn test_tone_field_takes_no_text() {
        let mut form = FormState::default();
        form.set_focus(Focus::Field(Field::Tone));
        assert_eq!(form.insert_char('x'), None);
        assert_eq!(form.values().tone, "confident");
    }

    #[test]
    fn test_cycle_tone() {
        let mut form = FormState::default();
        assert_eq!(form.tone(), Tone::Confident);
        assert_eq!(
            form.cycle_tone(true),
            (Field::Tone, "friendly".to_string())
        );
        form.cycle_tone(false);
        form.cycle_tone(false);
        assert_eq!(form.tone(), Tone::Technical);
    }

    #[test]
    fn test_cursor_column_uses_last_line() {
        let mut form = FormState::default();
        form.set_focus(Focus::Field(Field::Ask));
        for c in "ab\ncde".chars() {
            form.insert_char(c);
        }
        assert_eq!(form.cursor_column(), 3);
    }
}
