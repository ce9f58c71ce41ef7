//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - ConductorClient for orchestration
//! - FormState for the edit buffers
//! - DisplayState for rendering
//!
//! The App:
//! 1. Converts terminal events to SurfaceEvents
//! 2. Sends events to the embedded Conductor via ConductorClient
//! 3. Receives ConductorMessages and updates DisplayState
//! 4. Renders based on FormState and DisplayState

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Frame, Terminal};

use pitch_conductor::{Channel, Field, NotifyLevel, PitchConfig, Tone};

use crate::conductor_client::ConductorClient;
use crate::display::DisplayState;
use crate::form::{FieldEdit, Focus, FormState};
use crate::theme;
use crate::widgets::{TextBlock, TextBlockState};

/// Inner height of multi-line input boxes
const MULTILINE_ROWS: u16 = 3;

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Target frame duration
    frame_duration: Duration,

    // === Conductor Integration ===
    /// Client for communicating with the embedded Conductor
    conductor: ConductorClient,
    /// Display state derived from ConductorMessages
    display: DisplayState,

    // === Input State ===
    /// Edit buffers and focus
    form: FormState,

    // === Output State ===
    /// Scroll state per output panel (headline, subhead, body)
    panels: [TextBlockState; 3],

    // === Misc State ===
    /// Last frame time (for timers)
    last_frame: Instant,
}

impl App {
    /// Create a new App instance
    pub fn new(config: PitchConfig) -> Self {
        let frame_duration = config.frame_duration;
        let conductor = ConductorClient::new(config);

        Self {
            running: true,
            frame_duration,
            conductor,
            display: DisplayState::new(),
            form: FormState::default(),
            panels: [
                TextBlockState::following(),
                TextBlockState::following(),
                TextBlockState::following(),
            ],
            last_frame: Instant::now(),
        }
    }

    /// Connect to the Conductor and load the initial form
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.conductor.connect().await?;
        self.process_conductor_messages();
        Ok(())
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        self.connect().await?;

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key).await?;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(self.frame_duration) => {}
            }

            self.tick().await;
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Poll the Conductor, apply its messages and advance timers
    pub async fn tick(&mut self) {
        self.conductor.poll_streaming().await;
        self.process_conductor_messages();

        let now = Instant::now();
        self.display.update(now - self.last_frame);
        self.last_frame = now;
    }

    /// Process all pending messages from the Conductor
    fn process_conductor_messages(&mut self) {
        for msg in self.conductor.recv_all() {
            self.display.apply_message(msg);
        }

        if let Some(values) = self.display.pending_form.take() {
            self.form.load(values);
        }
        if self.display.quit_requested {
            self.running = false;
        }
    }

    /// Whether the loop is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Display state (for inspection)
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Form state (for inspection)
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let on_tone = self.form.focus() == Focus::Field(Field::Tone);

        match key.code {
            // Quit
            KeyCode::Char('c') if ctrl => self.quit().await?,

            // Esc stops a running generation, otherwise quits
            KeyCode::Esc => {
                if self.conductor.is_busy() {
                    self.conductor.cancel().await?;
                } else {
                    self.quit().await?;
                }
            }

            // Generate
            KeyCode::Char('g') if ctrl => self.generate().await?,
            KeyCode::Enter if alt => {
                let edit = self.form.insert_newline();
                self.send_edit(edit).await?;
            }
            KeyCode::Enter => self.generate().await?,

            // Focus
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),

            // Tone selector
            KeyCode::Left if on_tone => {
                let edit = self.form.cycle_tone(false);
                self.send_edit(Some(edit)).await?;
            }
            KeyCode::Right | KeyCode::Char(' ') if on_tone => {
                let edit = self.form.cycle_tone(true);
                self.send_edit(Some(edit)).await?;
            }

            // Typing
            KeyCode::Char(c) if !ctrl => {
                let edit = self.form.insert_char(c);
                self.send_edit(edit).await?;
            }
            KeyCode::Backspace => {
                let edit = self.form.backspace();
                self.send_edit(edit).await?;
            }

            // Body panel scrolling
            KeyCode::PageUp => self.panels[2].scroll(-3),
            KeyCode::PageDown => self.panels[2].scroll(3),
            KeyCode::End if ctrl => self.panels[2].scroll_to_bottom(),

            _ => {}
        }

        self.process_conductor_messages();
        Ok(())
    }

    async fn send_edit(&mut self, edit: Option<FieldEdit>) -> anyhow::Result<()> {
        if let Some((field, value)) = edit {
            self.conductor.edit_field(field, value).await?;
        }
        Ok(())
    }

    async fn generate(&mut self) -> anyhow::Result<()> {
        // The action is disabled while a sequence runs
        if self.conductor.is_busy() {
            return Ok(());
        }
        // A fresh run makes the previous run's warning stale
        self.display.clear_notification();
        for panel in &mut self.panels {
            panel.scroll_to_bottom();
        }
        self.conductor.generate().await
    }

    async fn quit(&mut self) -> anyhow::Result<()> {
        self.conductor.request_quit().await?;
        self.running = false;
        Ok(())
    }

    /// Render the UI
    pub fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let [main, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        let [form_area, output_area] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(main);

        self.draw_form(frame, form_area);
        self.draw_outputs(frame, output_area);
        self.draw_status(frame, status);
    }

    fn draw_form(&self, frame: &mut Frame<'_>, area: Rect) {
        let text_box = |field: Field| {
            if field.is_multiline() {
                Constraint::Length(MULTILINE_ROWS + 2)
            } else {
                Constraint::Length(3)
            }
        };
        let rows = Layout::vertical([
            text_box(Field::Company),
            Constraint::Length(1),
            text_box(Field::Problem),
            Constraint::Length(1),
            text_box(Field::Solution),
            Constraint::Length(1),
            text_box(Field::Ask),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

        for (i, field) in [Field::Company, Field::Problem, Field::Solution, Field::Ask]
            .into_iter()
            .enumerate()
        {
            self.draw_text_field(frame, rows[i * 2], field);
            self.draw_error(frame, rows[i * 2 + 1], field);
        }
        self.draw_tone(frame, rows[8]);
        self.draw_error(frame, rows[9], Field::Tone);
        self.draw_generate(frame, rows[10]);
    }

    fn field_block(&self, focus: Focus, title: &str) -> Block<'static> {
        let color = if self.form.focus() == focus {
            theme::ACCENT
        } else {
            theme::LABEL
        };
        Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(color))
    }

    fn draw_text_field(&self, frame: &mut Frame<'_>, area: Rect, field: Field) {
        let block = self.field_block(Focus::Field(field), field.label());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut text = TextBlock::new(self.form.values().get(field))
            .style(Style::default().fg(theme::INPUT_TEXT));
        if self.form.focus() == Focus::Field(field) {
            text = text.cursor(Style::default().fg(theme::ACCENT));
        }
        frame.render_stateful_widget(text, inner, &mut TextBlockState::following());
    }

    fn draw_error(&self, frame: &mut Frame<'_>, area: Rect, field: Field) {
        if let Some(message) = self.display.error_for(field) {
            let line = Line::styled(format!(" {message}"), Style::default().fg(theme::ERROR_RED));
            frame.render_widget(Paragraph::new(line), area);
        }
    }

    fn draw_tone(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = self.field_block(Focus::Field(Field::Tone), Field::Tone.label());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let selected = self.form.tone();
        let mut spans = Vec::new();
        for tone in Tone::ALL {
            let style = if tone == selected {
                Style::default()
                    .fg(theme::TONE_SELECTED)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(theme::LABEL)
            };
            spans.push(Span::styled(format!(" {} ", tone.label()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn draw_generate(&self, frame: &mut Frame<'_>, area: Rect) {
        let busy = self.display.is_streaming();
        let (label, style) = if busy {
            ("Generating…", Style::default().fg(theme::DIM_GRAY))
        } else if self.form.focus() == Focus::Generate {
            (
                "Generate",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
        } else {
            ("Generate", Style::default().fg(theme::ACCENT))
        };

        let block = self.field_block(Focus::Generate, "Action");
        frame.render_widget(
            Paragraph::new(Line::styled(label, style))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
    }

    fn draw_outputs(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Min(6),
        ])
        .split(area);

        let streaming = self.display.is_streaming();
        for (i, channel) in Channel::ALL.into_iter().enumerate() {
            let color = match channel {
                Channel::Headline => theme::HEADLINE,
                Channel::Subhead => theme::SUBHEAD,
                Channel::Body => theme::BODY,
            };
            let block = Block::bordered()
                .title(format!(" {} ", channel.label()))
                .border_style(Style::default().fg(theme::LABEL));
            let inner = block.inner(rows[i]);
            frame.render_widget(block, rows[i]);

            let mut text = TextBlock::new(self.display.channels.section(channel))
                .style(Style::default().fg(color));
            if streaming {
                text = text.cursor(Style::default().fg(theme::CURSOR));
            }
            frame.render_stateful_widget(text, inner, &mut self.panels[i]);
        }
    }

    fn draw_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let line = if let Some(note) = &self.display.notification {
            let color = match note.level {
                NotifyLevel::Info => theme::SUCCESS_GREEN,
                NotifyLevel::Warning => theme::WARNING_YELLOW,
                NotifyLevel::Error => theme::ERROR_RED,
            };
            Line::styled(format!(" {}", note.message), Style::default().fg(color))
        } else {
            let hints = if self.display.is_streaming() {
                "Esc stop"
            } else {
                "Enter/Ctrl+G generate | Tab move | Alt+Enter newline | Esc quit"
            };
            Line::styled(
                format!(" {} | {hints}", self.display.conductor_state.description()),
                Style::default().fg(theme::DIM_GRAY),
            )
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
