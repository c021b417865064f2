//! Crossterm frontend for the branch selector
//!
//! Draws the selection as a table on the alternate screen and turns key
//! presses into [`SelectorEvent`]s. The terminal is restored when the
//! frontend is dropped, including on early returns.

use std::io::{IsTerminal, Stdout, Write, stdout};

use anyhow::Context;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, Stylize};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use gira_core::{GiraError, Selection, SelectionFrontend, SelectorEvent, StatusTone};

const HEADER: [&str; 4] = [
    "gira: Select branches to delete",
    "<enter>: (de)select   <esc>: quit and delete   <ctrl-c>: immediately quit",
    "",
    "",
];

/// Owned copy of one rendered row, kept so a resize can redraw
#[derive(Debug, Clone)]
struct RowLine {
    selected: bool,
    focused: bool,
    protected: bool,
    status: String,
    tone: StatusTone,
    name: String,
}

/// Interactive frontend on the process terminal
pub struct TerminalFrontend {
    out: Stdout,
    rows: Vec<RowLine>,
    cursor: usize,
    offset: usize,
}

fn terminal_error(err: anyhow::Error) -> GiraError {
    GiraError::Terminal(format!("{:#}", err))
}

/// Whether both stdin and stdout are attached to a terminal
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

impl TerminalFrontend {
    /// Switch the terminal to raw mode on the alternate screen
    pub fn enter() -> Result<Self, GiraError> {
        if !is_interactive() {
            return Err(GiraError::NonTty);
        }

        terminal::enable_raw_mode()
            .context("failed to enable raw mode")
            .map_err(terminal_error)?;

        let mut out = stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(terminal_error(
                anyhow::Error::new(e).context("failed to enter alternate screen"),
            ));
        }

        Ok(Self {
            out,
            rows: Vec::new(),
            cursor: 0,
            offset: 0,
        })
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        let (width, height) = terminal::size().context("failed to read terminal size")?;
        let visible = (height as usize).saturating_sub(HEADER.len()).max(1);
        self.offset = scroll_offset(self.cursor, self.offset, visible);

        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        for (line, &text) in HEADER.iter().enumerate() {
            queue!(self.out, MoveTo(0, line as u16))?;
            if line == 0 {
                queue!(self.out, Print(text.bold()))?;
            } else {
                queue!(self.out, Print(text.dim()))?;
            }
        }

        if self.rows.is_empty() {
            queue!(
                self.out,
                MoveTo(0, HEADER.len() as u16),
                Print("No local branches".dim())
            )?;
        }

        let status_width = self
            .rows
            .iter()
            .map(|r| r.status.chars().count())
            .max()
            .unwrap_or(0);

        let end = (self.offset + visible).min(self.rows.len());
        for (line, row) in self.rows[self.offset..end].iter().enumerate() {
            queue!(self.out, MoveTo(0, (HEADER.len() + line) as u16))?;
            let mark = match (row.protected, row.selected) {
                (true, _) => " - ".with(Color::Yellow),
                (false, true) => " X ".with(Color::Red).bold(),
                (false, false) => "   ".stylize(),
            };
            let status = format!(" {:<width$} ", row.status, width = status_width)
                .with(tone_color(row.tone));
            let mut name = format!(" {}", row.name);
            if row.protected {
                name.push_str(" (checked out)");
            }
            let name: String = name.chars().take(width as usize).collect();
            let name = if row.focused {
                name.reverse()
            } else {
                name.stylize()
            };
            queue!(self.out, Print(mark), Print(status), Print(name))?;
        }

        self.out.flush().context("failed to flush terminal")?;
        Ok(())
    }
}

impl SelectionFrontend for TerminalFrontend {
    fn render(&mut self, selection: &Selection<'_>) -> Result<(), GiraError> {
        self.rows = selection
            .rows()
            .map(|row| RowLine {
                selected: row.selected,
                focused: row.focused,
                protected: row.protected,
                status: row.status.to_string(),
                tone: row.tone,
                name: row.name.to_string(),
            })
            .collect();
        self.cursor = selection.cursor();
        self.draw().map_err(terminal_error)
    }

    fn next_event(&mut self) -> Result<SelectorEvent, GiraError> {
        loop {
            let event = event::read()
                .context("failed to read terminal input")
                .map_err(terminal_error)?;
            match event {
                Event::Key(key) => {
                    if let Some(selector_event) = map_key(key) {
                        return Ok(selector_event);
                    }
                }
                Event::Resize(_, _) => self.draw().map_err(terminal_error)?,
                _ => {}
            }
        }
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Translate a key press into a selector event
fn map_key(key: KeyEvent) -> Option<SelectorEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(SelectorEvent::Abort),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(SelectorEvent::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(SelectorEvent::Down),
        KeyCode::Home | KeyCode::Char('g') => Some(SelectorEvent::Top),
        KeyCode::End | KeyCode::Char('G') => Some(SelectorEvent::Bottom),
        KeyCode::Enter | KeyCode::Char(' ') => Some(SelectorEvent::Toggle),
        KeyCode::Esc => Some(SelectorEvent::Commit),
        _ => None,
    }
}

/// First visible row keeping `cursor` inside a window of `visible` rows
fn scroll_offset(cursor: usize, offset: usize, visible: usize) -> usize {
    if cursor < offset {
        cursor
    } else if cursor >= offset + visible {
        cursor + 1 - visible
    } else {
        offset
    }
}

fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Complete => Color::Green,
        StatusTone::Pending => Color::DarkGrey,
        StatusTone::Neutral => Color::Blue,
    }
}
