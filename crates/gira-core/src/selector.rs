//! Interactive selection state machine
//!
//! [`Selection`] owns the cursor and mutates the `selected` flags of the
//! branches it was built over. It knows nothing about terminals: a
//! [`SelectionFrontend`] renders it and feeds it [`SelectorEvent`]s, so the
//! same machine runs under crossterm or from a scripted event list.
//!
//! Both exit gestures are accepted in every state:
//! - `Commit` ends the session and keeps the current flags
//! - `Abort` ends the session and voids every flag

use std::collections::VecDeque;

use serde::Serialize;

use crate::branch::{Branch, NO_ISSUE_LABEL};
use crate::error::GiraError;

/// One input to the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorEvent {
    Up,
    Down,
    Top,
    Bottom,
    /// Flip the focused row
    Toggle,
    /// Finish and delete what is selected
    Commit,
    /// Finish and delete nothing
    Abort,
}

/// How a selection session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    Committed,
    Cancelled,
}

impl SelectionOutcome {
    pub fn is_cancelled(self) -> bool {
        self == SelectionOutcome::Cancelled
    }
}

/// Result of feeding one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished(SelectionOutcome),
}

/// Visual class of a tracker status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    /// Work finished or abandoned; usually safe to delete
    Complete,
    /// Work not started yet
    Pending,
    /// Anything else, including no status at all
    Neutral,
}

impl StatusTone {
    pub fn of(status: Option<&str>) -> Self {
        match status {
            Some("Done") | Some("Discarded") => StatusTone::Complete,
            Some("To Do") | Some("Ready for Dev") => StatusTone::Pending,
            _ => StatusTone::Neutral,
        }
    }
}

/// Everything a frontend needs to draw one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<'a> {
    pub selected: bool,
    pub focused: bool,
    pub protected: bool,
    /// Status label, or [`NO_ISSUE_LABEL`]
    pub status: &'a str,
    pub tone: StatusTone,
    pub name: &'a str,
}

/// Selection state over a reconciled branch list
#[derive(Debug)]
pub struct Selection<'a> {
    branches: &'a mut [Branch],
    cursor: usize,
    outcome: Option<SelectionOutcome>,
}

impl<'a> Selection<'a> {
    /// Start a session: cursor on the first row, nothing selected
    pub fn new(branches: &'a mut [Branch]) -> Self {
        for branch in branches.iter_mut() {
            branch.selected = false;
        }
        Self {
            branches,
            cursor: 0,
            outcome: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn branches(&self) -> &[Branch] {
        &*self.branches
    }

    /// Number of rows currently marked
    pub fn selected_count(&self) -> usize {
        self.branches.iter().filter(|b| b.selected).count()
    }

    /// Apply one event
    ///
    /// Events arriving after the session finished are ignored and report the
    /// first outcome again.
    pub fn handle(&mut self, event: SelectorEvent) -> Step {
        if let Some(outcome) = self.outcome {
            return Step::Finished(outcome);
        }

        let last = self.branches.len().saturating_sub(1);
        match event {
            SelectorEvent::Up => self.cursor = self.cursor.saturating_sub(1),
            SelectorEvent::Down => self.cursor = (self.cursor + 1).min(last),
            SelectorEvent::Top => self.cursor = 0,
            SelectorEvent::Bottom => self.cursor = last,
            SelectorEvent::Toggle => {
                if let Some(branch) = self.branches.get_mut(self.cursor) {
                    if !branch.protected {
                        branch.selected = !branch.selected;
                    }
                }
            }
            SelectorEvent::Commit => return self.finish(SelectionOutcome::Committed),
            SelectorEvent::Abort => return self.finish(SelectionOutcome::Cancelled),
        }

        Step::Continue
    }

    fn finish(&mut self, outcome: SelectionOutcome) -> Step {
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }

    /// Row models in listing order
    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.branches
            .iter()
            .enumerate()
            .map(move |(index, branch)| RowView {
                selected: branch.selected,
                focused: index == self.cursor,
                protected: branch.protected,
                status: branch.status().unwrap_or(NO_ISSUE_LABEL),
                tone: StatusTone::of(branch.status()),
                name: branch.display_name(),
            })
    }
}

/// Drives a [`Selection`] from some input source
pub trait SelectionFrontend {
    /// Draw the current state
    fn render(&mut self, selection: &Selection<'_>) -> Result<(), GiraError>;

    /// Block until the next input event
    fn next_event(&mut self) -> Result<SelectorEvent, GiraError>;
}

/// Run a selection session over `branches`
///
/// Returns `true` when the user aborted. The branch flags are mutated in
/// place; the list itself is never filtered or reordered.
pub fn run(
    branches: &mut [Branch],
    frontend: &mut dyn SelectionFrontend,
) -> Result<bool, GiraError> {
    let mut selection = Selection::new(branches);
    loop {
        frontend.render(&selection)?;
        let event = frontend.next_event()?;
        if let Step::Finished(outcome) = selection.handle(event) {
            tracing::debug!(
                "selection finished: {:?} with {} marked",
                outcome,
                selection.selected_count()
            );
            return Ok(outcome.is_cancelled());
        }
    }
}

/// References to delete after a session, in listing order
///
/// Empty when the session was aborted, whatever the flags say. Protected
/// branches are never included.
pub fn selected_references(branches: &[Branch], cancelled: bool) -> Vec<String> {
    if cancelled {
        return Vec::new();
    }
    branches
        .iter()
        .filter(|b| b.selected && !b.protected)
        .map(|b| b.reference_name().to_string())
        .collect()
}

/// Frontend replaying a fixed list of events
///
/// Once the list is exhausted it answers `Abort`, so a short script never
/// deletes anything by accident.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<SelectorEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = SelectorEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl SelectionFrontend for ScriptedInput {
    fn render(&mut self, _selection: &Selection<'_>) -> Result<(), GiraError> {
        Ok(())
    }

    fn next_event(&mut self) -> Result<SelectorEvent, GiraError> {
        Ok(self.events.pop_front().unwrap_or(SelectorEvent::Abort))
    }
}
