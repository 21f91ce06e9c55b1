// Stroke ledger: the undo history of committed actions.
// Visual expectation: replaying `actions()` in order gives back exactly what is
// on screen (minus any answer overlay).

use crate::types::{Action, Point, Segment};
use tracing::debug;

#[derive(Debug, Default)]
pub struct StrokeLedger {
    actions: Vec<Action>,
    in_progress: Vec<Segment>,
    open: bool,
}

impl StrokeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pen went down: start a fresh in-progress action.
    pub fn begin_action(&mut self) {
        self.in_progress.clear();
        self.open = true;
    }

    /// Append one drag increment. Zero-length segments are kept; segments
    /// arriving while no action is open are dropped.
    pub fn extend(&mut self, segment: Segment) {
        if !self.open {
            debug!(?segment, "segment outside of an open action ignored");
            return;
        }
        self.in_progress.push(segment);
    }

    /// Pen went up. Returns true when a new action landed in the ledger
    /// (a click without movement commits nothing).
    pub fn commit_action(&mut self) -> bool {
        self.open = false;
        if self.in_progress.is_empty() {
            return false;
        }
        let segments = std::mem::take(&mut self.in_progress);
        debug!(segments = segments.len(), actions = self.actions.len() + 1, "action committed");
        self.actions.push(Action::from_segments(segments));
        true
    }

    /// Drop the most recent action. `None` on an empty ledger; the caller
    /// rebuilds the surfaces only when something was removed.
    pub fn undo(&mut self) -> Option<Action> {
        let action = self.actions.pop()?;
        debug!(remaining = self.actions.len(), "action undone");
        Some(action)
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.in_progress.clear();
        self.open = false;
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Where the answer goes: end of the last segment of the last action.
    pub fn anchor(&self) -> Option<Point> {
        self.actions.last()?.last_segment().map(Segment::end)
    }

    /// All committed segments, action order then segment order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.actions.iter().flat_map(|a| a.segments().iter())
    }
}
