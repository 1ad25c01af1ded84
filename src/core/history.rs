//! Position-history engine: an undoable sequence of court snapshots.
//!
//! A drag gesture (`begin_drag`, any number of `update_drag`, `end_drag`)
//! coalesces into exactly one committed entry. Committing while the cursor
//! sits behind the newest entry discards the redo branch first.

use crate::{
    core::bounds::clamp,
    snapshot::Snapshot,
    types::{CourtSize, GameMode, MarkerId, Position},
};

/// Default bound on retained history entries.
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Tunables for [`PositionHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum entries kept after a committed drag; the oldest are dropped
    /// first. Values below 2 are treated as 2.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DragState {
    marker: MarkerId,
    origin: usize,
    working: Snapshot,
}

/// Cursor-addressed history of court snapshots.
///
/// Transitions take `self` by value and hand back the next state, so a
/// caller holds exactly one current value and can diff old against new.
/// Invalid transitions (undo at the start, a second concurrent drag, ...)
/// return the state unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionHistory {
    entries: Vec<Snapshot>,
    cursor: usize,
    mode: GameMode,
    court: CourtSize,
    drag: Option<DragState>,
    baseline: Vec<Snapshot>,
    config: HistoryConfig,
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new(GameMode::default(), CourtSize::default())
    }
}

impl PositionHistory {
    /// Fresh history holding only the default layout for `mode`.
    pub fn new(mode: GameMode, court: CourtSize) -> Self {
        Self::with_config(mode, court, HistoryConfig::default())
    }

    /// Like [`PositionHistory::new`] with explicit tunables.
    pub fn with_config(mode: GameMode, court: CourtSize, config: HistoryConfig) -> Self {
        let entries = vec![Snapshot::default_layout(mode, court)];
        Self {
            baseline: entries.clone(),
            entries,
            cursor: 0,
            mode,
            court,
            drag: None,
            config,
        }
    }

    /// Starts a drag gesture for `marker` and applies the first proposed
    /// position to a working snapshot. Nothing is committed yet.
    #[must_use]
    pub fn begin_drag(mut self, marker: MarkerId, proposed: Position) -> Self {
        if let Some(active) = &self.drag {
            log::warn!(
                "ignoring begin_drag for {:?}: drag of {:?} still active",
                marker,
                active.marker
            );
            return self;
        }

        let working = self.entries[self.cursor].with_position(marker, clamp(proposed, self.court));
        self.drag = Some(DragState {
            marker,
            origin: self.cursor,
            working,
        });
        self
    }

    /// Moves the dragged marker within the working snapshot. History does
    /// not grow no matter how many moves arrive during one gesture.
    #[must_use]
    pub fn update_drag(mut self, marker: MarkerId, proposed: Position) -> Self {
        let court = self.court;
        match self.drag.as_mut() {
            Some(drag) if drag.marker == marker => {
                drag.working.set_position(marker, clamp(proposed, court));
            }
            Some(drag) => {
                log::debug!(
                    "ignoring update_drag for {:?}: {:?} is being dragged",
                    marker,
                    drag.marker
                );
            }
            None => log::debug!("ignoring update_drag for {marker:?}: no drag active"),
        }
        self
    }

    /// Commits the working snapshot as a new entry, discarding any redo
    /// branch first. A drag that moved nothing still commits.
    #[must_use]
    pub fn end_drag(mut self) -> Self {
        let Some(drag) = self.drag.take() else {
            log::debug!("ignoring end_drag: no drag active");
            return self;
        };

        self.entries.truncate(drag.origin + 1);
        self.entries.push(drag.working);

        let max = self.config.max_entries.max(2);
        if self.entries.len() > max {
            let excess = self.entries.len() - max;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        self
    }

    /// Steps the cursor back one entry; no-op at the start or mid-drag.
    #[must_use]
    pub fn undo(mut self) -> Self {
        if self.drag.is_some() {
            log::debug!("ignoring undo during drag");
        } else if self.can_undo() {
            self.cursor -= 1;
        }
        self
    }

    /// Steps the cursor forward one entry; no-op at the end or mid-drag.
    #[must_use]
    pub fn redo(mut self) -> Self {
        if self.drag.is_some() {
            log::debug!("ignoring redo during drag");
        } else if self.can_redo() {
            self.cursor += 1;
        }
        self
    }

    /// Replaces all history with the default layout for `mode`.
    ///
    /// The unsaved-changes baseline is kept, so resetting a loaded
    /// formation counts as a change.
    #[must_use]
    pub fn reset(mut self, mode: GameMode) -> Self {
        self.entries = vec![Snapshot::default_layout(mode, self.court)];
        self.cursor = 0;
        self.mode = mode;
        self.drag = None;
        self
    }

    /// Switches between singles and doubles, restarting from the new
    /// mode's default layout. Selecting the current mode is a no-op.
    #[must_use]
    pub fn toggle_mode(self, is_doubles: bool) -> Self {
        let mode = GameMode::from_is_doubles(is_doubles);
        if mode == self.mode {
            return self;
        }
        self.reset(mode)
    }

    /// Replaces history with a saved sequence and resumes at its last entry.
    ///
    /// The sequence also becomes the unsaved-changes baseline. An empty
    /// sequence falls back to the default layout.
    #[must_use]
    pub fn load_formation(mut self, snapshots: Vec<Snapshot>, is_doubles: bool) -> Self {
        let mode = GameMode::from_is_doubles(is_doubles);
        let entries = if snapshots.is_empty() {
            log::warn!("loaded formation has no history entries; using default layout");
            vec![Snapshot::default_layout(mode, self.court)]
        } else {
            snapshots
        };

        self.cursor = entries.len() - 1;
        self.baseline = entries.clone();
        self.entries = entries;
        self.mode = mode;
        self.drag = None;
        self
    }

    /// Records the current sequence as the saved baseline.
    #[must_use]
    pub fn mark_saved(mut self) -> Self {
        self.baseline = self.entries.clone();
        self
    }

    /// Snapshot the renderer should show: the working snapshot during a
    /// drag, otherwise the entry under the cursor.
    pub fn current(&self) -> &Snapshot {
        match &self.drag {
            Some(drag) => &drag.working,
            None => &self.entries[self.cursor],
        }
    }

    /// Entry immediately before the cursor, used as the trail anchor.
    pub fn ghost_positions(&self) -> Option<&Snapshot> {
        self.cursor.checked_sub(1).map(|idx| &self.entries[idx])
    }

    /// Whether [`PositionHistory::undo`] would move the cursor.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether [`PositionHistory::redo`] would move the cursor.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// True when the committed sequence differs from the last load/save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.entries != self.baseline
    }

    /// Committed entries, oldest first.
    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    /// Index of the displayed entry.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of committed entries, never zero.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no committed entries; false for every constructed
    /// history.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current singles/doubles mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Court the positions are clamped to.
    pub fn court(&self) -> CourtSize {
        self.court
    }

    /// Whether a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Cursor value captured when the active drag began.
    pub fn drag_origin_index(&self) -> Option<usize> {
        self.drag.as_ref().map(|d| d.origin)
    }

    /// Marker of the active drag, if any.
    pub fn dragging_marker(&self) -> Option<MarkerId> {
        self.drag.as_ref().map(|d| d.marker)
    }
}
