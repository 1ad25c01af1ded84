//! Event stream payloads.

use crate::{
    snapshot::Snapshot,
    types::{FormationId, GameMode, MarkerId},
};

/// Events emitted by the formation library task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// A new formation was saved.
    Saved {
        /// Saved formation id.
        id: FormationId,
    },
    /// An existing formation was renamed.
    Renamed {
        /// Renamed formation id.
        id: FormationId,
    },
    /// A formation was removed.
    Removed {
        /// Removed formation id.
        id: FormationId,
    },
}

/// Events emitted by a [`crate::runtime::session::CourtSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum CourtEvent {
    /// The displayed marker positions changed.
    PositionsChanged {
        /// Snapshot to render.
        current: Snapshot,
    },
    /// Cursor, length, or drag state of the history changed.
    HistoryChanged {
        /// Current cursor.
        cursor: usize,
        /// Number of entries.
        len: usize,
        /// Whether undo is available.
        can_undo: bool,
        /// Whether redo is available.
        can_redo: bool,
    },
    /// Singles/doubles mode changed.
    ModeChanged {
        /// New mode.
        mode: GameMode,
    },
    /// A marker's appearance changed.
    CustomizationChanged {
        /// Affected marker.
        marker: MarkerId,
    },
    /// The court was saved as a formation.
    FormationSaved {
        /// New formation id.
        id: FormationId,
    },
    /// A saved formation replaced the court.
    FormationLoaded {
        /// Loaded formation id.
        id: FormationId,
    },
}
