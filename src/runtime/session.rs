//! Interactive court session: the bridge between marker callbacks, the
//! position history, and the formation library.

use thiserror::Error;
use tokio::sync::broadcast;

use crate::{
    core::history::{HistoryConfig, PositionHistory},
    customization::{CustomizationPatch, Customizations},
    formation::{FormationDraft, SavedFormation, normalize_name},
    snapshot::Snapshot,
    types::{CourtSize, FormationId, GameMode, MarkerId, Position},
};

use super::{
    events::CourtEvent,
    handle::{FormationLibraryHandle, RuntimeError},
};

const EVENT_CAPACITY: usize = 256;

/// Failures of the session's save and load actions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The name was blank after trimming.
    #[error("formation name is empty")]
    EmptyName,
    /// The library could not save the formation.
    #[error("saving formation failed: {0}")]
    Save(#[source] RuntimeError),
    /// The library could not load the formation.
    #[error("loading formation failed: {0}")]
    Load(#[source] RuntimeError),
}

impl SessionError {
    /// Short text suitable for an alert.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Please enter a formation name.",
            Self::Save(_) => "Failed to save formation.",
            Self::Load(_) => "Failed to load formation.",
        }
    }
}

/// Which trail overlays are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailSettings {
    /// Draw trails for player markers.
    pub show_player_trails: bool,
    /// Draw the shuttle trail.
    pub show_shuttle_trail: bool,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            show_player_trails: true,
            show_shuttle_trail: true,
        }
    }
}

/// Line from a marker's ghost position to where it is displayed now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trail {
    /// Marker the trail belongs to.
    pub marker: MarkerId,
    /// Ghost position.
    pub from: Position,
    /// Displayed position.
    pub to: Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Observed {
    current: Snapshot,
    cursor: usize,
    len: usize,
    dragging: bool,
    mode: GameMode,
}

impl Observed {
    fn of(history: &PositionHistory) -> Self {
        Self {
            current: *history.current(),
            cursor: history.cursor(),
            len: history.len(),
            dragging: history.is_dragging(),
            mode: history.mode(),
        }
    }
}

/// Owns the editing state of one court and publishes [`CourtEvent`]s.
///
/// Marker callbacks map onto history transitions:
/// `on_position_start` begins a drag, `on_position_change` moves it, and
/// `on_position_change_complete` commits it.
pub struct CourtSession {
    history: PositionHistory,
    customizations: Customizations,
    trails: TrailSettings,
    library: FormationLibraryHandle,
    events_tx: broadcast::Sender<CourtEvent>,
}

impl CourtSession {
    /// Session starting from the default layout for `mode`.
    pub fn new(library: FormationLibraryHandle, mode: GameMode, court: CourtSize) -> Self {
        Self::with_history_config(library, mode, court, HistoryConfig::default())
    }

    /// Like [`CourtSession::new`] with explicit history tunables.
    pub fn with_history_config(
        library: FormationLibraryHandle,
        mode: GameMode,
        court: CourtSize,
        config: HistoryConfig,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            history: PositionHistory::with_config(mode, court, config),
            customizations: Customizations::default(),
            trails: TrailSettings::default(),
            library,
            events_tx,
        }
    }

    /// Receives court events.
    pub fn subscribe(&self) -> broadcast::Receiver<CourtEvent> {
        self.events_tx.subscribe()
    }

    /// Current position history.
    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Current marker appearance.
    pub fn customizations(&self) -> &Customizations {
        &self.customizations
    }

    /// Library this session saves to.
    pub fn library(&self) -> &FormationLibraryHandle {
        &self.library
    }

    /// Whether history differs from the last save or load.
    pub fn has_unsaved_changes(&self) -> bool {
        self.history.has_unsaved_changes()
    }

    /// Marker pressed: begins a drag.
    pub fn on_position_start(&mut self, marker: MarkerId, pos: Position) {
        self.transition(|h| h.begin_drag(marker, pos));
    }

    /// Marker moved: updates the active drag.
    pub fn on_position_change(&mut self, marker: MarkerId, pos: Position) {
        self.transition(|h| h.update_drag(marker, pos));
    }

    /// Marker released: commits the drag.
    pub fn on_position_change_complete(&mut self) {
        self.transition(PositionHistory::end_drag);
    }

    /// Steps back one entry.
    pub fn undo(&mut self) {
        self.transition(PositionHistory::undo);
    }

    /// Steps forward one entry.
    pub fn redo(&mut self) {
        self.transition(PositionHistory::redo);
    }

    /// Back to the default layout of the current mode.
    pub fn reset(&mut self) {
        let mode = self.history.mode();
        self.transition(|h| h.reset(mode));
    }

    /// Switches mode, restarting from the new default layout.
    pub fn toggle_mode(&mut self, is_doubles: bool) {
        self.transition(|h| h.toggle_mode(is_doubles));
    }

    /// Applies `patch` to one marker's appearance.
    pub fn update_marker_customization(&mut self, marker: MarkerId, patch: &CustomizationPatch) {
        if patch.is_empty() {
            return;
        }
        self.customizations.update(marker, patch);
        let _ = self.events_tx.send(CourtEvent::CustomizationChanged { marker });
    }

    /// Which trails are drawn.
    pub fn trail_settings(&self) -> TrailSettings {
        self.trails
    }

    /// Shows or hides player trails.
    pub fn toggle_player_trails(&mut self) {
        self.trails.show_player_trails = !self.trails.show_player_trails;
    }

    /// Shows or hides the shuttle trail.
    pub fn toggle_shuttle_trail(&mut self) {
        self.trails.show_shuttle_trail = !self.trails.show_shuttle_trail;
    }

    /// Trail segments to draw for markers active in the current mode.
    /// Empty while there is no ghost (cursor at the first entry).
    pub fn trails(&self) -> Vec<Trail> {
        let Some(ghost) = self.history.ghost_positions() else {
            return Vec::new();
        };
        let current = self.history.current();
        let mode = self.history.mode();

        MarkerId::ALL
            .into_iter()
            .filter(|m| m.is_active_in(mode))
            .filter(|m| {
                if m.is_player() {
                    self.trails.show_player_trails
                } else {
                    self.trails.show_shuttle_trail
                }
            })
            .map(|marker| Trail {
                marker,
                from: ghost.position(marker),
                to: current.position(marker),
            })
            .collect()
    }

    /// Saves the committed history under `name` and makes it the new
    /// unsaved-changes baseline.
    pub async fn on_save_formation(&mut self, name: &str) -> Result<SavedFormation, SessionError> {
        let name = normalize_name(name).ok_or(SessionError::EmptyName)?;
        let draft = FormationDraft {
            name,
            is_doubles: self.history.mode().is_doubles(),
            position_history: self.history.entries().to_vec(),
            customizations: self.customizations.clone(),
        };

        let saved = self.library.save(draft).await.map_err(|err| {
            log::warn!("save formation failed: {err}");
            SessionError::Save(err)
        })?;

        self.history = std::mem::take(&mut self.history).mark_saved();
        let _ = self.events_tx.send(CourtEvent::FormationSaved {
            id: saved.id.clone(),
        });
        Ok(saved)
    }

    /// Replaces the court with `formation`. Confirming the loss of unsaved
    /// changes is left to the caller.
    pub fn on_load_formation(&mut self, formation: &SavedFormation) {
        let snapshots = formation.position_history.clone();
        let is_doubles = formation.is_doubles;
        self.transition(|h| h.load_formation(snapshots, is_doubles));

        self.customizations = formation.customizations.clone();
        for marker in MarkerId::ALL {
            let _ = self.events_tx.send(CourtEvent::CustomizationChanged { marker });
        }
        let _ = self.events_tx.send(CourtEvent::FormationLoaded {
            id: formation.id.clone(),
        });
    }

    /// Fetches a formation from the library and loads it. Returns `false`
    /// when the id is unknown.
    pub async fn load_formation_by_id(&mut self, id: &FormationId) -> Result<bool, SessionError> {
        let loaded = self.library.load(id.clone()).await.map_err(|err| {
            log::warn!("load formation {id} failed: {err}");
            SessionError::Load(err)
        })?;
        let Some(formation) = loaded else {
            return Ok(false);
        };
        self.on_load_formation(&formation);
        Ok(true)
    }

    fn transition(&mut self, f: impl FnOnce(PositionHistory) -> PositionHistory) {
        let before = Observed::of(&self.history);
        self.history = f(std::mem::take(&mut self.history));
        let after = Observed::of(&self.history);

        if after.mode != before.mode {
            let _ = self.events_tx.send(CourtEvent::ModeChanged { mode: after.mode });
        }
        if after.current != before.current {
            let _ = self.events_tx.send(CourtEvent::PositionsChanged {
                current: after.current,
            });
        }
        if (after.cursor, after.len, after.dragging) != (before.cursor, before.len, before.dragging)
        {
            let _ = self.events_tx.send(CourtEvent::HistoryChanged {
                cursor: after.cursor,
                len: after.len,
                can_undo: self.history.can_undo(),
                can_redo: self.history.can_redo(),
            });
        }
    }
}
