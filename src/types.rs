//! Shared primitive geometry, mode, and marker identifier types.

use serde::{Deserialize, Serialize};

/// Opaque formation identifier (base-36 time prefix plus random suffix).
pub type FormationId = String;

/// Point in court-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset from the court's left edge.
    pub x: f64,
    /// Vertical offset from the court's top edge.
    pub y: f64,
}

impl Position {
    /// Builds a position from raw coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Logical size of the court surface the markers live on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtSize {
    /// Court width in the same units as [`Position::x`].
    pub width: f64,
    /// Court height in the same units as [`Position::y`].
    pub height: f64,
}

impl CourtSize {
    /// Builds a court size; negative dimensions collapse to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Position at the given fraction of the court's width and height.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Position {
        Position::new(self.width * fx, self.height * fy)
    }
}

impl Default for CourtSize {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

/// Singles or doubles play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// One player per side.
    #[default]
    Singles,
    /// Two players per side.
    Doubles,
}

impl GameMode {
    /// Maps the persisted `isDoubles` flag to a mode.
    pub fn from_is_doubles(is_doubles: bool) -> Self {
        if is_doubles { Self::Doubles } else { Self::Singles }
    }

    /// True for [`GameMode::Doubles`].
    pub fn is_doubles(self) -> bool {
        matches!(self, Self::Doubles)
    }

    /// Number of players per team that are active in this mode.
    pub fn players_per_team(self) -> usize {
        match self {
            Self::Singles => 1,
            Self::Doubles => 2,
        }
    }
}

/// Side of the net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Near side, players P1 and P2.
    Team1,
    /// Far side, players P3 and P4.
    Team2,
}

/// Fixed identifier set for every draggable marker on the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkerId {
    /// Team 1, slot 0.
    P1,
    /// Team 1, slot 1.
    P2,
    /// Team 2, slot 0.
    P3,
    /// Team 2, slot 1.
    P4,
    /// The shuttlecock.
    Shuttle,
}

impl MarkerId {
    /// All markers in display order.
    pub const ALL: [MarkerId; 5] = [Self::P1, Self::P2, Self::P3, Self::P4, Self::Shuttle];

    /// Player marker for a team slot, if the slot exists.
    pub fn player(team: Team, slot: usize) -> Option<Self> {
        match (team, slot) {
            (Team::Team1, 0) => Some(Self::P1),
            (Team::Team1, 1) => Some(Self::P2),
            (Team::Team2, 0) => Some(Self::P3),
            (Team::Team2, 1) => Some(Self::P4),
            _ => None,
        }
    }

    /// Team and slot for player markers; `None` for the shuttle.
    pub fn team_slot(self) -> Option<(Team, usize)> {
        match self {
            Self::P1 => Some((Team::Team1, 0)),
            Self::P2 => Some((Team::Team1, 1)),
            Self::P3 => Some((Team::Team2, 0)),
            Self::P4 => Some((Team::Team2, 1)),
            Self::Shuttle => None,
        }
    }

    /// True for P1..P4.
    pub fn is_player(self) -> bool {
        self.team_slot().is_some()
    }

    /// Whether the marker takes part in play for `mode`.
    pub fn is_active_in(self, mode: GameMode) -> bool {
        match self.team_slot() {
            Some((_, slot)) => slot < mode.players_per_team(),
            None => true,
        }
    }

    /// Key used in persisted customization maps.
    pub fn key(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
            Self::Shuttle => "Shuttle",
        }
    }
}
