//! Court snapshot records and default starting layouts.

use serde::{Deserialize, Serialize};

use crate::types::{CourtSize, GameMode, MarkerId, Position, Team};

/// Player positions for both teams.
///
/// Team arrays always hold two entries; singles play only uses slot 0 but
/// slot 1 is still carried so a mode switch never reallocates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerSet {
    /// Near-side players (P1, P2).
    pub team1: [Position; 2],
    /// Far-side players (P3, P4).
    pub team2: [Position; 2],
}

impl PlayerSet {
    /// Positions for one team.
    pub fn team(&self, team: Team) -> &[Position; 2] {
        match team {
            Team::Team1 => &self.team1,
            Team::Team2 => &self.team2,
        }
    }

    fn team_mut(&mut self, team: Team) -> &mut [Position; 2] {
        match team {
            Team::Team1 => &mut self.team1,
            Team::Team2 => &mut self.team2,
        }
    }
}

/// One immutable recorded court state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All player positions.
    pub players: PlayerSet,
    /// Shuttle position.
    pub shuttle: Position,
}

impl Snapshot {
    /// Standard starting formation for `mode` on a court of `size`.
    pub fn default_layout(mode: GameMode, size: CourtSize) -> Self {
        let (near_y, far_y) = (0.75, 0.25);
        let players = match mode {
            GameMode::Singles => PlayerSet {
                team1: [size.at_fraction(0.5, near_y), size.at_fraction(0.7, near_y)],
                team2: [size.at_fraction(0.5, far_y), size.at_fraction(0.3, far_y)],
            },
            GameMode::Doubles => PlayerSet {
                team1: [size.at_fraction(0.3, near_y), size.at_fraction(0.7, near_y)],
                team2: [size.at_fraction(0.7, far_y), size.at_fraction(0.3, far_y)],
            },
        };

        Self {
            players,
            shuttle: size.at_fraction(0.5, 0.5),
        }
    }

    /// Position of a single marker.
    pub fn position(&self, marker: MarkerId) -> Position {
        match marker.team_slot() {
            Some((team, slot)) => self.players.team(team)[slot],
            None => self.shuttle,
        }
    }

    /// Overwrites a single marker's position in place.
    pub fn set_position(&mut self, marker: MarkerId, pos: Position) {
        match marker.team_slot() {
            Some((team, slot)) => self.players.team_mut(team)[slot] = pos,
            None => self.shuttle = pos,
        }
    }

    /// Copy of `self` with one marker moved.
    pub fn with_position(mut self, marker: MarkerId, pos: Position) -> Self {
        self.set_position(marker, pos);
        self
    }
}

/// Trail anchors for the renderer, in the persisted `ghostPositions` shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GhostPositions {
    /// Previous near-side player positions.
    pub team1: [Position; 2],
    /// Previous far-side player positions.
    pub team2: [Position; 2],
    /// Previous shuttle position.
    pub shuttle: Position,
}

impl From<&Snapshot> for GhostPositions {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            team1: snapshot.players.team1,
            team2: snapshot.players.team2,
            shuttle: snapshot.shuttle,
        }
    }
}

impl GhostPositions {
    /// Ghost position of a single marker.
    pub fn position(&self, marker: MarkerId) -> Position {
        match marker.team_slot() {
            Some((Team::Team1, slot)) => self.team1[slot],
            Some((Team::Team2, slot)) => self.team2[slot],
            None => self.shuttle,
        }
    }
}
