//! Durable formation records and their persisted JSON shape.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    customization::Customizations,
    snapshot::Snapshot,
    types::{FormationId, GameMode},
};

/// Longest formation name accepted, in characters.
pub const MAX_NAME_LEN: usize = 50;

const ID_SUFFIX_LEN: usize = 6;

/// Input for a new [`SavedFormation`]; identity and timestamps are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct FormationDraft {
    /// Display name.
    pub name: String,
    /// Mode the history was recorded in.
    pub is_doubles: bool,
    /// Full recorded history, oldest first.
    pub position_history: Vec<Snapshot>,
    /// Marker appearance at save time.
    pub customizations: Customizations,
}

/// Named, durably saved court history.
///
/// Field names and nesting match records written by earlier releases, so
/// existing files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFormation {
    /// Assigned once at creation.
    pub id: FormationId,
    /// Display name.
    pub name: String,
    /// Creation time, fixed forever.
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every save or rename.
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
    /// Mode the history was recorded in.
    pub is_doubles: bool,
    /// Full recorded history, oldest first.
    #[serde(with = "history_wire")]
    pub position_history: Vec<Snapshot>,
    /// Marker appearance at save time.
    pub customizations: Customizations,
}

impl SavedFormation {
    /// Stamps a draft with a fresh id and `now` as both timestamps.
    pub fn create(draft: FormationDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(now),
            name: draft.name,
            created_at: now,
            updated_at: now,
            is_doubles: draft.is_doubles,
            position_history: draft.position_history,
            customizations: draft.customizations,
        }
    }

    /// Changes the display name and refreshes `updated_at`.
    pub fn rename(&mut self, name: impl Into<String>, now: DateTime<Utc>) {
        self.name = name.into();
        self.updated_at = now;
    }

    /// Mode implied by the `isDoubles` flag.
    pub fn mode(&self) -> GameMode {
        GameMode::from_is_doubles(self.is_doubles)
    }

    /// Number of recorded history entries.
    pub fn step_count(&self) -> usize {
        self.position_history.len()
    }
}

/// Trims a user-entered name and caps it at [`MAX_NAME_LEN`] characters.
/// Returns `None` for blank input.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_NAME_LEN).collect::<String>().trim_end().to_string())
}

/// Current time truncated to the millisecond precision that survives a
/// JSON round trip.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Base-36 millisecond timestamp followed by six random base-36 digits.
///
/// Collisions are not prevented, only made unlikely.
pub fn generate_id(now: DateTime<Utc>) -> FormationId {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let mut id = to_base36(millis);
    let mut rng = rand::thread_rng();
    for _ in 0..ID_SUFFIX_LEN {
        id.push(char::from_digit(rng.gen_range(0..36), 36).unwrap_or('0'));
    }
    id
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// Entries are written with a `ghostPositions` field derived from the entry
// before them (the first entry points at itself). Readers ignore it.
mod history_wire {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::{
        snapshot::{GhostPositions, PlayerSet, Snapshot},
        types::Position,
    };

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct WireEntry<'a> {
        players: &'a PlayerSet,
        shuttle: &'a Position,
        ghost_positions: GhostPositions,
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(entries: &Vec<Snapshot>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(entries.iter().enumerate().map(|(idx, snap)| {
            let prev = idx.checked_sub(1).map_or(snap, |p| &entries[p]);
            WireEntry {
                players: &snap.players,
                shuttle: &snap.shuttle,
                ghost_positions: GhostPositions::from(prev),
            }
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Snapshot>, D::Error> {
        Vec::<Snapshot>::deserialize(d)
    }
}
