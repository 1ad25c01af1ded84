//! Per-marker appearance settings and sparse patches.

use serde::{Deserialize, Serialize};

use crate::types::MarkerId;

/// Appearance of one marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerCustomization {
    /// CSS-style color string.
    pub color: String,
    /// Marker diameter in court units.
    pub size: f64,
    /// Icon name, if one replaces the plain disc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Icon set the icon name belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
    /// Handedness hint for player markers; absent for the shuttle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_left_handed: Option<bool>,
}

impl MarkerCustomization {
    /// Default appearance for `marker`.
    pub fn default_for(marker: MarkerId) -> Self {
        let (color, size) = match marker {
            MarkerId::P1 => ("#2196F3", 40.0),
            MarkerId::P2 => ("#03A9F4", 40.0),
            MarkerId::P3 => ("#F44336", 40.0),
            MarkerId::P4 => ("#FF9800", 40.0),
            MarkerId::Shuttle => ("#FFFFFF", 24.0),
        };
        Self {
            color: color.to_string(),
            size,
            icon: None,
            icon_type: None,
            is_left_handed: marker.is_player().then_some(false),
        }
    }
}

/// Total mapping from every [`MarkerId`] to its appearance.
///
/// Serializes as `{"P1": .., "P2": .., "P3": .., "P4": .., "Shuttle": ..}`;
/// markers missing from stored data fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customizations {
    #[serde(rename = "P1")]
    p1: MarkerCustomization,
    #[serde(rename = "P2")]
    p2: MarkerCustomization,
    #[serde(rename = "P3")]
    p3: MarkerCustomization,
    #[serde(rename = "P4")]
    p4: MarkerCustomization,
    #[serde(rename = "Shuttle")]
    shuttle: MarkerCustomization,
}

impl Default for Customizations {
    fn default() -> Self {
        Self {
            p1: MarkerCustomization::default_for(MarkerId::P1),
            p2: MarkerCustomization::default_for(MarkerId::P2),
            p3: MarkerCustomization::default_for(MarkerId::P3),
            p4: MarkerCustomization::default_for(MarkerId::P4),
            shuttle: MarkerCustomization::default_for(MarkerId::Shuttle),
        }
    }
}

impl Customizations {
    /// Settings for `marker`.
    pub fn get(&self, marker: MarkerId) -> &MarkerCustomization {
        match marker {
            MarkerId::P1 => &self.p1,
            MarkerId::P2 => &self.p2,
            MarkerId::P3 => &self.p3,
            MarkerId::P4 => &self.p4,
            MarkerId::Shuttle => &self.shuttle,
        }
    }

    /// Mutable settings for `marker`.
    pub fn get_mut(&mut self, marker: MarkerId) -> &mut MarkerCustomization {
        match marker {
            MarkerId::P1 => &mut self.p1,
            MarkerId::P2 => &mut self.p2,
            MarkerId::P3 => &mut self.p3,
            MarkerId::P4 => &mut self.p4,
            MarkerId::Shuttle => &mut self.shuttle,
        }
    }

    /// Applies `patch` to one marker's appearance.
    pub fn update(&mut self, marker: MarkerId, patch: &CustomizationPatch) {
        patch.apply_to(self.get_mut(marker));
    }

    /// Iterates markers in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &MarkerCustomization)> {
        MarkerId::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// Sparse patch where each `Some` field overwrites the stored value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomizationPatch {
    /// Optional replacement color.
    pub color: Option<String>,
    /// Optional replacement size.
    pub size: Option<f64>,
    /// Optional replacement icon; `Some(None)` clears it.
    pub icon: Option<Option<String>>,
    /// Optional replacement icon set; `Some(None)` clears it.
    pub icon_type: Option<Option<String>>,
    /// Optional replacement handedness.
    pub is_left_handed: Option<bool>,
}

impl CustomizationPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `target`.
    pub fn apply_to(&self, target: &mut MarkerCustomization) {
        if let Some(v) = &self.color {
            target.color = v.clone();
        }
        if let Some(v) = self.size {
            target.size = v;
        }
        if let Some(v) = &self.icon {
            target.icon = v.clone();
        }
        if let Some(v) = &self.icon_type {
            target.icon_type = v.clone();
        }
        if let Some(v) = self.is_left_handed {
            target.is_left_handed = Some(v);
        }
    }
}
