//! Logical names of the visual templates the selector asks for.
//!
//! The selector never inspects pixels. It asks the [`Screen`](crate::device::Screen)
//! for a pattern by key and hands the returned opaque handle back in queries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of per-name support images (friends, servants, craft essences).
pub const SUPPORT_IMAGE_PREFIX: &str = "support/";

/// Key of a visual template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKey {
    /// Marker that is only visible on the support selection screen.
    SupportScreen,
    /// Badge rendered on rows owned by a friend.
    FriendMarker,
    /// Overlay shown on a fully limit-broken craft essence.
    LimitBroken,
    /// Row boundary marker rendered in a fixed column of every row.
    RegionAnchor,
    /// Image of a friend name, servant or craft essence, by configured name.
    SupportImage(String),
}

impl PatternKey {
    pub fn support_image(name: impl Into<String>) -> Self {
        Self::SupportImage(name.into())
    }

    /// Stable name implementations use to locate the template.
    pub fn logical_name(&self) -> String {
        match self {
            PatternKey::SupportScreen => "support-screen".to_string(),
            PatternKey::FriendMarker => "friend-marker".to_string(),
            PatternKey::LimitBroken => "limit-broken-marker".to_string(),
            PatternKey::RegionAnchor => "region-anchor-marker".to_string(),
            PatternKey::SupportImage(name) => format!("{}{}", SUPPORT_IMAGE_PREFIX, name),
        }
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.logical_name())
    }
}
