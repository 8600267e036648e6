//! Supported Degreed resources

use serde::{Deserialize, Serialize};

use super::window::WindowPolicy;
use crate::impl_wire_name_conversions;

/// A Degreed v2 resource that can be extracted.
///
/// Each variant maps to exactly one collection URL under the API base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    Users,
    Logins,
    Completions,
    Views,
    RequiredLearning,
    Pathways,
}

impl_wire_name_conversions!(Endpoint {
    Users => "users",
    Logins => "logins",
    Completions => "completions",
    Views => "views",
    RequiredLearning => "required-learning",
    Pathways => "pathways",
});

impl Endpoint {
    /// Every supported endpoint.
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::Logins,
        Self::Completions,
        Self::Views,
        Self::RequiredLearning,
        Self::Pathways,
    ];

    /// Collection URL for this endpoint under `api_base`.
    pub fn resource_url(&self, api_base: &str) -> String {
        format!("{}/{}", api_base.trim_end_matches('/'), self.as_str())
    }

    /// How the caller's query window is applied to the first request.
    pub const fn window_policy(&self) -> WindowPolicy {
        match self {
            Self::Users => WindowPolicy::ExplicitNull,
            Self::Logins => WindowPolicy::Required,
            Self::Completions | Self::Views | Self::RequiredLearning | Self::Pathways => {
                WindowPolicy::Ignored
            }
        }
    }
}
