use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of behavior definitions an art provider registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtKind {
    Action,
    Requirement,
    Trigger,
}

impl ArtKind {
    pub const ALL: [Self; 3] = [Self::Action, Self::Requirement, Self::Trigger];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Requirement => "requirement",
            Self::Trigger => "trigger",
        }
    }
}

impl fmt::Display for ArtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external list of art identifiers to register in bulk.
///
/// ```toml
/// actions = ["message", "heal"]
/// requirements = ["has-permission"]
/// triggers = []
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtManifest {
    pub actions: Vec<String>,
    pub requirements: Vec<String>,
    pub triggers: Vec<String>,
}

impl ArtManifest {
    /// Iterates every `(kind, identifier)` pair in declaration order, actions first.
    pub fn entries(&self) -> impl Iterator<Item = (ArtKind, &str)> {
        let actions = self.actions.iter().map(|id| (ArtKind::Action, id.as_str()));
        let requirements = self.requirements.iter().map(|id| (ArtKind::Requirement, id.as_str()));
        let triggers = self.triggers.iter().map(|id| (ArtKind::Trigger, id.as_str()));
        actions.chain(requirements).chain(triggers)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.requirements.is_empty() && self.triggers.is_empty()
    }
}
