use crate::foundation::error::{SceneError, SceneResult};
use std::fmt;
use std::str::FromStr;

/// Discrete phase of the illustrative scene, selected by the host.
///
/// Stages follow the order in which the definition cards are unlocked: each unlocked card adds one
/// concept to the picture, starting from an empty scene.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Empty,
    #[serde(alias = "entitas")]
    Entity,
    #[serde(alias = "attributum")]
    Attribute,
    #[serde(alias = "aktivitas")]
    Activity,
    #[serde(alias = "relevancia")]
    Relevance,
    #[serde(alias = "cel")]
    Goal,
    #[serde(alias = "feladat")]
    Task,
}

impl Stage {
    /// Every stage, in unlock order.
    pub const ALL: [Stage; 7] = [
        Stage::Empty,
        Stage::Entity,
        Stage::Attribute,
        Stage::Activity,
        Stage::Relevance,
        Stage::Goal,
        Stage::Task,
    ];

    /// Canonical machine id.
    pub fn id(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Entity => "entity",
            Self::Attribute => "attribute",
            Self::Activity => "activity",
            Self::Relevance => "relevance",
            Self::Goal => "goal",
            Self::Task => "task",
        }
    }

    /// Id used by the original page content.
    pub fn legacy_id(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Entity => "entitas",
            Self::Attribute => "attributum",
            Self::Activity => "aktivitas",
            Self::Relevance => "relevancia",
            Self::Goal => "cel",
            Self::Task => "feladat",
        }
    }

    /// Term of the definition card that unlocks this stage.
    pub fn term(self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Entity => Some("Entitás"),
            Self::Attribute => Some("Attribútum"),
            Self::Activity => Some("Aktivitás"),
            Self::Relevance => Some("Relevancia"),
            Self::Goal => Some("Cél"),
            Self::Task => Some("Feladat"),
        }
    }

    /// Stage shown once `unlocked` definition cards are open. Saturates at [`Stage::Task`].
    pub fn for_unlocked_cards(unlocked: usize) -> Self {
        Self::ALL[unlocked.min(Self::ALL.len() - 1)]
    }

    /// Next stage in unlock order, or `None` at the end.
    pub fn next(self) -> Option<Self> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    /// Look up a stage by canonical or legacy id.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.id().eq_ignore_ascii_case(name) || s.legacy_id().eq_ignore_ascii_case(name))
    }

    /// Like [`Stage::from_name`], but unknown names degrade to [`Stage::Empty`].
    pub fn from_name_lossy(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(name, "unknown stage name; falling back to empty");
            Self::Empty
        })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Stage {
    type Err = SceneError;

    fn from_str(s: &str) -> SceneResult<Self> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|s| s.id()).collect();
            SceneError::validation(format!(
                "unknown stage \"{s}\" (expected one of: {})",
                known.join(", ")
            ))
        })
    }
}
