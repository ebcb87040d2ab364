//! Phase identities, semantic roles, and ordered phase sets.

use std::fmt;

/// Semantic role of a provider phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseRole {
    Vapor,
    Liquid,
    Solid,
    #[default]
    Unassigned,
}

/// A provider phase: native label plus semantic role.
///
/// Equality and hashing consider the label only.
#[derive(Debug, Clone, Eq)]
pub struct Phase {
    label: String,
    role: PhaseRole,
}

impl Phase {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_role(label, PhaseRole::Unassigned)
    }

    pub fn with_role(label: impl Into<String>, role: PhaseRole) -> Self {
        Self {
            label: label.into(),
            role,
        }
    }

    pub fn vapor() -> Self {
        Self::with_role("Vapor", PhaseRole::Vapor)
    }

    pub fn liquid() -> Self {
        Self::with_role("Liquid", PhaseRole::Liquid)
    }

    pub fn solid() -> Self {
        Self::with_role("Solid", PhaseRole::Solid)
    }

    /// Provider-native label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn role(&self) -> PhaseRole {
        self.role
    }
}

impl PartialEq for Phase {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl std::hash::Hash for Phase {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Provider status code attached to a present phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseStatus {
    #[default]
    Unknown,
    AtEquilibrium,
    Estimates,
}

impl PhaseStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::AtEquilibrium => 1,
            Self::Estimates => 2,
        }
    }

    /// Unrecognised codes map to `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::AtEquilibrium,
            2 => Self::Estimates,
            _ => Self::Unknown,
        }
    }
}

/// Ordered phases without duplicate labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseSet {
    phases: Vec<Phase>,
}

impl PhaseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from labels; later duplicates are dropped.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels.into_iter().map(Phase::new).collect()
    }

    /// Append a phase; returns `false` if its label is already present.
    pub fn push(&mut self, phase: Phase) -> bool {
        if self.contains(&phase) {
            return false;
        }
        self.phases.push(phase);
        true
    }

    pub fn contains(&self, phase: &Phase) -> bool {
        self.contains_label(phase.label())
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.phases.iter().any(|p| p.label() == label)
    }

    pub fn get(&self, label: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.label() == label)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phase> + '_ {
        self.phases.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.phases.iter().map(|p| p.label().to_string()).collect()
    }
}

impl FromIterator<Phase> for PhaseSet {
    fn from_iter<T: IntoIterator<Item = Phase>>(iter: T) -> Self {
        let mut set = PhaseSet::new();
        for phase in iter {
            set.push(phase);
        }
        set
    }
}

impl<'a> IntoIterator for &'a PhaseSet {
    type Item = &'a Phase;
    type IntoIter = std::slice::Iter<'a, Phase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}
