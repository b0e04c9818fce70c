//! Core language vocabulary shared across pipeline stages: the effect
//! lattice, capability names, and PII sensitivity levels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point on the effect lattice `PURE < CPU < IO < WORKFLOW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Pure,
    Cpu,
    Io,
    Workflow,
}

impl Effect {
    /// Lattice rank; higher dominates.
    pub fn rank(&self) -> u8 {
        match self {
            Effect::Pure => 0,
            Effect::Cpu => 1,
            Effect::Io => 2,
            Effect::Workflow => 3,
        }
    }

    /// Parse a surface effect word. The recognized set is `io`, `cpu`,
    /// `pure`; `workflow` is produced by the checker, not written by users.
    pub fn parse(word: &str) -> Option<Effect> {
        match word {
            "pure" => Some(Effect::Pure),
            "cpu" => Some(Effect::Cpu),
            "io" => Some(Effect::Io),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Pure => "pure",
            Effect::Cpu => "cpu",
            Effect::Io => "io",
            Effect::Workflow => "workflow",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named class of observable effects a function may be authorized to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Http,
    Sql,
    Files,
    Secrets,
    Time,
    AiModel,
    Payment,
    Inventory,
    Cpu,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::Http,
        Capability::Sql,
        Capability::Files,
        Capability::Secrets,
        Capability::Time,
        Capability::AiModel,
        Capability::Payment,
        Capability::Inventory,
        Capability::Cpu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Http => "Http",
            Capability::Sql => "Sql",
            Capability::Files => "Files",
            Capability::Secrets => "Secrets",
            Capability::Time => "Time",
            Capability::AiModel => "AiModel",
            Capability::Payment => "Payment",
            Capability::Inventory => "Inventory",
            Capability::Cpu => "Cpu",
        }
    }

    pub fn parse(name: &str) -> Option<Capability> {
        Capability::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PII sensitivity level; L3 is the most sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PiiSensitivity {
    L1,
    L2,
    L3,
}

impl PiiSensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiSensitivity::L1 => "L1",
            PiiSensitivity::L2 => "L2",
            PiiSensitivity::L3 => "L3",
        }
    }

    pub fn parse(name: &str) -> Option<PiiSensitivity> {
        match name {
            "L1" => Some(PiiSensitivity::L1),
            "L2" => Some(PiiSensitivity::L2),
            "L3" => Some(PiiSensitivity::L3),
            _ => None,
        }
    }
}

impl fmt::Display for PiiSensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
