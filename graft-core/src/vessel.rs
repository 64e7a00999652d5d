use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GraftError;

/// Target vessels that may carry at most one fenestration each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NamedVessel {
    Celiac,
    Sma,
    LeftRenal,
    RightRenal,
}

impl NamedVessel {
    pub const ALL: [NamedVessel; 4] = [
        NamedVessel::Celiac,
        NamedVessel::Sma,
        NamedVessel::LeftRenal,
        NamedVessel::RightRenal,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            NamedVessel::Celiac => "Celiac",
            NamedVessel::Sma => "SMA",
            NamedVessel::LeftRenal => "LRA",
            NamedVessel::RightRenal => "RRA",
        }
    }
}

/// Label of a fenestration: a named target vessel or a generic `F<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VesselTag {
    Named(NamedVessel),
    Numbered(u32),
}

impl VesselTag {
    pub fn is_named(&self) -> bool {
        matches!(self, VesselTag::Named(_))
    }
}

impl From<NamedVessel> for VesselTag {
    fn from(v: NamedVessel) -> Self {
        VesselTag::Named(v)
    }
}

impl fmt::Display for VesselTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VesselTag::Named(v) => f.write_str(v.abbreviation()),
            VesselTag::Numbered(n) => write!(f, "F{n}"),
        }
    }
}

impl FromStr for VesselTag {
    type Err = GraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let named = match t.to_ascii_lowercase().as_str() {
            "celiac" | "ca" => Some(NamedVessel::Celiac),
            "sma" => Some(NamedVessel::Sma),
            "lra" | "left renal" => Some(NamedVessel::LeftRenal),
            "rra" | "right renal" => Some(NamedVessel::RightRenal),
            _ => None,
        };
        if let Some(v) = named {
            return Ok(VesselTag::Named(v));
        }
        t.strip_prefix(['F', 'f'])
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .map(VesselTag::Numbered)
            .ok_or_else(|| GraftError::UnknownVessel { tag: s.to_string() })
    }
}

impl TryFrom<String> for VesselTag {
    type Error = GraftError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VesselTag> for String {
    fn from(v: VesselTag) -> String {
        v.to_string()
    }
}
