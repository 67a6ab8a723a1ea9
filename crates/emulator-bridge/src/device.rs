//! Device Architecture
//!
//! Processor families a split build produces artifacts for, and how they
//! appear in artifact file names.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Processor family of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Arm,
    X86,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Arm => "arm",
            Architecture::X86 => "x86",
        }
    }

    /// Family named by one `-`-separated file-name segment.
    ///
    /// `x86` and `x86_64` are x86; `arm`, `arm64` and any `armv*` or
    /// `armeabi*` segment are arm. Other segments carry no architecture,
    /// so e.g. `armored` does not count.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "x86" | "x86_64" => Some(Architecture::X86),
            "arm" | "arm64" => Some(Architecture::Arm),
            s if s.starts_with("armv") || s.starts_with("armeabi") => Some(Architecture::Arm),
            _ => None,
        }
    }

    /// Classify a device from its `/proc/cpuinfo`
    pub fn from_cpuinfo(cpuinfo: &str) -> Self {
        if cpuinfo.to_ascii_lowercase().contains("intel") {
            Architecture::X86
        } else {
            Architecture::Arm
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arm" => Ok(Architecture::Arm),
            "x86" => Ok(Architecture::X86),
            other => Err(format!("unknown architecture '{}' (expected arm or x86)", other)),
        }
    }
}
