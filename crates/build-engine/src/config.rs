//! Build Configuration
//!
//! Build types, build methods and the resolved request.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Build type (debug/release)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    #[default]
    Debug,
    Release,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "debug",
            BuildType::Release => "release",
        }
    }

    pub fn gradle_task_suffix(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which external tool builds the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildMethod {
    #[default]
    #[serde(rename = "ant")]
    Ant,
    #[serde(rename = "gradle")]
    Gradle,
    /// Skip the build and only look for existing APKs
    #[serde(rename = "none")]
    NoBuild,
}

impl BuildMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMethod::Ant => "ant",
            BuildMethod::Gradle => "gradle",
            BuildMethod::NoBuild => "none",
        }
    }
}

impl fmt::Display for BuildMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ant" => Ok(BuildMethod::Ant),
            "gradle" => Ok(BuildMethod::Gradle),
            "none" => Ok(BuildMethod::NoBuild),
            other => Err(other.to_string()),
        }
    }
}

/// A resolved build request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildRequest {
    pub build_type: BuildType,
    pub build_method: BuildMethod,
}

/// Logical command a backend turns into tool arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCommand {
    Build(BuildType),
    Clean,
}

impl ToolCommand {
    /// Ant target name
    pub fn ant_target(&self) -> &'static str {
        match self {
            ToolCommand::Build(build_type) => build_type.as_str(),
            ToolCommand::Clean => "clean",
        }
    }

    /// Gradle task name
    pub fn gradle_task(&self) -> String {
        match self {
            ToolCommand::Build(build_type) => format!("assemble{}", build_type.gradle_task_suffix()),
            ToolCommand::Clean => "clean".to_string(),
        }
    }
}
