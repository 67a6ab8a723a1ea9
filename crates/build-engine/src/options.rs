//! Build Option Resolution
//!
//! Turns command-line flags into a [`BuildRequest`].

use tracing::debug;

use crate::config::{BuildMethod, BuildRequest, BuildType};
use crate::BuildError;

/// Every recognized option starts with this prefix
pub const OPTION_PREFIX: &str = "--";

/// Raw build options, in order.
///
/// Accepts a single flag as well as a sequence of flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions(Vec<String>);

impl BuildOptions {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for BuildOptions {
    fn from(option: &str) -> Self {
        Self(vec![option.to_string()])
    }
}

impl From<String> for BuildOptions {
    fn from(option: String) -> Self {
        Self(vec![option])
    }
}

impl From<Vec<String>> for BuildOptions {
    fn from(options: Vec<String>) -> Self {
        Self(options)
    }
}

impl From<&[String]> for BuildOptions {
    fn from(options: &[String]) -> Self {
        Self(options.to_vec())
    }
}

impl From<Vec<&str>> for BuildOptions {
    fn from(options: Vec<&str>) -> Self {
        options.as_slice().into()
    }
}

impl From<&[&str]> for BuildOptions {
    fn from(options: &[&str]) -> Self {
        Self(options.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for BuildOptions {
    fn from(options: [&str; N]) -> Self {
        options.as_slice().into()
    }
}

/// Resolve `options` into a build request.
///
/// `default_method` is the configured backend (`ANDROID_BUILD`), used when
/// no method flag is given; without one the default is Ant. The first
/// unrecognized token fails the whole resolution.
pub fn resolve(
    options: impl Into<BuildOptions>,
    default_method: Option<&str>,
) -> Result<BuildRequest, BuildError> {
    let options = options.into();
    let mut build_type = BuildType::Debug;
    let mut build_method = None;

    for token in options.iter() {
        let flag = token
            .strip_prefix(OPTION_PREFIX)
            .ok_or_else(|| BuildError::UnrecognizedOption(token.to_string()))?;

        match flag {
            "debug" => build_type = BuildType::Debug,
            "release" => build_type = BuildType::Release,
            "ant" => build_method = Some(BuildMethod::Ant),
            "gradle" => build_method = Some(BuildMethod::Gradle),
            "nobuild" => build_method = Some(BuildMethod::NoBuild),
            _ => return Err(BuildError::UnrecognizedOption(token.to_string())),
        }
    }

    let build_method = match build_method {
        Some(method) => method,
        None => default_build_method(default_method)?,
    };

    let request = BuildRequest {
        build_type,
        build_method,
    };
    debug!("Resolved {:?} to {:?}", options, request);
    Ok(request)
}

fn default_build_method(configured: Option<&str>) -> Result<BuildMethod, BuildError> {
    match configured.map(str::trim).filter(|m| !m.is_empty()) {
        None => Ok(BuildMethod::Ant),
        Some(method) => method.parse().map_err(|_| {
            BuildError::UnrecognizedOption(format!(
                "{}={}",
                droid_build_core::config::ENV_BUILD_METHOD,
                method
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = resolve(BuildOptions::default(), None).unwrap();
        assert_eq!(request.build_type, BuildType::Debug);
        assert_eq!(request.build_method, BuildMethod::Ant);
    }

    #[test]
    fn test_single_string_matches_sequence() {
        let single = resolve("--release", None).unwrap();
        let sequence = resolve(["--release"], None).unwrap();
        assert_eq!(single, sequence);
        assert_eq!(single.build_type, BuildType::Release);
    }

    #[test]
    fn test_flags() {
        let request = resolve(["--release", "--gradle"], None).unwrap();
        assert_eq!(request.build_type, BuildType::Release);
        assert_eq!(request.build_method, BuildMethod::Gradle);

        let request = resolve(["--nobuild"], None).unwrap();
        assert_eq!(request.build_method, BuildMethod::NoBuild);
    }

    #[test]
    fn test_later_flags_win() {
        let request = resolve(["--release", "--debug", "--gradle", "--ant"], None).unwrap();
        assert_eq!(request.build_type, BuildType::Debug);
        assert_eq!(request.build_method, BuildMethod::Ant);
    }

    #[test]
    fn test_default_method_from_environment() {
        let request = resolve(BuildOptions::default(), Some("gradle")).unwrap();
        assert_eq!(request.build_method, BuildMethod::Gradle);

        let request = resolve(["--ant"], Some("gradle")).unwrap();
        assert_eq!(request.build_method, BuildMethod::Ant);
    }

    #[test]
    fn test_unknown_flag() {
        let err = resolve(["--foo"], None).unwrap_err();
        assert!(matches!(err, BuildError::UnrecognizedOption(ref t) if t == "--foo"));
        assert!(err.to_string().contains("--foo"));
    }

    #[test]
    fn test_missing_prefix() {
        let err = resolve(["release"], None).unwrap_err();
        assert!(matches!(err, BuildError::UnrecognizedOption(ref t) if t == "release"));

        let err = resolve(["-release"], None).unwrap_err();
        assert!(matches!(err, BuildError::UnrecognizedOption(ref t) if t == "-release"));
    }

    #[test]
    fn test_first_invalid_token_is_reported() {
        let err = resolve(["--release", "--bogus", "junk"], None).unwrap_err();
        assert!(matches!(err, BuildError::UnrecognizedOption(ref t) if t == "--bogus"));
    }

    #[test]
    fn test_invalid_default_method() {
        let err = resolve(BuildOptions::default(), Some("maven")).unwrap_err();
        assert!(err.to_string().contains("ANDROID_BUILD=maven"));

        // An explicit flag makes the configured default irrelevant.
        assert!(resolve(["--gradle"], Some("maven")).is_ok());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let options = ["--release", "--nobuild"];
        assert_eq!(resolve(options, None).unwrap(), resolve(options, None).unwrap());
    }
}
