//! ADB (Android Debug Bridge) Client
//!
//! Communicates with devices via ADB.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use droid_build_core::process::{ProcessError, ProcessExecutor};

use crate::device::Architecture;

/// ADB errors
#[derive(Debug, thiserror::Error)]
pub enum AdbError {
    #[error("Could not query device {serial}: {source}")]
    CommandFailed {
        serial: String,
        #[source]
        source: ProcessError,
    },
}

/// ADB Client
pub struct AdbClient {
    adb: PathBuf,
    executor: Arc<dyn ProcessExecutor>,
}

impl AdbClient {
    /// Create a client running the adb at `adb`
    pub fn new(adb: impl Into<PathBuf>, executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            adb: adb.into(),
            executor,
        }
    }

    /// Prefer the SDK's `platform-tools/adb`, falling back to `adb` on PATH
    pub fn with_sdk_adb(sdk_adb: Option<PathBuf>, executor: Arc<dyn ProcessExecutor>) -> Self {
        let adb = sdk_adb
            .filter(|p| p.exists())
            .unwrap_or_else(|| PathBuf::from("adb"));
        Self::new(adb, executor)
    }

    /// The adb executable in use
    pub fn adb_path(&self) -> &Path {
        &self.adb
    }

    /// Run a shell command on device
    pub async fn shell(&self, serial: &str, command: &[&str]) -> Result<String, AdbError> {
        let mut args = vec!["-s".to_string(), serial.to_string(), "shell".to_string()];
        args.extend(command.iter().map(|s| s.to_string()));

        debug!("adb {:?}", args);
        self.executor
            .exec(&self.adb, &args)
            .await
            .map_err(|source| AdbError::CommandFailed {
                serial: serial.to_string(),
                source,
            })
    }

    /// Detect the processor family of a device or emulator
    pub async fn detect_architecture(&self, serial: &str) -> Result<Architecture, AdbError> {
        let cpuinfo = self.shell(serial, &["cat", "/proc/cpuinfo"]).await?;
        let arch = Architecture::from_cpuinfo(&cpuinfo);
        info!("Device {} architecture: {}", serial, arch);
        Ok(arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct CannedExecutor {
        stdout: String,
        calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
    }

    #[async_trait]
    impl ProcessExecutor for CannedExecutor {
        async fn spawn(&self, _: &Path, _: &[String], _: &Path) -> Result<String, ProcessError> {
            unreachable!("adb only captures output")
        }

        async fn exec(&self, program: &Path, args: &[String]) -> Result<String, ProcessError> {
            self.calls.lock().push((program.to_path_buf(), args.to_vec()));
            Ok(self.stdout.clone())
        }
    }

    #[tokio::test]
    async fn test_detect_architecture() {
        let executor = Arc::new(CannedExecutor {
            stdout: "vendor_id : GenuineIntel\n".into(),
            calls: Mutex::new(Vec::new()),
        });
        let client = AdbClient::new("adb", executor.clone());

        let arch = client.detect_architecture("emulator-5554").await.unwrap();
        assert_eq!(arch, Architecture::X86);

        let calls = executor.calls.lock();
        assert_eq!(calls[0].0, PathBuf::from("adb"));
        assert_eq!(
            calls[0].1,
            vec!["-s", "emulator-5554", "shell", "cat", "/proc/cpuinfo"]
        );
    }

    #[test]
    fn test_falls_back_to_path_adb() {
        let executor = Arc::new(CannedExecutor {
            stdout: String::new(),
            calls: Mutex::new(Vec::new()),
        });
        let client = AdbClient::with_sdk_adb(Some(PathBuf::from("/nonexistent/adb")), executor);
        assert_eq!(client.adb_path(), Path::new("adb"));
    }
}
