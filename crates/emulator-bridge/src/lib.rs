//! Android Device Bridge
//!
//! Talks to connected devices and emulators through adb.

pub mod adb;
pub mod device;

pub use adb::{AdbClient, AdbError};
pub use device::Architecture;
