//! Shared test utilities for nftabler integration tests.
//!
//! This module provides:
//! - `TestHarness` for an isolated rules directory
//! - `RecordingEngine`, a `RuleEngine` that remembers every payload it loads

pub mod harness;

pub use harness::{RecordingEngine, TestHarness};
