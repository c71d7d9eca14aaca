//! Shared test utilities for git-conductor
//!
//! Real git repositories (with bare remotes) for backend and CLI tests, plus recording
//! fakes of the three capabilities for orchestrator tests.

pub mod assertions;
pub mod fakes;
pub mod fixtures;
pub mod repository;
