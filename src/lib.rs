//! wsguard - workflow guards for pnpm monorepos
//!
//! This library provides:
//! - Synchronization of every manifest with the root pnpm.overrides lock table
//! - Changed-file linting, lint auto-fixing and file-name linting
//! - Git hook helpers (branch names, install-time setup) and toolchain checks

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod env;
pub mod error;
pub mod git;
pub mod manifest;
pub mod output;
pub mod process;
pub mod progress;
pub mod sync;
