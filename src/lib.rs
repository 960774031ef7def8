//! TickTrack - weekly timesheets with a session gate.
//!
//! This crate provides the core functionality for the `tt` CLI tool.
//!
//! # Architecture
//!
//! - [`aggregate`] - Hours, status and date-range derivation
//! - [`directory`] - Weekly summaries kept consistent with their tasks
//! - [`session`] - Sign-in state, token persistence and route guarding
//! - [`api`] - Asynchronous backend interface and its in-memory mock
//! - [`editor`] - Working copy of one week while it is being edited
//! - [`storage`] - In-memory task store and demo data
//! - [`model`] - Data types (Task, `TimesheetSummary`, Week, `UserProfile`)
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod config;
pub mod directory;
pub mod editor;
pub mod error;
pub mod model;
pub mod session;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};
