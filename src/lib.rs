//! enelogic-cli library
//!
//! This crate provides the core functionality for the `enelogic-cli` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The library downloads energy-usage datapoints from the Enelogic API and keeps
//! them as CSV files:
//!
//! - [`auth`] - Builds the per-request WSSE authentication header
//! - [`fetcher`] - Lists measuring points and downloads missing days into daily files
//! - [`bundler`] - Rebuilds yearly files from the daily files
//! - [`storage`] - Where daily and yearly files live (directory or memory)
//! - [`codec`] - CSV encoding of API records
//! - [`cli`] - Command-line interface orchestrating fetch and bundle
//! - [`models`] - Credentials, measuring points and file keys
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use enelogic_cli::{bundler, config::ResolvedConfig, errors::AppResult, fetcher};
//! use enelogic_cli::models::Credentials;
//!
//! # async fn example() -> AppResult<()> {
//! let credentials = Credentials::new("me@example.com", "appid", "appsecret", "apikey");
//! let config = ResolvedConfig::default();
//!
//! // Download every day that has no file yet
//! fetcher::fetch(credentials, &config, &fetcher::DayWindow::default()).await?;
//!
//! // Merge the daily files into one file per measuring point and year
//! bundler::bundle_dir(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod bundler;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod storage;
pub mod ui;
pub mod utils;
