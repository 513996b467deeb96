//! Configuration management for wawidget.
//!
//! This crate handles loading, validating, and persisting configuration
//! from files, environment variables and defaults.
//!
//! # Overview
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`session`]: Session token lookup and caching settings
//! - [`persistence`]: Config file discovery, reading and writing
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! 1. Environment variables (`WAWIDGET_*`)
//! 2. Local config (`./wawidget.json5` or `./wawidget.json`)
//! 3. User config (`~/.config/wawidget/config.json5` or `~/.config/wawidget/config.json`)
//! 4. Built-in defaults
//!
//! # Example File
//!
//! ```json5
//! {
//!   account: "mitienda",
//!   storefront_url: "https://mitienda.example.com",
//!   // Local backend during development
//!   api_base_url: "http://localhost:8080/api/",
//!   request_timeout_secs: 60,
//!   session: { ttl_secs: 3600 },
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use wawidget_config::Config;
//!
//! # fn example() -> wawidget_config::Result<()> {
//! let config = Config::load()?;
//! println!("backend: {}", config.api_base_url);
//! println!("timeout: {:?}", config.request_timeout());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod session;

pub use config::Config;
pub use error::{ConfigError, Result};
pub use session::SessionConfig;
