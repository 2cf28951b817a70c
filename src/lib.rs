#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! Client for the Mandrill transactional email API's users endpoints:
//! account info, ping, and sender listing.
//!
//! ## Runtime requirements
//! Every operation is an `async fn` that performs exactly one HTTP exchange
//! through `reqwest`; run it inside a Tokio (v1) runtime. Synchronous code
//! can block on a single call with a runtime of its own:
//!
//! ```no_run
//! use mandrill_client::MandrillClient;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = tokio::runtime::Runtime::new()?;
//!     let pong = runtime.block_on(MandrillClient::new().ping("your-api-key"))?;
//!     println!("{pong}");
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//! Failures are returned as [`MandrillError`] and never logged above
//! `debug` level by the library.

pub mod client;
pub mod message;
pub mod models;

// Re-export the main types for convenience
pub use client::{ClientBuilder, Endpoint, MandrillClient, MandrillError, RequestEnvelope};
pub use models::{ApiError, MandrillTime, Sender, Stat, StatInfo, User};

/// Result type alias for Mandrill operations.
pub type Result<T> = std::result::Result<T, MandrillError>;
