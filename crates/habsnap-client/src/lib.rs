//! openHAB REST client for habsnap.
//!
//! ## Example
//!
//! ```rust,no_run
//! use habsnap_client::{OpenHabClient, OpenHabConnectionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenHabConnectionConfig::with_bearer_token(
//!         "http://openhab:8080",
//!         "oh.token".to_string(),
//!     );
//!     let client = OpenHabClient::new(config)?;
//!
//!     let root = client.fetch_rest_root().await?;
//!     let items = client.fetch_items(&root).await?;
//!     println!("Found {} items", items.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod source;

pub use client::{FetchedBody, OpenHabClient, OpenHabClientError, OpenHabResult};
pub use config::{OpenHabAuth, OpenHabConnectionConfig};
pub use source::OpenHabSource;
