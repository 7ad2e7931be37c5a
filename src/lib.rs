//! Brreg - typed async client for the Norwegian business registry
//!
//! This crate wraps the Brønnøysund Register Centre's Enhetsregisteret
//! REST API. Every call goes through a single request pipeline that adds
//! optional response caching, fixed-spacing rate limiting, retries with
//! bounded exponential backoff, and classification of every failure into
//! a [`BrregError`].
//!
//! # Lookup Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use brreg::{BrregClient, EnhetOppslag};
//!
//! #[tokio::main]
//! async fn main() -> brreg::Result<()> {
//!     let client = BrregClient::builder()
//!         .cache_ttl(Duration::from_secs(300))
//!         .rate_limit(Duration::from_secs(1))
//!         .max_retries(2)
//!         .build()?;
//!
//!     match client.get_enhet("923609016").await? {
//!         EnhetOppslag::Aktiv(enhet) => println!("{} ({:?})", enhet.navn, enhet.organisasjonsform),
//!         EnhetOppslag::Slettet(slettet) => println!("deleted on {:?}", slettet.slettedato),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Batch Example
//!
//! ```rust,no_run
//! use brreg::BrregClient;
//!
//! #[tokio::main]
//! async fn main() -> brreg::Result<()> {
//!     let client = BrregClient::new()?;
//!     let results = client
//!         .get_enheter_batch(["923609016", "914594685", "999999999"])
//!         .await;
//!
//!     for (orgnr, outcome) in results.iter() {
//!         match outcome {
//!             Ok(enhet) => println!("{orgnr}: {:?}", enhet.navn()),
//!             Err(e) => println!("{orgnr}: {e} (status {:?})", e.status_code()),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod ratelimit;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use batch::{BatchResults, execute_many};
pub use cache::{CacheConfig, CacheInfo, ResponseCache};
pub use client::{BrregClient, BrregClientBuilder, DEFAULT_BASE_URL};
pub use config::ClientConfig;
pub use error::{BrregError, ErrorContext, ErrorKind, Result};
pub use pipeline::{ApiResponse, RequestDescriptor, RequestPipeline, RetryConfig};
pub use ratelimit::RateLimiter;

// Re-export all types
pub use types::{
    Adresse, Enhet, EnhetOppslag, EnhetQuery, Enheter, HalPage, Kode, Kommune, Link, Links,
    MatrikkelQuery, Oppdatering, OppdateringQuery, Oppdateringer, Organisasjonsform, PageInfo,
    Personnavn, Rolle, RolleEnhet, RolleOppdatering, RollePerson, Rollegruppe, Roller,
    SlettetEnhet, SlettetUnderenhet, Underenhet, UnderenhetOppslag, UnderenhetQuery,
    Underenheter,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
