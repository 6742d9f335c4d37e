//! PingFederate provider
//!
//! Manages PingFederate server configuration declaratively. Each resource
//! type maps a typed state tree onto one object of the PingFederate
//! administrative REST API, and the plugin host drives create, refresh,
//! update, delete and import over a gRPC plugin protocol.
//!
//! # Layout
//!
//! - [`schema`], [`validation`] and [`plan`]: attribute schemas, configuration
//!   checks and the planner that fills defaults and computed values
//! - [`client`]: the HTTP client for the admin API and its wire models
//! - [`common`]: schema fragments and conversions shared between resources
//! - [`resources`] and [`data_sources`]: one adapter per object type
//! - [`provider`]: the registry the gRPC service dispatches to
//! - [`server`]: the gRPC service, handshake and shutdown handling
//!
//! # Handshake
//!
//! [`serve`] binds a local port and prints one line to stdout:
//!
//! ```text
//! PINGFEDERATE_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! Format: `PINGFEDERATE_PROVIDER|<protocol_version>|<address>`. All logging
//! goes to stderr.
//!
//! # Provider configuration
//!
//! `https_host`, `username` and `password` are required, each falling back to
//! its `PINGFEDERATE_PROVIDER_*` environment variable. See [`config`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod common;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod plan;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

pub use client::PingFederateClient;
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::PingFederateProvider;
pub use resource::{DataSource, Resource};
pub use schema::ProviderSchema;
pub use server::{
    serve, serve_on, serve_on_with_options, serve_with_options, ProviderService, ServeOptions,
};
pub use types::{
    AttributeChange, ImportedResource, PlanResult, ProviderMetadata, ReadResult, ServerCapabilities,
    HANDSHAKE_PREFIX, PROTOCOL_VERSION,
};
pub use validation::{is_valid, validate, validate_result};
