//! Example provider plugin managing shop articles.
//!
//! The plugin is started by an infrastructure-as-code host, prints a
//! handshake line on stdout and then serves the provider protocol over gRPC.
//! It manages a single resource, `tfp_example_shop_article`, backed by a REST
//! API at `{host}/articles`.
//!
//! # Layout
//!
//! - [`generated`]: protocol buffer messages and the gRPC service
//! - [`schema`], [`validation`], [`plan`]: attribute schemas, config checks
//!   and plan computation
//! - [`config`]: the provider block and the `EXAMPLE_HOST` fallback
//! - [`client`]: REST client for the shop backend
//! - [`resources`]: the `shop_article` resource
//! - [`provider`]: [`ExampleProvider`], routing requests to resources
//! - [`server`]: the [`ProviderService`] trait, handshake and gRPC server
//!
//! # Handshake Protocol
//!
//! When the plugin starts via [`serve`], it prints:
//!
//! ```text
//! TFP_PLUGIN|1|127.0.0.1:50051
//! ```
//!
//! Format: `TFP_PLUGIN|<protocol_version>|<address>`
//!
//! # Provider Protocol
//!
//! - **GetMetadata**: provider type name and resource names
//! - **GetSchema**: provider config and resource schemas
//! - **ValidateProviderConfig** / **Configure**: check and apply the provider block
//! - **Stop**: graceful shutdown
//! - **ValidateResourceConfig**: check a resource block
//! - **Plan**: compute changes and replacement
//! - **Create/Read/Update/Delete**: resource lifecycle
//! - **ImportResourceState**: adopt an existing article by id

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

pub use client::{Article, ClientError, ShopClient};
pub use config::{ProviderConfig, ProviderSettings, HOST_ENV_VAR};
pub use error::{Operation, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{ExampleProvider, ProviderData, PROVIDER_TYPE_NAME};
pub use schema::ProviderSchema;
pub use server::{
    serve, serve_on, serve_on_with_options, serve_with_options, ProviderService, ServeOptions,
};
pub use types::{
    AttributeChange, ImportedResource, PlanResult, ProviderMetadata, HANDSHAKE_PREFIX,
    PROTOCOL_VERSION,
};
pub use validation::{is_valid, validate, validate_result};

pub use async_trait::async_trait;
pub use serde_json;
