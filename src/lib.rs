//! OpenFeature-style provider for Kameleoon, a feature flagging and experimentation platform.
//!
//! # Overview
//!
//! The crate revolves around a [`KameleoonProvider`] that resolves feature flags for visitors.
//! Each lookup carries an [`EvaluationContext`] whose targeting key is the Kameleoon visitor code,
//! and returns [`ResolutionDetails`] holding the value, the variation key (variant) and, on
//! failure, an [`ErrorCode`] with a message.
//!
//! The Kameleoon client itself is not part of this crate. It is consumed through the
//! [`KameleoonClient`] trait and obtained from a [`ClientFactory`]; [`CachingClientFactory`]
//! keeps one client per site code.
//!
//! # Typed lookups
//!
//! A variation carries named variables. The provider returns the variable named by the
//! `"variableKey"` context attribute, or the first variable of the variation. Its value must
//! match the requested type:
//! - [`KameleoonProvider::fetch_boolean_value()`]
//! - [`KameleoonProvider::fetch_string_value()`]
//! - [`KameleoonProvider::fetch_number_value()`]
//! - [`KameleoonProvider::fetch_integer_value()`]
//! - [`KameleoonProvider::fetch_float_value()`]
//! - [`KameleoonProvider::fetch_object_value()`]
//!
//! # Visitor data
//!
//! The `"conversion"` and `"customData"` context attributes are converted into Kameleoon
//! [`data`] records and sent to the client before the variation is computed.
//!
//! # Error Handling
//!
//! Fetch methods never fail. Any problem (missing targeting key, unknown flag, type mismatch,
//! client errors, provider not ready) is reported in the returned [`ResolutionDetails`] along
//! with the default value supplied by the caller.
//!
//! Errors from the client and client factory are represented by the [`Error`] enum.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate with the `"kameleoon"`
//! target. Consider integrating a `log`-compatible logger implementation for better visibility
//! into flag resolution.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

pub mod data;

mod client;
mod config;
mod context;
mod error;
mod factory;
mod provider;
mod resolution;
mod resolver;
mod value;
mod variation;

pub use client::{KameleoonClient, SharedClient};
pub use config::ClientConfig;
pub use context::{ContextValue, EvaluationContext};
pub use error::{Error, Result};
pub use factory::{CachingClientFactory, ClientFactory};
pub use provider::{KameleoonProvider, ProviderMetadata};
pub use resolution::{ErrorCode, Reason, ResolutionDetails};
pub use resolver::{KameleoonResolver, Resolver, VARIABLE_KEY};
pub use value::{AllowedTypes, Value, ValueType};
pub use variation::{Variable, VariableType, Variation};
