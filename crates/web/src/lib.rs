//! Ecoleta web client core.
//!
//! The create-point page as a UI-agnostic state machine, plus the two HTTP
//! clients it needs. A rendering layer (browser, TUI, CLI) owns a
//! [`CreatePointForm`], forwards user events to it, and renders its state.
//!
//! # Modules
//!
//! - [`api`] - Client for the Ecoleta REST API
//! - [`geography`] - Client for the IBGE localidades API (states and cities)
//! - [`form`] - Create-point form state
//! - [`config`] - Base URLs from the environment
//! - [`error`] - Client error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod geography;

pub use api::EcoletaClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use form::{CityRequest, ContactFields, CreatePointForm, Field, FormError, SubmitError};
pub use geography::GeographyClient;
