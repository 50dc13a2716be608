//! AzureRM SDK
//!
//! A small Azure Resource Manager REST client: environments and
//! authorizers, an [`ArmClient`] that executes described operations (plain,
//! paged and long-running), and the service models and clients built on it.

pub mod auth;
pub mod client;
pub mod enums;
pub mod environment;
pub mod error;
pub mod poller;
pub mod services;
pub mod validation;

pub use auth::{Authorizer, ClientSecretAuthorizer, StaticTokenAuthorizer};
pub use client::{ArmClient, ClientOptions, NO_BODY, RequestOptions, Response};
pub use environment::Environment;
pub use error::{Error, Result};
pub use poller::{Poller, PollerOptions};

#[doc(hidden)]
pub use serde as __serde;
