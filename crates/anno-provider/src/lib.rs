//! Adapters for AI video generation providers.
//!
//! This crate hides the mechanics of each upstream AI backend behind the
//! uniform [`VideoProvider`] trait. The [`ProviderRegistry`] resolves which
//! adapter serves blocking and asynchronous generation, based on
//! configuration, once at startup.

pub mod blotato;
pub mod error;
pub mod provider;
pub mod registry;
pub mod sora;

pub use blotato::{BlotatoConfig, BlotatoProvider};
pub use error::{ProviderError, ProviderResult};
pub use provider::{ProviderKind, VideoProvider};
pub use registry::{ProviderRegistry, RegistryConfig};
pub use sora::SoraProvider;
