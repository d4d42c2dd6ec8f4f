//! Startup configuration: environment settings, credential discovery and
//! dependency wiring.

mod credentials;
mod dependencies;
mod settings;

pub use credentials::CredentialProvider;
pub use dependencies::Dependencies;
pub use settings::{ConnectionMode, Settings};
