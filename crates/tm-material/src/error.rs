//! Material facade errors.

use crate::provider::{Capability, ProviderError};
use tm_core::TmError;
use thiserror::Error;

/// Result type for material operations.
pub type MaterialResult<T> = Result<T, MaterialError>;

/// Errors surfaced by the material facade.
///
/// Only precondition violations and strict read paths reach the caller; the
/// degraded paths (phase enumeration, calculation, flash) are logged instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// No provider is bound (never bound, released, or disposed).
    #[error("Material is not bound to a property provider")]
    Unbound,

    /// The bound handle is not a material object.
    #[error("Unsupported binding: {what}")]
    UnsupportedBinding { what: &'static str },

    /// A capability required by a strict path is not implemented by the provider.
    #[error("Provider does not implement the {capability} capability")]
    CapabilityMissing { capability: Capability },

    /// The provider raised an error during a strict call.
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Invalid argument or malformed provider data.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    /// An energy port was used while disconnected.
    #[error("Energy port {port} is not connected")]
    Disconnected { port: String },

    /// A named parameter is missing from an energy port collection.
    #[error("Energy port does not contain parameter {name}")]
    MissingParameter { name: String },
}

impl From<ProviderError> for MaterialError {
    fn from(err: ProviderError) -> Self {
        MaterialError::Provider {
            message: err.message,
        }
    }
}

impl From<MaterialError> for TmError {
    fn from(err: MaterialError) -> Self {
        match err {
            MaterialError::Unbound
            | MaterialError::UnsupportedBinding { .. }
            | MaterialError::Disconnected { .. } => {
                TmError::Precondition {
                    what: err.to_string(),
                }
            }
            MaterialError::Provider { message } => TmError::External { message },
            MaterialError::CapabilityMissing { .. }
            | MaterialError::InvalidArg { .. }
            | MaterialError::MissingParameter { .. } => TmError::InvalidArg {
                what: err.to_string(),
            },
        }
    }
}
