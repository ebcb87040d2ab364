//! tm-core: shared foundation for thermomat.
//!
//! Contains:
//! - units (uom SI types + constructors for the scalar material accessors)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{TmError, TmResult};
pub use numeric::*;
pub use units::*;
