//! tm-material: process material facade over an external property provider.
//!
//! Provides:
//! - Capability traits a thermodynamic property provider implements
//! - MaterialState: binding lifecycle, phase registry and compound cache
//! - Property get/calculate/set protocol guarded by present phases
//! - Flash dispatch through a single guarded entry point
//! - Energy port parameters (work, temperature bounds)
//! - An in-memory provider for tests and standalone runs (call log and failure
//!   injection behind the `test-util` feature)
//!
//! # Architecture
//!
//! A provider is handed over as one `Rc<dyn ThermoHandle>`. Its capabilities
//! (material, phases, compounds, property and equilibrium routines, universal
//! constants) are probed once at bind time and any of them may be missing.
//! Unit operations talk only to [`MaterialState`]; they never see which
//! capabilities the provider lacks beyond a `false` flash result or a zero
//! property vector.
//!
//! # Example
//!
//! ```
//! use tm_material::{InMemoryMaterial, MaterialState, PropertyBasis};
//! use tm_core::units::{k, pa};
//!
//! let provider = InMemoryMaterial::builder()
//!     .phases(["Vapor", "Liquid"])
//!     .compound_ids(["Water", "Methane"])
//!     .build();
//!
//! let material = MaterialState::from_handle(provider.handle()).unwrap();
//! material.set_temperature(k(300.0)).unwrap();
//! material.set_pressure(pa(101325.0)).unwrap();
//! assert!(material.do_tp_flash(false).unwrap());
//!
//! let vapor = material.phase_roles().vapor().clone();
//! let density = material
//!     .single_phase_property("density", &vapor, PropertyBasis::Mass, true)
//!     .unwrap();
//! assert!(density.is_empty() || density.len() == 1);
//! ```

pub mod basis;
pub mod binding;
pub mod composition;
pub mod config;
pub mod energy;
pub mod error;
pub mod facade;
pub mod flash;
pub mod lookup;
pub mod memory;
pub mod phase;
pub mod provider;
pub mod registry;
pub mod state;
pub mod value;

// Re-exports for ergonomics
pub use basis::PropertyBasis;
pub use binding::Binding;
pub use composition::Composition;
pub use config::MaterialOptions;
pub use energy::{EnergyPort, ParameterCollection, RealParameter};
pub use error::{MaterialError, MaterialResult};
pub use flash::{FlashKind, FlashPhase, FlashSpec, SolutionType};
pub use memory::{FailurePoint, InMemoryBuilder, InMemoryMaterial, ProviderCall};
pub use phase::{Phase, PhaseRole, PhaseSet, PhaseStatus};
pub use provider::{
    Capability, CompoundEnumeration, CompoundRecord, EquilibriumRoutine, MaterialContext,
    PhaseEnumeration, PhaseList, PresentPhaseList, PropertyRoutine, ProviderError, ProviderResult,
    ThermoHandle, ThermoMaterial, UniversalConstant,
};
pub use registry::{AllowedPhases, PhaseRoles};
pub use state::{BindSource, MaterialState, WarningSink};
pub use value::ConstantValue;
