//! Capability traits of an external thermodynamic property provider.
//!
//! A provider is handed over as one opaque [`ThermoHandle`]. Each capability is
//! probed once at bind time and may be independently absent; call sites check
//! presence before use. All methods take `&self`: providers are external objects
//! with their own interior state, and a bound material is used from a single
//! owner thread, so handles are `Rc`-shared and never `Send`.

use crate::basis::PropertyBasis;
use crate::flash::{FlashSpec, SolutionType};
use crate::phase::PhaseStatus;
use crate::value::ConstantValue;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure raised by the external provider during a call.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The independently probed capability interfaces of a provider handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Material,
    MaterialContext,
    Phases,
    Compounds,
    PropertyRoutine,
    EquilibriumRoutine,
    UniversalConstant,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Material => "material",
            Capability::MaterialContext => "material context",
            Capability::Phases => "phase enumeration",
            Capability::Compounds => "compound enumeration",
            Capability::PropertyRoutine => "property calculation",
            Capability::EquilibriumRoutine => "equilibrium calculation",
            Capability::UniversalConstant => "universal constant",
        };
        f.write_str(name)
    }
}

/// Opaque provider handle, probed for capabilities.
///
/// Every probe defaults to `None`; a provider overrides the probes for the
/// interfaces it implements, typically returning `Some(self)`.
pub trait ThermoHandle: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_material(self: Rc<Self>) -> Option<Rc<dyn ThermoMaterial>> {
        None
    }

    fn as_material_context(self: Rc<Self>) -> Option<Rc<dyn MaterialContext>> {
        None
    }

    fn as_phases(self: Rc<Self>) -> Option<Rc<dyn PhaseEnumeration>> {
        None
    }

    fn as_compounds(self: Rc<Self>) -> Option<Rc<dyn CompoundEnumeration>> {
        None
    }

    fn as_property_routine(self: Rc<Self>) -> Option<Rc<dyn PropertyRoutine>> {
        None
    }

    fn as_equilibrium_routine(self: Rc<Self>) -> Option<Rc<dyn EquilibriumRoutine>> {
        None
    }

    fn as_universal_constant(self: Rc<Self>) -> Option<Rc<dyn UniversalConstant>> {
        None
    }
}

/// Phase labels and their status codes, as exchanged for present phases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentPhaseList {
    pub labels: Vec<String>,
    pub statuses: Vec<PhaseStatus>,
}

/// Material data: property storage, present phases and material duplication.
pub trait ThermoMaterial {
    fn get_overall_prop(&self, property: &str, basis: PropertyBasis) -> ProviderResult<Vec<f64>>;

    fn set_overall_prop(
        &self,
        property: &str,
        basis: PropertyBasis,
        values: &[f64],
    ) -> ProviderResult<()>;

    fn get_single_phase_prop(
        &self,
        property: &str,
        phase: &str,
        basis: PropertyBasis,
    ) -> ProviderResult<Vec<f64>>;

    fn set_single_phase_prop(
        &self,
        property: &str,
        phase: &str,
        basis: PropertyBasis,
        values: &[f64],
    ) -> ProviderResult<()>;

    fn get_two_phase_prop(
        &self,
        property: &str,
        phases: [&str; 2],
        basis: PropertyBasis,
    ) -> ProviderResult<Vec<f64>>;

    fn set_two_phase_prop(
        &self,
        property: &str,
        phases: [&str; 2],
        basis: PropertyBasis,
        values: &[f64],
    ) -> ProviderResult<()>;

    fn get_present_phases(&self) -> ProviderResult<PresentPhaseList>;

    fn set_present_phases(
        &self,
        labels: &[String],
        statuses: &[PhaseStatus],
    ) -> ProviderResult<()>;

    fn clear_all_props(&self) -> ProviderResult<()>;

    /// Create an empty sibling material from the same property package.
    fn create_material(&self) -> ProviderResult<Rc<dyn ThermoHandle>>;

    /// Copy the complete state of `source` into this material.
    fn copy_from_material(&self, source: &Rc<dyn ThermoHandle>) -> ProviderResult<()>;
}

/// Context binding between a material and a property package.
///
/// Held for the lifetime of the binding; no operations are issued through it.
pub trait MaterialContext {}

/// Phase list advertised by the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseList {
    pub labels: Vec<String>,
    pub aggregation_states: Vec<String>,
    pub key_compound_id: Option<String>,
}

pub trait PhaseEnumeration {
    fn get_phase_list(&self) -> ProviderResult<PhaseList>;
}

/// One entry of the provider's compound list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundRecord {
    pub id: String,
    pub formula: String,
    pub name: String,
    /// Normal boiling point [K]
    pub boiling_temperature: f64,
    /// Molecular weight [g/mol]
    pub molecular_weight: f64,
    pub cas_number: String,
}

pub trait CompoundEnumeration {
    fn get_compound_list(&self) -> ProviderResult<Vec<CompoundRecord>>;

    fn get_const_prop_list(&self) -> ProviderResult<Vec<String>>;

    fn get_t_dependent_prop_list(&self) -> ProviderResult<Vec<String>>;

    fn get_p_dependent_prop_list(&self) -> ProviderResult<Vec<String>>;

    /// One value per (property, compound) pair, property-major.
    fn get_compound_constant(
        &self,
        properties: &[&str],
        compound_ids: &[&str],
    ) -> ProviderResult<Vec<ConstantValue>>;

    fn get_t_dependent_property(
        &self,
        properties: &[&str],
        temperature: f64,
        compound_ids: &[&str],
    ) -> ProviderResult<Vec<f64>>;

    fn get_p_dependent_property(
        &self,
        properties: &[&str],
        pressure: f64,
        compound_ids: &[&str],
    ) -> ProviderResult<Vec<f64>>;
}

pub trait PropertyRoutine {
    fn calc_single_phase_prop(&self, properties: &[&str], phase: &str) -> ProviderResult<()>;

    fn calc_two_phase_prop(&self, properties: &[&str], phases: [&str; 2]) -> ProviderResult<()>;

    fn get_single_phase_prop_list(&self) -> ProviderResult<Vec<String>>;

    fn get_two_phase_prop_list(&self) -> ProviderResult<Vec<String>>;
}

pub trait EquilibriumRoutine {
    fn check_equilibrium_spec(
        &self,
        spec1: &FlashSpec,
        spec2: &FlashSpec,
        solution_type: SolutionType,
    ) -> ProviderResult<bool>;

    fn calc_equilibrium(
        &self,
        spec1: &FlashSpec,
        spec2: &FlashSpec,
        solution_type: SolutionType,
    ) -> ProviderResult<()>;
}

pub trait UniversalConstant {
    fn get_universal_constant(&self, constant_id: &str) -> ProviderResult<ConstantValue>;

    fn get_universal_constant_list(&self) -> ProviderResult<Vec<String>>;
}
