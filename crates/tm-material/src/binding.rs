//! Capability bundle probed from a provider handle.

use crate::error::{MaterialError, MaterialResult};
use crate::provider::{
    Capability, CompoundEnumeration, EquilibriumRoutine, MaterialContext, PhaseEnumeration,
    PropertyRoutine, ThermoHandle, ThermoMaterial, UniversalConstant,
};
use std::fmt;
use std::rc::Rc;

/// Every interface a bound material holds on its provider.
///
/// The material capability is mandatory; the others are probed once and kept
/// as-is, so absence is checked at the point of use. Dropping the binding
/// releases every sub-handle together.
pub struct Binding {
    handle: Rc<dyn ThermoHandle>,
    material: Rc<dyn ThermoMaterial>,
    context: Option<Rc<dyn MaterialContext>>,
    phases: Option<Rc<dyn PhaseEnumeration>>,
    compounds: Option<Rc<dyn CompoundEnumeration>>,
    property_routine: Option<Rc<dyn PropertyRoutine>>,
    equilibrium_routine: Option<Rc<dyn EquilibriumRoutine>>,
    universal_constant: Option<Rc<dyn UniversalConstant>>,
}

impl Binding {
    /// Probe `handle` for all capabilities.
    pub fn probe(handle: Rc<dyn ThermoHandle>) -> MaterialResult<Self> {
        let material = Rc::clone(&handle)
            .as_material()
            .ok_or(MaterialError::UnsupportedBinding {
                what: "handle is not a CAPE-OPEN 1.1 material object",
            })?;

        Ok(Self {
            context: Rc::clone(&handle).as_material_context(),
            phases: Rc::clone(&handle).as_phases(),
            compounds: Rc::clone(&handle).as_compounds(),
            property_routine: Rc::clone(&handle).as_property_routine(),
            equilibrium_routine: Rc::clone(&handle).as_equilibrium_routine(),
            universal_constant: Rc::clone(&handle).as_universal_constant(),
            material,
            handle,
        })
    }

    pub fn handle(&self) -> &Rc<dyn ThermoHandle> {
        &self.handle
    }

    pub fn material(&self) -> &dyn ThermoMaterial {
        self.material.as_ref()
    }

    pub fn context(&self) -> Option<&dyn MaterialContext> {
        self.context.as_deref()
    }

    pub fn phases(&self) -> Option<&dyn PhaseEnumeration> {
        self.phases.as_deref()
    }

    pub fn compounds(&self) -> Option<&dyn CompoundEnumeration> {
        self.compounds.as_deref()
    }

    pub fn property_routine(&self) -> Option<&dyn PropertyRoutine> {
        self.property_routine.as_deref()
    }

    pub fn equilibrium_routine(&self) -> Option<&dyn EquilibriumRoutine> {
        self.equilibrium_routine.as_deref()
    }

    pub fn universal_constant(&self) -> Option<&dyn UniversalConstant> {
        self.universal_constant.as_deref()
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Material => true,
            Capability::MaterialContext => self.context.is_some(),
            Capability::Phases => self.phases.is_some(),
            Capability::Compounds => self.compounds.is_some(),
            Capability::PropertyRoutine => self.property_routine.is_some(),
            Capability::EquilibriumRoutine => self.equilibrium_routine.is_some(),
            Capability::UniversalConstant => self.universal_constant.is_some(),
        }
    }

    /// Capabilities present on this binding.
    pub fn capabilities(&self) -> Vec<Capability> {
        [
            Capability::Material,
            Capability::MaterialContext,
            Capability::Phases,
            Capability::Compounds,
            Capability::PropertyRoutine,
            Capability::EquilibriumRoutine,
            Capability::UniversalConstant,
        ]
        .into_iter()
        .filter(|c| self.has(*c))
        .collect()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
