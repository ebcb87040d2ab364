//! Get/calculate/set protocol for overall, phase and compound properties.
//!
//! Single- and two-phase reads on a phase that is not present return zeros
//! sized to the compound count without calling the provider. Writes on such a
//! phase first make every allowed phase present, then write through. Nothing
//! is cached here: every read goes back to the provider.

use crate::basis::PropertyBasis;
use crate::composition::Composition;
use crate::error::{MaterialError, MaterialResult};
use crate::phase::Phase;
use crate::provider::{Capability, ProviderResult};
use crate::state::MaterialState;
use tm_core::numeric::ensure_finite;
use tm_core::units::{Pressure, Ratio, Temperature, k, pa, pressure_pa, temperature_k, unitless};
use tracing::{debug, warn};

/// The only element of `values`, or zero when empty.
fn single_or_default(values: &[f64], what: &str) -> MaterialResult<f64> {
    match values {
        [] => Ok(0.0),
        [v] => Ok(*v),
        _ => Err(MaterialError::InvalidArg {
            what: format!("{what} returned {} values, expected one", values.len()),
        }),
    }
}

/// Reject NaN and infinities before they reach the provider.
fn finite(value: f64, what: &'static str) -> MaterialResult<f64> {
    ensure_finite(value, what).map_err(|e| MaterialError::InvalidArg {
        what: e.to_string(),
    })
}

impl MaterialState {
    // ---- overall ----

    /// Overall property vector; phase-independent, so no present-phase guard.
    pub fn overall_property(
        &self,
        property: &str,
        basis: PropertyBasis,
    ) -> MaterialResult<Vec<f64>> {
        Ok(self.binding()?.material().get_overall_prop(property, basis)?)
    }

    pub fn set_overall_property(
        &self,
        property: &str,
        basis: PropertyBasis,
        values: &[f64],
    ) -> MaterialResult<()> {
        self.binding()?
            .material()
            .set_overall_prop(property, basis, values)?;
        Ok(())
    }

    fn overall_scalar(&self, property: &str, basis: PropertyBasis) -> MaterialResult<f64> {
        single_or_default(&self.overall_property(property, basis)?, property)
    }

    pub fn temperature(&self) -> MaterialResult<Temperature> {
        Ok(k(self.overall_scalar("temperature", PropertyBasis::Undefined)?))
    }

    pub fn set_temperature(&self, t: Temperature) -> MaterialResult<()> {
        let t = finite(temperature_k(t), "temperature")?;
        self.set_overall_property("temperature", PropertyBasis::Undefined, &[t])
    }

    pub fn pressure(&self) -> MaterialResult<Pressure> {
        Ok(pa(self.overall_scalar("pressure", PropertyBasis::Undefined)?))
    }

    pub fn set_pressure(&self, p: Pressure) -> MaterialResult<()> {
        let p = finite(pressure_pa(p), "pressure")?;
        self.set_overall_property("pressure", PropertyBasis::Undefined, &[p])
    }

    /// Total molar flow [mol/s].
    pub fn total_flow(&self) -> MaterialResult<f64> {
        self.overall_scalar("totalFlow", PropertyBasis::Mole)
    }

    pub fn set_total_flow(&self, mol_per_s: f64) -> MaterialResult<()> {
        let flow = finite(mol_per_s, "totalFlow")?;
        self.set_overall_property("totalFlow", PropertyBasis::Mole, &[flow])
    }

    /// Overall mole fractions keyed by the cached compound ids.
    pub fn composition(&self) -> MaterialResult<Composition> {
        let fractions = self.overall_property("fraction", PropertyBasis::Mole)?;
        if fractions.len() != self.compound_count() {
            return Err(MaterialError::InvalidArg {
                what: format!(
                    "fraction vector has {} values for {} compounds",
                    fractions.len(),
                    self.compound_count()
                ),
            });
        }
        Ok(Composition::from_pairs(
            self.compounds().iter().cloned().zip(fractions),
        ))
    }

    /// Write mole fractions in cached compound order; missing compounds are zero.
    pub fn set_composition(&self, composition: &Composition) -> MaterialResult<()> {
        let fractions = composition.ordered_fractions(self.compounds());
        self.set_overall_property("fraction", PropertyBasis::Mole, &fractions)
    }

    /// Mole-basis phase fraction of the vapor-role phase, read without calculation.
    pub fn vapor_fraction(&self) -> MaterialResult<Ratio> {
        let values = self.binding()?.material().get_single_phase_prop(
            "phaseFraction",
            self.phase_roles().vapor().label(),
            PropertyBasis::Mole,
        )?;
        Ok(unitless(single_or_default(&values, "phaseFraction")?))
    }

    pub fn set_vapor_fraction(&self, fraction: Ratio) -> MaterialResult<()> {
        let fraction = finite(fraction.value, "phaseFraction")?;
        let vapor = self.phase_roles().vapor().clone();
        self.set_single_phase_property("phaseFraction", &vapor, PropertyBasis::Mole, &[fraction])
    }

    // ---- single phase ----

    pub fn available_single_phase_props(&self) -> MaterialResult<Vec<String>> {
        let binding = self.binding()?;
        Ok(enumerate(
            binding.property_routine().map(|r| r.get_single_phase_prop_list()),
            "single phase properties",
        ))
    }

    /// Single-phase property vector.
    ///
    /// With `calculate`, the provider is asked to compute the property first; a
    /// failed calculation is logged and the read proceeds with whatever the
    /// provider holds.
    pub fn single_phase_property(
        &self,
        property: &str,
        phase: &Phase,
        basis: PropertyBasis,
        calculate: bool,
    ) -> MaterialResult<Vec<f64>> {
        let binding = self.binding()?;
        if !self.present_phases()?.contains(phase) {
            return Ok(vec![0.0; self.compound_count()]);
        }

        if calculate {
            match binding.property_routine() {
                Some(routine) => {
                    if let Err(e) = routine.calc_single_phase_prop(&[property], phase.label()) {
                        debug!(
                            property,
                            phase = %phase,
                            error = %e,
                            "calculate single phase prop fails"
                        );
                    }
                }
                None => debug!(property, "provider has no property routine, reading stored value"),
            }
        }

        Ok(binding
            .material()
            .get_single_phase_prop(property, phase.label(), basis)?)
    }

    pub fn set_single_phase_property(
        &self,
        property: &str,
        phase: &Phase,
        basis: PropertyBasis,
        values: &[f64],
    ) -> MaterialResult<()> {
        let binding = self.binding()?;
        self.ensure_present(&[phase])?;
        binding
            .material()
            .set_single_phase_prop(property, phase.label(), basis, values)?;
        Ok(())
    }

    // ---- two phase ----

    pub fn available_two_phase_props(&self) -> MaterialResult<Vec<String>> {
        let binding = self.binding()?;
        Ok(enumerate(
            binding.property_routine().map(|r| r.get_two_phase_prop_list()),
            "two phase properties",
        ))
    }

    /// Two-phase property vector; both phases must be present, otherwise zeros.
    pub fn two_phase_property(
        &self,
        property: &str,
        phase1: &Phase,
        phase2: &Phase,
        basis: PropertyBasis,
        calculate: bool,
    ) -> MaterialResult<Vec<f64>> {
        let binding = self.binding()?;
        let present = self.present_phases()?;
        if !present.contains(phase1) || !present.contains(phase2) {
            return Ok(vec![0.0; self.compound_count()]);
        }

        let pair = [phase1.label(), phase2.label()];
        if calculate {
            match binding.property_routine() {
                Some(routine) => {
                    if let Err(e) = routine.calc_two_phase_prop(&[property], pair) {
                        debug!(property, ?pair, error = %e, "calculate two phase prop fails");
                    }
                }
                None => debug!(property, "provider has no property routine, reading stored value"),
            }
        }

        Ok(binding.material().get_two_phase_prop(property, pair, basis)?)
    }

    pub fn set_two_phase_property(
        &self,
        property: &str,
        phase1: &Phase,
        phase2: &Phase,
        basis: PropertyBasis,
        values: &[f64],
    ) -> MaterialResult<()> {
        let binding = self.binding()?;
        self.ensure_present(&[phase1, phase2])?;
        binding.material().set_two_phase_prop(
            property,
            [phase1.label(), phase2.label()],
            basis,
            values,
        )?;
        Ok(())
    }

    // ---- compound constants and dependent properties ----

    pub fn available_const_props(&self) -> MaterialResult<Vec<String>> {
        let binding = self.binding()?;
        Ok(enumerate(
            binding.compounds().map(|c| c.get_const_prop_list()),
            "constant properties",
        ))
    }

    pub fn available_t_dependent_props(&self) -> MaterialResult<Vec<String>> {
        let binding = self.binding()?;
        Ok(enumerate(
            binding.compounds().map(|c| c.get_t_dependent_prop_list()),
            "temperature-dependent properties",
        ))
    }

    pub fn available_p_dependent_props(&self) -> MaterialResult<Vec<String>> {
        let binding = self.binding()?;
        Ok(enumerate(
            binding.compounds().map(|c| c.get_p_dependent_prop_list()),
            "pressure-dependent properties",
        ))
    }

    pub fn available_universal_constants(&self) -> MaterialResult<Vec<String>> {
        let binding = self.binding()?;
        Ok(enumerate(
            binding
                .universal_constant()
                .map(|u| u.get_universal_constant_list()),
            "universal constants",
        ))
    }

    /// Constant property of one compound.
    ///
    /// Accepts a scalar or a single-element vector from the provider; anything
    /// else, including a failed call or a missing capability, yields 0.
    pub fn compound_constant(&self, property: &str, compound_id: &str) -> MaterialResult<f64> {
        let binding = self.binding()?;
        let Some(compounds) = binding.compounds() else {
            debug!(property, "provider has no compound enumeration");
            return Ok(0.0);
        };

        let values = match compounds.get_compound_constant(&[property], &[compound_id]) {
            Ok(values) => values,
            Err(e) => {
                warn!(property, compound_id, error = %e, "get compound constant prop fails");
                return Ok(0.0);
            }
        };

        let coerced = match values.as_slice() {
            [] => Some(0.0),
            [value] => value.coerce(),
            _ => None,
        };
        Ok(coerced.unwrap_or_else(|| {
            warn!(property, compound_id, ?values, "compound constant is not numeric");
            0.0
        }))
    }

    pub fn compound_t_dependent_property(
        &self,
        property: &str,
        compound_id: &str,
        t: Temperature,
    ) -> MaterialResult<f64> {
        let compounds = self.binding()?.compounds().ok_or(MaterialError::CapabilityMissing {
            capability: Capability::Compounds,
        })?;
        let values =
            compounds.get_t_dependent_property(&[property], temperature_k(t), &[compound_id])?;
        single_or_default(&values, property)
    }

    pub fn compound_p_dependent_property(
        &self,
        property: &str,
        compound_id: &str,
        p: Pressure,
    ) -> MaterialResult<f64> {
        let compounds = self.binding()?.compounds().ok_or(MaterialError::CapabilityMissing {
            capability: Capability::Compounds,
        })?;
        let values =
            compounds.get_p_dependent_property(&[property], pressure_pa(p), &[compound_id])?;
        single_or_default(&values, property)
    }

    pub fn universal_constant(&self, constant_id: &str) -> MaterialResult<f64> {
        let constants = self.binding()?.universal_constant().ok_or(
            MaterialError::CapabilityMissing {
                capability: Capability::UniversalConstant,
            },
        )?;
        let value = constants.get_universal_constant(constant_id)?;
        value.as_scalar().ok_or_else(|| MaterialError::InvalidArg {
            what: format!("universal constant {constant_id} is not numeric: {value:?}"),
        })
    }
}

/// Provider name list; absence and failure both give an empty list.
fn enumerate(list: Option<ProviderResult<Vec<String>>>, what: &'static str) -> Vec<String> {
    match list {
        None => {
            debug!(what, "capability absent, no names available");
            Vec::new()
        }
        Some(Ok(names)) => names,
        Some(Err(e)) => {
            warn!(what, error = %e, "cannot enumerate provider names");
            Vec::new()
        }
    }
}
