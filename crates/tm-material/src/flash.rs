//! Equilibrium (flash) requests.
//!
//! Every flash runs through one guarded entry point: all allowed phases are
//! made present, the equilibrium capability is checked, then the provider is
//! called. Missing capability and provider failures both come back as
//! `Ok(false)`; only an unbound material is an error. Nothing is rolled back
//! on failure, and no flashed status is remembered between calls.

use crate::basis::PropertyBasis;
use crate::error::MaterialResult;
use crate::phase::Phase;
use crate::state::MaterialState;
use std::fmt;
use tracing::{debug, warn};

/// Phase qualifier of a flash constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashPhase {
    Overall,
    Phase(String),
}

impl FlashPhase {
    pub fn token(&self) -> &str {
        match self {
            Self::Overall => "Overall",
            Self::Phase(label) => label,
        }
    }
}

/// One equilibrium constraint: (property, basis, phase).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSpec {
    pub property: String,
    pub basis: Option<PropertyBasis>,
    pub phase: FlashPhase,
}

impl FlashSpec {
    pub fn new(
        property: impl Into<String>,
        basis: Option<PropertyBasis>,
        phase: FlashPhase,
    ) -> Self {
        Self {
            property: property.into(),
            basis,
            phase,
        }
    }

    /// Constraint on an overall property without basis.
    pub fn overall(property: impl Into<String>) -> Self {
        Self::new(property, None, FlashPhase::Overall)
    }

    /// Mole-basis phase fraction of `phase`.
    pub fn phase_fraction(phase: &Phase) -> Self {
        Self::new(
            "phaseFraction",
            Some(PropertyBasis::Mole),
            FlashPhase::Phase(phase.label().to_string()),
        )
    }

    /// String triple as exchanged with providers; a missing basis is empty.
    pub fn tokens(&self) -> [String; 3] {
        [
            self.property.clone(),
            self.basis.map(|b| b.token().to_string()).unwrap_or_default(),
            self.phase.token().to_string(),
        ]
    }
}

impl fmt::Display for FlashSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [property, basis, phase] = self.tokens();
        write!(f, "{property}/{basis}/{phase}")
    }
}

/// Which solution the provider should converge to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolutionType {
    #[default]
    Unspecified,
    Normal,
    Retrograde,
}

impl SolutionType {
    pub fn token(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Normal => "normal",
            Self::Retrograde => "retrograde",
        }
    }
}

/// The named flash shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    /// temperature / pressure
    TP,
    /// enthalpy / pressure
    PH,
    /// temperature / enthalpy
    TH,
    /// temperature / vapor mole fraction
    TVF,
    /// pressure / vapor mole fraction
    PV,
}

impl FlashKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::TP => "T-P",
            Self::PH => "P-H",
            Self::TH => "T-H",
            Self::TVF => "T-VF",
            Self::PV => "P-VF",
        }
    }

    /// The two constraints; `vapor` is the phase whose fraction is fixed.
    pub fn specs(self, vapor: &Phase) -> (FlashSpec, FlashSpec) {
        match self {
            Self::TP => (
                FlashSpec::overall("temperature"),
                FlashSpec::overall("pressure"),
            ),
            Self::PH => (
                FlashSpec::overall("enthalpy"),
                FlashSpec::overall("pressure"),
            ),
            Self::TH => (
                FlashSpec::overall("temperature"),
                FlashSpec::overall("enthalpy"),
            ),
            Self::TVF => (
                FlashSpec::overall("temperature"),
                FlashSpec::phase_fraction(vapor),
            ),
            Self::PV => (
                FlashSpec::overall("pressure"),
                FlashSpec::phase_fraction(vapor),
            ),
        }
    }
}

impl MaterialState {
    /// Ask the provider whether it can solve this constraint pair.
    ///
    /// A provider without equilibrium capability supports nothing.
    pub fn check_equilibrium_spec(
        &self,
        spec1: &FlashSpec,
        spec2: &FlashSpec,
        solution_type: SolutionType,
    ) -> MaterialResult<bool> {
        match self.binding()?.equilibrium_routine() {
            None => Ok(false),
            Some(routine) => Ok(routine.check_equilibrium_spec(spec1, spec2, solution_type)?),
        }
    }

    /// Equilibrate with caller-supplied constraints.
    pub fn flash(
        &self,
        spec1: &FlashSpec,
        spec2: &FlashSpec,
        solution_type: SolutionType,
        show_warning: bool,
    ) -> MaterialResult<bool> {
        let binding = self.binding()?;

        if let Err(e) = self.widen_present_phases() {
            self.report_flash_failure(spec1, spec2, &e.to_string(), show_warning);
            return Ok(false);
        }

        let Some(routine) = binding.equilibrium_routine() else {
            debug!(%spec1, %spec2, "provider has no equilibrium routine, flash skipped");
            return Ok(false);
        };

        match routine.calc_equilibrium(spec1, spec2, solution_type) {
            Ok(()) => {
                debug!(%spec1, %spec2, solution = solution_type.token(), "flash converged");
                Ok(true)
            }
            Err(e) => {
                self.report_flash_failure(spec1, spec2, &e.message, show_warning);
                Ok(false)
            }
        }
    }

    /// Equilibrate with one of the named constraint shapes.
    pub fn flash_kind(&self, kind: FlashKind, show_warning: bool) -> MaterialResult<bool> {
        let (spec1, spec2) = kind.specs(self.phase_roles().vapor());
        debug!(kind = kind.label(), "flash requested");
        self.flash(&spec1, &spec2, SolutionType::Unspecified, show_warning)
    }

    pub fn do_tp_flash(&self, show_warning: bool) -> MaterialResult<bool> {
        self.flash_kind(FlashKind::TP, show_warning)
    }

    pub fn do_ph_flash(&self, show_warning: bool) -> MaterialResult<bool> {
        self.flash_kind(FlashKind::PH, show_warning)
    }

    pub fn do_th_flash(&self, show_warning: bool) -> MaterialResult<bool> {
        self.flash_kind(FlashKind::TH, show_warning)
    }

    pub fn do_tvf_flash(&self, show_warning: bool) -> MaterialResult<bool> {
        self.flash_kind(FlashKind::TVF, show_warning)
    }

    pub fn do_pv_flash(&self, show_warning: bool) -> MaterialResult<bool> {
        self.flash_kind(FlashKind::PV, show_warning)
    }

    fn report_flash_failure(
        &self,
        spec1: &FlashSpec,
        spec2: &FlashSpec,
        reason: &str,
        show_warning: bool,
    ) {
        warn!(%spec1, %spec2, reason, "flash fails");
        if show_warning {
            self.warn_user(&format!("Flash fails. {reason}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_shapes_build_expected_constraints() {
        let vapor = Phase::vapor();
        let (s1, s2) = FlashKind::TP.specs(&vapor);
        assert_eq!(s1.tokens(), ["temperature", "", "Overall"]);
        assert_eq!(s2.tokens(), ["pressure", "", "Overall"]);

        let (s1, s2) = FlashKind::PH.specs(&vapor);
        assert_eq!(s1.property, "enthalpy");
        assert_eq!(s2.property, "pressure");

        let (s1, s2) = FlashKind::TH.specs(&vapor);
        assert_eq!(s1.property, "temperature");
        assert_eq!(s2.property, "enthalpy");
    }

    #[test]
    fn vapor_fraction_shapes_use_vapor_label() {
        let vapor = Phase::new("vap1");
        let (s1, s2) = FlashKind::TVF.specs(&vapor);
        assert_eq!(s1.property, "temperature");
        assert_eq!(s2.tokens(), ["phaseFraction", "Mole", "vap1"]);

        let (s1, s2) = FlashKind::PV.specs(&vapor);
        assert_eq!(s1.property, "pressure");
        assert_eq!(s2.phase, FlashPhase::Phase("vap1".into()));
    }

    #[test]
    fn spec_display_joins_tokens() {
        let spec = FlashSpec::overall("pressure");
        assert_eq!(spec.to_string(), "pressure//Overall");
        assert_eq!(SolutionType::default().token(), "unspecified");
    }
}
