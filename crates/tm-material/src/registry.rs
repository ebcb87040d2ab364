//! Allowed-phase query and phase-role assignment.

use crate::config::MaterialOptions;
use crate::lookup::{find_first, label_contains};
use crate::phase::{Phase, PhaseRole, PhaseSet};
use crate::provider::PhaseEnumeration;
use tracing::{debug, warn};

/// Phases the provider allows, with its aggregation hints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowedPhases {
    pub phases: PhaseSet,
    pub aggregation_states: Vec<String>,
    pub key_compound_id: Option<String>,
}

/// Provider phases selected for each semantic role.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseRoles {
    vapor: Phase,
    liquid: Phase,
    solid: Phase,
}

impl Default for PhaseRoles {
    fn default() -> Self {
        Self {
            vapor: Phase::vapor(),
            liquid: Phase::liquid(),
            solid: Phase::solid(),
        }
    }
}

impl PhaseRoles {
    pub fn vapor(&self) -> &Phase {
        &self.vapor
    }

    pub fn liquid(&self) -> &Phase {
        &self.liquid
    }

    pub fn solid(&self) -> &Phase {
        &self.solid
    }

    pub fn get(&self, role: PhaseRole) -> Option<&Phase> {
        match role {
            PhaseRole::Vapor => Some(&self.vapor),
            PhaseRole::Liquid => Some(&self.liquid),
            PhaseRole::Solid => Some(&self.solid),
            PhaseRole::Unassigned => None,
        }
    }
}

/// Role implied by a provider label (case-insensitive substring match).
pub fn classify(label: &str) -> PhaseRole {
    if label_contains(label, "vap") {
        PhaseRole::Vapor
    } else if label_contains(label, "liq") {
        PhaseRole::Liquid
    } else if label_contains(label, "solid") {
        PhaseRole::Solid
    } else {
        PhaseRole::Unassigned
    }
}

/// Query the provider's allowed phases.
///
/// Absence of the phase capability or a failed call degrades to the fallback
/// phases of `options`, with roles taken by position and no hints.
pub fn query_allowed_phases(
    phases: Option<&dyn PhaseEnumeration>,
    options: &MaterialOptions,
) -> AllowedPhases {
    let Some(enumeration) = phases else {
        debug!("provider has no phase enumeration, using fallback phases");
        return fallback_phases(options);
    };

    match enumeration.get_phase_list() {
        Ok(list) => AllowedPhases {
            phases: list
                .labels
                .iter()
                .map(|label| Phase::with_role(label.as_str(), classify(label)))
                .collect(),
            aggregation_states: list.aggregation_states,
            key_compound_id: list.key_compound_id,
        },
        Err(e) => {
            warn!(error = %e, "cannot get allowed phases, using fallback phases");
            fallback_phases(options)
        }
    }
}

fn fallback_phases(options: &MaterialOptions) -> AllowedPhases {
    let phases = options
        .fallback_phases
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let role = match i {
                0 => PhaseRole::Vapor,
                1 => PhaseRole::Liquid,
                _ => PhaseRole::Unassigned,
            };
            Phase::with_role(label.as_str(), role)
        })
        .collect();
    AllowedPhases {
        phases,
        aggregation_states: Vec::new(),
        key_compound_id: None,
    }
}

/// Assign roles to the allowed phases.
///
/// For each role the first label containing "vap", "liq" or "solid" wins. A
/// role without a label match goes to the first phase already tagged with that
/// role (the positional tags of the fallback phases), and otherwise keeps its
/// default phase. With `legacy_solid_alias` the solid match also overwrites the
/// Liquid slot.
pub fn assign_roles(allowed: &PhaseSet, options: &MaterialOptions) -> PhaseRoles {
    let first_containing = |fragment: &str| {
        find_first(allowed.iter(), |p| label_contains(p.label(), fragment))
            .map(|(_, phase)| phase.clone())
    };
    let first_tagged = |role: PhaseRole| {
        find_first(allowed.iter(), |p| p.role() == role).map(|(_, phase)| phase.clone())
    };

    let mut roles = PhaseRoles::default();
    if let Some(vapor) = first_containing("vap").or_else(|| first_tagged(PhaseRole::Vapor)) {
        roles.vapor = vapor;
    }
    if let Some(liquid) = first_containing("liq").or_else(|| first_tagged(PhaseRole::Liquid)) {
        roles.liquid = liquid;
    }
    if let Some(solid) = first_containing("solid").or_else(|| first_tagged(PhaseRole::Solid)) {
        if options.legacy_solid_alias {
            debug!(phase = %solid, "solid phase aliased into the liquid role");
            roles.liquid = solid.clone();
        }
        roles.solid = solid;
    }
    roles
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn vapor_role_is_first_label_containing_vap(
            others in prop::collection::vec("[a-uw-z]{1,8}", 0..6),
            prefix in "[A-Za-z]{0,4}",
            position in 0usize..6,
        ) {
            let vapor_label = format!("{prefix}VaP");
            let mut labels = others;
            let at = position.min(labels.len());
            labels.insert(at, vapor_label.clone());
            labels.push(format!("{vapor_label}2"));

            let allowed = PhaseSet::from_labels(labels.iter().map(String::as_str));
            let expected = allowed
                .iter()
                .find(|p| p.label().to_lowercase().contains("vap"))
                .map(|p| p.label().to_string());
            let roles = assign_roles(&allowed, &MaterialOptions::default());
            prop_assert_eq!(Some(roles.vapor().label().to_string()), expected);
            prop_assert!(roles.vapor().label().to_lowercase().contains("vap"));
        }
    }
}
