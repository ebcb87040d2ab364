//! Guarded flash dispatch against the in-memory provider.

use std::cell::RefCell;
use std::rc::Rc;
use tm_core::units::{k, pa};
use tm_material::{
    Capability, FailurePoint, FlashKind, FlashPhase, FlashSpec, InMemoryMaterial, MaterialError,
    MaterialState, PhaseStatus, PropertyBasis, ProviderCall, SolutionType,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn provider() -> Rc<InMemoryMaterial> {
    InMemoryMaterial::builder()
        .phases(["Vapor", "Liquid"])
        .compound_ids(["Water", "Methane"])
        .build()
}

fn bound(provider: &Rc<InMemoryMaterial>) -> MaterialState {
    let material = MaterialState::from_handle(provider.handle()).unwrap();
    material.set_temperature(k(300.0)).unwrap();
    material.set_pressure(pa(101_325.0)).unwrap();
    material
}

fn equilibrium_calls(provider: &InMemoryMaterial) -> Vec<(FlashSpec, FlashSpec)> {
    provider
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            ProviderCall::CalcEquilibrium { spec1, spec2, .. } => Some((spec1, spec2)),
            _ => None,
        })
        .collect()
}

/// Collects messages handed to the material's warning sink.
fn capture_warnings(material: &mut MaterialState) -> Rc<RefCell<Vec<String>>> {
    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&messages);
    material.set_warning_sink(move |msg| sink.borrow_mut().push(msg.to_string()));
    messages
}

#[test]
fn tp_flash_without_equilibrium_capability_still_widens() {
    init_tracing();
    let provider = InMemoryMaterial::builder()
        .phases(["Vapor", "Liquid"])
        .compound_ids(["Water"])
        .without(Capability::EquilibriumRoutine)
        .build();
    let material = bound(&provider);
    assert!(provider.present_labels().is_empty());

    assert!(!material.do_tp_flash(true).unwrap());
    assert_eq!(provider.present_labels(), ["Vapor", "Liquid"]);
    assert!(equilibrium_calls(&provider).is_empty());
}

#[test]
fn tp_flash_converges() {
    let provider = provider();
    let material = bound(&provider);

    assert!(material.do_tp_flash(false).unwrap());
    let calls = equilibrium_calls(&provider);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, FlashSpec::overall("temperature"));
    assert_eq!(calls[0].1, FlashSpec::overall("pressure"));

    let (present, statuses) = material.present_phases_with_status().unwrap();
    assert_eq!(present.len(), 2);
    assert!(statuses.iter().all(|s| *s == PhaseStatus::AtEquilibrium));
}

#[test]
fn named_flashes_send_expected_constraints() {
    let provider = InMemoryMaterial::builder()
        .phases(["VaporPhase", "LiquidPhase"])
        .compound_ids(["Water"])
        .build();
    let material = bound(&provider);

    assert!(material.do_ph_flash(false).unwrap());
    assert!(material.do_th_flash(false).unwrap());
    assert!(material.do_tvf_flash(false).unwrap());
    assert!(material.do_pv_flash(false).unwrap());

    let vapor_fraction = FlashSpec::new(
        "phaseFraction",
        Some(PropertyBasis::Mole),
        FlashPhase::Phase("VaporPhase".into()),
    );
    let calls = equilibrium_calls(&provider);
    assert_eq!(
        calls,
        [
            (FlashSpec::overall("enthalpy"), FlashSpec::overall("pressure")),
            (FlashSpec::overall("temperature"), FlashSpec::overall("enthalpy")),
            (FlashSpec::overall("temperature"), vapor_fraction.clone()),
            (FlashSpec::overall("pressure"), vapor_fraction),
        ]
    );
}

#[test]
fn provider_failure_returns_false_and_warns() {
    init_tracing();
    let provider = provider();
    let mut material = bound(&provider);
    let warnings = capture_warnings(&mut material);
    provider.inject_failure(FailurePoint::Equilibrium);

    assert!(!material.do_tp_flash(false).unwrap());
    assert!(warnings.borrow().is_empty());

    assert!(!material.do_tp_flash(true).unwrap());
    assert_eq!(
        *warnings.borrow(),
        ["Flash fails. injected failure: Equilibrium"]
    );

    // Present phases are not rolled back.
    assert_eq!(provider.present_labels(), ["Vapor", "Liquid"]);
}

#[test]
fn failed_widening_skips_equilibrium() {
    let provider = provider();
    let mut material = bound(&provider);
    let warnings = capture_warnings(&mut material);
    provider.inject_failure(FailurePoint::PresentPhases);

    assert!(!material.do_tp_flash(true).unwrap());
    assert!(equilibrium_calls(&provider).is_empty());
    assert_eq!(warnings.borrow().len(), 1);
    assert!(warnings.borrow()[0].starts_with("Flash fails."));
}

#[test]
fn custom_specs_and_spec_check() {
    let provider = provider();
    let material = bound(&provider);

    let s = FlashSpec::overall("entropy");
    let p = FlashSpec::overall("pressure");
    let v = FlashSpec::overall("volume");

    assert!(material.check_equilibrium_spec(&s, &p, SolutionType::Normal).unwrap());
    assert!(!material.check_equilibrium_spec(&v, &p, SolutionType::Normal).unwrap());

    assert!(material.flash(&s, &p, SolutionType::Retrograde, false).unwrap());
    assert!(!material.flash(&v, &p, SolutionType::Normal, false).unwrap());
    assert!(provider.calls().contains(&ProviderCall::CalcEquilibrium {
        spec1: s,
        spec2: p,
        solution_type: SolutionType::Retrograde,
    }));
}

#[test]
fn spec_check_without_capability_is_false() {
    let provider = InMemoryMaterial::builder()
        .phases(["Vapor", "Liquid"])
        .without(Capability::EquilibriumRoutine)
        .build();
    let material = bound(&provider);
    let (t, p) = FlashKind::TP.specs(material.phase_roles().vapor());
    assert!(!material.check_equilibrium_spec(&t, &p, SolutionType::Unspecified).unwrap());
}

#[test]
fn flash_can_turn_phases_off() {
    let provider = InMemoryMaterial::builder()
        .phases(["Vapor", "Liquid"])
        .compound_ids(["Water", "Methane"])
        .flash_result([("Vapor", 1.0), ("Liquid", 0.0)])
        .build();
    let material = bound(&provider);

    assert!(material.do_tp_flash(false).unwrap());
    assert_eq!(provider.present_labels(), ["Vapor"]);
    assert_eq!(material.vapor_fraction().unwrap().value, 1.0);

    let liquid = material.phase_roles().liquid().clone();
    let fraction = material
        .single_phase_property("fraction", &liquid, PropertyBasis::Mole, true)
        .unwrap();
    assert_eq!(fraction, vec![0.0, 0.0]);

    // The next flash makes every allowed phase present before calculating.
    provider.clear_calls();
    assert!(material.flash_kind(FlashKind::TP, false).unwrap());
    assert!(
        provider
            .calls()
            .contains(&ProviderCall::SetPresentPhases(vec!["Vapor".into(), "Liquid".into()]))
    );
}

#[test]
fn unbound_flash_is_an_error() {
    let material = MaterialState::new();
    assert_eq!(material.do_tp_flash(true).unwrap_err(), MaterialError::Unbound);
    assert_eq!(
        material
            .check_equilibrium_spec(
                &FlashSpec::overall("temperature"),
                &FlashSpec::overall("pressure"),
                SolutionType::Unspecified,
            )
            .unwrap_err(),
        MaterialError::Unbound
    );
}
