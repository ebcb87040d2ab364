//! Binding, rebinding, duplication and release of materials.

use std::any::Any;
use std::rc::Rc;
use tm_core::units::{k, temperature_k};
use tm_material::{
    BindSource, Capability, InMemoryMaterial, MaterialError, MaterialState, PropertyBasis,
    ProviderCall, ThermoHandle,
};

/// A handle that offers no material interface.
struct Opaque;

impl ThermoHandle for Opaque {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn provider() -> Rc<InMemoryMaterial> {
    InMemoryMaterial::builder()
        .phases(["Vapor", "Liquid"])
        .compound_ids(["Water", "Methane"])
        .build()
}

fn in_memory(material: &MaterialState) -> Rc<dyn ThermoHandle> {
    material.handle().unwrap()
}

#[test]
fn fresh_material_is_invalid() {
    let material = MaterialState::new();
    assert!(!material.is_valid());
    assert!(material.handle().is_none());
    assert!(!material.has_capability(Capability::Material));
}

#[test]
fn bind_probes_capabilities() {
    let provider = InMemoryMaterial::builder()
        .phases(["Vapor", "Liquid"])
        .without(Capability::UniversalConstant)
        .build();
    let material = MaterialState::from_handle(provider.handle()).unwrap();

    assert!(material.is_valid());
    assert!(material.has_capability(Capability::Material));
    assert!(material.has_capability(Capability::EquilibriumRoutine));
    assert!(!material.has_capability(Capability::UniversalConstant));
}

#[test]
fn release_is_idempotent_and_drops_handles() {
    let provider = provider();
    let mut material = MaterialState::from_handle(provider.handle()).unwrap();
    assert!(Rc::strong_count(&provider) > 1);

    material.release();
    assert!(!material.is_valid());
    assert_eq!(Rc::strong_count(&provider), 1);

    material.release();
    assert!(!material.is_valid());
    assert_eq!(material.temperature().unwrap_err(), MaterialError::Unbound);
}

#[test]
fn drop_releases_binding() {
    let provider = provider();
    {
        let _material = MaterialState::from_handle(provider.handle()).unwrap();
        assert!(Rc::strong_count(&provider) > 1);
    }
    assert_eq!(Rc::strong_count(&provider), 1);
}

#[test]
fn binding_nothing_is_a_no_op() {
    let provider = provider();
    let mut material = MaterialState::from_handle(provider.handle()).unwrap();

    assert!(!material.bind(None).unwrap());
    assert!(material.is_valid());

    let unbound = MaterialState::new();
    assert!(!material.bind(Some(BindSource::from(&unbound))).unwrap());
    assert!(material.is_valid());
}

#[test]
fn non_material_handle_is_rejected() {
    let provider = provider();
    let mut material = MaterialState::from_handle(provider.handle()).unwrap();

    let err = material
        .set_material(Rc::new(Opaque) as Rc<dyn ThermoHandle>)
        .unwrap_err();
    assert!(matches!(err, MaterialError::UnsupportedBinding { .. }));

    // Previous binding survives.
    assert!(Rc::ptr_eq(&in_memory(&material), &provider.handle()));

    let mut fresh = MaterialState::new();
    assert!(fresh.set_material(Rc::new(Opaque)).is_err());
    assert!(!fresh.is_valid());
}

#[test]
fn bind_to_other_material_shares_provider() {
    let provider = provider();
    let source = MaterialState::from_handle(provider.handle()).unwrap();

    let mut target = MaterialState::new();
    assert!(target.bind(Some((&source).into())).unwrap());
    assert!(Rc::ptr_eq(&in_memory(&source), &in_memory(&target)));
    assert_eq!(target.compounds(), source.compounds());

    source.set_temperature(k(315.0)).unwrap();
    assert_eq!(temperature_k(target.temperature().unwrap()), 315.0);
}

#[test]
fn rebinding_refreshes_phases_and_compounds() {
    let first = provider();
    let second = InMemoryMaterial::builder()
        .phases(["Vap", "Liq1", "Liq2"])
        .compound_ids(["Nitrogen"])
        .build();

    let mut material = MaterialState::from_handle(first.handle()).unwrap();
    assert!(material.set_material(second.handle()).unwrap());

    assert_eq!(material.allowed_phases().labels(), ["Vap", "Liq1", "Liq2"]);
    assert_eq!(material.phase_roles().liquid().label(), "Liq1");
    assert_eq!(material.compounds(), ["Nitrogen"]);
    assert_eq!(Rc::strong_count(&first), 1);
}

#[test]
fn duplicate_copies_state_into_independent_provider() {
    let provider = provider();
    let original = MaterialState::from_handle(provider.handle()).unwrap();
    original.set_temperature(k(420.0)).unwrap();

    let copy = original.duplicate().unwrap();
    assert!(copy.is_valid());
    assert!(!Rc::ptr_eq(&in_memory(&original), &in_memory(&copy)));
    assert_eq!(temperature_k(copy.temperature().unwrap()), 420.0);
    assert_eq!(copy.compounds(), original.compounds());

    copy.set_temperature(k(300.0)).unwrap();
    assert_eq!(temperature_k(original.temperature().unwrap()), 420.0);

    let calls = provider.calls();
    assert!(calls.contains(&ProviderCall::CreateMaterial));

    let copied = in_memory(&copy);
    let copied = copied.as_any().downcast_ref::<InMemoryMaterial>().unwrap();
    assert_eq!(
        copied.stored_overall("temperature", PropertyBasis::Undefined),
        Some(vec![300.0])
    );
}

#[test]
fn duplicate_of_unbound_material_fails() {
    assert_eq!(
        MaterialState::new().duplicate().unwrap_err(),
        MaterialError::Unbound
    );
}
