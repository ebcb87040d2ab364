//! In-memory property provider.
//!
//! Stores whatever is written to it, serves a fixed phase and compound package,
//! and "calculates" by copying pre-seeded results into the store. Individual
//! capabilities can be removed. Used as the reference provider in tests and
//! for running unit operations without an external property package.
//!
//! With the `test-util` feature the material also keeps a log of the provider
//! calls that matter to the material facade and can be told to fail at chosen
//! [`FailurePoint`]s.

use crate::basis::PropertyBasis;
use crate::flash::{FlashSpec, SolutionType};
use crate::phase::PhaseStatus;
use crate::provider::{
    Capability, CompoundEnumeration, CompoundRecord, EquilibriumRoutine, MaterialContext,
    PhaseEnumeration, PhaseList, PresentPhaseList, PropertyRoutine, ProviderError, ProviderResult,
    ThermoHandle, ThermoMaterial, UniversalConstant,
};
use crate::value::ConstantValue;
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Provider calls observable in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    GetPhaseList,
    GetCompoundList,
    GetPresentPhases,
    SetPresentPhases(Vec<String>),
    CalcSinglePhase {
        property: String,
        phase: String,
    },
    CalcTwoPhase {
        property: String,
        phases: [String; 2],
    },
    CheckEquilibrium {
        spec1: FlashSpec,
        spec2: FlashSpec,
    },
    CalcEquilibrium {
        spec1: FlashSpec,
        spec2: FlashSpec,
        solution_type: SolutionType,
    },
    ClearAllProps,
    CreateMaterial,
    CopyFromMaterial,
}

/// Provider operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    PhaseList,
    CompoundList,
    PresentPhases,
    SinglePhaseCalc,
    TwoPhaseCalc,
    Equilibrium,
    CompoundConstant,
}

/// Property specifications the equilibrium routine accepts.
const FLASH_PROPERTIES: [&str; 5] = [
    "temperature",
    "pressure",
    "enthalpy",
    "entropy",
    "phaseFraction",
];

type SingleKey = (String, String, PropertyBasis);
type TwoKey = (String, [String; 2], PropertyBasis);

/// Fixed property-package data shared by a material and its siblings.
#[derive(Debug, Clone, Default)]
struct Package {
    phases: Vec<String>,
    aggregation_states: Vec<String>,
    key_compound_id: Option<String>,
    constants: HashMap<(String, String), ConstantValue>,
    /// value = a + b·T
    t_dependent: HashMap<(String, String), (f64, f64)>,
    /// value = a + b·P
    p_dependent: HashMap<(String, String), (f64, f64)>,
    universal: HashMap<String, ConstantValue>,
    single_phase_results: HashMap<SingleKey, Vec<f64>>,
    two_phase_results: HashMap<TwoKey, Vec<f64>>,
    flash_result: Vec<(String, f64)>,
    disabled: HashSet<Capability>,
}

/// Per-material mutable data.
#[derive(Debug, Clone, Default)]
struct Store {
    compounds: Vec<CompoundRecord>,
    present: Vec<String>,
    statuses: Vec<PhaseStatus>,
    overall: HashMap<(String, PropertyBasis), Vec<f64>>,
    single: HashMap<SingleKey, Vec<f64>>,
    two: HashMap<TwoKey, Vec<f64>>,
}

/// Call log and armed failures; empty unless built with `test-util`.
#[derive(Debug, Default)]
struct Recorder {
    #[cfg(any(test, feature = "test-util"))]
    calls: RefCell<Vec<ProviderCall>>,
    #[cfg(any(test, feature = "test-util"))]
    failures: RefCell<HashSet<FailurePoint>>,
}

impl Recorder {
    #[cfg(any(test, feature = "test-util"))]
    fn record(&self, call: ProviderCall) {
        self.calls.borrow_mut().push(call);
    }

    #[cfg(not(any(test, feature = "test-util")))]
    fn record(&self, _call: ProviderCall) {}

    #[cfg(any(test, feature = "test-util"))]
    fn check(&self, point: FailurePoint) -> ProviderResult<()> {
        if self.failures.borrow().contains(&point) {
            return Err(ProviderError::new(format!("injected failure: {point:?}")));
        }
        Ok(())
    }

    #[cfg(not(any(test, feature = "test-util")))]
    fn check(&self, _point: FailurePoint) -> ProviderResult<()> {
        Ok(())
    }
}

/// A provider material held entirely in memory.
#[derive(Debug)]
pub struct InMemoryMaterial {
    package: Rc<Package>,
    store: RefCell<Store>,
    recorder: Recorder,
}

impl InMemoryMaterial {
    pub fn builder() -> InMemoryBuilder {
        InMemoryBuilder::default()
    }

    /// This material as a provider handle.
    pub fn handle(self: &Rc<Self>) -> Rc<dyn ThermoHandle> {
        Rc::clone(self) as Rc<dyn ThermoHandle>
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.recorder.calls.borrow().clone()
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn clear_calls(&self) {
        self.recorder.calls.borrow_mut().clear();
    }

    /// Number of recorded calls matching `predicate`.
    #[cfg(any(test, feature = "test-util"))]
    pub fn count_calls(&self, predicate: impl Fn(&ProviderCall) -> bool) -> usize {
        self.recorder
            .calls
            .borrow()
            .iter()
            .filter(|c| predicate(c))
            .count()
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn inject_failure(&self, point: FailurePoint) {
        self.recorder.failures.borrow_mut().insert(point);
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn clear_failure(&self, point: FailurePoint) {
        self.recorder.failures.borrow_mut().remove(&point);
    }

    /// Replace the compound list, as a host would after editing the package.
    pub fn replace_compounds(&self, compounds: Vec<CompoundRecord>) {
        self.store.borrow_mut().compounds = compounds;
    }

    pub fn present_labels(&self) -> Vec<String> {
        self.store.borrow().present.clone()
    }

    pub fn present_statuses(&self) -> Vec<PhaseStatus> {
        self.store.borrow().statuses.clone()
    }

    /// Turn phases on directly, bypassing the recorded provider interface.
    #[cfg(any(test, feature = "test-util"))]
    pub fn force_present(&self, labels: &[&str]) {
        let mut store = self.store.borrow_mut();
        store.present = labels.iter().map(|l| l.to_string()).collect();
        store.statuses = vec![PhaseStatus::Unknown; labels.len()];
    }

    pub fn stored_overall(&self, property: &str, basis: PropertyBasis) -> Option<Vec<f64>> {
        self.store
            .borrow()
            .overall
            .get(&(property.to_string(), basis))
            .cloned()
    }

    fn record(&self, call: ProviderCall) {
        self.recorder.record(call);
    }

    fn check(&self, point: FailurePoint) -> ProviderResult<()> {
        self.recorder.check(point)
    }

    fn check_phase(&self, phase: &str) -> ProviderResult<()> {
        if self.package.phases.iter().any(|p| p == phase) {
            Ok(())
        } else {
            Err(ProviderError::new(format!("unknown phase label {phase}")))
        }
    }

    fn compound_index(&self, id: &str) -> ProviderResult<usize> {
        self.store
            .borrow()
            .compounds
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ProviderError::new(format!("unknown compound {id}")))
    }

    fn dependent(
        table: &HashMap<(String, String), (f64, f64)>,
        properties: &[&str],
        x: f64,
        compound_ids: &[&str],
    ) -> ProviderResult<Vec<f64>> {
        let mut values = Vec::with_capacity(properties.len() * compound_ids.len());
        for property in properties {
            for id in compound_ids {
                let (a, b) = table
                    .get(&(property.to_string(), id.to_string()))
                    .ok_or_else(|| {
                        ProviderError::new(format!("no {property} correlation for {id}"))
                    })?;
                values.push(a + b * x);
            }
        }
        Ok(values)
    }

    fn property_names<V>(table: &HashMap<(String, String), V>) -> Vec<String> {
        let mut names: Vec<String> = table.keys().map(|(p, _)| p.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

impl ThermoHandle for InMemoryMaterial {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_material(self: Rc<Self>) -> Option<Rc<dyn ThermoMaterial>> {
        Some(self)
    }

    fn as_material_context(self: Rc<Self>) -> Option<Rc<dyn MaterialContext>> {
        (!self.package.disabled.contains(&Capability::MaterialContext))
            .then(|| self as Rc<dyn MaterialContext>)
    }

    fn as_phases(self: Rc<Self>) -> Option<Rc<dyn PhaseEnumeration>> {
        (!self.package.disabled.contains(&Capability::Phases))
            .then(|| self as Rc<dyn PhaseEnumeration>)
    }

    fn as_compounds(self: Rc<Self>) -> Option<Rc<dyn CompoundEnumeration>> {
        (!self.package.disabled.contains(&Capability::Compounds))
            .then(|| self as Rc<dyn CompoundEnumeration>)
    }

    fn as_property_routine(self: Rc<Self>) -> Option<Rc<dyn PropertyRoutine>> {
        (!self.package.disabled.contains(&Capability::PropertyRoutine))
            .then(|| self as Rc<dyn PropertyRoutine>)
    }

    fn as_equilibrium_routine(self: Rc<Self>) -> Option<Rc<dyn EquilibriumRoutine>> {
        (!self.package.disabled.contains(&Capability::EquilibriumRoutine))
            .then(|| self as Rc<dyn EquilibriumRoutine>)
    }

    fn as_universal_constant(self: Rc<Self>) -> Option<Rc<dyn UniversalConstant>> {
        (!self.package.disabled.contains(&Capability::UniversalConstant))
            .then(|| self as Rc<dyn UniversalConstant>)
    }
}

impl ThermoMaterial for InMemoryMaterial {
    fn get_overall_prop(&self, property: &str, basis: PropertyBasis) -> ProviderResult<Vec<f64>> {
        Ok(self.stored_overall(property, basis).unwrap_or_default())
    }

    fn set_overall_prop(
        &self,
        property: &str,
        basis: PropertyBasis,
        values: &[f64],
    ) -> ProviderResult<()> {
        if property == "fraction" && values.len() != self.store.borrow().compounds.len() {
            return Err(ProviderError::new("fraction vector must match compound count"));
        }
        self.store
            .borrow_mut()
            .overall
            .insert((property.to_string(), basis), values.to_vec());
        Ok(())
    }

    fn get_single_phase_prop(
        &self,
        property: &str,
        phase: &str,
        basis: PropertyBasis,
    ) -> ProviderResult<Vec<f64>> {
        self.check_phase(phase)?;
        Ok(self
            .store
            .borrow()
            .single
            .get(&(property.to_string(), phase.to_string(), basis))
            .cloned()
            .unwrap_or_default())
    }

    fn set_single_phase_prop(
        &self,
        property: &str,
        phase: &str,
        basis: PropertyBasis,
        values: &[f64],
    ) -> ProviderResult<()> {
        self.check_phase(phase)?;
        let mut store = self.store.borrow_mut();
        if !store.present.iter().any(|p| p == phase) {
            return Err(ProviderError::new(format!("phase {phase} is not present")));
        }
        store.single.insert(
            (property.to_string(), phase.to_string(), basis),
            values.to_vec(),
        );
        Ok(())
    }

    fn get_two_phase_prop(
        &self,
        property: &str,
        phases: [&str; 2],
        basis: PropertyBasis,
    ) -> ProviderResult<Vec<f64>> {
        self.check_phase(phases[0])?;
        self.check_phase(phases[1])?;
        let key = (
            property.to_string(),
            [phases[0].to_string(), phases[1].to_string()],
            basis,
        );
        Ok(self
            .store
            .borrow()
            .two
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    fn set_two_phase_prop(
        &self,
        property: &str,
        phases: [&str; 2],
        basis: PropertyBasis,
        values: &[f64],
    ) -> ProviderResult<()> {
        self.check_phase(phases[0])?;
        self.check_phase(phases[1])?;
        let mut store = self.store.borrow_mut();
        for phase in phases {
            if !store.present.iter().any(|p| p == phase) {
                return Err(ProviderError::new(format!("phase {phase} is not present")));
            }
        }
        store.two.insert(
            (
                property.to_string(),
                [phases[0].to_string(), phases[1].to_string()],
                basis,
            ),
            values.to_vec(),
        );
        Ok(())
    }

    fn get_present_phases(&self) -> ProviderResult<PresentPhaseList> {
        self.record(ProviderCall::GetPresentPhases);
        self.check(FailurePoint::PresentPhases)?;
        let store = self.store.borrow();
        Ok(PresentPhaseList {
            labels: store.present.clone(),
            statuses: store.statuses.clone(),
        })
    }

    fn set_present_phases(
        &self,
        labels: &[String],
        statuses: &[PhaseStatus],
    ) -> ProviderResult<()> {
        self.record(ProviderCall::SetPresentPhases(labels.to_vec()));
        self.check(FailurePoint::PresentPhases)?;
        if labels.len() != statuses.len() {
            return Err(ProviderError::new("phase labels and statuses differ in length"));
        }
        for label in labels {
            self.check_phase(label)?;
        }
        let mut store = self.store.borrow_mut();
        store.present = labels.to_vec();
        store.statuses = statuses.to_vec();
        Ok(())
    }

    fn clear_all_props(&self) -> ProviderResult<()> {
        self.record(ProviderCall::ClearAllProps);
        let mut store = self.store.borrow_mut();
        store.overall.clear();
        store.single.clear();
        store.two.clear();
        Ok(())
    }

    fn create_material(&self) -> ProviderResult<Rc<dyn ThermoHandle>> {
        self.record(ProviderCall::CreateMaterial);
        let sibling = InMemoryMaterial {
            package: Rc::clone(&self.package),
            store: RefCell::new(Store {
                compounds: self.store.borrow().compounds.clone(),
                ..Store::default()
            }),
            recorder: Recorder::default(),
        };
        Ok(Rc::new(sibling))
    }

    fn copy_from_material(&self, source: &Rc<dyn ThermoHandle>) -> ProviderResult<()> {
        self.record(ProviderCall::CopyFromMaterial);
        let source = source
            .as_any()
            .downcast_ref::<InMemoryMaterial>()
            .ok_or_else(|| ProviderError::new("source is not an in-memory material"))?;
        if std::ptr::eq(source, self) {
            return Ok(());
        }
        let copied = source.store.borrow().clone();
        *self.store.borrow_mut() = copied;
        Ok(())
    }
}

impl MaterialContext for InMemoryMaterial {}

impl PhaseEnumeration for InMemoryMaterial {
    fn get_phase_list(&self) -> ProviderResult<PhaseList> {
        self.record(ProviderCall::GetPhaseList);
        self.check(FailurePoint::PhaseList)?;
        Ok(PhaseList {
            labels: self.package.phases.clone(),
            aggregation_states: self.package.aggregation_states.clone(),
            key_compound_id: self.package.key_compound_id.clone(),
        })
    }
}

impl CompoundEnumeration for InMemoryMaterial {
    fn get_compound_list(&self) -> ProviderResult<Vec<CompoundRecord>> {
        self.record(ProviderCall::GetCompoundList);
        self.check(FailurePoint::CompoundList)?;
        Ok(self.store.borrow().compounds.clone())
    }

    fn get_const_prop_list(&self) -> ProviderResult<Vec<String>> {
        Ok(Self::property_names(&self.package.constants))
    }

    fn get_t_dependent_prop_list(&self) -> ProviderResult<Vec<String>> {
        Ok(Self::property_names(&self.package.t_dependent))
    }

    fn get_p_dependent_prop_list(&self) -> ProviderResult<Vec<String>> {
        Ok(Self::property_names(&self.package.p_dependent))
    }

    fn get_compound_constant(
        &self,
        properties: &[&str],
        compound_ids: &[&str],
    ) -> ProviderResult<Vec<ConstantValue>> {
        self.check(FailurePoint::CompoundConstant)?;
        let mut values = Vec::with_capacity(properties.len() * compound_ids.len());
        for property in properties {
            for id in compound_ids {
                self.compound_index(id)?;
                let value = self
                    .package
                    .constants
                    .get(&(property.to_string(), id.to_string()))
                    .cloned()
                    .unwrap_or(ConstantValue::Empty);
                values.push(value);
            }
        }
        Ok(values)
    }

    fn get_t_dependent_property(
        &self,
        properties: &[&str],
        temperature: f64,
        compound_ids: &[&str],
    ) -> ProviderResult<Vec<f64>> {
        Self::dependent(
            &self.package.t_dependent,
            properties,
            temperature,
            compound_ids,
        )
    }

    fn get_p_dependent_property(
        &self,
        properties: &[&str],
        pressure: f64,
        compound_ids: &[&str],
    ) -> ProviderResult<Vec<f64>> {
        Self::dependent(&self.package.p_dependent, properties, pressure, compound_ids)
    }
}

impl PropertyRoutine for InMemoryMaterial {
    fn calc_single_phase_prop(&self, properties: &[&str], phase: &str) -> ProviderResult<()> {
        for property in properties {
            self.record(ProviderCall::CalcSinglePhase {
                property: property.to_string(),
                phase: phase.to_string(),
            });
        }
        self.check(FailurePoint::SinglePhaseCalc)?;
        self.check_phase(phase)?;

        let mut store = self.store.borrow_mut();
        for ((property, result_phase, basis), values) in &self.package.single_phase_results {
            if result_phase == phase && properties.contains(&property.as_str()) {
                store
                    .single
                    .insert((property.clone(), phase.to_string(), *basis), values.clone());
            }
        }
        Ok(())
    }

    fn calc_two_phase_prop(&self, properties: &[&str], phases: [&str; 2]) -> ProviderResult<()> {
        for property in properties {
            self.record(ProviderCall::CalcTwoPhase {
                property: property.to_string(),
                phases: [phases[0].to_string(), phases[1].to_string()],
            });
        }
        self.check(FailurePoint::TwoPhaseCalc)?;

        let mut store = self.store.borrow_mut();
        for ((property, pair, basis), values) in &self.package.two_phase_results {
            let same_pair = pair[0] == phases[0] && pair[1] == phases[1];
            if same_pair && properties.contains(&property.as_str()) {
                store
                    .two
                    .insert((property.clone(), pair.clone(), *basis), values.clone());
            }
        }
        Ok(())
    }

    fn get_single_phase_prop_list(&self) -> ProviderResult<Vec<String>> {
        let mut names: Vec<String> = self
            .package
            .single_phase_results
            .keys()
            .map(|(p, _, _)| p.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn get_two_phase_prop_list(&self) -> ProviderResult<Vec<String>> {
        let mut names: Vec<String> = self
            .package
            .two_phase_results
            .keys()
            .map(|(p, _, _)| p.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

impl EquilibriumRoutine for InMemoryMaterial {
    fn check_equilibrium_spec(
        &self,
        spec1: &FlashSpec,
        spec2: &FlashSpec,
        _solution_type: SolutionType,
    ) -> ProviderResult<bool> {
        self.record(ProviderCall::CheckEquilibrium {
            spec1: spec1.clone(),
            spec2: spec2.clone(),
        });
        Ok(spec1.property != spec2.property
            && FLASH_PROPERTIES.contains(&spec1.property.as_str())
            && FLASH_PROPERTIES.contains(&spec2.property.as_str()))
    }

    fn calc_equilibrium(
        &self,
        spec1: &FlashSpec,
        spec2: &FlashSpec,
        solution_type: SolutionType,
    ) -> ProviderResult<()> {
        self.record(ProviderCall::CalcEquilibrium {
            spec1: spec1.clone(),
            spec2: spec2.clone(),
            solution_type,
        });
        self.check(FailurePoint::Equilibrium)?;
        if !self.check_equilibrium_spec(spec1, spec2, solution_type)? {
            return Err(ProviderError::new(format!(
                "unsupported flash specification {spec1} with {spec2}"
            )));
        }

        let mut store = self.store.borrow_mut();
        if !self.package.flash_result.is_empty() {
            store.present = self
                .package
                .flash_result
                .iter()
                .filter(|(_, fraction)| *fraction > 0.0)
                .map(|(phase, _)| phase.clone())
                .collect();
            for (phase, fraction) in &self.package.flash_result {
                store.single.insert(
                    ("phaseFraction".to_string(), phase.clone(), PropertyBasis::Mole),
                    vec![*fraction],
                );
            }
        }
        let count = store.present.len();
        store.statuses = vec![PhaseStatus::AtEquilibrium; count];
        Ok(())
    }
}

impl UniversalConstant for InMemoryMaterial {
    fn get_universal_constant(&self, constant_id: &str) -> ProviderResult<ConstantValue> {
        self.package
            .universal
            .get(constant_id)
            .cloned()
            .ok_or_else(|| ProviderError::new(format!("unknown universal constant {constant_id}")))
    }

    fn get_universal_constant_list(&self) -> ProviderResult<Vec<String>> {
        let mut names: Vec<String> = self.package.universal.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// Builder for [`InMemoryMaterial`].
#[derive(Debug, Default)]
pub struct InMemoryBuilder {
    package: Package,
    compounds: Vec<CompoundRecord>,
    recorder: Recorder,
}

impl InMemoryBuilder {
    pub fn phases<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.package.phases = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn aggregation_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.package.aggregation_states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn key_compound(mut self, id: impl Into<String>) -> Self {
        self.package.key_compound_id = Some(id.into());
        self
    }

    pub fn compound(mut self, record: CompoundRecord) -> Self {
        self.compounds.push(record);
        self
    }

    /// Compounds known only by id; formula and name mirror the id.
    pub fn compound_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            self.compounds.push(CompoundRecord {
                formula: id.clone(),
                name: id.clone(),
                id,
                ..CompoundRecord::default()
            });
        }
        self
    }

    pub fn constant(
        mut self,
        property: impl Into<String>,
        compound_id: impl Into<String>,
        value: impl Into<ConstantValue>,
    ) -> Self {
        self.package
            .constants
            .insert((property.into(), compound_id.into()), value.into());
        self
    }

    /// Linear temperature correlation `a + b·T`.
    pub fn t_dependent(
        mut self,
        property: impl Into<String>,
        compound_id: impl Into<String>,
        a: f64,
        b: f64,
    ) -> Self {
        self.package
            .t_dependent
            .insert((property.into(), compound_id.into()), (a, b));
        self
    }

    /// Linear pressure correlation `a + b·P`.
    pub fn p_dependent(
        mut self,
        property: impl Into<String>,
        compound_id: impl Into<String>,
        a: f64,
        b: f64,
    ) -> Self {
        self.package
            .p_dependent
            .insert((property.into(), compound_id.into()), (a, b));
        self
    }

    pub fn universal_constant(
        mut self,
        id: impl Into<String>,
        value: impl Into<ConstantValue>,
    ) -> Self {
        self.package.universal.insert(id.into(), value.into());
        self
    }

    /// Value stored when `property` is calculated for `phase`.
    pub fn single_phase_result(
        mut self,
        property: impl Into<String>,
        phase: impl Into<String>,
        basis: PropertyBasis,
        values: Vec<f64>,
    ) -> Self {
        self.package
            .single_phase_results
            .insert((property.into(), phase.into(), basis), values);
        self
    }

    /// Value stored when `property` is calculated for a phase pair.
    pub fn two_phase_result(
        mut self,
        property: impl Into<String>,
        phases: [&str; 2],
        basis: PropertyBasis,
        values: Vec<f64>,
    ) -> Self {
        self.package.two_phase_results.insert(
            (
                property.into(),
                [phases[0].to_string(), phases[1].to_string()],
                basis,
            ),
            values,
        );
        self
    }

    /// Phase fractions a successful flash produces; phases with zero fraction
    /// are turned off.
    pub fn flash_result<I, S>(mut self, fractions: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.package.flash_result = fractions.into_iter().map(|(p, f)| (p.into(), f)).collect();
        self
    }

    pub fn without(mut self, capability: Capability) -> Self {
        self.package.disabled.insert(capability);
        self
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn failing(mut self, point: FailurePoint) -> Self {
        self.recorder.failures.get_mut().insert(point);
        self
    }

    pub fn build(self) -> Rc<InMemoryMaterial> {
        Rc::new(InMemoryMaterial {
            package: Rc::new(self.package),
            store: RefCell::new(Store {
                compounds: self.compounds,
                ..Store::default()
            }),
            recorder: self.recorder,
        })
    }
}
