//! Material state: provider binding, phase sets and compound cache.

use crate::binding::Binding;
use crate::config::MaterialOptions;
use crate::error::{MaterialError, MaterialResult};
use crate::phase::{Phase, PhaseSet, PhaseStatus};
use crate::provider::{Capability, CompoundRecord, ThermoHandle};
use crate::registry::{AllowedPhases, PhaseRoles, assign_roles, classify, query_allowed_phases};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Sink for user-facing warnings raised by failed flashes.
pub type WarningSink = Box<dyn Fn(&str)>;

/// What a material can be bound to.
pub enum BindSource<'a> {
    /// A provider handle, probed for its capabilities.
    Handle(Rc<dyn ThermoHandle>),
    /// Another material; its current binding is shared.
    Material(&'a MaterialState),
}

impl From<Rc<dyn ThermoHandle>> for BindSource<'_> {
    fn from(handle: Rc<dyn ThermoHandle>) -> Self {
        BindSource::Handle(handle)
    }
}

impl<'a> From<&'a MaterialState> for BindSource<'a> {
    fn from(state: &'a MaterialState) -> Self {
        BindSource::Material(state)
    }
}

/// A process material backed by an external property provider.
///
/// Valid iff bound. Allowed phases and the compound id list are cached at
/// bind time; present phases live in the provider and are read on demand.
/// Not thread-safe: a material has a single owner.
pub struct MaterialState {
    binding: Option<Binding>,
    options: MaterialOptions,
    allowed: AllowedPhases,
    roles: PhaseRoles,
    compounds: Vec<String>,
    warning_sink: Option<WarningSink>,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialState {
    /// An unbound material.
    pub fn new() -> Self {
        Self::with_options(MaterialOptions::default())
    }

    pub fn with_options(options: MaterialOptions) -> Self {
        Self {
            binding: None,
            options,
            allowed: AllowedPhases::default(),
            roles: PhaseRoles::default(),
            compounds: Vec::new(),
            warning_sink: None,
        }
    }

    /// A material bound to `handle`.
    pub fn from_handle(handle: Rc<dyn ThermoHandle>) -> MaterialResult<Self> {
        let mut state = Self::new();
        state.bind(Some(BindSource::Handle(handle)))?;
        Ok(state)
    }

    /// Bind to a provider handle or to another material's provider.
    ///
    /// `None`, or an unbound source material, is a no-op returning `false`.
    /// A handle without the material capability is rejected and the current
    /// binding is kept. Every successful bind re-derives allowed phases, phase
    /// roles and the compound list.
    pub fn bind(&mut self, source: Option<BindSource<'_>>) -> MaterialResult<bool> {
        let handle = match source {
            None => return Ok(false),
            Some(BindSource::Handle(handle)) => handle,
            Some(BindSource::Material(other)) => match other.handle() {
                Some(handle) => handle,
                None => return Ok(false),
            },
        };

        let binding = Binding::probe(handle)?;
        debug!(?binding, "material bound");
        self.binding = Some(binding);

        self.allowed = query_allowed_phases(
            self.binding.as_ref().and_then(|b| b.phases()),
            &self.options,
        );
        self.roles = assign_roles(&self.allowed.phases, &self.options);
        self.update_compound_list();
        Ok(true)
    }

    /// Shorthand for binding to a provider handle.
    pub fn set_material(&mut self, handle: Rc<dyn ThermoHandle>) -> MaterialResult<bool> {
        self.bind(Some(BindSource::Handle(handle)))
    }

    /// Drop every provider sub-handle. Safe to repeat and on unbound materials.
    pub fn release(&mut self) {
        if self.binding.take().is_some() {
            debug!("material released its provider binding");
        }
    }

    pub fn is_valid(&self) -> bool {
        self.binding.is_some()
    }

    /// The bound provider handle, if any.
    pub fn handle(&self) -> Option<Rc<dyn ThermoHandle>> {
        self.binding.as_ref().map(|b| Rc::clone(b.handle()))
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.binding.as_ref().is_some_and(|b| b.has(capability))
    }

    pub(crate) fn binding(&self) -> MaterialResult<&Binding> {
        self.binding.as_ref().ok_or(MaterialError::Unbound)
    }

    /// A new material bound to a provider-made copy of this one.
    pub fn duplicate(&self) -> MaterialResult<MaterialState> {
        let binding = self.binding()?;
        let copy = binding.material().create_material()?;
        let copy_material = Rc::clone(&copy)
            .as_material()
            .ok_or(MaterialError::UnsupportedBinding {
                what: "provider created a non-material object",
            })?;
        copy_material.copy_from_material(binding.handle())?;

        let mut duplicate = MaterialState::with_options(self.options.clone());
        duplicate.bind(Some(BindSource::Handle(copy)))?;
        Ok(duplicate)
    }

    /// Clear every property held by the provider for this material.
    pub fn clear_all_properties(&self) -> MaterialResult<()> {
        self.binding()?.material().clear_all_props()?;
        Ok(())
    }

    pub fn options(&self) -> &MaterialOptions {
        &self.options
    }

    /// Install the sink that receives flash warnings.
    pub fn set_warning_sink(&mut self, sink: impl Fn(&str) + 'static) {
        self.warning_sink = Some(Box::new(sink));
    }

    pub(crate) fn warn_user(&self, message: &str) {
        if let Some(sink) = &self.warning_sink {
            sink(message);
        }
    }

    // ---- phases ----

    /// Phases allowed by the provider, cached at bind time.
    pub fn allowed_phases(&self) -> &PhaseSet {
        &self.allowed.phases
    }

    /// Allowed phases together with aggregation hints and key compound.
    pub fn allowed_phase_info(&self) -> &AllowedPhases {
        &self.allowed
    }

    pub fn phase_roles(&self) -> &PhaseRoles {
        &self.roles
    }

    /// Phases the provider currently has turned on.
    pub fn present_phases(&self) -> MaterialResult<PhaseSet> {
        Ok(self.present_phases_with_status()?.0)
    }

    pub fn present_phases_with_status(&self) -> MaterialResult<(PhaseSet, Vec<PhaseStatus>)> {
        let list = self.binding()?.material().get_present_phases()?;
        let phases = list
            .labels
            .iter()
            .map(|label| match self.allowed.phases.get(label) {
                Some(phase) => phase.clone(),
                None => Phase::with_role(label.as_str(), classify(label)),
            })
            .collect();
        Ok((phases, list.statuses))
    }

    /// Turn on `phases`, each with status unknown.
    pub fn set_present_phases(&self, phases: &PhaseSet) -> MaterialResult<()> {
        let statuses = vec![PhaseStatus::Unknown; phases.len()];
        self.set_present_phases_with_status(phases, &statuses)
    }

    pub fn set_present_phases_with_status(
        &self,
        phases: &PhaseSet,
        statuses: &[PhaseStatus],
    ) -> MaterialResult<()> {
        if statuses.len() != phases.len() {
            return Err(MaterialError::InvalidArg {
                what: format!(
                    "{} phase statuses given for {} phases",
                    statuses.len(),
                    phases.len()
                ),
            });
        }
        self.binding()?
            .material()
            .set_present_phases(&phases.labels(), statuses)?;
        Ok(())
    }

    /// Make every allowed phase present.
    pub(crate) fn widen_present_phases(&self) -> MaterialResult<()> {
        debug!(phases = ?self.allowed.phases.labels(), "present phases widened to allowed phases");
        self.set_present_phases(&self.allowed.phases)
    }

    /// Widen present phases unless every phase in `phases` is already present.
    pub(crate) fn ensure_present(&self, phases: &[&Phase]) -> MaterialResult<()> {
        let present = self.present_phases()?;
        if phases.iter().all(|p| present.contains(p)) {
            return Ok(());
        }
        self.widen_present_phases()
    }

    // ---- compounds ----

    /// Compound ids cached at the last refresh.
    pub fn compounds(&self) -> &[String] {
        &self.compounds
    }

    pub fn compound_count(&self) -> usize {
        self.compounds.len()
    }

    /// Re-read the compound id list from the provider.
    ///
    /// Must be called after the provider's compound list changes; the cache is
    /// never refreshed on its own. Failures leave an empty list.
    pub fn update_compound_list(&mut self) -> &[String] {
        self.compounds = match self.binding.as_ref().and_then(|b| b.compounds()) {
            None => {
                debug!("provider has no compound enumeration");
                Vec::new()
            }
            Some(compounds) => match compounds.get_compound_list() {
                Ok(records) => records.into_iter().map(|r| r.id).collect(),
                Err(e) => {
                    warn!(
                        error = %e,
                        "unable to get compound list, call update_compound_list after it changes"
                    );
                    Vec::new()
                }
            },
        };
        &self.compounds
    }

    /// Full compound records, read fresh from the provider.
    pub fn compound_records(&self) -> MaterialResult<Vec<CompoundRecord>> {
        let compounds = self
            .binding()?
            .compounds()
            .ok_or(MaterialError::CapabilityMissing {
                capability: Capability::Compounds,
            })?;
        Ok(compounds.get_compound_list()?)
    }

    /// Chemical formulas in compound order.
    pub fn formulas(&self) -> MaterialResult<Vec<String>> {
        Ok(self
            .compound_records()?
            .into_iter()
            .map(|r| r.formula)
            .collect())
    }
}

impl Drop for MaterialState {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for MaterialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialState")
            .field("binding", &self.binding)
            .field("allowed", &self.allowed.phases.labels())
            .field("compounds", &self.compounds)
            .finish()
    }
}
