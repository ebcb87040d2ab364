//! Material facade options.

/// Options applied when a material is bound to a provider.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaterialOptions {
    /// A solid-labelled phase also takes the Liquid role slot.
    ///
    /// Legacy behavior of CAPE-OPEN 1.1 material wrappers; the dedicated Solid
    /// role is assigned either way.
    pub legacy_solid_alias: bool,

    /// Phases assumed when the provider cannot enumerate its own, in
    /// (vapor, liquid) order.
    pub fallback_phases: Vec<String>,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            legacy_solid_alias: true,
            fallback_phases: vec!["Vapor".to_string(), "Liquid".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_behavior() {
        let opts = MaterialOptions::default();
        assert!(opts.legacy_solid_alias);
        assert_eq!(opts.fallback_phases, vec!["Vapor", "Liquid"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_keeps_defaults() {
        let opts: MaterialOptions =
            serde_json::from_str(r#"{ "legacy_solid_alias": false }"#).unwrap();
        assert!(!opts.legacy_solid_alias);
        assert_eq!(opts.fallback_phases, vec!["Vapor", "Liquid"]);
    }
}
