//! Overall composition keyed by compound identifier.

use crate::error::{MaterialError, MaterialResult};
use tm_core::numeric::{Tolerances, nearly_equal};

/// Mole fractions keyed by compound id, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    items: Vec<(String, f64)>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (compound id, fraction) pairs; a repeated id replaces the earlier fraction.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut comp = Self::new();
        for (id, fraction) in pairs {
            comp.insert(id, fraction);
        }
        comp
    }

    /// Build from fractions, normalized to sum=1.
    ///
    /// Validates that all fractions are finite, non-negative, and have a positive sum.
    pub fn normalized<I, S>(pairs: I) -> MaterialResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let comp = Self::from_pairs(pairs);
        if comp.items.is_empty() {
            return Err(MaterialError::InvalidArg {
                what: "empty composition".into(),
            });
        }

        let mut sum = 0.0;
        for (id, frac) in &comp.items {
            if !frac.is_finite() || *frac < 0.0 {
                return Err(MaterialError::InvalidArg {
                    what: format!("mole fraction of {id} must be finite and non-negative"),
                });
            }
            sum += frac;
        }
        if sum <= 0.0 || !sum.is_finite() {
            return Err(MaterialError::InvalidArg {
                what: "mole fractions sum to zero or non-finite".into(),
            });
        }

        Ok(Self {
            items: comp.items.into_iter().map(|(id, f)| (id, f / sum)).collect(),
        })
    }

    pub fn insert(&mut self, id: impl Into<String>, fraction: f64) {
        let id = id.into();
        match self.items.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = fraction,
            None => self.items.push((id, fraction)),
        }
    }

    /// Fraction of a compound, if present.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.items
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, f)| *f)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.items.iter().map(|(id, f)| (id.as_str(), *f))
    }

    pub fn sum(&self) -> f64 {
        self.items.iter().map(|(_, f)| f).sum()
    }

    /// Whether the fractions sum to one within `tol`.
    pub fn is_normalized(&self, tol: Tolerances) -> bool {
        nearly_equal(self.sum(), 1.0, tol)
    }

    /// Fractions reordered to `compounds`; missing compounds are zero.
    pub fn ordered_fractions(&self, compounds: &[String]) -> Vec<f64> {
        compounds
            .iter()
            .map(|id| self.get(id).unwrap_or(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorders_to_compound_list() {
        let comp = Composition::from_pairs([("Methane", 0.3), ("Water", 0.7)]);
        let order = vec!["Water".to_string(), "Ethane".to_string(), "Methane".to_string()];
        assert_eq!(comp.ordered_fractions(&order), vec![0.7, 0.0, 0.3]);
    }

    #[test]
    fn repeated_id_replaces() {
        let comp = Composition::from_pairs([("Water", 0.2), ("Water", 0.9)]);
        assert_eq!(comp.len(), 1);
        assert_eq!(comp.get("Water"), Some(0.9));
    }

    #[test]
    fn normalization_non_unit_sum() {
        let comp = Composition::normalized([("O2", 2.0), ("N2", 8.0)]).unwrap();
        let tol = Tolerances {
            abs: 1e-10,
            rel: 1e-10,
        };
        assert!(nearly_equal(comp.get("O2").unwrap(), 0.2, tol));
        assert!(nearly_equal(comp.get("N2").unwrap(), 0.8, tol));
        assert!(comp.is_normalized(tol));
    }

    #[test]
    fn invalid_fractions_rejected() {
        assert!(Composition::normalized([("O2", -0.5), ("N2", 1.5)]).is_err());
        assert!(Composition::normalized([("O2", 0.0), ("N2", 0.0)]).is_err());
        assert!(Composition::normalized([("O2", f64::NAN)]).is_err());
        assert!(Composition::normalized(Vec::<(String, f64)>::new()).is_err());
    }
}
