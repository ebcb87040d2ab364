use crate::TmError;

/// Floating point type used throughout the system.
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparison.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Element-wise `nearly_equal` over two slices of equal length.
pub fn slices_nearly_equal(a: &[Real], b: &[Real], tol: Tolerances) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| nearly_equal(*x, *y, tol))
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TmError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TmError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn slices_compare_length_first() {
        let tol = Tolerances::default();
        assert!(slices_nearly_equal(&[0.5, 0.5], &[0.5, 0.5 + 1e-13], tol));
        assert!(!slices_nearly_equal(&[0.5, 0.5], &[0.5], tol));
        assert!(slices_nearly_equal(&[], &[], tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
