//! Loosely typed values returned by compound and universal constant queries.

/// A constant as handed back by the provider.
///
/// Depending on the property, a provider answers with a boxed scalar, a
/// single-element vector, or text.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Scalar(f64),
    Vector(Vec<f64>),
    Text(String),
    Empty,
}

impl ConstantValue {
    /// Numeric coercion of a scalar-like value: scalars pass, text is parsed.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Vector(_) | Self::Empty => None,
        }
    }

    /// Unwrap a vector holding at most one element (empty → 0).
    pub fn unwrap_single(&self) -> Option<f64> {
        match self {
            Self::Vector(values) => match values.as_slice() {
                [] => Some(0.0),
                [v] => Some(*v),
                _ => None,
            },
            _ => None,
        }
    }

    /// Scalar coercion first, then single-element vector unwrap.
    pub fn coerce(&self) -> Option<f64> {
        self.as_scalar().or_else(|| self.unwrap_single())
    }
}

impl From<f64> for ConstantValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec<f64>> for ConstantValue {
    fn from(v: Vec<f64>) -> Self {
        Self::Vector(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_text_coerce() {
        assert_eq!(ConstantValue::Scalar(18.02).coerce(), Some(18.02));
        assert_eq!(ConstantValue::Text(" 8.314 ".into()).coerce(), Some(8.314));
        assert_eq!(ConstantValue::Text("water".into()).coerce(), None);
    }

    #[test]
    fn vector_unwraps_single_element() {
        assert_eq!(ConstantValue::Vector(vec![18.02]).coerce(), Some(18.02));
        assert_eq!(ConstantValue::Vector(vec![]).coerce(), Some(0.0));
        assert_eq!(ConstantValue::Vector(vec![1.0, 2.0]).coerce(), None);
        assert_eq!(ConstantValue::Empty.coerce(), None);
    }
}
