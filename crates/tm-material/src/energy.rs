//! Energy port: named real parameters in an external collection.

use crate::error::{MaterialError, MaterialResult};
use crate::lookup::{find_first, name_matches};
use crate::provider::ProviderResult;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

pub const WORK: &str = "work";
pub const TEMPERATURE_LOW: &str = "temperatureLow";
pub const TEMPERATURE_HIGH: &str = "temperatureHigh";

/// A real-valued parameter owned by the host.
pub trait RealParameter {
    fn name(&self) -> String;

    fn value(&self) -> f64;

    fn set_value(&self, value: f64) -> ProviderResult<()>;
}

/// Ordered parameter collection owned by the host, indexed from zero.
pub trait ParameterCollection {
    fn count(&self) -> usize;

    fn item(&self, index: usize) -> Option<Rc<dyn RealParameter>>;
}

/// A port connected to an energy stream's parameter collection.
///
/// Clones share the connected collection.
#[derive(Clone)]
pub struct EnergyPort {
    name: String,
    collection: Option<Rc<dyn ParameterCollection>>,
}

impl EnergyPort {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connect to `collection`, dropping any previous connection.
    pub fn connect(&mut self, collection: Rc<dyn ParameterCollection>) {
        self.disconnect();
        self.collection = Some(collection);
    }

    pub fn disconnect(&mut self) {
        if self.collection.take().is_some() {
            debug!(port = %self.name, "energy port disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.collection.is_some()
    }

    pub fn connected_collection(&self) -> Option<&Rc<dyn ParameterCollection>> {
        self.collection.as_ref()
    }

    fn collection(&self) -> MaterialResult<&dyn ParameterCollection> {
        self.collection
            .as_deref()
            .ok_or_else(|| MaterialError::Disconnected {
                port: self.name.clone(),
            })
    }

    pub fn len(&self) -> MaterialResult<usize> {
        Ok(self.collection()?.count())
    }

    pub fn is_empty(&self) -> MaterialResult<bool> {
        Ok(self.len()? == 0)
    }

    /// All parameters, in collection order.
    pub fn parameters(&self) -> MaterialResult<Vec<Rc<dyn RealParameter>>> {
        let collection = self.collection()?;
        Ok((0..collection.count())
            .filter_map(|i| collection.item(i))
            .collect())
    }

    pub fn item(&self, index: usize) -> MaterialResult<Option<Rc<dyn RealParameter>>> {
        Ok(self.collection()?.item(index))
    }

    /// First parameter whose name matches `name`, ignoring case.
    pub fn find(&self, name: &str) -> MaterialResult<Option<Rc<dyn RealParameter>>> {
        Ok(find_first(self.parameters()?, |p| name_matches(&p.name(), name)).map(|(_, p)| p))
    }

    /// Value of the named parameter, 0 when the collection lacks it.
    pub fn value_of(&self, name: &str) -> MaterialResult<f64> {
        Ok(self.find(name)?.map(|p| p.value()).unwrap_or(0.0))
    }

    /// Set the named parameter; a missing parameter is an error.
    pub fn set_value_of(&self, name: &str, value: f64) -> MaterialResult<()> {
        let parameter = self
            .find(name)?
            .ok_or_else(|| MaterialError::MissingParameter {
                name: name.to_string(),
            })?;
        parameter.set_value(value)?;
        Ok(())
    }

    pub fn work(&self) -> MaterialResult<f64> {
        self.value_of(WORK)
    }

    pub fn set_work(&self, value: f64) -> MaterialResult<()> {
        self.set_value_of(WORK, value)
    }

    pub fn temperature_low(&self) -> MaterialResult<f64> {
        self.value_of(TEMPERATURE_LOW)
    }

    pub fn set_temperature_low(&self, value: f64) -> MaterialResult<()> {
        self.set_value_of(TEMPERATURE_LOW, value)
    }

    pub fn temperature_high(&self) -> MaterialResult<f64> {
        self.value_of(TEMPERATURE_HIGH)
    }

    pub fn set_temperature_high(&self, value: f64) -> MaterialResult<()> {
        self.set_value_of(TEMPERATURE_HIGH, value)
    }
}

impl fmt::Debug for EnergyPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnergyPort")
            .field("name", &self.name)
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use std::cell::Cell;

    struct Param {
        name: &'static str,
        value: Cell<f64>,
        read_only: bool,
    }

    impl RealParameter for Param {
        fn name(&self) -> String {
            self.name.to_string()
        }

        fn value(&self) -> f64 {
            self.value.get()
        }

        fn set_value(&self, value: f64) -> ProviderResult<()> {
            if self.read_only {
                return Err(ProviderError::new("parameter is read-only"));
            }
            self.value.set(value);
            Ok(())
        }
    }

    struct Params(Vec<Rc<Param>>);

    impl ParameterCollection for Params {
        fn count(&self) -> usize {
            self.0.len()
        }

        fn item(&self, index: usize) -> Option<Rc<dyn RealParameter>> {
            self.0
                .get(index)
                .map(|p| Rc::clone(p) as Rc<dyn RealParameter>)
        }
    }

    fn param(name: &'static str, value: f64) -> Rc<Param> {
        Rc::new(Param {
            name,
            value: Cell::new(value),
            read_only: false,
        })
    }

    fn connected(params: Vec<Rc<Param>>) -> EnergyPort {
        let mut port = EnergyPort::new("Q-in");
        port.connect(Rc::new(Params(params)));
        port
    }

    #[test]
    fn reads_named_values_ignoring_case() {
        let port = connected(vec![param("TemperatureHigh", 450.0), param("WORK", 1200.0)]);
        assert_eq!(port.work().unwrap(), 1200.0);
        assert_eq!(port.temperature_high().unwrap(), 450.0);
        assert_eq!(port.temperature_low().unwrap(), 0.0);
    }

    #[test]
    fn writes_the_matching_parameter() {
        let low = param("temperaturelow", 300.0);
        let work = param("work", 0.0);
        let port = connected(vec![Rc::clone(&low), Rc::clone(&work)]);

        port.set_work(-500.0).unwrap();
        assert_eq!(work.value.get(), -500.0);
        assert_eq!(low.value.get(), 300.0);

        port.set_temperature_low(280.0).unwrap();
        assert_eq!(low.value.get(), 280.0);
    }

    #[test]
    fn writing_missing_parameter_fails() {
        let port = connected(vec![param("work", 0.0)]);
        let err = port.set_temperature_high(500.0).unwrap_err();
        assert!(matches!(err, MaterialError::MissingParameter { .. }));
    }

    #[test]
    fn provider_rejection_is_surfaced() {
        let locked = Rc::new(Param {
            name: "work",
            value: Cell::new(1.0),
            read_only: true,
        });
        let port = connected(vec![locked]);
        assert!(matches!(
            port.set_work(2.0),
            Err(MaterialError::Provider { .. })
        ));
    }

    #[test]
    fn disconnected_port_rejects_access() {
        let mut port = connected(vec![param("work", 1.0)]);
        let clone = port.clone();
        port.disconnect();
        port.disconnect();
        assert!(!port.is_connected());
        assert!(matches!(port.work(), Err(MaterialError::Disconnected { .. })));
        assert_eq!(clone.work().unwrap(), 1.0);
    }
}
