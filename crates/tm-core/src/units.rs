// tm-core/src/units.rs

use uom::si::f64::{
    Pressure as UomPressure, Ratio as UomRatio,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Pressure in pascal, the unit external property packages exchange.
#[inline]
pub fn pressure_pa(p: Pressure) -> f64 {
    use uom::si::pressure::pascal;
    p.get::<pascal>()
}

/// Temperature in kelvin, the unit external property packages exchange.
#[inline]
pub fn temperature_k(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _r = unitless(0.5);
        assert_eq!(pressure_pa(pa(101_325.0)), 101_325.0);
        assert_eq!(temperature_k(k(300.0)), 300.0);
    }
}
