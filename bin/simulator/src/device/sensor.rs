use rand::Rng;

/// Temperature reading of a simulated sensor. Only the sensor's own
/// telemetry cycle mutates it, never inbound messages.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    current_temp: f64,
}

impl SensorState {
    pub fn new(current_temp: f64) -> SensorState {
        SensorState { current_temp }
    }

    pub fn current_temp(&self) -> f64 {
        self.current_temp
    }

    /// Applies a random perturbation in [-2.0, 2.0) and returns the new
    /// temperature at full precision.
    pub fn drift(&mut self) -> f64 {
        self.current_temp += rand::rng().random_range(-2.0..2.0);
        self.current_temp
    }
}

impl Default for SensorState {
    fn default() -> SensorState {
        SensorState::new(20.0)
    }
}
