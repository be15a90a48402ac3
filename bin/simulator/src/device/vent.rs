use std::fmt;

/// Louver position of a simulated vent. Bounds are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VentState {
    current_angle: i32,
    min_angle: i32,
    max_angle: i32,
}

impl VentState {
    pub fn new(min_angle: i32, max_angle: i32) -> VentState {
        assert!(min_angle <= max_angle);

        VentState {
            current_angle: min_angle,
            min_angle,
            max_angle,
        }
    }

    pub fn current_angle(&self) -> i32 {
        self.current_angle
    }

    pub fn min_angle(&self) -> i32 {
        self.min_angle
    }

    pub fn max_angle(&self) -> i32 {
        self.max_angle
    }

    pub fn try_set_angle(&mut self, angle: i32) -> std::result::Result<(), OutOfRange> {
        if angle < self.min_angle || angle > self.max_angle {
            return Err(OutOfRange {
                angle,
                min_angle: self.min_angle,
                max_angle: self.max_angle,
            });
        }

        self.current_angle = angle;

        Ok(())
    }
}

impl Default for VentState {
    fn default() -> VentState {
        VentState::new(0, 90)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct OutOfRange {
    pub angle: i32,
    pub min_angle: i32,
    pub max_angle: i32,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "angle {} is out of range {}..={}",
            self.angle, self.min_angle, self.max_angle
        )
    }
}

impl std::error::Error for OutOfRange {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_angle_within_bounds() {
        let mut state = VentState::default();

        state.try_set_angle(45).unwrap();
        assert_eq!(state.current_angle(), 45);

        state.try_set_angle(0).unwrap();
        assert_eq!(state.current_angle(), 0);

        state.try_set_angle(90).unwrap();
        assert_eq!(state.current_angle(), 90);
    }

    #[test]
    fn test_rejects_angle_out_of_bounds() {
        let mut state = VentState::default();
        state.try_set_angle(45).unwrap();

        let error = state.try_set_angle(120).unwrap_err();
        assert_eq!(
            error,
            OutOfRange {
                angle: 120,
                min_angle: 0,
                max_angle: 90,
            }
        );

        let error = state.try_set_angle(-1).unwrap_err();
        assert_eq!(error.angle, -1);

        assert_eq!(state.current_angle(), 45);
    }

    #[test]
    fn test_starts_at_lower_bound() {
        let state = VentState::default();
        assert_eq!(state.current_angle(), 0);
        assert_eq!(state.min_angle(), 0);
        assert_eq!(state.max_angle(), 90);

        let state = VentState::new(10, 30);
        assert_eq!(state.current_angle(), 10);
    }
}
