#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// The unit interval [0, 1], used for reflectance and display values.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
        assert!(!interval.contains(f64::NAN));
    }

    #[test]
    fn test_interval_surrounds() {
        let hit_range = Interval::new(1e-4, f64::INFINITY);

        // Exclusive bounds - the epsilon itself is rejected
        assert!(!hit_range.surrounds(1e-4));
        assert!(!hit_range.surrounds(0.0));
        assert!(!hit_range.surrounds(-3.0));
        assert!(hit_range.surrounds(2e-4));
        assert!(hit_range.surrounds(1e20));
    }

    #[test]
    fn test_unit_clamp() {
        assert_eq!(Interval::UNIT.clamp(-5.0), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.25), 0.25);
        assert_eq!(Interval::UNIT.clamp(7.5), 1.0);
    }
}
