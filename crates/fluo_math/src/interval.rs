/// A closed range `[min, max]` of ray parameters or coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns a copy with the upper bound replaced.
    #[inline]
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// Expands the interval by `padding` on each side.
    pub fn expand(&self, padding: f64) -> Interval {
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Returns true if `other` lies entirely inside this interval.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_expand() {
        let expanded = Interval::new(0.0, 10.0).expand(2.0);

        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
    }

    #[test]
    fn test_interval_with_max() {
        let shrunk = Interval::new(0.5, 100.0).with_max(3.0);
        assert_eq!(shrunk, Interval::new(0.5, 3.0));
    }

    #[test]
    fn test_interval_surrounding() {
        let merged = Interval::surrounding(&Interval::new(1.0, 3.0), &Interval::new(-2.0, 2.0));
        assert_eq!(merged, Interval::new(-2.0, 3.0));
        assert!(merged.contains_interval(&Interval::new(1.0, 3.0)));
        assert!(!Interval::new(1.0, 3.0).contains_interval(&merged));
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;

        assert!(!empty.contains(0.0));
        assert!(!empty.contains(f64::INFINITY));

        // EMPTY is the identity for surrounding
        let a = Interval::new(1.0, 2.0);
        assert_eq!(Interval::surrounding(&empty, &a), a);
    }

    #[test]
    fn test_interval_universe() {
        let universe = Interval::UNIVERSE;

        assert!(universe.contains(0.0));
        assert!(universe.contains(1e300));
        assert!(universe.contains(-1e300));
    }
}
