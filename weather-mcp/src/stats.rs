//! Aggregate statistics over small in-memory series.

/// Mean, minimum, and maximum of a numeric series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize a series. Returns `None` for an empty slice so callers can
/// render an explicit "no data" message instead of dividing by zero.
#[must_use]
pub fn summarize(values: &[f64]) -> Option<SeriesSummary> {
    if values.is_empty() {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &value in values {
        min = min.min(value);
        max = max.max(value);
        sum += value;
    }

    #[allow(clippy::cast_precision_loss)]
    Some(SeriesSummary {
        mean: sum / values.len() as f64,
        min,
        max,
    })
}

/// Three-way direction of a time-ordered series where higher values are
/// worse (AQI polarity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
}

impl Trend {
    /// Classify by the sign of `last - first`.
    ///
    /// `Stable` requires an exactly zero delta; any nonzero delta, however
    /// small, is non-stable. This is deliberately coarse and will rarely
    /// report `Stable` on noisy data. Returns `None` for series shorter
    /// than two points.
    #[must_use]
    pub fn classify(series: &[f64]) -> Option<Self> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) if series.len() >= 2 => (*first, *last),
            _ => return None,
        };

        let delta = last - first;
        if delta > 0.0 {
            Some(Self::Worsening)
        } else if delta < 0.0 {
            Some(Self::Improving)
        } else {
            Some(Self::Stable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn summarize_single_value_degenerates() {
        let summary = summarize(&[42.5]).unwrap();
        assert!((summary.mean - 42.5).abs() < f64::EPSILON);
        assert!((summary.min - 42.5).abs() < f64::EPSILON);
        assert!((summary.max - 42.5).abs() < f64::EPSILON);
    }

    #[test]
    fn summarize_series() {
        let summary = summarize(&[2.0, 4.0, 9.0]).unwrap();
        assert!((summary.mean - 5.0).abs() < f64::EPSILON);
        assert!((summary.min - 2.0).abs() < f64::EPSILON);
        assert!((summary.max - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_classification() {
        assert_eq!(Trend::classify(&[10.0, 10.0]), Some(Trend::Stable));
        assert_eq!(Trend::classify(&[10.0, 15.0]), Some(Trend::Worsening));
        assert_eq!(Trend::classify(&[15.0, 10.0]), Some(Trend::Improving));
    }

    #[test]
    fn trend_needs_two_points() {
        assert_eq!(Trend::classify(&[]), None);
        assert_eq!(Trend::classify(&[3.0]), None);
    }

    #[test]
    fn tiny_nonzero_delta_is_not_stable() {
        assert_eq!(
            Trend::classify(&[10.0, 10.000_001]),
            Some(Trend::Worsening)
        );
    }
}
