//! Grade boundary tables and lookup

use thiserror::Error;

/// One row of a grade table: the grade applies to values >= `lower_bound`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBoundary {
    pub name: &'static str,
    pub lower_bound: f64,
}

impl GradeBoundary {
    pub const fn new(name: &'static str, lower_bound: f64) -> Self {
        Self { name, lower_bound }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    #[error("cannot grade a non-finite value ({0})")]
    NotFinite(f64),

    #[error("value {value} is below the lowest grade boundary ({lowest})")]
    BelowLowest { value: f64, lowest: f64 },

    #[error("grade table is empty")]
    EmptyTable,
}

/// Return the name of the greatest boundary not exceeding `value`.
///
/// Tables are ascending by `lower_bound`. The comparison is non-strict, so a
/// value sitting exactly on a boundary receives that boundary's grade.
pub fn get_grade(boundaries: &[GradeBoundary], value: f64) -> Result<&'static str, GradeError> {
    if !value.is_finite() {
        return Err(GradeError::NotFinite(value));
    }

    let lowest = boundaries.first().ok_or(GradeError::EmptyTable)?;

    boundaries
        .iter()
        .rev()
        .find(|b| b.lower_bound <= value)
        .map(|b| b.name)
        .ok_or(GradeError::BelowLowest {
            value,
            lowest: lowest.lower_bound,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[GradeBoundary] = &[
        GradeBoundary::new("C", 0.0),
        GradeBoundary::new("B", 50.0),
        GradeBoundary::new("A", 80.0),
    ];

    #[test]
    fn test_exact_boundary_gets_own_grade() {
        assert_eq!(get_grade(TABLE, 50.0).unwrap(), "B");
        assert_eq!(get_grade(TABLE, 80.0).unwrap(), "A");
        assert_eq!(get_grade(TABLE, 0.0).unwrap(), "C");
    }

    #[test]
    fn test_between_boundaries_rounds_down() {
        assert_eq!(get_grade(TABLE, 49.999).unwrap(), "C");
        assert_eq!(get_grade(TABLE, 79.9).unwrap(), "B");
        assert_eq!(get_grade(TABLE, 1000.0).unwrap(), "A");
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            get_grade(TABLE, -1.0),
            Err(GradeError::BelowLowest {
                value: -1.0,
                lowest: 0.0
            })
        );
        assert!(matches!(get_grade(TABLE, f64::NAN), Err(GradeError::NotFinite(_))));
        assert_eq!(get_grade(&[], 1.0), Err(GradeError::EmptyTable));
    }
}
