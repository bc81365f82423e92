use std::fmt;

use crate::error::{BayesNetError, Result};

use super::expression::{Assignment, ProbabilityExpression, write_assignments};

/// A partial assignment used to select rows from a CPT.
///
/// An expression passes the filter when every variable the filter mentions
/// either does not appear in the expression or appears with the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbabilityExpressionFilter {
    constraints: Vec<Assignment>,
}

impl ProbabilityExpressionFilter {
    pub fn new(constraints: Vec<Assignment>) -> Result<Self> {
        if constraints.is_empty() {
            return Err(BayesNetError::InvalidArgument(
                "You must specify at least one hypothesis".to_string(),
            ));
        }
        let mut unique: Vec<Assignment> = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            // later values win, as with repeated map insertion
            match unique.iter_mut().find(|c| c.id == constraint.id) {
                Some(existing) => existing.value = constraint.value,
                None => unique.push(constraint),
            }
        }
        Ok(Self { constraints: unique })
    }

    pub fn constraints(&self) -> &[Assignment] {
        &self.constraints
    }

    pub fn value(&self, id: &str) -> Option<bool> {
        self.constraints
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.value)
    }

    pub fn matches(&self, expr: &ProbabilityExpression) -> bool {
        expr.assignments()
            .all(|term| self.value(&term.id).is_none_or(|value| value == term.value))
    }
}

impl fmt::Display for ProbabilityExpressionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P(")?;
        write_assignments(f, &self.constraints)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(text: &str) -> ProbabilityExpression {
        text.parse().unwrap()
    }

    #[test]
    fn test_matches_on_constrained_variables_only() {
        let filter = ProbabilityExpressionFilter::new(vec![Assignment::new("W", true)]).unwrap();
        assert!(filter.matches(&expr("P(W|S,R)")));
        assert!(filter.matches(&expr("P(C)")));
        assert!(filter.matches(&expr("P(S|~C)")));
        assert!(!filter.matches(&expr("P(~W|S,R)")));
    }

    #[test]
    fn test_checks_both_sides() {
        let filter = ProbabilityExpressionFilter::new(vec![
            Assignment::new("C", true),
            Assignment::new("S", false),
        ])
        .unwrap();
        assert!(filter.matches(&expr("P(~S|C)")));
        assert!(!filter.matches(&expr("P(~S|~C)")));
        assert!(!filter.matches(&expr("P(W|S,R)")));
        assert!(filter.matches(&expr("P(W|~S,R)")));
    }

    #[test]
    fn test_display_and_empty() {
        let filter = ProbabilityExpressionFilter::new(vec![
            Assignment::new("C", true),
            Assignment::new("R", false),
        ])
        .unwrap();
        assert_eq!(filter.to_string(), "P(C,~R)");
        assert!(ProbabilityExpressionFilter::new(vec![]).is_err());
    }
}
