use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{BayesNetError, Result};

use super::parser::Parser;

/// A variable id bound to a truth value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment {
    pub id: String,
    pub value: bool,
}

impl Assignment {
    pub fn new(id: impl Into<String>, value: bool) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.value {
            write!(f, "~")?;
        }
        write!(f, "{}", self.id)
    }
}

pub(crate) fn write_assignments(f: &mut fmt::Formatter<'_>, assignments: &[Assignment]) -> fmt::Result {
    for (i, assignment) in assignments.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", assignment)?;
    }
    Ok(())
}

/// The terms of a query exactly as written, before any validation.
///
/// Unlike [`ProbabilityExpression`], a variable may appear on both sides of
/// the `|` here, and even twice with opposite values. The inference engine
/// works from these terms so that queries such as `P(C|C)` or `P(C|~C)`
/// have a defined answer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    pub hypotheses: Vec<Assignment>,
    pub evidence: Vec<Assignment>,
}

impl ParsedQuery {
    pub fn has_evidence(&self) -> bool {
        !self.evidence.is_empty()
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P(")?;
        write_assignments(f, &self.hypotheses)?;
        if self.has_evidence() {
            write!(f, "|")?;
            write_assignments(f, &self.evidence)?;
        }
        write!(f, ")")
    }
}

/// An immutable probability expression such as `P(W|S,~R)`.
///
/// Holds at least one hypothesis and any number of evidence terms. A
/// variable id appears at most once across both sides. Equality and hashing
/// depend only on the id/value pairs of each side, never on the order they
/// were supplied in; that order is kept for display.
#[derive(Debug, Clone)]
pub struct ProbabilityExpression {
    hypotheses: Vec<Assignment>,
    evidence: Vec<Assignment>,
}

impl ProbabilityExpression {
    pub fn new(hypotheses: Vec<Assignment>, evidence: Vec<Assignment>) -> Result<Self> {
        let hypotheses = dedup(hypotheses)?;
        let evidence = dedup(evidence)?;
        if hypotheses.is_empty() {
            return Err(BayesNetError::InvalidArgument(
                "You must specify at least one hypothesis".to_string(),
            ));
        }
        if let Some(shared) = hypotheses
            .iter()
            .find(|h| evidence.iter().any(|e| e.id == h.id))
        {
            return Err(BayesNetError::InvalidArgument(format!(
                "You cannot reference the same variable '{}' as a hypothesis and as evidence",
                shared.id
            )));
        }
        Ok(Self {
            hypotheses,
            evidence,
        })
    }

    /// Builds an expression from terms already known to be unique and disjoint
    pub(crate) fn from_unique(hypotheses: Vec<Assignment>, evidence: Vec<Assignment>) -> Self {
        debug_assert!(!hypotheses.is_empty());
        Self {
            hypotheses,
            evidence,
        }
    }

    /// Parses an expression without checking that its variables exist anywhere
    pub fn parse(text: &str) -> Result<Self> {
        Parser::unbound().parse(text)
    }

    pub fn hypotheses(&self) -> &[Assignment] {
        &self.hypotheses
    }

    pub fn evidence(&self) -> &[Assignment] {
        &self.evidence
    }

    pub fn has_evidence(&self) -> bool {
        !self.evidence.is_empty()
    }

    pub fn hypothesis(&self, id: &str) -> Option<bool> {
        lookup(&self.hypotheses, id)
    }

    pub fn evidence_value(&self, id: &str) -> Option<bool> {
        lookup(&self.evidence, id)
    }

    /// Every term of the expression, hypotheses first
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.hypotheses.iter().chain(self.evidence.iter())
    }

    /// A copy with the hypothesis `id` set to `value`, keeping its position
    pub fn with_hypothesis(&self, id: &str, value: bool) -> Result<Self> {
        let mut hypotheses = self.hypotheses.clone();
        match hypotheses.iter_mut().find(|h| h.id == id) {
            Some(existing) => existing.value = value,
            None => hypotheses.push(Assignment::new(id, value)),
        }
        Self::new(hypotheses, self.evidence.clone())
    }

    fn sorted_terms(&self) -> (Vec<&Assignment>, Vec<&Assignment>) {
        let mut hypotheses: Vec<&Assignment> = self.hypotheses.iter().collect();
        let mut evidence: Vec<&Assignment> = self.evidence.iter().collect();
        hypotheses.sort();
        evidence.sort();
        (hypotheses, evidence)
    }
}

fn lookup(assignments: &[Assignment], id: &str) -> Option<bool> {
    assignments.iter().find(|a| a.id == id).map(|a| a.value)
}

/// Drops repeated terms, rejecting a variable given two different values
fn dedup(assignments: Vec<Assignment>) -> Result<Vec<Assignment>> {
    let mut result: Vec<Assignment> = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        match result.iter().find(|a| a.id == assignment.id) {
            Some(existing) if existing.value != assignment.value => {
                return Err(BayesNetError::InvalidArgument(format!(
                    "Variable '{}' is assigned both true and false",
                    assignment.id
                )));
            }
            Some(_) => {}
            None => result.push(assignment),
        }
    }
    Ok(result)
}

impl TryFrom<ParsedQuery> for ProbabilityExpression {
    type Error = BayesNetError;

    fn try_from(query: ParsedQuery) -> Result<Self> {
        ProbabilityExpression::new(query.hypotheses, query.evidence)
    }
}

impl FromStr for ProbabilityExpression {
    type Err = BayesNetError;

    fn from_str(s: &str) -> Result<Self> {
        ProbabilityExpression::parse(s)
    }
}

impl PartialEq for ProbabilityExpression {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_terms() == other.sorted_terms()
    }
}

impl Eq for ProbabilityExpression {}

impl Hash for ProbabilityExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_terms().hash(state);
    }
}

impl fmt::Display for ProbabilityExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P(")?;
        write_assignments(f, &self.hypotheses)?;
        if self.has_evidence() {
            write!(f, "|")?;
            write_assignments(f, &self.evidence)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_order() {
        let a: ProbabilityExpression = "P(C,~S,R,~W)".parse().unwrap();
        let b: ProbabilityExpression = "P(C,R,~S,~W)".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "P(C,~S,R,~W)");
        assert_eq!(b.to_string(), "P(C,R,~S,~W)");

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_sides_are_distinct() {
        let a: ProbabilityExpression = "P(C|S)".parse().unwrap();
        let b: ProbabilityExpression = "P(C,S)".parse().unwrap();
        let c: ProbabilityExpression = "P(C|~S)".parse().unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_requires_a_hypothesis() {
        let err = ProbabilityExpression::new(vec![], vec![Assignment::new("C", true)]).unwrap_err();
        assert!(matches!(err, BayesNetError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_variable_on_both_sides() {
        let err = ProbabilityExpression::new(
            vec![Assignment::new("C", true)],
            vec![Assignment::new("C", true)],
        )
        .unwrap_err();
        assert!(matches!(err, BayesNetError::InvalidArgument(_)));
        assert!("P(C|~C)".parse::<ProbabilityExpression>().is_err());
    }

    #[test]
    fn test_duplicate_terms() {
        let expr: ProbabilityExpression = "P(C,C|S)".parse().unwrap();
        assert_eq!(expr.to_string(), "P(C|S)");
        assert!("P(C,~C)".parse::<ProbabilityExpression>().is_err());
    }

    #[test]
    fn test_with_hypothesis_flips_in_place() {
        let expr: ProbabilityExpression = "P(W|S,~R)".parse().unwrap();
        let flipped = expr.with_hypothesis("W", false).unwrap();
        assert_eq!(flipped.to_string(), "P(~W|S,~R)");
        assert_eq!(flipped.hypothesis("W"), Some(false));
        assert_eq!(flipped.evidence_value("R"), Some(false));
        assert_eq!(flipped.evidence_value("W"), None);
    }
}
