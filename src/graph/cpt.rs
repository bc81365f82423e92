use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{BayesNetError, Result};
use crate::expr::{Assignment, ProbabilityExpression, ProbabilityExpressionFilter};

/// Conditional probability table of a single boolean variable.
///
/// The required rows are `P(v|parents)` and `P(~v|parents)` for every
/// combination of parent values, so a variable with `k` parents needs
/// `2^(k+1)` rows. Callers supply one row of each pair and the table derives
/// its complement as `1 - p`.
#[derive(Debug, Clone)]
pub struct ConditionalProbabilityTable {
    variable: String,
    /// Required rows, in generation order
    expressions: Vec<ProbabilityExpression>,
    probabilities: HashMap<ProbabilityExpression, Decimal>,
}

impl ConditionalProbabilityTable {
    pub(crate) fn new(variable: &str) -> Self {
        let mut table = Self {
            variable: variable.to_string(),
            expressions: Vec::new(),
            probabilities: HashMap::new(),
        };
        table.regenerate(&[]);
        table
    }

    /// Id of the variable that owns this table
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn expressions(&self) -> &[ProbabilityExpression] {
        &self.expressions
    }

    pub fn contains(&self, expr: &ProbabilityExpression) -> bool {
        self.expressions.contains(expr)
    }

    /// Number of rows that currently hold a probability
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn has_all_required_probabilities(&self) -> bool {
        self.probabilities.len() == self.expressions.len()
    }

    /// Required rows that agree with the filter, in generation order
    pub fn find_expressions(&self, filter: &ProbabilityExpressionFilter) -> Vec<&ProbabilityExpression> {
        self.expressions
            .iter()
            .filter(|expr| filter.matches(expr))
            .collect()
    }

    /// Returns `Ok(None)` for a valid row that has not been filled in yet,
    /// and an error when the expression is not a row of this table at all.
    pub fn get_decimal(&self, expr: &ProbabilityExpression) -> Result<Option<Decimal>> {
        self.check_row(expr)?;
        Ok(self.probabilities.get(expr).copied())
    }

    pub fn get(&self, expr: &ProbabilityExpression) -> Result<Option<f64>> {
        Ok(self.get_decimal(expr)?.and_then(|p| p.to_f64()))
    }

    pub fn put(&mut self, expr: &ProbabilityExpression, probability: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(BayesNetError::InvalidArgument(format!(
                "prob must be between 0.0 and 1.0, got {}",
                probability
            )));
        }
        let decimal = Decimal::from_str(&probability.to_string()).map_err(|e| {
            BayesNetError::InvalidArgument(format!("Cannot represent {}: {}", probability, e))
        })?;
        self.put_decimal(expr, decimal)
    }

    /// Stores `probability` for `expr` and `1 - probability` for the row with
    /// the owning variable's value flipped.
    pub fn put_decimal(&mut self, expr: &ProbabilityExpression, probability: Decimal) -> Result<()> {
        if probability < Decimal::ZERO || probability > Decimal::ONE {
            return Err(BayesNetError::InvalidArgument(format!(
                "prob must be between 0.0 and 1.0, got {}",
                probability
            )));
        }
        self.check_row(expr)?;
        let value = expr.hypothesis(&self.variable).ok_or_else(|| {
            BayesNetError::InvalidArgument(format!("{} has no hypothesis for {}", expr, self.variable))
        })?;
        let complement = expr.with_hypothesis(&self.variable, !value)?;

        self.probabilities.insert(expr.clone(), probability);
        self.probabilities.insert(complement, Decimal::ONE - probability);
        Ok(())
    }

    /// Discards every stored probability and rebuilds the required rows for
    /// the given parents. Parent order determines row order.
    pub(crate) fn regenerate(&mut self, parents: &[String]) {
        self.expressions.clear();
        self.probabilities.clear();

        let k = parents.len();
        for combination in 0..(1usize << k) {
            let evidence: Vec<Assignment> = parents
                .iter()
                .enumerate()
                .map(|(i, parent)| Assignment::new(parent.clone(), combination >> (k - 1 - i) & 1 == 0))
                .collect();
            for value in [true, false] {
                self.expressions.push(ProbabilityExpression::from_unique(
                    vec![Assignment::new(self.variable.clone(), value)],
                    evidence.clone(),
                ));
            }
        }
        debug!(
            "regenerated CPT for {} with {} parents: {} rows required",
            self.variable,
            k,
            self.expressions.len()
        );
    }

    fn check_row(&self, expr: &ProbabilityExpression) -> Result<()> {
        if !self.contains(expr) {
            return Err(BayesNetError::InvalidArgument(format!(
                "The probability expression {} is not valid for variable {}",
                expr, self.variable
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ConditionalProbabilityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for expr in &self.expressions {
            match self.probabilities.get(expr) {
                Some(p) => writeln!(f, "{} = {}", expr, p)?,
                None => writeln!(f, "{} = ?", expr)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(text: &str) -> ProbabilityExpression {
        text.parse().unwrap()
    }

    fn parents(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_root_table() {
        let mut cpt = ConditionalProbabilityTable::new("C");
        assert_eq!(cpt.expressions().len(), 2);
        assert!(cpt.contains(&expr("P(C)")));
        assert!(cpt.contains(&expr("P(~C)")));
        assert!(!cpt.has_all_required_probabilities());

        cpt.put(&expr("P(C)"), 0.5).unwrap();
        assert!(cpt.has_all_required_probabilities());
        assert_eq!(cpt.get(&expr("P(C)")).unwrap(), Some(0.5));
        assert_eq!(cpt.get(&expr("P(~C)")).unwrap(), Some(0.5));
    }

    #[test]
    fn test_row_order_follows_parents() {
        let mut cpt = ConditionalProbabilityTable::new("W");
        cpt.regenerate(&parents(&["S", "R"]));
        let rows: Vec<String> = cpt.expressions().iter().map(|e| e.to_string()).collect();
        assert_eq!(
            rows,
            vec![
                "P(W|S,R)",
                "P(~W|S,R)",
                "P(W|S,~R)",
                "P(~W|S,~R)",
                "P(W|~S,R)",
                "P(~W|~S,R)",
                "P(W|~S,~R)",
                "P(~W|~S,~R)",
            ]
        );
    }

    #[test]
    fn test_complement_is_exact() {
        let mut cpt = ConditionalProbabilityTable::new("W");
        cpt.regenerate(&parents(&["S", "R"]));
        cpt.put(&expr("P(W|S,R)"), 0.99).unwrap();
        cpt.put(&expr("P(W|~S,~R)"), 0.0).unwrap();

        let positive = cpt.get_decimal(&expr("P(W|S,R)")).unwrap().unwrap();
        let negative = cpt.get_decimal(&expr("P(~W|S,R)")).unwrap().unwrap();
        assert_eq!(positive + negative, Decimal::ONE);
        assert_eq!(cpt.get(&expr("P(~W|S,R)")).unwrap(), Some(0.01));
        assert_eq!(cpt.get(&expr("P(~W|~S,~R)")).unwrap(), Some(1.0));

        // evidence order does not matter for lookups
        assert_eq!(cpt.get(&expr("P(~W|R,S)")).unwrap(), Some(0.01));
    }

    #[test]
    fn test_unfilled_vs_invalid_rows() {
        let mut cpt = ConditionalProbabilityTable::new("S");
        cpt.regenerate(&parents(&["C"]));
        assert_eq!(cpt.get(&expr("P(S|C)")).unwrap(), None);
        assert!(matches!(
            cpt.get(&expr("P(S)")),
            Err(BayesNetError::InvalidArgument(_))
        ));
        assert!(matches!(
            cpt.put(&expr("P(S|R)"), 0.3),
            Err(BayesNetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_probability_range() {
        let mut cpt = ConditionalProbabilityTable::new("C");
        for p in [-0.1, 1.01, f64::NAN] {
            assert!(matches!(
                cpt.put(&expr("P(C)"), p),
                Err(BayesNetError::InvalidArgument(_))
            ));
        }
        assert!(cpt.is_empty());
    }

    #[test]
    fn test_all_required_after_each_pair() {
        let mut cpt = ConditionalProbabilityTable::new("S");
        cpt.regenerate(&parents(&["C"]));
        cpt.put(&expr("P(S|C)"), 0.1).unwrap();
        assert_eq!(cpt.len(), 2);
        assert!(!cpt.has_all_required_probabilities());
        cpt.put(&expr("P(~S|~C)"), 0.5).unwrap();
        assert_eq!(cpt.len(), 4);
        assert!(cpt.has_all_required_probabilities());

        cpt.regenerate(&parents(&["C", "R"]));
        assert!(cpt.is_empty());
        assert_eq!(cpt.expressions().len(), 8);
        assert!(!cpt.has_all_required_probabilities());
    }

    #[test]
    fn test_find_expressions() {
        let mut cpt = ConditionalProbabilityTable::new("S");
        cpt.regenerate(&parents(&["C"]));
        let filter = ProbabilityExpressionFilter::new(vec![Assignment::new("W", true)]).unwrap();
        assert_eq!(cpt.find_expressions(&filter).len(), 4);

        let filter = ProbabilityExpressionFilter::new(vec![
            Assignment::new("C", true),
            Assignment::new("S", true),
            Assignment::new("W", true),
        ])
        .unwrap();
        let matches = cpt.find_expressions(&filter);
        assert_eq!(matches, vec![&expr("P(S|C)")]);
    }
}
