use log::{debug, trace};

use crate::error::{BayesNetError, Result};
use crate::expr::{Assignment, ParsedQuery, ProbabilityExpressionFilter};
use crate::graph::network::Network;

use super::probability::Probability;

/// Results are rounded to this many significant digits, half up
pub const SIGNIFICANT_DIGITS: u32 = 5;

/// Exact inference by enumerating the full joint distribution.
///
/// `P(H|E)` is computed as `P(H,E) / P(E)`, where each joint term is the sum,
/// over every total assignment agreeing with the fixed variables, of the
/// product of each variable's CPT entry given its parents. The cost is
/// `O(2^(n-k) * n)` for `n` variables of which `k` are fixed.
pub struct Inferencer<'a> {
    network: &'a Network,
}

impl<'a> Inferencer<'a> {
    pub fn new(network: &'a Network) -> Self {
        Self { network }
    }

    pub fn query(&self, query: &ParsedQuery) -> Result<Probability> {
        self.check_terms(query)?;
        let Some(numerator_fixed) = fixed_assignment(query.hypotheses.iter().chain(&query.evidence))
        else {
            debug!("{} fixes a variable to both values, probability is 0", query);
            return Ok(Probability::ZERO);
        };
        let numerator = self.joint_probability(&numerator_fixed)?;

        let result = if query.has_evidence() {
            // evidence is a subset of the numerator terms, so it cannot conflict here
            let denominator_fixed = fixed_assignment(query.evidence.iter()).unwrap_or_default();
            let denominator = self.joint_probability(&denominator_fixed)?;
            if denominator.is_zero() {
                return Err(BayesNetError::UndefinedEvidence(query.to_string()));
            }
            numerator.checked_div(denominator).ok_or_else(|| {
                BayesNetError::InvalidArgument(format!("cannot divide {} by {}", numerator, denominator))
            })?
        } else {
            numerator
        };

        let result = result.round_significant(SIGNIFICANT_DIGITS);
        debug!("{} = {}", query, result);
        Ok(result)
    }

    /// Probability of the fixed assignment, marginalised over every other
    /// variable in the network
    pub fn joint_probability(&self, fixed: &[Assignment]) -> Result<Probability> {
        let variables = self.network.variables();
        if let Some(variable) = variables
            .iter()
            .find(|v| !v.cpt().has_all_required_probabilities())
        {
            return Err(BayesNetError::NotReady(format!(
                "Random variable {} does not have all of its required probabilities set",
                variable.id()
            )));
        }

        let free: Vec<&str> = variables
            .iter()
            .map(|v| v.id())
            .filter(|id| !fixed.iter().any(|a| a.id == *id))
            .collect();
        if fixed.is_empty() && free.is_empty() {
            // empty product
            return Ok(Probability::ONE);
        }
        if free.len() >= usize::BITS as usize {
            return Err(BayesNetError::InvalidArgument(format!(
                "{} free variables is too many to enumerate",
                free.len()
            )));
        }

        let mut total = Probability::ZERO;
        for combination in 0..(1usize << free.len()) {
            let mut assignment = fixed.to_vec();
            assignment.extend(
                free.iter()
                    .enumerate()
                    .map(|(i, id)| Assignment::new(*id, combination >> i & 1 == 0)),
            );
            let filter = ProbabilityExpressionFilter::new(assignment)?;
            let term = self.chain_rule_product(&filter)?;
            trace!("{} -> {}", filter, term);
            total = total.checked_add(term).ok_or_else(|| {
                BayesNetError::InvalidArgument(format!("overflow adding {} to {}", term, total))
            })?;
        }
        Ok(total)
    }

    /// Product over every variable of P(value | parent values) under a total assignment
    fn chain_rule_product(&self, filter: &ProbabilityExpressionFilter) -> Result<Probability> {
        let mut product = Probability::ONE;
        for variable in self.network.variables() {
            let cpt = variable.cpt();
            let rows = cpt.find_expressions(filter);
            let [row] = rows.as_slice() else {
                return Err(BayesNetError::NotReady(format!(
                    "expected one row of the CPT for {} to match {}, found {}",
                    variable.id(),
                    filter,
                    rows.len()
                )));
            };
            let probability = cpt.get_decimal(row)?.ok_or_else(|| {
                BayesNetError::NotReady(format!("{} has no probability for {}", variable.id(), row))
            })?;
            let probability = Probability::from_decimal(probability);
            product = product.checked_mul(probability).ok_or_else(|| {
                BayesNetError::InvalidArgument(format!("overflow multiplying {} by {}", product, probability))
            })?;
            if product.is_zero() {
                break;
            }
        }
        Ok(product)
    }

    /// Queries built by hand skip the parser, so the same checks happen here
    fn check_terms(&self, query: &ParsedQuery) -> Result<()> {
        if query.hypotheses.is_empty() {
            return Err(BayesNetError::InvalidArgument(
                "You must specify at least one hypothesis".to_string(),
            ));
        }
        match query
            .hypotheses
            .iter()
            .chain(&query.evidence)
            .find(|term| !self.network.contains(&term.id))
        {
            Some(term) => Err(BayesNetError::InvalidArgument(format!(
                "A variable with an id of '{}' has not been defined for this network",
                term.id
            ))),
            None => Ok(()),
        }
    }
}

/// Merges terms into one assignment, or `None` if a variable is given both values
fn fixed_assignment<'t>(terms: impl Iterator<Item = &'t Assignment>) -> Option<Vec<Assignment>> {
    let mut fixed: Vec<Assignment> = Vec::new();
    for term in terms {
        match fixed.iter().find(|a| a.id == term.id) {
            Some(existing) if existing.value != term.value => return None,
            Some(_) => {}
            None => fixed.push(term.clone()),
        }
    }
    Some(fixed)
}
