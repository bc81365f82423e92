use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use log::debug;
use rust_decimal::Decimal;

use crate::common::interface::NetworkListener;
use crate::error::{BayesNetError, Result};
use crate::expr::{Assignment, ParsedQuery, Parser, ProbabilityExpression};
use crate::inference::{Inferencer, Probability};

use super::cpt::ConditionalProbabilityTable;
use super::events::{self, ListenerId, ListenerRegistry, Scope};
use super::models::{Direction, Edge, Marginal, MarginalTable, RandomVariable};

/// A Bayesian network of boolean random variables.
///
/// The network owns every variable, the parent/child edges between them
/// (kept acyclic), the current evidence and the registered listeners.
/// Variables and edges are never removed once added.
pub struct Network {
    /// Variables in definition order
    variables: Vec<RandomVariable>,
    index: HashMap<String, usize>,
    /// Parent ids per child, in the order the edges were added
    parents_by_child: HashMap<String, Vec<String>>,
    /// Child ids per parent, in the order the edges were added
    children_by_parent: HashMap<String, Vec<String>>,
    evidence: BTreeMap<String, bool>,
    listeners: ListenerRegistry,
}

impl Network {
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            index: HashMap::new(),
            parents_by_child: HashMap::new(),
            children_by_parent: HashMap::new(),
            evidence: BTreeMap::new(),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Define a new variable. The id must be a word of the query language
    /// (a letter followed by letters or digits); the label defaults to the id.
    pub fn new_variable(&mut self, id: &str, label: Option<&str>) -> Result<&RandomVariable> {
        if !is_word(id) {
            return Err(BayesNetError::InvalidArgument(format!(
                "'{}' is not a valid variable id",
                id
            )));
        }
        if self.contains(id) {
            return Err(BayesNetError::InvalidArgument(format!(
                "A variable with an id of '{}' is already defined",
                id
            )));
        }
        debug!("defining variable {} ({})", id, label.unwrap_or(id));
        let position = self.variables.len();
        self.variables.push(RandomVariable::new(id, label));
        self.index.insert(id.to_string(), position);
        Ok(&self.variables[position])
    }

    pub fn variables(&self) -> &[RandomVariable] {
        &self.variables
    }

    pub fn variable(&self, id: &str) -> Option<&RandomVariable> {
        self.index.get(id).map(|&i| &self.variables[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Add a parent -> child edge.
    ///
    /// Fails with [`BayesNetError::Cycle`] if the edge is a self-loop or if
    /// `parent` can already be reached from `child`. On success the child's
    /// CPT is regenerated for its new parent set (all of its probabilities
    /// are discarded) and listeners are notified.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        let child_position = self.require(child)?;
        self.require(parent)?;
        if parent == child || self.is_reachable(child, parent) {
            return Err(BayesNetError::Cycle {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }
        if self.parents(child).iter().any(|p| p == parent) {
            return Err(BayesNetError::InvalidArgument(format!(
                "An edge from '{}' to '{}' already exists",
                parent, child
            )));
        }

        self.children_by_parent
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
        let parents = self.parents_by_child.entry(child.to_string()).or_default();
        parents.push(parent.to_string());
        let parents = parents.clone();
        debug!("added edge {} -> {}", parent, child);

        // the child's own table is always the first to react
        self.variables[child_position].cpt_mut().regenerate(&parents);

        let edge = Edge::new(parent, child);
        let mut registrations = self.listeners.take();
        events::deliver_edge(&mut registrations, self, &edge);
        self.listeners.restore(registrations);
        Ok(())
    }

    /// Make `child` a child of `parent`; same as [`Network::add_edge`]
    pub fn add_child(&mut self, parent: &str, child: &str) -> Result<()> {
        self.add_edge(parent, child)
    }

    /// Parent ids of a variable, in the order the edges were added
    pub fn parents(&self, id: &str) -> &[String] {
        self.parents_by_child.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Child ids of a variable, in the order the edges were added
    pub fn children(&self, id: &str) -> &[String] {
        self.children_by_parent.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_parents(&self, id: &str) -> bool {
        !self.parents(id).is_empty()
    }

    pub fn has_children(&self, id: &str) -> bool {
        !self.children(id).is_empty()
    }

    /// Get neighboring variables in the specified direction
    pub fn neighbors(&self, id: &str, direction: Direction) -> Vec<&RandomVariable> {
        let ids: Vec<&String> = match direction {
            Direction::Outgoing => self.children(id).iter().collect(),
            Direction::Incoming => self.parents(id).iter().collect(),
            Direction::Both => self.parents(id).iter().chain(self.children(id)).collect(),
        };
        ids.into_iter().filter_map(|id| self.variable(id)).collect()
    }

    /// Every edge, grouped by child in variable definition order
    pub fn edges(&self) -> Vec<Edge> {
        self.variables
            .iter()
            .flat_map(|child| {
                self.parents(child.id())
                    .iter()
                    .map(move |parent| Edge::new(parent, child.id()))
            })
            .collect()
    }

    pub fn cpt(&self, id: &str) -> Result<&ConditionalProbabilityTable> {
        let position = self.require(id)?;
        Ok(self.variables[position].cpt())
    }

    pub fn cpt_mut(&mut self, id: &str) -> Result<&mut ConditionalProbabilityTable> {
        let position = self.require(id)?;
        Ok(self.variables[position].cpt_mut())
    }

    /// Fill in a CPT row of `id` from a query string, e.g. `P(S|~C)`
    pub fn put_probability(&mut self, id: &str, expr: &str, probability: f64) -> Result<()> {
        let expr = self.parse(expr)?;
        self.cpt_mut(id)?.put(&expr, probability)
    }

    /// Parse an expression whose variables must all be defined here
    pub fn parse(&self, text: &str) -> Result<ProbabilityExpression> {
        Parser::bound(self).parse(text)
    }

    pub fn parse_query(&self, text: &str) -> Result<ParsedQuery> {
        Parser::bound(self).parse_query(text)
    }

    pub fn set_evidence(&mut self, id: &str, value: bool) -> Result<()> {
        self.require(id)?;
        debug!("setting evidence {}={}", id, value);
        self.evidence.insert(id.to_string(), value);
        self.notify_changed();
        Ok(())
    }

    pub fn clear_evidence(&mut self, id: &str) -> Result<()> {
        self.require(id)?;
        debug!("clearing evidence for {}", id);
        self.evidence.remove(id);
        self.notify_changed();
        Ok(())
    }

    pub fn clear_all_evidence(&mut self) {
        debug!("clearing all evidence");
        self.evidence.clear();
        self.notify_changed();
    }

    /// Current evidence, ordered by variable id
    pub fn evidence(&self) -> &BTreeMap<String, bool> {
        &self.evidence
    }

    pub fn has_evidence(&self) -> bool {
        !self.evidence.is_empty()
    }

    /// Register a listener for every notification
    pub fn add_listener(&mut self, listener: Box<dyn NetworkListener>) -> ListenerId {
        self.listeners.register(Scope::Network, listener)
    }

    /// Register a listener that only hears about new parents of `id`
    pub fn add_variable_listener(
        &mut self,
        id: &str,
        listener: Box<dyn NetworkListener>,
    ) -> Result<ListenerId> {
        self.require(id)?;
        Ok(self.listeners.register(Scope::Variable(id.to_string()), listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// True once every CPT holds all of its required probabilities
    pub fn is_ready(&self) -> bool {
        self.variables
            .iter()
            .all(|v| v.cpt().has_all_required_probabilities())
    }

    /// Evaluate a query such as `P(S|W)`
    pub fn query(&self, text: &str) -> Result<f64> {
        to_f64(self.query_probability(text)?)
    }

    /// Like [`Network::query`], but fails when the answer is too small for a `Decimal`
    pub fn query_decimal(&self, text: &str) -> Result<Decimal> {
        let probability = self.query_probability(text)?;
        probability.to_decimal().ok_or_else(|| {
            BayesNetError::InvalidArgument(format!(
                "{} = {} cannot be represented as a Decimal",
                text, probability
            ))
        })
    }

    pub fn query_probability(&self, text: &str) -> Result<Probability> {
        self.check_ready()?;
        let query = self.parse_query(text)?;
        Inferencer::new(self).query(&query)
    }

    /// Probability that `id` is true given the current evidence
    pub fn probability(&self, id: &str) -> Result<f64> {
        self.require(id)?;
        self.check_ready()?;
        let query = ParsedQuery {
            hypotheses: vec![Assignment::new(id, true)],
            evidence: self.evidence_assignments(),
        };
        to_f64(Inferencer::new(self).query(&query)?)
    }

    /// Every variable's probability given the current evidence
    pub fn marginals(&self) -> Result<MarginalTable> {
        let mut entries = Vec::with_capacity(self.variables.len());
        for variable in &self.variables {
            entries.push(Marginal {
                id: variable.id().to_string(),
                label: variable.label().to_string(),
                probability: self.probability(variable.id())?,
            });
        }
        let evidence = self
            .evidence_assignments()
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Ok(MarginalTable { evidence, entries })
    }

    fn evidence_assignments(&self) -> Vec<Assignment> {
        self.evidence
            .iter()
            .map(|(id, &value)| Assignment::new(id.as_str(), value))
            .collect()
    }

    fn check_ready(&self) -> Result<()> {
        match self
            .variables
            .iter()
            .find(|v| !v.cpt().has_all_required_probabilities())
        {
            Some(variable) => Err(BayesNetError::NotReady(format!(
                "Random variable {} does not have all of its required probabilities set",
                variable.id()
            ))),
            None => Ok(()),
        }
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.index.get(id).copied().ok_or_else(|| {
            BayesNetError::InvalidArgument(format!(
                "A variable with an id of '{}' has not been defined for this network",
                id
            ))
        })
    }

    /// Depth-first search along child edges
    fn is_reachable(&self, from: &str, target: &str) -> bool {
        let mut stack = vec![from];
        let mut visited = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.children(current).iter().map(String::as_str));
            }
        }
        false
    }

    fn notify_changed(&mut self) {
        let mut registrations = self.listeners.take();
        events::deliver_change(&mut registrations, self);
        self.listeners.restore(registrations);
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("variables", &self.variables.iter().map(|v| v.id()).collect::<Vec<_>>())
            .field("edges", &self.edges())
            .field("evidence", &self.evidence)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn is_word(id: &str) -> bool {
    let mut chars = id.chars();
    chars.next().is_some_and(char::is_alphabetic) && chars.all(char::is_alphanumeric)
}

fn to_f64(value: Probability) -> Result<f64> {
    value.to_f64().ok_or_else(|| {
        BayesNetError::InvalidArgument(format!("{} cannot be represented as f64", value))
    })
}
