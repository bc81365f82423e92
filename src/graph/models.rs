use serde::{Deserialize, Serialize};
use std::fmt;

use super::cpt::ConditionalProbabilityTable;

/// Direction enum for specifying edge traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Children of the variable
    Outgoing,
    /// Parents of the variable
    Incoming,
    /// Parents followed by children
    Both,
}

/// A boolean random variable in the network
#[derive(Debug, Clone)]
pub struct RandomVariable {
    /// Unique identifier, as used in query strings
    id: String,
    /// Human readable name
    label: String,
    cpt: ConditionalProbabilityTable,
}

impl RandomVariable {
    /// Create a new variable; the label defaults to the id
    pub(crate) fn new(id: &str, label: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.unwrap_or(id).to_string(),
            cpt: ConditionalProbabilityTable::new(id),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cpt(&self) -> &ConditionalProbabilityTable {
        &self.cpt
    }

    pub(crate) fn cpt_mut(&mut self) -> &mut ConditionalProbabilityTable {
        &mut self.cpt
    }
}

impl fmt::Display for RandomVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Edge connecting a parent variable to a child variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// ID of the parent variable
    pub parent: String,
    /// ID of the child variable
    pub child: String,
}

impl Edge {
    pub fn new(parent: &str, child: &str) -> Self {
        Self {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }
}

/// Probability of a single variable being true under the current evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marginal {
    pub id: String,
    pub label: String,
    pub probability: f64,
}

/// Marginals of every variable, in definition order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginalTable {
    /// The evidence the marginals were conditioned on, e.g. `W,~C`
    pub evidence: String,
    pub entries: Vec<Marginal>,
}

impl MarginalTable {
    pub fn get(&self, id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.probability)
    }

    pub fn render_marginal_table(&self) -> String {
        let width = self
            .entries
            .iter()
            .map(|m| m.label.len() + m.id.len() + 3)
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        if !self.evidence.is_empty() {
            out.push_str(&format!("given {}\n", self.evidence));
        }
        for marginal in &self.entries {
            let name = format!("{} ({})", marginal.label, marginal.id);
            out.push_str(&format!("{:<width$} = {:.5}\n", name, marginal.probability, width = width));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_creation() {
        let var = RandomVariable::new("W", Some("Wet Grass"));
        assert_eq!(var.id(), "W");
        assert_eq!(var.label(), "Wet Grass");
        assert_eq!(var.cpt().variable(), "W");
        assert_eq!(var.cpt().expressions().len(), 2);

        // label falls back to the id
        let var = RandomVariable::new("C", None);
        assert_eq!(var.label(), "C");
        assert_eq!(var.to_string(), "C");
    }

    #[test]
    fn test_marginal_table() {
        let table = MarginalTable {
            evidence: "W".to_string(),
            entries: vec![
                Marginal {
                    id: "C".to_string(),
                    label: "Cloudy".to_string(),
                    probability: 0.5758,
                },
                Marginal {
                    id: "W".to_string(),
                    label: "Wet Grass".to_string(),
                    probability: 1.0,
                },
            ],
        };
        assert_eq!(table.get("C"), Some(0.5758));
        assert_eq!(table.get("X"), None);

        let rendered = table.render_marginal_table();
        assert!(rendered.starts_with("given W\n"));
        assert!(rendered.contains("Cloudy (C)"));
        assert!(rendered.contains("= 1.00000"));

        let json = serde_json::to_string(&table).unwrap();
        let back: MarginalTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
