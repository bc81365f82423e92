use crate::common::interface::ScenarioMaker;
use crate::error::Result;
use crate::graph::network::Network;

/// A rare disease and an imperfect test for it
pub struct DiseaseNetwork {}

impl ScenarioMaker for DiseaseNetwork {
    fn setup_scenario(&self, network: &mut Network) -> Result<()> {
        network.new_variable("D", Some("Disease"))?;
        network.new_variable("T", Some("Positive Test"))?;
        network.add_child("D", "T")?;

        network.put_probability("D", "P(D)", 0.01)?;
        network.put_probability("T", "P(T|D)", 0.95)?;
        network.put_probability("T", "P(T|~D)", 0.05)?;
        Ok(())
    }
}
