use crate::common::interface::ScenarioMaker;
use crate::error::Result;
use crate::graph::network::Network;

/// Cloudy weather drives both the sprinkler and the rain, either of which
/// wets the grass.
pub struct SprinklerNetwork {}

impl ScenarioMaker for SprinklerNetwork {
    fn setup_scenario(&self, network: &mut Network) -> Result<()> {
        network.new_variable("C", Some("Cloudy"))?;
        network.new_variable("S", Some("Sprinkler"))?;
        network.new_variable("R", Some("Raining"))?;
        network.new_variable("W", Some("Wet Grass"))?;

        network.add_child("C", "S")?;
        network.add_child("C", "R")?;
        network.add_child("S", "W")?;
        network.add_child("R", "W")?;

        network.put_probability("C", "P(C)", 0.5)?;

        network.put_probability("S", "P(S|C)", 0.1)?;
        network.put_probability("S", "P(S|~C)", 0.5)?;

        network.put_probability("R", "P(R|C)", 0.8)?;
        network.put_probability("R", "P(R|~C)", 0.2)?;

        network.put_probability("W", "P(W|S,R)", 0.99)?;
        network.put_probability("W", "P(W|S,~R)", 0.9)?;
        network.put_probability("W", "P(W|~S,R)", 0.9)?;
        network.put_probability("W", "P(W|~S,~R)", 0.0)?;
        Ok(())
    }
}
