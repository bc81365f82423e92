use std::rc::Rc;

use crate::common::interface::ScenarioMaker;
use crate::error::{BayesNetError, Result};
use crate::graph::network::Network;

use super::{disease::DiseaseNetwork, sprinkler::SprinklerNetwork};

pub struct ScenarioMakerFactory;

impl ScenarioMakerFactory {
    pub fn new_shared(name: &str) -> Result<Rc<dyn ScenarioMaker>> {
        match name {
            "sprinkler" => Ok(Rc::new(SprinklerNetwork {})),
            "disease" => Ok(Rc::new(DiseaseNetwork {})),
            _ => Err(BayesNetError::InvalidArgument(format!(
                "Unknown ScenarioMaker type '{}'",
                name
            ))),
        }
    }

    /// Build a fresh network for the named scenario
    pub fn build(name: &str) -> Result<Network> {
        let maker = Self::new_shared(name)?;
        let mut network = Network::new();
        maker.setup_scenario(&mut network)?;
        Ok(network)
    }
}
