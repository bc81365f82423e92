use crate::error::Result;
use crate::graph::models::Edge;
use crate::graph::network::Network;

/// Receives change notifications from a [`Network`].
///
/// Callbacks run synchronously, after the change has been applied and before
/// the mutating call returns. The network is only borrowed immutably, so a
/// listener may query it but cannot change it.
pub trait NetworkListener {
    /// A parent -> child edge was added. Listeners registered on a variable
    /// only see edges where that variable is the child.
    fn edge_added(&mut self, _network: &Network, _edge: &Edge) {}

    /// Evidence was set or cleared
    fn network_changed(&mut self, _network: &Network) {}
}

/// Builds a canned network, CPTs included
pub trait ScenarioMaker {
    fn setup_scenario(&self, network: &mut Network) -> Result<()>;
}
