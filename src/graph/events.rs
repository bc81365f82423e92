use crate::common::interface::NetworkListener;

use super::models::Edge;

/// Handle returned when a listener is registered, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a registered listener wants to hear about
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Every notification
    Network,
    /// Only edges whose child is this variable
    Variable(String),
}

impl Scope {
    fn accepts_edge(&self, edge: &Edge) -> bool {
        match self {
            Scope::Network => true,
            Scope::Variable(id) => *id == edge.child,
        }
    }

    fn accepts_change(&self) -> bool {
        matches!(self, Scope::Network)
    }
}

pub(crate) struct Registration {
    id: ListenerId,
    scope: Scope,
    listener: Box<dyn NetworkListener>,
}

/// Listeners in registration order.
///
/// Dispatch is driven by the network: it takes the registrations out with
/// [`ListenerRegistry::take`], calls [`deliver_edge`]/[`deliver_change`] with
/// a shared borrow of itself, then puts them back with
/// [`ListenerRegistry::restore`].
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl ListenerRegistry {
    pub(crate) fn register(&mut self, scope: Scope, listener: Box<dyn NetworkListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration { id, scope, listener });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }

    pub(crate) fn take(&mut self) -> Vec<Registration> {
        std::mem::take(&mut self.registrations)
    }

    pub(crate) fn restore(&mut self, registrations: Vec<Registration>) {
        self.registrations = registrations;
    }
}

pub(crate) fn deliver_edge(
    registrations: &mut [Registration],
    network: &super::network::Network,
    edge: &Edge,
) {
    for registration in registrations.iter_mut() {
        if registration.scope.accepts_edge(edge) {
            registration.listener.edge_added(network, edge);
        }
    }
}

pub(crate) fn deliver_change(registrations: &mut [Registration], network: &super::network::Network) {
    for registration in registrations.iter_mut() {
        if registration.scope.accepts_change() {
            registration.listener.network_changed(network);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::network::Network;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        name: &'static str,
    }

    impl NetworkListener for Recorder {
        fn edge_added(&mut self, _network: &Network, edge: &Edge) {
            self.log
                .borrow_mut()
                .push(format!("{}: {}->{}", self.name, edge.parent, edge.child));
        }

        fn network_changed(&mut self, _network: &Network) {
            self.log.borrow_mut().push(format!("{}: changed", self.name));
        }
    }

    #[test]
    fn test_scoped_delivery_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::default();
        registry.register(
            Scope::Variable("S".to_string()),
            Box::new(Recorder { log: log.clone(), name: "s" }),
        );
        registry.register(Scope::Network, Box::new(Recorder { log: log.clone(), name: "all" }));

        let network = Network::new();
        let mut registrations = registry.take();
        deliver_edge(&mut registrations, &network, &Edge::new("C", "S"));
        deliver_edge(&mut registrations, &network, &Edge::new("C", "R"));
        deliver_change(&mut registrations, &network);
        registry.restore(registrations);

        assert_eq!(
            *log.borrow(),
            vec!["s: C->S", "all: C->S", "all: C->R", "all: changed"]
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut registry = ListenerRegistry::default();
        let first = registry.register(Scope::Network, Box::new(Recorder::default()));
        let second = registry.register(Scope::Network, Box::new(Recorder::default()));
        assert_ne!(first, second);
        assert!(registry.remove(first));
        assert!(!registry.remove(first));
        assert_eq!(registry.len(), 1);
    }
}
