#[cfg(test)]
mod test_evidence {
    use bayesnet::graph::Edge;
    use bayesnet::scenarios::factory::ScenarioMakerFactory;
    use bayesnet::{MarginalTable, Network, NetworkListener};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every variable's marginal whenever the evidence changes
    struct MarginalRecorder {
        latest: Rc<RefCell<MarginalTable>>,
        notifications: Rc<RefCell<usize>>,
    }

    impl NetworkListener for MarginalRecorder {
        fn network_changed(&mut self, network: &Network) {
            *self.latest.borrow_mut() = network.marginals().unwrap();
            *self.notifications.borrow_mut() += 1;
        }
    }

    fn round3(value: f64) -> f64 {
        (value * 1000.0 + 0.5).floor() / 1000.0
    }

    fn assert_recorded(latest: &Rc<RefCell<MarginalTable>>, network: &Network, expected: [(&str, &str); 4]) {
        for (id, query) in expected {
            let recorded = latest.borrow().get(id).unwrap();
            let queried = network.query(query).unwrap();
            assert_eq!(round3(recorded), round3(queried), "{} vs {}", id, query);
        }
    }

    #[test]
    fn test_listener_sees_current_evidence() {
        let mut network = ScenarioMakerFactory::build("sprinkler").unwrap();
        let latest = Rc::new(RefCell::new(MarginalTable::default()));
        let notifications = Rc::new(RefCell::new(0));
        network.add_listener(Box::new(MarginalRecorder {
            latest: latest.clone(),
            notifications: notifications.clone(),
        }));

        for (id, query) in [("C", "P(C)"), ("S", "P(S)"), ("R", "P(R)"), ("W", "P(W)")] {
            assert_eq!(
                round3(network.probability(id).unwrap()),
                round3(network.query(query).unwrap())
            );
        }

        network.set_evidence("W", true).unwrap();
        assert_eq!(*notifications.borrow(), 1);
        assert_eq!(latest.borrow().evidence, "W");
        assert_recorded(
            &latest,
            &network,
            [("C", "P(C|W)"), ("S", "P(S|W)"), ("R", "P(R|W)"), ("W", "P(W|W)")],
        );

        network.set_evidence("C", true).unwrap();
        assert_eq!(latest.borrow().evidence, "C,W");
        assert_recorded(
            &latest,
            &network,
            [("C", "P(C|W,C)"), ("S", "P(S|W,C)"), ("R", "P(R|W,C)"), ("W", "P(W|W,C)")],
        );

        network.clear_evidence("W").unwrap();
        assert_recorded(
            &latest,
            &network,
            [("C", "P(C|C)"), ("S", "P(S|C)"), ("R", "P(R|C)"), ("W", "P(W|C)")],
        );

        // clearing evidence that is not set still notifies
        network.clear_evidence("W").unwrap();
        assert_eq!(*notifications.borrow(), 4);
        assert_recorded(
            &latest,
            &network,
            [("C", "P(C|C)"), ("S", "P(S|C)"), ("R", "P(R|C)"), ("W", "P(W|C)")],
        );

        network.set_evidence("C", false).unwrap();
        assert_eq!(latest.borrow().evidence, "~C");
        assert_eq!(latest.borrow().get("C"), Some(0.0));
        assert_eq!(network.query("P(C|~C)").unwrap(), 0.0);

        network.clear_all_evidence();
        assert_eq!(*notifications.borrow(), 6);
        assert!(latest.borrow().evidence.is_empty());
        assert_eq!(latest.borrow().get("C"), Some(0.5));
    }

    #[derive(Default)]
    struct ParentRecorder {
        edges: Rc<RefCell<Vec<Edge>>>,
        changes: Rc<RefCell<usize>>,
    }

    impl NetworkListener for ParentRecorder {
        fn edge_added(&mut self, _network: &Network, edge: &Edge) {
            self.edges.borrow_mut().push(edge.clone());
        }

        fn network_changed(&mut self, _network: &Network) {
            *self.changes.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_variable_listener_only_hears_new_parents() {
        let mut network = ScenarioMakerFactory::build("sprinkler").unwrap();
        network.new_variable("G", Some("Gardener")).unwrap();
        network.new_variable("D", Some("Dog")).unwrap();

        let recorder = ParentRecorder::default();
        let edges = recorder.edges.clone();
        let changes = recorder.changes.clone();
        let id = network.add_variable_listener("S", Box::new(recorder)).unwrap();

        network.add_edge("G", "D").unwrap();
        network.add_edge("G", "S").unwrap();
        network.set_evidence("W", true).unwrap();
        assert_eq!(*edges.borrow(), vec![Edge::new("G", "S")]);
        assert_eq!(*changes.borrow(), 0);

        assert!(network.remove_listener(id));
        network.add_edge("D", "S").unwrap();
        assert_eq!(edges.borrow().len(), 1);
        assert!(network.add_variable_listener("X", Box::new(ParentRecorder::default())).is_err());
    }
}
