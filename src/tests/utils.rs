use crate::bayesian::{BayesianNetwork, MapProbabilityTable, Node};

pub(super) const EXACT_ACCURACY: f64 = 1e-10;

pub(super) fn table(rows: &[(&[&str], f64)]) -> MapProbabilityTable {
    rows.iter().map(|(key, p)| (key.to_vec(), *p)).collect()
}

#[inline]
pub(super) fn no_parents() -> Vec<String> {
    Vec::new()
}

// TrafficLight -> Risk
pub(super) fn traffic_light() -> BayesianNetwork {
    BayesianNetwork::new(vec![
        Node::new(
            "TrafficLight",
            ["green", "yellow", "red"],
            table(&[(&["green"], 0.4), (&["yellow"], 0.25), (&["red"], 0.35)]),
            no_parents(),
        ),
        Node::new(
            "Risk",
            ["high", "low"],
            table(&[
                (&["green", "high"], 0.1),
                (&["green", "low"], 0.9),
                (&["yellow", "high"], 0.55),
                (&["yellow", "low"], 0.45),
                (&["red", "high"], 0.95),
                (&["red", "low"], 0.05),
            ]),
            ["TrafficLight"],
        ),
    ])
    .unwrap()
}

// Rain -> WatsonGrass, {Sprinkler, Rain} -> HolmesGrass, a tree shaped factor graph
pub(super) fn holmes_watson() -> BayesianNetwork {
    BayesianNetwork::new(vec![
        Node::new(
            "Rain",
            ["true", "false"],
            table(&[(&["true"], 0.2), (&["false"], 0.8)]),
            no_parents(),
        ),
        Node::new(
            "Sprinkler",
            ["switch-on", "switch-off"],
            table(&[(&["switch-on"], 0.1), (&["switch-off"], 0.9)]),
            no_parents(),
        ),
        Node::new(
            "WatsonGrass",
            ["wet", "dry"],
            table(&[
                (&["true", "wet"], 1.),
                (&["true", "dry"], 0.),
                (&["false", "wet"], 0.2),
                (&["false", "dry"], 0.8),
            ]),
            ["Rain"],
        ),
        Node::new(
            "HolmesGrass",
            ["wet", "dry"],
            table(&[
                (&["switch-on", "true", "wet"], 1.),
                (&["switch-on", "true", "dry"], 0.),
                (&["switch-on", "false", "wet"], 0.9),
                (&["switch-on", "false", "dry"], 0.1),
                (&["switch-off", "true", "wet"], 1.),
                (&["switch-off", "true", "dry"], 0.),
                (&["switch-off", "false", "wet"], 0.),
                (&["switch-off", "false", "dry"], 1.),
            ]),
            ["Sprinkler", "Rain"],
        ),
    ])
    .unwrap()
}

// Rain -> Sprinkler, {Sprinkler, Rain} -> WetGrass, a factor graph with a cycle
pub(super) fn diamond() -> BayesianNetwork {
    BayesianNetwork::new(vec![
        Node::new(
            "Rain",
            ["true", "false"],
            table(&[(&["true"], 0.2), (&["false"], 0.8)]),
            no_parents(),
        ),
        Node::new(
            "Sprinkler",
            ["switch_on", "switch_off"],
            table(&[
                (&["true", "switch_on"], 0.01),
                (&["true", "switch_off"], 0.99),
                (&["false", "switch_on"], 0.4),
                (&["false", "switch_off"], 0.6),
            ]),
            ["Rain"],
        ),
        Node::new(
            "WetGrass",
            ["wet", "dry"],
            table(&[
                (&["switch_on", "true", "wet"], 0.99),
                (&["switch_on", "true", "dry"], 0.01),
                (&["switch_on", "false", "wet"], 0.9),
                (&["switch_on", "false", "dry"], 0.1),
                (&["switch_off", "true", "wet"], 0.8),
                (&["switch_off", "true", "dry"], 0.2),
                (&["switch_off", "false", "wet"], 0.),
                (&["switch_off", "false", "dry"], 1.),
            ]),
            ["Sprinkler", "Rain"],
        ),
    ])
    .unwrap()
}
