use crate::{
    bayesian::{
        BayesianNetwork, Declaration, Evidence, InferenceConfig, InferenceMethod,
        MapProbabilityTable, NetworkDefinition, Node, ProbabilityRow,
    },
    core::LoopyConfig,
    error::BNError,
    tests::utils::EXACT_ACCURACY,
};

const RAIN_SPRINKLER_WET_GRASS: &str = include_str!("../../demos/rain_sprinkler_wet_grass.yaml");

fn variable(name: &str, domain: &[&str]) -> Declaration {
    Declaration::Variable {
        name: name.into(),
        domain: domain.iter().map(|x| x.to_string()).collect(),
    }
}

fn root(name: &str, values: &[f64]) -> Declaration {
    Declaration::Probability {
        variable: name.into(),
        parents: vec![],
        rows: vec![ProbabilityRow {
            given: vec![],
            values: values.to_vec(),
        }],
    }
}

fn child(name: &str, parent: &str, rows: &[(&str, &[f64])]) -> Declaration {
    Declaration::Probability {
        variable: name.into(),
        parents: vec![parent.into()],
        rows: rows
            .iter()
            .map(|(given, values)| ProbabilityRow {
                given: vec![given.to_string()],
                values: values.to_vec(),
            })
            .collect(),
    }
}

#[test]
fn yaml_definition() {
    let definition: NetworkDefinition = serde_yaml::from_str(RAIN_SPRINKLER_WET_GRASS).unwrap();
    assert_eq!(definition.declarations.len(), 7);
    assert_eq!(
        definition.declarations[0],
        Declaration::Network {
            name: "rain_sprinkler_wet_grass".into()
        }
    );
    let network = definition.into_network().unwrap();
    let names: Vec<_> = network.nodes().iter().map(|node| node.name()).collect();
    assert_eq!(names, ["rain", "sprinkler", "wet_grass"]);
    assert_eq!(network.get("wet_grass").unwrap().parents(), ["sprinkler", "rain"]);
    let wet = [Evidence::new("wet_grass", "wet")];
    assert!((network.marginalize(&wet).unwrap() - 0.44838).abs() < EXACT_ACCURACY);
    let rain_and_wet = [Evidence::new("rain", "true"), Evidence::new("wet_grass", "wet")];
    let p = network.belief_propagation(&rain_and_wet).unwrap();
    assert!((p - 0.16038).abs() < 1e-3);
    let p = network
        .conditional_probability(
            &[Evidence::new("wet_grass", "wet")],
            &[Evidence::new("rain", "true")],
            &InferenceConfig::default(),
        )
        .unwrap();
    assert!((p - 0.8019).abs() < 1e-3);
}

#[test]
fn json_definition_and_config() {
    let json = r#"{
        "declarations": [
            {"kind": "variable", "name": "coin", "domain": ["heads", "tails"]},
            {"kind": "probability", "variable": "coin", "rows": [{"values": [0.3, 0.7]}]}
        ]
    }"#;
    let definition: NetworkDefinition = serde_json::from_str(json).unwrap();
    let network = definition.into_network().unwrap();
    let config: InferenceConfig =
        serde_json::from_str(r#"{"method": "loopy", "loopy": {"threshold": 1e-10}}"#).unwrap();
    assert_eq!(config.method, InferenceMethod::Loopy);
    assert_eq!(
        config.loopy,
        LoopyConfig {
            threshold: 1e-10,
            ..LoopyConfig::default()
        }
    );
    let report = network
        .infer(&[Evidence::new("coin", "tails")], &config)
        .unwrap();
    assert_eq!(report.method, InferenceMethod::Loopy);
    assert!((report.probability - 0.7).abs() < 1e-9);
    let default: InferenceConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(default, InferenceConfig::default());
    let serialized = serde_json::to_value(InferenceConfig::default()).unwrap();
    assert_eq!(serialized["method"], "auto");
}

#[test]
fn declarations_are_sorted_topologically() {
    let network = BayesianNetwork::from_declarations(vec![
        child("c", "b", &[("b0", &[0.5, 0.5]), ("b1", &[0.1, 0.9])]),
        variable("c", &["c0", "c1"]),
        child("b", "a", &[("a0", &[0.2, 0.8]), ("a1", &[0.6, 0.4])]),
        variable("b", &["b0", "b1"]),
        variable("d", &["d0", "d1"]),
        root("d", &[0.5, 0.5]),
        variable("a", &["a0", "a1"]),
        root("a", &[0.3, 0.7]),
    ])
    .unwrap();
    let names: Vec<_> = network.nodes().iter().map(|node| node.name()).collect();
    assert_eq!(names, ["d", "a", "b", "c"]);
    let evidence = [Evidence::new("c", "c1"), Evidence::new("a", "a0")];
    let expected = 0.3 * (0.2 * 0.5 + 0.8 * 0.9);
    assert!((network.belief_propagation(&evidence).unwrap() - expected).abs() < EXACT_ACCURACY);
}

#[test]
fn invalid_declarations() {
    assert_eq!(
        BayesianNetwork::from_declarations(vec![variable("a", &["a0", "a1"])]).unwrap_err(),
        BNError::MissingProbability("a".into())
    );
    assert_eq!(
        BayesianNetwork::from_declarations(vec![root("a", &[0.5, 0.5])]).unwrap_err(),
        BNError::UnknownVariable("a".into())
    );
    assert_eq!(
        BayesianNetwork::from_declarations(vec![
            variable("b", &["b0", "b1"]),
            child("b", "a", &[("a0", &[0.5, 0.5])]),
        ])
        .unwrap_err(),
        BNError::UnknownParent {
            node: "b".into(),
            parent: "a".into(),
        }
    );
    assert_eq!(
        BayesianNetwork::from_declarations(vec![
            variable("a", &["a0", "a1"]),
            root("a", &[0.2, 0.3, 0.5]),
        ])
        .unwrap_err(),
        BNError::ShapeMismatch {
            operation: "probability declaration values",
            expected: 2,
            actual: 3,
        }
    );
    assert_eq!(
        BayesianNetwork::from_declarations(vec![
            variable("a", &["a0", "a1"]),
            variable("a", &["a0", "a1"]),
        ])
        .unwrap_err(),
        BNError::DuplicateNode("a".into())
    );
    assert_eq!(
        BayesianNetwork::from_declarations(vec![
            variable("a", &["a0", "a1"]),
            variable("b", &["b0", "b1"]),
            variable("c", &["c0"]),
            root("c", &[1.]),
            child("a", "b", &[("b0", &[0.5, 0.5]), ("b1", &[0.5, 0.5])]),
            child("b", "a", &[("a0", &[0.5, 0.5]), ("a1", &[0.5, 0.5])]),
        ])
        .unwrap_err(),
        BNError::CyclicNetwork(vec!["a".into(), "b".into()])
    );
}

#[test]
fn missing_table_entries() {
    let network = BayesianNetwork::from_declarations(vec![
        variable("a", &["a0", "a1"]),
        root("a", &[0.5, 0.5]),
        variable("b", &["b0", "b1"]),
        child("b", "a", &[("a0", &[0.5, 0.5])]),
    ])
    .unwrap();
    let expected = BNError::UnknownProbabilityKey {
        node: "b".into(),
        key: vec!["a1".into(), "b0".into()],
    };
    assert_eq!(network.node_tensor(1).unwrap_err(), expected);
    assert_eq!(
        network.belief_propagation(&[Evidence::new("b", "b0")]).unwrap_err(),
        expected
    );
    assert_eq!(
        network.marginalize(&[Evidence::new("b", "b0")]).unwrap_err(),
        expected
    );
}

#[test]
fn invalid_domains() {
    assert_eq!(
        BayesianNetwork::from_declarations(vec![variable("a", &[]), root("a", &[])]).unwrap_err(),
        BNError::EmptyDomain("a".into())
    );
    assert_eq!(
        BayesianNetwork::from_declarations(vec![
            variable("a", &["a0", "a1", "a0"]),
            root("a", &[0.2, 0.3, 0.5]),
        ])
        .unwrap_err(),
        BNError::DuplicateDomainValue {
            node: "a".into(),
            value: "a0".into(),
        }
    );
    let empty = Node::new(
        "a",
        Vec::<String>::new(),
        MapProbabilityTable::new(),
        Vec::<String>::new(),
    );
    assert_eq!(
        BayesianNetwork::new(vec![empty]).unwrap_err(),
        BNError::EmptyDomain("a".into())
    );
    let repeated = Node::new(
        "a",
        ["x", "x"],
        MapProbabilityTable::new(),
        Vec::<String>::new(),
    );
    assert_eq!(
        BayesianNetwork::new(vec![repeated]).unwrap_err(),
        BNError::DuplicateDomainValue {
            node: "a".into(),
            value: "x".into(),
        }
    );
}
