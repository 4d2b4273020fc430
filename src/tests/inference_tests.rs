use crate::{
    bayesian::{Evidence, InferenceConfig, InferenceMethod},
    core::LoopyConfig,
    error::BNError,
    tests::utils::{diamond, holmes_watson, traffic_light, EXACT_ACCURACY},
};

#[test]
fn conditional_probability() {
    let network = traffic_light();
    let config = InferenceConfig::default();
    let yellow = [Evidence::new("TrafficLight", "yellow")];
    let high = [Evidence::new("Risk", "high")];
    let p = network
        .conditional_probability(&yellow, &high, &config)
        .unwrap();
    assert!((p - 0.1375 / 0.51).abs() < EXACT_ACCURACY);
    let p = network
        .conditional_probability(&high, &yellow, &config)
        .unwrap();
    assert!((p - 0.55).abs() < EXACT_ACCURACY);
    // conditioning on nothing is the marginal itself
    let p = network.conditional_probability(&high, &[], &config).unwrap();
    assert!((p - 0.51).abs() < EXACT_ACCURACY);
}

#[test]
fn zero_probability_evidence() {
    let network = holmes_watson();
    let query = [Evidence::new("HolmesGrass", "wet")];
    let impossible = [
        Evidence::new("WatsonGrass", "dry"),
        Evidence::new("Rain", "true"),
    ];
    assert_eq!(network.exact_belief_propagation(&impossible).unwrap(), 0.);
    assert_eq!(
        network.conditional_probability(&query, &impossible, &InferenceConfig::default()),
        Err(BNError::ZeroProbabilityEvidence)
    );
}

#[test]
fn parallel_batch() {
    let network = traffic_light();
    let queries = vec![
        vec![Evidence::new("Risk", "high")],
        vec![
            Evidence::new("TrafficLight", "yellow"),
            Evidence::new("Risk", "high"),
        ],
        vec![],
        vec![Evidence::new("Weather", "sunny")],
    ];
    let results = network.infer_batch(&queries, &InferenceConfig::default());
    assert_eq!(results.len(), 4);
    assert!((results[0].as_ref().unwrap() - 0.51).abs() < EXACT_ACCURACY);
    assert!((results[1].as_ref().unwrap() - 0.1375).abs() < EXACT_ACCURACY);
    assert_eq!(results[2], Ok(1.));
    assert_eq!(results[3], Err(BNError::UnknownVariable("Weather".into())));
}

#[test]
fn parallel_batch_matches_sequential() {
    let network = diamond();
    let config = InferenceConfig {
        method: InferenceMethod::Loopy,
        loopy: LoopyConfig {
            threshold: 1e-8,
            ..LoopyConfig::default()
        },
    };
    let queries: Vec<Vec<Evidence>> = ["true", "false"]
        .into_iter()
        .flat_map(|rain| {
            ["wet", "dry"].into_iter().map(move |grass| {
                vec![Evidence::new("Rain", rain), Evidence::new("WetGrass", grass)]
            })
        })
        .collect();
    let parallel = network.infer_batch(&queries, &config);
    for (evidence, result) in queries.iter().zip(parallel) {
        let sequential = network.infer(evidence, &config).unwrap().probability;
        assert_eq!(result.unwrap(), sequential);
        let brute = network.marginalize(evidence).unwrap();
        assert!((sequential - brute).abs() < 1e-6, "loopy: {sequential}, brute force: {brute}");
    }
}

#[test]
fn marginal_requires_messages() {
    let network = traffic_light();
    let mut fg = network.factor_graph().unwrap();
    let risk = fg.variable_index("Risk").unwrap();
    assert_eq!(
        fg.variable_marginal(risk),
        Err(BNError::MissingMessage("Risk".into()))
    );
    assert_eq!(
        fg.bethe_estimate(),
        Err(BNError::MissingMessage("TrafficLight".into()))
    );
    fg.apply_evidence(&[(risk, 0)]).unwrap();
    fg.run_exact_message_passing().unwrap();
    assert!((fg.marginal("Risk").unwrap() - 0.51).abs() < EXACT_ACCURACY);
    // new evidence drops the messages
    let light = fg.variable_index("TrafficLight").unwrap();
    fg.apply_evidence(&[(light, 1)]).unwrap();
    assert_eq!(
        fg.marginal("Risk"),
        Err(BNError::MissingMessage("Risk".into()))
    );
}
