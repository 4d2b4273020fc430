use crate::{
    bayesian::Evidence,
    error::BNError,
    tests::utils::{holmes_watson, traffic_light, EXACT_ACCURACY},
};

#[test]
fn evidence_parsing() {
    let evidence: Evidence = "Risk=high".parse().unwrap();
    assert_eq!(evidence, Evidence::new("Risk", "high"));
    assert_eq!(evidence.to_string(), "Risk=high");
    let evidence: Evidence = " Risk = high ".parse().unwrap();
    assert_eq!(evidence, Evidence::new("Risk", "high"));
    for malformed in ["Risk", "=high", "Risk=", ""] {
        assert_eq!(
            malformed.parse::<Evidence>(),
            Err(BNError::MalformedEvidence(malformed.to_owned()))
        );
    }
}

#[test]
fn evidence_idempotence() {
    let network = holmes_watson();
    let once = [Evidence::new("HolmesGrass", "wet"), Evidence::new("Rain", "true")];
    let twice = [
        Evidence::new("HolmesGrass", "wet"),
        Evidence::new("Rain", "true"),
        Evidence::new("HolmesGrass", "wet"),
    ];
    let fg_once = network.conditioned_factor_graph(&once).unwrap();
    let fg_twice = network.conditioned_factor_graph(&twice).unwrap();
    for (lhs, rhs) in fg_once.factors().iter().zip(fg_twice.factors()) {
        assert_eq!(lhs.tensor(), rhs.tensor());
    }
    let p_once = network.exact_belief_propagation(&once).unwrap();
    let p_twice = network.exact_belief_propagation(&twice).unwrap();
    assert!((p_once - p_twice).abs() < EXACT_ACCURACY);
    assert!((p_once - 0.2).abs() < EXACT_ACCURACY);
}

#[test]
fn factor_graph_evidence_is_idempotent() {
    let network = traffic_light();
    let mut fg = network.factor_graph().unwrap();
    let risk = fg.variable_index("Risk").unwrap();
    fg.apply_evidence(&[(risk, 0)]).unwrap();
    let conditioned = fg.clone();
    fg.apply_evidence(&[(risk, 0)]).unwrap();
    for (lhs, rhs) in fg.factors().iter().zip(conditioned.factors()) {
        assert_eq!(lhs.tensor(), rhs.tensor());
    }
    assert_eq!(fg.variables()[risk].domain_size(), 1);
    assert_eq!(fg.variables()[risk].evidence_index(), Some(0));
    assert_eq!(
        fg.apply_evidence(&[(risk, 1)]),
        Err(BNError::ConflictingEvidence {
            variable: "Risk".into(),
            first: "0".into(),
            second: "1".into(),
        })
    );
    assert_eq!(fg.apply_evidence(&[(5, 0)]), Err(BNError::OutOfRangeVariable(2, 5)));
}

#[test]
fn invalid_evidence() {
    let network = traffic_light();
    assert_eq!(
        network.belief_propagation(&[Evidence::new("Weather", "sunny")]),
        Err(BNError::UnknownVariable("Weather".into()))
    );
    assert_eq!(
        network.belief_propagation(&[Evidence::new("Risk", "medium")]),
        Err(BNError::InvalidEvidenceValue {
            variable: "Risk".into(),
            value: "medium".into(),
        })
    );
    assert_eq!(
        network.marginalize(&[Evidence::new("Risk", "medium")]),
        Err(BNError::InvalidEvidenceValue {
            variable: "Risk".into(),
            value: "medium".into(),
        })
    );
    let conflicting = [Evidence::new("Risk", "high"), Evidence::new("Risk", "low")];
    let expected = Err(BNError::ConflictingEvidence {
        variable: "Risk".into(),
        first: "high".into(),
        second: "low".into(),
    });
    assert_eq!(network.belief_propagation(&conflicting), expected);
    assert_eq!(network.marginalize(&conflicting), expected);
}

#[test]
fn rejected_evidence_leaves_graph_untouched() {
    let network = traffic_light();
    let mut fg = network.factor_graph().unwrap();
    let light = fg.variable_index("TrafficLight").unwrap();
    let risk = fg.variable_index("Risk").unwrap();
    let pristine = fg.clone();
    for evidence in [
        vec![(risk, 0), (risk, 1)],
        vec![(light, 1), (5, 0)],
        vec![(light, 1), (risk, 2)],
    ] {
        assert!(fg.apply_evidence(&evidence).is_err());
        for (lhs, rhs) in fg.variables().iter().zip(pristine.variables()) {
            assert_eq!(lhs.domain_size(), rhs.domain_size());
            assert_eq!(lhs.evidence_index(), None);
        }
        for (lhs, rhs) in fg.factors().iter().zip(pristine.factors()) {
            assert_eq!(lhs.tensor(), rhs.tensor());
        }
    }
    fg.apply_evidence(&[(light, 1), (risk, 0)]).unwrap();
    fg.run_exact_message_passing().unwrap();
    assert!((fg.marginal("Risk").unwrap() - 0.1375).abs() < EXACT_ACCURACY);
}
