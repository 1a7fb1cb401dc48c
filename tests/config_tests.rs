use tictactoe_mcts::{config::BestChildCriteria, MCTSConfig, MCTSError};

#[test]
fn test_config_builder_methods() {
    // Test that all builder methods correctly set their respective values
    let config = MCTSConfig::default()
        .with_exploration_constant(2.0)
        .with_iterations(5000)
        .with_seed(42)
        .with_best_child_criteria(BestChildCriteria::MostVisits);

    assert_eq!(config.exploration_constant, 2.0);
    assert_eq!(config.iterations, 5000);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.best_child_criteria, BestChildCriteria::MostVisits);
}

#[test]
fn test_config_default_values() {
    let config = MCTSConfig::default();

    // Default exploration constant should be sqrt(2)
    assert!((config.exploration_constant - 1.414).abs() < 0.001);
    assert_eq!(config.iterations, 10_000);
    assert_eq!(config.seed, None);
    assert_eq!(config.best_child_criteria, BestChildCriteria::HighestWinRate);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    for constant in [-1.0, f64::NAN, f64::INFINITY] {
        let config = MCTSConfig::default().with_exploration_constant(constant);
        assert!(matches!(
            config.validate(),
            Err(MCTSError::InvalidConfiguration(_))
        ));
    }

    let config = MCTSConfig::default().with_iterations(0);
    assert!(matches!(
        config.validate(),
        Err(MCTSError::InvalidConfiguration(_))
    ));

    assert!(MCTSConfig::default()
        .with_exploration_constant(0.0)
        .validate()
        .is_ok());
}
