//! Engine configuration parameters.

use crate::error::{Error, Result};
use crate::lookahead::{ExpansionPolicy, SelectionRule};

pub const DEFAULT_REPETITIONS: u32 = 1000;
pub const DEFAULT_WORKERS: usize = 1;
pub const DEFAULT_PLIES: usize = 2;
pub const DEFAULT_BEST_MOVES: usize = 2;
/// Attempts made by the rejection-sampling board generator before it gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Configuration shared by the rollout evaluator and the lookahead search.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Random completions played per candidate move (or per evaluated position).
    pub repetitions: u32,

    /// Worker threads used by one evaluator invocation. 1 evaluates on the caller's thread.
    pub workers: usize,

    /// Depth of the lookahead. 0 degenerates to a single rollout evaluation.
    pub plies: usize,

    /// Branching factor of the lookahead (the `K` best moves kept at each branching level).
    pub best_moves: usize,

    /// How the lookahead tree grows.
    pub policy: ExpansionPolicy,

    /// How the first move is picked from the evaluated leaves.
    pub selection: SelectionRule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            workers: DEFAULT_WORKERS,
            plies: DEFAULT_PLIES,
            best_moves: DEFAULT_BEST_MOVES,
            policy: ExpansionPolicy::Narrow,
            selection: SelectionRule::Greedy,
        }
    }
}

impl EngineConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            repetitions: 100,
            workers: 1,
            plies: 1,
            best_moves: 2,
            policy: ExpansionPolicy::Narrow,
            selection: SelectionRule::Greedy,
        }
    }

    /// Builder pattern: set number of repetitions.
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Builder pattern: set number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Builder pattern: set lookahead depth.
    pub fn with_plies(mut self, plies: usize) -> Self {
        self.plies = plies;
        self
    }

    /// Builder pattern: set lookahead branching factor.
    pub fn with_best_moves(mut self, best_moves: usize) -> Self {
        self.best_moves = best_moves;
        self
    }

    pub fn with_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_selection(mut self, selection: SelectionRule) -> Self {
        self.selection = selection;
        self
    }

    /// Checks that every count the engine divides or iterates by is positive.
    pub fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(Error::InvalidConfiguration {
                message: "repetitions must be at least 1".to_string(),
            });
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfiguration {
                message: "workers must be at least 1".to_string(),
            });
        }
        if self.best_moves == 0 {
            return Err(Error::InvalidConfiguration {
                message: "best_moves must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.repetitions, 1000);
        assert_eq!(config.workers, 1);
        assert_eq!(config.policy, ExpansionPolicy::Narrow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_repetitions(50)
            .with_workers(4)
            .with_plies(3)
            .with_best_moves(3)
            .with_policy(ExpansionPolicy::Full)
            .with_selection(SelectionRule::Minimax);

        assert_eq!(config.repetitions, 50);
        assert_eq!(config.workers, 4);
        assert_eq!(config.plies, 3);
        assert_eq!(config.best_moves, 3);
        assert_eq!(config.selection, SelectionRule::Minimax);
    }

    #[test]
    fn test_validation() {
        assert!(EngineConfig::for_testing().with_plies(0).validate().is_ok());
        assert!(matches!(
            EngineConfig::default().with_repetitions(0).validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(EngineConfig::default().with_workers(0).validate().is_err());
        assert!(EngineConfig::default().with_best_moves(0).validate().is_err());
    }
}
