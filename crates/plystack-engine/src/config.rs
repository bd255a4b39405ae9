//! Start-up configuration handed to the pool by the controlling process.

use plystack_core::{Color, S, Score};

/// Contempt tunables. Both components are in centipawns from the first
/// player's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContemptConfig {
    /// Penalty for drawing, applied in both game phases.
    pub draw_penalty: i16,
    /// Extra middlegame penalty for steering into simple positions.
    pub complexity: i16,
}

impl ContemptConfig {
    pub const fn new(draw_penalty: i16, complexity: i16) -> Self {
        Self {
            draw_penalty,
            complexity,
        }
    }

    /// Packed contempt for a search where `side_to_move` is on move.
    ///
    /// The pair is `S(draw_penalty + complexity, draw_penalty)` in the first
    /// player's frame, negated when the second player is to move.
    pub fn score_for(&self, side_to_move: Color) -> Score {
        let contempt = S(
            self.draw_penalty.saturating_add(self.complexity),
            self.draw_penalty,
        );
        match side_to_move {
            Color::White => contempt,
            Color::Black => -contempt,
        }
    }
}

/// Process-wide pool settings, fixed for the lifetime of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of workers; changing it means building a new pool.
    pub threads: usize,
    pub contempt: ContemptConfig,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            contempt: ContemptConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use plystack_core::{Color, S, Score};

    use super::{ContemptConfig, PoolConfig};

    #[test]
    fn first_player_contempt() {
        let score = ContemptConfig::new(20, 5).score_for(Color::White);
        assert_eq!(score.mg(), 25);
        assert_eq!(score.eg(), 20);
    }

    #[test]
    fn second_player_contempt_is_negated() {
        let config = ContemptConfig::new(20, 5);
        assert_eq!(config.score_for(Color::Black), -S(25, 20));
        assert_eq!(config.score_for(Color::Black).mg(), -25);
        assert_eq!(config.score_for(Color::Black).eg(), -20);
    }

    #[test]
    fn defaults_are_neutral() {
        let config = PoolConfig::default();
        assert_eq!(config.threads, 1);
        assert_eq!(config.contempt.score_for(Color::Black), Score::ZERO);
    }
}
