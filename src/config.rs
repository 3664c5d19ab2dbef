//! Gameplay parameters
//!
//! Built once at startup and handed to the session by reference. Nothing in
//! here knows about the terminal layout.

use std::time::Duration;

/// Immutable gameplay configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Board width in cells
    pub width: usize,
    /// Board height in cells
    pub height: usize,
    /// Time per row at level 1
    pub initial_fall_interval: Duration,
    /// Fractional speed-up added per level
    pub speed_increase: f64,
    /// Maximum gap between two clears that keeps a combo alive
    pub combo_window: Duration,
    /// Points per cleared line, multiplied by the level
    pub points_per_line: u64,
    /// Combo bonus weight, multiplied by streak and lines
    pub combo_bonus: u64,
    /// Lines needed per level
    pub lines_per_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            initial_fall_interval: Duration::from_millis(300),
            speed_increase: 0.05,
            combo_window: Duration::from_millis(1000),
            points_per_line: 100,
            combo_bonus: 50,
            lines_per_level: 10,
        }
    }
}

impl GameConfig {
    /// Level for a running total of cleared lines
    pub fn level_for(&self, total_lines: u32) -> u32 {
        total_lines / self.lines_per_level.max(1) + 1
    }

    /// Time per row at the given level
    pub fn fall_interval(&self, level: u32) -> Duration {
        let steps = level.saturating_sub(1) as f64;
        self.initial_fall_interval
            .div_f64(1.0 + steps * self.speed_increase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        let config = GameConfig::default();
        assert_eq!(config.level_for(0), 1);
        assert_eq!(config.level_for(9), 1);
        assert_eq!(config.level_for(10), 2);
        assert_eq!(config.level_for(23), 3);
    }

    #[test]
    fn test_fall_interval_gets_faster() {
        let config = GameConfig::default();
        assert_eq!(config.fall_interval(1), Duration::from_millis(300));

        let mut previous = config.fall_interval(1);
        for level in 2..50 {
            let interval = config.fall_interval(level);
            assert!(interval < previous);
            assert!(interval > Duration::ZERO);
            previous = interval;
        }
    }
}
