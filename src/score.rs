//! Scoring, level progression and combo tracking

use crate::config::GameConfig;
use std::time::Duration;

/// Consecutive clears within a rolling time window
#[derive(Debug, Clone, Default)]
pub struct Combo {
    /// Current streak
    pub streak: u32,
    /// Longest streak seen this session, never reset
    pub max_streak: u32,
    /// Session time of the last clear
    last_clear: Duration,
    window: Duration,
}

impl Combo {
    pub fn new(window: Duration) -> Self {
        Self {
            streak: 0,
            max_streak: 0,
            last_clear: Duration::ZERO,
            window,
        }
    }

    /// Drop the streak once the window since the last clear has passed
    pub fn on_tick(&mut self, now: Duration) {
        if now.saturating_sub(self.last_clear) > self.window {
            self.streak = 0;
        }
    }

    /// Extend the streak and return the combo bonus
    pub fn on_line_clear(&mut self, lines: u32, now: Duration, bonus_weight: u64) -> u64 {
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);
        self.last_clear = now;
        self.streak as u64 * lines as u64 * bonus_weight
    }

    /// A lock that cleared nothing breaks the combo
    pub fn on_no_clear(&mut self) {
        self.streak = 0;
    }
}

/// Points, level and line total
#[derive(Debug, Clone)]
pub struct Score {
    pub points: u64,
    /// Current level, starts at 1
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Add the points for a clear, then advance lines and level
    ///
    /// Returns the points awarded. The line score uses the level in effect
    /// before this clear.
    pub fn add_clear(&mut self, lines: u32, combo_bonus: u64, config: &GameConfig) -> u64 {
        let awarded = lines as u64 * config.points_per_line * self.level as u64 + combo_bonus;
        self.points += awarded;
        self.lines += lines;
        self.level = config.level_for(self.lines);
        awarded
    }

    /// Time per row at the current level
    pub fn fall_interval(&self, config: &GameConfig) -> Duration {
        config.fall_interval(self.level)
    }
}

/// Per-session statistics shown in the side panel
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub pieces_placed: u32,
    pub max_combo: u32,
    pub play_time: Duration,
}

impl Stats {
    pub fn play_seconds(&self) -> u64 {
        self.play_time.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(1000);

    #[test]
    fn test_single_clear_with_combo() {
        let config = GameConfig::default();
        let mut combo = Combo::new(WINDOW);
        let mut score = Score::new();

        let bonus = combo.on_line_clear(1, Duration::from_millis(10), config.combo_bonus);
        let awarded = score.add_clear(1, bonus, &config);

        assert_eq!(bonus, 50);
        assert_eq!(awarded, 150);
        assert_eq!(score.points, 150);
        assert_eq!(score.lines, 1);
    }

    #[test]
    fn test_combo_builds_within_window() {
        let mut combo = Combo::new(WINDOW);
        assert_eq!(combo.on_line_clear(1, Duration::from_millis(100), 50), 50);
        combo.on_tick(Duration::from_millis(900));
        assert_eq!(combo.on_line_clear(2, Duration::from_millis(900), 50), 200);
        assert_eq!(combo.streak, 2);
        assert_eq!(combo.max_streak, 2);
    }

    #[test]
    fn test_combo_expires_after_window() {
        let mut combo = Combo::new(WINDOW);
        combo.on_line_clear(1, Duration::from_millis(100), 50);
        combo.on_tick(Duration::from_millis(1100));
        assert_eq!(combo.streak, 1);
        combo.on_tick(Duration::from_millis(1101));
        assert_eq!(combo.streak, 0);
        assert_eq!(combo.on_line_clear(1, Duration::from_millis(1101), 50), 50);
        assert_eq!(combo.max_streak, 1);
    }

    #[test]
    fn test_no_clear_breaks_combo() {
        let mut combo = Combo::new(WINDOW);
        combo.on_line_clear(1, Duration::from_millis(100), 50);
        combo.on_line_clear(1, Duration::from_millis(200), 50);
        combo.on_no_clear();
        assert_eq!(combo.streak, 0);
        assert_eq!(combo.max_streak, 2);
    }

    #[test]
    fn test_line_score_uses_level_before_clear() {
        let config = GameConfig::default();
        let mut score = Score::new();
        score.add_clear(9, 0, &config);
        assert_eq!(score.level, 1);
        // 2 lines at level 1, then level becomes 2
        assert_eq!(score.add_clear(2, 0, &config), 200);
        assert_eq!(score.level, 2);
        assert_eq!(score.add_clear(1, 0, &config), 200);
    }

    #[test]
    fn test_level_up() {
        let config = GameConfig::default();
        let mut score = Score::new();
        for _ in 0..23 {
            score.add_clear(1, 0, &config);
        }
        assert_eq!(score.lines, 23);
        assert_eq!(score.level, 3);
        assert!(score.fall_interval(&config) < config.initial_fall_interval);
    }
}
