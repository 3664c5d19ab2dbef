//! Input handling with DAS (Delayed Auto Shift) and ARR (Auto Repeat Rate)
//!
//! Turns raw key events into intents. Uses a polling-based approach that
//! doesn't rely on key release events, which are unreliable on Linux
//! terminals.

use crate::game::Action;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Time after which we consider a key "released" if no repeat received
const KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// What the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Play(Action),
    Confirm,
    Quit,
}

/// Input handler with DAS/ARR support
pub struct InputHandler {
    /// Last press time for movement keys (for DAS)
    left_state: Option<KeyPressState>,
    right_state: Option<KeyPressState>,
    down_state: Option<KeyPressState>,
    bindings: KeyBindings,
    das: Duration,
    arr: Duration,
}

#[derive(Debug, Clone)]
struct KeyPressState {
    first_press: Instant,
    last_seen: Instant,
    das_triggered: bool,
    last_arr: Option<Instant>,
}

impl KeyPressState {
    fn new(now: Instant) -> Self {
        Self {
            first_press: now,
            last_seen: now,
            das_triggered: false,
            last_arr: None,
        }
    }
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub confirm: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!(key = %s, "ignoring unknown key name");
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            confirm: Self::parse_keys(&settings.keys.confirm),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    /// Create input handler from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            left_state: None,
            right_state: None,
            down_state: None,
            bindings: KeyBindings::from_settings(settings),
            das: Duration::from_millis(settings.input.das_ms),
            arr: Duration::from_millis(settings.input.arr_ms),
        }
    }

    /// Translate a key press on the start or game-over screen
    pub fn screen_intent(&self, key: KeyEvent) -> Option<Intent> {
        if is_ctrl_c(&key) {
            return Some(Intent::Quit);
        }
        let code = normalize_key(key.code);
        if self.bindings.confirm.contains(&code) {
            Some(Intent::Confirm)
        } else if self.bindings.quit.contains(&code) {
            Some(Intent::Quit)
        } else {
            None
        }
    }

    /// Handle a key press during play - returns immediate intents
    pub fn key_down(&mut self, key: KeyEvent) -> Vec<Intent> {
        self.key_down_at(key, Instant::now())
    }

    fn key_down_at(&mut self, key: KeyEvent, now: Instant) -> Vec<Intent> {
        let mut intents = Vec::new();

        if is_ctrl_c(&key) {
            intents.push(Intent::Quit);
            return intents;
        }

        let code = normalize_key(key.code);

        // Movement keys get DAS/ARR tracking
        if self.bindings.move_left.contains(&code) {
            if let Some(state) = &mut self.left_state {
                state.last_seen = now;
            } else {
                intents.push(Intent::Play(Action::MoveLeft));
                self.left_state = Some(KeyPressState::new(now));
            }
            self.right_state = None;
        } else if self.bindings.move_right.contains(&code) {
            if let Some(state) = &mut self.right_state {
                state.last_seen = now;
            } else {
                intents.push(Intent::Play(Action::MoveRight));
                self.right_state = Some(KeyPressState::new(now));
            }
            self.left_state = None;
        } else if self.bindings.soft_drop.contains(&code) {
            if let Some(state) = &mut self.down_state {
                state.last_seen = now;
            } else {
                intents.push(Intent::Play(Action::SoftDrop));
                self.down_state = Some(KeyPressState::new(now));
            }
        } else if self.bindings.hard_drop.contains(&code) {
            intents.push(Intent::Play(Action::HardDrop));
        } else if self.bindings.rotate.contains(&code) {
            intents.push(Intent::Play(Action::Rotate));
        } else if self.bindings.quit.contains(&code) {
            intents.push(Intent::Quit);
        }

        intents
    }

    /// Handle a key release event (may not be called on Linux)
    pub fn key_up(&mut self, key: KeyEvent) {
        let code = normalize_key(key.code);

        if self.bindings.move_left.contains(&code) {
            self.left_state = None;
        } else if self.bindings.move_right.contains(&code) {
            self.right_state = None;
        } else if self.bindings.soft_drop.contains(&code) {
            self.down_state = None;
        }
    }

    /// Update held keys and return repeat intents (call every frame)
    pub fn update(&mut self) -> Vec<Intent> {
        self.update_at(Instant::now())
    }

    fn update_at(&mut self, now: Instant) -> Vec<Intent> {
        let (das, arr) = (self.das, self.arr);
        let mut intents = Vec::new();

        for (state, action) in [
            (&mut self.left_state, Action::MoveLeft),
            (&mut self.right_state, Action::MoveRight),
            (&mut self.down_state, Action::SoftDrop),
        ] {
            // No recent key event means the key was released
            if state
                .as_ref()
                .is_some_and(|s| now.duration_since(s.last_seen) > KEY_TIMEOUT)
            {
                *state = None;
            }
            if let Some(s) = state {
                if process_das_arr(s, now, das, arr) {
                    intents.push(Intent::Play(action));
                }
            }
        }

        intents
    }

    /// Clear all held keys
    pub fn clear(&mut self) {
        self.left_state = None;
        self.right_state = None;
        self.down_state = None;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Process DAS/ARR logic for a key state, returns true if should trigger action
fn process_das_arr(state: &mut KeyPressState, now: Instant, das: Duration, arr: Duration) -> bool {
    let held_duration = now.duration_since(state.first_press);

    if held_duration >= das {
        if !state.das_triggered {
            // First trigger after DAS
            state.das_triggered = true;
            state.last_arr = Some(now);
            return true;
        } else if let Some(last) = state.last_arr {
            // Subsequent ARR triggers
            if now.duration_since(last) >= arr {
                state.last_arr = Some(now);
                return true;
            }
        }
    }

    false
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_play_bindings() {
        let mut input = InputHandler::new();
        assert_eq!(input.key_down(press(KeyCode::Left)), vec![Intent::Play(Action::MoveLeft)]);
        assert_eq!(input.key_down(press(KeyCode::Up)), vec![Intent::Play(Action::Rotate)]);
        assert_eq!(
            input.key_down(press(KeyCode::Char(' '))),
            vec![Intent::Play(Action::HardDrop)]
        );
        assert_eq!(input.key_down(press(KeyCode::Esc)), vec![Intent::Quit]);
        assert!(input.key_down(press(KeyCode::Char('z'))).is_empty());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut input = InputHandler::new();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.key_down(key), vec![Intent::Quit]);
        assert_eq!(input.screen_intent(key), Some(Intent::Quit));
    }

    #[test]
    fn test_screen_intents() {
        let input = InputHandler::new();
        assert_eq!(input.screen_intent(press(KeyCode::Char(' '))), Some(Intent::Confirm));
        assert_eq!(input.screen_intent(press(KeyCode::Enter)), Some(Intent::Confirm));
        assert_eq!(input.screen_intent(press(KeyCode::Esc)), Some(Intent::Quit));
        assert_eq!(input.screen_intent(press(KeyCode::Char('Q'))), Some(Intent::Quit));
        assert_eq!(input.screen_intent(press(KeyCode::Left)), None);
    }

    #[test]
    fn test_held_key_repeats_after_das() {
        let mut input = InputHandler::new();
        let start = Instant::now();
        assert_eq!(input.key_down_at(press(KeyCode::Right), start).len(), 1);

        // the terminal keeps sending repeats while the key is held
        let mut now = start;
        let mut repeats = 0;
        for _ in 0..15 {
            now += Duration::from_millis(20);
            assert!(input.key_down_at(press(KeyCode::Right), now).is_empty());
            repeats += input.update_at(now).len();
        }
        // 300ms held: DAS fires at 180ms, ARR at 240ms and 300ms
        assert_eq!(repeats, 3);
    }

    #[test]
    fn test_released_key_times_out() {
        let mut input = InputHandler::new();
        let start = Instant::now();
        input.key_down_at(press(KeyCode::Left), start);
        assert!(input.update_at(start + Duration::from_millis(150)).is_empty());
        // pressing again counts as a fresh press
        assert_eq!(
            input.key_down_at(press(KeyCode::Left), start + Duration::from_millis(160)),
            vec![Intent::Play(Action::MoveLeft)]
        );
    }

    #[test]
    fn test_unknown_key_names_are_skipped() {
        let mut settings = Settings::default();
        settings.keys.rotate = vec!["Up".to_string(), "NotAKey".to_string(), "x".to_string()];
        let bindings = KeyBindings::from_settings(&settings);
        assert_eq!(bindings.rotate, vec![KeyCode::Up, KeyCode::Char('x')]);
    }
}
