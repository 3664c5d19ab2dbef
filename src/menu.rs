//! Start and game-over screens
//!
//! Both are blocking loops that return `true` to go on playing and `false`
//! to quit. The core session is idle while they run.

use crate::input::{InputHandler, Intent};
use crate::ui;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use std::io;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Silence needed before a screen takes input, longer than a terminal's
/// initial key-repeat delay
const QUIET_GAP: Duration = Duration::from_millis(600);

/// What the game-over screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u64,
    pub best_score: u64,
    pub new_best: bool,
    pub lines: u32,
    pub level: u32,
}

/// Show the title screen until the player starts or quits
pub fn show_start_screen<B: Backend>(
    terminal: &mut Terminal<B>,
    input: &InputHandler,
    best_score: u64,
) -> io::Result<bool> {
    wait_for_choice(terminal, input, |frame| ui::render_start_screen(frame, best_score))
}

/// Show the final score until the player restarts or quits
pub fn show_game_over_screen<B: Backend>(
    terminal: &mut Terminal<B>,
    input: &InputHandler,
    summary: &GameOverSummary,
) -> io::Result<bool> {
    wait_for_choice(terminal, input, |frame| ui::render_game_over_screen(frame, summary))
}

fn wait_for_choice<B, F>(terminal: &mut Terminal<B>, input: &InputHandler, render: F) -> io::Result<bool>
where
    B: Backend,
    F: Fn(&mut ratatui::Frame),
{
    let mut gate = KeyGate::default();

    loop {
        // Redraw every pass so a resize is picked up
        terminal.draw(|frame| render(frame))?;

        let ready = event::poll(gate.poll_timeout())?;
        if !gate.admit(ready) {
            if ready {
                // held over from play, or auto-repeat of a held key
                event::read()?;
            }
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match input.screen_intent(key) {
                Some(Intent::Confirm) => return Ok(true),
                Some(Intent::Quit) => return Ok(false),
                _ => {}
            }
        }
    }
}

/// Drops keys still arriving from play until the keyboard has gone quiet
#[derive(Debug, Default)]
struct KeyGate {
    armed: bool,
}

impl KeyGate {
    fn poll_timeout(&self) -> Duration {
        if self.armed { POLL_INTERVAL } else { QUIET_GAP }
    }

    /// Record a poll result; true when the pending event should be handled
    fn admit(&mut self, ready: bool) -> bool {
        if !ready {
            self.armed = true;
        }
        ready && self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_drops_events_until_quiet() {
        let mut gate = KeyGate::default();
        assert_eq!(gate.poll_timeout(), QUIET_GAP);

        // a held space keeps repeating into the screen
        for _ in 0..5 {
            assert!(!gate.admit(true));
        }

        // released: one quiet poll arms the gate
        assert!(!gate.admit(false));
        assert_eq!(gate.poll_timeout(), POLL_INTERVAL);
        assert!(gate.admit(true));
        assert!(!gate.admit(false));
        assert!(gate.admit(true));
    }
}
