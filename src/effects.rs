//! Line-clear particles
//!
//! Purely decorative. The session hands over `ClearEffect`s and this module
//! owns everything after that; nothing here feeds back into gameplay.
//! Positions are in board cells, velocities in cells per frame.

use crate::board::ClearEffect;
use crate::tetromino::PieceColor;
use rand::Rng;

const PARTICLES_PER_CELL: usize = 5;
/// One board cell measured in the units the velocities were tuned in
const CELL_UNITS: f32 = 30.0;
const GRAVITY: f32 = 0.2 / CELL_UNITS;
const FULL_LIFE: u8 = 255;
const FADE_PER_FRAME: u8 = 5;
const MAX_PARTICLES: usize = 2000;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    dx: f32,
    dy: f32,
    pub life: u8,
    pub color: PieceColor,
}

impl Particle {
    fn new(x: f32, y: f32, color: PieceColor, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            dx: rng.gen_range(-2.0f32..=2.0) / CELL_UNITS,
            dy: rng.gen_range(-5.0f32..=-1.0) / CELL_UNITS,
            life: FULL_LIFE,
            color,
        }
    }

    /// Advance one frame, returns false once the particle has faded out
    fn update(&mut self) -> bool {
        self.x += self.dx;
        self.y += self.dy;
        self.dy += GRAVITY;
        self.life = self.life.saturating_sub(FADE_PER_FRAME);
        self.life > 0
    }

    /// Past half its life the particle is drawn dimmed
    pub fn is_fading(&self) -> bool {
        self.life < FULL_LIFE / 2
    }
}

#[derive(Debug, Default)]
pub struct Particles {
    particles: Vec<Particle>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Burst from the centre of every cleared cell
    pub fn spawn(&mut self, effects: &[ClearEffect]) {
        let mut rng = rand::thread_rng();
        for effect in effects {
            let cx = effect.x as f32 + 0.5;
            let cy = effect.y as f32 + 0.5;
            for _ in 0..PARTICLES_PER_CELL {
                self.particles
                    .push(Particle::new(cx, cy, effect.color, &mut rng));
            }
        }
        if self.particles.len() > MAX_PARTICLES {
            let excess = self.particles.len() - MAX_PARTICLES;
            self.particles.drain(..excess);
        }
    }

    /// Advance all particles by one frame
    pub fn update(&mut self) {
        self.particles.retain_mut(Particle::update);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.particles.len()
    }
}
