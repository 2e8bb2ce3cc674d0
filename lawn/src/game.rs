use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entity::{Defender, Invader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Welcome,
    Playing,
    Paused,
    GameOver,
}

/// Keys the game reacts to. Anything else is ignored by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
}

/// Tunable constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub starting_suns: u32,
    pub defender_cost: u32,
    pub defender_size: f64,
    pub defender_health: i32,
    pub invader_size: f64,
    pub invader_health: i32,
    pub invader_speed: f64,
    /// Seconds between spawns
    pub spawn_interval: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            starting_suns: 50,
            defender_cost: 50,
            defender_size: 40.0,
            defender_health: 100,
            invader_size: 50.0,
            invader_health: 100,
            invader_speed: 50.0,
            spawn_interval: 3.0,
        }
    }
}

/// Values the host shows while playing. The score counts invaders removed
/// after their health ran out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub suns: u32,
    pub score: u32,
    /// Whole seconds of play
    pub elapsed_secs: u64,
}

pub struct Game<R = StdRng> {
    width: f64,
    height: f64,
    rules: Rules,
    state: GameState,
    suns: u32,
    score: u32,
    elapsed: f64,
    // Time since the last spawn. One accumulator per game, reset on start.
    spawn_clock: f64,
    defenders: Vec<Defender>,
    invaders: Vec<Invader>,
    rng: R,
}

impl Game<StdRng> {
    pub fn new(width: f64, height: f64) -> Self {
        Game::with_rng(width, height, Rules::default(), StdRng::from_os_rng())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(width: f64, height: f64, rules: Rules, rng: R) -> Self {
        let suns = rules.starting_suns;
        Game {
            width,
            height,
            rules,
            state: GameState::Welcome,
            suns,
            score: 0,
            elapsed: 0.0,
            spawn_clock: 0.0,
            defenders: Vec::new(),
            invaders: Vec::new(),
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn defenders(&self) -> &[Defender] {
        &self.defenders
    }

    pub fn invaders(&self) -> &[Invader] {
        &self.invaders
    }

    pub fn invaders_mut(&mut self) -> &mut [Invader] {
        &mut self.invaders
    }

    pub fn hud(&self) -> Hud {
        Hud {
            suns: self.suns,
            score: self.score,
            elapsed_secs: self.elapsed.floor() as u64,
        }
    }

    /// A click on the lawn at canvas coordinates `(x, y)`.
    pub fn click(&mut self, x: f64, y: f64) {
        match self.state {
            GameState::Welcome => self.start(),
            GameState::GameOver => self.set_state(GameState::Welcome),
            GameState::Playing => self.plant(x, y),
            GameState::Paused => {}
        }
    }

    pub fn key(&mut self, key: Key) {
        match (key, self.state) {
            (Key::Enter, GameState::Welcome) => self.start(),
            (Key::Enter, GameState::GameOver) => self.set_state(GameState::Welcome),
            (Key::Escape, GameState::Playing) => self.set_state(GameState::Paused),
            (Key::Escape, GameState::Paused) => self.set_state(GameState::Playing),
            _ => {}
        }
    }

    /// Advance the simulation by `delta` seconds. Does nothing unless playing.
    pub fn tick(&mut self, delta: f64) {
        if self.state != GameState::Playing || !delta.is_finite() || delta <= 0.0 {
            return;
        }

        self.elapsed += delta;

        for invader in &mut self.invaders {
            invader.advance(delta);
        }
        if self.invaders.iter().any(Invader::has_crossed) {
            self.set_state(GameState::GameOver);
        }
        let before = self.invaders.len();
        self.invaders.retain(Invader::is_alive);
        self.score += (before - self.invaders.len()) as u32;

        if self.state != GameState::Playing {
            return;
        }

        self.spawn_clock += delta;
        while self.spawn_clock >= self.rules.spawn_interval {
            self.spawn_clock -= self.rules.spawn_interval;
            self.spawn();
        }
    }

    fn start(&mut self) {
        self.suns = self.rules.starting_suns;
        self.score = 0;
        self.elapsed = 0.0;
        self.spawn_clock = 0.0;
        self.defenders.clear();
        self.invaders.clear();
        self.set_state(GameState::Playing);
    }

    fn set_state(&mut self, next: GameState) {
        tracing::debug!(from = ?self.state, to = ?next, "game state changed");
        self.state = next;
    }

    fn plant(&mut self, x: f64, y: f64) {
        if self.suns < self.rules.defender_cost {
            return;
        }
        self.suns -= self.rules.defender_cost;

        let size = self.rules.defender_size;
        self.defenders.push(Defender {
            x: x - size / 2.0,
            y: y - size / 2.0,
            width: size,
            height: size,
            health: self.rules.defender_health,
        });
    }

    fn spawn(&mut self) {
        let size = self.rules.invader_size;
        let max_y = self.height - size;
        let y = if max_y > 0.0 {
            self.rng.random_range(0.0..max_y)
        } else {
            0.0
        };

        self.invaders.push(Invader {
            x: self.width - size,
            y,
            width: size,
            height: size,
            health: self.rules.invader_health,
            speed: self.rules.invader_speed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::with_rng(800.0, 600.0, Rules::default(), StdRng::seed_from_u64(7))
    }

    fn playing() -> Game {
        let mut game = game();
        game.key(Key::Enter);
        game
    }

    #[test]
    fn test_starts_on_welcome() {
        let game = game();
        assert_eq!(game.state(), GameState::Welcome);
        assert_eq!(game.hud().suns, 50);
    }

    #[test]
    fn test_click_or_enter_starts() {
        let mut by_click = game();
        by_click.click(10.0, 10.0);
        assert_eq!(by_click.state(), GameState::Playing);
        // The starting click does not plant anything
        assert!(by_click.defenders().is_empty());

        assert_eq!(playing().state(), GameState::Playing);
    }

    #[test]
    fn test_escape_toggles_pause() {
        let mut game = playing();
        game.key(Key::Escape);
        assert_eq!(game.state(), GameState::Paused);
        game.key(Key::Escape);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_escape_does_nothing_on_welcome() {
        let mut game = game();
        game.key(Key::Escape);
        assert_eq!(game.state(), GameState::Welcome);
    }

    #[test]
    fn test_paused_time_does_not_advance() {
        let mut game = playing();
        game.tick(1.0);
        game.key(Key::Escape);
        game.tick(10.0);
        assert_eq!(game.hud().elapsed_secs, 1);
        assert!(game.invaders().is_empty());
    }

    #[test]
    fn test_planting_costs_suns() {
        let mut game = playing();
        game.click(100.0, 200.0);

        assert_eq!(game.hud().suns, 0);
        let plant = &game.defenders()[0];
        assert_eq!((plant.x, plant.y), (80.0, 180.0));
        assert_eq!((plant.width, plant.height), (40.0, 40.0));
        assert_eq!(plant.health, 100);

        // Not enough suns for a second one
        game.click(300.0, 200.0);
        assert_eq!(game.defenders().len(), 1);
    }

    #[test]
    fn test_spawns_every_interval() {
        let mut game = playing();
        game.tick(2.9);
        assert!(game.invaders().is_empty());

        game.tick(0.1);
        assert_eq!(game.invaders().len(), 1);
        let invader = &game.invaders()[0];
        assert_eq!(invader.x, 750.0);
        assert!(invader.y >= 0.0 && invader.y < 550.0);

        game.tick(3.0);
        assert_eq!(game.invaders().len(), 2);
    }

    #[test]
    fn test_large_frame_spawns_each_due_invader() {
        let mut game = playing();
        game.tick(6.5);
        assert_eq!(game.invaders().len(), 2);
    }

    #[test]
    fn test_invaders_move_left() {
        let mut game = playing();
        game.tick(3.0);
        game.tick(1.0);
        assert_eq!(game.invaders()[0].x, 700.0);
    }

    #[test]
    fn test_dead_invaders_are_removed() {
        let mut game = playing();
        game.tick(3.0);
        game.invaders_mut()[0].health = 0;
        game.tick(0.1);
        assert!(game.invaders().is_empty());
        assert_eq!(game.hud().score, 1);
    }

    #[test]
    fn test_crossing_the_left_edge_ends_the_game() {
        let mut game = playing();
        game.tick(3.0);
        // 750 px plus its own 50 px width at 50 px/s
        game.tick(15.9);
        assert_eq!(game.state(), GameState::Playing);
        game.tick(0.2);
        assert_eq!(game.state(), GameState::GameOver);

        game.click(0.0, 0.0);
        assert_eq!(game.state(), GameState::Welcome);
    }

    #[test]
    fn test_restart_resets_the_spawn_clock() {
        let mut game = playing();
        game.tick(3.0);
        game.tick(1.5);
        game.tick(15.0);
        assert_eq!(game.state(), GameState::GameOver);

        game.key(Key::Enter);
        assert_eq!(game.state(), GameState::Welcome);
        game.key(Key::Enter);
        assert_eq!(game.state(), GameState::Playing);
        assert!(game.invaders().is_empty());
        assert_eq!(game.hud(), Hud { suns: 50, score: 0, elapsed_secs: 0 });

        // A clock carried over from the last game would spawn here
        game.tick(2.9);
        assert!(game.invaders().is_empty());
        game.tick(0.1);
        assert_eq!(game.invaders().len(), 1);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut game = playing();
        game.tick(-1.0);
        game.tick(f64::NAN);
        assert_eq!(game.hud().elapsed_secs, 0);
    }
}
