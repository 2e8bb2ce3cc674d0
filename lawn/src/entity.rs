/// A stationary plant placed by the player.
#[derive(Debug, Clone, PartialEq)]
pub struct Defender {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub health: i32,
}

/// An adversary walking from the right edge towards the left boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Invader {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub health: i32,
    /// Pixels per second
    pub speed: f64,
}

impl Invader {
    pub(crate) fn advance(&mut self, delta: f64) {
        self.x -= self.speed * delta;
    }

    /// Entirely past the left edge of the lawn.
    pub fn has_crossed(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
