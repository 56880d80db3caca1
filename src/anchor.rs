//! Compass anchors for placing boxes and text
//!
//! ```text
//!     nw   n   ne
//!     w    c    e
//!     sw   s   se
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Vertical {
    /// Anchor on the top edge.
    North,
    #[default]
    Middle,
    /// Anchor on the bottom edge.
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Horizontal {
    /// Anchor on the left edge.
    West,
    #[default]
    Center,
    /// Anchor on the right edge.
    East,
}

/// Which point of a bounding box sits on the given coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Anchor {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

impl Anchor {
    pub const NW: Anchor = Anchor::new(Vertical::North, Horizontal::West);
    pub const N: Anchor = Anchor::new(Vertical::North, Horizontal::Center);
    pub const NE: Anchor = Anchor::new(Vertical::North, Horizontal::East);
    pub const W: Anchor = Anchor::new(Vertical::Middle, Horizontal::West);
    pub const C: Anchor = Anchor::new(Vertical::Middle, Horizontal::Center);
    pub const E: Anchor = Anchor::new(Vertical::Middle, Horizontal::East);
    pub const SW: Anchor = Anchor::new(Vertical::South, Horizontal::West);
    pub const S: Anchor = Anchor::new(Vertical::South, Horizontal::Center);
    pub const SE: Anchor = Anchor::new(Vertical::South, Horizontal::East);

    pub const ALL: [Anchor; 9] = [
        Self::NW,
        Self::N,
        Self::NE,
        Self::W,
        Self::C,
        Self::E,
        Self::SW,
        Self::S,
        Self::SE,
    ];

    pub const fn new(vertical: Vertical, horizontal: Horizontal) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Reads an anchor token. Never fails.
    ///
    /// The first character picks the vertical edge (`n`/`s`), the last the
    /// horizontal edge (`w`/`e`); anything else on an axis means the middle.
    pub fn parse(token: &str) -> Self {
        let vertical = match token.chars().next() {
            Some('n') => Vertical::North,
            Some('s') => Vertical::South,
            _ => Vertical::Middle,
        };
        let horizontal = match token.chars().next_back() {
            Some('w') => Horizontal::West,
            Some('e') => Horizontal::East,
            _ => Horizontal::Center,
        };
        Self::new(vertical, horizontal)
    }

    /// Distance from the box origin (lower-left corner) to the anchor point.
    pub fn offset(self, width: f32, height: f32) -> (f32, f32) {
        (self.x_offset(width), self.y_offset(height))
    }

    pub fn x_offset(self, width: f32) -> f32 {
        match self.horizontal {
            Horizontal::West => 0.0,
            Horizontal::East => width,
            Horizontal::Center => 0.5 * width,
        }
    }

    pub fn y_offset(self, height: f32) -> f32 {
        match self.vertical {
            Vertical::South => 0.0,
            Vertical::North => height,
            Vertical::Middle => 0.5 * height,
        }
    }

    pub const fn token(self) -> &'static str {
        match (self.vertical, self.horizontal) {
            (Vertical::North, Horizontal::West) => "nw",
            (Vertical::North, Horizontal::Center) => "n",
            (Vertical::North, Horizontal::East) => "ne",
            (Vertical::Middle, Horizontal::West) => "w",
            (Vertical::Middle, Horizontal::Center) => "c",
            (Vertical::Middle, Horizontal::East) => "e",
            (Vertical::South, Horizontal::West) => "sw",
            (Vertical::South, Horizontal::Center) => "s",
            (Vertical::South, Horizontal::East) => "se",
        }
    }
}

impl FromStr for Anchor {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Anchor {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
