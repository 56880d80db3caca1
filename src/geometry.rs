//! Geometry primitives - Point, Rect, Angle, dash expansion

use std::ops::{Add, Neg, Sub};

/// Length covered by one dash/gap pair when no dash count is given.
pub const DASH_SPACING: f32 = 30.0;

/// Angle between the shaft and each barb of an arrowhead.
pub const BARB_ANGLE_DEGREES: f32 = 150.0;

/// Default arrowhead length as a fraction of the shaft length (about 1/12).
pub const ARROWHEAD_RATIO: f32 = 0.083_333;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The point at polar offset `(r, theta)` from `self`.
    #[inline]
    pub fn polar(self, r: f32, theta: Angle) -> Self {
        let (sin, cos) = theta.as_radians().sin_cos();
        Self {
            x: r.mul_add(cos, self.x),
            y: r.mul_add(sin, self.y),
        }
    }

    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Direction from `self` towards `other`; `atan2(0, 0)` is zero.
    #[inline]
    pub fn direction_to(self, other: Point) -> Angle {
        Angle::radians((other.y - self.y).atan2(other.x - self.x))
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x0: 0.0,
        y0: 0.0,
        x1: 0.0,
        y1: 0.0,
    };

    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A plane angle, stored in radians.
///
/// Build one with [`Angle::degrees`] or [`Angle::radians`]; every polar
/// operation on the canvas accepts either.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Angle(f32);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    #[inline]
    pub const fn radians(value: f32) -> Self {
        Self(value)
    }

    #[inline]
    pub fn degrees(value: f32) -> Self {
        Self(value.to_radians())
    }

    #[inline]
    pub const fn as_radians(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn as_degrees(self) -> f32 {
        self.0.to_degrees()
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

/// The two barb directions of an arrowhead whose shaft points along `shaft`.
pub fn barb_angles(shaft: Angle) -> [Angle; 2] {
    let barb = Angle::degrees(BARB_ANGLE_DEGREES);
    [shaft + barb, shaft - barb]
}

pub fn default_arrowhead_length(shaft_length: f32) -> f32 {
    ARROWHEAD_RATIO * shaft_length
}

/// `floor(length / 30) + 2`; never less than two, saturating at `u32::MAX`.
pub fn default_dash_count(length: f32) -> u32 {
    let extra = (length / DASH_SPACING).floor();
    if extra.is_finite() && extra > 0.0 {
        // float to int casts saturate
        (extra as u32).saturating_add(2)
    } else {
        2
    }
}

/// One drawn stroke of a dashed line: a start point and its delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub start: Point,
    pub dx: f32,
    pub dy: f32,
}

impl Dash {
    pub fn end(&self) -> Point {
        self.start.offset(self.dx, self.dy)
    }
}

/// Splits `start..end` into `2n - 1` equal pieces and yields the even ones.
///
/// Zero dashes yields nothing.
pub fn dash_segments(start: Point, end: Point, num_dashes: u32) -> impl Iterator<Item = Dash> {
    let divisions = (2 * u64::from(num_dashes)).saturating_sub(1).max(1) as f32;
    let dx = (end.x - start.x) / divisions;
    let dy = (end.y - start.y) / divisions;

    (0..num_dashes).map(move |i| {
        let k = 2.0 * i as f32;
        Dash {
            start: Point::new(k.mul_add(dx, start.x), k.mul_add(dy, start.y)),
            dx,
            dy,
        }
    })
}
