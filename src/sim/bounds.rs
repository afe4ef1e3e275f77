//! Axis-aligned bounding boxes and contact classification
//!
//! The entire collision model is rectangle vs. rectangle with a single
//! dominant contact side per pair, picked by smallest penetration depth.
//! Coordinates are screen-style: y grows downward, so `Contact::Top` means
//! "the mover is resting on top of the other box".

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Dominant contact side of an overlap, from the perspective of `self`
/// relative to `other`: `Top` = self sits above other (standing on it),
/// `Bottom` = self is underneath (head bump), `Left`/`Right` = side contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Contact {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

impl Contact {
    /// The contact the other box would report for the same overlap
    pub fn mirrored(self) -> Self {
        match self {
            Contact::None => Contact::None,
            Contact::Top => Contact::Bottom,
            Contact::Bottom => Contact::Top,
            Contact::Left => Contact::Right,
            Contact::Right => Contact::Left,
        }
    }
}

/// Axis-aligned rectangle: top-left corner position plus half extents.
///
/// Invariant: half extents are strictly positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top-left corner
    pub pos: Vec2,
    /// Half extents (both components > 0)
    pub half: Vec2,
}

impl BoundingBox {
    pub fn new(pos: Vec2, half: Vec2) -> Self {
        debug_assert!(half.x > 0.0 && half.y > 0.0, "degenerate half extents");
        Self { pos, half }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.half * 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.half
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.half.x * 2.0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.half.y * 2.0
    }

    /// Move the box so its center lands on `center`
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.half;
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        let (px, py) = self.penetration(other);
        px > 0.0 && py > 0.0
    }

    /// Penetration depth along each axis (positive on both = overlap)
    fn penetration(&self, other: &BoundingBox) -> (f32, f32) {
        let px = (self.max().x.min(other.max().x)) - (self.min().x.max(other.min().x));
        let py = (self.max().y.min(other.max().y)) - (self.min().y.max(other.min().y));
        (px, py)
    }

    /// Classify the overlap with `other` as a single dominant contact side.
    ///
    /// The axis with the smaller penetration wins; ties resolve vertically,
    /// matching the single-dominant-contact policy. Pure geometry, nothing is
    /// cached on the box.
    pub fn classify(&self, other: &BoundingBox) -> Contact {
        let (px, py) = self.penetration(other);
        if px <= 0.0 || py <= 0.0 {
            return Contact::None;
        }

        if py <= px {
            if self.center().y <= other.center().y {
                Contact::Top
            } else {
                Contact::Bottom
            }
        } else if self.center().x <= other.center().x {
            Contact::Left
        } else {
            Contact::Right
        }
    }

    /// Overlap depth along the dominant axis (0 when separated)
    pub fn overlap_depth(&self, other: &BoundingBox) -> f32 {
        let (px, py) = self.penetration(other);
        if px <= 0.0 || py <= 0.0 {
            return 0.0;
        }
        px.min(py)
    }
}
