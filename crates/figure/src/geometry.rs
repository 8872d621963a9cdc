//! Geometry primitives for the document space.
//!
//! [`Point`] doubles as a position and a movement vector. [`Rect`] is an
//! axis-aligned rectangle that derives its corners, center and containment
//! predicates. Both are immutable values; every operation returns a new one.

use crate::error::GeometryError;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use strum_macros::{Display, EnumIter};

/// A position or vector in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPoint", into = "RawPoint")]
pub struct Point(DVec2);

#[derive(Serialize, Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
}

impl Point {
    pub const ZERO: Point = Point(DVec2::ZERO);

    pub fn new(x: f64, y: f64) -> Result<Self, GeometryError> {
        check_number("x", x)?;
        check_number("y", y)?;
        Ok(Self(DVec2::new(x, y)))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn as_dvec2(&self) -> DVec2 {
        self.0
    }

    /// The vector that moves `self` onto `other`.
    pub fn offset_to(&self, other: Point) -> Point {
        other - *self
    }

    /// The vector that moves `other` onto `self`.
    pub fn offset_from(&self, other: Point) -> Point {
        *self - other
    }

    pub fn inverse(&self) -> Point {
        -*self
    }

    /// Scale both components, used for converting screen distances.
    pub fn scaled(&self, factor: f64) -> Point {
        Point(self.0 * factor)
    }
}

impl TryFrom<DVec2> for Point {
    type Error = GeometryError;

    fn try_from(v: DVec2) -> Result<Self, Self::Error> {
        Point::new(v.x, v.y)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.0
    }
}

impl TryFrom<RawPoint> for Point {
    type Error = GeometryError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Point::new(raw.x, raw.y)
    }
}

impl From<Point> for RawPoint {
    fn from(p: Point) -> Self {
        RawPoint { x: p.0.x, y: p.0.y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point(self.0 + other.0)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point(self.0 - other.0)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0.x, self.0.y)
    }
}

/// One of the four corners of a [`Rect`], clockwise from the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub fn opposite(&self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }
}

/// An axis-aligned rectangle in document space.
///
/// Width and height are expected to be non-negative; rectangles built from
/// gestures go through [`Rect::from_corner_points`] which normalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRect", into = "RawRect")]
pub struct Rect {
    origin: DVec2,
    size: DVec2,
}

#[derive(Serialize, Deserialize)]
struct RawRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        check_number("x", x)?;
        check_number("y", y)?;
        check_number("width", width)?;
        check_number("height", height)?;
        if width < 0.0 || height < 0.0 {
            return Err(GeometryError::NegativeSize { width, height });
        }
        Ok(Self {
            origin: DVec2::new(x, y),
            size: DVec2::new(width, height),
        })
    }

    /// Build a rectangle from literal components known not to be NaN.
    pub(crate) const fn from_components(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            size: DVec2::new(width, height),
        }
    }

    pub fn from_position_and_size(
        position: Point,
        width: f64,
        height: f64,
    ) -> Result<Self, GeometryError> {
        Rect::new(position.x(), position.y(), width, height)
    }

    /// Normalized rectangle spanned by two arbitrary corners.
    pub fn from_corner_points(a: Point, b: Point) -> Rect {
        let min = a.0.min(b.0);
        let max = a.0.max(b.0);
        Rect {
            origin: min,
            size: max - min,
        }
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    pub fn left(&self) -> f64 {
        self.origin.x
    }

    pub fn top(&self) -> f64 {
        self.origin.y
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.size.x
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.y
    }

    /// Top left corner.
    pub fn position(&self) -> Point {
        Point(self.origin)
    }

    pub fn center(&self) -> Point {
        Point(self.origin + self.size * 0.5)
    }

    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point(self.origin),
            Corner::TopRight => Point(DVec2::new(self.right(), self.top())),
            Corner::BottomRight => Point(self.origin + self.size),
            Corner::BottomLeft => Point(DVec2::new(self.left(), self.bottom())),
        }
    }

    /// Corners in clockwise order starting at the top left.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.corner(Corner::TopLeft),
            self.corner(Corner::TopRight),
            self.corner(Corner::BottomRight),
            self.corner(Corner::BottomLeft),
        ]
    }

    /// Inclusive on every edge.
    pub fn encloses_point(&self, point: Point) -> bool {
        point.x() >= self.left()
            && point.x() <= self.right()
            && point.y() >= self.top()
            && point.y() <= self.bottom()
    }

    /// Strict on every edge, so a rectangle never encloses itself.
    pub fn encloses_rect(&self, other: &Rect) -> bool {
        other.left() > self.left()
            && other.right() < self.right()
            && other.top() > self.top()
            && other.bottom() < self.bottom()
    }

    pub fn overlaps_rect(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn moved_by(&self, vector: Point) -> Rect {
        Rect {
            origin: self.origin + vector.0,
            size: self.size,
        }
    }

    pub fn with_position(&self, position: Point) -> Rect {
        Rect {
            origin: position.0,
            size: self.size,
        }
    }
}

impl TryFrom<RawRect> for Rect {
    type Error = GeometryError;

    fn try_from(raw: RawRect) -> Result<Self, Self::Error> {
        Rect::new(raw.x, raw.y, raw.width, raw.height)
    }
}

impl From<Rect> for RawRect {
    fn from(rect: Rect) -> Self {
        RawRect {
            x: rect.origin.x,
            y: rect.origin.y,
            width: rect.size.x,
            height: rect.size.y,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {} {}x{}]",
            self.origin.x, self.origin.y, self.size.x, self.size.y
        )
    }
}

fn check_number(component: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_nan() {
        Err(GeometryError::NotANumber { component })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y).unwrap()
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    #[test]
    fn test_point_arithmetic() {
        let a = pt(3.0, 4.0);
        let b = pt(1.0, -2.0);
        assert_eq!(a + b, pt(4.0, 2.0));
        assert_eq!(a - b, pt(2.0, 6.0));
        assert_eq!(a.inverse(), pt(-3.0, -4.0));
        assert_eq!(b.offset_to(a), pt(2.0, 6.0));
        assert_eq!(a.offset_from(b), pt(2.0, 6.0));
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(Point::new(f64::NAN, 0.0).is_err());
        assert_eq!(
            Rect::new(0.0, 0.0, f64::NAN, 1.0),
            Err(GeometryError::NotANumber { component: "width" })
        );
    }

    #[test]
    fn test_negative_size_is_rejected() {
        assert_eq!(
            Rect::new(10.0, 10.0, -5.0, 4.0),
            Err(GeometryError::NegativeSize { width: -5.0, height: 4.0 })
        );
        assert!(Rect::new(0.0, 0.0, 0.0, 0.0).is_ok());
        let json = r#"{"x":0,"y":0,"width":10,"height":-1}"#;
        assert!(serde_json::from_str::<Rect>(json).is_err());
    }

    #[test]
    fn test_encloses_point_is_inclusive() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(r.encloses_point(pt(0.0, 0.0)));
        assert!(r.encloses_point(pt(10.0, 10.0)));
        assert!(r.encloses_point(pt(5.0, 5.0)));
        assert!(!r.encloses_point(pt(10.1, 5.0)));
    }

    #[test]
    fn test_encloses_rect_is_strict() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        assert!(outer.encloses_rect(&rect(10.0, 10.0, 20.0, 20.0)));
        assert!(!outer.encloses_rect(&outer));
        assert!(!outer.encloses_rect(&rect(0.0, 10.0, 20.0, 20.0)));
        assert!(!outer.encloses_rect(&rect(90.0, 90.0, 20.0, 20.0)));
    }

    #[test]
    fn test_overlaps_rect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps_rect(&rect(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps_rect(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps_rect(&rect(20.0, 20.0, 1.0, 1.0)));
    }

    #[test]
    fn test_from_corner_points_is_order_independent() {
        let expected = rect(10.0, 10.0, 20.0, 20.0);
        assert_eq!(Rect::from_corner_points(pt(10.0, 10.0), pt(30.0, 30.0)), expected);
        assert_eq!(Rect::from_corner_points(pt(30.0, 30.0), pt(10.0, 10.0)), expected);
        assert_eq!(Rect::from_corner_points(pt(10.0, 30.0), pt(30.0, 10.0)), expected);
    }

    #[test]
    fn test_corners_and_center() {
        let r = rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(
            r.corners(),
            [pt(10.0, 20.0), pt(40.0, 20.0), pt(40.0, 60.0), pt(10.0, 60.0)]
        );
        assert_eq!(r.center(), pt(25.0, 40.0));
        for corner in Corner::iter() {
            assert_eq!(r.corner(corner.opposite().opposite()), r.corner(corner));
        }
    }

    #[test]
    fn test_moved_by_keeps_size() {
        let r = rect(1.0, 2.0, 3.0, 4.0).moved_by(pt(10.0, -2.0));
        assert_eq!(r, rect(11.0, 0.0, 3.0, 4.0));
    }

    #[test]
    fn test_rect_json_shape() {
        let json = serde_json::to_string(&rect(1.0, 2.0, 3.5, 4.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"width":3.5,"height":4.0}"#);
        assert!(serde_json::from_str::<Rect>(r#"{"x":1,"y":2}"#).is_err());
    }
}
