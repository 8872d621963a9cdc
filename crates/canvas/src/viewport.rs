use figure::{Point, Rect};
use glam::{DAffine2, DVec2};
use log::warn;

/// Maps document coordinates to screen coordinates.
///
/// The transform is a uniform scale followed by a translation. Panning and
/// zooming compose new operations on the screen side of the current matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    matrix: DAffine2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            matrix: DAffine2::IDENTITY,
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pan by a vector in screen coordinates.
    pub fn translate_by(&mut self, screen_vector: Point) {
        self.matrix = DAffine2::from_translation(screen_vector.as_dvec2()) * self.matrix;
    }

    /// Zoom by `factor` while the document point under `screen_point` stays put.
    /// Factors that are not finite and positive are ignored.
    pub fn scale_around_point(&mut self, factor: f64, screen_point: Point) {
        if !(factor.is_finite() && factor > 0.0) {
            warn!("ignoring zoom factor {factor}");
            return;
        }
        let pivot = screen_point.as_dvec2();
        self.matrix = DAffine2::from_translation(pivot)
            * DAffine2::from_scale(DVec2::splat(factor))
            * DAffine2::from_translation(-pivot)
            * self.matrix;
    }

    pub fn scale(&self) -> f64 {
        self.matrix.matrix2.x_axis.x
    }

    pub fn translation(&self) -> Point {
        point(self.matrix.translation)
    }

    pub fn to_screen(&self, document_point: Point) -> Point {
        point(self.matrix.transform_point2(document_point.as_dvec2()))
    }

    pub fn to_document(&self, screen_point: Point) -> Point {
        point(self.matrix.inverse().transform_point2(screen_point.as_dvec2()))
    }

    pub fn to_screen_rect(&self, rect: Rect) -> Rect {
        Rect::from_corner_points(
            self.to_screen(rect.position()),
            self.to_screen(rect.corner(figure::Corner::BottomRight)),
        )
    }

    pub fn to_document_rect(&self, rect: Rect) -> Rect {
        Rect::from_corner_points(
            self.to_document(rect.position()),
            self.to_document(rect.corner(figure::Corner::BottomRight)),
        )
    }

    /// Converts a screen distance into a document distance. Pan does not apply.
    pub fn document_movement(&self, screen_vector: Point) -> Point {
        screen_vector.scaled(1.0 / self.scale())
    }

    /// Column-major `[a, b, c, d, e, f]`, the layout 2D drawing backends take.
    pub fn to_array(&self) -> [f64; 6] {
        let m = self.matrix;
        [
            m.matrix2.x_axis.x,
            m.matrix2.x_axis.y,
            m.matrix2.y_axis.x,
            m.matrix2.y_axis.y,
            m.translation.x,
            m.translation.y,
        ]
    }

    pub fn reset(&mut self) {
        self.matrix = DAffine2::IDENTITY;
    }
}

// The scale is always positive, so the matrix stays invertible.
fn point(v: DVec2) -> Point {
    Point::try_from(v).unwrap_or(Point::ZERO)
}
