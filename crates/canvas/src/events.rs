use crate::viewport::ViewTransform;
use figure::Point;

/// A pointer position in screen coordinates together with where the pointer was
/// when the previous event fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub screen_position: Point,
    pub previous_screen_position: Point,
}

impl PointerEvent {
    pub fn new(screen_position: Point, previous_screen_position: Point) -> Self {
        Self {
            screen_position,
            previous_screen_position,
        }
    }

    pub fn document_position(&self, view: &ViewTransform) -> Point {
        view.to_document(self.screen_position)
    }

    /// Screen distance since the previous event.
    pub fn screen_movement(&self) -> Point {
        self.previous_screen_position.offset_to(self.screen_position)
    }

    pub fn document_movement(&self, view: &ViewTransform) -> Point {
        view.document_movement(self.screen_movement())
    }
}

/// A pointer event during a drag; also knows where the button went down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragEvent {
    pub pointer: PointerEvent,
    pub down_screen_position: Point,
}

impl DragEvent {
    pub fn new(pointer: PointerEvent, down_screen_position: Point) -> Self {
        Self {
            pointer,
            down_screen_position,
        }
    }

    /// Screen distance from the down point.
    pub fn screen_drag_movement(&self) -> Point {
        self.down_screen_position.offset_to(self.pointer.screen_position)
    }

    pub fn document_drag_movement(&self, view: &ViewTransform) -> Point {
        view.document_movement(self.screen_drag_movement())
    }

    pub fn down_document_position(&self, view: &ViewTransform) -> Point {
        view.to_document(self.down_screen_position)
    }

    pub fn document_position(&self, view: &ViewTransform) -> Point {
        self.pointer.document_position(view)
    }
}
