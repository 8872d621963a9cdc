//! Handles shown around the selected figure.
//!
//! A figure kind says which handles it offers ([`HandleSpec`]) in document
//! space. This module gives them a fixed on-screen size, hit testing and the
//! pointer behavior that turns a click or drag into a command.

use crate::canvas::Canvas;
use crate::config::CanvasConfig;
use crate::error::{CanvasError, EditCancelled};
use crate::events::DragEvent;
use crate::history::{ChangeAttribute, ChangeFigureRect, RemoveFigureAndContained};
use crate::viewport::ViewTransform;
use figure::{
    AttributeError, AttributeType, AttributeValue, Color, Corner, FigureId, HandleSpec, Point, Rect,
    RenderSurface,
};
use log::debug;

const DELETE_COLOR: Color = Color::rgb(0.9, 0.2, 0.2);
const EDIT_COLOR: Color = Color::rgb(0.87, 0.87, 0.87);
const TOGGLE_COLOR: Color = Color::rgb(0.1, 0.6, 0.2);

/// A handle of one figure, captured with the figure's rect at the time it was built.
#[derive(Clone, Debug, PartialEq)]
pub struct Handle {
    figure: FigureId,
    figure_rect: Rect,
    spec: HandleSpec,
}

impl Handle {
    pub fn new(figure: FigureId, figure_rect: Rect, spec: HandleSpec) -> Self {
        Self {
            figure,
            figure_rect,
            spec,
        }
    }

    pub fn figure(&self) -> FigureId {
        self.figure
    }

    pub fn spec(&self) -> &HandleSpec {
        &self.spec
    }

    /// Document point the handle is attached to.
    pub fn anchor(&self) -> Point {
        match &self.spec {
            HandleSpec::Resize(corner) => self.figure_rect.corner(*corner),
            HandleSpec::EditText { anchor, .. } => *anchor,
            HandleSpec::ToggleListItem { area, .. } => area.position(),
            HandleSpec::Delete => self.figure_rect.corner(Corner::TopRight),
        }
    }

    /// Hit area on screen. Resize, edit and delete handles keep their size at any zoom.
    pub fn screen_rect(&self, view: &ViewTransform, config: &CanvasConfig) -> Option<Rect> {
        let anchor = view.to_screen(self.anchor());
        match &self.spec {
            HandleSpec::Resize(_) => {
                let size = config.resize_handle_size;
                Rect::new(anchor.x() - size / 2.0, anchor.y() - size / 2.0, size, size).ok()
            }
            HandleSpec::EditText { .. } => {
                let size = config.action_handle_size;
                let far = Point::new(anchor.x() + size, anchor.y() - size).ok()?;
                Some(Rect::from_corner_points(anchor, far))
            }
            HandleSpec::ToggleListItem { area, .. } => Some(view.to_screen_rect(*area)),
            HandleSpec::Delete => {
                let size = config.action_handle_size;
                Rect::new(anchor.x() + 2.0 * size, anchor.y() - size, size, size).ok()
            }
        }
    }

    pub fn encloses_screen_point(
        &self,
        view: &ViewTransform,
        config: &CanvasConfig,
        point: Point,
    ) -> bool {
        self.screen_rect(view, config)
            .is_some_and(|rect| rect.encloses_point(point))
    }

    /// Draws the handle in screen space; the surface transform must be reset.
    pub fn draw(
        &self,
        surface: &mut dyn RenderSurface,
        view: &ViewTransform,
        config: &CanvasConfig,
    ) {
        let Some(rect) = self.screen_rect(view, config) else {
            return;
        };
        match &self.spec {
            HandleSpec::Resize(_) => {
                surface.fill_rect(rect, Color::WHITE);
                surface.stroke_rect(rect, Color::ACCENT);
            }
            HandleSpec::EditText { .. } => {
                surface.fill_rect(rect, EDIT_COLOR);
                surface.stroke_rect(rect, Color::BLACK);
            }
            HandleSpec::ToggleListItem { .. } => surface.stroke_rect(rect, TOGGLE_COLOR),
            HandleSpec::Delete => surface.fill_rect(rect, DELETE_COLOR),
        }
    }

    /// The rect a resize drag by `movement` produces; the opposite corner stays put.
    pub fn resized_rect(&self, corner: Corner, movement: Point) -> Rect {
        let fixed = self.figure_rect.corner(corner.opposite());
        let moved = self.figure_rect.corner(corner) + movement;
        Rect::from_corner_points(fixed, moved)
    }

    pub fn on_pointer_down(&self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        match &self.spec {
            HandleSpec::Resize(_) => Ok(()),
            HandleSpec::EditText { attribute, .. } => self.edit_text(canvas, attribute),
            HandleSpec::ToggleListItem {
                attribute, index, ..
            } => self.toggle(canvas, attribute, *index),
            HandleSpec::Delete => {
                let command = RemoveFigureAndContained::new(canvas.document(), self.figure)?;
                canvas.execute(Box::new(command))?;
                Ok(())
            }
        }
    }

    pub fn on_drag_start(&self, canvas: &mut Canvas) -> Result<(), CanvasError> {
        if let HandleSpec::Resize(_) = self.spec {
            canvas.start_preview_of(self.figure)?;
        }
        Ok(())
    }

    pub fn on_drag(&self, canvas: &mut Canvas, event: &DragEvent) -> Result<(), CanvasError> {
        if let HandleSpec::Resize(corner) = self.spec {
            let rect = self.resized_rect(corner, event.document_drag_movement(canvas.view()));
            if let Some(preview) = canvas.previewed_figure_mut() {
                preview.set_rect(rect);
            }
        }
        Ok(())
    }

    pub fn on_drag_end(&self, canvas: &mut Canvas, event: &DragEvent) -> Result<(), CanvasError> {
        let HandleSpec::Resize(corner) = self.spec else {
            return Ok(());
        };
        canvas.end_preview();
        let rect = self.resized_rect(corner, event.document_drag_movement(canvas.view()));
        if rect == self.figure_rect {
            return Ok(());
        }
        let command = ChangeFigureRect::new(canvas.document(), self.figure, rect)?;
        canvas.execute(Box::new(command))?;
        Ok(())
    }

    fn edit_text(&self, canvas: &mut Canvas, attribute: &str) -> Result<(), CanvasError> {
        let current = canvas
            .document()
            .drawing
            .figure(self.figure)?
            .attribute(attribute)?
            .and_then(AttributeValue::as_text)
            .unwrap_or_default()
            .to_string();
        let text = match canvas.request_text("Edit label", &current) {
            Ok(text) => text,
            Err(EditCancelled) => {
                debug!("edit of {attribute} on {} cancelled", self.figure);
                return Ok(());
            }
        };
        let value = AttributeValue::Text(text);
        let command = ChangeAttribute::new(canvas.document(), self.figure, attribute, value)?;
        canvas.execute(Box::new(command))?;
        Ok(())
    }

    fn toggle(
        &self,
        canvas: &mut Canvas,
        attribute: &str,
        index: usize,
    ) -> Result<(), CanvasError> {
        let list = match canvas.document().drawing.figure(self.figure)?.attribute(attribute)? {
            Some(AttributeValue::SingleSelect(list)) => list.clone(),
            Some(other) => {
                return Err(AttributeError::TypeMismatch {
                    key: attribute.to_string(),
                    expected: AttributeType::SingleSelect,
                    found: other.value_type(),
                }
                .into())
            }
            None => {
                return Err(AttributeError::InvalidValue {
                    key: attribute.to_string(),
                    reason: "no list to select from".to_string(),
                }
                .into())
            }
        };
        if list.selected_index() == index {
            return Ok(());
        }
        let value = AttributeValue::SingleSelect(list.with_selected(index)?);
        let command = ChangeAttribute::new(canvas.document(), self.figure, attribute, value)?;
        canvas.execute(Box::new(command))?;
        Ok(())
    }
}
