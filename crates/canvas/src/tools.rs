//! # Tools
//!
//! A tool decides what pointer input means. The [`Canvas`] turns raw pointer
//! positions into down, move, drag and up events and hands them to the active
//! tool, which reacts by changing the view, driving a preview or executing a
//! command.
//!
//! - [`SelectionTool`]: select, move and resize figures, pan and zoom the view
//! - [`CreateFigureTool`]: drag out a new figure from a prototype
//! - [`NoopTool`]: ignores all input

use crate::canvas::Canvas;
use crate::error::CanvasError;
use crate::events::{DragEvent, PointerEvent};
use crate::handles::Handle;
use crate::history::{ChangeFigureRect, CreateFigure};
use figure::{find_figures_below_point, Figure, FigureId, Point, Rect};
use std::fmt;
use strum_macros::{Display, EnumIter};

#[derive(Default, Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Select, move and resize figures
    #[default]
    Selection,
    /// Drag out a new figure
    CreateFigure,
    Noop,
}

/// Reacts to pointer input on a [`Canvas`].
///
/// Every callback defaults to doing nothing.
pub trait Tool: fmt::Debug {
    fn kind(&self) -> ToolKind;

    fn on_pointer_down(
        &mut self,
        _canvas: &mut Canvas,
        _event: &PointerEvent,
    ) -> Result<(), CanvasError> {
        Ok(())
    }

    /// Pointer moved with no button held.
    fn on_pointer_move(
        &mut self,
        _canvas: &mut Canvas,
        _event: &PointerEvent,
    ) -> Result<(), CanvasError> {
        Ok(())
    }

    fn on_drag_start(
        &mut self,
        _canvas: &mut Canvas,
        _event: &DragEvent,
    ) -> Result<(), CanvasError> {
        Ok(())
    }

    fn on_drag(&mut self, _canvas: &mut Canvas, _event: &DragEvent) -> Result<(), CanvasError> {
        Ok(())
    }

    fn on_drag_end(&mut self, _canvas: &mut Canvas, _event: &DragEvent) -> Result<(), CanvasError> {
        Ok(())
    }

    fn on_pointer_up(
        &mut self,
        _canvas: &mut Canvas,
        _event: &PointerEvent,
    ) -> Result<(), CanvasError> {
        Ok(())
    }

    fn on_wheel(
        &mut self,
        _canvas: &mut Canvas,
        _event: &PointerEvent,
        _delta: f64,
    ) -> Result<(), CanvasError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTool;

impl Tool for NoopTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Noop
    }
}

/// What the selection tool is doing with the current press.
#[derive(Debug, Clone)]
enum Tracker {
    /// Interacting with a handle of the selected figure.
    Handle(Handle),
    /// Dragging empty space scrolls the view.
    Pan,
    /// Moving a figure; the drawing only changes when the drag ends.
    Drag(FigureId),
}

#[derive(Debug, Default)]
pub struct SelectionTool {
    tracker: Option<Tracker>,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for SelectionTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Selection
    }

    fn on_pointer_down(
        &mut self,
        canvas: &mut Canvas,
        event: &PointerEvent,
    ) -> Result<(), CanvasError> {
        let screen_point = event.screen_position;
        let handle = canvas
            .handles()
            .into_iter()
            .find(|handle| {
                handle.encloses_screen_point(canvas.view(), canvas.config(), screen_point)
            });
        if let Some(handle) = handle {
            handle.on_pointer_down(canvas)?;
            self.tracker = Some(Tracker::Handle(handle));
            return Ok(());
        }

        let drawing = &canvas.document().drawing;
        let point = event.document_position(canvas.view());
        let below = find_figures_below_point(drawing, drawing.root(), point, false);
        match below.first() {
            None => {
                canvas.clear_selection();
                self.tracker = Some(Tracker::Pan);
            }
            Some(&innermost) => {
                canvas.select(innermost)?;
                self.tracker = Some(Tracker::Drag(innermost));
            }
        }
        Ok(())
    }

    fn on_drag_start(
        &mut self,
        canvas: &mut Canvas,
        _event: &DragEvent,
    ) -> Result<(), CanvasError> {
        match &self.tracker {
            Some(Tracker::Handle(handle)) => handle.on_drag_start(canvas),
            Some(Tracker::Drag(figure)) => {
                canvas.start_preview_of(*figure)?;
                Ok(())
            }
            Some(Tracker::Pan) | None => Ok(()),
        }
    }

    fn on_drag(&mut self, canvas: &mut Canvas, event: &DragEvent) -> Result<(), CanvasError> {
        match &self.tracker {
            Some(Tracker::Handle(handle)) => handle.on_drag(canvas, event),
            Some(Tracker::Pan) => {
                canvas.pan_by(event.pointer.screen_movement());
                Ok(())
            }
            Some(Tracker::Drag(_)) => {
                let movement = event.pointer.document_movement(canvas.view());
                if let Some(preview) = canvas.previewed_figure_mut() {
                    preview.move_by(movement);
                }
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn on_drag_end(&mut self, canvas: &mut Canvas, event: &DragEvent) -> Result<(), CanvasError> {
        match &self.tracker {
            Some(Tracker::Handle(handle)) => handle.on_drag_end(canvas, event),
            Some(Tracker::Drag(figure)) => {
                canvas.end_preview();
                let movement = event.document_drag_movement(canvas.view());
                if movement == Point::ZERO {
                    return Ok(());
                }
                let command = ChangeFigureRect::moved_by(canvas.document(), *figure, movement)?;
                canvas.execute(Box::new(command))?;
                Ok(())
            }
            Some(Tracker::Pan) | None => Ok(()),
        }
    }

    fn on_pointer_up(
        &mut self,
        _canvas: &mut Canvas,
        _event: &PointerEvent,
    ) -> Result<(), CanvasError> {
        self.tracker = None;
        Ok(())
    }

    fn on_wheel(
        &mut self,
        canvas: &mut Canvas,
        event: &PointerEvent,
        delta: f64,
    ) -> Result<(), CanvasError> {
        let factor = canvas.config().zoom_factor(delta);
        canvas.scale_by(factor, event.screen_position);
        Ok(())
    }
}

/// Creates copies of `prototype` by dragging out their rect, then hands
/// control back to a [`SelectionTool`].
#[derive(Debug, Clone)]
pub struct CreateFigureTool {
    prototype: Figure,
}

impl CreateFigureTool {
    pub fn new(prototype: Figure) -> Self {
        Self { prototype }
    }

    pub fn prototype(&self) -> &Figure {
        &self.prototype
    }

    fn dragged_rect(canvas: &Canvas, event: &DragEvent) -> Rect {
        Rect::from_corner_points(
            event.down_document_position(canvas.view()),
            event.document_position(canvas.view()),
        )
    }
}

impl Tool for CreateFigureTool {
    fn kind(&self) -> ToolKind {
        ToolKind::CreateFigure
    }

    fn on_drag_start(
        &mut self,
        canvas: &mut Canvas,
        _event: &DragEvent,
    ) -> Result<(), CanvasError> {
        canvas.start_preview_of_prototype(&self.prototype);
        Ok(())
    }

    fn on_drag(&mut self, canvas: &mut Canvas, event: &DragEvent) -> Result<(), CanvasError> {
        let rect = Self::dragged_rect(canvas, event);
        if let Some(preview) = canvas.previewed_figure_mut() {
            preview.set_rect(rect);
        }
        Ok(())
    }

    fn on_drag_end(&mut self, canvas: &mut Canvas, event: &DragEvent) -> Result<(), CanvasError> {
        canvas.end_preview();
        let from = event.down_document_position(canvas.view());
        let to = event.document_position(canvas.view());
        let command = CreateFigure::new(canvas.document(), &self.prototype, from, to)?;
        canvas.execute(Box::new(command))?;
        canvas.change_tool(Box::new(SelectionTool::new()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tool_kind_names() {
        let names: Vec<String> = ToolKind::iter().map(|kind| kind.to_string()).collect();
        assert_eq!(names, ["Selection", "CreateFigure", "Noop"]);
        assert_eq!(SelectionTool::new().kind(), ToolKind::default());
    }
}
