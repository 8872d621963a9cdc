use crate::config::CanvasConfig;
use crate::document::Document;
use crate::error::{CanvasError, CommandError, EditCancelled};
use crate::events::{DragEvent, PointerEvent};
use crate::handles::Handle;
use crate::history::{
    ChangeAttribute, ChangeFigureRect, Command, CommandStack, CreateFigure,
    RemoveFigureAndContained,
};
use crate::preview::Preview;
use crate::request::CommandRequest;
use crate::text_edit::{NoTextPrompt, TextPrompt};
use crate::tools::{SelectionTool, Tool, ToolKind};
use crate::viewport::ViewTransform;
use figure::serialization::{from_json_str, to_json_string};
use figure::{
    AttributeError, Drawing, Figure, FigureId, FigureRegistry, FigureSnapshot, Point, Rect,
    RenderSurface, SerializationError, TreeError,
};
use log::{debug, warn};
use smallvec::SmallVec;

/// Where the pointer went down and where it was last seen.
#[derive(Clone, Copy, Debug, Default)]
struct PointerState {
    down: Option<Point>,
    previous: Option<Point>,
    dragging: bool,
}

/// An editable view onto a drawing.
///
/// Owns the document, its undo history, the view transform and the active
/// tool. Hosts feed it pointer input in screen coordinates and let it render
/// into a [`RenderSurface`].
pub struct Canvas {
    document: Document,
    history: CommandStack,
    view: ViewTransform,
    config: CanvasConfig,
    registry: FigureRegistry,
    preview: Option<Preview>,
    /// `None` while a tool callback is running.
    tool: Option<Box<dyn Tool>>,
    pending_tool: Option<Box<dyn Tool>>,
    prompt: Box<dyn TextPrompt>,
    pointer: PointerState,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("document", &self.document)
            .field("history", &self.history)
            .field("view", &self.view)
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        let drawing = Drawing::new(config.drawing_extent);
        Self::with_drawing(drawing, config)
    }

    pub fn with_drawing(drawing: Drawing, config: CanvasConfig) -> Self {
        Self {
            document: Document::new(drawing),
            history: CommandStack::new(),
            view: ViewTransform::new(),
            config,
            registry: FigureRegistry::with_default_kinds(),
            preview: None,
            tool: Some(Box::new(SelectionTool::new())),
            pending_tool: None,
            prompt: Box::new(NoTextPrompt),
            pointer: PointerState::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn drawing(&self) -> &Drawing {
        &self.document.drawing
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    pub fn registry(&self) -> &FigureRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FigureRegistry {
        &mut self.registry
    }

    // History

    pub fn execute(&mut self, command: Box<dyn Command>) -> Result<(), CommandError> {
        self.history.execute(command, &mut self.document)
    }

    pub fn undo(&mut self) -> Result<(), CommandError> {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> Result<(), CommandError> {
        self.history.redo(&mut self.document)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Selection

    /// Selects `id`, which must be part of the drawing.
    pub fn select(&mut self, id: FigureId) -> Result<(), TreeError> {
        if !self.document.drawing.is_attached(id) {
            return Err(TreeError::Detached(id));
        }
        self.document.selection.select(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.document.selection.clear();
    }

    pub fn selection(&self) -> Option<FigureId> {
        self.document.selection.get()
    }

    /// Handles of the selected figure, in the order its kind lists them.
    pub fn handles(&self) -> SmallVec<[Handle; 8]> {
        let Some(id) = self.selection() else {
            return SmallVec::new();
        };
        let Some(figure) = self.document.drawing.get(id) else {
            return SmallVec::new();
        };
        if !self.document.drawing.is_attached(id) {
            return SmallVec::new();
        }
        let rect = figure.rect();
        figure
            .handles()
            .into_iter()
            .map(|spec| Handle::new(id, rect, spec))
            .collect()
    }

    // Coordinates

    pub fn screen_to_document(&self, point: Point) -> Point {
        self.view.to_document(point)
    }

    pub fn document_to_screen(&self, point: Point) -> Point {
        self.view.to_screen(point)
    }

    pub fn screen_to_document_rect(&self, rect: Rect) -> Rect {
        self.view.to_document_rect(rect)
    }

    pub fn document_to_screen_rect(&self, rect: Rect) -> Rect {
        self.view.to_screen_rect(rect)
    }

    pub fn pan_by(&mut self, screen_vector: Point) {
        self.view.translate_by(screen_vector);
    }

    /// Zooms by `factor`, keeping `screen_point` fixed.
    pub fn scale_by(&mut self, factor: f64, screen_point: Point) {
        self.view.scale_around_point(factor, screen_point);
    }

    /// Creates a copy of `prototype` at `rect` through the history and returns its id.
    pub fn add_figure(&mut self, prototype: &Figure, rect: Rect) -> Result<FigureId, CommandError> {
        let command = CreateFigure::with_rect(&self.document, prototype, rect)?;
        self.execute(Box::new(command))?;
        // creating selects the new figure
        self.document.selection.get().ok_or(CommandError::NoSelection)
    }

    // Preview

    /// Replaces `id` on screen by a detached copy until [`Canvas::end_preview`].
    pub fn start_preview_of(&mut self, id: FigureId) -> Result<(), TreeError> {
        self.end_preview();
        self.preview = Some(Preview::of_figure(&mut self.document.drawing, id)?);
        Ok(())
    }

    pub fn start_preview_of_prototype(&mut self, prototype: &Figure) {
        self.end_preview();
        self.preview = Some(Preview::of_prototype(prototype));
    }

    pub fn previewed_figure(&self) -> Option<&FigureSnapshot> {
        self.preview.as_ref().map(Preview::figure)
    }

    pub fn previewed_figure_mut(&mut self) -> Option<&mut FigureSnapshot> {
        self.preview.as_mut().map(Preview::figure_mut)
    }

    pub fn end_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.end(&mut self.document.drawing);
        }
    }

    // Tools

    /// Switches tools. Called from inside a tool callback, the switch happens
    /// once that callback returns.
    pub fn change_tool(&mut self, tool: Box<dyn Tool>) {
        debug!("switching to {} tool", tool.kind());
        match self.tool {
            Some(_) => self.tool = Some(tool),
            None => self.pending_tool = Some(tool),
        }
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool
            .as_ref()
            .or(self.pending_tool.as_ref())
            .map_or(ToolKind::Noop, |tool| tool.kind())
    }

    pub fn set_text_prompt(&mut self, prompt: impl TextPrompt + 'static) {
        self.prompt = Box::new(prompt);
    }

    pub fn request_text(&mut self, prompt: &str, prefill: &str) -> Result<String, EditCancelled> {
        self.prompt.request_text(prompt, prefill)
    }

    // Pointer input

    pub fn on_pointer_down(&mut self, screen_point: Point) -> Result<(), CanvasError> {
        self.pointer = PointerState {
            down: Some(screen_point),
            previous: Some(screen_point),
            dragging: false,
        };
        let event = PointerEvent::new(screen_point, screen_point);
        self.dispatch(|tool, canvas| tool.on_pointer_down(canvas, &event))
    }

    /// The first move with the button held starts a drag.
    pub fn on_pointer_move(&mut self, screen_point: Point) -> Result<(), CanvasError> {
        let previous = self.pointer.previous.unwrap_or(screen_point);
        self.pointer.previous = Some(screen_point);
        let event = PointerEvent::new(screen_point, previous);
        let Some(down) = self.pointer.down else {
            return self.dispatch(|tool, canvas| tool.on_pointer_move(canvas, &event));
        };
        let drag = DragEvent::new(event, down);
        if !self.pointer.dragging {
            self.pointer.dragging = true;
            self.dispatch(|tool, canvas| tool.on_drag_start(canvas, &drag))?;
        }
        self.dispatch(|tool, canvas| tool.on_drag(canvas, &drag))
    }

    /// Ends a running drag before reporting the release.
    pub fn on_pointer_up(&mut self, screen_point: Point) -> Result<(), CanvasError> {
        let state = std::mem::take(&mut self.pointer);
        let event = PointerEvent::new(screen_point, state.previous.unwrap_or(screen_point));
        let drag_result = match state.down {
            Some(down) if state.dragging => {
                let drag = DragEvent::new(event, down);
                self.dispatch(|tool, canvas| tool.on_drag_end(canvas, &drag))
            }
            _ => Ok(()),
        };
        let up_result = self.dispatch(|tool, canvas| tool.on_pointer_up(canvas, &event));
        drag_result.and(up_result)
    }

    pub fn on_wheel(&mut self, screen_point: Point, delta: f64) -> Result<(), CanvasError> {
        let event = PointerEvent::new(screen_point, self.pointer.previous.unwrap_or(screen_point));
        self.dispatch(|tool, canvas| tool.on_wheel(canvas, &event, delta))
    }

    fn dispatch<F>(&mut self, callback: F) -> Result<(), CanvasError>
    where
        F: FnOnce(&mut dyn Tool, &mut Canvas) -> Result<(), CanvasError>,
    {
        let Some(mut tool) = self.tool.take() else {
            return Ok(());
        };
        let result = callback(tool.as_mut(), self);
        self.tool = Some(self.pending_tool.take().unwrap_or(tool));
        if let Err(err) = &result {
            self.end_preview();
            warn!("gesture rejected: {err}");
        }
        result
    }

    // Persistence

    pub fn to_json(&self) -> Result<String, SerializationError> {
        to_json_string(&self.document.drawing)
    }

    /// Replaces the drawing. History, selection, preview and view start over.
    pub fn load_json(&mut self, json: &str) -> Result<(), CanvasError> {
        let drawing = from_json_str(&self.registry, json)?;
        self.end_preview();
        self.history.clear(&mut self.document);
        self.document = Document::new(drawing);
        self.view.reset();
        Ok(())
    }

    /// Builds and executes the command a request describes.
    pub fn run_request(&mut self, request: &CommandRequest) -> Result<(), CanvasError> {
        let command: Box<dyn Command> = match request {
            CommandRequest::CreateFigure {
                figure_type,
                from,
                to,
                attributes,
            } => {
                let rect = Rect::from_corner_points(*from, *to);
                let mut prototype = self.registry.create(figure_type, rect)?;
                for (key, value) in attributes {
                    let declared = prototype
                        .attributes()
                        .declared_type(key)
                        .ok_or_else(|| AttributeError::UndeclaredKey(key.clone()))?;
                    let value = declared.decode(key, value.clone())?;
                    prototype.attributes_mut().set(key, value)?;
                }
                Box::new(CreateFigure::new(&self.document, &prototype, *from, *to)?)
            }
            CommandRequest::ChangeRect { target, rect } => {
                let id = self.document.drawing.resolve_path(target)?;
                Box::new(ChangeFigureRect::new(&self.document, id, *rect)?)
            }
            CommandRequest::Move { target, delta } => {
                let id = self.document.drawing.resolve_path(target)?;
                Box::new(ChangeFigureRect::moved_by(&self.document, id, *delta)?)
            }
            CommandRequest::ChangeAttribute {
                target,
                attribute,
                value,
            } => {
                let id = self.document.drawing.resolve_path(target)?;
                let declared = self
                    .document
                    .drawing
                    .figure(id)?
                    .attributes()
                    .declared_type(attribute)
                    .ok_or_else(|| AttributeError::UndeclaredKey(attribute.clone()))?;
                let value = declared.decode(attribute, value.clone())?;
                Box::new(ChangeAttribute::new(&self.document, id, attribute.as_str(), value)?)
            }
            CommandRequest::Remove { target } => {
                let id = self.document.drawing.resolve_path(target)?;
                Box::new(RemoveFigureAndContained::new(&self.document, id)?)
            }
            CommandRequest::Undo => return Ok(self.undo()?),
            CommandRequest::Redo => return Ok(self.redo()?),
        };
        self.execute(command)?;
        Ok(())
    }

    // Rendering

    /// Draws the drawing and any preview in document space, then the handles
    /// of the selection in screen space.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.set_transform(self.view.to_array());
        self.document.drawing.draw(surface);
        if let Some(preview) = &self.preview {
            preview.draw(surface);
        }
        surface.reset_transform();
        for handle in self.handles() {
            handle.draw(surface, &self.view, &self.config);
        }
    }
}
