use crate::attributes::{AttributeValue, Attributes};
use crate::error::AttributeError;
use crate::geometry::Rect;
use crate::kinds::{FigureKind, HandleSpec};
use crate::render::RenderSurface;
use crate::FigureId;
use std::sync::Arc;

/// A node of the figure tree.
///
/// The container link and the child list are owned by [`crate::Drawing`]
/// and only change through its tree operations, which keep every child
/// strictly inside its container.
#[derive(Debug, Clone)]
pub struct Figure {
    kind: Arc<dyn FigureKind>,
    rect: Rect,
    visible: bool,
    attributes: Attributes,
    pub(crate) container: Option<FigureId>,
    pub(crate) children: Vec<FigureId>,
}

impl Figure {
    pub fn new(kind: Arc<dyn FigureKind>, rect: Rect) -> Self {
        let mut attributes = Attributes::new();
        kind.init_attributes(&mut attributes);
        Self {
            kind,
            rect,
            visible: true,
            attributes,
            container: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        key: &str,
        value: AttributeValue,
    ) -> Result<Self, AttributeError> {
        self.attributes.set(key, value)?;
        Ok(self)
    }

    pub fn kind(&self) -> &Arc<dyn FigureKind> {
        &self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Set the extent of a figure that is not part of a drawing.
    /// Figures inside a drawing are resized through [`crate::Drawing::change_rect`].
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn attribute(&self, key: &str) -> Result<Option<&AttributeValue>, AttributeError> {
        self.attributes.get(key)
    }

    pub fn container(&self) -> Option<FigureId> {
        self.container
    }

    pub fn children(&self) -> &[FigureId] {
        &self.children
    }

    /// A copy with the same kind, extent and attributes but no tree links.
    pub fn detached_copy(&self) -> Figure {
        Figure {
            kind: Arc::clone(&self.kind),
            rect: self.rect,
            visible: true,
            attributes: self.attributes.clone(),
            container: None,
            children: Vec::new(),
        }
    }

    /// Draw this figure alone, without its contained figures.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        self.kind.draw(self, surface);
    }

    pub fn handles(&self) -> Vec<HandleSpec> {
        self.kind.handles(self)
    }

    /// One-line summary used in diagnostics and the CLI.
    pub fn describe(&self) -> String {
        let mut out = format!("{} {}", self.kind.type_name(), self.rect);
        for (key, value) in self.attributes.values() {
            out.push_str(&format!(" {key}={}", value.to_json()));
        }
        if !self.visible {
            out.push_str(" (hidden)");
        }
        out
    }
}
