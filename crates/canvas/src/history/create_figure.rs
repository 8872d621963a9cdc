use super::{free_if_detached, Command};
use crate::document::Document;
use crate::error::CommandError;
use figure::{find_figures_enclosing_and_enclosed, Figure, FigureId, Point, Rect};

/// Adds a copy of a prototype figure spanning two corner points.
///
/// The new figure goes into the innermost figure that encloses it and takes
/// over every sibling it encloses.
#[derive(Debug)]
pub struct CreateFigure {
    figure: NewFigure,
    container: FigureId,
    /// Absorbed siblings with their index in `container` before creation.
    absorbed: Vec<(FigureId, usize)>,
}

/// The created figure is owned by the command until it is first applied.
#[derive(Debug)]
enum NewFigure {
    Pending(Figure),
    InDrawing(FigureId),
}

impl CreateFigure {
    /// Resolves placement for a copy of `prototype`. The drawing is not touched.
    pub fn new(
        document: &Document,
        prototype: &Figure,
        corner_a: Point,
        corner_b: Point,
    ) -> Result<Self, CommandError> {
        let rect = Rect::from_corner_points(corner_a, corner_b);
        Self::with_rect(document, prototype, rect)
    }

    pub fn with_rect(
        document: &Document,
        prototype: &Figure,
        rect: Rect,
    ) -> Result<Self, CommandError> {
        let drawing = &document.drawing;
        let containment = find_figures_enclosing_and_enclosed(drawing, rect)?;
        let siblings = drawing.contained_figures(containment.target_container)?;
        let absorbed = containment
            .to_be_absorbed
            .iter()
            .filter_map(|id| siblings.iter().position(|s| s == id).map(|index| (*id, index)))
            .collect();

        let mut figure = prototype.detached_copy();
        figure.set_rect(rect);
        Ok(Self {
            figure: NewFigure::Pending(figure),
            container: containment.target_container,
            absorbed,
        })
    }

    /// The figure this command adds, once it has been applied.
    pub fn figure(&self) -> Option<FigureId> {
        match self.figure {
            NewFigure::Pending(_) => None,
            NewFigure::InDrawing(id) => Some(id),
        }
    }

    /// Attaches the new figure to its container, moving it into the arena on first use.
    fn place(&mut self, document: &mut Document) -> Result<FigureId, CommandError> {
        let drawing = &mut document.drawing;
        match &self.figure {
            NewFigure::InDrawing(id) => {
                drawing.append_figure(self.container, *id)?;
                Ok(*id)
            }
            NewFigure::Pending(figure) => {
                let id = drawing.insert(figure.clone());
                if let Err(err) = drawing.append_figure(self.container, id) {
                    drawing.remove_subtree(id)?;
                    return Err(err.into());
                }
                self.figure = NewFigure::InDrawing(id);
                Ok(id)
            }
        }
    }
}

impl Command for CreateFigure {
    fn label(&self) -> &'static str {
        "Create figure"
    }

    fn apply(&mut self, document: &mut Document) -> Result<(), CommandError> {
        let figure = self.place(document)?;
        let absorbed: Vec<FigureId> = self.absorbed.iter().map(|(id, _)| *id).collect();
        document.drawing.append_figures(figure, &absorbed)?;
        document.selection.select(figure);
        Ok(())
    }

    fn reverse(&mut self, document: &mut Document) -> Result<(), CommandError> {
        let Some(figure) = self.figure() else {
            return Ok(());
        };
        if document.selection.is_selected(figure) {
            document.selection.clear();
        }
        let drawing = &mut document.drawing;
        drawing.detach_figure(self.container, figure)?;
        let mut absorbed = self.absorbed.clone();
        absorbed.sort_by_key(|(_, index)| *index);
        for (id, index) in absorbed {
            drawing.insert_figure(self.container, id, index)?;
        }
        Ok(())
    }

    fn discard(&mut self, document: &mut Document) {
        if let Some(figure) = self.figure() {
            free_if_detached(document, figure);
        }
    }
}
