use figure::{Drawing, Figure, FigureId, FigureSnapshot, RenderSurface, TreeError};

/// Drag feedback: a detached copy drawn in place of the figure being edited.
///
/// While a preview of an existing figure is active the original is hidden,
/// so the drawing itself is never touched until the gesture commits.
#[derive(Debug, Clone)]
pub struct Preview {
    original: Option<FigureId>,
    snapshot: FigureSnapshot,
}

impl Preview {
    /// Snapshots `id` with its contents and hides the original.
    pub fn of_figure(drawing: &mut Drawing, id: FigureId) -> Result<Self, TreeError> {
        let snapshot = drawing.snapshot(id)?;
        drawing.set_visible(id, false)?;
        Ok(Self {
            original: Some(id),
            snapshot,
        })
    }

    /// Preview of a figure that is not part of the drawing yet.
    pub fn of_prototype(prototype: &Figure) -> Self {
        Self {
            original: None,
            snapshot: FigureSnapshot::new(prototype.clone()),
        }
    }

    pub fn original(&self) -> Option<FigureId> {
        self.original
    }

    pub fn figure(&self) -> &FigureSnapshot {
        &self.snapshot
    }

    pub fn figure_mut(&mut self) -> &mut FigureSnapshot {
        &mut self.snapshot
    }

    /// Shows the original again. A figure that has since left the arena is ignored.
    pub fn end(self, drawing: &mut Drawing) {
        if let Some(id) = self.original {
            let _ = drawing.set_visible(id, true);
        }
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        self.snapshot.draw(surface);
    }
}
