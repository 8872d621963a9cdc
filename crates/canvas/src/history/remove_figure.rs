use super::{free_if_detached, Command};
use crate::document::Document;
use crate::error::CommandError;
use figure::{FigureId, TreeError};

/// Removes a figure together with everything it contains.
#[derive(Debug)]
pub struct RemoveFigureAndContained {
    figure: FigureId,
    container: FigureId,
    index: usize,
}

impl RemoveFigureAndContained {
    pub fn new(document: &Document, figure: FigureId) -> Result<Self, CommandError> {
        let drawing = &document.drawing;
        if figure == drawing.root() {
            return Err(TreeError::RootIsFixed.into());
        }
        if !drawing.is_attached(figure) {
            return Err(CommandError::NotInDrawing(figure));
        }
        let (container, index) = drawing
            .position_in_container(figure)?
            .ok_or(CommandError::NotInDrawing(figure))?;
        Ok(Self {
            figure,
            container,
            index,
        })
    }
}

impl Command for RemoveFigureAndContained {
    fn label(&self) -> &'static str {
        "Remove figure"
    }

    fn apply(&mut self, document: &mut Document) -> Result<(), CommandError> {
        document.drawing.detach_figure(self.container, self.figure)?;
        document.selection.clear();
        Ok(())
    }

    fn reverse(&mut self, document: &mut Document) -> Result<(), CommandError> {
        document
            .drawing
            .insert_figure(self.container, self.figure, self.index)?;
        document.selection.select(self.figure);
        Ok(())
    }

    fn discard(&mut self, document: &mut Document) {
        free_if_detached(document, self.figure);
    }
}
