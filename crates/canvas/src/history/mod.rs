//! # Undo history
//!
//! Every change to a [`Document`] goes through a [`Command`]. A command
//! records what it needs to put the document back exactly as it found it,
//! including the position of every figure it moves within its container's
//! child list, so undoing restores draw order as well as geometry.
//!
//! The history is linear: executing a command after undoing discards
//! everything that could have been redone. Discarded commands free the
//! detached figures only they could have brought back.

mod change_attribute;
mod change_rect;
mod create_figure;
mod remove_figure;

pub use change_attribute::ChangeAttribute;
pub use change_rect::ChangeFigureRect;
pub use create_figure::CreateFigure;
pub use remove_figure::RemoveFigureAndContained;

use crate::document::Document;
use crate::error::CommandError;
use figure::FigureId;
use log::debug;
use std::fmt;

/// A reversible change to a document.
pub trait Command: fmt::Debug {
    /// Short human readable name, e.g. for an undo menu entry.
    fn label(&self) -> &'static str;

    fn apply(&mut self, document: &mut Document) -> Result<(), CommandError>;

    /// Restores the document to the state it had before [`Command::apply`].
    fn reverse(&mut self, document: &mut Document) -> Result<(), CommandError>;

    fn redo(&mut self, document: &mut Document) -> Result<(), CommandError> {
        self.apply(document)
    }

    /// Called when the history drops this command for good.
    fn discard(&mut self, _document: &mut Document) {}
}

/// Frees `figure` if it is still in the arena but outside the tree.
pub(crate) fn free_if_detached(document: &mut Document, figure: FigureId) {
    let drawing = &mut document.drawing;
    let root = drawing.root();
    let detached = drawing
        .get(figure)
        .is_some_and(|f| f.container().is_none() && figure != root);
    if detached {
        if let Ok(count) = drawing.remove_subtree(figure) {
            debug!("freed {count} figures under {figure}");
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandStack {
    undo: Vec<Box<dyn Command>>,
    redo: Vec<Box<dyn Command>>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `command` and records it. A command that fails to apply is dropped.
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        document: &mut Document,
    ) -> Result<(), CommandError> {
        command.apply(document)?;
        debug!("executed {}", command.label());
        self.undo.push(command);
        Self::discard_all(&mut self.redo, document);
        debug_assert!(document.drawing.check_invariants().is_ok());
        Ok(())
    }

    /// Reverses the most recent command. Does nothing when there is none.
    pub fn undo(&mut self, document: &mut Document) -> Result<(), CommandError> {
        let Some(mut command) = self.undo.pop() else {
            return Ok(());
        };
        if let Err(err) = command.reverse(document) {
            self.undo.push(command);
            return Err(err);
        }
        debug!("undid {}", command.label());
        self.redo.push(command);
        debug_assert!(document.drawing.check_invariants().is_ok());
        Ok(())
    }

    /// Re-applies the most recently undone command. Does nothing when there is none.
    pub fn redo(&mut self, document: &mut Document) -> Result<(), CommandError> {
        let Some(mut command) = self.redo.pop() else {
            return Ok(());
        };
        if let Err(err) = command.redo(document) {
            self.redo.push(command);
            return Err(err);
        }
        debug!("redid {}", command.label());
        self.undo.push(command);
        debug_assert!(document.drawing.check_invariants().is_ok());
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo.last().map(|command| command.label())
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo.last().map(|command| command.label())
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    /// Forgets the whole history of `document`.
    pub fn clear(&mut self, document: &mut Document) {
        Self::discard_all(&mut self.undo, document);
        Self::discard_all(&mut self.redo, document);
    }

    /// Most recent first, so a figure is freed by the last command holding it.
    fn discard_all(commands: &mut Vec<Box<dyn Command>>, document: &mut Document) {
        while let Some(mut command) = commands.pop() {
            command.discard(document);
        }
    }
}

#[cfg(test)]
pub(crate) type TreeState = Vec<(FigureId, Option<FigureId>, figure::Rect, Vec<FigureId>)>;

/// Snapshot of a document's structure used to compare states in tests.
#[cfg(test)]
pub(crate) fn tree_state(document: &Document) -> TreeState {
    let drawing = &document.drawing;
    drawing
        .descendants(drawing.root())
        .unwrap()
        .into_iter()
        .map(|id| {
            let figure = drawing.figure(id).unwrap();
            (id, figure.container(), figure.rect(), figure.children().to_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figure::{kinds::rect_kind, Figure, Point, Rect};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y).unwrap()
    }

    fn create(stack: &mut CommandStack, document: &mut Document, a: Point, b: Point) {
        let prototype = Figure::new(rect_kind(), rect(0.0, 0.0, 10.0, 10.0));
        let command = CreateFigure::new(document, &prototype, a, b).unwrap();
        stack.execute(Box::new(command), document).unwrap();
    }

    #[test]
    fn test_empty_stack_is_a_no_op() {
        let mut stack = CommandStack::new();
        let mut document = Document::default();
        let before = tree_state(&document);
        assert!(stack.undo(&mut document).is_ok());
        assert!(stack.redo(&mut document).is_ok());
        assert_eq!(tree_state(&document), before);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_redo_moves_between_stacks() {
        let mut stack = CommandStack::new();
        let mut document = Document::default();
        create(&mut stack, &mut document, pt(0.0, 0.0), pt(100.0, 100.0));
        assert!(stack.can_undo());
        assert_eq!(stack.undo_label(), Some("Create figure"));

        stack.undo(&mut document).unwrap();
        assert!(!stack.can_undo());
        assert!(stack.can_redo());

        stack.redo(&mut document).unwrap();
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_execute_clears_redo() {
        let mut stack = CommandStack::new();
        let mut document = Document::default();
        create(&mut stack, &mut document, pt(0.0, 0.0), pt(100.0, 100.0));
        stack.undo(&mut document).unwrap();
        assert!(stack.can_redo());

        create(&mut stack, &mut document, pt(200.0, 200.0), pt(300.0, 300.0));
        assert!(!stack.can_redo());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_failed_command_is_not_recorded() {
        let mut stack = CommandStack::new();
        let mut document = Document::default();
        create(&mut stack, &mut document, pt(0.0, 0.0), pt(100.0, 100.0));
        let figure = document.drawing.contained_figures(document.drawing.root()).unwrap()[0];
        let remove = RemoveFigureAndContained::new(&document, figure).unwrap();
        stack.execute(Box::new(remove), &mut document).unwrap();

        // the figure is gone, so a second removal cannot be built
        assert!(RemoveFigureAndContained::new(&document, figure).is_err());
        assert_eq!(stack.len(), 2);
    }
}
