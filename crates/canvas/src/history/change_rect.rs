use super::Command;
use crate::document::Document;
use crate::error::CommandError;
use figure::{find_figures_enclosing_and_enclosed_excluding, FigureId, Point, Rect, TreeError};

/// A contained figure that no longer fits after the change and moves out.
#[derive(Debug, Clone, Copy)]
struct Promotion {
    child: FigureId,
    /// Index among the changed figure's children before the change.
    index: usize,
    target: FigureId,
}

/// Moves or resizes a figure and updates containment around it.
///
/// Applying it
/// - repositions the figure, translating its contents along,
/// - moves it into the innermost figure enclosing its new rect,
/// - hands contents that no longer fit to the innermost figure enclosing them,
/// - takes over siblings in the new container that the new rect encloses.
#[derive(Debug)]
pub struct ChangeFigureRect {
    figure: FigureId,
    old_rect: Rect,
    new_rect: Rect,
    from_container: FigureId,
    from_index: usize,
    to_container: FigureId,
    /// Absorbed siblings with their index in `to_container` before the change.
    absorbed: Vec<(FigureId, usize)>,
    promoted: Vec<Promotion>,
}

impl ChangeFigureRect {
    pub fn new(
        document: &Document,
        figure: FigureId,
        new_rect: Rect,
    ) -> Result<Self, CommandError> {
        let drawing = &document.drawing;
        if figure == drawing.root() {
            return Err(TreeError::RootIsFixed.into());
        }
        if !drawing.is_attached(figure) {
            return Err(CommandError::NotInDrawing(figure));
        }
        let old_rect = drawing.figure(figure)?.rect();
        let (from_container, from_index) = drawing
            .position_in_container(figure)?
            .ok_or(CommandError::NotInDrawing(figure))?;

        let containment = find_figures_enclosing_and_enclosed_excluding(drawing, new_rect, figure)?;
        let siblings = drawing.contained_figures(containment.target_container)?;
        let absorbed = containment
            .to_be_absorbed
            .iter()
            .filter_map(|id| siblings.iter().position(|s| s == id).map(|index| (*id, index)))
            .collect();

        let delta = old_rect.position().offset_to(new_rect.position());
        let mut promoted = Vec::new();
        for (index, child) in drawing.contained_figures(figure)?.iter().enumerate() {
            let moved = drawing.figure(*child)?.rect().moved_by(delta);
            if new_rect.encloses_rect(&moved) {
                continue;
            }
            let target = find_figures_enclosing_and_enclosed_excluding(drawing, moved, figure)?
                .target_container;
            promoted.push(Promotion {
                child: *child,
                index,
                target,
            });
        }

        Ok(Self {
            figure,
            old_rect,
            new_rect,
            from_container,
            from_index,
            to_container: containment.target_container,
            absorbed,
            promoted,
        })
    }

    /// Moves a figure by `vector` without resizing it.
    pub fn moved_by(
        document: &Document,
        figure: FigureId,
        vector: Point,
    ) -> Result<Self, CommandError> {
        let rect = document.drawing.figure(figure)?.rect().moved_by(vector);
        Self::new(document, figure, rect)
    }

    pub fn figure(&self) -> FigureId {
        self.figure
    }

    fn delta(&self) -> Point {
        self.old_rect.position().offset_to(self.new_rect.position())
    }
}

impl Command for ChangeFigureRect {
    fn label(&self) -> &'static str {
        if self.old_rect.width() == self.new_rect.width()
            && self.old_rect.height() == self.new_rect.height()
        {
            "Move figure"
        } else {
            "Resize figure"
        }
    }

    fn apply(&mut self, document: &mut Document) -> Result<(), CommandError> {
        let drawing = &mut document.drawing;
        drawing.change_rect(self.figure, self.new_rect)?;
        for promotion in &self.promoted {
            drawing.append_figure(promotion.target, promotion.child)?;
        }
        if self.to_container != self.from_container {
            drawing.append_figure(self.to_container, self.figure)?;
        }
        let absorbed: Vec<FigureId> = self.absorbed.iter().map(|(id, _)| *id).collect();
        drawing.append_figures(self.figure, &absorbed)?;
        Ok(())
    }

    fn reverse(&mut self, document: &mut Document) -> Result<(), CommandError> {
        let drawing = &mut document.drawing;
        for (id, _) in &self.absorbed {
            drawing.detach_figure(self.figure, *id)?;
        }
        for promotion in &self.promoted {
            drawing.detach_figure(promotion.target, promotion.child)?;
        }
        drawing.detach_figure(self.to_container, self.figure)?;
        drawing.change_rect(self.figure, self.old_rect)?;

        let back = self.delta().inverse();
        let mut promoted = self.promoted.clone();
        promoted.sort_by_key(|p| p.index);
        for promotion in promoted {
            drawing.move_position_by(promotion.child, back)?;
            drawing.insert_figure(self.figure, promotion.child, promotion.index)?;
        }

        // Containers are refilled outermost first: the old container may itself
        // be one of the absorbed siblings.
        let mut into_target = self.absorbed.clone();
        if self.from_container == self.to_container {
            into_target.push((self.figure, self.from_index));
        }
        into_target.sort_by_key(|(_, index)| *index);
        for (id, index) in into_target {
            drawing.insert_figure(self.to_container, id, index)?;
        }
        if self.from_container != self.to_container {
            drawing.insert_figure(self.from_container, self.figure, self.from_index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{tree_state, CommandStack, CreateFigure};
    use figure::{kinds::rect_kind, Figure};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y).unwrap()
    }

    fn create(stack: &mut CommandStack, document: &mut Document, r: Rect) -> FigureId {
        let prototype = Figure::new(rect_kind(), rect(0.0, 0.0, 1.0, 1.0));
        let command = CreateFigure::with_rect(document, &prototype, r).unwrap();
        stack.execute(Box::new(command), document).unwrap();
        document.selection.get().unwrap()
    }

    fn change(stack: &mut CommandStack, document: &mut Document, id: FigureId, r: Rect) {
        let command = ChangeFigureRect::new(document, id, r).unwrap();
        stack.execute(Box::new(command), document).unwrap();
    }

    #[test]
    fn test_shrinking_promotes_children() {
        let mut document = Document::default();
        let mut stack = CommandStack::new();
        let root = document.drawing.root();
        let a = create(&mut stack, &mut document, rect(0.0, 0.0, 100.0, 100.0));
        let b = create(&mut stack, &mut document, rect(10.0, 10.0, 20.0, 20.0));
        assert_eq!(document.drawing.figure(b).unwrap().container(), Some(a));
        let before = tree_state(&document);

        change(&mut stack, &mut document, a, rect(0.0, 0.0, 15.0, 15.0));
        assert_eq!(document.drawing.figure(b).unwrap().container(), Some(root));
        assert!(document.drawing.contained_figures(a).unwrap().is_empty());
        assert_eq!(document.drawing.figure(b).unwrap().rect(), rect(10.0, 10.0, 20.0, 20.0));
        let after = tree_state(&document);

        stack.undo(&mut document).unwrap();
        assert_eq!(tree_state(&document), before);
        assert_eq!(document.drawing.figure(a).unwrap().rect(), rect(0.0, 0.0, 100.0, 100.0));
        assert_eq!(document.drawing.contained_figures(a).unwrap(), &[b]);

        stack.redo(&mut document).unwrap();
        assert_eq!(tree_state(&document), after);
    }

    #[test]
    fn test_move_carries_contents() {
        let mut document = Document::default();
        let mut stack = CommandStack::new();
        let a = create(&mut stack, &mut document, rect(0.0, 0.0, 100.0, 100.0));
        let b = create(&mut stack, &mut document, rect(10.0, 10.0, 20.0, 20.0));

        let command = ChangeFigureRect::moved_by(&document, a, pt(200.0, 100.0)).unwrap();
        assert_eq!(command.label(), "Move figure");
        stack.execute(Box::new(command), &mut document).unwrap();
        assert_eq!(document.drawing.figure(b).unwrap().rect(), rect(210.0, 110.0, 20.0, 20.0));
        assert_eq!(document.drawing.figure(b).unwrap().container(), Some(a));

        stack.undo(&mut document).unwrap();
        assert_eq!(document.drawing.figure(b).unwrap().rect(), rect(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn test_moving_into_another_figure() {
        let mut document = Document::default();
        let mut stack = CommandStack::new();
        let root = document.drawing.root();
        let big = create(&mut stack, &mut document, rect(200.0, 200.0, 300.0, 300.0));
        let small = create(&mut stack, &mut document, rect(10.0, 10.0, 20.0, 20.0));
        let other = create(&mut stack, &mut document, rect(600.0, 10.0, 20.0, 20.0));
        let before = tree_state(&document);

        change(&mut stack, &mut document, small, rect(250.0, 250.0, 20.0, 20.0));
        assert_eq!(document.drawing.figure(small).unwrap().container(), Some(big));
        assert_eq!(document.drawing.contained_figures(root).unwrap(), &[big, other]);

        stack.undo(&mut document).unwrap();
        assert_eq!(tree_state(&document), before);
        assert_eq!(document.drawing.contained_figures(root).unwrap(), &[big, small, other]);
    }

    #[test]
    fn test_growing_absorbs_siblings() {
        let mut document = Document::default();
        let mut stack = CommandStack::new();
        let root = document.drawing.root();
        let a = create(&mut stack, &mut document, rect(0.0, 0.0, 30.0, 30.0));
        let b = create(&mut stack, &mut document, rect(50.0, 50.0, 20.0, 20.0));
        let c = create(&mut stack, &mut document, rect(500.0, 500.0, 20.0, 20.0));
        let before = tree_state(&document);

        change(&mut stack, &mut document, a, rect(0.0, 0.0, 100.0, 100.0));
        assert_eq!(document.drawing.contained_figures(a).unwrap(), &[b]);
        assert_eq!(document.drawing.contained_figures(root).unwrap(), &[a, c]);

        stack.undo(&mut document).unwrap();
        assert_eq!(tree_state(&document), before);
    }

    #[test]
    fn test_growing_past_own_container_absorbs_it() {
        let mut document = Document::default();
        let mut stack = CommandStack::new();
        let root = document.drawing.root();
        let c = create(&mut stack, &mut document, rect(100.0, 100.0, 100.0, 100.0));
        let f = create(&mut stack, &mut document, rect(120.0, 120.0, 20.0, 20.0));
        let inner = create(&mut stack, &mut document, rect(125.0, 125.0, 5.0, 5.0));
        assert_eq!(document.drawing.containers(inner).unwrap(), vec![f, c, root]);
        let before = tree_state(&document);

        change(&mut stack, &mut document, f, rect(50.0, 50.0, 300.0, 300.0));
        assert_eq!(document.drawing.figure(f).unwrap().container(), Some(root));
        assert_eq!(document.drawing.figure(c).unwrap().container(), Some(f));
        // `inner` moves along with `f` and stays inside it
        assert_eq!(document.drawing.figure(inner).unwrap().rect(), rect(55.0, 55.0, 5.0, 5.0));
        assert_eq!(document.drawing.figure(inner).unwrap().container(), Some(f));
        assert!(document.drawing.check_invariants().is_ok());
        let after = tree_state(&document);

        stack.undo(&mut document).unwrap();
        assert_eq!(tree_state(&document), before);
        stack.redo(&mut document).unwrap();
        assert_eq!(tree_state(&document), after);
    }

    #[test]
    fn test_promoted_child_lands_in_innermost_container() {
        let mut document = Document::default();
        let mut stack = CommandStack::new();
        let host = create(&mut stack, &mut document, rect(0.0, 0.0, 400.0, 400.0));
        let a = create(&mut stack, &mut document, rect(10.0, 10.0, 200.0, 200.0));
        let first = create(&mut stack, &mut document, rect(20.0, 20.0, 10.0, 10.0));
        let second = create(&mut stack, &mut document, rect(150.0, 150.0, 10.0, 10.0));
        let before = tree_state(&document);

        change(&mut stack, &mut document, a, rect(10.0, 10.0, 100.0, 100.0));
        assert_eq!(document.drawing.contained_figures(a).unwrap(), &[first]);
        assert_eq!(document.drawing.figure(second).unwrap().container(), Some(host));

        stack.undo(&mut document).unwrap();
        assert_eq!(tree_state(&document), before);
        assert_eq!(document.drawing.contained_figures(a).unwrap(), &[first, second]);
    }

    #[test]
    fn test_root_and_outside_changes_are_rejected() {
        let mut document = Document::new(figure::Drawing::new(rect(0.0, 0.0, 100.0, 100.0)));
        let mut stack = CommandStack::new();
        let root = document.drawing.root();
        let a = create(&mut stack, &mut document, rect(10.0, 10.0, 10.0, 10.0));

        assert!(ChangeFigureRect::new(&document, root, rect(0.0, 0.0, 5.0, 5.0)).is_err());
        assert!(matches!(
            ChangeFigureRect::new(&document, a, rect(90.0, 90.0, 50.0, 50.0)),
            Err(CommandError::Tree(TreeError::NoEnclosingContainer))
        ));
        assert_eq!(stack.len(), 1);
    }
}
