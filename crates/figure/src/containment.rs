//! Works out where a rectangle belongs in the figure tree.

use crate::drawing::{Drawing, FigureId};
use crate::error::TreeError;
use crate::geometry::Rect;
use crate::hit_test::walk_tree_lazy;
use log::trace;

/// Where a figure with a given rect would go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Containment {
    /// Innermost figure that strictly encloses the rect.
    pub target_container: FigureId,
    /// Children of the target container that the rect strictly encloses.
    pub to_be_absorbed: Vec<FigureId>,
}

/// Finds the innermost figure enclosing `test_rect` and those of its
/// children that `test_rect` would enclose.
pub fn find_figures_enclosing_and_enclosed(
    drawing: &Drawing,
    test_rect: Rect,
) -> Result<Containment, TreeError> {
    resolve(drawing, test_rect, None)
}

/// Like [`find_figures_enclosing_and_enclosed`], but `exclude` and its
/// subtree are neither candidates for the container nor for absorption.
pub fn find_figures_enclosing_and_enclosed_excluding(
    drawing: &Drawing,
    test_rect: Rect,
    exclude: FigureId,
) -> Result<Containment, TreeError> {
    resolve(drawing, test_rect, Some(exclude))
}

fn resolve(
    drawing: &Drawing,
    test_rect: Rect,
    exclude: Option<FigureId>,
) -> Result<Containment, TreeError> {
    let enclosing = walk_tree_lazy(drawing, drawing.root(), |id, figure| {
        Some(id) != exclude && figure.rect().encloses_rect(&test_rect)
    });
    let target_container = *enclosing.first().ok_or(TreeError::NoEnclosingContainer)?;

    let mut to_be_absorbed = Vec::new();
    for child in drawing.contained_figures(target_container)? {
        if Some(*child) == exclude {
            continue;
        }
        if test_rect.encloses_rect(&drawing.figure(*child)?.rect()) {
            to_be_absorbed.push(*child);
        }
    }
    trace!(
        "{test_rect} resolves to {target_container} absorbing {}",
        to_be_absorbed.len()
    );
    Ok(Containment {
        target_container,
        to_be_absorbed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Figure;
    use crate::kinds::rect_kind;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    fn add(drawing: &mut Drawing, container: FigureId, r: Rect) -> FigureId {
        let id = drawing.insert(Figure::new(rect_kind(), r));
        drawing.append_figure(container, id).unwrap();
        id
    }

    #[test]
    fn test_resolves_innermost_container() {
        let mut drawing = Drawing::default();
        let root = drawing.root();
        let a = add(&mut drawing, root, rect(0.0, 0.0, 100.0, 100.0));

        let containment =
            find_figures_enclosing_and_enclosed(&drawing, rect(10.0, 10.0, 20.0, 20.0)).unwrap();
        assert_eq!(
            containment,
            Containment {
                target_container: a,
                to_be_absorbed: vec![],
            }
        );
    }

    #[test]
    fn test_collects_absorbed_siblings() {
        let mut drawing = Drawing::default();
        let root = drawing.root();
        let small = add(&mut drawing, root, rect(10.0, 10.0, 5.0, 5.0));
        let other = add(&mut drawing, root, rect(200.0, 200.0, 5.0, 5.0));
        let overlapping = add(&mut drawing, root, rect(40.0, 40.0, 50.0, 50.0));

        let containment =
            find_figures_enclosing_and_enclosed(&drawing, rect(0.0, 0.0, 60.0, 60.0)).unwrap();
        assert_eq!(containment.target_container, root);
        assert_eq!(containment.to_be_absorbed, vec![small]);
        assert!(!containment.to_be_absorbed.contains(&other));
        assert!(!containment.to_be_absorbed.contains(&overlapping));
    }

    #[test]
    fn test_outside_drawing_has_no_container() {
        let drawing = Drawing::new(rect(0.0, 0.0, 100.0, 100.0));
        assert_eq!(
            find_figures_enclosing_and_enclosed(&drawing, rect(50.0, 50.0, 100.0, 10.0)),
            Err(TreeError::NoEnclosingContainer)
        );
    }

    #[test]
    fn test_excluded_figure_is_skipped() {
        let mut drawing = Drawing::default();
        let root = drawing.root();
        let a = add(&mut drawing, root, rect(0.0, 0.0, 100.0, 100.0));
        let b = add(&mut drawing, a, rect(10.0, 10.0, 10.0, 10.0));

        // a slightly smaller version of `a` must not end up inside `a` itself
        let shrunk = rect(1.0, 1.0, 98.0, 98.0);
        let containment =
            find_figures_enclosing_and_enclosed_excluding(&drawing, shrunk, a).unwrap();
        assert_eq!(containment.target_container, root);
        assert!(containment.to_be_absorbed.is_empty());

        let unfiltered = find_figures_enclosing_and_enclosed(&drawing, shrunk).unwrap();
        assert_eq!(unfiltered.target_container, a);
        assert_eq!(unfiltered.to_be_absorbed, vec![b]);
    }
}
