//! Geometric queries over the figure tree.
//!
//! All queries share one walk: a figure is only descended into when it
//! matches the predicate, children are visited topmost first, and matches
//! are reported innermost first.

use crate::drawing::{Drawing, FigureId};
use crate::figure::Figure;
use crate::geometry::{Point, Rect};
use log::trace;

/// Depth-first walk from `start` that prunes every subtree whose root fails
/// `predicate`. Results are innermost first; among siblings the last
/// appended (drawn on top) comes first.
pub fn walk_tree_lazy<P>(drawing: &Drawing, start: FigureId, mut predicate: P) -> Vec<FigureId>
where
    P: FnMut(FigureId, &Figure) -> bool,
{
    let mut matches = Vec::new();
    walk(drawing, start, &mut predicate, &mut matches);
    matches
}

fn walk<P>(drawing: &Drawing, id: FigureId, predicate: &mut P, matches: &mut Vec<FigureId>)
where
    P: FnMut(FigureId, &Figure) -> bool,
{
    let Some(figure) = drawing.get(id) else {
        return;
    };
    if !predicate(id, figure) {
        return;
    }
    for child in figure.children().iter().rev() {
        walk(drawing, *child, predicate, matches);
    }
    matches.push(id);
}

/// Figures whose rect contains `point`, innermost and topmost first.
/// `start` itself is only reported when `include_start` is set.
pub fn find_figures_below_point(
    drawing: &Drawing,
    start: FigureId,
    point: Point,
    include_start: bool,
) -> Vec<FigureId> {
    let mut matches =
        walk_tree_lazy(drawing, start, |_, figure| figure.rect().encloses_point(point));
    if !include_start && matches.last() == Some(&start) {
        matches.pop();
    }
    trace!("{} figures below {point}", matches.len());
    matches
}

/// Figures whose rect strictly encloses `rect`, innermost first.
pub fn find_enclosing_figures(drawing: &Drawing, start: FigureId, rect: Rect) -> Vec<FigureId> {
    walk_tree_lazy(drawing, start, |_, figure| figure.rect().encloses_rect(&rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::rect_kind;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y).unwrap()
    }

    fn add(drawing: &mut Drawing, container: FigureId, r: Rect) -> FigureId {
        let id = drawing.insert(Figure::new(rect_kind(), r));
        drawing.append_figure(container, id).unwrap();
        id
    }

    #[test]
    fn test_later_sibling_matches_first() {
        let mut drawing = Drawing::default();
        let root = drawing.root();
        let first = add(&mut drawing, root, rect(0.0, 0.0, 100.0, 100.0));
        let second = add(&mut drawing, root, rect(50.0, 50.0, 100.0, 100.0));

        let below = find_figures_below_point(&drawing, root, pt(75.0, 75.0), false);
        assert_eq!(below, vec![second, first]);
    }

    #[test]
    fn test_innermost_first_and_root_optional() {
        let mut drawing = Drawing::default();
        let root = drawing.root();
        let a = add(&mut drawing, root, rect(0.0, 0.0, 100.0, 100.0));
        let b = add(&mut drawing, a, rect(10.0, 10.0, 50.0, 50.0));
        let c = add(&mut drawing, b, rect(20.0, 20.0, 10.0, 10.0));

        assert_eq!(
            find_figures_below_point(&drawing, root, pt(25.0, 25.0), false),
            vec![c, b, a]
        );
        assert_eq!(
            find_figures_below_point(&drawing, root, pt(25.0, 25.0), true),
            vec![c, b, a, root]
        );
        assert_eq!(
            find_figures_below_point(&drawing, root, pt(500.0, 500.0), false),
            Vec::<FigureId>::new()
        );
    }

    #[test]
    fn test_walk_prunes_non_matching_subtrees() {
        let mut drawing = Drawing::default();
        let root = drawing.root();
        let a = add(&mut drawing, root, rect(0.0, 0.0, 100.0, 100.0));
        add(&mut drawing, a, rect(10.0, 10.0, 20.0, 20.0));

        let mut visited = Vec::new();
        walk_tree_lazy(&drawing, root, |id, _| {
            visited.push(id);
            id == root
        });
        assert_eq!(visited, vec![root, a]);
    }

    #[test]
    fn test_enclosing_chain() {
        let mut drawing = Drawing::default();
        let root = drawing.root();
        let a = add(&mut drawing, root, rect(0.0, 0.0, 100.0, 100.0));
        let b = add(&mut drawing, a, rect(10.0, 10.0, 10.0, 10.0));
        let c = add(&mut drawing, a, rect(60.0, 60.0, 10.0, 10.0));

        let query = rect(5.0, 5.0, 30.0, 30.0);
        assert_eq!(find_enclosing_figures(&drawing, root, query), vec![a, root]);
        let inside_b = rect(12.0, 12.0, 2.0, 2.0);
        assert_eq!(find_enclosing_figures(&drawing, root, inside_b), vec![b, a, root]);
        let beside_c = rect(55.0, 55.0, 20.0, 20.0);
        let chain = find_enclosing_figures(&drawing, root, beside_c);
        assert_eq!(chain, vec![a, root]);
        assert!(!chain.contains(&c));
    }
}
