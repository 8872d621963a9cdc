//! # Drawing
//!
//! The figure tree. All figures live in one arena owned by the [`Drawing`];
//! a figure's children are listed in draw order and each child keeps a
//! non-owning link back to its container.
//!
//! Containment is geometric: a figure may only be placed inside a container
//! whose rectangle strictly encloses its own. The structural operations here
//! check that (and acyclicity) before touching anything, so a failed call
//! never leaves the tree half-modified.
//!
//! Figures that are detached from the tree stay in the arena until
//! [`Drawing::remove_subtree`] frees them. Commands rely on that to put them
//! back on undo, and free them once the history lets go of them.

use crate::attributes::Attributes;
use crate::error::TreeError;
use crate::figure::Figure;
use crate::geometry::{Point, Rect};
use crate::kinds::drawing_kind;
use crate::render::RenderSurface;
use log::trace;
use slotmap::SlotMap;
use std::fmt::{self, Display};

slotmap::new_key_type! {
    /// Identifies a figure within its [`Drawing`].
    pub struct FigureId;
}

impl Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0.as_ffi() & 0xffff_ffff)
    }
}

/// The extent of a new drawing when none is configured. It straddles the
/// origin so figures placed at `(0, 0)` are still strictly inside the root.
pub const DEFAULT_EXTENT: Rect = Rect::from_components(-50000.0, -50000.0, 100000.0, 100000.0);

#[derive(Debug, Clone)]
pub struct Drawing {
    figures: SlotMap<FigureId, Figure>,
    root: FigureId,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENT)
    }
}

impl Drawing {
    /// Creates an empty drawing whose root covers `extent`.
    pub fn new(extent: Rect) -> Self {
        Self::with_root(Figure::new(drawing_kind(), extent))
    }

    /// Creates a drawing around an existing root figure.
    pub fn with_root(mut root: Figure) -> Self {
        root.container = None;
        root.children.clear();
        let mut figures = SlotMap::with_key();
        let root = figures.insert(root);
        Self { figures, root }
    }

    pub fn root(&self) -> FigureId {
        self.root
    }

    pub fn extent(&self) -> Rect {
        self.figures[self.root].rect()
    }

    pub fn get(&self, id: FigureId) -> Option<&Figure> {
        self.figures.get(id)
    }

    pub fn figure(&self, id: FigureId) -> Result<&Figure, TreeError> {
        self.figures.get(id).ok_or(TreeError::UnknownFigure(id))
    }

    fn figure_mut(&mut self, id: FigureId) -> Result<&mut Figure, TreeError> {
        self.figures.get_mut(id).ok_or(TreeError::UnknownFigure(id))
    }

    /// Adds a figure to the arena without attaching it to any container.
    pub fn insert(&mut self, mut figure: Figure) -> FigureId {
        figure.container = None;
        figure.children.clear();
        self.figures.insert(figure)
    }

    /// Number of figures in the arena, attached or not, including the root.
    pub fn figure_count(&self) -> usize {
        self.figures.len()
    }

    /// Frees a detached figure and everything it contains. Returns how many
    /// figures were removed from the arena.
    pub fn remove_subtree(&mut self, id: FigureId) -> Result<usize, TreeError> {
        if id == self.root {
            return Err(TreeError::RootIsFixed);
        }
        if self.figure(id)?.container.is_some() {
            return Err(TreeError::StillAttached(id));
        }
        let subtree = self.descendants(id)?;
        for figure in &subtree {
            self.figures.remove(*figure);
        }
        trace!("freed {} figures under {id}", subtree.len());
        Ok(subtree.len())
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: FigureId) -> bool {
        let mut current = Some(id);
        while let Some(figure_id) = current {
            if figure_id == self.root {
                return true;
            }
            current = self.figures.get(figure_id).and_then(|f| f.container);
        }
        false
    }

    /// Whether `ancestor` appears in the container chain of `id`.
    pub fn is_ancestor(&self, ancestor: FigureId, id: FigureId) -> bool {
        let mut current = self.figures.get(id).and_then(|f| f.container);
        while let Some(container) = current {
            if container == ancestor {
                return true;
            }
            current = self.figures.get(container).and_then(|f| f.container);
        }
        false
    }

    fn check_placement(&self, container: FigureId, child: FigureId) -> Result<(), TreeError> {
        let container_rect = self.figure(container)?.rect();
        let child_rect = self.figure(child)?.rect();
        if child == self.root {
            return Err(TreeError::RootIsFixed);
        }
        if child == container || self.is_ancestor(child, container) {
            return Err(TreeError::CircularContainment { container, child });
        }
        if !container_rect.encloses_rect(&child_rect) {
            return Err(TreeError::OutsideContainer { container, child });
        }
        Ok(())
    }

    /// Removes `child` from whatever container holds it and returns that container and index.
    fn unlink(&mut self, child: FigureId) -> Option<(FigureId, usize)> {
        let container = self.figures.get_mut(child)?.container.take()?;
        let siblings = &mut self.figures.get_mut(container)?.children;
        let index = siblings.iter().position(|c| *c == child)?;
        siblings.remove(index);
        Some((container, index))
    }

    /// Appends `child` as the last (topmost) figure of `container`,
    /// detaching it from its current container first.
    pub fn append_figure(&mut self, container: FigureId, child: FigureId) -> Result<(), TreeError> {
        let len = self.figure(container)?.children.len();
        self.insert_figure(container, child, len)
    }

    /// Appends several figures. Every candidate is checked before any is moved.
    pub fn append_figures(
        &mut self,
        container: FigureId,
        children: &[FigureId],
    ) -> Result<(), TreeError> {
        for child in children {
            self.check_placement(container, *child)?;
        }
        for child in children {
            self.append_figure(container, *child)?;
        }
        Ok(())
    }

    /// Places `child` at `index` in the child list of `container`.
    /// An index past the end appends.
    pub fn insert_figure(
        &mut self,
        container: FigureId,
        child: FigureId,
        index: usize,
    ) -> Result<(), TreeError> {
        self.check_placement(container, child)?;
        self.unlink(child);
        let siblings = &mut self.figure_mut(container)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.figure_mut(child)?.container = Some(container);
        trace!("placed {child} in {container} at {index}");
        Ok(())
    }

    /// Removes `child` from `container`, returning the index it had.
    /// The figure and its subtree stay in the arena.
    pub fn detach_figure(
        &mut self,
        container: FigureId,
        child: FigureId,
    ) -> Result<usize, TreeError> {
        if child == self.root {
            return Err(TreeError::RootIsFixed);
        }
        let index = self
            .figure(container)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(TreeError::NotAChild { container, child })?;
        self.figure_mut(container)?.children.remove(index);
        self.figure_mut(child)?.container = None;
        trace!("detached {child} from {container}");
        Ok(index)
    }

    pub fn contained_figures(&self, id: FigureId) -> Result<&[FigureId], TreeError> {
        Ok(self.figure(id)?.children.as_slice())
    }

    /// The container of `id` and its index there.
    pub fn position_in_container(
        &self,
        id: FigureId,
    ) -> Result<Option<(FigureId, usize)>, TreeError> {
        let Some(container) = self.figure(id)?.container else {
            return Ok(None);
        };
        let index = self
            .figure(container)?
            .children
            .iter()
            .position(|c| *c == id)
            .ok_or(TreeError::NotAChild { container, child: id })?;
        Ok(Some((container, index)))
    }

    /// The chain of containers of `id`, innermost first.
    pub fn containers(&self, id: FigureId) -> Result<Vec<FigureId>, TreeError> {
        let mut chain = Vec::new();
        let mut current = self.figure(id)?.container;
        while let Some(container) = current {
            chain.push(container);
            current = self.figure(container)?.container;
        }
        Ok(chain)
    }

    /// `id` and everything below it, depth first in draw order.
    pub fn descendants(&self, id: FigureId) -> Result<Vec<FigureId>, TreeError> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.figure(current)?.children.iter().rev());
        }
        Ok(out)
    }

    /// Moves and resizes a figure. Contained figures are translated by the
    /// same amount as the figure's position; their sizes are unchanged.
    pub fn change_rect(&mut self, id: FigureId, rect: Rect) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootIsFixed);
        }
        let old = self.figure(id)?.rect();
        let delta = old.position().offset_to(rect.position());
        for descendant in self.descendants(id)?.into_iter().skip(1) {
            let figure = self.figure_mut(descendant)?;
            let moved = figure.rect().moved_by(delta);
            figure.set_rect(moved);
        }
        self.figure_mut(id)?.set_rect(rect);
        Ok(())
    }

    pub fn move_position_by(&mut self, id: FigureId, vector: Point) -> Result<(), TreeError> {
        let rect = self.figure(id)?.rect().moved_by(vector);
        self.change_rect(id, rect)
    }

    pub fn set_visible(&mut self, id: FigureId, visible: bool) -> Result<(), TreeError> {
        self.figure_mut(id)?.set_visible(visible);
        Ok(())
    }

    /// Attribute bag of a figure. Attributes have no bearing on containment.
    pub fn attributes_mut(&mut self, id: FigureId) -> Result<&mut Attributes, TreeError> {
        Ok(self.figure_mut(id)?.attributes_mut())
    }

    /// Child indices leading from the root to `id`.
    pub fn path_of(&self, id: FigureId) -> Result<Vec<usize>, TreeError> {
        let mut path = Vec::new();
        let mut current = id;
        while current != self.root {
            let (container, index) = self
                .position_in_container(current)?
                .ok_or(TreeError::Detached(id))?;
            path.push(index);
            current = container;
        }
        path.reverse();
        Ok(path)
    }

    /// Follows child indices from the root. The empty path is the root.
    pub fn resolve_path(&self, path: &[usize]) -> Result<FigureId, TreeError> {
        let mut current = self.root;
        for index in path {
            current = *self
                .figure(current)?
                .children
                .get(*index)
                .ok_or_else(|| TreeError::InvalidPath(path.to_vec()))?;
        }
        Ok(current)
    }

    /// Verifies that links agree in both directions, that every child is
    /// strictly inside its container, and that the tree has no cycles.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        let mut seen = std::collections::HashSet::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(TreeError::CircularContainment {
                    container: self.figure(id)?.container.unwrap_or(id),
                    child: id,
                });
            }
            let figure = self.figure(id)?;
            for child_id in &figure.children {
                let child = self.figure(*child_id)?;
                if child.container != Some(id) {
                    return Err(TreeError::NotAChild {
                        container: id,
                        child: *child_id,
                    });
                }
                if !figure.rect().encloses_rect(&child.rect()) {
                    return Err(TreeError::OutsideContainer {
                        container: id,
                        child: *child_id,
                    });
                }
                stack.push(*child_id);
            }
        }
        Ok(())
    }

    /// Owned copy of the subtree at `id`.
    pub fn snapshot(&self, id: FigureId) -> Result<FigureSnapshot, TreeError> {
        let figure = self.figure(id)?;
        let contained = figure
            .children
            .iter()
            .map(|child| self.snapshot(*child))
            .collect::<Result<Vec<_>, _>>()?;
        let mut copy = figure.detached_copy();
        copy.set_visible(figure.is_visible());
        Ok(FigureSnapshot {
            figure: copy,
            contained,
        })
    }

    /// Draws every visible figure, containers before their contents.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        self.draw_figure(self.root, surface);
    }

    fn draw_figure(&self, id: FigureId, surface: &mut dyn RenderSurface) {
        let Some(figure) = self.figures.get(id) else {
            return;
        };
        if !figure.is_visible() {
            return;
        }
        figure.draw(surface);
        for child in &figure.children {
            self.draw_figure(*child, surface);
        }
    }
}

/// A detached deep copy of a figure and its contents.
///
/// Used as drag feedback: it can be moved and resized freely without any of
/// the containment rules that apply inside a [`Drawing`].
#[derive(Debug, Clone)]
pub struct FigureSnapshot {
    figure: Figure,
    contained: Vec<FigureSnapshot>,
}

impl FigureSnapshot {
    pub fn new(figure: Figure) -> Self {
        Self {
            figure: figure.detached_copy(),
            contained: Vec::new(),
        }
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn contained(&self) -> &[FigureSnapshot] {
        &self.contained
    }

    pub fn rect(&self) -> Rect {
        self.figure.rect()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.figure.set_visible(visible);
    }

    /// Same cascading behavior as [`Drawing::change_rect`].
    pub fn set_rect(&mut self, rect: Rect) {
        let delta = self.figure.rect().position().offset_to(rect.position());
        for child in &mut self.contained {
            child.translate(delta);
        }
        self.figure.set_rect(rect);
    }

    pub fn move_by(&mut self, vector: Point) {
        self.translate(vector);
    }

    fn translate(&mut self, delta: Point) {
        let moved = self.figure.rect().moved_by(delta);
        self.figure.set_rect(moved);
        for child in &mut self.contained {
            child.translate(delta);
        }
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        if !self.figure.is_visible() {
            return;
        }
        self.figure.draw(surface);
        for child in &self.contained {
            child.draw(surface);
        }
    }
}
