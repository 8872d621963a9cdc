use figure::FigureId;

/// The single selected figure, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<FigureId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current selection with `id`.
    pub fn select(&mut self, id: FigureId) {
        self.selected = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn is_selected(&self, id: FigureId) -> bool {
        self.selected == Some(id)
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    pub fn get(&self) -> Option<FigureId> {
        self.selected
    }
}
