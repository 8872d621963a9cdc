use crate::selection::Selection;
use figure::Drawing;

/// Everything a command may change: the figure tree and the selection.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub drawing: Drawing,
    pub selection: Selection,
}

impl Document {
    pub fn new(drawing: Drawing) -> Self {
        Self {
            drawing,
            selection: Selection::new(),
        }
    }
}
