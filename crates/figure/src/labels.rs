use crate::error::AttributeError;
use serde::{Deserialize, Serialize};

/// An ordered list of text labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelList(Vec<String>);

impl LabelList {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A label list with exactly one selected entry, as shown by a radio group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSelection", into = "RawSelection")]
pub struct SingleSelectLabelList {
    labels: LabelList,
    selected_index: usize,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSelection {
    labels: LabelList,
    selected_index: usize,
}

impl SingleSelectLabelList {
    pub fn new(labels: LabelList, selected_index: usize) -> Result<Self, AttributeError> {
        check_index(selected_index, labels.len())?;
        Ok(Self {
            labels,
            selected_index,
        })
    }

    pub fn labels(&self) -> &LabelList {
        &self.labels
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.labels.get(self.selected_index)
    }

    /// A copy of this list with a different entry selected.
    pub fn with_selected(&self, index: usize) -> Result<Self, AttributeError> {
        Self::new(self.labels.clone(), index)
    }
}

impl Default for SingleSelectLabelList {
    fn default() -> Self {
        Self {
            labels: LabelList::new(["one", "two", "three", "four", "five"]),
            selected_index: 0,
        }
    }
}

impl TryFrom<RawSelection> for SingleSelectLabelList {
    type Error = AttributeError;

    fn try_from(raw: RawSelection) -> Result<Self, Self::Error> {
        Self::new(raw.labels, raw.selected_index)
    }
}

impl From<SingleSelectLabelList> for RawSelection {
    fn from(list: SingleSelectLabelList) -> Self {
        RawSelection {
            labels: list.labels,
            selected_index: list.selected_index,
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<(), AttributeError> {
    if index < len {
        Ok(())
    } else {
        Err(AttributeError::InvalidSelection { index, len })
    }
}
