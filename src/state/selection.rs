/// Ordered selection of at most two images
///
/// The order matters: the first image is placed on the left and drives
/// transform slot 0, the second goes to the right and drives slot 1.

use super::data::ImageId;

/// Maximum number of images that can be combined
pub const MAX_SELECTION: usize = 2;

/// Outcome of toggling an image in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The image was appended to the selection
    Added,
    /// The image was already selected and has been removed
    Removed,
    /// Two images are already selected; nothing changed
    Full,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ImageId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: ImageId) -> Toggle {
        if let Some(index) = self.ids.iter().position(|&selected| selected == id) {
            self.ids.remove(index);
            Toggle::Removed
        } else if self.ids.len() < MAX_SELECTION {
            self.ids.push(id);
            Toggle::Added
        } else {
            Toggle::Full
        }
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[ImageId] {
        &self.ids
    }

    /// The selected pair in slot order, if exactly two are selected
    pub fn pair(&self) -> Option<(ImageId, ImageId)> {
        match self.ids.as_slice() {
            [first, second] => Some((*first, *second)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_caps_at_two() {
        let mut selection = Selection::new();
        assert_eq!(selection.toggle(1), Toggle::Added);
        assert_eq!(selection.toggle(2), Toggle::Added);
        assert_eq!(selection.toggle(3), Toggle::Full);

        assert_eq!(selection.len(), 2);
        assert!(!selection.contains(3));
        assert_eq!(selection.pair(), Some((1, 2)));
    }

    #[test]
    fn test_toggle_removes_selected() {
        let mut selection = Selection::new();
        selection.toggle(1);
        selection.toggle(2);

        assert_eq!(selection.toggle(1), Toggle::Removed);
        assert_eq!(selection.ids(), &[2]);
        assert_eq!(selection.pair(), None);

        // the freed place goes to the end, so the order follows clicks
        assert_eq!(selection.toggle(3), Toggle::Added);
        assert_eq!(selection.pair(), Some((2, 3)));
    }

    #[test]
    fn test_empty_selection_has_no_pair() {
        let selection = Selection::new();
        assert_eq!(selection.len(), 0);
        assert_eq!(selection.pair(), None);
    }
}
