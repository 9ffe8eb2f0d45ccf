use super::data::{DecodedImage, ImageId, ImageRecord};

/// The Library holds every image uploaded during this session.
/// Nothing is persisted; the list lives only as long as the window.
#[derive(Default)]
pub struct Library {
    images: Vec<ImageRecord>,
    next_id: ImageId,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly decoded images in upload order.
    /// Returns the number of records added.
    pub fn add(&mut self, decoded: Vec<DecodedImage>) -> usize {
        let count = decoded.len();

        for image in decoded {
            let id = self.next_id();
            self.images.push(ImageRecord::new(id, image));
        }

        count
    }

    /// Hand out a fresh identifier
    pub fn next_id(&mut self) -> ImageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.images.iter().find(|image| image.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

// Pixel buffers are large; keep Debug output short
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("images", &self.images.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::test_image;

    #[test]
    fn test_add_keeps_upload_order() {
        let mut library = Library::new();
        let added = library.add(vec![test_image("a.png", 2, 2), test_image("b.png", 3, 3)]);

        assert_eq!(added, 2);
        let names: Vec<_> = library.iter().map(|image| image.name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png"]);
    }

    #[test]
    fn test_same_name_gets_distinct_ids() {
        let mut library = Library::new();
        library.add(vec![test_image("dup.png", 1, 1)]);
        library.add(vec![test_image("dup.png", 1, 1)]);

        let ids: Vec<_> = library.iter().map(|image| image.id).collect();
        assert_eq!(library.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_get_by_id() {
        let mut library = Library::new();
        assert!(library.is_empty());
        library.add(vec![test_image("a.png", 4, 5)]);

        let id = library.iter().next().map(|image| image.id).unwrap();
        let image = library.get(id).unwrap();
        assert_eq!(image.size().width, 4.0);
        assert_eq!(image.size().height, 5.0);
        assert!(library.get(id + 100).is_none());
    }
}
