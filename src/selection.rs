/// Ordered selection of images, unique by URL

use crate::image_data::ImageDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// The URL is not among the current candidates; nothing changed
    NotACandidate,
}

/// Images the user picked, in the order they were picked
///
/// Selections are not pruned when the candidate list changes; a stale entry
/// stays until it is toggled off, cleared, or replaced by `select_all`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    images: Vec<ImageDescriptor>,
}

impl SelectionSet {
    pub fn new() -> Self {
        SelectionSet { images: Vec::new() }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.images.iter().any(|img| img.url == url)
    }

    pub fn count(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[ImageDescriptor] {
        &self.images
    }

    pub fn urls(&self) -> Vec<&str> {
        self.images.iter().map(|img| img.url.as_str()).collect()
    }

    /// Append unless an image with the same URL is already selected
    pub fn select(&mut self, image: ImageDescriptor) -> bool {
        if self.contains(&image.url) {
            return false;
        }
        self.images.push(image);
        true
    }

    pub fn deselect(&mut self, url: &str) -> bool {
        let original_len = self.images.len();
        self.images.retain(|img| img.url != url);
        self.images.len() < original_len
    }

    pub fn toggle(&mut self, url: &str, candidates: &[ImageDescriptor]) -> ToggleOutcome {
        if self.deselect(url) {
            return ToggleOutcome::Deselected;
        }

        match candidates.iter().find(|img| img.url == url) {
            Some(image) => {
                self.images.push(image.clone());
                ToggleOutcome::Selected
            }
            None => {
                log::debug!("Ignoring toggle for unknown image {}", url);
                ToggleOutcome::NotACandidate
            }
        }
    }

    /// Replace the selection with `candidates`, keeping their order
    pub fn select_all(&mut self, candidates: &[ImageDescriptor]) {
        self.images.clear();
        for image in candidates {
            self.select(image.clone());
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Drop selections that are no longer candidates; nothing calls this implicitly
    pub fn retain_candidates(&mut self, candidates: &[ImageDescriptor]) {
        self.images
            .retain(|img| candidates.iter().any(|c| c.url == img.url));
    }
}

impl From<Vec<ImageDescriptor>> for SelectionSet {
    fn from(images: Vec<ImageDescriptor>) -> Self {
        let mut set = SelectionSet::new();
        set.select_all(&images);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<ImageDescriptor> {
        vec![
            ImageDescriptor::new("https://a.com/1.jpg", 200, 200, "One", ""),
            ImageDescriptor::new("https://a.com/2.jpg", 300, 200, "Two", ""),
            ImageDescriptor::new("https://a.com/3.jpg", 400, 200, "Three", ""),
        ]
    }

    #[test]
    fn test_toggle_selects_then_deselects() {
        let candidates = candidates();
        let mut set = SelectionSet::new();

        assert_eq!(set.toggle("https://a.com/2.jpg", &candidates), ToggleOutcome::Selected);
        assert!(set.contains("https://a.com/2.jpg"));
        assert_eq!(set.toggle("https://a.com/2.jpg", &candidates), ToggleOutcome::Deselected);
        assert!(set.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_prior_set() {
        let candidates = candidates();
        let mut set = SelectionSet::new();
        set.toggle("https://a.com/1.jpg", &candidates);
        let before = set.clone();

        set.toggle("https://a.com/3.jpg", &candidates);
        set.toggle("https://a.com/3.jpg", &candidates);

        assert_eq!(set, before);
    }

    #[test]
    fn test_toggle_unknown_url_is_noop() {
        let mut set = SelectionSet::new();
        assert_eq!(
            set.toggle("https://elsewhere.com/x.jpg", &candidates()),
            ToggleOutcome::NotACandidate
        );
        assert_eq!(set.count(), 0);
    }

    #[test]
    fn test_selection_order_follows_clicks() {
        let candidates = candidates();
        let mut set = SelectionSet::new();
        set.toggle("https://a.com/3.jpg", &candidates);
        set.toggle("https://a.com/1.jpg", &candidates);
        set.toggle("https://a.com/2.jpg", &candidates);
        set.toggle("https://a.com/1.jpg", &candidates);

        assert_eq!(set.urls(), vec!["https://a.com/3.jpg", "https://a.com/2.jpg"]);
    }

    #[test]
    fn test_select_all_and_clear() {
        let candidates = candidates();
        let mut set = SelectionSet::new();
        set.toggle("https://a.com/2.jpg", &candidates);

        set.select_all(&candidates);
        assert_eq!(set.count(), candidates.len());
        assert_eq!(set.images(), candidates.as_slice());

        set.clear();
        assert_eq!(set.count(), 0);
    }

    #[test]
    fn test_select_all_collapses_duplicate_urls() {
        let mut candidates = candidates();
        candidates.push(ImageDescriptor::new("https://a.com/1.jpg", 10, 10, "Again", ""));

        let set = SelectionSet::from(candidates);
        assert_eq!(set.count(), 3);
        assert_eq!(set.images()[0].title, "One");
    }

    #[test]
    fn test_select_ignores_same_url_with_other_dimensions() {
        let mut set = SelectionSet::new();
        assert!(set.select(ImageDescriptor::new("https://a.com/1.jpg", 200, 200, "", "")));
        assert!(!set.select(ImageDescriptor::new("https://a.com/1.jpg", 999, 999, "", "")));
        assert_eq!(set.count(), 1);
    }

    #[test]
    fn test_stale_selection_retained_after_refresh() {
        let mut set = SelectionSet::new();
        set.toggle("https://a.com/1.jpg", &candidates());

        let refreshed = vec![ImageDescriptor::new("https://b.com/9.jpg", 200, 200, "", "")];
        // Refreshing candidates does not touch the selection
        assert!(set.contains("https://a.com/1.jpg"));

        // Toggling the stale URL still removes it even though it is no longer a candidate
        assert_eq!(set.toggle("https://a.com/1.jpg", &refreshed), ToggleOutcome::Deselected);
    }

    #[test]
    fn test_retain_candidates_drops_stale_entries() {
        let candidates = candidates();
        let mut set = SelectionSet::new();
        set.toggle("https://a.com/3.jpg", &candidates);
        set.toggle("https://a.com/1.jpg", &candidates);
        set.toggle("https://a.com/2.jpg", &candidates);

        let refreshed = vec![
            candidates[1].clone(),
            ImageDescriptor::new("https://b.com/9.jpg", 200, 200, "", ""),
            candidates[2].clone(),
        ];
        set.retain_candidates(&refreshed);

        assert_eq!(set.urls(), vec!["https://a.com/3.jpg", "https://a.com/2.jpg"]);
    }
}
