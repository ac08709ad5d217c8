/// Image discovery: turns the page's `<img>` elements into descriptors
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlImageElement};

use crate::error::{AppError, Result};
use crate::image_data::ImageDescriptor;

/// Snapshot of one `<img>` element at scan time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageElement {
    /// Resolved source URL (empty when the element has no `src`)
    pub src: String,
    pub natural_width: u32,
    pub natural_height: u32,
    /// Rendered size
    pub width: u32,
    pub height: u32,
    pub alt: String,
    pub title: String,
}

impl ImageElement {
    pub fn has_http_source(&self) -> bool {
        self.src.starts_with("http")
    }

    /// Intrinsic size when loaded, else rendered size, else 0
    pub fn dimensions(&self) -> (u32, u32) {
        let pick = |natural: u32, rendered: u32| if natural > 0 { natural } else { rendered };
        (
            pick(self.natural_width, self.width),
            pick(self.natural_height, self.height),
        )
    }

    /// `position` is the 0-based index among all `<img>` elements on the page
    pub fn describe(&self, position: usize) -> ImageDescriptor {
        let (width, height) = self.dimensions();
        let label = first_non_empty(&self.alt, &self.title);

        ImageDescriptor {
            url: self.src.clone(),
            width,
            height,
            title: label
                .map(str::to_string)
                .unwrap_or_else(|| format!("Image {}", position + 1)),
            description: label.unwrap_or_default().to_string(),
        }
    }
}

fn first_non_empty<'a>(a: &'a str, b: &'a str) -> Option<&'a str> {
    [a, b].into_iter().find(|s| !s.is_empty())
}

/// Lazily describe every image with an http(s) source, in document order
///
/// The returned iterator is `Clone`, so a scan can be replayed without
/// touching the DOM again.
pub fn extract_images(
    elements: &[ImageElement],
) -> impl Iterator<Item = ImageDescriptor> + Clone + '_ {
    elements
        .iter()
        .enumerate()
        .filter(|(_, el)| el.has_http_source())
        .map(|(position, el)| el.describe(position))
}

/// Read all `<img>` elements of `document`
pub fn snapshot_document(document: &Document) -> Result<Vec<ImageElement>> {
    let nodes = document
        .query_selector_all("img")
        .map_err(|e| AppError::Transport(format!("Failed to query images: {:?}", e)))?;

    let elements = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
        .map(|img| ImageElement {
            src: img.src(),
            natural_width: img.natural_width(),
            natural_height: img.natural_height(),
            width: img.width(),
            height: img.height(),
            alt: img.alt(),
            title: img.title(),
        })
        .collect();

    Ok(elements)
}
