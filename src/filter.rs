/// Minimum-size filtering, locally or through the backend

use crate::api::{BoardClient, HttpBackend};
use crate::image_data::ImageDescriptor;

/// Both sides must be strictly larger than this
pub const MIN_IMAGE_DIMENSION: u32 = 100;

pub fn passes_size_filter(image: &ImageDescriptor) -> bool {
    image.width > MIN_IMAGE_DIMENSION && image.height > MIN_IMAGE_DIMENSION
}

/// Order-preserving subsequence of images passing the size filter
pub fn filter_images(images: &[ImageDescriptor]) -> Vec<ImageDescriptor> {
    images.iter().filter(|img| passes_size_filter(img)).cloned().collect()
}

/// Ask the backend to filter, falling back to [`filter_images`] on any failure
///
/// The remote list is re-checked locally, so both paths yield the same list.
pub async fn filter_with_fallback<H: HttpBackend>(
    client: &BoardClient<H>,
    images: &[ImageDescriptor],
) -> Vec<ImageDescriptor> {
    if images.is_empty() {
        return Vec::new();
    }

    match client.filter_images_remote(images).await {
        // Re-check the threshold on the backend's answer
        Ok(filtered) => filtered.into_iter().filter(passes_size_filter).collect(),
        Err(e) => {
            log::warn!("Remote filter unavailable ({}), filtering locally", e);
            filter_images(images)
        }
    }
}
