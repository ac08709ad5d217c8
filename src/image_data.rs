/// Data structures for Pin Saver
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

/// One discoverable image on a page
///
/// Two descriptors with the same `url` are the same selectable item, even if
/// their dimensions differ between extractions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageDescriptor {
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

impl ImageDescriptor {
    pub fn new(url: &str, width: u32, height: u32, title: &str, description: &str) -> ImageDescriptor {
        ImageDescriptor {
            url: url.to_string(),
            width,
            height,
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

// The backend sends `null` for optional text fields
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A remote collection of saved images
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub image_count: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Form data for creating a board
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewBoard {
    pub name: String,
    pub description: String,
    pub is_private: bool,
}

impl NewBoard {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Please enter a board name".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveImagesRequest {
    pub board_id: String,
    pub images: Vec<ImageDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveImagesResponse {
    pub saved_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilteredImagesResponse {
    pub images: Vec<ImageDescriptor>,
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(default)]
    pub filtered_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/32x32";

impl UserProfile {
    /// Profile used when the backend cannot return one at sign-in
    pub fn demo() -> UserProfile {
        UserProfile {
            username: "demo_user".to_string(),
            profile_image: Some(PLACEHOLDER_AVATAR.to_string()),
        }
    }

    pub fn avatar(&self) -> &str {
        self.profile_image.as_deref().unwrap_or(PLACEHOLDER_AVATAR)
    }
}

/// Boards shown when the backend refuses to list the user's boards
pub fn demo_boards() -> Vec<Board> {
    vec![
        Board {
            id: "mock-board-1".to_string(),
            name: "Home Interior".to_string(),
            description: "Beautiful home interior designs".to_string(),
            image_count: 45,
            is_private: false,
            url: None,
        },
        Board {
            id: "mock-board-2".to_string(),
            name: "Travel Photos".to_string(),
            description: "Amazing travel destinations".to_string(),
            image_count: 128,
            is_private: false,
            url: None,
        },
    ]
}
