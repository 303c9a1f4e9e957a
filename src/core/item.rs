use serde::{Deserialize, Serialize};

/// Wire shape of an item, accepted from clients and normalized on the way in
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: i64,
    name: String,
    #[serde(default)]
    image_url: String,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        Item::new(record.id, record.name, record.image_url)
    }
}

/// A creature the player has to name
///
/// The name is always stored lowercase so comparisons are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", from = "ItemRecord")]
pub struct Item {
    id: i64,
    name: String,
    image_url: String,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into().to_lowercase(),
            image_url: image_url.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Items without an image cannot be shown to the player
    pub fn has_image(&self) -> bool {
        !self.image_url.trim().is_empty()
    }

    /// Compare a raw player answer against this item's name
    pub fn matches_answer(&self, answer: &str) -> bool {
        normalize_answer(answer) == self.name
    }
}

/// Trim and lowercase a submitted answer
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}
