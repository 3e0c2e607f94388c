/// Image identifiers and the fixed, non-empty list the rotation cycles through.
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlideshowError};

/// Opaque reference to a displayable image (URL or filesystem path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ordered, immutable image list. Always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageList {
    items: Arc<[ImageId]>,
}

impl ImageList {
    pub fn new(items: Vec<ImageId>) -> Result<Self> {
        if items.is_empty() {
            return Err(SlideshowError::EmptyImageList);
        }
        Ok(Self {
            items: items.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Index is reduced modulo the list length.
    pub fn get(&self, index: usize) -> &ImageId {
        &self.items[index % self.items.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageId> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_rejected() {
        let err = ImageList::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SlideshowError::EmptyImageList));
    }

    #[test]
    fn test_list_preserves_order() {
        let list = ImageList::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(list.len(), 3);
        let ids: Vec<&str> = list.iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(list.get(4).as_str(), "b");
    }
}
