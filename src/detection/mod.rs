//! Detections
//!
//! Labelled, pixel-space text detections for one analyzed image.
//!
//! A `DetectionSet` is built once per analysis and never mutated. Labels run
//! from 1 to `len()` without gaps, so lookup by label is an index into the
//! backing vector.

mod normalize;

pub use normalize::{normalize, DetectionError, INCLUDED_BLOCK_TYPES};

use serde::Serialize;

/// Pixel-space bounding box (left, top, right, bottom)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// One recognized text fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Sequential label, starting at 1
    pub label: u32,
    pub text: String,
    #[serde(rename = "box")]
    pub bbox: PixelBox,
}

/// Ordered detections for one image
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DetectionSet {
    detections: Vec<Detection>,
}

impl DetectionSet {
    /// Build a set from `(text, box)` entries, labelling them 1..N in order
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, PixelBox)>,
    {
        let detections = entries
            .into_iter()
            .zip(1u32..)
            .map(|((text, bbox), label)| Detection { label, text, bbox })
            .collect();

        Self { detections }
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Iterate in label order
    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    /// Look up a detection by its label
    pub fn get(&self, label: u32) -> Option<&Detection> {
        let index = usize::try_from(label.checked_sub(1)?).ok()?;
        self.detections.get(index)
    }

    /// Text of the detection with this label
    pub fn text(&self, label: u32) -> Option<&str> {
        self.get(label).map(|d| d.text.as_str())
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> PixelBox {
        PixelBox::new(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_labels_are_sequential() {
        let set = DetectionSet::from_entries(
            ["A", "B", "C"].iter().map(|t| (t.to_string(), unit_box())),
        );

        let labels: Vec<u32> = set.iter().map(|d| d.label).collect();
        assert_eq!(labels, vec![1, 2, 3]);
    }

    #[test]
    fn test_get_by_label() {
        let set = DetectionSet::from_entries(
            ["first", "second"].iter().map(|t| (t.to_string(), unit_box())),
        );

        assert_eq!(set.text(1), Some("first"));
        assert_eq!(set.text(2), Some("second"));
        assert_eq!(set.text(0), None);
        assert_eq!(set.text(3), None);
        assert!(set.get(u32::MAX).is_none());
    }

    #[test]
    fn test_pixel_box_dimensions() {
        let bbox = PixelBox::new(100.0, 80.0, 300.0, 120.0);
        assert_eq!(bbox.width(), 200.0);
        assert_eq!(bbox.height(), 40.0);
    }

    #[test]
    fn test_serializes_as_array() {
        let set = DetectionSet::from_entries(vec![(
            "ERIKA".to_string(),
            PixelBox::new(1.0, 2.0, 3.0, 4.0),
        )]);

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json[0]["label"], 1);
        assert_eq!(json[0]["text"], "ERIKA");
        assert_eq!(json[0]["box"]["right"], 3.0);
    }
}
