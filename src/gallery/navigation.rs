//! Navigation state: which mode is shown and which item within it.

use std::fmt;

use super::dataset::GalleryDataset;
use crate::error::GalleryError;

/// Current mode and item index.
///
/// Transitions are pure. Item counts come from a validated
/// [`GalleryDataset`], so every mode has at least one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub mode: usize,
    pub index: usize,
}

impl NavigationState {
    /// Start of the first mode
    pub fn start() -> Self {
        Self::default()
    }

    /// Following item, wrapping to the first after the last
    pub fn next(self, dataset: &GalleryDataset) -> Self {
        let len = dataset.len(self.mode);
        debug_assert!(len > 0, "mode {} has no items", self.mode);
        Self {
            index: (self.index + 1) % len,
            ..self
        }
    }

    /// Preceding item, wrapping to the last before the first
    pub fn prev(self, dataset: &GalleryDataset) -> Self {
        let len = dataset.len(self.mode);
        debug_assert!(len > 0, "mode {} has no items", self.mode);
        Self {
            index: (self.index + len - 1) % len,
            ..self
        }
    }

    /// First item of the mode called `name`
    pub fn switch_mode(self, dataset: &GalleryDataset, name: &str) -> Result<Self, GalleryError> {
        let mode = dataset
            .mode_index(name)
            .ok_or_else(|| GalleryError::UnknownMode(name.to_string()))?;
        Ok(Self { mode, index: 0 })
    }
}

/// One-based position of the current item, shown as `"2-5"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub total: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.index + 1, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::dataset::GalleryItem;

    fn dataset() -> GalleryDataset {
        let items = |n: usize| (0..n).map(|i| GalleryItem::new(format!("{}.glb", i))).collect();
        GalleryDataset::builder()
            .mode("solo", items(3))
            .mode("team", items(2))
            .build()
            .unwrap()
    }

    #[test]
    fn test_next_wraps_to_start() {
        let dataset = dataset();
        let last = NavigationState { mode: 0, index: 2 };
        assert_eq!(last.next(&dataset), NavigationState { mode: 0, index: 0 });
        assert_eq!(NavigationState::start().next(&dataset).index, 1);
    }

    #[test]
    fn test_prev_wraps_to_end() {
        let dataset = dataset();
        assert_eq!(NavigationState::start().prev(&dataset).index, 2);

        let team = NavigationState { mode: 1, index: 0 };
        assert_eq!(team.prev(&dataset), NavigationState { mode: 1, index: 1 });
    }

    #[test]
    fn test_switch_mode_resets_index() {
        let dataset = dataset();
        let state = NavigationState { mode: 0, index: 2 };

        assert_eq!(
            state.switch_mode(&dataset, "team").unwrap(),
            NavigationState { mode: 1, index: 0 }
        );
        assert_eq!(state.switch_mode(&dataset, "solo").unwrap().index, 0);
        assert!(matches!(
            state.switch_mode(&dataset, "museum"),
            Err(GalleryError::UnknownMode(_))
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "has no items")]
    fn test_wrapping_an_empty_mode_panics() {
        let dataset = dataset();
        NavigationState { mode: 7, index: 0 }.next(&dataset);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position { index: 1, total: 5 }.to_string(), "2-5");
    }
}
