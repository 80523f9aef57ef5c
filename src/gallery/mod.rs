//! # Gallery
//!
//! Paging through a fixed set of 3D exhibits grouped into modes.
//!
//! - [`dataset`] - Items and modes, validated at construction
//! - [`navigation`] - Mode/index state and its wrap-around transitions
//! - [`controller`] - Load-and-display cycles driven by navigation requests

pub mod controller;
pub mod dataset;
pub mod navigation;

pub use controller::{
    place_object, CurrentItem, Cycle, CycleOutcome, GalleryController, Navigation, Phase,
    DEFAULT_VERTICAL_OFFSET,
};
pub use dataset::{GalleryDataset, GalleryItem, GalleryMode, TextRef};
pub use navigation::{NavigationState, Position};
