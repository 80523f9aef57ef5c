//! # Scene Management Module
//!
//! Scene objects, their lifecycle, and the scene graph they are attached to.
//!
//! ## Key Components
//!
//! - [`SceneObject`] - Node tree of meshes with transforms; deep clone and dispose
//! - [`Mesh`] / [`Geometry`] - Renderable parts and their tracked buffers
//! - [`Renderer`] - Scene graph operations the gallery drives
//! - [`Scene`] - In-memory scene anchor holding weak references
//! - [`Vertex3D`] - Vertex layout with position and normal
//!
//! ## Object Lifecycle
//!
//! Decoded objects are templates. Displayed objects are deep clones owned by
//! their caller, attached to the scene by weak reference, and disposed before
//! they are dropped:
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use exhibit::gfx::scene::{Renderer, Scene, SceneObject};
//!
//! let mut scene = Scene::new();
//! let template = SceneObject::new("lamp");
//! let shown = Rc::new(RefCell::new(template.deep_clone()));
//!
//! scene.attach(&shown);
//! assert_eq!(scene.anchor_len(), 1);
//!
//! scene.detach(&shown);
//! shown.borrow_mut().dispose();
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{Geometry, Mesh, SceneObject};
pub use scene::{Renderer, Scene, SceneStatistics, SharedObject};
pub use vertex::Vertex3D;
