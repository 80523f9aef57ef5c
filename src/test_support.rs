//! Shared helpers for unit tests

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};

use crate::assets::AssetDecoder;
use crate::error::DecodeError;
use crate::gfx::{
    resources::{Material, ResourceRegistry},
    scene::{Geometry, Mesh, SceneObject, Vertex3D},
};

/// Axis-aligned box mesh with tracked geometry and material
pub fn cuboid_mesh(registry: &Arc<ResourceRegistry>, min: [f32; 3], max: [f32; 3]) -> Mesh {
    let vertices = (0..8)
        .map(|i| {
            Vertex3D::new(
                [
                    if i & 1 == 0 { min[0] } else { max[0] },
                    if i & 2 == 0 { min[1] } else { max[1] },
                    if i & 4 == 0 { min[2] } else { max[2] },
                ],
                [0.0, 1.0, 0.0],
            )
        })
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 1, 3, 0, 3, 2,
        4, 6, 7, 4, 7, 5,
        0, 4, 5, 0, 5, 1,
        2, 3, 7, 2, 7, 6,
        0, 2, 6, 0, 6, 4,
        1, 5, 7, 1, 7, 3,
    ];

    Mesh::new(
        Geometry::new(vertices, indices).tracked(registry),
        Material::default().tracked(registry),
    )
}

/// Fresh directory under the system temp dir for file based tests
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("exhibit-test-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Decoder double that records every decode.
///
/// Objects are a 2x2x2 box with a smaller child box, offset so their bounds
/// are not centered. Locators marked as failing return `DecodeError::Malformed`.
/// A gated decoder holds every decode until [`TrackingDecoder::open_gates`].
pub struct TrackingDecoder {
    registry: Arc<ResourceRegistry>,
    calls: RefCell<HashMap<String, usize>>,
    failing: HashSet<String>,
    gated: bool,
    gates: RefCell<Vec<oneshot::Sender<()>>>,
}

impl TrackingDecoder {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ResourceRegistry::new()),
            calls: RefCell::new(HashMap::new()),
            failing: HashSet::new(),
            gated: false,
            gates: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(mut self, locator: &str) -> Self {
        self.failing.insert(locator.to_string());
        self
    }

    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    pub fn decode_count(&self, locator: &str) -> usize {
        self.calls.borrow().get(locator).copied().unwrap_or(0)
    }

    pub fn total_decodes(&self) -> usize {
        self.calls.borrow().values().sum()
    }

    /// Let every held decode complete
    pub fn open_gates(&self) {
        for gate in self.gates.borrow_mut().drain(..) {
            let _ = gate.send(());
        }
    }

    /// Number of decodes waiting on a gate
    pub fn held(&self) -> usize {
        self.gates.borrow().len()
    }

    fn build(&self, locator: &str) -> SceneObject {
        SceneObject::new(locator)
            .with_mesh(cuboid_mesh(&self.registry, [2.0, 0.0, -4.0], [4.0, 2.0, -2.0]))
            .with_child(
                SceneObject::new(format!("{}/detail", locator)).with_mesh(cuboid_mesh(
                    &self.registry,
                    [2.5, 2.0, -3.5],
                    [3.5, 3.0, -2.5],
                )),
            )
    }
}

impl AssetDecoder for TrackingDecoder {
    fn decode(&self, locator: &str) -> LocalBoxFuture<'static, Result<SceneObject, DecodeError>> {
        *self
            .calls
            .borrow_mut()
            .entry(locator.to_string())
            .or_insert(0) += 1;

        let result = if self.failing.contains(locator) {
            Err(DecodeError::Malformed {
                locator: locator.to_string(),
                message: "corrupt test asset".to_string(),
            })
        } else {
            Ok(self.build(locator))
        };

        let gate = if self.gated {
            let (tx, rx) = oneshot::channel();
            self.gates.borrow_mut().push(tx);
            Some(rx)
        } else {
            None
        };

        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        }
        .boxed_local()
    }
}
