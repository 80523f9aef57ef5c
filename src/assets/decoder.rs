//! Asset decoding
//!
//! [`AssetDecoder`] turns a locator into a freshly decoded [`SceneObject`].
//! [`FileDecoder`] resolves locators against an asset root and decodes OBJ and
//! glTF/GLB files on a worker thread so the event loop never blocks on I/O.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};

use super::{gltf, obj};
use crate::error::DecodeError;
use crate::gfx::{resources::ResourceRegistry, scene::SceneObject};

/// Decodes the asset behind a locator.
///
/// The returned future must not borrow the decoder, so callers can keep it
/// alive independently (the cache shares one decode between several waiters).
pub trait AssetDecoder {
    fn decode(&self, locator: &str) -> LocalBoxFuture<'static, Result<SceneObject, DecodeError>>;
}

/// Model formats understood by [`FileDecoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Obj,
    Gltf,
}

impl AssetFormat {
    /// Format implied by the locator's file extension
    pub fn from_locator(locator: &str) -> Result<Self, DecodeError> {
        let extension = Path::new(locator)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "obj" => Ok(AssetFormat::Obj),
            "glb" | "gltf" => Ok(AssetFormat::Gltf),
            _ => Err(DecodeError::UnsupportedFormat {
                locator: locator.to_string(),
                extension,
            }),
        }
    }
}

/// Decodes model files below an asset root directory
#[derive(Debug, Clone)]
pub struct FileDecoder {
    root: PathBuf,
    registry: Arc<ResourceRegistry>,
}

impl FileDecoder {
    pub fn new(root: impl Into<PathBuf>, registry: Arc<ResourceRegistry>) -> Self {
        Self {
            root: root.into(),
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode on the calling thread
    pub fn decode_blocking(&self, locator: &str) -> Result<SceneObject, DecodeError> {
        decode_file(&self.root.join(locator), locator, &self.registry)
    }
}

impl AssetDecoder for FileDecoder {
    fn decode(&self, locator: &str) -> LocalBoxFuture<'static, Result<SceneObject, DecodeError>> {
        let locator = locator.to_string();
        let path = self.root.join(&locator);
        let registry = Arc::clone(&self.registry);
        let (tx, rx) = oneshot::channel();

        let worker_locator = locator.clone();
        let spawned = std::thread::Builder::new()
            .name("asset-decode".to_string())
            .spawn(move || {
                let result = decode_file(&path, &worker_locator, &registry);
                // Receiver gone means nobody is waiting any more
                let _ = tx.send(result);
            });

        if let Err(e) = spawned {
            return futures::future::ready(Err(DecodeError::Io {
                locator,
                message: format!("failed to start decode thread: {}", e),
            }))
            .boxed_local();
        }

        async move {
            match rx.await {
                Ok(result) => result,
                Err(oneshot::Canceled) => Err(DecodeError::Interrupted { locator }),
            }
        }
        .boxed_local()
    }
}

fn decode_file(
    path: &Path,
    locator: &str,
    registry: &Arc<ResourceRegistry>,
) -> Result<SceneObject, DecodeError> {
    let format = AssetFormat::from_locator(locator)?;

    if !path.exists() {
        return Err(DecodeError::Io {
            locator: locator.to_string(),
            message: format!("file not found: {}", path.display()),
        });
    }

    log::debug!("Decoding {:?} asset '{}'", format, locator);

    let object = match format {
        AssetFormat::Obj => obj::load_obj(path, locator, registry)?,
        AssetFormat::Gltf => gltf::load_gltf(path, locator, registry)?,
    };

    if object.mesh_count() == 0 {
        return Err(DecodeError::Empty {
            locator: locator.to_string(),
        });
    }

    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_locator() {
        assert_eq!(AssetFormat::from_locator("assets/LAMP.glb"), Ok(AssetFormat::Gltf));
        assert_eq!(AssetFormat::from_locator("chair.gltf"), Ok(AssetFormat::Gltf));
        assert_eq!(AssetFormat::from_locator("models/vase.OBJ"), Ok(AssetFormat::Obj));
        assert_eq!(
            AssetFormat::from_locator("notes.txt"),
            Err(DecodeError::UnsupportedFormat {
                locator: "notes.txt".to_string(),
                extension: "txt".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let registry = Arc::new(ResourceRegistry::new());
        let decoder = FileDecoder::new("/nonexistent/exhibit", registry);
        let result = futures::executor::block_on(decoder.decode("missing.obj"));
        assert!(matches!(result, Err(DecodeError::Io { .. })));
    }

    #[test]
    fn test_unsupported_format_does_not_touch_disk() {
        let registry = Arc::new(ResourceRegistry::new());
        let decoder = FileDecoder::new("/nonexistent/exhibit", registry);
        let result = decoder.decode_blocking("poster.png");
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat { .. })));
    }
}
