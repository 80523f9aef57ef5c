use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::assets::{AssetCache, FileDecoder};
use crate::config::ExhibitConfig;
use crate::error::{ConfigError, GalleryError};
use crate::gallery::{CycleOutcome, GalleryController, Navigation};
use crate::gfx::{
    resources::{ResourceMetrics, ResourceRegistry},
    scene::{Scene, SceneStatistics},
};

/// A gallery wired to files on disk and an in-memory scene
pub struct ExhibitApp {
    registry: Arc<ResourceRegistry>,
    scene: Rc<RefCell<Scene>>,
    controller: GalleryController<Scene>,
}

/// A command from the text front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    Mode(String),
    Info,
    Stats,
    Quit,
}

impl Command {
    /// Parse one input line, `None` for blank or unknown input
    pub fn parse(line: &str) -> Option<Command> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "mode" | "m" => Command::Mode(words.next()?.to_string()),
            "info" | "i" => Command::Info,
            "stats" | "s" => Command::Stats,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

impl ExhibitApp {
    /// Create the app from a parsed configuration
    pub fn new(config: &ExhibitConfig) -> Result<Self, ConfigError> {
        let dataset = config.dataset()?;
        let registry = Arc::new(ResourceRegistry::new());
        let decoder = Rc::new(FileDecoder::new(
            config.asset_root.clone(),
            Arc::clone(&registry),
        ));
        let cache = Rc::new(AssetCache::new(decoder));
        let scene = Rc::new(RefCell::new(Scene::new()));

        let controller = GalleryController::new(dataset, cache, Rc::clone(&scene))
            .with_vertical_offset(config.vertical_offset);
        controller.on_loading_changed(|loading| {
            log::debug!("Loading indicator {}", if loading { "on" } else { "off" });
        });

        Ok(Self {
            registry,
            scene,
            controller,
        })
    }

    pub fn controller(&self) -> &GalleryController<Scene> {
        &self.controller
    }

    /// Display the initial item, blocking until it is loaded
    pub fn start(&self) -> Option<CycleOutcome> {
        pollster::block_on(self.controller.show_current().finish())
    }

    /// Run one command to completion. Returns `Ok(false)` when the app should stop.
    pub fn execute(&self, command: &Command) -> Result<bool, GalleryError> {
        let navigation: Navigation<'_> = match command {
            Command::Next => self.controller.next(),
            Command::Prev => self.controller.prev(),
            Command::Mode(name) => self.controller.set_mode(name)?,
            Command::Info => {
                println!("{}", self.describe());
                return Ok(true);
            }
            Command::Stats => {
                println!("{}", self.stats_line());
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        };

        match pollster::block_on(navigation.finish()) {
            Some(CycleOutcome::Cleared { error, .. }) => {
                println!("{} (nothing displayed: {})", self.describe(), error)
            }
            Some(CycleOutcome::Displayed { .. }) | None => println!("{}", self.describe()),
        }
        Ok(true)
    }

    /// One-line description of the selected item
    pub fn describe(&self) -> String {
        match self.controller.current() {
            Some(current) => format!(
                "[{} {}] {} by {}",
                current.mode,
                current.position,
                current.item.locator,
                current.item.author.resolve(|_| None),
            ),
            None => "no item selected".to_string(),
        }
    }

    pub fn scene_statistics(&self) -> SceneStatistics {
        self.scene.borrow().get_statistics()
    }

    pub fn resource_metrics(&self) -> ResourceMetrics {
        self.registry.metrics()
    }

    fn stats_line(&self) -> String {
        let scene = self.scene_statistics();
        let resources = self.resource_metrics();
        let cache = self.controller.cache().stats();
        format!(
            "scene: {} objects, {} triangles | resources: {} live, {} bytes | cache: {} hits, {} misses, {} decodes, {} failures",
            scene.object_count,
            scene.total_triangles,
            resources.total_count(),
            resources.total_bytes(),
            cache.hits,
            cache.misses,
            cache.decodes,
            cache.failures,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    const TRIANGLE_OBJ: &str = "o Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("next"), Some(Command::Next));
        assert_eq!(Command::parse("  p "), Some(Command::Prev));
        assert_eq!(Command::parse("mode team"), Some(Command::Mode("team".to_string())));
        assert_eq!(Command::parse("mode"), None);
        assert_eq!(Command::parse("dance"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_app_runs_against_files() {
        let dir = scratch_dir("app");
        std::fs::write(dir.join("a.obj"), TRIANGLE_OBJ).unwrap();
        std::fs::write(dir.join("b.obj"), TRIANGLE_OBJ).unwrap();

        let config = ExhibitConfig::from_json(
            r#"{ "modes": [
                { "name": "solo", "items": [ { "locator": "a.obj", "author": "Ada" }, { "locator": "b.obj" } ] },
                { "name": "team", "items": [ { "locator": "missing.obj" } ] }
            ] }"#,
        )
        .unwrap();
        let config = ExhibitConfig {
            asset_root: dir,
            ..config
        };

        let app = ExhibitApp::new(&config).unwrap();
        assert_eq!(app.start(), Some(CycleOutcome::Displayed { mode: 0, index: 0 }));
        assert_eq!(app.describe(), "[solo 1-2] a.obj by Ada");
        assert_eq!(app.scene_statistics().object_count, 1);

        assert!(app.execute(&Command::Next).unwrap());
        assert!(app.execute(&Command::Next).unwrap());
        // Two cached templates plus the displayed clone, one mesh each
        assert_eq!(app.resource_metrics().total_count(), 6);

        assert!(app.execute(&Command::Mode("team".to_string())).unwrap());
        assert_eq!(app.scene_statistics().object_count, 0);
        assert_eq!(app.resource_metrics().total_count(), 4);

        assert!(app.execute(&Command::Mode("gallery".to_string())).is_err());
        assert!(!app.execute(&Command::Quit).unwrap());
    }
}
