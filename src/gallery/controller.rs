//! Gallery controller: navigation state machine and display lifecycle.
//!
//! The controller is either `Idle` or `Loading`. A navigation request made
//! while `Idle` updates the navigation state synchronously, switches to
//! `Loading` and returns a [`Cycle`] future that resolves the selected asset,
//! places it, swaps it into the scene and disposes the object it replaces.
//! Requests made while `Loading` are dropped, not queued.
//!
//! All scene mutation happens synchronously after the single await on the
//! asset cache, so no other request can observe a half-applied swap.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use cgmath::{Vector3, Zero};
use futures::future::{FutureExt, LocalBoxFuture};

use super::dataset::{GalleryDataset, GalleryItem};
use super::navigation::{NavigationState, Position};
use crate::assets::AssetCache;
use crate::error::{DecodeError, GalleryError};
use crate::gfx::{
    bounds::Aabb,
    scene::{Renderer, SceneObject, SharedObject},
};

/// Height of the model center above the scene origin
pub const DEFAULT_VERTICAL_OFFSET: f32 = 1.1;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
}

/// How a load-and-display cycle ended
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The selected item is now the displayed object
    Displayed { mode: usize, index: usize },
    /// The item could not be resolved; nothing is displayed
    Cleared {
        mode: usize,
        index: usize,
        error: DecodeError,
    },
}

/// Result of a navigation request
pub enum Navigation<'a> {
    /// The request was accepted; drive the cycle to completion
    Started(Cycle<'a>),
    /// A cycle was already running, the request was ignored
    Dropped,
    /// The request would not change what is selected
    Unchanged,
}

impl<'a> Navigation<'a> {
    pub fn is_started(&self) -> bool {
        matches!(self, Navigation::Started(_))
    }

    /// Run the cycle if one was started
    pub async fn finish(self) -> Option<CycleOutcome> {
        match self {
            Navigation::Started(cycle) => Some(cycle.await),
            Navigation::Dropped | Navigation::Unchanged => None,
        }
    }
}

impl std::fmt::Debug for Navigation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Navigation::Started(_) => f.write_str("Started"),
            Navigation::Dropped => f.write_str("Dropped"),
            Navigation::Unchanged => f.write_str("Unchanged"),
        }
    }
}

/// A running load-and-display cycle.
///
/// Dropping it before completion returns the controller to `Idle` and leaves
/// the previously displayed object in place.
#[must_use = "a cycle does nothing unless awaited"]
pub struct Cycle<'a> {
    inner: LocalBoxFuture<'a, CycleOutcome>,
}

impl Future for Cycle<'_> {
    type Output = CycleOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

/// Metadata of the selected item, for text and link display
#[derive(Debug, Clone, Copy)]
pub struct CurrentItem<'a> {
    pub mode: &'a str,
    pub position: Position,
    pub item: &'a GalleryItem,
}

struct ControllerState {
    navigation: NavigationState,
    phase: Phase,
    displayed: Option<SharedObject>,
}

type LoadingListener = Box<dyn Fn(bool)>;

/// Owns the navigation state and the single displayed object
pub struct GalleryController<R: Renderer> {
    dataset: GalleryDataset,
    cache: Rc<AssetCache>,
    renderer: Rc<RefCell<R>>,
    vertical_offset: f32,
    state: RefCell<ControllerState>,
    listeners: RefCell<Vec<LoadingListener>>,
}

impl<R: Renderer> GalleryController<R> {
    /// Create a controller positioned at the first item of the first mode.
    ///
    /// Nothing is displayed until the first cycle runs, see
    /// [`GalleryController::show_current`].
    pub fn new(dataset: GalleryDataset, cache: Rc<AssetCache>, renderer: Rc<RefCell<R>>) -> Self {
        Self {
            dataset,
            cache,
            renderer,
            vertical_offset: DEFAULT_VERTICAL_OFFSET,
            state: RefCell::new(ControllerState {
                navigation: NavigationState::start(),
                phase: Phase::Idle,
                displayed: None,
            }),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Builder pattern: height of the model center above the origin
    pub fn with_vertical_offset(mut self, offset: f32) -> Self {
        self.vertical_offset = offset;
        self
    }

    /// Register a callback for loading indicator changes.
    ///
    /// Called with `true` when a cycle starts and `false` when it ends,
    /// whether it succeeded, failed or was dropped. Callbacks must not register
    /// further callbacks.
    pub fn on_loading_changed<F: Fn(bool) + 'static>(&self, listener: F) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    pub fn navigation(&self) -> NavigationState {
        self.state.borrow().navigation
    }

    pub fn dataset(&self) -> &GalleryDataset {
        &self.dataset
    }

    pub fn cache(&self) -> &Rc<AssetCache> {
        &self.cache
    }

    pub fn renderer(&self) -> &Rc<RefCell<R>> {
        &self.renderer
    }

    pub fn mode_names(&self) -> Vec<&str> {
        self.dataset.mode_names()
    }

    /// Selected item with its mode and position
    pub fn current(&self) -> Option<CurrentItem<'_>> {
        let navigation = self.navigation();
        let mode = self.dataset.mode(navigation.mode)?;
        Some(CurrentItem {
            mode: &mode.name,
            position: self.position(),
            item: mode.items.get(navigation.index)?,
        })
    }

    /// Position counter for the selected item
    pub fn position(&self) -> Position {
        let navigation = self.navigation();
        Position {
            index: navigation.index,
            total: self.dataset.len(navigation.mode),
        }
    }

    /// The object currently attached to the scene, if any
    pub fn displayed(&self) -> Option<SharedObject> {
        self.state.borrow().displayed.clone()
    }

    /// Load and display the selected item without moving
    pub fn show_current(&self) -> Navigation<'_> {
        self.navigate(|navigation, _| Some(navigation))
    }

    pub fn next(&self) -> Navigation<'_> {
        self.navigate(|navigation, dataset| Some(navigation.next(dataset)))
    }

    pub fn prev(&self) -> Navigation<'_> {
        self.navigate(|navigation, dataset| Some(navigation.prev(dataset)))
    }

    /// Switch to the first item of another mode.
    ///
    /// Unknown modes are rejected even while loading; switching to the mode
    /// already shown is `Unchanged`.
    pub fn set_mode(&self, name: &str) -> Result<Navigation<'_>, GalleryError> {
        let target = self.navigation().switch_mode(&self.dataset, name)?;
        Ok(self.navigate(|navigation, _| {
            (navigation.mode != target.mode).then_some(target)
        }))
    }

    /// Detach and dispose the displayed object. Ignored while loading.
    pub fn clear(&self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.replace_displayed(None)
    }

    fn navigate<F>(&self, select: F) -> Navigation<'_>
    where
        F: FnOnce(NavigationState, &GalleryDataset) -> Option<NavigationState>,
    {
        let current = {
            let state = self.state.borrow();
            if state.phase == Phase::Loading {
                log::debug!("Navigation request dropped, a cycle is already loading");
                return Navigation::Dropped;
            }
            state.navigation
        };

        let Some(target) = select(current, &self.dataset) else {
            return Navigation::Unchanged;
        };
        let Some(item) = self.dataset.item(target.mode, target.index) else {
            log::error!("Rejected navigation to missing item {:?}", target);
            return Navigation::Unchanged;
        };
        let locator = item.locator.clone();

        {
            let mut state = self.state.borrow_mut();
            state.navigation = target;
            state.phase = Phase::Loading;
        }
        self.notify(true);

        let guard = LoadingGuard {
            controller: self,
            previous: Some(current),
        };
        Navigation::Started(Cycle {
            inner: async move {
                let controller = guard.controller;
                let outcome = controller.load_and_display(target, &locator).await;
                guard.complete();
                outcome
            }
            .boxed_local(),
        })
    }

    async fn load_and_display(&self, target: NavigationState, locator: &str) -> CycleOutcome {
        let resolved = self.cache.resolve(locator).await;

        match resolved {
            Ok(mut object) => {
                let bounds = self.renderer.borrow().compute_bounds(&object);
                place_object(&mut object, bounds, self.vertical_offset);

                self.replace_displayed(Some(Rc::new(RefCell::new(object))));
                log::info!(
                    "Displaying '{}' ({} {})",
                    locator,
                    self.dataset.mode(target.mode).map_or("?", |m| m.name.as_str()),
                    Position {
                        index: target.index,
                        total: self.dataset.len(target.mode),
                    }
                );

                CycleOutcome::Displayed {
                    mode: target.mode,
                    index: target.index,
                }
            }
            Err(error) => {
                self.replace_displayed(None);
                CycleOutcome::Cleared {
                    mode: target.mode,
                    index: target.index,
                    error,
                }
            }
        }
    }

    /// Swap the displayed object; the previous one is detached and disposed
    /// before the replacement is attached. Returns whether anything was removed.
    fn replace_displayed(&self, replacement: Option<SharedObject>) -> bool {
        let previous = self.state.borrow_mut().displayed.take();
        let mut renderer = self.renderer.borrow_mut();

        let removed = previous.is_some();
        if let Some(previous) = previous {
            renderer.detach(&previous);
            previous.borrow_mut().dispose();
        }

        if let Some(object) = &replacement {
            renderer.attach(object);
        }
        self.state.borrow_mut().displayed = replacement;

        removed
    }

    fn notify(&self, loading: bool) {
        for listener in self.listeners.borrow().iter() {
            listener(loading);
        }
    }
}

impl<R: Renderer> Drop for GalleryController<R> {
    fn drop(&mut self) {
        if let Some(displayed) = self.state.get_mut().displayed.take() {
            self.renderer.borrow_mut().detach(&displayed);
            displayed.borrow_mut().dispose();
        }
    }
}

/// Returns the controller to `Idle` when a cycle ends or is dropped.
///
/// A cycle dropped before completing has not touched the display, so the
/// navigation state it replaced is restored to keep selection and display paired.
struct LoadingGuard<'a, R: Renderer> {
    controller: &'a GalleryController<R>,
    previous: Option<NavigationState>,
}

impl<R: Renderer> LoadingGuard<'_, R> {
    fn complete(mut self) {
        self.previous = None;
    }
}

impl<R: Renderer> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        {
            let mut state = self.controller.state.borrow_mut();
            if let Some(previous) = self.previous.take() {
                log::debug!("Cycle abandoned, restoring {:?}", previous);
                state.navigation = previous;
            }
            state.phase = Phase::Idle;
        }
        self.controller.notify(false);
    }
}

/// Center `object` on X and Z and lift its center to `vertical_offset`.
///
/// Objects without geometry only get the vertical offset.
pub fn place_object(object: &mut SceneObject, bounds: Option<Aabb>, vertical_offset: f32) {
    let center = bounds.map_or(Vector3::zero(), |b| b.center());
    object.translate_world(Vector3::new(-center.x, vertical_offset - center.y, -center.z));
}
