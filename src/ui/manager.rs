// src/ui/manager.rs
//! Panel registry
//!
//! Owns every resident panel keyed by its logical type, the stack of pending open
//! requests and the resource-path cache. Loading, the destroy sweep and the deferred
//! async-load hook are driven from coroutines (see [`super::tasks`]); everything in
//! here is synchronous and runs on the application's single logical thread.

use log::{debug, error, info, warn};
use std::any::TypeId;
use std::collections::HashMap;

use super::args::Args;
use super::event::ListenerTable;
use super::panel::{CommandQueue, Panel, PanelContext, PanelState, PanelType};
use super::paths::ResourcePaths;
use crate::audio::AudioPlayer;
use crate::config::FrameworkConfig;
use crate::error::{Error, Result};
use crate::gfx::resources::ResourceProvider;
use crate::gfx::scene::{Scene, SurfaceId};

/// Collaborators the registry works against
pub struct UiHost<'a> {
    pub scene: &'a mut Scene,
    pub resources: &'a dyn ResourceProvider,
    pub audio: &'a mut dyn AudioPlayer,
    pub commands: &'a CommandQueue,
    pub listeners: &'a mut ListenerTable,
}

impl UiHost<'_> {
    /// Hook context for the panel attached to `surface`
    pub fn panel_context(&mut self, surface: SurfaceId) -> PanelContext<'_> {
        PanelContext {
            surface,
            scene: &mut *self.scene,
            audio: &mut *self.audio,
            commands: self.commands,
            listeners: &mut *self.listeners,
        }
    }
}

/// A panel tracked by the registry
pub struct ResidentPanel {
    kind: PanelType,
    surface: SurfaceId,
    panel: Box<dyn Panel>,
}

impl ResidentPanel {
    pub fn kind(&self) -> PanelType {
        self.kind
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn panel(&self) -> &dyn Panel {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> &mut dyn Panel {
        self.panel.as_mut()
    }

    fn set_visible(&mut self, show: bool, host: &mut UiHost<'_>) {
        let mut ctx = host.panel_context(self.surface);
        self.panel.set_visible(show, &mut ctx);
    }
}

/// Queued request to instantiate a panel
#[derive(Debug, Clone)]
struct OpenRequest {
    kind: PanelType,
    path: String,
    params: Args,
}

/// Central panel registry
pub struct UiManager {
    resident: HashMap<TypeId, ResidentPanel>,
    pending: Vec<OpenRequest>,
    paths: ResourcePaths,
    container: Option<SurfaceId>,
    root_ui_path: String,
    root_ui_tag: String,
    container_name: String,
    default_destroy_delay: f32,
    default_tween_duration: f32,
}

impl Default for UiManager {
    fn default() -> Self {
        Self::new(&FrameworkConfig::default())
    }
}

impl UiManager {
    pub fn new(config: &FrameworkConfig) -> Self {
        Self {
            resident: HashMap::new(),
            pending: Vec::new(),
            paths: ResourcePaths::new(config.ui_prefab_prefix.clone()),
            container: None,
            root_ui_path: config.root_ui_path.clone(),
            root_ui_tag: config.root_ui_tag.clone(),
            container_name: config.container_name.clone(),
            default_destroy_delay: config.default_destroy_delay,
            default_tween_duration: config.default_tween_duration,
        }
    }

    /// Resident entry whose surface is still alive
    fn live_entry(&mut self, kind: &PanelType, scene: &Scene) -> Option<&mut ResidentPanel> {
        self.resident
            .get_mut(&kind.id())
            .filter(|entry| scene.is_alive(entry.surface))
    }

    /// Opens panels, showing resident ones and queueing the rest
    ///
    /// # Arguments
    /// * `kinds` - Panel types to open
    /// * `close_others` - Batch-close every other resident panel first
    /// * `params` - Open-time parameters for panels that get instantiated
    /// * `host` - Scene and collaborators
    ///
    /// # Returns
    /// `true` if requests were queued and a load pass should run
    pub fn open_panels(
        &mut self,
        kinds: &[PanelType],
        close_others: bool,
        params: Args,
        host: &mut UiHost<'_>,
    ) -> bool {
        if close_others {
            self.close_others(host);
        }
        for kind in kinds {
            if let Some(entry) = self.live_entry(kind, host.scene) {
                entry.set_visible(true, host);
                continue;
            }
            if self.resident.remove(&kind.id()).is_some() {
                debug!("pruned stale {} entry before reload", kind.name());
            }
            let path = self.paths.resolve(kind).to_string();
            self.pending.push(OpenRequest {
                kind: *kind,
                path,
                params: params.clone(),
            });
        }
        !self.pending.is_empty()
    }

    /// Drains the pending stack, most recent request first
    ///
    /// A missing resource stops the pass; requests below it stay queued.
    ///
    /// # Returns
    /// Panels instantiated during this pass, in load order
    pub fn load_pending_pass(
        &mut self,
        host: &mut UiHost<'_>,
    ) -> Result<Vec<(PanelType, SurfaceId)>> {
        let mut loaded = Vec::new();
        if self.pending.is_empty() {
            return Ok(loaded);
        }
        let container = self.ui_container(host.scene, host.resources);

        while let Some(request) = self.pending.pop() {
            if let Some(entry) = self.live_entry(&request.kind, host.scene) {
                entry.set_visible(true, host);
                continue;
            }
            let Some(template) = host.resources.load(&request.path) else {
                error!("panel resource not found: {}", request.path);
                return Err(Error::ResourceNotFound { path: request.path });
            };

            let surface = host.scene.instantiate(&template, Some(container));
            let mut panel = self.attach_behaviour(&request.kind, template.behaviour, surface, host);
            panel.set_params(&request.params);
            {
                let mut ctx = host.panel_context(surface);
                panel.set_visible(true, &mut ctx);
            }
            self.resident.insert(
                request.kind.id(),
                ResidentPanel {
                    kind: request.kind,
                    surface,
                    panel,
                },
            );
            debug!("loaded {} from {}", request.kind.name(), request.path);
            loaded.push((request.kind, surface));
        }
        Ok(loaded)
    }

    /// Attaches the template's behaviour, or the requested one when it is absent or stale
    fn attach_behaviour(
        &self,
        requested: &PanelType,
        attached: Option<PanelType>,
        surface: SurfaceId,
        host: &mut UiHost<'_>,
    ) -> Box<dyn Panel> {
        let surface_name = host.scene.name(surface).unwrap_or_default().to_string();
        let kind = match attached {
            Some(attached) if attached == *requested && attached.name() == surface_name => attached,
            Some(attached) => {
                warn!(
                    "surface {surface_name} carries {} but {} was requested, re-attaching",
                    attached.name(),
                    requested.name()
                );
                *requested
            }
            None => *requested,
        };

        let mut panel = kind.construct();
        panel.core_mut().bind(surface);
        panel
            .core_mut()
            .apply_defaults(self.default_destroy_delay, self.default_tween_duration);
        let mut ctx = host.panel_context(surface);
        panel.awake(&mut ctx);
        panel
    }

    /// Shows a resident panel
    ///
    /// # Returns
    /// `false` if the type is not resident
    pub fn show_panel(&mut self, kind: &PanelType, host: &mut UiHost<'_>) -> bool {
        match self.live_entry(kind, host.scene) {
            Some(entry) => {
                entry.set_visible(true, host);
                true
            }
            None => false,
        }
    }

    /// Tracks and shows a panel created outside the registry
    ///
    /// # Returns
    /// [`Error::AlreadyResident`] if a live instance of the type exists. The incoming
    /// panel is dropped without being shown and `surface` is left to the caller.
    /// [`Error::UnknownSurface`] if `surface` is not alive.
    pub fn register_panel(
        &mut self,
        kind: PanelType,
        surface: SurfaceId,
        mut panel: Box<dyn Panel>,
        host: &mut UiHost<'_>,
    ) -> Result<()> {
        if !host.scene.is_alive(surface) {
            return Err(Error::UnknownSurface(surface));
        }
        if self.live_entry(&kind, host.scene).is_some() {
            warn!("{} already resident, refusing a second instance", kind.name());
            return Err(Error::AlreadyResident { panel: kind.name() });
        }
        if self.resident.remove(&kind.id()).is_some() {
            debug!("pruned stale {} entry before registering", kind.name());
        }

        panel.core_mut().bind(surface);
        panel
            .core_mut()
            .apply_defaults(self.default_destroy_delay, self.default_tween_duration);
        {
            let mut ctx = host.panel_context(surface);
            panel.set_visible(true, &mut ctx);
        }
        self.resident.insert(
            kind.id(),
            ResidentPanel {
                kind,
                surface,
                panel,
            },
        );
        Ok(())
    }

    /// Hides a panel, honouring its hide guard
    pub fn hide_panel(&mut self, kind: &PanelType, host: &mut UiHost<'_>) {
        self.close_panel(kind, false, host);
    }

    /// Hides several panels
    pub fn close_panels(&mut self, kinds: &[PanelType], host: &mut UiHost<'_>) {
        for kind in kinds {
            self.close_panel(kind, false, host);
        }
    }

    /// Hides a panel unless it is guarded; prunes the entry if it is stale
    ///
    /// # Arguments
    /// * `kind` - Panel type to close
    /// * `batch` - Part of a batch close, so `ignore_batch_close` panels are skipped
    /// * `host` - Scene and collaborators
    pub fn close_panel(&mut self, kind: &PanelType, batch: bool, host: &mut UiHost<'_>) {
        let Some(entry) = self.live_entry(kind, host.scene) else {
            if self.resident.remove(&kind.id()).is_some() {
                debug!("pruned stale {} entry", kind.name());
            }
            return;
        };
        let core = entry.panel.core();
        if core.ignore_hide_guard || (batch && core.ignore_batch_close) {
            return;
        }
        if entry.panel.is_visible(host.scene) {
            entry.set_visible(false, host);
        }
    }

    /// Batch-closes every resident panel
    pub fn close_others(&mut self, host: &mut UiHost<'_>) {
        let kinds: Vec<PanelType> = self.resident.values().map(|entry| entry.kind).collect();
        for kind in &kinds {
            self.close_panel(kind, true, host);
        }
    }

    /// Drops the entry and destroys its surface, ignoring every guard
    ///
    /// # Returns
    /// `false` if the type was not resident
    pub fn destroy_panel(&mut self, kind: &PanelType, scene: &mut Scene) -> bool {
        match self.resident.remove(&kind.id()) {
            Some(entry) => {
                scene.destroy(entry.surface);
                true
            }
            None => false,
        }
    }

    /// One pass of the deferred-destroy sweep
    ///
    /// Stale entries are pruned; every other panel is aged by `interval` and the
    /// ones that run out of time are destroyed once the pass is over.
    ///
    /// # Returns
    /// Panel types destroyed by this pass
    pub fn check_destroy_panels(&mut self, interval: f32, scene: &mut Scene) -> Vec<PanelType> {
        let mut stale = Vec::new();
        let mut expired = Vec::new();
        for (id, entry) in self.resident.iter_mut() {
            if !scene.is_alive(entry.surface) {
                stale.push(*id);
                continue;
            }
            if entry.panel.core_mut().reduce_destroy_timer(interval, scene) <= 0.0 {
                expired.push(entry.kind);
            }
        }

        for id in stale {
            if let Some(entry) = self.resident.remove(&id) {
                debug!("pruned stale {} entry", entry.kind.name());
            }
        }
        for kind in &expired {
            debug!("destroying {} after its hide delay", kind.name());
            self.destroy_panel(kind, scene);
        }
        expired
    }

    /// Steps every panel animation and fires completion hooks
    pub fn update(&mut self, delta_time: f32, host: &mut UiHost<'_>) {
        for entry in self.resident.values_mut() {
            if !host.scene.is_alive(entry.surface) {
                continue;
            }
            if let Some(show) = entry.panel.core_mut().advance_tweens(delta_time, host.scene) {
                let mut ctx = host.panel_context(entry.surface);
                entry.panel.on_transition_complete(show, &mut ctx);
            }
        }
    }

    /// Runs the async-load hook of a freshly loaded panel
    ///
    /// Skipped when the panel is gone, was replaced, or is no longer active.
    pub fn run_async_load(
        &mut self,
        kind: &PanelType,
        surface: SurfaceId,
        host: &mut UiHost<'_>,
    ) -> bool {
        let Some(entry) = self.live_entry(kind, host.scene) else {
            return false;
        };
        if entry.surface != surface || !host.scene.is_active(surface) {
            return false;
        }
        let mut ctx = host.panel_context(surface);
        entry.panel.on_async_load(&mut ctx);
        true
    }

    /// Container every panel is parented under, resolved on first use
    ///
    /// Looks for the surface tagged as the UI root, instantiating the root template
    /// (or a bare root when it is missing) if there is none, then finds or creates
    /// its container child.
    pub fn ui_container(
        &mut self,
        scene: &mut Scene,
        resources: &dyn ResourceProvider,
    ) -> SurfaceId {
        if let Some(container) = self.container.filter(|c| scene.is_alive(*c)) {
            return container;
        }

        let root = match scene.find_by_tag(&self.root_ui_tag) {
            Some(root) => root,
            None => {
                let root = match resources.load(&self.root_ui_path) {
                    Some(template) => scene.instantiate(&template, None),
                    None => {
                        warn!("{} not found, creating a bare UI root", self.root_ui_path);
                        scene.spawn(self.root_ui_tag.clone(), None)
                    }
                };
                if let Some(surface) = scene.get_mut(root) {
                    surface.name = self.root_ui_tag.clone();
                }
                scene.set_tag(root, self.root_ui_tag.clone());
                info!("created UI root {}", self.root_ui_tag);
                root
            }
        };

        let container = match scene.find_child(root, &self.container_name) {
            Some(container) => container,
            None => scene.spawn(self.container_name.clone(), Some(root)),
        };
        self.container = Some(container);
        container
    }

    /// Container resolved by [`UiManager::ui_container`], if it is still alive
    pub fn container(&self, scene: &Scene) -> Result<SurfaceId> {
        self.container
            .filter(|c| scene.is_alive(*c))
            .ok_or(Error::ContainerMissing)
    }

    pub fn is_resident(&self, kind: &PanelType, scene: &Scene) -> bool {
        self.resident
            .get(&kind.id())
            .is_some_and(|entry| scene.is_alive(entry.surface))
    }

    pub fn is_visible(&self, kind: &PanelType, scene: &Scene) -> bool {
        self.resident
            .get(&kind.id())
            .is_some_and(|entry| entry.panel.is_visible(scene))
    }

    pub fn panel_state(&self, kind: &PanelType, scene: &Scene) -> Option<PanelState> {
        self.resident
            .get(&kind.id())
            .map(|entry| entry.panel.core().state(scene))
    }

    /// Every tracked type, including entries whose surface died since
    pub fn resident_kinds(&self) -> Vec<PanelType> {
        self.resident.values().map(|entry| entry.kind).collect()
    }

    pub fn resident(&self, kind: &PanelType) -> Option<&ResidentPanel> {
        self.resident.get(&kind.id())
    }

    pub fn surface_of(&self, kind: &PanelType) -> Option<SurfaceId> {
        self.resident.get(&kind.id()).map(|entry| entry.surface)
    }

    /// Typed access to a resident panel
    pub fn panel<T: Panel>(&self) -> Option<&T> {
        self.resident
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.panel.downcast_ref::<T>())
    }

    pub fn panel_mut<T: Panel>(&mut self) -> Option<&mut T> {
        self.resident
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.panel.downcast_mut::<T>())
    }

    /// Number of queued open requests
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn paths(&self) -> &ResourcePaths {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut ResourcePaths {
        &mut self.paths
    }

    /// Resource path of `kind`, resolved through the cache
    pub fn resource_path(&mut self, kind: &PanelType) -> &str {
        self.paths.resolve(kind)
    }
}
