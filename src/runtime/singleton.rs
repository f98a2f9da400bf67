//! Construct-once registries
//!
//! Managers are plain values owned by the application context rather than globals,
//! but each manager type may still only exist once per logical thread. Two holders
//! enforce that:
//!
//! - [`Lazy`] constructs its value on first access and keeps it for the rest of the
//!   context's life.
//! - [`Persistent`] additionally binds its value to a persistent root surface that
//!   survives scene transitions, and is reset by [`Persistent::shutdown`].
//!
//! Both take an [`InstanceGuard`] before constructing. A second live instance of the
//! same type is a programming error and surfaces as [`Error::SingletonReentry`].

use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::gfx::scene::{Scene, SurfaceId};

thread_local! {
    static LIVE_INSTANCES: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

/// Proof that the current thread holds the only live instance of `T`
///
/// Released on drop.
pub struct InstanceGuard<T: 'static> {
    // Not Send: the registry is thread-local.
    _marker: PhantomData<(fn() -> T, *const ())>,
}

impl<T: 'static> InstanceGuard<T> {
    /// Claims the instance slot for `T`
    pub fn acquire() -> Result<Self> {
        let claimed = LIVE_INSTANCES.with(|live| live.borrow_mut().insert(TypeId::of::<T>()));
        if claimed {
            Ok(Self {
                _marker: PhantomData,
            })
        } else {
            Err(Error::SingletonReentry {
                type_name: type_name::<T>(),
            })
        }
    }

    /// Whether some guard for `T` is currently held on this thread
    pub fn is_held() -> bool {
        LIVE_INSTANCES.with(|live| live.borrow().contains(&TypeId::of::<T>()))
    }
}

impl<T: 'static> Drop for InstanceGuard<T> {
    fn drop(&mut self) {
        LIVE_INSTANCES.with(|live| {
            live.borrow_mut().remove(&TypeId::of::<T>());
        });
    }
}

/// Plain lazily constructed singleton
pub struct Lazy<T: 'static> {
    // Value is dropped before its guard.
    slot: Option<(T, InstanceGuard<T>)>,
}

impl<T: 'static> Default for Lazy<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T: 'static> Lazy<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the instance, constructing it with `init` on first access
    pub fn get_or_try_init(&mut self, init: impl FnOnce() -> T) -> Result<&mut T> {
        let slot = match self.slot.take() {
            Some(existing) => self.slot.insert(existing),
            None => {
                let guard = InstanceGuard::acquire()?;
                self.slot.insert((init(), guard))
            }
        };
        Ok(&mut slot.0)
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref().map(|(value, _)| value)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.slot.as_mut().map(|(value, _)| value)
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.is_some()
    }
}

/// Singleton bound to a persistent root surface
///
/// The root is looked up by name (or created) on first access and marked
/// persistent so that scene transitions leave it alone.
pub struct Persistent<T: 'static> {
    root_name: String,
    root: Option<SurfaceId>,
    slot: Option<(T, InstanceGuard<T>)>,
}

impl<T: 'static> Persistent<T> {
    /// # Arguments
    /// * `root_name` - Name of the persistent surface hosting the instance
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            root: None,
            slot: None,
        }
    }

    /// Returns the instance, constructing it and its root on first access
    ///
    /// # Arguments
    /// * `scene` - Scene holding (or receiving) the persistent root
    /// * `init` - Constructor, given the root surface id
    pub fn get_or_try_init(
        &mut self,
        scene: &mut Scene,
        init: impl FnOnce(SurfaceId) -> T,
    ) -> Result<&mut T> {
        let slot = match self.slot.take() {
            Some(existing) => self.slot.insert(existing),
            None => {
                let guard = InstanceGuard::acquire()?;
                let root = match scene.find_by_name(&self.root_name) {
                    Some(root) => root,
                    None => scene.spawn(self.root_name.clone(), None),
                };
                scene.mark_persistent(root);
                self.root = Some(root);
                self.slot.insert((init(root), guard))
            }
        };
        Ok(&mut slot.0)
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref().map(|(value, _)| value)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.slot.as_mut().map(|(value, _)| value)
    }

    /// Root surface the instance is bound to, once initialized
    pub fn root(&self) -> Option<SurfaceId> {
        self.root
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.is_some()
    }

    /// Resets to uninitialized, returning the previous instance
    ///
    /// The next access constructs a fresh instance.
    pub fn shutdown(&mut self) -> Option<T> {
        self.root = None;
        self.slot.take().map(|(value, _guard)| value)
    }
}
