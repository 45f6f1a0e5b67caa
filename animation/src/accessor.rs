use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use log::warn;
use parking_lot::Mutex;

/// A target shared between the application and the animations writing to it.
pub type Shared<T> = Arc<Mutex<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// Reads and writes the animated float channels of targets of type `T`.
///
/// `tag` selects which group of channels is meant, for example position or color. What tags mean
/// is defined by the accessor.
pub trait Accessor<T: ?Sized>: Send + Sync {
    /// Write the current channel values into `out` and return how many were written.
    fn get(&self, target: &T, tag: u32, out: &mut [f32]) -> usize;
    fn set(&self, target: &mut T, tag: u32, values: &[f32]);
}

/// Targets that know how to read and write their own channels.
pub trait Tweenable {
    fn get_values(&self, tag: u32, out: &mut [f32]) -> usize;
    fn set_values(&mut self, tag: u32, values: &[f32]);
}

/// Forwards to the [`Tweenable`] implementation of the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelfAccessor;

impl<T: Tweenable> Accessor<T> for SelfAccessor {
    fn get(&self, target: &T, tag: u32, out: &mut [f32]) -> usize {
        target.get_values(tag, out)
    }

    fn set(&self, target: &mut T, tag: u32, values: &[f32]) {
        target.set_values(tag, values)
    }
}

/// Accesses `T` through the accessor of a declared parent type `P` that `T` contains.
struct ParentAccessor<T, P: ?Sized> {
    parent: Arc<dyn Accessor<P>>,
    as_parent: fn(&T) -> &P,
    as_parent_mut: fn(&mut T) -> &mut P,
}

impl<T, P: ?Sized> Accessor<T> for ParentAccessor<T, P> {
    fn get(&self, target: &T, tag: u32, out: &mut [f32]) -> usize {
        self.parent.get((self.as_parent)(target), tag, out)
    }

    fn set(&self, target: &mut T, tag: u32, values: &[f32]) {
        self.parent.set((self.as_parent_mut)(target), tag, values)
    }
}

type ParentResolver<T> =
    Box<dyn Fn(&AccessorRegistry, usize) -> Option<Arc<dyn Accessor<T>>> + Send + Sync>;

/// Parent chains are declared explicitly and can not form cycles through the type system, but
/// registrations can. Resolution gives up after this many steps.
const MAX_PARENT_DEPTH: usize = 32;

/// Accessors by target type.
///
/// Filled during setup and shared read only afterwards, see [`crate::AnimationSession`].
#[derive(Default)]
pub struct AccessorRegistry {
    /// `TypeId::of::<T>()` -> `Arc<dyn Accessor<T>>`
    accessors: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    /// `TypeId::of::<T>()` -> `ParentResolver<T>`
    parents: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for AccessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessorRegistry")
            .field("accessors", &self.accessors.len())
            .field("parents", &self.parents.len())
            .finish()
    }
}

impl AccessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the accessor for targets of exactly type `T`. Replaces a previous registration.
    pub fn register<T: 'static>(&mut self, accessor: impl Accessor<T> + 'static) {
        let accessor: Arc<dyn Accessor<T>> = Arc::new(accessor);
        self.accessors.insert(TypeId::of::<T>(), Box::new(accessor));
    }

    /// Register the [`Tweenable`] implementation of `T` as its accessor.
    pub fn register_self<T: Tweenable + 'static>(&mut self) {
        self.register::<T>(SelfAccessor);
    }

    /// Declare `P` as the parent type of `T`.
    ///
    /// When no accessor is registered for `T`, resolution continues with `P`, then with `P`'s
    /// declared parent and so on.
    pub fn register_parent<T: 'static, P: 'static>(
        &mut self,
        as_parent: fn(&T) -> &P,
        as_parent_mut: fn(&mut T) -> &mut P,
    ) {
        let resolver: ParentResolver<T> = Box::new(move |registry, depth| {
            let parent = registry.resolve_registered::<P>(depth + 1)?;
            let accessor: Arc<dyn Accessor<T>> = Arc::new(ParentAccessor {
                parent,
                as_parent,
                as_parent_mut,
            });
            Some(accessor)
        });
        self.parents.insert(TypeId::of::<T>(), Box::new(resolver));
    }

    /// The accessor registered for exactly `T`.
    pub fn lookup<T: 'static>(&self) -> Option<Arc<dyn Accessor<T>>> {
        self.accessors
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn Accessor<T>>>())
            .cloned()
    }

    /// Resolve the accessor for `T`.
    ///
    /// Order: the exact registration for `T`, then `own` (the target's own capability), then
    /// the declared parent chain.
    pub fn resolve<T: 'static>(
        &self,
        own: Option<&Arc<dyn Accessor<T>>>,
    ) -> Option<Arc<dyn Accessor<T>>> {
        if let Some(accessor) = self.lookup::<T>() {
            return Some(accessor);
        }
        if let Some(own) = own {
            return Some(own.clone());
        }
        self.resolve_parent::<T>(0)
    }

    fn resolve_registered<T: 'static>(&self, depth: usize) -> Option<Arc<dyn Accessor<T>>> {
        self.lookup::<T>().or_else(|| self.resolve_parent::<T>(depth))
    }

    fn resolve_parent<T: 'static>(&self, depth: usize) -> Option<Arc<dyn Accessor<T>>> {
        if depth > MAX_PARENT_DEPTH {
            warn!(
                "Parent chain of `{}` exceeds {MAX_PARENT_DEPTH} steps, giving up",
                std::any::type_name::<T>()
            );
            return None;
        }
        let resolver = self
            .parents
            .get(&TypeId::of::<T>())?
            .downcast_ref::<ParentResolver<T>>()?;
        resolver(self, depth)
    }
}
