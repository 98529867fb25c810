//=========================================================================
// Native Object Pool
//=========================================================================
//
// Pool specialization for host-engine objects (sprites, prefabs, nodes).
//
// Entries are copies of a template object. A pooled entry is inactive
// while idle and active while checked out. Destroying an entry releases
// the underlying engine resource through `NativeObject::destroy`.
//
// A custom creation closure may replace template copying; the template
// is still kept for inspection and factory keying.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{Hook, ObjectPool, PoolConfig, PoolHooks, PoolPolicy};

//=== Native Object Trait =================================================

/// Capability of an engine object that can be pooled by template copy.
///
/// # Minimal Implementation
///
/// ```rust
/// # use tickwork::prelude::*;
/// #[derive(PartialEq)]
/// struct Bullet { active: bool }
///
/// impl NativeObject for Bullet {
///     fn instantiate(&self) -> Self {
///         Bullet { active: self.active }
///     }
///
///     fn set_active(&mut self, active: bool) {
///         self.active = active;
///     }
/// }
///
/// let mut pool = NativeObjectPool::from_template(Bullet { active: true });
/// let bullet = pool.get();
/// assert!(bullet.active);
/// pool.release(bullet).unwrap();
/// ```
pub trait NativeObject: Sized {
    /// Creates a new engine object copied from `self`.
    fn instantiate(&self) -> Self;

    /// Toggles the object's active/visible flag.
    fn set_active(&mut self, active: bool);

    /// Releases the underlying engine resource.
    ///
    /// Default implementation just drops the object.
    fn destroy(self) {}

    /// Whether the object still refers to a live engine resource.
    ///
    /// Factories refuse templates that are no longer alive and ignore
    /// disposal of dead objects.
    fn is_alive(&self) -> bool {
        true
    }
}

//=== Template Policy =====================================================

/// Policy creating entries by copying a template [`NativeObject`].
pub struct TemplatePolicy<T> {
    template: T,
    custom_create: Option<Box<dyn FnMut() -> T>>,
    hooks: PoolHooks<T>,
}

impl<T> TemplatePolicy<T> {
    /// Template the pool copies from.
    pub fn template(&self) -> &T {
        &self.template
    }

    /// Whether entries come from an injected creation closure.
    pub fn uses_custom_create(&self) -> bool {
        self.custom_create.is_some()
    }
}

impl<T: NativeObject> PoolPolicy<T> for TemplatePolicy<T> {
    fn create(&mut self) -> T {
        if let Some(create) = self.custom_create.as_mut() {
            return create();
        }

        let mut element = self.template.instantiate();
        element.set_active(false);
        element
    }

    fn on_taken(&mut self, element: &mut T) {
        element.set_active(true);
        self.hooks.taken(element);
    }

    fn on_returned(&mut self, element: &mut T) {
        element.set_active(false);
        self.hooks.returned(element);
    }

    fn on_destroyed(&mut self, mut element: T) {
        self.hooks.destroyed(&mut element);
        element.destroy();
    }
}

//=== Native Object Pool ==================================================

/// Pool of engine objects copied from a template.
pub type NativeObjectPool<T> = ObjectPool<T, TemplatePolicy<T>>;

impl<T: NativeObject + 'static> ObjectPool<T, TemplatePolicy<T>> {
    /// Creates an unbounded pool copying `template`, without extra hooks.
    pub fn from_template(template: T) -> Self {
        NativePoolBuilder::new(template).build()
    }

    /// Starts a [`NativePoolBuilder`] around `template`.
    pub fn native_builder(template: T) -> NativePoolBuilder<T> {
        NativePoolBuilder::new(template)
    }

    /// Template the pool copies from.
    pub fn template(&self) -> &T {
        self.policy().template()
    }
}

//=== Native Pool Builder =================================================

/// Fluent builder for [`NativeObjectPool`].
///
/// # Default Values
///
/// - **creation**: template copy
/// - **collection check**: off
/// - **max size**: unbounded
/// - **initial capacity**: 10
pub struct NativePoolBuilder<T> {
    template: T,
    custom_create: Option<Box<dyn FnMut() -> T>>,
    hooks: PoolHooks<T>,
    config: PoolConfig,
    capacity: usize,
}

impl<T: NativeObject + 'static> NativePoolBuilder<T> {
    /// Creates a builder copying `template`.
    pub fn new(template: T) -> Self {
        Self {
            template,
            custom_create: None,
            hooks: PoolHooks::new(),
            config: PoolConfig::default(),
            capacity: 10,
        }
    }

    /// Replaces template copying with a custom creation function.
    pub fn with_create<F>(mut self, create: F) -> Self
    where
        F: FnMut() -> T + 'static,
    {
        self.custom_create = Some(Box::new(create));
        self
    }

    /// Called after the entry is activated on take.
    pub fn on_take<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut T) + 'static,
    {
        self.hooks.set_on_take(Box::new(hook) as Hook<T>);
        self
    }

    /// Called after the entry is deactivated on return.
    pub fn on_return<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut T) + 'static,
    {
        self.hooks.set_on_return(Box::new(hook) as Hook<T>);
        self
    }

    /// Called right before the entry's engine resource is destroyed.
    pub fn on_destroy<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut T) + 'static,
    {
        self.hooks.set_on_destroy(Box::new(hook) as Hook<T>);
        self
    }

    /// Enables or disables the duplicate-release check.
    pub fn with_collection_check(mut self, enabled: bool) -> Self {
        self.config.collection_check = enabled;
        self
    }

    /// Bounds the number of idle entries.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.config.max_size = Some(max_size);
        self
    }

    /// Preallocates room for `capacity` idle entries.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds the pool.
    pub fn build(self) -> NativeObjectPool<T> {
        let policy = TemplatePolicy {
            template: self.template,
            custom_create: self.custom_create,
            hooks: self.hooks,
        };
        ObjectPool::with_policy_and_capacity(policy, self.config, self.capacity)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    //--- Mock Engine Object -----------------------------------------------

    // Tracks live engine resources through a shared counter.
    struct Sprite {
        id: u32,
        active: bool,
        live: Rc<Cell<i32>>,
        next_id: Rc<Cell<u32>>,
    }

    impl Sprite {
        fn template() -> Self {
            Sprite {
                id: 0,
                active: true,
                live: Rc::new(Cell::new(0)),
                next_id: Rc::new(Cell::new(1)),
            }
        }
    }

    impl PartialEq for Sprite {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    impl NativeObject for Sprite {
        fn instantiate(&self) -> Self {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            self.live.set(self.live.get() + 1);
            Sprite {
                id,
                active: self.active,
                live: Rc::clone(&self.live),
                next_id: Rc::clone(&self.next_id),
            }
        }

        fn set_active(&mut self, active: bool) {
            self.active = active;
        }

        fn destroy(self) {
            self.live.set(self.live.get() - 1);
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn prewarmed_entries_are_inactive_copies() {
        let mut pool = NativeObjectPool::from_template(Sprite::template());
        pool.fill_pool(3);

        assert_eq!(pool.template().live.get(), 3);
        assert_eq!(pool.count_pooled(), 3);
    }

    #[test]
    fn take_activates_and_return_deactivates() {
        let mut pool = NativeObjectPool::from_template(Sprite::template());

        let sprite = pool.get();
        assert!(sprite.active);
        assert_eq!(sprite.id, 1);

        pool.release(sprite).unwrap();
        let sprite = pool.get();
        assert_eq!(sprite.id, 1);
        assert!(sprite.active);
    }

    #[test]
    fn return_hook_sees_deactivated_entry() {
        let seen = Rc::new(Cell::new(true));
        let s = Rc::clone(&seen);

        let mut pool = NativeObjectPool::native_builder(Sprite::template())
            .on_return(move |sprite: &mut Sprite| s.set(sprite.active))
            .build();

        let sprite = pool.get();
        pool.release(sprite).unwrap();
        assert!(!seen.get());
    }

    #[test]
    fn overflow_destroys_engine_resource() {
        let mut pool = NativeObjectPool::native_builder(Sprite::template())
            .with_max_size(1)
            .build();
        let live = Rc::clone(&pool.template().live);

        let a = pool.get();
        let b = pool.get();
        assert_eq!(live.get(), 2);

        pool.release(a).unwrap();
        pool.release(b).unwrap();
        assert_eq!(live.get(), 1);
        assert_eq!(pool.count_pooled(), 1);
    }

    #[test]
    fn clear_destroys_idle_engine_resources() {
        let mut pool = NativeObjectPool::from_template(Sprite::template());
        let live = Rc::clone(&pool.template().live);
        pool.fill_pool(4);

        pool.clear();
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn custom_create_replaces_template_copy() {
        let template = Sprite::template();
        let live = Rc::clone(&template.live);
        let next_id = Rc::clone(&template.next_id);

        let mut pool = NativeObjectPool::native_builder(template)
            .with_create(move || Sprite {
                id: 100,
                active: false,
                live: Rc::clone(&live),
                next_id: Rc::clone(&next_id),
            })
            .build();

        assert!(pool.policy().uses_custom_create());
        let sprite = pool.get();
        assert_eq!(sprite.id, 100);
        assert!(sprite.active);
        assert_eq!(pool.template().live.get(), 0);
    }
}
