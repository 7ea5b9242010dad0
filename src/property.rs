//! Reactive, range-clamped, bindable show parameters.
//!
//! A [`Property`] is the single kind of tunable value in a show: tracer
//! count, hue, velocity, stroke width, multiplier shift. Each one carries
//! inclusive `[min, max]` bounds, a dirty/clean double buffer, an ordered
//! subscriber list, and a normalized 0..1 "scale" view used for physical
//! knob binding.
//!
//! # Threading
//!
//! Writes and reads are split across two handles:
//!
//! - [`Property`] lives on the simulation thread. It owns the cached
//!   (committed) value and the subscriber list. `get()` never locks.
//! - [`PropertyWriter`] is `Send + Sync` and is handed to audio and MIDI
//!   callbacks. `set()` takes a short per-property mutex around the pending
//!   write and never touches the cached value.
//!
//! Pending writes become visible only when the simulation thread calls
//! [`Property::clean`] — usually via the registry's once-per-frame commit
//! pass — which bounds producer-to-consumer staleness to one frame.
//!
//! # Quick example
//!
//! ```ignore
//! let count = Property::new("tracerCount", 1, 1, 127);
//! let writer = count.writer();          // move into a MIDI callback
//! writer.set_scale(0.5);                // knob at half turn
//! count.clean();                        // frame commit
//! assert_eq!(count.get(), 64);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use glam::Vec3;

use crate::range;

/// Value types a [`Property`] can hold.
///
/// Implemented for `f32`, `i32` and [`Vec3`]. The vector implementation
/// validates bounds componentwise; its scalar scale view is the magnitude
/// ratio against the upper bound, matching how a single knob drives a
/// velocity vector.
pub trait Tunable: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Whether `self` lies inside the inclusive `[min, max]` range.
    fn in_bounds(self, min: Self, max: Self) -> bool;

    /// The value at normalized position `t` (in [0, 1]) within `[min, max]`.
    fn from_scale(t: f32, min: Self, max: Self) -> Self;

    /// The normalized position of `self` within `[min, max]`.
    fn to_scale(self, min: Self, max: Self) -> f32;

    /// Rescale `self` from a foreign range into `[dst_min, dst_max]`,
    /// clamped.
    fn map_between(self, src_min: Self, src_max: Self, dst_min: Self, dst_max: Self) -> Self;
}

impl Tunable for f32 {
    fn in_bounds(self, min: Self, max: Self) -> bool {
        min <= self && self <= max
    }

    fn from_scale(t: f32, min: Self, max: Self) -> Self {
        range::lerp(t, min, max)
    }

    fn to_scale(self, min: Self, max: Self) -> f32 {
        range::inverse_lerp(self, min, max)
    }

    fn map_between(self, src_min: Self, src_max: Self, dst_min: Self, dst_max: Self) -> Self {
        range::map_clamped(self, src_min, src_max, dst_min, dst_max)
    }
}

impl Tunable for i32 {
    fn in_bounds(self, min: Self, max: Self) -> bool {
        min <= self && self <= max
    }

    fn from_scale(t: f32, min: Self, max: Self) -> Self {
        range::lerp(t, min as f32, max as f32).round() as i32
    }

    fn to_scale(self, min: Self, max: Self) -> f32 {
        range::inverse_lerp(self as f32, min as f32, max as f32)
    }

    fn map_between(self, src_min: Self, src_max: Self, dst_min: Self, dst_max: Self) -> Self {
        range::map_clamped(
            self as f32,
            src_min as f32,
            src_max as f32,
            dst_min as f32,
            dst_max as f32,
        )
        .round() as i32
    }
}

impl Tunable for Vec3 {
    fn in_bounds(self, min: Self, max: Self) -> bool {
        self.cmpge(min).all() && self.cmple(max).all()
    }

    fn from_scale(t: f32, _min: Self, max: Self) -> Self {
        max * t.clamp(0.0, 1.0)
    }

    fn to_scale(self, _min: Self, max: Self) -> f32 {
        let full = max.length();
        if full == 0.0 {
            0.0
        } else {
            (self.length() / full).clamp(0.0, 1.0)
        }
    }

    fn map_between(self, src_min: Self, src_max: Self, dst_min: Self, dst_max: Self) -> Self {
        Vec3::new(
            range::map_clamped(self.x, src_min.x, src_max.x, dst_min.x, dst_max.x),
            range::map_clamped(self.y, src_min.y, src_max.y, dst_min.y, dst_max.y),
            range::map_clamped(self.z, src_min.z, src_max.z, dst_min.z, dst_max.z),
        )
    }
}

/// Pending (dirty-side) state, guarded by the write mutex.
struct Pending<T> {
    value: T,
    dirty: bool,
}

/// Shared write side of a property. Producer threads reach it through
/// [`PropertyWriter`]; the owning [`Property`] commits from it.
struct Slot<T: Tunable> {
    name: String,
    min: T,
    max: T,
    pending: Mutex<Pending<T>>,
}

impl<T: Tunable> Slot<T> {
    /// Validate and stage a write. Out-of-range values are dropped without
    /// error: last valid write wins.
    fn set(&self, v: T) {
        if !v.in_bounds(self.min, self.max) {
            log::trace!("property '{}': dropping out-of-range write {:?}", self.name, v);
            return;
        }
        let mut pending = self.pending.lock().unwrap();
        pending.value = v;
        pending.dirty = true;
        log::trace!("property '{}': set to {:?}", self.name, v);
    }

    fn set_scale(&self, scale: f32) {
        self.set(T::from_scale(scale.clamp(0.0, 1.0), self.min, self.max));
    }

    /// Take the pending value if dirty.
    fn take(&self) -> Option<T> {
        let mut pending = self.pending.lock().unwrap();
        if pending.dirty {
            pending.dirty = false;
            Some(pending.value)
        } else {
            None
        }
    }
}

/// A commit callback. Returning `false` detaches the subscription; the
/// registered-forever form wraps its callback to always return `true`.
type Subscriber<T> = Box<dyn FnMut(T) -> bool>;

/// A bounded, dirty/clean double-buffered show parameter.
///
/// Cloning a `Property` clones the handle, not the value: all clones share
/// one slot, one cached value and one subscriber list. Behaviors hold clones
/// of the properties they read; the registry holds clones of everything it
/// commits each frame.
pub struct Property<T: Tunable> {
    slot: Arc<Slot<T>>,
    cached: Rc<Cell<T>>,
    subscribers: Rc<RefCell<Vec<Subscriber<T>>>>,
}

impl<T: Tunable> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            cached: Rc::clone(&self.cached),
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T: Tunable> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.slot.name)
            .field("value", &self.cached.get())
            .field("min", &self.slot.min)
            .field("max", &self.slot.max)
            .finish()
    }
}

impl<T: Tunable> Property<T> {
    /// Create a property with a name (diagnostics and persistence key), a
    /// default value and inclusive bounds.
    pub fn new(name: impl Into<String>, default: T, min: T, max: T) -> Self {
        Self {
            slot: Arc::new(Slot {
                name: name.into(),
                min,
                max,
                pending: Mutex::new(Pending {
                    value: default,
                    dirty: false,
                }),
            }),
            cached: Rc::new(Cell::new(default)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Create a property slaved to `source`: it copies the source's current
    /// value and bounds, and every commit of the source pushes the committed
    /// value — mapped from the source's range into this property's range —
    /// into this property and commits it synchronously.
    pub fn derived_from(name: impl Into<String>, source: &Property<T>) -> Self {
        let derived = Property::new(name, source.get(), source.min(), source.max());
        let handle = derived.clone();
        let (src_min, src_max) = (source.min(), source.max());
        source.subscribe(move |v| {
            handle.set(v.map_between(src_min, src_max, handle.min(), handle.max()));
            handle.clean();
        });
        derived
    }

    pub fn name(&self) -> &str {
        &self.slot.name
    }

    pub fn min(&self) -> T {
        self.slot.min
    }

    pub fn max(&self) -> T {
        self.slot.max
    }

    /// The last committed value. Never locks; only `clean()` changes it.
    pub fn get(&self) -> T {
        self.cached.get()
    }

    /// Stage a write. Thread-safe via [`PropertyWriter`]; this inherent
    /// method is the simulation-thread convenience. Out-of-range values are
    /// silently dropped; subscribers do not fire until [`Self::clean`].
    pub fn set(&self, v: T) {
        self.slot.set(v);
    }

    /// Stage a write at normalized position `scale` within the bounds.
    pub fn set_scale(&self, scale: f32) {
        self.slot.set_scale(scale);
    }

    /// The committed value's normalized position within the bounds.
    pub fn scale(&self) -> f32 {
        self.get().to_scale(self.slot.min, self.slot.max)
    }

    /// Commit the pending write, if any, then notify subscribers in
    /// subscription order with the committed value. Idempotent when nothing
    /// is pending. Subscriber cascades (a subscriber setting and cleaning a
    /// *different* property) complete before `clean` returns.
    pub fn clean(&self) {
        if let Some(v) = self.slot.take() {
            self.cached.set(v);
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain_mut(|subscriber| subscriber(v));
        }
    }

    /// Register a commit callback. Callbacks may set and clean other
    /// properties, but must not subscribe to or clean the property that is
    /// notifying them.
    pub fn subscribe(&self, mut f: impl FnMut(T) + 'static) {
        self.subscribe_while(move |v| {
            f(v);
            true
        });
    }

    /// Register a commit callback that can detach itself: the subscription
    /// is dropped after the first notification for which `f` returns
    /// `false`. Behaviors subscribing on behalf of state they do not own
    /// hold that state through a [`std::rc::Weak`] and return whether the
    /// upgrade succeeded, so a dropped behavior stops costing commit work.
    pub fn subscribe_while(&self, f: impl FnMut(T) -> bool + 'static) {
        self.subscribers.borrow_mut().push(Box::new(f));
    }

    /// Number of live subscriptions. Detached subscriptions leave the count
    /// at the next commit.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Rescale a value from a foreign range into this property's range,
    /// clamped.
    pub fn map(&self, v: T, src_min: T, src_max: T) -> T {
        v.map_between(src_min, src_max, self.slot.min, self.slot.max)
    }

    /// Rescale another property's committed value into this property's
    /// range.
    pub fn map_from(&self, other: &Property<T>) -> T {
        self.map(other.get(), other.min(), other.max())
    }

    /// A `Send + Sync` handle for producer threads (audio, MIDI callbacks).
    pub fn writer(&self) -> PropertyWriter<T> {
        PropertyWriter {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Persistence hook: the scale to store under this property's name.
    pub fn save(&self) -> f32 {
        self.scale()
    }

    /// Persistence hook: restore from a stored scale and commit immediately.
    pub fn load(&self, scale: f32) {
        self.set_scale(scale);
        self.clean();
    }
}

/// Thread-safe write handle for a [`Property`].
///
/// Cheap to clone; safe to move into audio and MIDI callbacks. Writes stage
/// into the property's dirty buffer and become visible after the next
/// simulation-thread `clean()`.
#[derive(Clone)]
pub struct PropertyWriter<T: Tunable> {
    slot: Arc<Slot<T>>,
}

impl<T: Tunable> PropertyWriter<T> {
    pub fn name(&self) -> &str {
        &self.slot.name
    }

    /// Stage a write; out-of-range values are silently dropped.
    pub fn set(&self, v: T) {
        self.slot.set(v);
    }

    /// Stage a write at normalized position `scale` within the bounds.
    pub fn set_scale(&self, scale: f32) {
        self.slot.set_scale(scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_set_then_clean_commits() {
        let p = Property::new("width", 2.0_f32, 0.0, 10.0);
        p.set(5.0);
        assert_eq!(p.get(), 2.0, "set must not touch the cached value");
        p.clean();
        assert_eq!(p.get(), 5.0);
    }

    #[test]
    fn test_out_of_range_write_dropped() {
        let p = Property::new("count", 1_i32, 1, 127);
        p.set(200);
        p.clean();
        assert_eq!(p.get(), 1);
        p.set(10);
        p.clean();
        assert_eq!(p.get(), 10);
        // A later bad write leaves the last good value.
        p.set(-3);
        p.clean();
        assert_eq!(p.get(), 10);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let p = Property::new("x", 0.0_f32, -1.0, 1.0);
        p.set(1.0);
        p.clean();
        assert_eq!(p.get(), 1.0);
        p.set(-1.0);
        p.clean();
        assert_eq!(p.get(), -1.0);
    }

    #[test]
    fn test_scale_round_trip() {
        let p = Property::new("hue", 0.0_f32, 40.0, 200.0);
        for s in [0.0, 0.25, 0.5, 0.75, 1.0] {
            p.set_scale(s);
            p.clean();
            assert!((p.scale() - s).abs() < 1e-5, "scale {} -> {}", s, p.scale());
        }
    }

    #[test]
    fn test_int_scale_rounds() {
        let p = Property::new("count", 1_i32, 1, 127);
        p.set_scale(0.5);
        p.clean();
        assert_eq!(p.get(), (1.0_f32 + 0.5 * 126.0).round() as i32);
    }

    #[test]
    fn test_degenerate_range_scale() {
        let p = Property::new("fixed", 3.0_f32, 3.0, 3.0);
        p.set_scale(0.7);
        p.clean();
        assert_eq!(p.get(), 3.0);
        assert_eq!(p.scale(), 0.0);
    }

    #[test]
    fn test_clean_idempotent_no_repeat_notifications() {
        let p = Property::new("v", 0.0_f32, 0.0, 1.0);
        let fired = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&fired);
        p.subscribe(move |_| *counter.borrow_mut() += 1);

        p.set(0.5);
        p.clean();
        p.clean();
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_subscribers_fire_in_order() {
        let p = Property::new("v", 0.0_f32, 0.0, 1.0);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            p.subscribe(move |_| order.borrow_mut().push(tag));
        }
        p.set(0.9);
        p.clean();
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_subscribe_while_detaches_on_false() {
        let p = Property::new("v", 0.0_f32, 0.0, 1.0);
        let fired = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&fired);
        p.subscribe_while(move |_| {
            *counter.borrow_mut() += 1;
            false
        });
        assert_eq!(p.subscriber_count(), 1);

        p.set(0.5);
        p.clean();
        assert_eq!(p.subscriber_count(), 0);

        // Later commits no longer reach the detached callback.
        p.set(0.9);
        p.clean();
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_weak_subscriber_detaches_after_state_drops() {
        let p = Property::new("v", 0.0_f32, 0.0, 1.0);
        let state = Rc::new(RefCell::new(0.0_f32));
        let weak = Rc::downgrade(&state);
        p.subscribe_while(move |v| match weak.upgrade() {
            Some(state) => {
                *state.borrow_mut() = v;
                true
            }
            None => false,
        });

        p.set(0.25);
        p.clean();
        assert_eq!(*state.borrow(), 0.25);
        assert_eq!(p.subscriber_count(), 1);

        drop(state);
        p.set(0.75);
        p.clean();
        assert_eq!(p.subscriber_count(), 0);
    }

    #[test]
    fn test_derived_property_cascades_on_source_clean() {
        let master = Property::new("master", 0.0_f32, 0.0, 1.0);
        let slave = Property::derived_from("slave", &master);
        master.set(0.75);
        master.clean();
        // No explicit slave.clean(): the cascade commits synchronously.
        assert_eq!(slave.get(), 0.75);
    }

    #[test]
    fn test_derived_chain_cascades() {
        let a = Property::new("a", 0.0_f32, 0.0, 1.0);
        let b = Property::derived_from("b", &a);
        let c = Property::derived_from("c", &b);
        a.set(0.25);
        a.clean();
        assert_eq!(c.get(), 0.25);
    }

    #[test]
    fn test_writer_is_send() {
        fn assert_send_sync<V: Send + Sync>(_: &V) {}
        let p = Property::new("v", 0.0_f32, 0.0, 1.0);
        let w = p.writer();
        assert_send_sync(&w);

        let handle = std::thread::spawn(move || w.set(0.5));
        handle.join().unwrap();
        p.clean();
        assert_eq!(p.get(), 0.5);
    }

    #[test]
    fn test_vec3_componentwise_bounds() {
        let p = Property::new(
            "velocity",
            Vec3::ZERO,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        p.set(Vec3::new(0.5, -0.5, 1.0));
        p.clean();
        assert_eq!(p.get(), Vec3::new(0.5, -0.5, 1.0));

        // One component out of range rejects the whole write.
        p.set(Vec3::new(0.0, 2.0, 0.0));
        p.clean();
        assert_eq!(p.get(), Vec3::new(0.5, -0.5, 1.0));
    }

    #[test]
    fn test_vec3_scale_is_magnitude_ratio() {
        let p = Property::new("shift", Vec3::ZERO, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        p.set_scale(0.5);
        p.clean();
        assert_eq!(p.get(), Vec3::new(1.0, 0.0, 0.0));
        assert!((p.scale() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_map_from_other_range() {
        let wide = Property::new("wide", 50.0_f32, 0.0, 100.0);
        let narrow = Property::new("narrow", 0.0_f32, 0.0, 1.0);
        assert!((narrow.map_from(&wide) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_load_commits_immediately() {
        let p = Property::new("count", 1_i32, 1, 127);
        p.load(1.0);
        assert_eq!(p.get(), 127);
        assert!((p.save() - 1.0).abs() < 1e-6);
    }
}
