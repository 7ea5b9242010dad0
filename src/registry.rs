//! Ordered registry of show properties.
//!
//! The registry is the controller's single view over every tunable value in
//! the show. Registration order is meaningful: it defines the external index
//! used for encoder binding and for numeric-key arming, and it is the order
//! of the once-per-frame commit pass. The registry holds cheap handle clones,
//! never the canonical copy — behaviors keep their own clones of the
//! properties they read.
//!
//! # Per-frame contract
//!
//! [`PropertyRegistry::clean_all`] runs before anything reads a property, so
//! a single frame observes a consistent snapshot of all parameters — never a
//! mix of a knob's old and new value mid-frame.

use serde::{Deserialize, Serialize};

use crate::property::{Property, PropertyWriter, Tunable};

/// Scale step applied by the arrow-key nudge.
const NUDGE_STEP: f32 = 0.01;

/// Type-erased write access for producer threads: the subset of a property
/// a MIDI encoder or audio envelope needs.
pub trait ScaleWriter: Send + Sync {
    fn name(&self) -> &str;
    /// Stage a write at normalized position `scale` within the bounds.
    fn set_scale(&self, scale: f32);
}

impl<T: Tunable> ScaleWriter for PropertyWriter<T> {
    fn name(&self) -> &str {
        PropertyWriter::name(self)
    }

    fn set_scale(&self, scale: f32) {
        PropertyWriter::set_scale(self, scale);
    }
}

/// Type-erased simulation-thread access to a registered property.
pub trait RegisteredProperty {
    fn name(&self) -> &str;
    fn clean(&self);
    fn set_scale(&self, scale: f32);
    fn scale(&self) -> f32;
    fn scale_writer(&self) -> Box<dyn ScaleWriter>;
}

impl<T: Tunable> RegisteredProperty for Property<T> {
    fn name(&self) -> &str {
        Property::name(self)
    }

    fn clean(&self) {
        Property::clean(self);
    }

    fn set_scale(&self, scale: f32) {
        Property::set_scale(self, scale);
    }

    fn scale(&self) -> f32 {
        Property::scale(self)
    }

    fn scale_writer(&self) -> Box<dyn ScaleWriter> {
        Box::new(self.writer())
    }
}

/// An encoder-channel-to-property association, resolved to a thread-safe
/// writer plus the scale the controller display should seed from.
pub struct EncoderBinding {
    pub channel: u8,
    pub writer: Box<dyn ScaleWriter>,
    pub initial_scale: f32,
}

/// Persisted form of the registry: `(name, scale)` per property. The file
/// format and I/O belong to the caller; properties missing from a restored
/// snapshot keep their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub scales: Vec<(String, f32)>,
}

/// Ordered collection of property handles exposed uniformly for the frame
/// commit pass, persistence, and index-based external control.
#[derive(Default)]
pub struct PropertyRegistry {
    entries: Vec<Box<dyn RegisteredProperty>>,
    encoder_map: Vec<(u8, usize)>,
    armed: Option<usize>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property handle. Insertion order defines the property's
    /// external index.
    pub fn register<T: Tunable>(&mut self, property: &Property<T>) {
        self.entries.push(Box::new(property.clone()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    /// Commit every pending write, in registration order. Derived-property
    /// cascades run synchronously inside their source's commit.
    pub fn clean_all(&self) {
        for entry in &self.entries {
            entry.clean();
        }
    }

    // ========== Numeric-key arming ==========

    /// Arm the property at `index` for arrow-key nudging. Out-of-range
    /// indices disarm.
    pub fn arm(&mut self, index: usize) {
        if index < self.entries.len() {
            log::info!("armed property {} '{}'", index, self.entries[index].name());
            self.armed = Some(index);
        } else {
            log::warn!("arm index {} out of range ({} properties)", index, self.entries.len());
            self.armed = None;
        }
    }

    pub fn armed(&self) -> Option<usize> {
        self.armed
    }

    /// Move the armed property's scale by one step in `direction` (+1 up,
    /// -1 down), clamped to [0, 1], and commit. No-op when nothing is armed.
    pub fn nudge_armed(&self, direction: f32) {
        let Some(index) = self.armed else {
            return;
        };
        let entry = &self.entries[index];
        let scale = (entry.scale() + NUDGE_STEP * direction.signum()).clamp(0.0, 1.0);
        entry.set_scale(scale);
        entry.clean();
        log::debug!("nudged '{}' to scale {:.2}", entry.name(), scale);
    }

    // ========== Encoder binding ==========

    /// Associate a controller channel with the property at `index`.
    pub fn bind_encoder(&mut self, channel: u8, index: usize) {
        if index < self.entries.len() {
            self.encoder_map.push((channel, index));
        } else {
            log::warn!("encoder bind index {} out of range", index);
        }
    }

    /// Resolve the binding table into thread-safe writers for the MIDI
    /// layer. Initial scales reflect committed values at call time, for
    /// seeding the controller's displayed positions.
    pub fn encoder_bindings(&self) -> Vec<EncoderBinding> {
        self.encoder_map
            .iter()
            .map(|&(channel, index)| {
                let entry = &self.entries[index];
                EncoderBinding {
                    channel,
                    writer: entry.scale_writer(),
                    initial_scale: entry.scale(),
                }
            })
            .collect()
    }

    // ========== Persistence hooks ==========

    /// Capture every property's scale, in registration order.
    pub fn snapshot(&self) -> Settings {
        Settings {
            scales: self
                .entries
                .iter()
                .map(|e| (e.name().to_string(), e.scale()))
                .collect(),
        }
    }

    /// Restore scales by property name and commit each. Names absent from
    /// the snapshot keep their current values; unknown names are logged and
    /// skipped.
    pub fn restore(&self, settings: &Settings) {
        for (name, scale) in &settings.scales {
            match self.entries.iter().find(|e| e.name() == name.as_str()) {
                Some(entry) => {
                    entry.set_scale(*scale);
                    entry.clean();
                }
                None => log::warn!("settings entry '{}' matches no property", name),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn registry_with(props: &[&Property<f32>]) -> PropertyRegistry {
        let mut registry = PropertyRegistry::new();
        for p in props {
            registry.register(*p);
        }
        registry
    }

    #[test]
    fn test_clean_all_commits_in_registration_order() {
        let a = Property::new("a", 0.0_f32, 0.0, 1.0);
        let b = Property::new("b", 0.0_f32, 0.0, 1.0);
        let order = Rc::new(RefCell::new(Vec::new()));
        for (tag, p) in [("a", &a), ("b", &b)] {
            let order = Rc::clone(&order);
            p.subscribe(move |_| order.borrow_mut().push(tag));
        }

        let registry = registry_with(&[&a, &b]);
        a.set(0.1);
        b.set(0.2);
        registry.clean_all();

        assert_eq!(*order.borrow(), vec!["a", "b"]);
        assert_eq!(a.get(), 0.1);
        assert_eq!(b.get(), 0.2);
    }

    #[test]
    fn test_arm_and_nudge() {
        let p = Property::new("width", 5.0_f32, 0.0, 10.0);
        let mut registry = registry_with(&[&p]);
        registry.arm(0);
        registry.nudge_armed(1.0);
        assert!((p.scale() - 0.51).abs() < 1e-6);
        registry.nudge_armed(-1.0);
        assert!((p.scale() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_nudge_clamps_at_bounds() {
        let p = Property::new("v", 1.0_f32, 0.0, 1.0);
        let mut registry = registry_with(&[&p]);
        registry.arm(0);
        registry.nudge_armed(1.0);
        assert_eq!(p.scale(), 1.0);
        for _ in 0..200 {
            registry.nudge_armed(-1.0);
        }
        assert_eq!(p.scale(), 0.0);
    }

    #[test]
    fn test_arm_out_of_range_disarms() {
        let p = Property::new("v", 0.0_f32, 0.0, 1.0);
        let mut registry = registry_with(&[&p]);
        registry.arm(0);
        assert_eq!(registry.armed(), Some(0));
        registry.arm(9);
        assert_eq!(registry.armed(), None);
        // Nudging with nothing armed is a no-op.
        registry.nudge_armed(1.0);
        assert_eq!(p.get(), 0.0);
    }

    #[test]
    fn test_encoder_bindings_seed_initial_scale() {
        let p = Property::new("hue", 100.0_f32, 0.0, 200.0);
        let mut registry = registry_with(&[&p]);
        registry.bind_encoder(3, 0);

        let bindings = registry.encoder_bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].channel, 3);
        assert!((bindings[0].initial_scale - 0.5).abs() < 1e-6);

        bindings[0].writer.set_scale(1.0);
        registry.clean_all();
        assert_eq!(p.get(), 200.0);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let a = Property::new("a", 0.0_f32, 0.0, 10.0);
        let b = Property::new("b", 0.0_f32, 0.0, 10.0);
        let registry = registry_with(&[&a, &b]);

        a.load(0.3);
        b.load(0.8);
        let settings = registry.snapshot();

        a.load(0.0);
        b.load(0.0);
        registry.restore(&settings);
        assert!((a.get() - 3.0).abs() < 1e-5);
        assert!((b.get() - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_restore_missing_key_leaves_default() {
        let a = Property::new("a", 2.0_f32, 0.0, 10.0);
        let registry = registry_with(&[&a]);
        let settings = Settings {
            scales: vec![("unknown".to_string(), 0.9)],
        };
        registry.restore(&settings);
        assert_eq!(a.get(), 2.0);
    }

    #[test]
    fn test_settings_serde_round_trip() {
        let settings = Settings {
            scales: vec![("tracerCount".to_string(), 0.25), ("hue".to_string(), 0.75)],
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scales, settings.scales);
    }
}
