//! Tweenable value types
//!
//! A tween addresses its target by field name, so anything exposing named
//! numeric fields can be animated: colors, ad-hoc field maps, or game objects
//! implementing [`Tweenable`] directly.

use indexmap::IndexMap;

/// Values whose named numeric fields can be read and overwritten
pub trait Tweenable {
    /// Current value of `field`, or `None` if the target has no such field
    fn get(&self, field: &str) -> Option<f64>;

    /// Overwrite `field`; unknown fields are ignored
    fn set(&mut self, field: &str, value: f64);
}

// ============================================================================
// Color
// ============================================================================

/// RGBA color with components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// End values for tweening another color to this one
    pub fn to_fields(self) -> FieldMap {
        FieldMap::from_iter([
            ("r", f64::from(self.r)),
            ("g", f64::from(self.g)),
            ("b", f64::from(self.b)),
            ("a", f64::from(self.a)),
        ])
    }
}

impl Tweenable for Color {
    fn get(&self, field: &str) -> Option<f64> {
        let value = match field {
            "r" => self.r,
            "g" => self.g,
            "b" => self.b,
            "a" => self.a,
            _ => return None,
        };
        Some(f64::from(value))
    }

    fn set(&mut self, field: &str, value: f64) {
        let value = value as f32;
        match field {
            "r" => self.r = value,
            "g" => self.g = value,
            "b" => self.b = value,
            "a" => self.a = value,
            _ => {}
        }
    }
}

// ============================================================================
// FieldMap
// ============================================================================

/// Insertion-ordered map of named numeric fields
///
/// Serves both as a generic tween target and as the end-value set of a tween.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMap {
    fields: IndexMap<String, f64>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: f64) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: f64) {
        self.fields.insert(field.into(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.fields.iter().map(|(field, &value)| (field.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value))
                .collect(),
        }
    }
}

impl Tweenable for FieldMap {
    fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }

    fn set(&mut self, field: &str, value: f64) {
        if let Some(slot) = self.fields.get_mut(field) {
            *slot = value;
        }
    }
}
