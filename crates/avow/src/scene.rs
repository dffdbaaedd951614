//! Scene descriptions used to seed an [`Editor`](crate::editor::Editor).
//!
//! A scene lists placed avows with their geometry. It is plain data that
//! deserializes from any `serde` format; the command line reads it from
//! TOML:
//!
//! ```toml
//! [[avow]]
//! x = 0.0
//! y = 0.0
//! width = 1.0
//! height = 5.0
//! hidden = ["resistance"]
//! ```

use serde::Deserialize;

use avow_core::{
    component::ComponentKind,
    geometry::{Bounds, Point, Size},
    values::ComponentParameter,
};

/// Every avow of a scene, in placement order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scene {
    #[serde(default, rename = "avow")]
    avows: Vec<SceneAvow>,
}

impl Scene {
    pub fn new(avows: Vec<SceneAvow>) -> Self {
        Self { avows }
    }

    pub fn avows(&self) -> &[SceneAvow] {
        &self.avows
    }
}

/// One placed avow of a scene.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneAvow {
    /// Display name. A sequential name is issued when missing.
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kind: ComponentKind,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    /// Values the learner has to work out.
    #[serde(default)]
    hidden: Vec<ComponentParameter>,
    /// Manually entered resistance.
    #[serde(default)]
    resistance: Option<f64>,
}

impl SceneAvow {
    /// Creates an unnamed resistor at `(x, y)`.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            name: None,
            kind: ComponentKind::default(),
            x,
            y,
            width,
            height,
            hidden: Vec::new(),
            resistance: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_kind(mut self, kind: ComponentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_hidden(mut self, parameter: ComponentParameter) -> Self {
        self.hidden.push(parameter);
        self
    }

    pub fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = Some(resistance);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(
            Point::new(self.x, self.y),
            Size::new(self.width, self.height),
        )
    }

    pub fn hidden(&self) -> &[ComponentParameter] {
        &self.hidden
    }

    pub fn resistance(&self) -> Option<f64> {
        self.resistance
    }
}
