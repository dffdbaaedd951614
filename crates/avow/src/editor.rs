//! The editing surface around a circuit.
//!
//! An [`Editor`] owns the canonical [`Circuit`], hands out sequential names
//! and carries the configuration every extraction uses. All changes to
//! placed avows go through it.

use log::{debug, info, warn};

use avow_core::{
    component::ComponentKind,
    geometry::{Bounds, Point},
    identifier::{Id, NodeId},
    values::{ComponentParameter, ValueEdit},
};

use crate::{
    DiagramBuilder, Extraction,
    config::{AppConfig, EditorMode, Scale},
    error::AvowError,
    graph::{Circuit, Node},
    resolver::ConnectionResolver,
    scene::Scene,
};

/// Owns the placed avows and runs extraction over them.
///
/// # Examples
///
/// ```
/// # use avow::{config::AppConfig, editor::Editor};
/// # use avow::geometry::{Bounds, Point, Size};
/// let mut editor = Editor::new(AppConfig::default());
/// let a = editor
///     .create_node(Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(1.0, 5.0)))
///     .unwrap();
///
/// let extraction = editor.extract().unwrap();
/// assert!(extraction.is_valid());
/// assert_eq!(editor.node(a).unwrap().name(), "A");
/// ```
#[derive(Debug, Default)]
pub struct Editor {
    circuit: Circuit,
    builder: DiagramBuilder,
    names_issued: usize,
}

impl Editor {
    pub fn new(config: AppConfig) -> Self {
        Self {
            circuit: Circuit::new(),
            builder: DiagramBuilder::new(config),
            names_issued: 0,
        }
    }

    /// Seeds an editor with every avow of `scene`.
    ///
    /// # Errors
    ///
    /// Returns [`AvowError::InvalidSize`] if an avow has a non-positive side.
    pub fn from_scene(scene: &Scene, config: AppConfig) -> Result<Self, AvowError> {
        let mut editor = Self::new(config);

        for avow in scene.avows() {
            let id = editor.create_node(avow.bounds())?;
            if let Some(name) = avow.name() {
                editor.rename(id, name)?;
            }
            if avow.kind() != ComponentKind::default() {
                editor.set_kind(id, avow.kind())?;
            }

            let mut edit = ValueEdit::new();
            for parameter in avow.hidden() {
                edit = edit.with_hidden(*parameter, true);
            }
            if let Some(resistance) = avow.resistance() {
                edit = edit.with_resistance(resistance);
            }
            editor.apply_edit(id, &edit)?;
        }

        info!(nodes_count = editor.circuit.len(); "Scene loaded");
        Ok(editor)
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn config(&self) -> &AppConfig {
        self.builder.config()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.circuit.node(id)
    }

    /// Places a new resistor with the next sequential name.
    ///
    /// # Errors
    ///
    /// Returns [`AvowError::InvalidSize`] if `bounds` is not positive in
    /// both dimensions.
    pub fn create_node(&mut self, bounds: Bounds) -> Result<NodeId, AvowError> {
        check_size(bounds)?;

        let name = Id::sequential(self.names_issued);
        self.names_issued += 1;

        let id = self
            .circuit
            .insert(Node::new(name, ComponentKind::Resistor, bounds));
        debug!(node:% = id, name:% = name; "Avow created");
        Ok(id)
    }

    /// Removes an avow and every reference to it.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node, AvowError> {
        let node = self.circuit.remove(id).ok_or(AvowError::UnknownNode(id))?;
        debug!(node:% = id, name:% = node.name(); "Avow deleted");
        Ok(node)
    }

    /// Renames an avow. Blank names are ignored.
    pub fn rename(&mut self, id: NodeId, name: &str) -> Result<(), AvowError> {
        let node = self.node_mut(id)?;
        let name = name.trim();
        if name.is_empty() {
            debug!(node:% = id; "Ignoring blank name");
            return Ok(());
        }
        node.set_name(Id::new(name));
        Ok(())
    }

    /// Changes the kind of an avow. A cell has no resistance.
    pub fn set_kind(&mut self, id: NodeId, kind: ComponentKind) -> Result<(), AvowError> {
        let node = self.node_mut(id)?;
        node.set_kind(kind);
        if kind.is_cell() {
            node.values_mut()
                .set_value(ComponentParameter::Resistance, 0.0);
        }
        Ok(())
    }

    pub fn move_node(&mut self, id: NodeId, top_left: Point) -> Result<(), AvowError> {
        let node = self.node_mut(id)?;
        node.set_bounds(node.bounds().with_top_left(top_left));
        Ok(())
    }

    /// Applies an edit from the values panel.
    ///
    /// An accepted voltage or current resizes the avow, since its height
    /// and width are what extraction reads them from.
    pub fn apply_edit(&mut self, id: NodeId, edit: &ValueEdit) -> Result<(), AvowError> {
        let scale = self.config().extraction().scale();
        let node = self.node_mut(id)?;

        let mut size = node.bounds().to_size();
        if let Some(voltage) = edit.accepted_voltage() {
            size = size.with_height((voltage / scale) as f32);
        }
        if let Some(current) = edit.accepted_current() {
            size = size.with_width((current / scale) as f32);
        }
        check_size(node.bounds().with_size(size))?;
        node.set_bounds(node.bounds().with_size(size));

        let kind = node.kind();
        edit.apply(node.values_mut(), kind);
        Ok(())
    }

    /// Completes `parameter` from the other two values using Ohm's law.
    ///
    /// Returns `false` when the stored values cannot determine it.
    pub fn auto_complete(
        &mut self,
        id: NodeId,
        parameter: ComponentParameter,
    ) -> Result<bool, AvowError> {
        let mut values = *self.node_mut(id)?.values();
        if !values.solve(parameter) {
            return Ok(false);
        }

        let solved = values.value(parameter);
        let edit = match parameter {
            ComponentParameter::Voltage => ValueEdit::new().with_voltage(solved),
            ComponentParameter::Current => ValueEdit::new().with_current(solved),
            ComponentParameter::Resistance => ValueEdit::new().with_resistance(solved),
        };
        self.apply_edit(id, &edit)?;
        Ok(true)
    }

    /// Selects one of the [`Scale`] presets by position.
    ///
    /// An unknown index leaves the scale unchanged and returns `false`.
    pub fn set_scale_preset(&mut self, index: usize) -> bool {
        match Scale::from_index(index) {
            Some(scale) => {
                self.builder
                    .config_mut()
                    .extraction_mut()
                    .set_scale(scale.factor());
                info!(scale = scale.factor(); "Scale changed");
                true
            }
            None => {
                warn!(index = index; "Unknown scale preset");
                false
            }
        }
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.builder.config_mut().set_mode(mode);
    }

    /// Recomputes the adjacency of every avow.
    pub fn refresh_all(&mut self) {
        let snap_distance = self.config().extraction().snap_distance();
        ConnectionResolver::new(snap_distance).resolve(&mut self.circuit);
    }

    /// Extracts the diagram of the current circuit.
    pub fn extract(&mut self) -> Result<Extraction, AvowError> {
        self.builder.extract(&mut self.circuit)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, AvowError> {
        self.circuit
            .node_mut(id)
            .ok_or(AvowError::UnknownNode(id))
    }
}

fn check_size(bounds: Bounds) -> Result<(), AvowError> {
    if bounds.to_size().is_positive() {
        Ok(())
    } else {
        Err(AvowError::InvalidSize {
            width: bounds.width(),
            height: bounds.height(),
        })
    }
}
