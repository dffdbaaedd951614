//! The component value store.
//!
//! Every avow owns a [`ValueStore`] holding its voltage, current and
//! resistance together with a per-value visibility flag. Hidden values are
//! the ones a learner has to work out when the diagram is used as an
//! exercise.
//!
//! Resistance is not independently authoritative: once voltage and current
//! are both known it is re-derived as `round(V / C, 2)`.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::component::ComponentKind;

/// Smallest voltage or current accepted from an edit.
const MIN_EDIT_VALUE: f64 = 0.001;

/// Smallest input accepted by Ohm's-law completion.
const MIN_SOLVE_VALUE: f64 = 0.0001;

/// Rounds `value` half away from zero to `places` decimal places.
///
/// The value is first snapped to a millionth of the target unit so that
/// binary representation error (`2.675` stored as `2.67499...`) does not
/// decide the direction of rounding.
///
/// # Examples
///
/// ```
/// # use avow_core::values::round_to;
/// assert_eq!(round_to(2.675, 2), 2.68);
/// assert_eq!(round_to(-2.675, 2), -2.68);
/// assert_eq!(round_to(10.0 / 3.0, 2), 3.33);
/// ```
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = ((value * factor) * 1e6).round() / 1e6;
    scaled.round() / factor
}

/// The electrical quantities tracked per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentParameter {
    Voltage,
    Current,
    Resistance,
}

impl ComponentParameter {
    /// All parameters in display order.
    pub const ALL: [ComponentParameter; 3] = [Self::Voltage, Self::Current, Self::Resistance];
}

impl fmt::Display for ComponentParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Voltage => write!(f, "voltage"),
            Self::Current => write!(f, "current"),
            Self::Resistance => write!(f, "resistance"),
        }
    }
}

/// One stored quantity and whether it is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParameterValue {
    pub value: f64,
    pub hidden: bool,
}

/// Values of a single component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValueStore {
    voltage: ParameterValue,
    current: ParameterValue,
    resistance: ParameterValue,
}

impl ValueStore {
    /// Creates a store with every value at zero and visible.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parameter: ComponentParameter) -> ParameterValue {
        match parameter {
            ComponentParameter::Voltage => self.voltage,
            ComponentParameter::Current => self.current,
            ComponentParameter::Resistance => self.resistance,
        }
    }

    fn get_mut(&mut self, parameter: ComponentParameter) -> &mut ParameterValue {
        match parameter {
            ComponentParameter::Voltage => &mut self.voltage,
            ComponentParameter::Current => &mut self.current,
            ComponentParameter::Resistance => &mut self.resistance,
        }
    }

    /// Returns the numeric value of `parameter`.
    pub fn value(&self, parameter: ComponentParameter) -> f64 {
        self.get(parameter).value
    }

    pub fn is_hidden(&self, parameter: ComponentParameter) -> bool {
        self.get(parameter).hidden
    }

    pub fn set_value(&mut self, parameter: ComponentParameter, value: f64) {
        self.get_mut(parameter).value = value;
    }

    pub fn set_hidden(&mut self, parameter: ComponentParameter, hidden: bool) {
        self.get_mut(parameter).hidden = hidden;
    }

    /// Re-derives resistance from voltage and current.
    ///
    /// A zero current leaves no meaningful ratio; resistance is set to zero.
    pub fn derive_resistance(&mut self) {
        let current = self.current.value;
        self.resistance.value = if current == 0.0 {
            0.0
        } else {
            round_to(self.voltage.value / current, 2)
        };
    }

    /// Completes `target` from the other two quantities using Ohm's law.
    ///
    /// All three stored values must be positive for the completion to run;
    /// otherwise nothing changes and `false` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use avow_core::values::{ComponentParameter, ValueStore};
    /// let mut values = ValueStore::new();
    /// values.set_value(ComponentParameter::Voltage, 10.0);
    /// values.set_value(ComponentParameter::Current, 1.0);
    /// values.set_value(ComponentParameter::Resistance, 4.0);
    ///
    /// assert!(values.solve(ComponentParameter::Voltage));
    /// assert_eq!(values.value(ComponentParameter::Voltage), 4.0);
    /// ```
    pub fn solve(&mut self, target: ComponentParameter) -> bool {
        let voltage = round_to(self.voltage.value, 2);
        let current = round_to(self.current.value, 2);
        let resistance = round_to(self.resistance.value, 2);

        if voltage <= MIN_SOLVE_VALUE || current <= MIN_SOLVE_VALUE || resistance <= MIN_SOLVE_VALUE
        {
            debug!(parameter:% = target; "Skipping completion, not every value is positive");
            return false;
        }

        let solved = match target {
            ComponentParameter::Voltage => resistance * current,
            ComponentParameter::Current => voltage / resistance,
            ComponentParameter::Resistance => round_to(voltage / current, 2),
        };
        self.get_mut(target).value = solved;
        true
    }
}

/// A batch of changes requested from the component values panel.
///
/// Only meaningful inputs are applied: a voltage or current must exceed
/// `0.001`, a resistance must be positive and is never applied to a cell.
///
/// # Examples
///
/// ```
/// # use avow_core::{component::ComponentKind, values::{ComponentParameter, ValueEdit, ValueStore}};
/// let mut values = ValueStore::new();
/// ValueEdit::new()
///     .with_voltage(4.567)
///     .with_current(0.0)
///     .with_hidden(ComponentParameter::Current, true)
///     .apply(&mut values, ComponentKind::Resistor);
///
/// assert_eq!(values.value(ComponentParameter::Voltage), 4.57);
/// assert_eq!(values.value(ComponentParameter::Current), 0.0);
/// assert!(values.is_hidden(ComponentParameter::Current));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueEdit {
    voltage: Option<f64>,
    current: Option<f64>,
    resistance: Option<f64>,
    hidden: Vec<(ComponentParameter, bool)>,
}

impl ValueEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voltage(mut self, voltage: f64) -> Self {
        self.voltage = Some(voltage);
        self
    }

    pub fn with_current(mut self, current: f64) -> Self {
        self.current = Some(current);
        self
    }

    pub fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = Some(resistance);
        self
    }

    pub fn with_hidden(mut self, parameter: ComponentParameter, hidden: bool) -> Self {
        self.hidden.push((parameter, hidden));
        self
    }

    /// The voltage this edit would store, if it passes the threshold.
    pub fn accepted_voltage(&self) -> Option<f64> {
        accept_quantity(self.voltage)
    }

    /// The current this edit would store, if it passes the threshold.
    pub fn accepted_current(&self) -> Option<f64> {
        accept_quantity(self.current)
    }

    /// The resistance this edit would store on a component of `kind`.
    pub fn accepted_resistance(&self, kind: ComponentKind) -> Option<f64> {
        self.resistance
            .filter(|resistance| *resistance > 0.0 && !kind.is_cell())
            .map(|resistance| round_to(resistance, 3))
    }

    /// Applies every accepted change to `values`.
    pub fn apply(&self, values: &mut ValueStore, kind: ComponentKind) {
        if let Some(voltage) = self.accepted_voltage() {
            values.set_value(ComponentParameter::Voltage, voltage);
        }
        if let Some(current) = self.accepted_current() {
            values.set_value(ComponentParameter::Current, current);
        }
        if let Some(resistance) = self.accepted_resistance(kind) {
            values.set_value(ComponentParameter::Resistance, resistance);
        }
        if kind.is_cell() {
            values.set_value(ComponentParameter::Resistance, 0.0);
        }
        for (parameter, hidden) in &self.hidden {
            values.set_hidden(*parameter, *hidden);
        }
    }
}

fn accept_quantity(value: Option<f64>) -> Option<f64> {
    value
        .filter(|value| *value > MIN_EDIT_VALUE)
        .map(|value| round_to(value, 2))
}
