//! Toolbar and cursor descriptions a host renders without interpreting them.

use crate::color::SerializableColor;
use crate::entities::GroupId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Identifies a control so the host can route input back to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    StrokeColor,
    StrokeWidth,
    EraserSize,
    PinColor,
    PinLabel,
    LineColor,
    LineWidth,
    GroupColor,
    GroupLabel,
    CreateGroup,
    RenameGroup(GroupId),
    DeleteGroup(GroupId),
    Undo,
    Redo,
    Clear,
}

/// Value delivered by the host when the user operates a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlInput {
    Color(SerializableColor),
    Number(f64),
    Text(String),
    Press,
}

/// What kind of widget a control is, with its current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Color(SerializableColor),
    Slider { value: f64, min: f64, max: f64 },
    Text {
        value: String,
        placeholder: String,
        suggestions: Vec<String>,
    },
    Button { enabled: bool },
}

/// One toolbar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolbarControl {
    pub id: ControlId,
    pub label: String,
    pub kind: ControlKind,
}

impl ToolbarControl {
    pub fn color(id: ControlId, label: impl Into<String>, value: SerializableColor) -> Self {
        Self { id, label: label.into(), kind: ControlKind::Color(value) }
    }

    pub fn slider(id: ControlId, label: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self { id, label: label.into(), kind: ControlKind::Slider { value, min, max } }
    }

    pub fn text(
        id: ControlId,
        label: impl Into<String>,
        value: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            kind: ControlKind::Text {
                value: value.into(),
                placeholder: placeholder.into(),
                suggestions: Vec::new(),
            },
        }
    }

    pub fn button(id: ControlId, label: impl Into<String>, enabled: bool) -> Self {
        Self { id, label: label.into(), kind: ControlKind::Button { enabled } }
    }

    /// Attach autocomplete suggestions to a text control.
    pub fn with_suggestions(mut self, items: Vec<String>) -> Self {
        if let ControlKind::Text { suggestions, .. } = &mut self.kind {
            *suggestions = items;
        }
        self
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.kind, ControlKind::Button { enabled: false })
    }
}

/// Native cursor style hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorHint {
    #[default]
    Crosshair,
    Move,
    Pointer,
    Default,
    /// Native cursor suppressed; an overlay is drawn instead.
    None,
}

impl CursorHint {
    /// CSS cursor keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorHint::Crosshair => "crosshair",
            CursorHint::Move => "move",
            CursorHint::Pointer => "pointer",
            CursorHint::Default => "default",
            CursorHint::None => "none",
        }
    }
}

/// Custom cursor element, in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorOverlay {
    Ring { center: Point, diameter: f64 },
}

/// Clamp a slider input into `min..=max` and round to whole steps.
pub(crate) fn slider_value(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.round().clamp(min, max)
}
