//! Pins, transit lines and groups shared by the annotation tools.

use crate::color::SerializableColor;
use crate::travel::TransitOption;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PinId = Uuid;
pub type LineId = Uuid;
pub type GroupId = Uuid;

/// Label given to pins placed with a blank label.
pub const DEFAULT_PIN_LABEL: &str = "Location";

/// A labeled location marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub position: Point,
    pub label: String,
    pub color: SerializableColor,
}

impl Pin {
    pub fn new(position: Point, label: impl Into<String>, color: SerializableColor) -> Self {
        let label = label.into();
        let label = if label.trim().is_empty() {
            DEFAULT_PIN_LABEL.to_string()
        } else {
            label
        };
        Self {
            id: Uuid::new_v4(),
            position,
            label,
            color,
        }
    }
}

/// A committed connection between two different pins.
///
/// Immutable after creation except for the selected option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitLine {
    pub id: LineId,
    pub start_pin: PinId,
    pub end_pin: PinId,
    pub start: Point,
    pub end: Point,
    /// Distance in display kilometres.
    pub distance: u32,
    pub options: Vec<TransitOption>,
    pub selected_option_index: Option<usize>,
}

impl TransitLine {
    pub fn selected_option(&self) -> Option<&TransitOption> {
        self.options.get(self.selected_option_index?)
    }
}

/// A named, colored set of pin ids. Does not own its pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub color: SerializableColor,
    pub label: String,
    pub pin_ids: Vec<PinId>,
}

/// Append-mostly entity collections, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pins: Vec<Pin>,
    lines: Vec<TransitLine>,
    groups: Vec<Group>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pin and return its id.
    pub fn add_pin(&mut self, pin: Pin) -> PinId {
        let id = pin.id;
        log::debug!("Added pin {} {:?} at {:?}", id, pin.label, pin.position);
        self.pins.push(pin);
        id
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }

    pub fn pin_mut(&mut self, id: PinId) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|p| p.id == id)
    }

    /// Index of a pin in creation order.
    pub fn pin_index(&self, id: PinId) -> Option<usize> {
        self.pins.iter().position(|p| p.id == id)
    }

    /// Move a pin. Returns false if the pin does not exist.
    pub fn move_pin(&mut self, id: PinId, position: Point) -> bool {
        match self.pin_mut(id) {
            Some(pin) => {
                pin.position = position;
                true
            }
            None => false,
        }
    }

    /// Replace a pin's label. Returns false if the pin does not exist.
    pub fn set_pin_label(&mut self, id: PinId, label: impl Into<String>) -> bool {
        match self.pin_mut(id) {
            Some(pin) => {
                pin.label = label.into();
                true
            }
            None => false,
        }
    }

    pub fn add_line(&mut self, line: TransitLine) -> LineId {
        let id = line.id;
        log::debug!("Added transit line {} ({} km)", id, line.distance);
        self.lines.push(line);
        id
    }

    pub fn lines(&self) -> &[TransitLine] {
        &self.lines
    }

    pub fn line(&self, id: LineId) -> Option<&TransitLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Change the selected option of a committed line.
    /// Returns false if the line does not exist or `index` is out of range.
    pub fn select_transit_option(&mut self, id: LineId, index: usize) -> bool {
        match self.lines.iter_mut().find(|l| l.id == id) {
            Some(line) if index < line.options.len() => {
                line.selected_option_index = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Add a group and return its id.
    pub fn add_group(&mut self, color: SerializableColor, label: impl Into<String>, pin_ids: Vec<PinId>) -> GroupId {
        let group = Group {
            id: Uuid::new_v4(),
            color,
            label: label.into(),
            pin_ids,
        };
        let id = group.id;
        log::debug!("Created group {} {:?} with {} pins", id, group.label, group.pin_ids.len());
        self.groups.push(group);
        id
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Remove a group. Its pins are untouched.
    pub fn remove_group(&mut self, id: GroupId) -> Option<Group> {
        let index = self.groups.iter().position(|g| g.id == id)?;
        Some(self.groups.remove(index))
    }

    pub fn rename_group(&mut self, id: GroupId, label: impl Into<String>) -> bool {
        match self.groups.iter_mut().find(|g| g.id == id) {
            Some(group) => {
                group.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Pins of a group that still exist, in group order.
    pub fn group_pins(&self, id: GroupId) -> impl Iterator<Item = &Pin> + '_ {
        self.group(id)
            .into_iter()
            .flat_map(|g| g.pin_ids.iter())
            .filter_map(|&pin_id| self.pin(pin_id))
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty() && self.lines.is_empty() && self.groups.is_empty()
    }

    /// Serialize all entities to JSON for inspection.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::travel::transit_options;

    fn pin_at(x: f64, y: f64) -> Pin {
        Pin::new(Point::new(x, y), "Rome, Italy", SerializableColor::rgb(255, 0, 0))
    }

    #[test]
    fn test_blank_label_defaults() {
        let pin = Pin::new(Point::ZERO, "   ", SerializableColor::black());
        assert_eq!(pin.label, DEFAULT_PIN_LABEL);
    }

    #[test]
    fn test_pins_keep_creation_order() {
        let mut store = EntityStore::new();
        let a = store.add_pin(pin_at(0.0, 0.0));
        let b = store.add_pin(pin_at(10.0, 0.0));
        assert_eq!(store.pin_index(a), Some(0));
        assert_eq!(store.pin_index(b), Some(1));
    }

    #[test]
    fn test_move_and_relabel() {
        let mut store = EntityStore::new();
        let id = store.add_pin(pin_at(0.0, 0.0));
        assert!(store.move_pin(id, Point::new(5.0, 6.0)));
        assert!(store.set_pin_label(id, "Paris, France"));
        let pin = store.pin(id).unwrap();
        assert_eq!(pin.position, Point::new(5.0, 6.0));
        assert_eq!(pin.label, "Paris, France");
        assert!(!store.move_pin(Uuid::new_v4(), Point::ZERO));
    }

    #[test]
    fn test_select_transit_option() {
        let mut store = EntityStore::new();
        let options = transit_options(50);
        let id = store.add_line(TransitLine {
            id: Uuid::new_v4(),
            start_pin: Uuid::new_v4(),
            end_pin: Uuid::new_v4(),
            start: Point::ZERO,
            end: Point::new(100.0, 0.0),
            distance: 50,
            options: options.clone(),
            selected_option_index: None,
        });
        assert!(store.select_transit_option(id, 1));
        assert_eq!(store.line(id).unwrap().selected_option(), Some(&options[1]));
        assert!(!store.select_transit_option(id, options.len()));
    }

    #[test]
    fn test_removing_group_keeps_pins() {
        let mut store = EntityStore::new();
        let a = store.add_pin(pin_at(0.0, 0.0));
        let b = store.add_pin(pin_at(50.0, 0.0));
        let group = store.add_group(SerializableColor::rgb(255, 215, 0), "Europe", vec![a, b]);
        assert_eq!(store.group_pins(group).count(), 2);

        assert!(store.rename_group(group, "Italy"));
        assert_eq!(store.group(group).unwrap().label, "Italy");

        let removed = store.remove_group(group).unwrap();
        assert_eq!(removed.pin_ids, vec![a, b]);
        assert_eq!(store.pins().len(), 2);
        assert!(store.groups().is_empty());
        assert!(store.remove_group(group).is_none());
    }

    #[test]
    fn test_group_pins_skip_missing_ids() {
        let mut store = EntityStore::new();
        let a = store.add_pin(pin_at(0.0, 0.0));
        let group = store.add_group(SerializableColor::black(), "G", vec![Uuid::new_v4(), a]);
        let pins: Vec<_> = store.group_pins(group).map(|p| p.id).collect();
        assert_eq!(pins, vec![a]);
    }

    #[test]
    fn test_to_json() {
        let mut store = EntityStore::new();
        store.add_pin(pin_at(1.0, 2.0));
        let json = store.to_json().unwrap();
        assert!(json.contains("Rome, Italy"));
        let parsed: EntityStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store);
    }
}
