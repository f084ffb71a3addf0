//! Wayboard Core Library
//!
//! Platform-agnostic annotation engine: a raster surface with snapshot
//! undo/redo, pluggable pointer tools, and the pins, transit lines and
//! groups those tools share.

pub mod color;
pub mod entities;
pub mod geometry;
pub mod history;
pub mod host;
pub mod input;
pub mod snap;
pub mod surface;
pub mod toolbar;
pub mod tools;
pub mod travel;

pub use color::{ColorParseError, SerializableColor};
pub use entities::{EntityStore, Group, GroupId, LineId, Pin, PinId, TransitLine};
pub use history::History;
pub use host::{HostConfig, SurfaceHost, ToolbarView};
pub use input::{ContainerBounds, PointerEvent, PointerKind};
pub use snap::{LineEnd, PIN_CLICK_RADIUS, PIN_SNAP_RADIUS};
pub use surface::{CompositeOp, RasterSurface, RenderContext, Snapshot, SurfaceError};
pub use toolbar::{ControlId, ControlInput, ControlKind, CursorHint, CursorOverlay, ToolbarControl};
pub use tools::{Tool, ToolContext, ToolEvent, ToolKind};
pub use travel::{TransitMode, TransitOption, pixels_to_km, transit_options};
