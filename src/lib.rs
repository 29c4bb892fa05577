//! Temporal snapping engine for travel itinerary canvases.
//!
//! Blocks (flights, hotels, activities, free-form notes) sit on a horizontal
//! time axis where `x` is derived from time. While a block is dragged, the
//! engine decides whether it nests into a compatible parent, where it lands,
//! and which scheduling conflicts the placement would create. It also groups
//! nested blocks for combined labels.
//!
//! The placement core ([`snap`], [`conflict`], [`relationships`]) is pure and
//! synchronous. [`store`], [`drag`] and [`document`] wrap it with state and
//! I/O, and the `tripsnap` binary (feature `cli`) inspects trip files.

pub mod config;
pub mod conflict;
pub mod connections;
pub mod containment;
pub mod document;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod label;
pub mod model;
pub mod relationships;
pub mod snap;
pub mod store;
pub mod timeline;

pub use config::SnapConfig;
pub use conflict::{Conflict, ConflictType, PlacementValidation, Severity, detect_conflicts};
pub use document::TripDocument;
pub use error::{StoreError, TimelineError};
pub use model::{Block, BlockDetails, BlockKind};
pub use relationships::{BlockRelationship, group_relationships};
pub use snap::{SnapResult, SnapType, find_snap_target};
pub use timeline::{TimeRange, TripTimeline};
