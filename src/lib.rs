#![warn(clippy::all, rust_2018_idioms)]

//! Raster annotation engine: an in-memory edit log of strokes and pasted
//! pixel regions over a fixed base image, a deterministic full-recompute
//! compositor (including order-dependent blur/pixelate brushes), and the
//! hit-testing and pointer state machine that make every edit selectable,
//! draggable, resizable and erasable after the fact.

pub mod document;
pub mod edit;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod hit_testing;
pub mod id_generator;
pub mod input;
pub mod interaction;
pub mod region_cache;
pub mod render;
pub mod tools;

pub use document::EditLog;
pub use edit::{Edit, EditRef, PastedRegion, StrokeAction, ToolKind};
pub use editor::Editor;
pub use error::EngineError;
pub use hit_testing::{EditKind, EraseHit, Handle, SelectHit};
pub use id_generator::generate_id;
pub use input::{PointerEvent, SurfaceMapping};
pub use interaction::{EditorContext, InteractionController, MIN_EDIT_SIZE};
pub use region_cache::RegionCache;
pub use render::{Compositor, FeedbackState};
pub use tools::{Tool, ToolSettings};
