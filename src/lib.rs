//! Badminton court formation editing: an undoable history of marker
//! positions with drag coalescing, plus durable named formations.
//!
//! # Examples
//!
//! Recording one drag gesture with [`core::history::PositionHistory`]:
//! ```
//! use courtboard::{
//!     core::history::PositionHistory,
//!     types::{CourtSize, GameMode, MarkerId, Position},
//! };
//!
//! let history = PositionHistory::new(GameMode::Singles, CourtSize::new(100.0, 100.0))
//!     .begin_drag(MarkerId::Shuttle, Position::new(60.0, 60.0))
//!     .update_drag(MarkerId::Shuttle, Position::new(70.0, 70.0))
//!     .update_drag(MarkerId::Shuttle, Position::new(80.0, 80.0))
//!     .end_drag();
//!
//! assert_eq!(history.len(), 2);
//! assert!(history.can_undo());
//! assert_eq!(history.ghost_positions().map(|g| g.shuttle), Some(Position::new(50.0, 50.0)));
//! ```
//!
//! Saving through the async library with a directory-backed store:
//! ```no_run
//! use courtboard::{
//!     persist::{open_formation_store, BackendConfig},
//!     runtime::{
//!         handle::{spawn_library, LibraryConfig},
//!         session::CourtSession,
//!     },
//!     types::{CourtSize, GameMode},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = open_formation_store(&BackendConfig::Directory { root: "docs".into() })
//!     .expect("open store");
//! let library = spawn_library(store, LibraryConfig::default());
//! let court = CourtSize::new(390.0, 700.0);
//! let mut session = CourtSession::new(library.clone(), GameMode::Doubles, court);
//! let saved = session.on_save_formation("Serve receive").await.expect("save");
//! assert_eq!(library.list().await.expect("list")[0].id, saved.id);
//! library.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Court bounds and the position-history engine.
pub mod core;
/// Marker appearance settings.
pub mod customization;
/// Saved formation records and their persisted shape.
pub mod formation;
/// Storage contracts and formation store implementations.
pub mod persist;
/// Async formation library, court session, and events.
pub mod runtime;
/// Court snapshots and default layouts.
pub mod snapshot;
/// Shared primitive types.
pub mod types;
