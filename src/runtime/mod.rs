//! Async formation library, court session, and event stream APIs.

/// Event stream types emitted by the library and sessions.
pub mod events;
/// Formation library handle and command loop implementation.
pub mod handle;
/// Court session bridging marker callbacks to history and library.
pub mod session;
