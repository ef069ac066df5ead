//! Snapshot support for island and archipelago state
//!
//! Snapshots can only be taken from joined islands. File persistence
//! requires the `checkpoint` feature.

#[cfg(feature = "checkpoint")]
mod recovery;
mod state;

#[cfg(feature = "checkpoint")]
pub use recovery::*;
pub use state::*;

/// Prelude for checkpoint module
pub mod prelude {
    #[cfg(feature = "checkpoint")]
    pub use super::recovery::*;
    pub use super::state::*;
}
