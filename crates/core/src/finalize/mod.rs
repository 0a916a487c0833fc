//! Finalization of downloaded videos.
//!
//! [`Finalizer::finalize`] remuxes every `.partial` file into its final
//! container, records the authoritative expected size and completion in the
//! channel, then removes the partials. A [`PostProcessHook`] can run a shell
//! command afterwards.

mod finalizer;
mod hook;

pub use finalizer::{FinalizeOptions, FinalizeReport, Finalizer};
pub use hook::{run_post_process, PostProcessHook};
