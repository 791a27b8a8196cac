//! Agent-facing tools built on the reader.
//!
//! `read_file` lets an agent pull the relevant parts of a file it has already
//! come across during an investigation.

pub mod known_files;
pub mod progress;
pub mod read_file;

pub use known_files::{KnownFiles, TrajectoryItem};
pub use progress::{NoProgress, ProgressReporter, TracingProgress};
pub use read_file::{ReadFileArgs, ReadFileTool};
