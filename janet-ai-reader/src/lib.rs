//! janet-ai-reader: pull the relevant parts of a file with a language model
//!
//! Given a file and a natural-language query, the reader asks a model which
//! line ranges matter, then hands the answer to [`janet_ai_chunks`] to be
//! clamped to the file and merged into a clean, non-overlapping chunk list.
//!
//! ## Key Modules
//!
//! - **[`reader`]**: The [`Reader`] orchestrating one retrieval
//! - **[`finder`]**: The [`LineRangeFinder`] trait, the prompt and response parsing
//! - **[`remote`]**: OpenAI-compatible HTTP finder
//! - **[`tokens`]**: Token counting for the prompt budget
//! - **[`files`]**: File sources resolving paths to contents
//! - **[`tools`]**: The `read_file` agent tool
//! - **[`config`]** / **[`error`]**: Settings and the error taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use janet_ai_reader::{DirectoryFileSource, Reader, ReaderConfig, RemoteRangeFinder};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ReaderConfig::load_or_default(std::path::Path::new("."))?;
//! let finder = RemoteRangeFinder::new(config.clone())?;
//! let reader = Reader::from_config(Arc::new(finder), &config);
//!
//! let files = DirectoryFileSource::new(".");
//! let chunks = reader.read(&files, "src/lib.rs", "error handling").await?;
//! println!("{}", janet_ai_chunks::format_chunks(&chunks, false));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! FileSource → FileRef → LineRangeFinder → LineRanges
//!                                              ↓
//!          Vec<Chunk> ← merge ← clamp ← chunks_from_ranges
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod finder;
pub mod reader;
pub mod remote;
pub mod tokens;
pub mod tools;

pub use config::ReaderConfig;
pub use error::{ReaderError, Result};
pub use files::{DirectoryFileSource, FileSource, MemoryFileSource};
pub use finder::{LineRangeFinder, StaticRangeFinder, parse_line_ranges};
pub use reader::{ReadRequest, Reader};
pub use remote::RemoteRangeFinder;
