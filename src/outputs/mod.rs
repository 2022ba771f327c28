//! Output generation for a finished digest.
//!
//! # Submodules
//!
//! - [`json`]: Writes the `DailyDigest` to a JSON file for API consumption
//! - [`markdown`]: Renders the `DailyDigest` as a readable Markdown document
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── digest_<millis>_<suffix>.json
//!
//! markdown_output_dir/
//! └── 2025-05-06_digest.md
//! ```
//!
//! Both are renditions of a digest already in memory; nothing is read back.

pub mod json;
pub mod markdown;
