//! Naming module mapping a template and video attributes to filesystem paths.
//!
//! # Placeholders
//!
//! | placeholder | value |
//! |---|---|
//! | `%channelTitle%` | channel title |
//! | `%year%` | release year |
//! | `%month%` `%day%` `%hour%` `%minute%` `%second%` | release time fields, zero-padded to 2 |
//! | `%videoTitle%` | video title, `" - "` collapsed and slashes replaced |
//!
//! # Example
//!
//! ```ignore
//! use floatsync_core::naming::{TemplateValues, VideoPaths};
//!
//! let values = TemplateValues::new("Linus", "Ep 1 - Intro", released_at);
//! let paths = VideoPaths::resolve("%channelTitle%/%videoTitle%", &values, 1);
//! assert_eq!(paths.file_path(), Path::new("Linus/Ep 1 Intro"));
//! ```

mod paths;
mod sanitize;
mod template;

pub use paths::{part_suffix, VideoPaths, MUXED_EXTENSION, PARTIAL_EXTENSION};
pub use sanitize::sanitize_filename;
pub use template::{clean_video_title, format_template, TemplateValues};
