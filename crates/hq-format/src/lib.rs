//! hq-format - human-readable rendering of daemon values.
//!
//! Pure functions from machine values (`serde_json::Value`) to display
//! strings, dispatched by [`TypeTag`]. Process-dependent inputs (home
//! directory, byte base) come in through an explicit [`FormatConfig`].
//!
//! # Example
//!
//! ```
//! use hq_format::{FormatConfig, TypeTag};
//! use serde_json::json;
//!
//! let cfg = FormatConfig::default().with_home_dir("/home/alice");
//! assert_eq!(TypeTag::BytesSize.prettify(&json!(1073741824), &cfg), "1.00 GiB");
//! assert_eq!(TypeTag::Ratio.prettify(&json!(-1), &cfg), "n/a");
//! assert_eq!(TypeTag::Percent.prettify(&json!(0.55432), &cfg), "55 %");
//! assert_eq!(TypeTag::PathDir.prettify(&json!("/home/alice/dl"), &cfg), "~/dl/");
//! ```

pub mod bytes;
pub mod config;
pub mod error;
pub mod human;
pub mod type_tag;

pub use bytes::{format_bytes, format_rate};
pub use config::{ByteBase, FormatConfig};
pub use error::Error;
pub use type_tag::TypeTag;
