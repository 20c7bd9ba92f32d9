//! DEF override definitions
//!
//! A DEF file is a line-oriented text file that aliases one index onto
//! another. Each meaningful line holds an integer key followed by either a
//! single integer or a `{...}` group:
//!
//! ```text
//! # target  source(s)
//! 1200      {1201, 1202}
//! 44        45
//! ```

mod reader;
mod resolver;

pub use reader::{DefReader, DefRecord};
pub use resolver::{OverrideResolver, OverrideStats};
