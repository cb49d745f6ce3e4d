//! Destination path templates.
//!
//! A path format is compiled into a [`Template`], checked against synthetic
//! releases so that distinct releases and tracks never share a path, and
//! then rendered per track through [`PathFormatter`].

mod error;
mod formatter;
mod funcs;
mod render;
mod template;
mod validate;

pub use error::{FormatError, RenderError};
pub use formatter::PathFormatter;
pub use funcs::{safe_path, Func};
pub use render::PathData;
pub use template::{Field, Template};
