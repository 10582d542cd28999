//! Styleform - compiles style transform lists into 4x4 matrices
//!
//! A style record may carry a `transform` list of single-key operations
//! (`rotate`, `scale`, `translate`, `matrix`, ...). Compiling the style
//! replaces that list with the equivalent column-major 4x4 matrix under
//! `transformMatrix`.
//!
//! ```
//! use styleform::{BuildMode, Compiler, Style};
//!
//! let style: Style = serde_json::from_str(r#"{"transform": [{"scale": 2}]}"#).unwrap();
//! let compiled = Compiler::new(BuildMode::Strict).compile(Some(&style)).unwrap().unwrap();
//! assert_eq!(compiled.transform_matrix().unwrap().data[0], 2.0);
//! ```

pub mod angle;
pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod matrix;
pub mod mode;
pub mod ops;
pub mod parser;
pub mod style;

pub use compile::{compile, compose, Compiler, CompositionStep};
pub use error::{CompileError, StyleError};
pub use matrix::Matrix4;
pub use mode::BuildMode;
pub use ops::TransformOp;
pub use style::{Style, TRANSFORM_KEY, TRANSFORM_MATRIX_KEY};
