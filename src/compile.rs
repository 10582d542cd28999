//! Transform compilation
//!
//! Replaces a style's `transform` list with the equivalent 4x4 matrix under
//! `transformMatrix`. Operations are post-multiplied in list order onto an
//! identity accumulator, so each one acts in the local space left by the
//! operations before it.

use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::error::CompileError;
use crate::matrix::Matrix4;
use crate::mode::BuildMode;
use crate::ops::TransformOp;
use crate::style::{Style, TRANSFORM_KEY, TRANSFORM_MATRIX_KEY};

/// One step of a composition, as reported by [`Compiler::explain`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionStep {
    /// The decoded operation
    pub op: TransformOp,
    /// The operation's own matrix
    pub matrix: Matrix4,
    /// Running product after this operation
    pub accumulated: Matrix4,
}

/// Compiles style transform lists under a fixed [`BuildMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compiler {
    mode: BuildMode,
}

impl Compiler {
    pub fn new(mode: BuildMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Compile a style.
    ///
    /// A missing style, or one without `transform` (or with a `null` one),
    /// comes back borrowed and untouched. Otherwise a new style is returned with `transform`
    /// replaced by `transformMatrix`; in strict mode it is frozen.
    pub fn compile<'a>(
        &self,
        style: Option<&'a Style>,
    ) -> Result<Option<Cow<'a, Style>>, CompileError> {
        let Some(style) = style else {
            return Ok(None);
        };
        let transform = match style.get(TRANSFORM_KEY) {
            None | Some(Value::Null) => return Ok(Some(Cow::Borrowed(style))),
            Some(transform) => transform,
        };
        if style.contains_key(TRANSFORM_MATRIX_KEY) {
            return Err(CompileError::Conflict);
        }

        let ops = transform
            .as_array()
            .ok_or_else(|| CompileError::InvalidTransformList(transform.to_string()))?;
        let matrix = self.compose(ops)?;
        if matrix.has_non_finite() {
            log::warn!("transformMatrix contains non-finite values: {:?}", matrix.data);
        }

        let mut props: Map<String, Value> = style
            .iter()
            .filter(|(key, _)| key.as_str() != TRANSFORM_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        props.insert(TRANSFORM_MATRIX_KEY.to_string(), matrix_to_value(&matrix));

        let mut compiled = Style::from(props);
        if self.mode.freezes() {
            compiled.freeze();
        }
        log::debug!("compiled {} transform operation(s) in {} mode", ops.len(), self.mode);
        Ok(Some(Cow::Owned(compiled)))
    }

    /// Compose a list of JSON operations into one matrix.
    pub fn compose(&self, ops: &[Value]) -> Result<Matrix4, CompileError> {
        self.fold(ops, |_, _, _| {})
    }

    /// Compose like [`Compiler::compose`], recording every intermediate step.
    pub fn explain(&self, ops: &[Value]) -> Result<Vec<CompositionStep>, CompileError> {
        let mut steps = Vec::with_capacity(ops.len());
        self.fold(ops, |op, matrix, accumulated| {
            steps.push(CompositionStep { op: *op, matrix: *matrix, accumulated: *accumulated });
        })?;
        Ok(steps)
    }

    fn fold<F>(&self, ops: &[Value], mut visit: F) -> Result<Matrix4, CompileError>
    where
        F: FnMut(&TransformOp, &Matrix4, &Matrix4),
    {
        let mut result = Matrix4::identity();
        for operation in ops {
            let op = TransformOp::from_value(operation, self.mode)?;
            let mut m = Matrix4::identity();
            op.apply(&mut m);
            result.post_multiply(&m);
            log::trace!("applied {} -> {:?}", op.name(), result.data);
            visit(&op, &m, &result);
        }
        Ok(result)
    }
}

/// Uses the process-wide [`BuildMode::current`].
impl Default for Compiler {
    fn default() -> Self {
        Self::new(BuildMode::current())
    }
}

/// Compile a style using the process-wide mode.
pub fn compile(style: Option<&Style>) -> Result<Option<Cow<'_, Style>>, CompileError> {
    Compiler::default().compile(style)
}

/// Compose a transform list using the given mode.
pub fn compose(ops: &[Value], mode: BuildMode) -> Result<Matrix4, CompileError> {
    Compiler::new(mode).compose(ops)
}

fn matrix_to_value(matrix: &Matrix4) -> Value {
    Value::Array(matrix.data.iter().map(|&v| Value::from(v)).collect())
}
