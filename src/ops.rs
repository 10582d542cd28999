//! Transform operations
//!
//! Each operation is written as a single-key JSON object such as
//! `{"rotate": "90deg"}` or `{"translate": [10, 5]}`. Decoding checks the
//! value's type and shape in strict mode; fast mode coerces whatever it is
//! given, producing NaN for values it cannot read.

use serde_json::Value;

use crate::angle::{convert_to_radians, has_angle_unit};
use crate::error::CompileError;
use crate::matrix::Matrix4;
use crate::mode::BuildMode;

/// Supported operation names
pub const OPERATION_NAMES: [&str; 8] =
    ["matrix", "rotate", "scale", "scaleX", "scaleY", "translate", "translateX", "translateY"];

/// A single decoded transform operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// Raw matrix replacing the operation matrix (3x3 inputs are embedded)
    Matrix(Matrix4),
    /// Rotation about Z
    Rotate { radians: f64 },
    /// Uniform scale on X, Y and Z
    Scale(f64),
    ScaleX(f64),
    ScaleY(f64),
    /// Translation; `z` is present only for 3-component input
    Translate { x: f64, y: f64, z: Option<f64> },
    TranslateX(f64),
    TranslateY(f64),
}

impl TransformOp {
    /// Operation name as written in styles
    pub fn name(&self) -> &'static str {
        match self {
            TransformOp::Matrix(_) => "matrix",
            TransformOp::Rotate { .. } => "rotate",
            TransformOp::Scale(_) => "scale",
            TransformOp::ScaleX(_) => "scaleX",
            TransformOp::ScaleY(_) => "scaleY",
            TransformOp::Translate { .. } => "translate",
            TransformOp::TranslateX(_) => "translateX",
            TransformOp::TranslateY(_) => "translateY",
        }
    }

    /// Decode one operation from its JSON form.
    pub fn from_value(operation: &Value, mode: BuildMode) -> Result<Self, CompileError> {
        let fields = operation
            .as_object()
            .ok_or_else(|| CompileError::InvalidOperation(operation.to_string()))?;
        let (key, value) = fields
            .iter()
            .next()
            .ok_or_else(|| CompileError::InvalidOperation(operation.to_string()))?;
        let ctx = OpContext { key, value, operation, mode };

        match key.as_str() {
            "matrix" => ctx.matrix().map(TransformOp::Matrix),
            "rotate" => ctx.angle().map(|radians| TransformOp::Rotate { radians }),
            "scale" => ctx.number().map(TransformOp::Scale),
            "scaleX" => ctx.number().map(TransformOp::ScaleX),
            "scaleY" => ctx.number().map(TransformOp::ScaleY),
            "translate" => ctx.numbers().map(|v| TransformOp::Translate {
                x: v.first().copied().unwrap_or(0.0),
                y: v.get(1).copied().unwrap_or(0.0),
                z: v.get(2).copied(),
            }),
            "translateX" => ctx.number().map(TransformOp::TranslateX),
            "translateY" => ctx.number().map(TransformOp::TranslateY),
            _ => Err(CompileError::InvalidTransformName(key.clone())),
        }
    }

    /// Write this operation into `m`, which should start as identity.
    pub fn apply(&self, m: &mut Matrix4) {
        match *self {
            TransformOp::Matrix(raw) => *m = raw,
            TransformOp::Rotate { radians } => m.reuse_rotate_z_command(radians),
            TransformOp::Scale(factor) => m.reuse_scale_command(factor),
            TransformOp::ScaleX(factor) => m.reuse_scale_x_command(factor),
            TransformOp::ScaleY(factor) => m.reuse_scale_y_command(factor),
            TransformOp::Translate { x, y, z: Some(z) } => m.reuse_translate_3d_command(x, y, z),
            TransformOp::Translate { x, y, z: None } => m.reuse_translate_2d_command(x, y),
            TransformOp::TranslateX(x) => m.reuse_translate_2d_command(x, 0.0),
            TransformOp::TranslateY(y) => m.reuse_translate_2d_command(0.0, y),
        }
    }

    /// The operation's own matrix
    pub fn to_matrix(&self) -> Matrix4 {
        let mut m = Matrix4::identity();
        self.apply(&mut m);
        m
    }
}

struct OpContext<'a> {
    key: &'a str,
    value: &'a Value,
    operation: &'a Value,
    mode: BuildMode,
}

impl OpContext<'_> {
    fn invalid(&self, expected: &'static str) -> CompileError {
        CompileError::Validation {
            key: self.key.to_string(),
            value: self.value.to_string(),
            expected,
            operation: self.operation.to_string(),
        }
    }

    fn coerced(&self, what: &str) {
        log::warn!("transform '{}': coercing {} {} to NaN", self.key, what, self.value);
    }

    fn number(&self) -> Result<f64, CompileError> {
        match self.value.as_f64() {
            Some(n) => Ok(n),
            None if self.mode.validates() => Err(self.invalid("a number")),
            None => {
                self.coerced("non-numeric value");
                Ok(f64::NAN)
            }
        }
    }

    fn numbers(&self) -> Result<Vec<f64>, CompileError> {
        let Some(items) = self.value.as_array() else {
            if self.mode.validates() {
                return Err(self.invalid("an array of numbers"));
            }
            self.coerced("non-array value");
            return Ok(vec![f64::NAN]);
        };

        let mut numbers = Vec::with_capacity(items.len());
        for item in items {
            match item.as_f64() {
                Some(n) => numbers.push(n),
                None if self.mode.validates() => return Err(self.invalid("an array of numbers")),
                None => {
                    self.coerced("array element");
                    numbers.push(f64::NAN);
                }
            }
        }
        Ok(numbers)
    }

    fn matrix(&self) -> Result<Matrix4, CompileError> {
        let mut values = self.numbers()?;
        match values.len() {
            16 => Ok(Matrix4::from_slice(&values).unwrap_or_default()),
            9 => {
                let mut affine = [0.0; 9];
                affine.copy_from_slice(&values);
                Ok(Matrix4::from_affine_2d(&affine))
            }
            _ if self.mode.validates() => Err(self.invalid("an array of 9 (2d) or 16 (3d) numbers")),
            len => {
                log::warn!("transform 'matrix': {} values, padding to 16 with NaN", len);
                values.resize(16, f64::NAN);
                Ok(Matrix4::from_slice(&values).unwrap_or_default())
            }
        }
    }

    fn angle(&self) -> Result<f64, CompileError> {
        match self.value.as_str() {
            Some(s) if !self.mode.validates() || has_angle_unit(s) => Ok(convert_to_radians(s)),
            Some(_) => Err(self.invalid("an angle in degrees (deg) or radians (rad)")),
            None if self.mode.validates() => Err(self.invalid("a string")),
            None => {
                self.coerced("non-string angle");
                Ok(f64::NAN)
            }
        }
    }
}
