//! `styleform matrix` and `styleform explain`

use serde_json::Value;
use std::process::ExitCode;

use crate::compile::Compiler;
use crate::config::StyleformConfig;
use crate::matrix::Matrix4;

use super::{round_to, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

fn parse_transform_arg(text: &str) -> Result<Vec<Value>, String> {
    match json5::from_str::<Value>(text) {
        Ok(Value::Array(ops)) => Ok(ops),
        Ok(other) => Err(format!("transform must be a JSON array, got {}", other)),
        Err(e) => Err(format!("cannot parse transform: {}", e)),
    }
}

/// Format a matrix as four rows.
pub(crate) fn format_grid(m: &Matrix4, precision: Option<u32>, indent: &str) -> String {
    let decimals = precision.unwrap_or(4) as usize;
    m.rows()
        .iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .map(|&v| format!("{:>12.*}", decimals, round_to(v, precision)))
                .collect();
            format!("{}[{}]", indent, cells.join(""))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_values(m: &Matrix4, precision: Option<u32>) -> String {
    let values: Vec<Value> = m.data.iter().map(|&v| Value::from(round_to(v, precision))).collect();
    Value::Array(values).to_string()
}

/// Execute the matrix command
pub fn run_matrix(transform: &str, grid: bool, config: &StyleformConfig) -> ExitCode {
    let ops = match parse_transform_arg(transform) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    match Compiler::default().compose(&ops) {
        Ok(m) => {
            if grid {
                println!("{}", format_grid(&m, config.output.precision, ""));
            } else {
                println!("{}", format_values(&m, config.output.precision));
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the explain command
pub fn run_explain(transform: &str, config: &StyleformConfig) -> ExitCode {
    let ops = match parse_transform_arg(transform) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let compiler = Compiler::default();
    let steps = match compiler.explain(&ops) {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let precision = config.output.precision;
    println!("{} operation(s), {} mode", steps.len(), compiler.mode());
    for (i, (step, raw)) in steps.iter().zip(ops.iter()).enumerate() {
        println!();
        println!("{}. {} {}", i + 1, step.op.name(), raw);
        println!("   operation:");
        println!("{}", format_grid(&step.matrix, precision, "   "));
        println!("   result:");
        println!("{}", format_grid(&step.accumulated, precision, "   "));
    }
    if steps.is_empty() {
        println!();
        println!("result:");
        println!("{}", format_grid(&Matrix4::IDENTITY, precision, ""));
    }

    ExitCode::from(EXIT_SUCCESS)
}
