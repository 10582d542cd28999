//! `styleform compile`

use serde_json::Value;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::compile::Compiler;
use crate::config::StyleformConfig;
use crate::parser::parse_stream;
use crate::style::TRANSFORM_MATRIX_KEY;

use super::{round_to, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the compile command.
///
/// Nothing is written unless every style compiles.
pub fn run_compile(
    input: Option<&Path>,
    output: Option<&Path>,
    config: &StyleformConfig,
) -> ExitCode {
    let reader: Box<dyn Read> = match input {
        Some(path) if path != Path::new("-") => match File::open(path) {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!("Error: Cannot open input file '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
        _ => Box::new(io::stdin()),
    };

    let parsed = parse_stream(reader);
    if let Some(warning) = parsed.warnings.first() {
        eprintln!("Error: line {}: {}", warning.line, warning.message);
        return ExitCode::from(EXIT_ERROR);
    }

    let compiler = Compiler::default();
    let mut rendered = String::new();
    for entry in &parsed.styles {
        let compiled = match compiler.compile(Some(&entry.style)) {
            Ok(Some(style)) => style,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("Error: line {}: {}", entry.line, e);
                return ExitCode::from(EXIT_ERROR);
            }
        };

        let mut value = match serde_json::to_value(&*compiled) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("Error: line {}: {}", entry.line, e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        round_matrix(&mut value, config.output.precision);

        let text = if config.output.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        match text {
            Ok(text) => {
                rendered.push_str(&text);
                rendered.push('\n');
            }
            Err(e) => {
                eprintln!("Error: line {}: {}", entry.line, e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }
    log::info!("compiled {} style(s) in {} mode", parsed.styles.len(), compiler.mode());

    let written = match output {
        Some(path) => std::fs::write(path, &rendered),
        None => io::stdout().write_all(rendered.as_bytes()),
    };
    if let Err(e) = written {
        eprintln!("Error: Cannot write output: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn round_matrix(style: &mut Value, precision: Option<u32>) {
    if precision.is_none() {
        return;
    }
    let Some(Value::Array(entries)) = style.get_mut(TRANSFORM_MATRIX_KEY) else {
        return;
    };
    for entry in entries.iter_mut() {
        if let Some(v) = entry.as_f64() {
            *entry = Value::from(round_to(v, precision));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_matrix_only_touches_matrix() {
        let mut style = json!({"opacity": 0.123456, "transformMatrix": [0.123456, -1e-20]});
        round_matrix(&mut style, Some(2));
        assert_eq!(style, json!({"opacity": 0.123456, "transformMatrix": [0.12, 0.0]}));
    }

    #[test]
    fn test_round_matrix_without_precision() {
        let mut style = json!({"transformMatrix": [0.123456]});
        round_matrix(&mut style, None);
        assert_eq!(style, json!({"transformMatrix": [0.123456]}));
    }
}
