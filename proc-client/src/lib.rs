pub mod auth;
pub mod client;
pub mod config;
pub mod render;
pub mod response;
pub mod term;
pub mod wire;

use anyhow::{Result, anyhow};

pub use client::{Accept, ApiResponse, Client, DEFAULT_API_URL};
pub use render::OutputMode;
pub use term::{Operation, Program, Scalar, Term};

/// Parses repeatable `--arg key=value` options into ordered bindings.
///
/// Values parse as integer, then float, then boolean literal, and otherwise
/// stay strings. The value side may itself contain `=`.
pub fn parse_args(args: Vec<String>) -> Result<Vec<(String, Scalar)>> {
    args.into_iter()
        .map(|arg| {
            let Some((key, value)) = arg.split_once('=') else {
                return Err(anyhow!("invalid arg `{}'. Expected key=value", arg));
            };
            if key.is_empty() {
                return Err(anyhow!("invalid arg `{}'. Expected key=value", arg));
            }
            Ok((key.to_string(), parse_scalar(value)))
        })
        .collect()
}

fn parse_scalar(value: &str) -> Scalar {
    if let Ok(i) = value.parse::<i64>() {
        Scalar::Int(i)
    } else if let Ok(x) = value.parse::<f64>() {
        Scalar::Float(x)
    } else if value == "true" {
        Scalar::Bool(true)
    } else if value == "false" {
        Scalar::Bool(false)
    } else {
        Scalar::String(value.to_string())
    }
}
