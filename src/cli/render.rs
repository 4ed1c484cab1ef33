//! `weft render`: compile a template file and print its output.

use std::fs;
use std::process;

use weft::{render_path_with, Value};

use super::parse_common;

pub fn run(args: &[String]) {
    let common = parse_common(args);

    let data = match &common.data_path {
        Some(path) => read_data(path),
        None => Value::Null,
    };

    match render_path_with(&common.template_path, data, &common.options) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn read_data(path: &str) -> Value {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: cannot read {path}: {e}");
        process::exit(1);
    });
    let json: serde_json::Value = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error: invalid JSON in {path}: {e}");
        process::exit(1);
    });
    Value::from(json)
}
