//! CLI commands.

pub mod check;
pub mod render;

use std::fs;
use std::process;

use weft::{Options, TagOverrides};

pub fn print_usage() {
    println!("Weft template compiler");
    println!();
    println!("Usage:");
    println!("  weft render <template> [--data <file.json>] [--var <name>] [--tags <file.json>]");
    println!("  weft check <template> [--var <name>] [--tags <file.json>]");
    println!("  weft <template>           (shorthand for render)");
    println!();
    println!("Options:");
    println!("  --data <file.json>   JSON data context (default: null)");
    println!("  --var <name>         data variable name inside the template (default: data)");
    println!("  --tags <file.json>   JSON object overriding tag markers");
}

/// Common arguments shared by `render` and `check`.
pub struct CommonArgs {
    pub template_path: String,
    pub data_path: Option<String>,
    pub options: Options,
}

/// Parse `<template> [--data f] [--var v] [--tags f]`, exiting on bad usage.
pub fn parse_common(args: &[String]) -> CommonArgs {
    let mut template_path = None;
    let mut data_path = None;
    let mut variable = None;
    let mut tags_path = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--data" => {
                data_path = Some(expect_value(args, i, "--data"));
                i += 2;
            }
            "--var" => {
                variable = Some(expect_value(args, i, "--var"));
                i += 2;
            }
            "--tags" => {
                tags_path = Some(expect_value(args, i, "--tags"));
                i += 2;
            }
            flag if flag.starts_with("--") => {
                eprintln!("Unknown option: {flag}");
                process::exit(1);
            }
            path => {
                if template_path.replace(path.to_string()).is_some() {
                    eprintln!("More than one template path given");
                    process::exit(1);
                }
                i += 1;
            }
        }
    }

    let Some(template_path) = template_path else {
        eprintln!("No template path given");
        process::exit(1);
    };

    let tags = match tags_path {
        Some(path) => read_tag_overrides(&path),
        None => TagOverrides::default(),
    };
    let mut options = Options { tags, ..Options::default() };
    if let Some(variable) = variable {
        options.variable = variable;
    }

    CommonArgs {
        template_path,
        data_path,
        options,
    }
}

fn expect_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("{flag} requires a value");
            process::exit(1);
        }
    }
}

fn read_tag_overrides(path: &str) -> TagOverrides {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: cannot read {path}: {e}");
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error: invalid tag overrides in {path}: {e}");
        process::exit(1);
    })
}
