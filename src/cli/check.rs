//! `weft check`: compile a template file without rendering it.

use std::fs;
use std::process;

use weft::Template;

use super::parse_common;

pub fn run(args: &[String]) {
    let common = parse_common(args);

    let template = fs::read_to_string(&common.template_path).unwrap_or_else(|e| {
        eprintln!("error: cannot read {}: {e}", common.template_path);
        process::exit(1);
    });

    match Template::compile(&template, &common.options) {
        Ok(_) => println!("{}: ok", common.template_path),
        Err(e) => {
            eprintln!("{}: error: {e}", common.template_path);
            process::exit(1);
        }
    }
}
