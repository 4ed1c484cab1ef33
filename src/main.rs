//! Weft CLI

use std::env;

use tracing_subscriber::EnvFilter;

mod cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        cli::print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "render" => {
            if args.len() < 3 {
                eprintln!("Usage: weft render <template> [--data <file.json>] [--var <name>] [--tags <file.json>]");
                std::process::exit(1);
            }
            cli::render::run(&args[2..]);
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: weft check <template> [--var <name>] [--tags <file.json>]");
                std::process::exit(1);
            }
            cli::check::run(&args[2..]);
        }
        "-h" | "--help" | "help" => {
            cli::print_usage();
        }
        arg if !arg.starts_with('-') => {
            // Shorthand: weft file.weft = weft render file.weft
            cli::render::run(&args[1..]);
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            cli::print_usage();
            std::process::exit(1);
        }
    }
}
