//! jaml command-line tool for converting between Y (YAML-family) and J
//! (JSON-family) documents.
//!
//! Usage: jaml [OPTIONS] [FILE]
//!
//! Options:
//!   -t, --to <FORMAT>          Output format (json, yaml) [default: json]
//!       --minify               Flatten J output to one line
//!       --check                Check if the input converts (exit 0/1)
//!       --indent <N>           Spaces per nesting level
//!       --yes-no-bool          Treat yes/no as booleans
//!       --allow-duplicate-keys Permit duplicate mapping keys
//!   -o, --output <FILE>        Write output to a file instead of stdout
//!   -h, --help                 Print help
//!   -V, --version              Print version

use libjaml::{json_to_yaml, minify_json, yaml_to_json, Options};
use std::fs;
use std::io::{self, Read, Write};
use std::process;

/// Check whether a string is a recognized format name for -t.
fn is_format_name(s: &str) -> bool {
    matches!(s, "json" | "yaml" | "yml")
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut to_format: Option<&str> = None;
    let mut minify = false;
    let mut check_only = false;
    let mut output_file: Option<&str> = None;
    let mut input_path: Option<&str> = None;
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("jaml {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                if !is_format_name(&args[i]) {
                    eprintln!("Error: Unknown format: {}", args[i]);
                    process::exit(1);
                }
                to_format = Some(&args[i]);
            }
            "--minify" => {
                minify = true;
            }
            "--check" => {
                check_only = true;
            }
            "--indent" => {
                i += 1;
                let value = args.get(i).and_then(|s| s.parse::<usize>().ok());
                match value {
                    Some(n) if n <= 8 => options.indent = n,
                    _ => {
                        eprintln!("Error: --indent requires a number between 0 and 8");
                        process::exit(1);
                    }
                }
            }
            "--yes-no-bool" => {
                options.yes_no_bool = true;
            }
            "--allow-duplicate-keys" => {
                options.allow_duplicate_keys = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "-" => {
                // Explicit stdin; input_path stays None.
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            arg => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input files not supported");
                    process::exit(1);
                }
                input_path = Some(arg);
            }
        }
        i += 1;
    }

    let input = match read_input(input_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Default direction: Y in, J out; a .json input flips it.
    let to = to_format.unwrap_or_else(|| {
        if input_path.map_or(false, |p| p.ends_with(".json")) {
            "yaml"
        } else {
            "json"
        }
    });

    let result = match to {
        "yaml" | "yml" => json_to_yaml(&input, &options),
        _ => yaml_to_json(&input, &options).map(|text| {
            if minify {
                minify_json(&text)
            } else {
                text
            }
        }),
    };

    match result {
        Ok(_) if check_only => {}
        Ok(text) => {
            if let Err(e) = write_output(output_file, &text) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            if !check_only {
                eprintln!("Error: {}", e);
            }
            process::exit(1);
        }
    }
}

/// Read the input document from a file or stdin.
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Write the converted document to a file or stdout.
fn write_output(path: Option<&str>, text: &str) -> io::Result<()> {
    match path {
        Some(path) => {
            let mut data = text.to_string();
            if !data.ends_with('\n') {
                data.push('\n');
            }
            fs::write(path, data)
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{}", text)
        }
    }
}

fn print_help() {
    println!("jaml - convert between YAML-family and JSON-family documents");
    println!();
    println!("Usage: jaml [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -t, --to <FORMAT>          Output format (json, yaml) [default: json,");
    println!("                             or yaml when the input file ends in .json]");
    println!("      --minify               Flatten J output to one line");
    println!("      --check                Check if the input converts (exit 0 if it");
    println!("                             does, 1 if not)");
    println!("      --indent <N>           Spaces per nesting level (0-8 for json,");
    println!("                             2-8 for yaml)");
    println!("      --yes-no-bool          Treat yes/no as booleans");
    println!("      --allow-duplicate-keys Permit duplicate mapping keys");
    println!("  -o, --output <FILE>        Write output to a file instead of stdout");
    println!("  -h, --help                 Print help");
    println!("  -V, --version              Print version");
    println!();
    println!("Reads from stdin when FILE is omitted or \"-\".");
}
