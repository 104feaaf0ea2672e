use std::fs;
use std::io::{self, IsTerminal, Read};

use vernacular::{Interpreter, RuntimeError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_error(err: &RuntimeError) {
    eprintln!("vernacular: {}", err.message);
    if let Some(line) = err.line {
        eprintln!("vernacular: at line {}", line);
    }
    if let Some(hint) = &err.hint {
        eprintln!("vernacular: hint: {}", hint);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut repl_flag = false;
    let mut verbose = false;
    let mut filtered_args: Vec<String> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "--repl" => repl_flag = true,
            "-v" | "--verbose" => verbose = true,
            "--version" => {
                println!("Vernacular {} - natural language scripting runtime", VERSION);
                return;
            }
            other => filtered_args.push(other.to_string()),
        }
    }

    if repl_flag || (filtered_args.is_empty() && io::stdin().is_terminal()) {
        vernacular::repl::run_repl();
        return;
    }

    let (source, program_name) = if !filtered_args.is_empty() && filtered_args[0] == "-e" {
        if filtered_args.len() < 2 {
            eprintln!("Usage: {} -e <code>", args[0]);
            std::process::exit(1);
        }
        (filtered_args[1].clone(), "-e".to_string())
    } else if !filtered_args.is_empty() {
        let path = &filtered_args[0];
        if !path.ends_with(".vern") {
            eprintln!("Warning: Script file should have .vern extension");
        }
        let content = fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("Failed to read {}: {}", path, err);
            std::process::exit(1);
        });
        (content, path.clone())
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).unwrap_or_else(|err| {
            eprintln!("Failed to read stdin: {}", err);
            std::process::exit(1);
        });
        (buf, "<stdin>".to_string())
    };

    if verbose {
        eprintln!("Executing script: {}", program_name);
    }
    println!("=== Executing Vernacular Script: {} ===", program_name);
    println!();

    let mut interp = Interpreter::new();
    match interp.run_script(&source) {
        Ok(output) => {
            print!("{}", output);
        }
        Err(err) => {
            print!("{}", interp.take_output());
            print_error(&err);
            std::process::exit(1);
        }
    }
}
