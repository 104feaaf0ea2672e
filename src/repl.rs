//! Interactive read-eval-print loop.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::Interpreter;

/// Outcome of one REPL line.
enum LineResult {
    Done,
    Quit,
}

/// Process a single REPL line. This is the testable core of the loop --
/// it has no terminal dependencies beyond the `Interpreter`.
fn process_line(interp: &mut Interpreter, line: &str) -> LineResult {
    let command = line.trim();
    if command.is_empty() {
        return LineResult::Done;
    }
    if ["quit", "exit", "bye"].contains(&command.to_lowercase().as_str()) {
        return LineResult::Quit;
    }
    if let Err(err) = interp.process_command(command) {
        eprintln!("Fatal error: {}", err);
    }
    let output = interp.take_output();
    if !output.is_empty() {
        print!("{}", output);
    }
    println!();
    LineResult::Done
}

pub fn run_repl() {
    println!("=== Vernacular REPL ===");
    println!("Type commands in plain English. Type 'quit' to exit, 'help' for commands.");
    println!();

    let mut interp = Interpreter::new();
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("Failed to initialize line editor: {}", err);
            return;
        }
    };

    loop {
        match editor.readline(">>> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                match process_line(&mut interp, &line) {
                    LineResult::Done => {}
                    LineResult::Quit => {
                        println!("Goodbye!");
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }
}
