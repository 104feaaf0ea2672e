use vernacular::{Interpreter, Value};

fn path_in(dir: &tempfile::TempDir, name: &str) -> String {
    dir.path().join(name).display().to_string()
}

#[test]
fn text_file_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = path_in(&dir, "note.txt");
    let mut interp = Interpreter::new();

    interp
        .process_command(&format!("save \"hello world\" to {}", path))
        .unwrap();
    interp.process_command(&format!("read {}", path)).unwrap();
    interp
        .process_command(&format!("check if file {} exists", path))
        .unwrap();
    interp
        .process_command(&format!("delete file {}", path))
        .unwrap();
    interp
        .process_command(&format!("does file {} exist", path))
        .unwrap();

    let output = interp.take_output();
    assert!(output.contains(&format!("Saved text to '{}'", path)));
    assert!(output.contains("hello world\n"));
    assert!(output.contains(&format!("File '{}' exists", path)));
    assert!(output.contains(&format!("File '{}' deleted successfully", path)));
    assert!(output.contains(&format!("File '{}' does not exist", path)));
}

#[test]
fn copy_requires_an_existing_source() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = path_in(&dir, "missing.txt");
    let target = path_in(&dir, "target.txt");
    let mut interp = Interpreter::new();

    let outcome = interp
        .process_command(&format!("copy file {} to {}", missing, target))
        .unwrap();
    assert!(outcome.is_none());
    assert!(interp
        .take_output()
        .contains(&format!("Error: Source file '{}' does not exist!", missing)));
}

#[test]
fn csv_create_append_read() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = path_in(&dir, "people.csv");
    let mut interp = Interpreter::new();

    interp
        .process_command(&format!(
            "create a CSV file {} with headers name, age, city",
            path
        ))
        .unwrap();
    interp
        .process_command(&format!("add row John, 25, NYC to CSV {}", path))
        .unwrap();
    interp
        .process_command(&format!("read the CSV file {}", path))
        .unwrap();

    let output = interp.take_output();
    assert!(output.contains("with headers: ['name', 'age', 'city']"));
    assert!(output.contains("Added row ['John', '25', 'NYC']"));
    assert!(output.contains("  Row 1: ['name', 'age', 'city']"));
    assert!(output.contains("  Row 2: ['John', '25', 'NYC']"));
}

#[test]
fn json_list_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = path_in(&dir, "items.json");
    let mut interp = Interpreter::new();

    interp
        .process_command("create list items with 1, two, 3")
        .unwrap();
    interp
        .process_command(&format!("save list items to {}", path))
        .unwrap();
    interp
        .process_command(&format!("load list from {}", path))
        .unwrap();

    let output = interp.take_output();
    assert!(output.contains(&format!("Saved list 'items' to '{}'", path)));
    assert!(output.contains("Loaded list from"));
    assert_eq!(
        interp.context().current_list,
        vec![Value::Int(1), Value::Str("two".to_string()), Value::Int(3)]
    );
}

#[test]
fn xml_round_trip_restores_variables_and_lists() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = path_in(&dir, "state.xml");
    let mut interp = Interpreter::new();

    interp.process_command("set count to 5").unwrap();
    interp.process_command("set rate to 2.5").unwrap();
    interp.process_command("set name to \"Ada\"").unwrap();
    interp
        .process_command("create list xs with 1, 2")
        .unwrap();
    interp
        .process_command(&format!("save data to {}", path))
        .unwrap();
    interp.process_command("reset everything").unwrap();
    assert!(interp.context().variables.is_empty());

    interp
        .process_command(&format!("load data from {}", path))
        .unwrap();
    let output = interp.take_output();
    assert!(output.contains("Saved: 3 variables, 1 lists"));
    assert!(output.contains("Loaded: 3 variables, 1 lists"));

    let ctx = interp.context();
    assert_eq!(ctx.variables["count"], Value::Int(5));
    assert_eq!(ctx.variables["rate"], Value::Float(2.5));
    assert_eq!(ctx.variables["name"], Value::Str("Ada".to_string()));
    // List items persist as text in the XML schema.
    assert_eq!(
        ctx.lists["xs"],
        vec![Value::Str("1".to_string()), Value::Str("2".to_string())]
    );
}

#[test]
fn yaml_round_trip_preserves_value_types() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = path_in(&dir, "state.yaml");
    let mut interp = Interpreter::new();

    interp.process_command("set count to 7").unwrap();
    interp
        .process_command("create list ys with 1, two")
        .unwrap();
    interp
        .process_command(&format!("save data to {}", path))
        .unwrap();
    interp.process_command("reset everything").unwrap();
    interp
        .process_command(&format!("load data from {}", path))
        .unwrap();

    let ctx = interp.context();
    assert_eq!(ctx.variables["count"], Value::Int(7));
    assert_eq!(
        ctx.lists["ys"],
        vec![Value::Int(1), Value::Str("two".to_string())]
    );
}

#[test]
fn session_round_trip_keeps_inline_procedures_only() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = path_in(&dir, "session.json");
    let mut interp = Interpreter::new();

    interp.process_command("set x to 1").unwrap();
    interp
        .process_command("define function greet as print \"hi\"")
        .unwrap();
    interp
        .process_command("create a list with 1, 2")
        .unwrap();
    interp
        .process_command(&format!("save session to {}", path))
        .unwrap();

    let output = interp.take_output();
    assert!(output.contains("Saved: 1 variables, 0 lists, 1 functions"));

    interp.process_command("reset everything").unwrap();
    interp
        .process_command(&format!("load session from {}", path))
        .unwrap();

    assert_eq!(interp.context().variables["x"], Value::Int(1));
    assert_eq!(
        interp.context().current_list,
        vec![Value::Int(1), Value::Int(2)]
    );
    // The restored inline procedure is callable again.
    interp.process_command("call function greet").unwrap();
    assert!(interp.take_output().contains("hi\n"));
}

#[test]
fn loading_a_missing_session_reports() {
    let mut interp = Interpreter::new();
    let outcome = interp
        .process_command("load session from /nonexistent/session.json")
        .unwrap();
    assert!(outcome.is_none());
    assert!(interp
        .take_output()
        .contains("Error: Session file '/nonexistent/session.json' does not exist!"));
}
