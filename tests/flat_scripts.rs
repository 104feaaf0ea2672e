use vernacular::Interpreter;

#[test]
fn set_then_conditional_print() {
    let mut interp = Interpreter::new();
    let output = interp
        .run_script("set x to 5\nif x is greater than 3 then print \"big\"\n")
        .expect("script runs");

    assert!(output.contains("Variable 'x' set to 5"));
    assert!(output.contains("Condition met: x (5) > 3"));
    assert!(output.contains("big\n"));
    assert!(output.contains("Successful commands: 2"));
    assert!(output.contains("Success rate: 100.0%"));
}

#[test]
fn divide_by_zero_is_counted_but_does_not_stop_the_run() {
    let mut interp = Interpreter::new();
    let output = interp
        .run_script("divide 10 by 0\nprint \"still here\"\n")
        .expect("script runs");

    assert!(output.contains("Error: Cannot divide by zero!"));
    assert!(output.contains("still here\n"));
    assert!(output.contains("Lines executed: 2"));
    assert!(output.contains("Successful commands: 1"));
    assert!(output.contains("Success rate: 50.0%"));
}

#[test]
fn arithmetic_results_display_as_integers_when_whole() {
    let mut interp = Interpreter::new();
    let output = interp
        .run_script("add 2.5 and 1.5\nadd 2.5 and 2.25\n")
        .expect("script runs");

    assert!(output.contains("2.5 + 1.5 = 4\n"));
    assert!(output.contains("2.5 + 2.25 = 4.75\n"));
}

#[test]
fn unrecognized_lines_are_skipped_with_suggestions() {
    let mut interp = Interpreter::new();
    let output = interp
        .run_script("pront \"hello\"\nprint \"recovered\"\n")
        .expect("script runs");

    assert!(output.contains("Sorry, I don't understand: 'pront \"hello\"'"));
    assert!(output.contains("Did you mean:"));
    assert!(output.contains("recovered\n"));
    assert!(output.contains("Successful commands: 1"));
}

#[test]
fn runaway_recursion_aborts_the_run() {
    let mut interp = Interpreter::new();
    let script = "define function f as call function f\ncall function f\nprint \"unreached\"\n";
    let err = interp.run_script(script).expect_err("recursion is fatal");

    assert!(err.fatal);
    assert_eq!(err.line, Some(2));
    let output = interp.take_output();
    assert!(output.contains("ERROR at line 2:"));
    assert!(!output.contains("unreached\n"));
}

#[test]
fn single_line_loops_and_legacy_forms() {
    let mut interp = Interpreter::new();
    let script = "\
create list pets with cat, dog
for each item in list pets do print item
count from 1 to 3 and print counter
";
    let output = interp.run_script(script).expect("script runs");

    assert!(output.contains("For each item in list 'pets':"));
    assert!(output.contains("cat\n"));
    assert!(output.contains("dog\n"));
    assert!(output.contains("Counting from 1 to 3:"));
    assert!(output.contains("  Count 2: "));
    assert!(output.contains("Success rate: 100.0%"));
}
