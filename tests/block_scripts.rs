use vernacular::Interpreter;

#[test]
fn repeat_block_prints_three_times() {
    let mut interp = Interpreter::new();
    let output = interp
        .run_script("repeat 3 times:\n    print \"hi\"\n")
        .expect("script runs");

    assert_eq!(output.matches("hi\n").count(), 3);
    assert!(output.contains("Block structure detected"));
    assert!(output.contains("Commands/blocks executed: 1"));
    assert!(output.contains("Successful operations: 1"));
    assert!(output.contains("Success rate: 100.0%"));
}

#[test]
fn conditional_block_runs_only_when_true() {
    let mut interp = Interpreter::new();
    let script = "\
set x to 5
if x is greater than 3:
    print \"yes\"
if x is greater than 10:
    print \"no\"
";
    let output = interp.run_script(script).expect("script runs");
    assert!(output.contains("yes\n"));
    assert!(!output.contains("no\n"));
}

#[test]
fn else_blocks_run_on_their_own_evaluation_path() {
    // An else block is not chained to the preceding if; both bodies run
    // when the if's condition holds.
    let mut interp = Interpreter::new();
    let script = "\
set x to 5
if x is greater than 3:
    print \"then-branch\"
else:
    print \"else-branch\"
";
    let output = interp.run_script(script).expect("script runs");
    assert!(output.contains("then-branch\n"));
    assert!(output.contains("else-branch\n"));
}

#[test]
fn nested_blocks_attach_and_execute_in_order() {
    let mut interp = Interpreter::new();
    let script = "\
set x to 5
if x is greater than 1:
    print \"outer\"
    if x is greater than 2:
        print \"inner\"
";
    let output = interp.run_script(script).expect("script runs");
    let outer = output.find("outer\n").expect("outer printed");
    let inner = output.find("inner\n").expect("inner printed");
    assert!(outer < inner);
}

#[test]
fn foreach_block_iterates_direct_commands_only() {
    let mut interp = Interpreter::new();
    let script = "\
create list pets with cat, dog
for each pet in list pets:
    print pet
    if pet equals \"cat\":
        print \"nested\"
";
    let output = interp.run_script(script).expect("script runs");

    assert!(output.contains("cat\n"));
    assert!(output.contains("dog\n"));
    // Nested blocks are not part of the per-iteration body of a foreach.
    assert!(!output.contains("nested\n"));
}

#[test]
fn foreach_block_over_missing_list_reports_without_iterating() {
    let mut interp = Interpreter::new();
    let script = "for each x in list ghosts:\n    print x\n";
    let output = interp.run_script(script).expect("script runs");
    assert!(output.contains("Error: List 'ghosts' not found!"));
}

#[test]
fn while_block_safety_cap_stops_runaway_loops() {
    // The condition never turns false, so the documented cap has to stop
    // the loop and warn.
    let mut interp = Interpreter::new();
    let script = "\
set x to 0
while x is less than 5:
    print \"tick\"
";
    let output = interp.run_script(script).expect("script runs");

    assert_eq!(output.matches("tick\n").count(), 100);
    assert!(output.contains("Warning: Loop stopped after 100 iterations (safety limit)"));
}

#[test]
fn while_block_ends_when_condition_turns_false() {
    let mut interp = Interpreter::new();
    let script = "\
set n to 0
while n is less than 1:
    set n to 5
";
    let output = interp.run_script(script).expect("script runs");
    assert_eq!(output.matches("Variable 'n' set to 5").count(), 1);
    assert!(!output.contains("Warning: Loop stopped"));
}

#[test]
fn unrecognized_condition_defaults_to_running_the_block() {
    let mut interp = Interpreter::new();
    let script = "if the moon is full:\n    print \"ran anyway\"\n";
    let output = interp.run_script(script).expect("script runs");
    assert!(output.contains("ran anyway\n"));
}

#[test]
fn function_blocks_register_without_executing() {
    let mut interp = Interpreter::new();
    let script = "\
define function greet:
    print \"hello from block\"
print \"before call\"
call function greet
";
    let output = interp.run_script(script).expect("script runs");

    assert!(output.contains("Function 'greet' defined"));
    let before = output.find("before call\n").expect("marker printed");
    let hello = output.find("hello from block\n").expect("body ran on call");
    assert!(before < hello, "body must not run at definition time");
}

#[test]
fn function_blocks_with_parameters_capture_names() {
    let mut interp = Interpreter::new();
    let script = "\
define function announce with subject, mood:
    print \"announced\"
call function announce
";
    let output = interp.run_script(script).expect("script runs");
    assert!(output.contains("Function 'announce' defined with parameters: subject, mood"));
    assert!(output.contains("announced\n"));
}

#[test]
fn function_calls_scope_variables_but_leak_lists() {
    let mut interp = Interpreter::new();
    let script = "\
set x to 1
create list log with start
define function mutate:
    set x to 99
    add entry to list log
call function mutate
print x
";
    let output = interp.run_script(script).expect("script runs");

    // Variable snapshot restored, list mutation kept.
    assert_eq!(
        interp.context().variables["x"],
        vernacular::Value::Int(1)
    );
    assert_eq!(interp.context().lists["log"].len(), 2);
    assert!(output.contains("Success rate: 100.0%"));
}

#[test]
fn three_level_nesting_with_bare_command_in_innermost() {
    let mut interp = Interpreter::new();
    let script = "\
set a to 5
create list xs with 1
if a is greater than 1:
    print \"level1\"
    while a is less than 9:
        set a to 9
        if a is greater than 8:
            print \"level3\"
";
    let output = interp.run_script(script).expect("script runs");
    assert!(output.contains("level1\n"));
    assert!(output.contains("level3\n"));
}
