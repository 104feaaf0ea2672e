//! Ordered pattern-dispatch table.
//!
//! A command line is matched against a fixed sequence of case-insensitive
//! regular expressions; the first match wins and later rules are never
//! attempted. Rule order is the sole disambiguation mechanism: more
//! specific rules must precede more general ones (quoted equality before
//! unquoted, AND/OR conditionals before single-clause, loops and
//! conditionals before the catch-all print forms). Do not reorder without
//! re-checking those pairings -- the ordering tests cover the known traps.

use regex::{Captures, Regex};

use crate::context::ExecutionContext;
use crate::interpreter::Interpreter;
use crate::value::RuntimeError;

/// Handler for an ordinary capability command: captures plus context in,
/// normalized descriptor out. Semantic failures come back as `Err` and
/// are reported without stopping the run.
pub(crate) type CommandHandler =
    fn(&mut ExecutionContext, &Captures<'_>) -> Result<String, RuntimeError>;

/// Handler for a control-flow command that must recurse into dispatch
/// (loops, inline conditionals, procedure calls).
pub(crate) type ControlHandler =
    fn(&mut Interpreter, &Captures<'_>) -> Result<String, RuntimeError>;

pub(crate) enum Handler {
    Command(CommandHandler),
    Control(ControlHandler),
}

pub(crate) struct PatternRule {
    pub pattern: Regex,
    pub handler: Handler,
}

/// Block-header matcher: recognizes a colon-terminated header and renders
/// its descriptor. Consulted before the command rules.
pub(crate) struct HeaderRule {
    pub pattern: Regex,
    pub describe: fn(&Captures<'_>) -> String,
}

fn re(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("static dispatch pattern")
}

pub(crate) fn block_header_rules() -> Vec<HeaderRule> {
    fn header(pattern: &str, describe: fn(&Captures<'_>) -> String) -> HeaderRule {
        HeaderRule {
            pattern: re(pattern),
            describe,
        }
    }

    vec![
        header(r"if (.+):$", |c| {
            format!("if {}: (block structure)", c[1].trim())
        }),
        header(r"else:$", |_| "else: (block structure)".to_string()),
        header(r"for each (.+):$", |c| {
            format!("for each {}: (block structure)", c[1].trim())
        }),
        header(r"while (.+):$", |c| {
            format!("while {}: (block structure)", c[1].trim())
        }),
        header(r"repeat (\d+) times?:$", |c| {
            format!("repeat {} times: (block structure)", &c[1])
        }),
        header(r"define function (\w+):$", |c| {
            format!("define function {}: (block structure)", &c[1])
        }),
        header(r"define function (\w+) with (.+):$", |c| {
            format!("define function {} with {}: (block structure)", &c[1], c[2].trim())
        }),
    ]
}

pub(crate) fn command_rules() -> Vec<PatternRule> {
    struct Table(Vec<PatternRule>);

    impl Table {
        fn cmd(&mut self, pattern: &str, handler: CommandHandler) {
            self.0.push(PatternRule {
                pattern: re(pattern),
                handler: Handler::Command(handler),
            });
        }

        fn ctl(&mut self, pattern: &str, handler: ControlHandler) {
            self.0.push(PatternRule {
                pattern: re(pattern),
                handler: Handler::Control(handler),
            });
        }
    }

    let mut t = Table(Vec::new());

    // Loop commands, ahead of the print rules so their keywords are not
    // swallowed as print targets.
    t.ctl(r"repeat (\d+) times?: (.+)", Interpreter::repeat_command);
    t.ctl(
        r"for each (?:item )?in list (\w+) do (.+)",
        Interpreter::foreach_list,
    );
    t.ctl(
        r"while (\w+) is less than (\d+) do (.+)",
        Interpreter::while_less_than,
    );
    t.ctl(r"count from (\d+) to (\d+) and (.+)", Interpreter::count_and_do);
    // Loop control signals.
    t.cmd(r"break (?:from )?(?:the )?loop", ExecutionContext::break_loop_cmd);
    t.cmd(
        r"continue (?:with )?(?:the )?loop",
        ExecutionContext::continue_loop_cmd,
    );
    t.cmd(r"exit (?:the )?loop", ExecutionContext::break_loop_cmd);
    t.cmd(
        r"skip (?:to )?(?:the )?next (?:iteration|item)",
        ExecutionContext::continue_loop_cmd,
    );

    // Procedure operations, ahead of print. The bare `call NAME` form
    // sits after `call function NAME` so the word "function" is never
    // captured as a procedure name.
    t.cmd(r"define function (\w+) as (.+)", ExecutionContext::define_function);
    t.ctl(r"call function (\w+)", Interpreter::call_function);
    t.ctl(r"run (\w+)", Interpreter::call_function);
    t.ctl(r"call (\w+)", Interpreter::call_function);

    // Multi-clause conditionals before their single-clause counterparts.
    t.ctl(
        r"if (\w+) is greater than (\d+) and (\w+) is greater than (\d+) then (.+)",
        Interpreter::if_and_greater,
    );
    t.ctl(
        r"if (\w+) is less than (\d+) and (\w+) is less than (\d+) then (.+)",
        Interpreter::if_and_less,
    );
    t.ctl(
        r#"if (\w+) equals? ['"](.+?)['"] and (\w+) equals? ['"](.+?)['"] then (.+)"#,
        Interpreter::if_and_equals,
    );
    t.ctl(
        r"if (\w+) is greater than (\d+) or (\w+) is greater than (\d+) then (.+)",
        Interpreter::if_or_greater,
    );
    t.ctl(
        r"if (\w+) is less than (\d+) or (\w+) is less than (\d+) then (.+)",
        Interpreter::if_or_less,
    );
    t.ctl(
        r#"if (\w+) equals? ['"](.+?)['"] or (\w+) equals? ['"](.+?)['"] then (.+)"#,
        Interpreter::if_or_equals,
    );
    t.ctl(
        r#"if not (\w+) equals? ['"](.+?)['"] then (.+)"#,
        Interpreter::if_not_equals,
    );
    t.ctl(
        r"if not (\w+) is greater than (\d+) then (.+)",
        Interpreter::if_not_greater,
    );
    t.ctl(
        r#"if (\w+) is not equal to ['"](.+?)['"] then (.+)"#,
        Interpreter::if_not_equals,
    );

    // Single-clause conditionals; quoted equality before unquoted.
    t.ctl(
        r"if (\w+) is greater than (\d+) then (.+)",
        Interpreter::if_greater_than,
    );
    t.ctl(
        r"if (\w+) is less than (\d+) then (.+)",
        Interpreter::if_less_than,
    );
    t.ctl(
        r#"if (\w+) contains ['"](.+?)['"] then (.+)"#,
        Interpreter::if_contains,
    );
    t.ctl(
        r"if list (\w+) has (\d+) items? then (.+)",
        Interpreter::if_list_size,
    );
    t.ctl(
        r#"if (\w+) equals? ['"](.+?)['"] then (.+)"#,
        Interpreter::if_equals,
    );
    t.ctl(r"if (\w+) equals? (\d+) then (.+)", Interpreter::if_equals);
    // Legacy variable-to-variable comparison.
    t.ctl(
        r#"if (\w+) equals? (\w+) then print ['"](.+?)['"]"#,
        Interpreter::simple_if,
    );

    // Print commands, after loops, procedures and conditionals.
    t.cmd(
        r#"print (?:the words? )?['"](.+?)['"]"#,
        ExecutionContext::print_quoted,
    );
    t.cmd(
        r"print (?:the )?(?:value of )?(\w+)",
        ExecutionContext::print_variable,
    );
    t.cmd(r"print (?:the words? )?(.+)", ExecutionContext::print_words);
    t.cmd(
        r#"display (?:the words? )?['"](.+?)['"]"#,
        ExecutionContext::print_quoted,
    );
    t.cmd(
        r"display (?:the )?(?:value of )?(\w+)",
        ExecutionContext::print_variable,
    );
    t.cmd(
        r#"show (?:me )?(?:the words? )?['"](.+?)['"]"#,
        ExecutionContext::print_quoted,
    );
    // List display must precede the generic show-variable rule, which
    // would otherwise capture the word "list" as a variable name.
    t.cmd(r"show (?:the )?list (\w+)", ExecutionContext::show_list);
    t.cmd(r"show (?:the )?list", ExecutionContext::show_anonymous_list);
    t.cmd(
        r"show (?:me )?(?:the )?(?:value of )?(\w+)",
        ExecutionContext::print_variable,
    );
    t.cmd(r#"output ['"](.+?)['"]"#, ExecutionContext::print_quoted);

    // Math commands: integers, decimals, negative numbers.
    t.cmd(
        r"add (-?\d+(?:\.\d+)?) and (-?\d+(?:\.\d+)?)",
        ExecutionContext::add_numbers,
    );
    t.cmd(
        r"calculate (-?\d+(?:\.\d+)?) \+ (-?\d+(?:\.\d+)?)",
        ExecutionContext::add_numbers,
    );
    t.cmd(
        r"subtract (-?\d+(?:\.\d+)?) from (-?\d+(?:\.\d+)?)",
        ExecutionContext::subtract_numbers,
    );
    t.cmd(
        r"multiply (-?\d+(?:\.\d+)?) (?:by|and) (-?\d+(?:\.\d+)?)",
        ExecutionContext::multiply_numbers,
    );
    t.cmd(
        r"divide (-?\d+(?:\.\d+)?) by (-?\d+(?:\.\d+)?)",
        ExecutionContext::divide_numbers,
    );
    t.cmd(
        r"calculate the square root of (\d+(?:\.\d+)?)",
        ExecutionContext::square_root,
    );
    t.cmd(
        r"raise (-?\d+(?:\.\d+)?) to the power of (-?\d+(?:\.\d+)?)",
        ExecutionContext::power,
    );
    t.cmd(
        r"generate (?:a )?random number between (-?\d+) and (-?\d+)",
        ExecutionContext::random_number,
    );
    t.cmd(r"find the minimum of (.+)", ExecutionContext::find_minimum);
    t.cmd(r"find the maximum of (.+)", ExecutionContext::find_maximum);
    t.cmd(r"calculate the average of (.+)", ExecutionContext::calculate_average);
    t.cmd(
        r"round (-?\d+\.?\d*) to (\d+) decimal places?",
        ExecutionContext::round_number,
    );
    // Advanced math.
    t.cmd(
        r"calculate (?:the )?sine of (-?\d+(?:\.\d+)?)",
        ExecutionContext::sine,
    );
    t.cmd(
        r"calculate (?:the )?cosine of (-?\d+(?:\.\d+)?)",
        ExecutionContext::cosine,
    );
    t.cmd(
        r"calculate (?:the )?tangent of (-?\d+(?:\.\d+)?)",
        ExecutionContext::tangent,
    );
    t.cmd(
        r"calculate (?:the )?natural log(?:arithm)? of (\d+(?:\.\d+)?)",
        ExecutionContext::natural_log,
    );
    t.cmd(
        r"calculate (?:the )?log(?:arithm)? base (\d+) of (\d+(?:\.\d+)?)",
        ExecutionContext::log_base,
    );
    t.cmd(
        r"calculate (?:the )?absolute value of (-?\d+(?:\.\d+)?)",
        ExecutionContext::absolute_value,
    );
    t.cmd(
        r"calculate (?:the )?factorial of (\d+)",
        ExecutionContext::factorial,
    );

    // String operations.
    t.cmd(r#"make ['"](.+?)['"] uppercase"#, ExecutionContext::make_uppercase);
    t.cmd(r#"make ['"](.+?)['"] lowercase"#, ExecutionContext::make_lowercase);
    t.cmd(
        r#"get the length of ['"](.+?)['"]"#,
        ExecutionContext::string_length,
    );
    t.cmd(r#"reverse ['"](.+?)['"]"#, ExecutionContext::reverse_string);
    t.cmd(
        r#"replace ['"](.+?)['"] with ['"](.+?)['"] in ['"](.+?)['"]"#,
        ExecutionContext::replace_string,
    );
    t.cmd(
        r#"split ['"](.+?)['"] by ['"](.+?)['"]"#,
        ExecutionContext::split_string,
    );

    // Date and time; datetime must precede date.
    t.cmd(r"get (?:the )?current datetime", ExecutionContext::current_datetime);
    t.cmd(r"get (?:the )?current time", ExecutionContext::current_time);
    t.cmd(r"get (?:the )?current date", ExecutionContext::current_date);
    t.cmd(r"add (\d+) days? to today", ExecutionContext::add_days_to_today);
    t.cmd(
        r"subtract (\d+) days? from today",
        ExecutionContext::subtract_days_from_today,
    );

    // Variable commands.
    t.cmd(
        r#"set (\w+) to ['"](.+?)['"]"#,
        ExecutionContext::set_string_variable,
    );
    t.cmd(
        r"set (\w+) to (-?\d+(?:\.\d+)?)",
        ExecutionContext::set_number_variable,
    );
    t.cmd(
        r"create (?:a )?variable (?:called )?(\w+) (?:with value |= )(.+)",
        ExecutionContext::create_variable,
    );
    // Type checking.
    t.cmd(r"check (?:the )?type of (\w+)", ExecutionContext::check_variable_type);
    t.cmd(
        r"what (?:is the )?type of (\w+)",
        ExecutionContext::check_variable_type,
    );
    t.cmd(r"is (\w+) (?:a )?string", ExecutionContext::is_string_type);
    t.cmd(r"is (\w+) (?:a )?number", ExecutionContext::is_number_type);
    t.cmd(r"is (\w+) (?:a )?boolean", ExecutionContext::is_boolean_type);
    t.cmd(r"convert (\w+) to string", ExecutionContext::convert_to_string);
    t.cmd(r"convert (\w+) to number", ExecutionContext::convert_to_number);
    t.cmd(r"convert (\w+) to boolean", ExecutionContext::convert_to_boolean);

    // List commands.
    t.cmd(
        r"create (?:a )?list (?:called )?(\w+) with (.+)",
        ExecutionContext::create_list,
    );
    t.cmd(
        r"create (?:a )?list with (.+)",
        ExecutionContext::create_anonymous_list,
    );
    t.cmd(r"add (.+) to (?:the )?list (\w+)", ExecutionContext::add_to_list);
    t.cmd(
        r"add (.+) to (?:the )?list",
        ExecutionContext::add_to_anonymous_list,
    );

    // File operations.
    t.cmd(r"check if file (\S+) exists", ExecutionContext::check_file_exists);
    t.cmd(r"does file (\S+) exist", ExecutionContext::check_file_exists);
    t.cmd(r#"save ['"](.+?)['"] to (\S+\.txt)"#, ExecutionContext::save_to_file);
    t.cmd(
        r#"write ['"](.+?)['"] to (\S+\.txt)"#,
        ExecutionContext::save_to_file,
    );
    t.cmd(
        r"read (?:the contents of )?(\S+\.txt)",
        ExecutionContext::read_file,
    );
    t.cmd(r"load (\S+\.txt)", ExecutionContext::read_file);
    t.cmd(
        r"create (?:a )?CSV file (\S+\.csv) with headers (.+)",
        ExecutionContext::create_csv,
    );
    t.cmd(r"add row (.+) to CSV (\S+\.csv)", ExecutionContext::add_csv_row);
    t.cmd(r"read (?:the )?CSV file (\S+\.csv)", ExecutionContext::read_csv);
    t.cmd(
        r"save list (\w+) to (\S+\.json)",
        ExecutionContext::save_list_to_json,
    );
    t.cmd(
        r"load list from (\S+\.json)",
        ExecutionContext::load_list_from_json,
    );
    t.cmd(
        r"save (?:data|variables) to (\S+\.xml)",
        ExecutionContext::save_to_xml,
    );
    t.cmd(
        r"load (?:data|variables) from (\S+\.xml)",
        ExecutionContext::load_from_xml,
    );
    t.cmd(
        r"save (?:data|variables) to (\S+\.ya?ml)",
        ExecutionContext::save_to_yaml,
    );
    t.cmd(
        r"load (?:data|variables) from (\S+\.ya?ml)",
        ExecutionContext::load_from_yaml,
    );
    t.cmd(r"delete file (\S+)", ExecutionContext::delete_file);
    t.cmd(r"copy file (\S+) to (\S+)", ExecutionContext::copy_file);

    // Input.
    t.cmd(
        r"ask (?:the user )?for (?:their )?(.+)",
        ExecutionContext::get_user_input,
    );
    t.cmd(r"get input for (.+)", ExecutionContext::get_user_input);
    t.cmd(r"prompt (?:for )?(.+)", ExecutionContext::get_user_input);

    // Session and system operations.
    t.cmd(r"save session to (\S+)", ExecutionContext::save_session);
    t.cmd(r"load session from (\S+)", ExecutionContext::load_session);
    t.cmd(r"save state to (\S+)", ExecutionContext::save_session);
    t.cmd(r"load state from (\S+)", ExecutionContext::load_session);
    t.cmd(r"clear (?:the )?screen", ExecutionContext::clear_screen);
    t.cmd(r"list (?:all )?variables", ExecutionContext::list_variables);
    t.cmd(r"list (?:all )?lists", ExecutionContext::list_lists);
    t.cmd(r"delete variable (\w+)", ExecutionContext::delete_variable);
    t.cmd(r"delete list (\w+)", ExecutionContext::delete_list);
    t.cmd(r"reset everything", ExecutionContext::reset_all);

    // Help.
    t.cmd(r"help|what can you do", ExecutionContext::show_help);

    // Benchmarking.
    t.ctl(r"benchmark (?:performance|speed)", Interpreter::run_benchmark);

    // Database operations.
    t.cmd(
        r#"create database ['"](.+?)['"]"#,
        ExecutionContext::create_database,
    );
    t.cmd(
        r#"connect to database ['"](.+?)['"]"#,
        ExecutionContext::connect_database,
    );
    t.cmd(
        r"create table (\w+) with columns (.+)",
        ExecutionContext::create_table,
    );
    t.cmd(
        r"insert into table (\w+) values (.+)",
        ExecutionContext::insert_into_table,
    );
    t.cmd(
        r"select all from table (\w+)",
        ExecutionContext::select_all_from_table,
    );
    t.cmd(r"select (.+) from table (\w+)", ExecutionContext::select_from_table);
    t.cmd(
        r"update table (\w+) set (.+) where (.+)",
        ExecutionContext::update_table,
    );
    t.cmd(
        r"delete from table (\w+) where (.+)",
        ExecutionContext::delete_from_table,
    );
    t.cmd(r"drop table (\w+)", ExecutionContext::drop_table);
    t.cmd(r"list (?:all )?tables", ExecutionContext::list_tables);
    t.cmd(r"describe table (\w+)", ExecutionContext::describe_table);
    t.cmd(r"close database", ExecutionContext::close_database);

    // Web requests.
    t.cmd(
        r#"get (?:data )?from (?:url )?['"](.+?)['"]"#,
        ExecutionContext::http_get,
    );
    t.cmd(
        r#"post (?:data )?to (?:url )?['"](.+?)['"] with data (.+)"#,
        ExecutionContext::http_post,
    );
    t.cmd(
        r#"download (?:file )?from ['"](.+?)['"] (?:to|as) ['"](.+?)['"]"#,
        ExecutionContext::download_file,
    );
    t.cmd(
        r#"check if (?:url )?['"](.+?)['"] is (?:accessible|available)"#,
        ExecutionContext::check_url,
    );
    t.cmd(
        r#"get (?:the )?status of (?:url )?['"](.+?)['"]"#,
        ExecutionContext::get_url_status,
    );

    t.0
}

// ── Suggestions for unrecognized commands ──────────────────────────────

const COMMON_FIXES: &[(&str, &[&str])] = &[
    ("print", &["print \"text\"", "print variable_name"]),
    (
        "create",
        &[
            "create variable name with value 5",
            "create list name with item1, item2",
        ],
    ),
    ("set", &["set variable_name to value"]),
    ("add", &["add 5 and 3", "add \"item\" to list list_name"]),
    ("if", &["if variable equals value then action"]),
    ("repeat", &["repeat 5 times: action"]),
    ("for", &["for each item in list name do action"]),
    ("define", &["define function name as action"]),
    ("call", &["call function name"]),
    (
        "save",
        &["save \"text\" to file.txt", "save session to session.json"],
    ),
    (
        "load",
        &["load file.txt", "load session from session.json"],
    ),
    ("show", &["show list name", "list all variables"]),
    ("calculate", &["calculate 5 + 3", "calculate the sine of 45"]),
    (
        "convert",
        &["convert variable to string", "convert variable to number"],
    ),
    (
        "check",
        &["check if file name.txt exists", "check the type of variable"],
    ),
];

const TYPO_FIXES: &[(&str, &str)] = &[
    ("prin", "print"),
    ("pront", "print"),
    ("priny", "print"),
    ("crete", "create"),
    ("creat", "create"),
    ("ad", "add"),
    ("repet", "repeat"),
    ("cal", "call"),
    ("sav", "save"),
    ("lod", "load"),
    ("shw", "show"),
    ("def", "define"),
];

fn first_keys(map_keys: Vec<&String>, limit: usize) -> String {
    map_keys
        .into_iter()
        .take(limit)
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Up to 3 ranked suggestions for an unmatched command, drawn from the
/// keyword and typo-correction tables plus the current context state.
/// Advisory only; never fatal.
pub(crate) fn suggestions_for(command: &str, ctx: &ExecutionContext) -> Vec<String> {
    let lower = command.to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();

    for (keyword, examples) in COMMON_FIXES {
        if lower.contains(keyword) {
            suggestions.extend(examples.iter().take(2).map(|s| s.to_string()));
        }
    }

    for (typo, correction) in TYPO_FIXES {
        if lower.contains(typo) {
            if let Some((_, examples)) = COMMON_FIXES.iter().find(|(k, _)| k == correction) {
                suggestions.push(format!("{} (corrected from '{}')", correction, typo));
                if let Some(example) = examples.first() {
                    suggestions.push(example.to_string());
                }
            }
        }
    }

    if lower.contains("variable") && !ctx.variables.is_empty() {
        suggestions.push(format!(
            "Available variables: {}",
            first_keys(ctx.variables.keys().collect(), 3)
        ));
    }
    if lower.contains("list") && !ctx.lists.is_empty() {
        suggestions.push(format!(
            "Available lists: {}",
            first_keys(ctx.lists.keys().collect(), 3)
        ));
    }
    if lower.contains("function") && !ctx.procedures.is_empty() {
        suggestions.push(format!(
            "Available functions: {}",
            first_keys(ctx.procedures.keys().collect(), 3)
        ));
    }

    let math_words = ["math", "calculate", "compute", "+", "-", "*", "/", "number"];
    if math_words.iter().any(|w| lower.contains(w)) {
        suggestions.extend(
            ["add 5 and 3", "calculate 10 * 2", "calculate the sine of 45"]
                .iter()
                .map(|s| s.to_string()),
        );
    }

    let file_words = ["file", "save", "load", "read", "write"];
    if file_words.iter().any(|w| lower.contains(w)) {
        suggestions.extend(
            [
                "save \"text\" to data.txt",
                "read data.txt",
                "check if file data.txt exists",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
    }

    let mut seen = std::collections::HashSet::new();
    suggestions.retain(|s| seen.insert(s.clone()));
    suggestions.truncate(3);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn every_pattern_compiles() {
        // Construction would panic on a malformed pattern; touching the
        // tables here keeps that failure inside the test suite.
        assert!(!block_header_rules().is_empty());
        assert!(command_rules().len() > 100);
    }

    #[test]
    fn and_conditional_precedes_single_clause() {
        let rules = command_rules();
        let line = "if a is greater than 1 and b is greater than 2 then print \"both\"";
        let first = rules
            .iter()
            .position(|r| r.pattern.is_match(line))
            .expect("some rule matches");
        // The winning rule must capture both clauses, not just the first.
        let caps = rules[first].pattern.captures(line).unwrap();
        assert_eq!(caps.len(), 6);
        assert_eq!(&caps[3], "b");
    }

    #[test]
    fn loop_rule_precedes_print_rule() {
        let rules = command_rules();
        let line = "repeat 3 times: print \"hi\"";
        let first = rules
            .iter()
            .position(|r| r.pattern.is_match(line))
            .expect("some rule matches");
        let caps = rules[first].pattern.captures(line).unwrap();
        assert_eq!(&caps[1], "3");
        assert_eq!(&caps[2], "print \"hi\"");
    }

    #[test]
    fn datetime_precedes_date() {
        let rules = command_rules();
        let line = "get the current datetime";
        let winner = rules
            .iter()
            .find(|r| r.pattern.is_match(line))
            .expect("some rule matches");
        assert!(winner.pattern.as_str().contains("datetime"));
    }

    #[test]
    fn show_list_precedes_show_variable() {
        let rules = command_rules();
        let line = "show list fruits";
        let winner = rules
            .iter()
            .find(|r| r.pattern.is_match(line))
            .expect("some rule matches");
        let caps = winner.pattern.captures(line).unwrap();
        assert_eq!(&caps[1], "fruits");
    }

    #[test]
    fn suggestions_cap_at_three() {
        let ctx = crate::context::ExecutionContext::new();
        let s = suggestions_for("pront the file and save it", &ctx);
        assert!(!s.is_empty());
        assert!(s.len() <= 3);
    }

    #[test]
    fn suggestions_surface_known_variables() {
        let mut ctx = crate::context::ExecutionContext::new();
        ctx.variables.insert("pet".to_string(), Value::Int(1));
        let s = suggestions_for("mangle variable", &ctx);
        assert!(s.iter().any(|x| x.contains("pet")));
    }
}
