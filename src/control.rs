//! Single-line control flow: the legacy loop, conditional and procedure
//! forms that recurse back into dispatch for their action clause.
//!
//! Loop discipline: the single-line forms reset both loop-control flags at
//! loop entry and consume them per iteration, so a stray signal from an
//! earlier command cannot leak in. Block-form loops additionally save and
//! restore the caller's flags around themselves (see the execution
//! engine); both are required for signals not to cross loop boundaries.

use std::time::Instant;

use regex::Captures;

use crate::context::{ExecutionContext, ProcedureBody};
use crate::interpreter::Interpreter;
use crate::runtime::{cap, cap_f64, cap_i64, strip_quotes};
use crate::value::{RuntimeError, Value};

/// Hard safety cap for `while`: a condition that never turns false stops
/// the loop with a warning instead of spinning forever.
pub(crate) const WHILE_ITERATION_CAP: usize = 100;

/// Recursion bound for procedure calls; exceeding it is the one failure
/// that aborts a whole script run.
pub(crate) const MAX_CALL_DEPTH: usize = 32;

impl ExecutionContext {
    pub(crate) fn break_loop_cmd(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        self.loop_break = true;
        self.emit("Breaking from loop...");
        Ok("break".to_string())
    }

    pub(crate) fn continue_loop_cmd(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        self.loop_continue = true;
        self.emit("Continuing to next iteration...");
        Ok("continue".to_string())
    }

    pub(crate) fn define_function(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let action = cap(caps, 2).to_string();
        self.emit(format!("Function '{}' defined as: {}", name, action));
        self.procedures
            .insert(name.clone(), ProcedureBody::Inline(action));
        Ok(format!("define {}()", name))
    }
}

impl Interpreter {
    pub(crate) fn repeat_command(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let times = cap_i64(caps, 1)?.max(0) as usize;
        let command = cap(caps, 2).trim().to_string();
        self.ctx
            .emit(format!("Repeating '{}' {} times:", command, times));

        self.ctx.loop_break = false;
        self.ctx.loop_continue = false;

        for i in 0..times {
            if self.ctx.loop_break {
                self.ctx.emit("Loop terminated by break");
                self.ctx.loop_break = false;
                break;
            }
            self.ctx.emit_part(format!("  {}: ", i + 1));
            self.process_command(&command)?;
            if self.ctx.loop_continue {
                self.ctx.loop_continue = false;
            }
        }
        Ok(format!("repeat({}): {}", times, command))
    }

    pub(crate) fn foreach_list(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let list_name = cap(caps, 1).to_string();
        let action = cap(caps, 2).to_string();

        let items = match self.ctx.lists.get(&list_name) {
            Some(items) => items.clone(),
            None => return Err(self.ctx.unknown_list_error(&list_name)),
        };
        self.ctx
            .emit(format!("For each item in list '{}':", list_name));

        self.ctx.loop_break = false;
        self.ctx.loop_continue = false;

        for (i, item) in items.iter().enumerate() {
            if self.ctx.loop_break {
                self.ctx.emit("Loop terminated by break");
                self.ctx.loop_break = false;
                break;
            }
            self.ctx.emit_part(format!("  Item {} ({}): ", i + 1, item));

            // `item` is bound only for the action; an existing variable of
            // the same name is restored afterwards.
            let shadowed = self.ctx.variables.insert("item".to_string(), item.clone());
            let result = self.process_command(&action);
            match shadowed {
                Some(old) => {
                    self.ctx.variables.insert("item".to_string(), old);
                }
                None => {
                    self.ctx.variables.remove("item");
                }
            }
            result?;

            if self.ctx.loop_continue {
                self.ctx.loop_continue = false;
            }
        }
        Ok(format!("for item in {}: {}", list_name, action))
    }

    pub(crate) fn while_less_than(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let var_name = cap(caps, 1).to_string();
        let limit = cap_f64(caps, 2)?;
        let action = cap(caps, 3).to_string();

        match self.ctx.variables.get(&var_name) {
            None => {
                return Err(RuntimeError::new(format!(
                    "Variable '{}' doesn't exist!",
                    var_name
                )))
            }
            Some(value) if !value.is_numeric() => {
                return Err(RuntimeError::new(format!(
                    "Variable '{}' must be a number!",
                    var_name
                )))
            }
            Some(_) => {}
        }

        self.ctx.emit(format!("While {} < {}:", var_name, limit));

        self.ctx.loop_break = false;
        self.ctx.loop_continue = false;
        let mut iterations = 0;

        loop {
            let current = match self.ctx.variables.get(&var_name).and_then(|v| v.as_number()) {
                Some(n) if n < limit && iterations < WHILE_ITERATION_CAP => n,
                _ => break,
            };
            if self.ctx.loop_break {
                self.ctx.emit("Loop terminated by break");
                self.ctx.loop_break = false;
                break;
            }
            self.ctx
                .emit_part(format!("  {} = {}: ", var_name, crate::value::fmt_num(current)));
            self.process_command(&action)?;
            iterations += 1;
            if self.ctx.loop_continue {
                self.ctx.loop_continue = false;
            }
        }

        if iterations >= WHILE_ITERATION_CAP {
            self.ctx.emit(format!(
                "Warning: Loop stopped after {} iterations (safety limit)",
                WHILE_ITERATION_CAP
            ));
        }
        Ok(format!("while {} < {}: {}", var_name, limit, action))
    }

    pub(crate) fn count_and_do(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let start = cap_i64(caps, 1)?;
        let end = cap_i64(caps, 2)?;
        let action = cap(caps, 3).to_string();

        self.ctx.emit(format!("Counting from {} to {}:", start, end));

        self.ctx.loop_break = false;
        self.ctx.loop_continue = false;

        for i in start..=end {
            if self.ctx.loop_break {
                self.ctx.emit("Loop terminated by break");
                self.ctx.loop_break = false;
                break;
            }
            self.ctx.emit_part(format!("  Count {}: ", i));

            let shadowed = self
                .ctx
                .variables
                .insert("counter".to_string(), Value::Int(i));
            let result = self.process_command(&action);
            match shadowed {
                Some(old) => {
                    self.ctx.variables.insert("counter".to_string(), old);
                }
                None => {
                    self.ctx.variables.remove("counter");
                }
            }
            result?;

            if self.ctx.loop_continue {
                self.ctx.loop_continue = false;
            }
        }
        Ok(format!("count({}..{}): {}", start, end, action))
    }

    // ── Procedures ─────────────────────────────────────────────────────

    pub(crate) fn call_function(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let name = cap(caps, 1).to_string();
        let body = match self.ctx.procedures.get(&name) {
            Some(body) => body.clone(),
            None => return Err(self.unknown_function_error(&name)),
        };
        self.ctx.emit(format!("Calling function '{}':", name));
        self.call_procedure(&name, body)
    }

    /// Explicit call frame: snapshot the variable map, run the stored
    /// body against the shared context, restore the snapshot. Lists and
    /// the procedure registry are deliberately not scoped. Depth is
    /// bounded; blowing the bound is fatal for the whole run.
    pub(crate) fn call_procedure(
        &mut self,
        name: &str,
        body: ProcedureBody,
    ) -> Result<String, RuntimeError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::fatal(format!(
                "Procedure call depth exceeded {} levels (recursive call of '{}'?)",
                MAX_CALL_DEPTH, name
            )));
        }
        self.call_depth += 1;
        let saved = self.ctx.variables.clone();

        let result = match &body {
            ProcedureBody::Inline(action) => self.process_command(action).map(|_| ()),
            ProcedureBody::Block { body, .. } => self.execute_block_body(body),
        };

        self.ctx.variables = saved;
        self.call_depth -= 1;
        result?;
        Ok(format!("{}()", name))
    }

    fn unknown_function_error(&self, name: &str) -> RuntimeError {
        let err = RuntimeError::new(format!("Function '{}' is not defined!", name));
        if self.ctx.procedures.is_empty() {
            err.with_hint("No functions exist yet. Create one with 'define function name as action'")
        } else {
            let mut names: Vec<&str> = self.ctx.procedures.keys().map(|k| k.as_str()).collect();
            names.sort_unstable();
            names.truncate(5);
            err.with_hint(format!(
                "Available functions: {}\nTip: Define it first with 'define function {} as action'",
                names.join(", "),
                name
            ))
        }
    }

    // ── Inline conditionals ────────────────────────────────────────────

    fn numeric_variable(&self, name: &str) -> Option<f64> {
        self.ctx.variables.get(name).and_then(|v| v.as_number())
    }

    /// Equality the way the inline forms compare: integer variables
    /// against the fragment parsed as an integer, strings verbatim,
    /// everything else never equal.
    fn literal_equals(value: &Value, text: &str) -> bool {
        let text = strip_quotes(text);
        match value {
            Value::Int(i) => text.parse::<i64>().map(|n| n == *i).unwrap_or(false),
            Value::Str(s) => s == text,
            _ => false,
        }
    }

    pub(crate) fn if_greater_than(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let var_name = cap(caps, 1).to_string();
        let threshold = cap_f64(caps, 2)?;
        let action = cap(caps, 3).to_string();

        let value = self.numeric_variable(&var_name).ok_or_else(|| {
            RuntimeError::new(format!(
                "Variable '{}' doesn't exist or isn't a number!",
                var_name
            ))
        })?;

        if value > threshold {
            self.ctx.emit(format!(
                "Condition met: {} ({}) > {}",
                var_name,
                crate::value::fmt_num(value),
                crate::value::fmt_num(threshold)
            ));
            self.process_command(&action)?;
        } else {
            self.ctx.emit(format!(
                "Condition not met: {} ({}) <= {}",
                var_name,
                crate::value::fmt_num(value),
                crate::value::fmt_num(threshold)
            ));
        }
        Ok(format!("if {} > {}: {}", var_name, threshold, action))
    }

    pub(crate) fn if_less_than(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let var_name = cap(caps, 1).to_string();
        let threshold = cap_f64(caps, 2)?;
        let action = cap(caps, 3).to_string();

        let value = self.numeric_variable(&var_name).ok_or_else(|| {
            RuntimeError::new(format!(
                "Variable '{}' doesn't exist or isn't a number!",
                var_name
            ))
        })?;

        if value < threshold {
            self.ctx.emit(format!(
                "Condition met: {} ({}) < {}",
                var_name,
                crate::value::fmt_num(value),
                crate::value::fmt_num(threshold)
            ));
            self.process_command(&action)?;
        } else {
            self.ctx.emit(format!(
                "Condition not met: {} ({}) >= {}",
                var_name,
                crate::value::fmt_num(value),
                crate::value::fmt_num(threshold)
            ));
        }
        Ok(format!("if {} < {}: {}", var_name, threshold, action))
    }

    pub(crate) fn if_equals(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let var_name = cap(caps, 1).to_string();
        let expected = cap(caps, 2).to_string();
        let action = cap(caps, 3).to_string();

        let value = self
            .ctx
            .variables
            .get(&var_name)
            .cloned()
            .ok_or_else(|| RuntimeError::new(format!("Variable '{}' doesn't exist!", var_name)))?;

        if Self::literal_equals(&value, &expected) {
            self.ctx.emit(format!(
                "Condition met: {} equals {}",
                var_name,
                strip_quotes(&expected)
            ));
            self.process_command(&action)?;
        } else {
            self.ctx.emit(format!(
                "Condition not met: {} ({}) does not equal {}",
                var_name,
                value,
                strip_quotes(&expected)
            ));
        }
        Ok(format!("if {} == {}: {}", var_name, strip_quotes(&expected), action))
    }

    pub(crate) fn if_contains(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let var_name = cap(caps, 1).to_string();
        let needle = cap(caps, 2).to_string();
        let action = cap(caps, 3).to_string();

        let haystack = match self.ctx.variables.get(&var_name) {
            Some(Value::Str(s)) => s.clone(),
            _ => {
                return Err(RuntimeError::new(format!(
                    "Variable '{}' doesn't exist or isn't a string!",
                    var_name
                )))
            }
        };

        if haystack.contains(&needle) {
            self.ctx.emit(format!(
                "Condition met: '{}' contains '{}'",
                var_name, needle
            ));
            self.process_command(&action)?;
        } else {
            self.ctx.emit(format!(
                "Condition not met: '{}' does not contain '{}'",
                var_name, needle
            ));
        }
        Ok(format!("if \"{}\" in {}: {}", needle, var_name, action))
    }

    pub(crate) fn if_list_size(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let list_name = cap(caps, 1).to_string();
        let size = cap_i64(caps, 2)? as usize;
        let action = cap(caps, 3).to_string();

        let actual = self
            .ctx
            .lists
            .get(&list_name)
            .map(|items| items.len())
            .ok_or_else(|| RuntimeError::new(format!("List '{}' doesn't exist!", list_name)))?;

        if actual == size {
            self.ctx.emit(format!(
                "Condition met: list '{}' has {} items",
                list_name, size
            ));
            self.process_command(&action)?;
        } else {
            self.ctx.emit(format!(
                "Condition not met: list '{}' has {} items, not {}",
                list_name, actual, size
            ));
        }
        Ok(format!("if len({}) == {}: {}", list_name, size, action))
    }

    pub(crate) fn if_not_equals(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let var_name = cap(caps, 1).to_string();
        let expected = cap(caps, 2).to_string();
        let action = cap(caps, 3).to_string();

        let value = self
            .ctx
            .variables
            .get(&var_name)
            .cloned()
            .ok_or_else(|| RuntimeError::new(format!("Variable '{}' doesn't exist!", var_name)))?;

        if !Self::literal_equals(&value, &expected) {
            self.ctx.emit(format!(
                "Condition met: {} does NOT equal '{}'",
                var_name, expected
            ));
            self.process_command(&action)?;
        } else {
            self.ctx
                .emit(format!("Condition not met: {} equals '{}'", var_name, expected));
        }
        Ok(format!("if {} != \"{}\": {}", var_name, expected, action))
    }

    pub(crate) fn if_not_greater(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let var_name = cap(caps, 1).to_string();
        let threshold = cap_f64(caps, 2)?;
        let action = cap(caps, 3).to_string();

        let value = self.numeric_variable(&var_name).ok_or_else(|| {
            RuntimeError::new(format!(
                "Variable '{}' doesn't exist or isn't a number!",
                var_name
            ))
        })?;

        if value <= threshold {
            self.ctx.emit(format!(
                "Condition met: {} ({}) is NOT > {}",
                var_name,
                crate::value::fmt_num(value),
                crate::value::fmt_num(threshold)
            ));
            self.process_command(&action)?;
        } else {
            self.ctx.emit(format!(
                "Condition not met: {} ({}) is > {}",
                var_name,
                crate::value::fmt_num(value),
                crate::value::fmt_num(threshold)
            ));
        }
        Ok(format!("if not {} > {}: {}", var_name, threshold, action))
    }

    fn two_numeric(&self, a: &str, b: &str) -> Result<(f64, f64), RuntimeError> {
        match (self.numeric_variable(a), self.numeric_variable(b)) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(RuntimeError::new("Variables must exist and be numbers!")),
        }
    }

    pub(crate) fn if_and_greater(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let (var1, var2) = (cap(caps, 1).to_string(), cap(caps, 3).to_string());
        let (t1, t2) = (cap_f64(caps, 2)?, cap_f64(caps, 4)?);
        let action = cap(caps, 5).to_string();
        let (v1, v2) = self.two_numeric(&var1, &var2)?;

        let met = v1 > t1 && v2 > t2;
        self.emit_pair_comparison(met, &var1, v1, ">", t1, "AND", &var2, v2, t2);
        if met {
            self.process_command(&action)?;
        }
        Ok(format!("if {} > {} and {} > {}: {}", var1, t1, var2, t2, action))
    }

    pub(crate) fn if_and_less(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let (var1, var2) = (cap(caps, 1).to_string(), cap(caps, 3).to_string());
        let (t1, t2) = (cap_f64(caps, 2)?, cap_f64(caps, 4)?);
        let action = cap(caps, 5).to_string();
        let (v1, v2) = self.two_numeric(&var1, &var2)?;

        let met = v1 < t1 && v2 < t2;
        self.emit_pair_comparison(met, &var1, v1, "<", t1, "AND", &var2, v2, t2);
        if met {
            self.process_command(&action)?;
        }
        Ok(format!("if {} < {} and {} < {}: {}", var1, t1, var2, t2, action))
    }

    pub(crate) fn if_or_greater(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let (var1, var2) = (cap(caps, 1).to_string(), cap(caps, 3).to_string());
        let (t1, t2) = (cap_f64(caps, 2)?, cap_f64(caps, 4)?);
        let action = cap(caps, 5).to_string();
        let (v1, v2) = self.two_numeric(&var1, &var2)?;

        let met = v1 > t1 || v2 > t2;
        self.emit_pair_comparison(met, &var1, v1, ">", t1, "OR", &var2, v2, t2);
        if met {
            self.process_command(&action)?;
        }
        Ok(format!("if {} > {} or {} > {}: {}", var1, t1, var2, t2, action))
    }

    pub(crate) fn if_or_less(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let (var1, var2) = (cap(caps, 1).to_string(), cap(caps, 3).to_string());
        let (t1, t2) = (cap_f64(caps, 2)?, cap_f64(caps, 4)?);
        let action = cap(caps, 5).to_string();
        let (v1, v2) = self.two_numeric(&var1, &var2)?;

        let met = v1 < t1 || v2 < t2;
        self.emit_pair_comparison(met, &var1, v1, "<", t1, "OR", &var2, v2, t2);
        if met {
            self.process_command(&action)?;
        }
        Ok(format!("if {} < {} or {} < {}: {}", var1, t1, var2, t2, action))
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_pair_comparison(
        &mut self,
        met: bool,
        var1: &str,
        v1: f64,
        op: &str,
        t1: f64,
        join: &str,
        var2: &str,
        v2: f64,
        t2: f64,
    ) {
        let prefix = if met { "Condition met" } else { "Condition not met" };
        self.ctx.emit(format!(
            "{}: {} ({}) {} {} {} {} ({}) {} {}",
            prefix,
            var1,
            crate::value::fmt_num(v1),
            op,
            crate::value::fmt_num(t1),
            join,
            var2,
            crate::value::fmt_num(v2),
            op,
            crate::value::fmt_num(t2)
        ));
    }

    pub(crate) fn if_and_equals(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        self.if_equals_pair(caps, true)
    }

    pub(crate) fn if_or_equals(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        self.if_equals_pair(caps, false)
    }

    fn if_equals_pair(&mut self, caps: &Captures<'_>, both: bool) -> Result<String, RuntimeError> {
        let (var1, val1) = (cap(caps, 1).to_string(), cap(caps, 2).to_string());
        let (var2, val2) = (cap(caps, 3).to_string(), cap(caps, 4).to_string());
        let action = cap(caps, 5).to_string();

        let (a, b) = match (
            self.ctx.variables.get(&var1).cloned(),
            self.ctx.variables.get(&var2).cloned(),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(RuntimeError::new(format!(
                    "Variables '{}' or '{}' don't exist!",
                    var1, var2
                )))
            }
        };

        let first = Self::literal_equals(&a, &val1);
        let second = Self::literal_equals(&b, &val2);
        let met = if both { first && second } else { first || second };
        let join = if both { "AND" } else { "OR" };

        let prefix = if met { "Condition met" } else { "Condition not met" };
        self.ctx.emit(format!(
            "{}: {} equals '{}' {} {} equals '{}'",
            prefix, var1, val1, join, var2, val2
        ));
        if met {
            self.process_command(&action)?;
        }
        let op = if both { "and" } else { "or" };
        Ok(format!(
            "if {} == \"{}\" {} {} == \"{}\": {}",
            var1, val1, op, var2, val2, action
        ))
    }

    pub(crate) fn simple_if(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let var1 = cap(caps, 1).to_string();
        let var2 = cap(caps, 2).to_string();
        let message = cap(caps, 3).to_string();

        let (a, b) = match (self.ctx.variables.get(&var1), self.ctx.variables.get(&var2)) {
            (Some(a), Some(b)) => (a.clone(), b.clone()),
            _ => {
                let mut names: Vec<&str> =
                    self.ctx.variables.keys().map(|k| k.as_str()).collect();
                names.sort_unstable();
                return Err(RuntimeError::new(format!(
                    "Unknown variable(s). Available: [{}]",
                    names.join(", ")
                )));
            }
        };

        // Int and Float compare numerically, like every other comparison.
        let equal = match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        };
        if equal {
            self.ctx.emit(&message);
        }
        Ok(format!("if {} == {}: print(\"{}\")", var1, var2, message))
    }

    // ── Benchmarking ───────────────────────────────────────────────────

    pub(crate) fn run_benchmark(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        const ITERATIONS: usize = 500;
        let samples = [
            "print \"hello world\"",
            "add 5 and 3",
            "set variable to 10",
            "repeat 3 times: print \"test\"",
            "if x equals 5 then print \"match\"",
            "create list items with 1, 2, 3",
            "call function test",
            "calculate the sine of 45",
            "save \"text\" to test.txt",
            "check the type of variable",
        ];

        self.ctx.emit(format!(
            "Benchmarking {} iterations with {} commands...",
            ITERATIONS,
            samples.len()
        ));

        let rules = self.rules();
        let start = Instant::now();
        let mut matched = 0usize;
        for _ in 0..ITERATIONS {
            for sample in &samples {
                if rules.iter().any(|r| r.pattern.is_match(sample)) {
                    matched += 1;
                }
            }
        }
        let elapsed = start.elapsed();
        let dispatches = ITERATIONS * samples.len();

        self.ctx.emit("Performance Results:");
        self.ctx.emit(format!(
            "  Total matching time: {:.4}s for {} dispatches ({} matched)",
            elapsed.as_secs_f64(),
            dispatches,
            matched
        ));
        self.ctx.emit(format!(
            "  Average per dispatch: {:.1}us",
            elapsed.as_secs_f64() * 1e6 / dispatches as f64
        ));
        Ok("benchmark()".to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;

    fn run(interp: &mut Interpreter, cmd: &str) -> Option<String> {
        interp.process_command(cmd).expect("command is not fatal")
    }

    #[test]
    fn repeat_runs_command_n_times() {
        let mut interp = Interpreter::new();
        run(&mut interp, "repeat 3 times: print \"hi\"");
        let output = interp.take_output();
        assert_eq!(output.matches("hi\n").count(), 3);
        assert!(output.contains("Repeating 'print \"hi\"' 3 times:"));
    }

    #[test]
    fn foreach_binds_and_restores_item() {
        let mut interp = Interpreter::new();
        run(&mut interp, "set item to \"original\"");
        run(&mut interp, "create list pets with cat, dog");
        run(&mut interp, "for each item in list pets do print item");
        let output = interp.take_output();
        assert!(output.contains("cat"));
        assert!(output.contains("dog"));
        assert_eq!(
            interp.context().variables["item"],
            crate::value::Value::Str("original".to_string())
        );
    }

    #[test]
    fn while_counts_up_with_safety_cap() {
        let mut interp = Interpreter::new();
        run(&mut interp, "set n to 0");
        // The body never changes `n`, so the cap has to stop the loop.
        run(&mut interp, "while n is less than 5 do print \"tick\"");
        let output = interp.take_output();
        assert_eq!(output.matches("tick\n").count(), 100);
        assert!(output.contains("Warning: Loop stopped after 100 iterations (safety limit)"));
    }

    #[test]
    fn inline_conditional_runs_action_when_met() {
        let mut interp = Interpreter::new();
        run(&mut interp, "set x to 5");
        let outcome = run(&mut interp, "if x is greater than 3 then print \"big\"");
        assert!(outcome.is_some());
        let output = interp.take_output();
        assert!(output.contains("Condition met: x (5) > 3"));
        assert!(output.contains("big\n"));
    }

    #[test]
    fn inline_conditional_skips_action_when_not_met() {
        let mut interp = Interpreter::new();
        run(&mut interp, "set x to 2");
        run(&mut interp, "if x is greater than 3 then print \"big\"");
        let output = interp.take_output();
        assert!(output.contains("Condition not met: x (2) <= 3"));
        assert!(!output.contains("big\n"));
    }

    #[test]
    fn and_conditional_requires_both() {
        let mut interp = Interpreter::new();
        run(&mut interp, "set a to 5");
        run(&mut interp, "set b to 1");
        run(
            &mut interp,
            "if a is greater than 2 and b is greater than 2 then print \"both\"",
        );
        let output = interp.take_output();
        assert!(output.contains("Condition not met"));
        assert!(!output.contains("both\n"));
    }

    #[test]
    fn or_conditional_requires_one() {
        let mut interp = Interpreter::new();
        run(&mut interp, "set a to 5");
        run(&mut interp, "set b to 1");
        run(
            &mut interp,
            "if a is greater than 2 or b is greater than 2 then print \"either\"",
        );
        let output = interp.take_output();
        assert!(output.contains("Condition met"));
        assert!(output.contains("either\n"));
    }

    #[test]
    fn inline_function_definition_and_call() {
        let mut interp = Interpreter::new();
        run(&mut interp, "define function greet as print \"Hello there\"");
        let outcome = run(&mut interp, "call function greet");
        assert_eq!(outcome.as_deref(), Some("greet()"));
        let output = interp.take_output();
        assert!(output.contains("Function 'greet' defined as: print \"Hello there\""));
        assert!(output.contains("Calling function 'greet':"));
        assert!(output.contains("Hello there\n"));
    }

    #[test]
    fn bare_call_and_run_forms_work() {
        let mut interp = Interpreter::new();
        run(&mut interp, "define function wave as print \"wave\"");
        assert!(run(&mut interp, "call wave").is_some());
        assert!(run(&mut interp, "run wave").is_some());
        let output = interp.take_output();
        assert_eq!(output.matches("wave\n").count(), 2);
    }

    #[test]
    fn function_calls_are_variable_scoped() {
        let mut interp = Interpreter::new();
        run(&mut interp, "set x to 1");
        run(&mut interp, "define function clobber as set x to 99");
        run(&mut interp, "call function clobber");
        // The call frame restores the caller's variables.
        assert_eq!(
            interp.context().variables["x"],
            crate::value::Value::Int(1)
        );
    }

    #[test]
    fn runaway_recursion_is_fatal() {
        let mut interp = Interpreter::new();
        run(&mut interp, "define function loop_forever as call function loop_forever");
        let result = interp.process_command("call function loop_forever");
        let err = result.expect_err("recursion must abort");
        assert!(err.fatal);
        assert!(err.message.contains("call depth exceeded"));
    }

    #[test]
    fn calling_missing_function_hints() {
        let mut interp = Interpreter::new();
        let outcome = run(&mut interp, "call function ghost");
        assert!(outcome.is_none());
        let output = interp.take_output();
        assert!(output.contains("Error: Function 'ghost' is not defined!"));
        assert!(output.contains("No functions exist yet."));
    }
}
