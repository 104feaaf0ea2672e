use super::Value;

/// Format a float the way results are echoed: whole values lose the
/// fractional part (`8` rather than `8.0`), everything else keeps the
/// shortest round-trip form.
pub fn fmt_num(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 9.0e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", fmt_num(*x)),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::List(items) => write!(f, "{}", list_repr(items)),
        }
    }
}

impl Value {
    /// Quoting form, used when values are shown inside listings where a
    /// string must be distinguishable from a number (`'5'` vs `5`).
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s),
            Value::List(items) => list_repr(items),
            other => other.to_string(),
        }
    }
}

/// `[1, 'two', 3]` -- strings quoted, everything else plain.
pub fn list_repr(items: &[Value]) -> String {
    let parts: Vec<String> = items.iter().map(|v| v.repr()).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_drop_fraction() {
        assert_eq!(fmt_num(8.0), "8");
        assert_eq!(fmt_num(-3.0), "-3");
        assert_eq!(fmt_num(2.5), "2.5");
    }

    #[test]
    fn list_repr_quotes_strings() {
        let items = vec![
            Value::Int(1),
            Value::Str("two".to_string()),
            Value::Float(3.5),
        ];
        assert_eq!(list_repr(&items), "[1, 'two', 3.5]");
    }

    #[test]
    fn bool_display() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Bool(false).to_string(), "False");
    }
}
