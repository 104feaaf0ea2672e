/// Error raised while dispatching or executing a command.
///
/// Most errors are semantic (unknown variable, bad numeric domain) and are
/// reported then skipped; `fatal` marks the few failures that must abort
/// the whole script run, such as a runaway procedure recursion.
#[derive(Debug)]
pub struct RuntimeError {
    pub message: String,
    pub line: Option<usize>,
    pub hint: Option<String>,
    pub fatal: bool,
}

impl RuntimeError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            hint: None,
            fatal: false,
        }
    }

    pub(crate) fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            hint: None,
            fatal: true,
        }
    }

    pub(crate) fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub(crate) fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {})", self.message, line),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::new(err.to_string())
    }
}
