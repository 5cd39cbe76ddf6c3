//! Remote command composition
//!
//! Remote commands travel to the target host as one opaque shell string, so
//! every interpolated host, path, or folder name must be quoted before it
//! reaches the wire. `ShellLine` makes that structural: values added with
//! [`ShellLine::arg`] are always escaped, and [`ShellLine::lit`] is reserved
//! for flags and other compile-time fragments.

/// Quote a value for a POSIX shell (single-quote escaping).
pub fn escape(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Builder for a remote shell command line.
#[derive(Debug, Clone)]
pub struct ShellLine {
    buf: String,
}

impl ShellLine {
    /// Start a command with a trusted program name.
    pub fn new(program: &str) -> Self {
        Self {
            buf: program.to_string(),
        }
    }

    /// A command that runs a script relative to the current directory.
    pub fn exec(script: &str) -> Self {
        Self {
            buf: format!("./{}", escape(script)),
        }
    }

    /// Append a quoted argument.
    pub fn arg(mut self, value: impl AsRef<str>) -> Self {
        self.buf.push(' ');
        self.buf.push_str(&escape(value.as_ref()));
        self
    }

    /// Append a compile-time fragment (flags, globs). Never pass runtime
    /// data here.
    pub fn lit(mut self, fragment: &str) -> Self {
        self.buf.push(' ');
        self.buf.push_str(fragment);
        self
    }

    /// Run `next` only if this command succeeded.
    pub fn and(mut self, next: ShellLine) -> Self {
        self.buf.push_str(" && ");
        self.buf.push_str(&next.buf);
        self
    }

    /// Render the final command string.
    pub fn render(self) -> String {
        self.buf
    }
}
