use std::io::{self, BufRead, Write};

/// The human reviewing each stage.
#[cfg_attr(test, mockall::automock)]
pub trait Operator {
    /// Progress line, e.g. "Generating script...".
    fn announce(&mut self, message: &str) -> io::Result<()>;

    /// Shows generated text for review.
    fn show(&mut self, heading: &str, body: &str) -> io::Result<()>;

    /// Asks a yes/no question. Only an explicit "yes" approves.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Line-based operator on any reader/writer pair (stdin/stdout in the binary).
pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
}

impl ConsoleOperator<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn announce(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()
    }

    fn show(&mut self, heading: &str, body: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}:", heading)?;
        writeln!(self.output, "{}", body)?;
        self.output.flush()
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        writeln!(self.output, "\n{} (yes/no)", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // Treating a closed stdin as "no" would regenerate forever.
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for confirmation",
            ));
        }
        Ok(is_affirmative(&line))
    }
}

/// First word must be exactly `yes`; anything else is a rejection.
pub fn is_affirmative(line: &str) -> bool {
    line.split_whitespace().next() == Some("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_affirmative_parsing() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("  yes\n"));
        assert!(is_affirmative("yes please"));

        assert!(!is_affirmative("Yes"));
        assert!(!is_affirmative("y"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yess"));
    }

    #[test]
    fn test_confirm_reads_one_line_per_question() {
        let mut op = ConsoleOperator::new(Cursor::new("no\nyes\n"), Vec::new());
        assert!(!op.confirm("Proceed?").unwrap());
        assert!(op.confirm("Proceed?").unwrap());

        let printed = String::from_utf8(op.into_output()).unwrap();
        assert_eq!(printed.matches("Proceed? (yes/no)").count(), 2);
    }

    #[test]
    fn test_confirm_on_closed_input_is_an_error() {
        let mut op = ConsoleOperator::new(Cursor::new(""), Vec::new());
        let err = op.confirm("Proceed?").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_show_prints_heading_and_body() {
        let mut op = ConsoleOperator::new(Cursor::new(""), Vec::new());
        op.show("Generated Script", "Hello there.").unwrap();
        let printed = String::from_utf8(op.into_output()).unwrap();
        assert!(printed.contains("Generated Script:\nHello there.\n"));
    }
}
