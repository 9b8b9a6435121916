//! Line-oriented terminal I/O, including the blocking dialogs.

use kbase_core::Confirmer;
use std::io::{BufRead, Write};

pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one line without its terminator; `None` on end of input.
    pub fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }

    /// Writes `text` followed by a newline. Write failures are ignored.
    pub fn say(&mut self, text: &str) {
        let _ = writeln!(self.output, "{text}");
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{question} ");
        let _ = self.output.flush();
        self.read_line()
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Confirmer for Terminal<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        self.ask(&format!("{message} [y/N]"))
            .map(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
            .unwrap_or(false)
    }

    /// An empty line or end of input counts as cancel.
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.ask(&format!("{message}:"))
            .filter(|answer| !answer.is_empty())
    }

    fn alert(&mut self, message: &str) {
        self.say(&format!("! {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::Terminal;
    use kbase_core::Confirmer;
    use std::io::Cursor;

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn confirm_accepts_only_yes() {
        assert!(terminal("y\n").confirm("delete?"));
        assert!(!terminal("n\n").confirm("delete?"));
        assert!(!terminal("").confirm("delete?"));
    }

    #[test]
    fn prompt_keeps_inner_whitespace_and_treats_empty_as_cancel() {
        assert_eq!(
            terminal("KPI 指標 \n").prompt("title"),
            Some("KPI 指標 ".to_string())
        );
        assert_eq!(terminal("\n").prompt("title"), None);
    }

    #[test]
    fn alert_is_written() {
        let mut term = terminal("");
        term.alert("Title does not match. Deletion aborted.");
        let output = String::from_utf8(term.into_output()).expect("utf-8");
        assert!(output.contains("Title does not match"));
    }
}
