use std::error::Error;
use std::fmt;
use std::path::PathBuf;

pub const USAGE: &str = "usage: clai [-l <language>] [-f <context-file>] [<input-text>]

  -l <language>      print only fenced code blocks tagged with <language>
  -f <context-file>  send the file's contents as context for the question

With no <input-text>, $EDITOR is opened on a scratch file to compose it.";

/// Everything the rest of the pipeline needs from the command line.
/// All fields are fixed once parsing succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    pub input: Option<String>,
    pub language: Option<String>,
    pub context_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError {
    message: String,
}

impl UsageError {
    fn missing_value(flag: &str) -> Self {
        Self {
            message: format!("missing value for {flag}"),
        }
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for UsageError {}

/// Scans the argv tail. `-l` and `-f` each consume the next token; any
/// other token becomes the input text, the last one winning if several
/// are given.
pub fn parse(tokens: &[String]) -> Result<Invocation, UsageError> {
    let mut invocation = Invocation::default();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        match token.as_str() {
            "-l" => {
                let value = iter.next().ok_or_else(|| UsageError::missing_value("-l"))?;
                invocation.language = Some(value.clone());
            }
            "-f" => {
                let value = iter.next().ok_or_else(|| UsageError::missing_value("-f"))?;
                invocation.context_file = Some(PathBuf::from(value));
            }
            other => {
                invocation.input = Some(other.to_string());
            }
        }
    }

    Ok(invocation)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::parse;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn parse_empty_argv_leaves_everything_unset() {
        let invocation = parse(&[]).expect("empty argv should parse");
        assert_eq!(invocation.input, None);
        assert_eq!(invocation.language, None);
        assert_eq!(invocation.context_file, None);
    }

    #[test]
    fn parse_reads_language_flag() {
        let invocation = parse(&tokens(&["-l", "python", "how do I sort?"]))
            .expect("argv should parse");
        assert_eq!(invocation.language.as_deref(), Some("python"));
        assert_eq!(invocation.input.as_deref(), Some("how do I sort?"));
    }

    #[test]
    fn parse_reads_context_flag_without_touching_the_file() {
        let invocation = parse(&tokens(&["-f", "/no/such/file", "question"]))
            .expect("argv should parse");
        assert_eq!(
            invocation.context_file,
            Some(PathBuf::from("/no/such/file"))
        );
    }

    #[test]
    fn parse_accepts_flags_after_the_input_text() {
        let invocation =
            parse(&tokens(&["question", "-l", "rust"])).expect("argv should parse");
        assert_eq!(invocation.input.as_deref(), Some("question"));
        assert_eq!(invocation.language.as_deref(), Some("rust"));
    }

    #[test]
    fn parse_keeps_the_last_input_text_when_several_are_given() {
        let invocation = parse(&tokens(&["first", "second"])).expect("argv should parse");
        assert_eq!(invocation.input.as_deref(), Some("second"));
    }

    #[test]
    fn parse_rejects_trailing_language_flag() {
        let err = parse(&tokens(&["question", "-l"])).expect_err("trailing -l should fail");
        assert_eq!(err.to_string(), "missing value for -l");
    }

    #[test]
    fn parse_rejects_trailing_context_flag() {
        let err = parse(&tokens(&["question", "-f"])).expect_err("trailing -f should fail");
        assert_eq!(err.to_string(), "missing value for -f");
    }
}
