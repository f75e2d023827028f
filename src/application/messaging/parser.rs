//! Message parser - Splits chat text into argument vectors

/// Scanner mode while splitting text into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Next character is literal; `in_double` says which mode to return to.
    Escaped { in_double: bool },
    InSingleQuote,
    InDoubleQuote,
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split `text` into words, shell style.
///
/// Quotes group words and are dropped; a backslash escapes the next character
/// except inside single quotes, where it is literal. Unterminated quotes or a
/// trailing backslash are not errors: whatever was collected is kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut mode = Mode::Normal;

    for c in text.chars() {
        mode = match (mode, c) {
            (Mode::Escaped { in_double }, c) => {
                word.push(c);
                if in_double {
                    Mode::InDoubleQuote
                } else {
                    Mode::Normal
                }
            }
            (Mode::InSingleQuote, '\'') => Mode::Normal,
            (Mode::InSingleQuote, c) => {
                word.push(c);
                Mode::InSingleQuote
            }
            (Mode::InDoubleQuote, '"') => Mode::Normal,
            (Mode::InDoubleQuote, '\\') => Mode::Escaped { in_double: true },
            (Mode::InDoubleQuote, c) => {
                word.push(c);
                Mode::InDoubleQuote
            }
            (Mode::Normal, '\\') => Mode::Escaped { in_double: false },
            (Mode::Normal, '"') => Mode::InDoubleQuote,
            (Mode::Normal, '\'') => Mode::InSingleQuote,
            (Mode::Normal, c) if is_separator(c) => {
                if !word.is_empty() {
                    words.push(std::mem::take(&mut word));
                }
                Mode::Normal
            }
            (Mode::Normal, c) => {
                word.push(c);
                Mode::Normal
            }
        };
    }

    if !word.is_empty() {
        words.push(word);
    }
    words
}

/// Recognizes messages addressed to the bot
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parser for the `!<name>` prefix.
    pub fn for_bot(name: &str) -> Self {
        Self::new(format!("!{}", name))
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Tokenize `text` and return the words after the prefix, or `None` when
    /// the first word is not exactly the prefix.
    pub fn parse(&self, text: &str) -> Option<Vec<String>> {
        let mut args = tokenize(text);
        if args.first().map(String::as_str) != Some(self.command_prefix.as_str()) {
            return None;
        }
        args.remove(0);
        Some(args)
    }
}
