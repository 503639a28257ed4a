//! Word splitting and expansion.
//!
//! A line is first split into [`Word`]s, each remembering which of its
//! characters were quoted. Expansion then runs per word:
//!
//! 1. a leading unquoted `~` becomes the home directory,
//! 2. `$NAME` and `${NAME}` become variable values (undefined names are kept
//!    verbatim),
//! 3. a second substitution pass picks up references that step 2 produced.
//!
//! Single-quoted and backslash-escaped text is never expanded. Double-quoted
//! text gets variable expansion but not `~`.

use std::borrow::Cow;
use std::collections::HashMap;

use vshell_types::error::{Result, ShellError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    Bare,
    Double,
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    text: String,
    quoting: Quoting,
}

/// One shell word, split into runs of identically quoted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    segments: Vec<Segment>,
}

impl Word {
    fn push(&mut self, ch: char, quoting: Quoting) {
        match self.segments.last_mut() {
            Some(seg) if seg.quoting == quoting => seg.text.push(ch),
            _ => self.segments.push(Segment {
                text: ch.to_string(),
                quoting,
            }),
        }
    }

    /// The word's text with quotes removed and nothing expanded.
    pub fn literal(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Split a command line into words.
///
/// - Single quotes preserve everything literally.
/// - Double quotes group text; `\"`, `\\` and `\$` are escapes inside them.
/// - A backslash outside quotes makes the next character literal.
/// - Unquoted whitespace separates words. `''` and `""` yield an empty word.
pub fn tokenize(input: &str) -> Result<Vec<Word>> {
    let mut words = Vec::new();
    let mut current = Word::default();
    let mut in_word = false;
    let mut chars = input.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch, Quoting::Literal);
            }
        } else if in_double {
            match ch {
                '"' => in_double = false,
                '\\' if matches!(chars.peek(), Some('"' | '\\' | '$')) => {
                    if let Some(next) = chars.next() {
                        current.push(next, Quoting::Literal);
                    }
                },
                _ => current.push(ch, Quoting::Double),
            }
        } else {
            match ch {
                '\'' => {
                    in_single = true;
                    in_word = true;
                },
                '"' => {
                    in_double = true;
                    in_word = true;
                },
                '\\' => match chars.next() {
                    Some(next) => {
                        current.push(next, Quoting::Literal);
                        in_word = true;
                    },
                    None => return Err(ShellError::Parse("no escaped character".to_string())),
                },
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                },
                _ => {
                    current.push(ch, Quoting::Bare);
                    in_word = true;
                },
            }
        }
    }

    if in_single {
        return Err(ShellError::Parse("unterminated single quote".to_string()));
    }
    if in_double {
        return Err(ShellError::Parse("unterminated double quote".to_string()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Expands words against a variable map.
pub struct Expander<'a> {
    vars: &'a HashMap<String, String>,
    home_var: &'a str,
    home_fallback_var: &'a str,
}

impl<'a> Expander<'a> {
    pub fn new(
        vars: &'a HashMap<String, String>,
        home_var: &'a str,
        home_fallback_var: &'a str,
    ) -> Self {
        Self {
            vars,
            home_var,
            home_fallback_var,
        }
    }

    /// Home directory, from the primary variable or its fallback.
    pub fn home(&self) -> Option<&'a str> {
        self.vars
            .get(self.home_var)
            .or_else(|| self.vars.get(self.home_fallback_var))
            .map(String::as_str)
    }

    pub fn expand_word(&self, word: &Word) -> String {
        let mut out = String::new();
        for (i, seg) in word.segments.iter().enumerate() {
            match seg.quoting {
                Quoting::Literal => out.push_str(&seg.text),
                Quoting::Double => out.push_str(&self.substitute(&seg.text)),
                Quoting::Bare => {
                    let text = if i == 0 {
                        self.expand_tilde(&seg.text)
                    } else {
                        Cow::Borrowed(seg.text.as_str())
                    };
                    out.push_str(&self.substitute(&text));
                },
            }
        }
        out
    }

    /// Replace a leading `~` (alone or before `/`) with the home directory.
    /// Left untouched when no home variable is set.
    fn expand_tilde<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let Some(rest) = text.strip_prefix('~') else {
            return Cow::Borrowed(text);
        };
        if !(rest.is_empty() || rest.starts_with('/')) {
            return Cow::Borrowed(text);
        }
        match self.home() {
            Some(home) => Cow::Owned(format!("{home}{rest}")),
            None => Cow::Borrowed(text),
        }
    }

    /// Variable substitution followed by the catch-all second pass.
    fn substitute(&self, text: &str) -> String {
        let first = self.expand_vars(text);
        self.expand_vars(&first)
    }

    fn expand_vars(&self, input: &str) -> String {
        if !input.contains('$') {
            return input.to_string();
        }
        let mut result = String::with_capacity(input.len());
        let chars: Vec<char> = input.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if chars[i] != '$' || i + 1 >= chars.len() {
                result.push(chars[i]);
                i += 1;
                continue;
            }
            // ${NAME}
            if chars[i + 1] == '{'
                && let Some(end) = chars[i + 2..].iter().position(|&c| c == '}')
            {
                let name: String = chars[i + 2..i + 2 + end].iter().collect();
                match self.vars.get(&name) {
                    Some(value) if !name.is_empty() => result.push_str(value),
                    _ => result.extend(&chars[i..i + 3 + end]),
                }
                i += 3 + end;
                continue;
            }
            // $NAME
            let start = i + 1;
            let mut end = start;
            while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
                end += 1;
            }
            if end > start {
                let name: String = chars[start..end].iter().collect();
                match self.vars.get(&name) {
                    Some(value) => result.push_str(value),
                    None => result.extend(&chars[i..end]),
                }
                i = end;
                continue;
            }
            result.push('$');
            i += 1;
        }
        result
    }
}
