//! Input normalization.
//!
//! Every line is reduced to a [`Command`]. Dotted calls
//! (`Class.verb(args)`) are rewritten into the canonical `verb Class args`
//! form, except an `update` whose second argument is a mapping literal,
//! which becomes [`Command::UpdateDict`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static DOTTED_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w*)\.(\w+)\((.*)\)$").expect("static regex"));

/// The six store verbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Create,
    Show,
    Destroy,
    All,
    Count,
    Update,
}

impl Verb {
    pub const ALL: [Verb; 6] = [
        Self::Create,
        Self::Show,
        Self::Destroy,
        Self::All,
        Self::Count,
        Self::Update,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Show => "show",
            Self::Destroy => "destroy",
            Self::All => "all",
            Self::Count => "count",
            Self::Update => "update",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.as_str() == word)
    }

    /// One-paragraph help text shown by `help <verb>`.
    pub fn usage(&self) -> &'static str {
        match self {
            Self::Create => {
                "Creates a new instance of a class, saves it and prints the id.\n\
                 Usage: create <class name>"
            }
            Self::Show => {
                "Prints the string representation of an instance.\n\
                 Usage: show <class name> <id>  |  <class name>.show(\"<id>\")"
            }
            Self::Destroy => {
                "Deletes an instance and saves the change.\n\
                 Usage: destroy <class name> <id>  |  <class name>.destroy(\"<id>\")"
            }
            Self::All => {
                "Prints every instance, or every instance of a class.\n\
                 Usage: all [<class name>]  |  <class name>.all()"
            }
            Self::Count => {
                "Prints the number of instances, or of instances of a class.\n\
                 Usage: count [<class name>]  |  <class name>.count()"
            }
            Self::Update => {
                "Adds or updates an attribute of an instance and saves the change.\n\
                 Usage: update <class name> <id> <attribute name> \"<attribute value>\"\n\
                 \x20      <class name>.update(\"<id>\", \"<attribute name>\", \"<attribute value>\")\n\
                 \x20      <class name>.update(\"<id>\", {\"<attribute name>\": \"<value>\", ...})"
            }
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized input line.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Blank line. Never repeats the previous command.
    Empty,
    Quit,
    /// End of input.
    Eof,
    Help(Option<String>),
    /// Canonical form: a verb and its space-separated argument string.
    Verb { verb: Verb, args: String },
    /// Dotted-call `update` with a mapping literal.
    UpdateDict {
        class: String,
        id: String,
        attributes: Map<String, Value>,
    },
    Unknown(String),
}

/// Normalize one line of input.
pub fn normalize(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if let Some(command) = dotted_call(line) {
        return command;
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    match word {
        "quit" => Command::Quit,
        "EOF" => Command::Eof,
        "help" | "?" => Command::Help(rest.split_whitespace().next().map(str::to_string)),
        _ => match Verb::parse(word) {
            Some(verb) => Command::Verb {
                verb,
                args: rest.to_string(),
            },
            None => Command::Unknown(line.to_string()),
        },
    }
}

fn dotted_call(line: &str) -> Option<Command> {
    let caps = DOTTED_CALL.captures(line)?;
    let class = caps.get(1).map_or("", |m| m.as_str());
    let method = caps.get(2).map_or("", |m| m.as_str());
    let args = caps.get(3).map_or("", |m| m.as_str()).trim();

    let Some(verb) = Verb::parse(method) else {
        return Some(Command::Unknown(line.to_string()));
    };

    let parts = split_arguments(args);
    if parts.get(1).is_some_and(|p| p.starts_with('{')) {
        let id = unquote(&parts[0]).to_string();
        let Some(attributes) = parse_mapping(&parts[1..].join(",")) else {
            return Some(Command::Unknown(line.to_string()));
        };
        if verb == Verb::Update {
            return Some(Command::UpdateDict {
                class: class.to_string(),
                id,
                attributes,
            });
        }
        return Some(canonical(verb, class, &[id]));
    }

    let mut tokens: Vec<String> = parts
        .iter()
        .take(2)
        .map(|part| unquote(part).to_string())
        .collect();
    if let Some(value) = parts.get(2) {
        tokens.push(quote_value(value));
    }
    Some(canonical(verb, class, &tokens))
}

/// `verb Class tok tok ...`, or a bare verb when the class is absent so the
/// handler reports it missing.
fn canonical(verb: Verb, class: &str, tokens: &[String]) -> Command {
    if class.is_empty() {
        return Command::Verb {
            verb,
            args: String::new(),
        };
    }
    let mut args = vec![class.to_string()];
    args.extend(tokens.iter().filter(|t| !t.is_empty()).cloned());
    Command::Verb {
        verb,
        args: args.join(" "),
    }
}

/// Split a call's argument list on commas that sit outside quotes.
fn split_arguments(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in args.chars() {
        match (quote, ch) {
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (Some(q), c) if c == q => {
                quote = None;
                current.push(ch);
            }
            (None, ',') => parts.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(ch),
        }
    }
    let last = current.trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last.to_string());
    }
    parts
}

pub(crate) fn unquote(token: &str) -> &str {
    let token = token.trim();
    for q in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(q) && token.ends_with(q) {
            return &token[1..token.len() - 1];
        }
    }
    token
}

/// Value argument in the double-quoted form `update` expects.
fn quote_value(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value.to_string()
    } else {
        format!("\"{}\"", unquote(value))
    }
}

/// Parse a `{...}` literal, accepting single-quoted keys and values.
fn parse_mapping(text: &str) -> Option<Map<String, Value>> {
    let text = text.trim();
    if !text.ends_with('}') {
        return None;
    }
    serde_json::from_str(&text.replace('\'', "\"")).ok()
}
