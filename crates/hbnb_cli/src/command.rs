//! Console line parsing.
//!
//! Accepts `verb Class args...` and `Class.verb(args...)`. Argument validation
//! (missing class, id, ...) is left to the console so both styles share the
//! same messages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_]\w*)\.(\w+)\((.*)\)$").expect("valid call regex"));

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Empty,
    Quit,
    Create {
        class: Option<String>,
    },
    Show {
        class: Option<String>,
        id: Option<String>,
    },
    Destroy {
        class: Option<String>,
        id: Option<String>,
    },
    All {
        class: Option<String>,
    },
    Count {
        class: Option<String>,
    },
    Update {
        class: Option<String>,
        id: Option<String>,
        attribute: Option<String>,
        value: Option<String>,
    },
    /// `Class.update("id", {"attr": value, ...})`.
    UpdateMap {
        class: String,
        id: String,
        fields: Map<String, Value>,
    },
    Unknown(String),
}

/// Parses one input line into a command.
pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    if let Some(captures) = CALL_RE.captures(trimmed) {
        let class = captures[1].to_string();
        let verb = &captures[2];
        let inner = captures[3].trim();

        if verb == "update" && inner.contains('{') {
            return parse_update_map(class, inner)
                .unwrap_or_else(|| Command::Unknown(trimmed.to_string()));
        }

        let mut args = vec![class];
        args.extend(split_call_args(inner));
        return build_command(verb, args, trimmed);
    }

    let mut words = split_words(trimmed);
    let verb = words.remove(0);
    build_command(&verb, words, trimmed)
}

fn build_command(verb: &str, args: Vec<String>, line: &str) -> Command {
    let mut args = args.into_iter();
    match verb {
        "quit" | "EOF" => Command::Quit,
        "create" => Command::Create { class: args.next() },
        "show" => Command::Show {
            class: args.next(),
            id: args.next(),
        },
        "destroy" => Command::Destroy {
            class: args.next(),
            id: args.next(),
        },
        "all" => Command::All { class: args.next() },
        "count" => Command::Count { class: args.next() },
        "update" => Command::Update {
            class: args.next(),
            id: args.next(),
            attribute: args.next(),
            value: args.next(),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

fn parse_update_map(class: String, inner: &str) -> Option<Command> {
    let (id_part, map_part) = split_first_unquoted_comma(inner)?;
    let map_part = map_part.trim();
    if !(map_part.starts_with('{') && map_part.ends_with('}')) {
        return None;
    }
    let fields = serde_json::from_str::<Map<String, Value>>(map_part)
        .or_else(|_| serde_json::from_str(&double_quote_strings(map_part)))
        .ok()?;
    Some(Command::UpdateMap {
        class,
        id: unquote(id_part.trim()).to_string(),
        fields,
    })
}

/// Splits at the first comma outside double quotes.
fn split_first_unquoted_comma(inner: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (index, ch) in inner.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return Some((&inner[..index], &inner[index + 1..])),
            _ => {}
        }
    }
    None
}

/// Rewrites single-quoted strings as JSON strings.
///
/// Only a quote that opens or closes a string is swapped; an apostrophe
/// inside a double-quoted string is kept, and a double quote inside a
/// single-quoted string is escaped.
fn double_quote_strings(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut opener: Option<char> = None;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match (opener, ch) {
            (None, '\'') => {
                opener = Some(ch);
                output.push('"');
            }
            (None, '"') => {
                opener = Some(ch);
                output.push('"');
            }
            (Some('"'), '\\') => {
                output.push(ch);
                output.extend(chars.next());
            }
            (Some('"'), '"') => {
                opener = None;
                output.push('"');
            }
            (Some('\''), '\\') => match chars.next() {
                Some('\'') => output.push('\''),
                Some(next) => {
                    output.push('\\');
                    output.push(next);
                }
                None => output.push('\\'),
            },
            (Some('\''), '"') => output.push_str("\\\""),
            (Some('\''), '\'') => {
                opener = None;
                output.push('"');
            }
            (_, other) => output.push(other),
        }
    }
    output
}

/// Splits on whitespace; double quotes group words and are removed.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    words.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        words.push(current);
    }
    words
}

/// Splits call arguments on commas outside double quotes.
fn split_call_args(inner: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in inner.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => segments.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    segments.push(current);

    segments
        .iter()
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .map(|segment| unquote(segment).to_string())
        .collect()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}
