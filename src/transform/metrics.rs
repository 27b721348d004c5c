//! Size, operator and nesting heuristics for DataWeave scripts.
//!
//! The script is never evaluated. String literals and comments are blanked
//! out first so that words and brackets inside them do not count.

use regex::Regex;
use std::sync::LazyLock;

/// Keyword operators and control constructs counted as one construct each
const KEYWORD_OPERATORS: &[&str] = &[
    "map",
    "mapObject",
    "filter",
    "filterObject",
    "reduce",
    "groupBy",
    "orderBy",
    "distinctBy",
    "pluck",
    "flatMap",
    "flatten",
    "joinBy",
    "splitBy",
    "match",
    "matches",
    "update",
    "zip",
    "unzip",
    "scan",
    "replace",
    "with",
    "default",
    "contains",
    "sizeOf",
    "if",
    "else",
    "unless",
    "using",
    "do",
    "fun",
    "var",
    "import",
    "case",
    "as",
    "is",
    "and",
    "or",
    "not",
];

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("static regex"));

/// Raw measurements of one script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptMetrics {
    pub lines: usize,
    pub operators: usize,
    pub nesting_depth: usize,
}

/// Measure a complete script.
#[must_use]
pub fn measure(source: &str) -> ScriptMetrics {
    let code = strip_literals(source);
    ScriptMetrics {
        lines: source.lines().count(),
        operators: count_operators(&code),
        nesting_depth: max_nesting(&code),
    }
}

/// Measure a script embedded in markup.
///
/// Blank lines before the first and after the last line of code are not
/// counted.
#[must_use]
pub fn measure_inline(text: &str) -> ScriptMetrics {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());

    match (first, last) {
        (Some(first), Some(last)) => {
            let mut metrics = measure(&lines[first..=last].join("\n"));
            metrics.lines = last - first + 1;
            metrics
        }
        _ => ScriptMetrics::default(),
    }
}

/// Count keyword operators plus function-call sites.
///
/// An identifier followed by `(` is a call site unless it is itself a
/// keyword, so `if (` counts once.
fn count_operators(code: &str) -> usize {
    IDENTIFIER
        .find_iter(code)
        .filter(|m| {
            let word = m.as_str();
            if KEYWORD_OPERATORS.contains(&word) {
                return true;
            }
            // Namespaced calls such as `Strings::camelize(` land here too.
            code[m.end()..].trim_start().starts_with('(')
        })
        .count()
}

/// Deepest nesting of `()`, `[]` and `{}`.
fn max_nesting(code: &str) -> usize {
    let mut depth: usize = 0;
    let mut max = 0;
    for c in code.chars() {
        match c {
            '(' | '[' | '{' => {
                depth += 1;
                max = max.max(depth);
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LexState {
    Code,
    Str(char),
    LineComment,
    BlockComment,
}

/// Replace string literals and comments with spaces, keeping newlines.
fn strip_literals(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = LexState::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            LexState::Code => match c {
                '"' | '\'' | '`' => {
                    state = LexState::Str(c);
                    out.push(' ');
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = LexState::LineComment;
                    out.push_str("  ");
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = LexState::BlockComment;
                    out.push_str("  ");
                }
                _ => out.push(c),
            },
            LexState::Str(quote) => {
                if c == '\\' {
                    chars.next();
                    out.push_str("  ");
                } else {
                    if c == quote {
                        state = LexState::Code;
                    }
                    out.push(if c == '\n' { '\n' } else { ' ' });
                }
            }
            LexState::LineComment => {
                if c == '\n' {
                    state = LexState::Code;
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            LexState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = LexState::Code;
                    out.push_str("  ");
                } else {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                }
            }
        }
    }

    out
}
