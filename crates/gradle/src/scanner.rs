use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::tree::{Declaration, DependencyArg, GStringSegment, MapEntry, Node, Script};

static DEPENDENCIES_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdependencies\s*\{").expect("hardcoded regex must compile")
});

static CONFIGURATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)([A-Za-z_][A-Za-z0-9_]*)").expect("hardcoded regex must compile")
});

/// Configuration method names recognized inside a `dependencies { }` block.
const CONFIGURATIONS: &[&str] = &[
    "api",
    "implementation",
    "compileOnly",
    "compileOnlyApi",
    "runtimeOnly",
    "testImplementation",
    "testCompileOnly",
    "testRuntimeOnly",
    "annotationProcessor",
    "testAnnotationProcessor",
    "classpath",
];

#[must_use]
pub fn is_known_configuration(name: &str) -> bool {
    CONFIGURATIONS.contains(&name)
}

/// Scan Groovy build-script text into a [`Script`].
///
/// Only single-line declarations with a known configuration name inside a
/// `dependencies { }` block become [`Node::Declaration`]; every other byte of the
/// input lands in a [`Node::Raw`] run, so `scan(s).to_source() == s` always.
#[must_use]
pub fn scan(source: &str) -> Script {
    let mut nodes: Vec<Node> = Vec::new();
    let mut cursor = 0;
    while let Some(body_start) = find_opener(source, cursor) {
        let Some(body_end) = find_block_end(source, body_start) else {
            break;
        };
        push_raw(&mut nodes, &source[cursor..body_start]);
        scan_block(&mut nodes, &source[body_start..body_end]);
        cursor = body_end;
    }
    push_raw(&mut nodes, &source[cursor..]);
    Script {
        nodes: nodes.into_iter().map(Arc::new).collect(),
        resolved: None,
    }
}

fn push_raw(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Raw(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Raw(text.to_string()));
    }
}

/// Find the next `dependencies {` opener at or after `from` that lies in plain
/// code; openers inside string literals and comments are not block starts.
/// `from` must itself be a code-state position. Returns the body start, just
/// past the `{`.
fn find_opener(source: &str, from: usize) -> Option<usize> {
    let mut search = from;
    loop {
        let found = DEPENDENCIES_OPEN.find_at(source, search)?;
        if ends_in_code(&source[from..found.start()]) {
            return Some(found.end());
        }
        search = found.start() + 1;
    }
}

/// Find the `}` closing a block whose body starts at `start` (depth 1), skipping
/// braces inside string literals and comments.
fn find_block_end(source: &str, start: usize) -> Option<usize> {
    let mut state = LexState::Code;
    let mut escaped = false;
    let mut depth = 1usize;
    let mut chars = source[start..].char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        if matches!(state, LexState::Code) {
            if ch == '{' {
                depth += 1;
            } else if ch == '}' {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
        }
        lex_step(&mut state, &mut escaped, ch, &mut chars);
    }
    None
}

/// True when `text`, scanned from a code-state start, ends outside any string
/// literal or comment.
fn ends_in_code(text: &str) -> bool {
    let mut state = LexState::Code;
    let mut escaped = false;
    let mut chars = text.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        lex_step(&mut state, &mut escaped, ch, &mut chars);
    }
    matches!(state, LexState::Code)
}

enum LexState {
    Code,
    Single,
    Double,
    LineComment,
    BlockComment,
}

/// Advance the string/comment state machine by one character. Consumes a second
/// character from `chars` when a two-character token (`/*`, `*/`) completes.
fn lex_step(
    state: &mut LexState,
    escaped: &mut bool,
    ch: char,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) {
    match state {
        LexState::Code => match ch {
            '\'' => *state = LexState::Single,
            '"' => *state = LexState::Double,
            '/' => match chars.peek() {
                Some((_, '/')) => *state = LexState::LineComment,
                Some((_, '*')) => {
                    chars.next();
                    *state = LexState::BlockComment;
                }
                _ => {}
            },
            _ => {}
        },
        LexState::Single => {
            if *escaped {
                *escaped = false;
            } else if ch == '\\' {
                *escaped = true;
            } else if ch == '\'' {
                *state = LexState::Code;
            }
        }
        LexState::Double => {
            if *escaped {
                *escaped = false;
            } else if ch == '\\' {
                *escaped = true;
            } else if ch == '"' {
                *state = LexState::Code;
            }
        }
        LexState::LineComment => {
            if ch == '\n' {
                *state = LexState::Code;
            }
        }
        LexState::BlockComment => {
            if ch == '*' && matches!(chars.peek(), Some((_, '/'))) {
                chars.next();
                *state = LexState::Code;
            }
        }
    }
}

fn scan_block(nodes: &mut Vec<Node>, body: &str) {
    for line in body.split_inclusive('\n') {
        match scan_declaration_line(line) {
            Some((indent, declaration, trailing)) => {
                push_raw(nodes, indent);
                nodes.push(Node::Declaration(declaration));
                push_raw(nodes, trailing);
            }
            None => push_raw(nodes, line),
        }
    }
}

fn scan_declaration_line(line: &str) -> Option<(&str, Declaration, &str)> {
    let caps = CONFIGURATION_LINE.captures(line)?;
    let indent = caps.get(1)?.as_str();
    let name = caps.get(2)?;
    if !is_known_configuration(name.as_str()) {
        return None;
    }
    let rest = &line[name.end()..];
    let (open, arg, close, consumed) = parse_call(rest)?;
    let declaration = Declaration {
        configuration: name.as_str().to_string(),
        open,
        arg,
        close,
    };
    Some((indent, declaration, &rest[consumed..]))
}

/// Parse `<open><arg><close>` after the configuration name: either command
/// syntax (`conf 'g:a:v'`) or call syntax (`conf('g:a:v')`).
fn parse_call(rest: &str) -> Option<(String, DependencyArg, String, usize)> {
    let mut cursor = Cursor::new(rest);
    let ws_before = cursor.take_ws().to_string();
    let parenthesized = cursor.peek() == Some('(');
    let open = if parenthesized {
        cursor.bump();
        let ws_inner = cursor.take_ws();
        format!("{ws_before}({ws_inner}")
    } else {
        if ws_before.is_empty() {
            return None;
        }
        ws_before
    };
    let arg = parse_arg(&mut cursor)?;
    let close = if parenthesized {
        let ws_inner = cursor.take_ws().to_string();
        if cursor.peek() != Some(')') {
            return None;
        }
        cursor.bump();
        format!("{ws_inner})")
    } else {
        String::new()
    };
    Some((open, arg, close, cursor.pos))
}

fn parse_arg(cursor: &mut Cursor<'_>) -> Option<DependencyArg> {
    match cursor.peek()? {
        '\'' | '"' => parse_string_arg(cursor),
        ch if ch.is_ascii_alphabetic() || ch == '_' => {
            let ident = cursor.take_identifier().to_string();
            if ident == "platform" || ident == "enforcedPlatform" {
                parse_platform(cursor, ident)
            } else {
                parse_map_style(cursor, ident)
            }
        }
        _ => None,
    }
}

fn parse_platform(cursor: &mut Cursor<'_>, function: String) -> Option<DependencyArg> {
    let ws_before = cursor.take_ws().to_string();
    if cursor.peek() != Some('(') {
        return None;
    }
    cursor.bump();
    let ws_open = cursor.take_ws();
    let open = format!("{ws_before}({ws_open}");
    let inner = parse_string_arg(cursor)?;
    let ws_close = cursor.take_ws().to_string();
    if cursor.peek() != Some(')') {
        return None;
    }
    cursor.bump();
    Some(DependencyArg::Platform {
        function,
        open,
        inner: Box::new(inner),
        close: format!("{ws_close})"),
    })
}

fn parse_map_style(cursor: &mut Cursor<'_>, first_key: String) -> Option<DependencyArg> {
    let mut entries = Vec::new();
    let mut leading = String::new();
    let mut key = first_key;
    loop {
        let ws_before = cursor.take_ws().to_string();
        if cursor.peek() != Some(':') {
            return None;
        }
        cursor.bump();
        let ws_after = cursor.take_ws();
        let separator = format!("{ws_before}:{ws_after}");
        let (quote, value) = parse_plain_quoted(cursor)?;
        entries.push(MapEntry {
            leading,
            key,
            separator,
            quote,
            value,
        });

        let checkpoint = cursor.pos;
        let ws_gap = cursor.take_ws().to_string();
        if cursor.peek() == Some(',') {
            cursor.bump();
            let ws_next = cursor.take_ws().to_string();
            leading = format!("{ws_gap},{ws_next}");
            match cursor.peek() {
                Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                    key = cursor.take_identifier().to_string();
                }
                _ => return None,
            }
        } else {
            cursor.pos = checkpoint;
            break;
        }
    }
    Some(DependencyArg::MapStyle { entries })
}

/// Parse a quoted string argument. Double-quoted text containing embedded
/// expressions becomes a [`DependencyArg::GString`]; everything else is a plain
/// [`DependencyArg::StringLiteral`].
fn parse_string_arg(cursor: &mut Cursor<'_>) -> Option<DependencyArg> {
    match cursor.peek()? {
        '\'' => {
            let (quote, value) = parse_plain_quoted(cursor)?;
            Some(DependencyArg::StringLiteral { quote, value })
        }
        '"' => {
            cursor.bump();
            let mut segments: Vec<GStringSegment> = Vec::new();
            let mut literal = String::new();
            loop {
                let ch = cursor.bump()?;
                match ch {
                    '"' => break,
                    '\\' => {
                        literal.push(ch);
                        literal.push(cursor.bump()?);
                    }
                    '$' => match cursor.peek() {
                        Some('{') => {
                            flush_literal(&mut segments, &mut literal);
                            segments.push(GStringSegment::Interpolation(parse_braced_interpolation(
                                cursor,
                            )?));
                        }
                        Some(next) if next.is_ascii_alphabetic() || next == '_' => {
                            flush_literal(&mut segments, &mut literal);
                            segments.push(GStringSegment::Interpolation(parse_dotted_interpolation(
                                cursor,
                            )));
                        }
                        _ => literal.push('$'),
                    },
                    _ => literal.push(ch),
                }
            }
            if segments.is_empty() {
                return Some(DependencyArg::StringLiteral {
                    quote: '"',
                    value: literal,
                });
            }
            flush_literal(&mut segments, &mut literal);
            Some(DependencyArg::GString { segments })
        }
        _ => None,
    }
}

fn flush_literal(segments: &mut Vec<GStringSegment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(GStringSegment::Literal(std::mem::take(literal)));
    }
}

/// `${...}` with nested-brace counting; the cursor sits on the `{`.
fn parse_braced_interpolation(cursor: &mut Cursor<'_>) -> Option<String> {
    let mut text = String::from("$");
    text.push(cursor.bump()?); // '{'
    let mut depth = 1usize;
    loop {
        let ch = cursor.bump()?;
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        text.push(ch);
        if depth == 0 {
            return Some(text);
        }
    }
}

/// `$name` or `$a.b.c`; the cursor sits on the first identifier character.
fn parse_dotted_interpolation(cursor: &mut Cursor<'_>) -> String {
    let mut text = String::from("$");
    text.push_str(cursor.take_identifier());
    loop {
        let checkpoint = cursor.pos;
        if cursor.peek() == Some('.') {
            cursor.bump();
            match cursor.peek() {
                Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                    text.push('.');
                    text.push_str(cursor.take_identifier());
                }
                _ => {
                    cursor.pos = checkpoint;
                    break;
                }
            }
        } else {
            break;
        }
    }
    text
}

/// A quoted value kept verbatim, escapes included; returns (quote, inner text).
fn parse_plain_quoted(cursor: &mut Cursor<'_>) -> Option<(char, String)> {
    let quote = cursor.peek()?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    cursor.bump();
    let mut value = String::new();
    loop {
        let ch = cursor.bump()?;
        if ch == '\\' {
            value.push(ch);
            value.push(cursor.bump()?);
        } else if ch == quote {
            return Some((quote, value));
        } else {
            value.push(ch);
        }
    }
}

struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.s[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn take_ws(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
        &self.s[start..self.pos]
    }

    fn take_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            self.bump();
        }
        &self.s[start..self.pos]
    }
}
