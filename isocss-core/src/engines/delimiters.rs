//! Strict block-structure check run before compiling a stylesheet.
//!
//! Plain CSS parsers silently close any block left open at end of input. The
//! namespacing grammar does not: an unterminated rule, string or comment is a
//! compile error, reported at the offending position.

use crate::errors::{IsolateError, SourceLocation};

struct Cursor {
    line: u32,
    column: u32,
}

impl Cursor {
    fn location(&self) -> SourceLocation {
        SourceLocation { line: self.line, column: self.column }
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

fn compile_error(message: String, location: SourceLocation) -> IsolateError {
    IsolateError::Compile { message, location: Some(location) }
}

fn closing_for(open: char) -> char {
    match open {
        '{' => '}',
        '(' => ')',
        _ => ']',
    }
}

/// Verifies that brackets, strings and comments in `source` are balanced and closed.
pub fn check_delimiters(source: &str) -> Result<(), IsolateError> {
    let mut open: Vec<(char, SourceLocation)> = Vec::new();
    let mut cursor = Cursor { line: 1, column: 1 };
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        let here = cursor.location();
        cursor.advance(c);

        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    cursor.advance(escaped);
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                cursor.advance('*');
                let mut closed = false;
                let mut previous = '\0';
                for inner in chars.by_ref() {
                    cursor.advance(inner);
                    if previous == '*' && inner == '/' {
                        closed = true;
                        break;
                    }
                    previous = inner;
                }
                if !closed {
                    return Err(compile_error("Unterminated comment".to_string(), here));
                }
            }
            '"' | '\'' => {
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    if inner == '\n' {
                        break;
                    }
                    cursor.advance(inner);
                    if inner == '\\' {
                        if let Some(escaped) = chars.next() {
                            cursor.advance(escaped);
                        }
                    } else if inner == c {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(compile_error("Unterminated string".to_string(), here));
                }
            }
            '{' | '(' | '[' => open.push((c, here)),
            '}' | ')' | ']' => match open.pop() {
                Some((opener, _)) if closing_for(opener) == c => {}
                Some((opener, at)) => {
                    return Err(compile_error(
                        format!("Unexpected '{}', expected '{}' to close '{}' opened at {}", c, closing_for(opener), opener, at),
                        here,
                    ));
                }
                None => {
                    return Err(compile_error(format!("Unexpected '{}'", c), here));
                }
            },
            _ => {}
        }
    }

    match open.pop() {
        Some((opener, at)) => Err(compile_error(
            format!("Missing closing '{}' for '{}'", closing_for(opener), opener),
            at,
        )),
        None => Ok(()),
    }
}
