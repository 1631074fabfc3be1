//! Template string parser using winnow.
//!
//! Parsing runs in two passes:
//! - A tokenizer splits the input into literal runs, `{...}` placeholders and
//!   the structural `<` / `>` characters.
//! - A grouping pass folds `<...>` pairs into optional regions with an explicit
//!   stack of open groups.

use winnow::combinator::alt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{any, take, take_while};

use super::ast::{Part, Placeholder};

/// Parse a template string into its part tree.
///
/// Parsing never fails: text that does not form a placeholder or a matched
/// optional region is kept as literal text.
pub fn parse_template(input: &str) -> Vec<Part> {
    group_optionals(tokenize(input))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Key(Placeholder),
    Open,
    Close,
}

#[derive(Debug, Clone)]
enum RawToken<'i> {
    Text(&'i str),
    Key(&'i str),
    Open,
    Close,
}

/// Split the input into tokens, recording each placeholder's byte span.
fn tokenize(input: &str) -> Vec<Token> {
    let mut remaining = input;
    let mut tokens: Vec<Token> = Vec::new();

    while !remaining.is_empty() {
        let start = input.len() - remaining.len();
        let Ok(raw) = raw_token.parse_next(&mut remaining) else {
            push_text(&mut tokens, remaining);
            break;
        };
        match raw {
            RawToken::Text(text) => push_text(&mut tokens, text),
            RawToken::Key(key) => tokens.push(Token::Key(Placeholder::new(
                key,
                start..start + key.len(),
            ))),
            RawToken::Open => tokens.push(Token::Open),
            RawToken::Close => tokens.push(Token::Close),
        }
    }

    tokens
}

/// Append literal text, merging with a preceding literal.
fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Text(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(Token::Text(text.to_string()));
    }
}

/// Parse a single token (structural character, placeholder, or literal run).
fn raw_token<'i>(input: &mut &'i str) -> ModalResult<RawToken<'i>> {
    alt((
        '<'.value(RawToken::Open),
        '>'.value(RawToken::Close),
        placeholder.map(RawToken::Key),
        literal_run.map(RawToken::Text),
        // A `{` that never closes is plain text.
        any.take().map(RawToken::Text),
    ))
    .parse_next(input)
}

/// Parse a run of characters that cannot start a token of their own.
fn literal_run<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| !matches!(c, '{' | '<' | '>')).parse_next(input)
}

/// Parse a `{...}` placeholder.
///
/// The span runs to the `}` that balances nested braces. When braces never
/// balance it ends at the first `}` instead, leaving the malformed key for the
/// formatter to report.
fn placeholder<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let len = placeholder_len(input).ok_or_else(|| ErrMode::Backtrack(ContextError::new()))?;
    take(len).parse_next(input)
}

fn placeholder_len(input: &str) -> Option<usize> {
    if !input.starts_with('{') {
        return None;
    }
    let mut depth = 0usize;
    let mut first_close = None;
    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                first_close.get_or_insert(i + 1);
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    first_close
}

/// Fold `<` / `>` tokens into optional regions.
///
/// An unmatched `>` is literal text. Groups still open at the end of input
/// are flushed back into the root, outermost first, with their `<` restored.
fn group_optionals(tokens: Vec<Token>) -> Vec<Part> {
    let mut root: Vec<Part> = Vec::new();
    let mut open: Vec<Vec<Part>> = Vec::new();

    for token in tokens {
        let part = match token {
            Token::Open => {
                open.push(Vec::new());
                continue;
            }
            Token::Close => match open.pop() {
                Some(contents) => close_group(contents),
                None => Part::Literal(">".to_string()),
            },
            Token::Text(text) => Part::Literal(text),
            Token::Key(placeholder) => Part::Key(placeholder),
        };
        open.last_mut().unwrap_or(&mut root).push(part);
    }

    for contents in open {
        root.push(Part::Literal("<".to_string()));
        root.extend(contents);
    }

    root
}

/// Classify the contents of a closed `<...>` group.
fn close_group(contents: Vec<Part>) -> Part {
    match contents.as_slice() {
        [] => Part::Literal("<>".to_string()),
        // A lone literal keeps its delimiters and is not optional.
        [Part::Literal(text)] => Part::Literal(format!("<{text}>")),
        _ => Part::Optional(contents),
    }
}
