//! Indentation-aware lexer (spec §4.1).
//!
//! Drives an indentation-width stack alongside ordinary character
//! scanning, in the same "flat token array produced up front" style as
//! the teacher's `parser/lexer.rs`, but tracking columns as an extra piece
//! of state rather than bash's quote/heredoc state machine.

use crate::token::{Token, TokenKind, KEYWORDS};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("[line {line}] Error: unterminated string")]
    UnterminatedString { line: u32 },
    #[error("[line {line}] Error: unterminated block comment")]
    UnterminatedBlockComment { line: u32 },
    #[error("[line {line}] Error: inconsistent dedent (no matching indentation level)")]
    BadDedent { line: u32 },
    #[error("[line {line}] Error: unexpected character '{ch}'")]
    UnexpectedChar { line: u32, ch: char },
}

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: u32,
    /// Indentation-width stack, initialized with 0 per spec §4.1.
    indents: Vec<usize>,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
            indents: vec![0],
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    pub fn lex(source: &'a str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Self::new(source);
        lexer.run()?;
        Ok(lexer.tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>) {
        let line = self.line;
        self.tokens.push(Token::new(kind, text, line));
    }

    fn run(&mut self) -> Result<(), LexError> {
        loop {
            if self.at_line_start {
                if !self.handle_line_start()? {
                    continue;
                }
            }
            match self.peek() {
                None => break,
                Some(b'\n') => {
                    self.advance();
                    self.push(TokenKind::Newline, "\n");
                    self.at_line_start = true;
                }
                Some(b' ') | Some(b'\t') | Some(b'\r') => {
                    self.advance();
                }
                Some(b'#') => self.skip_comment()?,
                Some(c) if c.is_ascii_digit() => self.lex_number(),
                Some(b'"') => self.lex_string()?,
                Some(c) if c == b'_' || c.is_ascii_alphabetic() => self.lex_identifier(),
                Some(_) => self.lex_operator()?,
            }
        }
        self.finish_dedents();
        self.push(TokenKind::Eof, "");
        Ok(())
    }

    /// Consumes leading whitespace of a logical line and emits
    /// INDENT/DEDENT per spec §4.1. Returns `false` if the line was blank
    /// or comment-only (caller should loop back to `handle_line_start`).
    fn handle_line_start(&mut self) -> Result<bool, LexError> {
        let start = self.pos;
        let mut width = 0usize;
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') => {
                    width += 1;
                    self.advance();
                }
                _ => break,
            }
        }
        match self.peek() {
            None => {
                self.at_line_start = false;
                return Ok(true);
            }
            Some(b'\n') => {
                // Blank line: don't emit indentation tokens.
                self.advance();
                return Ok(false);
            }
            Some(b'#') => {
                if self.peek_at(1) == Some(b'#') && self.peek_at(2) == Some(b'#') {
                    // Block comment can still be "content" on the line; fall through.
                } else {
                    self.skip_comment()?;
                    return Ok(false);
                }
            }
            _ => {}
        }
        let _ = start;
        self.at_line_start = false;

        let top = *self.indents.last().unwrap();
        if width > top {
            self.indents.push(width);
            self.push(TokenKind::Indent, "");
        } else if width < top {
            loop {
                let top = *self.indents.last().unwrap();
                if width == top {
                    break;
                }
                if width > top || self.indents.len() == 1 {
                    return Err(LexError::BadDedent { line: self.line });
                }
                self.indents.pop();
                self.push(TokenKind::Dedent, "");
            }
        }
        Ok(true)
    }

    fn finish_dedents(&mut self) {
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, "");
        }
    }

    fn skip_comment(&mut self) -> Result<(), LexError> {
        if self.peek() == Some(b'#') && self.peek_at(1) == Some(b'#') && self.peek_at(2) == Some(b'#') {
            let start_line = self.line;
            self.pos += 3;
            loop {
                if self.peek().is_none() {
                    return Err(LexError::UnterminatedBlockComment { line: start_line });
                }
                if self.peek() == Some(b'#') && self.peek_at(1) == Some(b'#') && self.peek_at(2) == Some(b'#') {
                    self.pos += 3;
                    return Ok(());
                }
                self.advance();
            }
        }
        while let Some(c) = self.peek() {
            if c == b'\n' {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == b'.' {
                is_float = true;
                self.advance();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap().to_string();
        if is_float {
            self.push(TokenKind::Float, text);
        } else {
            self.push(TokenKind::Int, text);
        }
    }

    fn lex_string(&mut self) -> Result<(), LexError> {
        let start_line = self.line;
        self.advance(); // opening quote
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(LexError::UnterminatedString { line: start_line }),
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    None => return Err(LexError::UnterminatedString { line: start_line }),
                    Some(b'n') => out.push('\n'),
                    Some(b't') => out.push('\t'),
                    Some(b'\\') => out.push('\\'),
                    Some(b'"') => out.push('"'),
                    Some(b'r') => out.push('\r'),
                    Some(c) => out.push(c as char),
                },
                Some(c) => out.push(c as char),
            }
        }
        self.push(TokenKind::Str, out);
        Ok(())
    }

    fn lex_identifier(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'_' || c.is_ascii_alphanumeric() {
                self.advance();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap().to_string();
        if let Some(kind) = KEYWORDS.get(text.as_str()) {
            self.push(*kind, text);
        } else {
            self.push(TokenKind::Identifier, text);
        }
    }

    fn lex_operator(&mut self) -> Result<(), LexError> {
        let c = self.advance().unwrap();
        macro_rules! two_char {
            ($next:expr, $two:expr, $one:expr) => {{
                if self.peek() == Some($next) {
                    self.advance();
                    self.push($two, "");
                } else {
                    self.push($one, "");
                }
            }};
        }
        use TokenKind::*;
        match c {
            b'(' => self.push(LParen, ""),
            b')' => self.push(RParen, ""),
            b'[' => self.push(LBracket, ""),
            b']' => self.push(RBracket, ""),
            b'{' => self.push(LBrace, ""),
            b'}' => self.push(RBrace, ""),
            b':' => self.push(Colon, ""),
            b',' => self.push(Comma, ""),
            b';' => self.push(Semicolon, ""),
            b'.' => self.push(Dot, ""),
            b'+' => self.push(Plus, ""),
            b'-' => self.push(Minus, ""),
            b'*' => self.push(Star, ""),
            b'/' => self.push(Slash, ""),
            b'%' => self.push(Percent, ""),
            b'^' => self.push(Caret, ""),
            b'!' => two_char!(b'=', NotEq, Bang),
            b'=' => two_char!(b'=', Eq, Assign),
            b'<' => two_char!(b'=', LtEq, Lt),
            b'>' => two_char!(b'=', GtEq, Gt),
            other => return Err(LexError::UnexpectedChar { line: self.line, ch: other as char }),
        }
        Ok(())
    }
}
