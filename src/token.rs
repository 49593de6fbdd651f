//! Token types for the Pith lexer.
//!
//! Mirrors the teacher's `TokenType`-enum-plus-payload shape
//! (`examples/arthur-zhang-just-bash/src/parser/lexer.rs`), adapted for an
//! indentation-sensitive grammar instead of word-splitting shell syntax.

use std::fmt;

/// Kind of a lexed token. One variant per terminal named in spec §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structure
    Indent,
    Dedent,
    Newline,
    Eof,

    // Literals
    Identifier,
    Int,
    Float,
    Str,

    // Reserved words: control keywords
    If,
    Elif,
    Else,
    While,
    Do,
    For,
    Foreach,
    In,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    Pass,

    // Reserved words: declarators
    Define,
    Class,
    Extends,
    New,
    Import,

    // Reserved words: type names
    TyInt,
    TyFloat,
    TyBool,
    TyString,
    TyList,
    TyMap,
    TyVoid,

    // Reserved words: literal words
    True,
    False,
    And,
    Or,
    Print,

    // Punctuators
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Semicolon,
    Dot,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Bang,
    Assign,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexed token: kind, optional textual payload, source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Self { kind, text: text.into(), line }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})@{}", self.kind, self.text, self.line)
    }
}

lazy_static::lazy_static! {
    /// Reserved-word table, mirroring the teacher's static keyword tables
    /// in `parser/lexer.rs`.
    pub static ref KEYWORDS: std::collections::HashMap<&'static str, TokenKind> = {
        use TokenKind::*;
        let mut m = std::collections::HashMap::new();
        m.insert("if", If);
        m.insert("elif", Elif);
        m.insert("else", Else);
        m.insert("while", While);
        m.insert("do", Do);
        m.insert("for", For);
        m.insert("foreach", Foreach);
        m.insert("in", In);
        m.insert("switch", Switch);
        m.insert("case", Case);
        m.insert("default", Default);
        m.insert("break", Break);
        m.insert("continue", Continue);
        m.insert("return", Return);
        m.insert("pass", Pass);
        m.insert("define", Define);
        m.insert("class", Class);
        m.insert("extends", Extends);
        m.insert("new", New);
        m.insert("import", Import);
        m.insert("int", TyInt);
        m.insert("float", TyFloat);
        m.insert("bool", TyBool);
        m.insert("string", TyString);
        m.insert("list", TyList);
        m.insert("map", TyMap);
        m.insert("void", TyVoid);
        m.insert("true", True);
        m.insert("false", False);
        m.insert("and", And);
        m.insert("or", Or);
        m.insert("print", Print);
        m
    };
}
