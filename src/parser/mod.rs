//! Recursive-descent statement parser + Pratt expression parser (spec §4.2).
//!
//! Shaped like the teacher's `Parser { tokens, pos }` structure in
//! `examples/arthur-zhang-just-bash/src/parser/parser.rs` (one method per
//! grammar production, `peek`/`advance`/`expect` helpers), but the grammar
//! itself is written fresh for Pith's indentation-delimited syntax rather
//! than bash words.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("[line {line}] Error: {message}")]
pub struct ParseError {
    pub line: u32,
    pub message: String,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

type PResult<T> = Result<T, ParseError>;

/// Parse a complete source string into a `Program`.
pub fn parse(source: &str) -> PResult<Program> {
    let tokens = Lexer::lex(source).map_err(|e| ParseError { line: 0, message: e.to_string() })?;
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    // ---- token stream helpers ----

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn line(&self) -> u32 {
        self.peek().line
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError { line: self.line(), message: format!("expected {}, found {:?}", what, self.peek_kind()) })
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    // ---- program / blocks ----

    pub fn parse_program(&mut self) -> PResult<Program> {
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.skip_newlines();
        }
        Ok(Program { statements })
    }

    /// Block parsing: consumes `:`, optional NEWLINE, INDENT, statements
    /// until DEDENT/EOF, then DEDENT (spec §4.2 "Block parsing").
    fn parse_block(&mut self) -> PResult<Vec<Stmt>> {
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        self.expect(TokenKind::Indent, "indented block")?;
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.skip_newlines();
        }
        if self.check(TokenKind::Dedent) {
            self.advance();
        }
        Ok(statements)
    }

    /// A `case`/`default` body is a block, except a fallthrough arm
    /// (`case 2:` immediately followed by another `case`/`default` at the
    /// same indentation, spec §4.2's switch grammar) has no indented body
    /// at all — no INDENT token follows its `:`. An empty arm body
    /// executes to `Signal::Next`, which `exec`'s switch handling already
    /// treats as "fall through to the next arm".
    fn parse_case_block(&mut self) -> PResult<Vec<Stmt>> {
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        if !self.check(TokenKind::Indent) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut statements = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.skip_newlines();
        }
        if self.check(TokenKind::Dedent) {
            self.advance();
        }
        Ok(statements)
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> PResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Class => self.parse_class_def(),
            TokenKind::Define => self.parse_function_def(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Import => self.parse_import(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Foreach => self.parse_foreach(),
            TokenKind::For => self.parse_for(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Return => {
                let line = self.line();
                self.advance();
                let expr = if self.check(TokenKind::Newline) || self.check(TokenKind::Eof) || self.check(TokenKind::Dedent) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                Ok(Stmt::Return(expr, line))
            }
            TokenKind::Break => {
                let line = self.line();
                self.advance();
                Ok(Stmt::Break(line))
            }
            TokenKind::Continue => {
                let line = self.line();
                self.advance();
                Ok(Stmt::Continue(line))
            }
            TokenKind::Pass => {
                self.advance();
                Ok(Stmt::Pass)
            }
            TokenKind::TyInt | TokenKind::TyFloat | TokenKind::TyBool | TokenKind::TyString
            | TokenKind::TyList | TokenKind::TyMap | TokenKind::TyVoid => self.parse_typed_decl(),
            TokenKind::Identifier if self.peek_at(1).kind == TokenKind::Identifier => self.parse_user_typed_decl(),
            _ => self.parse_expr_or_assign_statement(),
        }
    }

    fn parse_type_name(&mut self) -> PResult<TypeSpec> {
        let ty = match self.peek_kind() {
            TokenKind::TyInt => TypeSpec::Int,
            TokenKind::TyFloat => TypeSpec::Float,
            TokenKind::TyBool => TypeSpec::Bool,
            TokenKind::TyString => TypeSpec::String,
            TokenKind::TyVoid => TypeSpec::Void,
            TokenKind::TyList => {
                self.advance();
                let mut elem = TypeSpec::Void;
                if self.matches(TokenKind::Lt) {
                    elem = self.parse_type_name()?;
                    self.expect(TokenKind::Gt, "'>'")?;
                }
                return Ok(TypeSpec::List(Box::new(elem)));
            }
            TokenKind::TyMap => {
                self.advance();
                let mut key = TypeSpec::String;
                let mut val = TypeSpec::Void;
                if self.matches(TokenKind::Lt) {
                    key = self.parse_type_name()?;
                    self.expect(TokenKind::Comma, "','")?;
                    val = self.parse_type_name()?;
                    self.expect(TokenKind::Gt, "'>'")?;
                }
                return Ok(TypeSpec::Map(Box::new(key), Box::new(val)));
            }
            TokenKind::Identifier => {
                let name = self.advance().text;
                return Ok(TypeSpec::Named(name));
            }
            _ => return Err(ParseError { line: self.line(), message: "expected type name".into() }),
        };
        self.advance();
        Ok(ty)
    }

    fn parse_typed_decl(&mut self) -> PResult<Stmt> {
        let line = self.line();
        let ty = self.parse_type_name()?;
        let mut is_array = false;
        let mut size = None;
        if self.matches(TokenKind::LBracket) {
            is_array = true;
            if !self.check(TokenKind::RBracket) {
                size = Some(self.parse_expr()?);
            }
            self.expect(TokenKind::RBracket, "']'")?;
        }
        let name = self.expect(TokenKind::Identifier, "identifier")?.text;
        let init = if self.matches(TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
        Ok(Stmt::VarDecl { ty, is_array, size, name, init, line })
    }

    /// User-typed declaration: `TypeName name [= expr]` (spec §4.2). When no
    /// initializer is given, this implementation defaults to void rather
    /// than reproducing the source's "name aliases the type" quirk (spec
    /// §9 explicitly recommends defaulting to void).
    fn parse_user_typed_decl(&mut self) -> PResult<Stmt> {
        let line = self.line();
        let ty_name = self.advance().text;
        let name = self.expect(TokenKind::Identifier, "identifier")?.text;
        let init = if self.matches(TokenKind::Assign) { Some(self.parse_expr()?) } else { None };
        Ok(Stmt::VarDecl { ty: TypeSpec::Named(ty_name), is_array: false, size: None, name, init, line })
    }

    fn parse_print(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.matches(TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Stmt::Print(args, line))
    }

    fn parse_import(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        let name_tok = self.expect(TokenKind::Str, "string literal")?;
        Ok(Stmt::Import(name_tok.text, line))
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        let mut clauses = vec![IfClause { cond, body }];
        let mut else_body = None;
        loop {
            if self.check(TokenKind::Elif) {
                self.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                clauses.push(IfClause { cond, body });
            } else if self.check(TokenKind::Else) {
                self.advance();
                else_body = Some(self.parse_block()?);
                break;
            } else {
                break;
            }
        }
        Ok(Stmt::If { clauses, else_body, line })
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body, line })
    }

    fn parse_do_while(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        let body = self.parse_block()?;
        self.expect(TokenKind::While, "'while'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Stmt::DoWhile { body, cond, line })
    }

    fn parse_foreach(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        self.expect(TokenKind::LParen, "'('")?;
        let ty = self.parse_type_name()?;
        let var = self.expect(TokenKind::Identifier, "identifier")?.text;
        self.expect(TokenKind::In, "'in'")?;
        let iter = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_block()?;
        Ok(Stmt::Foreach { ty, var, iter, body, line })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        self.expect(TokenKind::LParen, "'('")?;
        let init = if self.check(TokenKind::Semicolon) { None } else { Some(Box::new(self.parse_simple_for_stmt()?)) };
        self.expect(TokenKind::Semicolon, "';'")?;
        let cond = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_expr()?) };
        self.expect(TokenKind::Semicolon, "';'")?;
        let step = if self.check(TokenKind::RParen) { None } else { Some(Box::new(self.parse_simple_for_stmt()?)) };
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_block()?;
        Ok(Stmt::For { init, cond, step, body, line })
    }

    /// A restricted statement form usable inside a C-for's init/step
    /// clauses: a typed decl or an assignment/expression, without the
    /// trailing NEWLINE that ordinary statements expect.
    fn parse_simple_for_stmt(&mut self) -> PResult<Stmt> {
        match self.peek_kind() {
            TokenKind::TyInt | TokenKind::TyFloat | TokenKind::TyBool | TokenKind::TyString
            | TokenKind::TyList | TokenKind::TyMap | TokenKind::TyVoid => self.parse_typed_decl(),
            _ => {
                let line = self.line();
                let expr = self.parse_expr()?;
                if self.matches(TokenKind::Assign) {
                    let value = self.parse_expr()?;
                    Ok(Stmt::Assign { target: expr, value, line })
                } else {
                    Ok(Stmt::Expr(expr))
                }
            }
        }
    }

    fn parse_switch(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        self.expect(TokenKind::LParen, "'('")?;
        let subject = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        self.expect(TokenKind::Indent, "indented switch body")?;
        let mut arms = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
            if self.matches(TokenKind::Case) {
                let value = self.parse_expr()?;
                let body = self.parse_case_block()?;
                arms.push(CaseArm { value: Some(value), body });
            } else if self.matches(TokenKind::Default) {
                let body = self.parse_case_block()?;
                arms.push(CaseArm { value: None, body });
            } else {
                return Err(ParseError { line: self.line(), message: "expected 'case' or 'default'".into() });
            }
            self.skip_newlines();
        }
        if self.check(TokenKind::Dedent) {
            self.advance();
        }
        Ok(Stmt::Switch { subject, arms, line })
    }

    fn parse_function_def(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        let ret_ty = self.parse_optional_leading_type()?;
        let name = self.expect(TokenKind::Identifier, "function name")?.text;
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            params.push(self.parse_param()?);
            while self.matches(TokenKind::Comma) {
                params.push(self.parse_param()?);
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_block()?;
        Ok(Stmt::FunctionDef(FunctionDef { name, ret_ty, params, body, line }))
    }

    fn parse_param(&mut self) -> PResult<Param> {
        let ty = if self.is_type_start() { Some(self.parse_type_name()?) } else { None };
        let name = self.expect(TokenKind::Identifier, "parameter name")?.text;
        Ok(Param { ty, name })
    }

    fn is_type_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::TyInt
                | TokenKind::TyFloat
                | TokenKind::TyBool
                | TokenKind::TyString
                | TokenKind::TyList
                | TokenKind::TyMap
                | TokenKind::TyVoid
        ) || (self.peek_kind() == TokenKind::Identifier && self.peek_at(1).kind == TokenKind::Identifier)
    }

    /// `define [ReturnType] Name(...)`: the return type is optional and
    /// only present when followed by another identifier/keyword before `(`.
    fn parse_optional_leading_type(&mut self) -> PResult<Option<TypeSpec>> {
        if self.is_type_start() {
            Ok(Some(self.parse_type_name()?))
        } else {
            Ok(None)
        }
    }

    fn parse_class_def(&mut self) -> PResult<Stmt> {
        let line = self.line();
        self.advance();
        let name = self.expect(TokenKind::Identifier, "class name")?.text;
        let parent = if self.matches(TokenKind::Extends) {
            Some(self.expect(TokenKind::Identifier, "parent class name")?.text)
        } else {
            None
        };
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        self.expect(TokenKind::Indent, "indented class body")?;
        let mut members = Vec::new();
        self.skip_newlines();
        while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
            if self.matches(TokenKind::Pass) {
                // discarded per spec §4.2
            } else if self.check(TokenKind::Define) {
                if let Stmt::FunctionDef(f) = self.parse_function_def()? {
                    members.push(ClassMember::Method(f));
                }
            } else {
                let ty = self.parse_type_name()?;
                let mut is_array = false;
                if self.matches(TokenKind::LBracket) {
                    is_array = true;
                    self.expect(TokenKind::RBracket, "']'")?;
                }
                let fname = self.expect(TokenKind::Identifier, "field name")?.text;
                members.push(ClassMember::Field(FieldDecl { ty, is_array, name: fname }));
            }
            self.skip_newlines();
        }
        if self.check(TokenKind::Dedent) {
            self.advance();
        }
        Ok(Stmt::ClassDef(ClassDef { name, parent, members, line }))
    }

    fn parse_expr_or_assign_statement(&mut self) -> PResult<Stmt> {
        let line = self.line();
        let expr = self.parse_expr()?;
        if self.matches(TokenKind::Assign) {
            let value = self.parse_expr()?;
            Ok(Stmt::Assign { target: expr, value, line })
        } else {
            Ok(Stmt::Expr(expr))
        }
    }

    // ---- expressions: Pratt / precedence-climbing (spec §4.2) ----

    pub fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.check(TokenKind::Or) {
            let line = self.line();
            self.advance();
            let rhs = self.parse_and()?;
            lhs = Expr::Binary { op: BinOp::Or, lhs: Box::new(lhs), rhs: Box::new(rhs), line };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.check(TokenKind::And) {
            let line = self.line();
            self.advance();
            let rhs = self.parse_equality()?;
            lhs = Expr::Binary { op: BinOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs), line };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Eq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), line };
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::GtEq => BinOp::GtEq,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), line };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), line };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_power()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let rhs = self.parse_power()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), line };
        }
        Ok(lhs)
    }

    /// `^` is left-associative, matching the source's behavior per spec
    /// §4.2/§9 (flagged there as a candidate for a future, right-associative
    /// version, but not changed here).
    fn parse_power(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while self.check(TokenKind::Caret) {
            let line = self.line();
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary { op: BinOp::Pow, lhs: Box::new(lhs), rhs: Box::new(rhs), line };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let line = self.line();
        if self.matches(TokenKind::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary { op: UnOp::Neg, operand: Box::new(operand), line });
        }
        if self.matches(TokenKind::Bang) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary { op: UnOp::Not, operand: Box::new(operand), line });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let line = self.line();
            if self.matches(TokenKind::LParen) {
                let mut args = Vec::new();
                if !self.check(TokenKind::RParen) {
                    args.push(self.parse_expr()?);
                    while self.matches(TokenKind::Comma) {
                        args.push(self.parse_expr()?);
                    }
                }
                self.expect(TokenKind::RParen, "')'")?;
                expr = Expr::Call { callee: Box::new(expr), args, line };
            } else if self.matches(TokenKind::Dot) {
                let name = self.expect(TokenKind::Identifier, "field/method name")?.text;
                expr = Expr::Field { object: Box::new(expr), name, line };
            } else if self.matches(TokenKind::LBracket) {
                let index = self.parse_expr()?;
                self.expect(TokenKind::RBracket, "']'")?;
                expr = Expr::Index { object: Box::new(expr), index: Box::new(index), line };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let line = self.line();
        match self.peek_kind() {
            TokenKind::Int => {
                let text = self.advance().text;
                let v: i64 = text.parse().map_err(|_| ParseError { line, message: format!("invalid integer literal '{}'", text) })?;
                Ok(Expr::Int(v, line))
            }
            TokenKind::Float => {
                let text = self.advance().text;
                let v: f64 = text.parse().map_err(|_| ParseError { line, message: format!("invalid float literal '{}'", text) })?;
                Ok(Expr::Float(v, line))
            }
            TokenKind::Str => Ok(Expr::Str(self.advance().text, line)),
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true, line))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false, line))
            }
            TokenKind::Identifier => Ok(Expr::Ident(self.advance().text, line)),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                if !self.check(TokenKind::RBracket) {
                    items.push(self.parse_expr()?);
                    while self.matches(TokenKind::Comma) {
                        if self.check(TokenKind::RBracket) {
                            break;
                        }
                        items.push(self.parse_expr()?);
                    }
                }
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(Expr::ListLit(items, line))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut items = Vec::new();
                if !self.check(TokenKind::RBrace) {
                    items.push(self.parse_map_entry()?);
                    while self.matches(TokenKind::Comma) {
                        if self.check(TokenKind::RBrace) {
                            break;
                        }
                        items.push(self.parse_map_entry()?);
                    }
                }
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(Expr::MapLit(items, line))
            }
            TokenKind::New => {
                self.advance();
                let call = self.parse_postfix()?;
                match call {
                    Expr::Call { callee, args, .. } => Ok(Expr::New { class: callee, args, line }),
                    other => Ok(Expr::New { class: Box::new(other), args: Vec::new(), line }),
                }
            }
            other => Err(ParseError { line, message: format!("unexpected token {:?}", other) }),
        }
    }

    fn parse_map_entry(&mut self) -> PResult<(Expr, Expr)> {
        let key = self.parse_expr()?;
        self.expect(TokenKind::Colon, "':'")?;
        let value = self.parse_expr()?;
        Ok((key, value))
    }
}
