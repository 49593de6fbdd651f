//! Abstract Syntax Tree node types (spec §3 "AST node", §4.2).
//!
//! One tagged enum variant per construct, following the teacher's
//! `CommandNode`/`CompoundCommandNode` style
//! (`examples/arthur-zhang-just-bash/src/ast/types.rs`) rather than
//! spec.md's more literal description of a single generic node with
//! positionally-interpreted children — spec §9's design notes explicitly
//! recommend the tagged-variant approach for an idiomatic Rust
//! reimplementation.

/// A parsed type annotation. Declared types are carried but never
/// validated beyond the runtime checks in spec §4.3/§7 (no static
/// checker, per spec §1 Non-goals).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Int,
    Float,
    Bool,
    String,
    Void,
    List(Box<TypeSpec>),
    Map(Box<TypeSpec>, Box<TypeSpec>),
    Named(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Option<TypeSpec>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: TypeSpec,
    pub is_array: bool,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Method(FunctionDef),
    Field(FieldDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub ret_ty: Option<TypeSpec>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub parent: Option<String>,
    pub members: Vec<ClassMember>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64, u32),
    Float(f64, u32),
    Str(String, u32),
    Bool(bool, u32),
    Ident(String, u32),
    ListLit(Vec<Expr>, u32),
    MapLit(Vec<(Expr, Expr)>, u32),
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr>, line: u32 },
    Unary { op: UnOp, operand: Box<Expr>, line: u32 },
    Call { callee: Box<Expr>, args: Vec<Expr>, line: u32 },
    Field { object: Box<Expr>, name: String, line: u32 },
    Index { object: Box<Expr>, index: Box<Expr>, line: u32 },
    New { class: Box<Expr>, args: Vec<Expr>, line: u32 },
}

impl Expr {
    pub fn line(&self) -> u32 {
        match self {
            Expr::Int(_, l)
            | Expr::Float(_, l)
            | Expr::Str(_, l)
            | Expr::Bool(_, l)
            | Expr::Ident(_, l)
            | Expr::ListLit(_, l)
            | Expr::MapLit(_, l)
            | Expr::Binary { line: l, .. }
            | Expr::Unary { line: l, .. }
            | Expr::Call { line: l, .. }
            | Expr::Field { line: l, .. }
            | Expr::Index { line: l, .. }
            | Expr::New { line: l, .. } => *l,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfClause {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    pub value: Option<Expr>, // None means `default`
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Print(Vec<Expr>, u32),
    VarDecl { ty: TypeSpec, is_array: bool, size: Option<Expr>, name: String, init: Option<Expr>, line: u32 },
    Assign { target: Expr, value: Expr, line: u32 },
    If { clauses: Vec<IfClause>, else_body: Option<Vec<Stmt>>, line: u32 },
    While { cond: Expr, body: Vec<Stmt>, line: u32 },
    DoWhile { body: Vec<Stmt>, cond: Expr, line: u32 },
    For { init: Option<Box<Stmt>>, cond: Option<Expr>, step: Option<Box<Stmt>>, body: Vec<Stmt>, line: u32 },
    Foreach { ty: TypeSpec, var: String, iter: Expr, body: Vec<Stmt>, line: u32 },
    Switch { subject: Expr, arms: Vec<CaseArm>, line: u32 },
    Break(u32),
    Continue(u32),
    Return(Option<Expr>, u32),
    Pass,
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Import(String, u32),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}
