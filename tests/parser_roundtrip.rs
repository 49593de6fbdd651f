//! Lex → parse → pretty-print → relex → reparse should be idempotent: the
//! AST recovered from the printed text must describe the same program as
//! the one that produced it. The printer here is a minimal, test-local
//! helper - it only needs to cover the constructs this file exercises, not
//! be a general-purpose formatter.

use pith::ast::*;
use pith::parse;

fn print_program(prog: &Program) -> String {
    let mut out = String::new();
    for stmt in &prog.statements {
        print_stmt(stmt, 0, &mut out);
    }
    out
}

fn indent(depth: usize, out: &mut String) {
    out.push_str(&"    ".repeat(depth));
}

fn print_block(body: &[Stmt], depth: usize, out: &mut String) {
    for s in body {
        print_stmt(s, depth, out);
    }
}

fn print_stmt(stmt: &Stmt, depth: usize, out: &mut String) {
    indent(depth, out);
    match stmt {
        Stmt::Expr(e) => out.push_str(&format!("{}\n", print_expr(e))),
        Stmt::Print(args, _) => {
            let joined: Vec<String> = args.iter().map(print_expr).collect();
            out.push_str(&format!("print({})\n", joined.join(", ")));
        }
        Stmt::VarDecl { ty, is_array, size, name, init, .. } => {
            out.push_str(&print_type(ty));
            if *is_array {
                out.push('[');
                if let Some(e) = size {
                    out.push_str(&print_expr(e));
                }
                out.push(']');
            }
            out.push_str(&format!(" {}", name));
            if let Some(e) = init {
                out.push_str(&format!(" = {}", print_expr(e)));
            }
            out.push('\n');
        }
        Stmt::Assign { target, value, .. } => {
            out.push_str(&format!("{} = {}\n", print_expr(target), print_expr(value)));
        }
        Stmt::If { clauses, else_body, .. } => {
            for (i, clause) in clauses.iter().enumerate() {
                if i == 0 {
                    out.push_str(&format!("if {}:\n", print_expr(&clause.cond)));
                } else {
                    indent(depth, out);
                    out.push_str(&format!("elif {}:\n", print_expr(&clause.cond)));
                }
                print_block(&clause.body, depth + 1, out);
            }
            if let Some(body) = else_body {
                indent(depth, out);
                out.push_str("else:\n");
                print_block(body, depth + 1, out);
            }
        }
        Stmt::While { cond, body, .. } => {
            out.push_str(&format!("while {}:\n", print_expr(cond)));
            print_block(body, depth + 1, out);
        }
        Stmt::DoWhile { body, cond, .. } => {
            out.push_str("do:\n");
            print_block(body, depth + 1, out);
            indent(depth, out);
            out.push_str(&format!("while ({})\n", print_expr(cond)));
        }
        Stmt::For { init, cond, step, body, .. } => {
            out.push_str("for (");
            // init/step are restricted single-line statements: print inline
            // with no trailing newline by trimming what print_stmt appends.
            if let Some(i) = init {
                let mut s = String::new();
                print_stmt(i, 0, &mut s);
                out.push_str(s.trim_end());
            }
            out.push_str("; ");
            if let Some(c) = cond {
                out.push_str(&print_expr(c));
            }
            out.push_str("; ");
            if let Some(s) = step {
                let mut tmp = String::new();
                print_stmt(s, 0, &mut tmp);
                out.push_str(tmp.trim_end());
            }
            out.push_str("):\n");
            print_block(body, depth + 1, out);
        }
        Stmt::Foreach { ty, var, iter, body, .. } => {
            out.push_str(&format!("foreach ({} {} in {}):\n", print_type(ty), var, print_expr(iter)));
            print_block(body, depth + 1, out);
        }
        Stmt::Switch { subject, arms, .. } => {
            out.push_str(&format!("switch ({}):\n", print_expr(subject)));
            for arm in arms {
                indent(depth + 1, out);
                match &arm.value {
                    Some(v) => out.push_str(&format!("case {}:\n", print_expr(v))),
                    None => out.push_str("default:\n"),
                }
                print_block(&arm.body, depth + 2, out);
            }
        }
        Stmt::Break(_) => out.push_str("break\n"),
        Stmt::Continue(_) => out.push_str("continue\n"),
        Stmt::Return(expr, _) => match expr {
            Some(e) => out.push_str(&format!("return {}\n", print_expr(e))),
            None => out.push_str("return\n"),
        },
        Stmt::Pass => out.push_str("pass\n"),
        Stmt::FunctionDef(f) => {
            let ret = f.ret_ty.as_ref().map(|t| format!("{} ", print_type(t))).unwrap_or_default();
            let params: Vec<String> = f
                .params
                .iter()
                .map(|p| match &p.ty {
                    Some(t) => format!("{} {}", print_type(t), p.name),
                    None => p.name.clone(),
                })
                .collect();
            out.push_str(&format!("define {}{}({}):\n", ret, f.name, params.join(", ")));
            print_block(&f.body, depth + 1, out);
        }
        Stmt::ClassDef(c) => {
            match &c.parent {
                Some(p) => out.push_str(&format!("class {} extends {}:\n", c.name, p)),
                None => out.push_str(&format!("class {}:\n", c.name)),
            }
            if c.members.is_empty() {
                indent(depth + 1, out);
                out.push_str("pass\n");
            }
            for member in &c.members {
                match member {
                    ClassMember::Field(f) => {
                        indent(depth + 1, out);
                        out.push_str(&print_type(&f.ty));
                        if f.is_array {
                            out.push_str("[]");
                        }
                        out.push_str(&format!(" {}\n", f.name));
                    }
                    ClassMember::Method(m) => {
                        print_stmt(&Stmt::FunctionDef(m.clone()), depth + 1, out);
                    }
                }
            }
        }
        Stmt::Import(name, _) => out.push_str(&format!("import \"{}\"\n", name)),
        Stmt::Block(body) => print_block(body, depth, out),
    }
}

fn print_type(ty: &TypeSpec) -> String {
    match ty {
        TypeSpec::Int => "int".to_string(),
        TypeSpec::Float => "float".to_string(),
        TypeSpec::Bool => "bool".to_string(),
        TypeSpec::String => "string".to_string(),
        TypeSpec::Void => "void".to_string(),
        TypeSpec::List(elem) => format!("list<{}>", print_type(elem)),
        TypeSpec::Map(k, v) => format!("map<{},{}>", print_type(k), print_type(v)),
        TypeSpec::Named(n) => n.clone(),
    }
}

fn print_expr(expr: &Expr) -> String {
    match expr {
        Expr::Int(v, _) => v.to_string(),
        Expr::Float(v, _) => v.to_string(),
        Expr::Str(s, _) => format!("\"{}\"", s),
        Expr::Bool(b, _) => b.to_string(),
        Expr::Ident(name, _) => name.clone(),
        Expr::ListLit(items, _) => format!("[{}]", items.iter().map(print_expr).collect::<Vec<_>>().join(", ")),
        Expr::MapLit(entries, _) => {
            let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{}: {}", print_expr(k), print_expr(v))).collect();
            format!("{{{}}}", parts.join(", "))
        }
        Expr::Binary { op, lhs, rhs, .. } => format!("({} {} {})", print_expr(lhs), print_binop(op), print_expr(rhs)),
        Expr::Unary { op, operand, .. } => match op {
            UnOp::Neg => format!("(-{})", print_expr(operand)),
            UnOp::Not => format!("(!{})", print_expr(operand)),
        },
        Expr::Call { callee, args, .. } => {
            format!("{}({})", print_expr(callee), args.iter().map(print_expr).collect::<Vec<_>>().join(", "))
        }
        Expr::Field { object, name, .. } => format!("{}.{}", print_expr(object), name),
        Expr::Index { object, index, .. } => format!("{}[{}]", print_expr(object), print_expr(index)),
        Expr::New { class, args, .. } => {
            format!("new {}({})", print_expr(class), args.iter().map(print_expr).collect::<Vec<_>>().join(", "))
        }
    }
}

fn print_binop(op: &BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Pow => "^",
        BinOp::Eq => "==",
        BinOp::NotEq => "!=",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::LtEq => "<=",
        BinOp::GtEq => ">=",
        BinOp::And => "and",
        BinOp::Or => "or",
    }
}

/// Structural equality that ignores source line numbers, which shift once
/// a program is reformatted into a single canonical layout.
fn normalize_stmts(stmts: &[Stmt]) -> Vec<Stmt> {
    stmts.iter().map(normalize_stmt).collect()
}

fn zero_expr(e: &Expr) -> Expr {
    match e {
        Expr::Int(v, _) => Expr::Int(*v, 0),
        Expr::Float(v, _) => Expr::Float(*v, 0),
        Expr::Str(s, _) => Expr::Str(s.clone(), 0),
        Expr::Bool(b, _) => Expr::Bool(*b, 0),
        Expr::Ident(n, _) => Expr::Ident(n.clone(), 0),
        Expr::ListLit(items, _) => Expr::ListLit(items.iter().map(zero_expr).collect(), 0),
        Expr::MapLit(entries, _) => {
            Expr::MapLit(entries.iter().map(|(k, v)| (zero_expr(k), zero_expr(v))).collect(), 0)
        }
        Expr::Binary { op, lhs, rhs, .. } => {
            Expr::Binary { op: op.clone(), lhs: Box::new(zero_expr(lhs)), rhs: Box::new(zero_expr(rhs)), line: 0 }
        }
        Expr::Unary { op, operand, .. } => Expr::Unary { op: op.clone(), operand: Box::new(zero_expr(operand)), line: 0 },
        Expr::Call { callee, args, .. } => {
            Expr::Call { callee: Box::new(zero_expr(callee)), args: args.iter().map(zero_expr).collect(), line: 0 }
        }
        Expr::Field { object, name, .. } => Expr::Field { object: Box::new(zero_expr(object)), name: name.clone(), line: 0 },
        Expr::Index { object, index, .. } => {
            Expr::Index { object: Box::new(zero_expr(object)), index: Box::new(zero_expr(index)), line: 0 }
        }
        Expr::New { class, args, .. } => {
            Expr::New { class: Box::new(zero_expr(class)), args: args.iter().map(zero_expr).collect(), line: 0 }
        }
    }
}

fn normalize_stmt(s: &Stmt) -> Stmt {
    match s {
        Stmt::Expr(e) => Stmt::Expr(zero_expr(e)),
        Stmt::Print(args, _) => Stmt::Print(args.iter().map(zero_expr).collect(), 0),
        Stmt::VarDecl { ty, is_array, size, name, init, .. } => Stmt::VarDecl {
            ty: ty.clone(),
            is_array: *is_array,
            size: size.as_ref().map(zero_expr),
            name: name.clone(),
            init: init.as_ref().map(zero_expr),
            line: 0,
        },
        Stmt::Assign { target, value, .. } => Stmt::Assign { target: zero_expr(target), value: zero_expr(value), line: 0 },
        Stmt::If { clauses, else_body, .. } => Stmt::If {
            clauses: clauses
                .iter()
                .map(|c| IfClause { cond: zero_expr(&c.cond), body: normalize_stmts(&c.body) })
                .collect(),
            else_body: else_body.as_ref().map(|b| normalize_stmts(b)),
            line: 0,
        },
        Stmt::While { cond, body, .. } => Stmt::While { cond: zero_expr(cond), body: normalize_stmts(body), line: 0 },
        Stmt::DoWhile { body, cond, .. } => Stmt::DoWhile { body: normalize_stmts(body), cond: zero_expr(cond), line: 0 },
        Stmt::For { init, cond, step, body, .. } => Stmt::For {
            init: init.as_ref().map(|s| Box::new(normalize_stmt(s))),
            cond: cond.as_ref().map(zero_expr),
            step: step.as_ref().map(|s| Box::new(normalize_stmt(s))),
            body: normalize_stmts(body),
            line: 0,
        },
        Stmt::Foreach { ty, var, iter, body, .. } => Stmt::Foreach {
            ty: ty.clone(),
            var: var.clone(),
            iter: zero_expr(iter),
            body: normalize_stmts(body),
            line: 0,
        },
        Stmt::Switch { subject, arms, .. } => Stmt::Switch {
            subject: zero_expr(subject),
            arms: arms
                .iter()
                .map(|a| CaseArm { value: a.value.as_ref().map(zero_expr), body: normalize_stmts(&a.body) })
                .collect(),
            line: 0,
        },
        Stmt::Break(_) => Stmt::Break(0),
        Stmt::Continue(_) => Stmt::Continue(0),
        Stmt::Return(e, _) => Stmt::Return(e.as_ref().map(zero_expr), 0),
        Stmt::Pass => Stmt::Pass,
        Stmt::FunctionDef(f) => Stmt::FunctionDef(FunctionDef {
            name: f.name.clone(),
            ret_ty: f.ret_ty.clone(),
            params: f.params.clone(),
            body: normalize_stmts(&f.body),
            line: 0,
        }),
        Stmt::ClassDef(c) => Stmt::ClassDef(ClassDef {
            name: c.name.clone(),
            parent: c.parent.clone(),
            members: c
                .members
                .iter()
                .map(|m| match m {
                    ClassMember::Method(f) => ClassMember::Method(FunctionDef {
                        name: f.name.clone(),
                        ret_ty: f.ret_ty.clone(),
                        params: f.params.clone(),
                        body: normalize_stmts(&f.body),
                        line: 0,
                    }),
                    ClassMember::Field(fd) => ClassMember::Field(fd.clone()),
                })
                .collect(),
            line: 0,
        }),
        Stmt::Import(n, _) => Stmt::Import(n.clone(), 0),
        Stmt::Block(b) => Stmt::Block(normalize_stmts(b)),
    }
}

fn assert_roundtrips(source: &str) {
    let first = parse(source).unwrap_or_else(|e| panic!("failed to parse original source: {:?}", e));
    let printed = print_program(&first);
    let second = parse(&printed).unwrap_or_else(|e| panic!("failed to reparse printed source: {:?}\n---\n{}", e, printed));
    assert_eq!(
        normalize_stmts(&first.statements),
        normalize_stmts(&second.statements),
        "roundtrip mismatch; printed source was:\n{}",
        printed
    );
}

#[test]
fn arithmetic_and_precedence_roundtrips() {
    assert_roundtrips("print(1 + 2 * 3 - (4 / 2))\n");
}

#[test]
fn var_decl_roundtrips() {
    assert_roundtrips("int x = 5\nfloat y = 1.5\nstring s = \"hi\"\n");
}

#[test]
fn if_else_roundtrips() {
    assert_roundtrips("if x > 0:\n    print(x)\nelif x < 0:\n    print(0 - x)\nelse:\n    print(0)\n");
}

#[test]
fn while_loop_roundtrips() {
    assert_roundtrips("int i = 0\nwhile i < 10:\n    i = i + 1\n");
}

#[test]
fn function_def_and_return_roundtrips() {
    assert_roundtrips("define int add(int a, int b):\n    return a + b\n");
}

#[test]
fn class_def_roundtrips() {
    assert_roundtrips(
        "class Shape:\n    int sides\n    define int area():\n        return 0\nclass Square extends Shape:\n    define int area():\n        return 4\n",
    );
}

#[test]
fn list_and_map_literals_roundtrip() {
    assert_roundtrips("list<int> xs = [1, 2, 3]\nmap<string,int> m = {\"a\": 1, \"b\": 2}\n");
}

#[test]
fn switch_with_fallthrough_roundtrips() {
    assert_roundtrips(
        "switch (x):\n    case 1:\n        print(1)\n        break\n    case 2:\n    case 3:\n        print(23)\n        break\n    default:\n        print(0)\n",
    );
}
