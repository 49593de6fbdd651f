//! Statement execution (spec §4.3 "exec").
//!
//! `exec` returns `Result<Signal, PithError>` where `Signal` is the
//! explicit control-propagation sum type spec §9 recommends in place of
//! the teacher's error-typed `BreakError`/`ContinueError`/`ReturnError`
//! (`examples/arthur-zhang-just-bash/src/interpreter/control_flow.rs`).
//! The teacher's mechanism generalizes shell control flow through Rust's
//! error channel; Pith's generalizes the same idea into a first-class
//! return value, per spec §9's own design note.

use super::eval::eval;
use super::natives::new_list;
use super::Interpreter;
use crate::ast::{ClassMember, Expr, Stmt, TypeSpec};
use crate::env::{self, Scope};
use crate::heap::objects::{ClassObj, FunctionObj, HeapObject, ModuleObj};
use crate::interpreter::errors::PithError;
use crate::value::Value;
use indexmap::IndexMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Next,
    Return(Value),
    Break,
    Continue,
}

/// Runs a statement sequence against `scope`, threading any mutation
/// (new declarations) back into the caller through `scope` itself — this
/// is what makes a `foreach` binding "remain in the current chain" after
/// the loop (spec §4.3) and what makes declarations inside an `if`/`while`
/// body visible afterward, since neither construct is documented as
/// introducing its own scope.
///
/// Re-roots `*scope` at the top of every iteration so a scope chain held
/// only on the Rust stack (a function call's local scope, a `for` loop's
/// private scope) survives any allocation a later statement triggers
/// (spec §4.4's temporary-root protocol).
pub fn exec_block(interp: &mut Interpreter, stmts: &[Stmt], scope: &mut Scope) -> Result<Signal, PithError> {
    for stmt in stmts {
        let rooted = if let Some(r) = *scope {
            interp.heap.push_temp_root(r, stmt_line(stmt))?;
            true
        } else {
            false
        };
        let signal = exec(interp, stmt, scope);
        if rooted {
            interp.heap.pop_temp_root();
        }
        match signal? {
            Signal::Next => continue,
            other => return Ok(other),
        }
    }
    Ok(Signal::Next)
}

fn stmt_line(stmt: &Stmt) -> u32 {
    match stmt {
        Stmt::Expr(e) => e.line(),
        Stmt::Print(_, l)
        | Stmt::VarDecl { line: l, .. }
        | Stmt::Assign { line: l, .. }
        | Stmt::If { line: l, .. }
        | Stmt::While { line: l, .. }
        | Stmt::DoWhile { line: l, .. }
        | Stmt::For { line: l, .. }
        | Stmt::Foreach { line: l, .. }
        | Stmt::Switch { line: l, .. }
        | Stmt::Break(l)
        | Stmt::Continue(l)
        | Stmt::Return(_, l)
        | Stmt::Import(_, l) => *l,
        Stmt::FunctionDef(f) => f.line,
        Stmt::ClassDef(c) => c.line,
        Stmt::Pass | Stmt::Block(_) => 0,
    }
}

pub fn exec(interp: &mut Interpreter, stmt: &Stmt, scope: &mut Scope) -> Result<Signal, PithError> {
    match stmt {
        Stmt::Expr(e) => {
            eval(interp, e, *scope)?;
            Ok(Signal::Next)
        }
        Stmt::Print(args, _line) => {
            let mut parts = Vec::with_capacity(args.len());
            for a in args {
                parts.push(eval(interp, a, *scope)?.to_string());
            }
            println!("{}", parts.join(" "));
            Ok(Signal::Next)
        }
        Stmt::VarDecl { ty, is_array, size, name, init, line } => {
            let value = if let Some(e) = init {
                eval(interp, e, *scope)?
            } else if *is_array {
                let len = match size {
                    Some(e) => match eval(interp, e, *scope)? {
                        Value::Int(n) if n >= 0 => n as usize,
                        _ => return Err(PithError::type_error(*line, "array size must be a non-negative int")),
                    },
                    None => 0,
                };
                let roots = interp.roots();
                let r = interp.heap.alloc(new_list(vec![Value::Void; len], true), &roots);
                Value::List(r)
            } else {
                Value::Void
            };
            if let TypeSpec::Map(_, val_ty) = ty {
                if let Value::Map(r) = &value {
                    let declared = type_spec_kind_name(val_ty);
                    if declared != "void" {
                        if let HeapObject::Map(map) = interp.heap.get_mut(*r) {
                            map.val_ty = Some(declared.to_string());
                        }
                    }
                }
            }
            let roots = interp.roots();
            *scope = env::define(&mut interp.heap, *scope, name, value, &roots, *line)?;
            Ok(Signal::Next)
        }
        Stmt::Assign { target, value, line } => {
            let v = eval(interp, value, *scope)?;
            exec_assign(interp, target, v, *scope, *line)?;
            Ok(Signal::Next)
        }
        Stmt::If { clauses, else_body, .. } => {
            for clause in clauses {
                if eval(interp, &clause.cond, *scope)?.truthy(clause.cond.line())? {
                    return exec_block(interp, &clause.body, scope);
                }
            }
            if let Some(body) = else_body {
                return exec_block(interp, body, scope);
            }
            Ok(Signal::Next)
        }
        Stmt::While { cond, body, .. } => {
            while eval(interp, cond, *scope)?.truthy(cond.line())? {
                match exec_block(interp, body, scope)? {
                    Signal::Break => break,
                    Signal::Continue | Signal::Next => continue,
                    other @ Signal::Return(_) => return Ok(other),
                }
            }
            Ok(Signal::Next)
        }
        Stmt::DoWhile { body, cond, .. } => {
            loop {
                match exec_block(interp, body, scope)? {
                    Signal::Break => break,
                    Signal::Continue | Signal::Next => {}
                    other @ Signal::Return(_) => return Ok(other),
                }
                if !eval(interp, cond, *scope)?.truthy(cond.line())? {
                    break;
                }
            }
            Ok(Signal::Next)
        }
        Stmt::For { init, cond, step, body, .. } => {
            let mut local: Scope = *scope;
            if let Some(init) = init {
                match exec(interp, init, &mut local)? {
                    Signal::Next => {}
                    other => return Ok(other),
                }
            }
            loop {
                if let Some(cond) = cond {
                    if !eval(interp, cond, local)?.truthy(cond.line())? {
                        break;
                    }
                }
                match exec_block(interp, body, &mut local)? {
                    Signal::Break => break,
                    Signal::Continue | Signal::Next => {}
                    other @ Signal::Return(_) => return Ok(other),
                }
                if let Some(step) = step {
                    match exec(interp, step, &mut local)? {
                        Signal::Next => {}
                        other => return Ok(other),
                    }
                }
            }
            Ok(Signal::Next)
        }
        Stmt::Foreach { var, iter, body, line, .. } => {
            let collection = eval(interp, iter, *scope)?;
            let Value::List(r) = collection else {
                return Err(PithError::type_error(*line, "foreach requires a list"));
            };
            let HeapObject::List(list) = interp.heap.get(r) else {
                return Err(PithError::type_error(*line, "corrupt list handle"));
            };
            let items = list.items.clone();
            for item in items {
                let roots = interp.roots();
                *scope = env::define(&mut interp.heap, *scope, var, item, &roots, *line)?;
                match exec_block(interp, body, scope)? {
                    Signal::Break => break,
                    Signal::Continue | Signal::Next => continue,
                    other @ Signal::Return(_) => return Ok(other),
                }
            }
            Ok(Signal::Next)
        }
        Stmt::Switch { subject, arms, .. } => {
            let subject_value = eval(interp, subject, *scope)?;
            let mut matched = false;
            for arm in arms {
                if !matched {
                    match &arm.value {
                        Some(e) => {
                            let case_value = eval(interp, e, *scope)?;
                            if values_equal(&subject_value, &case_value) {
                                matched = true;
                            }
                        }
                        None => continue, // default only participates once a case has matched
                    }
                }
                if matched {
                    match exec_block(interp, &arm.body, scope)? {
                        Signal::Break => return Ok(Signal::Next),
                        Signal::Continue => return Ok(Signal::Continue),
                        other @ Signal::Return(_) => return Ok(other),
                        Signal::Next => continue,
                    }
                }
            }
            if !matched {
                if let Some(arm) = arms.iter().find(|a| a.value.is_none()) {
                    return match exec_block(interp, &arm.body, scope)? {
                        Signal::Break => Ok(Signal::Next),
                        other => Ok(other),
                    };
                }
            }
            Ok(Signal::Next)
        }
        Stmt::Break(_) => Ok(Signal::Break),
        Stmt::Continue(_) => Ok(Signal::Continue),
        Stmt::Return(expr, _line) => {
            let v = match expr {
                Some(e) => eval(interp, e, *scope)?,
                None => Value::Void,
            };
            Ok(Signal::Return(v))
        }
        Stmt::Pass => Ok(Signal::Next),
        Stmt::Block(stmts) => exec_block(interp, stmts, scope),
        Stmt::Import(name, line) => {
            exec_import(interp, name, scope, *line)?;
            Ok(Signal::Next)
        }
        Stmt::FunctionDef(def) => {
            let function = HeapObject::Function(FunctionObj {
                name: def.name.clone(),
                def: Rc::new(def.clone()),
                captured_env: *scope,
                owning_class: None,
            });
            let roots = interp.roots();
            let r = interp.heap.alloc(function, &roots);
            let roots = interp.roots();
            *scope = env::define(&mut interp.heap, *scope, &def.name, Value::Function(r), &roots, def.line)?;
            Ok(Signal::Next)
        }
        Stmt::ClassDef(def) => {
            exec_class_def(interp, def, scope)?;
            Ok(Signal::Next)
        }
    }
}

/// Maps a declared `TypeSpec` to the same kind-name spelling `Value::kind_name`
/// uses, so a `map<K,V>` annotation's `V` can be compared against a stored
/// value's runtime kind at assignment time.
fn type_spec_kind_name(ty: &TypeSpec) -> &'static str {
    match ty {
        TypeSpec::Int => "int",
        TypeSpec::Float => "float",
        TypeSpec::Bool => "bool",
        TypeSpec::String => "string",
        TypeSpec::Void => "void",
        TypeSpec::List(_) => "list",
        TypeSpec::Map(_, _) => "map",
        TypeSpec::Named(_) => "instance",
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => (*x as f64) == *y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Void, Value::Void) => true,
        _ => false,
    }
}

fn exec_assign(interp: &mut Interpreter, target: &Expr, value: Value, scope: Scope, line: u32) -> Result<(), PithError> {
    match target {
        Expr::Ident(name, _) => {
            if !env::assign(&mut interp.heap, scope, name, value) {
                return Err(PithError::name_error(line, format!("undefined variable '{}'", name)));
            }
            Ok(())
        }
        Expr::Field { object, name, line: fline } => {
            let receiver = eval(interp, object, scope)?;
            let Value::Instance(r) = receiver else {
                return Err(PithError::type_error(*fline, "field assignment requires an instance"));
            };
            let HeapObject::Instance(inst) = interp.heap.get_mut(r) else {
                return Err(PithError::type_error(*fline, "corrupt instance handle"));
            };
            inst.fields.insert(name.clone(), value);
            Ok(())
        }
        Expr::Index { object, index, line: iline } => {
            let receiver = eval(interp, object, scope)?;
            let idx = eval(interp, index, scope)?;
            match receiver {
                Value::List(r) => {
                    let Value::Int(i) = idx else {
                        return Err(PithError::type_error(*iline, "list index must be an int"));
                    };
                    let HeapObject::List(list) = interp.heap.get_mut(r) else {
                        return Err(PithError::type_error(*iline, "corrupt list handle"));
                    };
                    if i < 0 || i as usize >= list.items.len() {
                        return Err(PithError::bounds(*iline, format!("list index {} out of range", i)));
                    }
                    list.items[i as usize] = value;
                    Ok(())
                }
                Value::Map(r) => {
                    let Value::Str(key) = idx else {
                        return Err(PithError::type_error(*iline, "map key must be a string"));
                    };
                    let HeapObject::Map(map) = interp.heap.get_mut(r) else {
                        return Err(PithError::type_error(*iline, "corrupt map handle"));
                    };
                    if let Some(declared) = &map.val_ty {
                        if declared != "void" && declared != value.kind_name() {
                            return Err(PithError::type_error(*iline, format!("map value type mismatch: expected {}, found {}", declared, value.kind_name())));
                        }
                    }
                    map.entries.insert(key, value);
                    Ok(())
                }
                other => Err(PithError::type_error(*iline, format!("cannot index into {}", other.kind_name()))),
            }
        }
        _ => Err(PithError::syntactic(line, "invalid assignment target")),
    }
}

fn exec_import(interp: &mut Interpreter, name: &str, scope: &mut Scope, line: u32) -> Result<(), PithError> {
    let mut members: IndexMap<String, Value> = IndexMap::new();
    if let Some(module_natives) = interp.natives.modules.get(name) {
        for fn_name in module_natives.keys() {
            members.insert((*fn_name).to_string(), Value::Native(crate::value::NativeRef::Module(leak_name(name), fn_name)));
        }
    }
    let source = interp.loader.load(name);
    if let Some(src) = source {
        let program = crate::parser::parse(&src).map_err(|e| PithError::syntactic(e.line, e.message))?;
        let mut module_scope: Scope = None;
        for (k, v) in &members {
            let roots = interp.roots();
            module_scope = env::define(&mut interp.heap, module_scope, k, v.clone(), &roots, line)?;
        }
        exec_block(interp, &program.statements, &mut module_scope)?;
        members.clear();
        let mut cur = module_scope;
        let mut collected = Vec::new();
        while let Some(r) = cur {
            let HeapObject::EnvBinding(b) = interp.heap.get(r) else { break };
            collected.push((b.name.clone(), b.value.clone()));
            cur = b.next;
        }
        for (k, v) in collected.into_iter().rev() {
            members.insert(k, v);
        }
    }
    let module = HeapObject::Module(ModuleObj { name: name.to_string(), members });
    let roots = interp.roots();
    let r = interp.heap.alloc(module, &roots);
    let roots = interp.roots();
    *scope = env::define(&mut interp.heap, *scope, name, Value::Module(r), &roots, line)?;
    Ok(())
}

/// Module-native keys need a `'static` lifetime to fit `NativeRef`; module
/// names are drawn from a small fixed set registered at startup, so this
/// leaks at most a handful of short strings for the life of the process.
fn leak_name(name: &str) -> &'static str {
    Box::leak(name.to_string().into_boxed_str())
}

fn exec_class_def(interp: &mut Interpreter, def: &crate::ast::ClassDef, scope: &mut Scope) -> Result<(), PithError> {
    let mut methods = IndexMap::new();
    let mut fields = Vec::new();

    if let Some(parent_name) = &def.parent {
        let parent_value = env::lookup(&interp.heap, *scope, parent_name)
            .ok_or_else(|| PithError::name_error(def.line, format!("undefined class '{}'", parent_name)))?;
        let Value::Class(parent_ref) = parent_value else {
            return Err(PithError::type_error(def.line, format!("'{}' is not a class", parent_name)));
        };
        let HeapObject::Class(parent) = interp.heap.get(parent_ref) else {
            return Err(PithError::type_error(def.line, "corrupt class handle"));
        };
        methods = parent.methods.clone();
        fields = parent.fields.clone();
    }

    for member in &def.members {
        if let ClassMember::Field(f) = member {
            if !fields.contains(&f.name) {
                fields.push(f.name.clone());
            }
        }
    }

    let roots = interp.roots();
    let class_ref = interp.heap.alloc(
        HeapObject::Class(ClassObj { name: def.name.clone(), methods: IndexMap::new(), fields: fields.clone(), parent: None }),
        &roots,
    );
    interp.heap.push_temp_root(class_ref, def.line)?;

    for member in &def.members {
        if let ClassMember::Method(f) = member {
            let function = HeapObject::Function(FunctionObj {
                name: f.name.clone(),
                def: Rc::new(f.clone()),
                captured_env: *scope,
                owning_class: Some(class_ref),
            });
            let roots = interp.roots();
            let method_ref = interp.heap.alloc(function, &roots);
            methods.insert(f.name.clone(), method_ref);
        }
    }

    let parent_ref = if let Some(parent_name) = &def.parent {
        match env::lookup(&interp.heap, *scope, parent_name) {
            Some(Value::Class(r)) => Some(r),
            _ => None,
        }
    } else {
        None
    };

    if let HeapObject::Class(class) = interp.heap.get_mut(class_ref) {
        class.methods = methods;
        class.fields = fields;
        class.parent = parent_ref;
    }
    interp.heap.pop_temp_root();

    let roots = interp.roots();
    *scope = env::define(&mut interp.heap, *scope, &def.name, Value::Class(class_ref), &roots, def.line)?;
    Ok(())
}
