//! The three native registries (spec §6 "Registries").
//!
//! Populated once at interpreter initialization and left live for the
//! run, exactly as spec describes. The concrete catalogue of math/io/sys
//! natives is explicitly out of scope (spec §1 Non-goals); this crate
//! ships a small, illustrative set sufficient to run the spec §8
//! scenarios and ordinary test programs — documented as demonstrative,
//! not exhaustive, in DESIGN.md.
//!
//! Shaped like the teacher's builtin-dispatch tables
//! (`examples/arthur-zhang-just-bash/src/interpreter/helpers.rs`), one
//! `fn(&mut Interpreter, ...)` per builtin, collected into name-keyed maps.

use super::errors::PithError;
use super::Interpreter;
use crate::heap::objects::{HeapObject, ListObj};
use crate::value::Value;
use std::collections::HashMap;

pub type NativeFn = fn(&mut Interpreter, &[Value], u32) -> Result<Value, PithError>;

pub struct NativeRegistries {
    pub string_methods: HashMap<&'static str, NativeFn>,
    pub list_methods: HashMap<&'static str, NativeFn>,
    pub modules: HashMap<&'static str, HashMap<&'static str, NativeFn>>,
}

impl NativeRegistries {
    pub fn new() -> Self {
        let mut string_methods: HashMap<&'static str, NativeFn> = HashMap::new();
        string_methods.insert("upper", string_upper);
        string_methods.insert("lower", string_lower);
        string_methods.insert("len", string_len);

        let mut list_methods: HashMap<&'static str, NativeFn> = HashMap::new();
        list_methods.insert("append", list_append);
        list_methods.insert("len", list_len);

        let mut math: HashMap<&'static str, NativeFn> = HashMap::new();
        math.insert("abs", math_abs);
        math.insert("sqrt", math_sqrt);

        let mut sys: HashMap<&'static str, NativeFn> = HashMap::new();
        sys.insert("exit", sys_exit);

        let mut modules = HashMap::new();
        modules.insert("math", math);
        modules.insert("sys", sys);

        Self { string_methods, list_methods, modules }
    }
}

impl Default for NativeRegistries {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_string(v: &Value, line: u32) -> Result<&str, PithError> {
    match v {
        Value::Str(s) => Ok(s.as_str()),
        other => Err(PithError::type_error(line, format!("expected string, found {}", other.kind_name()))),
    }
}

fn string_upper(_interp: &mut Interpreter, args: &[Value], line: u32) -> Result<Value, PithError> {
    let receiver = args.first().ok_or_else(|| PithError::type_error(line, "string.upper: missing receiver"))?;
    Ok(Value::Str(expect_string(receiver, line)?.to_uppercase()))
}

fn string_lower(_interp: &mut Interpreter, args: &[Value], line: u32) -> Result<Value, PithError> {
    let receiver = args.first().ok_or_else(|| PithError::type_error(line, "string.lower: missing receiver"))?;
    Ok(Value::Str(expect_string(receiver, line)?.to_lowercase()))
}

fn string_len(_interp: &mut Interpreter, args: &[Value], line: u32) -> Result<Value, PithError> {
    let receiver = args.first().ok_or_else(|| PithError::type_error(line, "string.len: missing receiver"))?;
    Ok(Value::Int(expect_string(receiver, line)?.chars().count() as i32))
}

fn list_append(interp: &mut Interpreter, args: &[Value], line: u32) -> Result<Value, PithError> {
    let receiver = args.first().ok_or_else(|| PithError::type_error(line, "list.append: missing receiver"))?;
    let Value::List(r) = receiver else {
        return Err(PithError::type_error(line, format!("expected list, found {}", receiver.kind_name())));
    };
    let item = args.get(1).cloned().unwrap_or(Value::Void);
    let HeapObject::List(list) = interp.heap.get_mut(*r) else {
        return Err(PithError::type_error(line, "corrupt list handle"));
    };
    if list.fixed {
        return Err(PithError::type_error(line, "cannot append to a fixed-size array"));
    }
    list.items.push(item);
    Ok(Value::Void)
}

fn list_len(interp: &mut Interpreter, args: &[Value], line: u32) -> Result<Value, PithError> {
    let receiver = args.first().ok_or_else(|| PithError::type_error(line, "list.len: missing receiver"))?;
    let Value::List(r) = receiver else {
        return Err(PithError::type_error(line, format!("expected list, found {}", receiver.kind_name())));
    };
    let HeapObject::List(list) = interp.heap.get(*r) else {
        return Err(PithError::type_error(line, "corrupt list handle"));
    };
    Ok(Value::Int(list.items.len() as i32))
}

fn numeric_f64(v: &Value, line: u32) -> Result<f64, PithError> {
    match v {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        other => Err(PithError::type_error(line, format!("expected a number, found {}", other.kind_name()))),
    }
}

fn math_abs(_interp: &mut Interpreter, args: &[Value], line: u32) -> Result<Value, PithError> {
    match args.first() {
        Some(Value::Int(n)) => Ok(Value::Int(n.abs())),
        Some(Value::Float(n)) => Ok(Value::Float(n.abs())),
        Some(other) => Err(PithError::type_error(line, format!("math.abs: expected a number, found {}", other.kind_name()))),
        None => Err(PithError::type_error(line, "math.abs: missing argument")),
    }
}

fn math_sqrt(_interp: &mut Interpreter, args: &[Value], line: u32) -> Result<Value, PithError> {
    let n = numeric_f64(args.first().ok_or_else(|| PithError::type_error(line, "math.sqrt: missing argument"))?, line)?;
    Ok(Value::Float(n.sqrt()))
}

fn sys_exit(_interp: &mut Interpreter, args: &[Value], line: u32) -> Result<Value, PithError> {
    let code = match args.first() {
        Some(Value::Int(n)) => *n,
        Some(other) => return Err(PithError::type_error(line, format!("sys.exit: expected int, found {}", other.kind_name()))),
        None => 0,
    };
    std::process::exit(code);
}

/// Constructs a fresh heap list object (used by the `[...]` literal and by
/// natives that return new lists); kept here so natives and the evaluator
/// share one constructor.
pub fn new_list(items: Vec<Value>, fixed: bool) -> HeapObject {
    HeapObject::List(ListObj { items, fixed, elem_ty: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingReporter;
    use crate::loader::MapLoader;

    fn interp() -> Interpreter {
        Interpreter::new(Box::new(MapLoader::default()))
    }

    #[test]
    fn string_upper_native() {
        let mut interp = interp();
        let mut reporter = CollectingReporter::default();
        let _ = &mut reporter;
        let result = string_upper(&mut interp, &[Value::Str("hi".into())], 1).unwrap();
        assert_eq!(result, Value::Str("HI".into()));
    }

    #[test]
    fn math_abs_native() {
        let mut interp = interp();
        assert_eq!(math_abs(&mut interp, &[Value::Int(-3)], 1).unwrap(), Value::Int(3));
    }

    #[test]
    fn list_append_respects_fixed_flag() {
        let mut interp = interp();
        let roots = interp.roots();
        let r = interp.heap.alloc(new_list(vec![Value::Int(1)], true), &roots);
        assert!(list_append(&mut interp, &[Value::List(r), Value::Int(2)], 1).is_err());
    }
}
