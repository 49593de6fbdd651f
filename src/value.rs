//! Runtime value representation (spec §3 "Values").
//!
//! Mirrors the teacher's approach of a small `Copy`-friendly tag plus
//! owned payloads for the non-trivial cases (`examples/arthur-zhang-just-bash/src/interpreter/types.rs`
//! uses a similar tagged-union `ShellValue`). Heap-backed kinds carry an
//! `ObjRef` handle into `crate::heap::Heap` rather than an owned struct.
//!
//! Spec §3 lists two internal sentinels, `BREAK` and `CONTINUE`, as `Value`
//! variants. This implementation carries control-flow propagation through
//! the explicit `Signal` sum type in `interpreter::exec` instead (spec §9's
//! own recommendation), so those two sentinels have no `Value` counterpart
//! here — a documented, deliberate divergence, not an oversight.

use crate::heap::ObjRef;
use crate::interpreter::errors::PithError;
use std::fmt;

/// Which of the three registries (spec §6 "Registries") a native value
/// resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeRef {
    StringMethod(&'static str),
    ListMethod(&'static str),
    Module(&'static str, &'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f64),
    Bool(bool),
    Str(String),
    Void,
    /// Opaque native callable, looked up by name in one of the three
    /// registries at call time (spec §6 "Registries").
    Native(NativeRef),
    Function(ObjRef),
    Module(ObjRef),
    List(ObjRef),
    Map(ObjRef),
    Class(ObjRef),
    Instance(ObjRef),
    BoundMethod(ObjRef),
}

impl Value {
    /// Truthiness is defined on the value's "integer representation", per
    /// spec §4.3 ("dispatch on truthiness of its integer representation").
    pub fn truthy(&self, line: u32) -> Result<bool, PithError> {
        match self {
            Value::Int(n) => Ok(*n != 0),
            Value::Bool(b) => Ok(*b),
            Value::Float(f) => Ok(*f != 0.0),
            other => Err(PithError::type_error(line, format!("cannot use {} as a condition", other.kind_name()))),
        }
    }

    /// The heap handle this value carries, if any — used to push a
    /// temporary GC root around operations that might trigger an
    /// allocation while this value is reachable only from a local
    /// variable (spec §4.4: "the evaluator must push a temporary root
    /// before any subsequent allocation during complex construction").
    pub fn heap_ref(&self) -> Option<ObjRef> {
        match self {
            Value::Function(r)
            | Value::Module(r)
            | Value::List(r)
            | Value::Map(r)
            | Value::Class(r)
            | Value::Instance(r)
            | Value::BoundMethod(r) => Some(*r),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Void => "void",
            Value::Native(_) => "native",
            Value::Function(_) => "function",
            Value::Module(_) => "module",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
            Value::BoundMethod(_) => "bound method",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Void => write!(f, "void"),
            Value::Native(r) => match r {
                NativeRef::StringMethod(n) => write!(f, "<native string.{}>", n),
                NativeRef::ListMethod(n) => write!(f, "<native list.{}>", n),
                NativeRef::Module(m, n) => write!(f, "<native {}.{}>", m, n),
            },
            Value::Function(_) => write!(f, "<function>"),
            Value::Module(_) => write!(f, "<module>"),
            Value::List(_) => write!(f, "<list>"),
            Value::Map(_) => write!(f, "<map>"),
            Value::Class(_) => write!(f, "<class>"),
            Value::Instance(_) => write!(f, "<instance>"),
            Value::BoundMethod(_) => write!(f, "<bound method>"),
        }
    }
}
