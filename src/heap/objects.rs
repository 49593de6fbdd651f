//! Heap object kinds (spec §3 "Heap objects").

use crate::ast::FunctionDef;
use crate::heap::ObjRef;
use crate::value::Value;
use indexmap::IndexMap;
use std::rc::Rc;

/// `list<T>` and `T[n]` share this representation with a `fixed` flag, per
/// the Open Question in spec §9 — resolved here in favor of one heap
/// object kind rather than two distinct types.
#[derive(Debug, Clone)]
pub struct ListObj {
    pub items: Vec<Value>,
    pub fixed: bool,
    pub elem_ty: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MapObj {
    pub entries: IndexMap<String, Value>,
    pub val_ty: Option<String>,
}

/// Name, AST body pointer, captured environment, optional owning class.
#[derive(Debug, Clone)]
pub struct FunctionObj {
    pub name: String,
    pub def: Rc<FunctionDef>,
    pub captured_env: Option<ObjRef>,
    pub owning_class: Option<ObjRef>,
}

#[derive(Debug, Clone)]
pub struct ModuleObj {
    pub name: String,
    pub members: IndexMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct ClassObj {
    pub name: String,
    pub methods: IndexMap<String, ObjRef>,
    pub fields: Vec<String>,
    pub parent: Option<ObjRef>,
}

#[derive(Debug, Clone)]
pub struct InstanceObj {
    pub class: ObjRef,
    pub fields: IndexMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct BoundMethodObj {
    pub receiver: Value,
    pub method: Value,
}

/// A single binding in an environment chain: a name, a value, and a link
/// to the enclosing binding (spec §3 "Environment").
#[derive(Debug, Clone)]
pub struct EnvBindingObj {
    pub name: String,
    pub value: Value,
    pub next: Option<ObjRef>,
}

#[derive(Debug, Clone)]
pub enum HeapObject {
    List(ListObj),
    Map(MapObj),
    Function(FunctionObj),
    Module(ModuleObj),
    Class(ClassObj),
    Instance(InstanceObj),
    BoundMethod(BoundMethodObj),
    EnvBinding(EnvBindingObj),
}

impl HeapObject {
    pub fn kind_name(&self) -> &'static str {
        match self {
            HeapObject::List(_) => "List",
            HeapObject::Map(_) => "Map",
            HeapObject::Function(_) => "Function",
            HeapObject::Module(_) => "Module",
            HeapObject::Class(_) => "Class",
            HeapObject::Instance(_) => "Instance",
            HeapObject::BoundMethod(_) => "BoundMethod",
            HeapObject::EnvBinding(_) => "EnvBinding",
        }
    }

    /// Approximate footprint in bytes, for the allocator's live-bytes
    /// counter (spec §4.4 "update allocated-bytes counter").
    pub fn approx_size(&self) -> usize {
        match self {
            HeapObject::List(l) => 32 + l.items.len() * std::mem::size_of::<Value>(),
            HeapObject::Map(m) => 32 + m.entries.len() * 48,
            HeapObject::Function(_) => 64,
            HeapObject::Module(m) => 32 + m.members.len() * 48,
            HeapObject::Class(c) => 32 + c.fields.len() * 24 + c.methods.len() * 24,
            HeapObject::Instance(i) => 16 + i.fields.len() * 48,
            HeapObject::BoundMethod(_) => 32,
            HeapObject::EnvBinding(_) => 32,
        }
    }

    /// Every `ObjRef` this object transitively references, per the
    /// reachability table in spec §4.4.
    pub fn trace(&self, mut visit: impl FnMut(ObjRef)) {
        match self {
            HeapObject::List(l) => {
                for v in &l.items {
                    visit_value(v, &mut visit);
                }
            }
            HeapObject::Map(m) => {
                for v in m.entries.values() {
                    visit_value(v, &mut visit);
                }
            }
            HeapObject::Function(fu) => {
                if let Some(e) = fu.captured_env {
                    visit(e);
                }
                if let Some(c) = fu.owning_class {
                    visit(c);
                }
            }
            HeapObject::Module(m) => {
                for v in m.members.values() {
                    visit_value(v, &mut visit);
                }
            }
            HeapObject::Class(c) => {
                for m in c.methods.values() {
                    visit(*m);
                }
                if let Some(p) = c.parent {
                    visit(p);
                }
            }
            HeapObject::Instance(i) => {
                visit(i.class);
                for v in i.fields.values() {
                    visit_value(v, &mut visit);
                }
            }
            HeapObject::BoundMethod(b) => {
                visit_value(&b.receiver, &mut visit);
                visit_value(&b.method, &mut visit);
            }
            HeapObject::EnvBinding(e) => {
                visit_value(&e.value, &mut visit);
                if let Some(n) = e.next {
                    visit(n);
                }
            }
        }
    }
}

fn visit_value(v: &Value, visit: &mut impl FnMut(ObjRef)) {
    match v {
        Value::Function(r)
        | Value::Module(r)
        | Value::List(r)
        | Value::Map(r)
        | Value::Class(r)
        | Value::Instance(r)
        | Value::BoundMethod(r) => visit(*r),
        _ => {}
    }
}
