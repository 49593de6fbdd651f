//! Slab-backed heap and mark-and-sweep collector (spec §4.4).
//!
//! Spec §3 describes heap objects linked into a global chain via an
//! intrusive `next` pointer, traversed by the collector. Spec §9 sanctions
//! replacing that with "an arena + generational indices" for an idiomatic
//! Rust reimplementation, which is what this module does: a `Vec<Slot>`
//! slab plus a free list, addressed by `ObjRef(u32)` handles. "Linked into
//! the object chain" becomes "occupies a slab slot"; "walk the chain" in
//! sweep becomes "walk the slab".
//!
//! Grounded in the slab-of-slots idiom the example pack uses for its own
//! heap (`examples/parcadei-ouros/crates/ouros/src/heap.rs`'s `HeapId`
//! newtype over a flat arena), adapted here for reclaim-on-sweep rather
//! than refcounting.

pub mod objects;

use crate::interpreter::errors::PithError;
use objects::HeapObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjRef(u32);

impl ObjRef {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Slot {
    marked: bool,
    data: Option<HeapObject>,
}

const MIN_THRESHOLD: usize = 4096;
const MAX_ROOT_DEPTH: usize = 1024;

pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    bytes_allocated: usize,
    threshold: usize,
    /// Temporary root stack (spec §4.4 item 3): references held only on
    /// the evaluator's own call stack during allocator-triggering
    /// operations.
    temp_roots: Vec<ObjRef>,
}

impl Heap {
    pub fn new() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), bytes_allocated: 0, threshold: MIN_THRESHOLD, temp_roots: Vec::new() }
    }

    pub fn get(&self, r: ObjRef) -> &HeapObject {
        self.slots[r.index()].data.as_ref().expect("dangling ObjRef")
    }

    pub fn get_mut(&mut self, r: ObjRef) -> &mut HeapObject {
        self.slots[r.index()].data.as_mut().expect("dangling ObjRef")
    }

    /// Allocates a new object, running a collection first if the
    /// live-bytes counter has crossed the threshold (spec §4.4
    /// "Allocation").
    pub fn alloc(&mut self, obj: HeapObject, roots: &GcRoots) -> ObjRef {
        if self.bytes_allocated >= self.threshold {
            self.collect(roots);
        }
        self.bytes_allocated += obj.approx_size();
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Slot { marked: false, data: Some(obj) };
            ObjRef(idx)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot { marked: false, data: Some(obj) });
            ObjRef(idx)
        }
    }

    pub fn live_bytes(&self) -> usize {
        self.bytes_allocated
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.data.is_some()).count()
    }

    /// Pushes a temporary root for the duration of a potentially
    /// allocating operation. Overflow is fatal per spec §4.4.
    pub fn push_temp_root(&mut self, r: ObjRef, line: u32) -> Result<(), PithError> {
        if self.temp_roots.len() >= MAX_ROOT_DEPTH {
            return Err(PithError::resource(line, "temporary root stack overflow"));
        }
        self.temp_roots.push(r);
        Ok(())
    }

    pub fn pop_temp_root(&mut self) {
        self.temp_roots.pop();
    }

    pub fn temp_root_depth(&self) -> usize {
        self.temp_roots.len()
    }

    /// Runs one mark-and-sweep cycle against the given root set.
    pub fn collect(&mut self, roots: &GcRoots) {
        for slot in &mut self.slots {
            slot.marked = false;
        }
        let mut stack: Vec<ObjRef> = Vec::new();
        if let Some(g) = roots.global_env {
            stack.push(g);
        }
        stack.extend(self.temp_roots.iter().copied());
        stack.extend(roots.extra.iter().copied());

        while let Some(r) = stack.pop() {
            let idx = r.index();
            if self.slots[idx].marked {
                continue;
            }
            self.slots[idx].marked = true;
            let mut children = Vec::new();
            if let Some(obj) = &self.slots[idx].data {
                obj.trace(|child| children.push(child));
            }
            stack.extend(children);
        }

        let mut live_bytes = 0usize;
        for slot in &mut self.slots {
            if slot.marked {
                if let Some(obj) = &slot.data {
                    live_bytes += obj.approx_size();
                }
            } else if slot.data.is_some() {
                slot.data = None;
            }
            // Invariant: the mark bit is zero between collection cycles (spec §3 inv. 6).
            slot.marked = false;
        }
        self.bytes_allocated = live_bytes;
        self.threshold = std::cmp::max(MIN_THRESHOLD, 2 * live_bytes);

        self.free.clear();
        for (idx, slot) in self.slots.iter().enumerate() {
            if slot.data.is_none() {
                self.free.push(idx as u32);
            }
        }
    }

    /// Final teardown sweep with no preceding mark (spec §4.4 "Final
    /// teardown"): releases every remaining object.
    pub fn teardown(&mut self) {
        for slot in &mut self.slots {
            slot.data = None;
        }
        self.bytes_allocated = 0;
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

/// The root set the collector marks from (spec §4.4 "Roots"). The three
/// native registries are omitted here: this crate's registries hold only
/// `NativeFn` function pointers, never `Value`s, so they can never
/// reference heap objects and contribute nothing to trace — documented in
/// DESIGN.md.
pub struct GcRoots {
    pub global_env: Option<ObjRef>,
    pub extra: Vec<ObjRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use objects::{EnvBindingObj, ListObj};
    use crate::value::Value;

    fn roots(global: Option<ObjRef>) -> GcRoots {
        GcRoots { global_env: global, extra: Vec::new() }
    }

    #[test]
    fn alloc_and_get_roundtrip() {
        let mut heap = Heap::new();
        let r = heap.alloc(HeapObject::List(ListObj { items: vec![Value::Int(1)], fixed: false, elem_ty: None }), &roots(None));
        match heap.get(r) {
            HeapObject::List(l) => assert_eq!(l.items, vec![Value::Int(1)]),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn unreachable_objects_are_swept() {
        let mut heap = Heap::new();
        let orphan = heap.alloc(HeapObject::List(ListObj { items: vec![], fixed: false, elem_ty: None }), &roots(None));
        heap.collect(&roots(None));
        assert!(heap.slots[orphan.index()].data.is_none());
    }

    #[test]
    fn reachable_objects_survive_a_cycle() {
        let mut heap = Heap::new();
        let inner = heap.alloc(HeapObject::List(ListObj { items: vec![], fixed: false, elem_ty: None }), &roots(None));
        let binding = heap.alloc(
            HeapObject::EnvBinding(EnvBindingObj { name: "x".into(), value: Value::List(inner), next: None }),
            &roots(None),
        );
        heap.collect(&roots(Some(binding)));
        assert!(heap.slots[inner.index()].data.is_some());
        assert!(heap.slots[binding.index()].data.is_some());
    }

    #[test]
    fn temp_root_stack_overflow_is_fatal() {
        let mut heap = Heap::new();
        let r = heap.alloc(HeapObject::List(ListObj { items: vec![], fixed: false, elem_ty: None }), &roots(None));
        for _ in 0..MAX_ROOT_DEPTH {
            heap.push_temp_root(r, 1).unwrap();
        }
        assert!(heap.push_temp_root(r, 1).is_err());
    }

    #[test]
    fn mark_bit_is_cleared_after_a_cycle() {
        let mut heap = Heap::new();
        let r = heap.alloc(HeapObject::List(ListObj { items: vec![], fixed: false, elem_ty: None }), &roots(None));
        heap.collect(&roots(Some(r)));
        assert!(!heap.slots[r.index()].marked);
    }
}
