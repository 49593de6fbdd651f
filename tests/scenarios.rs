//! End-to-end checks for the six walkthroughs this language is meant to
//! support: arithmetic precedence, fallthrough switch, closures, single
//! inheritance, list iteration, and a GC stress pass (the latter lives in
//! `tests/gc.rs` alongside the other collector invariants).
//!
//! `print(...)` writes straight to stdout, so these programs store their
//! result in a variable and assert on it through `env::lookup` rather than
//! capturing process output.

use pith::diagnostics::CollectingReporter;
use pith::loader::MapLoader;
use pith::{env, Pith, Value};

fn run(source: &str) -> (Pith, CollectingReporter) {
    let mut pith = Pith::new(Box::new(MapLoader::default()));
    let mut reporter = CollectingReporter::default();
    let ok = pith.run(source, &mut reporter);
    assert!(ok, "program failed: {:?}", reporter.diagnostics);
    (pith, reporter)
}

fn lookup(pith: &Pith, name: &str) -> Value {
    env::lookup(&pith.interp.heap, pith.interp.global, name)
        .unwrap_or_else(|| panic!("'{}' was never defined", name))
}

#[test]
fn arithmetic_and_precedence() {
    let (pith, _) = run(
        "int a = 1 + 2 * 3\n\
         int b = (1 + 2) * 3\n\
         int c = 2 ^ 3 ^ 2\n",
    );
    assert_eq!(lookup(&pith, "a"), Value::Int(7));
    assert_eq!(lookup(&pith, "b"), Value::Int(9));
    // `^` is left-associative here: (2 ^ 3) ^ 2 = 8 ^ 2 = 64, not 2 ^ 9.
    assert_eq!(lookup(&pith, "c"), Value::Int(64));
}

#[test]
fn switch_with_fallthrough_picks_combined_case() {
    let (pith, _) = run(
        "int x = 2\n\
         string result = \"none\"\n\
         switch (x):\n\
         \u{20}   case 1:\n\
         \u{20}       result = \"one\"\n\
         \u{20}       break\n\
         \u{20}   case 2:\n\
         \u{20}   case 3:\n\
         \u{20}       result = \"two or three\"\n\
         \u{20}       break\n\
         \u{20}   default:\n\
         \u{20}       result = \"other\"\n",
    );
    assert_eq!(lookup(&pith, "result"), Value::Str("two or three".to_string()));
}

#[test]
fn closures_capture_their_defining_scope() {
    let (pith, _) = run(
        "define make_adder(int n):\n\
         \u{20}   define add(int x):\n\
         \u{20}       return x + n\n\
         \u{20}   return add\n\
         int f = make_adder(10)\n\
         int result = f(5)\n",
    );
    assert_eq!(lookup(&pith, "result"), Value::Int(15));
}

#[test]
fn class_inheritance_overrides_method_dispatch() {
    let (pith, _) = run(
        "class A:\n\
         \u{20}   define string speak():\n\
         \u{20}       return \"A\"\n\
         class B extends A:\n\
         \u{20}   define string speak():\n\
         \u{20}       return \"B\"\n\
         A a = new A()\n\
         B b = new B()\n\
         string ra = a.speak()\n\
         string rb = b.speak()\n",
    );
    assert_eq!(lookup(&pith, "ra"), Value::Str("A".to_string()));
    assert_eq!(lookup(&pith, "rb"), Value::Str("B".to_string()));
}

#[test]
fn list_append_and_foreach_sum() {
    let (pith, _) = run(
        "list<int> xs = [1, 2, 3]\n\
         xs.append(4)\n\
         int sum = 0\n\
         foreach (int v in xs):\n\
         \u{20}   sum = sum + v\n",
    );
    assert_eq!(lookup(&pith, "sum"), Value::Int(10));
}

#[test]
fn undefined_variable_is_a_name_error_not_a_panic() {
    let mut pith = Pith::new(Box::new(MapLoader::default()));
    let mut reporter = CollectingReporter::default();
    assert!(!pith.run("print(never_declared)\n", &mut reporter));
    assert_eq!(reporter.diagnostics.len(), 1);
}

#[test]
fn method_reads_own_instance_field_through_this() {
    let (pith, _) = run(
        "class Counter:\n\
         \u{20}   int value\n\
         \u{20}   define init(int start):\n\
         \u{20}       this.value = start\n\
         \u{20}   define int get():\n\
         \u{20}       return this.value\n\
         Counter c = new Counter(5)\n\
         int result = c.get()\n",
    );
    assert_eq!(lookup(&pith, "result"), Value::Int(5));
}

#[test]
fn map_value_type_mismatch_is_rejected_at_insert() {
    let mut pith = Pith::new(Box::new(MapLoader::default()));
    let mut reporter = CollectingReporter::default();
    let ok = pith.run(
        "map<string,int> m = {\"a\": 1}\n\
         m[\"b\"] = \"oops\"\n",
        &mut reporter,
    );
    assert!(!ok, "mismatched map insert should have failed");
    assert_eq!(reporter.diagnostics.len(), 1);
}

#[test]
fn import_resolves_module_registered_with_the_loader() {
    let mut pith = Pith::new(Box::new(MapLoader::default().with_module("geometry", "int pi = 3\n")));
    let mut reporter = CollectingReporter::default();
    let ok = pith.run(
        "import \"geometry\"\n\
         int result = geometry.pi\n",
        &mut reporter,
    );
    assert!(ok, "import failed: {:?}", reporter.diagnostics);
    assert_eq!(lookup(&pith, "result"), Value::Int(3));
}
