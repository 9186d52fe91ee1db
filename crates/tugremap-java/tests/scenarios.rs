//! End-to-end remap scenarios over small resolved units.
//!
//! Each test builds a unit with [`UnitBuilder`], attaches bindings the way a
//! type checker would, remaps it against a mapping set and checks the
//! rewritten source.
//!
//! # Running These Tests
//!
//! ```bash
//! cargo nextest run -p tugremap-java scenarios
//! ```

mod support;

use support::{constructor, method, param, remap, sig};
use tugremap_core::descriptor::FieldSignature;
use tugremap_core::mappings::{
    ClassHierarchy, ClassInfo, ClassMapping, FieldMapping, InheritanceProvider, MappingSet,
    MemberAccess, MethodMapping,
};
use tugremap_java::Remapper;
use tugremap_tree::binding::{BindingTable, TypeBinding, VariableBinding};
use tugremap_tree::nodes::{CompilationUnit, NodeKind, UnitBuilder};

/// Remap, apply, remap the renamed unit again: the second pass must be empty.
fn assert_idempotent(
    mappings: &MappingSet,
    inheritance: &dyn InheritanceProvider,
    unit: &CompilationUnit,
    bindings: &BindingTable,
) {
    let (first, _) = remap(mappings, inheritance, unit, bindings);
    assert!(!first.is_empty(), "first pass should rename something");
    let renamed = unit.with_renames(&first.into_edits()).unwrap();
    let (second, source) = remap(mappings, inheritance, &renamed, bindings);
    assert!(second.is_empty(), "second pass proposed {:?}", second);
    assert_eq!(source, renamed.source);
}

// ============================================================================
// Parameter Slots
// ============================================================================

/// `class a { static void foo(long a, int b) { use(b); } }`
fn static_foo_unit() -> (CompilationUnit, BindingTable) {
    let foo = method("a", "foo", "(JI)V", true, &["a", "b"]);
    let mut b = UnitBuilder::new("a.java");
    b.open(NodeKind::TypeDeclaration);
    b.text("class a { static void ");
    let decl = b.open(NodeKind::MethodDeclaration);
    let name = b.name("foo");
    b.text("(long ");
    let pa = b.name("a");
    b.text(", int ");
    let pb = b.name("b");
    b.text(") { use(");
    let pb_use = b.name("b");
    b.text("); }");
    b.close();
    b.text(" }");
    let unit = b.finish();

    let table = BindingTable::new()
        .with(decl, foo.clone())
        .with(name, foo.clone())
        .with(pa, param(&foo, 0))
        .with(pb, param(&foo, 1))
        .with(pb_use, param(&foo, 1));
    (unit, table)
}

/// `class a { void bar(int x, double y) { x = y; } }`
fn instance_bar_unit() -> (CompilationUnit, BindingTable) {
    let bar = method("a", "bar", "(ID)V", false, &["x", "y"]);
    let mut b = UnitBuilder::new("a.java");
    b.open(NodeKind::TypeDeclaration);
    b.text("class a { void ");
    let decl = b.open(NodeKind::MethodDeclaration);
    let name = b.name("bar");
    b.text("(int ");
    let px = b.name("x");
    b.text(", double ");
    let py = b.name("y");
    b.text(") { ");
    let px_use = b.name("x");
    b.text(" = ");
    let py_use = b.name("y");
    b.text("; }");
    b.close();
    b.text(" }");
    let unit = b.finish();

    let table = BindingTable::new()
        .with(decl, bar.clone())
        .with(name, bar.clone())
        .with(px, param(&bar, 0))
        .with(py, param(&bar, 1))
        .with(px_use, param(&bar, 0))
        .with(py_use, param(&bar, 1));
    (unit, table)
}

mod slots {
    use super::*;

    #[test]
    fn static_method_wide_parameter_takes_two_slots() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::identity("a").with_method(
                MethodMapping::new(sig("foo", "(JI)V"), "foo")
                    .with_parameter(0, "first")
                    .with_parameter(1, "wrong")
                    .with_parameter(2, "second"),
            ),
        );
        let (unit, table) = static_foo_unit();
        let (_, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
        assert_eq!(
            source,
            "class a { static void foo(long first, int second) { use(second); } }"
        );
    }

    #[test]
    fn instance_method_reserves_receiver_slot() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::identity("a").with_method(
                MethodMapping::new(sig("bar", "(ID)V"), "bar")
                    .with_parameter(0, "self")
                    .with_parameter(1, "count")
                    .with_parameter(2, "ratio")
                    .with_parameter(3, "wrong"),
            ),
        );
        let (unit, table) = instance_bar_unit();
        let (_, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
        assert_eq!(
            source,
            "class a { void bar(int count, double ratio) { count = ratio; } }"
        );
    }

    #[test]
    fn missing_slot_mapping_is_skipped() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::identity("a").with_method(
                MethodMapping::new(sig("bar", "(ID)V"), "bar").with_parameter(2, "ratio"),
            ),
        );
        let (unit, table) = instance_bar_unit();
        let (_, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
        assert_eq!(source, "class a { void bar(int x, double ratio) { x = ratio; } }");
    }
}

// ============================================================================
// Lambda Nesting
// ============================================================================

/// `class a { void bar(int x, int y) { run(x -> x + y); use(x); } }`
///
/// The lambda declares its own `x`; `y` inside the lambda belongs to `bar`.
fn lambda_unit() -> (CompilationUnit, BindingTable) {
    let bar = method("a", "bar", "(II)V", false, &["x", "y"]);
    let lambda = method("a", "lambda$bar$0", "(I)I", true, &["x"]);

    let mut b = UnitBuilder::new("a.java");
    b.open(NodeKind::TypeDeclaration);
    b.text("class a { void ");
    let decl = b.open(NodeKind::MethodDeclaration);
    let name = b.name("bar");
    b.text("(int ");
    let px = b.name("x");
    b.text(", int ");
    let py = b.name("y");
    b.text(") { run(");
    let lambda_node = b.open(NodeKind::LambdaExpression);
    let lx = b.name("x");
    b.text(" -> ");
    let lx_use = b.name("x");
    b.text(" + ");
    let py_in_lambda = b.name("y");
    b.close();
    b.text("); use(");
    let px_use = b.name("x");
    b.text("); }");
    b.close();
    b.text(" }");
    let unit = b.finish();

    let table = BindingTable::new()
        .with(decl, bar.clone())
        .with(name, bar.clone())
        .with(px, param(&bar, 0))
        .with(py, param(&bar, 1))
        .with(lambda_node, lambda.clone())
        .with(lx, param(&lambda, 0))
        .with(lx_use, param(&lambda, 0))
        .with(py_in_lambda, param(&bar, 1))
        .with(px_use, param(&bar, 0));
    (unit, table)
}

fn process_mapping() -> MethodMapping {
    MethodMapping::new(sig("bar", "(II)V"), "process")
        .with_parameter(1, "outer")
        .with_parameter(2, "offset")
}

mod lambdas {
    use super::*;

    #[test]
    fn lambda_parameters_resolve_in_their_own_frame() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::identity("a")
                .with_method(process_mapping())
                .with_method(
                    MethodMapping::new(sig("lambda$bar$0", "(I)I"), "lambda$process$0")
                        .with_parameter(0, "inner"),
                ),
        );
        let (unit, table) = lambda_unit();
        let (_, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
        assert_eq!(
            source,
            "class a { void process(int outer, int offset) { run(inner -> inner + offset); use(outer); } }"
        );
    }

    #[test]
    fn unmapped_lambda_leaves_outer_renames_intact() {
        let set = MappingSet::new();
        set.insert(ClassMapping::identity("a").with_method(process_mapping()));
        let (unit, table) = lambda_unit();
        let (_, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
        assert_eq!(
            source,
            "class a { void process(int outer, int offset) { run(x -> x + offset); use(outer); } }"
        );
    }

    #[test]
    fn lambda_renames_are_idempotent() {
        let set = MappingSet::new();
        set.insert(ClassMapping::identity("a").with_method(process_mapping()));
        let (unit, table) = lambda_unit();
        assert_idempotent(&set, &ClassHierarchy::new(), &unit, &table);
    }
}

// ============================================================================
// Constructors
// ============================================================================

/// `class a { a(int b) {} a(long c) {} }`
fn constructors_unit() -> (CompilationUnit, BindingTable) {
    let int_ctor = constructor("a", "(I)V", &["b"]);
    let long_ctor = constructor("a", "(J)V", &["c"]);

    let mut b = UnitBuilder::new("a.java");
    b.open(NodeKind::TypeDeclaration);
    b.text("class ");
    let class_name = b.name("a");
    b.text(" { ");
    let first = b.open(NodeKind::MethodDeclaration);
    let first_name = b.name("a");
    b.text("(int ");
    let pb = b.name("b");
    b.text(") {}");
    b.close();
    b.text(" ");
    let second = b.open(NodeKind::MethodDeclaration);
    let second_name = b.name("a");
    b.text("(long ");
    let pc = b.name("c");
    b.text(") {}");
    b.close();
    b.text(" }");
    let unit = b.finish();

    let table = BindingTable::new()
        .with(class_name, TypeBinding::named("a"))
        .with(first, int_ctor.clone())
        .with(first_name, int_ctor.clone())
        .with(pb, param(&int_ctor, 0))
        .with(second, long_ctor.clone())
        .with(second_name, long_ctor.clone())
        .with(pc, param(&long_ctor, 0));
    (unit, table)
}

mod constructors {
    use super::*;

    fn widget() -> MappingSet {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::new("a", "net/example/Widget")
                .with_method(MethodMapping::new(sig("<init>", "(I)V"), "notAName"))
                .with_method(MethodMapping::new(sig("<init>", "(J)V"), "<init>").with_parameter(1, "seed")),
        );
        set
    }

    #[test]
    fn every_overload_takes_the_class_simple_name() {
        let (unit, table) = constructors_unit();
        let (_, source) = remap(&widget(), &ClassHierarchy::new(), &unit, &table);
        assert_eq!(source, "class Widget { Widget(int b) {} Widget(long seed) {} }");
    }

    #[test]
    fn nested_class_constructor_uses_segment_after_dollar() {
        let set = MappingSet::new();
        set.insert(ClassMapping::new("a", "net/example/Outer$Inner"));
        let (unit, table) = constructors_unit();
        let (_, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
        assert_eq!(source, "class Inner { Inner(int b) {} Inner(long c) {} }");
    }

    #[test]
    fn constructor_parameters_are_not_inherited() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::new("s", "Base")
                .with_method(MethodMapping::new(sig("<init>", "(J)V"), "<init>").with_parameter(1, "inherited")),
        );
        set.insert(ClassMapping::new("a", "Derived"));
        let hierarchy = ClassHierarchy::new()
            .with_class(ClassInfo::new("s").with_method(sig("<init>", "(J)V"), MemberAccess::Public))
            .with_class(ClassInfo::new("a").with_superclass("s"));
        let (unit, table) = constructors_unit();
        let (_, source) = remap(&set, &hierarchy, &unit, &table);
        assert_eq!(source, "class Derived { Derived(int b) {} Derived(long c) {} }");
    }

    #[test]
    fn constructor_renames_are_idempotent() {
        let (unit, table) = constructors_unit();
        assert_idempotent(&widget(), &ClassHierarchy::new(), &unit, &table);
    }
}

// ============================================================================
// Fields and Class Creation
// ============================================================================

/// `class a { void m() { zz.f = yy.g(); } }` with `f` on `zz` and `g()` on `yy`.
fn foreign_members_unit() -> (CompilationUnit, BindingTable) {
    let m = method("a", "m", "()V", false, &[]);
    let g = method("yy", "g", "()I", false, &[]);

    let mut b = UnitBuilder::new("a.java");
    b.open(NodeKind::TypeDeclaration);
    b.text("class a { void ");
    let decl = b.open(NodeKind::MethodDeclaration);
    b.name("m");
    b.text("() { zz.");
    let field = b.name("f");
    b.text(" = yy.");
    let call = b.name("g");
    b.text("(); }");
    b.close();
    b.text(" }");
    let unit = b.finish();

    let table = BindingTable::new()
        .with(decl, m)
        .with(field, VariableBinding::field("zz.f", "f", TypeBinding::named("zz")))
        .with(call, g);
    (unit, table)
}

mod fields {
    use super::*;

    #[test]
    fn field_of_unmapped_class_does_not_create_mapping() {
        let set = MappingSet::new();
        let (unit, table) = foreign_members_unit();
        let (batch, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
        assert!(batch.is_empty());
        assert_eq!(source, unit.source);
        assert!(!set.contains("zz"));
        assert!(set.contains("yy"), "method lookups create the class mapping");
    }

    #[test]
    fn typed_field_falls_back_to_untyped_mapping() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::new("zz", "Registry")
                .with_field(FieldMapping::new(FieldSignature::untyped("f"), "entries")),
        );
        let mut b = UnitBuilder::new("f.java");
        let field = b.name("f");
        let unit = b.finish();
        let table = BindingTable::new().with(
            field,
            VariableBinding::field("zz.f", "f", TypeBinding::named("zz"))
                .with_type(tugremap_core::descriptor::FieldType::object("java.util.List")),
        );
        let (_, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
        assert_eq!(source, "entries");
    }

    #[test]
    fn anonymous_declaring_type_is_skipped() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::identity("a")
                .with_field(FieldMapping::new(FieldSignature::untyped("f"), "renamed")),
        );
        let mut b = UnitBuilder::new("f.java");
        let field = b.name("f");
        let unit = b.finish();
        let table = BindingTable::new().with(
            field,
            VariableBinding::field("anon.f", "f", TypeBinding::anonymous("a$1")),
        );
        let mut edits = Vec::new();
        let stats = Remapper::new(&set, &ClassHierarchy::new())
            .remap_unit_into(&unit, &table, &mut edits)
            .unwrap();
        assert!(edits.is_empty());
        assert_eq!(stats.unresolved, 1);
    }
}

// ============================================================================
// Inheritance
// ============================================================================

mod inheritance {
    use super::*;

    /// `class b extends a { double a() {} void a(double c) {} }`
    #[test]
    fn overrides_take_the_ancestor_names() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::new("a", "net/example/Shape")
                .with_method(MethodMapping::new(sig("a", "()D"), "area"))
                .with_method(MethodMapping::new(sig("a", "(D)V"), "scale").with_parameter(1, "factor")),
        );
        let hierarchy = ClassHierarchy::new()
            .with_class(
                ClassInfo::new("a")
                    .with_method(sig("a", "()D"), MemberAccess::Public)
                    .with_method(sig("a", "(D)V"), MemberAccess::Public),
            )
            .with_class(ClassInfo::new("b").with_superclass("a"));

        let area = method("b", "a", "()D", false, &[]);
        let scale = method("b", "a", "(D)V", false, &["c"]);

        let mut b = UnitBuilder::new("b.java");
        b.open(NodeKind::TypeDeclaration);
        b.text("class b extends ");
        let superclass = b.name("a");
        b.text(" { double ");
        let area_decl = b.open(NodeKind::MethodDeclaration);
        let area_name = b.name("a");
        b.text("() {}");
        b.close();
        b.text(" void ");
        let scale_decl = b.open(NodeKind::MethodDeclaration);
        let scale_name = b.name("a");
        b.text("(double ");
        let pc = b.name("c");
        b.text(") {}");
        b.close();
        b.text(" }");
        let unit = b.finish();

        let table = BindingTable::new()
            .with(superclass, TypeBinding::named("a"))
            .with(area_decl, area.clone())
            .with(area_name, area)
            .with(scale_decl, scale.clone())
            .with(scale_name, scale.clone())
            .with(pc, param(&scale, 0));

        let (_, source) = remap(&set, &hierarchy, &unit, &table);
        assert_eq!(
            source,
            "class b extends Shape { double area() {} void scale(double factor) {} }"
        );
        assert!(set.get_class("b").unwrap().is_completed());
    }
}

// ============================================================================
// No-op Behavior
// ============================================================================

mod no_op {
    use super::*;

    #[test]
    fn empty_mapping_set_changes_nothing() {
        let set = MappingSet::new();
        for (unit, table) in [static_foo_unit(), instance_bar_unit(), lambda_unit(), constructors_unit()] {
            let (batch, source) = remap(&set, &ClassHierarchy::new(), &unit, &table);
            assert!(batch.is_empty(), "{} produced {:?}", unit.path, batch);
            assert_eq!(source, unit.source);
        }
    }

    #[test]
    fn parameter_renames_are_idempotent() {
        let set = MappingSet::new();
        set.insert(
            ClassMapping::identity("a").with_method(
                MethodMapping::new(sig("bar", "(ID)V"), "scaleBy")
                    .with_parameter(1, "count")
                    .with_parameter(2, "ratio"),
            ),
        );
        let (unit, table) = instance_bar_unit();
        assert_idempotent(&set, &ClassHierarchy::new(), &unit, &table);
    }

    #[test]
    fn remap_does_not_touch_declared_mappings() {
        let set = MappingSet::new();
        set.insert(ClassMapping::identity("a").with_method(process_mapping()));
        let (unit, table) = lambda_unit();
        remap(&set, &ClassHierarchy::new(), &unit, &table);
        let class = set.get_class("a").unwrap();
        assert_eq!(class.methods().count(), 1);
        assert_eq!(set.len(), 1);
    }
}
