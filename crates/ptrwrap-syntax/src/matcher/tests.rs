use rstest::rstest;

use super::*;
use crate::pattern::{FieldFilter, MultiDeclaratorPolicy, ShapeFilter};
use crate::unit::UnitOptions;

fn unit(source: &str) -> TranslationUnit {
    TranslationUnit::parse("/src/test.cc", source, &UnitOptions::default()).expect("unit")
}

fn names(pattern: &FieldPattern, source: &str) -> (Vec<String>, SkipReport) {
    let unit = unit(source);
    let mut skips = SkipReport::new();
    let found = Matcher::new(pattern)
        .find_all(&unit, &mut skips)
        .iter()
        .map(|m| m.name().to_owned())
        .collect();
    (found, skips)
}

#[test]
fn matches_pointer_fields_in_source_order() {
    let source = "struct S {\n  int* b_;\n  void* a_;\n  const char* name_;\n};\n";
    let (found, skips) = names(&FieldPattern::default(), source);
    assert_eq!(found, ["b_", "a_", "name_"]);
    assert!(skips.is_empty());
}

#[rstest]
#[case::method("struct S { int* get(); };")]
#[case::static_member("struct S { static int* shared_; };")]
#[case::reference("struct S { int*& ref_; };")]
#[case::array_of_pointers("struct S { int* slots_[4]; };")]
#[case::plain_value("struct S { int count_; };")]
#[case::local_variable("void f() { int* p = nullptr; }")]
#[case::global_variable("int* g_ptr;")]
fn ignores_non_matching_declarations(#[case] source: &str) {
    let (found, skips) = names(&FieldPattern::default(), source);
    assert!(found.is_empty(), "unexpected matches: {found:?}");
    assert!(skips.is_empty(), "unexpected skips: {skips}");
}

#[rstest]
#[case::function_pointer("struct S { int (*f)(); };", SkipReason::FunctionPointer)]
#[case::double_pointer("class C; struct S { C** pp; };", SkipReason::MultiLevelPointer)]
#[case::alias_of_pointer(
    "typedef int* IntPtr; struct S { IntPtr p; };",
    SkipReason::TypedefAlias
)]
#[case::pointer_to_alias_of_pointer(
    "using IntPtr = int*; struct S { IntPtr* p; };",
    SkipReason::MultiLevelPointer
)]
#[case::typedef_function_pointer(
    "typedef void (*F)(char); struct S { F f; };",
    SkipReason::FunctionPointer
)]
#[case::pointer_to_typedef_function_pointer(
    "typedef void (*F)(char); struct S { F* f; };",
    SkipReason::FunctionPointer
)]
#[case::pointer_to_array("struct S { int (*rows)[4]; };", SkipReason::PointerToArray)]
#[case::macro_pointee(
    "#define ELEMENT Foo\nstruct S { ELEMENT* p; };",
    SkipReason::MacroObscured
)]
#[case::member_data_pointer("struct S { int S::* mp; };", SkipReason::MemberPointer)]
#[case::member_function_pointer(
    "struct MyStruct { int (MyStruct::*f)(char); };",
    SkipReason::MemberPointer
)]
#[case::inline_definition(
    "struct S { struct { int x; }* anon; };",
    SkipReason::InlineTypeDefinition
)]
fn skips_unsupported_shapes(#[case] source: &str, #[case] reason: SkipReason) {
    let (found, skips) = names(&FieldPattern::default(), source);
    assert!(found.is_empty(), "unexpected matches: {found:?}");
    assert_eq!(skips.count(reason), 1, "skips: {skips}");
    assert_eq!(skips.total(), 1);
}

#[rstest]
#[case(MultiDeclaratorPolicy::Skip, &[], 2)]
#[case(MultiDeclaratorPolicy::Independent, &["a", "b"], 0)]
fn multi_declarator_policy_controls_siblings(
    #[case] policy: MultiDeclaratorPolicy,
    #[case] expected: &[&str],
    #[case] skipped: usize,
) {
    let pattern = FieldPattern::default().with_multi_declarator_policy(policy);
    let (found, skips) = names(&pattern, "struct S { int *a, *b; };");
    assert_eq!(found, expected);
    assert_eq!(skips.count(SkipReason::MultipleDeclarators), skipped);
}

#[test]
fn field_filter_uses_qualified_names() {
    let filter = FieldFilter::parse("outer::Foo::ptr_\n");
    let pattern = FieldPattern::default().with_field_filter(filter);
    let source = "namespace outer {\nclass Foo {\n  int* ptr_;\n  int* ptr2_;\n};\n}\n";

    let (found, skips) = names(&pattern, source);

    assert_eq!(found, ["ptr2_"]);
    assert_eq!(skips.count(SkipReason::ExcludedByFilter), 1);
}

#[test]
fn member_pointer_type_is_restored() {
    let unit = unit("struct S { int S::* mp; };");
    let mut skips = SkipReport::new();
    let pattern = FieldPattern::with_filters(Vec::new());
    let found = Matcher::new(&pattern).find_all(&unit, &mut skips);

    let first = found.first().expect("one match");
    assert!(matches!(first.declared_type(), Type::MemberPointer { .. }));
}

#[test]
fn qualified_name_includes_nested_scopes() {
    let unit = unit("namespace a { namespace b { struct Outer { struct Inner { int* p; }; }; } }");
    let mut skips = SkipReport::new();
    let found = Matcher::new(&FieldPattern::default()).find_all(&unit, &mut skips);

    let first = found.first().expect("one match");
    assert_eq!(first.qualified_name(), "a::b::Outer::Inner::p");
}

#[test]
fn disabling_filters_lets_shapes_through() {
    let pattern = FieldPattern::with_filters(vec![ShapeFilter::FunctionPointers]);
    let (found, skips) = names(&pattern, "class C; struct S { C** pp; int (*f)(); };");
    assert_eq!(found, ["pp"]);
    assert_eq!(skips.count(SkipReason::FunctionPointer), 1);
}

#[test]
fn callback_errors_stop_traversal() {
    let unit = unit("struct S { int* a; int* b; };");
    let mut skips = SkipReport::new();
    let mut seen = Vec::new();

    let result = Matcher::new(&FieldPattern::default()).for_each_match(
        &unit,
        &mut skips,
        |found| {
            seen.push(found.name().to_owned());
            Err("stop")
        },
    );

    assert_eq!(result, Err("stop"));
    assert_eq!(seen, ["a"]);
}

#[test]
fn broken_declarations_are_counted_when_tolerated() {
    let options = UnitOptions {
        parse_errors: crate::unit::ParseErrorPolicy::Tolerate,
        ..UnitOptions::default()
    };
    let unit = TranslationUnit::parse(
        "/src/broken.cc",
        "struct S {\n  int* ok_;\n  int* @broken_;\n};\n",
        &options,
    )
    .expect("tolerated unit");
    let mut skips = SkipReport::new();

    let found = Matcher::new(&FieldPattern::default()).find_all(&unit, &mut skips);

    let first = found.first().expect("intact field still matches");
    assert_eq!(first.name(), "ok_");
    assert!(found.iter().all(|m| m.name() != "@broken_"));
}
