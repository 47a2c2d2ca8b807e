mod fixture;

use feature_nnf::{
    formula::{is_nnf, normalize},
    utils::{FeatureGraph, FeatureTree},
    ComplexConstraintConverter, ConversionStrategy, ConverterOptions, FeatureModel, GroupType,
    NnfConverter,
};
use fixture::{constraints, convert, formula, model, model_with_constraints, node};
use insta::assert_snapshot;
use tracing_test::traced_test;

#[test]
fn test_parser() {
    assert_eq!(formula("A & B & C").to_string(), "A & B & C");
    assert_eq!(formula("-A | B & C").to_string(), "-A | (B & C)");
    assert_eq!(formula("A => B => C").to_string(), "A => (B => C)");
    assert_eq!(formula("A <=> B | C").to_string(), "A <=> (B | C)");
    assert_eq!(
        formula("atleast2(A, B, -C)").to_string(),
        "atleast2(A, B, -C)"
    );
    assert_eq!(formula("true & -false").to_string(), "true & -false");
}

#[test]
fn test_normalize() {
    let cases = [
        ("A", "A"),
        ("--A", "A"),
        ("---A", "-A"),
        ("-(A & B)", "-A | -B"),
        ("-(A | -B)", "-A & B"),
        ("A => B", "-A | B"),
        ("-(A => B)", "A & -B"),
        ("A <=> B", "(-A | B) & (A | -B)"),
        ("-(A <=> B)", "(A & -B) | (-A & B)"),
        ("-(A & (B | -C))", "-A | (-B & C)"),
        ("atleast2(A, B, C)", "(A | B) & (A | C) & (B | C)"),
        ("atmost1(A, B, C)", "(-A | -B) & (-A | -C) & (-B | -C)"),
        ("atleast0(A, B)", "true"),
        ("atleast3(A, B)", "false"),
        ("-atmost2(A, B)", "false"),
        ("-true", "false"),
    ];

    for (input, expected) in cases {
        let normalized = node(input);
        assert_eq!(normalized.to_string(), expected, "normalizing `{input}`");
        assert!(is_nnf(&normalized));
        assert_eq!(normalize(&normalized.clone().into()), normalized);
    }
}

/// `A | -B` becomes an or-group with one terminal per literal.
#[test]
#[traced_test]
fn test_disjunction_of_literals() {
    let model = model(&["A", "B"]);
    let formulas = feature_nnf::preprocess(&formula("A | -B").into());
    let result = convert(&model, &formulas, false).unwrap();

    assert_snapshot!(result.display(), @r###"
    Root [and]
    ├─ A
    ├─ B
    └─ top [and, mandatory, abstract]
       └─ f0 [or, mandatory, abstract]
          ├─ A_1 [abstract]
          └─ B_2 [abstract]

    A_1 => A
    B_2 => -B
    "###);
}

/// `-(A & B)` is normalized into `-A | -B` before it is converted.
#[test]
fn test_negated_conjunction() {
    let model = model(&["A", "B"]);
    let formulas = feature_nnf::preprocess(&formula("-(A & B)").into());
    assert_eq!(formulas.len(), 1);
    assert_eq!(formulas[0].to_string(), "-A | -B");

    let result = convert(&model, &formulas, false).unwrap();
    assert_snapshot!(result.display(), @r###"
    Root [and]
    ├─ A
    ├─ B
    └─ top [and, mandatory, abstract]
       └─ f0 [or, mandatory, abstract]
          ├─ A_1 [abstract]
          └─ B_2 [abstract]

    A_1 => -A
    B_2 => -B
    "###);
}

#[test]
fn test_nested_groups() {
    let model = model(&["A", "B", "C", "D"]);
    let formulas = [node("(A & -B) | (C => D)")];
    let result = convert(&model, &formulas, true).unwrap();

    assert_snapshot!(result.display(), @r###"
    Root [and]
    ├─ A
    ├─ B
    ├─ C
    ├─ D
    └─ top [and, mandatory, abstract]
       └─ f0 [or, mandatory, abstract]
          ├─ f1 [and, mandatory, abstract]
          │  ├─ A_2 [abstract]
          │  └─ B_3 [abstract]
          └─ f4 [or, mandatory, abstract]
             ├─ C_5 [abstract]
             └─ D_6 [abstract]

    A_2 => A
    A => A_2
    B_3 => -B
    C_5 => -C
    D_6 => D
    D => D_6
    "###);
}

#[test]
fn test_multiple_formulas_share_anchor() {
    let model = model(&["A", "B"]);
    let formulas = [node("A"), node("-B"), node("A | B")];
    let result = convert(&model, &formulas, false).unwrap();

    let anchor = result.lookup("top").unwrap();
    let children: Vec<_> = result
        .feature(anchor)
        .children()
        .iter()
        .map(|&id| result.feature(id).name())
        .collect();
    assert_eq!(children, vec!["A_0", "B_1", "f2"]);
    assert_eq!(constraints(&result), vec!["A_0 => A", "B_1 => -B", "A_3 => A", "B_4 => B"]);
}

#[test]
fn test_alternative_root_is_wrapped() {
    let mut model = model(&["A", "B"]);
    let root = model.root();
    model.set_group_type(root, GroupType::Alternative);

    let result = convert(&model, &[node("A => B")], false).unwrap();
    assert_snapshot!(result.display(), @r###"
    NewRoot [and, mandatory, abstract]
    ├─ Root [alternative, mandatory]
    │  ├─ A
    │  └─ B
    └─ top [and, mandatory, abstract]
       └─ f0 [or, mandatory, abstract]
          ├─ A_1 [abstract]
          └─ B_2 [abstract]

    A_1 => -A
    B_2 => B
    "###);
    assert!(FeatureGraph::from_tree(&result).is_tree());
}

#[test]
fn test_input_model_is_not_modified() {
    let model = model_with_constraints(&["A", "B"], &["A | B"]);
    let before = model.display().to_string();

    let mut converter = NnfConverter::new();
    let formulas = converter.preprocess(model.constraints().next().unwrap().1);
    let result = converter.convert(&model, &formulas).unwrap();

    assert_eq!(model.display().to_string(), before);
    assert_eq!(model.feature_count(), 3);
    assert_eq!(result.feature_count(), 7);
    // The original constraint is still part of the converted copy
    assert_eq!(result.constraint_count(), 3);
}

#[test]
fn test_errors_leave_model_untouched() {
    let model = model(&["A"]);
    let error = convert(&model, &[node("A"), node("A & B")], false).unwrap_err();

    assert_snapshot!(
        error,
        @"formula #1 `A & B` refers to `B` which is not a feature of the model"
    );
    assert_eq!(model.feature_count(), 2);
    assert_eq!(model.constraint_count(), 0);
}

#[test]
fn test_complex_constraint_driver() {
    let model = model_with_constraints(
        &["A", "B", "C"],
        &["A => B", "choose1(A, B, C)", "-(B & C)", "C"],
    );

    let result = ComplexConstraintConverter::new().convert(&model).unwrap();
    assert_snapshot!(result.display(), @r###"
    Root [and]
    ├─ A
    ├─ B
    ├─ C
    └─ top [and, mandatory, abstract]
       └─ f0 [and, mandatory, abstract]
          ├─ f1 [and, mandatory, abstract]
          │  └─ f2 [or, mandatory, abstract]
          │     ├─ A_3 [abstract]
          │     ├─ B_4 [abstract]
          │     └─ C_5 [abstract]
          └─ f6 [and, mandatory, abstract]
             ├─ f7 [or, mandatory, abstract]
             │  ├─ A_8 [abstract]
             │  └─ B_9 [abstract]
             ├─ f10 [or, mandatory, abstract]
             │  ├─ A_11 [abstract]
             │  └─ C_12 [abstract]
             └─ f13 [or, mandatory, abstract]
                ├─ B_14 [abstract]
                └─ C_15 [abstract]

    A => B
    -(B & C)
    C
    A_3 => A
    B_4 => B
    C_5 => C
    A_8 => -A
    B_9 => -B
    A_11 => -A
    C_12 => -C
    B_14 => -B
    C_15 => -C
    "###);

    let graph = FeatureGraph::from_tree(&result);
    assert!(graph.is_tree());
}

#[test]
fn test_converter_options() {
    let options = ConverterOptions::new()
        .preserve(true)
        .anchor_name("constraints")
        .max_depth(Some(4));
    let mut converter = NnfConverter::with_options(options);
    assert!(converter.options().preserves_semantics());

    let result = converter
        .convert(&model(&["A", "B"]), &[node("A | B")])
        .unwrap();
    assert!(result.lookup("constraints").is_some());
    assert_eq!(
        constraints(&result),
        vec!["A_1 => A", "A => A_1", "B_2 => B", "B => B_2"]
    );
}

#[test]
fn test_json_model() {
    let json = r#"{
        "root": {
            "name": "Car",
            "group": "and",
            "mandatory": true,
            "children": [
                { "name": "Engine", "group": "alternative", "mandatory": true, "children": [
                    { "name": "Electric" },
                    { "name": "Gas" }
                ]},
                { "name": "Radio", "abstract": true }
            ]
        },
        "constraints": [
            { "implies": [{ "var": "Radio" }, { "or": [{ "var": "Electric" }, { "var": "Gas" }] }] }
        ]
    }"#;

    let model: FeatureTree = serde_json::from_str(json).unwrap();
    assert_eq!(model.feature_count(), 5);
    assert_eq!(constraints(&model), vec!["Radio => (Electric | Gas)"]);

    let result = ComplexConstraintConverter::new().convert(&model).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let reloaded: FeatureTree = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded.display().to_string(), result.display().to_string());
}

/// `atmost2(A, C)` is `true`, so `B => atmost2(A, C)` must not restrict `B`.
#[test]
fn test_tautology_below_disjunction() {
    let model = model_with_constraints(&["A", "B", "C"], &["B => atmost2(A, C)"]);
    assert_eq!(
        feature_nnf::preprocess(model.constraints().next().unwrap().1)[0].to_string(),
        "-B | true"
    );

    let result = ComplexConstraintConverter::new().convert(&model).unwrap();
    assert_snapshot!(result.display(), @r###"
    Root [and]
    ├─ A
    ├─ B
    ├─ C
    └─ top [and, mandatory, abstract]
       └─ f0 [or, mandatory, abstract]
          ├─ B_1 [abstract]
          └─ f2 [mandatory, abstract]

    B_1 => -B
    "###);
}

#[test]
fn test_free_convert_never_reuses_names() {
    let model = model(&["A"]);
    let first = feature_nnf::convert(&model, &[node("A")], false).unwrap();
    let second = feature_nnf::convert(&first, &[node("A")], false).unwrap();

    let names: Vec<_> = second.features().map(|(_, f)| f.name()).collect();
    let terminals: Vec<_> = names.iter().filter(|n| n.starts_with("A_")).collect();
    assert_eq!(terminals.len(), 2);
    assert_ne!(terminals[0], terminals[1]);

    // Every terminal is bound to its own constraint
    let mut bound: Vec<_> = constraints(&second)
        .into_iter()
        .map(|c| c.trim_end_matches(" => A").to_string())
        .collect();
    bound.sort();
    let mut expected: Vec<_> = terminals.iter().map(|n| n.to_string()).collect();
    expected.sort();
    assert_eq!(bound, expected);
}
