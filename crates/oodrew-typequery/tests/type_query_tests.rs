use oodrew_typequery::{
    parse_and_decompose, parse_type_query, ClassRef, LubGlbQuery, SubsumesQuery, TypePredicate,
    TypeQuery, TypeQueryError,
};

// ============================================================================
// parse
// ============================================================================

#[test]
fn predicate_names_are_case_insensitive() {
    for (text, expected) in [
        ("LUB(a, b).", TypePredicate::Lub),
        ("lub(a, b).", TypePredicate::Lub),
        ("Lub(a, b).", TypePredicate::Lub),
        ("GLB(a, b).", TypePredicate::Glb),
        ("SubSumes(a, b).", TypePredicate::Subsumes),
        ("SUBSUMESPLUS(a, b).", TypePredicate::SubsumesPlus),
        ("subsumesplus(a, b).", TypePredicate::SubsumesPlus),
    ] {
        let parsed = parse_type_query(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        assert_eq!(parsed.predicate, expected, "{text}");
    }
}

#[test]
fn multi_atom_queries_are_malformed() {
    for text in [
        "lub(?X, a, b) :- glb(a, b).",
        "subsumes(a, b), subsumes(b, c).",
        "p(?X) :- q(?X), r(?X).",
    ] {
        match parse_type_query(text) {
            Err(TypeQueryError::MalformedQuery { atoms }) => assert!(atoms >= 2, "{text}"),
            other => panic!("{text}: expected MalformedQuery, got {other:?}"),
        }
    }
}

#[test]
fn unknown_predicates_are_named_in_the_error() {
    let err = parse_type_query("supertype(a, b).").unwrap_err();
    assert_eq!(
        err,
        TypeQueryError::UnsupportedPredicate {
            symbol: "supertype".into()
        }
    );
    assert!(err.to_string().contains("supertype"));
}

#[test]
fn term_parser_failures_surface_as_parse_errors() {
    assert!(matches!(
        parse_type_query("lub(?X, a"),
        Err(TypeQueryError::Parse(_))
    ));
}

#[test]
fn parse_keeps_variable_names() {
    let parsed = parse_type_query("subsumesPlus(?S, ?T).").unwrap();
    assert_eq!(parsed.variable_names, vec!["S", "T"]);
    assert_eq!(parsed.arity(), 2);
}

// ============================================================================
// decompose_subsumes
// ============================================================================

#[test]
fn subsumes_with_two_literals() {
    let q = parse_type_query("subsumes(a, b).")
        .unwrap()
        .decompose_subsumes()
        .unwrap();
    assert_eq!(q.super_name(), "a");
    assert!(!q.super_is_var());
    assert_eq!(q.sub_name(), "b");
    assert!(!q.sub_is_var());
}

#[test]
fn subsumes_same_variable_twice_is_rejected() {
    let err = parse_type_query("subsumes(?X, ?X).")
        .unwrap()
        .decompose_subsumes()
        .unwrap_err();
    assert_eq!(err, TypeQueryError::DuplicateVariableName { name: "X".into() });
}

#[test]
fn subsumes_distinct_variables_are_fine() {
    let q = parse_type_query("subsumesPlus(?Super, ?Sub).")
        .unwrap()
        .decompose_subsumes()
        .unwrap();
    assert_eq!(
        q,
        SubsumesQuery {
            super_type: ClassRef::Variable("Super".into()),
            sub_type: ClassRef::Variable("Sub".into()),
        }
    );
}

#[test]
fn subsumes_wrong_arity() {
    for (text, found) in [
        ("subsumes(a, b, c).", 3),
        ("subsumes(a).", 1),
        ("subsumesPlus().", 0),
    ] {
        let err = parse_type_query(text)
            .unwrap()
            .decompose_subsumes()
            .unwrap_err();
        match err {
            TypeQueryError::ArityMismatch {
                expected, found: f, ..
            } => {
                assert_eq!(expected, "2", "{text}");
                assert_eq!(f, found, "{text}");
            }
            other => panic!("{text}: expected ArityMismatch, got {other:?}"),
        }
    }
}

#[test]
fn subsumes_rejects_anonymous_operands() {
    for text in ["subsumes(?, b).", "subsumes(a, _).", "subsumesPlus(?, ?)."] {
        let err = parse_type_query(text)
            .unwrap()
            .decompose_subsumes()
            .unwrap_err();
        assert!(
            matches!(err, TypeQueryError::AnonymousOperandNotAllowed { .. }),
            "{text}: {err:?}"
        );
    }
}

#[test]
fn subsumes_variable_and_literal_do_not_clash() {
    // Same spelling, but only one side is a variable.
    let q = parse_type_query("subsumes(?car, car).")
        .unwrap()
        .decompose_subsumes()
        .unwrap();
    assert!(q.super_is_var());
    assert!(!q.sub_is_var());
}

// ============================================================================
// decompose_lub_glb: operand indexing
// ============================================================================

/// Where the class list starts, pinned down for every designator shape.
#[test]
fn lub_glb_operand_indexing_table() {
    struct Case {
        text: &'static str,
        result_var: Option<&'static str>,
        classes: &'static [&'static str],
    }
    let cases = [
        Case {
            text: "lub(?X, a, b).",
            result_var: Some("X"),
            classes: &["a", "b"],
        },
        Case {
            text: "glb(a, b).",
            result_var: None,
            classes: &["a", "b"],
        },
        Case {
            text: "lub(a).",
            result_var: None,
            classes: &["a"],
        },
        Case {
            text: "glb(?R).",
            result_var: Some("R"),
            classes: &[],
        },
        Case {
            text: "lub(?, a, b).",
            result_var: None,
            classes: &["a", "b"],
        },
        Case {
            text: "glb(?Res, car, boat, plane).",
            result_var: Some("Res"),
            classes: &["car", "boat", "plane"],
        },
        Case {
            text: "lub(?X, ?Y, a).",
            result_var: Some("X"),
            classes: &["Y", "a"],
        },
        Case {
            text: "glb(a, ?Y).",
            result_var: None,
            classes: &["a", "Y"],
        },
        Case {
            text: "glb(a, ?).",
            result_var: None,
            classes: &["a"],
        },
        Case {
            text: "lub(?X, _, b, ?).",
            result_var: Some("X"),
            classes: &["b"],
        },
    ];

    for case in cases {
        let q = parse_type_query(case.text)
            .unwrap()
            .decompose_lub_glb()
            .unwrap_or_else(|e| panic!("{}: {e}", case.text));
        assert_eq!(q.result_var.as_deref(), case.result_var, "{}", case.text);
        assert_eq!(q.result_var_used(), case.result_var.is_some(), "{}", case.text);
        assert_eq!(q.class_names, case.classes, "{}", case.text);
    }
}

#[test]
fn glb_without_result_variable_lists_each_class_once() {
    let q = parse_type_query("glb(a, b).")
        .unwrap()
        .decompose_lub_glb()
        .unwrap();
    assert_eq!(q.class_names.iter().filter(|c| c.as_str() == "a").count(), 1);
}

#[test]
fn class_names_keep_type_annotations() {
    let q = parse_type_query("lub(?X, car:Vehicle, \"sea plane\").")
        .unwrap()
        .decompose_lub_glb()
        .unwrap();
    assert_eq!(q.class_names, vec!["car:Vehicle", "\"sea plane\""]);
}

// ============================================================================
// decompose / TypeQuery
// ============================================================================

#[test]
fn decompose_dispatches_on_predicate() {
    let lub: TypeQuery = "lub(?X, a, b).".parse().unwrap();
    assert_eq!(
        lub,
        TypeQuery::Lub(LubGlbQuery {
            result_var: Some("X".into()),
            class_names: vec!["a".into(), "b".into()],
        })
    );
    assert_eq!(lub.predicate(), TypePredicate::Lub);

    let plus = parse_and_decompose("subsumesPlus(?S, t).").unwrap();
    assert_eq!(plus.predicate(), TypePredicate::SubsumesPlus);
}

#[test]
fn type_query_serializes_with_predicate_tag() {
    let q = parse_and_decompose("subsumes(?S, t).").unwrap();
    let json = serde_json::to_value(&q).unwrap();
    assert_eq!(json["predicate"], "subsumes");
    assert_eq!(json["super_type"]["kind"], "variable");
    assert_eq!(json["super_type"]["name"], "S");
    assert_eq!(json["sub_type"]["kind"], "class");

    let back: TypeQuery = serde_json::from_value(json).unwrap();
    assert_eq!(back, q);
}

#[test]
fn queries_decompose_concurrently() {
    let inputs = ["lub(?X, a, b).", "glb(a, b).", "subsumes(a, b).", "subsumesPlus(?S, t)."];
    let results: Vec<TypeQuery> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|text| s.spawn(move || parse_and_decompose(text)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect()
    });
    let predicates: Vec<_> = results.iter().map(TypeQuery::predicate).collect();
    assert_eq!(
        predicates,
        vec![
            TypePredicate::Lub,
            TypePredicate::Glb,
            TypePredicate::Subsumes,
            TypePredicate::SubsumesPlus
        ]
    );
}
