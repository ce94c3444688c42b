//! Annotation reader integration tests
//!
//! End-to-end behavior of the normalize → tokenize → compile pipeline.

use anrd::{
    compile, normalize, parse, tokenize, Annotation, AnrdError, Config, DiagnosticKind,
    DuplicateKeyPolicy, ParameterValue, Parameters, Parser, Strictness, TokenKind,
};
use pretty_assertions::assert_eq;

fn scalar(s: &str) -> ParameterValue {
    ParameterValue::Scalar(s.to_string())
}

fn list(items: &[&str]) -> ParameterValue {
    ParameterValue::List(items.iter().map(|s| s.to_string()).collect())
}

fn annotation(name: &str, entries: Vec<(&str, ParameterValue)>) -> Annotation {
    Annotation::new(name, entries.into_iter().collect::<Parameters>())
}

// =============================================================================
// Documented examples
// =============================================================================

mod example_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_route_docblock() {
        let doc = r#"/**
 * @Route(path="/users", methods=["GET","POST"])
 * @Deprecated
 */"#;
        let outcome = parse(doc).unwrap();

        assert_eq!(
            outcome.annotations(),
            &[
                annotation(
                    "Route",
                    vec![("path", scalar("/users")), ("methods", list(&["GET", "POST"]))]
                ),
                annotation("Deprecated", vec![]),
            ]
        );
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_simple() {
        let outcome = parse("@Simple").unwrap();
        assert_eq!(outcome.annotations(), &[annotation("Simple", vec![])]);
    }

    #[test]
    fn test_positional_tag() {
        let outcome = parse(r#"@Tag("cacheable")"#).unwrap();
        let tag = &outcome.annotations()[0];

        assert_eq!(tag.value(), Some(&scalar("cacheable")));
        assert_eq!(tag.parameter("value"), Some(&scalar("cacheable")));
    }

    #[test]
    fn test_two_annotations_independent() {
        let outcome = parse("@A(x=\"1\")\n@B").unwrap();
        assert_eq!(
            outcome.annotations(),
            &[annotation("A", vec![("x", scalar("1"))]), annotation("B", vec![])]
        );
    }

    #[test]
    fn test_malformed_marker_truncates() {
        let outcome = parse("/**\n * @Before(\"ok\")\n * @(\"bad\")\n * @After\n */").unwrap();

        assert_eq!(
            outcome.annotations(),
            &[annotation("Before", vec![("value", scalar("ok"))])]
        );
        assert!(outcome.is_truncated());
        assert!(outcome.by_name("After").is_empty());
    }
}

// =============================================================================
// Pipeline properties
// =============================================================================

mod property_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_inputs() {
        for raw in ["", "/** */", "/**\n *\n */", "   "] {
            let outcome = parse(raw).unwrap();
            assert!(outcome.annotations().is_empty(), "input {:?}", raw);
        }
    }

    #[test]
    fn test_scalar_round_trip() {
        let originals = vec![
            annotation("Column", vec![("name", scalar("user_id")), ("type", scalar("int"))]),
            annotation("Table", vec![("name", scalar("users"))]),
            annotation("Id", vec![]),
            annotation("Route", vec![("path", scalar("/a b/(c)")), ("x", scalar(""))]),
        ];

        for original in originals {
            let text = original.to_string();
            let outcome = parse(&text).unwrap();
            assert_eq!(outcome.annotations(), &[original], "reparsing {}", text);
        }
    }

    #[test]
    fn test_list_round_trip() {
        let original = annotation("Methods", vec![("allow", list(&["GET", "HEAD"]))]);
        let outcome = parse(&original.to_string()).unwrap();
        assert_eq!(outcome.annotations(), &[original]);
    }

    #[test]
    fn test_idempotent_on_normalized_text() {
        let raw = "/**\n * Does things.\n * @A(x=\"1\", y=[\"2\",\"3\"])\n * @B(\"z\")\n */";
        let normalized = normalize(raw);

        let first = compile(&tokenize(&normalized));
        let second = compile(&tokenize(&normalize(&normalized)));
        assert_eq!(first.annotations, second.annotations);
        assert_eq!(parse(raw).unwrap().annotations, first.annotations);
    }

    #[test]
    fn test_source_order_preserved() {
        let names = ["Zeta", "Alpha", "Mid", "Alpha", "Beta"];
        let raw: String = names
            .iter()
            .map(|n| format!(" * @{}\n", n))
            .collect();
        let outcome = parse(&format!("/**\n{} */", raw)).unwrap();

        let parsed: Vec<_> = outcome.annotations().iter().map(Annotation::name).collect();
        assert_eq!(parsed, names);
        assert_eq!(outcome.by_name("Alpha").len(), 2);
    }

    #[test]
    fn test_parameter_order_preserved() {
        let outcome = parse(r#"@A(z="1", a="2", m=["3"])"#).unwrap();
        let keys: Vec<_> = outcome.annotations()[0].parameters().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_end_token_always_last() {
        for text in ["", "@A", "@A(x=\"1\")", "\"unterminated"] {
            let tokens = tokenize(text);
            assert_eq!(tokens.last().map(|t| t.kind()), Some(TokenKind::End));
            assert_eq!(
                tokens.iter().filter(|t| t.kind() == TokenKind::End).count(),
                1
            );
        }
    }

    #[test]
    fn test_parallel_parses_are_independent() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let raw = format!("/** @Worker(id=\"{}\") */", i);
                    parse(&raw).unwrap().into_annotations()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let anns = handle.join().unwrap();
            assert_eq!(anns, vec![annotation("Worker", vec![("id", scalar(&i.to_string()))])]);
        }
    }
}

// =============================================================================
// Lenient input handling
// =============================================================================

mod leniency_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prose_and_phpdoc_tags_mixed_in() {
        let doc = r#"/**
 * Fetch a user by id.
 *
 * @param int $id
 * @Cache(ttl="60")
 * @return User
 */"#;
        let outcome = parse(doc).unwrap();

        assert_eq!(
            outcome.annotations(),
            &[annotation("Cache", vec![("ttl", scalar("60"))])]
        );
        assert!(!outcome.is_truncated());
    }

    #[test]
    fn test_single_line_docblock() {
        let outcome = parse(r#"/** @Inject("logger") */"#).unwrap();
        assert_eq!(
            outcome.annotations(),
            &[annotation("Inject", vec![("value", scalar("logger"))])]
        );
    }

    #[test]
    fn test_namespaced_name() {
        let outcome = parse(r#"@\Doctrine\ORM\Entity(repositoryClass="UserRepo")"#).unwrap();
        assert_eq!(outcome.annotations()[0].name(), r"\Doctrine\ORM\Entity");
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let outcome = parse("@A ( x = \"1\" , y = [ \"a\" , \"b\" ] )").unwrap();
        assert_eq!(
            outcome.annotations(),
            &[annotation("A", vec![("x", scalar("1")), ("y", list(&["a", "b"]))])]
        );
    }

    #[test]
    fn test_parameters_spanning_lines() {
        let doc = "/**\n * @A(\n *   x=\"1\",\n *   y=\"2\"\n * )\n */";
        let outcome = parse(doc).unwrap();
        assert_eq!(
            outcome.annotations(),
            &[annotation("A", vec![("x", scalar("1")), ("y", scalar("2"))])]
        );
    }

    #[test]
    fn test_unterminated_string_in_parameters_is_fatal() {
        let err = parse("@A(x=\"open").unwrap_err();
        assert!(matches!(err, AnrdError::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_dropped_runs_reported_as_warnings() {
        let outcome = parse("@A ~~ $x").unwrap();
        let dropped = outcome
            .diagnostics()
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::DroppedRun { .. }))
            .count();
        assert_eq!(dropped, 2);
    }
}

// =============================================================================
// Configuration policies
// =============================================================================

mod policy_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strict_mode_errors_on_malformed_head() {
        let parser = Parser::new(Config {
            strictness: Strictness::Strict,
            ..Config::default()
        });
        let err = parser.parse("@Ok\n@(\"x\")").unwrap_err();
        assert!(matches!(err, AnrdError::Malformed { offset: 4, .. }));
    }

    #[test]
    fn test_strict_mode_accepts_phpdoc_tags() {
        let parser = Parser::new(Config::strict());
        let outcome = parser.parse("/**\n * @param int $id\n * @B\n */").unwrap();

        assert_eq!(outcome.annotations(), &[annotation("B", vec![])]);
        assert!(outcome
            .diagnostics()
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::UnexpectedToken { .. })));
    }

    #[test]
    fn test_detached_marker_keeps_later_annotations() {
        for parser in [Parser::default(), Parser::new(Config::strict())] {
            let outcome = parser.parse("@Ok\nreach us @ support\n@B(x=\"1\")").unwrap();
            assert_eq!(
                outcome.annotations(),
                &[annotation("Ok", vec![]), annotation("B", vec![("x", scalar("1"))])]
            );
            assert!(!outcome.is_truncated());
        }
    }

    #[test]
    fn test_permissive_mode_keeps_partial_result() {
        let parser = Parser::default();
        let outcome = parser.parse("@Ok\n@(\"x\")\n@Lost").unwrap();
        assert_eq!(outcome.annotations(), &[annotation("Ok", vec![])]);
        assert!(outcome.is_truncated());
    }

    #[test]
    fn test_duplicate_policies() {
        let raw = r#"@A(k="first", k="second")"#;

        let last = Parser::default().parse(raw).unwrap();
        assert_eq!(last.annotations()[0].parameter("k"), Some(&scalar("second")));

        let first = Parser::new(Config {
            duplicate_keys: DuplicateKeyPolicy::FirstWins,
            ..Config::default()
        })
        .parse(raw)
        .unwrap();
        assert_eq!(first.annotations()[0].parameter("k"), Some(&scalar("first")));
    }

    #[test]
    fn test_positional_and_named_value_collide() {
        let outcome = parse(r#"@A("pos", value="named")"#).unwrap();
        assert_eq!(outcome.annotations()[0].value(), Some(&scalar("named")));
        assert_eq!(outcome.annotations()[0].parameters().len(), 1);
    }
}
