#[cfg(test)]
mod tests {
    use promscope::ast::{
        AggregateOp, BinOp, Expr, Grouping, LabelMatcher, MatchOp, Query, VectorSelector,
    };
    use promscope::scope::{
        enforce_expr, enforce_matchers, enforce_query, Scope, ScopeError, SCOPE_LABEL,
    };
    use std::time::Duration;

    // Helper functions to build AST for testing
    fn matcher(name: &str, op: MatchOp, value: &str) -> LabelMatcher {
        LabelMatcher::new(name, op, value)
    }

    fn selector(metric: &str, matchers: Vec<LabelMatcher>) -> Expr {
        Expr::Selector(VectorSelector::with_matchers(metric, matchers))
    }

    fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            return_bool: false,
            matching: None,
        }
    }

    fn scope(value: &str) -> Scope {
        Scope::new(value)
    }

    // ========================================================================
    // Matcher enforcement
    // ========================================================================

    #[test]
    fn test_appends_when_absent() {
        let matchers = vec![matcher("job", MatchOp::Equal, "api")];
        let enforced = enforce_matchers(matchers, SCOPE_LABEL, "team-a");

        assert_eq!(
            enforced,
            vec![
                matcher("job", MatchOp::Equal, "api"),
                matcher("namespace", MatchOp::Equal, "team-a"),
            ]
        );
    }

    #[test]
    fn test_appends_to_empty_sequence() {
        let enforced = enforce_matchers(vec![], SCOPE_LABEL, "team-a");
        assert_eq!(enforced, vec![matcher("namespace", MatchOp::Equal, "team-a")]);
    }

    #[test]
    fn test_replaces_in_place() {
        let matchers = vec![
            matcher("job", MatchOp::Equal, "api"),
            matcher("namespace", MatchOp::Equal, "team-b"),
            matcher("region", MatchOp::NotEqual, "eu"),
        ];
        let enforced = enforce_matchers(matchers, SCOPE_LABEL, "team-a");

        // Same length, same positions, only the namespace matcher rewritten
        assert_eq!(
            enforced,
            vec![
                matcher("job", MatchOp::Equal, "api"),
                matcher("namespace", MatchOp::Equal, "team-a"),
                matcher("region", MatchOp::NotEqual, "eu"),
            ]
        );
    }

    #[test]
    fn test_replaces_regex_matcher_with_equality() {
        let matchers = vec![matcher("namespace", MatchOp::Regex, "team-.*")];
        let enforced = enforce_matchers(matchers, SCOPE_LABEL, "team-a");

        assert_eq!(enforced, vec![matcher("namespace", MatchOp::Equal, "team-a")]);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let matchers = vec![
            matcher("namespace", MatchOp::Equal, "one"),
            matcher("namespace", MatchOp::Equal, "two"),
        ];
        let enforced = enforce_matchers(matchers, SCOPE_LABEL, "team-a");

        // Only the first occurrence is rewritten; later duplicates are left
        // as they were
        assert_eq!(
            enforced,
            vec![
                matcher("namespace", MatchOp::Equal, "team-a"),
                matcher("namespace", MatchOp::Equal, "two"),
            ]
        );
    }

    #[test]
    fn test_enforcement_is_idempotent() {
        let matchers = vec![matcher("job", MatchOp::Equal, "api")];
        let once = enforce_matchers(matchers, SCOPE_LABEL, "team-a");
        let twice = enforce_matchers(once.clone(), SCOPE_LABEL, "team-a");

        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_scope_label() {
        let enforced = enforce_matchers(vec![], "tenant", "acme");
        assert_eq!(enforced, vec![matcher("tenant", MatchOp::Equal, "acme")]);
    }

    // ========================================================================
    // Tree walking
    // ========================================================================

    #[test]
    fn test_walk_rewrites_bare_selector() {
        let mut expr = selector("up", vec![]);
        enforce_expr(&mut expr, &scope("team-a")).unwrap();

        assert_eq!(
            expr,
            selector("up", vec![matcher("namespace", MatchOp::Equal, "team-a")])
        );
    }

    #[test]
    fn test_walk_rewrites_range_selector() {
        let mut expr = Expr::Matrix {
            selector: VectorSelector::new("up"),
            range: Duration::from_secs(300),
        };
        enforce_expr(&mut expr, &scope("team-a")).unwrap();

        match expr {
            Expr::Matrix { selector, .. } => {
                assert_eq!(
                    selector.matchers,
                    vec![matcher("namespace", MatchOp::Equal, "team-a")]
                );
            }
            other => panic!("expected range selector, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_reaches_both_sides_of_binary() {
        let mut expr = binary(BinOp::Add, selector("a", vec![]), selector("b", vec![]));
        enforce_expr(&mut expr, &scope("x")).unwrap();

        assert_eq!(
            expr,
            binary(
                BinOp::Add,
                selector("a", vec![matcher("namespace", MatchOp::Equal, "x")]),
                selector("b", vec![matcher("namespace", MatchOp::Equal, "x")]),
            )
        );
    }

    #[test]
    fn test_walk_reaches_every_call_argument() {
        let mut expr = Expr::Call {
            func: "clamp_max".to_string(),
            args: vec![selector("a", vec![]), Expr::Number(100.0)],
        };
        enforce_expr(&mut expr, &scope("x")).unwrap();

        match expr {
            Expr::Call { args, .. } => {
                assert_eq!(
                    args[0],
                    selector("a", vec![matcher("namespace", MatchOp::Equal, "x")])
                );
                // The literal argument is untouched
                assert_eq!(args[1], Expr::Number(100.0));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_descends_through_containers() {
        // -(sum((a)))
        let mut expr = Expr::Unary {
            op: promscope::ast::UnaryOp::Neg,
            expr: Box::new(Expr::Aggregate {
                op: AggregateOp::Sum,
                param: None,
                expr: Box::new(Expr::Paren(Box::new(selector("a", vec![])))),
                grouping: Grouping::None,
            }),
        };
        enforce_expr(&mut expr, &scope("x")).unwrap();

        let rendered = promscope::to_query_string(&expr);
        assert_eq!(rendered, "-sum((a{namespace=\"x\"}))");
    }

    #[test]
    fn test_walk_preserves_aggregation_metadata() {
        let mut expr = Expr::Aggregate {
            op: AggregateOp::Topk,
            param: Some(Box::new(Expr::Number(3.0))),
            expr: Box::new(selector("up", vec![])),
            grouping: Grouping::By(vec!["job".to_string()]),
        };
        enforce_expr(&mut expr, &scope("x")).unwrap();

        match expr {
            Expr::Aggregate {
                op,
                param,
                grouping,
                ..
            } => {
                assert_eq!(op, AggregateOp::Topk);
                assert_eq!(param, Some(Box::new(Expr::Number(3.0))));
                assert_eq!(grouping, Grouping::By(vec!["job".to_string()]));
            }
            other => panic!("expected aggregation, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_ignores_literals() {
        let mut number = Expr::Number(42.0);
        enforce_expr(&mut number, &scope("x")).unwrap();
        assert_eq!(number, Expr::Number(42.0));

        let mut string = Expr::String("version".to_string());
        enforce_expr(&mut string, &scope("x")).unwrap();
        assert_eq!(string, Expr::String("version".to_string()));
    }

    #[test]
    fn test_walk_refuses_subqueries() {
        let mut expr = Expr::Subquery {
            expr: Box::new(selector("up", vec![])),
            range: Duration::from_secs(1_800),
            step: None,
            offset: None,
        };

        let err = enforce_expr(&mut expr, &scope("x")).unwrap_err();
        assert_eq!(err, ScopeError::UnhandledNode("subquery"));
        assert_eq!(err.to_string(), "unhandled node type: subquery");
    }

    #[test]
    fn test_walk_aborts_on_first_error() {
        // The unhandled node is on the left; the right side must stay
        // untouched because the walk aborts immediately
        let mut expr = binary(
            BinOp::Add,
            Expr::Subquery {
                expr: Box::new(selector("a", vec![])),
                range: Duration::from_secs(60),
                step: None,
                offset: None,
            },
            selector("b", vec![]),
        );

        assert!(enforce_expr(&mut expr, &scope("x")).is_err());
        match expr {
            Expr::Binary { rhs, .. } => {
                assert_eq!(*rhs, selector("b", vec![]));
            }
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_is_idempotent_structurally() {
        let mut expr = binary(
            BinOp::Div,
            selector("a", vec![matcher("namespace", MatchOp::Equal, "old")]),
            selector("b", vec![matcher("job", MatchOp::Equal, "api")]),
        );

        enforce_expr(&mut expr, &scope("x")).unwrap();
        let after_once = expr.clone();
        enforce_expr(&mut expr, &scope("x")).unwrap();

        assert_eq!(expr, after_once);
    }

    #[test]
    fn test_enforce_query_wrapper() {
        let mut query = Query {
            expr: selector("up", vec![]),
        };
        enforce_query(&mut query, &scope("team-a")).unwrap();

        assert_eq!(
            query.expr,
            selector("up", vec![matcher("namespace", MatchOp::Equal, "team-a")])
        );
    }

    #[test]
    fn test_walk_with_custom_label() {
        let mut expr = selector("up", vec![]);
        enforce_expr(&mut expr, &Scope::with_label("tenant", "acme")).unwrap();

        assert_eq!(
            expr,
            selector("up", vec![matcher("tenant", MatchOp::Equal, "acme")])
        );
    }
}
