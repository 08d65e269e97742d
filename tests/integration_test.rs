// Integration tests for wordvec query evaluation
use parking_lot::Mutex;
use serde_json::json;
use std::io::Cursor;
use wordvec_core::{
    BatchSimilarityQuery, Error, Evaluate, Expression, Match, MemoryModel, Model, ModelError,
    SimilarityQuery, TopNQuery, Vector,
};

/// Records every call and answers from fixed tables
#[derive(Default)]
struct StubModel {
    evaluated: Mutex<Vec<Expression>>,
    neighbor_calls: Mutex<Vec<i64>>,
    similarity: f32,
    matches: Vec<Match>,
}

impl StubModel {
    fn with_similarity(similarity: f32) -> Self {
        Self {
            similarity,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.evaluated.lock().len()
    }
}

impl Model for StubModel {
    fn evaluate(&self, expr: &Expression) -> Result<Vector, ModelError> {
        self.evaluated.lock().push(expr.clone());
        match expr.iter().find(|(term, _)| term.starts_with("unknown")) {
            Some((term, _)) => Err(ModelError::UnknownTerm(term.to_string())),
            None => Ok(Vector::new(vec![expr.len() as f32])),
        }
    }

    fn similarity(&self, _a: &Vector, _b: &Vector) -> f32 {
        self.similarity
    }

    fn nearest_neighbors(&self, _v: &Vector, n: i64) -> Result<Vec<Match>, ModelError> {
        self.neighbor_calls.lock().push(n);
        Ok(self.matches.clone())
    }
}

/// Scores pairs by the product of their first components
struct ProductModel;

impl Model for ProductModel {
    fn evaluate(&self, expr: &Expression) -> Result<Vector, ModelError> {
        match expr.coefficient("fail") {
            Some(_) => Err(ModelError::Other("model unavailable".to_string())),
            None => Ok(Vector::new(vec![expr.iter().map(|(_, w)| w).sum()])),
        }
    }

    fn similarity(&self, a: &Vector, b: &Vector) -> f32 {
        a.as_slice()[0] * b.as_slice()[0]
    }

    fn nearest_neighbors(&self, _v: &Vector, _n: i64) -> Result<Vec<Match>, ModelError> {
        Ok(Vec::new())
    }
}

fn expr(pairs: &[(&str, f32)]) -> Expression {
    pairs.iter().map(|(t, w)| (*t, *w)).collect()
}

#[test]
fn test_accumulate_is_additive() {
    for (f1, f2) in [(1.0f32, 2.0f32), (-0.5, 0.25), (3.5, -3.5)] {
        let mut e = Expression::new();
        e.accumulate(f1, "t");
        e.accumulate(f2, "t");
        assert_eq!(e.coefficient("t"), Some(f1 + f2));

        let mut reversed = Expression::new();
        reversed.accumulate(f2, "t");
        reversed.accumulate(f1, "t");
        assert_eq!(e, reversed);
    }
}

#[test]
fn test_empty_expression_never_reaches_model() {
    let model = StubModel::with_similarity(1.0);
    let result = Expression::new().evaluate(&model);
    assert!(matches!(result, Err(Error::EmptyExpression)));
    assert_eq!(model.calls(), 0);
}

#[test]
fn test_analogy_similarity_scenario() {
    let model = StubModel::with_similarity(0.87);
    let query = SimilarityQuery::new(
        expr(&[("king", 1.0), ("man", -1.0), ("woman", 1.0)]),
        expr(&[("queen", 1.0)]),
    );

    let response = query.evaluate(&model).unwrap();
    assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"value":0.87}"#);

    // A is evaluated before B
    let evaluated = model.evaluated.lock();
    assert_eq!(evaluated.len(), 2);
    assert_eq!(evaluated[0], query.a);
    assert_eq!(evaluated[1], query.b);
}

#[test]
fn test_empty_b_fails_before_model_call() {
    let model = StubModel::with_similarity(0.87);
    let query = SimilarityQuery::new(expr(&[("king", 1.0)]), Expression::new());

    assert!(matches!(query.evaluate(&model), Err(Error::EmptyExpression)));
    assert_eq!(model.calls(), 0);
}

#[test]
fn test_failing_a_skips_b() {
    let model = StubModel::with_similarity(0.5);
    let query = SimilarityQuery::new(expr(&[("unknown-a", 1.0)]), expr(&[("queen", 1.0)]));

    match query.evaluate(&model) {
        Err(Error::Model(ModelError::UnknownTerm(term))) => assert_eq!(term, "unknown-a"),
        other => panic!("expected model error, got {:?}", other),
    }
    assert_eq!(model.calls(), 1);
}

#[test]
fn test_top_n_preserves_model_order() {
    let model = StubModel {
        matches: vec![
            Match::new("queen", 0.9),
            Match::new("princess", 0.85),
            Match::new("monarch", 0.8),
        ],
        ..StubModel::default()
    };
    let query = TopNQuery::new(expr(&[("king", 1.0), ("man", -1.0), ("woman", 1.0)]), 3);

    let response = query.evaluate(&model).unwrap();
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        concat!(
            r#"{"matches":[{"term":"queen","score":0.9},"#,
            r#"{"term":"princess","score":0.85},"#,
            r#"{"term":"monarch","score":0.8}]}"#
        )
    );
    assert_eq!(*model.neighbor_calls.lock(), vec![3]);
}

#[test]
fn test_top_n_passes_n_through_unvalidated() {
    let model = StubModel::default();
    for n in [0, -1, i64::MAX] {
        TopNQuery::new(expr(&[("king", 1.0)]), n)
            .evaluate(&model)
            .unwrap();
    }
    assert_eq!(*model.neighbor_calls.lock(), vec![0, -1, i64::MAX]);
}

#[test]
fn test_batch_success_matches_request_order() {
    let pairs: Vec<(Expression, Expression)> = (1..=5)
        .map(|i| (expr(&[("x", i as f32)]), expr(&[("y", 10.0)])))
        .collect();
    let batch = BatchSimilarityQuery::from_pairs(pairs.clone());
    assert_eq!(batch.len(), 5);

    let response = batch.evaluate(&ProductModel).unwrap();
    assert_eq!(response.values.len(), 5);
    for (i, (a, b)) in pairs.into_iter().enumerate() {
        let single = SimilarityQuery::new(a, b).evaluate(&ProductModel).unwrap();
        assert_eq!(response.values[i], single);
    }
}

#[test]
fn test_batch_is_all_or_nothing() {
    let model = StubModel::with_similarity(0.3);
    let batch = BatchSimilarityQuery::from_pairs(vec![
        (expr(&[("a", 1.0)]), expr(&[("b", 1.0)])),
        (expr(&[("c", 1.0)]), expr(&[("d", 1.0)])),
        (expr(&[("e", 1.0)]), Expression::new()),
        (expr(&[("unknown", 1.0)]), expr(&[("f", 1.0)])),
    ]);

    assert!(matches!(batch.evaluate(&model), Err(Error::EmptyExpression)));
    // The two good pairs ran; nothing after the failing element did.
    assert_eq!(model.calls(), 4);
}

#[test]
fn test_model_failure_in_batch() {
    let batch = BatchSimilarityQuery::from_pairs(vec![
        (expr(&[("x", 1.0)]), expr(&[("y", 1.0)])),
        (expr(&[("fail", 1.0)]), expr(&[("y", 1.0)])),
    ]);
    let err = batch.evaluate(&ProductModel).unwrap_err();
    assert_eq!(err.to_string(), "model unavailable");
}

#[test]
fn test_queries_round_trip_through_json() {
    let sim = SimilarityQuery::new(
        expr(&[("king", 1.0), ("man", -1.0)]),
        expr(&[("queen", 0.5)]),
    );
    let batch = BatchSimilarityQuery::from_pairs(vec![
        (sim.a.clone(), sim.b.clone()),
        (expr(&[("paris", 1.0)]), expr(&[("france", 1.0)])),
    ]);
    let top = TopNQuery::new(expr(&[("rome", 2.0)]), 7);

    let decoded: SimilarityQuery =
        serde_json::from_str(&serde_json::to_string(&sim).unwrap()).unwrap();
    assert_eq!(decoded, sim);

    let decoded: BatchSimilarityQuery =
        serde_json::from_str(&serde_json::to_string(&batch).unwrap()).unwrap();
    assert_eq!(decoded, batch);

    let decoded: TopNQuery = serde_json::from_str(&serde_json::to_string(&top).unwrap()).unwrap();
    assert_eq!(decoded, top);
}

#[test]
fn test_wire_shapes() {
    let query: BatchSimilarityQuery = serde_json::from_value(json!({
        "queries": [{"a": {"king": 1.0}, "b": {"queen": 1.0}}]
    }))
    .unwrap();
    assert_eq!(query.queries[0].a.coefficient("king"), Some(1.0));

    let top: TopNQuery = serde_json::from_value(json!({"expr": {"king": 1.0}, "n": 3})).unwrap();
    assert_eq!(top.n, 3);

    // Missing expressions decode fine and fail only at evaluation.
    let sim: SimilarityQuery = serde_json::from_value(json!({})).unwrap();
    assert!(matches!(sim.evaluate(&ProductModel), Err(Error::EmptyExpression)));
}

#[test]
fn test_memory_model_end_to_end() {
    let text = "5 3\n\
        king 0.8 0.6 0.1\n\
        queen 0.75 0.1 0.65\n\
        man 0.7 0.7 0.0\n\
        woman 0.65 0.15 0.7\n\
        apple 0.0 0.1 -0.9\n";
    let model = MemoryModel::from_reader(Cursor::new(text)).unwrap();

    let analogy = expr(&[("king", 1.0), ("man", -1.0), ("woman", 1.0)]);
    let top = TopNQuery::new(analogy.clone(), 2).evaluate(&model).unwrap();
    assert_eq!(top.matches.len(), 2);
    assert!(top.matches[0].score >= top.matches[1].score);
    assert!(top.matches.iter().any(|m| m.term == "queen"));

    let close = SimilarityQuery::new(analogy.clone(), expr(&[("queen", 1.0)]))
        .evaluate(&model)
        .unwrap();
    let far = SimilarityQuery::new(analogy, expr(&[("apple", 1.0)]))
        .evaluate(&model)
        .unwrap();
    assert!(close.value > far.value);

    let unknown = TopNQuery::new(expr(&[("dragon", 1.0)]), 1).evaluate(&model);
    assert!(matches!(unknown, Err(Error::Model(ModelError::UnknownTerm(_)))));
}
