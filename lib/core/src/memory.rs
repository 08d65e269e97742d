//! In-memory embedding model backed by a flat vocabulary table.
//!
//! Vectors are stored unit-normalized, so similarity is a plain dot product.

use crate::{Expression, Match, Model, ModelError, ModelInfo, Vector};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

type ModelResult<T> = std::result::Result<T, ModelError>;

/// Vocabularies below this size are scanned on the calling thread
const PARALLEL_SCAN_THRESHOLD: usize = 4096;

pub struct MemoryModel {
    dim: usize,
    terms: Vec<String>,
    vectors: Vec<Vector>,
    index: HashMap<String, usize, ahash::RandomState>,
}

impl MemoryModel {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            terms: Vec::new(),
            vectors: Vec::new(),
            index: HashMap::default(),
        }
    }

    /// Load a model in the word2vec text format:
    /// a `<count> <dim>` header followed by one `<term> <f1> .. <fdim>` line per term.
    pub fn load<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> ModelResult<Self> {
        let mut lines = reader.lines();

        let header = lines.next().ok_or_else(|| ModelError::Load {
            line: 1,
            message: "missing header".to_string(),
        })??;
        let (count, dim) = parse_header(&header)?;

        let mut model = MemoryModel::new(dim);
        model.terms.reserve(count);
        model.vectors.reserve(count);

        for (offset, line) in lines.enumerate() {
            let line_no = offset + 2;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let term = fields.next().unwrap_or_default().to_string();
            let data = fields
                .map(|f| f.parse::<f32>())
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| ModelError::Load {
                    line: line_no,
                    message: format!("invalid component for '{}': {}", term, e),
                })?;

            model.insert(term, Vector::new(data)).map_err(|e| ModelError::Load {
                line: line_no,
                message: e.to_string(),
            })?;
        }

        if model.len() != count {
            return Err(ModelError::Load {
                line: 1,
                message: format!("header declares {} terms, found {}", count, model.len()),
            });
        }

        tracing::debug!(terms = count, dim, "loaded embedding model");
        Ok(model)
    }

    /// Insert or replace the vector for `term`. The vector is normalized on the way in.
    pub fn insert(&mut self, term: impl Into<String>, vector: Vector) -> ModelResult<()> {
        if vector.dim() != self.dim {
            return Err(ModelError::InvalidDimension {
                expected: self.dim,
                actual: vector.dim(),
            });
        }

        let term = term.into();
        let vector = vector.normalized();
        match self.index.get(&term) {
            Some(&slot) => self.vectors[slot] = vector,
            None => {
                self.index.insert(term.clone(), self.terms.len());
                self.terms.push(term);
                self.vectors.push(vector);
            }
        }
        Ok(())
    }

    pub fn get(&self, term: &str) -> Option<&Vector> {
        self.index.get(term).map(|&slot| &self.vectors[slot])
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn scores(&self, v: &Vector) -> Vec<f32> {
        if self.vectors.len() >= PARALLEL_SCAN_THRESHOLD {
            self.vectors.par_iter().map(|w| w.dot(v)).collect()
        } else {
            self.vectors.iter().map(|w| w.dot(v)).collect()
        }
    }
}

fn parse_header(header: &str) -> ModelResult<(usize, usize)> {
    let invalid = || ModelError::Load {
        line: 1,
        message: format!("expected '<count> <dim>', got '{}'", header.trim()),
    };

    let mut fields = header.split_whitespace();
    let count = fields.next().and_then(|f| f.parse().ok()).ok_or_else(invalid)?;
    let dim = fields.next().and_then(|f| f.parse().ok()).ok_or_else(invalid)?;
    if fields.next().is_some() || dim == 0 {
        return Err(invalid());
    }
    Ok((count, dim))
}

/// Ranking key: higher score first, then lexicographically smaller term
#[derive(PartialEq, Eq)]
struct Ranked<'a> {
    score: OrderedFloat<f32>,
    term: &'a str,
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.term.cmp(self.term))
    }
}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Model for MemoryModel {
    fn evaluate(&self, expr: &Expression) -> ModelResult<Vector> {
        let mut sum = Vector::zeros(self.dim);
        for (term, weight) in expr.iter() {
            let v = self
                .get(term)
                .ok_or_else(|| ModelError::UnknownTerm(term.to_string()))?;
            sum.add_scaled(weight, v);
        }
        sum.normalize();
        Ok(sum)
    }

    fn similarity(&self, a: &Vector, b: &Vector) -> f32 {
        a.cosine_similarity(b)
    }

    fn nearest_neighbors(&self, v: &Vector, n: i64) -> ModelResult<Vec<Match>> {
        if v.dim() != self.dim {
            return Err(ModelError::InvalidDimension {
                expected: self.dim,
                actual: v.dim(),
            });
        }
        if n <= 0 {
            return Ok(Vec::new());
        }
        let k = usize::try_from(n).unwrap_or(usize::MAX).min(self.len());

        let scores = self.scores(v);
        let mut heap: BinaryHeap<Reverse<Ranked<'_>>> = BinaryHeap::with_capacity(k + 1);
        for (term, &score) in self.terms.iter().zip(&scores) {
            heap.push(Reverse(Ranked {
                score: OrderedFloat(score),
                term: term.as_str(),
            }));
            if heap.len() > k {
                heap.pop();
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(ranked)| Match::new(ranked.term, ranked.score.into_inner()))
            .collect())
    }

    fn info(&self) -> Option<ModelInfo> {
        Some(ModelInfo {
            vocabulary: self.len(),
            dim: self.dim,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const TEXT_MODEL: &str = "4 2\n\
        king 0.9 0.8\n\
        queen 0.85 0.9\n\
        man 0.9 0.1\n\
        woman 0.8 0.3\n";

    fn model() -> MemoryModel {
        MemoryModel::from_reader(Cursor::new(TEXT_MODEL)).unwrap()
    }

    #[test]
    fn test_load_text_model() {
        let model = model();
        assert_eq!(model.len(), 4);
        assert_eq!(model.dim(), 2);
        assert!((model.get("king").unwrap().norm() - 1.0).abs() < 1e-6);
        assert_eq!(model.info(), Some(ModelInfo { vocabulary: 4, dim: 2 }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TEXT_MODEL.as_bytes()).unwrap();
        let model = MemoryModel::load(file.path()).unwrap();
        assert!(model.get("woman").is_some());
    }

    #[test]
    fn test_load_rejects_bad_input() {
        let err = MemoryModel::from_reader(Cursor::new("two 2\n")).err().unwrap();
        assert!(matches!(err, ModelError::Load { line: 1, .. }));

        let err = MemoryModel::from_reader(Cursor::new("1 2\nking 0.1 zz\n")).err().unwrap();
        assert!(matches!(err, ModelError::Load { line: 2, .. }));

        let err = MemoryModel::from_reader(Cursor::new("1 2\nking 0.1 0.2 0.3\n")).err().unwrap();
        assert!(err.to_string().contains("expected 2, got 3"));

        let err = MemoryModel::from_reader(Cursor::new("3 2\nking 0.1 0.2\n")).err().unwrap();
        assert!(err.to_string().contains("declares 3 terms, found 1"));
    }

    #[test]
    fn test_evaluate_unknown_term() {
        let expr = Expression::new().with(1.0, "king").with(1.0, "castle");
        match model().evaluate(&expr) {
            Err(ModelError::UnknownTerm(term)) => assert_eq!(term, "castle"),
            other => panic!("expected unknown term, got {:?}", other),
        }
    }

    #[test]
    fn test_analogy() {
        let model = model();
        let expr = Expression::new()
            .with(1.0, "king")
            .with(-1.0, "man")
            .with(1.0, "woman");
        let v = model.evaluate(&expr).unwrap();
        let matches = model.nearest_neighbors(&v, 2).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].term, "queen");
        assert!(matches[0].score >= matches[1].score);
    }

    #[test]
    fn test_nearest_neighbors_bounds() {
        let model = model();
        let v = model.get("man").unwrap().clone();
        assert!(model.nearest_neighbors(&v, 0).unwrap().is_empty());
        assert!(model.nearest_neighbors(&v, -5).unwrap().is_empty());
        assert_eq!(model.nearest_neighbors(&v, 100).unwrap().len(), 4);
        assert_eq!(model.nearest_neighbors(&v, 1).unwrap()[0].term, "man");
    }

    #[test]
    fn test_nearest_neighbors_ties_break_by_term() {
        let mut model = MemoryModel::new(2);
        model.insert("b", Vector::new(vec![1.0, 0.0])).unwrap();
        model.insert("a", Vector::new(vec![2.0, 0.0])).unwrap();
        model.insert("c", Vector::new(vec![0.0, 1.0])).unwrap();

        let matches = model.nearest_neighbors(&Vector::new(vec![1.0, 0.0]), 3).unwrap();
        let terms: Vec<&str> = matches.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut model = MemoryModel::new(2);
        model.insert("x", Vector::new(vec![1.0, 0.0])).unwrap();
        model.insert("x", Vector::new(vec![0.0, 3.0])).unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!(model.get("x").unwrap().as_slice(), &[0.0, 1.0]);
        assert!(model.insert("y", Vector::new(vec![1.0])).is_err());
    }
}
