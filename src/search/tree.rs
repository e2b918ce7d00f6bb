// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query operator tree and its evaluation.
//!
//! Every node evaluates to a map from document id to raw score:
//!
//! | Node       | Result                                                        |
//! |------------|---------------------------------------------------------------|
//! | `Empty`    | nothing                                                       |
//! | `Word`     | every posting of every word in its range, rank summed per doc |
//! | `And`      | docs in every child, scores averaged                          |
//! | `Or`       | docs in any child, scores summed                              |
//! | `Not`      | every doc absent from the child, fixed score                  |
//! | `Near`     | docs with an occurrence pair within the distance              |
//! | `NotNear`  | docs with one or both terms but no such pair                  |
//!
//! Trees are request-local: the index is only read.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use crate::build::DocId;
use crate::error::{Error, Result};
use crate::index::IndexFile;
use crate::scoring::{FrequencyLimit, NOT_SCORE};

pub type Scores = HashMap<DocId, u64>;

/// One query word resolved against the word segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordNode {
    /// The word (or wildcard prefix) as written, after folding and stemming
    pub word: String,
    /// Matching entries in the word segment; empty if nothing matched
    pub range: Range<usize>,
    /// Required meta-name ID, if the word was qualified with `name =`
    pub meta: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    Empty,
    Word(WordNode),
    And(Vec<QueryNode>),
    Or(Vec<QueryNode>),
    Not(Box<QueryNode>),
    Near(Box<QueryNode>, Box<QueryNode>),
    NotNear(Box<QueryNode>, Box<QueryNode>),
}

/// Read-only inputs to evaluation plus the running "ignored" report.
pub struct EvalContext<'i> {
    pub index: &'i IndexFile,
    pub limit: FrequencyLimit,
    pub near_distance: u32,
    pub ignored: BTreeSet<String>,
}

impl<'i> EvalContext<'i> {
    pub fn new(index: &'i IndexFile, limit: FrequencyLimit, near_distance: u32) -> Self {
        Self {
            index,
            limit,
            near_distance,
            ignored: BTreeSet::new(),
        }
    }
}

/// Per-document score and sorted absolute positions of one word node.
#[derive(Debug, Default)]
struct Occurrences {
    score: u64,
    positions: Vec<u32>,
}

impl QueryNode {
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryNode::Empty)
    }

    pub fn near(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Near(Box::new(left), Box::new(right))
    }

    pub fn not_near(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::NotNear(Box::new(left), Box::new(right))
    }

    // ========================================================================
    // NEAR DISTRIBUTION
    // ========================================================================

    /// Push every `near`/`not near` down until both operands are words.
    ///
    /// `near(w, or(a, b))` becomes `or(near(w, a), near(w, b))`, likewise for
    /// `and` and for the left operand. A chain `near(near(a, b), c)` becomes
    /// `and(near(a, b), near(b, c))`: each adjacent pair must be near. A `not`
    /// operand has no positions and is rejected.
    pub fn distribute(self) -> Result<Self> {
        match self {
            QueryNode::And(children) => Ok(QueryNode::And(distribute_all(children)?)),
            QueryNode::Or(children) => Ok(QueryNode::Or(distribute_all(children)?)),
            QueryNode::Not(child) => Ok(QueryNode::Not(Box::new(child.distribute()?))),
            QueryNode::Near(l, r) => link(*l, *r, false),
            QueryNode::NotNear(l, r) => link(*l, *r, true),
            leaf => Ok(leaf),
        }
    }

    // ========================================================================
    // EVALUATION
    // ========================================================================

    pub fn eval(&self, ctx: &mut EvalContext<'_>) -> Result<Scores> {
        match self {
            QueryNode::Empty => Ok(Scores::new()),
            QueryNode::Word(word) => Ok(word_occurrences(word, ctx)?
                .into_iter()
                .map(|(doc, occ)| (doc, occ.score))
                .collect()),
            QueryNode::And(children) => eval_and(children, ctx),
            QueryNode::Or(children) => {
                let mut out = Scores::new();
                for child in children {
                    for (doc, score) in child.eval(ctx)? {
                        *out.entry(doc).or_default() += score;
                    }
                }
                Ok(out)
            }
            QueryNode::Not(child) => {
                let matched = child.eval(ctx)?;
                let total = ctx.index.document_count() as DocId;
                Ok((0..total)
                    .filter(|doc| !matched.contains_key(doc))
                    .map(|doc| (doc, NOT_SCORE))
                    .collect())
            }
            QueryNode::Near(l, r) => eval_proximity(l, r, false, ctx),
            QueryNode::NotNear(l, r) => eval_proximity(l, r, true, ctx),
        }
    }
}

fn distribute_all(children: Vec<QueryNode>) -> Result<Vec<QueryNode>> {
    children.into_iter().map(QueryNode::distribute).collect()
}

/// Distribute one proximity operator, splitting a left-nested chain into the
/// pairs it links before anything else is rewritten.
fn link(left: QueryNode, right: QueryNode, negated: bool) -> Result<QueryNode> {
    if let QueryNode::Near(_, inner) | QueryNode::NotNear(_, inner) = &left {
        let pair = link((**inner).clone(), right, negated)?;
        let mut parts = flatten_and(left.distribute()?);
        parts.extend(flatten_and(pair));
        return Ok(QueryNode::And(parts));
    }
    proximity(left.distribute()?, right.distribute()?, negated)
}

fn flatten_and(node: QueryNode) -> Vec<QueryNode> {
    match node {
        QueryNode::And(children) => children,
        other => vec![other],
    }
}

/// Build a proximity node over already-distributed operands.
fn proximity(left: QueryNode, right: QueryNode, negated: bool) -> Result<QueryNode> {
    let make = |l: QueryNode, r: QueryNode| {
        if negated {
            QueryNode::not_near(l, r)
        } else {
            QueryNode::near(l, r)
        }
    };

    match (left, right) {
        (QueryNode::Not(_), _) | (_, QueryNode::Not(_)) => {
            Err(Error::malformed("'near' cannot apply to a 'not' expression"))
        }
        (QueryNode::Empty, other) | (other, QueryNode::Empty) => Ok(other),
        (QueryNode::Or(children), right) => Ok(QueryNode::Or(
            children
                .into_iter()
                .map(|c| proximity(c, right.clone(), negated))
                .collect::<Result<_>>()?,
        )),
        (QueryNode::And(children), right) => Ok(QueryNode::And(
            children
                .into_iter()
                .map(|c| proximity(c, right.clone(), negated))
                .collect::<Result<_>>()?,
        )),
        (left, QueryNode::Or(children)) => Ok(QueryNode::Or(
            children
                .into_iter()
                .map(|c| proximity(left.clone(), c, negated))
                .collect::<Result<_>>()?,
        )),
        (left, QueryNode::And(children)) => Ok(QueryNode::And(
            children
                .into_iter()
                .map(|c| proximity(left.clone(), c, negated))
                .collect::<Result<_>>()?,
        )),
        (chain @ (QueryNode::Near(..) | QueryNode::NotNear(..)), right) => {
            let last = rightmost_word(&chain)?;
            Ok(QueryNode::And(vec![chain, proximity(last, right, negated)?]))
        }
        (left, chain @ (QueryNode::Near(..) | QueryNode::NotNear(..))) => {
            let first = leftmost_word(&chain)?;
            Ok(QueryNode::And(vec![proximity(left, first, negated)?, chain]))
        }
        (l @ QueryNode::Word(_), r @ QueryNode::Word(_)) => Ok(make(l, r)),
    }
}

fn rightmost_word(node: &QueryNode) -> Result<QueryNode> {
    match node {
        QueryNode::Word(_) => Ok(node.clone()),
        QueryNode::Near(_, r) | QueryNode::NotNear(_, r) => rightmost_word(r),
        QueryNode::And(children) => match children.last() {
            Some(last) => rightmost_word(last),
            None => Err(Error::malformed("empty 'near' chain")),
        },
        _ => Err(Error::malformed("'near' operand is not a word")),
    }
}

fn leftmost_word(node: &QueryNode) -> Result<QueryNode> {
    match node {
        QueryNode::Word(_) => Ok(node.clone()),
        QueryNode::Near(l, _) | QueryNode::NotNear(l, _) => leftmost_word(l),
        QueryNode::And(children) => match children.first() {
            Some(first) => leftmost_word(first),
            None => Err(Error::malformed("empty 'near' chain")),
        },
        _ => Err(Error::malformed("'near' operand is not a word")),
    }
}

/// Postings of every acceptable word in the node's range, folded per document.
fn word_occurrences(node: &WordNode, ctx: &mut EvalContext<'_>) -> Result<HashMap<DocId, Occurrences>> {
    let mut out: HashMap<DocId, Occurrences> = HashMap::new();
    let total_docs = ctx.index.document_count() as u64;

    for i in node.range.clone() {
        let entry = ctx.index.word_entry(i)?;
        let postings = entry.decode_all()?;
        if ctx.limit.exceeded(postings.len() as u64, total_docs) {
            ctx.ignored.insert(entry.word().to_string());
            continue;
        }
        for posting in postings.into_iter().filter(|p| p.matches_meta(node.meta)) {
            let occ = out.entry(posting.doc_id).or_default();
            occ.score += u64::from(posting.rank);
            occ.positions.extend(posting.positions);
        }
    }

    if node.range.len() > 1 {
        for occ in out.values_mut() {
            occ.positions.sort_unstable();
        }
    }
    Ok(out)
}

fn eval_and(children: &[QueryNode], ctx: &mut EvalContext<'_>) -> Result<Scores> {
    let Some((first, rest)) = children.split_first() else {
        return Ok(Scores::new());
    };
    let mut acc = first.eval(ctx)?;
    for child in rest {
        let next = child.eval(ctx)?;
        acc.retain(|doc, score| match next.get(doc) {
            Some(s) => {
                *score += s;
                true
            }
            None => false,
        });
    }
    let n = children.len() as u64;
    for score in acc.values_mut() {
        *score /= n;
    }
    Ok(acc)
}

fn eval_proximity(
    left: &QueryNode,
    right: &QueryNode,
    negated: bool,
    ctx: &mut EvalContext<'_>,
) -> Result<Scores> {
    let (QueryNode::Word(l), QueryNode::Word(r)) = (left, right) else {
        return Err(Error::malformed("'near' operands must be words"));
    };
    let distance = ctx.near_distance;
    let lhs = word_occurrences(l, ctx)?;
    let mut rhs = word_occurrences(r, ctx)?;

    let mut out = Scores::new();
    for (doc, a) in lhs {
        match rhs.remove(&doc) {
            Some(b) => {
                if within(&a.positions, &b.positions, distance) != negated {
                    out.insert(doc, (a.score + b.score) / 2);
                }
            }
            None if negated => {
                out.insert(doc, a.score);
            }
            None => {}
        }
    }
    if negated {
        out.extend(rhs.into_iter().map(|(doc, b)| (doc, b.score)));
    }
    Ok(out)
}

/// True if some `a[i]` and `b[j]` are at most `distance` apart.
///
/// Both slices must be sorted.
fn within(a: &[u32], b: &[u32], distance: u32) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].abs_diff(b[j]) <= distance {
            return true;
        }
        if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}
