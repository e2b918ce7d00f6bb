// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for the query language.
//!
//! # Grammar
//!
//! ```text
//! query   := meta (relop meta)*
//! meta    := WORD '=' primary | primary
//! primary := '(' query ')' | 'not' meta | WORD | WORD '*'
//! relop   := 'and' | 'or' | 'near' | 'not' 'near' | ε      (ε means 'and')
//! ```
//!
//! Operators in a chain are left-associative with equal precedence, so
//! `a or b and c` is `(a or b) and c`. Consecutive `and`s collect into one
//! n-ary node so every operand weighs the same in the averaged score;
//! consecutive `or`s collect the same way.
//!
//! Words are resolved against the index while parsing. Stop words, and words
//! the indexer would have rejected (too short, too long, no letters), become
//! `Empty` and are reported as ignored; other words get their word-segment
//! range (possibly empty). `Empty` operands drop out of `and`/`or`/`near`;
//! `not` keeps them, so `not the` is every document.
//!
//! Groups and `not` deepen the tree, and so do chained operators. Both kinds of
//! depth are capped at [`MAX_DEPTH`] so evaluation cannot run out of stack.

use std::collections::BTreeSet;

use super::lexer::Token;
use super::tree::{QueryNode, WordNode};
use crate::build::words;
use crate::error::{Error, Result};
use crate::index::IndexFile;
use crate::stem::Stemmer;

/// Deepest nesting of groups and `not`, and most chain links that nest the
/// tree, accepted in one query.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelOp {
    And,
    Or,
    Near,
    NotNear,
}

/// What `name =` resolved to for the words under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaFilter {
    Any,
    Id(u32),
    /// The name was never indexed: nothing under it can match
    Unknown,
}

pub struct QueryParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    index: &'a IndexFile,
    stemmer: &'a dyn Stemmer,
    meta: MetaFilter,
    word_sizes: (usize, usize),
    /// Open parentheses
    groups: usize,
    /// Current nesting of groups and `not`
    nesting: usize,
    /// Chain links that wrapped the tree in a new node
    links: usize,
    ignored: BTreeSet<String>,
}

impl<'a> QueryParser<'a> {
    pub fn new(tokens: Vec<Token>, index: &'a IndexFile, stemmer: &'a dyn Stemmer) -> Self {
        Self {
            tokens,
            pos: 0,
            index,
            stemmer,
            meta: MetaFilter::Any,
            word_sizes: (2, 25),
            groups: 0,
            nesting: 0,
            links: 0,
            ignored: BTreeSet::new(),
        }
    }

    /// Length limits the index was built with; shorter or longer query words
    /// are ignored.
    pub fn with_word_sizes(mut self, min: usize, max: usize) -> Self {
        self.word_sizes = (min, max);
        self
    }

    /// Parse the whole token stream.
    ///
    /// Returns the tree and the words dropped as stop words.
    pub fn parse(mut self) -> Result<(QueryNode, BTreeSet<String>)> {
        if self.peek() == &Token::End {
            return Err(Error::malformed("empty query"));
        }
        let tree = self.parse_query()?;
        match self.peek() {
            Token::End => Ok((tree, self.ignored)),
            Token::RParen => Err(Error::malformed("unmatched ')'")),
            other => Err(Error::malformed(format!("unexpected {}", other.describe()))),
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::End)
    }

    fn peek_second(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&Token::End)
    }

    fn enter(&mut self) -> Result<()> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(Error::malformed("query nested too deeply"));
        }
        Ok(())
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// query := meta (relop meta)*
    fn parse_query(&mut self) -> Result<QueryNode> {
        let mut acc = self.parse_meta()?;
        // Set while `acc` is an And/Or node built by this chain and open for more operands
        let mut open: Option<RelOp> = None;

        loop {
            let op = match self.peek() {
                Token::End | Token::RParen => break,
                Token::And => {
                    self.advance();
                    RelOp::And
                }
                Token::Or => {
                    self.advance();
                    RelOp::Or
                }
                Token::Near => {
                    self.advance();
                    RelOp::Near
                }
                Token::Not if self.peek_second() == &Token::Near => {
                    self.advance();
                    self.advance();
                    RelOp::NotNear
                }
                _ => RelOp::And,
            };

            let rhs = self.parse_meta()?;
            if rhs.is_empty() {
                continue;
            }
            if acc.is_empty() {
                acc = rhs;
                open = None;
                continue;
            }

            acc = match (op, acc) {
                (RelOp::And, QueryNode::And(mut children)) if open == Some(RelOp::And) => {
                    children.push(rhs);
                    QueryNode::And(children)
                }
                (RelOp::Or, QueryNode::Or(mut children)) if open == Some(RelOp::Or) => {
                    children.push(rhs);
                    QueryNode::Or(children)
                }
                (op, lhs) => {
                    self.links += 1;
                    if self.links > MAX_DEPTH {
                        return Err(Error::malformed("query has too many operators"));
                    }
                    match op {
                        RelOp::And => QueryNode::And(vec![lhs, rhs]),
                        RelOp::Or => QueryNode::Or(vec![lhs, rhs]),
                        RelOp::Near => QueryNode::near(lhs, rhs),
                        RelOp::NotNear => QueryNode::not_near(lhs, rhs),
                    }
                }
            };
            open = matches!(op, RelOp::And | RelOp::Or).then_some(op);
        }

        Ok(acc)
    }

    /// meta := WORD '=' primary | primary
    fn parse_meta(&mut self) -> Result<QueryNode> {
        let Token::Word(name) = self.peek() else {
            return self.parse_primary();
        };
        if self.peek_second() != &Token::Equals {
            return self.parse_primary();
        }

        let filter = match self.index.meta_id(name)? {
            Some(id) => MetaFilter::Id(id),
            None => MetaFilter::Unknown,
        };
        self.advance();
        self.advance();

        let outer = std::mem::replace(&mut self.meta, filter);
        let node = self.parse_primary();
        self.meta = outer;
        node
    }

    /// primary := '(' query ')' | 'not' meta | WORD | WORD '*'
    fn parse_primary(&mut self) -> Result<QueryNode> {
        match self.advance() {
            Token::LParen => {
                self.enter()?;
                self.groups += 1;
                let inner = self.parse_query()?;
                self.groups -= 1;
                self.nesting -= 1;
                if self.advance() != Token::RParen {
                    return Err(Error::malformed("unmatched '('"));
                }
                Ok(inner)
            }
            Token::Not => {
                self.enter()?;
                let child = self.parse_meta()?;
                self.nesting -= 1;
                Ok(QueryNode::Not(Box::new(child)))
            }
            Token::Word(word) => self.word(word),
            Token::Wildcard(prefix) => Ok(QueryNode::Word(WordNode {
                range: self.resolve(|index| index.word_prefix_range(&prefix))?,
                word: prefix,
                meta: self.meta_id(),
            })),
            Token::End if self.groups > 0 => Err(Error::malformed("unmatched '('")),
            Token::End => Err(Error::malformed("unexpected end of query")),
            other => Err(Error::malformed(format!("unexpected {}", other.describe()))),
        }
    }

    fn word(&mut self, word: String) -> Result<QueryNode> {
        let (min, max) = self.word_sizes;
        if words::check(&word, min, max).is_err() || self.index.is_stop_word(&word)? {
            self.ignored.insert(word);
            return Ok(QueryNode::Empty);
        }
        let stemmed = self.stemmer.stem(&word);
        if stemmed != word && self.index.is_stop_word(&stemmed)? {
            self.ignored.insert(word);
            return Ok(QueryNode::Empty);
        }
        let word = stemmed;
        let range = self.resolve(|index| {
            Ok(match index.find_word(&word)? {
                Some(i) => i..i + 1,
                None => 0..0,
            })
        })?;
        Ok(QueryNode::Word(WordNode {
            word,
            range,
            meta: self.meta_id(),
        }))
    }

    fn resolve<F>(&self, lookup: F) -> Result<std::ops::Range<usize>>
    where
        F: FnOnce(&IndexFile) -> Result<std::ops::Range<usize>>,
    {
        if self.meta == MetaFilter::Unknown {
            return Ok(0..0);
        }
        lookup(self.index)
    }

    fn meta_id(&self) -> Option<u32> {
        match self.meta {
            MetaFilter::Id(id) => Some(id),
            MetaFilter::Any | MetaFilter::Unknown => None,
        }
    }
}
