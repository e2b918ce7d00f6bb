// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query tokenizer.
//!
//! Input is folded first (lowercase, diacritics stripped), so keywords match in
//! any case. Runs of word characters become words; a `*` glued to the end of a
//! word makes it a prefix wildcard. Anything else that is not an operator
//! character separates words.

use crate::error::{Error, Result};
use crate::utils::{is_word_char, trim_word};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word, trimmed of leading/trailing punctuation
    Word(String),
    /// Prefix of a `word*` wildcard
    Wildcard(String),
    LParen,
    RParen,
    Equals,
    And,
    Or,
    Not,
    /// Only produced when positions are indexed; otherwise "near" is a word
    Near,
    End,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{}'", w),
            Token::Wildcard(p) => format!("'{}*'", p),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Equals => "'='".into(),
            Token::And => "'and'".into(),
            Token::Or => "'or'".into(),
            Token::Not => "'not'".into(),
            Token::Near => "'near'".into(),
            Token::End => "end of query".into(),
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// `query` must already be folded.
    pub fn new(query: &str) -> Self {
        Self {
            input: query.chars().collect(),
            position: 0,
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            let Some(&ch) = self.input.get(self.position) else {
                return Ok(Token::End);
            };

            match ch {
                '(' => {
                    self.position += 1;
                    return Ok(Token::LParen);
                }
                ')' => {
                    self.position += 1;
                    return Ok(Token::RParen);
                }
                '=' => {
                    self.position += 1;
                    return Ok(Token::Equals);
                }
                '*' => {
                    return Err(Error::malformed(format!(
                        "wildcard without a prefix at position {}",
                        self.position
                    )));
                }
                _ if is_word_char(ch) => {
                    if let Some(token) = self.read_word()? {
                        return Ok(token);
                    }
                }
                _ => self.position += 1,
            }
        }
    }

    /// Read a run of word characters. `None` if it trims away to nothing.
    fn read_word(&mut self) -> Result<Option<Token>> {
        let start = self.position;
        while self.input.get(self.position).is_some_and(|&c| is_word_char(c)) {
            self.position += 1;
        }
        let raw: String = self.input[start..self.position].iter().collect();

        let wildcard = self.input.get(self.position) == Some(&'*');
        if wildcard {
            self.position += 1;
        }

        let word = trim_word(&raw);
        if word.is_empty() {
            if wildcard {
                return Err(Error::malformed(format!("wildcard without a prefix after '{}'", raw)));
            }
            return Ok(None);
        }
        if wildcard {
            return Ok(Some(Token::Wildcard(word.to_string())));
        }

        Ok(Some(match word {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            #[cfg(feature = "word-pos")]
            "near" => Token::Near,
            _ => Token::Word(word.to_string()),
        }))
    }
}

/// Tokenize a whole folded query; the last token is always `End`.
pub fn tokenize(query: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(query);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token == Token::End;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
