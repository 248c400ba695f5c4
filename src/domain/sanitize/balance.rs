//! Bracket balance check by counting. Not a parser: brackets inside strings
//! and comments are counted too.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketPair {
    Braces,
    Brackets,
    Parentheses,
}

impl BracketPair {
    pub const ALL: [BracketPair; 3] =
        [BracketPair::Braces, BracketPair::Brackets, BracketPair::Parentheses];

    fn chars(&self) -> (char, char) {
        match self {
            BracketPair::Braces => ('{', '}'),
            BracketPair::Brackets => ('[', ']'),
            BracketPair::Parentheses => ('(', ')'),
        }
    }
}

impl fmt::Display for BracketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BracketPair::Braces => "braces",
            BracketPair::Brackets => "brackets",
            BracketPair::Parentheses => "parentheses",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Imbalance {
    pub pair: BracketPair,
    pub open: usize,
    pub close: usize,
}

impl fmt::Display for Imbalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unbalanced {} ({} open, {} close)", self.pair, self.open, self.close)
    }
}

/// Return one entry per bracket pair whose open and close counts differ.
pub fn check_balance(content: &str) -> Vec<Imbalance> {
    BracketPair::ALL
        .into_iter()
        .filter_map(|pair| {
            let (open_char, close_char) = pair.chars();
            let open = content.chars().filter(|c| *c == open_char).count();
            let close = content.chars().filter(|c| *c == close_char).count();
            (open != close).then_some(Imbalance { pair, open, close })
        })
        .collect()
}
