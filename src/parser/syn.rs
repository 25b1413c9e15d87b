use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// OR-list of AND-lists. `L` is the leaf type: `FieldTerm` for a query,
/// `Term` for the body of a grouped term such as `field:(a OR b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrExpr<L> {
    pub ands: Vec<AndExpr<L>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndExpr<L> {
    pub items: Vec<AndItem<L>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndItem<L> {
    #[serde(default)]
    pub negated: bool,
    pub operand: Operand<L>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Operand<L> {
    Paren(Box<OrExpr<L>>),
    Leaf(L),
}

/// Parsed query: boolean composition of field terms.
pub type Query<'ast> = OrExpr<FieldTerm<'ast>>;

/// Body of a grouped term, not yet bound to a field.
pub type TermGroup<'ast> = OrExpr<Term<'ast>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTerm<'ast> {
    pub field: Cow<'ast, str>,
    pub term: Term<'ast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum Term<'ast> {
    Single(Cow<'ast, str>),
    /// Quoted phrase, quotes removed.
    Phrase(Cow<'ast, str>),
    Range(RangeTerm<'ast>),
    /// Regular expression body without the `/` delimiters.
    Regexp(Cow<'ast, str>),
    Wildcard(Vec<WildcardToken<'ast>>),
    Fuzzy(FuzzyTerm<'ast>),
    Group(Box<TermGroup<'ast>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bound<'ast> {
    Unbounded,
    Word(Cow<'ast, str>),
    Phrase(Cow<'ast, str>),
}

impl<'ast> Bound<'ast> {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeTerm<'ast> {
    pub lower: Bound<'ast>,
    pub upper: Bound<'ast>,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "c")]
pub enum WildcardToken<'ast> {
    Literal(Cow<'ast, str>),
    AnyChar,   // ?
    AnyString, // *
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyTerm<'ast> {
    pub text: Cow<'ast, str>,
    /// `"foo bar"~` form
    #[serde(default)]
    pub phrase: bool,
    /// Edit distance, `None` when the query gave a bare `~`.
    #[serde(default)]
    pub distance: Option<u32>,
}

impl<L> OrExpr<L> {
    /// Rebuild the tree with every leaf passed through `f`.
    pub fn map<M, F>(&self, f: &mut F) -> OrExpr<M>
    where
        F: FnMut(&L) -> M,
    {
        OrExpr {
            ands: self
                .ands
                .iter()
                .map(|and| AndExpr {
                    items: and
                        .items
                        .iter()
                        .map(|item| AndItem {
                            negated: item.negated,
                            operand: match &item.operand {
                                Operand::Paren(inner) => Operand::Paren(Box::new(inner.map(f))),
                                Operand::Leaf(leaf) => Operand::Leaf(f(leaf)),
                            },
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl<'ast> TermGroup<'ast> {
    /// Bind every term of the group to `field`, so `field:(a OR b)` becomes
    /// `field:a OR field:b`.
    pub fn scoped(&self, field: &str) -> Query<'ast> {
        self.map(&mut |term: &Term<'ast>| FieldTerm {
            field: Cow::Owned(field.to_string()),
            term: term.clone(),
        })
    }
}

impl<L> From<L> for AndItem<L> {
    fn from(leaf: L) -> Self {
        AndItem {
            negated: false,
            operand: Operand::Leaf(leaf),
        }
    }
}

impl<L> From<Vec<AndItem<L>>> for AndExpr<L> {
    fn from(items: Vec<AndItem<L>>) -> Self {
        AndExpr { items }
    }
}

impl<L> From<Vec<AndExpr<L>>> for OrExpr<L> {
    fn from(ands: Vec<AndExpr<L>>) -> Self {
        OrExpr { ands }
    }
}

impl<L> AndItem<L> {
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl<'ast> FieldTerm<'ast> {
    pub fn new<F: Into<Cow<'ast, str>>>(field: F, term: Term<'ast>) -> Self {
        FieldTerm {
            field: field.into(),
            term,
        }
    }
}
