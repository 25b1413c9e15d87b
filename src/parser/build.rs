use std::fmt::Write;

use crate::parser::{
    parse::is_bound_char,
    syn::{AndExpr, Bound, FieldTerm, Operand, OrExpr, Query, Term, WildcardToken},
    visit::{visit, visit_item, Visit},
};

struct BuildQuery<'a> {
    out: &'a mut dyn Write,
}

impl Visit for BuildQuery<'_> {
    type Result = Result<(), std::fmt::Error>;

    fn visit_or(&mut self, node: &Query) -> Self::Result {
        let mut it = node.ands.iter().peekable();
        while let Some(and) = it.next() {
            self.visit_and(and)?;
            if it.peek().is_some() {
                self.out.write_str(" OR ")?;
            }
        }
        Ok(())
    }

    fn visit_and(&mut self, node: &AndExpr<FieldTerm>) -> Self::Result {
        let mut it = node.items.iter().peekable();
        while let Some(item) = it.next() {
            if item.negated {
                self.out.write_str("NOT ")?;
            }
            visit_item(item, self)?;
            if it.peek().is_some() {
                self.out.write_str(" AND ")?;
            }
        }
        Ok(())
    }

    fn visit_paren(&mut self, node: &Query) -> Self::Result {
        self.out.write_char('(')?;
        self.visit_or(node)?;
        self.out.write_char(')')
    }

    fn visit_field_term(&mut self, node: &FieldTerm) -> Self::Result {
        write!(self.out, "{}:", node.field)?;
        write_term(self.out, &node.term)
    }
}

fn write_phrase(out: &mut dyn Write, v: &str) -> std::fmt::Result {
    write!(out, "\"{}\"", v.replace('"', "\\\""))
}

fn write_bound(out: &mut dyn Write, bound: &Bound) -> std::fmt::Result {
    match bound {
        Bound::Unbounded => out.write_char('*'),
        Bound::Word(v) if &**v == "*" => out.write_str("\\*"),
        Bound::Word(v) => {
            for c in v.chars() {
                if !is_bound_char(c) {
                    out.write_char('\\')?;
                }
                out.write_char(c)?;
            }
            Ok(())
        }
        Bound::Phrase(v) => write_phrase(out, v),
    }
}

fn write_term(out: &mut dyn Write, term: &Term) -> std::fmt::Result {
    match term {
        Term::Single(v) => out.write_str(v),
        Term::Phrase(v) => write_phrase(out, v),
        Term::Range(r) => {
            out.write_char(if r.lower_inclusive { '[' } else { '{' })?;
            write_bound(out, &r.lower)?;
            out.write_str(" TO ")?;
            write_bound(out, &r.upper)?;
            out.write_char(if r.upper_inclusive { ']' } else { '}' })
        }
        Term::Regexp(v) => write!(out, "/{}/", v.replace('/', "\\/")),
        Term::Wildcard(tokens) => {
            for tk in tokens {
                match tk {
                    WildcardToken::Literal(v) => out.write_str(v)?,
                    WildcardToken::AnyChar => out.write_char('?')?,
                    WildcardToken::AnyString => out.write_char('*')?,
                }
            }
            Ok(())
        }
        Term::Fuzzy(f) => {
            if f.phrase {
                write_phrase(out, &f.text)?;
            } else {
                out.write_str(&f.text)?;
            }
            out.write_char('~')?;
            match f.distance {
                Some(d) => write!(out, "{}", d),
                None => Ok(()),
            }
        }
        Term::Group(group) => {
            out.write_char('(')?;
            write_group(out, group)?;
            out.write_char(')')
        }
    }
}

fn write_group(out: &mut dyn Write, group: &OrExpr<Term>) -> std::fmt::Result {
    let mut ors = group.ands.iter().peekable();
    while let Some(and) = ors.next() {
        let mut ands = and.items.iter().peekable();
        while let Some(item) = ands.next() {
            if item.negated {
                out.write_str("NOT ")?;
            }
            match &item.operand {
                Operand::Paren(inner) => {
                    out.write_char('(')?;
                    write_group(out, inner)?;
                    out.write_char(')')?;
                }
                Operand::Leaf(term) => write_term(out, term)?,
            }
            if ands.peek().is_some() {
                out.write_str(" AND ")?;
            }
        }
        if ors.peek().is_some() {
            out.write_str(" OR ")?;
        }
    }
    Ok(())
}

/// Render a query back to Lucene text.
pub fn build_query(query: &Query) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let mut vis = BuildQuery { out: &mut out };
    visit(query, &mut vis)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use crate::parser::{
        build_query,
        syn::{AndItem, Bound, FieldTerm, FuzzyTerm, Operand, OrExpr, RangeTerm, Term, WildcardToken},
    };

    #[test]
    fn test_compose_query() {
        let group: OrExpr<Term> = vec![
            vec![Term::Single("a".into()).into()].into(),
            vec![AndItem::from(Term::Phrase("b c".into())).not()].into(),
        ]
        .into();

        let query: OrExpr<FieldTerm> = vec![
            vec![
                FieldTerm::new("foo", Term::Single("5".into())).into(),
                FieldTerm::new(
                    "baz",
                    Term::Range(RangeTerm {
                        lower: Bound::Word("1".into()),
                        upper: Bound::Unbounded,
                        lower_inclusive: true,
                        upper_inclusive: false,
                    }),
                )
                .into(),
            ]
            .into(),
            vec![AndItem {
                negated: true,
                operand: Operand::Paren(Box::new(
                    vec![vec![
                        FieldTerm::new("moo", Term::Regexp(Cow::Borrowed("^he/ad"))).into(),
                        FieldTerm::new(
                            "name",
                            Term::Wildcard(vec![
                                WildcardToken::Literal("jo".into()),
                                WildcardToken::AnyChar,
                                WildcardToken::AnyString,
                            ]),
                        )
                        .into(),
                    ]
                    .into()]
                    .into(),
                )),
            }]
            .into(),
            vec![
                FieldTerm::new(
                    "bar",
                    Term::Fuzzy(FuzzyTerm {
                        text: "roam".into(),
                        phrase: false,
                        distance: Some(2),
                    }),
                )
                .into(),
                AndItem::from(FieldTerm::new("tag", Term::Group(Box::new(group)))).not(),
            ]
            .into(),
        ]
        .into();

        assert_eq!(
            build_query(&query).unwrap(),
            r#"foo:5 AND baz:[1 TO *} OR NOT (moo:/^he\/ad/ AND name:jo?*) OR bar:roam~2 AND NOT tag:(a OR NOT "b c")"#
        );
    }
}
