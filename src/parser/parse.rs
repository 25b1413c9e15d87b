use std::{borrow::Cow, ops::Deref};

use nom::{
    branch::alt,
    bytes::complete::{escaped, tag, take_while1},
    character::complete::{anychar, char, digit1, multispace0, none_of, satisfy},
    combinator::{all_consuming, cut, map, map_res, not, opt, recognize, value, verify},
    error::{context, convert_error, ParseError, VerboseError},
    multi::many1,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    Parser,
};

use crate::parser::syn::{
    AndExpr, AndItem, Bound, FieldTerm, FuzzyTerm, Operand, OrExpr, Query, RangeTerm, Term,
    TermGroup, WildcardToken,
};

pub type IResult<I, O> = nom::IResult<I, O, VerboseError<I>>;

/// Parser of a boolean expression leaf.
type Leaf<'a, L> = fn(&'a str) -> IResult<&'a str, L>;

fn is_field_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '-')
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '(' | ')' | '[' | ']' | '{' | '}' | '"' | '/' | '\\' | '~' | '^' | '*' | '?'
        )
}

pub(crate) fn is_bound_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '"' | '\\')
}

/// Drop escaping backslashes.
fn unescape(v: &str) -> Cow<'_, str> {
    if !v.contains('\\') {
        return Cow::Borrowed(v);
    }
    let mut out = String::with_capacity(v.len());
    let mut chars = v.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// A combinator that takes a parser `inner` and produces a parser that also consumes both
/// leading and trailing whitespace, returning the output of `inner`.
///
/// ```rust
/// use lucene2sql::parser::parse::{ws, field};
///
/// let mut p = ws(field);
///
/// assert_eq!(p(" foo:"), Ok((":", "foo")));
/// assert_eq!(p("foo  :"), Ok((":", "foo")));
/// ```
pub fn ws<'a, O, E: ParseError<&'a str>, F>(
    inner: F,
) -> impl FnMut(&'a str) -> nom::IResult<&'a str, O, E>
where
    F: Parser<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

/// Reserved word, must not run into the following term.
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(kw), not(satisfy(is_word_char)))
}

/// Field name
///
/// ```rust
/// use lucene2sql::parser::parse::field;
///
/// assert_eq!(field("foo:bar"), Ok((":bar", "foo")));
/// assert_eq!(field("foo.bar_1:baz"), Ok((":baz", "foo.bar_1")));
/// assert!(field("-foo:bar").is_err());
/// ```
pub fn field(input: &str) -> IResult<&str, &str> {
    context(
        "field",
        verify(take_while1(is_field_char), |v: &str| !v.starts_with('-')),
    )(input)
}

/// Double-quoted phrase
///
/// ```rust
/// use lucene2sql::parser::parse::phrase;
///
/// assert_eq!(phrase(r#""hello, world";"#), Ok((";", "hello, world".into())));
/// assert_eq!(phrase(r#""say \"hi\"";"#), Ok((";", r#"say "hi""#.into())));
/// assert_eq!(phrase(r#""";"#), Ok((";", "".into())));
/// ```
pub fn phrase(input: &str) -> IResult<&str, Cow<'_, str>> {
    let esc = escaped(none_of("\\\""), '\\', anychar);
    let esc_or_empty = alt((esc, tag("")));
    let begin = char('"');
    let end = context("closing \"", char('"'));
    context("phrase", map(delimited(begin, esc_or_empty, end), unescape))(input)
}

/// Drop the backslash of `\/` only, the pattern keeps its own escapes.
fn unescape_slash(v: &str) -> Cow<'_, str> {
    if v.contains("\\/") {
        Cow::Owned(v.replace("\\/", "/"))
    } else {
        Cow::Borrowed(v)
    }
}

/// Regular expression between slashes
///
/// ```rust
/// use lucene2sql::parser::parse::regexp;
///
/// assert_eq!(regexp("/^(foo)$/;"), Ok((";", "^(foo)$".into())));
/// assert_eq!(regexp(r"/a\/b\d/;"), Ok((";", r"a/b\d".into())));
/// assert_eq!(regexp(r"/\/\/x/;"), Ok((";", "//x".into())));
/// ```
pub fn regexp(input: &str) -> IResult<&str, Cow<'_, str>> {
    let esc = escaped(none_of("\\/"), '\\', anychar);
    let esc_or_empty = alt((esc, tag("")));
    let begin = char('/');
    let end = context("closing /", char('/'));
    context(
        "regexp",
        map(delimited(begin, esc_or_empty, end), unescape_slash),
    )(input)
}

/// Fuzziness suffix, `~` with an optional edit distance.
///
/// ```rust
/// use lucene2sql::parser::parse::fuzziness;
///
/// assert_eq!(fuzziness("~ "), Ok((" ", None)));
/// assert_eq!(fuzziness("~2 "), Ok((" ", Some(2))));
/// assert_eq!(fuzziness("~0.8 "), Ok((" ", Some(0))));
/// ```
pub fn fuzziness(input: &str) -> IResult<&str, Option<u32>> {
    context(
        "fuzziness",
        preceded(
            char('~'),
            opt(map_res(
                recognize(pair(digit1, opt(pair(char('.'), digit1)))),
                |v: &str| v.parse::<f64>().map(|f| f as u32),
            )),
        ),
    )(input)
}

#[derive(Debug, Clone)]
enum Piece<'a> {
    Text(&'a str),
    Escaped(char),
    AnyChar,
    AnyString,
}

fn piece(input: &str) -> IResult<&str, Piece<'_>> {
    alt((
        map(take_while1(is_word_char), Piece::Text),
        map(preceded(char('\\'), anychar), Piece::Escaped),
        value(Piece::AnyString, char('*')),
        value(Piece::AnyChar, char('?')),
    ))(input)
}

fn push_literal<'a>(tokens: &mut Vec<WildcardToken<'a>>, v: Cow<'a, str>) {
    match tokens.last_mut() {
        Some(WildcardToken::Literal(last)) => last.to_mut().push_str(&v),
        _ => tokens.push(WildcardToken::Literal(v)),
    }
}

/// Bare word split on unescaped `?` and `*`.
///
/// ```rust
/// use lucene2sql::parser::parse::word;
/// use lucene2sql::parser::syn::WildcardToken;
///
/// assert_eq!(word("foo bar"), Ok((" bar", vec![WildcardToken::Literal("foo".into())])));
/// assert_eq!(word(r"a\*b?c* "), Ok((" ", vec![
///     WildcardToken::Literal("a*b".into()),
///     WildcardToken::AnyChar,
///     WildcardToken::Literal("c".into()),
///     WildcardToken::AnyString,
/// ])));
/// ```
pub fn word(input: &str) -> IResult<&str, Vec<WildcardToken<'_>>> {
    context(
        "word",
        map(many1(piece), |pieces| {
            let mut tokens = Vec::new();
            for p in pieces {
                match p {
                    Piece::Text(v) => push_literal(&mut tokens, Cow::Borrowed(v)),
                    Piece::Escaped(c) => push_literal(&mut tokens, Cow::Owned(c.to_string())),
                    Piece::AnyChar => tokens.push(WildcardToken::AnyChar),
                    Piece::AnyString => tokens.push(WildcardToken::AnyString),
                }
            }
            tokens
        }),
    )(input)
}

/// Plain text when the word holds no wildcard.
fn into_text(mut tokens: Vec<WildcardToken<'_>>) -> Result<Cow<'_, str>, Vec<WildcardToken<'_>>> {
    if matches!(tokens.as_slice(), [WildcardToken::Literal(_)]) {
        if let Some(WildcardToken::Literal(v)) = tokens.pop() {
            return Ok(v);
        }
    }
    Err(tokens)
}

fn single_term(input: &str) -> IResult<&str, Term<'_>> {
    map_res(
        pair(word, opt(fuzziness)),
        |(tokens, fuzzy)| {
            match (into_text(tokens), fuzzy) {
                (Ok(text), None) => Ok(Term::Single(text)),
                (Ok(text), Some(distance)) => Ok(Term::Fuzzy(FuzzyTerm {
                    text,
                    phrase: false,
                    distance,
                })),
                (Err(tokens), None) => Ok(Term::Wildcard(tokens)),
                (Err(_), Some(_)) => Err("wildcard term can't be fuzzy"),
            }
        },
    )(input)
}

fn phrase_term(input: &str) -> IResult<&str, Term<'_>> {
    map(pair(phrase, opt(fuzziness)), |(text, fuzzy)| match fuzzy {
        None => Term::Phrase(text),
        Some(distance) => Term::Fuzzy(FuzzyTerm {
            text,
            phrase: true,
            distance,
        }),
    })(input)
}

fn bound_word(v: &str) -> Bound<'_> {
    match v {
        "*" => Bound::Unbounded,
        _ => Bound::Word(unescape(v)),
    }
}

/// One side of a range, a bare `*` is the open marker.
///
/// ```rust
/// use lucene2sql::parser::parse::bound;
/// use lucene2sql::parser::syn::Bound;
///
/// assert_eq!(bound("* TO"), Ok((" TO", Bound::Unbounded)));
/// assert_eq!(bound("87'yu]"), Ok(("]", Bound::Word("87'yu".into()))));
/// assert_eq!(bound(r#""a b"}"#), Ok(("}", Bound::Phrase("a b".into()))));
/// assert_eq!(bound(r"a\]b]"), Ok(("]", Bound::Word("a]b".into()))));
/// assert_eq!(bound(r"\* TO"), Ok((" TO", Bound::Word("*".into()))));
/// ```
pub fn bound(input: &str) -> IResult<&str, Bound<'_>> {
    context(
        "range bound",
        alt((
            map(phrase, Bound::Phrase),
            map(
                recognize(many1(alt((
                    take_while1(is_bound_char),
                    recognize(pair(char('\\'), anychar)),
                )))),
                bound_word,
            ),
        )),
    )(input)
}

/// Range in brackets, `[` `]` inclusive and `{` `}` exclusive.
///
/// ```rust
/// use lucene2sql::parser::parse::range;
/// use lucene2sql::parser::syn::{Bound, RangeTerm};
///
/// assert_eq!(range("[1 TO 2};"), Ok((";", RangeTerm {
///     lower: Bound::Word("1".into()),
///     upper: Bound::Word("2".into()),
///     lower_inclusive: true,
///     upper_inclusive: false,
/// })));
/// assert_eq!(range("{ * TO 5 ];"), Ok((";", RangeTerm {
///     lower: Bound::Unbounded,
///     upper: Bound::Word("5".into()),
///     lower_inclusive: false,
///     upper_inclusive: true,
/// })));
/// ```
pub fn range(input: &str) -> IResult<&str, RangeTerm<'_>> {
    let open = alt((value(true, char('[')), value(false, char('{'))));
    let close = context(
        "closing bracket",
        alt((value(true, char(']')), value(false, char('}')))),
    );
    context(
        "range",
        map(
            pair(
                open,
                cut(tuple((ws(bound), context("TO", keyword("TO")), ws(bound), close))),
            ),
            |(lower_inclusive, (lower, _, upper, upper_inclusive))| RangeTerm {
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            },
        ),
    )(input)
}

/// Comparison shorthand, a range open on one side.
///
/// ```rust
/// use lucene2sql::parser::parse::compare;
/// use lucene2sql::parser::syn::{Bound, RangeTerm};
///
/// assert_eq!(compare(">=10 "), Ok((" ", RangeTerm {
///     lower: Bound::Word("10".into()),
///     upper: Bound::Unbounded,
///     lower_inclusive: true,
///     upper_inclusive: false,
/// })));
/// assert_eq!(compare("<10 "), Ok((" ", RangeTerm {
///     lower: Bound::Unbounded,
///     upper: Bound::Word("10".into()),
///     lower_inclusive: false,
///     upper_inclusive: false,
/// })));
/// ```
pub fn compare(input: &str) -> IResult<&str, RangeTerm<'_>> {
    context(
        "comparison",
        map(
            pair(alt((tag(">="), tag("<="), tag(">"), tag("<"))), cut(bound)),
            |(op, v)| match op {
                ">=" | ">" => RangeTerm {
                    lower: v,
                    upper: Bound::Unbounded,
                    lower_inclusive: op == ">=",
                    upper_inclusive: false,
                },
                _ => RangeTerm {
                    lower: Bound::Unbounded,
                    upper: v,
                    lower_inclusive: false,
                    upper_inclusive: op == "<=",
                },
            },
        ),
    )(input)
}

fn term_group(input: &str) -> IResult<&str, TermGroup<'_>> {
    context(
        "term group",
        delimited(
            char('('),
            cut(|i| or_expr(i, term as Leaf<'_, Term<'_>>)),
            context("closing paren", ws(char(')'))),
        ),
    )(input)
}

/// Term value of a field
///
/// ```rust
/// use lucene2sql::parser::parse::term;
/// use lucene2sql::parser::syn::{FuzzyTerm, Term, WildcardToken};
///
/// assert_eq!(term("foo bar"), Ok((" bar", Term::Single("foo".into()))));
/// assert_eq!(term(r#""foo bar" "#), Ok((" ", Term::Phrase("foo bar".into()))));
/// assert_eq!(term("/fo+/ "), Ok((" ", Term::Regexp("fo+".into()))));
/// assert_eq!(term("x'x?x* "), Ok((" ", Term::Wildcard(vec![
///     WildcardToken::Literal("x'x".into()),
///     WildcardToken::AnyChar,
///     WildcardToken::Literal("x".into()),
///     WildcardToken::AnyString,
/// ]))));
/// assert_eq!(term("you'~2 "), Ok((" ", Term::Fuzzy(FuzzyTerm {
///     text: "you'".into(),
///     phrase: false,
///     distance: Some(2),
/// }))));
/// ```
pub fn term(input: &str) -> IResult<&str, Term<'_>> {
    context(
        "term",
        alt((
            map(term_group, |g| Term::Group(Box::new(g))),
            map(range, Term::Range),
            map(compare, Term::Range),
            map(regexp, Term::Regexp),
            phrase_term,
            single_term,
        )),
    )(input)
}

/// Field-scoped term
///
/// ```rust
/// use lucene2sql::parser::parse::field_term;
/// use lucene2sql::parser::syn::{FieldTerm, Term};
///
/// assert_eq!(field_term("foo:bar "), Ok((" ", FieldTerm::new("foo", Term::Single("bar".into())))));
/// assert_eq!(
///     field_term("at:2022-02-03T09:00:88 "),
///     Ok((" ", FieldTerm::new("at", Term::Single("2022-02-03T09:00:88".into()))))
/// );
/// ```
pub fn field_term(input: &str) -> IResult<&str, FieldTerm<'_>> {
    context(
        "field term",
        map(
            separated_pair(field, char(':'), cut(term)),
            |(field, term)| FieldTerm {
                field: Cow::Borrowed(field),
                term,
            },
        ),
    )(input)
}

fn or_op(input: &str) -> IResult<&str, &str> {
    alt((keyword("OR"), tag("||")))(input)
}

fn and_op(input: &str) -> IResult<&str, &str> {
    alt((keyword("AND"), tag("&&")))(input)
}

fn not_op(input: &str) -> IResult<&str, &str> {
    alt((keyword("NOT"), tag("!"), tag("-")))(input)
}

fn and_item<'a, L>(input: &'a str, leaf: Leaf<'a, L>) -> IResult<&'a str, AndItem<L>> {
    let (input, negated) = opt(ws(not_op))(input)?;
    let (input, operand) = ws(alt((
        map(
            delimited(
                char('('),
                cut(|i| or_expr(i, leaf)),
                context("closing paren", ws(char(')'))),
            ),
            |inner| Operand::Paren(Box::new(inner)),
        ),
        map(leaf, Operand::Leaf),
    )))(input)?;
    Ok((
        input,
        AndItem {
            negated: negated.is_some(),
            operand,
        },
    ))
}

fn and_expr<'a, L>(input: &'a str, leaf: Leaf<'a, L>) -> IResult<&'a str, AndExpr<L>> {
    let (mut input, first) = and_item(input, leaf)?;
    let mut items = vec![first];
    loop {
        match ws(and_op)(input) {
            Ok((rest, _)) => {
                let (rest, item) = cut(|i| and_item(i, leaf))(rest)?;
                items.push(item);
                input = rest;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((input, AndExpr { items }))
}

/// OR-list of AND-lists. AND binds tighter than OR, operators are explicit.
fn or_expr<'a, L>(input: &'a str, leaf: Leaf<'a, L>) -> IResult<&'a str, OrExpr<L>> {
    let (mut input, first) = and_expr(input, leaf)?;
    let mut ands = vec![first];
    loop {
        match ws(or_op)(input) {
            Ok((rest, _)) => {
                let (rest, and) = cut(|i| and_expr(i, leaf))(rest)?;
                ands.push(and);
                input = rest;
            }
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        }
    }
    Ok((input, OrExpr { ands }))
}

/// Parse the whole query text.
///
/// ```rust
/// use lucene2sql::parser::parse::query;
/// use lucene2sql::parser::syn::{AndItem, FieldTerm, Term};
///
/// assert_eq!(query(" a:1 AND NOT b:2 OR c:3 "), Ok(("", vec![
///     vec![
///         AndItem::from(FieldTerm::new("a", Term::Single("1".into()))),
///         AndItem::from(FieldTerm::new("b", Term::Single("2".into()))).not(),
///     ].into(),
///     vec![AndItem::from(FieldTerm::new("c", Term::Single("3".into())))].into(),
/// ].into())));
/// assert!(query("").is_err());
/// assert!(query("a:1 b:2").is_err());
/// ```
pub fn query(input: &str) -> IResult<&str, Query<'_>> {
    context(
        "query",
        all_consuming(ws(|i| or_expr(i, field_term as Leaf<'_, FieldTerm<'_>>))),
    )(input)
}

/// Input-aware error.
#[derive(Debug, Clone, PartialEq)]
pub struct Error<I> {
    pub input: I,
    pub cause: nom::Err<nom::error::VerboseError<I>>,
}

/// To convert input aware error into printable stack trace.
impl<I> From<Error<I>> for String
where
    I: Deref<Target = str>,
{
    fn from(e: Error<I>) -> Self {
        match e.cause {
            nom::Err::Error(err) | nom::Err::Failure(err) => convert_error(e.input, err),
            nom::Err::Incomplete(needed) => {
                format!("incomplete, needed: {:?}", needed)
            }
        }
    }
}

impl<I> Error<I>
where
    I: Deref<Target = str>,
{
    pub fn into_stack_trace(self) -> String {
        String::from(self)
    }
}

/// Parses query.
pub fn parse_query(input: &str) -> Result<Query<'_>, Error<&str>> {
    match query(input) {
        Ok((_, query)) => Ok(query),
        Err(cause) => Err(Error { input, cause }),
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{build_query, parse_query};

    #[test]
    fn test_parse_and_build() {
        let test_cases = vec![
            // <query>, <canonical query text>
            ("a:1", "a:1"),
            ("a:1 AND b:2", "a:1 AND b:2"),
            ("a:1 && b:2 || c:3", "a:1 AND b:2 OR c:3"),
            ("-a:1", "NOT a:1"),
            ("!a:1 AND NOT b:x", "NOT a:1 AND NOT b:x"),
            ("( a:1 OR b:2 ) AND c:3", "(a:1 OR b:2) AND c:3"),
            ("NOT (a:1)", "NOT (a:1)"),
            ("a:[1 TO 2}", "a:[1 TO 2}"),
            ("a:{* TO \"x y\"]", "a:{* TO \"x y\"]"),
            (r"a:[a\]b TO c\ d]", r"a:[a\]b TO c\ d]"),
            (r"a:[\* TO *]", r"a:[\* TO *]"),
            ("a:>=5", "a:[5 TO *}"),
            ("a:<5", "a:{* TO 5}"),
            ("a:/x'x+/", "a:/x'x+/"),
            ("a:x'x?x*", "a:x'x?x*"),
            ("a:\"xx 'you'\"", "a:\"xx 'you'\""),
            ("a:you'~", "a:you'~"),
            ("a:\"xx yy\"~", "a:\"xx yy\"~"),
            (
                "a:((\"k1\" OR \"k2\") AND k3 AND NOT k4)",
                "a:((\"k1\" OR \"k2\") AND k3 AND NOT k4)",
            ),
            ("ANDROID:ORACLE", "ANDROID:ORACLE"),
        ];

        for tc in &test_cases {
            let ast = parse_query(tc.0).unwrap();
            assert_eq!(build_query(&ast).unwrap(), tc.1, "query: {}", tc.0);
        }
    }

    #[test]
    fn test_parse_errors() {
        for q in ["", "a", "a:", "a:[1 TO", "a:(b", "a:1 AND", "a:x*~2", "(a:1", "a:1 b:2"] {
            assert!(parse_query(q).is_err(), "query: {}", q);
        }

        let trace = parse_query("a:1 b:2").unwrap_err().into_stack_trace();
        assert!(trace.contains("query"));
    }
}
