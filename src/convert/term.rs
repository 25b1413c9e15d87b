use log::trace;

use crate::{
    clause::{contains, quote, Clause},
    convert::{KeywordMatch, SqlConverter},
    dialect::Operation,
    error::Error,
    parser::syn::{FieldTerm, FuzzyTerm, Term},
    schema::{FieldType, Property},
};

const SQL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number literal as SQL takes it, no `inf` or `NaN`.
pub(crate) fn is_number(v: &str) -> bool {
    v.bytes().any(|b| b.is_ascii_digit())
        && v
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        && v.parse::<f64>().is_ok()
}

pub(crate) fn binary(field: &str) -> Error {
    Error::type_mismatch(field, FieldType::Binary, "binary fields can't be queried")
}

impl SqlConverter {
    /// SQL for a single field term, without negation.
    pub(crate) fn encode(&self, node: &FieldTerm) -> Result<String, Error> {
        let field = &*node.field;
        if field.is_empty() {
            return Err(Error::MalformedQuery("empty field name".to_string()));
        }
        let prop = self
            .schema
            .property(field)
            .ok_or_else(|| Error::UnknownField(field.to_string()))?;
        if prop.ty == FieldType::Binary {
            return Err(binary(field));
        }

        let sql = match &node.term {
            Term::Single(v) => self.single(field, prop, v)?,
            Term::Phrase(v) => self.phrase(field, prop, v)?,
            Term::Range(range) => self.range(field, prop, range)?,
            Term::Regexp(pattern) => {
                require_string(field, prop, Operation::Regexp)?;
                self.dialect.regexp(field, pattern)
            }
            Term::Wildcard(tokens) => {
                require_string(field, prop, Operation::Wildcard)?;
                self.dialect.wildcard(field, tokens)
            }
            Term::Fuzzy(fuzzy) => self.fuzzy(field, prop, fuzzy)?,
            Term::Group(group) => self.walk(&group.scoped(field))?,
        };
        trace!("{} ({}) {:?} => {}", field, prop.ty, node.term, sql);
        Ok(sql)
    }

    fn single(&self, field: &str, prop: &Property, v: &str) -> Result<String, Error> {
        match prop.ty {
            FieldType::Number if is_number(v) => Ok(format!("{} = {}", field, v)),
            FieldType::Number => Err(Error::type_mismatch(
                field,
                prop.ty,
                format!("`{}` is not a number", v),
            )),
            FieldType::Keyword | FieldType::Ip | FieldType::Version => {
                Ok(self.exact(field, prop.ty, v))
            }
            FieldType::Text => Ok(self.text(field, v)),
            FieldType::Date => Ok(format!(
                "{} = {}",
                field,
                quote(&self.normalize_date(field, prop, v)?)
            )),
            FieldType::Boolean => boolean(field, v),
            FieldType::Binary => Err(binary(field)),
        }
    }

    fn phrase(&self, field: &str, prop: &Property, v: &str) -> Result<String, Error> {
        match prop.ty {
            FieldType::Number => Err(Error::type_mismatch(
                field,
                prop.ty,
                "phrase query on a number field",
            )),
            FieldType::Text => Ok(contains(field, v)),
            _ => self.single(field, prop, v),
        }
    }

    fn exact(&self, field: &str, ty: FieldType, v: &str) -> String {
        match (self.keyword_match, ty) {
            (KeywordMatch::Substring, FieldType::Keyword) => contains(field, v),
            _ => format!("{} = {}", field, quote(v)),
        }
    }

    /// One `LIKE` per non-blank token, the whole value when the field has
    /// no tokenizer or the tokenizer finds nothing.
    fn text(&self, field: &str, v: &str) -> String {
        let tokens: Vec<String> = self
            .tokenizers
            .get(field)
            .map(|t| t.split(v))
            .unwrap_or_default()
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .collect();
        match tokens.as_slice() {
            [] => contains(field, v),
            [token] => contains(field, token),
            tokens => {
                let mut clause = Clause::or();
                for token in tokens {
                    clause.push(&contains(field, token));
                }
                // one operand, so the ORs stay together next to an AND
                format!("({})", clause.finish())
            }
        }
    }

    fn fuzzy(&self, field: &str, prop: &Property, fuzzy: &FuzzyTerm) -> Result<String, Error> {
        if fuzzy.phrase {
            return Err(Error::UnsupportedFuzzyPhrase {
                field: field.to_string(),
                value: fuzzy.text.to_string(),
            });
        }
        require_string(field, prop, Operation::Fuzzy)?;
        self.dialect
            .fuzzy(field, &fuzzy.text, fuzzy.distance.unwrap_or(1))
            .ok_or_else(|| Error::DialectUnsupportedOperation {
                dialect: self.dialect,
                op: Operation::Fuzzy,
                field: field.to_string(),
                value: fuzzy.text.to_string(),
            })
    }

    /// Evaluate a date value with the field's formats and render it as
    /// `yyyy-MM-dd HH:mm:ss` UTC, unquoted.
    pub(crate) fn normalize_date(
        &self,
        field: &str,
        prop: &Property,
        v: &str,
    ) -> Result<String, Error> {
        let format = prop.format.as_deref().unwrap_or(&self.default_date_format);
        let formats: Vec<&str> = format
            .split("||")
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        self.date_math
            .evaluate(v, &formats)
            .map(|dt| dt.format(SQL_DATE_FORMAT).to_string())
            .map_err(|e| Error::DateParseFailure {
                field: field.to_string(),
                value: v.to_string(),
                reason: e.to_string(),
            })
    }
}

fn require_string(field: &str, prop: &Property, op: Operation) -> Result<(), Error> {
    if prop.ty.is_string() {
        Ok(())
    } else {
        Err(Error::type_mismatch(
            field,
            prop.ty,
            format!("{} query needs a keyword or text field", op),
        ))
    }
}

fn boolean(field: &str, v: &str) -> Result<String, Error> {
    if v.eq_ignore_ascii_case("true") {
        Ok(format!("{} = true", field))
    } else if v.eq_ignore_ascii_case("false") {
        Ok(format!("{} = false", field))
    } else {
        Err(Error::type_mismatch(
            field,
            FieldType::Boolean,
            format!("`{}` is not a boolean", v),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        convert::{term::is_number, SqlConverter},
        error::Error,
        parser::syn::{FieldTerm, FuzzyTerm, Term},
        schema::{FieldType, Mapping},
    };

    #[test]
    fn test_is_number() {
        let tests = [
            ("67", true),
            ("-3", true),
            ("+3.25", true),
            ("1e10", true),
            (".5", true),
            ("1.2.3", false),
            ("inf", false),
            ("NaN", false),
            ("-", false),
            ("", false),
            ("0x10", false),
        ];
        for (input, expected) in tests {
            assert_eq!(is_number(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_encode() {
        let conv = SqlConverter::builder()
            .schema(
                Mapping::new()
                    .field("f", FieldType::Text)
                    .field("n", FieldType::Number)
                    .field("b", FieldType::Binary),
            )
            .tokenizer("f", |v: &str| v.split(' ').map(String::from).collect::<Vec<_>>())
            .build()
            .unwrap();

        let tests = [
            (FieldTerm::new("f", Term::Single("a b".into())), Ok("(f LIKE '%a%' OR f LIKE '%b%')")),
            (FieldTerm::new("f", Term::Single(" ".into())), Ok("f LIKE '% %'")),
            (FieldTerm::new("f", Term::Single("a  b".into())), Ok("(f LIKE '%a%' OR f LIKE '%b%')")),
            (FieldTerm::new("f", Term::Phrase("a b".into())), Ok("f LIKE '%a b%'")),
            (
                FieldTerm::new(
                    "f",
                    Term::Fuzzy(FuzzyTerm {
                        text: "a".into(),
                        phrase: false,
                        distance: None,
                    }),
                ),
                Err(Error::DialectUnsupportedOperation {
                    dialect: crate::dialect::Dialect::Standard,
                    op: crate::dialect::Operation::Fuzzy,
                    field: "f".to_string(),
                    value: "a".to_string(),
                }),
            ),
            (
                FieldTerm::new("n", Term::Regexp("1".into())),
                Err(Error::TypeMismatch {
                    field: "n".to_string(),
                    ty: FieldType::Number,
                    reason: "regexp query needs a keyword or text field".to_string(),
                }),
            ),
            (
                FieldTerm::new("b", Term::Regexp("1".into())),
                Err(Error::TypeMismatch {
                    field: "b".to_string(),
                    ty: FieldType::Binary,
                    reason: "binary fields can't be queried".to_string(),
                }),
            ),
        ];
        for (input, expected) in tests {
            assert_eq!(
                conv.encode(&input),
                expected.map(String::from),
                "{:?}",
                input
            );
        }
    }
}
