use crate::{
    clause::{quote, Clause},
    convert::{
        term::{binary, is_number},
        SqlConverter,
    },
    error::Error,
    parser::syn::{Bound, RangeTerm},
    schema::{FieldType, Property},
};

impl SqlConverter {
    pub(crate) fn range(
        &self,
        field: &str,
        prop: &Property,
        range: &RangeTerm,
    ) -> Result<String, Error> {
        match prop.ty {
            FieldType::Boolean => {
                return Err(Error::type_mismatch(
                    field,
                    prop.ty,
                    "range query on a boolean field",
                ))
            }
            FieldType::Binary => return Err(binary(field)),
            _ => {}
        }
        if range.lower.is_unbounded() && range.upper.is_unbounded() {
            return Ok(format!("{} IS NOT NULL", field));
        }

        let mut clause = Clause::and();
        if let Some(v) = self.resolve_bound(field, prop, &range.lower)? {
            let op = if range.lower_inclusive { ">=" } else { ">" };
            clause.push(&format!("{} {} {}", field, op, v));
        }
        if let Some(v) = self.resolve_bound(field, prop, &range.upper)? {
            let op = if range.upper_inclusive { "<=" } else { "<" };
            clause.push(&format!("{} {} {}", field, op, v));
        }
        Ok(clause.finish())
    }

    /// SQL literal for one side of a range, `None` when the side is open.
    pub(crate) fn resolve_bound(
        &self,
        field: &str,
        prop: &Property,
        bound: &Bound,
    ) -> Result<Option<String>, Error> {
        let (v, phrase) = match bound {
            Bound::Unbounded => return Ok(None),
            Bound::Word(v) => (&**v, false),
            Bound::Phrase(v) => (&**v, true),
        };
        match prop.ty {
            FieldType::Number if phrase => Err(Error::type_mismatch(
                field,
                prop.ty,
                "phrase range bound on a number field",
            )),
            FieldType::Number if is_number(v) => Ok(Some(v.to_string())),
            FieldType::Number => Err(Error::type_mismatch(
                field,
                prop.ty,
                format!("range bound `{}` is not a number", v),
            )),
            FieldType::Keyword | FieldType::Text | FieldType::Ip | FieldType::Version => {
                Ok(Some(quote(v)))
            }
            FieldType::Date => Ok(Some(quote(&self.normalize_date(field, prop, v)?))),
            FieldType::Boolean => Err(Error::type_mismatch(
                field,
                prop.ty,
                "range query on a boolean field",
            )),
            FieldType::Binary => Err(binary(field)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        convert::SqlConverter,
        error::Error,
        parser::syn::{Bound, RangeTerm},
        schema::{FieldType, Mapping, Property},
    };

    fn converter() -> SqlConverter {
        SqlConverter::builder()
            .schema(
                Mapping::new()
                    .field("n", FieldType::Number)
                    .field("v", FieldType::Version)
                    .field("d", Property::new(FieldType::Date).with_format("epoch_second")),
            )
            .build()
            .unwrap()
    }

    fn range<'a>(lower: Bound<'a>, upper: Bound<'a>, li: bool, ui: bool) -> RangeTerm<'a> {
        RangeTerm {
            lower,
            upper,
            lower_inclusive: li,
            upper_inclusive: ui,
        }
    }

    #[test]
    fn test_operators() {
        let conv = converter();
        let prop = Property::new(FieldType::Number);
        let one = || Bound::Word("1".into());
        let two = || Bound::Word("2".into());
        let tests = [
            (range(one(), two(), true, true), "n >= 1 AND n <= 2"),
            (range(one(), two(), false, false), "n > 1 AND n < 2"),
            (range(one(), Bound::Unbounded, true, true), "n >= 1"),
            (range(one(), Bound::Unbounded, false, false), "n > 1"),
            (range(Bound::Unbounded, two(), true, true), "n <= 2"),
            (range(Bound::Unbounded, two(), false, false), "n < 2"),
            (range(Bound::Unbounded, Bound::Unbounded, false, true), "n IS NOT NULL"),
        ];
        for (input, expected) in tests {
            assert_eq!(
                conv.range("n", &prop, &input),
                Ok(expected.to_string()),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_resolve_bound() {
        let conv = converter();
        let version = Property::new(FieldType::Version);
        let date = Property::new(FieldType::Date).with_format("epoch_second");
        let number = Property::new(FieldType::Number);

        assert_eq!(conv.resolve_bound("v", &version, &Bound::Unbounded), Ok(None));
        assert_eq!(
            conv.resolve_bound("v", &version, &Bound::Phrase("1.0'rc".into())),
            Ok(Some("'1.0''rc'".to_string()))
        );
        assert_eq!(
            conv.resolve_bound("d", &date, &Bound::Word("67".into())),
            Ok(Some("'1970-01-01 00:01:07'".to_string()))
        );
        assert!(matches!(
            conv.resolve_bound("d", &date, &Bound::Word("x".into())),
            Err(Error::DateParseFailure { .. })
        ));
        assert_eq!(
            conv.resolve_bound("n", &number, &Bound::Phrase("5".into())),
            Err(Error::TypeMismatch {
                field: "n".to_string(),
                ty: FieldType::Number,
                reason: "phrase range bound on a number field".to_string(),
            })
        );
    }
}
