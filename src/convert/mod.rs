//! Query tree to SQL predicate.

mod range;
mod term;

use std::collections::HashMap;

use log::{debug, log_enabled, Level};
use serde::{Deserialize, Serialize};

use crate::{
    clause::Clause,
    datemath::{DateMath, DateMathParser},
    dialect::Dialect,
    error::Error,
    parser::{
        build_query, parse_query,
        syn::{AndExpr, FieldTerm, Operand, Query, Term},
        visit::{visit, visit_item, Visit},
    },
    schema::Schema,
    tokenizer::Tokenizer,
};

pub const DEFAULT_DATE_FORMAT: &str = "strict_date_optional_time||epoch_millis";

/// How keyword fields match a single or phrase term.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMatch {
    /// `field = 'value'`
    #[default]
    Exact,
    /// `field LIKE '%value%'`
    Substring,
}

/// The serializable part of a converter's setup.
///
/// ```rust
/// use lucene2sql::{ConverterConfig, Dialect, KeywordMatch};
///
/// let config = ConverterConfig::from_json(r#"{"dialect": "postgres"}"#).unwrap();
///
/// assert_eq!(config.dialect, Dialect::PostgreSQL);
/// assert_eq!(config.keyword_match, KeywordMatch::Exact);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    pub dialect: Dialect,
    pub keyword_match: KeywordMatch,
    /// Used for date fields whose property has no format.
    pub default_date_format: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            keyword_match: KeywordMatch::default(),
            default_date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ConverterConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}

type BoxedSchema = Box<dyn Schema + Send + Sync>;
type BoxedTokenizer = Box<dyn Tokenizer + Send + Sync>;
type BoxedDateMath = Box<dyn DateMath + Send + Sync>;

/// Translates Lucene queries into SQL `WHERE` fragments.
///
/// ```rust
/// use lucene2sql::{schema::{FieldType, Mapping}, Dialect, SqlConverter};
///
/// let converter = SqlConverter::builder()
///     .dialect(Dialect::SQLite)
///     .schema(Mapping::new().field("name", FieldType::Keyword).field("age", FieldType::Number))
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     converter.lucene_to_sql("name:alice AND age:[18 TO *]"),
///     Ok("name = 'alice' AND age >= 18".to_string())
/// );
/// ```
pub struct SqlConverter {
    dialect: Dialect,
    keyword_match: KeywordMatch,
    default_date_format: String,
    schema: BoxedSchema,
    tokenizers: HashMap<String, BoxedTokenizer>,
    date_math: BoxedDateMath,
}

#[derive(Default)]
pub struct SqlConverterBuilder {
    config: ConverterConfig,
    schema: Option<BoxedSchema>,
    tokenizers: HashMap<String, BoxedTokenizer>,
    date_math: Option<BoxedDateMath>,
}

impl SqlConverterBuilder {
    pub fn config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    pub fn keyword_match(mut self, keyword_match: KeywordMatch) -> Self {
        self.config.keyword_match = keyword_match;
        self
    }

    pub fn default_date_format<S: Into<String>>(mut self, format: S) -> Self {
        self.config.default_date_format = format.into();
        self
    }

    pub fn schema<S: Schema + Send + Sync + 'static>(mut self, schema: S) -> Self {
        self.schema = Some(Box::new(schema));
        self
    }

    /// Bind a tokenizer to a text field.
    pub fn tokenizer<F, T>(mut self, field: F, tokenizer: T) -> Self
    where
        F: Into<String>,
        T: Tokenizer + Send + Sync + 'static,
    {
        self.tokenizers.insert(field.into(), Box::new(tokenizer));
        self
    }

    pub fn date_math<D: DateMath + Send + Sync + 'static>(mut self, date_math: D) -> Self {
        self.date_math = Some(Box::new(date_math));
        self
    }

    pub fn build(self) -> Result<SqlConverter, Error> {
        let schema = self
            .schema
            .ok_or_else(|| Error::Config("schema is required".to_string()))?;
        if self.config.default_date_format.trim().is_empty() {
            return Err(Error::Config("default date format is empty".to_string()));
        }
        Ok(SqlConverter {
            dialect: self.config.dialect,
            keyword_match: self.config.keyword_match,
            default_date_format: self.config.default_date_format,
            schema,
            tokenizers: self.tokenizers,
            date_math: self
                .date_math
                .unwrap_or_else(|| Box::new(DateMathParser::new())),
        })
    }
}

impl SqlConverter {
    pub fn builder() -> SqlConverterBuilder {
        SqlConverterBuilder::default()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Translate a parsed query.
    pub fn convert(&self, query: &Query) -> Result<String, Error> {
        if log_enabled!(Level::Debug) {
            debug!("converting `{}` for {}", build_query(query)?, self.dialect);
        }
        let sql = self.walk(query)?;
        debug!("converted to `{}`", sql);
        Ok(sql)
    }

    /// Parse and translate query text.
    pub fn lucene_to_sql(&self, query: &str) -> Result<String, Error> {
        let ast = parse_query(query)?;
        self.convert(&ast)
    }

    fn walk(&self, query: &Query) -> Result<String, Error> {
        visit(query, &mut ToSql::new(self))
    }
}

struct ToSql<'c> {
    conv: &'c SqlConverter,
}

impl<'c> ToSql<'c> {
    fn new(conv: &'c SqlConverter) -> Self {
        Self { conv }
    }
}

impl Visit for ToSql<'_> {
    type Result = Result<String, Error>;

    fn visit_or(&mut self, node: &Query) -> Self::Result {
        if node.ands.is_empty() {
            return Err(Error::MalformedQuery("empty OR-list".to_string()));
        }
        let mut clause = Clause::or();
        for and in &node.ands {
            clause.push(&self.visit_and(and)?);
        }
        Ok(clause.finish())
    }

    fn visit_and(&mut self, node: &AndExpr<FieldTerm>) -> Self::Result {
        if node.items.is_empty() {
            return Err(Error::MalformedQuery("empty AND-list".to_string()));
        }
        let mut clause = Clause::and();
        for item in &node.items {
            let sql = visit_item(item, self)?;
            match &item.operand {
                Operand::Paren(_)
                | Operand::Leaf(FieldTerm {
                    term: Term::Group(_),
                    ..
                }) => clause.push_group(&sql, item.negated),
                Operand::Leaf(_) if item.negated => clause.push_not(&sql),
                Operand::Leaf(_) => clause.push(&sql),
            }
        }
        Ok(clause.finish())
    }

    fn visit_paren(&mut self, node: &Query) -> Self::Result {
        self.visit_or(node)
    }

    fn visit_field_term(&mut self, node: &FieldTerm) -> Self::Result {
        self.conv.encode(node)
    }
}
