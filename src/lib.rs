//! Converts Lucene query text into a SQL predicate ready to go after `WHERE`.
//! Every field must be in the schema, its type decides the SQL shape:
//!
//! - `age:67` -> `age = 67`
//! - `name:"xx 'you'"` -> `name = 'xx ''you'''`
//! - `title:rust` -> `title LIKE '%rust%'`
//! - `ts:[2022-01-01 TO 2022-02-01}` -> `ts >= '2022-01-01 00:00:00' AND ts < '2022-02-01 00:00:00'`
//! - `age:[* TO *]` -> `age IS NOT NULL`
//! - `name:jo?n*` -> `name LIKE 'jo_n%'` (`name GLOB 'jo?n*'` in SQLite)
//! - `name:50%*` -> `name LIKE '50!%%' ESCAPE '!'` (`name GLOB '50%*'` in SQLite)
//! - `name:/jo.*/` -> `name REGEXP 'jo.*'` (SQLite, MySQL), `match(name, 'jo.*')` (ClickHouse), ...
//! - `name:roam~2` -> `levenshtein(name, 'roam') <= 2` (PostgreSQL), other dialects but ClickHouse fail
//! - `NOT age:1` -> `NOT (age = 1)`
//! - `name:(a OR b) AND NOT (age:1 OR age:2)` -> `( name = 'a' OR name = 'b' ) AND NOT ( age = 1 OR age = 2 )`

pub mod clause;
mod convert;
pub mod datemath;
pub mod dialect;
pub mod error;
pub mod parser;
pub mod schema;
pub mod tokenizer;

pub use convert::{
    ConverterConfig, KeywordMatch, SqlConverter, SqlConverterBuilder, DEFAULT_DATE_FORMAT,
};
pub use dialect::Dialect;
pub use error::Error;

/// Convert query text to a SQL predicate
///
/// ```rust
/// use lucene2sql::{lucene2sql, schema::{FieldType, Mapping}, Dialect, SqlConverter};
///
/// let converter = SqlConverter::builder()
///     .dialect(Dialect::PostgreSQL)
///     .schema(
///         Mapping::new()
///             .field("name", FieldType::Keyword)
///             .field("age", FieldType::Number)
///             .field("title", FieldType::Text),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(lucene2sql("age:67", &converter), Ok("age = 67".to_string()));
/// assert_eq!(lucene2sql("age:{18 TO 65]", &converter), Ok("age > 18 AND age <= 65".to_string()));
/// assert_eq!(lucene2sql("title:rust", &converter), Ok("title LIKE '%rust%'".to_string()));
/// assert_eq!(lucene2sql("name:roam~2", &converter), Ok("levenshtein(name, 'roam') <= 2".to_string()));
/// assert_eq!(
///     lucene2sql("name:(a OR b) AND NOT (age:1 OR age:2)", &converter),
///     Ok("( name = 'a' OR name = 'b' ) AND NOT ( age = 1 OR age = 2 )".to_string())
/// );
/// assert!(lucene2sql("size:1", &converter).is_err());
/// ```
pub fn lucene2sql(query: &str, converter: &SqlConverter) -> Result<String, Error> {
    // make AST from query text
    let ast = parser::parse_query(query)?;
    // walk the AST and render the predicate
    converter.convert(&ast)
}
