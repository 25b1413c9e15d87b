//! Per dialect syntax of the match operators SQL has no common form for.
//!
//! | dialect    | regexp                | wildcard     | fuzzy                           |
//! |------------|-----------------------|--------------|---------------------------------|
//! | SQL99      | `f SIMILAR TO 'p'`    | `f LIKE 'p'` | -                               |
//! | SQLite     | `f REGEXP 'p'`        | `f GLOB 'p'` | -                               |
//! | MySQL      | `f REGEXP 'p'`        | `f LIKE 'p'` | -                               |
//! | Oracle     | `regexp_like(f, 'p')` | `f LIKE 'p'` | -                               |
//! | PostgreSQL | `f SIMILAR TO 'p'`    | `f LIKE 'p'` | `levenshtein(f, 'v') <= n`      |
//! | ClickHouse | `match(f, 'p')`       | `f LIKE 'p'` | `multiFuzzyMatchAny(f, n, 'v')` |

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{clause::quote, parser::syn::WildcardToken};

/// Escape character of LIKE patterns. Never a backslash, MySQL string
/// literals unescape those.
const LIKE_ESCAPE: char = '!';

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    #[default]
    Standard, // SQL99
    SQLite,
    MySQL,
    Oracle,
    PostgreSQL,
    ClickHouse,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Dialect::Standard => "SQL99",
            Dialect::SQLite => "SQLite",
            Dialect::MySQL => "MySQL",
            Dialect::Oracle => "Oracle",
            Dialect::PostgreSQL => "PostgreSQL",
            Dialect::ClickHouse => "ClickHouse",
        })
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "sql99" => Ok(Dialect::Standard),
            "sqlite" => Ok(Dialect::SQLite),
            "mysql" => Ok(Dialect::MySQL),
            "oracle" => Ok(Dialect::Oracle),
            "postgresql" | "postgres" => Ok(Dialect::PostgreSQL),
            "clickhouse" => Ok(Dialect::ClickHouse),
            _ => Err(format!("unknown SQL dialect `{}`", s)),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Dialect> for String {
    fn from(d: Dialect) -> Self {
        d.to_string()
    }
}

/// Match operators whose syntax depends on the dialect.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Regexp,
    Wildcard,
    Fuzzy,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Operation::Regexp => "regexp",
            Operation::Wildcard => "wildcard",
            Operation::Fuzzy => "fuzzy",
        })
    }
}

impl Dialect {
    /// Regular expression match, `pattern` is raw (unescaped).
    pub fn regexp(self, field: &str, pattern: &str) -> String {
        let pattern = quote(pattern);
        match self {
            Dialect::SQLite | Dialect::MySQL => format!("{} REGEXP {}", field, pattern),
            Dialect::Oracle => format!("regexp_like({}, {})", field, pattern),
            Dialect::ClickHouse => format!("match({}, {})", field, pattern),
            Dialect::Standard | Dialect::PostgreSQL => format!("{} SIMILAR TO {}", field, pattern),
        }
    }

    /// Wildcard match. SQLite GLOB takes `?` and `*` as they are, everybody
    /// else gets a LIKE pattern. Literal text is escaped so it never acts as
    /// a wildcard: `[*]` style classes for GLOB, `ESCAPE '!'` for LIKE, added
    /// only when some character needed it.
    pub fn wildcard(self, field: &str, tokens: &[WildcardToken]) -> String {
        let glob = self == Dialect::SQLite;
        let mut pattern = String::new();
        let mut escaped = false;
        for tk in tokens {
            match tk {
                WildcardToken::AnyChar => pattern.push(if glob { '?' } else { '_' }),
                WildcardToken::AnyString => pattern.push(if glob { '*' } else { '%' }),
                WildcardToken::Literal(v) => {
                    for c in v.chars() {
                        match c {
                            '*' | '?' | '[' if glob => {
                                pattern.push('[');
                                pattern.push(c);
                                pattern.push(']');
                            }
                            '%' | '_' | LIKE_ESCAPE if !glob => {
                                pattern.push(LIKE_ESCAPE);
                                pattern.push(c);
                                escaped = true;
                            }
                            _ => pattern.push(c),
                        }
                    }
                }
            }
        }
        match (glob, escaped) {
            (true, _) => format!("{} GLOB {}", field, quote(&pattern)),
            (false, false) => format!("{} LIKE {}", field, quote(&pattern)),
            (false, true) => format!("{} LIKE {} ESCAPE '{}'", field, quote(&pattern), LIKE_ESCAPE),
        }
    }

    /// Edit distance match, `None` when the dialect has no such function.
    pub fn fuzzy(self, field: &str, value: &str, distance: u32) -> Option<String> {
        match self {
            // needs `CREATE EXTENSION fuzzystrmatch`
            Dialect::PostgreSQL => Some(format!(
                "levenshtein({}, {}) <= {}",
                field,
                quote(value),
                distance
            )),
            Dialect::ClickHouse => Some(format!(
                "multiFuzzyMatchAny({}, {}, {})",
                field,
                distance,
                quote(value)
            )),
            Dialect::Standard | Dialect::SQLite | Dialect::MySQL | Dialect::Oracle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dialect::Dialect;
    use crate::parser::syn::WildcardToken;

    const ALL: [Dialect; 6] = [
        Dialect::Standard,
        Dialect::SQLite,
        Dialect::MySQL,
        Dialect::Oracle,
        Dialect::PostgreSQL,
        Dialect::ClickHouse,
    ];

    #[test]
    fn test_regexp() {
        let expected = [
            "f SIMILAR TO 'x''x+'",
            "f REGEXP 'x''x+'",
            "f REGEXP 'x''x+'",
            "regexp_like(f, 'x''x+')",
            "f SIMILAR TO 'x''x+'",
            "match(f, 'x''x+')",
        ];
        for (dialect, sql) in ALL.iter().zip(expected) {
            assert_eq!(dialect.regexp("f", "x'x+"), sql, "{}", dialect);
        }
    }

    #[test]
    fn test_wildcard() {
        let tokens = vec![
            WildcardToken::Literal("x'x".into()),
            WildcardToken::AnyChar,
            WildcardToken::Literal("x".into()),
            WildcardToken::AnyString,
        ];
        for dialect in ALL {
            let sql = dialect.wildcard("f", &tokens);
            match dialect {
                Dialect::SQLite => assert_eq!(sql, "f GLOB 'x''x?x*'"),
                _ => assert_eq!(sql, "f LIKE 'x''x_x%'", "{}", dialect),
            }
        }
    }

    #[test]
    fn test_wildcard_escapes_literals() {
        let lit = |v: &'static str| WildcardToken::Literal(v.into());
        let tests = [
            (vec![lit("a*b"), WildcardToken::AnyString], "f GLOB 'a[*]b*'", "f LIKE 'a*b%'"),
            (vec![lit("a?b"), WildcardToken::AnyChar], "f GLOB 'a[?]b?'", "f LIKE 'a?b_'"),
            (vec![lit("[x]"), WildcardToken::AnyString], "f GLOB '[[]x]*'", "f LIKE '[x]%'"),
            (
                vec![lit("50%"), WildcardToken::AnyString],
                "f GLOB '50%*'",
                "f LIKE '50!%%' ESCAPE '!'",
            ),
            (
                vec![lit("a_b!"), WildcardToken::AnyChar],
                "f GLOB 'a_b!?'",
                "f LIKE 'a!_b!!_' ESCAPE '!'",
            ),
        ];
        for (tokens, glob, like) in tests {
            for dialect in ALL {
                let expected = match dialect {
                    Dialect::SQLite => glob,
                    _ => like,
                };
                assert_eq!(dialect.wildcard("f", &tokens), expected, "{} {:?}", dialect, tokens);
            }
        }
    }

    #[test]
    fn test_fuzzy() {
        for dialect in ALL {
            let sql = dialect.fuzzy("f", "you'", 2);
            match dialect {
                Dialect::PostgreSQL => {
                    assert_eq!(sql.as_deref(), Some("levenshtein(f, 'you''') <= 2"))
                }
                Dialect::ClickHouse => {
                    assert_eq!(sql.as_deref(), Some("multiFuzzyMatchAny(f, 2, 'you''')"))
                }
                _ => assert_eq!(sql, None, "{}", dialect),
            }
        }
    }

    #[test]
    fn test_parse_dialect() {
        for dialect in ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(dialect));
        }
        assert_eq!("postgres".parse::<Dialect>(), Ok(Dialect::PostgreSQL));
        assert_eq!("SQLITE".parse::<Dialect>(), Ok(Dialect::SQLite));
        assert!("db2".parse::<Dialect>().is_err());
        assert_eq!(
            serde_json::from_str::<Dialect>(r#""clickhouse""#).unwrap(),
            Dialect::ClickHouse
        );
        assert_eq!(serde_json::to_string(&Dialect::MySQL).unwrap(), r#""MySQL""#);
    }
}
