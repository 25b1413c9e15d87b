/// Quote a value as SQL string literal. This is the only place quotes get escaped.
///
/// ```rust
/// use lucene2sql::clause::quote;
///
/// assert_eq!(quote("xx 'you'"), "'xx ''you'''");
/// ```
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `LIKE` pattern matching `value` anywhere in the column.
pub fn contains(field: &str, value: &str) -> String {
    format!("{} LIKE {}", field, quote(&format!("%{}%", value)))
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Conj {
    And,
    Or,
}

impl Conj {
    fn sep(self) -> &'static str {
        match self {
            Conj::And => " AND ",
            Conj::Or => " OR ",
        }
    }
}

/// Accumulates the items of one boolean scope.
///
/// The first item goes in bare, every later one gets the scope's conjunction.
///
/// ```rust
/// use lucene2sql::clause::Clause;
///
/// let mut c = Clause::and();
/// c.push_not("a = 1");
/// c.push("b = 2");
/// c.push_group("c = 3 OR d = 4", true);
///
/// assert_eq!(c.finish(), "NOT (a = 1) AND b = 2 AND NOT ( c = 3 OR d = 4 )");
/// ```
#[derive(Debug)]
pub struct Clause {
    conj: Conj,
    empty: bool,
    out: String,
}

impl Clause {
    pub fn new(conj: Conj) -> Self {
        Self {
            conj,
            empty: true,
            out: String::new(),
        }
    }

    pub fn and() -> Self {
        Self::new(Conj::And)
    }

    pub fn or() -> Self {
        Self::new(Conj::Or)
    }

    fn write_sep(&mut self) {
        if !self.empty {
            self.out.push_str(self.conj.sep());
        }
        self.empty = false;
    }

    pub fn push(&mut self, item: &str) {
        self.write_sep();
        self.out.push_str(item);
    }

    /// Negated single clause, `NOT (item)`.
    pub fn push_not(&mut self, item: &str) {
        self.write_sep();
        self.out.push_str("NOT (");
        self.out.push_str(item);
        self.out.push(')');
    }

    /// Parenthesized sub-expression, optionally negated.
    pub fn push_group(&mut self, inner: &str, negated: bool) {
        self.write_sep();
        if negated {
            self.out.push_str("NOT ");
        }
        self.out.push_str("( ");
        self.out.push_str(inner);
        self.out.push_str(" )");
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn finish(self) -> String {
        self.out
    }
}
