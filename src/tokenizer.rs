/// Splits a text field's search value into the tokens matched one by one.
///
/// Any `Fn(&str) -> Vec<String>` is a tokenizer:
///
/// ```rust
/// use lucene2sql::tokenizer::Tokenizer;
///
/// let dots = |s: &str| s.split('.').map(String::from).collect::<Vec<_>>();
/// assert_eq!(dots.split("a.b"), vec!["a", "b"]);
///
/// let words = |s: &str| s.split_whitespace().map(String::from).collect::<Vec<_>>();
/// assert_eq!(words.split(" a  b\tc "), vec!["a", "b", "c"]);
/// ```
pub trait Tokenizer {
    fn split(&self, value: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn split(&self, value: &str) -> Vec<String> {
        self(value)
    }
}
