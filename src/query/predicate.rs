//! Typed record and scope constraints.
//!
//! A [`Predicate`] captures one comparison against a column value. Each
//! predicate can render itself into a parameterized SQL fragment for the
//! PostgreSQL backend and can evaluate itself directly against a value for
//! the in-memory backend, with matching semantics in both paths.

use regex::Regex;
use sqlx::postgres::PgHasArrayType;
use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// A single comparison applied to a scope column or a record value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<T> {
    Equal(T),
    NotEqual(T),
    GreaterThan(T),
    GreaterOrEqual(T),
    LessThan(T),
    LessOrEqual(T),
    /// Inclusive range check, `lo <= value <= hi`.
    Between(T, T),
    In(Vec<T>),
    NotIn(Vec<T>),
    /// SQL `LIKE` pattern with `%` and `_` wildcards and `\` escapes.
    Like(String),
}

impl<T> Predicate<T> {
    /// Raw `LIKE` pattern; wildcards in `pattern` are interpreted.
    pub fn like(pattern: impl Into<String>) -> Self {
        Predicate::Like(pattern.into())
    }

    /// Match values containing `fragment` literally.
    pub fn contains(fragment: &str) -> Self {
        Predicate::Like(format!("%{}%", escape_like(fragment)))
    }

    /// Match values starting with `prefix` literally.
    pub fn starts_with(prefix: &str) -> Self {
        Predicate::Like(format!("{}%", escape_like(prefix)))
    }

    /// Match values ending with `suffix` literally.
    pub fn ends_with(suffix: &str) -> Self {
        Predicate::Like(format!("%{}", escape_like(suffix)))
    }
}

impl<T> Predicate<T>
where
    T: PartialOrd + ToString,
{
    /// Evaluate the predicate against a concrete value.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Predicate::Equal(v) => value == v,
            Predicate::NotEqual(v) => value != v,
            Predicate::GreaterThan(v) => value > v,
            Predicate::GreaterOrEqual(v) => value >= v,
            Predicate::LessThan(v) => value < v,
            Predicate::LessOrEqual(v) => value <= v,
            Predicate::Between(lo, hi) => value >= lo && value <= hi,
            Predicate::In(values) => values.iter().any(|v| v == value),
            Predicate::NotIn(values) => values.iter().all(|v| v != value),
            Predicate::Like(pattern) => like_matches(pattern, &value.to_string()),
        }
    }
}

impl<T> Predicate<T>
where
    T: Clone + Send + Type<Postgres> + for<'q> Encode<'q, Postgres> + PgHasArrayType + 'static,
{
    /// Append `AND <column> <op> <binds>` to a query under construction.
    ///
    /// Values are always bound, never interpolated; `column` must be a
    /// trusted identifier.
    pub(crate) fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>, column: &str) {
        builder.push(" AND ");
        builder.push(column);
        match self {
            Predicate::Equal(v) => {
                builder.push(" = ");
                builder.push_bind(v.clone());
            }
            Predicate::NotEqual(v) => {
                builder.push(" <> ");
                builder.push_bind(v.clone());
            }
            Predicate::GreaterThan(v) => {
                builder.push(" > ");
                builder.push_bind(v.clone());
            }
            Predicate::GreaterOrEqual(v) => {
                builder.push(" >= ");
                builder.push_bind(v.clone());
            }
            Predicate::LessThan(v) => {
                builder.push(" < ");
                builder.push_bind(v.clone());
            }
            Predicate::LessOrEqual(v) => {
                builder.push(" <= ");
                builder.push_bind(v.clone());
            }
            Predicate::Between(lo, hi) => {
                builder.push(" BETWEEN ");
                builder.push_bind(lo.clone());
                builder.push(" AND ");
                builder.push_bind(hi.clone());
            }
            Predicate::In(values) => {
                builder.push(" = ANY(");
                builder.push_bind(values.clone());
                builder.push(")");
            }
            Predicate::NotIn(values) => {
                builder.push(" <> ALL(");
                builder.push_bind(values.clone());
                builder.push(")");
            }
            Predicate::Like(pattern) => {
                builder.push(" LIKE ");
                builder.push_bind(pattern.clone());
            }
        }
    }
}

/// Escape `LIKE` metacharacters so a fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Evaluate a SQL `LIKE` pattern against a value, mirroring PostgreSQL
/// semantics: `%` matches any run of characters, `_` matches exactly one,
/// and `\` escapes the next character.
pub(crate) fn like_matches(pattern: &str, value: &str) -> bool {
    Regex::new(&like_to_regex(pattern)).map_or(false, |re| re.is_match(value))
}

fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push_str("(?s)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => regex.push_str(&regex::escape(&escaped.to_string())),
                // A trailing backslash is taken literally
                None => regex.push_str(&regex::escape("\\")),
            },
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    regex
}
