//! Value formatter for log-safe rendering
//!
//! Converts values into short, human-readable strings before they are handed
//! to a log sink. Long values are cut at a maximum character count and marked
//! with [`ELLIPSIS`]. Containers are rendered one level deep as indented JSON,
//! with every element truncated on its own.
//!
//! # Example
//!
//! ```
//! use dailyelt_core::format::{format_for_log, truncate};
//!
//! assert_eq!(truncate(&42, 50), "42");
//! assert_eq!(truncate(&"abcdef", 3), "'ab...");
//! assert_eq!(format_for_log(&vec![1, 2], 50), "[\n    \"1\",\n    \"2\"\n]");
//! ```

use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// Marker appended to a rendering that was cut short
pub const ELLIPSIS: &str = "...";

/// Default maximum number of characters kept per rendered value
pub const DEFAULT_MAX_LEN: usize = 50;

const JSON_INDENT: &[u8] = b"    ";

/// A loggable value, one of the shapes the formatter knows how to render
#[derive(Debug, Clone, PartialEq)]
pub enum LogValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    /// Ordered, growable sequence
    List(Vec<LogValue>),
    /// Ordered, fixed-arity sequence
    Tuple(Vec<LogValue>),
    /// Key-value pairs in insertion order
    Map(Vec<(LogValue, LogValue)>),
    /// Unique elements, no guaranteed order
    Set(Vec<LogValue>),
}

impl LogValue {
    /// Build a map value from key-value pairs, keeping their order
    pub fn map<K, V, I>(pairs: I) -> Self
    where
        K: ToLogValue,
        V: ToLogValue,
        I: IntoIterator<Item = (K, V)>,
    {
        LogValue::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_log_value(), v.to_log_value()))
                .collect(),
        )
    }

    /// Numbers (and booleans) render unquoted; everything else is quoted
    fn renders_unquoted(&self) -> bool {
        matches!(
            self,
            LogValue::Bool(_) | LogValue::Int(_) | LogValue::UInt(_) | LogValue::Float(_)
        )
    }

    fn write_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Str(s) => write!(f, "'{}'", s),
            other => write!(f, "{}", other),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[LogValue]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.write_repr(f)?;
    }
    Ok(())
}

/// Compact natural form, used for scalars and for containers nested inside
/// another container
impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Null => f.write_str("null"),
            LogValue::Bool(b) => write!(f, "{}", b),
            LogValue::Int(n) => write!(f, "{}", n),
            LogValue::UInt(n) => write!(f, "{}", n),
            // Whole floats keep a fractional digit so they read as floats
            LogValue::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            LogValue::Float(x) => write!(f, "{}", x),
            LogValue::Str(s) => f.write_str(s),
            LogValue::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            LogValue::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                f.write_str(")")
            }
            LogValue::Map(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    k.write_repr(f)?;
                    f.write_str(": ")?;
                    v.write_repr(f)?;
                }
                f.write_str("}")
            }
            LogValue::Set(items) if items.is_empty() => f.write_str("set()"),
            LogValue::Set(items) => {
                f.write_str("{")?;
                write_joined(f, items)?;
                f.write_str("}")
            }
        }
    }
}

/// Conversion into the formatter's value model
pub trait ToLogValue {
    fn to_log_value(&self) -> LogValue;
}

impl ToLogValue for LogValue {
    fn to_log_value(&self) -> LogValue {
        self.clone()
    }
}

impl<T: ToLogValue + ?Sized> ToLogValue for &T {
    fn to_log_value(&self) -> LogValue {
        (**self).to_log_value()
    }
}

macro_rules! impl_numeric {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl ToLogValue for $t {
                fn to_log_value(&self) -> LogValue {
                    LogValue::$variant(*self as $target)
                }
            }
        )*
    };
}

impl_numeric!(Int as i64: i8, i16, i32, i64, isize);
impl_numeric!(UInt as u64: u8, u16, u32, u64, usize);
impl_numeric!(Float as f64: f32, f64);

impl ToLogValue for bool {
    fn to_log_value(&self) -> LogValue {
        LogValue::Bool(*self)
    }
}

impl ToLogValue for () {
    fn to_log_value(&self) -> LogValue {
        LogValue::Null
    }
}

impl ToLogValue for str {
    fn to_log_value(&self) -> LogValue {
        LogValue::Str(self.to_string())
    }
}

impl ToLogValue for String {
    fn to_log_value(&self) -> LogValue {
        LogValue::Str(self.clone())
    }
}

impl ToLogValue for char {
    fn to_log_value(&self) -> LogValue {
        LogValue::Str(self.to_string())
    }
}

impl ToLogValue for std::path::Path {
    fn to_log_value(&self) -> LogValue {
        LogValue::Str(self.display().to_string())
    }
}

impl ToLogValue for std::path::PathBuf {
    fn to_log_value(&self) -> LogValue {
        self.as_path().to_log_value()
    }
}

impl<Tz: chrono::TimeZone> ToLogValue for chrono::DateTime<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn to_log_value(&self) -> LogValue {
        LogValue::Str(self.to_string())
    }
}

impl ToLogValue for chrono::NaiveDate {
    fn to_log_value(&self) -> LogValue {
        LogValue::Str(self.to_string())
    }
}

impl<T: ToLogValue> ToLogValue for Option<T> {
    fn to_log_value(&self) -> LogValue {
        match self {
            Some(v) => v.to_log_value(),
            None => LogValue::Null,
        }
    }
}

impl<T: ToLogValue> ToLogValue for [T] {
    fn to_log_value(&self) -> LogValue {
        LogValue::List(self.iter().map(ToLogValue::to_log_value).collect())
    }
}

impl<T: ToLogValue, const N: usize> ToLogValue for [T; N] {
    fn to_log_value(&self) -> LogValue {
        self.as_slice().to_log_value()
    }
}

impl<T: ToLogValue> ToLogValue for Vec<T> {
    fn to_log_value(&self) -> LogValue {
        self.as_slice().to_log_value()
    }
}

impl<K: ToLogValue, V: ToLogValue, S> ToLogValue for HashMap<K, V, S> {
    fn to_log_value(&self) -> LogValue {
        LogValue::map(self.iter())
    }
}

impl<K: ToLogValue, V: ToLogValue> ToLogValue for BTreeMap<K, V> {
    fn to_log_value(&self) -> LogValue {
        LogValue::map(self.iter())
    }
}

impl<T: ToLogValue, S> ToLogValue for HashSet<T, S> {
    fn to_log_value(&self) -> LogValue {
        LogValue::Set(self.iter().map(ToLogValue::to_log_value).collect())
    }
}

impl<T: ToLogValue> ToLogValue for BTreeSet<T> {
    fn to_log_value(&self) -> LogValue {
        LogValue::Set(self.iter().map(ToLogValue::to_log_value).collect())
    }
}

macro_rules! impl_tuple {
    ($($name:ident),+) => {
        impl<$($name: ToLogValue),+> ToLogValue for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_log_value(&self) -> LogValue {
                let ($($name,)+) = self;
                LogValue::Tuple(vec![$($name.to_log_value()),+])
            }
        }
    };
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);

/// Render a scalar and cut it to `max_len` characters
///
/// Numbers render via their natural form (whole floats as `1.0`), booleans as
/// `true`/`false`, a missing value as `'null'`; every other value is quoted. When
/// the rendering is longer than `max_len` characters it keeps the first
/// `max_len` characters followed by [`ELLIPSIS`].
pub fn truncate<T: ToLogValue + ?Sized>(value: &T, max_len: usize) -> String {
    truncate_value(&value.to_log_value(), max_len)
}

/// Shape-aware rendering for logs
///
/// Sequences, maps and sets are rendered as indented JSON with each element
/// (and each map key) truncated independently; any other value goes through
/// [`truncate`].
pub fn format_for_log<T: ToLogValue + ?Sized>(value: &T, max_len: usize) -> String {
    format_value(&value.to_log_value(), max_len)
}

pub(crate) fn truncate_value(value: &LogValue, max_len: usize) -> String {
    let rendered = if value.renders_unquoted() {
        value.to_string()
    } else {
        format!("'{}'", value)
    };
    match rendered.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}{}", &rendered[..cut], ELLIPSIS),
        None => rendered,
    }
}

pub(crate) fn format_value(value: &LogValue, max_len: usize) -> String {
    match value {
        LogValue::List(items) | LogValue::Tuple(items) => {
            pretty_json(&truncate_all(items, max_len))
        }
        LogValue::Map(pairs) => {
            let rendered: Vec<(String, String)> = pairs
                .iter()
                .map(|(k, v)| (truncate_value(k, max_len), truncate_value(v, max_len)))
                .collect();
            pretty_json(&OrderedPairs(&rendered))
        }
        LogValue::Set(items) => {
            let array = pretty_json(&truncate_all(items, max_len));
            let inner = array
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .unwrap_or_default();
            format!("set([{}])", inner)
        }
        scalar => truncate_value(scalar, max_len),
    }
}

fn truncate_all(items: &[LogValue], max_len: usize) -> Vec<String> {
    items
        .iter()
        .map(|item| truncate_value(item, max_len))
        .collect()
}

/// Serializes as a JSON object without re-sorting the keys
struct OrderedPairs<'a>(&'a [(String, String)]);

impl Serialize for OrderedPairs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    // Only strings are serialized here, which cannot fail.
    if value.serialize(&mut ser).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
