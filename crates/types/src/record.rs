use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of domain data returned by an API call (one user, one market listing).
///
/// A record wraps the JSON element exactly as it appeared in the response array.
/// Its shape varies per profile and is never validated up front; a partially
/// populated record only fails when a caller actually needs the missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Resolve a dotted key path (`address.city`) against this record.
    pub fn get(&self, path: &str) -> Option<&Value> {
        value_at_path(&self.0, path)
    }

    /// Like [`Record::get`], but tells an absent key apart from a path that
    /// runs into a value with no fields.
    pub fn lookup(&self, path: &str) -> PathLookup<'_> {
        lookup_path(&self.0, path)
    }

    /// Resolve a dotted key path and return it when it is a JSON string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// Top-level keys in source order. Empty for non-object records.
    pub fn keys(&self) -> Vec<&str> {
        match &self.0 {
            Value::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Outcome of walking a dotted path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathLookup<'a> {
    Found(&'a Value),
    /// A key or index along the path does not exist, or an intermediate value is `null`.
    Absent,
    /// The path had to step into this value, which is a scalar (or an array
    /// addressed with a non-numeric segment).
    Blocked(&'a Value),
}

impl<'a> PathLookup<'a> {
    pub fn found(self) -> Option<&'a Value> {
        match self {
            PathLookup::Found(value) => Some(value),
            PathLookup::Absent | PathLookup::Blocked(_) => None,
        }
    }
}

/// Walk a dotted path through nested objects.
///
/// An empty path or `.` returns the value itself. Numeric segments index into
/// arrays so `tags.0` addresses the first tag.
pub fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    lookup_path(value, path).found()
}

/// [`value_at_path`] with the reason a lookup came back empty.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> PathLookup<'a> {
    if path.is_empty() || path == "." {
        return PathLookup::Found(value);
    }

    let mut current = value;
    for segment in path.split('.').filter(|segment| !segment.is_empty()) {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => match segment.parse::<usize>() {
                Ok(index) => items.get(index),
                Err(_) => return PathLookup::Blocked(current),
            },
            Value::Null => None,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => return PathLookup::Blocked(current),
        };
        match next {
            Some(value) => current = value,
            None => return PathLookup::Absent,
        }
    }
    PathLookup::Found(current)
}
