use std::collections::BTreeMap;

use crate::tag::Tag;

/// A single value of one of the eight record kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    Double(f64),
    String(String),
    BooleanArray(Vec<bool>),
    IntegerArray(Vec<i32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
}

impl Value {
    /// The wire tag for this value.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Boolean(_) => Tag::Boolean,
            Value::Integer(_) => Tag::Integer,
            Value::Double(_) => Tag::Double,
            Value::String(_) => Tag::String,
            Value::BooleanArray(_) => Tag::BooleanArray,
            Value::IntegerArray(_) => Tag::IntegerArray,
            Value::DoubleArray(_) => Tag::DoubleArray,
            Value::StringArray(_) => Tag::StringArray,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Value::BooleanArray(v)
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::IntegerArray(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::DoubleArray(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StringArray(v)
    }
}

/// A named value, as yielded by [`Record::fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn tag(&self) -> Tag {
        self.value.tag()
    }
}

/// A transient set of named values, one mapping per value kind.
///
/// Producers fill a record right before it is written and consumers drain it
/// right after it is read. The same name may be used in several mappings
/// without conflict; within one mapping names are unique.
///
/// Mappings are ordered by name, which fixes the order entries are written in.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Record {
    pub booleans: BTreeMap<String, bool>,
    pub integers: BTreeMap<String, i32>,
    pub doubles: BTreeMap<String, f64>,
    pub strings: BTreeMap<String, String>,
    pub boolean_arrays: BTreeMap<String, Vec<bool>>,
    pub integer_arrays: BTreeMap<String, Vec<i32>>,
    pub double_arrays: BTreeMap<String, Vec<f64>>,
    pub string_arrays: BTreeMap<String, Vec<String>>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty all eight mappings.
    pub fn clear(&mut self) {
        self.booleans.clear();
        self.integers.clear();
        self.doubles.clear();
        self.strings.clear();
        self.boolean_arrays.clear();
        self.integer_arrays.clear();
        self.double_arrays.clear();
        self.string_arrays.clear();
    }

    /// Total number of entries across all mappings.
    pub fn len(&self) -> usize {
        self.booleans.len()
            + self.integers.len()
            + self.doubles.len()
            + self.strings.len()
            + self.boolean_arrays.len()
            + self.integer_arrays.len()
            + self.double_arrays.len()
            + self.string_arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a value in the mapping for its kind, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        match value.into() {
            Value::Boolean(v) => self.booleans.insert(name, v).map(Value::Boolean),
            Value::Integer(v) => self.integers.insert(name, v).map(Value::Integer),
            Value::Double(v) => self.doubles.insert(name, v).map(Value::Double),
            Value::String(v) => self.strings.insert(name, v).map(Value::String),
            Value::BooleanArray(v) => self.boolean_arrays.insert(name, v).map(Value::BooleanArray),
            Value::IntegerArray(v) => self.integer_arrays.insert(name, v).map(Value::IntegerArray),
            Value::DoubleArray(v) => self.double_arrays.insert(name, v).map(Value::DoubleArray),
            Value::StringArray(v) => self.string_arrays.insert(name, v).map(Value::StringArray),
        }
    }

    /// Look up a name in the mapping for `tag`.
    pub fn get(&self, tag: Tag, name: &str) -> Option<Value> {
        match tag {
            Tag::Boolean => self.booleans.get(name).copied().map(Value::Boolean),
            Tag::Integer => self.integers.get(name).copied().map(Value::Integer),
            Tag::Double => self.doubles.get(name).copied().map(Value::Double),
            Tag::String => self.strings.get(name).cloned().map(Value::String),
            Tag::BooleanArray => self.boolean_arrays.get(name).cloned().map(Value::BooleanArray),
            Tag::IntegerArray => self.integer_arrays.get(name).cloned().map(Value::IntegerArray),
            Tag::DoubleArray => self.double_arrays.get(name).cloned().map(Value::DoubleArray),
            Tag::StringArray => self.string_arrays.get(name).cloned().map(Value::StringArray),
        }
    }

    /// Remove a name from the mapping for `tag`.
    pub fn remove(&mut self, tag: Tag, name: &str) -> Option<Value> {
        match tag {
            Tag::Boolean => self.booleans.remove(name).map(Value::Boolean),
            Tag::Integer => self.integers.remove(name).map(Value::Integer),
            Tag::Double => self.doubles.remove(name).map(Value::Double),
            Tag::String => self.strings.remove(name).map(Value::String),
            Tag::BooleanArray => self.boolean_arrays.remove(name).map(Value::BooleanArray),
            Tag::IntegerArray => self.integer_arrays.remove(name).map(Value::IntegerArray),
            Tag::DoubleArray => self.double_arrays.remove(name).map(Value::DoubleArray),
            Tag::StringArray => self.string_arrays.remove(name).map(Value::StringArray),
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.booleans.get(name).copied()
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.integers.get(name).copied()
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        self.doubles.get(name).copied()
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.strings.get(name).map(String::as_str)
    }

    /// Every entry in wire order: scalar kinds first, then arrays, names sorted within a kind.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        fn named<'a, T: Clone + 'a>(
            map: &'a BTreeMap<String, T>,
            wrap: fn(T) -> Value,
        ) -> impl Iterator<Item = Field> + 'a {
            map.iter().map(move |(name, v)| Field {
                name: name.clone(),
                value: wrap(v.clone()),
            })
        }

        named(&self.booleans, Value::Boolean)
            .chain(named(&self.integers, Value::Integer))
            .chain(named(&self.doubles, Value::Double))
            .chain(named(&self.strings, Value::String))
            .chain(named(&self.boolean_arrays, Value::BooleanArray))
            .chain(named(&self.integer_arrays, Value::IntegerArray))
            .chain(named(&self.double_arrays, Value::DoubleArray))
            .chain(named(&self.string_arrays, Value::StringArray))
    }
}

impl<N: Into<String>, V: Into<Value>> FromIterator<(N, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}
