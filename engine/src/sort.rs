//! Sorting of wrapped entities by field or key extractor.
//!
//! # Comparison policy
//!
//! - `null` (or a missing field) sorts first ascending, last descending.
//! - Values of different JSON types are compared as their string forms.
//! - Otherwise numbers compare numerically, strings lexicographically and
//!   booleans with `false < true`. Arrays and objects compare by string form.
//!
//! Mixed-type keys do not form a total order, so the sort here is a merge
//! sort that stays well-defined for any comparator. Equal keys keep their
//! input order; there is no secondary key.

use crate::WrappedEntity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Extracts a sort key from an entity.
pub type KeyFn = Rc<dyn Fn(&WrappedEntity) -> Value>;

/// What to sort by.
#[derive(Clone)]
pub enum OrderBy {
    /// Value of a named field (`null` when missing)
    Field(String),
    /// Value computed by a closure. Dates are expected as millisecond
    /// numbers or ISO-8601 strings, which both order correctly.
    Key(KeyFn),
}

impl OrderBy {
    fn extract(&self, entity: &WrappedEntity) -> Value {
        match self {
            OrderBy::Field(field) => entity.get(field).cloned().unwrap_or(Value::Null),
            OrderBy::Key(key) => key(entity),
        }
    }
}

impl fmt::Debug for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBy::Field(field) => f.debug_tuple("Field").field(field).finish(),
            OrderBy::Key(_) => f.write_str("Key(<fn>)"),
        }
    }
}

/// Options accepted by [`sort_entities`] and `get_where_array`.
#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    pub order_by: Option<OrderBy>,
    pub sort_by: SortDirection,
}

impl SortOptions {
    /// No ordering: results keep their natural order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Order by a named field, ascending.
    pub fn by_field(field: impl Into<String>) -> Self {
        Self {
            order_by: Some(OrderBy::Field(field.into())),
            sort_by: SortDirection::Asc,
        }
    }

    /// Order by a computed key, ascending.
    pub fn by_key(key: impl Fn(&WrappedEntity) -> Value + 'static) -> Self {
        Self {
            order_by: Some(OrderBy::Key(Rc::new(key))),
            sort_by: SortDirection::Asc,
        }
    }

    pub fn ascending(self) -> Self {
        self.direction(SortDirection::Asc)
    }

    pub fn descending(self) -> Self {
        self.direction(SortDirection::Desc)
    }

    pub fn direction(mut self, sort_by: SortDirection) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Sort entities according to `options`.
///
/// Without `order_by` the input is returned as is. Otherwise a new vector is
/// produced; the entities themselves are never modified.
pub fn sort_entities<'a>(
    list: Vec<&'a WrappedEntity>,
    options: &SortOptions,
) -> Vec<&'a WrappedEntity> {
    let Some(order_by) = &options.order_by else {
        return list;
    };

    let keyed: Vec<(Value, &'a WrappedEntity)> = list
        .into_iter()
        .map(|entity| (order_by.extract(entity), entity))
        .collect();

    let direction = options.sort_by;
    let compare = |(a, _): &(Value, &WrappedEntity), (b, _): &(Value, &WrappedEntity)| {
        let ordering = compare_values(a, b);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    };

    merge_sort_by(keyed, &compare)
        .into_iter()
        .map(|(_, entity)| entity)
        .collect()
}

/// Compare two sort keys under the policy described in the module docs.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(0.0);
                let y = y.as_f64().unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => coerce_to_string(a).cmp(&coerce_to_string(b)),
    }
}

/// String form of a value, as used for mixed-type comparison.
fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            // Integral floats print without a fraction, like integers do.
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn merge_sort_by<T>(mut items: Vec<T>, compare: &impl Fn(&T, &T) -> Ordering) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }

    merged
}
