use super::Document;
use serde_json::Value;
use std::cmp::Ordering;

/// Match rule for a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// JSON equality.
    Exact(Value),
    /// Equal to a JSON string, or to a number rendered in decimal.
    Text(String),
}

impl Condition {
    fn matches(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Condition::Exact(expected), Some(actual)) => expected == actual,
            (Condition::Text(expected), Some(Value::String(actual))) => expected == actual,
            (Condition::Text(expected), Some(Value::Number(actual))) => {
                *expected == actual.to_string()
            }
            _ => false,
        }
    }
}

/// Conjunction of field conditions. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, Condition::Exact(value.into()))
    }

    pub fn text(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::all().and(field, Condition::Text(value.into()))
    }

    pub fn and(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.conditions.push((field.into(), condition));
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition.matches(document.get(field)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    /// Compare two documents on the sort field.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Missing < null < bool < number < string; arrays and objects compare equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Filter, optional sort and optional limit for `find`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::all().matches(&doc(json!({}))));
        assert!(Filter::all().matches(&doc(json!({"id": 3}))));
    }

    #[test]
    fn text_condition_matches_strings_and_numbers() {
        let filter = Filter::text("dealership", "15");
        assert!(filter.matches(&doc(json!({"dealership": 15}))));
        assert!(filter.matches(&doc(json!({"dealership": "15"}))));
        assert!(!filter.matches(&doc(json!({"dealership": 150}))));
        assert!(!filter.matches(&doc(json!({"dealership": "015"}))));
        assert!(!filter.matches(&doc(json!({"name": "15"}))));
    }

    #[test]
    fn exact_condition_is_type_sensitive() {
        let filter = Filter::equals("id", 7);
        assert!(filter.matches(&doc(json!({"id": 7}))));
        assert!(!filter.matches(&doc(json!({"id": "7"}))));
    }

    #[test]
    fn state_match_is_case_sensitive() {
        let filter = Filter::equals("state", "Texas");
        assert!(filter.matches(&doc(json!({"state": "Texas"}))));
        assert!(!filter.matches(&doc(json!({"state": "texas"}))));
    }

    #[test]
    fn conditions_are_conjunctive() {
        let filter = Filter::equals("state", "Kansas").and("id", Condition::Exact(json!(2)));
        assert!(filter.matches(&doc(json!({"state": "Kansas", "id": 2}))));
        assert!(!filter.matches(&doc(json!({"state": "Kansas", "id": 3}))));
    }

    #[test]
    fn descending_sort_orders_numbers_numerically() {
        let sort = Sort {
            field: "id".into(),
            direction: SortDirection::Descending,
        };
        let mut docs = vec![
            doc(json!({"id": 2})),
            doc(json!({"id": 10})),
            doc(json!({})),
            doc(json!({"id": 9})),
        ];
        docs.sort_by(|a, b| sort.compare(a, b));

        let ids: Vec<Option<i64>> = docs
            .iter()
            .map(|d| d.get("id").and_then(Value::as_i64))
            .collect();
        assert_eq!(ids, vec![Some(10), Some(9), Some(2), None]);
    }
}
