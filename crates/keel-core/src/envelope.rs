//! Request envelopes passed across subsystem boundaries.
//!
//! An envelope is an immutable description of a single incoming operation:
//! identity (request id, current user), payload, and metadata. Envelopes are
//! constructed once per resolver invocation and consumed by exactly one
//! downstream subsystem.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Envelope for a command submission.
///
/// Consumed exactly once by the command dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Request correlation id, propagated unchanged from the resolver context.
    #[serde(rename = "requestID")]
    pub request_id: Uuid,
    /// Opaque current-user value (None for anonymous requests).
    pub current_user: Option<Value>,
    /// Declared command type name.
    pub type_name: String,
    /// Command input as submitted by the caller.
    pub value: Value,
    /// Declared schema version of the command type.
    pub version: u32,
}

/// Envelope for a read-model fetch or subscription registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadModelRequestEnvelope {
    /// Request correlation id, propagated unchanged from the resolver context.
    #[serde(rename = "requestID")]
    pub request_id: Uuid,
    /// Opaque current-user value (None for anonymous requests).
    pub current_user: Option<Value>,
    /// Declared read-model type name.
    pub type_name: String,
    /// Field name to comparison-operator criteria.
    pub filters: BTreeMap<String, PropertyFilter>,
    /// Optional page size limit.
    pub limit: Option<u32>,
    /// Optional pagination cursor from a previous page.
    pub after_cursor: Option<String>,
    /// True when the invoked field follows the paginated list naming
    /// convention.
    pub paginated: bool,
    /// Declared schema version of the read-model type.
    pub version: u32,
}

/// Request for a filtered search over stored events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSearchRequest {
    /// Request correlation id, propagated unchanged from the resolver context.
    #[serde(rename = "requestID")]
    pub request_id: Uuid,
    /// Opaque current-user value (None for anonymous requests).
    pub current_user: Option<Value>,
    /// Search criteria.
    pub filters: EventFilter,
}

/// Search criteria for the event reader.
///
/// At least one of `type` or `entity` must be provided; the GraphQL layer
/// validates this before dispatching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Event type name to match.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Entity type name to match.
    pub entity: Option<String>,
    /// Specific entity instance id to match.
    #[serde(rename = "entityID")]
    pub entity_id: Option<String>,
    /// Inclusive lower bound of the creation-time range (ISO-8601).
    pub from: Option<String>,
    /// Inclusive upper bound of the creation-time range (ISO-8601).
    pub to: Option<String>,
}

impl EventFilter {
    /// Returns true if the filter names an event type or an entity.
    ///
    /// Time-range-only searches are rejected by the event resolver.
    pub fn is_searchable(&self) -> bool {
        self.type_name.is_some() || self.entity.is_some()
    }
}

/// Descriptor of the GraphQL operation that opened a subscription.
///
/// Stored alongside the subscription registration so the read-model store
/// can re-execute the operation when matching data changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Operation name, when the document declares one.
    pub operation_name: Option<String>,
    /// The full operation document.
    pub query: String,
    /// Variables submitted with the operation.
    pub variables: Option<Value>,
}

/// Comparison operators applied to a single read-model field.
///
/// Field names follow the generated GraphQL filter-input convention
/// (`eq`, `ne`, `lt`, `lte`, `gt`, `gte`, `in`, `contains`, `beginsWith`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyFilter {
    /// Value equality.
    pub eq: Option<Value>,
    /// Value inequality.
    pub ne: Option<Value>,
    /// Strictly less than.
    pub lt: Option<Value>,
    /// Less than or equal.
    pub lte: Option<Value>,
    /// Strictly greater than.
    pub gt: Option<Value>,
    /// Greater than or equal.
    pub gte: Option<Value>,
    /// Membership in a set of values.
    #[serde(rename = "in")]
    pub is_in: Option<Vec<Value>>,
    /// Substring match for strings, element match for arrays.
    pub contains: Option<Value>,
    /// Prefix match for strings.
    pub begins_with: Option<Value>,
}

impl PropertyFilter {
    /// Creates an equality filter, the shape used for implicit id lookups.
    pub fn equals(value: Value) -> Self {
        Self {
            eq: Some(value),
            ..Self::default()
        }
    }

    /// Returns true if no operator is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates every set operator against a candidate value.
    ///
    /// Ordering operators compare numbers numerically and strings
    /// lexicographically; mixed-type comparisons never match.
    pub fn matches(&self, candidate: &Value) -> bool {
        if let Some(eq) = &self.eq
            && candidate != eq
        {
            return false;
        }
        if let Some(ne) = &self.ne
            && candidate == ne
        {
            return false;
        }
        if let Some(lt) = &self.lt
            && compare_values(candidate, lt) != Some(Ordering::Less)
        {
            return false;
        }
        if let Some(lte) = &self.lte
            && !matches!(
                compare_values(candidate, lte),
                Some(Ordering::Less | Ordering::Equal)
            )
        {
            return false;
        }
        if let Some(gt) = &self.gt
            && compare_values(candidate, gt) != Some(Ordering::Greater)
        {
            return false;
        }
        if let Some(gte) = &self.gte
            && !matches!(
                compare_values(candidate, gte),
                Some(Ordering::Greater | Ordering::Equal)
            )
        {
            return false;
        }
        if let Some(values) = &self.is_in
            && !values.contains(candidate)
        {
            return false;
        }
        if let Some(needle) = &self.contains
            && !contains_value(candidate, needle)
        {
            return false;
        }
        if let Some(prefix) = &self.begins_with {
            match (candidate.as_str(), prefix.as_str()) {
                (Some(c), Some(p)) if c.starts_with(p) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Partial ordering over JSON values: numbers numerically, strings
/// lexicographically, everything else unordered.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            l.as_f64().and_then(|l| r.as_f64().and_then(|r| l.partial_cmp(&r)))
        }
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Substring match for strings, element membership for arrays.
fn contains_value(candidate: &Value, needle: &Value) -> bool {
    match candidate {
        Value::String(s) => needle.as_str().is_some_and(|n| s.contains(n)),
        Value::Array(items) => items.contains(needle),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equals_filter() {
        let filter = PropertyFilter::equals(json!("c1"));
        assert!(filter.matches(&json!("c1")));
        assert!(!filter.matches(&json!("c2")));
    }

    #[test]
    fn test_ordering_on_numbers() {
        let filter = PropertyFilter {
            gte: Some(json!(2)),
            lt: Some(json!(10)),
            ..PropertyFilter::default()
        };
        assert!(filter.matches(&json!(2)));
        assert!(filter.matches(&json!(9.5)));
        assert!(!filter.matches(&json!(1)));
        assert!(!filter.matches(&json!(10)));
        // Mixed types never match ordering operators.
        assert!(!filter.matches(&json!("3")));
    }

    #[test]
    fn test_in_and_contains() {
        let filter = PropertyFilter {
            is_in: Some(vec![json!("a"), json!("b")]),
            ..PropertyFilter::default()
        };
        assert!(filter.matches(&json!("a")));
        assert!(!filter.matches(&json!("c")));

        let contains = PropertyFilter {
            contains: Some(json!("SKU-1")),
            ..PropertyFilter::default()
        };
        assert!(contains.matches(&json!("SKU-123")));
        assert!(contains.matches(&json!(["SKU-1", "SKU-2"])));
        assert!(!contains.matches(&json!(["SKU-2"])));
    }

    #[test]
    fn test_begins_with() {
        let filter = PropertyFilter {
            begins_with: Some(json!("ord-")),
            ..PropertyFilter::default()
        };
        assert!(filter.matches(&json!("ord-42")));
        assert!(!filter.matches(&json!("cart-42")));
        assert!(!filter.matches(&json!(42)));
    }

    #[test]
    fn test_filter_deserializes_graphql_operator_names() {
        let filter: PropertyFilter = serde_json::from_value(json!({
            "eq": "x",
            "in": ["x", "y"],
            "beginsWith": "x"
        }))
        .unwrap();
        assert_eq!(filter.eq, Some(json!("x")));
        assert_eq!(filter.is_in, Some(vec![json!("x"), json!("y")]));
        assert_eq!(filter.begins_with, Some(json!("x")));
    }

    #[test]
    fn test_event_filter_searchable() {
        assert!(!EventFilter::default().is_searchable());
        let by_entity = EventFilter {
            entity: Some("Cart".into()),
            ..EventFilter::default()
        };
        assert!(by_entity.is_searchable());
        let by_type = EventFilter {
            type_name: Some("CartChanged".into()),
            ..EventFilter::default()
        };
        assert!(by_type.is_searchable());
    }
}
