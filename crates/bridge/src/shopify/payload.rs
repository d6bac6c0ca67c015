//! Cart payload normalization.
//!
//! The inbound payload is untyped JSON from an arbitrary frontend, so the
//! client-facing structs are deliberately lenient (`serde_json::Value` where
//! the shape varies between frontends) and the coercion helpers here are the
//! single place that turns them into the strict `cartCreate` input shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix of a fully-qualified product variant identifier.
const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

// =============================================================================
// Client-facing types (lenient)
// =============================================================================

/// Raw `/bridge` request body.
#[derive(Debug, Default, Deserialize)]
pub struct BridgePayload {
    /// Cart lines; absent or empty is rejected before shop selection.
    pub lines: Option<Vec<RawCartLine>>,
    /// Cart-level attributes, open-ended.
    pub attributes: Option<Map<String, Value>>,
    /// Free-text note; any scalar is accepted and stringified.
    pub note: Option<Value>,
}

impl BridgePayload {
    /// Whether the payload carries at least one line.
    #[must_use]
    pub fn has_lines(&self) -> bool {
        self.lines.as_ref().is_some_and(|lines| !lines.is_empty())
    }
}

/// One raw cart line as sent by the frontend.
///
/// `id` and `quantity` may be strings or numbers depending on the frontend;
/// coercion happens in [`BridgePayload::normalize`].
#[derive(Debug, Default, Deserialize)]
pub struct RawCartLine {
    /// Variant identifier: bare numeric ID or full GID.
    pub id: Option<Value>,
    /// Requested quantity.
    pub quantity: Option<Value>,
    /// Selling plan identifier, if the line is a subscription.
    pub selling_plan: Option<Value>,
    /// Open-ended per-line properties.
    pub properties: Option<Map<String, Value>>,
}

// =============================================================================
// Provider-facing types (strict, serialized into mutation variables)
// =============================================================================

/// A key/value attribute pair as the Storefront API expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// A normalized cart line ready for the `cartCreate` mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Positive quantity (defaulted to 1 when the raw value is unusable).
    pub quantity: i64,
    /// Fully-qualified variant GID.
    pub merchandise_id: String,
    /// Selling plan identifier, carried only when present and non-empty.
    pub selling_plan_id: Option<String>,
    /// Filtered line attributes.
    pub attributes: Vec<Attribute>,
}

/// The complete normalized checkout-creation request.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub lines: Vec<CartLine>,
    pub attributes: Vec<Attribute>,
    pub note: String,
}

impl BridgePayload {
    /// Normalize the raw payload into the provider's expected shape.
    ///
    /// Callers must have validated that lines are present; an empty payload
    /// normalizes to an empty request, which is never dispatched.
    #[must_use]
    pub fn normalize(&self) -> CheckoutRequest {
        let lines = self
            .lines
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(RawCartLine::normalize)
            .collect();

        let attributes = self.attributes.as_ref().map_or_else(Vec::new, filter_attributes);

        CheckoutRequest {
            lines,
            attributes,
            note: self.note.as_ref().and_then(scalar_to_string).unwrap_or_default(),
        }
    }
}

impl RawCartLine {
    fn normalize(&self) -> CartLine {
        CartLine {
            quantity: coerce_quantity(self.quantity.as_ref()),
            merchandise_id: to_variant_gid(
                &self
                    .id
                    .as_ref()
                    .and_then(scalar_to_string)
                    .unwrap_or_default(),
            ),
            selling_plan_id: self
                .selling_plan
                .as_ref()
                .and_then(scalar_to_string)
                .filter(|id| !id.is_empty()),
            attributes: self.properties.as_ref().map_or_else(Vec::new, filter_attributes),
        }
    }
}

// =============================================================================
// Coercion helpers
// =============================================================================

/// Rewrite a variant identifier into its fully-qualified GID form.
///
/// Idempotent: an already-qualified identifier (anything starting with
/// `gid://`) passes through unchanged.
#[must_use]
pub fn to_variant_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("{VARIANT_GID_PREFIX}{id}")
    }
}

/// Coerce a raw quantity to a positive integer, defaulting to 1.
#[allow(clippy::cast_possible_truncation)] // fractional quantities are truncated on purpose
fn coerce_quantity(raw: Option<&Value>) -> i64 {
    let quantity = match raw {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            // Same rule for both input shapes: fractional quantities truncate
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    };
    if quantity > 0 { quantity } else { 1 }
}

/// Stringify a scalar JSON value; `None` for null and structured values.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Filter an open-ended attribute map down to scalar key/value pairs.
///
/// Null and structured values are dropped; insertion order is preserved
/// (`serde_json` is built with `preserve_order`). The same rule applies to
/// per-line properties and cart-level attributes.
fn filter_attributes(map: &Map<String, Value>) -> Vec<Attribute> {
    map.iter()
        .filter_map(|(key, value)| {
            scalar_to_string(value).map(|value| Attribute {
                key: key.clone(),
                value,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(raw: Value) -> RawCartLine {
        serde_json::from_value(raw).unwrap()
    }

    // -------------------------------------------------------------------------
    // GID normalization
    // -------------------------------------------------------------------------

    #[test]
    fn test_bare_id_gets_prefixed() {
        assert_eq!(
            to_variant_gid("12345"),
            "gid://shopify/ProductVariant/12345"
        );
    }

    #[test]
    fn test_qualified_id_is_unchanged() {
        let gid = "gid://shopify/ProductVariant/12345";
        assert_eq!(to_variant_gid(gid), gid);
    }

    #[test]
    fn test_gid_normalization_is_idempotent() {
        for raw in ["12345", "gid://shopify/ProductVariant/12345", "abc", ""] {
            let once = to_variant_gid(raw);
            assert_eq!(to_variant_gid(&once), once);
        }
    }

    #[test]
    fn test_numeric_id_is_stringified_then_prefixed() {
        let normalized = line(json!({"id": 12345})).normalize();
        assert_eq!(
            normalized.merchandise_id,
            "gid://shopify/ProductVariant/12345"
        );
    }

    // -------------------------------------------------------------------------
    // Quantity coercion
    // -------------------------------------------------------------------------

    #[test]
    fn test_quantity_numeric_string() {
        assert_eq!(line(json!({"quantity": "3"})).normalize().quantity, 3);
    }

    #[test]
    fn test_quantity_zero_defaults_to_one() {
        assert_eq!(line(json!({"quantity": 0})).normalize().quantity, 1);
    }

    #[test]
    fn test_quantity_absent_defaults_to_one() {
        assert_eq!(line(json!({})).normalize().quantity, 1);
    }

    #[test]
    fn test_quantity_garbage_defaults_to_one() {
        assert_eq!(line(json!({"quantity": "abc"})).normalize().quantity, 1);
    }

    #[test]
    fn test_quantity_negative_defaults_to_one() {
        assert_eq!(line(json!({"quantity": -2})).normalize().quantity, 1);
    }

    #[test]
    fn test_quantity_plain_number() {
        assert_eq!(line(json!({"quantity": 4})).normalize().quantity, 4);
    }

    #[test]
    fn test_quantity_fractional_truncates_for_both_shapes() {
        assert_eq!(line(json!({"quantity": 3.5})).normalize().quantity, 3);
        assert_eq!(line(json!({"quantity": "3.5"})).normalize().quantity, 3);
    }

    // -------------------------------------------------------------------------
    // Selling plan
    // -------------------------------------------------------------------------

    #[test]
    fn test_selling_plan_carried_when_present() {
        let normalized = line(json!({"selling_plan": 987})).normalize();
        assert_eq!(normalized.selling_plan_id.as_deref(), Some("987"));
    }

    #[test]
    fn test_selling_plan_absent_is_none() {
        assert!(line(json!({})).normalize().selling_plan_id.is_none());
    }

    #[test]
    fn test_selling_plan_empty_string_is_none() {
        let normalized = line(json!({"selling_plan": ""})).normalize();
        assert!(normalized.selling_plan_id.is_none());
    }

    // -------------------------------------------------------------------------
    // Attribute filtering
    // -------------------------------------------------------------------------

    #[test]
    fn test_properties_drop_null_and_structured_values() {
        let normalized = line(json!({
            "properties": {
                "engraving": "Hello",
                "count": 2,
                "gift": true,
                "skip_null": null,
                "skip_array": [1, 2],
                "skip_object": {"a": 1}
            }
        }))
        .normalize();

        assert_eq!(
            normalized.attributes,
            vec![
                Attribute {
                    key: "engraving".to_string(),
                    value: "Hello".to_string()
                },
                Attribute {
                    key: "count".to_string(),
                    value: "2".to_string()
                },
                Attribute {
                    key: "gift".to_string(),
                    value: "true".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_cart_attributes_same_filter_and_order() {
        let payload: BridgePayload = serde_json::from_value(json!({
            "lines": [{"id": "1"}],
            "attributes": {"z_first": "a", "a_second": 1, "dropped": null}
        }))
        .unwrap();

        let request = payload.normalize();
        let keys: Vec<&str> = request.attributes.iter().map(|a| a.key.as_str()).collect();
        // Insertion order, not alphabetical
        assert_eq!(keys, vec!["z_first", "a_second"]);
    }

    // -------------------------------------------------------------------------
    // Note + whole-payload normalization
    // -------------------------------------------------------------------------

    #[test]
    fn test_note_absent_is_empty_string() {
        let payload = BridgePayload::default();
        assert_eq!(payload.normalize().note, "");
    }

    #[test]
    fn test_note_scalar_is_stringified() {
        let payload: BridgePayload =
            serde_json::from_value(json!({"lines": [], "note": 42})).unwrap();
        assert_eq!(payload.normalize().note, "42");
    }

    #[test]
    fn test_has_lines() {
        let empty: BridgePayload = serde_json::from_value(json!({"lines": []})).unwrap();
        assert!(!empty.has_lines());
        assert!(!BridgePayload::default().has_lines());

        let one: BridgePayload =
            serde_json::from_value(json!({"lines": [{"id": "123"}]})).unwrap();
        assert!(one.has_lines());
    }

    #[test]
    fn test_cart_line_serializes_camel_case() {
        let normalized = line(json!({"id": "123", "quantity": 2})).normalize();
        let json = serde_json::to_value(&normalized).unwrap();
        assert_eq!(
            json,
            json!({
                "quantity": 2,
                "merchandiseId": "gid://shopify/ProductVariant/123",
                "sellingPlanId": null,
                "attributes": []
            })
        );
    }
}
