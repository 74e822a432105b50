//! Planning: compare prior state with the proposed configuration.
//!
//! A computed attribute that will only be known after apply is planned as
//! `null`. Plan modifiers on the schema decide when a computed value survives
//! from the prior state and which changes force a replacement.

use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::schema::{Attribute, PlanModifier, Schema};
use crate::types::{AttributeChange, PlanResult};

/// Plan a resource.
///
/// - `prior == None` plans a create.
/// - `proposed == null` plans a destroy.
/// - otherwise plans an update, which may require replacement.
pub fn plan_resource(
    schema: &Schema,
    prior: Option<&Value>,
    proposed: &Value,
) -> Result<PlanResult, ProviderError> {
    let prior = match prior {
        Some(Value::Null) | None => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            return Err(ProviderError::InvalidState(format!(
                "prior state must be an object, got {}",
                other
            )))
        }
    };

    let proposed = match proposed {
        Value::Null => return Ok(plan_destroy(schema, prior)),
        Value::Object(map) => map,
        other => {
            return Err(ProviderError::Validation(format!(
                "proposed state must be an object, got {}",
                other
            )))
        }
    };

    let mut planned = Map::new();
    for (name, attr) in &schema.attributes {
        let value = match non_null(proposed.get(name)) {
            Some(v) if !attr.flags.is_computed_only() => v.clone(),
            _ if attr.flags.computed => prior_value(prior, name).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        };
        planned.insert(name.clone(), value);
    }

    let changes = diff(schema, prior, &planned);

    if prior.is_none() {
        return Ok(PlanResult::with_changes(
            Value::Object(planned),
            changes,
            false,
        ));
    }

    if changes.is_empty() {
        return Ok(PlanResult::no_change(Value::Object(planned)));
    }

    let requires_replace = changes.iter().any(|change| {
        schema
            .attribute(&change.path)
            .is_some_and(|attr| attr.has_modifier(PlanModifier::RequiresReplace))
    });

    for (name, attr) in &schema.attributes {
        if attr.flags.is_computed_only() && !keeps_prior(attr, requires_replace) {
            planned.insert(name.clone(), Value::Null);
        }
    }

    Ok(PlanResult::with_changes(
        Value::Object(planned),
        changes,
        requires_replace,
    ))
}

fn keeps_prior(attr: &Attribute, requires_replace: bool) -> bool {
    !requires_replace && attr.has_modifier(PlanModifier::UseStateForUnknown)
}

fn plan_destroy(schema: &Schema, prior: Option<&Map<String, Value>>) -> PlanResult {
    let changes = schema
        .attributes
        .keys()
        .filter_map(|name| {
            prior_value(prior, name).map(|v| AttributeChange::removed(name.clone(), v.clone()))
        })
        .collect();
    PlanResult::with_changes(Value::Null, changes, false)
}

/// Changes to user-settable attributes between prior state and plan.
fn diff(
    schema: &Schema,
    prior: Option<&Map<String, Value>>,
    planned: &Map<String, Value>,
) -> Vec<AttributeChange> {
    schema
        .attributes
        .iter()
        .filter(|(_, attr)| !attr.flags.is_computed_only())
        .filter_map(|(name, _)| {
            let before = prior_value(prior, name);
            let after = non_null(planned.get(name));
            match (before, after) {
                (None, None) => None,
                (Some(b), Some(a)) if b == a => None,
                (Some(b), Some(a)) => Some(AttributeChange::modified(name.clone(), b.clone(), a.clone())),
                (None, Some(a)) => Some(AttributeChange::added(name.clone(), a.clone())),
                (Some(b), None) => Some(AttributeChange::removed(name.clone(), b.clone())),
            }
        })
        .collect()
}

fn prior_value<'a>(prior: Option<&'a Map<String, Value>>, name: &str) -> Option<&'a Value> {
    non_null(prior.and_then(|p| p.get(name)))
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article_schema() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_int64().use_state_for_unknown())
            .with_attribute("name", Attribute::required_string().requires_replace())
            .with_attribute("description", Attribute::required_string())
    }

    #[test]
    fn test_plan_create() {
        let plan = plan_resource(
            &article_schema(),
            None,
            &json!({"name": "Princess Rosalea", "description": "Shampoo"}),
        )
        .unwrap();

        assert!(!plan.requires_replace);
        assert_eq!(plan.changes.len(), 2);
        assert_eq!(
            plan.planned_state,
            json!({"id": null, "name": "Princess Rosalea", "description": "Shampoo"})
        );
    }

    #[test]
    fn test_plan_create_ignores_configured_computed_value() {
        let plan = plan_resource(
            &article_schema(),
            None,
            &json!({"id": 99, "name": "a", "description": "b"}),
        )
        .unwrap();
        assert_eq!(plan.planned_state["id"], Value::Null);
    }

    #[test]
    fn test_plan_no_change() {
        let prior = json!({"id": 7, "name": "a", "description": "b"});
        let plan =
            plan_resource(&article_schema(), Some(&prior), &json!({"name": "a", "description": "b"}))
                .unwrap();

        assert!(!plan.has_changes());
        assert_eq!(plan.planned_state, prior);
    }

    #[test]
    fn test_plan_update_in_place_keeps_id() {
        let prior = json!({"id": 7, "name": "a", "description": "old"});
        let plan = plan_resource(
            &article_schema(),
            Some(&prior),
            &json!({"name": "a", "description": "new"}),
        )
        .unwrap();

        assert!(!plan.requires_replace);
        assert_eq!(
            plan.changes,
            vec![AttributeChange::modified("description", json!("old"), json!("new"))]
        );
        assert_eq!(plan.planned_state["id"], 7);
    }

    #[test]
    fn test_plan_name_change_requires_replace() {
        let prior = json!({"id": 7, "name": "a", "description": "b"});
        let plan = plan_resource(
            &article_schema(),
            Some(&prior),
            &json!({"name": "renamed", "description": "b"}),
        )
        .unwrap();

        assert!(plan.requires_replace);
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].path, "name");
        assert_eq!(plan.planned_state["id"], Value::Null);
    }

    #[test]
    fn test_computed_without_modifier_becomes_unknown_on_update() {
        let schema = Schema::v0()
            .with_attribute("revision", Attribute::computed_int64())
            .with_attribute("description", Attribute::required_string());
        let prior = json!({"revision": 3, "description": "old"});

        let plan = plan_resource(&schema, Some(&prior), &json!({"description": "new"})).unwrap();
        assert_eq!(plan.planned_state["revision"], Value::Null);

        let plan = plan_resource(&schema, Some(&prior), &json!({"description": "old"})).unwrap();
        assert_eq!(plan.planned_state["revision"], 3);
    }

    #[test]
    fn test_plan_destroy() {
        let prior = json!({"id": 7, "name": "a", "description": "b"});
        let plan = plan_resource(&article_schema(), Some(&prior), &Value::Null).unwrap();

        assert_eq!(plan.planned_state, Value::Null);
        assert!(!plan.requires_replace);
        assert_eq!(plan.changes.len(), 3);
        assert!(plan.changes.iter().all(|c| c.after.is_none()));
    }

    #[test]
    fn test_plan_rejects_non_object() {
        let err = plan_resource(&article_schema(), None, &json!("nope")).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));

        let err = plan_resource(&article_schema(), Some(&json!(5)), &json!({})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidState(_)));
    }
}
