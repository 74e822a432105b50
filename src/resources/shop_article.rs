//! The `shop_article` resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::Resource;
use crate::client::Article;
use crate::error::{Operation, ProviderError};
use crate::provider::ProviderData;
use crate::schema::{Attribute, Schema};

/// State of a shop article as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopArticleModel {
    /// Server-assigned id, `None` until the article is created.
    #[serde(default)]
    pub id: Option<i64>,
    /// Article name; changing it replaces the article.
    pub name: String,
    /// Article description.
    pub description: String,
}

impl ShopArticleModel {
    /// Decode a state or plan document.
    pub fn from_state(state: Value) -> Result<Self, ProviderError> {
        serde_json::from_value(state)
            .map_err(|e| ProviderError::InvalidState(format!("shop article: {}", e)))
    }

    /// Encode as a state document.
    pub fn into_state(self) -> Result<Value, ProviderError> {
        Ok(serde_json::to_value(self)?)
    }

    fn require_id(&self) -> Result<i64, ProviderError> {
        self.id
            .ok_or_else(|| ProviderError::InvalidState("shop article has no id".to_string()))
    }

    fn body(&self) -> Article {
        Article::new(self.name.clone(), self.description.clone())
    }
}

/// Shop article backed by `{host}/articles`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShopArticleResource;

impl ShopArticleResource {
    /// Create the resource.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Resource for ShopArticleResource {
    fn type_name_suffix(&self) -> &'static str {
        "_shop_article"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("An example shop article resource, just for demonstration purposes.")
            .with_attribute(
                "id",
                Attribute::computed_int64()
                    .with_description("Computed or literal import ID for the shop article")
                    .use_state_for_unknown(),
            )
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_description("Shop article name")
                    .requires_replace(),
            )
            .with_attribute(
                "description",
                Attribute::required_string().with_description("Shop article description"),
            )
    }

    #[instrument(skip_all, name = "shop_article.create")]
    async fn create(
        &self,
        data: &ProviderData,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let mut plan = ShopArticleModel::from_state(planned_state)?;

        let created = data
            .client
            .create_article(&plan.body())
            .await
            .map_err(|e| ProviderError::backend(Operation::Create, e))?;

        plan.id = created.id;
        info!(id = ?plan.id, name = %plan.name, "Shop article created");
        plan.into_state()
    }

    #[instrument(skip_all, name = "shop_article.read")]
    async fn read(&self, data: &ProviderData, current_state: Value) -> Result<Value, ProviderError> {
        let mut state = ShopArticleModel::from_state(current_state)?;
        let id = state.require_id()?;

        let remote = data
            .client
            .get_article(id)
            .await
            .map_err(|e| ProviderError::backend(Operation::Read, e))?;

        debug!(id, "Shop article refreshed");
        state.name = remote.name;
        state.description = remote.description;
        state.into_state()
    }

    #[instrument(skip_all, name = "shop_article.update")]
    async fn update(
        &self,
        data: &ProviderData,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let prior = ShopArticleModel::from_state(prior_state)?;
        let plan = ShopArticleModel::from_state(planned_state)?;
        let id = prior.require_id()?;

        let updated = data
            .client
            .update_article(id, &plan.body())
            .await
            .map_err(|e| ProviderError::backend(Operation::Update, e))?;

        info!(id, "Shop article updated");
        ShopArticleModel {
            id: updated.id.or(Some(id)),
            name: updated.name,
            description: updated.description,
        }
        .into_state()
    }

    #[instrument(skip_all, name = "shop_article.delete")]
    async fn delete(&self, data: &ProviderData, current_state: Value) -> Result<(), ProviderError> {
        let state = ShopArticleModel::from_state(current_state)?;
        let id = state.require_id()?;

        data.client
            .delete_article(id)
            .await
            .map_err(|e| ProviderError::backend(Operation::Delete, e))?;

        info!(id, "Shop article deleted");
        Ok(())
    }

    #[instrument(skip(self, data), name = "shop_article.import")]
    async fn import(&self, data: &ProviderData, id: &str) -> Result<Value, ProviderError> {
        let id: i64 = id.trim().parse().map_err(|_| {
            ProviderError::InvalidRequest(format!(
                "shop article import ID must be an integer, got {:?}",
                id
            ))
        })?;

        let remote = data
            .client
            .get_article(id)
            .await
            .map_err(|e| ProviderError::backend(Operation::Import, e))?;

        ShopArticleModel {
            id: Some(id),
            name: remote.name,
            description: remote.description,
        }
        .into_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PlanModifier;
    use serde_json::json;

    #[test]
    fn test_model_round_trips_unknown_id() {
        let model = ShopArticleModel::from_state(json!({
            "id": null,
            "name": "Princess Rosalea",
            "description": "Child Shampoo & Conditioner"
        }))
        .unwrap();
        assert_eq!(model.id, None);

        let state = model.into_state().unwrap();
        assert_eq!(state["id"], Value::Null);
        assert_eq!(state["name"], "Princess Rosalea");
    }

    #[test]
    fn test_model_rejects_missing_fields() {
        let err = ShopArticleModel::from_state(json!({"name": "a"})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidState(_)));
    }

    #[test]
    fn test_model_require_id() {
        let model = ShopArticleModel {
            id: None,
            name: "a".into(),
            description: "b".into(),
        };
        assert!(matches!(
            model.require_id(),
            Err(ProviderError::InvalidState(_))
        ));
    }

    #[test]
    fn test_schema_shape() {
        let schema = ShopArticleResource::new().schema();

        let id = schema.attribute("id").unwrap();
        assert!(id.flags.is_computed_only());

        let name = schema.attribute("name").unwrap();
        assert!(name.flags.required);
        assert!(name.has_modifier(PlanModifier::RequiresReplace));

        let description = schema.attribute("description").unwrap();
        assert!(description.flags.required);
        assert!(description.plan_modifiers.is_empty());
    }
}
