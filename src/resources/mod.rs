//! Managed resource types.
//!
//! Every resource implements [`Resource`]; [`ExampleProvider`] routes the
//! host's CRUD calls to the implementation registered under the requested
//! type name.
//!
//! [`ExampleProvider`]: crate::provider::ExampleProvider

mod shop_article;

pub use shop_article::{ShopArticleModel, ShopArticleResource};

use serde_json::Value;

use crate::error::ProviderError;
use crate::provider::ProviderData;
use crate::schema::Schema;

/// A resource type with a Create/Read/Update/Delete lifecycle.
///
/// States are the JSON objects described by [`Resource::schema`]. Planning is
/// derived from the schema, so implementations only talk to the backend.
#[async_trait::async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Suffix appended to the provider type name, e.g. `_shop_article`.
    fn type_name_suffix(&self) -> &'static str;

    /// The resource schema.
    fn schema(&self) -> Schema;

    /// Create the remote object and return the resulting state.
    async fn create(&self, data: &ProviderData, planned_state: Value)
        -> Result<Value, ProviderError>;

    /// Refresh the state from the remote object.
    async fn read(&self, data: &ProviderData, current_state: Value) -> Result<Value, ProviderError>;

    /// Apply an in-place update and return the new state.
    async fn update(
        &self,
        data: &ProviderData,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Remove the remote object.
    async fn delete(&self, data: &ProviderData, current_state: Value) -> Result<(), ProviderError>;

    /// Build a state for an existing remote object identified by `id`.
    async fn import(&self, data: &ProviderData, id: &str) -> Result<Value, ProviderError>;
}
