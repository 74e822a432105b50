//! The example provider.
//!
//! [`ExampleProvider`] owns the resource registry and the configured backend
//! client. Resource requests are routed by full type name
//! (`tfp_example_shop_article`) to the matching [`Resource`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::client::ShopClient;
use crate::config::{ProviderConfig, HOST_ENV_VAR};
use crate::error::ProviderError;
use crate::plan::plan_resource;
use crate::resources::{Resource, ShopArticleResource};
use crate::schema::{has_errors, Attribute, Diagnostic, ProviderSchema, Schema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult};
use crate::validation::validate;

/// Type name reported in the provider metadata.
pub const PROVIDER_TYPE_NAME: &str = "tfp_example";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Shared data handed to every resource once Configure succeeded.
#[derive(Debug, Clone)]
pub struct ProviderData {
    /// Client bound to the configured backend host.
    pub client: ShopClient,
}

/// Provider serving the `shop_article` resource.
pub struct ExampleProvider {
    resources: BTreeMap<String, Arc<dyn Resource>>,
    data: RwLock<Option<Arc<ProviderData>>>,
    env: EnvLookup,
}

impl fmt::Debug for ExampleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExampleProvider")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for ExampleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ExampleProvider {
    /// Create a provider that reads fallbacks from the process environment.
    pub fn new() -> Self {
        Self::with_env(|name| std::env::var(name).ok())
    }

    /// Create a provider with a custom environment lookup.
    pub fn with_env<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        let mut provider = Self {
            resources: BTreeMap::new(),
            data: RwLock::new(None),
            env: Arc::new(env),
        };
        provider.register(ShopArticleResource::new());
        provider
    }

    fn register<R: Resource>(&mut self, resource: R) {
        let type_name = format!("{}{}", PROVIDER_TYPE_NAME, resource.type_name_suffix());
        self.resources.insert(type_name, Arc::new(resource));
    }

    fn provider_config_schema() -> Schema {
        Schema::v0().with_attribute(
            "host",
            Attribute::optional_string().with_description(format!(
                "HOST for Example API. May also be provided via {} environment variable.",
                HOST_ENV_VAR
            )),
        )
    }

    fn resource(&self, resource_type: &str) -> Result<&Arc<dyn Resource>, ProviderError> {
        self.resources
            .get(resource_type)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    async fn configured(&self) -> Result<Arc<ProviderData>, ProviderError> {
        self.data
            .read()
            .await
            .clone()
            .ok_or(ProviderError::NotConfigured)
    }

    /// Whether Configure has completed successfully.
    pub async fn is_configured(&self) -> bool {
        self.data.read().await.is_some()
    }

    /// The backend host, once configured.
    pub async fn host(&self) -> Option<String> {
        self.data
            .read()
            .await
            .as_ref()
            .map(|d| d.client.host().to_string())
    }

    fn check_config(&self, config: &Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let mut diagnostics = validate(&Self::provider_config_schema(), config);
        if has_errors(&diagnostics) {
            return Ok(diagnostics);
        }

        if let Err(errors) = ProviderConfig::from_value(config)?.resolve(&*self.env) {
            diagnostics.extend(errors);
        }
        Ok(diagnostics)
    }
}

#[async_trait::async_trait]
impl ProviderService for ExampleProvider {
    fn type_name(&self) -> &str {
        PROVIDER_TYPE_NAME
    }

    fn schema(&self) -> ProviderSchema {
        self.resources.iter().fold(
            ProviderSchema::new().with_provider_config(Self::provider_config_schema()),
            |schema, (name, resource)| schema.with_resource(name.clone(), resource.schema()),
        )
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        self.check_config(&config)
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let diagnostics = validate(&Self::provider_config_schema(), &config);
        if has_errors(&diagnostics) {
            return Ok(diagnostics);
        }

        let settings = match ProviderConfig::from_value(&config)?.resolve(&*self.env) {
            Ok(settings) => settings,
            Err(errors) => return Ok(errors),
        };

        let client = ShopClient::new(settings.host)
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        info!(host = %client.host(), "Provider configured");
        *self.data.write().await = Some(Arc::new(ProviderData { client }));
        Ok(diagnostics)
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        debug!("Releasing provider data");
        self.data.write().await.take();
        Ok(())
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let resource = self.resource(resource_type)?;
        Ok(validate(&resource.schema(), &config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
    ) -> Result<PlanResult, ProviderError> {
        let resource = self.resource(resource_type)?;
        plan_resource(&resource.schema(), prior_state.as_ref(), &proposed_state)
    }

    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let data = self.configured().await?;
        resource.create(&data, planned_state).await
    }

    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let data = self.configured().await?;
        resource.read(&data, current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let data = self.configured().await?;
        resource.update(&data, prior_state, planned_state).await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let resource = self.resource(resource_type)?;
        let data = self.configured().await?;
        resource.delete(&data, current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let data = self.configured().await?;
        let state = resource.import(&data, id).await?;
        Ok(vec![ImportedResource::new(resource_type, state)])
    }
}
