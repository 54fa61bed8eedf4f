//! DataArts Studio service
//!
//! Ties a catalog endpoint to the lister: renders paths and headers, maps
//! arguments to query parameters, reclassifies business errors, filters
//! client-side and projects the declared output fields. Endpoints marked
//! `enrich` also merge every listed record with its detail lookup.

pub mod flatten;

use crate::classify::reclassify;
use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use crate::filter::{filter, FilterPredicate};
use crate::http::{ApiRequest, HttpClient, Transport};
use crate::jsonpath::{path_search, search_string};
use crate::lister::{ListRequest, Lister};
use crate::loader::{CatalogDefinition, EndpointDefinition};
use crate::template::{self, TemplateContext};
use crate::types::Arguments;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client for the endpoints of one catalog
pub struct DataArtsService {
    lister: Lister,
    catalog: CatalogDefinition,
    context: TemplateContext,
}

impl DataArtsService {
    /// Create a service over `transport`
    ///
    /// `context` supplies shared template variables such as `project_id`.
    pub fn new(
        transport: Arc<dyn Transport>,
        catalog: CatalogDefinition,
        context: TemplateContext,
    ) -> Self {
        Self {
            lister: Lister::new(transport),
            catalog,
            context,
        }
    }

    /// Create a service talking HTTP to the endpoint named by `settings`
    pub fn from_settings(settings: &Settings, catalog: CatalogDefinition) -> Result<Self> {
        let client = HttpClient::with_config(settings.to_http_config(&catalog.http)?)?;
        Ok(Self::new(
            Arc::new(client),
            catalog,
            settings.template_context(),
        ))
    }

    /// Get the catalog
    pub fn catalog(&self) -> &CatalogDefinition {
        &self.catalog
    }

    /// Get the shared template context
    pub fn context(&self) -> &TemplateContext {
        &self.context
    }

    /// All endpoints of the catalog
    pub fn endpoints(&self) -> &[EndpointDefinition] {
        &self.catalog.endpoints
    }

    /// List every record of `endpoint`
    pub async fn list(&self, endpoint: &str, args: &Arguments) -> Result<Vec<Value>> {
        let def = self.endpoint(endpoint)?;
        let ctx = self.context_for(def, args);
        let request = self.build_request(def, &ctx, args)?;

        let records = self
            .lister
            .list(&request)
            .await
            .map_err(|e| reclassify(e, &def.error_code_path, &def.not_found_codes))?;
        let fetched = records.len();

        let predicate = FilterPredicate::from_arguments(&def.filters, args);
        let mut records = filter(records, &predicate);

        if def.enriches() {
            records = self.enrich(def, &ctx, records).await;
        }

        info!(
            endpoint,
            fetched,
            returned = records.len(),
            "Listed endpoint"
        );

        Ok(flatten::project_all(records, &def.fields))
    }

    /// Fetch one record by ID
    ///
    /// Uses the endpoint's detail lookup, or searches the listing when it has
    /// none. Not-found errors become `Ok(None)`.
    pub async fn get(&self, endpoint: &str, args: &Arguments, id: &str) -> Result<Option<Value>> {
        let def = self.endpoint(endpoint)?;
        if !def.has_detail() {
            return self.find(endpoint, args, id).await;
        }

        let ctx = self.context_for(def, args);
        let record = self.fetch_detail(def, &ctx, id).await.ignore_not_found()?;

        Ok(record.map(|r| project_one(r, def)))
    }

    /// Search the listing for the record whose ID field equals `id`
    ///
    /// Stops paginating at the first match.
    pub async fn find(&self, endpoint: &str, args: &Arguments, id: &str) -> Result<Option<Value>> {
        let def = self.endpoint(endpoint)?;
        let ctx = self.context_for(def, args);
        let request = self.build_request(def, &ctx, args)?;

        let found = self
            .lister
            .find_first(&request, |record| {
                search_string(record, &def.id_field).as_deref() == Some(id)
            })
            .await
            .map_err(|e| reclassify(e, &def.error_code_path, &def.not_found_codes))
            .ignore_not_found()?
            .flatten();

        debug!(endpoint, id, found = found.is_some(), "Searched endpoint");

        Ok(found.map(|r| project_one(r, def)))
    }

    /// Build the listing request for `endpoint`
    pub fn list_request(&self, endpoint: &str, args: &Arguments) -> Result<ListRequest> {
        let def = self.endpoint(endpoint)?;
        let ctx = self.context_for(def, args);
        self.build_request(def, &ctx, args)
    }

    fn endpoint(&self, name: &str) -> Result<&EndpointDefinition> {
        self.catalog
            .endpoint(name)
            .ok_or_else(|| Error::unknown_endpoint(&self.catalog.name, name))
    }

    /// Variables for one call: endpoint defaults, then shared context, then arguments
    fn context_for(&self, def: &EndpointDefinition, args: &Arguments) -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.extend(def.defaults.clone());
        ctx.extend(self.context.vars());
        ctx.extend(
            args.iter()
                .filter(|(_, v)| !v.is_empty())
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        ctx
    }

    fn render_headers(
        &self,
        def: &EndpointDefinition,
        ctx: &TemplateContext,
    ) -> Result<HashMap<String, String>> {
        self.catalog
            .headers
            .iter()
            .chain(&def.headers)
            .map(|(k, v)| Ok((k.clone(), template::render(v, ctx)?)))
            .collect()
    }

    fn build_request(
        &self,
        def: &EndpointDefinition,
        ctx: &TemplateContext,
        args: &Arguments,
    ) -> Result<ListRequest> {
        let path = template::render(&def.path, ctx)?;
        let headers = self.render_headers(def, ctx)?;

        let mut request = ListRequest::new(path)
            .headers(headers)
            .records_path(def.records_path.clone())
            .pagination(def.pagination_config());

        for (key, value) in &def.query {
            let rendered = template::render(value, ctx)?;
            if !rendered.is_empty() {
                request = request.query(key, rendered);
            }
        }

        for (arg, param) in &def.params {
            if let Some(value) = args.get(arg).filter(|v| !v.is_empty()) {
                request = request.query(param, value);
            }
        }

        Ok(request)
    }

    /// Replace each record with its merged detail
    ///
    /// Records whose detail cannot be fetched are skipped.
    async fn enrich(
        &self,
        def: &EndpointDefinition,
        ctx: &TemplateContext,
        records: Vec<Value>,
    ) -> Vec<Value> {
        let mut enriched = Vec::with_capacity(records.len());
        for record in records {
            let Some(id) = search_string(&record, &def.id_field) else {
                warn!(endpoint = %def.name, field = %def.id_field, "Record has no ID, skipping");
                continue;
            };

            match self.fetch_detail(def, ctx, &id).await {
                Ok(detail) => enriched.push(flatten::merge(record, detail)),
                Err(e) => {
                    warn!(endpoint = %def.name, id = %id, error = %e, "Failed to fetch detail, skipping");
                }
            }
        }
        enriched
    }

    async fn fetch_detail(
        &self,
        def: &EndpointDefinition,
        ctx: &TemplateContext,
        id: &str,
    ) -> Result<Value> {
        let detail = def
            .detail
            .as_ref()
            .ok_or_else(|| Error::config(format!("Endpoint '{}' has no detail lookup", def.name)))?;

        let ctx = ctx.clone().with("id", urlencoding::encode(id));
        let mut request = ApiRequest::get(template::render(&detail.path, &ctx)?);
        request.headers = self.render_headers(def, &ctx)?;

        let codes = if detail.not_found_codes.is_empty() {
            &def.not_found_codes
        } else {
            &detail.not_found_codes
        };

        let response = self
            .lister
            .transport()
            .send(request)
            .await
            .map_err(|e| reclassify(e, &def.error_code_path, codes))?;
        let body = response.json()?;

        path_search(&body, &detail.record_path)
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                Error::decode(format!(
                    "no record at '{}' in detail response for '{id}'",
                    detail.record_path
                ))
            })
    }
}

impl std::fmt::Debug for DataArtsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataArtsService")
            .field("catalog", &self.catalog.name)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

fn project_one(record: Value, def: &EndpointDefinition) -> Value {
    if def.fields.is_empty() {
        record
    } else {
        flatten::project(&record, &def.fields)
    }
}
