//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::Settings;
use crate::dataarts::DataArtsService;
use crate::error::Result;
use crate::loader::{load_catalog, CatalogDefinition};
use crate::types::Arguments;
use serde_json::{json, Value};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Endpoints => self.endpoints(),
            Commands::List { endpoint, args } => self.list(endpoint, args).await,
            Commands::Get { endpoint, id, args } => self.get(endpoint, id, args).await,
            Commands::Find { endpoint, id, args } => self.find(endpoint, id, args).await,
            Commands::Validate => self.validate(),
        }
    }

    fn load_catalog(&self) -> Result<CatalogDefinition> {
        load_catalog(&self.cli.catalog)
    }

    fn service(&self) -> Result<DataArtsService> {
        let catalog = self.load_catalog()?;
        let settings = Settings::load(self.cli.settings.as_deref())?;
        DataArtsService::from_settings(&settings, catalog)
    }

    fn endpoints(&self) -> Result<()> {
        let catalog = self.load_catalog()?;

        let endpoints: Vec<Value> = catalog
            .endpoints
            .iter()
            .map(|e| {
                let mut arguments: Vec<&str> = e
                    .params
                    .keys()
                    .chain(e.filters.keys())
                    .map(String::as_str)
                    .collect();
                arguments.sort_unstable();
                arguments.dedup();

                json!({
                    "name": e.name,
                    "description": e.description,
                    "path": e.path,
                    "arguments": arguments,
                    "detail": e.has_detail(),
                    "enrich": e.enriches()
                })
            })
            .collect();

        self.output_message(&json!({
            "catalog": catalog.name,
            "version": catalog.version,
            "endpoints": endpoints
        }));

        Ok(())
    }

    async fn list(&self, endpoint: &str, args: &[(String, String)]) -> Result<()> {
        let service = self.service()?;
        let records = service.list(endpoint, &to_arguments(args)).await?;

        for record in &records {
            self.output_message(record);
        }

        Ok(())
    }

    async fn get(&self, endpoint: &str, id: &str, args: &[(String, String)]) -> Result<()> {
        let service = self.service()?;
        let record = service.get(endpoint, &to_arguments(args), id).await?;
        self.output_message(&record.unwrap_or(Value::Null));
        Ok(())
    }

    async fn find(&self, endpoint: &str, id: &str, args: &[(String, String)]) -> Result<()> {
        let service = self.service()?;
        let record = service.find(endpoint, &to_arguments(args), id).await?;
        self.output_message(&record.unwrap_or(Value::Null));
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let catalog = self.load_catalog()?;

        if let Some(path) = &self.cli.settings {
            let settings = Settings::load(Some(path.as_path()))?;
            settings.validate()?;
        }

        self.output_message(&json!({
            "level": "INFO",
            "message": format!(
                "Catalog '{}' v{} is valid with {} endpoints",
                catalog.name,
                catalog.version,
                catalog.endpoints.len()
            )
        }));

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Later occurrences of a key win
fn to_arguments(args: &[(String, String)]) -> Arguments {
    args.iter().cloned().collect()
}
