use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use colored::Colorize;

use strata_core::provider::{Provider, ResourceType};
use strata_core::resource::{ResourceId, State, Value};
use strata_core::schema::{AttributeSchema, ResourceSchema};
use strata_provider_aws::AwsProvider;
use strata_provider_aws::config::ProviderConfig;
use strata_provider_aws::resources::{self, has_handlers};
use strata_provider_aws::service_package::{
    ServicePackage, ServicePackageResource, service_packages,
};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Inspect and manage resources of the Strata AWS provider", long_about = None)]
struct Cli {
    /// AWS region (e.g. us-east-1 or aws.Region.us_east_1)
    #[arg(long, global = true, default_value = "us-east-1")]
    region: String,

    /// Named profile from the shared AWS config files
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Endpoint override, as SERVICE=URL (repeatable)
    #[arg(long, global = true, value_parser = parse_endpoint)]
    endpoint: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the resource and data source types of every service package
    Resources,
    /// Show the attribute schema of a resource type
    Schema {
        /// Resource type (e.g. identitystore.user)
        resource_type: String,
    },
    /// Read an existing remote object into state and print it
    Import {
        /// Resource type (e.g. identitystore.user)
        resource_type: String,
        /// Remote identifier (e.g. d-1234/8a4e...)
        identifier: String,
        /// Name to give the imported resource
        #[arg(long, default_value = "imported")]
        name: String,
    },
    /// Delete a remote object
    Delete {
        /// Resource type (e.g. identitystore.user)
        resource_type: String,
        /// Remote identifier (e.g. d-1234/8a4e...)
        identifier: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = provider_config(&cli);

    let result = match cli.command {
        Commands::Resources => {
            run_resources();
            Ok(())
        }
        Commands::Schema { resource_type } => run_schema(&resource_type),
        Commands::Import {
            resource_type,
            identifier,
            name,
        } => run_import(&config, &resource_type, &identifier, &name).await,
        Commands::Delete {
            resource_type,
            identifier,
        } => run_delete(&config, &resource_type, &identifier).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_endpoint(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((service, url)) if !service.is_empty() && !url.is_empty() => {
            Ok((service.to_string(), url.to_string()))
        }
        _ => Err(format!("expected SERVICE=URL, got {:?}", s)),
    }
}

fn provider_config(cli: &Cli) -> ProviderConfig {
    let mut config = ProviderConfig::new(&cli.region);
    if let Some(ref profile) = cli.profile {
        config = config.with_profile(profile.clone());
    }
    for (service, url) in &cli.endpoint {
        config = config.with_endpoint(service.clone(), url.clone());
    }
    config
}

fn run_resources() {
    for package in service_packages() {
        println!("{}", package.name().bold());
        for resource in package.resources() {
            println!("  {}", describe_type(&resource, "resource"));
        }
        for data_source in package.data_sources() {
            println!("  {}", describe_type(&data_source, "data source"));
        }
    }
}

fn describe_type(entry: &ServicePackageResource, kind: &str) -> String {
    let mut line = format!("{} {}", entry.type_name.cyan(), format!("({})", kind).dimmed());
    if let Some(name) = entry.name {
        line.push_str(&format!(" \"{}\"", name));
    }
    if entry.tags.is_some() {
        line.push_str(&format!(" {}", "tagged".yellow()));
    }
    if kind == "resource" && !has_handlers(entry.type_name) {
        line.push_str(&format!(" {}", "manifest only".dimmed()));
    }
    line
}

fn find_schema(resource_type: &str) -> Result<ResourceSchema, String> {
    resources::resource_types()
        .into_iter()
        .find(|t| t.name() == resource_type)
        .map(|t| t.schema())
        .ok_or_else(|| format!("Unknown resource type: {}", resource_type))
}

fn run_schema(resource_type: &str) -> Result<(), String> {
    let schema = find_schema(resource_type)?;
    println!("{}", schema.resource_type.bold());
    if let Some(ref description) = schema.description {
        println!("  {}", description.dimmed());
    }

    let mut attributes: Vec<&AttributeSchema> = schema.attributes.values().collect();
    attributes.sort_by(|a, b| a.name.cmp(&b.name));
    for attribute in attributes {
        let mut flags = Vec::new();
        if attribute.required {
            flags.push("required".yellow().to_string());
        }
        if attribute.computed {
            flags.push("computed".cyan().to_string());
        }
        if attribute.force_new {
            flags.push("forces replacement".red().to_string());
        }
        println!(
            "  {}: {} {}",
            attribute.name,
            attribute.attr_type,
            flags.join(", ")
        );
    }
    Ok(())
}

async fn run_import(
    config: &ProviderConfig,
    resource_type: &str,
    identifier: &str,
    name: &str,
) -> Result<(), String> {
    let provider = AwsProvider::new(config).await;
    let id = ResourceId::new(resource_type, name);
    let state = provider
        .import(&id, identifier)
        .await
        .map_err(|e| e.to_string())?;

    println!("{} {}", "Imported".green().bold(), identifier);
    print_state(&state);
    Ok(())
}

async fn run_delete(
    config: &ProviderConfig,
    resource_type: &str,
    identifier: &str,
) -> Result<(), String> {
    let provider = AwsProvider::new(config).await;
    let id = ResourceId::new(resource_type, identifier);
    provider
        .delete(&id, identifier)
        .await
        .map_err(|e| e.to_string())?;

    println!("{} {}", "Deleted".red().bold(), identifier);
    Ok(())
}

fn print_state(state: &State) {
    let attributes: BTreeMap<&String, &Value> = state.attributes.iter().collect();
    for (key, value) in attributes {
        println!("  {}: {}", key, format_value(value));
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => {
            let strs: Vec<_> = items.iter().map(format_value).collect();
            format!("[{}]", strs.join(", "))
        }
        Value::Map(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            let strs: Vec<_> = sorted
                .iter()
                .map(|(k, v)| format!("{}: {}", k, format_value(v)))
                .collect();
            format!("{{{}}}", strs.join(", "))
        }
    }
}
