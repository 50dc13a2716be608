mod config;

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use azurerm_core::differ::create_plan;
use azurerm_core::effect::Effect;
use azurerm_core::features::Features;
use azurerm_core::interpreter::{EffectOutcome, Interpreter, InterpreterConfig};
use azurerm_core::plan::Plan;
use azurerm_core::provider::Provider;
use azurerm_core::resource::{Resource, ResourceAddress, State, Value};
use azurerm_core::schema::ResourceSchema;
use azurerm_provider::metadata::{PROVIDER_NAME, type_name};
use azurerm_provider::resources::resource_types;
use azurerm_provider::services::compute::parse::{DiskEncryptionSetId, GalleryApplicationVersionId};
use azurerm_provider::services::datafactory::parse::DataFactoryId;
use azurerm_provider::services::network::parse::{
    ApplicationSecurityGroupId, ExpressRoutePortId, NetworkSecurityGroupId, PublicIpPrefixId,
};
use azurerm_provider::services::storage::parse::BlobInventoryPolicyId;
use azurerm_provider::services::vmware::parse::ClusterId;
use azurerm_provider::{AzureRmProvider, expand_body};
use azurerm_resourceids::{
    ExpressRouteCircuitPeeringId, KeyVaultId, ResourceGroupId, ResourceId, SubnetId, SubscriptionId,
};
use azurerm_sdk::services::compute::virtual_machine_scale_sets::VirtualMachineScaleSetId;
use azurerm_sdk::{Authorizer, ClientOptions, ClientSecretAuthorizer, StaticTokenAuthorizer};
use azurerm_state::{LockInfo, ResourceState, StateBackend, StateFile, create_backend};

use config::Config;

#[derive(Parser)]
#[command(name = "azurerm")]
#[command(about = "Manage Azure Resource Manager resources from a JSON configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a resource ID and print its segments
    ParseId {
        /// Kind of resource ID
        #[arg(long = "type", value_enum)]
        kind: IdKind,

        /// Accept any casing of the fixed segments
        #[arg(long)]
        insensitively: bool,

        id: String,
    },
    /// Validate every resource of the configuration against its schema
    Validate {
        #[arg(default_value = "azurerm.json")]
        file: PathBuf,
    },
    /// Print the ARM request body of every resource
    Expand {
        #[arg(default_value = "azurerm.json")]
        file: PathBuf,
    },
    /// Show execution plan without applying changes
    Plan {
        #[arg(default_value = "azurerm.json")]
        file: PathBuf,

        #[command(flatten)]
        credentials: Credentials,
    },
    /// Apply changes to reach the desired state
    Apply {
        #[arg(default_value = "azurerm.json")]
        file: PathBuf,

        #[command(flatten)]
        credentials: Credentials,
    },
    /// Destroy every resource recorded in the state
    Destroy {
        #[arg(default_value = "azurerm.json")]
        file: PathBuf,

        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,

        #[command(flatten)]
        credentials: Credentials,
    },
}

#[derive(Args)]
struct Credentials {
    /// Bearer token for Resource Manager
    #[arg(long, env = "ARM_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[arg(long, env = "ARM_TENANT_ID")]
    tenant_id: Option<String>,

    #[arg(long, env = "ARM_CLIENT_ID")]
    client_id: Option<String>,

    #[arg(long, env = "ARM_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IdKind {
    Subscription,
    ResourceGroup,
    KeyVault,
    Subnet,
    ExpressRouteCircuitPeering,
    ExpressRoutePort,
    NetworkSecurityGroup,
    PublicIpPrefix,
    ApplicationSecurityGroup,
    DataFactory,
    DiskEncryptionSet,
    GalleryApplicationVersion,
    VirtualMachineScaleSet,
    BlobInventoryPolicy,
    VmwareCluster,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::ParseId {
            kind,
            insensitively,
            id,
        } => run_parse_id(kind, &id, insensitively),
        Commands::Validate { file } => run_validate(&file),
        Commands::Expand { file } => run_expand(&file),
        Commands::Plan { file, credentials } => run_plan(&file, &credentials).await,
        Commands::Apply { file, credentials } => run_apply(&file, &credentials).await,
        Commands::Destroy {
            file,
            auto_approve,
            credentials,
        } => run_destroy(&file, auto_approve, &credentials).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

// =============================================================================
// parse-id
// =============================================================================

fn run_parse_id(kind: IdKind, id: &str, insensitively: bool) -> Result<(), String> {
    let lines = match kind {
        IdKind::Subscription => describe_id::<SubscriptionId>(id, insensitively),
        IdKind::ResourceGroup => describe_id::<ResourceGroupId>(id, insensitively),
        IdKind::KeyVault => describe_id::<KeyVaultId>(id, insensitively),
        IdKind::Subnet => describe_id::<SubnetId>(id, insensitively),
        IdKind::ExpressRouteCircuitPeering => describe_id::<ExpressRouteCircuitPeeringId>(id, insensitively),
        IdKind::ExpressRoutePort => describe_id::<ExpressRoutePortId>(id, insensitively),
        IdKind::NetworkSecurityGroup => describe_id::<NetworkSecurityGroupId>(id, insensitively),
        IdKind::PublicIpPrefix => describe_id::<PublicIpPrefixId>(id, insensitively),
        IdKind::ApplicationSecurityGroup => describe_id::<ApplicationSecurityGroupId>(id, insensitively),
        IdKind::DataFactory => describe_id::<DataFactoryId>(id, insensitively),
        IdKind::DiskEncryptionSet => describe_id::<DiskEncryptionSetId>(id, insensitively),
        IdKind::GalleryApplicationVersion => describe_id::<GalleryApplicationVersionId>(id, insensitively),
        IdKind::VirtualMachineScaleSet => describe_id::<VirtualMachineScaleSetId>(id, insensitively),
        IdKind::BlobInventoryPolicy => describe_id::<BlobInventoryPolicyId>(id, insensitively),
        IdKind::VmwareCluster => describe_id::<ClusterId>(id, insensitively),
    }?;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Segment values of a parsed ID followed by its canonical form
fn describe_id<T: ResourceId>(id: &str, insensitively: bool) -> Result<Vec<String>, String> {
    let parsed = if insensitively {
        T::parse_insensitively(id)
    } else {
        T::parse(id)
    }
    .map_err(|e| e.to_string())?;

    let mut lines: Vec<String> = T::segments()
        .iter()
        .filter(|s| s.is_value())
        .zip(parsed.segment_values())
        .map(|(segment, value)| format!("{}: {}", segment.label(), value))
        .collect();
    lines.push(format!("ID: {}", parsed.id()));
    Ok(lines)
}

// =============================================================================
// validate / expand
// =============================================================================

fn get_schemas(features: Features) -> HashMap<String, ResourceSchema> {
    resource_types(features)
        .into_iter()
        .map(|t| (t.name().to_string(), t.schema()))
        .collect()
}

/// Schema errors of every resource, prefixed with its address
fn validate_resources(resources: &[Resource], features: Features) -> Result<(), String> {
    let schemas = get_schemas(features);
    let mut all_errors = Vec::new();

    for resource in resources {
        let Some(schema) = schemas.get(&resource.address.resource_type) else {
            all_errors.push(format!(
                "{}: unknown resource type {}",
                resource.address,
                type_name(PROVIDER_NAME, &resource.address.resource_type)
            ));
            continue;
        };
        let mut attributes = resource.attributes.clone();
        schema.apply_defaults(&mut attributes);
        if let Err(errors) = schema.validate(&attributes) {
            for error in errors {
                all_errors.push(format!("{}: {}", resource.address, error));
            }
        }
    }

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors.join("\n"))
    }
}

fn load_resources(file: &Path, features: Features) -> Result<(Config, Vec<Resource>), String> {
    let config = Config::load(file)?;
    let resources = config.resources()?;
    validate_resources(&resources, features)?;
    Ok((config, resources))
}

fn run_validate(file: &Path) -> Result<(), String> {
    let (_, resources) = load_resources(file, Features::from_env())?;
    println!(
        "{}",
        format!("Configuration is valid ({} resources).", resources.len()).green()
    );
    Ok(())
}

fn run_expand(file: &Path) -> Result<(), String> {
    let features = Features::from_env();
    let (_, resources) = load_resources(file, features)?;
    for resource in &resources {
        let body = expand_body(resource, features).map_err(|e| e.to_string())?;
        let text = serde_json::to_string_pretty(&body).map_err(|e| e.to_string())?;
        println!("{}", format!("# {}", resource.address).cyan().bold());
        println!("{}", text);
    }
    Ok(())
}

// =============================================================================
// plan / apply / destroy
// =============================================================================

fn authorizer(config: &Config, credentials: &Credentials) -> Result<Arc<dyn Authorizer>, String> {
    if let Some(token) = &credentials.access_token {
        return Ok(Arc::new(StaticTokenAuthorizer::new(token.as_str())));
    }
    match (
        &credentials.tenant_id,
        &credentials.client_id,
        &credentials.client_secret,
    ) {
        (Some(tenant_id), Some(client_id), Some(client_secret)) => {
            let environment = config.provider.environment()?;
            Ok(Arc::new(ClientSecretAuthorizer::new(
                &environment,
                tenant_id,
                client_id.as_str(),
                client_secret.as_str(),
            )))
        }
        _ => Err(
            "No credentials: set ARM_ACCESS_TOKEN, or ARM_TENANT_ID, ARM_CLIENT_ID and ARM_CLIENT_SECRET"
                .to_string(),
        ),
    }
}

fn get_provider(config: &Config, credentials: &Credentials, features: Features) -> Result<AzureRmProvider, String> {
    let options = ClientOptions::new(config.provider.environment()?, authorizer(config, credentials)?);
    AzureRmProvider::new(&options, config.provider.subscription_id.as_str(), features)
        .map_err(|e| format!("Failed to create client: {}", e))
}

/// Current state of every recorded resource, read from Azure
///
/// Entries whose resource no longer exists are dropped from `state`.
async fn refresh_state(provider: &impl Provider, state: &mut StateFile) -> Result<HashMap<ResourceAddress, State>, String> {
    let mut current = HashMap::new();
    for recorded in state.states().into_values() {
        let refreshed = provider
            .read(&recorded.address, recorded.identifier.as_deref(), Some(&recorded))
            .await
            .map_err(|e| format!("Failed to read state: {}", e))?;
        if !refreshed.exists {
            log::warn!("{} no longer exists, removing it from state", recorded.address);
            state.remove_resource(&recorded.address);
            continue;
        }
        current.insert(recorded.address.clone(), refreshed);
    }
    Ok(current)
}

async fn read_state(backend: &dyn StateBackend) -> Result<StateFile, String> {
    Ok(backend
        .read_state()
        .await
        .map_err(|e| e.to_string())?
        .unwrap_or_default())
}

async fn run_plan(file: &Path, credentials: &Credentials) -> Result<(), String> {
    let features = Features::from_env();
    let (config, resources) = load_resources(file, features)?;
    let provider = get_provider(&config, credentials, features)?;
    let backend = create_backend(&config.backend).map_err(|e| e.to_string())?;

    let mut state = read_state(backend.as_ref()).await?;
    let current = refresh_state(&provider, &mut state).await?;
    let plan = create_plan(&resources, &current, &get_schemas(features));
    print_plan(&plan);
    Ok(())
}

async fn run_apply(file: &Path, credentials: &Credentials) -> Result<(), String> {
    let features = Features::from_env();
    let (config, resources) = load_resources(file, features)?;
    let provider = get_provider(&config, credentials, features)?;
    let backend = create_backend(&config.backend).map_err(|e| e.to_string())?;

    let lock = backend.acquire_lock("apply").await.map_err(|e| e.to_string())?;
    let result = apply_locked(backend.as_ref(), provider, &resources, features).await;
    release(backend.as_ref(), &lock).await;
    result
}

async fn apply_locked(
    backend: &dyn StateBackend,
    provider: AzureRmProvider,
    resources: &[Resource],
    features: Features,
) -> Result<(), String> {
    let mut state = read_state(backend).await?;
    let current = refresh_state(&provider, &mut state).await?;
    let plan = create_plan(resources, &current, &get_schemas(features));

    if plan.is_empty() {
        println!("{}", "No changes needed.".green());
        return Ok(());
    }

    print_plan(&plan);
    println!();
    println!("{}", "Applying changes...".cyan().bold());
    println!();

    execute_plan(backend, provider, &plan, state).await
}

async fn run_destroy(file: &Path, auto_approve: bool, credentials: &Credentials) -> Result<(), String> {
    let features = Features::from_env();
    let config = Config::load(file)?;
    let provider = get_provider(&config, credentials, features)?;
    let backend = create_backend(&config.backend).map_err(|e| e.to_string())?;

    let lock = backend.acquire_lock("destroy").await.map_err(|e| e.to_string())?;
    let result = destroy_locked(backend.as_ref(), provider, auto_approve).await;
    release(backend.as_ref(), &lock).await;
    result
}

async fn destroy_locked(
    backend: &dyn StateBackend,
    provider: AzureRmProvider,
    auto_approve: bool,
) -> Result<(), String> {
    let state = read_state(backend).await?;
    let plan = destroy_plan(&state);

    if plan.is_empty() {
        println!("{}", "No resources recorded in state.".yellow());
        return Ok(());
    }

    print_plan(&plan);
    println!();

    if !auto_approve && !confirm("Do you really want to destroy all resources? Only 'yes' will be accepted: ")? {
        println!("{}", "Destroy cancelled.".yellow());
        return Ok(());
    }

    execute_plan(backend, provider, &plan, state).await
}

/// Deletes of every recorded resource, newest first
fn destroy_plan(state: &StateFile) -> Plan {
    let mut plan = Plan::new();
    for recorded in state.resources.iter().rev() {
        match &recorded.identifier {
            Some(identifier) => plan.add(Effect::Delete {
                address: recorded.address(),
                identifier: identifier.clone(),
            }),
            None => log::warn!("{} has no resource ID, skipping", recorded.address()),
        }
    }
    plan
}

fn confirm(prompt: &str) -> Result<bool, String> {
    print!("{}", prompt);
    io::stdout().flush().map_err(|e| e.to_string())?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| e.to_string())?;
    Ok(answer.trim() == "yes")
}

/// Run `plan` and record every successful effect in the state
async fn execute_plan(
    backend: &dyn StateBackend,
    provider: AzureRmProvider,
    plan: &Plan,
    mut state: StateFile,
) -> Result<(), String> {
    let interpreter = Interpreter::new(provider).with_config(InterpreterConfig {
        dry_run: false,
        continue_on_error: true,
    });
    let result = interpreter.apply(plan).await;

    for (effect, outcome) in plan.effects().iter().zip(&result.outcomes) {
        match outcome {
            Ok(outcome) => {
                println!("  {} {}", "✓".green(), format_effect(effect));
                record_outcome(&mut state, outcome);
            }
            Err(e) => println!("  {} {} - {}", "✗".red(), format_effect(effect), e),
        }
    }

    if result.success_count > 0 {
        state.increment_serial();
        backend.write_state(&state).await.map_err(|e| e.to_string())?;
    }

    println!();
    if result.is_success() {
        println!(
            "{}",
            format!("Apply complete! {} changes applied.", result.success_count)
                .green()
                .bold()
        );
        Ok(())
    } else {
        Err(format!(
            "Apply failed. {} succeeded, {} failed.",
            result.success_count, result.failure_count
        ))
    }
}

fn record_outcome(state: &mut StateFile, outcome: &EffectOutcome) {
    match outcome {
        EffectOutcome::Created { state: s }
        | EffectOutcome::Updated { state: s }
        | EffectOutcome::Replaced { state: s } => {
            state.upsert_resource(ResourceState::from_state(s, PROVIDER_NAME));
        }
        EffectOutcome::Deleted { address } => {
            state.remove_resource(address);
        }
        EffectOutcome::Skipped { .. } => {}
    }
}

async fn release(backend: &dyn StateBackend, lock: &LockInfo) {
    if let Err(e) = backend.release_lock(lock).await {
        eprintln!("{} failed to release state lock {}: {}", "Warning:".yellow().bold(), lock.id, e);
    }
}

// =============================================================================
// Plan display
// =============================================================================

fn print_plan(plan: &Plan) {
    if plan.is_empty() {
        println!("{}", "No changes. Infrastructure is up-to-date.".green());
        return;
    }

    println!("{}", "Execution Plan:".cyan().bold());
    println!();
    for effect in plan.effects() {
        println!("  {}", format_effect(effect));
        if let Effect::Create(resource) = effect {
            let mut keys: Vec<&String> = resource.attributes.keys().collect();
            keys.sort();
            for key in keys {
                println!("      {}: {}", key, format_value(&resource.attributes[key]));
            }
        }
    }
    println!();
    println!("{}", plan.summary().to_string().bold());
}

fn format_effect(effect: &Effect) -> String {
    let address = effect.address().to_string();
    let changed = effect.changed_attributes().join(", ");
    match effect {
        Effect::Create(_) => format!("{} {}", "+".green().bold(), address),
        Effect::Update { .. } => format!("{} {} ({})", "~".yellow().bold(), address, changed),
        Effect::Replace { .. } => format!("{} {} ({} forces replacement)", "-/+".magenta().bold(), address, changed),
        Effect::Delete { .. } => format!("{} {}", "-".red().bold(), address),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => format!(
            "[{}]",
            items.iter().map(format_value).collect::<Vec<_>>().join(", ")
        ),
        Value::Map(map) => {
            let mut entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} = {}", k, format_value(v)))
                .collect();
            entries.sort();
            format!("{{{}}}", entries.join(", "))
        }
    }
}
