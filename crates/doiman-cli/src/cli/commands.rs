use std::path::Path;

use anyhow::{bail, Context};

use doiman_core::{
    DoiState, Lifecycle, LifecycleError, NewConfiguration, RegistryClient, RegistryConfig,
    ResourceRecord, SiteConfig, Store,
};

use super::args::{
    Cli, Command, ConfigAddArgs, ConfigCmd, HistoryArgs, StatusArgs, TransitionArgs,
};
use super::exit_codes;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let store = Store::open(&cli.db)
        .with_context(|| format!("failed to open store at {}", cli.db.display()))?;

    match cli.cmd {
        Command::Status(args) => status(store, args).await,
        Command::Transition(args) => transition(store, args).await,
        Command::History(args) => history(&store, args),
        Command::Config(args) => match args.cmd {
            ConfigCmd::Show => config_show(&store),
            ConfigCmd::Add(add) => config_add(&store, add),
            ConfigCmd::SetActive(set) => config_set_active(&store, set.id),
        },
    }
}

fn load_resource(path: &Path, id: &str) -> anyhow::Result<ResourceRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read resources file {}", path.display()))?;
    let resources: Vec<ResourceRecord> =
        serde_json::from_str(&raw).context("failed to parse resources file")?;
    resources
        .into_iter()
        .find(|r| r.id == id)
        .with_context(|| format!("resource {id} not found in {}", path.display()))
}

fn build_lifecycle(store: Store, domain: &str) -> anyhow::Result<(Lifecycle, RegistryConfig)> {
    let Some(configuration) = store.active_configuration()? else {
        bail!("no active configuration; add one with `doiman config add`");
    };
    let config = configuration.to_registry_config()?;
    let doi_base_url = config.doi_base_url();
    let client = RegistryClient::new(&config)?;
    let lifecycle = Lifecycle::new(client, store, SiteConfig::new(domain), doi_base_url);
    Ok((lifecycle, config))
}

async fn status(store: Store, args: StatusArgs) -> anyhow::Result<i32> {
    let resource = load_resource(&args.resources, &args.resource)?;
    let (lifecycle, config) = build_lifecycle(store, &args.domain)?;

    let report = lifecycle.sync(&resource, None).await?;
    println!("resource:  {}", args.resource);
    println!("doi:       {}", report.record.doi.as_deref().unwrap_or("n/a"));
    println!("state:     {}", report.state);
    println!("found:     {}", report.found);
    if let Some(doi) = report.record.doi.as_deref() {
        println!("record:    {}", config.backend_doi_url(doi));
    }
    if !report.record.citation_snippet.is_empty() {
        println!("citation:  {}", report.record.citation_snippet);
    }
    Ok(exit_codes::OK)
}

async fn transition(store: Store, args: TransitionArgs) -> anyhow::Result<i32> {
    let target: DoiState = args
        .to
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let resource = load_resource(&args.resources, &args.resource)?;
    let (lifecycle, _) = build_lifecycle(store, &args.domain)?;

    let report = lifecycle.sync(&resource, Some(target)).await?;
    if report.errors.is_empty() {
        println!(
            "{} -> {} ({})",
            args.resource,
            report.state,
            report.record.doi.as_deref().unwrap_or("n/a")
        );
        return Ok(exit_codes::OK);
    }

    for error in &report.errors {
        eprintln!("error: {error}");
    }
    // Registry failures carry a finer-grained exit code than the generic
    // transition failure.
    let code = report
        .errors
        .iter()
        .find_map(|e| match e {
            LifecycleError::Registry(e) => Some(e.exit_code()),
            _ => None,
        })
        .unwrap_or(exit_codes::TRANSITION_FAILED);
    Ok(code)
}

fn history(store: &Store, args: HistoryArgs) -> anyhow::Result<i32> {
    let Some(record) = store.record_for_resource(&args.resource)? else {
        bail!("no DOI record for resource {}", args.resource);
    };
    for row in store.history(record.id)? {
        let outcome = match (row.response_status, &row.error) {
            (Some(status), _) => format!("HTTP {status}"),
            (None, Some(error)) => format!("error: {error}"),
            (None, None) => "no response".to_string(),
        };
        println!("{}  {:6}  {}  {}", row.at, row.method, row.url, outcome);
    }
    Ok(exit_codes::OK)
}

fn config_show(store: &Store) -> anyhow::Result<i32> {
    for row in store.list_configurations()? {
        let marker = if row.is_active { "*" } else { " " };
        println!(
            "{} [{}] {} instance, prefix {}, repo {}",
            marker, row.id, row.instance, row.doi_prefix, row.repo_id
        );
    }
    Ok(exit_codes::OK)
}

fn config_add(store: &Store, args: ConfigAddArgs) -> anyhow::Result<i32> {
    let id = store.insert_configuration(&NewConfiguration {
        instance: args.instance,
        doi_prefix: args.prefix,
        repo_id: args.repo_id,
        password: args.password,
        note: args.note,
    })?;
    println!("added configuration {id}");
    Ok(exit_codes::OK)
}

fn config_set_active(store: &Store, id: i64) -> anyhow::Result<i32> {
    store.set_active_configuration(id)?;
    println!("configuration {id} is now active");
    Ok(exit_codes::OK)
}
