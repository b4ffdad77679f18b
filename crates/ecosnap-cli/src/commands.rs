//! Command parsing and execution.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use tracing::warn;

use ecosnap_core::cache::{CacheStorage, DiskCacheStorage};
use ecosnap_core::http::{HttpFetcher, Request};
use ecosnap_core::utils::truncate_string;
use ecosnap_core::{Config, Material, OfflineCacheManager, ProductLookup, StatsStore};

/// Longest body preview printed by `fetch`
const MAX_BODY_PREVIEW: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Install,
    Fetch { target: String },
    Lookup { barcode: String, record: bool },
    Record { material: Material, barcode: bool },
    Stats,
    Status,
    Config { init: bool },
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| anyhow!("Missing command"))?;
        let flag = |f: &str| rest.iter().any(|a| a == f);
        let positional = || {
            rest.iter()
                .find(|a| !a.starts_with("--"))
                .cloned()
                .ok_or_else(|| anyhow!("'{}' needs an argument", name))
        };

        match name.as_str() {
            "install" => Ok(Command::Install),
            "fetch" => Ok(Command::Fetch {
                target: positional()?,
            }),
            "lookup" => Ok(Command::Lookup {
                barcode: positional()?,
                record: flag("--record"),
            }),
            "record" => {
                let material = positional()?.parse::<Material>().map_err(|e| anyhow!(e))?;
                Ok(Command::Record {
                    material,
                    barcode: flag("--barcode"),
                })
            }
            "stats" => Ok(Command::Stats),
            "status" => Ok(Command::Status),
            "config" => Ok(Command::Config {
                init: flag("--init"),
            }),
            other => bail!("Unknown command '{}'", other),
        }
    }
}

/// The core components, built once from config.
pub struct Services {
    pub config: Config,
    pub cache: Arc<OfflineCacheManager>,
    pub stats: StatsStore,
}

impl Services {
    pub fn build(config: Config) -> Result<Self> {
        let storage = DiskCacheStorage::new(config.cache_dir()?)
            .context("Failed to open cache storage")?;
        let fetcher =
            HttpFetcher::with_timeout(config.request_timeout()).context("Failed to build HTTP client")?;
        let cache = OfflineCacheManager::new(
            config.cache_settings()?,
            Arc::new(storage),
            Arc::new(fetcher),
        );

        let mut stats = StatsStore::open(&config.data_dir()?);
        if config.serialize_updates {
            stats = stats.with_serialized_updates();
        }

        Ok(Self {
            config,
            cache: Arc::new(cache),
            stats,
        })
    }

    /// Resume control of an installed generation; otherwise requests pass through.
    async fn resume_cache(&self) -> Result<()> {
        if !self.cache.resume().await? {
            warn!(
                cache = %self.config.cache_name,
                "Cache not installed; requests will not be cached (run `ecosnap install`)"
            );
        }
        Ok(())
    }
}

pub async fn run(services: &Services, command: Command) -> Result<()> {
    match command {
        Command::Install => install(services).await,
        Command::Fetch { target } => fetch(services, &target).await,
        Command::Lookup { barcode, record } => lookup(services, &barcode, record).await,
        Command::Record { material, barcode } => {
            services.stats.record_classification(material, barcode).await;
            print_stats(services).await
        }
        Command::Stats => print_stats(services).await,
        Command::Status => status(services).await,
        Command::Config { init } => show_config(&services.config, init),
    }
}

async fn install(services: &Services) -> Result<()> {
    services
        .cache
        .install()
        .await
        .context("Install failed; the previous cache generation stays in use")?;
    let report = services.cache.activate().await?;

    println!("Installed cache generation {}", services.config.cache_name);
    for name in report.deleted {
        println!("  deleted stale generation {}", name);
    }
    Ok(())
}

async fn fetch(services: &Services, target: &str) -> Result<()> {
    services.resume_cache().await?;
    let origin = services.config.origin_url()?;
    let request = Request::resolve_get(&origin, target)?;
    let route = services.cache.route(&request);

    let response = services
        .cache
        .handle(request)
        .await
        .with_context(|| format!("Failed to fetch {}", target))?;

    eprintln!("{} ({:?})", response.status, route);
    println!("{}", truncate_string(&response.text(), MAX_BODY_PREVIEW));
    Ok(())
}

async fn lookup(services: &Services, barcode: &str, record: bool) -> Result<()> {
    services.resume_cache().await?;
    let lookup = ProductLookup::new(services.cache.clone(), services.config.lookup_base()?);
    let info = lookup.lookup(barcode).await;
    println!("{}", serde_json::to_string_pretty(&info)?);

    if record {
        match info.material.and_then(|m| m.material()) {
            Some(material) if info.found => {
                services.stats.record_classification(material, true).await;
                print_stats(services).await?;
            }
            _ => eprintln!("Nothing recorded: no recyclable material identified"),
        }
    }
    Ok(())
}

async fn print_stats(services: &Services) -> Result<()> {
    let stats = services.stats.get_stats().await;
    let impact = services.stats.compute_impact(&stats);
    let report = json!({ "stats": stats, "impact": impact });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn status(services: &Services) -> Result<()> {
    let storage = services.cache.storage();
    let current = &services.config.cache_name;

    let names = storage.keys().await?;
    if names.is_empty() {
        println!("No cache generations installed");
        return Ok(());
    }
    for name in &names {
        let marker = if name == current { "*" } else { " " };
        println!("{} {}", marker, name);
    }

    if storage.has(current).await? {
        let mut entries = storage.open(current).await?.entries().await?;
        entries.sort_by(|a, b| a.data.url.cmp(&b.data.url));
        for entry in entries {
            println!(
                "    {:>3} {:<60} {}",
                entry.data.response.status,
                entry.data.url,
                entry.age_display()
            );
        }
    }
    Ok(())
}

fn show_config(config: &Config, init: bool) -> Result<()> {
    if init {
        config.save().context("Failed to write config file")?;
        eprintln!("Config written");
    }
    println!("{}", config.to_json()?);
    Ok(())
}
