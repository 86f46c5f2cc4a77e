//! Configuration for seeding runs.
//!
//! Settings are layered: a built-in profile, then an optional YAML file,
//! then command-line flags. [`SeedConfig::builder`] merges the layers and
//! validates the result before any storage is touched.

use crate::seed::SeedPlan;
use crate::store::DEFAULT_DATABASE;
use loja_data_gen::model::DEFAULT_DELIVERY_STATUSES;
use loja_data_gen::{Catalog, Locale, Profile, SeedCounts, WeightedTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-entity row counts; unset entries keep the profile's value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountsConfig {
    pub customers: Option<usize>,
    pub products: Option<usize>,
    pub cashiers: Option<usize>,
    pub payment_methods: Option<usize>,
    pub delivery_statuses: Option<usize>,
    pub sales: Option<usize>,
}

impl CountsConfig {
    fn apply(&self, counts: &mut SeedCounts) {
        let overrides = [
            (&mut counts.customers, self.customers),
            (&mut counts.products, self.products),
            (&mut counts.cashiers, self.cashiers),
            (&mut counts.payment_methods, self.payment_methods),
            (&mut counts.delivery_statuses, self.delivery_statuses),
            (&mut counts.sales, self.sales),
        ];
        for (slot, value) in overrides {
            if let Some(n) = value {
                *slot = n;
            }
        }
    }
}

/// Weighted tables replacing the built-in ones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub product_categories: Option<BTreeMap<String, f64>>,
    pub payment_methods: Option<BTreeMap<String, f64>>,
}

impl CatalogConfig {
    fn to_catalog(&self) -> anyhow::Result<Catalog> {
        let mut catalog = Catalog::default();
        if let Some(ref weights) = self.product_categories {
            catalog.product_categories = weighted("product_categories", weights)?;
        }
        if let Some(ref weights) = self.payment_methods {
            catalog.payment_methods = weighted("payment_methods", weights)?;
        }
        Ok(catalog)
    }
}

fn weighted(name: &str, weights: &BTreeMap<String, f64>) -> anyhow::Result<WeightedTable> {
    let entries = weights.iter().map(|(k, v)| (k.clone(), *v)).collect();
    Ok(WeightedTable::new(name, entries)?)
}

/// Complete YAML configuration for the seed command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedYamlConfig {
    pub database: Option<PathBuf>,
    pub seed: Option<u64>,
    pub locale: Option<String>,
    pub profile: Option<String>,
    pub counts: CountsConfig,
    pub delivery_statuses: Option<Vec<String>>,
    pub catalog: CatalogConfig,
}

impl SeedYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: SeedYamlConfig = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub database: PathBuf,
    pub profile: Profile,
    pub plan: SeedPlan,
}

impl SeedConfig {
    pub fn builder() -> SeedConfigBuilder {
        SeedConfigBuilder::default()
    }
}

/// Builder for SeedConfig
#[derive(Default)]
pub struct SeedConfigBuilder {
    config_file: Option<PathBuf>,
    yaml: Option<SeedYamlConfig>,
    database: Option<PathBuf>,
    profile: Option<String>,
    counts: CountsConfig,
    seed: Option<u64>,
    locale: Option<String>,
    dry_run: bool,
    progress: bool,
}

impl SeedConfigBuilder {
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Use an already parsed YAML layer instead of reading a file
    pub fn yaml(mut self, yaml: SeedYamlConfig) -> Self {
        self.yaml = Some(yaml);
        self
    }

    pub fn database(mut self, path: Option<PathBuf>) -> Self {
        self.database = path;
        self
    }

    pub fn profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    pub fn counts(mut self, counts: CountsConfig) -> Self {
        self.counts = counts;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn build(self) -> anyhow::Result<SeedConfig> {
        let yaml = match (self.yaml, self.config_file) {
            (Some(yaml), _) => yaml,
            (None, Some(ref path)) => SeedYamlConfig::load(path)?,
            (None, None) => SeedYamlConfig::default(),
        };

        let profile = match self.profile.or(yaml.profile.clone()) {
            Some(name) => name.parse::<Profile>().map_err(|e| anyhow::anyhow!(e))?,
            None => Profile::default(),
        };

        // CLI counts take precedence over YAML counts
        let mut counts = profile.counts();
        yaml.counts.apply(&mut counts);
        self.counts.apply(&mut counts);

        let locale = match self.locale.or(yaml.locale.clone()) {
            Some(name) => name.parse::<Locale>().map_err(|e| anyhow::anyhow!(e))?,
            None => Locale::default(),
        };

        let delivery_statuses = yaml.delivery_statuses.clone().unwrap_or_else(|| {
            DEFAULT_DELIVERY_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect()
        });
        if counts.delivery_statuses > 0 && delivery_statuses.is_empty() {
            anyhow::bail!(
                "delivery_statuses is empty but {} delivery statuses were requested",
                counts.delivery_statuses
            );
        }

        let catalog = yaml.catalog.to_catalog()?;
        let database = self
            .database
            .or(yaml.database)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
        let seed = self.seed.or(yaml.seed).unwrap_or_else(rand::random);

        Ok(SeedConfig {
            database,
            profile,
            plan: SeedPlan {
                counts,
                delivery_statuses,
                seed,
                locale,
                catalog,
                dry_run: self.dry_run,
                progress: self.progress,
                today: None,
            },
        })
    }
}
