use nodal::ephemeris::{HouseSystem, NodeConvention};
use nodal::location::geocoder::{DEFAULT_USER_AGENT, NOMINATIM_ENDPOINT};
use nodal::location::GeocodingStrategy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything fixed at process start: ephemeris data, chart policy,
/// geocoding and the city dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct NodalSettings {
    /// `None` defers to `SWISS_EPHEMERIS_PATH` and the adapter default.
    pub ephemeris_path: Option<PathBuf>,
    pub node_convention: NodeConvention,
    pub house_system: HouseSystem,
    pub geocoding_strategy: GeocodingStrategy,
    pub geocoding_endpoint: String,
    pub user_agent: String,
    pub geocoding_timeout: Duration,
    pub cities_csv: Option<PathBuf>,
}

impl Default for NodalSettings {
    fn default() -> Self {
        Self {
            ephemeris_path: None,
            node_convention: NodeConvention::default(),
            house_system: HouseSystem::default(),
            geocoding_strategy: GeocodingStrategy::default(),
            geocoding_endpoint: NOMINATIM_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geocoding_timeout: Duration::from_secs(default_timeout_secs()),
            cities_csv: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    node: NodeConvention,
    #[serde(default)]
    house_system: HouseSystem,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeocodingToml {
    #[serde(default)]
    strategy: GeocodingStrategy,
    #[serde(default = "default_endpoint")]
    endpoint: String,
    #[serde(default = "default_user_agent")]
    user_agent: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for GeocodingToml {
    fn default() -> Self {
        Self {
            strategy: GeocodingStrategy::default(),
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CitiesToml {
    #[serde(default)]
    csv_path: Option<PathBuf>,
}

fn default_endpoint() -> String {
    NOMINATIM_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    geocoding: GeocodingToml,
    #[serde(default)]
    cities: CitiesToml,
}

/// Try common relative paths for `configs/nodal.toml`, returning the path
/// that was read along with its contents.
pub fn read_config_toml_text() -> anyhow::Result<(PathBuf, String)> {
    let paths = ["configs/nodal.toml", "../../configs/nodal.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok((PathBuf::from(p), c));
        }
    }
    anyhow::bail!("Could not load nodal.toml from {:?}", paths);
}

pub fn parse_settings(text: &str) -> anyhow::Result<NodalSettings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse nodal.toml: {e}"))?;
    let RootConfigToml {
        ephemeris,
        geocoding,
        cities,
    } = root;

    if geocoding.timeout_secs == 0 {
        anyhow::bail!("geocoding.timeout_secs must be at least 1");
    }
    if geocoding.endpoint.trim().is_empty() {
        anyhow::bail!("geocoding.endpoint must not be empty");
    }

    Ok(NodalSettings {
        ephemeris_path: ephemeris.path,
        node_convention: ephemeris.node,
        house_system: ephemeris.house_system,
        geocoding_strategy: geocoding.strategy,
        geocoding_endpoint: geocoding.endpoint,
        user_agent: geocoding.user_agent,
        geocoding_timeout: Duration::from_secs(geocoding.timeout_secs),
        cities_csv: cities.csv_path,
    })
}

/// Load settings from `path`, or from the default locations when `None`.
/// Relative paths inside the file are resolved against the file's own
/// directory, and referenced files must exist.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<NodalSettings> {
    let (config_path, text) = match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", p.display()))?;
            (p.to_path_buf(), text)
        }
        None => read_config_toml_text()?,
    };
    let mut settings = parse_settings(&text)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    rebase_paths(&mut settings, base);
    validate_paths(&settings)?;
    Ok(settings)
}

fn rebase_paths(settings: &mut NodalSettings, base: &Path) {
    for path in [&mut settings.ephemeris_path, &mut settings.cities_csv]
        .into_iter()
        .flatten()
    {
        if path.is_relative() {
            *path = base.join(&*path);
        }
    }
}

pub fn validate_paths(settings: &NodalSettings) -> anyhow::Result<()> {
    if let Some(csv) = &settings.cities_csv {
        if !csv.exists() {
            anyhow::bail!("cities.csv_path does not exist: {}", csv.display());
        }
    }
    if let Some(ephe) = &settings.ephemeris_path {
        if !ephe.is_dir() {
            anyhow::bail!("ephemeris.path is not a directory: {}", ephe.display());
        }
    }
    Ok(())
}
