use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub river: RiverSettings,
    pub monitoring: MonitoringSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RiverSettings {
    /// The feature name to keep from the geometry file, e.g. "River Lee".
    pub name: String,
    /// The property carrying the feature name in the source file.
    #[serde(default = "default_name_property")]
    pub name_property: String,
    pub geometry_path: String,
}

/// Where monitoring readings come from: a JSON document on disk, or
/// the same document served over HTTP.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonitoringSettings {
    File { path: String },
    Http { url: String },
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_name_property() -> String {
    // OS Open Rivers / WatercourseLink attribute naming
    "name1".to_string()
}

pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/service"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
