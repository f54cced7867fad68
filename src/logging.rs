use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Mode;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub mode: Mode,
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

/// Filter used when `RUST_LOG` is unset. Test mode also traces every request.
pub fn default_log_level(mode: Mode) -> &'static str {
    match mode {
        Mode::Production => "info,tower_http=info",
        Mode::Testing => "debug,tower_http=debug,sqlx=warn",
    }
}

impl LoggingConfig {
    pub fn from_env(mode: Mode) -> Self {
        Self::from_lookup(mode, |key| std::env::var(key).ok())
    }

    /// `ENVIRONMENT` defaults to the label of the app's run mode.
    pub fn from_lookup<F>(mode: Mode, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_environment = match mode {
            Mode::Production => "production",
            Mode::Testing => "test",
        };
        Self {
            mode,
            loki_enabled: lookup("LOKI_ENABLED")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            loki_url: lookup("LOKI_URL"),
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "portfolio-tracker".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| default_environment.to_string()),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| default_log_level(mode).to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_enabled && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        Ok(())
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    #[cfg(feature = "loki")]
    {
        if config.loki_enabled {
            if let Some(loki_url) = config.loki_url.clone() {
                return init_with_loki(config, &loki_url);
            }
        }
    }

    let (service, mode) = (config.service_name.clone(), config.mode);
    init_console_only(config)?;
    tracing::info!("📊 Console-only logging initialized for {} ({:?} mode)", service, mode);
    Ok(())
}

fn init_console_only(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: LoggingConfig, loki_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = url::Url::parse(loki_url)?;

    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .extra_field("mode", format!("{:?}", config.mode).to_lowercase())?
        .build_url(url)?;

    // Spawn the background task that sends logs to Loki
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .init();

    tracing::info!(
        "✅ Loki logging initialized at {} for {} ({:?} mode)",
        loki_url,
        config.service_name,
        config.mode
    );

    Ok(())
}
