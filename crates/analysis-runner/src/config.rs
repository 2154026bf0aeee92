//! Configuration for analysis runs

use crate::error::{AnalysisError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Environment variable overriding the analysis service URL
pub const SERVICE_URL_ENV: &str = "ANALYSIS_SERVICE_URL";

/// Default endpoint of the local analysis service
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000/run-hedge-fund";

/// Configuration for the analysis runner and its HTTP adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Endpoint queried with `?tickers=<symbol>`
    pub service_url: String,

    /// Request timeout for the single fetch attempt
    pub request_timeout: Duration,

    /// Interval between starting consecutive analysts
    pub tick_interval: Duration,

    /// Lower bound of the simulated per-analyst work time
    pub reveal_delay_min: Duration,

    /// Upper bound of the simulated per-analyst work time
    pub reveal_delay_max: Duration,

    /// Pause between the last completion and summary publication
    pub settle_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            tick_interval: Duration::from_millis(300),
            reveal_delay_min: Duration::from_millis(500),
            reveal_delay_max: Duration::from_millis(1500),
            settle_interval: Duration::from_millis(1000),
        }
    }
}

impl RunnerConfig {
    /// Create a new configuration builder
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::default()
    }

    /// Load the service URL from `ANALYSIS_SERVICE_URL` if set
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(url) = analysis_utils::env_var(SERVICE_URL_ENV) {
            self.service_url = url;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.service_url).map_err(|e| {
            AnalysisError::ConfigError(format!("invalid service_url {:?}: {e}", self.service_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AnalysisError::ConfigError(format!(
                "service_url must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(AnalysisError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.tick_interval.is_zero() {
            return Err(AnalysisError::ConfigError(
                "tick_interval must be greater than 0".to_string(),
            ));
        }

        if self.reveal_delay_min > self.reveal_delay_max {
            return Err(AnalysisError::ConfigError(format!(
                "reveal_delay_min ({:?}) exceeds reveal_delay_max ({:?})",
                self.reveal_delay_min, self.reveal_delay_max
            )));
        }

        Ok(())
    }

    /// Sample one analyst's simulated work time, uniform over the configured bounds
    pub fn sample_reveal_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.reveal_delay_min.as_millis() as u64;
        let max = self.reveal_delay_max.as_millis() as u64;
        Duration::from_millis(rng.random_range(min..=max))
    }
}

/// Builder for RunnerConfig
#[derive(Debug, Default)]
pub struct RunnerConfigBuilder {
    service_url: Option<String>,
    request_timeout: Option<Duration>,
    tick_interval: Option<Duration>,
    reveal_delay_min: Option<Duration>,
    reveal_delay_max: Option<Duration>,
    settle_interval: Option<Duration>,
}

impl RunnerConfigBuilder {
    /// Set the analysis service endpoint
    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the reveal tick interval
    pub fn tick_interval(mut self, duration: Duration) -> Self {
        self.tick_interval = Some(duration);
        self
    }

    /// Set the bounds of the simulated per-analyst work time
    pub fn reveal_delay(mut self, min: Duration, max: Duration) -> Self {
        self.reveal_delay_min = Some(min);
        self.reveal_delay_max = Some(max);
        self
    }

    /// Set the settle interval
    pub fn settle_interval(mut self, duration: Duration) -> Self {
        self.settle_interval = Some(duration);
        self
    }

    /// Load the service URL from environment unless one was set explicitly
    pub fn with_env(mut self) -> Self {
        if self.service_url.is_none() {
            self.service_url = analysis_utils::env_var(SERVICE_URL_ENV);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RunnerConfig> {
        let defaults = RunnerConfig::default();

        let config = RunnerConfig {
            service_url: self.service_url.unwrap_or(defaults.service_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            tick_interval: self.tick_interval.unwrap_or(defaults.tick_interval),
            reveal_delay_min: self.reveal_delay_min.unwrap_or(defaults.reveal_delay_min),
            reveal_delay_max: self.reveal_delay_max.unwrap_or(defaults.reveal_delay_max),
            settle_interval: self.settle_interval.unwrap_or(defaults.settle_interval),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.tick_interval, Duration::from_millis(300));
        assert_eq!(config.settle_interval, Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = RunnerConfig::builder()
            .service_url("http://localhost:8080/analysis")
            .request_timeout(Duration::from_secs(2))
            .reveal_delay(Duration::from_millis(10), Duration::from_millis(20))
            .build()
            .unwrap();

        assert_eq!(config.service_url, "http://localhost:8080/analysis");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.reveal_delay_min, Duration::from_millis(10));
        assert_eq!(config.tick_interval, Duration::from_millis(300));
    }

    #[test]
    fn test_builder_explicit_url_wins_over_env() {
        let config = RunnerConfig::builder()
            .service_url("http://explicit:9000/run")
            .with_env()
            .build()
            .unwrap();
        assert_eq!(config.service_url, "http://explicit:9000/run");
    }

    #[test]
    fn test_config_from_env() {
        unsafe {
            std::env::set_var(SERVICE_URL_ENV, "http://analysis.internal:7000/run");
        }

        let config = RunnerConfig::default().with_env().unwrap();
        assert_eq!(config.service_url, "http://analysis.internal:7000/run");

        let config = RunnerConfig::builder().with_env().build().unwrap();
        assert_eq!(config.service_url, "http://analysis.internal:7000/run");

        unsafe {
            std::env::set_var(SERVICE_URL_ENV, "ftp://x");
        }

        assert!(matches!(
            RunnerConfig::default().with_env(),
            Err(AnalysisError::ConfigError(_))
        ));
        assert!(matches!(
            RunnerConfig::builder().with_env().build(),
            Err(AnalysisError::ConfigError(_))
        ));

        unsafe {
            std::env::remove_var(SERVICE_URL_ENV);
        }

        let config = RunnerConfig::default().with_env().unwrap();
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let config = RunnerConfig {
            service_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::ConfigError(_))));

        let config = RunnerConfig {
            service_url: "ftp://127.0.0.1/run".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_delay_bounds() {
        let result = RunnerConfig::builder()
            .reveal_delay(Duration::from_millis(900), Duration::from_millis(100))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_tick() {
        let config = RunnerConfig {
            tick_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sampled_delay_within_bounds() {
        let config = RunnerConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..10_000 {
            let delay = config.sample_reveal_delay(&mut rng);
            assert!(delay >= Duration::from_millis(500), "{delay:?} below bound");
            assert!(delay <= Duration::from_millis(1500), "{delay:?} above bound");
        }
    }

    #[test]
    fn test_sampled_delay_degenerate_range() {
        let config = RunnerConfig::builder()
            .reveal_delay(Duration::from_millis(40), Duration::from_millis(40))
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(config.sample_reveal_delay(&mut rng), Duration::from_millis(40));
    }
}
