//! Service configuration.
//!
//! Merchant identity plus the tuning knobs of the simulated transport and
//! the polling loop. Built with a `with_*` builder so callers only name
//! what they change.

use std::time::Duration;

/// Sandbox merchant app id used when none is configured.
pub const DEFAULT_APP_ID: &str = "2021000000000000";
/// Gateway endpoint; informational while the transport is simulated.
pub const DEFAULT_GATEWAY: &str = "https://openapi.alipay.com/gateway.do";
/// Pre-provisioned checkout QR asset returned with every order summary.
pub const DEFAULT_QR_CODE_URL: &str = "1742965101857.jpg";

/// Pause between poll cycles.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(3000);
/// Poll cycles before a still-pending order times out.
pub const DEFAULT_MAX_POLLING_ATTEMPTS: u32 = 10;

/// Bounds of the simulated gateway round-trip latency.
pub const DEFAULT_LATENCY_MIN: Duration = Duration::from_millis(300);
pub const DEFAULT_LATENCY_MAX: Duration = Duration::from_millis(1000);

/// Configuration of the payment order service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub app_id: String,
    pub gateway: String,
    pub qr_code_url: String,
    pub polling_interval: Duration,
    pub max_polling_attempts: u32,
    pub latency_min: Duration,
    pub latency_max: Duration,
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfigBuilder::default().build()
    }
}

/// Builder for [`ServiceConfig`]. Starts from the defaults above.
#[derive(Debug, Clone)]
pub struct ServiceConfigBuilder {
    app_id: String,
    gateway: String,
    qr_code_url: String,
    polling_interval: Duration,
    max_polling_attempts: u32,
    latency_min: Duration,
    latency_max: Duration,
}

impl Default for ServiceConfigBuilder {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_owned(),
            gateway: DEFAULT_GATEWAY.to_owned(),
            qr_code_url: DEFAULT_QR_CODE_URL.to_owned(),
            polling_interval: DEFAULT_POLLING_INTERVAL,
            max_polling_attempts: DEFAULT_MAX_POLLING_ATTEMPTS,
            latency_min: DEFAULT_LATENCY_MIN,
            latency_max: DEFAULT_LATENCY_MAX,
        }
    }
}

impl ServiceConfigBuilder {
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    pub fn with_qr_code_url(mut self, qr_code_url: impl Into<String>) -> Self {
        self.qr_code_url = qr_code_url.into();
        self
    }

    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    pub fn with_max_polling_attempts(mut self, attempts: u32) -> Self {
        self.max_polling_attempts = attempts;
        self
    }

    /// Sets both latency bounds; pass zeros to make the simulated
    /// round-trip instantaneous.
    pub fn with_latency_bounds(mut self, min: Duration, max: Duration) -> Self {
        self.latency_min = min;
        self.latency_max = max;
        self
    }

    pub fn build(self) -> ServiceConfig {
        ServiceConfig {
            app_id: self.app_id,
            gateway: self.gateway,
            qr_code_url: self.qr_code_url,
            polling_interval: self.polling_interval,
            max_polling_attempts: self.max_polling_attempts,
            latency_min: self.latency_min,
            latency_max: self.latency_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_knobs() {
        let config = ServiceConfig::default();
        assert_eq!(config.app_id, DEFAULT_APP_ID);
        assert_eq!(config.polling_interval, Duration::from_millis(3000));
        assert_eq!(config.max_polling_attempts, 10);
        assert_eq!(config.qr_code_url, DEFAULT_QR_CODE_URL);
    }

    #[test]
    fn builder_overrides_only_what_is_named() {
        let config = ServiceConfig::builder()
            .with_app_id("2088000000000001")
            .with_polling_interval(Duration::from_millis(500))
            .with_latency_bounds(Duration::ZERO, Duration::ZERO)
            .build();

        assert_eq!(config.app_id, "2088000000000001");
        assert_eq!(config.polling_interval, Duration::from_millis(500));
        assert_eq!(config.latency_min, Duration::ZERO);
        assert_eq!(config.gateway, DEFAULT_GATEWAY);
        assert_eq!(config.max_polling_attempts, DEFAULT_MAX_POLLING_ATTEMPTS);
    }
}
