// SPDX-FileCopyrightText: 2026 Countdown Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics exporter for the countdown bot.
//!
//! Installs the metrics-rs Prometheus recorder together with its built-in
//! HTTP listener, which serves the text exposition format on `/metrics`.

pub mod recording;

use std::net::SocketAddr;

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusBuilder;

use countdown_core::{AdapterType, CountdownError, HealthStatus, PluginAdapter};

pub use recording::{
    record_callback, record_command, record_event_created, register_metrics,
    set_pending_conversations,
};

/// Prometheus exporter adapter.
pub struct PrometheusAdapter {
    listen_address: SocketAddr,
}

impl PrometheusAdapter {
    /// Install the recorder globally and start the HTTP listener.
    ///
    /// Must be called from within a Tokio runtime. Only one recorder can be
    /// installed per process.
    pub fn install(listen_address: SocketAddr) -> Result<Self, CountdownError> {
        PrometheusBuilder::new()
            .with_http_listener(listen_address)
            .install()
            .map_err(|e| {
                CountdownError::Internal(format!("failed to install Prometheus exporter: {e}"))
            })?;

        recording::register_metrics();
        tracing::info!(%listen_address, "prometheus exporter listening");

        Ok(Self { listen_address })
    }

    /// Address the exporter is serving on.
    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, CountdownError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CountdownError> {
        Ok(())
    }
}
