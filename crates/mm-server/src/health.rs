//! Health Check System
//!
//! Reports on the document store and photo storage.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use mm_db::DocumentStore;
use mm_photos::Storage;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }

    /// The worse of two statuses
    fn worst(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unhealthy, _) | (_, Self::Unhealthy) => Self::Unhealthy,
            (Self::Degraded, _) | (_, Self::Degraded) => Self::Degraded,
            _ => Self::Healthy,
        }
    }
}

/// Individual component health
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Overall health report
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        if self.status.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Health checker configuration
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Timeout for individual health checks
    pub check_timeout: Duration,
    /// Cache duration for health results
    pub cache_duration: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            cache_duration: Duration::from_secs(10),
        }
    }
}

struct CachedHealth {
    report: HealthReport,
    cached_at: Instant,
}

/// Health checker service
pub struct HealthChecker {
    config: HealthConfig,
    start_time: Instant,
    cache: RwLock<Option<CachedHealth>>,
    store: Arc<dyn DocumentStore>,
    photos: Arc<dyn Storage>,
}

impl HealthChecker {
    pub fn new(
        config: HealthConfig,
        store: Arc<dyn DocumentStore>,
        photos: Arc<dyn Storage>,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            cache: RwLock::new(None),
            store,
            photos,
        }
    }

    /// Get cached health or perform checks
    pub async fn check(&self) -> HealthReport {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.cached_at.elapsed() < self.config.cache_duration {
                    debug!("Returning cached health report");
                    return cached.report.clone();
                }
            }
        }

        let report = self.perform_checks().await;

        *self.cache.write().await = Some(CachedHealth {
            report: report.clone(),
            cached_at: Instant::now(),
        });

        report
    }

    async fn perform_checks(&self) -> HealthReport {
        let components = vec![self.check_store().await, self.check_photos().await];
        let status = components
            .iter()
            .fold(HealthStatus::Healthy, |acc, c| acc.worst(c.status));

        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now(),
        }
    }

    async fn check_store(&self) -> ComponentHealth {
        let start = Instant::now();
        let (status, message) =
            match tokio::time::timeout(self.config.check_timeout, self.store.ping()).await {
                Ok(Ok(())) => (HealthStatus::Healthy, "Connected".to_string()),
                Ok(Err(e)) => {
                    warn!(error = %e, "document store check failed");
                    (HealthStatus::Unhealthy, e.to_string())
                }
                Err(_) => (HealthStatus::Unhealthy, "Timed out".to_string()),
            };

        ComponentHealth {
            name: format!("store:{}", self.store.backend()),
            status,
            message: Some(message),
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Photo storage problems only degrade the service
    async fn check_photos(&self) -> ComponentHealth {
        let start = Instant::now();
        let probe = tokio::time::timeout(
            self.config.check_timeout,
            self.photos.exists("users/.health"),
        )
        .await;
        let (status, message) = match probe {
            Ok(Ok(_)) => (HealthStatus::Healthy, "Available".to_string()),
            Ok(Err(e)) => {
                warn!(error = %e, "photo storage check failed");
                (HealthStatus::Degraded, e.to_string())
            }
            Err(_) => (HealthStatus::Degraded, "Timed out".to_string()),
        };

        ComponentHealth {
            name: format!("photos:{}", self.photos.name()),
            status,
            message: Some(message),
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Simple liveness check
pub async fn liveness() -> &'static str {
    "OK"
}

/// Readiness and full health report
pub async fn health(State(checker): State<Arc<HealthChecker>>) -> (StatusCode, Json<HealthReport>) {
    let report = checker.check().await;
    let status = report.http_status();
    (status, Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_db::MemoryStore;
    use mm_photos::MemoryStorage;

    fn checker(cache_duration: Duration) -> HealthChecker {
        HealthChecker::new(
            HealthConfig {
                cache_duration,
                ..Default::default()
            },
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStorage::new()),
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let report = checker(Duration::from_secs(10)).check().await;

        assert_eq!(report.status, HealthStatus::Healthy);
        let names: Vec<_> = report.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["store:memory", "photos:memory"]);
    }

    #[tokio::test]
    async fn test_health_cache() {
        let checker = checker(Duration::from_secs(60));

        let report1 = checker.check().await;
        let report2 = checker.check().await;

        assert_eq!(report1.timestamp, report2.timestamp);
    }

    #[test]
    fn test_status_aggregation() {
        use HealthStatus::*;
        assert_eq!(Healthy.worst(Degraded), Degraded);
        assert_eq!(Degraded.worst(Unhealthy), Unhealthy);
        assert_eq!(Healthy.worst(Healthy), Healthy);

        let report = HealthReport {
            status: Unhealthy,
            version: "1.0".to_string(),
            uptime_seconds: 100,
            components: vec![],
            timestamp: chrono::Utc::now(),
        };
        assert_eq!(report.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
