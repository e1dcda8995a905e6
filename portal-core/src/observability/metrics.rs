use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

static HANDLE: Lazy<Option<PrometheusHandle>> = Lazy::new(|| {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed");
            None
        }
    }
});

/// Install the Prometheus recorder behind the `metrics` facade.
///
/// The install runs once per process; later calls return immediately so
/// tests can build several routers.
pub fn init_metrics() {
    Lazy::force(&HANDLE);
}

/// Text exposition of everything recorded so far. Empty until `init_metrics` ran.
pub fn render_metrics() -> String {
    Lazy::get(&HANDLE)
        .and_then(Option::as_ref)
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}
