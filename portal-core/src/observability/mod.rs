pub mod logging;
pub mod metrics;
pub mod trace_context;

pub use logging::init_tracing;
pub use metrics::{init_metrics, render_metrics};
pub use trace_context::{
    REQUEST_ID_HEADER, TRACEPARENT_HEADER, TracedClientExt, TracedRequest, inject_trace_context,
};
