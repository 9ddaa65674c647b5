use opentelemetry::{
    Context, KeyValue,
    global::{self, BoxedTracer},
    trace::{Span, SpanKind, Status as SpanStatus, TraceContextExt, Tracer},
};
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, Status, TracingContext},
};
use std::{future::Future, sync::Arc};
use tokio::time::Instant;
use tracing::{error, info};

/// Span and request metrics around one service operation.
#[derive(Clone)]
pub struct Observer {
    tracer_name: &'static str,
    metrics: Arc<Metrics>,
}

impl Observer {
    pub fn new(tracer_name: &'static str, metrics: Arc<Metrics>) -> Self {
        Self {
            tracer_name,
            metrics,
        }
    }

    fn get_tracer(&self) -> BoxedTracer {
        global::tracer(self.tracer_name)
    }

    fn start_tracing(&self, operation_name: &'static str, attributes: Vec<KeyValue>) -> TracingContext {
        let start_time = Instant::now();
        let tracer = self.get_tracer();
        let mut span = tracer
            .span_builder(operation_name)
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name)],
        );

        let cx = Context::current_with_span(span);
        TracingContext { cx, start_time }
    }

    fn complete_tracing(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        operation_name: &'static str,
        outcome: Result<(), &ServiceError>,
    ) {
        let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();
        let span = tracing_ctx.cx.span();

        let status = match outcome {
            Ok(()) => {
                info!("✅ Operation completed successfully: {operation_name}");
                span.add_event(
                    "Operation completed",
                    vec![
                        KeyValue::new("status", "SUCCESS"),
                        KeyValue::new("duration_secs", elapsed),
                    ],
                );
                Status::Success
            }
            Err(err) => {
                error!("❌ Operation failed: {operation_name}: {err}");
                span.add_event(
                    "Operation completed",
                    vec![
                        KeyValue::new("status", "ERROR"),
                        KeyValue::new("error.code", err.code()),
                        KeyValue::new("duration_secs", elapsed),
                    ],
                );
                span.set_status(SpanStatus::error(err.to_string()));
                Status::Error
            }
        };

        self.metrics.record(method, operation_name, status, elapsed);

        span.end();
    }

    pub async fn observe<T, Fut>(
        &self,
        method: Method,
        operation_name: &'static str,
        attributes: Vec<KeyValue>,
        fut: Fut,
    ) -> Result<T, ServiceError>
    where
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let tracing_ctx = self.start_tracing(operation_name, attributes);

        let result = fut.await;

        self.complete_tracing(
            &tracing_ctx,
            method,
            operation_name,
            result.as_ref().map(|_| ()),
        );

        result
    }
}
