//! Tracing hooks for the points where lazyq does real work: stateful adapters
//! materializing their state, and eager adapters walking their input.
//!
//! Without the `tracing` feature every hook compiles to nothing.

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::span!(tracing::Level::TRACE, "lazyq", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}

/// A stateful adapter built its heap / table / index.
pub(crate) fn materialized(adapter: &'static str, inputs: usize, outputs: usize) {
    #[cfg(feature = "tracing")]
    {
        tracing::trace!(adapter, inputs, outputs, "materialized");
        emit_span(
            "materialize",
            &[
                ("adapter", adapter.to_string()),
                ("inputs", inputs.to_string()),
                ("outputs", outputs.to_string()),
            ],
        );
    }
    #[cfg(not(feature = "tracing"))]
    let _ = (adapter, inputs, outputs);
}

/// An eager adapter walked `walked` elements of its input at the call site.
pub(crate) fn split(adapter: &'static str, walked: usize) {
    #[cfg(feature = "tracing")]
    {
        tracing::trace!(adapter, walked, "eager split");
        emit_span(
            "split",
            &[("adapter", adapter.to_string()), ("walked", walked.to_string())],
        );
    }
    #[cfg(not(feature = "tracing"))]
    let _ = (adapter, walked);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hooks_run_without_a_subscriber() {
        materialized("group", 4, 2);
        split("take", 3);
        emit_span("split", &[]);
    }
}
