// crates.io
use parking_lot::Once;
// self
use crate::{_prelude::*, obs::OperationKind};

static INSECURE_TLS_NOTICE: Once = Once::new();

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("xiqse_client.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits the certificate-verification warning once per process.
///
/// Returns `true` for the call that emitted it.
pub fn record_insecure_tls(host: &str) -> bool {
	let mut first = false;

	INSECURE_TLS_NOTICE.call_once(|| {
		first = true;

		#[cfg(feature = "tracing")]
		tracing::warn!(host, "TLS certificate verification is disabled for the Site Engine endpoint.");
		#[cfg(not(feature = "tracing"))]
		let _ = host;
	});

	first
}
