// self
use crate::{
	_prelude::*,
	obs::{CacheKind, Operation},
};

/// Future returned by [`OperationSpan::instrument`]; wrapped in the span under `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Without `tracing` the operation future is returned untouched.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// `oauth2_subject.operation` span opened by `authorize`, `exchange`, `refresh`, `verify` and
/// issuer discovery.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens the span for `operation`; `stage` names the public method that opened it.
	pub fn new(operation: Operation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_subject.operation",
				operation = operation.as_str(),
				stage
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Enters the span for the synchronous `authorize` path.
	pub fn entered(self) -> OperationSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OperationSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			OperationSpanGuard {}
		}
	}

	/// Attaches the span to an issuer round trip so it follows the future across `.await`s.
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

/// Keeps the span entered until dropped.
pub struct OperationSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for OperationSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OperationSpanGuard(..)")
	}
}

/// Emits a `debug` event after an issuer cache was filled from the network.
pub fn trace_cache_fill(cache: CacheKind, issuer: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(cache = cache.as_str(), issuer, "issuer cache filled");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (cache, issuer);
	}
}
