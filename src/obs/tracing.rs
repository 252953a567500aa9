// std
use std::future::Future;
// self
use crate::{_prelude::*, obs::RequestKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span builder used by the composed transports.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the provided client kind + stage.
	pub fn new(kind: RequestKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("hunt_client.request", client = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
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

/// Logs a request or response body at DEBUG (when tracing is enabled).
///
/// Bodies are assumed to be UTF-8 JSON; anything else is logged lossily. The
/// access token rides in the URL query, so callers are expected to pass URLs
/// only for endpoints they are comfortable seeing in debug logs.
pub fn log_body(direction: &'static str, method: &str, url: &Url, body: Option<&[u8]>) {
	#[cfg(feature = "tracing")]
	{
		match body {
			Some(bytes) => tracing::debug!(
				direction,
				method,
				%url,
				body = %String::from_utf8_lossy(bytes),
				"HTTP body",
			),
			None => tracing::debug!(direction, method, %url, "HTTP body (empty)"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (direction, method, url, body);
	}
}
