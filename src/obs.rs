//! Optional observability helpers for client operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_subject.operation` with the
//!   `operation` and `stage` (call site) fields, plus `debug` events when an issuer cache is
//!   filled.
//! - Enable `metrics` to increment the `oauth2_subject_operation_total` counter for every
//!   attempt/success/rejection/failure, labeled by `operation` + `outcome`, and the
//!   `oauth2_subject_cache_total` counter labeled by `cache` + `result`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Authorization URL + challenge construction.
	Authorize,
	/// Authorization code exchange.
	Exchange,
	/// Refresh token grant (including the fast path).
	Refresh,
	/// Bearer token verification.
	Verify,
	/// Issuer metadata or key set resolution.
	Discovery,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Authorize => "authorize",
			Operation::Exchange => "exchange",
			Operation::Refresh => "refresh",
			Operation::Verify => "verify",
			Operation::Discovery => "discovery",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Protocol rejection returned as a [`ClientError`](crate::error::ClientError).
	Rejected,
	/// Infrastructure fault propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Rejected => "rejected",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Classifies a finished operation result.
	pub fn of<T>(result: &Result<crate::error::Outcome<T>>) -> Self {
		match result {
			Ok(Ok(_)) => OperationOutcome::Success,
			Ok(Err(_)) => OperationOutcome::Rejected,
			Err(_) => OperationOutcome::Failure,
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Issuer caches whose lookups are counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheKind {
	/// Well-known metadata cache.
	Metadata,
	/// JWKS key set cache.
	KeySet,
}
impl CacheKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheKind::Metadata => "metadata",
			CacheKind::KeySet => "key_set",
		}
	}
}
impl Display for CacheKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
