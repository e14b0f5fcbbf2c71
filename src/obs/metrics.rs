// self
use crate::obs::{CacheKind, Operation, OperationOutcome};

/// Bumps `oauth2_subject_operation_total` for `operation`, labeled with `outcome`.
pub fn record_operation_outcome(operation: Operation, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_subject_operation_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Bumps `oauth2_subject_cache_total` for a metadata or key set lookup.
pub fn record_cache_lookup(cache: CacheKind, hit: bool) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_subject_cache_total",
			"cache" => cache.as_str(),
			"result" => if hit { "hit" } else { "miss" }
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (cache, hit);
	}
}
