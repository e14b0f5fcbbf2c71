// self
use crate::{
	_prelude::*,
	obs::{self, CacheKind},
};

/// Per-client memo of an issuer document, keyed by the issuer string.
///
/// Fills are serialized per issuer so concurrent first lookups share one fetch. A failed fill
/// stores nothing and the next lookup tries again.
pub(crate) struct IssuerCache<T> {
	kind: CacheKind,
	entries: RwLock<HashMap<String, Arc<T>>>,
	fill_guards: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}
impl<T> IssuerCache<T> {
	pub(crate) fn new(kind: CacheKind) -> Self {
		Self { kind, entries: Default::default(), fill_guards: Default::default() }
	}

	pub(crate) fn get(&self, issuer: &str) -> Option<Arc<T>> {
		self.entries.read().get(issuer).cloned()
	}

	/// Returns the cached value for `issuer`, running `fill` at most once across concurrent
	/// callers when it is absent.
	pub(crate) async fn get_or_try_fill<F, Fut>(&self, issuer: &str, fill: F) -> Result<Arc<T>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		if let Some(hit) = self.get(issuer) {
			obs::record_cache_lookup(self.kind, true);

			return Ok(hit);
		}

		let guard = self.fill_guard(issuer);
		let _singleflight = guard.lock().await;

		// A concurrent caller may have filled the entry while this one waited.
		if let Some(hit) = self.get(issuer) {
			obs::record_cache_lookup(self.kind, true);

			return Ok(hit);
		}

		obs::record_cache_lookup(self.kind, false);

		let value = Arc::new(fill().await?);

		self.entries.write().insert(issuer.to_owned(), value.clone());
		obs::trace_cache_fill(self.kind, issuer);

		Ok(value)
	}

	fn fill_guard(&self, issuer: &str) -> Arc<AsyncMutex<()>> {
		let mut guards = self.fill_guards.lock();

		guards.entry(issuer.to_owned()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
impl<T> Debug for IssuerCache<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let entries = self.entries.read();
		let mut issuers = entries.keys().collect::<Vec<_>>();

		issuers.sort();

		f.debug_struct("IssuerCache").field("kind", &self.kind).field("issuers", &issuers).finish()
	}
}
