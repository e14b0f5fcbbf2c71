//! Client operations: authorization challenges, token grants, and subject verification.

pub mod authorize;
pub mod exchange;
pub mod refresh;
pub mod verify;

pub use authorize::*;
pub use refresh::*;
pub use verify::*;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	http::{self, IssuerHttpClient},
	issuer::{IssuerCache, IssuerMetadata, JwksDocument, KeySet},
	oauth::{self, IssuerEndpoint, JsonResponse, TransportErrorMapper},
	obs::{CacheKind, Operation, OperationSpan},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestSubjectClient = Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// OAuth 2.0 client bound to one issuer.
///
/// The client owns the HTTP transport, the transport error mapper, and the issuer metadata and
/// key set caches. Clones share the transport and the caches, so cloning is the intended way to
/// hand the client to concurrent tasks. Tokens are never stored; every operation returns them
/// to the caller.
pub struct Client<C, M>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Resolved configuration (client identifier, issuer, endpoints).
	pub config: ClientConfig,
	/// HTTP client wrapper used for every outbound issuer request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	metadata_cache: Arc<IssuerCache<IssuerMetadata>>,
	key_cache: Arc<IssuerCache<KeySet>>,
}
impl<C, M> Client<C, M>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			refresh_metrics: Default::default(),
			metadata_cache: Arc::new(IssuerCache::new(CacheKind::Metadata)),
			key_cache: Arc::new(IssuerCache::new(CacheKind::KeySet)),
		}
	}

	/// Resolves the issuer's well-known metadata, fetching it on first use.
	///
	/// Later calls (on this client or any clone) return the cached document without touching
	/// the network.
	pub async fn issuer_metadata(&self) -> Result<Arc<IssuerMetadata>> {
		let span = OperationSpan::new(Operation::Discovery, "issuer_metadata");

		span.instrument(
			self.metadata_cache.get_or_try_fill(self.config.issuer(), || self.fetch_metadata()),
		)
		.await
	}

	/// Resolves the issuer's verification key set, fetching metadata and JWKS on first use.
	pub async fn key_set(&self) -> Result<Arc<KeySet>> {
		let span = OperationSpan::new(Operation::Discovery, "key_set");

		span.instrument(
			self.key_cache.get_or_try_fill(self.config.issuer(), || self.fetch_key_set()),
		)
		.await
	}

	async fn fetch_metadata(&self) -> Result<IssuerMetadata> {
		let request = http::get_json(&self.config.endpoints().metadata)?;

		self.call_issuer(IssuerEndpoint::Metadata, request).await?.require_success()?.into_typed()
	}

	async fn fetch_key_set(&self) -> Result<KeySet> {
		let metadata = self.issuer_metadata().await?;
		let request = http::get_json(&metadata.jwks_uri)?;
		let document = self
			.call_issuer(IssuerEndpoint::Jwks, request)
			.await?
			.require_success()?
			.into_typed::<JwksDocument>()?;

		Ok(KeySet::from_document(document)?)
	}

	pub(crate) async fn call_issuer(
		&self,
		endpoint: IssuerEndpoint,
		request: oauth2::HttpRequest,
	) -> Result<JsonResponse> {
		oauth::call_json(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			endpoint,
			request,
		)
		.await
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a new client for the provided configuration.
	///
	/// The client provisions its own reqwest-backed transport so callers do not need to pass
	/// HTTP handles explicitly. Use [`Client::with_http_client`] to supply a tuned
	/// [`ReqwestClient`] (timeouts, proxies) or a different transport altogether.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for Client<C, M>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			metadata_cache: self.metadata_cache.clone(),
			key_cache: self.key_cache.clone(),
		}
	}
}
impl<C, M> Debug for Client<C, M>
where
	C: ?Sized + IssuerHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("client_id", &self.config.client_id())
			.field("issuer", &self.config.issuer())
			.field("metadata_cached", &self.metadata_cache.get(self.config.issuer()).is_some())
			.field("key_set_cached", &self.key_cache.get(self.config.issuer()).is_some())
			.finish()
	}
}
