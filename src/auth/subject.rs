//! Subjects embedded in access tokens and the schemas that validate them.
//!
//! A [`SubjectSchemas`] set maps each subject `type` to a [`SubjectSchema`]. Verification looks
//! the token's `type` up in the set and hands the raw `properties` to the schema, which returns
//! either the validated value or a list of [`SchemaIssue`]s.

// std
use std::marker::PhantomData;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Single problem reported by a schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
	/// Dotted path to the offending value (`.` for the root).
	pub path: String,
	/// Human-readable description of the problem.
	pub message: String,
}
impl SchemaIssue {
	/// Creates a new issue.
	pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
		Self { path: path.into(), message: message.into() }
	}
}
impl Display for SchemaIssue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}: {}", self.path, self.message)
	}
}

/// Validation capability for one subject type.
pub trait SubjectSchema
where
	Self: Send + Sync,
{
	/// Validates raw subject properties, returning the validated value or its issues.
	fn validate(&self, properties: &serde_json::Value)
	-> Result<serde_json::Value, Vec<SchemaIssue>>;
}
impl<F> SubjectSchema for F
where
	F: Send + Sync + Fn(&serde_json::Value) -> Result<serde_json::Value, Vec<SchemaIssue>>,
{
	fn validate(
		&self,
		properties: &serde_json::Value,
	) -> Result<serde_json::Value, Vec<SchemaIssue>> {
		self(properties)
	}
}

/// Schema backed by a serde type: properties are valid when they deserialize into `T`.
///
/// The validated value is `T` serialized back to JSON, so unknown fields are dropped and
/// defaults are filled in.
pub struct TypedSchema<T>(PhantomData<fn() -> T>);
impl<T> TypedSchema<T> {
	/// Creates the schema.
	pub fn new() -> Self {
		Self(PhantomData)
	}
}
impl<T> Default for TypedSchema<T> {
	fn default() -> Self {
		Self::new()
	}
}
impl<T> Debug for TypedSchema<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TypedSchema<{}>", std::any::type_name::<T>())
	}
}
impl<T> SubjectSchema for TypedSchema<T>
where
	T: DeserializeOwned + Serialize,
{
	fn validate(
		&self,
		properties: &serde_json::Value,
	) -> Result<serde_json::Value, Vec<SchemaIssue>> {
		let typed: T = serde_path_to_error::deserialize(properties).map_err(|err| {
			vec![SchemaIssue::new(err.path().to_string(), err.inner().to_string())]
		})?;

		serde_json::to_value(typed).map_err(|err| vec![SchemaIssue::new(".", err.to_string())])
	}
}

/// Caller-supplied mapping from subject type to schema.
#[derive(Clone, Default)]
pub struct SubjectSchemas(HashMap<String, Arc<dyn SubjectSchema>>);
impl SubjectSchemas {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `schema` for subject `kind`, replacing any previous entry.
	pub fn with(mut self, kind: impl Into<String>, schema: impl 'static + SubjectSchema) -> Self {
		self.insert(kind, schema);

		self
	}

	/// Registers a [`TypedSchema`] for subject `kind`.
	pub fn with_type<T>(self, kind: impl Into<String>) -> Self
	where
		T: 'static + DeserializeOwned + Serialize,
	{
		self.with(kind, TypedSchema::<T>::new())
	}

	/// Registers `schema` for subject `kind` in place.
	pub fn insert(&mut self, kind: impl Into<String>, schema: impl 'static + SubjectSchema) {
		self.0.insert(kind.into(), Arc::new(schema));
	}

	/// Looks up the schema for `kind`.
	pub fn get(&self, kind: &str) -> Option<&dyn SubjectSchema> {
		self.0.get(kind).map(|schema| schema.as_ref())
	}

	/// Returns `true` when no schema is registered.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Validates `properties` against the schema registered for `kind`.
	pub fn validate(
		&self,
		kind: &str,
		properties: &serde_json::Value,
	) -> Result<serde_json::Value, SubjectRejection> {
		let schema = self.get(kind).ok_or_else(|| SubjectRejection::UnknownType(kind.to_owned()))?;

		schema.validate(properties).map_err(SubjectRejection::Issues)
	}
}
impl Debug for SubjectSchemas {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut kinds = self.0.keys().collect::<Vec<_>>();

		kinds.sort();

		f.debug_tuple("SubjectSchemas").field(&kinds).finish()
	}
}

/// Why a subject failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubjectRejection {
	/// Token carried a mode other than `access`.
	NotAccess(Option<String>),
	/// Token carried no subject type.
	MissingType,
	/// No schema is registered for the type.
	UnknownType(String),
	/// Schema reported issues.
	Issues(Vec<SchemaIssue>),
}
impl Display for SubjectRejection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::NotAccess(Some(mode)) => write!(f, "token mode `{mode}` is not `access`"),
			Self::NotAccess(None) => f.write_str("token carries no mode"),
			Self::MissingType => f.write_str("token carries no subject type"),
			Self::UnknownType(kind) => write!(f, "no schema registered for subject type `{kind}`"),
			Self::Issues(issues) => {
				f.write_str("subject properties failed validation")?;

				for issue in issues {
					write!(f, "; {issue}")?;
				}

				Ok(())
			},
		}
	}
}

/// Authenticated principal: its type tag plus validated properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subject {
	/// Subject type, the key the schema was looked up under.
	#[serde(rename = "type")]
	pub kind: String,
	/// Properties as returned by the schema.
	pub properties: serde_json::Value,
}
impl Subject {
	/// Deserializes the validated properties into `T`.
	pub fn properties_as<T>(&self) -> Result<T, serde_json::Error>
	where
		T: DeserializeOwned,
	{
		T::deserialize(&self.properties)
	}
}
