//! Named operations and schema definitions
//!
//! A [`PluginRegistry`] is an explicit list binding operation names to
//! factories that turn JSON parameters into a [`StepContributor`]. Nothing is
//! registered globally: a registry is a value, passed to a [`SchemaBuilder`]
//! or used to compile a whole definition at once.
//!
//! A definition is a JSON array of operations. Each operation is either a bare
//! name (`"string"`) or an object `{"op": name, "params": ...}`. Composer
//! parameters nest definitions:
//!
//! ```
//! use serde_json::json;
//! use valchecker::registry::PluginRegistry;
//!
//! let registry = PluginRegistry::with_defaults();
//! let schema = registry
//!     .compile(&json!([
//!         {"op": "object", "params": {
//!             "name": ["string", "toTrimmed", {"op": "min", "params": 1}],
//!             "tags": {"optional": [{"op": "array", "params": ["string"]}]}
//!         }}
//!     ]))
//!     .unwrap();
//!
//! let result = schema.execute(json!({"name": "  "})).into_ready().unwrap();
//! assert_eq!(result.issues().unwrap().first().path_string(), ".name");
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

use crate::compose::{
    ArrayOf, Field, IntersectionOf, Nullable, ObjectMode, ObjectOf, RecordOf, UnionOf,
};
use crate::error::RegistryError;
use crate::schema::Schema;
use crate::step::StepContributor;
use crate::steps::{
    AnyValue, EndsWith, IsBoolean, IsInteger, IsNever, IsNull, IsNumber, IsString, Literal, Max,
    Min, ParseJson, StartsWith, StringifyJson, ToAsync, ToLowercase, ToTrimmed, ToUppercase,
};

/// Builds a contributor from JSON parameters.
///
/// The registry is passed along so composers can compile nested definitions.
pub type Factory = Arc<
    dyn Fn(&PluginRegistry, &Value) -> Result<Box<dyn StepContributor>, RegistryError>
        + Send
        + Sync,
>;

/// An ordered list of named step factories.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    entries: Vec<(String, Factory)>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("operations", &self.names())
            .finish()
    }
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in operation.
    pub fn with_defaults() -> Self {
        Self::new()
            .register("any", |_, params| unit("any", params, AnyValue))
            .register("never", |_, params| unit("never", params, IsNever::new()))
            .register("null", |_, params| unit("null", params, IsNull::new()))
            .register("boolean", |_, params| unit("boolean", params, IsBoolean::new()))
            .register("number", |_, params| unit("number", params, IsNumber::new()))
            .register("integer", |_, params| unit("integer", params, IsInteger::new()))
            .register("string", |_, params| unit("string", params, IsString::new()))
            .register("literal", |_, params| Ok(Box::new(Literal::new(params.clone()))))
            .register("min", |_, params| Ok(Box::new(Min::new(number_param("min", params)?))))
            .register("max", |_, params| Ok(Box::new(Max::new(number_param("max", params)?))))
            .register("startsWith", |_, params| {
                Ok(Box::new(StartsWith::new(string_param("startsWith", params)?)))
            })
            .register("endsWith", |_, params| {
                Ok(Box::new(EndsWith::new(string_param("endsWith", params)?)))
            })
            .register("toTrimmed", |_, params| unit("toTrimmed", params, ToTrimmed))
            .register("toUppercase", |_, params| unit("toUppercase", params, ToUppercase))
            .register("toLowercase", |_, params| unit("toLowercase", params, ToLowercase))
            .register("parseJSON", |_, params| unit("parseJSON", params, ParseJson::new()))
            .register("stringifyJSON", |_, params| {
                unit("stringifyJSON", params, StringifyJson)
            })
            .register("toAsync", |_, params| unit("toAsync", params, ToAsync))
            .register("array", |registry, params| {
                Ok(Box::new(ArrayOf::new(registry.compile(params)?)))
            })
            .register("record", |registry, params| {
                Ok(Box::new(RecordOf::new(registry.compile(params)?)))
            })
            .register("nullable", |registry, params| {
                Ok(Box::new(Nullable::new(registry.compile(params)?)))
            })
            .register("union", |registry, params| {
                Ok(Box::new(UnionOf::new(registry.compile_each("union", params)?)))
            })
            .register("intersection", |registry, params| {
                Ok(Box::new(IntersectionOf::new(
                    registry.compile_each("intersection", params)?,
                )))
            })
            .register("object", |registry, params| {
                registry.object("object", params, ObjectMode::Plain)
            })
            .register("strictObject", |registry, params| {
                registry.object("strictObject", params, ObjectMode::Strict)
            })
            .register("looseObject", |registry, params| {
                registry.object("looseObject", params, ObjectMode::Loose)
            })
    }

    /// Bind `name` to `factory`, replacing any earlier binding.
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&PluginRegistry, &Value) -> Result<Box<dyn StepContributor>, RegistryError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let factory: Factory = Arc::new(factory);

        #[cfg(feature = "tracing")]
        tracing::debug!(operation = %name, "registering operation");

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((name, factory)),
        }
        self
    }

    /// Registered operation names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Check whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// Build the contributor registered under `name`.
    pub fn resolve(
        &self,
        name: &str,
        params: &Value,
    ) -> Result<Box<dyn StepContributor>, RegistryError> {
        let (_, factory) = self
            .entries
            .iter()
            .find(|(existing, _)| existing == name)
            .ok_or_else(|| RegistryError::UnknownOperation(name.to_string()))?;
        factory(self, params)
    }

    /// Compile a definition (an array of operations) into a schema.
    pub fn compile(&self, definition: &Value) -> Result<Schema, RegistryError> {
        let operations = definition.as_array().ok_or_else(|| {
            RegistryError::InvalidDefinition("expected an array of operations".to_string())
        })?;

        operations.iter().try_fold(Schema::new(), |schema, operation| {
            let (name, params) = parse_operation(operation)?;
            let contributor = self.resolve(name, params)?;
            Ok(schema.with(&contributor))
        })
    }

    fn compile_each(&self, operation: &str, params: &Value) -> Result<Vec<Schema>, RegistryError> {
        params
            .as_array()
            .ok_or_else(|| {
                RegistryError::invalid_params(operation, "expected a list of definitions")
            })?
            .iter()
            .map(|definition| self.compile(definition))
            .collect()
    }

    fn object(
        &self,
        operation: &str,
        params: &Value,
        mode: ObjectMode,
    ) -> Result<Box<dyn StepContributor>, RegistryError> {
        let declared = params
            .as_object()
            .ok_or_else(|| RegistryError::invalid_params(operation, "expected a map of fields"))?;

        let mut fields = Vec::with_capacity(declared.len());
        for (key, definition) in declared {
            let field = match definition {
                Value::Object(wrapper) => match wrapper.get("optional") {
                    Some(inner) => Field::optional(self.compile(inner)?),
                    None => {
                        return Err(RegistryError::invalid_params(
                            operation,
                            format!("field {} must be a definition or {{\"optional\": ...}}", key),
                        ))
                    }
                },
                other => Field::required(self.compile(other)?),
            };
            fields.push((key.clone(), field));
        }

        Ok(Box::new(ObjectOf::new(fields).mode(mode)))
    }
}

fn parse_operation(operation: &Value) -> Result<(&str, &Value), RegistryError> {
    const NO_PARAMS: &Value = &Value::Null;

    match operation {
        Value::String(name) => Ok((name.as_str(), NO_PARAMS)),
        Value::Object(fields) => {
            let name = fields.get("op").and_then(Value::as_str).ok_or_else(|| {
                RegistryError::InvalidDefinition("operation is missing \"op\"".to_string())
            })?;
            Ok((name, fields.get("params").unwrap_or(NO_PARAMS)))
        }
        other => Err(RegistryError::InvalidDefinition(format!(
            "expected an operation name or object, got {}",
            other
        ))),
    }
}

fn unit<C>(
    operation: &str,
    params: &Value,
    contributor: C,
) -> Result<Box<dyn StepContributor>, RegistryError>
where
    C: StepContributor + 'static,
{
    if params.is_null() {
        Ok(Box::new(contributor))
    } else {
        Err(RegistryError::invalid_params(operation, "takes no parameters"))
    }
}

fn number_param(operation: &str, params: &Value) -> Result<Number, RegistryError> {
    match params {
        Value::Number(number) => Ok(number.clone()),
        _ => Err(RegistryError::invalid_params(operation, "expected a number")),
    }
}

fn string_param(operation: &str, params: &Value) -> Result<String, RegistryError> {
    params
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RegistryError::invalid_params(operation, "expected a string"))
}

/// Builds a schema one named operation at a time.
///
/// ```
/// use std::sync::Arc;
///
/// use serde_json::json;
/// use valchecker::registry::{PluginRegistry, SchemaBuilder};
///
/// let registry = Arc::new(PluginRegistry::with_defaults());
/// let schema = SchemaBuilder::new(registry)
///     .call("string", &json!(null))?
///     .call("startsWith", &json!("v"))?
///     .build();
///
/// assert!(schema.execute(json!("v1.2")).into_ready().unwrap().is_success());
/// # Ok::<(), valchecker::RegistryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    registry: Arc<PluginRegistry>,
    schema: Schema,
}

impl SchemaBuilder {
    /// Start an empty schema backed by `registry`.
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        SchemaBuilder {
            registry,
            schema: Schema::new(),
        }
    }

    /// Append the operation registered under `name`.
    pub fn call(self, name: &str, params: &Value) -> Result<Self, RegistryError> {
        let contributor = self.registry.resolve(name, params)?;
        Ok(SchemaBuilder {
            schema: self.schema.with(&contributor),
            registry: self.registry,
        })
    }

    /// The schema built so far.
    pub fn build(self) -> Schema {
        self.schema
    }
}
