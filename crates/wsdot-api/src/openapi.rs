//! OpenAPI 3.0.3 generation from the endpoint registry.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::endpoint::{ApiFamily, Endpoint, ParamKind, ParamSpec, placeholders};
use crate::registry::endpoints_for;
use crate::schema::Schema;

/// OpenAPI version emitted.
pub const OPENAPI_VERSION: &str = "3.0.3";

/// Name of the security scheme in `components`.
const SECURITY_SCHEME: &str = "accessCode";

/// Top-level OpenAPI document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Always [`OPENAPI_VERSION`].
    pub openapi: &'static str,
    /// Title and version.
    pub info: Info,
    /// Base URL.
    pub servers: Vec<Server>,
    /// Global security requirement.
    pub security: Vec<BTreeMap<&'static str, Vec<String>>>,
    /// One entry per endpoint path.
    pub paths: BTreeMap<String, PathItem>,
    /// Security schemes.
    pub components: Components,
}

/// `info` object.
#[derive(Debug, Clone, Serialize)]
pub struct Info {
    /// API title.
    pub title: &'static str,
    /// Library version.
    pub version: &'static str,
}

/// `servers` entry.
#[derive(Debug, Clone, Serialize)]
pub struct Server {
    /// Base URL.
    pub url: String,
}

/// A path with its single `GET` operation.
#[derive(Debug, Clone, Serialize)]
pub struct PathItem {
    /// The operation.
    pub get: Operation,
}

/// One endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Function name.
    pub operation_id: &'static str,
    /// Endpoint description.
    pub summary: &'static str,
    /// Path and query parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Response schemas keyed by status.
    pub responses: BTreeMap<&'static str, Response>,
    /// Cache strategy tag.
    #[serde(rename = "x-cache-strategy")]
    pub cache_strategy: &'static str,
}

/// One parameter.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    /// Placeholder name.
    pub name: &'static str,
    /// `path` or `query`.
    #[serde(rename = "in")]
    pub location: &'static str,
    /// Always `true`.
    pub required: bool,
    /// What the parameter selects.
    pub description: &'static str,
    /// Value schema.
    pub schema: Value,
}

/// One response.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Response description.
    pub description: &'static str,
    /// Body schema keyed by media type.
    pub content: BTreeMap<&'static str, MediaType>,
}

/// Body schema.
#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    /// JSON schema.
    pub schema: Value,
}

/// `components` object.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Access-code scheme.
    pub security_schemes: BTreeMap<&'static str, Value>,
}

/// Builds the document for every endpoint of `family`.
#[must_use]
pub fn document(family: ApiFamily) -> Document {
    let paths = endpoints_for(family)
        .iter()
        .map(|endpoint| {
            let (path, _) = split_template(endpoint.path_template);
            let item = PathItem {
                get: operation(endpoint),
            };
            (format!("/{path}"), item)
        })
        .collect();

    let scheme = json!({
        "type": "apiKey",
        "in": "query",
        "name": family.access_code_param(),
    });

    Document {
        openapi: OPENAPI_VERSION,
        info: Info {
            title: family.title(),
            version: env!("CARGO_PKG_VERSION"),
        },
        servers: vec![Server {
            url: String::from(family.default_base_url().trim_end_matches('/')),
        }],
        security: vec![BTreeMap::from([(SECURITY_SCHEME, Vec::new())])],
        paths,
        components: Components {
            security_schemes: BTreeMap::from([(SECURITY_SCHEME, scheme)]),
        },
    }
}

/// Renders `document` as YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_yaml(document: &Document) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document)
}

fn operation(endpoint: &Endpoint) -> Operation {
    let (path, query) = split_template(endpoint.path_template);
    let query_names = query.map(placeholders).unwrap_or_default();
    let parameters = placeholders(path)
        .into_iter()
        .map(|name| (name, "path"))
        .chain(query_names.into_iter().map(|name| (name, "query")))
        .filter_map(|(name, location)| {
            endpoint
                .param(name)
                .map(|spec| parameter(spec, location))
        })
        .collect();

    let response = Response {
        description: "Normalized response body",
        content: BTreeMap::from([(
            "application/json",
            MediaType {
                schema: schema_json(&endpoint.output),
            },
        )]),
    };

    Operation {
        operation_id: endpoint.function_name,
        summary: endpoint.description,
        parameters,
        responses: BTreeMap::from([("200", response)]),
        cache_strategy: endpoint.cache.as_str(),
    }
}

fn parameter(spec: &ParamSpec, location: &'static str) -> Parameter {
    let schema = match spec.kind {
        ParamKind::Integer => json!({ "type": "integer", "format": "int64" }),
        ParamKind::String => json!({ "type": "string" }),
        ParamKind::Boolean => json!({ "type": "boolean" }),
        ParamKind::Date => json!({ "type": "string", "format": "date" }),
    };
    Parameter {
        name: spec.name,
        location,
        required: true,
        description: spec.description,
        schema,
    }
}

/// Maps a [`Schema`] to an OpenAPI schema object.
#[must_use]
pub fn schema_json(schema: &Schema) -> Value {
    match schema {
        Schema::String => json!({ "type": "string" }),
        Schema::Integer => json!({ "type": "integer", "format": "int64" }),
        Schema::Number => json!({ "type": "number" }),
        Schema::Boolean => json!({ "type": "boolean" }),
        Schema::Date => json!({ "type": "string", "format": "date-time" }),
        Schema::Nullable(inner) => {
            let mut value = schema_json(inner);
            if let Value::Object(ref mut map) = value {
                map.insert(String::from("nullable"), Value::Bool(true));
            }
            value
        }
        Schema::Array(item) => json!({ "type": "array", "items": schema_json(item) }),
        Schema::Object(fields) => {
            let properties: Map<String, Value> = fields
                .iter()
                .map(|f| (String::from(f.name), schema_json(&f.schema)))
                .collect();
            let required: Vec<&str> = fields
                .iter()
                .filter(|f| !f.schema.is_nullable())
                .map(|f| f.name)
                .collect();
            let mut object = Map::new();
            object.insert(String::from("type"), json!("object"));
            object.insert(String::from("properties"), Value::Object(properties));
            if !required.is_empty() {
                object.insert(String::from("required"), json!(required));
            }
            Value::Object(object)
        }
    }
}

/// Splits `path?query` into its parts.
fn split_template(template: &str) -> (&str, Option<&str>) {
    template
        .split_once('?')
        .map_or((template, None), |(path, query)| (path, Some(query)))
}
