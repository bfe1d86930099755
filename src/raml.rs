//! RAML document model and the route-to-document aggregation.

use crate::error::Result;
use crate::walker::{FuncInfo, Method, Routes};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Complete RAML document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// API title
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Base URI every resource path is relative to
    #[serde(rename = "baseUri", skip_serializing_if = "String::is_empty")]
    pub base_uri: String,
    /// Supported protocols (`HTTP`, `HTTPS`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,
    /// Default media type of request and response bodies
    #[serde(rename = "mediaType", skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    /// API version
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Free-form documentation pages
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub documentation: Vec<Documentation>,
    /// Resources keyed by URL path
    #[serde(flatten)]
    pub resources: BTreeMap<String, PathNode>,
}

/// A titled documentation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Documentation {
    pub title: String,
    pub content: String,
}

/// All methods documented for a single path, keyed by lower-case method name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PathNode {
    pub methods: BTreeMap<String, Resource>,
}

/// Documentation for one (path, method) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resource {
    #[serde(rename = "displayName", skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Expected responses keyed by status code
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: Responses,
}

pub type Responses = BTreeMap<u16, Response>;

/// Expected response placeholder, serialized as an empty mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {}

impl Resource {
    /// Create a resource with a description and no responses
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

impl Document {
    /// Create an empty document with the top-level metadata
    pub fn new(
        title: impl Into<String>,
        base_uri: impl Into<String>,
        version: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            base_uri: base_uri.into(),
            version: version.into(),
            media_type: media_type.into(),
            ..Self::default()
        }
    }

    /// Insert `resource` under (path, method), replacing whatever was there
    pub fn add(&mut self, method: Method, path: &str, resource: Resource) {
        debug!("Adding resource: {} {}", method, path);

        let node = self.resources.entry(path.to_string()).or_default();
        if node.methods.insert(method.raml_key(), resource).is_some() {
            debug!("Replaced existing resource for {} {}", method, path);
        }
    }

    /// Look up the resource documented for (path, method)
    pub fn resource(&self, path: &str, method: Method) -> Option<&Resource> {
        self.resources
            .get(path)
            .and_then(|node| node.methods.get(&method.raml_key()))
    }

    /// Walk `routes` and insert every resource `format` produces.
    ///
    /// `format` receives the method, full path, handler identity and middleware chain of
    /// each route. Returning `Ok(None)` leaves the route undocumented.
    ///
    /// # Errors
    ///
    /// The first walk or formatting error is returned unchanged and the walk stops. The
    /// document keeps whatever was inserted before the failure.
    pub fn add_resources_from_walk<R, F>(&mut self, routes: &R, mut format: F) -> Result<()>
    where
        R: Routes + ?Sized,
        F: FnMut(Method, &str, &FuncInfo, &[FuncInfo]) -> Result<Option<Resource>>,
    {
        for route in routes.walk() {
            let route = route?;
            match format(route.method, &route.path, &route.handler, &route.middlewares)? {
                Some(resource) => self.add(route.method, &route.path, resource),
                None => debug!("Skipping undocumented route: {} {}", route.method, route.path),
            }
        }
        Ok(())
    }
}
