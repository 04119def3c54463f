//! Declarative endpoint templates.
//!
//! A [`Resource`] is a path segment template optionally nested under a parent
//! resource; an [`Endpoint`] binds a resource to a method, the query
//! parameters it accepts and whether it needs a bearer token. Endpoints are
//! declared as statics in [`super::oauth2`] and [`super::conversation`] and
//! resolved into a concrete [`Route`] at call time.

use reqwest::Method;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Sent without an `Authorization` header (token grants).
    Public,
    Bearer,
}

#[derive(Debug)]
pub struct Resource {
    parent: Option<&'static Resource>,
    segment: &'static str,
}

impl Resource {
    pub const fn root(segment: &'static str) -> Self {
        Self {
            parent: None,
            segment,
        }
    }

    pub const fn nested(parent: &'static Resource, segment: &'static str) -> Self {
        Self {
            parent: Some(parent),
            segment,
        }
    }

    /// Full path template, e.g. `/conversation/message/{messageId}`.
    pub fn template(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    fn segments(&self) -> Vec<&'static str> {
        let mut out = self
            .parent
            .map(|parent| parent.segments())
            .unwrap_or_default();
        out.extend(self.segment.split('/').filter(|part| !part.is_empty()));
        out
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub method: Verb,
    pub resource: &'static Resource,
    pub query: &'static [&'static str],
    pub access: Access,
}

impl Endpoint {
    pub const fn new(method: Verb, resource: &'static Resource) -> Self {
        Self {
            method,
            resource,
            query: &[],
            access: Access::Bearer,
        }
    }

    pub const fn with_query(mut self, query: &'static [&'static str]) -> Self {
        self.query = query;
        self
    }

    pub const fn public(mut self) -> Self {
        self.access = Access::Public;
        self
    }

    /// Substitutes `params` into the path template and collects the declared
    /// query parameters that were supplied. Every supplied parameter must be
    /// consumed by either the path or the query list.
    pub fn resolve(&self, params: &Params) -> AppResult<Route> {
        let mut used = Vec::new();
        let mut segments = Vec::new();

        for segment in self.resource.segments() {
            let Some(name) = placeholder(segment) else {
                segments.push(segment.to_string());
                continue;
            };

            let value = params.get(name).ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "missing path parameter `{name}` for {}",
                    self.resource.template()
                ))
            })?;

            if value.trim().is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "path parameter `{name}` must not be empty"
                )));
            }

            segments.push(value.to_string());
            used.push(name);
        }

        let mut query = Vec::new();
        for name in self.query {
            if let Some(value) = params.get(name) {
                query.push((*name, value.to_string()));
                used.push(*name);
            }
        }

        if let Some((name, _)) = params.values.iter().find(|(name, _)| !used.contains(name)) {
            return Err(AppError::InvalidInput(format!(
                "unexpected parameter `{name}` for {}",
                self.resource.template()
            )));
        }

        Ok(Route {
            method: self.method,
            segments,
            query,
            access: self.access,
        })
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

#[derive(Debug, Clone, Default)]
pub struct Params {
    values: Vec<(&'static str, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.push((name, value.into()));
        self
    }

    pub fn with_opt(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Verb,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    pub access: Access,
}

impl Route {
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}
