use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;

use crate::convert::to_value;
use crate::schema::scope::ResolverScope;
use crate::value::Value;

/// Failure reported by a resolver member.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ResolverError(pub String);

impl ResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        ResolverError(message.into())
    }
}

impl From<serde_json::Error> for ResolverError {
    fn from(e: serde_json::Error) -> Self {
        ResolverError(format!("records could not be serialized: {}", e))
    }
}

pub type ResolveFuture = BoxFuture<'static, Result<Value, ResolverError>>;

/// What a member declares it returns.
///
/// Only enumerable members can serve a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    Enumerable,
    FutureOfEnumerable,
    Other,
}

impl ReturnKind {
    pub fn is_enumerable(self) -> bool {
        matches!(self, ReturnKind::Enumerable | ReturnKind::FutureOfEnumerable)
    }
}

/// How a member produces its value.
#[derive(Clone)]
pub enum Resolve {
    Direct(Arc<dyn Fn(&ResolverScope) -> Result<Value, ResolverError> + Send + Sync>),
    Deferred(Arc<dyn Fn(&ResolverScope) -> ResolveFuture + Send + Sync>),
}

impl fmt::Debug for Resolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolve::Direct(_) => write!(f, "Resolve::Direct"),
            Resolve::Deferred(_) => write!(f, "Resolve::Deferred"),
        }
    }
}

/// A named callable of a resolver container.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub returns: ReturnKind,
    pub resolve: Resolve,
}

/// A group of resolver members, typically backed by one data store.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
/// use sqlface::schema::ResolverContainer;
///
/// #[derive(Serialize)]
/// struct Book {
///     title: String,
/// }
///
/// let library = ResolverContainer::new("Library").member("GetBooks", |_scope| {
///     Ok(vec![Book { title: "Dune".into() }])
/// });
/// assert_eq!(library.members.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ResolverContainer {
    pub name: String,
    pub members: Vec<Member>,
}

impl ResolverContainer {
    pub fn new(name: impl Into<String>) -> Self {
        ResolverContainer {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Adds a member returning records directly.
    pub fn member<T, F>(mut self, name: impl Into<String>, resolve: F) -> Self
    where
        T: Serialize + 'static,
        F: Fn(&ResolverScope) -> Result<Vec<T>, ResolverError> + Send + Sync + 'static,
    {
        let resolve = move |scope: &ResolverScope| -> Result<Value, ResolverError> {
            let records = resolve(scope)?;
            Ok(to_value(&records)?)
        };
        self.members.push(Member {
            name: name.into(),
            returns: ReturnKind::Enumerable,
            resolve: Resolve::Direct(Arc::new(resolve)),
        });
        self
    }

    /// Adds a member returning a future of records.
    ///
    /// The future must not borrow the scope; clone what it needs from it
    /// first.
    pub fn member_async<T, F, Fut>(mut self, name: impl Into<String>, resolve: F) -> Self
    where
        T: Serialize + Send + 'static,
        F: Fn(&ResolverScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, ResolverError>> + Send + 'static,
    {
        let resolve = move |scope: &ResolverScope| -> ResolveFuture {
            let pending = resolve(scope);
            async move {
                let records = pending.await?;
                Ok::<Value, ResolverError>(to_value(&records)?)
            }
            .boxed()
        };
        self.members.push(Member {
            name: name.into(),
            returns: ReturnKind::FutureOfEnumerable,
            resolve: Resolve::Deferred(Arc::new(resolve)),
        });
        self
    }

    /// Adds a member returning a raw value with an explicitly declared kind.
    pub fn member_value<F>(mut self, name: impl Into<String>, returns: ReturnKind, resolve: F) -> Self
    where
        F: Fn(&ResolverScope) -> Result<Value, ResolverError> + Send + Sync + 'static,
    {
        self.members.push(Member {
            name: name.into(),
            returns,
            resolve: Resolve::Direct(Arc::new(resolve)),
        });
        self
    }
}

/// Host types that expose a resolver container.
pub trait ResolverProvider {
    fn container() -> ResolverContainer;
}
