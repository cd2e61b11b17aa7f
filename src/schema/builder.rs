use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::hash_map::Entry;

use tracing::{debug, trace, warn};

use crate::schema::dom::{ResolverBinding, SchemaDom, Source, SourceId};
use crate::schema::naming::{camel_case, candidate_name};
use crate::schema::resolver::{ResolverContainer, ResolverProvider};
use crate::schema::shape::{Shape, Sourced};
use crate::schema::types::Type;

/// Collects source shapes and resolver containers for one schema.
///
/// # Examples
///
/// ```
/// use sqlface::schema::{NumericKind, Repr, ResolverContainer, SchemaBuilder, Shape};
///
/// let mut builder = SchemaBuilder::new();
/// builder
///     .source_shape(Shape::new("Book").field("title", Repr::String))
///     .resolver_container(ResolverContainer::new("Library"));
///
/// let dom = builder.build();
/// assert!(dom.find("books").is_some());
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: usize,
    shapes: Vec<Shape>,
    containers: Vec<ResolverContainer>,
}

/// A reusable schema declaration.
pub trait SchemaDesign {
    fn describe(&self, designer: &mut SchemaBuilder);
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder whose sources are numbered as the `schema`th schema of a
    /// context.
    pub fn for_schema(schema: usize) -> Self {
        SchemaBuilder {
            schema,
            ..Self::default()
        }
    }

    pub fn source<T: Sourced>(&mut self) -> &mut Self {
        self.source_shape(T::shape())
    }

    pub fn source_shape(&mut self, shape: Shape) -> &mut Self {
        self.shapes.push(shape);
        self
    }

    pub fn resolver<R: ResolverProvider>(&mut self) -> &mut Self {
        self.resolver_container(R::container())
    }

    pub fn resolver_container(&mut self, container: ResolverContainer) -> &mut Self {
        self.containers.push(container);
        self
    }

    pub fn build(self) -> SchemaDom {
        let candidates = self.index_candidates();

        let mut taken: HashSet<String> = HashSet::new();
        let mut sources = Vec::with_capacity(self.shapes.len());
        for shape in &self.shapes {
            let synonyms = [
                camel_case(&shape.name),
                camel_case(&format!("{}s", shape.name)),
            ];

            let mut identifiers = Vec::with_capacity(synonyms.len());
            for synonym in &synonyms {
                if identifiers.contains(synonym) {
                    continue;
                }
                if !taken.insert(synonym.clone()) {
                    warn!(shape = %shape.name, identifier = %synonym, "identifier already taken by an earlier source");
                    continue;
                }
                identifiers.push(synonym.clone());
            }
            if identifiers.is_empty() {
                warn!(shape = %shape.name, "source has no free identifier and is skipped");
                continue;
            }

            let resolver = synonyms
                .iter()
                .find_map(|synonym| candidates.get(synonym))
                .cloned();
            if resolver.is_none() {
                debug!(shape = %shape.name, "source declared without a resolver");
            }

            sources.push(Source {
                id: SourceId {
                    schema: self.schema,
                    index: sources.len(),
                },
                identifiers,
                ty: Type::from_shape(shape),
                resolver,
            });
        }

        debug!(schema = self.schema, sources = sources.len(), "schema built");
        SchemaDom::new(sources)
    }

    /// Enumerable `get*` members by the camelCase source name they serve.
    fn index_candidates(&self) -> HashMap<String, ResolverBinding> {
        let mut candidates = HashMap::new();
        for container in &self.containers {
            for member in &container.members {
                if !member.returns.is_enumerable() {
                    trace!(container = %container.name, member = %member.name, "member is not enumerable");
                    continue;
                }
                let Some(name) = candidate_name(&member.name) else {
                    trace!(container = %container.name, member = %member.name, "member does not follow the get convention");
                    continue;
                };

                match candidates.entry(name) {
                    Entry::Occupied(existing) => {
                        let existing: &ResolverBinding = existing.get();
                        warn!(
                            member = %member.name,
                            kept = %existing.member,
                            "two resolver members serve the same source, keeping the first"
                        );
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(ResolverBinding {
                            container: container.name.clone(),
                            member: member.name.clone(),
                            returns: member.returns,
                            resolve: member.resolve.clone(),
                        });
                    }
                }
            }
        }
        candidates
    }
}
