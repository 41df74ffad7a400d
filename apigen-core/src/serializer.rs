//! JSON:API document builder
//!
//! [`Manager`] holds the includes requested by the client;
//! [`Manager::create_data`] pairs it with a [`Resource`] and
//! [`Scope::to_value`] renders the document:
//!
//! ```json
//! {
//!   "data": { "type": "payers", "id": "1", "attributes": {..}, "relationships": {..} },
//!   "included": [ .. ],
//!   "meta": { .. }
//! }
//! ```

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::repository::render_value;
use crate::transformer::{Node, Resource, ResourceData};

/// Maximum include nesting depth
pub const DEFAULT_RECURSION_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct Manager {
    requested: Vec<String>,
    recursion_limit: usize,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    pub fn new() -> Self {
        Self { requested: Vec::new(), recursion_limit: DEFAULT_RECURSION_LIMIT }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit.max(1);
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Parse `a,b.c` style include lists; `b.c` also requests `b`
    pub fn parse_includes(&mut self, includes: &str) -> &mut Self {
        for include in includes.split(',') {
            let segments: Vec<&str> =
                include.split('.').map(str::trim).filter(|s| !s.is_empty()).collect();

            let mut path = String::new();
            for segment in segments.into_iter().take(self.recursion_limit) {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(segment);
                if !self.requested.contains(&path) {
                    self.requested.push(path.clone());
                }
            }
        }
        self
    }

    pub fn requested_includes(&self) -> &[String] {
        &self.requested
    }

    pub fn is_requested(&self, scope: &str) -> bool {
        self.requested.iter().any(|r| r == scope)
    }

    pub fn create_data(&self, resource: Resource) -> Scope<'_> {
        Scope { manager: self, resource }
    }
}

/// A resource ready to be rendered with a manager's includes
pub struct Scope<'a> {
    manager: &'a Manager,
    resource: Resource,
}

impl Scope<'_> {
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn to_value(&self) -> Value {
        let mut builder = DocumentBuilder {
            manager: self.manager,
            included: Vec::new(),
            seen: HashSet::new(),
        };

        let data = match &self.resource.data {
            ResourceData::Null => Value::Null,
            ResourceData::Item(node) => {
                let (id, attributes) = identify(node.as_ref());
                builder.seen.insert((node.resource_key().to_string(), id.clone()));
                builder.object(node.as_ref(), id, attributes, "", 1)
            }
            ResourceData::Collection(nodes) => {
                let identified: Vec<(&dyn Node, String, Map<String, Value>)> = nodes
                    .iter()
                    .map(|node| {
                        let (id, attributes) = identify(node.as_ref());
                        (node.as_ref(), id, attributes)
                    })
                    .collect();
                for (node, id, _) in &identified {
                    builder.seen.insert((node.resource_key().to_string(), id.clone()));
                }
                Value::Array(
                    identified
                        .into_iter()
                        .map(|(node, id, attributes)| builder.object(node, id, attributes, "", 1))
                        .collect(),
                )
            }
        };

        let mut document = Map::new();
        document.insert("data".to_string(), data);
        if !builder.included.is_empty() {
            document.insert("included".to_string(), Value::Array(builder.included));
        }
        if !self.resource.meta().is_empty() {
            document.insert("meta".to_string(), Value::Object(self.resource.meta().clone()));
        }
        Value::Object(document)
    }
}

struct DocumentBuilder<'a> {
    manager: &'a Manager,
    included: Vec<Value>,
    seen: HashSet<(String, String)>,
}

impl DocumentBuilder<'_> {
    fn object(
        &mut self,
        node: &dyn Node,
        id: String,
        attributes: Map<String, Value>,
        scope: &str,
        depth: usize,
    ) -> Value {
        let mut relationships = Map::new();

        if depth <= self.manager.recursion_limit {
            for name in self.includes_for(node, scope) {
                let data = match node.include(&name) {
                    Some(child) => self.embed(child, &scoped(scope, &name), depth + 1),
                    None => Value::Null,
                };
                relationships.insert(name, json!({ "data": data }));
            }
        }

        let mut object = Map::new();
        object.insert("type".to_string(), Value::String(node.resource_key().to_string()));
        object.insert("id".to_string(), Value::String(id));
        object.insert("attributes".to_string(), Value::Object(attributes));
        if !relationships.is_empty() {
            object.insert("relationships".to_string(), Value::Object(relationships));
        }
        Value::Object(object)
    }

    /// Defaults, then requested ones the transformer makes available
    fn includes_for(&self, node: &dyn Node, scope: &str) -> Vec<String> {
        let mut names = node.default_includes();
        for name in node.available_includes() {
            if !names.contains(&name) && self.manager.is_requested(&scoped(scope, &name)) {
                names.push(name);
            }
        }
        names
    }

    /// Push the related objects into `included` and return their linkage
    fn embed(&mut self, resource: Resource, scope: &str, depth: usize) -> Value {
        match &resource.data {
            ResourceData::Null => Value::Null,
            ResourceData::Item(node) => self.link(node.as_ref(), scope, depth),
            ResourceData::Collection(nodes) => Value::Array(
                nodes.iter().map(|node| self.link(node.as_ref(), scope, depth)).collect(),
            ),
        }
    }

    fn link(&mut self, node: &dyn Node, scope: &str, depth: usize) -> Value {
        let (id, attributes) = identify(node);
        let key = (node.resource_key().to_string(), id.clone());
        let linkage = json!({ "type": key.0, "id": key.1 });

        if self.seen.insert(key) {
            let object = self.object(node, id, attributes, scope, depth);
            self.included.push(object);
        }
        linkage
    }
}

fn scoped(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

/// Split a transformed object into its id and remaining attributes
fn identify(node: &dyn Node) -> (String, Map<String, Value>) {
    let mut attributes = match node.attributes() {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    let id = attributes.remove("id").map(|v| render_value(&v)).unwrap_or_default();
    (id, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::{prepare_root_scope, Transformer};
    use std::sync::Arc;

    #[derive(Clone)]
    struct Tag {
        id: u64,
        label: &'static str,
    }

    #[derive(Clone)]
    struct Post {
        id: u64,
        title: &'static str,
        author: Option<u64>,
        tags: Vec<Tag>,
    }

    struct TagTransformer;

    impl Transformer for TagTransformer {
        type Item = Tag;

        fn resource_key(&self) -> &str {
            "tags"
        }

        fn transform(&self, tag: &Tag) -> Value {
            json!({"id": tag.id, "label": tag.label})
        }
    }

    struct AuthorTransformer;

    impl Transformer for AuthorTransformer {
        type Item = u64;

        fn resource_key(&self) -> &str {
            "authors"
        }

        fn transform(&self, id: &u64) -> Value {
            json!({"id": id, "name": format!("author {}", id)})
        }
    }

    struct PostTransformer;

    impl Transformer for PostTransformer {
        type Item = Post;

        fn resource_key(&self) -> &str {
            "posts"
        }

        fn transform(&self, post: &Post) -> Value {
            json!({"id": post.id, "title": post.title})
        }

        fn available_includes(&self) -> Vec<String> {
            vec!["author".to_string(), "tags".to_string()]
        }

        fn include(&self, name: &str, post: &Post) -> Option<Resource> {
            match name {
                "tags" => Some(Resource::collection(post.tags.clone(), Arc::new(TagTransformer))),
                "author" => Some(match post.author {
                    Some(id) => Resource::item(id, Arc::new(AuthorTransformer)),
                    None => Resource::null("authors"),
                }),
                _ => None,
            }
        }
    }

    fn post(id: u64, author: Option<u64>) -> Post {
        Post {
            id,
            title: "hello",
            author,
            tags: vec![Tag { id: 1, label: "rust" }, Tag { id: 2, label: "api" }],
        }
    }

    #[test]
    fn parse_includes_requests_parents() {
        let mut manager = Manager::new();
        manager.parse_includes(" author.company , tags,,tags");
        assert_eq!(manager.requested_includes(), &["author", "author.company", "tags"]);
        assert!(manager.is_requested("author"));
        assert!(!manager.is_requested("company"));
    }

    #[test]
    fn parse_includes_respects_recursion_limit() {
        let mut manager = Manager::new().with_recursion_limit(2);
        manager.parse_includes("a.b.c");
        assert_eq!(manager.requested_includes(), &["a", "a.b"]);
    }

    #[test]
    fn item_without_includes() {
        let manager = Manager::new();
        let doc = manager
            .create_data(Resource::item(post(1, Some(9)), Arc::new(PostTransformer)))
            .to_value();

        assert_eq!(
            doc,
            json!({"data": {"type": "posts", "id": "1", "attributes": {"title": "hello"}}})
        );
    }

    #[test]
    fn requested_includes_are_embedded_and_deduplicated() {
        let mut manager = Manager::new();
        manager.parse_includes("tags,author");

        let doc = manager
            .create_data(Resource::collection(
                vec![post(1, Some(9)), post(2, Some(9))],
                Arc::new(PostTransformer),
            ))
            .to_value();

        let first = &doc["data"][0];
        assert_eq!(first["relationships"]["author"]["data"], json!({"type": "authors", "id": "9"}));
        assert_eq!(
            first["relationships"]["tags"]["data"],
            json!([{"type": "tags", "id": "1"}, {"type": "tags", "id": "2"}])
        );

        // two posts share one author and the same two tags
        let included = doc["included"].as_array().unwrap();
        assert_eq!(included.len(), 3);
        assert!(included.iter().any(|o| o["type"] == "authors" && o["attributes"]["name"] == "author 9"));
    }

    #[test]
    fn unavailable_includes_are_ignored() {
        let mut manager = Manager::new();
        manager.parse_includes("comments");
        let doc = manager
            .create_data(Resource::item(post(1, None), Arc::new(PostTransformer)))
            .to_value();
        assert!(doc["data"].get("relationships").is_none());
        assert!(doc.get("included").is_none());
    }

    #[test]
    fn missing_to_one_relation_is_null() {
        let mut manager = Manager::new();
        manager.parse_includes("author");
        let doc = manager
            .create_data(Resource::item(post(1, None), Arc::new(PostTransformer)))
            .to_value();
        assert_eq!(doc["data"]["relationships"]["author"], json!({"data": null}));
    }

    #[test]
    fn root_meta_is_rendered() {
        let mut resource = Resource::collection(Vec::<Post>::new(), Arc::new(PostTransformer));
        prepare_root_scope(&mut resource);
        let doc = Manager::new().create_data(resource).to_value();
        assert_eq!(doc["data"], json!([]));
        assert_eq!(doc["meta"]["available_includes"], json!(["author", "tags"]));
    }

    #[test]
    fn null_resource() {
        let doc = Manager::new().create_data(Resource::null("posts")).to_value();
        assert_eq!(doc, json!({"data": null}));
    }
}
