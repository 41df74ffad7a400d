//! Transformers and the resources they produce
//!
//! A [`Transformer`] turns one model into a JSON attribute object and knows
//! which relations it can embed. A [`Resource`] binds data (one item, a
//! collection, or nothing) to the transformer that renders it, so resources
//! of different model types can sit side by side in one document.

use std::sync::Arc;

use serde_json::{Map, Value};

/// Meta key listing the includes a transformer supports
pub const META_AVAILABLE_INCLUDES: &str = "available_includes";
/// Meta key listing the includes a transformer always embeds
pub const META_DEFAULT_INCLUDES: &str = "default_includes";

pub trait Transformer: Send + Sync + 'static {
    type Item: Send + Sync + 'static;

    /// JSON:API `type` of the rendered objects
    fn resource_key(&self) -> &str;

    /// Attribute object; its `id` member becomes the JSON:API id
    fn transform(&self, item: &Self::Item) -> Value;

    /// Relations a client may request with `?include=`
    fn available_includes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Relations embedded whether requested or not
    fn default_includes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Resolve one relation of `item`; `None` renders as a null relationship
    fn include(&self, name: &str, item: &Self::Item) -> Option<Resource> {
        let _ = (name, item);
        None
    }
}

/// Type-erased (item, transformer) pair
pub(crate) trait Node: Send + Sync {
    fn resource_key(&self) -> &str;
    fn attributes(&self) -> Value;
    fn available_includes(&self) -> Vec<String>;
    fn default_includes(&self) -> Vec<String>;
    fn include(&self, name: &str) -> Option<Resource>;
}

struct Bound<T: Transformer> {
    item: T::Item,
    transformer: Arc<T>,
}

impl<T: Transformer> Node for Bound<T> {
    fn resource_key(&self) -> &str {
        self.transformer.resource_key()
    }

    fn attributes(&self) -> Value {
        self.transformer.transform(&self.item)
    }

    fn available_includes(&self) -> Vec<String> {
        self.transformer.available_includes()
    }

    fn default_includes(&self) -> Vec<String> {
        self.transformer.default_includes()
    }

    fn include(&self, name: &str) -> Option<Resource> {
        self.transformer.include(name, &self.item)
    }
}

pub(crate) enum ResourceData {
    Item(Box<dyn Node>),
    Collection(Vec<Box<dyn Node>>),
    Null,
}

/// Data bound to a transformer, plus resource-level meta
pub struct Resource {
    resource_key: String,
    available_includes: Vec<String>,
    default_includes: Vec<String>,
    pub(crate) data: ResourceData,
    meta: Map<String, Value>,
}

impl Resource {
    pub fn item<T: Transformer>(item: T::Item, transformer: Arc<T>) -> Self {
        let mut resource = Self::describe(&transformer);
        resource.data = ResourceData::Item(Box::new(Bound { item, transformer }));
        resource
    }

    pub fn collection<T: Transformer>(
        items: impl IntoIterator<Item = T::Item>,
        transformer: Arc<T>,
    ) -> Self {
        let mut resource = Self::describe(&transformer);
        resource.data = ResourceData::Collection(
            items
                .into_iter()
                .map(|item| {
                    Box::new(Bound { item, transformer: Arc::clone(&transformer) }) as Box<dyn Node>
                })
                .collect(),
        );
        resource
    }

    /// An empty to-one relation
    pub fn null(resource_key: impl Into<String>) -> Self {
        Self {
            resource_key: resource_key.into(),
            available_includes: Vec::new(),
            default_includes: Vec::new(),
            data: ResourceData::Null,
            meta: Map::new(),
        }
    }

    fn describe<T: Transformer>(transformer: &Arc<T>) -> Self {
        Self {
            resource_key: transformer.resource_key().to_string(),
            available_includes: transformer.available_includes(),
            default_includes: transformer.default_includes(),
            data: ResourceData::Null,
            meta: Map::new(),
        }
    }

    pub fn resource_key(&self) -> &str {
        &self.resource_key
    }

    pub fn available_includes(&self) -> &[String] {
        &self.available_includes
    }

    pub fn default_includes(&self) -> &[String] {
        &self.default_includes
    }

    pub fn is_null(&self) -> bool {
        matches!(self.data, ResourceData::Null)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.data, ResourceData::Collection(_))
    }

    pub fn set_meta(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shape = match &self.data {
            ResourceData::Item(_) => "item".to_string(),
            ResourceData::Collection(items) => format!("collection({})", items.len()),
            ResourceData::Null => "null".to_string(),
        };
        f.debug_struct("Resource")
            .field("resource_key", &self.resource_key)
            .field("data", &shape)
            .field("meta", &self.meta)
            .finish()
    }
}

/// Advertise the transformer's include capabilities in the root meta
pub fn prepare_root_scope(resource: &mut Resource) {
    let available = resource.available_includes.clone();
    let defaults = resource.default_includes.clone();
    resource
        .set_meta(META_AVAILABLE_INCLUDES, available)
        .set_meta(META_DEFAULT_INCLUDES, defaults);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NameTransformer;

    impl Transformer for NameTransformer {
        type Item = (u64, &'static str);

        fn resource_key(&self) -> &str {
            "names"
        }

        fn transform(&self, item: &Self::Item) -> Value {
            json!({"id": item.0, "name": item.1})
        }

        fn available_includes(&self) -> Vec<String> {
            vec!["owner".to_string()]
        }
    }

    #[test]
    fn root_scope_meta_lists_includes() {
        let mut resource = Resource::item((1, "a"), Arc::new(NameTransformer));
        prepare_root_scope(&mut resource);
        assert_eq!(resource.meta()[META_AVAILABLE_INCLUDES], json!(["owner"]));
        assert_eq!(resource.meta()[META_DEFAULT_INCLUDES], json!([]));
    }

    #[test]
    fn collection_shape() {
        let resource = Resource::collection(vec![(1, "a"), (2, "b")], Arc::new(NameTransformer));
        assert!(resource.is_collection());
        assert_eq!(resource.resource_key(), "names");
        assert!(format!("{:?}", resource).contains("collection(2)"));
        assert!(Resource::null("names").is_null());
    }
}
