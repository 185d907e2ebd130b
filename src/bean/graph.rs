//! Typed-view factory

use super::element::{Bean, BeanBase, Element};
use super::error::{BeanError, BeanResult};
use crate::config::GraphSchema;
use crate::graph::{GraphError, GraphStore};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Store handle shared by a factory and everyone holding views
pub type SharedStore = Arc<RwLock<GraphStore>>;

/// Binds typed views onto elements of one graph store.
///
/// Cloning is cheap and every clone talks to the same store. The factory
/// keeps no per-call state, so it can be shared across threads.
#[derive(Clone)]
pub struct BeanGraph {
    store: SharedStore,
    schema: Arc<GraphSchema>,
}

impl BeanGraph {
    pub fn new(store: SharedStore) -> Self {
        Self::with_schema(store, GraphSchema::default())
    }

    pub fn with_schema(store: SharedStore, schema: GraphSchema) -> Self {
        BeanGraph {
            store,
            schema: Arc::new(schema),
        }
    }

    /// Take ownership of a store and share it behind a lock
    pub fn from_store(store: GraphStore) -> Self {
        Self::new(Arc::new(RwLock::new(store)))
    }

    pub fn schema(&self) -> &GraphSchema {
        &self.schema
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Read access to the store. A poisoned lock is recovered: the layer
    /// writes single properties or edges, so a panicking writer cannot leave
    /// a half-applied multi-step change behind.
    pub fn read(&self) -> RwLockReadGuard<'_, GraphStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, GraphStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wrap `element` as a `T` view.
    ///
    /// Fails with [`BeanError::Configuration`] when `T` binds the other
    /// element kind, and with the store's not-found error when the element
    /// does not exist.
    pub fn wrap<T: Bean>(&self, element: impl Into<Element>) -> BeanResult<T> {
        let element = element.into();
        let bean = self.bind(element)?;

        let store = self.read();
        match element {
            Element::Vertex(id) if !store.has_node(id) => Err(GraphError::NodeNotFound(id).into()),
            Element::Edge(id) if !store.has_edge(id) => Err(GraphError::EdgeNotFound(id).into()),
            _ => Ok(bean),
        }
    }

    /// Bind without checking existence, for ids just read from the store
    pub(crate) fn bind<T: Bean>(&self, element: impl Into<Element>) -> BeanResult<T> {
        let element = element.into();
        let base = T::Base::from_element(element, self.clone()).ok_or_else(|| BeanError::Configuration {
            bean: std::any::type_name::<T>(),
            element,
            reason: format!("view binds a {}", T::Base::KIND),
        })?;
        Ok(T::from_base(base))
    }

    pub(crate) fn bind_all<T, I>(&self, elements: I) -> BeanResult<Vec<T>>
    where
        T: Bean,
        I: IntoIterator,
        I::Item: Into<Element>,
    {
        elements.into_iter().map(|element| self.bind(element)).collect()
    }

    /// Whether both factories share the same store
    pub fn same_store(&self, other: &BeanGraph) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    /// Ids are only meaningful inside one store, so a view from another
    /// store must not be written into this one.
    pub(crate) fn ensure_same_store<T: Bean>(&self, view: &T) -> BeanResult<()> {
        if self.same_store(view.bean_graph()) {
            return Ok(());
        }
        Err(BeanError::Configuration {
            bean: std::any::type_name::<T>(),
            element: view.element(),
            reason: "view belongs to another graph store".to_string(),
        })
    }
}

impl fmt::Debug for BeanGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanGraph").field("schema", &self.schema).finish_non_exhaustive()
    }
}
