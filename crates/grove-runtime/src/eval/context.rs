//! Execution task context and collaborator seams.

use std::sync::Arc;

use grove_data::value::OwnedValue;
use indexmap::IndexMap;

/// Resolves a logical collection name to its documents, already parsed into
/// the tagged encoding. Document loading itself (filesystem, XML parsing)
/// lives outside the core.
pub trait CollectionProvider: Send + Sync {
    /// `None` when no collection of that name exists.
    fn open(&self, name: &str) -> Option<Box<dyn Iterator<Item = OwnedValue> + '_>>;
}

/// In-memory provider keyed by collection name.
#[derive(Default)]
pub struct StaticCollectionProvider {
    collections: IndexMap<String, Vec<OwnedValue>>,
}

impl StaticCollectionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, documents: Vec<OwnedValue>) {
        self.collections.insert(name.into(), documents);
    }
}

impl CollectionProvider for StaticCollectionProvider {
    fn open(&self, name: &str) -> Option<Box<dyn Iterator<Item = OwnedValue> + '_>> {
        self.collections
            .get(name)
            .map(|docs| Box::new(docs.iter().cloned()) as Box<dyn Iterator<Item = OwnedValue>>)
    }
}

/// Per-partition execution context handed to evaluator factories.
#[derive(Clone)]
pub struct TaskContext {
    partition: usize,
    collections: Arc<dyn CollectionProvider>,
}

impl TaskContext {
    pub fn new(partition: usize, collections: Arc<dyn CollectionProvider>) -> Self {
        Self {
            partition,
            collections,
        }
    }

    /// The partition this context belongs to.
    #[inline]
    pub fn partition(&self) -> usize {
        self.partition
    }

    #[inline]
    pub fn collections(&self) -> &Arc<dyn CollectionProvider> {
        &self.collections
    }

    /// Fragment-id generator namespaced by this partition.
    pub fn fragment_ids(&self) -> FragmentIdProvider {
        FragmentIdProvider::new(self.partition as u16)
    }
}

/// Generates document-fragment ids unique across partitions: the partition
/// index in the high half, a per-partition counter in the low half.
#[derive(Debug, Clone)]
pub struct FragmentIdProvider {
    partition: u16,
    counter: u16,
}

impl FragmentIdProvider {
    pub fn new(partition: u16) -> Self {
        Self {
            partition,
            counter: 0,
        }
    }

    /// The next id in this partition's namespace.
    pub fn next_id(&mut self) -> u32 {
        let id = ((self.partition as u32) << 16) | self.counter as u32;
        self.counter = self.counter.wrapping_add(1);
        id
    }
}
