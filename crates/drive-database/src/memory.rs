//! In-memory node store.
//!
//! Nodes live in a hash map guarded by a single async `RwLock`. Each query
//! the services issue has its own secondary index keyed by the fields it
//! filters, holding `(seq, id)` pairs so results come back in insertion
//! order without scanning the whole table.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use drive_core::result::AppResult;
use drive_core::types::{NodeId, OwnerId};
use drive_entity::node::{CreateNode, Node, NodeKind, NodePatch};

use crate::store::NodeStore;

type Postings = BTreeSet<(u64, NodeId)>;

#[derive(Debug)]
struct Entry {
    seq: u64,
    node: Node,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    nodes: HashMap<NodeId, Entry>,
    by_owner: HashMap<OwnerId, Postings>,
    by_parent: HashMap<NodeId, Postings>,
    by_placement: HashMap<(Option<NodeId>, OwnerId, NodeKind), Postings>,
    trashed_by_owner: HashMap<OwnerId, Postings>,
    live_folder_names: HashMap<(Option<NodeId>, OwnerId, String), Postings>,
}

fn add<K: Eq + Hash>(index: &mut HashMap<K, Postings>, key: K, posting: (u64, NodeId)) {
    index.entry(key).or_default().insert(posting);
}

fn remove<K: Eq + Hash>(index: &mut HashMap<K, Postings>, key: &K, posting: &(u64, NodeId)) {
    if let Some(set) = index.get_mut(key) {
        set.remove(posting);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

fn name_key(name: &str) -> String {
    name.to_lowercase()
}

impl Inner {
    fn index(&mut self, seq: u64, node: &Node) {
        let posting = (seq, node.id);
        add(&mut self.by_owner, node.owner_id.clone(), posting);
        if let Some(parent) = node.parent_id {
            add(&mut self.by_parent, parent, posting);
        }
        add(
            &mut self.by_placement,
            (node.parent_id, node.owner_id.clone(), node.kind),
            posting,
        );
        if node.trashed {
            add(&mut self.trashed_by_owner, node.owner_id.clone(), posting);
        } else if node.is_folder() {
            add(
                &mut self.live_folder_names,
                (node.parent_id, node.owner_id.clone(), name_key(&node.name)),
                posting,
            );
        }
    }

    fn unindex(&mut self, seq: u64, node: &Node) {
        let posting = (seq, node.id);
        remove(&mut self.by_owner, &node.owner_id, &posting);
        if let Some(parent) = node.parent_id {
            remove(&mut self.by_parent, &parent, &posting);
        }
        remove(
            &mut self.by_placement,
            &(node.parent_id, node.owner_id.clone(), node.kind),
            &posting,
        );
        if node.trashed {
            remove(&mut self.trashed_by_owner, &node.owner_id, &posting);
        } else if node.is_folder() {
            remove(
                &mut self.live_folder_names,
                &(node.parent_id, node.owner_id.clone(), name_key(&node.name)),
                &posting,
            );
        }
    }

    fn resolve(&self, postings: Option<&Postings>) -> Vec<Node> {
        postings
            .into_iter()
            .flatten()
            .filter_map(|(_, id)| self.nodes.get(id))
            .map(|entry| entry.node.clone())
            .collect()
    }
}

/// [`NodeStore`] kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    inner: RwLock<Inner>,
}

impl MemoryNodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes.
    pub async fn len(&self) -> usize {
        self.inner.read().await.nodes.len()
    }

    /// Whether the store holds no nodes.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.nodes.is_empty()
    }
}

#[async_trait]
impl NodeStore for MemoryNodeStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn get(&self, id: NodeId) -> AppResult<Option<Node>> {
        let inner = self.inner.read().await;
        Ok(inner.nodes.get(&id).map(|entry| entry.node.clone()))
    }

    async fn insert(&self, data: CreateNode) -> AppResult<Node> {
        let node = data.into_node(NodeId::new(), Utc::now());
        let mut inner = self.inner.write().await;
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.index(seq, &node);
        inner.nodes.insert(
            node.id,
            Entry {
                seq,
                node: node.clone(),
            },
        );
        Ok(node)
    }

    async fn patch(&self, id: NodeId, patch: NodePatch) -> AppResult<Option<Node>> {
        let mut inner = self.inner.write().await;
        let Some(entry) = inner.nodes.remove(&id) else {
            return Ok(None);
        };
        let Entry { seq, mut node } = entry;
        inner.unindex(seq, &node);
        patch.apply(&mut node);
        inner.index(seq, &node);
        inner.nodes.insert(
            id,
            Entry {
                seq,
                node: node.clone(),
            },
        );
        Ok(Some(node))
    }

    async fn delete(&self, id: NodeId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.nodes.remove(&id) {
            Some(entry) => {
                inner.unindex(entry.seq, &entry.node);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_owner(&self, owner: &OwnerId) -> AppResult<Vec<Node>> {
        let inner = self.inner.read().await;
        Ok(inner.resolve(inner.by_owner.get(owner)))
    }

    async fn find_children_of_kind(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        kind: NodeKind,
    ) -> AppResult<Vec<Node>> {
        let inner = self.inner.read().await;
        let key = (parent, owner.clone(), kind);
        Ok(inner.resolve(inner.by_placement.get(&key)))
    }

    async fn find_child_nodes(&self, parent: NodeId) -> AppResult<Vec<Node>> {
        let inner = self.inner.read().await;
        Ok(inner.resolve(inner.by_parent.get(&parent)))
    }

    async fn find_trashed(&self, owner: &OwnerId) -> AppResult<Vec<Node>> {
        let inner = self.inner.read().await;
        Ok(inner.resolve(inner.trashed_by_owner.get(owner)))
    }

    async fn find_folder_by_name(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        name: &str,
    ) -> AppResult<Option<Node>> {
        let inner = self.inner.read().await;
        let key = (parent, owner.clone(), name_key(name));
        Ok(inner
            .live_folder_names
            .get(&key)
            .and_then(|set| set.first())
            .and_then(|(_, id)| inner.nodes.get(id))
            .map(|entry| entry.node.clone()))
    }
}
