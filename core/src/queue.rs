use std::collections::HashMap;
use std::hash::Hash;

use crate::weight::Weight;

/// One tracked node. `position` is its index in the heap array while queued,
/// `None` once extracted; the priority is kept after extraction so callers
/// can read finalized distances back.
#[derive(Debug, Clone)]
struct Entry<N, W> {
    node: N,
    priority: W,
    position: Option<usize>,
}

/// Binary min-heap over nodes with O(log n) decrease-key.
///
/// Every swap rewrites the moved entries' `position`, so an arbitrary node
/// can be located in O(1) and re-sifted without scanning the heap.
/// Ties are broken arbitrarily.
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<N, W> {
    entries: Vec<Entry<N, W>>,
    heap: Vec<usize>,
    slots: HashMap<N, usize>,
}

impl<N, W> IndexedPriorityQueue<N, W>
where
    N: Clone + Eq + Hash,
    W: Weight,
{
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a node. Returns false (and changes nothing) if the node has
    /// already been inserted, queued or extracted.
    pub fn insert(&mut self, node: N, priority: W) -> bool {
        if !self.append(node, priority) {
            return false;
        }
        self.sift_up(self.heap.len() - 1);
        true
    }

    fn append(&mut self, node: N, priority: W) -> bool {
        if self.slots.contains_key(&node) {
            return false;
        }
        let slot = self.entries.len();
        let position = self.heap.len();
        self.slots.insert(node.clone(), slot);
        self.entries.push(Entry {
            node,
            priority,
            position: Some(position),
        });
        self.heap.push(slot);
        true
    }

    /// Remove and return the node with the smallest priority.
    pub fn pop_min(&mut self) -> Option<(N, W)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let slot = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        let entry = &mut self.entries[slot];
        entry.position = None;
        Some((entry.node.clone(), entry.priority))
    }

    /// Lower the priority of a queued node. Returns false if the node is not
    /// queued or `priority` is not strictly smaller than the current one.
    pub fn decrease_key(&mut self, node: &N, priority: W) -> bool {
        let Some(&slot) = self.slots.get(node) else {
            return false;
        };
        let entry = &mut self.entries[slot];
        let Some(position) = entry.position else {
            return false;
        };
        if !(priority < entry.priority) {
            return false;
        }
        entry.priority = priority;
        self.sift_up(position);
        true
    }

    /// Current priority of a queued node, or the final one of an extracted node.
    pub fn priority(&self, node: &N) -> Option<W> {
        self.slots.get(node).map(|&slot| self.entries[slot].priority)
    }

    /// True while the node is still waiting in the heap.
    pub fn is_queued(&self, node: &N) -> bool {
        self.slots
            .get(node)
            .is_some_and(|&slot| self.entries[slot].position.is_some())
    }

    /// True if the node was ever inserted.
    pub fn contains(&self, node: &N) -> bool {
        self.slots.contains_key(node)
    }

    /// Number of nodes still queued.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.entries[self.heap[a]].priority < self.entries[self.heap[b]].priority
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.entries[self.heap[a]].position = Some(a);
        self.entries[self.heap[b]].position = Some(b);
    }

    fn sift_up(&mut self, mut node: usize) {
        while node > 0 {
            let parent = (node - 1) / 2;
            if self.less(node, parent) {
                self.swap(parent, node);
                node = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut node: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * node + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smaller = left;
            if right < len && self.less(right, left) {
                smaller = right;
            }

            if self.less(smaller, node) {
                self.swap(node, smaller);
                node = smaller;
            } else {
                break;
            }
        }
    }
}

impl<N, W> FromIterator<(N, W)> for IndexedPriorityQueue<N, W>
where
    N: Clone + Eq + Hash,
    W: Weight,
{
    /// Bulk build in O(n): append everything, then heapify bottom-up.
    /// Repeated nodes keep their first priority.
    fn from_iter<I: IntoIterator<Item = (N, W)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut queue = Self::with_capacity(iter.size_hint().0);
        for (node, priority) in iter {
            queue.append(node, priority);
        }
        for i in (0..queue.heap.len() / 2).rev() {
            queue.sift_down(i);
        }
        queue
    }
}
