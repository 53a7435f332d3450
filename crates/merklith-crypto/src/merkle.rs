use merklith_types::Hash;
use crate::hash::hash_pair;

/// Binary Merkle tree using blake3.
pub struct MerkleTree {
    leaves: Vec<Hash>,
    nodes: Vec<Hash>,
}

impl MerkleTree {
    /// Build a Merkle tree from leaf data.
    pub fn from_leaves(leaves: &[Hash]) -> Self {
        if leaves.is_empty() {
            return Self {
                leaves: vec![],
                nodes: vec![],
            };
        }

        // Special case: single leaf is its own root
        if leaves.len() == 1 {
            return Self {
                leaves: leaves.to_vec(),
                nodes: vec![leaves[0]],
            };
        }

        let mut tree_leaves = leaves.to_vec();

        // If odd number of leaves, duplicate the last one
        if tree_leaves.len() % 2 != 0 {
            tree_leaves.push(*tree_leaves.last().unwrap());
        }

        let mut nodes = Vec::new();
        let mut current_level: Vec<Hash> = tree_leaves.clone();

        // Build tree bottom-up
        while current_level.len() > 1 {
            let mut next_level = Vec::new();

            for chunk in current_level.chunks(2) {
                let left = &chunk[0];
                let right = if chunk.len() == 2 { &chunk[1] } else { left };
                let parent = hash_pair(left, right);
                next_level.push(parent);
            }

            nodes.extend(current_level.iter().cloned());
            current_level = next_level;
        }

        nodes.push(current_level[0]); // Root

        Self {
            leaves: tree_leaves,
            nodes,
        }
    }

    /// Get the root hash.
    pub fn root(&self) -> Hash {
        self.nodes.last().copied().unwrap_or(Hash::ZERO)
    }

    /// Generate a proof for a leaf at the given index.
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaves.len() {
            return None;
        }

        let leaf = self.leaves[index];
        let mut siblings = Vec::new();
        let mut current_index = index;
        let mut level_size = self.leaves.len();

        // Walk up the tree
        let mut offset = 0;
        while level_size > 1 {
            let sibling_index = if current_index % 2 == 0 {
                current_index + 1
            } else {
                current_index - 1
            };

            if sibling_index < level_size {
                siblings.push(self.nodes[offset + sibling_index]);
            }

            current_index /= 2;
            offset += level_size;
            level_size = (level_size + 1) / 2;
        }

        Some(MerkleProof {
            leaf,
            index,
            siblings,
        })
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Verify a leaf is in the tree
    pub fn verify_leaf(&self, index: usize, leaf: &Hash) -> bool {
        if index >= self.leaves.len() {
            return false;
        }
        self.leaves[index] == *leaf
    }
}

/// Merkle inclusion proof.
#[derive(Clone, Debug)]
pub struct MerkleProof {
    pub leaf: Hash,
    pub index: usize,
    pub siblings: Vec<Hash>,
}

impl MerkleProof {
    /// Verify this proof against an expected root.
    pub fn verify(&self, root: &Hash) -> bool {
        &self.compute_root() == root
    }

    /// Compute the root from this proof.
    pub fn compute_root(&self) -> Hash {
        let mut current = self.leaf;
        let mut index = self.index;

        for sibling in &self.siblings {
            if index % 2 == 0 {
                current = hash_pair(&current, sibling);
            } else {
                current = hash_pair(sibling, &current);
            }
            index /= 2;
        }

        current
    }

    /// Get proof size (number of siblings)
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

/// Hash two children to get parent node.
pub fn merkle_hash_pair(left: &Hash, right: &Hash) -> Hash {
    hash_pair(left, right)
}
