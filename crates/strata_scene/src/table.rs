use glam::Mat4;
use rustc_hash::FxHashMap;

/// A mesh together with the world transform of the node that references it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMesh {
    /// Mesh index in the description's mesh table.
    pub mesh: usize,
    /// World transform composed root-to-node.
    pub world: Mat4,
    /// Index of the node the transform was taken from.
    pub node: usize,
    /// How many node visits recorded this mesh.
    pub visits: usize,
    /// Material index, filled in once geometry is bound. `None` means "no material".
    pub material: Option<usize>,
}

/// Output of the transform accumulator: one [`ResolvedMesh`] per mesh index.
///
/// Entries keep the order in which meshes were first reached by the
/// preorder traversal. Recording the same mesh again overwrites its transform
/// in place (last write wins).
#[derive(Debug, Clone, Default)]
pub struct MeshTransformTable {
    entries: Vec<ResolvedMesh>,
    lookup: FxHashMap<usize, usize>,
}

impl MeshTransformTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `world` for `mesh`. Returns `true` if an earlier entry was overwritten.
    pub fn record(&mut self, mesh: usize, node: usize, world: Mat4) -> bool {
        if let Some(&slot) = self.lookup.get(&mesh) {
            let entry = &mut self.entries[slot];
            entry.world = world;
            entry.node = node;
            entry.visits += 1;
            return true;
        }

        self.lookup.insert(mesh, self.entries.len());
        self.entries.push(ResolvedMesh {
            mesh,
            world,
            node,
            visits: 1,
            material: None,
        });
        false
    }

    #[must_use]
    pub fn get(&self, mesh: usize) -> Option<&ResolvedMesh> {
        self.lookup.get(&mesh).map(|&slot| &self.entries[slot])
    }

    #[must_use]
    pub fn world_transform(&self, mesh: usize) -> Option<Mat4> {
        self.get(mesh).map(|entry| entry.world)
    }

    /// Sets the material of an already recorded mesh. Unrecorded meshes are ignored.
    pub fn set_material(&mut self, mesh: usize, material: Option<usize>) {
        if let Some(&slot) = self.lookup.get(&mesh) {
            self.entries[slot].material = material;
        }
    }

    #[must_use]
    pub fn contains(&self, mesh: usize) -> bool {
        self.lookup.contains_key(&mesh)
    }

    /// Entries in first-visit order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedMesh> {
        self.entries.iter()
    }

    /// Entries recorded by more than one node visit.
    pub fn shared(&self) -> impl Iterator<Item = &ResolvedMesh> {
        self.entries.iter().filter(|entry| entry.visits > 1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
