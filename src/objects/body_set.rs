use crate::objects::rigid_body::{BodyId, RigidBody};

/// Owning arena of rigid bodies.
///
/// Bodies are kept in insertion order, which is also increasing [`BodyId`]
/// order, so handles resolve to indices by binary search. Indices shift on
/// removal; handles never do.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    bodies: Vec<RigidBody>,
    next_id: u64,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Takes ownership of `body`, assigns it a fresh id and returns that id.
    pub fn insert(&mut self, mut body: RigidBody) -> BodyId {
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        body.set_id(id);
        self.bodies.push(body);
        id
    }

    /// Removes and returns the body with handle `id`, if present.
    pub fn remove(&mut self, id: BodyId) -> Option<RigidBody> {
        let index = self.index_of(id)?;
        Some(self.bodies.remove(index))
    }

    /// Drops every body. Ids keep increasing, so stale handles stay dead.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, RigidBody::id).ok()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: BodyId) -> Option<&RigidBody> {
        self.index_of(id).map(|index| &self.bodies[index])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let index = self.index_of(id)?;
        Some(&mut self.bodies[index])
    }

    pub fn as_slice(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RigidBody> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, RigidBody> {
        self.bodies.iter_mut()
    }

    /// Mutable references to two distinct bodies by index.
    /// Returns `None` if the indices are equal or out of bounds.
    pub fn pair_mut(
        &mut self,
        index_a: usize,
        index_b: usize,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        if index_a == index_b || index_a >= self.bodies.len() || index_b >= self.bodies.len() {
            return None;
        }

        // split_at_mut needs the lower index first
        if index_a < index_b {
            let (head, tail) = self.bodies.split_at_mut(index_b);
            Some((&mut head[index_a], &mut tail[0]))
        } else {
            let (head, tail) = self.bodies.split_at_mut(index_a);
            Some((&mut tail[0], &mut head[index_b]))
        }
    }

    /// Like [`BodySet::pair_mut`], by handle.
    pub fn pair_mut_by_id(
        &mut self,
        a: BodyId,
        b: BodyId,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        let index_a = self.index_of(a)?;
        let index_b = self.index_of(b)?;
        self.pair_mut(index_a, index_b)
    }
}

impl std::ops::Index<usize> for BodySet {
    type Output = RigidBody;

    fn index(&self, index: usize) -> &RigidBody {
        &self.bodies[index]
    }
}

impl std::ops::IndexMut<usize> for BodySet {
    fn index_mut(&mut self, index: usize) -> &mut RigidBody {
        &mut self.bodies[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;

    fn set_of(count: usize) -> (BodySet, Vec<BodyId>) {
        let mut set = BodySet::new();
        let ids = (0..count)
            .map(|i| set.insert(RigidBody::new(Vec2::new(i as f64, 0.0), 1.0)))
            .collect();
        (set, ids)
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let (set, ids) = set_of(3);
        assert_eq!(ids, vec![BodyId::new(0), BodyId::new(1), BodyId::new(2)]);
        assert_eq!(set.len(), 3);
        for (index, id) in ids.iter().enumerate() {
            assert_eq!(set.index_of(*id), Some(index));
            assert_eq!(set[index].id(), *id);
        }
    }

    #[test]
    fn test_remove_keeps_handles_valid() {
        let (mut set, ids) = set_of(4);
        let removed = set.remove(ids[1]).unwrap();
        assert_eq!(removed.id(), ids[1]);
        assert!(!set.contains(ids[1]));
        assert!(set.remove(ids[1]).is_none());

        assert_eq!(set.index_of(ids[2]), Some(1));
        assert_eq!(set.get(ids[3]).unwrap().position, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_clear_never_reuses_ids() {
        let (mut set, ids) = set_of(2);
        set.clear();
        assert!(set.is_empty());
        let fresh = set.insert(RigidBody::new(Vec2::ZERO, 1.0));
        assert!(!ids.contains(&fresh));
        assert!(set.get(ids[0]).is_none());
    }

    #[test]
    fn test_pair_mut() {
        let (mut set, ids) = set_of(3);
        {
            let (a, b) = set.pair_mut(2, 0).unwrap();
            assert_eq!(a.id(), ids[2]);
            assert_eq!(b.id(), ids[0]);
            a.position = Vec2::new(10.0, 0.0);
        }
        assert_eq!(set[2].position, Vec2::new(10.0, 0.0));

        assert!(set.pair_mut(1, 1).is_none());
        assert!(set.pair_mut(0, 3).is_none());
        assert!(set.pair_mut_by_id(ids[0], BodyId::new(99)).is_none());
        assert!(set.pair_mut_by_id(ids[0], ids[1]).is_some());
    }
}
