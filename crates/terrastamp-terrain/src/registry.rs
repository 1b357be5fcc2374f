//! Collection of placed stamps, owned outside the grid manager

use terrastamp_core::StampId;

use crate::stamp::Stamp;

/// Stamps in insertion order
#[derive(Debug, Default)]
pub struct StampRegistry {
    stamps: Vec<Stamp>,
}

impl StampRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stamp: Stamp) -> StampId {
        let id = stamp.id();
        self.stamps.push(stamp);
        id
    }

    /// Remove a stamp from the collection. Its chunk contributions are left
    /// in place; use `GridManager::remove_stamp` to clear them too.
    pub fn remove(&mut self, id: StampId) -> Option<Stamp> {
        let index = self.stamps.iter().position(|s| s.id() == id)?;
        Some(self.stamps.remove(index))
    }

    pub fn get(&self, id: StampId) -> Option<&Stamp> {
        self.stamps.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: StampId) -> Option<&mut Stamp> {
        self.stamps.iter_mut().find(|s| s.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Stamp> {
        self.stamps.iter().find(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stamp> {
        self.stamps.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Stamp> {
        self.stamps.iter_mut()
    }

    pub fn any_dirty(&self) -> bool {
        self.stamps.iter().any(Stamp::is_dirty)
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Shape;
    use terrastamp_core::Transform;

    fn flat(name: &str) -> Stamp {
        Stamp::new(name, Box::new(Shape::Flat { value: 1.0 }), Transform::default())
    }

    #[test]
    fn insert_get_remove() {
        let mut registry = StampRegistry::new();
        let a = registry.insert(flat("a"));
        let b = registry.insert(flat("b"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(b).map(Stamp::name), Some("b"));
        assert_eq!(registry.find_by_name("a").map(Stamp::id), Some(a));

        assert!(registry.remove(a).is_some());
        assert!(registry.remove(a).is_none());
        assert!(registry.get(a).is_none());
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn dirty_tracking() {
        let mut registry = StampRegistry::new();
        let id = registry.insert(flat("a"));
        assert!(registry.any_dirty());
        registry.get_mut(id).unwrap().mark_clean();
        assert!(!registry.any_dirty());
    }
}
