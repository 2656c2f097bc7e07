use bevy::math::Vec2;

use crate::world::Behaviors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// A glyph taking part in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiBody {
    pub id: BodyId,
    pub glyph: &'static str,
    /// Last known center, in surface coordinates (y down).
    pub position: Vec2,
    pub size: f32,
}

/// Live bodies in spawn order. Later entries are drawn above earlier ones.
#[derive(Debug, Default)]
pub struct EmojiPool {
    bodies: Vec<EmojiBody>,
}

impl EmojiPool {
    pub fn add(&mut self, body: EmojiBody) {
        self.bodies.push(body);
    }

    /// Empties the pool and detaches every member from all behaviors at once.
    pub fn remove_all(&mut self, behaviors: &mut Behaviors) -> Vec<EmojiBody> {
        let removed = core::mem::take(&mut self.bodies);
        behaviors.detach_all(removed.iter().map(|body| body.id));
        removed
    }

    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&EmojiBody> {
        self.bodies.iter().find(|body| body.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut EmojiBody> {
        self.bodies.iter_mut().find(|body| body.id == id)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, EmojiBody> {
        self.bodies.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl<'a> IntoIterator for &'a EmojiPool {
    type Item = &'a EmojiBody;
    type IntoIter = core::slice::Iter<'a, EmojiBody>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: u64) -> EmojiBody {
        EmojiBody {
            id: BodyId(id),
            glyph: "🎲",
            position: Vec2::splat(id as f32),
            size: 40.0,
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let mut pool = EmojiPool::default();
        for id in [3, 1, 2] {
            pool.add(body(id));
        }
        let ids: Vec<_> = pool.iter().map(|body| body.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn remove_all_detaches_every_member() {
        let mut pool = EmojiPool::default();
        let mut behaviors = Behaviors::default();
        for id in 0..4 {
            behaviors.attach(BodyId(id));
            pool.add(body(id));
        }

        let removed = pool.remove_all(&mut behaviors);

        assert_eq!(removed.len(), 4);
        assert!(pool.is_empty());
        assert!(behaviors.is_empty());
    }

    #[test]
    fn get_mut_finds_body_by_id() {
        let mut pool = EmojiPool::default();
        pool.add(body(9));
        if let Some(found) = pool.get_mut(BodyId(9)) {
            found.position = Vec2::new(1.0, 2.0);
        }
        assert_eq!(pool.get(BodyId(9)).map(|b| b.position), Some(Vec2::new(1.0, 2.0)));
        assert!(pool.get(BodyId(10)).is_none());
    }
}
