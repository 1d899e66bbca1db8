//! Pairwise AABB collision detection with layer/mask filtering
//!
//! Brute force over every unordered pair of live colliders, O(n²) by
//! design. Detection is separated from response: the frame loop collects
//! contacts here, then dispatches `on_collision` on each side whose mask
//! admits the other's layer.

use super::aabb::Aabb;
use super::collider::Collider;
use super::world::{EntityId, World};

/// An overlapping pair, `a` before `b` in traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
    /// `a`'s mask admits `b`'s layer
    pub a_reacts: bool,
    /// `b`'s mask admits `a`'s layer
    pub b_reacts: bool,
}

/// Live colliders in traversal order, with world-space boxes
pub fn collect_colliders<S: 'static>(world: &World<S>) -> Vec<(EntityId, Collider, Aabb)> {
    world
        .traverse()
        .into_iter()
        .filter_map(|id| {
            let collider = *world.get(id)?.collider.as_ref()?;
            let aabb = world.world_aabb(id)?;
            Some((id, collider, aabb))
        })
        .collect()
}

/// Every overlapping pair where at least one side reacts.
///
/// Each unordered pair is tested once; output order is stable for a given
/// arena layout.
pub fn detect_contacts<S: 'static>(world: &World<S>) -> Vec<Contact> {
    let colliders = collect_colliders(world);
    let mut contacts = Vec::new();

    for (i, (a, collider_a, box_a)) in colliders.iter().enumerate() {
        for (b, collider_b, box_b) in &colliders[i + 1..] {
            let a_reacts = collider_a.can_collide_with(collider_b);
            let b_reacts = collider_b.can_collide_with(collider_a);
            if !(a_reacts || b_reacts) {
                continue;
            }
            if box_a.intersects(box_b) {
                contacts.push(Contact {
                    a: *a,
                    b: *b,
                    a_reacts,
                    b_reacts,
                });
            }
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entity::Entity;

    fn collider(x: f32, y: f32, layer: u8, mask: u32) -> Entity<()> {
        Entity::new("C").with_collider(
            Collider::new(Aabb::new(x, y, 10.0, 10.0))
                .with_layer(layer)
                .with_mask(mask),
        )
    }

    #[test]
    fn test_overlapping_pair_detected_once() {
        let mut world: World<()> = World::new();
        let a = world.insert(collider(0.0, 0.0, 0, 0b1));
        let b = world.insert(collider(5.0, 0.0, 0, 0b1));
        let contacts = detect_contacts(&world);
        assert_eq!(
            contacts,
            vec![Contact {
                a,
                b,
                a_reacts: true,
                b_reacts: true
            }]
        );
    }

    #[test]
    fn test_masks_filter_each_direction() {
        let mut world: World<()> = World::new();
        let player = world.insert(collider(0.0, 0.0, 0, 1 << 1));
        let enemy = world.insert(collider(2.0, 0.0, 1, 0));
        let _ghost = world.insert(collider(1.0, 0.0, 5, 0));
        let contacts = detect_contacts(&world);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].a, player);
        assert_eq!(contacts[0].b, enemy);
        assert!(contacts[0].a_reacts && !contacts[0].b_reacts);
    }

    #[test]
    fn test_dead_and_colliderless_entities_ignored() {
        let mut world: World<()> = World::new();
        let _a = world.insert(collider(0.0, 0.0, 0, 0b1));
        let b = world.insert(collider(0.0, 0.0, 0, 0b1));
        world.insert(Entity::new("NoCollider"));
        world.kill(b);
        assert!(detect_contacts(&world).is_empty());
    }

    #[test]
    fn test_children_collide_in_world_space() {
        let mut world: World<()> = World::new();
        let parent = world.insert(collider(100.0, 0.0, 3, 0));
        let child = world.insert_child(parent, collider(0.0, 0.0, 0, 0b1)).unwrap();
        let target = world.insert(collider(104.0, 0.0, 0, 0));
        let contacts = detect_contacts(&world);
        assert!(
            contacts
                .iter()
                .any(|c| c.a == child && c.b == target && c.a_reacts)
        );
    }
}
