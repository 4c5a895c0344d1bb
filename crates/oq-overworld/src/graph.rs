use rand::Rng;
use rand::rngs::StdRng;

use oq_core::{Area, AreaSize, Biome, MapPoint, NavigationNode, NodeId};

/// Id of the hub node and its area.
pub const TOWN_ID: &str = "town_center";

const TOWN_AREA_NAME: &str = "Oathbound Town";
const TOWN_SIDE: u32 = 30;

struct NodeDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    at: (f64, f64),
    biome: Biome,
    unlocked: bool,
    required_level: u32,
    danger: u32,
    rewards: &'static [&'static str],
}

const NODES: &[NodeDef] = &[
    NodeDef {
        id: TOWN_ID,
        name: "Town Center",
        description: "The heart of Oathbound Town. Safe haven and trading hub.",
        at: (0.0, 0.0),
        biome: Biome::Town,
        unlocked: true,
        required_level: 1,
        danger: 0,
        rewards: &["trading", "resting", "upgrades"],
    },
    NodeDef {
        id: "whispering_woods",
        name: "Whispering Woods",
        description: "A dense forest filled with ancient trees and mysterious creatures.",
        at: (15.0, 10.0),
        biome: Biome::Forest,
        unlocked: true,
        required_level: 1,
        danger: 2,
        rewards: &["wood", "herbs", "forest treasures"],
    },
    NodeDef {
        id: "forgotten_caves",
        name: "Forgotten Caves",
        description: "Dark underground caverns hiding forgotten secrets.",
        at: (-12.0, 18.0),
        biome: Biome::Dungeon,
        unlocked: false,
        required_level: 3,
        danger: 4,
        rewards: &["minerals", "ancient artifacts", "rare weapons"],
    },
    NodeDef {
        id: "crystal_lake",
        name: "Crystal Lake",
        description: "A serene lake with crystal-clear waters and aquatic mysteries.",
        at: (20.0, -15.0),
        biome: Biome::Lake,
        unlocked: false,
        required_level: 2,
        danger: 1,
        rewards: &["fish", "pearls", "water magic items"],
    },
    NodeDef {
        id: "storm_peaks",
        name: "Storm Peaks",
        description: "Towering mountains where storms rage eternally.",
        at: (-18.0, -12.0),
        biome: Biome::Mountain,
        unlocked: false,
        required_level: 5,
        danger: 5,
        rewards: &["rare ores", "storm magic", "legendary equipment"],
    },
];

/// The built-in node graph. Only the town is explored at the start.
pub fn default_nodes() -> Vec<NavigationNode> {
    NODES
        .iter()
        .map(|def| NavigationNode {
            id: NodeId::from(def.id),
            name: def.name.to_string(),
            description: def.description.to_string(),
            position: MapPoint::new(def.at.0, def.at.1),
            biome: def.biome,
            is_unlocked: def.unlocked,
            required_level: def.required_level,
            danger_level: def.danger,
            is_explored: def.biome == Biome::Town,
            rewards: def.rewards.iter().map(|r| r.to_string()).collect(),
        })
        .collect()
}

/// The fixed hub area: no enemies, not generated.
pub fn town_area(now: f64) -> Area {
    Area {
        id: NodeId::from(TOWN_ID),
        name: TOWN_AREA_NAME.to_string(),
        biome: Biome::Town,
        size: AreaSize::new(TOWN_SIDE, TOWN_SIDE),
        enemy_count: 0,
        difficulty: 0,
        is_procedural: false,
        discovered_at: now,
        last_visited: now,
        clear_count: 0,
    }
}

/// Materialize the area behind `node`.
///
/// Enemy count is `danger * 3 + [0, 3)`; each side is
/// `danger * 10 + 20 + [0, 10)`.
pub fn area_from_node(node: &NavigationNode, rng: &mut StdRng, now: f64) -> Area {
    let danger = node.danger_level;
    let enemy_count = danger * 3 + rng.random_range(0..3);
    let side = danger * 10 + 20;
    let size = AreaSize::new(side + rng.random_range(0..10), side + rng.random_range(0..10));
    Area {
        id: node.id.clone(),
        name: node.name.clone(),
        biome: node.biome,
        size,
        enemy_count,
        difficulty: danger,
        is_procedural: true,
        discovered_at: now,
        last_visited: now,
        clear_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn default_graph_shape() {
        let nodes = default_nodes();
        assert_eq!(nodes.len(), 5);
        let town = &nodes[0];
        assert_eq!(town.id.as_str(), TOWN_ID);
        assert_eq!(town.danger_level, 0);
        assert!(town.is_unlocked && town.is_explored);

        let unlocked: Vec<&str> = nodes
            .iter()
            .filter(|n| n.is_unlocked)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(unlocked, vec!["town_center", "whispering_woods"]);
        assert!(nodes.iter().all(|n| n.danger_level <= 5));
    }

    #[test]
    fn town_area_is_a_fixed_safe_zone() {
        let town = town_area(12.0);
        assert!(town.is_town());
        assert_eq!(town.enemy_count, 0);
        assert_eq!(town.size, AreaSize::new(30, 30));
        assert!(!town.is_procedural);
    }

    #[test]
    fn generated_area_stays_in_bounds() {
        let nodes = default_nodes();
        let mut rng = StdRng::seed_from_u64(1);
        for node in &nodes[1..] {
            for _ in 0..50 {
                let area = area_from_node(node, &mut rng, 0.0);
                let d = node.danger_level;
                assert!((d * 3..d * 3 + 3).contains(&area.enemy_count));
                let base = d * 10 + 20;
                assert!((base..base + 10).contains(&area.size.width));
                assert!((base..base + 10).contains(&area.size.height));
                assert_eq!(area.difficulty, d);
                assert!(area.is_procedural);
            }
        }
    }

    #[test]
    fn same_seed_same_area() {
        let node = &default_nodes()[2];
        let a = area_from_node(node, &mut StdRng::seed_from_u64(9), 0.0);
        let b = area_from_node(node, &mut StdRng::seed_from_u64(9), 0.0);
        assert_eq!(a, b);
    }
}
