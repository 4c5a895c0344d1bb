use std::collections::HashMap;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use oq_core::{Area, NavigationNode, NodeId, Position, SharedClock};

use crate::config::OverworldConfig;
use crate::error::{TravelError, TravelResult};
use crate::graph::{self, TOWN_ID};

/// Exploration progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationStats {
    /// Nodes visited at least once.
    pub discovered_areas: usize,
    /// Areas materialized so far.
    pub total_areas: usize,
    /// Areas cleared at least once.
    pub cleared_areas: usize,
    /// Nodes currently unlocked.
    pub available_nodes: usize,
}

/// Owns the node graph, the materialized areas, and the travel rules.
///
/// Nodes and areas live in vectors indexed by id, so iteration order is
/// stable and lookups stay constant-time.
pub struct OverworldManager {
    config: OverworldConfig,
    clock: SharedClock,
    rng: StdRng,
    nodes: Vec<NavigationNode>,
    node_index: HashMap<NodeId, usize>,
    areas: Vec<Area>,
    area_index: HashMap<NodeId, usize>,
    discovered: Vec<NodeId>,
    current: NodeId,
    player_position: Position,
    last_travel_time: Option<f64>,
}

impl fmt::Debug for OverworldManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverworldManager")
            .field("current", &self.current)
            .field("nodes", &self.nodes.len())
            .field("areas", &self.areas.len())
            .field("discovered", &self.discovered.len())
            .finish()
    }
}

impl OverworldManager {
    /// A fresh overworld standing in the town.
    pub fn new(config: OverworldConfig, clock: SharedClock) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let now = clock.now_ms();
        let nodes = graph::default_nodes();
        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        let town = graph::town_area(now);
        let current = town.id.clone();
        let mut manager = Self {
            config,
            clock,
            rng,
            nodes,
            node_index,
            areas: Vec::new(),
            area_index: HashMap::new(),
            discovered: vec![current.clone()],
            current,
            player_position: Position::ORIGIN,
            last_travel_time: None,
        };
        manager.insert_area(town);
        manager
    }

    fn insert_area(&mut self, area: Area) -> usize {
        let idx = self.areas.len();
        self.area_index.insert(area.id.clone(), idx);
        self.areas.push(area);
        idx
    }

    /// Travel to `node_id`.
    ///
    /// Rejections are checked in order: unknown node, locked node, level
    /// gate, travel cooldown. On success the area is materialized if needed,
    /// visit timestamps are updated, and the player is placed at the area
    /// origin.
    pub fn travel_to(&mut self, node_id: &NodeId, hero_level: u32) -> TravelResult<NodeId> {
        let node_idx = *self
            .node_index
            .get(node_id)
            .ok_or_else(|| TravelError::NotFound(node_id.clone()))?;
        let node = &self.nodes[node_idx];
        if !node.is_unlocked {
            return Err(TravelError::Locked(node_id.clone()));
        }
        if hero_level < node.required_level {
            return Err(TravelError::LevelTooLow {
                required: node.required_level,
            });
        }

        let now = self.clock.now_ms();
        if let Some(last) = self.last_travel_time {
            let elapsed = now - last;
            if elapsed < self.config.travel_cooldown_ms {
                return Err(TravelError::Throttled {
                    remaining_ms: self.config.travel_cooldown_ms - elapsed,
                });
            }
        }

        let area_idx = match self.area_index.get(node_id) {
            Some(&idx) => idx,
            None => {
                let area = graph::area_from_node(&self.nodes[node_idx], &mut self.rng, now);
                tracing::debug!(
                    area = %area.id,
                    enemies = area.enemy_count,
                    width = area.size.width,
                    height = area.size.height,
                    "materialized area"
                );
                self.insert_area(area)
            }
        };

        let area = &mut self.areas[area_idx];
        area.last_visited = now;
        if !self.discovered.contains(node_id) {
            area.discovered_at = now;
            self.discovered.push(node_id.clone());
            self.nodes[node_idx].is_explored = true;
        }

        self.current = node_id.clone();
        self.player_position = Position::ORIGIN;
        self.last_travel_time = Some(now);
        tracing::info!(area = %node_id, "traveled");
        Ok(node_id.clone())
    }

    /// Unlock every locked node whose level gate `hero_level` meets.
    /// Returns the newly unlocked nodes; a second call with the same level
    /// returns nothing.
    pub fn check_node_unlocks(&mut self, hero_level: u32) -> Vec<NavigationNode> {
        let mut unlocked = Vec::new();
        for node in &mut self.nodes {
            if !node.is_unlocked && hero_level >= node.required_level {
                node.is_unlocked = true;
                tracing::info!(node = %node.id, "node unlocked");
                unlocked.push(node.clone());
            }
        }
        unlocked
    }

    /// Record that every enemy in `area_id` was defeated. Unknown areas are
    /// ignored. Returns the nodes unlocked as a consequence.
    pub fn mark_area_cleared(&mut self, area_id: &NodeId, hero_level: u32) -> Vec<NavigationNode> {
        let Some(&idx) = self.area_index.get(area_id) else {
            return Vec::new();
        };
        let area = &mut self.areas[idx];
        area.clear_count += 1;
        tracing::debug!(area = %area.id, clears = area.clear_count, "area cleared");
        self.check_node_unlocks(hero_level)
    }

    /// Mark previously visited nodes as discovered and explored, e.g. after
    /// loading a save. Unknown ids are skipped.
    pub fn restore_discovered(&mut self, ids: &[NodeId]) {
        for id in ids {
            let Some(&idx) = self.node_index.get(id) else {
                continue;
            };
            self.nodes[idx].is_explored = true;
            if !self.discovered.contains(id) {
                self.discovered.push(id.clone());
            }
        }
    }

    /// Unlocked nodes, in graph order.
    pub fn available_nodes(&self) -> Vec<&NavigationNode> {
        self.nodes.iter().filter(|n| n.is_unlocked).collect()
    }

    /// Every node, in graph order.
    pub fn nodes(&self) -> &[NavigationNode] {
        &self.nodes
    }

    /// Every materialized area, in materialization order.
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Look up a node.
    pub fn node(&self, id: &NodeId) -> Option<&NavigationNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Look up a materialized area.
    pub fn area(&self, id: &NodeId) -> Option<&Area> {
        self.area_index.get(id).map(|&i| &self.areas[i])
    }

    /// Id of the area the player is in.
    pub fn current_area_id(&self) -> &NodeId {
        &self.current
    }

    /// The area the player is in.
    pub fn current_area(&self) -> Option<&Area> {
        self.area(&self.current)
    }

    /// Whether the player is in a safe zone.
    pub fn is_in_town(&self) -> bool {
        self.current_area().is_some_and(Area::is_town)
    }

    /// Visited node ids, in discovery order.
    pub fn discovered(&self) -> &[NodeId] {
        &self.discovered
    }

    /// Player position inside the current area.
    pub fn player_position(&self) -> Position {
        self.player_position
    }

    /// Milliseconds until the next travel is allowed.
    pub fn travel_cooldown_remaining(&self) -> f64 {
        self.last_travel_time.map_or(0.0, |last| {
            (self.config.travel_cooldown_ms - (self.clock.now_ms() - last)).max(0.0)
        })
    }

    /// Exploration progress counters.
    pub fn exploration_stats(&self) -> ExplorationStats {
        ExplorationStats {
            discovered_areas: self.discovered.len(),
            total_areas: self.areas.len(),
            cleared_areas: self.areas.iter().filter(|a| a.clear_count > 0).count(),
            available_nodes: self.nodes.iter().filter(|n| n.is_unlocked).count(),
        }
    }

    /// Whether `id` names the hub.
    pub fn is_town_id(id: &NodeId) -> bool {
        id.as_str() == TOWN_ID
    }
}

#[cfg(test)]
mod tests {
    use oq_core::ManualClock;

    use super::*;

    fn manager() -> (OverworldManager, ManualClock) {
        let clock = ManualClock::starting_at(10_000.0);
        (
            OverworldManager::new(OverworldConfig::default(), clock.shared()),
            clock,
        )
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn starts_in_town() {
        let (ow, _) = manager();
        assert!(ow.is_in_town());
        assert_eq!(ow.current_area_id().as_str(), TOWN_ID);
        assert_eq!(ow.discovered(), &[id(TOWN_ID)]);
        assert_eq!(
            ow.exploration_stats(),
            ExplorationStats {
                discovered_areas: 1,
                total_areas: 1,
                cleared_areas: 0,
                available_nodes: 2,
            }
        );
    }

    #[test]
    fn first_travel_is_not_throttled() {
        let (mut ow, _) = manager();
        assert_eq!(ow.travel_cooldown_remaining(), 0.0);
        assert_eq!(
            ow.travel_to(&id("whispering_woods"), 1).unwrap(),
            id("whispering_woods")
        );
        assert!(!ow.is_in_town());
        let node = ow.node(&id("whispering_woods")).unwrap();
        assert!(node.is_explored);
    }

    #[test]
    fn rejections_are_checked_in_order() {
        let (mut ow, clock) = manager();
        assert_eq!(
            ow.travel_to(&id("atlantis"), 99),
            Err(TravelError::NotFound(id("atlantis")))
        );
        assert_eq!(
            ow.travel_to(&id("storm_peaks"), 99),
            Err(TravelError::Locked(id("storm_peaks")))
        );

        ow.travel_to(&id("whispering_woods"), 1).unwrap();
        clock.advance(400.0);
        match ow.travel_to(&id(TOWN_ID), 1) {
            Err(TravelError::Throttled { remaining_ms }) => {
                assert!((remaining_ms - 600.0).abs() < 1e-9);
            }
            other => panic!("expected throttle, got {other:?}"),
        }
        clock.advance(600.0);
        assert!(ow.travel_to(&id(TOWN_ID), 1).is_ok());
    }

    #[test]
    fn level_gate_applies_to_unlocked_nodes() {
        let (mut ow, _) = manager();
        ow.check_node_unlocks(5);
        assert_eq!(
            ow.travel_to(&id("storm_peaks"), 4),
            Err(TravelError::LevelTooLow { required: 5 })
        );
    }

    #[test]
    fn unlock_check_is_idempotent() {
        let (mut ow, _) = manager();
        let first: Vec<NodeId> = ow.check_node_unlocks(3).into_iter().map(|n| n.id).collect();
        assert_eq!(first, vec![id("forgotten_caves"), id("crystal_lake")]);
        assert!(ow.check_node_unlocks(3).is_empty());
        assert_eq!(ow.available_nodes().len(), 4);
    }

    #[test]
    fn revisit_keeps_area_and_discovery_time() {
        let (mut ow, clock) = manager();
        ow.travel_to(&id("whispering_woods"), 1).unwrap();
        let first = ow.area(&id("whispering_woods")).unwrap().clone();
        assert_eq!(first.discovered_at, 10_000.0);

        clock.advance(2_000.0);
        ow.travel_to(&id(TOWN_ID), 1).unwrap();
        clock.advance(2_000.0);
        ow.travel_to(&id("whispering_woods"), 1).unwrap();

        let again = ow.area(&id("whispering_woods")).unwrap();
        assert_eq!(again.size, first.size);
        assert_eq!(again.enemy_count, first.enemy_count);
        assert_eq!(again.discovered_at, 10_000.0);
        assert_eq!(again.last_visited, 14_000.0);
        assert_eq!(ow.areas().len(), 2);
        assert_eq!(ow.exploration_stats().discovered_areas, 2);
    }

    #[test]
    fn clearing_counts_and_unlocks() {
        let (mut ow, _) = manager();
        ow.travel_to(&id("whispering_woods"), 1).unwrap();
        let unlocked = ow.mark_area_cleared(&id("whispering_woods"), 2);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, id("crystal_lake"));
        assert_eq!(ow.area(&id("whispering_woods")).unwrap().clear_count, 1);
        assert_eq!(ow.exploration_stats().cleared_areas, 1);

        assert!(ow.mark_area_cleared(&id("storm_peaks"), 9).is_empty());
        assert!(ow.area(&id("storm_peaks")).is_none());
    }

    #[test]
    fn restore_discovered_marks_known_nodes() {
        let (mut ow, _) = manager();
        ow.restore_discovered(&[id("whispering_woods"), id("nowhere"), id(TOWN_ID)]);
        assert_eq!(ow.discovered(), &[id(TOWN_ID), id("whispering_woods")]);
        assert!(ow.node(&id("whispering_woods")).unwrap().is_explored);
    }

    #[test]
    fn town_id_helper() {
        assert!(OverworldManager::is_town_id(&id(TOWN_ID)));
        assert!(!OverworldManager::is_town_id(&id("crystal_lake")));
    }
}
