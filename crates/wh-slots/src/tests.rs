//! Unit tests for wh-slots.

use wh_core::{GridPos, NodeId, NodeKind, SlotId};
use wh_graph::{WarehouseGraph, WarehouseGraphBuilder};

use crate::{Slot, SlotRegistry};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Line graph `0 - 1 - … - (n-1)`.
fn line(n: u32) -> WarehouseGraph {
    let mut b = WarehouseGraphBuilder::new();
    for col in 0..n {
        b.add_node(NodeKind::Aisle, GridPos::new(0, col));
    }
    for i in 1..n {
        b.add_edge(NodeId(i - 1), NodeId(i)).unwrap();
    }
    b.build()
}

fn slot(id: u32, node: u32) -> Slot {
    Slot::new(SlotId(id), Some(NodeId(node)))
}

fn registry(slots: Vec<Slot>) -> SlotRegistry {
    SlotRegistry::from_slots(slots)
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use super::*;
    use crate::{SlotError, UpsertOutcome};

    #[test]
    fn iterates_in_slot_id_order() {
        let r = registry(vec![slot(3, 0), slot(1, 0), slot(2, 0)]);
        let ids: Vec<u32> = r.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn counts() {
        let r = registry(vec![slot(1, 0), slot(2, 0).occupied(), slot(3, 1).occupied()]);
        assert_eq!(r.len(), 3);
        assert_eq!(r.in_use_count(), 2);
        assert_eq!(r.empty_count(), 1);
        assert_eq!(r.slots_at(NodeId(0)).count(), 2);
    }

    #[test]
    fn set_in_use_bumps_version() {
        let mut r = registry(vec![slot(1, 0)]);
        let updated = r.set_in_use(SlotId(1), true).unwrap().clone();
        assert!(updated.in_use);
        assert_eq!(updated.version, 1);
        r.set_in_use(SlotId(1), false).unwrap();
        assert_eq!(r.get(SlotId(1)).unwrap().version, 2);
    }

    #[test]
    fn set_in_use_by_stamps_writer() {
        let mut r = registry(vec![slot(1, 0)]);
        let s = r.set_in_use_by(SlotId(1), true, "dock-a").unwrap();
        assert_eq!(s.updated_by.as_deref(), Some("dock-a"));
        assert_eq!(s.version, 1);
    }

    #[test]
    fn staged_write_is_not_applied_until_committed() {
        let mut r = registry(vec![slot(1, 0)]);
        let staged = r.staged(SlotId(1), true, "dock-a").unwrap();
        assert!(staged.in_use);
        assert_eq!(staged.version, 1);
        assert_eq!(staged.updated_by.as_deref(), Some("dock-a"));

        let local = r.get(SlotId(1)).unwrap();
        assert!(!local.in_use);
        assert_eq!(local.version, 0);

        r.commit(staged.clone());
        assert_eq!(r.get(SlotId(1)), Some(&staged));
        assert!(matches!(r.staged(SlotId(9), true, "dock-a"), Err(SlotError::NotFound(SlotId(9)))));
    }

    #[test]
    fn same_change_by_two_writers_conflicts() {
        let mut a = registry(vec![slot(1, 0)]);
        let mut b = registry(vec![slot(1, 0)]);
        a.set_in_use_by(SlotId(1), true, "a").unwrap();
        let from_b = b.set_in_use_by(SlotId(1), true, "b").unwrap().clone();
        assert_eq!(a.upsert(from_b), UpsertOutcome::Conflict);
    }

    #[test]
    fn set_in_use_unknown_slot() {
        let mut r = SlotRegistry::new();
        assert!(matches!(r.set_in_use(SlotId(9), true), Err(SlotError::NotFound(SlotId(9)))));
    }

    #[test]
    fn upsert_inserts_unknown() {
        let mut r = SlotRegistry::new();
        assert_eq!(r.upsert(slot(1, 0)), UpsertOutcome::Inserted);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn upsert_newer_version_wins() {
        let mut r = registry(vec![slot(1, 0)]);
        let mut newer = slot(1, 0).occupied();
        newer.version = 1;
        assert_eq!(r.upsert(newer), UpsertOutcome::Updated);
        assert!(r.get(SlotId(1)).unwrap().in_use);
    }

    #[test]
    fn upsert_stale_ignored() {
        let mut r = registry(vec![slot(1, 0)]);
        r.set_in_use(SlotId(1), true).unwrap();
        // A republished generation-time record (version 0, empty).
        assert_eq!(r.upsert(slot(1, 0)), UpsertOutcome::Stale);
        assert!(r.get(SlotId(1)).unwrap().in_use);
    }

    #[test]
    fn upsert_echo_unchanged() {
        let mut r = registry(vec![slot(1, 0)]);
        let echo = r.set_in_use(SlotId(1), true).unwrap().clone();
        assert_eq!(r.upsert(echo), UpsertOutcome::Unchanged);
        assert!(!UpsertOutcome::Unchanged.changed());
    }

    #[test]
    fn upsert_same_version_different_state_is_conflict() {
        // Two replicas both booked slot 1 from version 0.
        let mut ours = registry(vec![slot(1, 0)]);
        ours.set_in_use(SlotId(1), true).unwrap();

        let mut theirs = slot(1, 0).occupied();
        theirs.version = 1;
        theirs.level = 2; // any divergence at the same version
        assert_eq!(ours.upsert(theirs), UpsertOutcome::Conflict);
        assert_eq!(ours.get(SlotId(1)).unwrap().level, 1, "local copy kept");
    }

    #[test]
    fn replace_all_drops_old_slots() {
        let mut r = registry(vec![slot(1, 0), slot(2, 0)]);
        r.replace_all(vec![slot(5, 1)]);
        assert_eq!(r.len(), 1);
        assert!(r.get(SlotId(1)).is_none());
        assert!(r.get(SlotId(5)).is_some());
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use super::*;
    use crate::{find_closest_empty_slot, find_closest_used_slot, Occupancy};

    #[test]
    fn picks_nearest_empty() {
        let g = line(6);
        let r = registry(vec![slot(1, 5), slot(2, 3), slot(3, 1).occupied()]);
        let c = find_closest_empty_slot(&g, NodeId(0), &r).unwrap();
        assert_eq!(c.slot, SlotId(2));
        assert_eq!(c.node, NodeId(3));
        assert_eq!(c.distance, 3);
    }

    #[test]
    fn picks_nearest_used() {
        let g = line(6);
        let r = registry(vec![slot(1, 1), slot(2, 4).occupied(), slot(3, 5).occupied()]);
        let c = find_closest_used_slot(&g, NodeId(5), &r).unwrap();
        assert_eq!(c.slot, SlotId(3));
        assert_eq!(c.distance, 0);
    }

    #[test]
    fn nearest_is_no_farther_than_any_other_candidate() {
        let g = wh_graph::WarehouseLayout::generate(wh_graph::LayoutConfig::default())
            .unwrap()
            .to_graph();
        let mut slots = crate::generate_slots(&g, 3);
        // Occupy every third slot to make the empty set irregular.
        for s in slots.iter_mut().step_by(3) {
            s.in_use = true;
        }
        let r = registry(slots);
        let reference = g.first_of_kind(NodeKind::PalletSpawn).unwrap();
        let best = find_closest_empty_slot(&g, reference, &r).unwrap();

        use wh_graph::{BfsPathFinder, PathFinder};
        let d = BfsPathFinder.distances_from(&g, reference).unwrap();
        for s in r.iter().filter(|s| !s.in_use) {
            let node = s.accessible_node.unwrap();
            assert!(best.distance <= d.get(node).unwrap(), "slot {} is closer", s.id);
        }
        assert_eq!(d.get(best.node), Some(best.distance));
    }

    #[test]
    fn all_in_use_yields_none() {
        let g = line(3);
        let r = registry(vec![slot(1, 1).occupied(), slot(2, 2).occupied()]);
        assert!(find_closest_empty_slot(&g, NodeId(0), &r).is_none());
    }

    #[test]
    fn empty_registry_yields_none() {
        let g = line(3);
        let r = SlotRegistry::new();
        assert!(find_closest_empty_slot(&g, NodeId(0), &r).is_none());
        assert!(find_closest_used_slot(&g, NodeId(0), &r).is_none());
    }

    #[test]
    fn none_in_use_yields_no_used_slot() {
        let g = line(3);
        let r = registry(vec![slot(1, 1), slot(2, 2)]);
        assert!(find_closest_used_slot(&g, NodeId(0), &r).is_none());
    }

    #[test]
    fn tie_broken_by_lowest_slot_id() {
        // Nodes 0 and 4 are both two hops from 2.
        let g = line(5);
        let r = registry(vec![slot(7, 4), slot(3, 0), slot(5, 4)]);
        let c = find_closest_empty_slot(&g, NodeId(2), &r).unwrap();
        assert_eq!(c.slot, SlotId(3));
    }

    #[test]
    fn skips_slots_without_accessible_node() {
        let g = line(4);
        let r = registry(vec![Slot::new(SlotId(1), None), slot(2, 3)]);
        let c = find_closest_empty_slot(&g, NodeId(0), &r).unwrap();
        assert_eq!(c.slot, SlotId(2));

        let only_unreachable = registry(vec![Slot::new(SlotId(1), None)]);
        assert!(find_closest_empty_slot(&g, NodeId(0), &only_unreachable).is_none());
    }

    #[test]
    fn skips_unreachable_and_unknown_nodes() {
        let mut b = WarehouseGraphBuilder::new();
        let a = b.add_node(NodeKind::Aisle, GridPos::new(0, 0));
        let c = b.add_node(NodeKind::Aisle, GridPos::new(0, 1));
        let island = b.add_node(NodeKind::Aisle, GridPos::new(5, 5));
        b.add_edge(a, c).unwrap();
        let g = b.build();

        let r = registry(vec![slot(1, island.0), slot(2, 99), slot(3, c.0)]);
        let choice = find_closest_empty_slot(&g, a, &r).unwrap();
        assert_eq!(choice.slot, SlotId(3));

        let r = registry(vec![slot(1, island.0)]);
        assert!(find_closest_empty_slot(&g, a, &r).is_none());
    }

    #[test]
    fn unknown_reference_yields_none() {
        let g = line(3);
        let r = registry(vec![slot(1, 1)]);
        assert!(find_closest_empty_slot(&g, NodeId(50), &r).is_none());
    }

    #[test]
    fn repeated_query_is_stable() {
        let g = line(8);
        let r = registry(vec![slot(4, 6), slot(2, 2), slot(9, 2), slot(1, 6)]);
        let first = find_closest_empty_slot(&g, NodeId(4), &r);
        let second = find_closest_empty_slot(&g, NodeId(4), &r);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().slot, SlotId(1));
    }

    #[test]
    fn occupancy_filter() {
        let s = slot(1, 0);
        assert!(Occupancy::Empty.matches(&s));
        assert!(!Occupancy::Used.matches(&s));
        assert_eq!(Occupancy::Used.to_string(), "used");
    }
}

// ── Generation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod generate_tests {
    use super::*;
    use crate::generate_slots;
    use wh_graph::{LayoutConfig, WarehouseLayout};

    #[test]
    fn one_slot_per_shelf_level() {
        let cfg = LayoutConfig::default();
        let g = WarehouseLayout::generate(cfg).unwrap().to_graph();
        let slots = generate_slots(&g, cfg.levels_per_shelf);
        assert_eq!(slots.len() as u64, cfg.slot_capacity());
        assert_eq!(slots.first().unwrap().id, SlotId(1));
        assert_eq!(slots.last().unwrap().id, SlotId(60));
        assert!(slots.iter().all(|s| !s.in_use && s.version == 0));
    }

    #[test]
    fn accessible_node_is_left_aisle_cell() {
        let layout = WarehouseLayout::generate(LayoutConfig::default()).unwrap();
        let g = layout.to_graph();
        let slots = generate_slots(&g, 3);

        // First shelf node in id order sits at (3, 3).
        let first = &slots[0];
        assert_eq!(first.position, GridPos::new(3, 3));
        assert_eq!(first.shelf_node, Some(layout.node_id(GridPos::new(3, 3))));
        assert_eq!(first.accessible_node, Some(layout.node_id(GridPos::new(3, 2))));
        assert_eq!(
            slots[..3].iter().map(|s| s.level).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        for s in &slots {
            let node = s.accessible_node.unwrap();
            assert_eq!(g.kind(node), Some(NodeKind::Aisle));
        }
    }

    #[test]
    fn shelf_without_aisle_neighbour_has_no_accessible_node() {
        let mut b = WarehouseGraphBuilder::new();
        let s0 = b.add_node(NodeKind::Shelf, GridPos::new(0, 0)); // column 0: no left cell
        let s1 = b.add_node(NodeKind::Shelf, GridPos::new(0, 1)); // left cell is a shelf
        b.add_edge(s0, s1).unwrap();
        let g = b.build();
        let slots = generate_slots(&g, 2);
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| s.accessible_node.is_none()));
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use std::io::Cursor;

    use super::*;
    use crate::{load_slots_reader, SlotError};

    const CSV: &str = "\
slot_id,accessible_node,in_use,shelf_node,row,col,level\n\
1,44,false,45,3,3,1\n\
2,44,true,45,3,3,2\n\
3,,0,60,4,0,1\n";

    #[test]
    fn loads_rows() {
        let slots = load_slots_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].accessible_node, Some(NodeId(44)));
        assert!(slots[1].in_use);
        assert_eq!(slots[1].level, 2);
        assert_eq!(slots[2].accessible_node, None);
        assert!(!slots[2].in_use);
        assert_eq!(slots[2].position, GridPos::new(4, 0));
    }

    #[test]
    fn duplicate_id_rejected() {
        let csv = "slot_id,accessible_node,in_use,shelf_node,row,col,level\n1,2,false,3,0,0,1\n1,2,false,3,0,0,2\n";
        assert!(matches!(load_slots_reader(Cursor::new(csv)), Err(SlotError::Parse(_))));
    }

    #[test]
    fn bad_flag_rejected() {
        let csv = "slot_id,accessible_node,in_use,shelf_node,row,col,level\n1,2,maybe,3,0,0,1\n";
        assert!(matches!(load_slots_reader(Cursor::new(csv)), Err(SlotError::Parse(_))));
    }

    #[test]
    fn missing_column_rejected() {
        let csv = "slot_id,in_use\n1,false\n";
        assert!(load_slots_reader(Cursor::new(csv)).is_err());
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod wire_tests {
    use super::*;

    #[test]
    fn decodes_publisher_record() {
        let json = r#"{"slot_id": 4, "shelf_node": 45, "row": 3, "col": 5,
                       "level": 2, "in_use": false, "accessible_node": 44}"#;
        let s: Slot = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, SlotId(4));
        assert_eq!(s.accessible_node, Some(NodeId(44)));
        assert_eq!(s.position, GridPos::new(3, 5));
        assert_eq!(s.version, 0);
    }

    #[test]
    fn null_accessible_node() {
        let s: Slot = serde_json::from_str(r#"{"slot_id": 1, "accessible_node": null}"#).unwrap();
        assert_eq!(s.accessible_node, None);
        assert!(!s.in_use);
    }

    #[test]
    fn encodes_flat() {
        let v = serde_json::to_value(slot(2, 7).occupied()).unwrap();
        assert_eq!(v["slot_id"], 2);
        assert_eq!(v["accessible_node"], 7);
        assert_eq!(v["in_use"], true);
        assert_eq!(v["row"], 0);
        assert!(v.get("updated_by").is_none());
    }
}
