use super::*;

#[test]
fn mark_visited_is_idempotent() {
    let mut tracker = OccupancyTracker::new(10);
    let agent = Entity::from_bits(1);
    let cell = CellCoord::new(3, 4);

    tracker.mark_visited(cell, agent);
    tracker.mark_visited(cell, agent);

    assert!(tracker.is_visited_by(cell, agent));
    assert_eq!(tracker.total_entries(), 1);
    assert_eq!(tracker.non_empty_cells(), 1);
}

#[test]
fn visits_are_tracked_per_agent() {
    let mut tracker = OccupancyTracker::new(10);
    let agent_a = Entity::from_bits(1);
    let agent_b = Entity::from_bits(2);
    let cell = CellCoord::new(5, 5);

    tracker.mark_visited(cell, agent_a);

    assert!(tracker.is_visited_by(cell, agent_a));
    assert!(!tracker.is_visited_by(cell, agent_b));

    tracker.mark_visited(cell, agent_b);
    assert_eq!(tracker.total_entries(), 2);
    assert_eq!(tracker.non_empty_cells(), 1);
}

#[test]
fn visitor_count_near_sums_the_neighbourhood() {
    let mut tracker = OccupancyTracker::new(10);
    let agent_a = Entity::from_bits(1);
    let agent_b = Entity::from_bits(2);

    tracker.mark_visited(CellCoord::new(5, 5), agent_a);
    tracker.mark_visited(CellCoord::new(5, 5), agent_b);
    tracker.mark_visited(CellCoord::new(6, 5), agent_a);
    tracker.mark_visited(CellCoord::new(9, 9), agent_a); // outside radius 2

    assert_eq!(tracker.visitor_count_near(CellCoord::new(5, 5), 2), 3);
    assert_eq!(tracker.visitor_count_near(CellCoord::new(9, 9), 2), 1);
}

#[test]
fn visitor_count_near_clamps_at_the_edge() {
    let mut tracker = OccupancyTracker::new(10);
    let agent = Entity::from_bits(1);
    tracker.mark_visited(CellCoord::new(0, 0), agent);

    // Querying at the corner must not underflow or wrap.
    assert_eq!(tracker.visitor_count_near(CellCoord::new(0, 0), 2), 1);
}

#[test]
fn reset_discards_the_ledger() {
    let mut tracker = OccupancyTracker::new(10);
    let agent = Entity::from_bits(1);
    tracker.mark_visited(CellCoord::new(2, 2), agent);

    tracker.reset(12);

    assert!(!tracker.is_visited_by(CellCoord::new(2, 2), agent));
    assert_eq!(tracker.total_entries(), 0);
    // The new size is in effect.
    tracker.mark_visited(CellCoord::new(11, 11), agent);
    assert!(tracker.is_visited_by(CellCoord::new(11, 11), agent));
}
