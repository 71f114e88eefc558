//! End-to-end planning scenarios across distributor and allocator.

use std::cell::RefCell;
use std::collections::HashMap;

use hearth_core::{HomesteadClass, PickOrder, ScoringPolicy, VillageSnapshot};
use hearth_placement::{
    Homestead, OracleError, Plan, PlanOptions, SnapshotOracle, Villager, plan_batch_assignment,
    plan_single_newest_assignment, snapshot_to_homesteads, snapshot_to_villagers,
};

fn homestead(id: &str, class: HomesteadClass, occupants: u32, capacity: u32) -> Homestead {
    Homestead {
        id: id.to_string(),
        class,
        occupants,
        capacity,
        eligible: true,
    }
}

fn villagers(count: u64) -> Vec<Villager> {
    (1..=count)
        .map(|id| Villager {
            id,
            tier: u8::try_from(id % 4).unwrap(),
            homestead: None,
        })
        .collect()
}

fn inverse(_: &Homestead, occ: u32) -> Result<f64, OracleError> {
    Ok(10.0 / f64::from(occ))
}

fn final_occupancy(plan: &Plan, homesteads: &[Homestead]) -> HashMap<String, u32> {
    let mut occupancy: HashMap<String, u32> =
        homesteads.iter().map(|h| (h.id.clone(), h.occupants)).collect();
    for a in &plan.assignments {
        *occupancy.entry(a.homestead.clone()).or_default() += 1;
    }
    occupancy
}

#[test]
fn scenario_inverse_curve_spreads_one_per_homestead() {
    let homesteads = vec![
        homestead("a", HomesteadClass::HouseL1, 0, 2),
        homestead("b", HomesteadClass::HouseL1, 0, 2),
        homestead("c", HomesteadClass::HouseL1, 0, 1),
    ];

    let plan = plan_batch_assignment(&villagers(3), &homesteads, &PlanOptions::default(), &inverse);

    let occupancy = final_occupancy(&plan, &homesteads);
    assert_eq!(occupancy["a"], 1);
    assert_eq!(occupancy["b"], 1);
    assert_eq!(occupancy["c"], 1);
    assert_eq!(plan.unplaced, 0);
    assert_eq!(plan.remaining_capacity, 2);
}

#[test]
fn scenario_single_villager_goes_to_best_homestead() {
    let by_id = |h: &Homestead, _: u32| -> Result<f64, OracleError> {
        Ok(if h.id == "b" { 50.0 } else { 10.0 })
    };
    let homesteads = vec![
        homestead("a", HomesteadClass::HouseL1, 0, 2),
        homestead("b", HomesteadClass::HouseL1, 0, 2),
    ];

    let plan = plan_single_newest_assignment(&villagers(1), &homesteads, &PlanOptions::default(), &by_id);

    assert_eq!(plan.assignments.len(), 1);
    assert_eq!(plan.assignments[0].homestead, "b");
    assert_eq!(plan.assignments[0].predicted_score, 50.0);
}

#[test]
fn scenario_failing_oracle_uses_class_rank() {
    let flaky = |h: &Homestead, _: u32| -> Result<f64, OracleError> {
        if h.id == "x" {
            Err(OracleError::Failed {
                homestead: h.id.clone(),
                occupancy: 1,
                reason: "score manager missing".to_string(),
            })
        } else {
            Ok(150.0)
        }
    };
    let homesteads = vec![
        homestead("x", HomesteadClass::HouseL2, 0, 1),
        homestead("y", HomesteadClass::ShelterL1, 0, 1),
    ];

    let plan = plan_batch_assignment(&villagers(2), &homesteads, &PlanOptions::default(), &flaky);

    assert_eq!(plan.diagnostics.fallbacks, vec!["x".to_string()]);
    assert_eq!(plan.assignments.len(), 2);
    // x ranks 3 * 100 = 300, ahead of y at 150.
    assert_eq!(plan.assignments[0].homestead, "x");
    assert_eq!(plan.assignments[0].predicted_score, 300.0);
}

#[test]
fn scenario_no_villagers_gives_empty_plan() {
    let homesteads = vec![homestead("a", HomesteadClass::HouseL1, 1, 3)];

    let plan = plan_batch_assignment(&[], &homesteads, &PlanOptions::default(), &inverse);

    assert!(plan.assignments.is_empty());
    assert_eq!(plan.unplaced, 0);
    assert_eq!(plan.remaining_capacity, 2);
}

#[test]
fn scenario_more_villagers_than_beds() {
    let homesteads = vec![
        homestead("a", HomesteadClass::HouseL1, 1, 3),
        homestead("b", HomesteadClass::ShelterL1, 0, 2),
    ];

    let plan = plan_batch_assignment(&villagers(7), &homesteads, &PlanOptions::default(), &inverse);

    assert_eq!(plan.assignments.len(), 4);
    assert_eq!(plan.unplaced, 3);
    assert_eq!(plan.remaining_capacity, 0);
    let occupancy = final_occupancy(&plan, &homesteads);
    assert_eq!(occupancy["a"], 3);
    assert_eq!(occupancy["b"], 2);
}

#[test]
fn plan_never_exceeds_capacity_or_shrinks_occupancy() {
    let bumpy = |h: &Homestead, occ: u32| -> Result<f64, OracleError> {
        let base = f64::from(h.capacity) * 7.0;
        Ok(base / f64::from(occ) + f64::from(occ % 2))
    };
    let homesteads = vec![
        homestead("a", HomesteadClass::HouseL2, 2, 6),
        homestead("b", HomesteadClass::HouseL1, 0, 4),
        homestead("c", HomesteadClass::ShelterL1, 1, 2),
        homestead("d", HomesteadClass::ShelterL1, 3, 3),
    ];

    for count in 0..=15 {
        for pick in [PickOrder::BestFirst, PickOrder::WorstFirst] {
            let options = PlanOptions { pick, ..PlanOptions::default() };
            let plan = plan_batch_assignment(&villagers(count), &homesteads, &options, &bumpy);

            let occupancy = final_occupancy(&plan, &homesteads);
            for h in &homesteads {
                assert!(occupancy[&h.id] <= h.capacity, "{} over capacity", h.id);
                assert!(occupancy[&h.id] >= h.occupants);
            }
            let assigned = u32::try_from(plan.assignments.len()).unwrap();
            assert_eq!(assigned + plan.unplaced, u32::try_from(count).unwrap());
            assert_eq!(assigned + plan.remaining_capacity, 9);
        }
    }
}

#[test]
fn slots_from_one_target_carry_identical_scores() {
    let homesteads = vec![
        homestead("a", HomesteadClass::HouseL1, 0, 5),
        homestead("b", HomesteadClass::HouseL1, 0, 5),
    ];
    let growing = |_: &Homestead, occ: u32| -> Result<f64, OracleError> { Ok(f64::from(occ)) };

    let plan = plan_batch_assignment(&villagers(4), &homesteads, &PlanOptions::default(), &growing);

    let mut seen: HashMap<(String, u32), f64> = HashMap::new();
    for a in &plan.assignments {
        let key = (a.homestead.clone(), a.final_occupancy);
        let score = *seen.entry(key).or_insert(a.predicted_score);
        assert_eq!(score, a.predicted_score);
    }
    assert_eq!(plan.assignments.iter().filter(|a| a.homestead == "a").count(), 4);
}

#[test]
fn oracle_is_asked_once_per_homestead_and_occupancy() {
    let calls: RefCell<HashMap<(String, u32), u32>> = RefCell::new(HashMap::new());
    let counting = |h: &Homestead, occ: u32| -> Result<f64, OracleError> {
        *calls.borrow_mut().entry((h.id.clone(), occ)).or_default() += 1;
        Ok(10.0 / f64::from(occ))
    };
    let homesteads = vec![
        homestead("a", HomesteadClass::HouseL1, 0, 4),
        homestead("b", HomesteadClass::HouseL1, 0, 4),
        homestead("c", HomesteadClass::HouseL1, 0, 4),
    ];

    plan_batch_assignment(&villagers(9), &homesteads, &PlanOptions::default(), &counting);

    assert!(!calls.borrow().is_empty());
    assert!(calls.borrow().values().all(|&n| n == 1));
}

#[test]
fn higher_tier_never_gets_a_worse_slot() {
    let by_capacity = |h: &Homestead, occ: u32| -> Result<f64, OracleError> {
        Ok(f64::from(h.capacity) * 10.0 - f64::from(occ))
    };
    let homesteads = vec![
        homestead("a", HomesteadClass::HouseL2, 0, 3),
        homestead("b", HomesteadClass::HouseL1, 0, 2),
        homestead("c", HomesteadClass::ShelterL1, 0, 1),
    ];
    let pool = villagers(6);

    let plan = plan_batch_assignment(&pool, &homesteads, &PlanOptions::default(), &by_capacity);

    let tier_of: HashMap<u64, u8> = pool.iter().map(|v| (v.id, v.tier)).collect();
    for a in &plan.assignments {
        for b in &plan.assignments {
            if tier_of[&a.villager] > tier_of[&b.villager] {
                assert!(a.predicted_score >= b.predicted_score);
            }
        }
    }
}

#[test]
fn tier_policy_still_respects_distribution() {
    let homesteads = vec![
        homestead("a", HomesteadClass::ShelterL1, 0, 2),
        homestead("b", HomesteadClass::HouseL2, 0, 2),
    ];
    let options = PlanOptions {
        scoring: ScoringPolicy::TierFallback,
        ..PlanOptions::default()
    };

    let plan = plan_batch_assignment(&villagers(2), &homesteads, &options, &inverse);

    // Distribution spreads (inverse curve); slot order follows class rank.
    assert_eq!(plan.assignments[0].homestead, "b");
    assert_eq!(plan.assignments[0].predicted_score, 300.0);
    assert_eq!(plan.assignments[1].homestead, "a");
}

#[test]
fn plans_straight_from_a_snapshot() {
    let snapshot: VillageSnapshot = serde_json::from_str(
        r#"{
            "villagers": [
                { "id": 10, "tier": 1 },
                { "id": 11, "tier": 3 },
                { "id": 12, "tier": 0, "homestead": "longhouse" }
            ],
            "homesteads": [
                { "id": "longhouse", "kind": "House_L2(Clone)", "occupants": 1, "capacity": 4,
                  "base_score": 60.0,
                  "occupancy_curve": [ { "occupants": 1, "multiplier": 1.0 }, { "occupants": 4, "multiplier": 0.5 } ] },
                { "id": "shelter", "kind": "Shelter_L1(Clone)", "capacity": 2, "base_score": 20.0 },
                { "id": "outpost-hut", "kind": "House_L1(Clone)", "capacity": 2, "outpost_id": 1, "base_score": 99.0 }
            ]
        }"#,
    )
    .unwrap();
    let oracle = SnapshotOracle::new(&snapshot);

    let plan = plan_batch_assignment(
        &snapshot_to_villagers(&snapshot),
        &snapshot_to_homesteads(&snapshot, false),
        &PlanOptions::default(),
        &oracle,
    );

    assert_eq!(plan.assignments.len(), 2);
    assert!(plan.assignments.iter().all(|a| a.homestead == "longhouse"));
    // Tier 3 villager is served first.
    assert_eq!(plan.assignments[0].villager, 11);
    assert_eq!(plan.assignments[0].final_occupancy, 3);
}
