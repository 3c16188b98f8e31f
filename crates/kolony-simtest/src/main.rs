//! Kolony Logistics Headless Harness
//!
//! Replays the bundled logistics scenario against the pure logic crate:
//! snapshot reads, loaded/packed equivalence, converter balances, transfer
//! requests and a seeded random exchange sweep. No engine, no rendering.
//!
//! Usage:
//!   cargo run -p kolony-simtest
//!   cargo run -p kolony-simtest -- --verbose --seed 7

use kolony_logic::balance::{deficits, vessel_balance};
use kolony_logic::exchange::exchange_resources;
use kolony_logic::production::PartEfficiency;
use kolony_logic::reader::{read_resources, resource_levels, ResourceQuery};
use kolony_logic::transfer::{
    allowed_resources, execute_transfer, parse_transfer_amount, TransferError, TransferRequest,
    TransferRules,
};
use kolony_logic::vessel::Vessel;
use kolony_logic::{LogisticsError, ResourceId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── Scenario data ───────────────────────────────────────────────────────
const SCENARIO_JSON: &str = include_str!("../../../data/logistics_scenario.json");

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    rules: TransferRules,
    vessels: Vec<Vessel>,
    #[serde(default)]
    transfers: Vec<TransferPlan>,
}

#[derive(Debug, Deserialize)]
struct TransferPlan {
    origin: u32,
    destination: u32,
    resources: Vec<TransferLine>,
}

/// Amounts stay text, as typed into the transfer window.
#[derive(Debug, Deserialize)]
struct TransferLine {
    resource: ResourceId,
    amount: String,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    println!("=== Kolony Logistics Harness ===\n");

    let scenario: Scenario = match serde_json::from_str(SCENARIO_JSON) {
        Ok(s) => s,
        Err(e) => {
            println!("  ✗ scenario_parse: JSON parse error: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Scenario data sanity
    results.extend(validate_scenario_data(&scenario, verbose));

    // 2. Loaded vs packed equivalence
    results.extend(validate_mode_equivalence(&scenario, verbose));

    // 3. Converter balances
    results.extend(validate_production(&scenario, verbose));

    // 4. Transfer requests
    results.extend(validate_transfers(&scenario, verbose));

    // 5. Random exchange sweep
    results.extend(validate_random_exchanges(&scenario, seed, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn find_index(vessels: &[Vessel], id: u32) -> Option<usize> {
    vessels.iter().position(|v| v.id.0 == id)
}

/// Two distinct vessels, mutably.
fn pair_mut(vessels: &mut [Vessel], a: usize, b: usize) -> (&mut Vessel, &mut Vessel) {
    if a < b {
        let (left, right) = vessels.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = vessels.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

fn units_within_capacity(vessel: &Vessel) -> Result<bool, LogisticsError> {
    for unit in vessel.storage_units() {
        let amount = unit.amount()?;
        let capacity = unit.capacity()?;
        if amount < 0.0 || amount > capacity + 1e-9 {
            return Ok(false);
        }
    }
    Ok(true)
}

fn total_of(vessels: &[Vessel], resource: &ResourceId) -> f64 {
    vessels
        .iter()
        .filter_map(|v| resource_levels(v).ok())
        .flatten()
        .filter(|l| &l.resource == resource)
        .map(|l| l.available)
        .sum()
}

// ── 1. Scenario data ────────────────────────────────────────────────────

fn validate_scenario_data(scenario: &Scenario, verbose: bool) -> Vec<TestResult> {
    println!("--- Scenario Data ---");
    let mut results = Vec::new();

    results.push(check(
        "scenario_vessels",
        scenario.vessels.len() >= 2,
        format!("{} vessels loaded", scenario.vessels.len()),
    ));

    let mut ids: Vec<u32> = scenario.vessels.iter().map(|v| v.id.0).collect();
    ids.sort_unstable();
    ids.dedup();
    results.push(check(
        "scenario_unique_ids",
        ids.len() == scenario.vessels.len(),
        format!("{} distinct vessel ids", ids.len()),
    ));

    let modes = (
        scenario.vessels.iter().filter(|v| !v.is_dormant()).count(),
        scenario.vessels.iter().filter(|v| v.is_dormant()).count(),
    );
    results.push(check(
        "scenario_both_modes",
        modes.0 > 0 && modes.1 > 0,
        format!("{} loaded, {} packed", modes.0, modes.1),
    ));

    for vessel in &scenario.vessels {
        match resource_levels(vessel) {
            Ok(levels) => {
                if verbose {
                    for l in &levels {
                        println!(
                            "  {:<16} {:<16} {:>10.1} / {:<10.0}",
                            vessel.name, l.resource.name(), l.available, l.capacity
                        );
                    }
                }
                let within = units_within_capacity(vessel).unwrap_or(false);
                results.push(check(
                    &format!("levels_{}", vessel.id.0),
                    within,
                    format!("{}: {} resources readable", vessel.name, levels.len()),
                ));
            }
            Err(e) => results.push(check(
                &format!("levels_{}", vessel.id.0),
                false,
                format!("{}: {}", vessel.name, e),
            )),
        }
    }

    results
}

// ── 2. Mode equivalence ─────────────────────────────────────────────────

fn validate_mode_equivalence(scenario: &Scenario, _verbose: bool) -> Vec<TestResult> {
    println!("--- Loaded/Packed Equivalence ---");
    let mut results = Vec::new();

    for vessel in scenario.vessels.iter().filter(|v| !v.is_dormant()) {
        let packed = vessel.to_packed();
        let reads_match = [
            ResourceQuery::Names,
            ResourceQuery::Amounts,
            ResourceQuery::Capacities,
        ]
        .into_iter()
        .all(|q| read_resources(vessel, q).ok() == read_resources(&packed, q).ok());
        results.push(check(
            &format!("reads_match_{}", vessel.id.0),
            reads_match,
            format!("{}: names/amounts/capacities identical when packed", vessel.name),
        ));

        let mut live = vessel.clone();
        let mut dormant = packed;
        let resources: Vec<ResourceId> = kolony_logic::reader::resource_names(&live);
        let mut mismatches = 0;
        for (i, resource) in resources.iter().enumerate() {
            for delta in [-150.0, 75.5, -1e9, 1e9, 0.0000001] {
                let a = exchange_resources(&mut live, resource, delta * (i + 1) as f64);
                let b = exchange_resources(&mut dormant, resource, delta * (i + 1) as f64);
                if a != b {
                    mismatches += 1;
                }
            }
        }
        let after_match = read_resources(&live, ResourceQuery::Amounts).ok()
            == read_resources(&dormant, ResourceQuery::Amounts).ok();
        results.push(check(
            &format!("exchanges_match_{}", vessel.id.0),
            mismatches == 0 && after_match,
            format!(
                "{}: {} exchanges, {} mismatches",
                vessel.name,
                resources.len() * 5,
                mismatches
            ),
        ));
    }

    results
}

// ── 3. Production ───────────────────────────────────────────────────────

fn validate_production(scenario: &Scenario, verbose: bool) -> Vec<TestResult> {
    println!("--- Converter Balances ---");
    let mut results = Vec::new();

    for vessel in &scenario.vessels {
        let balance = vessel_balance(vessel, &PartEfficiency);
        if verbose {
            for (resource, rate) in &balance {
                println!("  {:<16} {:<16} {:>+12.6}", vessel.name, resource.name(), rate);
            }
        }
        if vessel.is_dormant() {
            results.push(check(
                &format!("balance_{}", vessel.id.0),
                balance.is_empty(),
                format!("{}: packed, no live converters", vessel.name),
            ));
            continue;
        }

        let finite = balance.values().all(|v| v.is_finite());
        results.push(check(
            &format!("balance_{}", vessel.id.0),
            finite && !balance.is_empty(),
            format!("{}: {} resources in balance", vessel.name, balance.len()),
        ));

        let drains = deficits(&balance, 0.0);
        let surplus = balance.values().filter(|v| **v > 0.0).count();
        results.push(check(
            &format!("balance_sides_{}", vessel.id.0),
            surplus + drains.len() <= balance.len(),
            format!(
                "{}: {} produced, {} drained ({})",
                vessel.name,
                surplus,
                drains.len(),
                drains
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }

    results
}

// ── 4. Transfers ────────────────────────────────────────────────────────

fn validate_transfers(scenario: &Scenario, verbose: bool) -> Vec<TestResult> {
    println!("--- Transfers ---");
    let mut results = Vec::new();
    let mut vessels = scenario.vessels.clone();
    let rules = &scenario.rules;

    for (n, plan) in scenario.transfers.iter().enumerate() {
        let name = format!("transfer_{}", n + 1);
        let (Some(oi), Some(di)) = (
            find_index(&vessels, plan.origin),
            find_index(&vessels, plan.destination),
        ) else {
            results.push(check(&name, false, "unknown vessel id".into()));
            continue;
        };

        let outcome = run_transfer(&mut vessels, oi, di, rules, plan);
        match outcome {
            Ok((before, after, lines)) => {
                let conserved = before
                    .iter()
                    .zip(&after)
                    .all(|(b, a)| (b - a).abs() < 1e-6);
                let within = vessels
                    .iter()
                    .all(|v| units_within_capacity(v).unwrap_or(false));
                if verbose {
                    for line in &lines {
                        println!(
                            "  {}: {} requested {:.2}, delivered {:.2}, returned {:.2}",
                            name, line.resource, line.requested, line.delivered, line.returned
                        );
                    }
                }
                results.push(check(
                    &name,
                    conserved && within,
                    format!(
                        "{} lines, {} complete, totals conserved: {}",
                        lines.len(),
                        lines.iter().filter(|l| l.is_complete()).count(),
                        conserved
                    ),
                ));
            }
            Err(e) => {
                // Refusals are expected outcomes; they must be user-level errors.
                let refused = matches!(e, LogisticsError::InvalidTransfer(_));
                results.push(check(&name, refused, format!("refused: {}", e)));
            }
        }
    }

    results
}

type TransferRun = (Vec<f64>, Vec<f64>, Vec<kolony_logic::transfer::TransferOutcome>);

fn run_transfer(
    vessels: &mut [Vessel],
    oi: usize,
    di: usize,
    rules: &TransferRules,
    plan: &TransferPlan,
) -> Result<TransferRun, LogisticsError> {
    let mut request = TransferRequest::new(&vessels[oi], &vessels[di])?;
    let allowed = allowed_resources(rules, &vessels[oi], &vessels[di]);
    for line in &plan.resources {
        if !allowed.contains(&line.resource) {
            return Err(TransferError::ResourceNotAllowed(line.resource.clone()).into());
        }
        let amount = parse_transfer_amount(&line.amount)?;
        request.add_resource(rules, line.resource.clone(), amount)?;
    }

    let before: Vec<f64> = plan
        .resources
        .iter()
        .map(|l| total_of(vessels, &l.resource))
        .collect();
    let (origin, destination) = pair_mut(vessels, oi, di);
    let lines = execute_transfer(&request, rules, origin, destination)?;
    let after: Vec<f64> = plan
        .resources
        .iter()
        .map(|l| total_of(vessels, &l.resource))
        .collect();
    Ok((before, after, lines))
}

// ── 5. Random exchanges ─────────────────────────────────────────────────

fn validate_random_exchanges(scenario: &Scenario, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Exchange Sweep (seed {}) ---", seed);
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    for vessel in scenario.vessels.iter().filter(|v| !v.is_dormant()) {
        let mut live = vessel.clone();
        let mut dormant = vessel.to_packed();
        let resources = kolony_logic::reader::resource_names(&live);
        if resources.is_empty() {
            continue;
        }

        let mut violations = 0;
        let mut mismatches = 0;
        let mut shortfalls = 0;
        for _ in 0..500 {
            let resource = &resources[rng.gen_range(0..resources.len())];
            let delta: f64 = rng.gen_range(-1500.0..1500.0);
            let a = exchange_resources(&mut live, resource, delta);
            let b = exchange_resources(&mut dormant, resource, delta);
            match (a, b) {
                (Ok(a), Ok(b)) => {
                    if a != b {
                        mismatches += 1;
                    }
                    if a != delta {
                        shortfalls += 1;
                    }
                }
                _ => mismatches += 1,
            }
            if !units_within_capacity(&live).unwrap_or(false)
                || !units_within_capacity(&dormant).unwrap_or(false)
            {
                violations += 1;
            }
        }
        if verbose {
            println!(
                "  {}: 500 exchanges, {} short, {} mismatched",
                vessel.name, shortfalls, mismatches
            );
        }
        results.push(check(
            &format!("random_capacity_{}", vessel.id.0),
            violations == 0,
            format!("{}: {} capacity violations", vessel.name, violations),
        ));
        results.push(check(
            &format!("random_modes_agree_{}", vessel.id.0),
            mismatches == 0,
            format!("{}: {} loaded/packed mismatches", vessel.name, mismatches),
        ));
    }

    results
}
