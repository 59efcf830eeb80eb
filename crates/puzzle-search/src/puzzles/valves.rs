//! Maximum pressure released by opening valves in a tunnel network.
//!
//! Breadth-first traversals give the hop distance between every pair of
//! valves. A branch-and-bound search then plans which valve each actor opens
//! next, pruning any plan whose optimistic release cannot beat the best plan
//! found so far.

use anyhow::{anyhow, bail, Context, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use super::Puzzle;
use crate::bfs::Bfs;
use crate::bounded::BoundedSearch;

const START_VALVE: &str = "AA";
const UNREACHABLE: u32 = u32::MAX;

#[derive(Debug, Clone)]
pub struct Network {
    flow: Vec<u32>,
    /// Hop counts, `UNREACHABLE` when there is no path.
    distances: Vec<Vec<u32>>,
    /// Valves worth opening; a valve's position here is its bit in `Plan::opened`.
    useful: Vec<usize>,
    start: usize,
}

/// One agent walking the tunnels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Actor {
    at: usize,
    minutes: u32,
}

/// A partial plan. Pressure is credited in full when a valve is opened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Plan {
    actors: SmallVec<[Actor; 2]>,
    opened: u64,
    released: u32,
}

pub struct Valves;

impl Puzzle for Valves {
    type Input = Network;

    fn parse(text: &str) -> Result<Network> {
        let mut scans = Vec::new();
        for (index, line) in text.lines().map(str::trim).enumerate() {
            if line.is_empty() {
                continue;
            }
            scans.push(parse_scan(line).with_context(|| format!("line {}", index + 1))?);
        }

        let names: Vec<String> = scans.iter().map(|(name, _, _)| name.clone()).collect();
        let lookup: FxHashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut tunnels = Vec::with_capacity(scans.len());
        for (name, _, targets) in &scans {
            let targets = targets
                .iter()
                .map(|t| {
                    lookup
                        .get(t.as_str())
                        .copied()
                        .ok_or_else(|| anyhow!("valve {name} leads to unknown valve {t}"))
                })
                .collect::<Result<Vec<_>>>()?;
            tunnels.push(targets);
        }

        let flow: Vec<u32> = scans.iter().map(|(_, rate, _)| *rate).collect();
        let useful: Vec<usize> = (0..flow.len()).filter(|&i| flow[i] > 0).collect();
        if useful.len() > 64 {
            bail!("{} valves with flow exceed the 64 that can be tracked", useful.len());
        }
        let start = *lookup
            .get(START_VALVE)
            .ok_or_else(|| anyhow!("no valve named {START_VALVE}"))?;
        let distances = (0..names.len())
            .map(|from| hop_distances(&tunnels, from))
            .collect();

        Ok(Network {
            flow,
            distances,
            useful,
            start,
        })
    }

    fn part1(network: &Network) -> Result<u64> {
        Ok(best_release(network, 1, 30).into())
    }

    fn part2(network: &Network) -> Result<u64> {
        Ok(best_release(network, 2, 26).into())
    }
}

/// `Valve AA has flow rate=0; tunnels lead to valves DD, II, BB`
fn parse_scan(line: &str) -> Result<(String, u32, Vec<String>)> {
    let rest = line
        .strip_prefix("Valve ")
        .ok_or_else(|| anyhow!("expected line to start with `Valve`"))?;
    let (name, rest) = rest
        .split_once(" has flow rate=")
        .ok_or_else(|| anyhow!("missing flow rate"))?;
    let (rate, rest) = rest.split_once(';').ok_or_else(|| anyhow!("missing `;`"))?;
    let rate = rate
        .parse::<u32>()
        .with_context(|| format!("bad flow rate {rate:?}"))?;
    let (_, targets) = rest
        .split_once("valve")
        .ok_or_else(|| anyhow!("missing tunnel list"))?;
    let targets: Vec<String> = targets
        .trim_start_matches('s')
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();

    Ok((name.trim().to_string(), rate, targets))
}

fn hop_distances(tunnels: &[Vec<usize>], from: usize) -> Vec<u32> {
    let mut distances = vec![UNREACHABLE; tunnels.len()];
    distances[from] = 0;
    Bfs::new(from, |&valve: &usize| tunnels[valve].clone())
        .on_visit(|&valve: &usize, &parent: &usize| distances[valve] = distances[parent] + 1)
        .search();
    distances
}

/// Successor plans: the actor with the most time left walks to a closed
/// valve and opens it, or retires and leaves the rest to its partners.
fn next_plans(network: &Network, plan: &Plan) -> SmallVec<[Plan; 16]> {
    let mut plans = SmallVec::new();
    let Some(mover) = busiest_actor(plan) else {
        return plans;
    };
    let actor = plan.actors[mover];

    for (bit, &valve) in network.useful.iter().enumerate() {
        if plan.opened & (1 << bit) != 0 {
            continue;
        }
        let distance = network.distances[actor.at][valve];
        if distance == UNREACHABLE || actor.minutes <= distance + 1 {
            continue;
        }
        let minutes = actor.minutes - distance - 1;
        let mut next = plan.clone();
        next.actors[mover] = Actor { at: valve, minutes };
        next.opened |= 1 << bit;
        next.released += network.flow[valve] * minutes;
        plans.push(next);
    }

    if plan.actors.iter().filter(|a| a.minutes > 0).count() > 1 {
        let mut retired = plan.clone();
        retired.actors[mover].minutes = 0;
        plans.push(retired);
    }
    plans
}

/// First actor with the most minutes left, if anyone has time at all.
fn busiest_actor(plan: &Plan) -> Option<usize> {
    let mut busiest = None;
    let mut most = 0;
    for (i, actor) in plan.actors.iter().enumerate() {
        if actor.minutes > most {
            most = actor.minutes;
            busiest = Some(i);
        }
    }
    busiest
}

/// Optimistic release: every closed valve is treated as one step away, so
/// each actor can open another valve every 2 minutes, and the strongest
/// valves go to the earliest slots.
fn release_bound(network: &Network, plan: &Plan) -> u32 {
    let mut slots: SmallVec<[u32; 32]> = SmallVec::new();
    for actor in &plan.actors {
        let mut minutes = actor.minutes;
        while minutes > 2 {
            minutes -= 2;
            slots.push(minutes);
        }
    }
    slots.sort_unstable_by(|a, b| b.cmp(a));

    let mut closed: SmallVec<[u32; 64]> = network
        .useful
        .iter()
        .enumerate()
        .filter(|(bit, _)| plan.opened & (1 << bit) == 0)
        .map(|(_, &valve)| network.flow[valve])
        .collect();
    closed.sort_unstable_by(|a, b| b.cmp(a));

    plan.released
        + slots
            .iter()
            .zip(&closed)
            .map(|(minutes, flow)| minutes * flow)
            .sum::<u32>()
}

fn start_plan(network: &Network, actors: usize, minutes: u32) -> Plan {
    Plan {
        actors: (0..actors)
            .map(|_| Actor {
                at: network.start,
                minutes,
            })
            .collect(),
        opened: 0,
        released: 0,
    }
}

fn best_release(network: &Network, actors: usize, minutes: u32) -> u32 {
    let result = BoundedSearch::new(
        start_plan(network, actors, minutes),
        0u32,
        |plan: &Plan, best: &u32| {
            let mut plans = next_plans(network, plan);
            plans.retain(|next| release_bound(network, next) > *best);
            plans
        },
    )
    .on_visit(|plan: &Plan, best: &mut u32| *best = (*best).max(plan.released))
    .search();

    debug!(
        actors,
        minutes,
        released = result.best,
        expanded = result.stats.expanded,
        "valve plan found"
    );
    result.best
}

#[cfg(test)]
mod tests {
    use super::*;

    // Valve indices follow line order.
    const AA: usize = 0;
    const HH: usize = 7;
    const JJ: usize = 9;

    const SAMPLE: &str = "\
Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
Valve BB has flow rate=13; tunnels lead to valves CC, AA
Valve CC has flow rate=2; tunnels lead to valves DD, BB
Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
Valve EE has flow rate=3; tunnels lead to valves FF, DD
Valve FF has flow rate=0; tunnels lead to valves EE, GG
Valve GG has flow rate=0; tunnels lead to valves FF, HH
Valve HH has flow rate=22; tunnel leads to valve GG
Valve II has flow rate=0; tunnels lead to valves AA, JJ
Valve JJ has flow rate=21; tunnel leads to valve II
";

    const SPLIT: &str = "\
Valve AA has flow rate=0; tunnels lead to valves XX, PP
Valve XX has flow rate=10; tunnel leads to valve AA
Valve PP has flow rate=0; tunnels lead to valves AA, YY
Valve YY has flow rate=10; tunnels lead to valves PP, ZZ
Valve ZZ has flow rate=10; tunnel leads to valve YY
";

    #[test]
    fn test_parse_sample() {
        let network = Valves::parse(SAMPLE).unwrap();
        assert_eq!(network.flow.len(), 10);
        assert_eq!(network.useful.len(), 6);
        assert_eq!(network.start, AA);
        assert_eq!(network.distances[AA][JJ], 2);
        assert_eq!(network.distances[AA][HH], 5);
        assert_eq!(network.distances[HH][JJ], 7);
    }

    #[test]
    fn test_sample_part1() {
        let network = Valves::parse(SAMPLE).unwrap();
        assert_eq!(Valves::part1(&network).unwrap(), 1651);
    }

    #[test]
    fn test_sample_part2() {
        let network = Valves::parse(SAMPLE).unwrap();
        assert_eq!(Valves::part2(&network).unwrap(), 1707);
    }

    #[test]
    fn test_release_bound_is_admissible() {
        for (network, actors) in [
            (Valves::parse(SAMPLE).unwrap(), 1),
            (Valves::parse(SAMPLE).unwrap(), 2),
            (Valves::parse(SPLIT).unwrap(), 2),
        ] {
            let result = BoundedSearch::new(
                start_plan(&network, actors, 26),
                0u32,
                |plan: &Plan, best: &u32| {
                    let mut plans = next_plans(&network, plan);
                    plans.retain(|next| release_bound(&network, next) > *best);
                    plans
                },
            )
            .on_visit(|plan: &Plan, best: &mut u32| *best = (*best).max(plan.released))
            .assert_admissible(|plan: &Plan| release_bound(&network, plan), |plan: &Plan| plan.released)
            .search();
            assert!(result.best > 0);
        }
    }

    #[test]
    fn test_pruning_cuts_the_search() {
        let network = Valves::parse(SAMPLE).unwrap();
        let pruned = BoundedSearch::new(
            start_plan(&network, 1, 30),
            0u32,
            |plan: &Plan, best: &u32| {
                let mut plans = next_plans(&network, plan);
                plans.retain(|next| release_bound(&network, next) > *best);
                plans
            },
        )
        .on_visit(|plan: &Plan, best: &mut u32| *best = (*best).max(plan.released))
        .search();
        let exhaustive = BoundedSearch::new(
            start_plan(&network, 1, 30),
            0u32,
            |plan: &Plan, _: &u32| next_plans(&network, plan),
        )
        .on_visit(|plan: &Plan, best: &mut u32| *best = (*best).max(plan.released))
        .search();

        assert_eq!(pruned.best, exhaustive.best);
        assert!(pruned.stats.expanded < exhaustive.stats.expanded);
    }

    #[test]
    fn test_actor_stops_early_for_partner() {
        // One actor opens XX and stops, the other walks on to YY and ZZ.
        let network = Valves::parse(SPLIT).unwrap();
        assert_eq!(Valves::part2(&network).unwrap(), 240 + 230 + 210);
    }

    #[test]
    fn test_busiest_actor_may_retire_with_moves_left() {
        let network = Valves::parse(SPLIT).unwrap();
        let plans = next_plans(&network, &start_plan(&network, 2, 26));
        assert_eq!(plans.len(), 4);
        assert!(plans.iter().any(|p| p.actors[0].minutes == 0 && p.opened == 0));

        let alone = next_plans(&network, &start_plan(&network, 1, 30));
        assert!(alone.iter().all(|p| p.opened != 0));
    }

    #[test]
    fn test_lone_actor_retires_for_partner() {
        let network = Valves::parse(SAMPLE).unwrap();
        let mut plan = start_plan(&network, 2, 26);
        plan.actors[0].minutes = 2;
        plan.actors[1].minutes = 1;
        // Nothing can be opened in time, but the first actor still steps aside.
        let plans = next_plans(&network, &plan);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].actors[0].minutes, 0);
        assert!(next_plans(&network, &plans[0]).is_empty());
    }

    #[test]
    fn test_rejects_unknown_tunnel() {
        let err = Valves::parse("Valve AA has flow rate=0; tunnel leads to valve ZZ").unwrap_err();
        assert!(err.to_string().contains("ZZ"));
    }

    #[test]
    fn test_rejects_bad_rate() {
        let err = Valves::parse("Valve AA has flow rate=x; tunnel leads to valve AA").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
