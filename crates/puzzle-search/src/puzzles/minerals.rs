//! Most geodes a robot factory can crack before time runs out.
//!
//! Rather than simulating minute by minute, each step jumps straight to the
//! moment the next robot is finished. The search is branch-and-bound: a
//! state is only expanded when, even if a geode robot were finished every
//! remaining minute, it could still beat the best count seen so far.

use anyhow::{anyhow, bail, Context, Result};
use smallvec::SmallVec;
use tracing::debug;

use super::Puzzle;
use crate::bounded::BoundedSearch;

const ORE: usize = 0;
const CLAY: usize = 1;
const OBSIDIAN: usize = 2;
const GEODE: usize = 3;
const RESOURCES: [&str; 4] = ["ore", "clay", "obsidian", "geode"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    pub id: u32,
    /// `costs[robot][resource]`
    pub costs: [[u32; 4]; 4],
    /// More robots of a kind than the largest cost in that resource never
    /// help, since only one robot can be built per minute.
    max_robots: [u32; 4],
}

impl Blueprint {
    pub fn new(id: u32, costs: [[u32; 4]; 4]) -> Self {
        let mut max_robots = [u32::MAX; 4];
        for resource in [ORE, CLAY, OBSIDIAN] {
            max_robots[resource] = costs.iter().map(|c| c[resource]).max().unwrap_or(0);
        }
        Self {
            id,
            costs,
            max_robots,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Factory {
    robots: [u32; 4],
    resources: [u32; 4],
    minutes: u32,
}

impl Factory {
    fn new(minutes: u32) -> Self {
        Self {
            robots: [1, 0, 0, 0],
            resources: [0; 4],
            minutes,
        }
    }

    /// Geodes at the end if no further robot is built.
    fn expected_geodes(&self) -> u32 {
        self.resources[GEODE] + self.robots[GEODE] * self.minutes
    }

    /// Geodes at the end if a geode robot were finished every remaining minute.
    fn geode_bound(&self) -> u32 {
        self.expected_geodes() + self.minutes * self.minutes.saturating_sub(1) / 2
    }

    /// Minutes until a robot of `kind` is finished, including the wait for
    /// resources. `None` if a robot that collects a missing resource is missing.
    fn minutes_to_build(&self, blueprint: &Blueprint, kind: usize) -> Option<u32> {
        let mut wait = 0;
        for resource in 0..4 {
            let cost = blueprint.costs[kind][resource];
            if cost <= self.resources[resource] {
                continue;
            }
            if self.robots[resource] == 0 {
                return None;
            }
            let missing = cost - self.resources[resource];
            wait = wait.max(missing.div_ceil(self.robots[resource]));
        }
        Some(wait + 1)
    }

    fn build(&self, blueprint: &Blueprint, kind: usize, minutes: u32) -> Factory {
        let mut next = *self;
        for resource in 0..4 {
            next.resources[resource] = self.resources[resource] + self.robots[resource] * minutes
                - blueprint.costs[kind][resource];
        }
        next.robots[kind] += 1;
        next.minutes -= minutes;
        next
    }

    /// One successor per robot kind worth building next. Geode robots come
    /// last so the depth-first search pops them first.
    fn successors(&self, blueprint: &Blueprint) -> SmallVec<[Factory; 4]> {
        (ORE..=GEODE)
            .filter(|&kind| self.robots[kind] < blueprint.max_robots[kind])
            .filter_map(|kind| {
                let minutes = self.minutes_to_build(blueprint, kind)?;
                (minutes < self.minutes).then(|| self.build(blueprint, kind, minutes))
            })
            .collect()
    }
}

pub fn max_geodes(blueprint: &Blueprint, minutes: u32) -> u32 {
    let result = BoundedSearch::new(Factory::new(minutes), 0u32, |factory: &Factory, best: &u32| {
        let mut next = factory.successors(blueprint);
        next.retain(|f| f.geode_bound() > *best);
        next
    })
    .on_visit(|factory: &Factory, best: &mut u32| *best = (*best).max(factory.expected_geodes()))
    .search();

    debug!(
        blueprint = blueprint.id,
        minutes,
        geodes = result.best,
        expanded = result.stats.expanded,
        "blueprint evaluated"
    );
    result.best
}

pub struct Minerals;

impl Puzzle for Minerals {
    type Input = Vec<Blueprint>;

    /// Blueprints may be wrapped over several lines.
    fn parse(text: &str) -> Result<Vec<Blueprint>> {
        text.split("Blueprint")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(parse_blueprint)
            .collect()
    }

    fn part1(blueprints: &Vec<Blueprint>) -> Result<u64> {
        Ok(blueprints
            .iter()
            .map(|bp| u64::from(bp.id) * u64::from(max_geodes(bp, 24)))
            .sum())
    }

    fn part2(blueprints: &Vec<Blueprint>) -> Result<u64> {
        Ok(blueprints
            .iter()
            .take(3)
            .map(|bp| u64::from(max_geodes(bp, 32)))
            .product())
    }
}

/// `1: Each ore robot costs 4 ore. ... Each geode robot costs 2 ore and 7 obsidian.`
fn parse_blueprint(chunk: &str) -> Result<Blueprint> {
    let (id, rules) = chunk
        .split_once(':')
        .ok_or_else(|| anyhow!("blueprint without `:`"))?;
    let id = id
        .trim()
        .parse::<u32>()
        .with_context(|| format!("bad blueprint id {id:?}"))?;

    let mut costs = [[0; 4]; 4];
    let mut seen = [false; 4];
    for rule in rules.split('.').map(str::trim).filter(|r| !r.is_empty()) {
        let rule = rule.split_whitespace().collect::<Vec<_>>().join(" ");
        let (robot, price) = rule
            .strip_prefix("Each ")
            .and_then(|r| r.split_once(" robot costs "))
            .ok_or_else(|| anyhow!("blueprint {id}: cannot read rule {rule:?}"))?;
        let kind = resource_index(robot).with_context(|| format!("blueprint {id}"))?;
        for item in price.split(" and ") {
            let (amount, resource) = item
                .split_once(' ')
                .ok_or_else(|| anyhow!("blueprint {id}: cannot read cost {item:?}"))?;
            let resource = resource_index(resource).with_context(|| format!("blueprint {id}"))?;
            costs[kind][resource] = amount
                .parse()
                .with_context(|| format!("blueprint {id}: bad amount {amount:?}"))?;
        }
        seen[kind] = true;
    }
    if let Some(missing) = seen.iter().position(|s| !s) {
        bail!("blueprint {id}: no rule for {} robots", RESOURCES[missing]);
    }

    Ok(Blueprint::new(id, costs))
}

fn resource_index(name: &str) -> Result<usize> {
    RESOURCES
        .iter()
        .position(|r| *r == name)
        .ok_or_else(|| anyhow!("unknown resource {name:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Blueprint 1: Each ore robot costs 4 ore. Each clay robot costs 2 ore. Each obsidian robot costs 3 ore and 14 clay. Each geode robot costs 2 ore and 7 obsidian.
Blueprint 2: Each ore robot costs 2 ore. Each clay robot costs 3 ore. Each obsidian robot costs 3 ore and 8 clay. Each geode robot costs 3 ore and 12 obsidian.
";

    #[test]
    fn test_parse_wrapped_blueprint() {
        let wrapped = "Blueprint 1:
  Each ore robot costs 4 ore.
  Each clay robot costs 2 ore.
  Each obsidian robot costs 3 ore and 14 clay.
  Each geode robot costs 2 ore and 7 obsidian.
";
        let blueprints = Minerals::parse(wrapped).unwrap();
        assert_eq!(blueprints, Minerals::parse(SAMPLE).unwrap()[..1].to_vec());
        assert_eq!(blueprints[0].costs[OBSIDIAN], [3, 14, 0, 0]);
        assert_eq!(blueprints[0].max_robots, [4, 14, 7, u32::MAX]);
    }

    #[test]
    fn test_minutes_to_build() {
        let blueprint = &Minerals::parse(SAMPLE).unwrap()[0];
        let factory = Factory::new(24);
        assert_eq!(factory.minutes_to_build(blueprint, CLAY), Some(3));
        assert_eq!(factory.minutes_to_build(blueprint, ORE), Some(5));
        assert_eq!(factory.minutes_to_build(blueprint, OBSIDIAN), None);

        let next = factory.build(blueprint, CLAY, 3);
        assert_eq!(next.robots, [1, 1, 0, 0]);
        assert_eq!(next.resources, [1, 0, 0, 0]);
        assert_eq!(next.minutes, 21);
    }

    #[test]
    fn test_sample_blueprints() {
        let blueprints = Minerals::parse(SAMPLE).unwrap();
        assert_eq!(max_geodes(&blueprints[0], 24), 9);
        assert_eq!(max_geodes(&blueprints[1], 24), 12);
    }

    #[test]
    fn test_sample_part1() {
        let blueprints = Minerals::parse(SAMPLE).unwrap();
        assert_eq!(Minerals::part1(&blueprints).unwrap(), 33);
    }

    #[test]
    fn test_sample_part2() {
        let blueprints = Minerals::parse(SAMPLE).unwrap();
        assert_eq!(Minerals::part2(&blueprints).unwrap(), 56 * 62);
    }

    #[test]
    fn test_geode_bound_is_admissible() {
        let blueprint = Minerals::parse(SAMPLE).unwrap().remove(0);
        let result = BoundedSearch::new(Factory::new(24), 0u32, |factory: &Factory, best: &u32| {
            let mut next = factory.successors(&blueprint);
            next.retain(|f| f.geode_bound() > *best);
            next
        })
        .on_visit(|factory: &Factory, best: &mut u32| *best = (*best).max(factory.expected_geodes()))
        .assert_admissible(Factory::geode_bound, Factory::expected_geodes)
        .search();
        assert_eq!(result.best, 9);
    }

    #[test]
    fn test_rejects_unknown_resource() {
        let err = parse_blueprint("3: Each ore robot costs 4 gold.").unwrap_err();
        assert!(format!("{err:#}").contains("gold"));
    }

    #[test]
    fn test_rejects_incomplete_blueprint() {
        let err = parse_blueprint("3: Each ore robot costs 4 ore.").unwrap_err();
        assert!(err.to_string().contains("clay"));
    }
}
