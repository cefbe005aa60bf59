//! Node-replacement grammar applied to room graphs before placement.
//!
//! A rule replaces one room of a given type with a small replacement graph.
//! The rule's head room inherits every edge the replaced room had, so the
//! rest of the level stays connected.

use std::collections::{HashSet, VecDeque};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RewriteConfig;
use crate::error::{GraphError, RewriteError};
use crate::room_graph::{clone_graph, RoomGraph, RoomId, RoomType};

/// Replace a room of type `lhs` with a copy of `rhs`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub name: String,
    pub lhs: RoomType,
    pub rhs: RoomGraph,
    /// Room in `rhs` that takes over the replaced room's edges
    pub head: RoomId,
}

impl RewriteRule {
    pub fn new(name: impl Into<String>, lhs: impl Into<RoomType>, rhs: RoomGraph, head: RoomId) -> Self {
        Self {
            name: name.into(),
            lhs: lhs.into(),
            rhs,
            head,
        }
    }

    /// Degree of the head inside the replacement graph
    fn head_degree(&self) -> usize {
        self.rhs.node(self.head).map(|n| n.degree()).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), RewriteError> {
        self.rhs.validate()?;
        if !self.rhs.contains(self.head) {
            return Err(RewriteError::MissingHead {
                rule: self.name.clone(),
                head: self.head,
            });
        }
        let entrances = self
            .rhs
            .nodes()
            .iter()
            .filter(|n| n.room_type.is_entrance())
            .count();
        if self.lhs.is_entrance() {
            if entrances != 1 {
                return Err(RewriteError::EntranceNotKept {
                    rule: self.name.clone(),
                    count: entrances,
                });
            }
        } else if entrances > 0 {
            return Err(RewriteError::StrayEntrance {
                rule: self.name.clone(),
                lhs: self.lhs.clone(),
            });
        }
        Ok(())
    }
}

/// An ordered list of rules
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: RewriteRule) {
        self.rules.push(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RewriteRule> {
        self.rules.iter()
    }

    pub fn validate(&self) -> Result<(), RewriteError> {
        self.rules.iter().try_for_each(RewriteRule::validate)
    }
}

impl From<Vec<RewriteRule>> for RuleSet {
    fn from(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }
}

/// Applies a rule set to room graphs
#[derive(Clone, Copy, Debug, Default)]
pub struct GraphRewriter {
    config: RewriteConfig,
}

impl GraphRewriter {
    pub fn new(config: RewriteConfig) -> Self {
        Self { config }
    }

    /// Rewrite a copy of `graph`. The input is never touched.
    pub fn rewrite(
        &self,
        graph: &RoomGraph,
        rules: &RuleSet,
        rng: &mut impl Rng,
    ) -> Result<RoomGraph, RewriteError> {
        puffin::profile_function!();

        let (mut out, _) = clone_graph(graph)?;
        out.entrance()?;
        rules.validate()?;

        let mut total = 0;
        for pass in 0..self.config.passes {
            let applied = self.run_pass(&mut out, rules, rng)?;
            debug!("rewrite pass {} applied {applied} rules", pass + 1);
            total += applied;
            if applied == 0 {
                break;
            }
        }
        if total > 0 {
            debug!("rewrote graph from {} to {} rooms", graph.len(), out.len());
        }
        out.entrance()?;
        Ok(out)
    }

    /// One breadth-first sweep from the entrance. Returns the number of splices.
    fn run_pass(
        &self,
        graph: &mut RoomGraph,
        rules: &RuleSet,
        rng: &mut impl Rng,
    ) -> Result<usize, RewriteError> {
        let entrance = graph.entrance()?;
        let mut visited = HashSet::from([entrance]);
        let mut queue = VecDeque::from([entrance]);
        let mut applied = 0;

        while let Some(id) = queue.pop_front() {
            let node = graph.node(id).ok_or(GraphError::UnknownNode(id))?;
            let mut next = id;

            if rng.gen_bool(self.config.probability.clamp(0.0, 1.0)) {
                let degree = node.degree();
                let matching: Vec<&RewriteRule> = rules
                    .iter()
                    .filter(|r| r.lhs == node.room_type)
                    .filter(|r| r.head_degree() + degree <= self.config.max_fan_out)
                    .collect();
                if let Some(rule) = matching.choose(rng) {
                    next = splice(graph, id, rule, &mut visited)?;
                    debug!("rule '{}' replaced room {id} (head now {next})", rule.name);
                    applied += 1;
                }
            }

            let node = graph.node(next).ok_or(GraphError::UnknownNode(next))?;
            for &n in node.neighbors() {
                if visited.insert(n) {
                    queue.push_back(n);
                }
            }
        }

        Ok(applied)
    }
}

/// Replace `target` with a fresh copy of the rule's replacement graph.
///
/// Every replacement room is marked visited so this pass never rewrites it
/// again. Returns the id of the new head.
fn splice(
    graph: &mut RoomGraph,
    target: RoomId,
    rule: &RewriteRule,
    visited: &mut HashSet<RoomId>,
) -> Result<RoomId, RewriteError> {
    let remap = graph.absorb(&rule.rhs)?;
    let head = *remap.get(&rule.head).ok_or_else(|| RewriteError::MissingHead {
        rule: rule.name.clone(),
        head: rule.head,
    })?;
    graph.transfer_edges(target, head)?;
    graph.remove_room(target);
    visited.extend(remap.values().copied());
    Ok(head)
}
