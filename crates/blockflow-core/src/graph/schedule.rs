//! Evaluation ordering: topological sort, cycle isolation and dirty sets.
//!
//! The flowchart flattens its connectors into a [`DependencyGraph`] (block
//! slot → downstream block slots) and asks it for a [`Plan`]: an evaluation
//! order in which every block comes after all of its upstream blocks, plus the
//! cycles that had to be left out to make such an order exist.
//!
//! ## Algorithm
//!
//! 1. Kahn's algorithm over the blocks in scope. If every block is sorted,
//!    that is the plan.
//! 2. Otherwise the leftover blocks are cycle members and blocks downstream
//!    of a cycle. Tarjan's algorithm splits the leftover into strongly
//!    connected components; every component with two or more members is a
//!    cycle.
//! 3. Cycle members are removed from scope and Kahn runs again. What remains
//!    is acyclic, so the second sort covers it. Blocks downstream of a cycle
//!    still run and read whatever the cycle's outputs last held.

use std::collections::VecDeque;

use super::error::{BlockEvaluationError, CycleDetected};
use super::slot::BlockId;

/// Outcome of one recompute.
///
/// Describes the final pass: when global writes force extra passes,
/// `evaluated` and `failures` are those of the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct RecomputeReport {
    /// Blocks in the order they were evaluated.
    pub evaluated: Vec<BlockId>,
    /// Blocks whose evaluation failed; their outputs are `Undefined`.
    pub failures: Vec<BlockEvaluationError>,
    /// Cycles that were skipped.
    pub cycles: Vec<CycleDetected>,
    /// Number of passes run (more than one when globals changed).
    pub passes: usize,
    /// `false` if globals were still changing when the pass limit was hit.
    pub globals_settled: bool,
}

impl Default for RecomputeReport {
    fn default() -> Self {
        Self {
            evaluated: Vec::new(),
            failures: Vec::new(),
            cycles: Vec::new(),
            passes: 0,
            globals_settled: true,
        }
    }
}

impl RecomputeReport {
    /// Returns `true` if nothing failed, no cycle was skipped and globals
    /// settled.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.cycles.is_empty() && self.globals_settled
    }

    /// Position of `id` in the evaluation order, if it was evaluated.
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.evaluated.iter().position(|&b| b == id)
    }

    /// Returns `true` if `id` was evaluated in the final pass.
    pub fn was_evaluated(&self, id: BlockId) -> bool {
        self.position(id).is_some()
    }

    /// The failure recorded for `id`, if any.
    pub fn failure(&self, id: BlockId) -> Option<&BlockEvaluationError> {
        self.failures.iter().find(|f| f.block == id)
    }
}

/// Evaluation order for one pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Plan {
    /// Slot indices in evaluation order.
    pub order: Vec<usize>,
    /// Slot indices of each skipped cycle, ascending within a cycle.
    pub cycles: Vec<Vec<usize>>,
}

/// Block-level dependency graph, indexed by slot.
///
/// `successors[i]` holds one entry per connector leaving block `i`, so a pair
/// of blocks joined by two connectors appears twice. Degree counting is
/// consistent with that, so the duplicates are harmless.
pub(crate) struct DependencyGraph {
    active: Vec<bool>,
    successors: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new(slots: usize) -> Self {
        Self {
            active: vec![false; slots],
            successors: vec![Vec::new(); slots],
        }
    }

    pub fn activate(&mut self, idx: usize) {
        self.active[idx] = true;
    }

    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.successors[from].push(to);
    }

    /// Plans a pass over every active block, or over `scope` when given.
    pub fn plan(&self, scope: Option<&[bool]>) -> Plan {
        let mut include: Vec<bool> = match scope {
            Some(scope) => self
                .active
                .iter()
                .zip(scope)
                .map(|(&a, &s)| a && s)
                .collect(),
            None => self.active.clone(),
        };

        let (order, leftover) = self.kahn(&include);
        if leftover.is_empty() {
            return Plan {
                order,
                cycles: Vec::new(),
            };
        }

        let cycles = self.strongly_connected(&leftover);
        for cycle in &cycles {
            for &idx in cycle {
                include[idx] = false;
            }
        }
        let (order, _) = self.kahn(&include);
        Plan { order, cycles }
    }

    /// Kahn's algorithm restricted to `include`. Returns the sorted blocks and
    /// the included blocks that could not be sorted.
    fn kahn(&self, include: &[bool]) -> (Vec<usize>, Vec<usize>) {
        let n = self.active.len();
        let mut in_degree = vec![0u32; n];
        for from in (0..n).filter(|&i| include[i]) {
            for &to in &self.successors[from] {
                if include[to] {
                    in_degree[to] += 1;
                }
            }
        }

        let mut queue: VecDeque<usize> = (0..n)
            .filter(|&i| include[i] && in_degree[i] == 0)
            .collect();
        let mut sorted = Vec::with_capacity(n);

        while let Some(idx) = queue.pop_front() {
            sorted.push(idx);
            for &to in &self.successors[idx] {
                if include[to] {
                    in_degree[to] -= 1;
                    if in_degree[to] == 0 {
                        queue.push_back(to);
                    }
                }
            }
        }

        let leftover = (0..n)
            .filter(|&i| include[i] && in_degree[i] > 0)
            .collect();
        (sorted, leftover)
    }

    /// Tarjan's algorithm over the subgraph induced by `nodes`. Returns the
    /// components with at least two members, each sorted ascending, ordered
    /// by their smallest member.
    fn strongly_connected(&self, nodes: &[usize]) -> Vec<Vec<usize>> {
        let n = self.active.len();
        let mut member = vec![false; n];
        for &idx in nodes {
            member[idx] = true;
        }

        let mut tarjan = Tarjan {
            graph: self,
            member: &member,
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        };
        for &idx in nodes {
            if tarjan.index[idx].is_none() {
                tarjan.visit(idx);
            }
        }

        let mut cycles: Vec<Vec<usize>> = tarjan
            .components
            .into_iter()
            .filter(|c| c.len() >= 2)
            .map(|mut c| {
                c.sort_unstable();
                c
            })
            .collect();
        cycles.sort_unstable_by_key(|c| c[0]);
        cycles
    }

    /// Every cycle among the active blocks.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let all: Vec<usize> = (0..self.active.len()).filter(|&i| self.active[i]).collect();
        self.strongly_connected(&all)
    }

    /// `start` plus every block reachable from it.
    pub fn forward_closure(&self, start: usize) -> Vec<bool> {
        let mut reached = vec![false; self.active.len()];
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if reached[idx] {
                continue;
            }
            reached[idx] = true;
            stack.extend(self.successors[idx].iter().copied().filter(|&to| !reached[to]));
        }
        reached
    }
}

struct Tarjan<'a> {
    graph: &'a DependencyGraph,
    member: &'a [bool],
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    /// Visits everything reachable from `root` within `member`.
    ///
    /// Iterative: each frame is a block and the index of its next successor,
    /// so a long chain behind a cycle cannot exhaust the call stack.
    fn visit(&mut self, root: usize) {
        let graph = self.graph;
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        self.open(root);

        while let Some(frame) = frames.last_mut() {
            let v = frame.0;
            if let Some(&w) = graph.successors[v].get(frame.1) {
                frame.1 += 1;
                if !self.member[w] {
                    continue;
                }
                match self.index[w] {
                    None => {
                        self.open(w);
                        frames.push((w, 0));
                    }
                    Some(w_index) if self.on_stack[w] => {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
            }
            if Some(self.lowlink[v]) == self.index[v] {
                self.close(v);
            }
        }
    }

    fn open(&mut self, v: usize) {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    /// Pops the component rooted at `v`.
    fn close(&mut self, v: usize) {
        let mut component = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            component.push(w);
            if w == v {
                break;
            }
        }
        self.components.push(component);
    }
}
