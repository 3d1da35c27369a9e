//! Flowchart: the mutation API, recompute driver and snapshot bridge.
//!
//! [`Flowchart`] owns every block and connector. Mutations validate first and
//! change nothing on error. In live mode each successful mutation is followed
//! by a recompute: a property edit or reset recomputes the edited block and
//! everything downstream of it, while any topology change (block or connector
//! added or removed) recomputes the whole chart.
//!
//! Values are pulled, not pushed: just before a block evaluates, each of its
//! connected inputs is overwritten with the current value of the connector's
//! source output. Inputs with no connector keep whatever they last held,
//! which is `Undefined` unless a connector used to feed them.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::block::{Block, BlockFactory, EvalContext, Globals};
use crate::port::{Port, PortDirection, PortRef};
use crate::value::Value;

use super::config::{CyclePolicy, EngineConfig};
use super::connector::{Connector, ConnectorId};
use super::error::{BlockEvaluationError, CycleDetected, GraphError, WiringViolation};
use super::schedule::{DependencyGraph, RecomputeReport};
use super::slot::{BlockId, BlockSlot};
use super::snapshot::{BlockSnapshot, ConnectorSnapshot, GraphSnapshot};

/// A graph of blocks joined by connectors, plus the global namespace.
///
/// Block and connector IDs are slot indices that are never reused, so an ID
/// held across a removal simply stops resolving.
pub struct Flowchart {
    blocks: Vec<Option<BlockSlot>>,
    connectors: Vec<Option<Connector>>,
    uids: HashMap<String, BlockId>,
    globals: Globals,
    config: EngineConfig,
    last_report: Option<RecomputeReport>,
}

impl Default for Flowchart {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Flowchart {
    /// Creates an empty flowchart.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            blocks: Vec::new(),
            connectors: Vec::new(),
            uids: HashMap::new(),
            globals: Globals::new(),
            config,
            last_report: None,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Replaces the configuration. Takes effect from the next mutation.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    // --- Blocks ---

    /// Adds a block, assigning a generated uid if its uid is empty.
    ///
    /// Returns [`GraphError::DuplicateUid`] if another block already uses the
    /// uid.
    pub fn add_block(&mut self, mut block: Box<dyn Block>) -> Result<BlockId, GraphError> {
        if block.uid().is_empty() {
            let uid = self.generate_uid(block.kind());
            block.set_uid(uid);
        }
        let uid = block.uid().to_string();
        if self.uids.contains_key(&uid) {
            return Err(GraphError::DuplicateUid(uid));
        }

        let id = BlockId(self.blocks.len() as u32);
        #[cfg(feature = "tracing")]
        tracing::debug!("flowchart_add: {} block '{uid}' as {id}", block.kind());
        self.blocks.push(Some(BlockSlot::new(block)));
        self.uids.insert(uid, id);

        self.refresh(Some(id))?;
        Ok(id)
    }

    /// Creates a block of `kind` through `factory` and adds it.
    ///
    /// With `uid` unset, a uid of the form `"<kind> #<hex millis>"` is
    /// generated.
    pub fn add_block_of_kind(
        &mut self,
        factory: &dyn BlockFactory,
        kind: &str,
        uid: Option<&str>,
    ) -> Result<BlockId, GraphError> {
        let uid = match uid {
            Some(uid) => uid.to_string(),
            None => self.generate_uid(kind),
        };
        if self.uids.contains_key(&uid) {
            return Err(GraphError::DuplicateUid(uid));
        }
        let block = factory
            .create(kind, &uid)
            .ok_or_else(|| GraphError::UnknownKind(kind.to_string()))?;
        self.add_block(block)
    }

    /// Removes a block together with every connector attached to it.
    ///
    /// Inputs that the removed connectors fed become `Undefined`.
    pub fn remove_block(&mut self, id: BlockId) -> Result<(), GraphError> {
        let slot = self.slot(id)?;
        let attached: Vec<ConnectorId> =
            slot.incoming.iter().chain(&slot.outgoing).copied().collect();
        for cid in attached {
            self.disconnect_internal(cid);
        }
        if let Some(slot) = self.blocks[id.slot()].take() {
            self.uids.remove(slot.block.uid());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("flowchart_remove: block {id}");
        self.refresh(None)
    }

    /// Adds an independent copy of a block under a generated uid.
    ///
    /// The copy has the original's configuration, fresh state and no
    /// connectors.
    pub fn duplicate_block(&mut self, id: BlockId) -> Result<BlockId, GraphError> {
        let slot = self.slot(id)?;
        let uid = self.generate_uid(slot.block.kind());
        let copy = slot.block.copy_with_uid(uid);
        self.add_block(copy)
    }

    /// Sets one configuration field of a block.
    ///
    /// If the block drops ports as a result, connectors on those ports are
    /// removed. A refused value leaves the block unchanged.
    pub fn set_block_property(
        &mut self,
        id: BlockId,
        key: &str,
        value: Value,
    ) -> Result<(), GraphError> {
        let slot = self.slot_mut(id)?;
        let before = slot.block.ports().uids();
        slot.block
            .set_property(key, value)
            .map_err(|source| GraphError::Property {
                uid: slot.block.uid().to_string(),
                source,
            })?;
        let after = slot.block.ports().uids();

        let mut removed = 0;
        for port in before.into_iter().filter(|uid| !after.contains(uid)) {
            removed += self.disconnect_port(&PortRef::new(id, port))?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("flowchart_property: {id} {key} ({removed} connectors dropped)");
        self.refresh(if removed > 0 { None } else { Some(id) })
    }

    /// Clears a block's private state without touching wiring.
    pub fn reset_block(&mut self, id: BlockId) -> Result<(), GraphError> {
        self.slot_mut(id)?.block.reset();
        self.refresh(Some(id))
    }

    /// Clears private state of every block.
    pub fn reset_all(&mut self) -> Result<(), GraphError> {
        for slot in self.blocks.iter_mut().flatten() {
            slot.block.reset();
        }
        self.refresh(None)
    }

    // --- Connectors ---

    /// Connects an output port to an input port.
    ///
    /// Refused with [`GraphError::InvalidWiring`] when the direction is
    /// wrong, both ports belong to the same block, the input is already
    /// connected, or (under [`CyclePolicy::Reject`]) the connector would close
    /// a dependency cycle.
    pub fn add_connector(
        &mut self,
        source: PortRef,
        target: PortRef,
    ) -> Result<ConnectorId, GraphError> {
        let id = self.connect_internal(source, target, self.config.cycle_policy)?;
        self.refresh(None)?;
        Ok(id)
    }

    /// Removes a connector. Its target input becomes `Undefined`.
    pub fn remove_connector(&mut self, id: ConnectorId) -> Result<(), GraphError> {
        self.disconnect_internal(id)
            .ok_or(GraphError::ConnectorNotFound(id))?;

        #[cfg(feature = "tracing")]
        tracing::debug!("flowchart_disconnect: {id}");
        self.refresh(None)
    }

    /// Removes every connector attached to a port, returning how many there
    /// were.
    ///
    /// The port itself need not exist any more; connectors still naming it
    /// are removed all the same.
    pub fn remove_connectors_to_port(&mut self, port: &PortRef) -> Result<usize, GraphError> {
        let removed = self.disconnect_port(port)?;
        if removed > 0 {
            self.refresh(None)?;
        }
        Ok(removed)
    }

    // --- Globals ---

    /// Sets a global variable and recomputes the whole chart.
    ///
    /// This recomputes even outside live mode: any block may read any global,
    /// so no narrower dirty set exists.
    pub fn update_global_variable(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<RecomputeReport, GraphError> {
        self.globals.insert(name.into(), value);
        self.recompute(None)
    }

    /// Removes a global variable, returning its last value.
    pub fn remove_global_variable(&mut self, name: &str) -> Result<Option<Value>, GraphError> {
        let removed = self.globals.remove(name);
        if removed.is_some() {
            self.refresh(None)?;
        }
        Ok(removed)
    }

    // --- Recompute ---

    /// Evaluates every block in dependency order.
    ///
    /// Block failures and skipped cycles are reported, not returned as
    /// errors. `Err` means the graph's own bookkeeping is inconsistent.
    pub fn update_results(&mut self) -> Result<RecomputeReport, GraphError> {
        self.recompute(None)
    }

    /// Evaluates `id` and every block downstream of it, in dependency order.
    ///
    /// Blocks upstream of or unrelated to `id` are not evaluated. If a
    /// global changes along the way, the follow-up passes cover the whole
    /// chart.
    pub fn update_results_for_block(&mut self, id: BlockId) -> Result<RecomputeReport, GraphError> {
        self.slot(id)?;
        self.recompute(Some(id))
    }

    /// The report of the most recent recompute, if any ran.
    pub fn last_report(&self) -> Option<&RecomputeReport> {
        self.last_report.as_ref()
    }

    // --- Queries ---

    /// Looks up a block.
    pub fn block(&self, id: BlockId) -> Option<&dyn Block> {
        self.blocks
            .get(id.slot())?
            .as_ref()
            .map(|slot| slot.block.as_ref())
    }

    /// Resolves a uid to a block ID.
    pub fn block_id(&self, uid: &str) -> Option<BlockId> {
        self.uids.get(uid).copied()
    }

    /// Looks up a block by uid.
    pub fn block_by_uid(&self, uid: &str) -> Option<&dyn Block> {
        self.block(self.block_id(uid)?)
    }

    /// IDs of all blocks, in insertion order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(idx, _)| BlockId(idx as u32))
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.iter().flatten().count()
    }

    /// Looks up a connector.
    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(id.0 as usize)?.as_ref()
    }

    /// All connectors, in insertion order.
    pub fn connectors(&self) -> impl Iterator<Item = (ConnectorId, &Connector)> + '_ {
        self.connectors
            .iter()
            .enumerate()
            .filter_map(|(idx, c)| c.as_ref().map(|c| (ConnectorId(idx as u32), c)))
    }

    /// Number of connectors.
    pub fn connector_count(&self) -> usize {
        self.connectors.iter().flatten().count()
    }

    /// Connectors attached to a port, on either end.
    pub fn connectors_to_port(&self, port: &PortRef) -> Vec<ConnectorId> {
        let Some(slot) = self.slot(port.block).ok() else {
            return Vec::new();
        };
        slot.incoming
            .iter()
            .chain(&slot.outgoing)
            .copied()
            .filter(|&cid| self.connector(cid).is_some_and(|c| c.touches(port)))
            .collect()
    }

    /// Returns `true` if at least one connector is attached to the port.
    pub fn is_connected(&self, port: &PortRef) -> bool {
        !self.connectors_to_port(port).is_empty()
    }

    /// Current value on a port.
    pub fn port_value(&self, port: &PortRef) -> Option<&Value> {
        self.port(port).map(|p| &p.value)
    }

    /// Current value on a port, addressed by block uid.
    pub fn value(&self, block_uid: &str, port: &str) -> Option<&Value> {
        let id = self.block_id(block_uid)?;
        self.port_value(&PortRef::new(id, port))
    }

    /// The global namespace.
    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    /// Current value of a global.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Every dependency cycle currently in the chart.
    pub fn find_cycles(&self) -> Vec<CycleDetected> {
        self.describe_cycles(&self.dependency_graph().cycles())
    }

    /// Checks that every connector resolves to an output port and an input
    /// port, and that block adjacency lists agree with the connector set.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (cid, connector) in self.connectors() {
            let source_ok = self
                .port(&connector.source)
                .is_some_and(|p| p.direction() == PortDirection::Output);
            if !source_ok {
                return Err(self.dangling(cid, &connector.source));
            }
            let target_ok = self
                .port(&connector.target)
                .is_some_and(|p| p.direction() == PortDirection::Input);
            if !target_ok {
                return Err(self.dangling(cid, &connector.target));
            }

            let listed = self
                .slot(connector.source.block)
                .is_ok_and(|s| s.outgoing.contains(&cid))
                && self
                    .slot(connector.target.block)
                    .is_ok_and(|s| s.incoming.contains(&cid));
            if !listed {
                return Err(self.dangling(cid, &connector.target));
            }
        }
        Ok(())
    }

    // --- Snapshots ---

    /// Captures blocks, connectors and globals.
    pub fn snapshot(&self) -> GraphSnapshot {
        let blocks = self
            .blocks
            .iter()
            .flatten()
            .map(|slot| BlockSnapshot {
                uid: slot.block.uid().to_string(),
                kind: slot.block.kind().to_string(),
                properties: slot.block.properties(),
            })
            .collect();

        let connectors = self
            .connectors
            .iter()
            .flatten()
            .filter_map(|c| {
                Some(ConnectorSnapshot::new(
                    self.uid_of(c.source.block)?,
                    &c.source.port,
                    self.uid_of(c.target.block)?,
                    &c.target.port,
                ))
            })
            .collect();

        GraphSnapshot {
            blocks,
            connectors,
            globals: self.globals.clone(),
        }
    }

    /// Rebuilds a flowchart from a snapshot.
    ///
    /// Connectors are restored without the cycle check so that any saved
    /// chart loads; cycles are reported on recompute. In live mode the
    /// restored chart is recomputed once before it is returned.
    pub fn restore(
        snapshot: &GraphSnapshot,
        factory: &dyn BlockFactory,
        config: EngineConfig,
    ) -> Result<Self, GraphError> {
        let mut chart = Self::new(EngineConfig {
            live: false,
            ..config
        });

        for entry in &snapshot.blocks {
            let id = chart.add_block_of_kind(factory, &entry.kind, Some(entry.uid.as_str()))?;
            for (key, value) in &entry.properties {
                chart.set_block_property(id, key, value.clone())?;
            }
        }

        for c in &snapshot.connectors {
            let from = chart
                .block_id(&c.from)
                .ok_or_else(|| GraphError::UnknownUid(c.from.clone()))?;
            let to = chart
                .block_id(&c.to)
                .ok_or_else(|| GraphError::UnknownUid(c.to.clone()))?;
            chart.connect_internal(
                PortRef::new(from, &c.from_port),
                PortRef::new(to, &c.to_port),
                CyclePolicy::Allow,
            )?;
        }

        chart.globals = snapshot.globals.clone();
        chart.config = config;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "flowchart_restore: {} blocks, {} connectors",
            chart.block_count(),
            chart.connector_count()
        );
        chart.refresh(None)?;
        Ok(chart)
    }

    // --- Internals ---

    fn slot(&self, id: BlockId) -> Result<&BlockSlot, GraphError> {
        self.blocks
            .get(id.slot())
            .and_then(Option::as_ref)
            .ok_or(GraphError::BlockNotFound(id))
    }

    fn slot_mut(&mut self, id: BlockId) -> Result<&mut BlockSlot, GraphError> {
        self.blocks
            .get_mut(id.slot())
            .and_then(Option::as_mut)
            .ok_or(GraphError::BlockNotFound(id))
    }

    fn port(&self, port: &PortRef) -> Option<&Port> {
        self.block(port.block)?.ports().get(&port.port)
    }

    fn uid_of(&self, id: BlockId) -> Option<&str> {
        self.block(id).map(|b| b.uid())
    }

    fn dangling(&self, connector: ConnectorId, endpoint: &PortRef) -> GraphError {
        let block = self
            .uid_of(endpoint.block)
            .map_or_else(|| endpoint.block.to_string(), str::to_string);
        GraphError::DanglingReference {
            connector,
            endpoint: format!("{block}.{}", endpoint.port),
        }
    }

    /// `"<kind> #<hex millis>"`, suffixed with a counter on collision.
    fn generate_uid(&self, kind: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let base = format!("{kind} #{millis:x}");
        if !self.uids.contains_key(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let uid = format!("{base}-{n}");
            if !self.uids.contains_key(&uid) {
                return uid;
            }
            n += 1;
        }
    }

    /// Recomputes after a mutation when live mode is on. `origin` narrows the
    /// recompute to that block's downstream closure; `None` means topology
    /// changed.
    fn refresh(&mut self, origin: Option<BlockId>) -> Result<(), GraphError> {
        if self.config.live {
            self.recompute(origin)?;
        }
        Ok(())
    }

    fn connect_internal(
        &mut self,
        source: PortRef,
        target: PortRef,
        policy: CyclePolicy,
    ) -> Result<ConnectorId, GraphError> {
        let source_uid = self.slot(source.block)?.block.uid().to_string();
        let target_uid = self.slot(target.block)?.block.uid().to_string();

        let port_missing = |block: &str, port: &str| GraphError::PortNotFound {
            block: block.to_string(),
            port: port.to_string(),
        };
        let source_dir = self
            .port(&source)
            .ok_or_else(|| port_missing(&source_uid, &source.port))?
            .direction();
        let target_dir = self
            .port(&target)
            .ok_or_else(|| port_missing(&target_uid, &target.port))?
            .direction();

        let refuse = |violation| GraphError::InvalidWiring {
            source_port: format!("{source_uid}.{}", source.port),
            target_port: format!("{target_uid}.{}", target.port),
            violation,
        };
        if source_dir != PortDirection::Output || target_dir != PortDirection::Input {
            return Err(refuse(WiringViolation::Direction));
        }
        if source.block == target.block {
            return Err(refuse(WiringViolation::SameBlock));
        }
        if self.is_connected(&target) {
            return Err(refuse(WiringViolation::FanIn));
        }
        if policy == CyclePolicy::Reject && self.can_reach(target.block, source.block) {
            return Err(refuse(WiringViolation::Cycle));
        }

        let id = ConnectorId(self.connectors.len() as u32);
        self.slot_mut(source.block)?.outgoing.push(id);
        self.slot_mut(target.block)?.incoming.push(id);

        #[cfg(feature = "tracing")]
        tracing::debug!("flowchart_connect: {source_uid}.{} → {target_uid}.{}", source.port, target.port);
        self.connectors.push(Some(Connector { source, target }));
        Ok(id)
    }

    /// Removes a connector and unlinks it from both blocks. The target input
    /// is reset to `Undefined`.
    fn disconnect_internal(&mut self, id: ConnectorId) -> Option<Connector> {
        let connector = self.connectors.get_mut(id.0 as usize)?.take()?;

        if let Some(Some(source)) = self.blocks.get_mut(connector.source.block.slot()) {
            source.outgoing.retain(|&c| c != id);
        }
        if let Some(Some(target)) = self.blocks.get_mut(connector.target.block.slot()) {
            target.incoming.retain(|&c| c != id);
            if let Some(port) = target.block.ports_mut().get_mut(&connector.target.port) {
                port.value = Value::Undefined;
            }
        }
        Some(connector)
    }

    fn disconnect_port(&mut self, port: &PortRef) -> Result<usize, GraphError> {
        self.slot(port.block)?;
        let attached = self.connectors_to_port(port);
        for &cid in &attached {
            self.disconnect_internal(cid);
        }
        Ok(attached.len())
    }

    /// Returns `true` if `to` is reachable from `from` along connectors.
    fn can_reach(&self, from: BlockId, to: BlockId) -> bool {
        let mut visited = vec![false; self.blocks.len()];
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            let idx = current.slot();
            if idx >= visited.len() || visited[idx] {
                continue;
            }
            visited[idx] = true;

            if let Some(Some(slot)) = self.blocks.get(idx) {
                for cid in &slot.outgoing {
                    if let Some(connector) = self.connector(*cid) {
                        stack.push(connector.target.block);
                    }
                }
            }
        }
        false
    }

    fn dependency_graph(&self) -> DependencyGraph {
        let mut graph = DependencyGraph::new(self.blocks.len());
        for (idx, slot) in self.blocks.iter().enumerate() {
            if slot.is_some() {
                graph.activate(idx);
            }
        }
        for connector in self.connectors.iter().flatten() {
            graph.add_edge(connector.source.block.slot(), connector.target.block.slot());
        }
        graph
    }

    fn describe_cycles(&self, cycles: &[Vec<usize>]) -> Vec<CycleDetected> {
        cycles
            .iter()
            .map(|members| {
                let blocks: Vec<BlockId> = members.iter().map(|&i| BlockId(i as u32)).collect();
                let uids = blocks
                    .iter()
                    .map(|&id| self.uid_of(id).unwrap_or_default().to_string())
                    .collect();
                CycleDetected { blocks, uids }
            })
            .collect()
    }

    fn recompute(&mut self, origin: Option<BlockId>) -> Result<RecomputeReport, GraphError> {
        let graph = self.dependency_graph();
        let scope = origin.map(|id| graph.forward_closure(id.slot()));
        let mut plan = graph.plan(scope.as_deref());

        let mut report = RecomputeReport {
            cycles: self.describe_cycles(&plan.cycles),
            ..RecomputeReport::default()
        };
        #[cfg(feature = "tracing")]
        for cycle in &report.cycles {
            tracing::warn!("flowchart_recompute: skipping {cycle}");
        }

        loop {
            report.passes += 1;
            report.evaluated.clear();
            report.failures.clear();

            let writes = self.run_pass(&plan.order, &mut report)?;
            if !self.apply_global_writes(writes) {
                break;
            }
            if report.passes >= self.config.max_global_passes.max(1) {
                report.globals_settled = false;
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "flowchart_recompute: globals still changing after {} passes",
                    report.passes
                );
                break;
            }
            plan = graph.plan(None);
            report.cycles = self.describe_cycles(&plan.cycles);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "flowchart_recompute: {} evaluated, {} failed, {} passes",
            report.evaluated.len(),
            report.failures.len(),
            report.passes
        );
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Evaluates `order` once. Returns the global writes of every block that
    /// succeeded, in evaluation order.
    fn run_pass(
        &mut self,
        order: &[usize],
        report: &mut RecomputeReport,
    ) -> Result<Vec<(String, Value)>, GraphError> {
        let mut writes = Vec::new();

        for &idx in order {
            let inputs = self.pull_inputs(idx)?;
            let Some(slot) = self.blocks.get_mut(idx).and_then(Option::as_mut) else {
                continue;
            };
            let ports = slot.block.ports_mut();
            for (port, value) in inputs {
                if let Some(p) = ports.get_mut(&port) {
                    p.value = value;
                }
            }

            let id = BlockId(idx as u32);
            let mut ctx = EvalContext::new(&self.globals);
            match slot.block.update_model(&mut ctx) {
                Ok(()) => writes.extend(ctx.into_writes()),
                Err(source) => {
                    slot.block.ports_mut().clear_outputs();
                    #[cfg(feature = "tracing")]
                    tracing::warn!("flowchart_recompute: block '{}' failed: {source}", slot.block.uid());
                    report.failures.push(BlockEvaluationError {
                        block: id,
                        uid: slot.block.uid().to_string(),
                        source,
                    });
                }
            }
            report.evaluated.push(id);
        }

        Ok(writes)
    }

    /// Current source values for every connected input of block `idx`.
    fn pull_inputs(&self, idx: usize) -> Result<Vec<(String, Value)>, GraphError> {
        let Some(slot) = self.blocks.get(idx).and_then(Option::as_ref) else {
            return Ok(Vec::new());
        };
        slot.incoming
            .iter()
            .map(|&cid| {
                let connector = self
                    .connector(cid)
                    .ok_or(GraphError::ConnectorNotFound(cid))?;
                let value = self
                    .port_value(&connector.source)
                    .ok_or_else(|| self.dangling(cid, &connector.source))?;
                Ok((connector.target.port.clone(), value.clone()))
            })
            .collect()
    }

    /// Applies queued global writes, last write wins. Returns `true` if any
    /// written global ends the pass different from how it started.
    fn apply_global_writes(&mut self, writes: Vec<(String, Value)>) -> bool {
        let mut before: HashMap<String, Option<Value>> = HashMap::new();
        for (name, value) in writes {
            if !before.contains_key(&name) {
                before.insert(name.clone(), self.globals.get(&name).cloned());
            }
            self.globals.insert(name, value);
        }

        let mut changed = false;
        for (name, old) in before {
            let Some(new) = self.globals.get(&name) else {
                continue;
            };
            if old.as_ref().is_some_and(|old| old.is_identical(new)) {
                continue;
            }
            #[cfg(feature = "tracing")]
            tracing::debug!("flowchart_global: {name} = {new}");
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockError, Properties, count_property, scalar_property};
    use crate::port::Ports;

    /// Minimal block family for exercising the engine.
    #[derive(Clone, Copy, PartialEq)]
    enum Op {
        Const(f64),
        Sum,
        WriteGlobal(&'static str),
        ReadGlobal(&'static str),
        Counter,
    }

    struct TestBlock {
        uid: String,
        op: Op,
        ports: Ports,
        count: f64,
    }

    impl TestBlock {
        fn new(uid: &str, op: Op) -> Box<Self> {
            let ports = match op {
                Op::Const(_) | Op::ReadGlobal(_) | Op::Counter => Ports::with(&[], &["Out"]),
                Op::Sum => Ports::with(&["In1", "In2"], &["Out"]),
                Op::WriteGlobal(_) => Ports::with(&["In"], &[]),
            };
            Box::new(Self {
                uid: uid.to_string(),
                op,
                ports,
                count: 0.0,
            })
        }
    }

    impl Block for TestBlock {
        fn uid(&self) -> &str {
            &self.uid
        }
        fn set_uid(&mut self, uid: String) {
            self.uid = uid;
        }
        fn kind(&self) -> &'static str {
            match self.op {
                Op::Const(_) => "const",
                Op::Sum => "sum",
                Op::WriteGlobal(_) => "write",
                Op::ReadGlobal(_) => "read",
                Op::Counter => "counter",
            }
        }
        fn ports(&self) -> &Ports {
            &self.ports
        }
        fn ports_mut(&mut self) -> &mut Ports {
            &mut self.ports
        }

        fn update_model(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
            match self.op {
                Op::Const(x) => self.ports.set_output("Out", Value::Scalar(x)),
                Op::Sum => {
                    let mut total = 0.0;
                    for port in self.ports.inputs() {
                        match &port.value {
                            Value::Undefined => {}
                            Value::Scalar(x) => total += x,
                            other => return Err(BlockError::wrong_type(port.uid(), "scalar", other)),
                        }
                    }
                    self.ports.set_output("Out", Value::Scalar(total));
                }
                Op::WriteGlobal(name) => {
                    let value = self.ports.input("In").clone();
                    if value.is_defined() {
                        ctx.write_global(name, value);
                    }
                }
                Op::ReadGlobal(name) => {
                    let value = ctx.global(name).cloned().unwrap_or_default();
                    self.ports.set_output("Out", value);
                }
                Op::Counter => {
                    self.count += 1.0;
                    self.ports.set_output("Out", Value::Scalar(self.count));
                }
            }
            Ok(())
        }

        fn reset(&mut self) {
            self.count = 0.0;
        }

        fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
            let mut copy = TestBlock::new(&uid, self.op);
            copy.ports = self.ports.clone();
            copy.ports.clear_all();
            copy
        }

        fn properties(&self) -> Properties {
            let mut props = Properties::new();
            match self.op {
                Op::Const(x) => {
                    props.insert("value".into(), Value::Scalar(x));
                }
                Op::Sum => {
                    props.insert("inputs".into(), Value::Scalar(self.ports.inputs().count() as f64));
                }
                _ => {}
            }
            props
        }

        fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
            match (self.op, key) {
                (Op::Const(_), "value") => self.op = Op::Const(scalar_property(key, &value)?),
                (Op::Sum, "inputs") => self.ports.resize_inputs("In", count_property(key, &value)?),
                _ => return Err(BlockError::UnknownProperty(key.to_string())),
            }
            Ok(())
        }
    }

    struct TestFactory;

    impl BlockFactory for TestFactory {
        fn create(&self, kind: &str, uid: &str) -> Option<Box<dyn Block>> {
            let op = match kind {
                "const" => Op::Const(0.0),
                "sum" => Op::Sum,
                "counter" => Op::Counter,
                _ => return None,
            };
            Some(TestBlock::new(uid, op) as Box<dyn Block>)
        }
    }

    fn out(id: BlockId) -> PortRef {
        PortRef::new(id, "Out")
    }

    fn input(id: BlockId, n: usize) -> PortRef {
        PortRef::new(id, format!("In{n}"))
    }

    fn scalar(chart: &Flowchart, uid: &str) -> Option<f64> {
        chart.value(uid, "Out")?.as_scalar()
    }

    #[test]
    fn add_and_remove_blocks() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(1.0))).unwrap();
        assert_eq!(chart.block_count(), 1);
        assert_eq!(chart.block_id("a"), Some(a));
        assert_eq!(chart.block(a).unwrap().kind(), "const");

        chart.remove_block(a).unwrap();
        assert_eq!(chart.block_count(), 0);
        assert!(chart.block_id("a").is_none());
        assert_eq!(chart.remove_block(a), Err(GraphError::BlockNotFound(a)));
    }

    #[test]
    fn duplicate_uid_rejected() {
        let mut chart = Flowchart::default();
        chart.add_block(TestBlock::new("a", Op::Const(1.0))).unwrap();
        let err = chart.add_block(TestBlock::new("a", Op::Counter)).unwrap_err();
        assert_eq!(err, GraphError::DuplicateUid("a".into()));
        assert_eq!(chart.block_count(), 1);
    }

    #[test]
    fn generated_uids_are_unique() {
        let mut chart = Flowchart::default();
        let a = chart.add_block_of_kind(&TestFactory, "counter", None).unwrap();
        let b = chart.add_block_of_kind(&TestFactory, "counter", None).unwrap();
        let ua = chart.block(a).unwrap().uid().to_string();
        let ub = chart.block(b).unwrap().uid().to_string();
        assert!(ua.starts_with("counter #"));
        assert_ne!(ua, ub);
    }

    #[test]
    fn unknown_kind_rejected() {
        let mut chart = Flowchart::default();
        let err = chart.add_block_of_kind(&TestFactory, "nope", Some("x")).unwrap_err();
        assert_eq!(err, GraphError::UnknownKind("nope".into()));
    }

    #[test]
    fn wiring_rules() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(1.0))).unwrap();
        let b = chart.add_block(TestBlock::new("b", Op::Sum)).unwrap();
        let c = chart.add_block(TestBlock::new("c", Op::Const(2.0))).unwrap();

        let violation = |err: GraphError| match err {
            GraphError::InvalidWiring { violation, .. } => violation,
            other => panic!("expected wiring error, got {other}"),
        };

        // input → output
        let err = chart.add_connector(input(b, 1), out(a)).unwrap_err();
        assert_eq!(violation(err), WiringViolation::Direction);

        // same block
        let err = chart.add_connector(out(b), input(b, 1)).unwrap_err();
        assert_eq!(violation(err), WiringViolation::SameBlock);

        // fan-in
        chart.add_connector(out(a), input(b, 1)).unwrap();
        let err = chart.add_connector(out(c), input(b, 1)).unwrap_err();
        assert_eq!(violation(err), WiringViolation::FanIn);

        // fan-out is fine
        chart.add_connector(out(a), input(b, 2)).unwrap();
        assert_eq!(chart.connector_count(), 2);

        // missing port
        let err = chart.add_connector(out(a), input(b, 9)).unwrap_err();
        assert!(matches!(err, GraphError::PortNotFound { .. }));
    }

    #[test]
    fn cycle_rejected_by_default_and_allowed_by_policy() {
        let mut chart = Flowchart::default();
        let p = chart.add_block(TestBlock::new("p", Op::Sum)).unwrap();
        let q = chart.add_block(TestBlock::new("q", Op::Sum)).unwrap();
        chart.add_connector(out(p), input(q, 1)).unwrap();

        let err = chart.add_connector(out(q), input(p, 1)).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidWiring {
                violation: WiringViolation::Cycle,
                ..
            }
        ));
        assert_eq!(chart.connector_count(), 1);

        chart.set_config(EngineConfig {
            cycle_policy: CyclePolicy::Allow,
            ..EngineConfig::default()
        });
        chart.add_connector(out(q), input(p, 1)).unwrap();
        let cycles = chart.find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].uids, vec!["p", "q"]);
    }

    #[test]
    fn removing_connector_resets_target_input() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(3.0))).unwrap();
        let b = chart.add_block(TestBlock::new("b", Op::Sum)).unwrap();
        let cid = chart.add_connector(out(a), input(b, 1)).unwrap();
        chart.update_results().unwrap();
        assert_eq!(chart.port_value(&input(b, 1)), Some(&Value::Scalar(3.0)));

        chart.remove_connector(cid).unwrap();
        assert_eq!(chart.port_value(&input(b, 1)), Some(&Value::Undefined));
        assert_eq!(
            chart.remove_connector(cid),
            Err(GraphError::ConnectorNotFound(cid))
        );
    }

    #[test]
    fn removing_block_cascades_connectors() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(1.0))).unwrap();
        let b = chart.add_block(TestBlock::new("b", Op::Sum)).unwrap();
        let c = chart.add_block(TestBlock::new("c", Op::Sum)).unwrap();
        chart.add_connector(out(a), input(b, 1)).unwrap();
        chart.add_connector(out(b), input(c, 1)).unwrap();
        chart.update_results().unwrap();

        chart.remove_block(b).unwrap();
        assert_eq!(chart.connector_count(), 0);
        assert!(!chart.is_connected(&out(a)));
        assert_eq!(chart.port_value(&input(c, 1)), Some(&Value::Undefined));
        chart.validate().unwrap();
    }

    #[test]
    fn shrinking_ports_drops_their_connectors() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(1.0))).unwrap();
        let s = chart.add_block(TestBlock::new("s", Op::Sum)).unwrap();
        chart.add_connector(out(a), input(s, 1)).unwrap();
        chart.add_connector(out(a), input(s, 2)).unwrap();

        chart.set_block_property(s, "inputs", Value::Scalar(1.0)).unwrap();
        assert_eq!(chart.connector_count(), 1);
        assert!(chart.is_connected(&input(s, 1)));
        chart.validate().unwrap();

        let err = chart.set_block_property(s, "inputs", Value::Scalar(-1.0)).unwrap_err();
        assert!(matches!(err, GraphError::Property { .. }));
        assert_eq!(chart.connector_count(), 1);
    }

    #[test]
    fn remove_connectors_to_port_counts() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(1.0))).unwrap();
        let b = chart.add_block(TestBlock::new("b", Op::Sum)).unwrap();
        chart.add_connector(out(a), input(b, 1)).unwrap();
        chart.add_connector(out(a), input(b, 2)).unwrap();
        assert_eq!(chart.connectors_to_port(&out(a)).len(), 2);
        assert_eq!(chart.remove_connectors_to_port(&out(a)).unwrap(), 2);
        assert_eq!(chart.remove_connectors_to_port(&out(a)).unwrap(), 0);
    }

    #[test]
    fn pull_semantics_propagate_in_order() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(2.0))).unwrap();
        let b = chart.add_block(TestBlock::new("b", Op::Const(5.0))).unwrap();
        let s = chart.add_block(TestBlock::new("s", Op::Sum)).unwrap();
        let t = chart.add_block(TestBlock::new("t", Op::Sum)).unwrap();
        // Wire t first so insertion order disagrees with dependency order.
        chart.add_connector(out(s), input(t, 1)).unwrap();
        chart.add_connector(out(a), input(s, 1)).unwrap();
        chart.add_connector(out(b), input(s, 2)).unwrap();

        let report = chart.update_results().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.evaluated.len(), 4);
        assert!(report.position(s) < report.position(t));
        assert_eq!(scalar(&chart, "t"), Some(7.0));
    }

    #[test]
    fn incremental_recompute_skips_unrelated_blocks() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(1.0))).unwrap();
        let s = chart.add_block(TestBlock::new("s", Op::Sum)).unwrap();
        let other = chart.add_block(TestBlock::new("other", Op::Counter)).unwrap();
        chart.add_connector(out(a), input(s, 1)).unwrap();
        chart.update_results().unwrap();
        assert_eq!(scalar(&chart, "other"), Some(1.0));

        chart.set_block_property(a, "value", Value::Scalar(4.0)).unwrap();
        let report = chart.update_results_for_block(a).unwrap();
        assert_eq!(report.evaluated, vec![a, s]);
        assert!(!report.was_evaluated(other));
        assert_eq!(scalar(&chart, "s"), Some(4.0));
        assert_eq!(scalar(&chart, "other"), Some(1.0));
    }

    #[test]
    fn live_mode_recomputes_on_mutation() {
        let mut chart = Flowchart::new(EngineConfig::live());
        let a = chart.add_block(TestBlock::new("a", Op::Const(1.0))).unwrap();
        let s = chart.add_block(TestBlock::new("s", Op::Sum)).unwrap();
        chart.add_connector(out(a), input(s, 1)).unwrap();
        assert_eq!(scalar(&chart, "s"), Some(1.0));

        chart.set_block_property(a, "value", Value::Scalar(9.0)).unwrap();
        assert_eq!(scalar(&chart, "s"), Some(9.0));
        assert_eq!(chart.last_report().unwrap().evaluated, vec![a, s]);
    }

    #[test]
    fn global_write_triggers_second_pass() {
        let mut chart = Flowchart::default();
        // The reader is inserted first, so the first pass sees no global.
        chart.add_block(TestBlock::new("reader", Op::ReadGlobal("g"))).unwrap();
        let src = chart.add_block(TestBlock::new("src", Op::Const(6.0))).unwrap();
        let w = chart.add_block(TestBlock::new("w", Op::WriteGlobal("g"))).unwrap();
        chart.add_connector(out(src), PortRef::new(w, "In")).unwrap();

        let report = chart.update_results().unwrap();
        assert_eq!(report.passes, 2);
        assert!(report.globals_settled);
        assert_eq!(chart.global("g"), Some(&Value::Scalar(6.0)));
        assert_eq!(scalar(&chart, "reader"), Some(6.0));
    }

    #[test]
    fn unsettled_globals_stop_at_pass_limit() {
        let mut chart = Flowchart::new(EngineConfig {
            max_global_passes: 3,
            ..EngineConfig::default()
        });
        let counter = chart.add_block(TestBlock::new("c", Op::Counter)).unwrap();
        let w = chart.add_block(TestBlock::new("w", Op::WriteGlobal("g"))).unwrap();
        chart.add_connector(out(counter), PortRef::new(w, "In")).unwrap();

        let report = chart.update_results().unwrap();
        assert_eq!(report.passes, 3);
        assert!(!report.globals_settled);
        assert!(!report.is_clean());
    }

    #[test]
    fn competing_writers_settle_on_last_write() {
        let mut chart = Flowchart::default();
        chart.add_block(TestBlock::new("ticks", Op::Counter)).unwrap();
        for (uid, x) in [("one", 1.0), ("two", 2.0)] {
            let src = chart.add_block(TestBlock::new(&format!("{uid}_src"), Op::Const(x))).unwrap();
            let w = chart.add_block(TestBlock::new(uid, Op::WriteGlobal("x"))).unwrap();
            chart.add_connector(out(src), PortRef::new(w, "In")).unwrap();
        }

        let report = chart.update_results().unwrap();
        assert_eq!(report.passes, 2);
        assert!(report.globals_settled);
        assert_eq!(chart.global("x"), Some(&Value::Scalar(2.0)));
        assert_eq!(scalar(&chart, "ticks"), Some(2.0));

        // Nothing changes on the next recompute, so one pass suffices.
        let report = chart.update_results().unwrap();
        assert_eq!(report.passes, 1);
        assert!(report.globals_settled);
        assert_eq!(scalar(&chart, "ticks"), Some(3.0));
    }

    #[test]
    fn nan_global_counts_as_settled() {
        let mut chart = Flowchart::default();
        chart.add_block(TestBlock::new("ticks", Op::Counter)).unwrap();
        let src = chart.add_block(TestBlock::new("src", Op::Const(f64::NAN))).unwrap();
        let w = chart.add_block(TestBlock::new("w", Op::WriteGlobal("g"))).unwrap();
        chart.add_connector(out(src), PortRef::new(w, "In")).unwrap();

        let report = chart.update_results().unwrap();
        assert_eq!(report.passes, 2);
        assert!(report.globals_settled);
        assert!(chart.global("g").and_then(Value::as_scalar).is_some_and(f64::is_nan));
        assert_eq!(scalar(&chart, "ticks"), Some(2.0));

        let report = chart.update_results().unwrap();
        assert_eq!(report.passes, 1);
        assert_eq!(scalar(&chart, "ticks"), Some(3.0));
    }

    #[test]
    fn extra_global_pass_ticks_stateful_blocks_again() {
        let mut chart = Flowchart::default();
        chart.add_block(TestBlock::new("ticks", Op::Counter)).unwrap();
        let src = chart.add_block(TestBlock::new("src", Op::Const(4.0))).unwrap();
        let w = chart.add_block(TestBlock::new("w", Op::WriteGlobal("g"))).unwrap();
        chart.add_connector(out(src), PortRef::new(w, "In")).unwrap();

        // First recompute: the write needs a second pass.
        assert_eq!(chart.update_results().unwrap().passes, 2);
        assert_eq!(scalar(&chart, "ticks"), Some(2.0));

        // Same value written again: no extra pass.
        assert_eq!(chart.update_results().unwrap().passes, 1);
        assert_eq!(scalar(&chart, "ticks"), Some(3.0));
    }

    #[test]
    fn update_global_variable_recomputes_readers() {
        let mut chart = Flowchart::default();
        chart.add_block(TestBlock::new("r1", Op::ReadGlobal("k"))).unwrap();
        chart.add_block(TestBlock::new("r2", Op::ReadGlobal("k"))).unwrap();

        chart.update_global_variable("k", Value::Scalar(2.5)).unwrap();
        assert_eq!(scalar(&chart, "r1"), Some(2.5));
        assert_eq!(scalar(&chart, "r2"), Some(2.5));

        assert_eq!(
            chart.remove_global_variable("k").unwrap(),
            Some(Value::Scalar(2.5))
        );
        assert_eq!(chart.remove_global_variable("k").unwrap(), None);
    }

    #[test]
    fn failing_block_clears_outputs_and_others_continue() {
        let mut chart = Flowchart::default();
        let text = chart.add_block(TestBlock::new("g", Op::ReadGlobal("label"))).unwrap();
        let s = chart.add_block(TestBlock::new("s", Op::Sum)).unwrap();
        let ok = chart.add_block(TestBlock::new("ok", Op::Const(1.0))).unwrap();
        chart.add_connector(out(text), input(s, 1)).unwrap();

        chart.update_results().unwrap();
        assert_eq!(scalar(&chart, "s"), Some(0.0));

        let report = chart
            .update_global_variable("label", Value::from("hello"))
            .unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].uid, "s");
        assert!(report.failure(s).is_some());
        assert_eq!(chart.value("s", "Out"), Some(&Value::Undefined));
        assert!(report.was_evaluated(ok));
    }

    #[test]
    fn cycle_members_keep_last_outputs() {
        let mut chart = Flowchart::new(EngineConfig {
            cycle_policy: CyclePolicy::Allow,
            ..EngineConfig::default()
        });
        let p = chart.add_block(TestBlock::new("p", Op::Const(1.0))).unwrap();
        let q = chart.add_block(TestBlock::new("q", Op::Sum)).unwrap();
        let r = chart.add_block(TestBlock::new("r", Op::Sum)).unwrap();
        chart.add_connector(out(p), input(q, 1)).unwrap();
        chart.add_connector(out(q), input(r, 1)).unwrap();
        chart.update_results().unwrap();
        assert_eq!(scalar(&chart, "r"), Some(1.0));

        chart.add_connector(out(r), input(q, 2)).unwrap();
        chart.set_block_property(p, "value", Value::Scalar(10.0)).unwrap();
        let report = chart.update_results().unwrap();

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].blocks, vec![q, r]);
        assert_eq!(report.evaluated, vec![p]);
        assert_eq!(scalar(&chart, "p"), Some(10.0));
        assert_eq!(scalar(&chart, "q"), Some(1.0));
        assert_eq!(scalar(&chart, "r"), Some(1.0));
    }

    #[test]
    fn duplicate_block_copies_configuration_not_wiring() {
        let mut chart = Flowchart::default();
        let a = chart.add_block(TestBlock::new("a", Op::Const(7.0))).unwrap();
        let s = chart.add_block(TestBlock::new("s", Op::Sum)).unwrap();
        chart.add_connector(out(a), input(s, 1)).unwrap();

        let copy = chart.duplicate_block(a).unwrap();
        assert_ne!(copy, a);
        assert!(!chart.is_connected(&out(copy)));
        let props = chart.block(copy).unwrap().properties();
        assert_eq!(props.get("value"), Some(&Value::Scalar(7.0)));
    }

    #[test]
    fn reset_block_clears_state() {
        let mut chart = Flowchart::default();
        let c = chart.add_block(TestBlock::new("c", Op::Counter)).unwrap();
        chart.update_results().unwrap();
        chart.update_results().unwrap();
        assert_eq!(scalar(&chart, "c"), Some(2.0));

        chart.reset_block(c).unwrap();
        chart.update_results().unwrap();
        assert_eq!(scalar(&chart, "c"), Some(1.0));

        chart.reset_all().unwrap();
        chart.update_results().unwrap();
        assert_eq!(scalar(&chart, "c"), Some(1.0));
    }

    #[test]
    fn snapshot_restore_rebuilds_equivalent_chart() {
        let mut chart = Flowchart::default();
        let a = chart.add_block_of_kind(&TestFactory, "const", Some("a")).unwrap();
        let s = chart.add_block_of_kind(&TestFactory, "sum", Some("s")).unwrap();
        chart.set_block_property(a, "value", Value::Scalar(3.0)).unwrap();
        chart.set_block_property(s, "inputs", Value::Scalar(3.0)).unwrap();
        chart.add_connector(out(a), input(s, 3)).unwrap();
        chart.update_global_variable("k", Value::Scalar(1.0)).unwrap();

        let snapshot = chart.snapshot();
        assert_eq!(snapshot.blocks.len(), 2);
        assert_eq!(snapshot.connectors, vec![ConnectorSnapshot::new("a", "Out", "s", "In3")]);

        let restored = Flowchart::restore(&snapshot, &TestFactory, EngineConfig::live()).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.value("s", "Out"), Some(&Value::Scalar(3.0)));
        assert_eq!(restored.global("k"), Some(&Value::Scalar(1.0)));
    }

    #[test]
    fn restore_reports_unknown_uid() {
        let snapshot = GraphSnapshot {
            blocks: vec![BlockSnapshot {
                uid: "a".into(),
                kind: "const".into(),
                properties: Properties::new(),
            }],
            connectors: vec![ConnectorSnapshot::new("a", "Out", "ghost", "In1")],
            globals: Globals::new(),
        };
        let err = Flowchart::restore(&snapshot, &TestFactory, EngineConfig::default())
            .err()
            .unwrap();
        assert_eq!(err, GraphError::UnknownUid("ghost".into()));
    }
}
