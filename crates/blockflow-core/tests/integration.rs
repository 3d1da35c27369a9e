//! Integration tests for the blockflow-core engine.
//!
//! Exercises the public [`Flowchart`] surface end to end with a small set of
//! test blocks: cycle containment, fan-in enforcement, global fan-out, and
//! snapshot persistence through JSON.

use blockflow_core::{
    Block, BlockError, BlockFactory, CyclePolicy, EngineConfig, EvalContext, Flowchart,
    GraphError, GraphSnapshot, PortRef, Ports, Properties, Value, WiringViolation,
    scalar_property,
};

/// `Out = gain * (A + B) + bias`, treating unconnected inputs as zero.
struct Mix {
    uid: String,
    gain: f64,
    bias: f64,
    ports: Ports,
}

/// Publishes its input under a global name.
struct Publish {
    uid: String,
    ports: Ports,
}

/// Reads a global name onto its output.
struct Subscribe {
    uid: String,
    ports: Ports,
}

impl Block for Mix {
    fn uid(&self) -> &str {
        &self.uid
    }
    fn set_uid(&mut self, uid: String) {
        self.uid = uid;
    }
    fn kind(&self) -> &'static str {
        "mix"
    }
    fn ports(&self) -> &Ports {
        &self.ports
    }
    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }
    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let mut total = 0.0;
        for port in self.ports.inputs() {
            match &port.value {
                Value::Undefined => {}
                Value::Scalar(x) => total += x,
                other => return Err(BlockError::wrong_type(port.uid(), "scalar", other)),
            }
        }
        self.ports.set_output("Out", Value::Scalar(self.gain * total + self.bias));
        Ok(())
    }
    fn reset(&mut self) {}
    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Mix {
            uid,
            gain: self.gain,
            bias: self.bias,
            ports: Ports::with(&["A", "B"], &["Out"]),
        })
    }
    fn properties(&self) -> Properties {
        Properties::from([
            ("bias".to_string(), Value::Scalar(self.bias)),
            ("gain".to_string(), Value::Scalar(self.gain)),
        ])
    }
    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "gain" => self.gain = scalar_property(key, &value)?,
            "bias" => self.bias = scalar_property(key, &value)?,
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}

impl Block for Publish {
    fn uid(&self) -> &str {
        &self.uid
    }
    fn set_uid(&mut self, uid: String) {
        self.uid = uid;
    }
    fn kind(&self) -> &'static str {
        "publish"
    }
    fn ports(&self) -> &Ports {
        &self.ports
    }
    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }
    fn update_model(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let value = self.ports.input("In").clone();
        if value.is_defined() {
            ctx.write_global("shared", value);
        }
        Ok(())
    }
    fn reset(&mut self) {}
    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Publish {
            uid,
            ports: Ports::with(&["In"], &[]),
        })
    }
    fn properties(&self) -> Properties {
        Properties::new()
    }
    fn set_property(&mut self, key: &str, _value: Value) -> Result<(), BlockError> {
        Err(BlockError::UnknownProperty(key.to_string()))
    }
}

impl Block for Subscribe {
    fn uid(&self) -> &str {
        &self.uid
    }
    fn set_uid(&mut self, uid: String) {
        self.uid = uid;
    }
    fn kind(&self) -> &'static str {
        "subscribe"
    }
    fn ports(&self) -> &Ports {
        &self.ports
    }
    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }
    fn update_model(&mut self, ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let value = ctx.global("shared").cloned().unwrap_or_default();
        self.ports.set_output("Out", value);
        Ok(())
    }
    fn reset(&mut self) {}
    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Subscribe {
            uid,
            ports: Ports::with(&[], &["Out"]),
        })
    }
    fn properties(&self) -> Properties {
        Properties::new()
    }
    fn set_property(&mut self, key: &str, _value: Value) -> Result<(), BlockError> {
        Err(BlockError::UnknownProperty(key.to_string()))
    }
}

struct Kinds;

impl BlockFactory for Kinds {
    fn create(&self, kind: &str, uid: &str) -> Option<Box<dyn Block>> {
        let uid = uid.to_string();
        let block: Box<dyn Block> = match kind {
            "mix" => Box::new(Mix {
                uid,
                gain: 1.0,
                bias: 0.0,
                ports: Ports::with(&["A", "B"], &["Out"]),
            }),
            "publish" => Box::new(Publish {
                uid,
                ports: Ports::with(&["In"], &[]),
            }),
            "subscribe" => Box::new(Subscribe {
                uid,
                ports: Ports::with(&[], &["Out"]),
            }),
            _ => return None,
        };
        Some(block)
    }
}

fn add(chart: &mut Flowchart, kind: &str, uid: &str) -> blockflow_core::BlockId {
    chart.add_block_of_kind(&Kinds, kind, Some(uid)).unwrap()
}

fn out(chart: &Flowchart, uid: &str) -> Value {
    chart.value(uid, "Out").cloned().unwrap()
}

#[test]
fn cycle_is_reported_and_contained() {
    let mut chart = Flowchart::new(EngineConfig {
        cycle_policy: CyclePolicy::Allow,
        ..EngineConfig::default()
    });
    let seed = add(&mut chart, "subscribe", "seed");
    let p = add(&mut chart, "mix", "p");
    let q = add(&mut chart, "mix", "q");
    let r = add(&mut chart, "mix", "r");
    chart.add_connector(PortRef::new(seed, "Out"), PortRef::new(p, "A")).unwrap();
    chart.add_connector(PortRef::new(p, "Out"), PortRef::new(q, "A")).unwrap();
    chart.add_connector(PortRef::new(q, "Out"), PortRef::new(r, "A")).unwrap();

    chart.update_global_variable("shared", Value::Scalar(2.0)).unwrap();
    assert_eq!(out(&chart, "r"), Value::Scalar(2.0));

    // Close the loop Q → R → Q and change P's upstream.
    chart.add_connector(PortRef::new(r, "Out"), PortRef::new(q, "B")).unwrap();
    let report = chart.update_global_variable("shared", Value::Scalar(5.0)).unwrap();

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.cycles[0].uids, vec!["q", "r"]);
    assert_eq!(out(&chart, "p"), Value::Scalar(5.0));
    assert_eq!(out(&chart, "q"), Value::Scalar(2.0));
    assert_eq!(out(&chart, "r"), Value::Scalar(2.0));
    assert!(!report.was_evaluated(q));
    assert!(!report.was_evaluated(r));
}

#[test]
fn fan_in_is_enforced_without_disturbing_existing_connectors() {
    let mut chart = Flowchart::default();
    let a = add(&mut chart, "subscribe", "a");
    let b = add(&mut chart, "subscribe", "b");
    let m = add(&mut chart, "mix", "m");
    let first = chart.add_connector(PortRef::new(a, "Out"), PortRef::new(m, "A")).unwrap();

    let err = chart
        .add_connector(PortRef::new(b, "Out"), PortRef::new(m, "A"))
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::InvalidWiring {
            violation: WiringViolation::FanIn,
            ..
        }
    ));
    assert_eq!(chart.connector_count(), 1);
    assert_eq!(chart.connector(first).unwrap().source, PortRef::new(a, "Out"));
    assert_eq!(chart.connectors_to_port(&PortRef::new(m, "A")), vec![first]);
}

#[test]
fn global_write_reaches_unconnected_readers() {
    let mut chart = Flowchart::default();
    // Readers are inserted first so the writer runs after them.
    add(&mut chart, "subscribe", "left");
    add(&mut chart, "subscribe", "right");
    let src = add(&mut chart, "mix", "src");
    let publish = add(&mut chart, "publish", "pub");
    chart
        .add_connector(PortRef::new(src, "Out"), PortRef::new(publish, "In"))
        .unwrap();
    chart.update_results().unwrap();
    assert_eq!(out(&chart, "left"), Value::Scalar(0.0));

    chart.set_block_property(src, "bias", Value::Scalar(7.0)).unwrap();
    let report = chart.update_results_for_block(src).unwrap();

    assert_eq!(report.passes, 2);
    assert!(report.globals_settled);
    assert_eq!(chart.global("shared"), Some(&Value::Scalar(7.0)));
    assert_eq!(out(&chart, "left"), Value::Scalar(7.0));
    assert_eq!(out(&chart, "right"), Value::Scalar(7.0));
}

#[test]
fn wrong_type_fails_only_that_block() {
    let mut chart = Flowchart::default();
    let s = add(&mut chart, "subscribe", "s");
    let m = add(&mut chart, "mix", "m");
    let downstream = add(&mut chart, "mix", "down");
    let other = add(&mut chart, "mix", "other");
    chart.add_connector(PortRef::new(s, "Out"), PortRef::new(m, "A")).unwrap();
    chart
        .add_connector(PortRef::new(m, "Out"), PortRef::new(downstream, "A"))
        .unwrap();

    let report = chart
        .update_global_variable("shared", Value::Text("oops".into()))
        .unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].block, m);
    assert_eq!(
        report.failures[0].to_string(),
        "block 'm' failed: port 'A' expected scalar, got text"
    );
    assert_eq!(out(&chart, "m"), Value::Undefined);
    // Downstream of the failure sees Undefined and carries on.
    assert_eq!(out(&chart, "down"), Value::Scalar(0.0));
    assert!(report.was_evaluated(other));
}

#[test]
fn snapshot_survives_json_round_trip() {
    let mut chart = Flowchart::default();
    let a = add(&mut chart, "subscribe", "a");
    let m = add(&mut chart, "mix", "m");
    chart.set_block_property(m, "gain", Value::Scalar(0.5)).unwrap();
    chart.add_connector(PortRef::new(a, "Out"), PortRef::new(m, "B")).unwrap();
    chart.update_global_variable("shared", Value::Scalar(8.0)).unwrap();

    let json = serde_json::to_string_pretty(&chart.snapshot()).unwrap();
    let snapshot: GraphSnapshot = serde_json::from_str(&json).unwrap();
    let mut restored = Flowchart::restore(&snapshot, &Kinds, EngineConfig::default()).unwrap();
    restored.update_results().unwrap();

    assert_eq!(out(&restored, "m"), Value::Scalar(4.0));
    assert_eq!(restored.snapshot(), chart.snapshot());
}

#[test]
fn restore_accepts_cycles_that_wiring_would_reject() {
    let mut chart = Flowchart::new(EngineConfig {
        cycle_policy: CyclePolicy::Allow,
        ..EngineConfig::default()
    });
    let x = add(&mut chart, "mix", "x");
    let y = add(&mut chart, "mix", "y");
    chart.add_connector(PortRef::new(x, "Out"), PortRef::new(y, "A")).unwrap();
    chart.add_connector(PortRef::new(y, "Out"), PortRef::new(x, "A")).unwrap();

    let restored =
        Flowchart::restore(&chart.snapshot(), &Kinds, EngineConfig::default()).unwrap();
    assert_eq!(restored.connector_count(), 2);
    assert_eq!(restored.find_cycles().len(), 1);
}
