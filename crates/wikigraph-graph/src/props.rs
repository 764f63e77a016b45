//! Property encoding: property bags to parameterized Cypher map literals.
//!
//! `{title: $v_title, topic: $v_topic}` plus a bindings map
//! `v_title -> "...", v_topic -> "..."`. The alias prefix lets one query
//! reference several bags (two endpoints and an edge) that share property
//! names without their parameters overwriting each other.
//!
//! Property names are interpolated as-is. They are operator-controlled
//! schema names, not article data.

use std::collections::BTreeMap;

use neo4rs::{BoltType, Query};

use wikigraph_core::{PropValue, Props};

/// Alias prefixes used by relationship queries.
pub const FROM_ALIAS: &str = "v";
pub const TO_ALIAS: &str = "w";
pub const EDGE_ALIAS: &str = "e";

/// A map literal and the parameters it refers to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedProps {
    pub clause: String,
    pub bindings: BTreeMap<String, PropValue>,
}

impl EncodedProps {
    /// Bind every parameter of this clause onto `query`.
    pub fn bind(&self, query: Query) -> Query {
        self.bindings
            .iter()
            .fold(query, |q, (name, value)| q.param(name, to_bolt(value)))
    }
}

/// Encode `props` as a map literal whose parameters carry the `alias` prefix.
///
/// An empty alias uses the bare property name as the parameter name.
pub fn encode(props: &Props, alias: &str) -> EncodedProps {
    let mut bindings = BTreeMap::new();
    let mut entries = Vec::with_capacity(props.len());

    for (name, value) in props.iter() {
        let param = param_name(alias, name);
        entries.push(format!("{name}: ${param}"));
        bindings.insert(param, value.clone());
    }

    EncodedProps {
        clause: format!("{{{}}}", entries.join(", ")),
        bindings,
    }
}

fn param_name(alias: &str, name: &str) -> String {
    if alias.is_empty() {
        name.to_string()
    } else {
        format!("{alias}_{name}")
    }
}

/// Convert a property value into the driver's wire type.
pub(crate) fn to_bolt(value: &PropValue) -> BoltType {
    match value {
        PropValue::Bool(b) => BoltType::from(*b),
        PropValue::Int(i) => BoltType::from(*i),
        PropValue::Float(f) => BoltType::from(*f),
        PropValue::String(s) => BoltType::from(s.clone()),
        PropValue::List(items) => BoltType::from(items.iter().map(to_bolt).collect::<Vec<_>>()),
    }
}
