//! Endpoint records as served by the cluster-networking service.
//!
//! The shapes follow the Kubernetes `Endpoints` object closely enough that
//! `kubectl get endpoints -o json` output deserializes directly. Only the
//! fields opsh reads are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A named grouping of address/port subsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// Object metadata.
    pub metadata: EndpointMeta,
    /// Address/port subsets. Absent in the source means empty.
    #[serde(default)]
    pub subsets: Vec<EndpointSubset>,
}

/// Identifying metadata of an endpoint record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMeta {
    /// Record name.
    pub name: String,
    /// Namespace the record lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// One subset: a set of addresses that all expose the same ports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSubset {
    /// Ready addresses.
    #[serde(default)]
    pub addresses: Vec<EndpointAddress>,
    /// Ports exposed by every address in the subset.
    #[serde(default)]
    pub ports: Vec<EndpointPort>,
}

/// A single endpoint address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAddress {
    /// IP address, kept as the service reported it.
    pub ip: String,
    /// Optional hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Node hosting this endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
}

/// A port exposed by a subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPort {
    /// Port number.
    pub port: u16,
    /// Port name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Transport protocol (`TCP`, `UDP`, `SCTP`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl EndpointRecord {
    /// Creates a record with no subsets.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: EndpointMeta {
                name: name.into(),
                namespace: None,
            },
            subsets: Vec::new(),
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = Some(namespace.into());
        self
    }

    /// Appends a subset.
    #[must_use]
    pub fn with_subset(mut self, subset: EndpointSubset) -> Self {
        self.subsets.push(subset);
        self
    }

    /// Returns the record name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

impl EndpointSubset {
    /// Creates a subset from plain IPs and port numbers.
    #[must_use]
    pub fn new<I, P>(ips: I, ports: P) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        P: IntoIterator<Item = u16>,
    {
        Self {
            addresses: ips.into_iter().map(EndpointAddress::new).collect(),
            ports: ports.into_iter().map(EndpointPort::new).collect(),
        }
    }
}

impl EndpointAddress {
    /// Creates an address with only an IP.
    #[must_use]
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            hostname: None,
            node_name: None,
        }
    }
}

impl EndpointPort {
    /// Creates an unnamed port.
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self {
            port,
            name: None,
            protocol: None,
        }
    }
}
