//! Family tree layout
//!
//! Positions an asset's relatives on a fixed canvas: ancestors on top, then
//! parents, the asset itself in the middle, children, and descendants at the
//! bottom. Each band splits the canvas width evenly among its nodes with a
//! capped slot width. The layout is a pure function of its input.

use crate::{IpEdge, IpRelationships};
use serde::{Deserialize, Serialize};

/// Canvas width in layout units
pub const CANVAS_WIDTH: f64 = 1000.0;

/// Widest slot a single node may occupy
pub const MAX_SLOT_WIDTH: f64 = 200.0;

/// Vertical distance between bands
pub const BAND_SPACING: f64 = 150.0;

/// Key of the centered node
pub const CURRENT_KEY: &str = "current";

/// Position of a node relative to the asset being viewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyRole {
    /// Parent of a parent
    Ancestor,
    /// Direct parent
    Parent,
    /// The asset itself
    Current,
    /// Direct child
    Child,
    /// Child of a child
    Descendant,
}

impl FamilyRole {
    /// Band y coordinate; smaller is higher on screen
    pub fn band_y(&self) -> f64 {
        let band = match self {
            FamilyRole::Ancestor => 0.0,
            FamilyRole::Parent => 1.0,
            FamilyRole::Current => 2.0,
            FamilyRole::Child => 3.0,
            FamilyRole::Descendant => 4.0,
        };
        band * BAND_SPACING
    }

    fn key_prefix(&self) -> &'static str {
        match self {
            FamilyRole::Ancestor => "ancestor",
            FamilyRole::Parent => "parent",
            FamilyRole::Current => CURRENT_KEY,
            FamilyRole::Child => "child",
            FamilyRole::Descendant => "descendant",
        }
    }
}

/// A positioned node in the rendered tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyNode {
    /// Unique key within the graph (e.g. `parent-1`)
    pub key: String,
    /// IP id this node shows
    pub ip_id: String,
    /// Role relative to the viewed asset
    pub role: FamilyRole,
    /// Edge this node was derived from; `None` for the current node
    pub edge: Option<IpEdge>,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

/// Directed link from an upstream node key to a downstream node key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyLink {
    /// Upstream (parent-side) node key
    pub source: String,
    /// Downstream (child-side) node key
    pub target: String,
}

/// Edges gathered around one asset, ready for layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTree {
    /// Asset at the center
    pub ip_id: String,
    /// Edges whose `ip_id` is a parent (parent's parents)
    pub ancestors: Vec<IpEdge>,
    /// Edges whose `ip_id` is the viewed asset
    pub parents: Vec<IpEdge>,
    /// Edges whose `parent_ip_id` is the viewed asset
    pub children: Vec<IpEdge>,
    /// Edges whose `parent_ip_id` is a child (child's children)
    pub descendants: Vec<IpEdge>,
}

impl FamilyTree {
    /// Two-generation tree from a relationship view
    pub fn from_relationships(ip_id: impl Into<String>, relationships: &IpRelationships) -> Self {
        Self {
            ip_id: ip_id.into(),
            ancestors: Vec::new(),
            parents: relationships.parents.clone(),
            children: relationships.children.clone(),
            descendants: Vec::new(),
        }
    }
}

/// Positioned nodes and links
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyGraph {
    /// All nodes, band by band from the top
    pub nodes: Vec<FamilyNode>,
    /// Links between node keys
    pub links: Vec<FamilyLink>,
}

impl FamilyGraph {
    /// Nodes holding a given role
    pub fn nodes_with_role(&self, role: FamilyRole) -> impl Iterator<Item = &FamilyNode> {
        self.nodes.iter().filter(move |n| n.role == role)
    }
}

/// Horizontal positions for `count` evenly spaced slots centered on the canvas
///
/// Slot width is `min(MAX_SLOT_WIDTH, CANVAS_WIDTH / count)`, so positions
/// are distinct for any non-zero count.
pub fn slot_positions(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let slot = MAX_SLOT_WIDTH.min(CANVAS_WIDTH / count as f64);
    let center = CANVAS_WIDTH / 2.0;
    let start = center - (count as f64 - 1.0) * slot / 2.0;
    (0..count).map(|i| start + i as f64 * slot).collect()
}

fn place_band(role: FamilyRole, edges: &[IpEdge], id_of: fn(&IpEdge) -> &str) -> Vec<FamilyNode> {
    slot_positions(edges.len())
        .into_iter()
        .zip(edges)
        .enumerate()
        .map(|(i, (x, edge))| FamilyNode {
            key: format!("{}-{}", role.key_prefix(), i),
            ip_id: id_of(edge).to_string(),
            role,
            edge: Some(edge.clone()),
            x,
            y: role.band_y(),
        })
        .collect()
}

fn link_matching(
    upstream: &[FamilyNode],
    downstream: &[FamilyNode],
    connects: impl Fn(&FamilyNode, &FamilyNode) -> bool,
) -> Vec<FamilyLink> {
    let mut links = Vec::new();
    for up in upstream {
        for down in downstream {
            if connects(up, down) {
                links.push(FamilyLink {
                    source: up.key.clone(),
                    target: down.key.clone(),
                });
            }
        }
    }
    links
}

/// Lay out a family tree
///
/// One node per edge: duplicate edges from the API show up as separate
/// nodes in separate slots.
pub fn layout(tree: &FamilyTree) -> FamilyGraph {
    let ancestors = place_band(FamilyRole::Ancestor, &tree.ancestors, |e| e.parent_ip_id.as_str());
    let parents = place_band(FamilyRole::Parent, &tree.parents, |e| e.parent_ip_id.as_str());
    let children = place_band(FamilyRole::Child, &tree.children, |e| e.ip_id.as_str());
    let descendants = place_band(FamilyRole::Descendant, &tree.descendants, |e| e.ip_id.as_str());

    let current = FamilyNode {
        key: CURRENT_KEY.to_string(),
        ip_id: tree.ip_id.clone(),
        role: FamilyRole::Current,
        edge: None,
        x: CANVAS_WIDTH / 2.0,
        y: FamilyRole::Current.band_y(),
    };

    let same_ip = |a: &str, b: &str| a.eq_ignore_ascii_case(b);

    let mut links = Vec::new();
    // An ancestor edge's ip_id is the parent it feeds into
    links.extend(link_matching(&ancestors, &parents, |a, p| {
        a.edge.as_ref().is_some_and(|e| same_ip(&e.ip_id, &p.ip_id))
    }));
    links.extend(parents.iter().map(|p| FamilyLink {
        source: p.key.clone(),
        target: CURRENT_KEY.to_string(),
    }));
    links.extend(children.iter().map(|c| FamilyLink {
        source: CURRENT_KEY.to_string(),
        target: c.key.clone(),
    }));
    links.extend(link_matching(&children, &descendants, |c, d| {
        d.edge.as_ref().is_some_and(|e| same_ip(&e.parent_ip_id, &c.ip_id))
    }));

    let mut nodes = Vec::with_capacity(
        ancestors.len() + parents.len() + 1 + children.len() + descendants.len(),
    );
    nodes.extend(ancestors);
    nodes.extend(parents);
    nodes.push(current);
    nodes.extend(children);
    nodes.extend(descendants);

    FamilyGraph { nodes, links }
}
