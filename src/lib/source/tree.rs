//! Owned, serde-backed node tree implementing [NodeGraph].
//!
//! Trees start [Unvalidated] and must go through [NodeTree::validate] before they can be
//! converted, which guarantees unique names, resolvable links and the absence of cycles.

use super::{DefaultValue, NodeGraph};

use crate::{
    convert::{convert_node_tree, Conversion, Options},
    Unvalidated, Validated,
};

use std::{
    borrow::Borrow,
    collections::{HashMap, HashSet},
    marker::PhantomData,
};

use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! names {
    ($($(#[$attr:meta])* $name:ident),+ $(,)?) => {
        $(
            #[derive(
                Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
                Display, From, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            $(#[$attr])*
            pub struct $name(String);

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }

            impl Borrow<str> for $name {
                fn borrow(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl $name {
                /// Borrow the inner [String].
                pub fn as_str(&self) -> &str {
                    self.0.as_str()
                }
            }
        )+
    };
}

names! {
    /// Wrapper around [String], unique within a tree.
    NodeName,
    /// Wrapper around [String], unique within a node's inputs.
    SocketName,
}

#[derive(Debug, PartialEq, thiserror::Error)]
/// [NodeTree] validation error
pub enum Error {
    #[error("Node `{0}` is defined more than once")]
    /// Two nodes share a name.
    DuplicateNode(NodeName),

    #[error("Node `{node}` has more than one `{input}` input")]
    /// Two inputs of the same node share a name.
    DuplicateInput {
        #[allow(missing_docs)]
        node: NodeName,
        #[allow(missing_docs)]
        input: SocketName,
    },

    #[error("Input `{input}` of node `{node}` links to missing node `{target}`")]
    /// A link points to a node absent from the tree.
    DanglingLink {
        #[allow(missing_docs)]
        node: NodeName,
        #[allow(missing_docs)]
        input: SocketName,
        /// Name the link refers to.
        target: NodeName,
    },

    #[error("Detected a cycle while validating the path {}, reaching node `{detected}` again",
        .during.iter().map(NodeName::as_str).collect::<Vec<_>>().join(" <- "))]
    /// Following links upstream came back to a node of the current path.
    Cycle {
        /// Current path, downstream first.
        during: Vec<NodeName>,
        /// Node detected as already visited in the current path.
        detected: NodeName,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Edge from another node's output into an input socket.
pub struct Link {
    /// Upstream node.
    pub from_node: NodeName,
    /// Upstream output socket, informative only.
    #[serde(default)]
    pub from_socket: SocketName,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Named, typed input slot of a [Node].
pub struct Socket {
    #[allow(missing_docs)]
    pub name: SocketName,
    /// Host type tag, e.g. `NodeSocketColor`.
    #[serde(rename = "bl_idname")]
    pub type_tag: String,
    /// Literal used while unlinked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    /// Incoming links, only the first one is ever followed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Socket {
    /// Create an unlinked socket without literal.
    pub fn new(type_tag: &str) -> Self {
        Self {
            type_tag: type_tag.to_owned(),
            ..Default::default()
        }
    }

    /// Set the literal used while unlinked.
    pub fn with_default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Append a link from `node`'s `output`.
    pub fn with_link(mut self, node: &str, output: &str) -> Self {
        self.links.push(Link {
            from_node: node.into(),
            from_socket: output.into(),
        });
        self
    }

    /// Whether at least one link enters the socket.
    pub fn is_linked(&self) -> bool {
        !self.links.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Shader node as exported by the host.
pub struct Node {
    #[allow(missing_docs)]
    pub name: NodeName,
    /// Host type tag, e.g. `ShaderNodeBsdfDiffuse`.
    #[serde(rename = "bl_idname")]
    pub type_tag: String,
    /// Ordered input sockets.
    #[serde(default)]
    pub inputs: Vec<Socket>,
}

impl Node {
    /// Create an unnamed node without inputs.
    pub fn new(type_tag: &str) -> Self {
        Self {
            type_tag: type_tag.to_owned(),
            ..Default::default()
        }
    }

    /// Set the node's name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.into();
        self
    }

    /// Append an input socket.
    pub fn with_input(mut self, name: &str, mut socket: Socket) -> Self {
        socket.name = name.into();
        self.inputs.push(socket);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Node tree state machine implementation.
pub struct NodeTree<State> {
    nodes: Vec<Node>,
    index: HashMap<NodeName, usize>,
    state: PhantomData<State>,
}

#[derive(Serialize, Deserialize)]
struct RawTree<N> {
    nodes: N,
}

impl<State> Serialize for NodeTree<State> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawTree {
            nodes: self.nodes.as_slice(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodeTree<Unvalidated> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawTree::<Vec<Node>>::deserialize(deserializer).map(|raw| Self::new(raw.nodes))
    }
}

impl<State> NodeTree<State> {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[macro_export]
/// Instantiate a [NodeTree] concisely, node names are given as keys.
/// # Example
/// ```
/// use shadermap::{node, socket, tree};
///
/// let tree = tree! {
///     "Material Output": node!("ShaderNodeOutputMaterial",
///         "Surface": socket!("NodeSocketShader" from "Diffuse BSDF" "BSDF")),
///     "Diffuse BSDF": node!("ShaderNodeBsdfDiffuse",
///         "Color": socket!("NodeSocketColor" = [0.8f32, 0.8, 0.8, 1.0])),
/// };
///
/// assert!(tree.validate().is_ok());
/// ```
macro_rules! tree {
    { $($name:literal : $node:expr),* $(,)? } => {
        $crate::source::tree::NodeTree::new(vec![$($node.named($name)),*])
    };
}

#[macro_export]
/// Instantiate an unnamed [Node] from its type tag and named inputs.
/// # Example
/// ```
/// use shadermap::{node, socket};
///
/// let node = node!("ShaderNodeBsdfGlass",
///     "Roughness": socket!("NodeSocketFloatFactor" = 0.1f32),
///     "IOR": socket!("NodeSocketFloat" = 1.45f32));
///
/// assert_eq!(node.inputs.len(), 2);
/// ```
macro_rules! node {
    ($type:literal $(, $($input:literal : $socket:expr),+)? $(,)?) => {
        $crate::source::tree::Node::new($type)$($(.with_input($input, $socket))+)?
    };
}

#[macro_export]
/// Instantiate a [Socket] with an optional literal or a link.
/// # Example
/// ```
/// use shadermap::socket;
///
/// let unlinked = socket!("NodeSocketVector" = [0f32, 0., 1.]);
/// let linked = socket!("NodeSocketColor" from "RGB" "Color");
///
/// assert!(!unlinked.is_linked());
/// assert!(linked.is_linked());
/// ```
macro_rules! socket {
    ($type:literal) => {
        $crate::source::tree::Socket::new($type)
    };

    ($type:literal = $value:expr) => {
        $crate::source::tree::Socket::new($type).with_default($value)
    };

    ($type:literal from $node:literal $output:literal) => {
        $crate::source::tree::Socket::new($type).with_link($node, $output)
    };
}

// Export macros
pub use {node, socket, tree};

impl NodeTree<Unvalidated> {
    /// Create a tree from nodes in host order.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            index: HashMap::new(),
            state: PhantomData,
        }
    }

    /// Check names and links, then detect cycles.
    pub fn validate(self) -> Result<NodeTree<Validated>, Error> {
        let mut index = HashMap::with_capacity(self.nodes.len());

        for (i, node) in self.nodes.iter().enumerate() {
            if index.insert(node.name.clone(), i).is_some() {
                return Err(Error::DuplicateNode(node.name.clone()));
            }

            let mut inputs = HashSet::new();
            for socket in node.inputs.iter() {
                if !inputs.insert(&socket.name) {
                    return Err(Error::DuplicateInput {
                        node: node.name.clone(),
                        input: socket.name.clone(),
                    });
                }
            }
        }

        for node in self.nodes.iter() {
            for socket in node.inputs.iter() {
                if let Some(link) = socket
                    .links
                    .iter()
                    .find(|link| !index.contains_key(&link.from_node))
                {
                    return Err(Error::DanglingLink {
                        node: node.name.clone(),
                        input: socket.name.clone(),
                        target: link.from_node.clone(),
                    });
                }
            }
        }

        find_cycle(&self.nodes, &index)?;

        Ok(NodeTree {
            nodes: self.nodes,
            index,
            state: PhantomData::<Validated>,
        })
    }
}

/// Upstream node indices of every link entering `node`.
fn upstream(node: &Node, index: &HashMap<NodeName, usize>) -> std::vec::IntoIter<usize> {
    node.inputs
        .iter()
        .flat_map(|socket| socket.links.iter())
        .filter_map(|link| index.get(&link.from_node).copied())
        .collect::<Vec<_>>()
        .into_iter()
}

/// Depth-first walk from every node towards its inputs.
fn find_cycle(nodes: &[Node], index: &HashMap<NodeName, usize>) -> Result<(), Error> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; nodes.len()];

    for root in 0..nodes.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        marks[root] = Mark::InPath;
        let mut path = vec![(root, upstream(&nodes[root], index))];

        while let Some((current, next)) = path.last_mut() {
            let current = *current;

            match next.next() {
                Some(up) if marks[up] == Mark::InPath => {
                    return Err(Error::Cycle {
                        during: path.iter().map(|(i, _)| nodes[*i].name.clone()).collect(),
                        detected: nodes[up].name.clone(),
                    });
                }
                Some(up) if marks[up] == Mark::Unvisited => {
                    marks[up] = Mark::InPath;
                    path.push((up, upstream(&nodes[up], index)));
                }
                Some(_) => {}
                None => {
                    marks[current] = Mark::Done;
                    path.pop();
                }
            }
        }
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// [NodeGraph::Node] handle of a validated [NodeTree].
pub struct NodeIndex(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// [NodeGraph::Socket] handle of a validated [NodeTree].
pub struct SocketIndex {
    node: usize,
    input: usize,
}

impl NodeTree<Validated> {
    fn socket(&self, socket: SocketIndex) -> &Socket {
        &self.nodes[socket.node].inputs[socket.input]
    }
}

impl NodeGraph for NodeTree<Validated> {
    type Node = NodeIndex;
    type Socket = SocketIndex;

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied().map(NodeIndex)
    }

    fn node_type(&self, node: NodeIndex) -> &str {
        self.nodes[node.0].type_tag.as_str()
    }

    fn input(&self, node: NodeIndex, name: &str) -> Option<SocketIndex> {
        self.nodes[node.0]
            .inputs
            .iter()
            .position(|socket| socket.name.as_str() == name)
            .map(|input| SocketIndex {
                node: node.0,
                input,
            })
    }

    fn inputs(&self, node: NodeIndex) -> Vec<SocketIndex> {
        (0..self.nodes[node.0].inputs.len())
            .map(|input| SocketIndex {
                node: node.0,
                input,
            })
            .collect()
    }

    fn socket_name(&self, socket: SocketIndex) -> &str {
        self.socket(socket).name.as_str()
    }

    fn socket_type(&self, socket: SocketIndex) -> &str {
        self.socket(socket).type_tag.as_str()
    }

    fn first_link(&self, socket: SocketIndex) -> Option<NodeIndex> {
        self.socket(socket)
            .links
            .first()
            .and_then(|link| self.node(link.from_node.as_str()))
    }

    fn default_value(&self, socket: SocketIndex) -> Option<DefaultValue> {
        self.socket(socket).default_value
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = "NodeTree<State>: Deserialize<'de>"))]
/// Named owner of exactly one [NodeTree].
pub struct Material<State = Unvalidated> {
    /// Only used in diagnostics.
    pub name: String,
    #[allow(missing_docs)]
    pub node_tree: NodeTree<State>,
}

impl Material<Unvalidated> {
    /// Validate the owned [NodeTree].
    pub fn validate(self) -> Result<Material<Validated>, Error> {
        let Self { name, node_tree } = self;

        Ok(Material {
            name,
            node_tree: node_tree.validate()?,
        })
    }
}

impl Material<Validated> {
    /// Convert the owned tree, see [convert_node_tree].
    pub fn convert(&self, options: &Options) -> Conversion {
        convert_node_tree(&self.name, &self.node_tree, options)
    }
}
