//! Read-only view over the host's shader node trees.

pub mod tree;

use std::fmt::Debug;

use paste::paste;
use serde::{Deserialize, Serialize};

macro_rules! default_value {
    { $($(#[$attr:meta])* $name:ident : $type:ty),+ $(,)? } => {
        paste! {
            #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
            #[serde(untagged)]
            /// Literal stored on an unlinked socket, components in host order.
            pub enum DefaultValue {
                $(
                    $(#[$attr])*
                    $name($type),
                )+
            }

            impl DefaultValue {
                $(
                    #[doc = concat!("Get the literal if it is a [", stringify!($name), "](DefaultValue::", stringify!($name), ") one.")]
                    pub fn [<as_ $name:lower>](&self) -> Option<$type> {
                        match self {
                            Self::$name(value) => Some(*value),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }
                )+
            }

            $(
                impl From<$type> for DefaultValue {
                    fn from(value: $type) -> Self {
                        Self::$name(value)
                    }
                }
            )+
        }
    };
}

default_value! {
    /// Float and factor sockets
    Float: f32,
    /// 3-component vector
    Vector: [f32; 3],
    /// 4-component color
    Color: [f32; 4],
}

/// Capabilities the converter needs from a source graph.
///
/// Nodes and sockets are addressed through small [Copy] handles handed out by the graph itself,
/// so implementors can wrap arbitrary host object models. Handles from another graph are a
/// logic error and may panic.
pub trait NodeGraph {
    /// Handle to a node.
    type Node: Copy + Debug;
    /// Handle to a node's input socket.
    type Socket: Copy + Debug;

    /// Number of nodes in the graph.
    fn len(&self) -> usize;

    /// Whether the graph has no node at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find a node by its unique name.
    fn node(&self, name: &str) -> Option<Self::Node>;

    /// Type tag of a node.
    fn node_type(&self, node: Self::Node) -> &str;

    /// Find an input socket of `node` by name.
    fn input(&self, node: Self::Node, name: &str) -> Option<Self::Socket>;

    /// Every input socket of `node`, in host order.
    fn inputs(&self, node: Self::Node) -> Vec<Self::Socket>;

    /// Name of a socket.
    fn socket_name(&self, socket: Self::Socket) -> &str;

    /// Type tag of a socket.
    fn socket_type(&self, socket: Self::Socket) -> &str;

    /// Node at the far end of the socket's first link, [None] when unlinked.
    fn first_link(&self, socket: Self::Socket) -> Option<Self::Node>;

    /// Literal used when the socket is unlinked.
    fn default_value(&self, socket: Self::Socket) -> Option<DefaultValue>;
}
