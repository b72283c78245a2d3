#![warn(missing_docs)]

//! Library used by the shadermap software. Translates Cycles-style shader node trees into the
//! node descriptors of a path tracer, degrading to loud fallback nodes whenever a node type has
//! no mapping.

pub mod color;
pub mod convert;
pub mod diagnostic;
pub mod fallback;
pub mod resolve;
pub mod source;
pub mod tags;
pub mod target;
pub mod vector;

macro_rules! states {
    {$($(#[$attr:meta])* $state:ident),+ $(,)?} => {
        $(
            #[derive(Clone, Debug, Default, PartialEq)]
            $(#[$attr])*
            pub struct $state;
        )+
    };
}

states! {
    /// Freshly built or deserialized, links have not been checked.
    Unvalidated,
    /// Checked for duplicate names, dangling links and cycles.
    Validated,
}

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        color::Color,
        convert::{convert_materials, convert_node_tree, Conversion, Error as ConvertError, Options},
        diagnostic::{Category, Diagnostic},
        fallback::{FALLBACK_COLOR, FALLBACK_SHADER},
        resolve::Resolver,
        source::{
            tree::{Link, Material, Node, NodeTree, Socket},
            DefaultValue, NodeGraph,
        },
        target::{ColorNode, ShaderNode, ValueNode, VectorNode},
        vector::Vector,
        Unvalidated, Validated,
    };
}
