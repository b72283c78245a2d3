//! Advisory messages emitted while converting. None of them stop a conversion on their own.

use derive_more::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
/// Socket categories handled by the resolvers.
pub enum Category {
    #[allow(missing_docs)]
    #[display(fmt = "shader")]
    Shader,
    #[allow(missing_docs)]
    #[display(fmt = "color")]
    Color,
    #[allow(missing_docs)]
    #[display(fmt = "value")]
    Value,
    #[allow(missing_docs)]
    #[display(fmt = "vector")]
    Vector,
}

#[derive(Clone, Debug, PartialEq, Display)]
/// Something the converter could not map faithfully.
pub enum Diagnostic {
    /// The material's tree is empty.
    #[display(fmt = "No nodes found for material {}, bailing out", _0)]
    NoNodes(String),

    /// The material's tree has no `Material Output` node.
    #[display(fmt = "No Material Output node found in tree for {}, bailing out", _0)]
    NoOutputNode(String),

    /// The output node's `Surface` input is missing or unlinked.
    #[display(fmt = "Surface input of {} is not linked, bailing out", _0)]
    UnlinkedSurface(String),

    /// Shader node type without mapping, replaced by the fallback shader.
    #[display(fmt = "Unknown shader node of type {}, maybe fix.", _0)]
    UnknownShader(String),

    /// Color producer without mapping, replaced by the fallback color.
    #[display(fmt = "Unknown color node of type {}, maybe fix.", _0)]
    UnknownColor(String),

    /// Value producer without mapping, left out.
    #[display(fmt = "Unknown value node of type {}, maybe fix.", _0)]
    UnknownValue(String),

    /// Vector producer without mapping, left out.
    #[display(fmt = "Unknown vector node of type {}, maybe fix.", _0)]
    UnknownVector(String),

    /// A mapped node lacks one of the inputs it is converted from.
    #[display(fmt = "Node of type {} has no {} input", node_type, input)]
    MissingInput {
        #[allow(missing_docs)]
        node_type: String,
        #[allow(missing_docs)]
        input: String,
    },

    /// An unlinked socket carries no literal of the expected shape.
    #[display(fmt = "{} socket {} of type {} has no usable default value", category, socket, socket_type)]
    MalformedDefault {
        #[allow(missing_docs)]
        category: Category,
        #[allow(missing_docs)]
        socket: String,
        #[allow(missing_docs)]
        socket_type: String,
    },

    /// The chain of links is longer than allowed, most likely a cycle.
    #[display(fmt = "Gave up on a {} link chain deeper than {}", category, limit)]
    DepthExceeded {
        #[allow(missing_docs)]
        category: Category,
        #[allow(missing_docs)]
        limit: usize,
    },
}

impl Diagnostic {
    /// Category whose resolution produced the diagnostic, [None] for structural ones.
    pub fn category(&self) -> Option<Category> {
        match self {
            Diagnostic::NoNodes(_) | Diagnostic::NoOutputNode(_) | Diagnostic::UnlinkedSurface(_) => None,
            Diagnostic::UnknownShader(_) | Diagnostic::MissingInput { .. } => Some(Category::Shader),
            Diagnostic::UnknownColor(_) => Some(Category::Color),
            Diagnostic::UnknownValue(_) => Some(Category::Value),
            Diagnostic::UnknownVector(_) => Some(Category::Vector),
            Diagnostic::MalformedDefault { category, .. }
            | Diagnostic::DepthExceeded { category, .. } => Some(*category),
        }
    }
}
