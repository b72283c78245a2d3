//! Entry point: walk a material's tree from its output node.

use crate::{
    diagnostic::Diagnostic,
    resolve::Resolver,
    source::{tree::Material, NodeGraph},
    tags::{input, OUTPUT_NODE},
    target::ShaderNode,
    Unvalidated,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
/// Structural problems preventing the conversion of a whole material.
pub enum Error {
    #[error("No nodes found for material `{0}`")]
    /// The tree is empty.
    NoNodes(String),

    #[error("No `Material Output` node found for material `{0}`")]
    /// There is nothing to start the walk from.
    NoOutputNode(String),

    #[error("Surface input of material `{0}` is not linked")]
    /// The output node has no shader plugged into its surface.
    UnlinkedSurface(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Conversion settings.
pub struct Options {
    /// Longest chain of links followed before giving up on a socket.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Outcome of converting one material.
pub struct Conversion {
    /// Converted surface shader, or why there is none.
    pub result: Result<ShaderNode, Error>,
    /// Everything reported along the way, in emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Longest chain of links followed.
    pub depth: usize,
}

impl Conversion {
    /// Get the converted shader if there is one.
    pub fn shader(&self) -> Option<&ShaderNode> {
        self.result.as_ref().ok()
    }

    /// Take the converted shader if there is one.
    pub fn into_shader(self) -> Option<ShaderNode> {
        self.result.ok()
    }
}

/// Convert the tree of the material named `material`, starting from its `Material Output` node.
///
/// Never fails on unsupported node types, those are replaced and reported. Only an empty tree,
/// a missing output node or an unlinked surface leave the conversion without a shader.
///
/// # Example
/// ```
/// use shadermap::{node, socket, tree, prelude::*};
///
/// let tree = tree! {
///     "Material Output": node!("ShaderNodeOutputMaterial",
///         "Surface": socket!("NodeSocketShader" from "Diffuse BSDF" "BSDF")),
///     "Diffuse BSDF": node!("ShaderNodeBsdfDiffuse",
///         "Color": socket!("NodeSocketColor" = [1f32, 0.2, 0.3, 0.4])),
/// }
/// .validate()
/// .unwrap();
///
/// let conversion = convert_node_tree("Clay", &tree, &Options::default());
///
/// assert_eq!(
///     conversion.result,
///     Ok(ShaderNode::Diffuse { color: ColorNode::constant(1., 0.2, 0.3, 0.4) })
/// );
/// assert!(conversion.diagnostics.is_empty());
/// ```
pub fn convert_node_tree<G: NodeGraph>(material: &str, graph: &G, options: &Options) -> Conversion {
    log::debug!("Converting material {material} ({} nodes)", graph.len());

    let mut resolver = Resolver::new(graph, options);
    let result = walk(material, graph, &mut resolver);
    let (diagnostics, depth) = resolver.finish();

    Conversion {
        result,
        diagnostics,
        depth,
    }
}

/// Validate and convert every material of a host export, keyed by material name.
///
/// Materials that fail validation or have no convertible surface map to [None]. When several
/// materials share a name, the last one wins.
pub fn convert_materials(
    materials: Vec<Material<Unvalidated>>,
    options: &Options,
) -> BTreeMap<String, Option<ShaderNode>> {
    let mut converted = BTreeMap::new();

    for material in materials {
        let name = material.name.clone();
        log::debug!("Validating material {name} ({} nodes)", material.node_tree.len());

        let shader = match material.validate() {
            Ok(material) => {
                let conversion = material.convert(options);
                if let Err(err) = &conversion.result {
                    log::info!("Skipping material {name}: {err}");
                }

                let mut replaced = BTreeMap::new();
                for category in conversion.diagnostics.iter().filter_map(Diagnostic::category) {
                    *replaced.entry(category).or_insert(0usize) += 1;
                }
                for (category, count) in replaced {
                    log::info!("Material {name}: {count} {category} node(s) replaced or left out");
                }

                conversion.into_shader()
            }
            Err(err) => {
                log::error!("Invalid node tree for material {name}: {err}");
                None
            }
        };

        if converted.insert(name.clone(), shader).is_some() {
            log::warn!("Material name {name} is used more than once, keeping the last one");
        }
    }

    converted
}

fn walk<G: NodeGraph>(
    material: &str,
    graph: &G,
    resolver: &mut Resolver<'_, G>,
) -> Result<ShaderNode, Error> {
    if graph.is_empty() {
        resolver.report(Diagnostic::NoNodes(material.to_owned()));
        return Err(Error::NoNodes(material.to_owned()));
    }

    let Some(output) = graph.node(OUTPUT_NODE) else {
        resolver.report(Diagnostic::NoOutputNode(material.to_owned()));
        return Err(Error::NoOutputNode(material.to_owned()));
    };

    let Some(surface) = graph
        .input(output, input::SURFACE)
        .and_then(|socket| graph.first_link(socket))
    else {
        resolver.report(Diagnostic::UnlinkedSurface(material.to_owned()));
        return Err(Error::UnlinkedSurface(material.to_owned()));
    };

    Ok(resolver.resolve_shader(surface))
}
