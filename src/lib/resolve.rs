//! Recursive translation of source sockets and nodes into renderer descriptors.
//!
//! Every resolver dispatches on a type tag through a closed enumeration and always returns:
//! - shaders and colors degrade to the [fallback](crate::fallback) nodes,
//! - values and vectors degrade to [None], leaving the slot to the renderer's default.
//!
//! Each degradation is reported as a [Diagnostic].

use crate::{
    color::Color,
    convert::Options,
    diagnostic::{Category, Diagnostic},
    fallback::{FALLBACK_COLOR, FALLBACK_SHADER},
    source::NodeGraph,
    tags::{input, ColorSocket, ShaderType, ValueSocket, VectorSocket},
    target::{ColorNode, ShaderNode, ValueNode, VectorNode},
    vector::Vector,
};

use std::str::FromStr;

/// Single-use resolution pass over a [NodeGraph], collecting diagnostics.
pub struct Resolver<'g, G: NodeGraph> {
    graph: &'g G,
    max_depth: usize,
    depth: usize,
    deepest: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'g, G: NodeGraph> Resolver<'g, G> {
    /// Create a resolver reading from `graph`.
    pub fn new(graph: &'g G, options: &Options) -> Self {
        Self {
            graph,
            max_depth: options.max_depth,
            depth: 0,
            deepest: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics emitted so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Longest chain of links followed so far.
    pub fn deepest(&self) -> usize {
        self.deepest
    }

    /// Consume the resolver, returning its diagnostics and deepest link chain.
    pub fn finish(self) -> (Vec<Diagnostic>, usize) {
        (self.diagnostics, self.deepest)
    }

    /// Log and record a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Run `f` one link further upstream, or give up if the chain is already too long.
    fn descend<T>(&mut self, category: Category, f: impl FnOnce(&mut Self) -> T) -> Option<T> {
        if self.depth >= self.max_depth {
            self.report(Diagnostic::DepthExceeded {
                category,
                limit: self.max_depth,
            });
            return None;
        }

        self.depth += 1;
        self.deepest = self.deepest.max(self.depth);
        let res = f(self);
        self.depth -= 1;

        Some(res)
    }

    fn malformed(&mut self, category: Category, socket: G::Socket) {
        let graph = self.graph;
        self.report(Diagnostic::MalformedDefault {
            category,
            socket: graph.socket_name(socket).to_owned(),
            socket_type: graph.socket_type(socket).to_owned(),
        });
    }

    fn missing_input(&mut self, node: G::Node, name: &str) {
        let graph = self.graph;
        self.report(Diagnostic::MissingInput {
            node_type: graph.node_type(node).to_owned(),
            input: name.to_owned(),
        });
    }

    /// Input of `node` a link is followed through: the one named `through`, else the first one
    /// whose type tag parses as `T`.
    fn pass_through<T: FromStr>(&self, node: G::Node, through: &str) -> Option<G::Socket> {
        let graph = self.graph;

        graph.input(node, through).or_else(|| {
            graph
                .inputs(node)
                .into_iter()
                .find(|&socket| graph.socket_type(socket).parse::<T>().is_ok())
        })
    }

    /// Translate a shader-producing node.
    pub fn resolve_shader(&mut self, node: G::Node) -> ShaderNode {
        let graph = self.graph;
        let tag = graph.node_type(node);
        log::debug!("Resolving shader node of type {tag}");

        match tag.parse::<ShaderType>() {
            // Roughness and normal have no counterpart.
            Ok(ShaderType::Diffuse) => ShaderNode::Diffuse {
                color: self.color_input(node, input::COLOR),
            },
            // Normal has no counterpart.
            Ok(ShaderType::Glass) => ShaderNode::Glass {
                color: self.color_input(node, input::COLOR),
                roughness: self.value_input(node, input::ROUGHNESS),
                ior: self.value_input(node, input::IOR),
            },
            Ok(ShaderType::Transparent) => ShaderNode::Transparent {
                color: self.color_input(node, input::COLOR),
            },
            Ok(ShaderType::Translucent) => ShaderNode::Translucent {
                color: self.color_input(node, input::COLOR),
            },
            Err(_) => {
                self.report(Diagnostic::UnknownShader(tag.to_owned()));
                FALLBACK_SHADER.clone()
            }
        }
    }

    fn color_input(&mut self, node: G::Node, name: &str) -> ColorNode {
        match self.graph.input(node, name) {
            Some(socket) => self.resolve_color(socket),
            None => {
                self.missing_input(node, name);
                FALLBACK_COLOR.clone()
            }
        }
    }

    fn value_input(&mut self, node: G::Node, name: &str) -> Option<ValueNode> {
        match self.graph.input(node, name) {
            Some(socket) => self.resolve_value(socket),
            None => {
                self.missing_input(node, name);
                None
            }
        }
    }

    /// Translate a color socket, following its first link if any.
    pub fn resolve_color(&mut self, socket: G::Socket) -> ColorNode {
        let graph = self.graph;
        let tag = graph.socket_type(socket);

        match tag.parse::<ColorSocket>() {
            Ok(ColorSocket::Color) => match graph.first_link(socket) {
                Some(upstream) => {
                    let through = graph.socket_name(socket);
                    self.descend(Category::Color, |this| {
                        this.color_producer(upstream, through)
                    })
                    .unwrap_or_else(|| FALLBACK_COLOR.clone())
                }
                None => match graph.default_value(socket).and_then(|v| v.as_color()) {
                    Some([c0, c1, c2, c3]) => ColorNode::Constant(Color::new(c0, c1, c2, c3)),
                    None => {
                        self.malformed(Category::Color, socket);
                        FALLBACK_COLOR.clone()
                    }
                },
            },
            Err(_) => {
                self.report(Diagnostic::UnknownColor(tag.to_owned()));
                FALLBACK_COLOR.clone()
            }
        }
    }

    /// Upstream node reached through a color link. It passes one of its own color inputs on, or
    /// is itself an unknown producer.
    fn color_producer(&mut self, node: G::Node, through: &str) -> ColorNode {
        let graph = self.graph;

        match self.pass_through::<ColorSocket>(node, through) {
            Some(socket) => self.resolve_color(socket),
            None => {
                self.report(Diagnostic::UnknownColor(graph.node_type(node).to_owned()));
                FALLBACK_COLOR.clone()
            }
        }
    }

    /// Translate a float or factor socket, following its first link if any.
    pub fn resolve_value(&mut self, socket: G::Socket) -> Option<ValueNode> {
        let graph = self.graph;
        let tag = graph.socket_type(socket);

        match tag.parse::<ValueSocket>() {
            Ok(ValueSocket::Float | ValueSocket::Factor) => match graph.first_link(socket) {
                Some(upstream) => {
                    let through = graph.socket_name(socket);
                    self.descend(Category::Value, |this| {
                        this.value_producer(upstream, through)
                    })
                    .flatten()
                }
                None => match graph.default_value(socket).and_then(|v| v.as_float()) {
                    Some(value) => Some(ValueNode::Constant(value)),
                    None => {
                        self.malformed(Category::Value, socket);
                        None
                    }
                },
            },
            Err(_) => {
                self.report(Diagnostic::UnknownValue(tag.to_owned()));
                None
            }
        }
    }

    fn value_producer(&mut self, node: G::Node, through: &str) -> Option<ValueNode> {
        let graph = self.graph;

        match self.pass_through::<ValueSocket>(node, through) {
            Some(socket) => self.resolve_value(socket),
            None => {
                self.report(Diagnostic::UnknownValue(graph.node_type(node).to_owned()));
                None
            }
        }
    }

    /// Translate a vector socket, following its first link if any.
    pub fn resolve_vector(&mut self, socket: G::Socket) -> Option<VectorNode> {
        let graph = self.graph;
        let tag = graph.socket_type(socket);

        match tag.parse::<VectorSocket>() {
            Ok(VectorSocket::Vector) => match graph.first_link(socket) {
                Some(upstream) => {
                    let through = graph.socket_name(socket);
                    self.descend(Category::Vector, |this| {
                        this.vector_producer(upstream, through)
                    })
                    .flatten()
                }
                None => match graph.default_value(socket).and_then(|v| v.as_vector()) {
                    Some(vec) => Some(VectorNode::Constant(Vector::from(vec))),
                    None => {
                        self.malformed(Category::Vector, socket);
                        None
                    }
                },
            },
            Err(_) => {
                self.report(Diagnostic::UnknownVector(tag.to_owned()));
                None
            }
        }
    }

    fn vector_producer(&mut self, node: G::Node, through: &str) -> Option<VectorNode> {
        let graph = self.graph;

        match self.pass_through::<VectorSocket>(node, through) {
            Some(socket) => self.resolve_vector(socket),
            None => {
                self.report(Diagnostic::UnknownVector(graph.node_type(node).to_owned()));
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{
        node, socket,
        source::{
            tree::{NodeTree, SocketIndex},
            DefaultValue,
        },
        tree, Validated,
    };

    use float_eq::assert_float_eq;

    fn validated(tree: NodeTree<crate::Unvalidated>) -> NodeTree<Validated> {
        tree.validate().unwrap()
    }

    fn socket_of(tree: &NodeTree<Validated>, node: &str, input: &str) -> SocketIndex {
        tree.input(tree.node(node).unwrap(), input).unwrap()
    }

    fn sockets() -> NodeTree<Validated> {
        validated(tree! {
            "Glass BSDF": node!("ShaderNodeBsdfGlass",
                "Color": socket!("NodeSocketColor" = [1f32, 0.2, 0.3, 0.4]),
                "Roughness": socket!("NodeSocketFloatFactor" = 0.1f32),
                "IOR": socket!("NodeSocketFloat" = 1.45f32),
                "Normal": socket!("NodeSocketVector" = [0f32, 0., 1.]),
                "Weight": socket!("NodeSocketInt" = 2f32),
                "Tint": socket!("NodeSocketColorRamp" = [0f32, 0., 0., 1.]),
                "Broken": socket!("NodeSocketColor" = 0.5f32),
                "Loose": socket!("NodeSocketFloat" = [0f32, 0., 1.]),
                "Flat": socket!("NodeSocketVector" = 1f32)),
        })
    }

    #[cfg(test)]
    mod constants {
        use super::*;

        #[test]
        fn color_positional() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_color(socket_of(&tree, "Glass BSDF", "Color"));

            assert_eq!(got, ColorNode::Constant(Color::new(1., 0.2, 0.3, 0.4)));
            assert!(resolver.diagnostics().is_empty());
        }

        #[test]
        fn float_and_factor() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());

            let Some(ValueNode::Constant(roughness)) =
                resolver.resolve_value(socket_of(&tree, "Glass BSDF", "Roughness"))
            else {
                panic!("Factor socket did not resolve to a constant");
            };
            let Some(ValueNode::Constant(ior)) =
                resolver.resolve_value(socket_of(&tree, "Glass BSDF", "IOR"))
            else {
                panic!("Float socket did not resolve to a constant");
            };

            assert_float_eq!(roughness, 0.1, abs <= 0.000_1);
            assert_float_eq!(ior, 1.45, abs <= 0.000_1);
            assert!(resolver.diagnostics().is_empty());
        }

        #[test]
        fn vector() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_vector(socket_of(&tree, "Glass BSDF", "Normal"));

            assert_eq!(got, Some(VectorNode::constant(0., 0., 1.)));
            assert_eq!(resolver.deepest(), 0);
        }

        #[test]
        fn idempotent() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());
            let color = socket_of(&tree, "Glass BSDF", "Color");

            let first = resolver.resolve_color(color);
            let second = resolver.resolve_color(color);

            assert_eq!(first, second);
        }

        #[test]
        fn malformed_default() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_color(socket_of(&tree, "Glass BSDF", "Broken"));

            assert_eq!(got, *FALLBACK_COLOR);
            assert_eq!(
                resolver.diagnostics(),
                &[Diagnostic::MalformedDefault {
                    category: Category::Color,
                    socket: "Broken".to_owned(),
                    socket_type: "NodeSocketColor".to_owned(),
                }]
            );
        }

        #[test]
        fn malformed_value_and_vector() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());

            assert_eq!(
                resolver.resolve_value(socket_of(&tree, "Glass BSDF", "Loose")),
                None
            );
            assert_eq!(
                resolver.resolve_vector(socket_of(&tree, "Glass BSDF", "Flat")),
                None
            );
            assert_eq!(
                resolver.diagnostics(),
                &[
                    Diagnostic::MalformedDefault {
                        category: Category::Value,
                        socket: "Loose".to_owned(),
                        socket_type: "NodeSocketFloat".to_owned(),
                    },
                    Diagnostic::MalformedDefault {
                        category: Category::Vector,
                        socket: "Flat".to_owned(),
                        socket_type: "NodeSocketVector".to_owned(),
                    },
                ]
            );
        }
    }

    #[cfg(test)]
    mod unknown {
        use super::*;

        #[test]
        fn color_falls_back() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_color(socket_of(&tree, "Glass BSDF", "Tint"));

            assert_eq!(got, *FALLBACK_COLOR);
            assert_eq!(
                resolver.diagnostics(),
                &[Diagnostic::UnknownColor("NodeSocketColorRamp".to_owned())]
            );
        }

        #[test]
        fn value_left_out() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_value(socket_of(&tree, "Glass BSDF", "Weight"));

            assert_eq!(got, None);
            assert_eq!(
                resolver.diagnostics(),
                &[Diagnostic::UnknownValue("NodeSocketInt".to_owned())]
            );
        }

        #[test]
        fn vector_left_out() {
            let tree = sockets();
            let mut resolver = Resolver::new(&tree, &Options::default());

            // Color socket read with vector rules
            let got = resolver.resolve_vector(socket_of(&tree, "Glass BSDF", "Color"));

            assert_eq!(got, None);
            assert_eq!(
                resolver.diagnostics(),
                &[Diagnostic::UnknownVector("NodeSocketColor".to_owned())]
            );
        }

        #[test]
        fn shader_falls_back() {
            let tree = validated(tree! {
                "Principled BSDF": node!("ShaderNodeBsdfPrincipled",
                    "Base Color": socket!("NodeSocketColor" = [1f32, 1., 1., 1.])),
            });
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_shader(tree.node("Principled BSDF").unwrap());

            assert_eq!(got, *FALLBACK_SHADER);
            assert_eq!(
                resolver.diagnostics(),
                &[Diagnostic::UnknownShader("ShaderNodeBsdfPrincipled".to_owned())]
            );
        }

        #[test]
        fn producer_without_matching_input() {
            let tree = validated(tree! {
                "Diffuse BSDF": node!("ShaderNodeBsdfDiffuse",
                    "Color": socket!("NodeSocketColor" from "Image Texture" "Color")),
                "Image Texture": node!("ShaderNodeTexImage",
                    "Vector": socket!("NodeSocketVector" = [0f32, 0., 0.])),
            });
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_shader(tree.node("Diffuse BSDF").unwrap());

            assert_eq!(
                got,
                ShaderNode::Diffuse {
                    color: FALLBACK_COLOR.clone()
                }
            );
            assert_eq!(
                resolver.diagnostics(),
                &[Diagnostic::UnknownColor("ShaderNodeTexImage".to_owned())]
            );
        }

        #[test]
        fn missing_inputs() {
            let tree = validated(tree! {
                "Glass BSDF": node!("ShaderNodeBsdfGlass",
                    "Roughness": socket!("NodeSocketFloatFactor" = 0.1f32)),
            });
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_shader(tree.node("Glass BSDF").unwrap());

            assert_eq!(
                got,
                ShaderNode::Glass {
                    color: FALLBACK_COLOR.clone(),
                    roughness: Some(ValueNode::Constant(0.1)),
                    ior: None,
                }
            );
            assert_eq!(resolver.diagnostics().len(), 2);
            assert!(resolver
                .diagnostics()
                .iter()
                .all(|diagnostic| matches!(diagnostic, Diagnostic::MissingInput { .. })));
        }
    }

    #[cfg(test)]
    mod links {
        use super::*;

        #[test]
        fn pass_through_chain() {
            let tree = validated(tree! {
                "Translucent BSDF": node!("ShaderNodeBsdfTranslucent",
                    "Color": socket!("NodeSocketColor" from "Reroute" "Output")),
                "Reroute": node!("NodeReroute",
                    "Input": socket!("NodeSocketColor" from "Reroute.001" "Output")),
                "Reroute.001": node!("NodeReroute",
                    "Input": socket!("NodeSocketColor" from "Reroute.002" "Output")),
                "Reroute.002": node!("NodeReroute",
                    "Input": socket!("NodeSocketColor" = [0.5f32, 0.25, 0.125, 1.])),
            });
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_shader(tree.node("Translucent BSDF").unwrap());

            assert_eq!(
                got,
                ShaderNode::Translucent {
                    color: ColorNode::constant(0.5, 0.25, 0.125, 1.)
                }
            );
            assert_eq!(resolver.deepest(), 3);
            assert!(resolver.diagnostics().is_empty());
        }

        #[test]
        fn same_name_before_same_category() {
            let tree = validated(tree! {
                "Diffuse BSDF": node!("ShaderNodeBsdfDiffuse",
                    "Color": socket!("NodeSocketColor" from "Group" "Color")),
                "Group": node!("NodeGroupInput",
                    "Tint": socket!("NodeSocketColor" = [1f32, 0., 0., 1.]),
                    "Color": socket!("NodeSocketColor" = [0f32, 0., 1., 1.])),
            });
            let mut resolver = Resolver::new(&tree, &Options::default());

            let got = resolver.resolve_color(socket_of(&tree, "Diffuse BSDF", "Color"));

            assert_eq!(got, ColorNode::constant(0., 0., 1., 1.));
        }

        #[test]
        fn value_and_vector_through_reroutes() {
            let tree = validated(tree! {
                "Glass BSDF": node!("ShaderNodeBsdfGlass",
                    "IOR": socket!("NodeSocketFloat" from "Reroute" "Output"),
                    "Normal": socket!("NodeSocketVector" from "Reroute.001" "Output")),
                "Reroute": node!("NodeReroute",
                    "Input": socket!("NodeSocketFloatFactor" = 1.33f32)),
                "Reroute.001": node!("NodeReroute",
                    "Input": socket!("NodeSocketVector" = [0f32, 0., 1.])),
            });
            let mut resolver = Resolver::new(&tree, &Options::default());

            assert_eq!(
                resolver.resolve_value(socket_of(&tree, "Glass BSDF", "IOR")),
                Some(ValueNode::Constant(1.33))
            );
            assert_eq!(
                resolver.resolve_vector(socket_of(&tree, "Glass BSDF", "Normal")),
                Some(VectorNode::constant(0., 0., 1.))
            );
            assert!(resolver.diagnostics().is_empty());
        }

        #[test]
        fn linked_value_and_vector() {
            let tree = validated(tree! {
                "Glass BSDF": node!("ShaderNodeBsdfGlass",
                    "IOR": socket!("NodeSocketFloat" from "Group" "IOR"),
                    "Normal": socket!("NodeSocketVector" from "Group" "Normal")),
                "Group": node!("NodeGroupInput",
                    "IOR": socket!("NodeSocketFloatFactor" = 1.5f32),
                    "Normal": socket!("NodeSocketVector" = [0f32, 1., 0.])),
            });
            let mut resolver = Resolver::new(&tree, &Options::default());

            assert_eq!(
                resolver.resolve_value(socket_of(&tree, "Glass BSDF", "IOR")),
                Some(ValueNode::Constant(1.5))
            );
            assert_eq!(
                resolver.resolve_vector(socket_of(&tree, "Glass BSDF", "Normal")),
                Some(VectorNode::constant(0., 1., 0.))
            );
            assert_eq!(resolver.deepest(), 1);
            assert!(resolver.diagnostics().is_empty());
        }

        #[test]
        fn value_producer_unknown() {
            let tree = validated(tree! {
                "Glass BSDF": node!("ShaderNodeBsdfGlass",
                    "IOR": socket!("NodeSocketFloat" from "Separate XYZ" "X")),
                "Separate XYZ": node!("ShaderNodeSeparateXYZ",
                    "Vector": socket!("NodeSocketVector" = [1f32, 0., 0.])),
            });
            let mut resolver = Resolver::new(&tree, &Options::default());

            // No `IOR` input and no value input at all
            let got = resolver.resolve_value(socket_of(&tree, "Glass BSDF", "IOR"));

            assert_eq!(got, None);
            assert_eq!(
                resolver.diagnostics(),
                &[Diagnostic::UnknownValue("ShaderNodeSeparateXYZ".to_owned())]
            );
        }
    }

    #[cfg(test)]
    mod depth_guard {
        use super::*;

        /// Single node whose only input, of the given type, links back to itself.
        struct Loop(&'static str);

        impl NodeGraph for Loop {
            type Node = ();
            type Socket = ();

            fn len(&self) -> usize {
                1
            }

            fn node(&self, name: &str) -> Option<()> {
                (name == "Loop").then_some(())
            }

            fn node_type(&self, _node: ()) -> &str {
                "NodeReroute"
            }

            fn input(&self, _node: (), name: &str) -> Option<()> {
                (name == "Input").then_some(())
            }

            fn inputs(&self, _node: ()) -> Vec<()> {
                vec![()]
            }

            fn socket_name(&self, _socket: ()) -> &str {
                "Input"
            }

            fn socket_type(&self, _socket: ()) -> &str {
                self.0
            }

            fn first_link(&self, _socket: ()) -> Option<()> {
                Some(())
            }

            fn default_value(&self, _socket: ()) -> Option<DefaultValue> {
                None
            }
        }

        #[test]
        fn cycle_terminates() {
            let options = Options { max_depth: 16 };
            let graph = Loop("NodeSocketColor");
            let mut resolver = Resolver::new(&graph, &options);

            let got = resolver.resolve_color(());

            assert_eq!(got, *FALLBACK_COLOR);
            assert_eq!(resolver.deepest(), 16);
            assert_eq!(
                resolver.diagnostics(),
                &[Diagnostic::DepthExceeded {
                    category: Category::Color,
                    limit: 16,
                }]
            );
        }

        #[test]
        fn value_and_vector_cycles_terminate() {
            let options = Options { max_depth: 8 };

            let value = Loop("NodeSocketFloatFactor");
            let mut resolver = Resolver::new(&value, &options);
            assert_eq!(resolver.resolve_value(()), None);
            assert_eq!(
                resolver.finish(),
                (
                    vec![Diagnostic::DepthExceeded {
                        category: Category::Value,
                        limit: 8,
                    }],
                    8
                )
            );

            let vector = Loop("NodeSocketVector");
            let mut resolver = Resolver::new(&vector, &options);
            assert_eq!(resolver.resolve_vector(()), None);
            assert_eq!(
                resolver.finish(),
                (
                    vec![Diagnostic::DepthExceeded {
                        category: Category::Vector,
                        limit: 8,
                    }],
                    8
                )
            );
        }
    }
}
