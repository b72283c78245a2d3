//! Renderer-side node descriptors.
//!
//! Every descriptor is a plain tree of owned values. Serialized form mirrors the renderer's
//! `type` + `arg` unions, e.g. `{"type": "constant", "arg": 0.5}`.
//!
//! Value and vector parameter slots are optional: an absent slot leaves the choice of a default
//! to the renderer. Color and shader slots always hold a node.

use crate::{color::Color, vector::Vector};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "arg", rename_all = "snake_case")]
/// Surface scattering model.
pub enum ShaderNode {
    /// Lambertian reflection.
    Diffuse {
        #[allow(missing_docs)]
        color: ColorNode,
    },
    /// Conductor with microfacet roughness.
    Metal {
        #[allow(missing_docs)]
        color: ColorNode,
        #[allow(missing_docs)]
        roughness: Option<ValueNode>,
    },
    /// Dielectric with reflection and refraction.
    Glass {
        #[allow(missing_docs)]
        color: ColorNode,
        #[allow(missing_docs)]
        roughness: Option<ValueNode>,
        #[allow(missing_docs)]
        ior: Option<ValueNode>,
    },
    /// Diffuse base under a dielectric coating.
    Plastic {
        #[allow(missing_docs)]
        color: ColorNode,
        #[allow(missing_docs)]
        roughness: Option<ValueNode>,
        #[allow(missing_docs)]
        ior: Option<ValueNode>,
    },
    /// Picks `a` or `b` with probability `factor`.
    Mix {
        #[allow(missing_docs)]
        a: Box<ShaderNode>,
        #[allow(missing_docs)]
        b: Box<ShaderNode>,
        #[allow(missing_docs)]
        factor: Option<ValueNode>,
    },
    /// Sum of two shaders.
    Add {
        #[allow(missing_docs)]
        a: Box<ShaderNode>,
        #[allow(missing_docs)]
        b: Box<ShaderNode>,
    },
    /// Rays continue straight through, tinted by `color`.
    Transparent {
        #[allow(missing_docs)]
        color: ColorNode,
    },
    /// Light source.
    Emissive {
        #[allow(missing_docs)]
        color: ColorNode,
        #[allow(missing_docs)]
        strength: Option<ValueNode>,
    },
    /// Diffuse transmission.
    Translucent {
        #[allow(missing_docs)]
        color: ColorNode,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Sampling flags of an [ColorNode::Image].
pub struct ImageOptions {
    /// Convert texels from sRGB to linear.
    pub srgb_transform: bool,
    /// Nearest-neighbour sampling.
    pub no_bilinear: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "arg", rename_all = "snake_case")]
/// Color producing node.
pub enum ColorNode {
    /// Fixed color.
    Constant(Color),
    /// Texture lookup.
    Image {
        /// Absolute path to the texture file.
        full_path: String,
        #[allow(missing_docs)]
        options: ImageOptions,
    },
    /// Alternating `a` and `b` squares, `scale` squares per unit.
    Checkerboard {
        #[allow(missing_docs)]
        a: Box<ColorNode>,
        #[allow(missing_docs)]
        b: Box<ColorNode>,
        #[allow(missing_docs)]
        scale: Option<Box<ValueNode>>,
    },
    /// Black body emission color for a temperature in kelvin.
    Blackbody {
        #[allow(missing_docs)]
        degrees: Option<Box<ValueNode>>,
    },
    /// Grey color from a single value.
    Split {
        #[allow(missing_docs)]
        node: Option<Box<ValueNode>>,
    },
    /// Color from separate channels.
    Rgb {
        #[allow(missing_docs)]
        red: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        green: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        blue: Option<Box<ValueNode>>,
    },
    /// Color from hue, saturation and lightness.
    Hsl {
        #[allow(missing_docs)]
        h: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        s: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        l: Option<Box<ValueNode>>,
    },
    /// Vector components reinterpreted as a color.
    VecToColor {
        #[allow(missing_docs)]
        vec: Option<Box<VectorNode>>,
    },
}

impl ColorNode {
    /// Shorthand for a [ColorNode::Constant], components taken positionally.
    pub fn constant(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::Constant(Color::new(r, g, b, a))
    }

    /// Shorthand for a [ColorNode::Checkerboard].
    pub fn checkerboard(a: ColorNode, b: ColorNode, scale: ValueNode) -> Self {
        Self::Checkerboard {
            a: Box::new(a),
            b: Box::new(b),
            scale: Some(Box::new(scale)),
        }
    }
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Scalar operators of [ValueNode::Math].
pub enum MathOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Log,
    SquareRoot,
    InvSquareRoot,
    Absolute,
    Min,
    Max,
    LessThan,
    GreaterThan,
    Sign,
    Compare,
    Round,
    Floor,
    Ceil,
    Truncate,
    Fraction,
    Modulo,
    Sine,
    Cosine,
    Tangent,
    ToRadians,
    ToDegrees,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Component picked by [ValueNode::VecToValue].
pub enum VecComponent {
    X,
    Y,
    Z,
    U,
    V,
    F,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "arg", rename_all = "snake_case")]
/// Scalar producing node.
pub enum ValueNode {
    /// Fixed value.
    Constant(f32),
    /// Fresnel reflectance for an IOR around a normal.
    Fresnel {
        #[allow(missing_docs)]
        ior: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        normal: Option<Box<VectorNode>>,
    },
    /// Linear remap of `input_value` from one range to another.
    MapRange {
        #[allow(missing_docs)]
        input_value: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        from_min: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        from_max: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        to_min: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        to_max: Option<Box<ValueNode>>,
    },
    /// Distance travelled by the current ray.
    Raylength,
    /// Alpha channel of a color.
    Alpha {
        #[allow(missing_docs)]
        color: Box<ColorNode>,
    },
    /// Single component of a vector.
    VecToValue {
        #[allow(missing_docs)]
        vec: Option<Box<VectorNode>>,
        #[allow(missing_docs)]
        comp: VecComponent,
    },
    /// Binary or unary scalar math, unary operators ignore `b`.
    Math {
        #[allow(missing_docs)]
        a: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        b: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        op: MathOp,
    },
    /// Luminance of a color.
    Grayscale {
        #[allow(missing_docs)]
        color: Box<ColorNode>,
    },
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Vector operators of [VectorNode::VecMath].
pub enum VecOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Cross,
    Reflect,
    Refract,
    Dot,
    Distance,
    Length,
    Scale,
    Normalize,
    Wrap,
    Floor,
    Ceil,
    Modulo,
    Abs,
    Min,
    Max,
    Sin,
    Cos,
    Tan,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "arg", rename_all = "snake_case")]
/// Vector producing node.
pub enum VectorNode {
    /// Fixed vector.
    Constant(Vector),
    /// Shading normal at the hit point.
    Normal,
    /// Texture coordinates at the hit point.
    Uv,
    /// Vector math, `c` and `f` are only read by the operators needing them.
    VecMath {
        #[allow(missing_docs)]
        a: Option<Box<VectorNode>>,
        #[allow(missing_docs)]
        b: Option<Box<VectorNode>>,
        #[allow(missing_docs)]
        c: Option<Box<VectorNode>>,
        #[allow(missing_docs)]
        f: Option<Box<ValueNode>>,
        #[allow(missing_docs)]
        op: VecOp,
    },
    /// Linear blend between `a` and `b`.
    Mix {
        #[allow(missing_docs)]
        a: Option<Box<VectorNode>>,
        #[allow(missing_docs)]
        b: Option<Box<VectorNode>>,
        #[allow(missing_docs)]
        factor: Option<Box<ValueNode>>,
    },
}

impl VectorNode {
    /// Shorthand for a [VectorNode::Constant].
    pub fn constant(x: f32, y: f32, z: f32) -> Self {
        Self::Constant(Vector::new(x, y, z))
    }
}
