//! Loud substitutes for anything the converter cannot map.
//!
//! Both are shared, callers clone them into their own results.

use crate::target::{ColorNode, ShaderNode, ValueNode};

lazy_static::lazy_static! {
    /// Red/white checkerboard at scale 100.
    pub static ref FALLBACK_COLOR: ColorNode = ColorNode::checkerboard(
        ColorNode::constant(1., 0., 0., 0.),
        ColorNode::constant(1., 1., 1., 1.),
        ValueNode::Constant(100.),
    );

    /// Diffuse shader colored with [struct@FALLBACK_COLOR].
    pub static ref FALLBACK_SHADER: ShaderNode = ShaderNode::Diffuse {
        color: FALLBACK_COLOR.clone(),
    };
}
