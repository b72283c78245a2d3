//! Host type tags understood by the resolvers.
//!
//! Every category is a closed enumeration parsed from the host's string identifier. Parsing
//! failure is the "unknown type" arm of each dispatch.

use std::{fmt, str::FromStr};

/// Name of the node every conversion starts from.
pub const OUTPUT_NODE: &str = "Material Output";

/// Input socket names read by the converter.
pub mod input {
    /// Shader input of the output node.
    pub const SURFACE: &str = "Surface";
    /// Base color of a BSDF.
    pub const COLOR: &str = "Color";
    /// Microfacet roughness of a BSDF.
    pub const ROUGHNESS: &str = "Roughness";
    /// Index of refraction of a BSDF.
    pub const IOR: &str = "IOR";
}

macro_rules! type_tags {
    { $($(#[$attr:meta])* $tags:ident { $($(#[$vattr:meta])* $variant:ident => $tag:literal),+ $(,)? })+ } => {
        $(
            $(#[$attr])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
            pub enum $tags {
                $(
                    $(#[$vattr])*
                    $variant,
                )+
            }

            impl $tags {
                /// Host identifier of the tag.
                pub fn as_str(&self) -> &'static str {
                    match self {
                        $(Self::$variant => $tag,)+
                    }
                }
            }

            impl FromStr for $tags {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Ok(match s {
                        $($tag => Self::$variant,)+
                        other => Err(format!("Unrecognized {} `{other}`.", stringify!($tags)))?,
                    })
                }
            }

            impl fmt::Display for $tags {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

type_tags! {
    /// Shader-producing node types.
    ShaderType {
        /// Lambertian BSDF.
        Diffuse => "ShaderNodeBsdfDiffuse",
        /// Dielectric BSDF.
        Glass => "ShaderNodeBsdfGlass",
        /// Straight pass-through BSDF.
        Transparent => "ShaderNodeBsdfTransparent",
        /// Diffuse transmission BSDF.
        Translucent => "ShaderNodeBsdfTranslucent",
    }

    /// Color socket types.
    ColorSocket {
        /// RGBA color.
        Color => "NodeSocketColor",
    }

    /// Scalar socket types.
    ValueSocket {
        /// Plain float.
        Float => "NodeSocketFloat",
        /// Float restricted to [0, 1] by the host, resolved like [ValueSocket::Float].
        Factor => "NodeSocketFloatFactor",
    }

    /// Vector socket types.
    VectorSocket {
        /// 3D vector.
        Vector => "NodeSocketVector",
    }
}
