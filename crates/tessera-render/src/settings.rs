// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration of a renderable.

use crate::error::RenderableError;
use serde::{Deserialize, Serialize};
use tessera_core::math::LinearRgba;

/// Decides when the tangent basis is generated during `initialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TangentGate {
    /// Generate whenever the material table is non-empty.
    #[default]
    AnyMaterial,
    /// Generate only once some bound material carries a normal map.
    NormalMapOnly,
}

/// What tangent generation does with triangles whose basis is undefined.
///
/// A triangle is degenerate when its UV edges are (nearly) parallel or zero,
/// or when its positions are collinear. The unguarded formula then yields
/// `inf`, `NaN`, or a direction dominated by rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateTangentPolicy {
    /// Substitute an orthonormal basis lying in the triangle's plane.
    #[default]
    Fallback,
    /// Store whatever the formula yields, non-finite values included.
    Propagate,
}

/// Settings fixed at construction time.
///
/// Every field has a default, so a settings document only needs to name the
/// values it changes:
///
/// ```
/// use tessera_render::{RenderableSettings, TangentGate};
///
/// let json = r#"{ "tangent_gate": "normal_map_only" }"#;
/// let settings = RenderableSettings::from_json(json).unwrap();
/// assert_eq!(settings.tangent_gate, TangentGate::NormalMapOnly);
/// assert!(settings.label.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderableSettings {
    /// Prefix for the debug labels of the GPU buffers.
    pub label: Option<String>,
    /// Tint passed to the shaders.
    pub output_color: LinearRgba,
    /// When to generate tangents.
    pub tangent_gate: TangentGate,
    /// How to treat degenerate triangles during tangent generation.
    pub degenerate_tangents: DegenerateTangentPolicy,
}

impl RenderableSettings {
    /// Creates default settings with the given tint.
    pub fn with_color(output_color: LinearRgba) -> Self {
        Self {
            output_color,
            ..Self::default()
        }
    }

    /// Parses settings from a JSON document.
    pub fn from_json(source: &str) -> Result<Self, RenderableError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Builds the debug label of one GPU buffer.
    pub(crate) fn buffer_label(&self, suffix: &str) -> String {
        match &self.label {
            Some(label) => format!("{label} {suffix}"),
            None => format!("Renderable {suffix}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RenderableSettings::default();
        assert_eq!(settings.output_color, LinearRgba::WHITE);
        assert_eq!(settings.tangent_gate, TangentGate::AnyMaterial);
        assert_eq!(
            settings.degenerate_tangents,
            DegenerateTangentPolicy::Fallback
        );
    }

    #[test]
    fn test_full_document() {
        let settings = RenderableSettings::from_json(
            r#"{
                "label": "Crate",
                "output_color": { "r": 1.0, "g": 0.5, "b": 0.0, "a": 1.0 },
                "tangent_gate": "any_material",
                "degenerate_tangents": "propagate"
            }"#,
        )
        .unwrap();
        assert_eq!(settings.output_color, LinearRgba::rgb(1.0, 0.5, 0.0));
        assert_eq!(
            settings.degenerate_tangents,
            DegenerateTangentPolicy::Propagate
        );
        assert_eq!(settings.buffer_label("Vertex Buffer"), "Crate Vertex Buffer");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let json = r#"{ "tangent_gate": "sometimes" }"#;
        let err = RenderableSettings::from_json(json).unwrap_err();
        assert!(matches!(err, RenderableError::Settings(_)));
    }
}
