//! Template handles supplied by the host before generation
//!
//! The generator never looks inside a template. It only records which
//! template each scene node was instantiated from.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::generator::GenerateError;

/// Opaque reference to a host-side template (prefab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateHandle(pub u32);

/// Which template a handle fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateSlot {
    BuildingParent,
    Layer,
    Block,
}

impl fmt::Display for TemplateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemplateSlot::BuildingParent => "building parent",
            TemplateSlot::Layer => "layer",
            TemplateSlot::Block => "block",
        })
    }
}

/// Template references as delivered by the bootstrap step, possibly incomplete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRefs {
    pub building_parent: Option<TemplateHandle>,
    pub layer: Option<TemplateHandle>,
    pub block: Option<TemplateHandle>,
}

impl TemplateRefs {
    pub fn new(
        building_parent: TemplateHandle,
        layer: TemplateHandle,
        block: TemplateHandle,
    ) -> Self {
        Self {
            building_parent: Some(building_parent),
            layer: Some(layer),
            block: Some(block),
        }
    }

    /// Slots that have not been assigned
    pub fn missing(&self) -> Vec<TemplateSlot> {
        let mut missing = Vec::new();
        if self.building_parent.is_none() {
            missing.push(TemplateSlot::BuildingParent);
        }
        if self.layer.is_none() {
            missing.push(TemplateSlot::Layer);
        }
        if self.block.is_none() {
            missing.push(TemplateSlot::Block);
        }
        missing
    }

    /// Require all three handles
    pub fn resolve(&self) -> Result<Templates, GenerateError> {
        match (self.building_parent, self.layer, self.block) {
            (Some(building_parent), Some(layer), Some(block)) => Ok(Templates {
                building_parent,
                layer,
                block,
            }),
            _ => Err(GenerateError::MissingTemplates {
                missing: self.missing(),
            }),
        }
    }
}

/// A complete set of template handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Templates {
    pub building_parent: TemplateHandle,
    pub layer: TemplateHandle,
    pub block: TemplateHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_complete() {
        let refs = TemplateRefs::new(TemplateHandle(1), TemplateHandle(2), TemplateHandle(3));
        let templates = refs.resolve().unwrap();
        assert_eq!(templates.building_parent, TemplateHandle(1));
        assert_eq!(templates.layer, TemplateHandle(2));
        assert_eq!(templates.block, TemplateHandle(3));
    }

    #[test]
    fn test_resolve_reports_every_missing_slot() {
        let refs = TemplateRefs {
            layer: Some(TemplateHandle(2)),
            ..Default::default()
        };
        match refs.resolve() {
            Err(GenerateError::MissingTemplates { missing }) => {
                assert_eq!(missing, vec![TemplateSlot::BuildingParent, TemplateSlot::Block]);
            }
            other => panic!("expected missing templates, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_error_message_names_slots() {
        let err = TemplateRefs::default().resolve().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("building parent"));
        assert!(msg.contains("layer"));
        assert!(msg.contains("block"));
    }
}
