//! Attributes and their forms

use crate::{FileRef, LogicTable, ObjectId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Canonical attribute data, shared by every dataset that uses the attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Official name taken from the attribute index
    pub name: String,

    /// Attribute id
    pub id: ObjectId,

    /// Defining document
    pub file: Option<FileRef>,

    /// Forms in document order
    pub forms: Vec<AttributeForm>,
}

/// An attribute as it appears inside one dataset
///
/// The display name is whatever the dataset page printed, which may be
/// accent-mangled; the official name lives in the shared definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Owning dataset
    pub dataset_id: ObjectId,

    /// Name as written in the dataset
    pub display_name: String,

    /// Shared canonical data
    #[serde(flatten)]
    pub definition: Arc<AttributeDefinition>,
}

impl Attribute {
    /// Scope a canonical definition to a dataset
    pub fn new(
        definition: Arc<AttributeDefinition>,
        dataset_id: ObjectId,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            dataset_id,
            display_name: display_name.into(),
            definition,
        }
    }

    /// Official name
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Attribute id
    pub fn id(&self) -> &ObjectId {
        &self.definition.id
    }

    /// Forms of the attribute
    pub fn forms(&self) -> &[AttributeForm] {
        &self.definition.forms
    }
}

/// One form of an attribute (e.g. "ID", "DESC") and its source tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeForm {
    /// Form name
    pub name: String,

    /// Deterministic id derived from the attribute id and form name
    pub id: ObjectId,

    /// Source tables, each annotated with the column feeding this form
    pub tables: Vec<LogicTable>,
}

impl AttributeForm {
    /// Create an empty form whose id is derived from its owner
    pub fn new(attribute_id: &ObjectId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ObjectId::derive([attribute_id.as_str(), name.as_str()]),
            name,
            tables: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> Arc<AttributeDefinition> {
        let id = ObjectId::parse("8D679D3711D3E4981000E787EC6DE8A4").unwrap();
        Arc::new(AttributeDefinition {
            name: "Mês".to_string(),
            forms: vec![AttributeForm::new(&id, "ID")],
            id,
            file: Some(FileRef::new("Atributo.html", None)),
        })
    }

    #[test]
    fn test_form_id_is_stable() {
        let id = ObjectId::parse("8D679D3711D3E4981000E787EC6DE8A4").unwrap();
        assert_eq!(AttributeForm::new(&id, "ID").id, AttributeForm::new(&id, "ID").id);
        assert_ne!(AttributeForm::new(&id, "ID").id, AttributeForm::new(&id, "DESC").id);
    }

    #[test]
    fn test_scoped_copies_share_definition() {
        let def = definition();
        let a = Attribute::new(def.clone(), ObjectId::parse("01").unwrap(), "Ms");
        let mut b = Attribute::new(def, ObjectId::parse("02").unwrap(), "Mês");

        b.display_name = "Mes".to_string();
        assert!(Arc::ptr_eq(&a.definition, &b.definition));
        assert_eq!(a.display_name, "Ms");
        assert_eq!(a.name(), "Mês");
        assert_eq!(a.forms().len(), 1);
    }

    #[test]
    fn test_attribute_serializes_flat() {
        let attr = Attribute::new(definition(), ObjectId::parse("01").unwrap(), "Ms");
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(json["name"], "Mês");
        assert_eq!(json["display_name"], "Ms");
        assert_eq!(json["dataset_id"], "01");
    }
}
