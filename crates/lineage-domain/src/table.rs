//! Logic tables - the physical sources behind forms and facts

use crate::{FileRef, ObjectId};
use serde::{Deserialize, Serialize};

/// A source table referenced by an attribute form or a fact expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicTable {
    /// Table name as listed in the table index
    pub name: String,

    /// Table id
    pub id: ObjectId,

    /// Defining document; stays empty when the table index has no entry
    pub file: Option<FileRef>,

    /// Source column populating the referencing form or fact
    pub column_name: Option<String>,
}

impl LogicTable {
    /// Create a table reference without a resolved file
    pub fn new(name: impl Into<String>, id: ObjectId) -> Self {
        Self {
            name: name.into(),
            id,
            file: None,
            column_name: None,
        }
    }

    /// Attach the source column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.column_name = if column.trim().is_empty() {
            None
        } else {
            Some(column)
        };
        self
    }

    /// Attach the defining document
    pub fn with_file(mut self, file: Option<FileRef>) -> Self {
        self.file = file;
        self
    }
}
