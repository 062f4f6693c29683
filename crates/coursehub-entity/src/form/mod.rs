//! Form-builder entities: data types, reusable fields, and templates that
//! compose them.

pub mod data_field;
pub mod data_template;
pub mod data_type;

pub use data_field::{CreateDataField, DataField, DataFieldPatch, FieldType};
pub use data_template::{CreateDataTemplate, DataTemplate, DataTemplatePatch};
pub use data_type::{CreateDataType, DataType, DataTypePatch};
