use crate::core::models::field::Field;

/// One named environment (e.g. "dev", "prod") with its full field set.
///
/// Owned entirely by a single generation run; fields keep the order of
/// their first appearance in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentDefinition {
    pub name: String,
    /// Name of the generated struct for this environment, from the run
    /// configuration (e.g. "DevConfig").
    pub struct_name: String,
    pub fields: Vec<Field>,
}

impl EnvironmentDefinition {
    /// Variable names in field order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Looks up a field by variable name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
