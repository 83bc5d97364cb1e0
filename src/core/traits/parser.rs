use crate::core::models::field::Field;

/// Port for parsing environment definition files.
///
/// v1.0 only ships with `EnvFileParser`; the trait enables future
/// support for other flat formats (properties files, etc.).
pub trait DefinitionParser: Send + Sync {
    /// Parse raw file content into classified fields.
    ///
    /// Total by contract: malformed lines are skipped, never reported.
    fn parse(&self, content: &str) -> Vec<Field>;

    /// File extensions this parser handles (e.g. `[".env"]`).
    fn supported_extensions(&self) -> &[&str];
}
