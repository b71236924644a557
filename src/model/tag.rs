use super::EntityRef;

/// Block tag from a doc comment, e.g. `@param name the name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocletTag {
    pub name: String,
    pub value: String,
    pub line: usize,
    pub context: EntityRef,
}

impl DocletTag {
    /// Whitespace separated words of the value
    pub fn parameters(&self) -> Vec<&str> {
        self.value.split_whitespace().collect()
    }
}

/// Tags named `name`, in declaration order
pub(crate) fn tags_by_name<'a>(tags: &'a [DocletTag], name: &str) -> Vec<&'a DocletTag> {
    tags.iter().filter(|t| t.name == name).collect()
}
