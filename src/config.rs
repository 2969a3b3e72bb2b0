/// Selects whether an index validates its preconditions.
///
/// `Unchecked` skips every test (duplicate ids, query before seal, bad distances,
/// overflows); misuse then gives unspecified results instead of an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Validation {
    #[default]
    Checked,
    Unchecked,
}

impl Validation {
    #[must_use]
    pub fn is_checked(self) -> bool {
        self == Validation::Checked
    }
}
