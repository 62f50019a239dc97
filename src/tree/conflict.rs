//! Occupied-target handling for rename and duplicate.

/// How an occupied target is combined with the incoming subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Children are combined recursively by segment name
    Merge,
    /// The existing target subtree is discarded
    Replace,
}

/// Describes a rename/duplicate whose target key already exists.
///
/// A confirmation collaborator can show `resolution()` to the user before
/// the edit is applied; the core itself never waits for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub source_is_leaf: bool,
    pub target_is_leaf: bool,
}

impl Conflict {
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        Resolution::for_leaves(self.source_is_leaf, self.target_is_leaf)
    }
}

impl Resolution {
    /// A leaf on either side is replaced wholesale; two namespaces merge.
    #[must_use]
    pub const fn for_leaves(source_is_leaf: bool, target_is_leaf: bool) -> Self {
        if source_is_leaf || target_is_leaf { Self::Replace } else { Self::Merge }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::both_leaves(true, true, Resolution::Replace)]
    #[case::leaf_source(true, false, Resolution::Replace)]
    #[case::leaf_target(false, true, Resolution::Replace)]
    #[case::both_namespaces(false, false, Resolution::Merge)]
    fn test_resolution(
        #[case] source_is_leaf: bool,
        #[case] target_is_leaf: bool,
        #[case] expected: Resolution,
    ) {
        let conflict = Conflict { source_is_leaf, target_is_leaf };

        assert_that!(conflict.resolution(), eq(expected));
    }
}
