//! Routing of configuration sections between the two physical layouts

/// Name of the section whose subsections live in the fanout directory.
pub const REMOTE_SECTION: &str = "remote";

/// Where a section of the logical configuration is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind<'a> {
    /// `remote` subsections: one fanout file per subsection.
    Remote,
    /// Everything else: the root config blob.
    Other(&'a str),
}

impl<'a> SectionKind<'a> {
    pub fn classify(section: &'a str) -> Self {
        if section.eq_ignore_ascii_case(REMOTE_SECTION) {
            Self::Remote
        } else {
            Self::Other(section)
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::Remote => REMOTE_SECTION,
            Self::Other(name) => name,
        }
    }
}
