//! Display-context size classes.
//!
//! Each class maps to the smallest acceptable decoded side length in pixels
//! and to the placeholder shown while a load is in flight. Keeping the decoded
//! size close to what the context actually displays bounds memory without
//! visibly degrading quality.

/// Numeric identifier of a placeholder asset, resolved by the embedding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderId(pub u32);

/// Display context a bitmap will be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// Full document thumbnail.
    Document,
    /// Compact document row.
    DocumentList,
    /// Large document row.
    DocumentListLarge,
    /// Vertical slide list entry.
    SlideList,
    /// Horizontal slide strip entry.
    SlideListHorizontal,
    /// Large horizontal slide strip entry.
    SlideListHorizontalLarge,
    /// Image gallery cell.
    ImageList,
    /// Presentation view.
    Presentation,
    /// Large presentation view.
    PresentationLarge,
    /// Conservative fallback for contexts without a dedicated class.
    Generic,
}

impl SizeClass {
    /// Smallest side length, in pixels, the decoded image must keep.
    #[must_use]
    pub const fn min_side(self) -> u32 {
        match self {
            Self::Document | Self::Presentation => 230,
            Self::DocumentList => 74,
            Self::DocumentListLarge => 350,
            Self::SlideList => 103,
            Self::SlideListHorizontal => 146,
            Self::SlideListHorizontalLarge => 212,
            Self::ImageList => 120,
            Self::PresentationLarge => 215,
            Self::Generic => 350,
        }
    }

    /// Placeholder shown for this context while loading or after failure.
    #[must_use]
    pub const fn placeholder(self) -> PlaceholderId {
        match self {
            Self::Document => PlaceholderId(1),
            Self::DocumentList => PlaceholderId(2),
            Self::DocumentListLarge => PlaceholderId(3),
            Self::SlideList => PlaceholderId(4),
            Self::SlideListHorizontal => PlaceholderId(5),
            Self::SlideListHorizontalLarge => PlaceholderId(6),
            Self::ImageList => PlaceholderId(7),
            Self::Presentation => PlaceholderId(8),
            Self::PresentationLarge => PlaceholderId(9),
            Self::Generic => PlaceholderId(0),
        }
    }

    /// Stable string tag for this class.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::DocumentList => "document-list",
            Self::DocumentListLarge => "document-list-large",
            Self::SlideList => "slide-list",
            Self::SlideListHorizontal => "slide-list-horizontal",
            Self::SlideListHorizontalLarge => "slide-list-horizontal-large",
            Self::ImageList => "image-list",
            Self::Presentation => "presentation",
            Self::PresentationLarge => "presentation-large",
            Self::Generic => "generic",
        }
    }

    /// Resolves a caller-supplied tag. Unknown tags fall back to
    /// [`SizeClass::Generic`], whose 350px minimum errs on the side of quality.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "document" => Self::Document,
            "document-list" => Self::DocumentList,
            "document-list-large" => Self::DocumentListLarge,
            "slide-list" => Self::SlideList,
            "slide-list-horizontal" => Self::SlideListHorizontal,
            "slide-list-horizontal-large" => Self::SlideListHorizontalLarge,
            "image-list" => Self::ImageList,
            "presentation" => Self::Presentation,
            "presentation-large" => Self::PresentationLarge,
            _ => Self::Generic,
        }
    }
}
