//! The closed enumerations and aggregate record types this crate works with.
//!
//! Per the "dynamic dispatch over category names -> tagged variants" design
//! note, the category keys are a compile-time enum rather than a
//! string-keyed map: an unrecognized key is a compile error, not a silently
//! dropped feature.

pub mod file;
pub mod index;
pub mod info;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every category a single file's content can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Aliases,
    AnyLinks,
    Assets,
    Blockquotes,
    Draws,
    DynamicVariables,
    Flashcards,
    PageReferences,
    TaggedBacklinks,
    Tags,
    PropertiesBlockBuiltin,
    PropertiesBlockUser,
    PropertiesPageBuiltin,
    PropertiesPageUser,
    PropertiesValues,
    InlineCode,
    MultilineCode,
    MultilineCodeCalc,
    MultilineCodeLang,
    AdvancedCommand,
    AdvancedCommandCaution,
    AdvancedCommandCenter,
    AdvancedCommandComment,
    AdvancedCommandExample,
    AdvancedCommandExport,
    AdvancedCommandExportAscii,
    AdvancedCommandExportLatex,
    AdvancedCommandImportant,
    AdvancedCommandNote,
    AdvancedCommandPinned,
    AdvancedCommandQuery,
    AdvancedCommandQuote,
    AdvancedCommandTip,
    AdvancedCommandVerse,
    AdvancedCommandWarning,
    BlockRefs,
    AllRefs,
    Macros,
    Embeds,
    PageEmbeds,
    BlockEmbeds,
    NamespaceQueries,
    Cards,
    Clozes,
    SimpleQueries,
    QueryFunctions,
    VideoUrls,
    TwitterTweets,
    YoutubeTimestamps,
    Renderers,
    ExternalLinksInternet,
    ExternalLinksAlias,
    ExternalLinksOther,
    EmbeddedLinksInternet,
    EmbeddedLinksAsset,
    EmbeddedLinksOther,
}

impl FeatureKey {
    /// Every variant, in declaration order. Used for deterministic
    /// iteration when assembling summary counts.
    pub const ALL: &'static [FeatureKey] = &[
        FeatureKey::Aliases,
        FeatureKey::AnyLinks,
        FeatureKey::Assets,
        FeatureKey::Blockquotes,
        FeatureKey::Draws,
        FeatureKey::DynamicVariables,
        FeatureKey::Flashcards,
        FeatureKey::PageReferences,
        FeatureKey::TaggedBacklinks,
        FeatureKey::Tags,
        FeatureKey::PropertiesBlockBuiltin,
        FeatureKey::PropertiesBlockUser,
        FeatureKey::PropertiesPageBuiltin,
        FeatureKey::PropertiesPageUser,
        FeatureKey::PropertiesValues,
        FeatureKey::InlineCode,
        FeatureKey::MultilineCode,
        FeatureKey::MultilineCodeCalc,
        FeatureKey::MultilineCodeLang,
        FeatureKey::AdvancedCommand,
        FeatureKey::AdvancedCommandCaution,
        FeatureKey::AdvancedCommandCenter,
        FeatureKey::AdvancedCommandComment,
        FeatureKey::AdvancedCommandExample,
        FeatureKey::AdvancedCommandExport,
        FeatureKey::AdvancedCommandExportAscii,
        FeatureKey::AdvancedCommandExportLatex,
        FeatureKey::AdvancedCommandImportant,
        FeatureKey::AdvancedCommandNote,
        FeatureKey::AdvancedCommandPinned,
        FeatureKey::AdvancedCommandQuery,
        FeatureKey::AdvancedCommandQuote,
        FeatureKey::AdvancedCommandTip,
        FeatureKey::AdvancedCommandVerse,
        FeatureKey::AdvancedCommandWarning,
        FeatureKey::BlockRefs,
        FeatureKey::AllRefs,
        FeatureKey::Macros,
        FeatureKey::Embeds,
        FeatureKey::PageEmbeds,
        FeatureKey::BlockEmbeds,
        FeatureKey::NamespaceQueries,
        FeatureKey::Cards,
        FeatureKey::Clozes,
        FeatureKey::SimpleQueries,
        FeatureKey::QueryFunctions,
        FeatureKey::VideoUrls,
        FeatureKey::TwitterTweets,
        FeatureKey::YoutubeTimestamps,
        FeatureKey::Renderers,
        FeatureKey::ExternalLinksInternet,
        FeatureKey::ExternalLinksAlias,
        FeatureKey::ExternalLinksOther,
        FeatureKey::EmbeddedLinksInternet,
        FeatureKey::EmbeddedLinksAsset,
        FeatureKey::EmbeddedLinksOther,
    ];

    /// Categories that count as "this file links out of itself" for node
    /// classification (`has_backlinks`).
    #[must_use]
    pub fn counts_as_outgoing(self) -> bool {
        matches!(
            self,
            FeatureKey::PropertiesBlockBuiltin
                | FeatureKey::PropertiesBlockUser
                | FeatureKey::PropertiesPageBuiltin
                | FeatureKey::PropertiesPageUser
                | FeatureKey::PropertiesValues
                | FeatureKey::PageReferences
                | FeatureKey::TaggedBacklinks
                | FeatureKey::Tags
        )
    }

    /// Categories the graph analyzer folds into the global reference table.
    #[must_use]
    pub fn counts_as_reference(self) -> bool {
        matches!(
            self,
            FeatureKey::Aliases
                | FeatureKey::Draws
                | FeatureKey::PageReferences
                | FeatureKey::Tags
                | FeatureKey::TaggedBacklinks
                | FeatureKey::PropertiesPageBuiltin
                | FeatureKey::PropertiesPageUser
                | FeatureKey::PropertiesBlockBuiltin
                | FeatureKey::PropertiesBlockUser
        )
    }
}

/// A file's feature map: category -> extracted occurrences. Absent keys mean
/// the category did not appear in the file.
pub type FeatureMap = BTreeMap<FeatureKey, Vec<String>>;

/// One of the five managed subtrees, or `other`. `Sub*` variants mark a file
/// nested below the target directory rather than directly inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Asset,
    Draw,
    Journal,
    Page,
    Whiteboard,
    SubAsset,
    SubDraw,
    SubJournal,
    SubPage,
    SubWhiteboard,
    Other,
}

impl FileType {
    #[must_use]
    pub fn is_journal_or_page(self) -> bool {
        matches!(self, FileType::Journal | FileType::Page)
    }

    #[must_use]
    pub fn is_asset_like(self) -> bool {
        matches!(self, FileType::Asset | FileType::SubAsset)
    }

    #[must_use]
    pub fn sub_variant(self) -> Self {
        match self {
            FileType::Asset => FileType::SubAsset,
            FileType::Draw => FileType::SubDraw,
            FileType::Journal => FileType::SubJournal,
            FileType::Page => FileType::SubPage,
            FileType::Whiteboard => FileType::SubWhiteboard,
            other => other,
        }
    }
}

/// Node classification derived by the graph analyzer (§4.F table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Leaf,
    Branch,
    OrphanTrue,
    OrphanGraph,
    OrphanNamespace,
    OrphanNamespaceTrue,
    #[default]
    Other,
}
