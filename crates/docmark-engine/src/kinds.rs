//! # Command Kinds
//!
//! The three families of backslash commands understood inside comments.
//! Each kind owns its canonical name; deployments may respell the name
//! through [`docmark_config::CommentConfig`], but the kind never changes.
//!
//! - **`CommandKind`**: metadata and structural commands that consume a whole line
//! - **`SectionKind`**: named sections whose content follows the command
//! - **`InlineKind`**: documentation aimed at another entity (parameter, base, ...)

use serde::Serialize;

/// A command that consumes its whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Exclude,
    UniqueName,
    OutputName,
    Synopsis,
    Group,
    Module,
    OutputSection,
    Entity,
    File,
    End,
}

impl CommandKind {
    /// All kinds in matching priority order.
    pub const ALL: [CommandKind; 10] = [
        CommandKind::Exclude,
        CommandKind::UniqueName,
        CommandKind::OutputName,
        CommandKind::Synopsis,
        CommandKind::Group,
        CommandKind::Module,
        CommandKind::OutputSection,
        CommandKind::Entity,
        CommandKind::File,
        CommandKind::End,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Exclude => "exclude",
            CommandKind::UniqueName => "unique_name",
            CommandKind::OutputName => "output_name",
            CommandKind::Synopsis => "synopsis",
            CommandKind::Group => "group",
            CommandKind::Module => "module",
            CommandKind::OutputSection => "output_section",
            CommandKind::Entity => "entity",
            CommandKind::File => "file",
            CommandKind::End => "end",
        }
    }

    /// Regex fragment for the arguments following the command name.
    pub(crate) fn argument_pattern(self) -> &'static str {
        match self {
            CommandKind::Exclude => r"(?:\s+(return|target))?\s*$",
            CommandKind::UniqueName
            | CommandKind::OutputName
            | CommandKind::Module
            | CommandKind::Entity => r"\s+(\S+)\s*$",
            CommandKind::Synopsis | CommandKind::OutputSection => r"\s+(.+?)\s*$",
            CommandKind::Group => r"\s+(-?)(\S+)(?:\s+(.+?))?\s*$",
            CommandKind::File | CommandKind::End => r"\s*$",
        }
    }

    /// Commands that may appear anywhere without ending a section.
    ///
    /// Every other command terminates the content of the section or inline
    /// comment before it.
    pub fn is_transparent(self) -> bool {
        matches!(self, CommandKind::Exclude | CommandKind::Module)
    }
}

/// A named section of a documentation comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Brief,
    Details,
    Requires,
    Effects,
    Synchronization,
    Postconditions,
    Returns,
    Throws,
    Complexity,
    Remarks,
    ErrorConditions,
    Notes,
    Preconditions,
    Constraints,
    Diagnostics,
    See,
}

impl SectionKind {
    pub const ALL: [SectionKind; 16] = [
        SectionKind::Brief,
        SectionKind::Details,
        SectionKind::Requires,
        SectionKind::Effects,
        SectionKind::Synchronization,
        SectionKind::Postconditions,
        SectionKind::Returns,
        SectionKind::Throws,
        SectionKind::Complexity,
        SectionKind::Remarks,
        SectionKind::ErrorConditions,
        SectionKind::Notes,
        SectionKind::Preconditions,
        SectionKind::Constraints,
        SectionKind::Diagnostics,
        SectionKind::See,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Brief => "brief",
            SectionKind::Details => "details",
            SectionKind::Requires => "requires",
            SectionKind::Effects => "effects",
            SectionKind::Synchronization => "synchronization",
            SectionKind::Postconditions => "postconditions",
            SectionKind::Returns => "returns",
            SectionKind::Throws => "throws",
            SectionKind::Complexity => "complexity",
            SectionKind::Remarks => "remarks",
            SectionKind::ErrorConditions => "error_conditions",
            SectionKind::Notes => "notes",
            SectionKind::Preconditions => "preconditions",
            SectionKind::Constraints => "constraints",
            SectionKind::Diagnostics => "diagnostics",
            SectionKind::See => "see",
        }
    }
}

/// The kind of entity an inline comment documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineKind {
    Param,
    Tparam,
    Base,
}

impl InlineKind {
    pub const ALL: [InlineKind; 3] = [InlineKind::Param, InlineKind::Tparam, InlineKind::Base];

    pub fn name(self) -> &'static str {
        match self {
            InlineKind::Param => "param",
            InlineKind::Tparam => "tparam",
            InlineKind::Base => "base",
        }
    }
}
