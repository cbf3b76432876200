use clap::ValueEnum;
use onekit_core::{OutputFormat, Preview, RenameKind};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormatArg {
    #[default]
    Summary,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Summary => Self::Summary,
            OutputFormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PreviewArg {
    Summary,
    Table,
    Diff,
}

impl From<PreviewArg> for Preview {
    fn from(arg: PreviewArg) -> Self {
        match arg {
            PreviewArg::Summary => Self::Summary,
            PreviewArg::Table => Self::Table,
            PreviewArg::Diff => Self::Diff,
        }
    }
}

/// Which part of the module `rename-node` changes
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RenameTypeArg {
    /// The node class, e.g. `MotorNode`
    Class,
    /// The module directory, manifest name and Kconfig symbol
    Module,
    /// The topic variable
    Topic,
    /// The `Meta::name` string
    MetaName,
}

impl From<RenameTypeArg> for RenameKind {
    fn from(arg: RenameTypeArg) -> Self {
        match arg {
            RenameTypeArg::Class => Self::Class,
            RenameTypeArg::Module => Self::Module,
            RenameTypeArg::Topic => Self::Topic,
            RenameTypeArg::MetaName => Self::MetaName,
        }
    }
}
