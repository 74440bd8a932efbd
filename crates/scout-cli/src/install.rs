//! Install-command generation.

use clap::ValueEnum;

/// Supported package managers for generated install commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PackageManager {
    #[default]
    Pnpm,
    Npm,
    Yarn,
}

impl PackageManager {
    pub const ALL: [Self; 3] = [Self::Pnpm, Self::Npm, Self::Yarn];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pnpm => "pnpm",
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        }
    }

    /// Builds the install command for a package, optionally as a dev
    /// dependency.
    pub fn install_command(self, package: &str, dev: bool) -> String {
        match (self, dev) {
            (Self::Pnpm, false) => format!("pnpm add {package}"),
            (Self::Pnpm, true) => format!("pnpm add -D {package}"),
            (Self::Npm, false) => format!("npm install {package}"),
            (Self::Npm, true) => format!("npm install --save-dev {package}"),
            (Self::Yarn, false) => format!("yarn add {package}"),
            (Self::Yarn, true) => format!("yarn add --dev {package}"),
        }
    }
}
