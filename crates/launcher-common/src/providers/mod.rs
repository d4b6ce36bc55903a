use std::fmt;

use crate::config::RuntimeConfig;
use crate::error::LauncherError;
use crate::provider::Provider;

pub mod vscode;
pub mod zed;

pub use vscode::{VsCodeFlavor, VsCodeProvider};
pub use zed::ZedProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Zed,
    VsCode,
    VsCodium,
    CodeOss,
    Cursor,
}

impl ProviderKind {
    pub fn parse(raw: &str) -> Result<Self, LauncherError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "zed" | "zeditor" => Ok(Self::Zed),
            "vscode" | "code" => Ok(Self::VsCode),
            "vscodium" | "codium" => Ok(Self::VsCodium),
            "code-oss" | "oss" => Ok(Self::CodeOss),
            "cursor" => Ok(Self::Cursor),
            _ => Err(LauncherError::UnknownProvider(raw.trim().to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zed => "zed",
            Self::VsCode => "vscode",
            Self::VsCodium => "vscodium",
            Self::CodeOss => "code-oss",
            Self::Cursor => "cursor",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instantiate the configured provider for this invocation.
pub fn build_provider(config: &RuntimeConfig) -> Box<dyn Provider> {
    match config.provider {
        ProviderKind::Zed => Box::new(ZedProvider::from_config(config)),
        ProviderKind::VsCode => Box::new(VsCodeProvider::from_config(VsCodeFlavor::Code, config)),
        ProviderKind::VsCodium => {
            Box::new(VsCodeProvider::from_config(VsCodeFlavor::Codium, config))
        }
        ProviderKind::CodeOss => Box::new(VsCodeProvider::from_config(VsCodeFlavor::Oss, config)),
        ProviderKind::Cursor => Box::new(VsCodeProvider::from_config(VsCodeFlavor::Cursor, config)),
    }
}
