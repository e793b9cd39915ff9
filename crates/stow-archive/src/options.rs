use stow_fs::PermissionMode;

use crate::entry::EntryKind;
use crate::format::TarCompress;

#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub perm_strategy: PermissionStrategy,
    pub other_entries: OtherEntryPolicy,
    /// Create missing parent directories of regular files. They are treated
    /// as directories recorded with mode `0o755` and resolved through
    /// `perm_strategy`.
    pub create_parents: bool,
    pub compression: TarCompress,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            perm_strategy: PermissionStrategy::default(),
            other_entries: OtherEntryPolicy::default(),
            create_parents: true,
            compression: TarCompress::default(),
        }
    }
}

impl ExtractOptions {
    pub fn permission_strategy(mut self, strategy: PermissionStrategy) -> Self {
        self.perm_strategy = strategy;
        self
    }

    pub fn other_entries(mut self, policy: OtherEntryPolicy) -> Self {
        self.other_entries = policy;
        self
    }

    pub fn create_parents(mut self, create: bool) -> Self {
        self.create_parents = create;
        self
    }

    pub fn compression(mut self, codec: TarCompress) -> Self {
        self.compression = codec;
        self
    }
}

/// What to do with entries that are neither directories nor regular files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OtherEntryPolicy {
    /// Pass over them without touching the filesystem.
    #[default]
    Ignore,
    /// Fail the extraction with [`Error::UnsupportedEntry`](crate::Error::UnsupportedEntry).
    Reject,
}

/// Permission application strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PermissionStrategy {
    /// Recorded mode, verbatim.
    #[default]
    Preserve,
    /// Recorded mode, made owner-usable: non-executable files gain `0o644`,
    /// directories gain `0o700`.
    Standard,
    /// Ignore the archive: `0o755` for directories and executables, `0o644`
    /// for everything else.
    Owned,
}

impl PermissionStrategy {
    /// Resolve the mode to apply (pure function).
    pub fn resolve(self, kind: EntryKind, mode: u32) -> PermissionMode {
        let recorded = PermissionMode::custom(mode);
        let executable = recorded.is_executable();
        match (self, kind) {
            (Self::Preserve, _) => recorded,
            (Self::Standard, EntryKind::Directory) => PermissionMode::custom(mode | 0o700),
            (Self::Standard, _) if executable => recorded,
            (Self::Standard, _) => PermissionMode::custom(mode | 0o644),
            (Self::Owned, EntryKind::Directory) => PermissionMode::Executable,
            (Self::Owned, _) if executable => PermissionMode::Executable,
            (Self::Owned, _) => PermissionMode::ReadWrite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_options_default() {
        let options = ExtractOptions::default();
        assert_eq!(options.perm_strategy, PermissionStrategy::Preserve);
        assert_eq!(options.other_entries, OtherEntryPolicy::Ignore);
        assert!(options.create_parents);
        assert_eq!(options.compression, TarCompress::None);
    }

    #[test]
    fn extraction_options_builder_pattern() {
        let options = ExtractOptions::default()
            .permission_strategy(PermissionStrategy::Owned)
            .other_entries(OtherEntryPolicy::Reject)
            .create_parents(false)
            .compression(TarCompress::Gzip);

        assert_eq!(options.perm_strategy, PermissionStrategy::Owned);
        assert_eq!(options.other_entries, OtherEntryPolicy::Reject);
        assert!(!options.create_parents);
        assert_eq!(options.compression, TarCompress::Gzip);
    }

    #[test]
    fn preserve_keeps_recorded_mode() {
        let resolved = PermissionStrategy::Preserve.resolve(EntryKind::RegularFile, 0o600);
        assert_eq!(resolved, PermissionMode::Custom(0o600));
    }

    #[test]
    fn standard_strategy_executable() {
        let resolved = PermissionStrategy::Standard.resolve(EntryKind::RegularFile, 0o750);
        assert_eq!(resolved, PermissionMode::Custom(0o750));
    }

    #[test]
    fn standard_strategy_non_executable() {
        let resolved = PermissionStrategy::Standard.resolve(EntryKind::RegularFile, 0o400);
        assert_eq!(resolved, PermissionMode::Custom(0o644));
    }

    #[test]
    fn standard_strategy_directory() {
        let resolved = PermissionStrategy::Standard.resolve(EntryKind::Directory, 0o055);
        assert_eq!(resolved, PermissionMode::Custom(0o755));
    }

    #[test]
    fn owned_strategy_ignores_archive() {
        use EntryKind::*;
        let owned = PermissionStrategy::Owned;
        assert_eq!(owned.resolve(Directory, 0o000), PermissionMode::Executable);
        assert_eq!(owned.resolve(RegularFile, 0o700), PermissionMode::Executable);
        assert_eq!(owned.resolve(RegularFile, 0o666), PermissionMode::ReadWrite);
    }
}
