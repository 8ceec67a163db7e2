//! Archive format detection from the archive file name.

use std::fmt;

/// Compressed archive formats the installer can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// gzip-compressed tar (`.tar.gz`, `.tgz`).
    TarGz,
    /// zstd-compressed tar (`.tar.zst`, `.tzst`).
    TarZst,
    /// zip archive (`.zip`).
    Zip,
}

/// Suffix table, checked in order.
const SUFFIXES: &[(&str, ArchiveFormat)] = &[
    (".tar.gz", ArchiveFormat::TarGz),
    (".tgz", ArchiveFormat::TarGz),
    (".tar.zst", ArchiveFormat::TarZst),
    (".tzst", ArchiveFormat::TarZst),
    (".zip", ArchiveFormat::Zip),
];

impl ArchiveFormat {
    /// Detect the format from a file name such as `zup.tar.gz`.
    ///
    /// Matching is case-insensitive. Returns `None` for unknown suffixes.
    ///
    /// # Examples
    ///
    /// ```
    /// use zup_installer::artefact::format::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_file_name("zup.tar.gz"), Some(ArchiveFormat::TarGz));
    /// assert_eq!(ArchiveFormat::from_file_name("zup.exe"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_ascii_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.ends_with(suffix) && lower.len() > suffix.len())
            .map(|(_, format)| *format)
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TarGz => "tar.gz",
            Self::TarZst => "tar.zst",
            Self::Zip => "zip",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::tar_gz("zup.tar.gz", Some(ArchiveFormat::TarGz))]
    #[case::tgz("zup.tgz", Some(ArchiveFormat::TarGz))]
    #[case::upper("ZUP.TAR.GZ", Some(ArchiveFormat::TarGz))]
    #[case::tar_zst("zup-x86_64.tar.zst", Some(ArchiveFormat::TarZst))]
    #[case::tzst("zup.tzst", Some(ArchiveFormat::TarZst))]
    #[case::zip("zup.zip", Some(ArchiveFormat::Zip))]
    #[case::plain_tar("zup.tar", None)]
    #[case::binary("zup", None)]
    #[case::bare_suffix(".zip", None)]
    fn detects_format(#[case] file_name: &str, #[case] expected: Option<ArchiveFormat>) {
        assert_eq!(ArchiveFormat::from_file_name(file_name), expected);
    }
}
