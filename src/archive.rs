use crate::engine::{WalkOptions, Walker, resolve};
use crate::error::PrunecopyError;
use crate::options::Options;
use crate::output::Reporter;
use crate::rules::{self, RuleSet};
use crate::types::{ArchiveReport, Failure};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Supported archive formats, inferred from the output file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Detects the format from a `.zip`, `.tar`, `.tar.gz` or `.tgz` suffix, ignoring
    /// case.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveFormat::Tar)
        } else {
            None
        }
    }
}

struct Member {
    path: PathBuf,
    name: String,
}

/// Writes the visible files of `src` into an archive at `output`.
///
/// A single-file source is archived under its own name without consulting `rules`.
/// For a directory source only files are stored, named relative to `src` with `/`
/// separators. An output located inside `src` is never archived into itself.
///
/// Unreadable files and entries that are not regular files are reported and listed in [`ArchiveReport::failures`].
///
/// # Errors
///
/// Fails on an unsupported output suffix, a source that is neither a file nor a
/// directory, or when the archive itself cannot be written. A partially written
/// archive is removed.
pub fn archive(
    src: impl AsRef<Path>,
    output: impl AsRef<Path>,
    rules: &RuleSet,
    options: &Options,
    reporter: &dyn Reporter,
) -> Result<ArchiveReport, PrunecopyError> {
    let format = ArchiveFormat::from_path(output.as_ref())
        .ok_or_else(|| PrunecopyError::UnsupportedFormat(output.as_ref().to_path_buf()))?;
    let src = fs::canonicalize(src.as_ref()).map_err(|e| PrunecopyError::io(src.as_ref(), e))?;
    let output = resolve(output.as_ref())?;

    let mut report = ArchiveReport {
        source: src.clone(),
        output: output.clone(),
        format,
        entries: Vec::new(),
        failures: Vec::new(),
    };

    let members = if src.is_file() {
        let name = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PrunecopyError::InvalidPath(src.display().to_string()))?;
        vec![Member {
            path: src.clone(),
            name,
        }]
    } else if src.is_dir() {
        let mut rules = rules.clone();
        if let Ok(relative) = output.strip_prefix(&src) {
            rules.push_ignore(globset::escape(&rules::to_slash(relative)));
        }
        collect_members(&src, rules, options, &mut report, reporter)
    } else {
        return Err(PrunecopyError::InvalidPath(format!(
            "source {} must be a directory or file",
            src.display()
        )));
    };

    let file = File::create(&output).map_err(|e| PrunecopyError::io(&output, e))?;
    if let Err(e) = write_archive(format, file, &output, &members, &mut report, reporter) {
        let _ = fs::remove_file(&output);
        return Err(e);
    }

    let label = match format {
        ArchiveFormat::Zip => "ZIP",
        ArchiveFormat::Tar | ArchiveFormat::TarGz => "TAR",
    };
    reporter.info(&format!("{} archive created at {}", label, output.display()));
    Ok(report)
}

fn write_archive(
    format: ArchiveFormat,
    file: File,
    output: &Path,
    members: &[Member],
    report: &mut ArchiveReport,
    reporter: &dyn Reporter,
) -> Result<(), PrunecopyError> {
    match format {
        ArchiveFormat::Zip => write_zip(file, members, report, reporter),
        ArchiveFormat::Tar => {
            let mut builder = tar::Builder::new(file);
            write_tar(&mut builder, members, report, reporter)?;
            builder.into_inner().map_err(|e| PrunecopyError::io(output, e))?;
            Ok(())
        }
        ArchiveFormat::TarGz => {
            let encoder = GzEncoder::new(file, Compression::default());
            let mut builder = tar::Builder::new(encoder);
            write_tar(&mut builder, members, report, reporter)?;
            let encoder = builder.into_inner().map_err(|e| PrunecopyError::io(output, e))?;
            encoder.finish().map_err(|e| PrunecopyError::io(output, e))?;
            Ok(())
        }
    }
}

// Only regular files become members. Directories, including unfollowed links to
// them, are implied by member names.
fn collect_members(
    src: &Path,
    rules: RuleSet,
    options: &Options,
    report: &mut ArchiveReport,
    reporter: &dyn Reporter,
) -> Vec<Member> {
    let options = WalkOptions {
        max_depth: None,
        follow_links: options.follow_links,
    };
    let mut members = Vec::new();
    for entry in Walker::new(src, Arc::new(rules), options) {
        match entry {
            Ok(entry) if entry.is_dir => {}
            Ok(entry) => match fs::metadata(&entry.path) {
                Ok(metadata) if metadata.is_file() => members.push(Member {
                    name: rules::to_slash(&entry.relative),
                    path: entry.path,
                }),
                Ok(_) => {
                    let message = format!("Skipping {}: not a regular file", entry.path.display());
                    record_failure(report, reporter, Some(entry.path), message);
                }
                Err(e) => {
                    let message = format!("Failed to read {}: {}", entry.path.display(), e);
                    record_failure(report, reporter, Some(entry.path), message);
                }
            },
            Err(e) => record_failure(report, reporter, None, e.to_string()),
        }
    }
    members
}

fn write_zip(
    file: File,
    members: &[Member],
    report: &mut ArchiveReport,
    reporter: &dyn Reporter,
) -> Result<(), PrunecopyError> {
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for member in members {
        let Some((_, data)) = read_member(member, report, reporter) else {
            continue;
        };
        writer.start_file(member.name.as_str(), options)?;
        writer
            .write_all(&data)
            .map_err(|e| PrunecopyError::Archive(e.to_string()))?;
        report.entries.push(member.name.clone());
    }
    writer.finish()?;
    Ok(())
}

fn write_tar<W: Write>(
    builder: &mut tar::Builder<W>,
    members: &[Member],
    report: &mut ArchiveReport,
    reporter: &dyn Reporter,
) -> Result<(), PrunecopyError> {
    for member in members {
        let Some((metadata, data)) = read_member(member, report, reporter) else {
            continue;
        };
        let mut header = tar::Header::new_gnu();
        header.set_metadata(&metadata);
        header.set_size(data.len() as u64);
        builder
            .append_data(&mut header, &member.name, data.as_slice())
            .map_err(|e| PrunecopyError::Archive(e.to_string()))?;
        report.entries.push(member.name.clone());
    }
    Ok(())
}

/// Reads a member fully before anything is written for it, so a read error never
/// leaves a partial entry behind.
fn read_member(
    member: &Member,
    report: &mut ArchiveReport,
    reporter: &dyn Reporter,
) -> Option<(fs::Metadata, Vec<u8>)> {
    let read = || -> io::Result<(fs::Metadata, Vec<u8>)> {
        let mut source = File::open(&member.path)?;
        let metadata = source.metadata()?;
        let mut data = Vec::with_capacity(metadata.len() as usize);
        source.read_to_end(&mut data)?;
        Ok((metadata, data))
    };
    match read() {
        Ok(contents) => Some(contents),
        Err(e) => {
            let message = format!("Failed to read {}: {}", member.path.display(), e);
            record_failure(report, reporter, Some(member.path.clone()), message);
            None
        }
    }
}

fn record_failure(
    report: &mut ArchiveReport,
    reporter: &dyn Reporter,
    path: Option<PathBuf>,
    message: String,
) {
    reporter.error(&message);
    report.failures.push(Failure { path, message });
}
