use crate::utils::error::Result;
use crate::utils::text::slugify;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::path::{Path, PathBuf};

/// Output artifact of a dispatch or print batch. A single label passes
/// through untouched; several are bundled into one gzip-compressed tar so
/// the user downloads exactly one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelBundle {
    Empty,
    Single { file_name: String, data: Vec<u8> },
    Archive { file_name: String, data: Vec<u8> },
}

impl LabelBundle {
    pub fn is_empty(&self) -> bool {
        matches!(self, LabelBundle::Empty)
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            LabelBundle::Empty => None,
            LabelBundle::Single { file_name, .. } | LabelBundle::Archive { file_name, .. } => {
                Some(file_name)
            }
        }
    }

    pub fn data(&self) -> Option<&[u8]> {
        match self {
            LabelBundle::Empty => None,
            LabelBundle::Single { data, .. } | LabelBundle::Archive { data, .. } => Some(data),
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "label".to_string())
}

/// Collapses the label files a batch produced into one downloadable
/// artifact. The archive is built in memory; nothing is left behind on
/// disk beyond the gateway's own label files.
pub fn bundle_labels(prefix: &str, labels: &[PathBuf]) -> Result<LabelBundle> {
    match labels {
        [] => Ok(LabelBundle::Empty),
        [label] => {
            let data = std::fs::read(label)?;
            Ok(LabelBundle::Single {
                file_name: file_name_of(label),
                data,
            })
        }
        many => {
            tracing::debug!("bundling {} label files into archive", many.len());
            let encoder = GzEncoder::new(Vec::new(), Compression::default());
            let mut builder = tar::Builder::new(encoder);
            for label in many {
                builder.append_path_with_name(label, file_name_of(label))?;
            }
            let data = builder.into_inner()?.finish()?;
            Ok(LabelBundle::Archive {
                file_name: format!("{}-labels.tgz", slugify(prefix)),
                data,
            })
        }
    }
}
