//! Output Store artifact naming.
//!
//! Every file a job writes into the Output Store is named from its job id and
//! segment index alone:
//!
//! - temp artifact: `temp_{job_id}_{index}.mp4`
//! - final artifact: `{job_id}_{index}.mp4`
//!
//! Job ids are UUIDs and never start with [`TEMP_MARKER`], so the two
//! namespaces are disjoint by prefix and [`ArtifactName::parse`] can classify
//! any file name without looking at anything else.

use std::fmt;

/// Prefix that marks an intermediate, uncaptioned clip.
pub const TEMP_MARKER: &str = "temp_";

/// Container extension for every clip artifact.
pub const CLIP_EXTENSION: &str = "mp4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Cropped but not yet captioned.
    Temp,
    /// Captioned deliverable.
    Final,
}

/// Structured form of an artifact file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName {
    pub kind: ArtifactKind,
    pub job_id: String,
    pub index: usize,
}

impl ArtifactName {
    pub fn temp(job_id: impl Into<String>, index: usize) -> Self {
        Self {
            kind: ArtifactKind::Temp,
            job_id: job_id.into(),
            index,
        }
    }

    pub fn final_clip(job_id: impl Into<String>, index: usize) -> Self {
        Self {
            kind: ArtifactKind::Final,
            job_id: job_id.into(),
            index,
        }
    }

    /// Render the file name.
    pub fn file_name(&self) -> String {
        match self.kind {
            ArtifactKind::Temp => format!(
                "{}{}_{}.{}",
                TEMP_MARKER, self.job_id, self.index, CLIP_EXTENSION
            ),
            ArtifactKind::Final => format!("{}_{}.{}", self.job_id, self.index, CLIP_EXTENSION),
        }
    }

    /// Classify a file name. Returns `None` for anything that is not a clip
    /// artifact.
    pub fn parse(file_name: &str) -> Option<Self> {
        let (kind, body) = match file_name.strip_prefix(TEMP_MARKER) {
            Some(rest) => (ArtifactKind::Temp, rest),
            None => (ArtifactKind::Final, file_name),
        };

        let stem = body
            .strip_suffix(CLIP_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))?;
        let (job_id, index) = stem.rsplit_once('_')?;

        if job_id.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            kind,
            job_id: job_id.to_string(),
            index: index.parse().ok()?,
        })
    }

    pub fn is_temp(&self) -> bool {
        self.kind == ArtifactKind::Temp
    }

    /// True when this is a final clip belonging to `job_id`.
    pub fn is_final_for(&self, job_id: &str) -> bool {
        self.kind == ArtifactKind::Final && self.job_id == job_id
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
