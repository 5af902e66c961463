use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

use crate::ids::WorkId;
use crate::record::WorkRecord;

pub const SCRAPED_FILE: &str = "scraped.csv";
pub const SCRAPED_RESTRICTED_FILE: &str = "scraped_restricted.csv";
pub const RESTRICTED_IDS_FILE: &str = "restricted_ids.csv";
pub const ERRORED_IDS_FILE: &str = "errored_ids.csv";
pub const ERRORED_RESTRICTED_IDS_FILE: &str = "errored_restricted_ids.csv";

#[derive(Debug, Deserialize)]
struct IdRow {
    workid: String,
}

// Extra columns are ignored, so record files and id lists share this reader.
pub fn read_id_column(path: &Path) -> anyhow::Result<BTreeSet<WorkId>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no checkpoint file, treating as empty");
        return Ok(BTreeSet::new());
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open checkpoint: {}", path.display()))?;

    let mut ids = BTreeSet::new();
    for row in reader.deserialize::<IdRow>() {
        let row = row.with_context(|| format!("read checkpoint row: {}", path.display()))?;
        ids.insert(WorkId::new(row.workid));
    }
    Ok(ids)
}

pub struct RecordWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl RecordWriter {
    pub fn open_append(path: &Path) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open record checkpoint: {}", path.display()))?;
        let needs_header = file
            .metadata()
            .with_context(|| format!("stat record checkpoint: {}", path.display()))?
            .len()
            == 0;

        let writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    pub fn append(&mut self, record: &WorkRecord) -> anyhow::Result<()> {
        self.writer
            .serialize(record.to_row())
            .with_context(|| format!("write record row: {}", self.path.display()))?;
        self.writer
            .flush()
            .with_context(|| format!("flush record checkpoint: {}", self.path.display()))?;
        Ok(())
    }
}

// Truncates; the list holds only this run's ids.
pub fn write_id_list(path: &Path, ids: &[WorkId]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create id list: {}", path.display()))?;

    writer
        .write_record(["workid"])
        .with_context(|| format!("write id list header: {}", path.display()))?;
    for id in ids {
        writer
            .write_record([id.as_str()])
            .with_context(|| format!("write id list row: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush id list: {}", path.display()))?;
    Ok(())
}
