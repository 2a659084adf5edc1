//! JSON archive of the knowledge base.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use biokb_common::KnowledgeBase;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{DbError, Result};

const INDENT: &[u8] = b"    ";

/// Write `kb` as a four-space indented JSON array, replacing `path`
/// atomically: the data goes to a temporary file in the same directory,
/// which is then renamed over the target.
pub fn write_knowledge_base(path: &Path, kb: &KnowledgeBase) -> Result<()> {
    let write_err = |source| DbError::Write { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let mut ser = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        kb.serialize(&mut ser)?;
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), articles = kb.len(), "Knowledge base archived");
    Ok(())
}

pub fn read_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
    let file = fs::File::open(path).map_err(|source| DbError::Read { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
