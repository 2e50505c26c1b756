//! # Record Store
//!
//! Flat comma-separated text persistence for accounts and the song catalogue.
//!
//! Every row is one record, fields joined by `,`, no header, one record per
//! line. The first field of a row is its key. Blank lines are skipped.
//!
//! ## Consistency
//!
//! [`update_field`] is the only destructive operation. It buffers every row in
//! memory, releases the read handle, writes the new content to a temporary
//! file next to the store and renames it over the original. The store file is
//! therefore either fully the old content or fully the new content, and keeps
//! the permissions it had.
//!
//! Field values must not contain `,` or line breaks; writes reject them with
//! [`StoreError::InvalidField`].

use crate::error::StoreError;
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A raw row: the fields of one line, unvalidated.
pub type Row = Vec<String>;

/// Schema of a record kind stored in a flat file.
pub trait Record: Sized {
    /// Number of fields the schema requires.
    const FIELDS: usize;
    /// Whether rows must have exactly [`Record::FIELDS`] fields (otherwise "at least").
    const EXACT: bool;

    /// Key used by [`find_by_key`] and [`update_field`].
    fn key(&self) -> String;

    /// Build a record from a row whose field count has already been checked.
    /// The error is a short reason shown in the malformed-record diagnostic.
    fn from_fields(fields: &[String]) -> Result<Self, String>;

    fn to_fields(&self) -> Vec<String>;
}

/// Typed handle on a store file.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R: Record> RecordStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<R>, StoreError> {
        load(&self.path)
    }

    pub fn find_by_key(&self, key: &str) -> Result<Option<R>, StoreError> {
        find_by_key(&self.path, key)
    }

    pub fn update_field(&self, key: &str, field_index: usize, value: &str) -> Result<(), StoreError> {
        update_field(&self.path, key, field_index, value)
    }

    pub fn append(&self, record: &R) -> Result<(), StoreError> {
        append_record(&self.path, record)
    }
}

/// Read every row of the store file, creating an empty file if it is missing.
pub fn read_rows(path: &Path) -> Result<Vec<Row>, StoreError> {
    Ok(read_content(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_row)
        .collect())
}

/// Load and validate every record in the store.
///
/// # Errors
///
/// [`StoreError::MalformedRecord`] naming the first row that does not fit the
/// schema of `R`.
pub fn load<R: Record>(path: &Path) -> Result<Vec<R>, StoreError> {
    let content = read_content(path)?;
    parse_records(path, &content)
}

/// Validate already read store content against the schema of `R`. `path` is
/// only used in diagnostics.
pub fn parse_records<R: Record>(path: &Path, content: &str) -> Result<Vec<R>, StoreError> {
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_row(line);
        let malformed = |reason: String| StoreError::MalformedRecord {
            path: path.to_path_buf(),
            line: index + 1,
            record: line.to_string(),
            reason,
        };

        let count_ok = if R::EXACT {
            fields.len() == R::FIELDS
        } else {
            fields.len() >= R::FIELDS
        };
        if !count_ok {
            let qualifier = if R::EXACT { "" } else { "at least " };
            return Err(malformed(format!(
                "expected {qualifier}{} fields, found {}",
                R::FIELDS,
                fields.len()
            )));
        }

        records.push(R::from_fields(&fields).map_err(malformed)?);
    }

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// First record whose key equals `key` exactly. Callers normalize the key.
pub fn find_by_key<R: Record>(path: &Path, key: &str) -> Result<Option<R>, StoreError> {
    Ok(load::<R>(path)?.into_iter().find(|record| record.key() == key))
}

/// Replace field `field_index` of the row keyed `key` with `value`.
///
/// All other rows, and all other fields of the matched row, are written back
/// unchanged. Nothing is written unless the update can be applied.
///
/// # Errors
///
/// - [`StoreError::KeyNotFound`] when no row has that key
/// - [`StoreError::FieldIndex`] when the matched row is too short
/// - [`StoreError::InvalidField`] when `value` would break the row format
pub fn update_field(path: &Path, key: &str, field_index: usize, value: &str) -> Result<(), StoreError> {
    check_field(key, value)?;

    // Read phase: the handle is closed once `read_rows` returns.
    let mut rows = read_rows(path)?;

    let row = rows
        .iter_mut()
        .find(|row| row.first().map(String::as_str) == Some(key))
        .ok_or_else(|| StoreError::KeyNotFound {
            path: path.to_path_buf(),
            key: key.to_string(),
        })?;

    let len = row.len();
    let field = row.get_mut(field_index).ok_or_else(|| StoreError::FieldIndex {
        key: key.to_string(),
        index: field_index,
        len,
    })?;
    *field = value.to_string();

    let content: String = rows.iter().map(|row| join_row(row)).collect();
    replace_contents(path, &content)?;

    info!("Updated field {field_index} of {key:?} in {}", path.display());
    Ok(())
}

/// Append one record as a new line at the end of the store.
///
/// A store whose last line lacks its newline is terminated first, so the new
/// record never merges into the previous one.
///
/// # Errors
///
/// [`StoreError::InvalidField`] when a field would break the row format.
pub fn append_record<R: Record>(path: &Path, record: &R) -> Result<(), StoreError> {
    let key = record.key();
    let fields = record.to_fields();
    for field in &fields {
        check_field(&key, field)?;
    }

    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;

    let mut line = join_row(&fields);
    if !ends_with_newline(&mut file).map_err(|e| StoreError::io(path, e))? {
        line.insert(0, '\n');
    }
    file.write_all(line.as_bytes())
        .map_err(|e| StoreError::io(path, e))?;

    info!("Appended record {key:?} to {}", path.display());
    Ok(())
}

/// Split one line into fields.
pub fn split_row(line: &str) -> Row {
    line.trim_end_matches(&['\r', '\n'][..])
        .split(',')
        .map(str::to_string)
        .collect()
}

/// Serialize fields as one comma-joined, newline-terminated line.
pub fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn check_field(key: &str, value: &str) -> Result<(), StoreError> {
    if value.contains(&[',', '\n', '\r'][..]) {
        return Err(StoreError::InvalidField {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn replace_contents(path: &Path, content: &str) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    let permissions = fs::metadata(path)
        .map_err(|e| StoreError::io(path, e))?
        .permissions();
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

fn read_content(path: &Path) -> Result<String, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            create_empty(path)?;
            Ok(String::new())
        }
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn create_empty(path: &Path) -> Result<(), StoreError> {
    ensure_parent(path)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    debug!("Created empty store file {}", path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))
        }
        _ => Ok(()),
    }
}
