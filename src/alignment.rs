use itertools::Itertools;
use thiserror::Error;

/// Reasons an input cannot be condensed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("The following sequence IDs are duplicated: {}", .0.join(", "))]
    DuplicateIdentifier(Vec<String>),

    #[error(r#"No sequences found in "{0}""#)]
    EmptyInput(String),

    #[error(
        "Not all sequences are the same length (found lengths {}). \
         Please provide an alignment of equally lengthed sequences",
        .0.iter().join(", ")
    )]
    UnequalLength(Vec<usize>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed FASTA: {0}")]
    Malformed(String),
}

/// One FASTA record. The description is carried along but never
/// takes part in identity checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

impl Record {
    pub fn new(id: &str, seq: &str) -> Self {
        Record {
            id: id.to_string(),
            desc: None,
            seq: seq.as_bytes().to_vec(),
        }
    }

    pub fn with_desc(self, desc: &str) -> Self {
        Record {
            desc: Some(desc.to_string()),
            ..self
        }
    }

    pub fn seq_str(&self) -> String {
        String::from_utf8_lossy(&self.seq).to_string()
    }
}

/// Sequences in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    records: Vec<Record>,
}

impl Alignment {
    pub fn new(records: Vec<Record>) -> Self {
        Alignment { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|rec| rec.id.as_str()).collect()
    }

    /// Distinct sequence lengths, ascending
    pub fn lengths(&self) -> Vec<usize> {
        self.records
            .iter()
            .map(|rec| rec.seq.len())
            .sorted()
            .dedup()
            .collect()
    }

    /// The shared sequence length, if there is exactly one
    pub fn width(&self) -> Option<usize> {
        match self.lengths()[..] {
            [len] => Some(len),
            _ => None,
        }
    }
}

impl FromIterator<Record> for Alignment {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Alignment::new(iter.into_iter().collect())
    }
}
