use serde::{Deserialize, Serialize};

/// Minimal sequence record consumed by the matcher and samplers.
///
/// Parsing FASTA/FASTQ into this shape is the reader's job; nothing in this
/// crate interprets a file format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: String,
}

impl Sequence {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            sequence: sequence.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Fraction of G/C among unambiguous bases
    pub fn gc_content(&self) -> f64 {
        gc_content(self.sequence.as_bytes())
    }
}

/// Anything the matcher can search: a full record or a bare string.
///
/// Bare strings report an empty sequence id.
pub trait Searchable {
    fn sequence_id(&self) -> &str;
    fn residues(&self) -> &[u8];
}

impl Searchable for Sequence {
    fn sequence_id(&self) -> &str {
        &self.id
    }

    fn residues(&self) -> &[u8] {
        self.sequence.as_bytes()
    }
}

impl Searchable for str {
    fn sequence_id(&self) -> &str {
        ""
    }

    fn residues(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Searchable for String {
    fn sequence_id(&self) -> &str {
        ""
    }

    fn residues(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<S: Searchable + ?Sized> Searchable for &S {
    fn sequence_id(&self) -> &str {
        (**self).sequence_id()
    }

    fn residues(&self) -> &[u8] {
        (**self).residues()
    }
}

/// GC content of a nucleotide sequence as a ratio in [0.0, 1.0].
///
/// Case-insensitive. Ambiguous bases and gaps are skipped; a sequence with
/// no A/C/G/T bases reports 0.0.
pub fn gc_content(sequence: &[u8]) -> f64 {
    let mut gc_count = 0usize;
    let mut valid_bases = 0usize;

    for &base in sequence {
        match base {
            b'G' | b'C' | b'g' | b'c' => {
                gc_count += 1;
                valid_bases += 1;
            }
            b'A' | b'T' | b'a' | b't' => valid_bases += 1,
            _ => {}
        }
    }

    if valid_bases == 0 {
        return 0.0;
    }

    gc_count as f64 / valid_bases as f64
}
