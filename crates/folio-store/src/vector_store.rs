//! Vector index plus chunk metadata, persisted to one directory
//!
//! # Layout
//!
//! - `vectors.bin`: for each vector, its dimension as a little-endian `u32`
//!   followed by that many `f32` in native byte order, in insertion order
//! - `meta.jsonl`: one [`ChunkRecord`] per line; line `i` describes vector `i`
//!
//! Both files are written to temporaries and renamed into place. Loading
//! rebuilds the HNSW graph from the stored vectors and refuses directories
//! whose two files disagree.

use crate::embedding::cosine_similarity;
use crate::error::StoreError;
use crate::jsonl::{read_chunks, write_jsonl};
use crate::vector_index::{VectorIndex, DEFAULT_EF_SEARCH};
use folio_domain::{ChunkRecord, RetrievalHit};
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Vector file name inside an index directory
pub const VECTORS_FILE: &str = "vectors.bin";
/// Metadata file name inside an index directory
pub const META_FILE: &str = "meta.jsonl";

/// Searchable chunk embeddings with their metadata
pub struct VectorStore {
    index: VectorIndex,
    vectors: Vec<Vec<f32>>,
    metadata: Vec<ChunkRecord>,
}

impl VectorStore {
    /// Create an empty store for vectors of `dimension`
    pub fn new(dimension: usize, capacity: usize) -> Self {
        Self {
            index: VectorIndex::new(dimension, capacity),
            vectors: Vec::with_capacity(capacity),
            metadata: Vec::with_capacity(capacity),
        }
    }

    /// Add one embedded chunk
    pub fn add(&mut self, embedding: Vec<f32>, chunk: ChunkRecord) -> Result<(), StoreError> {
        self.index.add(&embedding)?;
        self.vectors.push(embedding);
        self.metadata.push(chunk);
        Ok(())
    }

    /// Top-`top_k` chunks for a query vector, most similar first
    ///
    /// HNSW proposes the candidates; scores are exact cosine similarities
    /// against the stored vectors.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievalHit>, StoreError> {
        let candidates = self.index.search(query, top_k, DEFAULT_EF_SEARCH)?;

        let mut hits: Vec<RetrievalHit> = candidates
            .into_iter()
            .filter_map(|(id, _)| {
                let chunk = self.metadata.get(id)?;
                let vector = self.vectors.get(id)?;
                Some(RetrievalHit::new(chunk.clone(), cosine_similarity(query, vector)))
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);

        Ok(hits)
    }

    /// Persist vectors and metadata into `dir`
    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(dir)?;

        let vec_tmp = dir.join(format!("{VECTORS_FILE}.tmp"));
        let meta_tmp = dir.join(format!("{META_FILE}.tmp"));
        {
            let mut writer = BufWriter::new(fs::File::create(&vec_tmp)?);
            for vector in &self.vectors {
                let dim = vector.len() as u32;
                writer.write_all(&dim.to_le_bytes())?;
                writer.write_all(bytemuck::cast_slice(&vector[..]))?;
            }
            writer.flush()?;
        }
        write_jsonl(&meta_tmp, &self.metadata)?;

        fs::rename(vec_tmp, dir.join(VECTORS_FILE))?;
        fs::rename(meta_tmp, dir.join(META_FILE))?;

        info!("Saved {} vectors to {}", self.len(), dir.display());
        Ok(())
    }

    /// Load a directory written by [`VectorStore::save`]
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let vec_path = dir.join(VECTORS_FILE);
        if !vec_path.exists() {
            return Err(StoreError::NotFound(vec_path));
        }
        let metadata = read_chunks(&dir.join(META_FILE))?;
        let vectors = read_vectors(&vec_path)?;

        if vectors.len() != metadata.len() {
            return Err(StoreError::CorruptIndex(format!(
                "{} vectors but {} metadata lines in {}",
                vectors.len(),
                metadata.len(),
                dir.display()
            )));
        }
        let Some(dimension) = vectors.first().map(Vec::len) else {
            return Err(StoreError::CorruptIndex(format!("no vectors in {}", dir.display())));
        };

        let mut store = Self::new(dimension, vectors.len());
        for (vector, chunk) in vectors.into_iter().zip(metadata) {
            store.add(vector, chunk).map_err(|e| match e {
                StoreError::DimensionMismatch { expected, actual } => StoreError::CorruptIndex(format!(
                    "mixed vector dimensions ({expected} and {actual})"
                )),
                other => other,
            })?;
        }

        debug!("Loaded {} vectors of dimension {} from {}", store.len(), dimension, dir.display());
        Ok(store)
    }

    /// Dimension of stored vectors
    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Metadata in internal id order
    pub fn chunks(&self) -> &[ChunkRecord] {
        &self.metadata
    }
}

fn read_vectors(path: &Path) -> Result<Vec<Vec<f32>>, StoreError> {
    const HEADER: u64 = std::mem::size_of::<u32>() as u64;
    const FLOAT: u64 = std::mem::size_of::<f32>() as u64;

    let file = fs::File::open(path)?;
    let mut remaining = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let mut vectors: Vec<Vec<f32>> = Vec::new();
    let truncated = |at: usize| StoreError::CorruptIndex(format!("{} is truncated at vector {}", path.display(), at));

    while remaining > 0 {
        if remaining < HEADER {
            return Err(truncated(vectors.len()));
        }
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf)?;
        remaining -= HEADER;
        let dim = u32::from_le_bytes(len_buf);

        if let Some(expected) = vectors.first().map(Vec::len) {
            if dim as usize != expected {
                return Err(StoreError::CorruptIndex(format!(
                    "mixed vector dimensions ({expected} and {dim}) in {}",
                    path.display()
                )));
            }
        }
        // Never allocate more than the file still holds.
        let byte_len = u64::from(dim) * FLOAT;
        if byte_len > remaining {
            return Err(truncated(vectors.len()));
        }

        let mut bytes = vec![0u8; byte_len as usize];
        reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => truncated(vectors.len()),
            _ => e.into(),
        })?;
        remaining -= byte_len;
        vectors.push(bytemuck::pod_collect_to_vec::<u8, f32>(&bytes));
    }
    Ok(vectors)
}
