// Sparse document-term count matrix in compressed sparse row layout.
//
// Row `d` owns the slice `indptr[d]..indptr[d + 1]` of `indices`/`counts`,
// with column indices strictly increasing inside each row. Built once by the
// vectorizer and read-only afterwards.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTermMatrix {
    indptr: Vec<usize>,
    indices: Vec<usize>,
    counts: Vec<u32>,
    n_terms: usize,
}

impl DocumentTermMatrix {
    /// Build a matrix from per-document `(term index, count)` lists.
    ///
    /// Entries with a zero count are dropped; each row is sorted by term index.
    /// Duplicate term indices within a row are summed.
    pub fn from_rows(rows: Vec<Vec<(usize, u32)>>, n_terms: usize) -> Self {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut counts = Vec::new();
        indptr.push(0);

        for mut row in rows {
            row.retain(|&(term, count)| count > 0 && term < n_terms);
            row.sort_by_key(|&(term, _)| term);
            let row_start = indices.len();
            for (term, count) in row {
                if indices.len() > row_start && indices.last() == Some(&term) {
                    if let Some(c) = counts.last_mut() {
                        *c += count;
                    }
                } else {
                    indices.push(term);
                    counts.push(count);
                }
            }
            indptr.push(indices.len());
        }

        Self {
            indptr,
            indices,
            counts,
            n_terms,
        }
    }

    pub fn n_documents(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn n_terms(&self) -> usize {
        self.n_terms
    }

    /// (documents, terms)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_documents(), self.n_terms)
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.counts.len()
    }

    /// Sum of every count in the matrix, i.e. the number of tokens.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Non-zero `(term index, count)` entries of one document.
    pub fn row(&self, doc: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
        let (start, end) = match (self.indptr.get(doc), self.indptr.get(doc + 1)) {
            (Some(&s), Some(&e)) => (s, e),
            _ => (0, 0),
        };
        self.indices[start..end]
            .iter()
            .copied()
            .zip(self.counts[start..end].iter().copied())
    }

    /// Count for a single cell (zero when absent).
    pub fn get(&self, doc: usize, term: usize) -> u32 {
        self.row(doc)
            .find(|&(t, _)| t == term)
            .map(|(_, c)| c)
            .unwrap_or(0)
    }
}
