use crate::alignment::{Alignment, AlignmentError, Record};

// --------------------------------------------------
/// Remove every conserved column from the alignment.
///
/// A column is conserved when all sequences hold the same character,
/// compared with or without regard to case. Case only affects that
/// decision: the retained characters are copied verbatim from the input,
/// in their original column order, and the identifiers keep their order.
///
/// Sequences of differing lengths are rejected rather than truncated.
pub fn filter_columns(
    alignment: &Alignment,
    case_sensitive: bool,
) -> Result<Alignment, AlignmentError> {
    let keep = informative_columns(alignment, case_sensitive)?;

    Ok(alignment
        .records()
        .iter()
        .map(|rec| Record {
            id: rec.id.clone(),
            desc: rec.desc.clone(),
            seq: keep.iter().map(|&i| rec.seq[i]).collect(),
        })
        .collect())
}

// --------------------------------------------------
/// Ascending indices of the columns where at least two sequences differ
pub fn informative_columns(
    alignment: &Alignment,
    case_sensitive: bool,
) -> Result<Vec<usize>, AlignmentError> {
    scan(alignment, case_sensitive, false)
}

// --------------------------------------------------
/// Ascending indices of the columns where all sequences agree
pub fn conserved_columns(
    alignment: &Alignment,
    case_sensitive: bool,
) -> Result<Vec<usize>, AlignmentError> {
    scan(alignment, case_sensitive, true)
}

// --------------------------------------------------
fn scan(
    alignment: &Alignment,
    case_sensitive: bool,
    conserved: bool,
) -> Result<Vec<usize>, AlignmentError> {
    let Some((first, rest)) = alignment.records().split_first() else {
        return Ok(vec![]);
    };

    if let Some(rec) = rest.iter().find(|rec| rec.seq.len() != first.seq.len())
    {
        return Err(AlignmentError::InvalidInput(format!(
            r#"sequence "{}" has length {} but "{}" has length {}"#,
            rec.id,
            rec.seq.len(),
            first.id,
            first.seq.len()
        )));
    }

    let same = |a: u8, b: u8| {
        if case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(&b)
        }
    };

    Ok((0..first.seq.len())
        .filter(|&i| {
            rest.iter().all(|rec| same(first.seq[i], rec.seq[i])) == conserved
        })
        .collect())
}
