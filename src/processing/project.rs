//! Display projection: keep an ordered subset of columns.

use crate::error::{SmartFilterError, SmartFilterResult};
use crate::types::{DataSet, Schema};

/// Return a new dataset with only `columns`, in the given order.
///
/// Every name must exist in `dataset`.
pub fn project<S: AsRef<str>>(dataset: &DataSet, columns: &[S]) -> SmartFilterResult<DataSet> {
    let idxs = columns
        .iter()
        .map(|c| {
            let c = c.as_ref();
            dataset
                .schema
                .index_of(c)
                .ok_or_else(|| SmartFilterError::UnknownColumn {
                    column: c.to_owned(),
                    available: dataset.schema.columns.clone(),
                })
        })
        .collect::<SmartFilterResult<Vec<usize>>>()?;

    let schema = Schema::new(idxs.iter().map(|&i| dataset.schema.columns[i].clone()));
    let rows = dataset
        .rows
        .iter()
        .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Ok(DataSet::new(schema, rows))
}
