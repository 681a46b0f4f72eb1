use crate::{Context, Entity, Error, MappingError, Record, Registry, Result, RowLabeled, coerce};
use std::{iter::FusedIterator, marker::PhantomData};

/// Type that can be built from one result row.
pub trait FromRow: Sized {
    fn from_row(registry: &Registry, row: RowLabeled) -> Result<Self>;
}

/// Default constructs the entity, then assigns every writable column found in
/// the row. A column is matched by physical name first, then by logical name,
/// and only its first occurrence is used. Other row columns are ignored and
/// missing columns keep their default.
impl<E: Entity> FromRow for E {
    fn from_row(registry: &Registry, row: RowLabeled) -> Result<Self> {
        let table = registry.resolve::<E>()?;
        let mut entity = E::default();
        let mut assigned = vec![false; table.columns().len()];
        for (name, value) in row.labels.iter().zip(row.values.into_vec()) {
            let Some(index) = table.column_index(name) else {
                continue;
            };
            let column = &table.columns()[index];
            if !column.writable || assigned[index] {
                continue;
            }
            assigned[index] = true;
            let value = coerce(value, &column.value, column.nullable)
                .and_then(|v| entity.set_column_value(&column.field, v))
                .with_context(|| {
                    format!(
                        "While mapping the column `{name}` into `{}`",
                        table.table().full_name()
                    )
                });
            if let Err(error) = value {
                log::error!("{:#}", error);
                return Err(error);
            }
        }
        Ok(entity)
    }
}

impl FromRow for Record {
    fn from_row(_registry: &Registry, row: RowLabeled) -> Result<Self> {
        Ok(row.into())
    }
}

impl FromRow for RowLabeled {
    fn from_row(_registry: &Registry, row: RowLabeled) -> Result<Self> {
        Ok(row)
    }
}

/// Maps one row into `T`.
pub fn map_one<T: FromRow>(registry: &Registry, row: RowLabeled) -> Result<T> {
    T::from_row(registry, row)
}

/// Lazily maps rows into `T`, see [`map_many`].
pub struct MapMany<'r, T, I> {
    registry: &'r Registry,
    rows: Option<I>,
    _target: PhantomData<fn() -> T>,
}

impl<'r, T: FromRow, I: Iterator<Item = RowLabeled>> Iterator for MapMany<'r, T, I> {
    type Item = Result<T>;
    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.as_mut()?.next();
        let Some(row) = row else {
            self.rows = None;
            return None;
        };
        let result = T::from_row(self.registry, row);
        if result.is_err() {
            self.rows = None;
        }
        Some(result)
    }
}

impl<'r, T: FromRow, I: Iterator<Item = RowLabeled>> FusedIterator for MapMany<'r, T, I> {}

/// Single pass iterator mapping each row into `T`.
///
/// Nothing is read before the first call to `next`. The row source is dropped
/// as soon as it is exhausted or after the first error, dropping the iterator
/// early drops it as well.
pub fn map_many<'r, T, I>(registry: &'r Registry, rows: I) -> MapMany<'r, T, I::IntoIter>
where
    T: FromRow,
    I: IntoIterator<Item = RowLabeled>,
{
    MapMany {
        registry,
        rows: Some(rows.into_iter()),
        _target: PhantomData,
    }
}

/// Index where each boundary cuts `labels`, `None` for the boundaries that do
/// not appear.
///
/// Boundaries are resolved from the last one: each takes the last occurrence
/// of its name before the cut of the following boundary. Only the first
/// boundary may fail with [`MappingError::InvalidSplitBoundary`], when its cut
/// lands on the first column. A later boundary found only there is missing.
pub fn split_points(labels: &[String], boundaries: &[&str]) -> Result<Vec<Option<usize>>> {
    let mut end = labels.len();
    let mut result = vec![None; boundaries.len()];
    for (i, boundary) in boundaries.iter().enumerate().rev() {
        let Some(position) = labels[..end].iter().rposition(|v| v == boundary) else {
            continue;
        };
        if position == 0 && i > 0 {
            continue;
        }
        if position == 0 {
            let error = MappingError::InvalidSplitBoundary {
                column: boundary.to_string(),
            };
            log::error!("{:#}", error);
            return Err(error.into());
        }
        result[i] = Some(position);
        end = position;
    }
    Ok(result)
}

/// Cuts `row` at the split boundaries, missing boundaries are skipped.
///
/// The first segment always starts at the first column, so the result holds
/// one segment more than the boundaries found.
pub fn split_row(row: &RowLabeled, boundaries: &[&str]) -> Result<Vec<RowLabeled>> {
    let points = split_points(&row.labels, boundaries)?;
    let mut result = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for point in points.into_iter().flatten().chain([row.len()]) {
        result.push(row.slice(start, point));
        start = point;
    }
    Ok(result)
}

/// Tuple of row targets filled by splitting one row.
///
/// Each slot is `None` when its boundary is missing from the row or when all
/// of its columns are null (the right side of an outer join without match).
pub trait FromSplitRow: Sized {
    type Output;
    const TARGETS: usize;
    fn from_split_row(
        registry: &Registry,
        row: RowLabeled,
        boundaries: &[&str],
    ) -> Result<Self::Output>;
}

/// Segment of each of the `targets` slots.
fn split_slots(
    row: &RowLabeled,
    boundaries: &[&str],
    targets: usize,
) -> Result<Vec<Option<RowLabeled>>> {
    let repeated;
    let boundaries = match boundaries.len() {
        1 if targets > 2 => {
            repeated = vec![boundaries[0]; targets - 1];
            &repeated[..]
        }
        n if n + 1 == targets => boundaries,
        n => {
            return Err(Error::msg(format!(
                "Cannot split a row into {targets} objects using {n} split columns"
            )));
        }
    };
    let points = split_points(&row.labels, boundaries)?;
    let starts = [Some(0)].into_iter().chain(points.iter().copied());
    Ok(starts
        .enumerate()
        .map(|(i, start)| {
            let start = start?;
            let end = points[i..].iter().flatten().next().copied().unwrap_or(row.len());
            let segment = row.slice(start, end);
            if segment.values.iter().all(|v| v.is_null()) {
                return None;
            }
            Some(segment)
        })
        .collect())
}

macro_rules! impl_from_split_row {
    ($count:literal, $($name:ident),+) => {
        impl<$($name: FromRow),+> FromSplitRow for ($($name,)+) {
            type Output = ($(Option<$name>,)+);
            const TARGETS: usize = $count;
            fn from_split_row(
                registry: &Registry,
                row: RowLabeled,
                boundaries: &[&str],
            ) -> Result<Self::Output> {
                let mut slots = split_slots(&row, boundaries, $count)?.into_iter();
                Ok(($(
                    match slots.next().flatten() {
                        Some(segment) => Some($name::from_row(registry, segment)?),
                        None => None,
                    },
                )+))
            }
        }
    };
}
impl_from_split_row!(2, A, B);
impl_from_split_row!(3, A, B, C);
impl_from_split_row!(4, A, B, C, D);

/// Splits `row` at `boundaries` and maps each segment into its own target.
///
/// `boundaries` has one name less than the targets, a single name is used for
/// every cut.
pub fn map_split<T: FromSplitRow>(
    registry: &Registry,
    row: RowLabeled,
    boundaries: &[&str],
) -> Result<T::Output> {
    T::from_split_row(registry, row, boundaries)
}
