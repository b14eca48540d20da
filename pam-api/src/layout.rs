//! Column layout of the office view.
//!
//! The floor plan shows each category as columns of six workstations that
//! are read from the bottom up, so every column is reversed.

/// Workstations per column in the office view.
pub const ROWS_PER_COLUMN: usize = 6;

/// Number of workstation slots shown for every category.
pub const CATEGORY_SLOTS: i32 = 12;

/// Minimum number of columns returned, even when they are empty.
const MIN_COLUMNS: usize = 2;

/// Splits `items` into columns of `rows_per_column` and reverses each column.
///
/// Item `i` lands in column `i / rows_per_column`. At least two columns are
/// always returned.
pub fn organize_columns<T>(items: Vec<T>, rows_per_column: usize) -> Vec<Vec<T>> {
    let rows = rows_per_column.max(1);
    let needed = items.len().div_ceil(rows).max(MIN_COLUMNS);
    let mut columns: Vec<Vec<T>> = (0..needed).map(|_| Vec::with_capacity(rows)).collect();

    for (i, item) in items.into_iter().enumerate() {
        columns[i / rows].push(item);
    }
    for column in columns.iter_mut() {
        column.reverse();
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_items_make_two_reversed_columns() {
        let items: Vec<i32> = (1..=12).collect();
        let columns = organize_columns(items, ROWS_PER_COLUMN);
        assert_eq!(
            columns,
            vec![vec![6, 5, 4, 3, 2, 1], vec![12, 11, 10, 9, 8, 7]]
        );
    }

    #[test]
    fn test_short_list_keeps_empty_second_column() {
        let columns = organize_columns(vec![1, 2, 3], ROWS_PER_COLUMN);
        assert_eq!(columns, vec![vec![3, 2, 1], vec![]]);
    }

    #[test]
    fn test_empty_list() {
        let columns: Vec<Vec<i32>> = organize_columns(Vec::new(), ROWS_PER_COLUMN);
        assert_eq!(columns, vec![Vec::<i32>::new(), Vec::new()]);
    }

    #[test]
    fn test_overflow_opens_third_column() {
        let items: Vec<i32> = (1..=14).collect();
        let columns = organize_columns(items, ROWS_PER_COLUMN);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[2], vec![14, 13]);
    }

    #[test]
    fn test_custom_column_height() {
        let columns = organize_columns(vec!['a', 'b', 'c', 'd'], 2);
        assert_eq!(columns, vec![vec!['b', 'a'], vec!['d', 'c']]);
    }
}
