//! Integration tests for the distributed bitonic sort.
//!
//! Run with: `cargo test --test sort_tests`
//!
//! These tests drive the full engine through the channel-backed worker group
//! and check the end-to-end ordering guarantees.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rowsort_lib::rows::random_row;
use rowsort_lib::sort::{bitonic_sort, elbow_merge, Direction, SortOptions};
use rowsort_lib::transport::{ThreadGroup, Transport, Value};
use rowsort_lib::validate::validate_global_order;
use rstest::rstest;

/// Sorts the given rows collectively and returns them in rank order,
/// asserting that the built-in validator accepts the result.
fn sort_and_validate(rows: Vec<Vec<Value>>, options: SortOptions) -> Vec<Vec<Value>> {
    ThreadGroup::run(rows.len(), |mut transport| {
        let mut row = rows[transport.rank()].clone();
        bitonic_sort(&mut transport, &mut row, &options)?;
        transport.barrier()?;
        let outcome = validate_global_order(&mut transport, &row)?;
        if transport.rank() == 0 {
            assert_eq!(outcome, Some(true), "validator rejected the sorted output");
        }
        Ok(row)
    })
    .unwrap()
}

/// Asserts that the concatenation of `rows` in rank order is ascending and is
/// a permutation of `input`.
fn assert_globally_sorted(input: &[Vec<Value>], rows: &[Vec<Value>]) {
    let concatenated: Vec<Value> = rows.iter().flatten().copied().collect();
    assert!(
        concatenated.windows(2).all(|w| w[0] <= w[1]),
        "concatenated rows are not ascending"
    );

    let mut expected: Vec<Value> = input.iter().flatten().copied().collect();
    expected.sort_unstable();
    assert_eq!(concatenated, expected, "output is not a permutation of the input");
}

#[rstest]
#[case(1, 1)]
#[case(1, 64)]
#[case(2, 4)]
#[case(4, 1)]
#[case(4, 33)]
#[case(8, 100)]
#[case(16, 10)]
fn test_random_rows_sort_globally(#[case] workers: usize, #[case] row_len: usize) {
    let mut rng = StdRng::seed_from_u64(0xB170);
    // Small value bound forces plenty of duplicates.
    let input: Vec<Vec<Value>> =
        (0..workers).map(|_| random_row(row_len, 50, &mut rng)).collect();

    let rows = sort_and_validate(input.clone(), SortOptions::default());
    assert_globally_sorted(&input, &rows);
    for row in &rows {
        assert_eq!(row.len(), row_len, "row length changed during the sort");
    }
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(8)]
#[case(64)]
fn test_chunk_divisor_does_not_change_result(#[case] chunk_divisor: usize) {
    let mut rng = StdRng::seed_from_u64(99);
    let input: Vec<Vec<Value>> = (0..4).map(|_| random_row(25, 1000, &mut rng)).collect();

    let baseline = sort_and_validate(input.clone(), SortOptions::default());
    let rows = sort_and_validate(input, SortOptions { chunk_divisor });
    assert_eq!(rows, baseline);
}

#[test]
fn test_two_worker_worked_example() {
    let input = vec![vec![5, 1, 9, 3], vec![2, 8, 4, 7]];
    let rows = sort_and_validate(input, SortOptions::default());
    assert_eq!(rows[0], vec![1, 2, 3, 4]);
    assert_eq!(rows[1], vec![5, 7, 8, 9]);
}

#[test]
fn test_single_worker_local_sort_only() {
    // P = 1: no stages run; the initial local sort determines the output.
    let rows = sort_and_validate(vec![vec![9, -2, 5, 5, 0]], SortOptions::default());
    assert_eq!(rows[0], vec![-2, 0, 5, 5, 9]);
}

#[test]
fn test_length_one_rows_are_routed_not_merged() {
    // L = 1: the merge and elbow steps degenerate; the network still routes
    // each value to its rank.
    let input = vec![vec![7], vec![0], vec![-1], vec![7], vec![3], vec![3], vec![100], vec![2]];
    let rows = sort_and_validate(input.clone(), SortOptions::default());
    assert_globally_sorted(&input, &rows);
}

#[test]
fn test_all_equal_values() {
    let input: Vec<Vec<Value>> = (0..4).map(|_| vec![5; 16]).collect();
    let rows = sort_and_validate(input.clone(), SortOptions::default());
    assert_eq!(rows, input);
}

#[test]
fn test_adversarial_extremes() {
    let input = vec![
        vec![Value::MAX, Value::MIN, 0, 1],
        vec![Value::MIN, Value::MAX, -1, 2],
        vec![Value::MAX - 1, Value::MIN + 1, 3, -3],
        vec![0, 0, Value::MAX, Value::MIN],
    ];
    let rows = sort_and_validate(input.clone(), SortOptions::default());
    assert_globally_sorted(&input, &rows);
}

#[test]
fn test_merge_exchange_then_elbow_splits_bitonic_pair() {
    // Two bitonic halves of combined length 2n: after one merge-exchange and
    // an elbow merge each, the rank-ordered concatenation equals the sorted
    // union of both inputs.
    let low_input: Vec<Value> = vec![1, 3, 5, 9]; // ascending
    let high_input: Vec<Value> = vec![8, 7, 4, 2]; // descending

    let rows = ThreadGroup::run(2, |mut transport| {
        let rank = transport.rank();
        let mut row = if rank == 0 { low_input.clone() } else { high_input.clone() };
        let options = SortOptions::default();
        // A 2-worker group runs exactly one stage with one step.
        bitonic_sort(&mut transport, &mut row, &options)?;
        Ok(row)
    })
    .unwrap();

    let mut expected: Vec<Value> =
        low_input.iter().chain(&high_input).copied().collect();
    expected.sort_unstable();
    assert_eq!(rows[0], expected[..4].to_vec());
    assert_eq!(rows[1], expected[4..].to_vec());
}

#[test]
fn test_elbow_merge_idempotent_on_sorted_rows() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut row = random_row(128, 40, &mut rng);
    row.sort_unstable();
    let sorted = row.clone();

    let mut scratch = Vec::with_capacity(row.len());
    elbow_merge(&mut row, Direction::Ascending, &mut scratch);
    assert_eq!(row, sorted);
}

#[test]
fn test_validator_flags_unsorted_single_worker() {
    let outcomes =
        ThreadGroup::run(1, |mut transport| validate_global_order(&mut transport, &[3, 1, 2]))
            .unwrap();
    assert_eq!(outcomes[0], Some(false));
}

#[test]
fn test_larger_group_with_uneven_chunking() {
    // Row length 10 with the default divisor 8 exercises truncated chunks.
    let mut rng = StdRng::seed_from_u64(1234);
    let input: Vec<Vec<Value>> = (0..8).map(|_| random_row(10, 300, &mut rng)).collect();
    let rows = sort_and_validate(input.clone(), SortOptions::default());
    assert_globally_sorted(&input, &rows);
}
