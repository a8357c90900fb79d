use serde::Serialize;
use shared::domain::Algorithm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRun {
    pub sorted: Vec<i64>,
    pub comparisons: u64,
    pub swaps: u64,
}

#[derive(Default)]
struct Counter {
    comparisons: u64,
    swaps: u64,
}

impl Counter {
    fn greater(&mut self, left: i64, right: i64) -> bool {
        self.comparisons += 1;
        left > right
    }

    fn less(&mut self, left: i64, right: i64) -> bool {
        self.comparisons += 1;
        left < right
    }

    fn swap(&mut self, values: &mut [i64], a: usize, b: usize) {
        self.swaps += 1;
        values.swap(a, b);
    }

    fn shift(&mut self, values: &mut [i64], from: usize, to: usize) {
        self.swaps += 1;
        values[to..=from].rotate_right(1);
    }
}

pub fn reference_sort(algorithm: Algorithm, input: &[i64]) -> ReferenceRun {
    let mut values = input.to_vec();
    let mut counter = Counter::default();
    match algorithm {
        Algorithm::Bubble => bubble(&mut values, &mut counter),
        Algorithm::Selection => selection(&mut values, &mut counter),
        Algorithm::Insertion => insertion(&mut values, &mut counter),
        Algorithm::Quick => quick(&mut values, &mut counter, 0, input.len()),
        Algorithm::Merge => {
            if values.len() >= 2 {
                let high = values.len() - 1;
                merge_sort(&mut values, &mut counter, 0, high);
            }
        }
    }
    ReferenceRun {
        sorted: values,
        comparisons: counter.comparisons,
        swaps: counter.swaps,
    }
}

fn bubble(values: &mut [i64], counter: &mut Counter) {
    for end in (0..values.len()).rev() {
        for j in 0..end {
            if counter.greater(values[j], values[j + 1]) {
                counter.swap(values, j, j + 1);
            }
        }
    }
}

fn selection(values: &mut [i64], counter: &mut Counter) {
    for i in 0..values.len() {
        let mut min = i;
        for candidate in i + 1..values.len() {
            if counter.less(values[candidate], values[min]) {
                min = candidate;
            }
        }
        if min != i {
            counter.swap(values, i, min);
        }
    }
}

fn insertion(values: &mut [i64], counter: &mut Counter) {
    for i in 0..values.len() {
        let mut j = i;
        while j > 0 && counter.greater(values[j - 1], values[j]) {
            counter.swap(values, j - 1, j);
            j -= 1;
        }
    }
}

fn quick(values: &mut [i64], counter: &mut Counter, low: usize, end: usize) {
    if end.saturating_sub(low) < 2 {
        return;
    }
    let high = end - 1;
    let mut store = low;
    for k in low..high {
        if counter.less(values[k], values[high]) {
            if store != k {
                counter.swap(values, store, k);
            }
            store += 1;
        }
    }
    if store != high {
        counter.swap(values, store, high);
    }
    quick(values, counter, low, store);
    quick(values, counter, store + 1, end);
}

fn merge_sort(values: &mut [i64], counter: &mut Counter, low: usize, high: usize) {
    if low >= high {
        return;
    }
    let mid = low + (high - low) / 2;
    merge_sort(values, counter, low, mid);
    merge_sort(values, counter, mid + 1, high);
    for i in mid + 1..=high {
        for j in low..i {
            if counter.less(values[i], values[j]) {
                counter.shift(values, i, j);
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/reference_tests.rs"]
mod tests;
