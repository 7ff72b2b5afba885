//! Composition laws for streams and sets.

use rowpipe::prelude::*;

fn sample_input() -> Vec<i64> {
    vec![5, -3, 12, 0, 7, 7, 42, -8, 19, 1]
}

#[test]
fn test_collect_preserves_length_and_order() {
    let input = sample_input();
    let set = Stream::new(input.clone()).collect().expect("collect");
    assert_eq!(set.len(), input.len());
    assert_eq!(set, input);
}

#[test]
fn test_map_composition() {
    let f = |x: i64| x * 3;
    let g = |x: i64| x - 1;
    let chained = Stream::new(sample_input()).map(f).map(g).to_list().expect("chained");
    let fused = Stream::new(sample_input()).map(move |x| g(f(x))).to_list().expect("fused");
    assert_eq!(chained, fused);
}

#[test]
fn test_filter_matches_iterator_filter() {
    let p = |x: &i64| x % 2 != 0;
    let out = Stream::new(sample_input()).filter(p).to_list().expect("filter");
    let expected: Vec<i64> = sample_input().into_iter().filter(p).collect();
    assert_eq!(out, expected);
}

#[test]
fn test_chained_pipeline() {
    let total = sample_input()
        .into_stream()
        .filter(|x| *x > 0)
        .map(|x| x * 10)
        .drop(1)
        .take(3)
        .reduce(|acc, x| acc + x, 0)
        .expect("reduce");
    assert_eq!(total, 120 + 70 + 70);
}

#[test]
fn test_set_is_reiterable_stream_is_not() {
    let set: Set<i64> = Stream::new(sample_input()).collect().expect("collect");
    let first: i64 = set.iter().sum();
    let second: i64 = set.to_stream().reduce(|a, b| a + b, 0).expect("sum");
    assert_eq!(first, second);

    let mut stream = Stream::new(vec![1, 2]);
    stream.take_now(2).expect("drain");
    assert_eq!(stream.pull(), Err(Error::Exhausted));
}

#[test]
fn test_group_sort_and_count() {
    let words = vec!["pear", "fig", "apple", "kiwi", "plum", "fig"];
    let groups = Stream::new(words.clone()).group_by_fn(|w| w.len()).expect("group");
    let keys: Vec<usize> = groups.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![4, 3, 5]);

    let by_count = Stream::new(words)
        .count_frequency()
        .expect("count")
        .sort_by(|(_, count)| *count);
    assert_eq!(by_count[0], ("fig", 2));
}

#[test]
fn test_dedupe_by_first_element() {
    let out = Stream::new(vec![vec![0, 1], vec![0, 2], vec![1, 1]])
        .dedupe(|r| r[0])
        .to_list()
        .expect("dedupe");
    assert_eq!(out, vec![vec![0, 1], vec![1, 1]]);
}
