//! Stratified train/test splitting

use super::DatasetError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle-split row indices so both partitions keep the class ratio.
///
/// The test partition gets `ceil(test_size * n)` rows, allocated to each
/// class in proportion to its size (largest remainders take the leftover
/// rows). Every class keeps at least one row on each side. The same seed
/// always yields the same split.
pub fn stratified_split(
    labels: &[u8],
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit, DatasetError> {
    if labels.is_empty() {
        return Err(DatasetError::Empty);
    }

    let mut by_class: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (i, &label) in labels.iter().enumerate() {
        by_class[usize::from(label.min(1))].push(i);
    }
    for (class, members) in by_class.iter().enumerate() {
        match members.len() {
            0 => return Err(DatasetError::SingleClass(1 - class as u8)),
            1 => {
                return Err(DatasetError::TooFewRows {
                    class: class as u8,
                    count: 1,
                })
            }
            _ => {}
        }
    }

    let n = labels.len();
    // The epsilon keeps e.g. 0.2 * 600 from rounding up past 120.
    let n_test = ((test_size * n as f64 - 1e-9).ceil() as usize).clamp(2, n - 2);

    // Proportional allocation, largest remainder first.
    let exact: Vec<f64> = by_class
        .iter()
        .map(|m| n_test as f64 * m.len() as f64 / n as f64)
        .collect();
    let mut alloc: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let mut leftover = n_test - alloc.iter().sum::<usize>();
    let mut order: Vec<usize> = (0..alloc.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &class in order.iter().cycle() {
        if leftover == 0 {
            break;
        }
        alloc[class] += 1;
        leftover -= 1;
    }
    for (count, members) in alloc.iter_mut().zip(&by_class) {
        *count = (*count).clamp(1, members.len() - 1);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (members, &count) in by_class.iter_mut().zip(&alloc) {
        members.shuffle(&mut rng);
        test.extend_from_slice(&members[..count]);
        train.extend_from_slice(&members[count..]);
    }
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok(TrainTestSplit { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(negatives: usize, positives: usize) -> Vec<u8> {
        let mut labels = vec![0; negatives];
        labels.extend(std::iter::repeat(1).take(positives));
        labels
    }

    fn positives(labels: &[u8], idx: &[usize]) -> usize {
        idx.iter().filter(|&&i| labels[i] == 1).count()
    }

    #[test]
    fn test_preserves_class_ratio() {
        let labels = labels(950, 50);
        let split = stratified_split(&labels, 0.2, 42).unwrap();

        assert_eq!(split.test.len(), 200);
        assert_eq!(split.train.len(), 800);
        assert_eq!(positives(&labels, &split.test), 10);
        assert_eq!(positives(&labels, &split.train), 40);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let labels = labels(97, 13);
        let split = stratified_split(&labels, 0.25, 7).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..labels.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let labels = labels(300, 20);
        assert_eq!(
            stratified_split(&labels, 0.2, 42).unwrap(),
            stratified_split(&labels, 0.2, 42).unwrap()
        );
        assert_ne!(
            stratified_split(&labels, 0.2, 42).unwrap(),
            stratified_split(&labels, 0.2, 43).unwrap()
        );
    }

    #[test]
    fn test_rare_class_kept_on_both_sides() {
        let labels = labels(98, 2);
        let split = stratified_split(&labels, 0.2, 1).unwrap();
        assert_eq!(positives(&labels, &split.test), 1);
        assert_eq!(positives(&labels, &split.train), 1);
    }

    #[test]
    fn test_rejects_degenerate_labels() {
        assert!(matches!(
            stratified_split(&labels(10, 0), 0.2, 0),
            Err(DatasetError::SingleClass(0))
        ));
        assert!(matches!(
            stratified_split(&labels(10, 1), 0.2, 0),
            Err(DatasetError::TooFewRows { class: 1, count: 1 })
        ));
        assert!(matches!(
            stratified_split(&[], 0.2, 0),
            Err(DatasetError::Empty)
        ));
    }
}
