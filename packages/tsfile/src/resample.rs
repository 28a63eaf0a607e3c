use crate::error::{Result, TsError};
use crate::types::{Dataset, Instance, Label, LabelKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet};

/// Resample a train/test pair the way the archive experiments do.
///
/// Resample 0 is the published split and is returned unchanged; any other id
/// seeds the shuffle.
pub fn resample_split(
    train: &Dataset,
    test: &Dataset,
    resample_id: u64,
    stratify: bool,
) -> Result<(Dataset, Dataset)> {
    if resample_id == 0 {
        check_compatible(train, test)?;
        return Ok((train.clone(), test.clone()));
    }
    if stratify {
        stratified_resample(train, test, resample_id)
    } else {
        resample(train, test, resample_id)
    }
}

/// Pool both splits, shuffle with `seed`, and cut a new train set of the
/// original train size. The rest becomes the new test set.
pub fn resample(train: &Dataset, test: &Dataset, seed: u64) -> Result<(Dataset, Dataset)> {
    check_compatible(train, test)?;

    let mut pool: Vec<Instance> = train.iter().chain(test.iter()).cloned().collect();
    let mut rng = StdRng::seed_from_u64(seed);
    pool.shuffle(&mut rng);

    let new_test = pool.split_off(train.len());
    log::debug!(
        "Resampled with seed {}: {} train / {} test",
        seed,
        pool.len(),
        new_test.len()
    );

    Ok((train.with_instances(pool), test.with_instances(new_test)))
}

/// Resample keeping the per-class train/test counts of the original split.
///
/// Both splits must carry class labels and hold the same set of classes.
/// Classes are visited in sorted order, so output is grouped by class.
pub fn stratified_resample(
    train: &Dataset,
    test: &Dataset,
    seed: u64,
) -> Result<(Dataset, Dataset)> {
    check_compatible(train, test)?;

    let train_counts = class_counts(train)?;
    let test_counts = class_counts(test)?;

    let train_classes: BTreeSet<&str> = train_counts.keys().copied().collect();
    let test_classes: BTreeSet<&str> = test_counts.keys().copied().collect();
    if train_classes != test_classes {
        return Err(TsError::Incompatible(format!(
            "train classes {:?} differ from test classes {:?}",
            train_classes, test_classes
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut new_train = Vec::with_capacity(train.len());
    let mut new_test = Vec::with_capacity(test.len());

    for (class, &n_train) in &train_counts {
        let mut members: Vec<&Instance> = train
            .iter()
            .chain(test.iter())
            .filter(|inst| inst.label().and_then(Label::as_class) == Some(*class))
            .collect();
        members.shuffle(&mut rng);

        let (to_train, to_test) = members.split_at(n_train);
        new_train.extend(to_train.iter().map(|inst| (*inst).clone()));
        new_test.extend(to_test.iter().map(|inst| (*inst).clone()));
    }

    Ok((train.with_instances(new_train), test.with_instances(new_test)))
}

fn class_counts(dataset: &Dataset) -> Result<BTreeMap<&str, usize>> {
    let mut counts = BTreeMap::new();
    for inst in dataset {
        let class = inst.label().and_then(Label::as_class).ok_or_else(|| {
            TsError::Incompatible("stratified resampling requires class labels".to_string())
        })?;
        *counts.entry(class).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Two splits can be pooled when every instance of one could have been a
/// row of the other.
fn check_compatible(train: &Dataset, test: &Dataset) -> Result<()> {
    if !train.is_empty() && !test.is_empty() && train.n_channels() != test.n_channels() {
        return Err(TsError::Incompatible(format!(
            "train has {} channels but test has {}",
            train.n_channels(),
            test.n_channels()
        )));
    }

    match (train.label_kind(), test.label_kind()) {
        (LabelKind::Class(a), LabelKind::Class(b)) => {
            let a: BTreeSet<String> = a.into_iter().collect();
            let b: BTreeSet<String> = b.into_iter().collect();
            if a != b {
                return Err(TsError::Incompatible(
                    "train and test declare different class labels".to_string(),
                ));
            }
        }
        (a, b) if a != b => {
            return Err(TsError::Incompatible(format!(
                "train labels are {} but test labels are {}",
                a.name(),
                b.name()
            )));
        }
        _ => {}
    }

    let (train_meta, test_meta) = (train.metadata(), test.metadata());
    if train_meta.equal_length != test_meta.equal_length {
        return Err(TsError::Incompatible(
            "train and test disagree on @equalLength".to_string(),
        ));
    }
    if train_meta.equal_length == Some(true) {
        let train_lengths = train.instances().first().map(Instance::series_lengths);
        let test_lengths = test.instances().first().map(Instance::series_lengths);
        if let (Some(a), Some(b)) = (train_lengths, test_lengths) {
            if a != b {
                return Err(TsError::Incompatible(format!(
                    "equal-length splits have different series lengths ({:?} vs {:?})",
                    a, b
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn regression_split(rows: &[&str]) -> Dataset {
        let mut text = String::from("@univariate true\n@equalLength false\n@targetlabel true\n@data\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        parse_str(&text).unwrap()
    }

    fn class_split(rows: &[&str]) -> Dataset {
        let mut text = String::from("@univariate true\n@classLabel true a b\n@data\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        parse_str(&text).unwrap()
    }

    fn sorted_labels(datasets: &[&Dataset]) -> Vec<String> {
        let mut labels: Vec<String> = datasets
            .iter()
            .flat_map(|ds| ds.iter())
            .filter_map(|inst| inst.label().map(|l| l.to_string()))
            .collect();
        labels.sort();
        labels
    }

    #[test]
    fn test_resample_zero_is_identity() {
        let train = regression_split(&["1,2:0.1", "3:0.2"]);
        let test = regression_split(&["4,5,6:0.3"]);
        let (a, b) = resample_split(&train, &test, 0, false).unwrap();
        assert_eq!(a, train);
        assert_eq!(b, test);
    }

    #[test]
    fn test_resample_keeps_sizes_and_instances() {
        let train = regression_split(&["1:0.1", "2:0.2", "3:0.3", "4:0.4"]);
        let test = regression_split(&["5:0.5", "6:0.6", "7:0.7"]);

        let (new_train, new_test) = resample(&train, &test, 7).unwrap();
        assert_eq!(new_train.len(), 4);
        assert_eq!(new_test.len(), 3);
        assert_eq!(
            sorted_labels(&[&new_train, &new_test]),
            sorted_labels(&[&train, &test])
        );
    }

    #[test]
    fn test_resample_is_deterministic_per_seed() {
        let train = regression_split(&["1:0.1", "2:0.2", "3:0.3", "4:0.4", "5:0.5"]);
        let test = regression_split(&["6:0.6", "7:0.7", "8:0.8", "9:0.9", "10:1.0"]);

        let first = resample(&train, &test, 3).unwrap();
        let second = resample(&train, &test, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stratified_keeps_class_counts() {
        let train = class_split(&["1:a", "2:a", "3:b"]);
        let test = class_split(&["4:a", "5:b", "6:b", "7:b"]);

        let (new_train, new_test) = stratified_resample(&train, &test, 11).unwrap();
        let count = |ds: &Dataset, class: &str| {
            ds.iter()
                .filter(|inst| inst.label().and_then(Label::as_class) == Some(class))
                .count()
        };
        assert_eq!(count(&new_train, "a"), 2);
        assert_eq!(count(&new_train, "b"), 1);
        assert_eq!(count(&new_test, "a"), 1);
        assert_eq!(count(&new_test, "b"), 3);
    }

    #[test]
    fn test_stratified_requires_class_labels() {
        let train = regression_split(&["1:0.1"]);
        let test = regression_split(&["2:0.2"]);
        assert!(matches!(
            stratified_resample(&train, &test, 1),
            Err(TsError::Incompatible(_))
        ));
    }

    #[test]
    fn test_stratified_requires_same_classes() {
        let train = class_split(&["1:a", "2:b"]);
        let test = class_split(&["3:a"]);
        assert!(matches!(
            stratified_resample(&train, &test, 1),
            Err(TsError::Incompatible(_))
        ));
    }

    #[test]
    fn test_incompatible_channel_counts() {
        let train = regression_split(&["1:0.1"]);
        let test = parse_str("@univariate false\n@equalLength false\n@targetlabel true\n@data\n1:2:0.1\n")
            .unwrap();
        assert!(matches!(resample(&train, &test, 1), Err(TsError::Incompatible(_))));
    }
}
