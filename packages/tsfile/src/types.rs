use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// One observation of a channel. `None` is a value that was not recorded,
/// which is distinct from an observed `0.0`.
pub type Sample = Option<f64>;

/// Token used for a missing sample when writing
pub const MISSING_TOKEN: &str = "?";

/// Label carried by an instance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Label {
    /// Continuous regression target (`@targetlabel true`)
    Numeric(f64),
    /// Class name declared by `@classLabel true ...`
    Class(String),
}

impl Label {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Label::Numeric(v) => Some(*v),
            Label::Class(_) => None,
        }
    }

    pub fn as_class(&self) -> Option<&str> {
        match self {
            Label::Class(name) => Some(name),
            Label::Numeric(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Numeric(v) => write!(f, "{:?}", v),
            Label::Class(name) => write!(f, "{}", name),
        }
    }
}

/// Kind of label a dataset declares in its header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    None,
    Numeric,
    Class(Vec<String>),
}

impl LabelKind {
    pub fn is_labelled(&self) -> bool {
        !matches!(self, LabelKind::None)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LabelKind::None => "none",
            LabelKind::Numeric => "numeric",
            LabelKind::Class(_) => "class",
        }
    }
}

/// A header directive as `@<key> <value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub key: String,
    pub value: String,
}

impl Directive {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Header metadata of a `.ts` file.
///
/// Recognized directives are decoded into typed fields; anything else is kept
/// verbatim in `extra`, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    pub problem_name: Option<String>,
    pub timestamps: Option<bool>,
    pub univariate: Option<bool>,
    pub dimensions: Option<usize>,
    pub equal_length: Option<bool>,
    pub series_length: Option<usize>,
    pub class_label: Option<bool>,
    pub class_names: Vec<String>,
    pub target_label: Option<bool>,
    pub extra: Vec<Directive>,
}

impl Metadata {
    pub fn label_kind(&self) -> LabelKind {
        if self.target_label == Some(true) {
            LabelKind::Numeric
        } else if self.class_label == Some(true) {
            LabelKind::Class(self.class_names.clone())
        } else {
            LabelKind::None
        }
    }

    /// All directives in canonical order, recognized keys first.
    pub fn directives(&self) -> Vec<Directive> {
        let mut out = Vec::new();
        if let Some(ref name) = self.problem_name {
            out.push(Directive::new("problemName", name.as_str()));
        }
        if let Some(v) = self.timestamps {
            out.push(Directive::new("timestamps", v.to_string()));
        }
        if let Some(v) = self.univariate {
            out.push(Directive::new("univariate", v.to_string()));
        }
        if let Some(v) = self.dimensions {
            out.push(Directive::new("dimensions", v.to_string()));
        }
        if let Some(v) = self.equal_length {
            out.push(Directive::new("equalLength", v.to_string()));
        }
        if let Some(v) = self.series_length {
            out.push(Directive::new("seriesLength", v.to_string()));
        }
        if let Some(v) = self.class_label {
            let mut value = v.to_string();
            for name in &self.class_names {
                value.push(' ');
                value.push_str(name);
            }
            out.push(Directive::new("classLabel", value));
        }
        if let Some(v) = self.target_label {
            out.push(Directive::new("targetlabel", v.to_string()));
        }
        out.extend(self.extra.iter().cloned());
        out
    }

    /// Look up a directive value by key, ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<String> {
        self.directives()
            .into_iter()
            .find(|d| d.key.eq_ignore_ascii_case(key))
            .map(|d| d.value)
    }
}

/// One labelled, possibly multivariate, time series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instance {
    channels: Vec<Vec<Sample>>,
    label: Option<Label>,
}

impl Instance {
    pub(crate) fn new(channels: Vec<Vec<Sample>>, label: Option<Label>) -> Self {
        Self { channels, label }
    }

    pub fn channels(&self) -> &[Vec<Sample>] {
        &self.channels
    }

    pub fn channel(&self, idx: usize) -> Option<&[Sample]> {
        self.channels.get(idx).map(Vec::as_slice)
    }

    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Length of each channel, in channel order.
    pub fn series_lengths(&self) -> Vec<usize> {
        self.channels.iter().map(Vec::len).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.channels
            .iter()
            .flatten()
            .filter(|s| s.is_none())
            .count()
    }
}

/// A parsed `.ts` dataset. Built only by the parser and the resampling
/// helpers, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    metadata: Metadata,
    instances: Vec<Instance>,
}

impl Dataset {
    pub(crate) fn new(metadata: Metadata, instances: Vec<Instance>) -> Self {
        Self {
            metadata,
            instances,
        }
    }

    /// Same header, different instances.
    pub(crate) fn with_instances(&self, instances: Vec<Instance>) -> Self {
        Self {
            metadata: self.metadata.clone(),
            instances,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instance(&self, idx: usize) -> Option<&Instance> {
        self.instances.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Channel count shared by every instance; 0 for an empty dataset.
    pub fn n_channels(&self) -> usize {
        self.instances.first().map_or(0, Instance::n_channels)
    }

    pub fn label_kind(&self) -> LabelKind {
        self.metadata.label_kind()
    }

    pub fn labels(&self) -> Vec<Option<&Label>> {
        self.instances.iter().map(Instance::label).collect()
    }

    /// Shortest and longest length of a channel across all instances.
    pub fn length_range(&self, channel: usize) -> Option<(usize, usize)> {
        let mut lengths = self
            .instances
            .iter()
            .filter_map(|inst| inst.channel(channel).map(<[Sample]>::len));
        let first = lengths.next()?;
        Some(lengths.fold((first, first), |(lo, hi), len| (lo.min(len), hi.max(len))))
    }

    pub fn missing_count(&self) -> usize {
        self.instances.iter().map(Instance::missing_count).sum()
    }

    /// Distinct class names observed in the labels, sorted.
    pub fn observed_classes(&self) -> BTreeSet<&str> {
        self.instances
            .iter()
            .filter_map(|inst| inst.label().and_then(Label::as_class))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Instance;
    type IntoIter = std::slice::Iter<'a, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_instances() -> Dataset {
        Dataset::new(
            Metadata {
                target_label: Some(true),
                ..Default::default()
            },
            vec![
                Instance::new(
                    vec![vec![Some(1.0), None], vec![Some(3.0), Some(4.0), Some(5.0)]],
                    Some(Label::Numeric(0.5)),
                ),
                Instance::new(
                    vec![vec![Some(2.0)], vec![Some(6.0), Some(7.0)]],
                    Some(Label::Numeric(-1.0)),
                ),
            ],
        )
    }

    #[test]
    fn test_length_range_per_channel() {
        let ds = two_instances();
        assert_eq!(ds.length_range(0), Some((1, 2)));
        assert_eq!(ds.length_range(1), Some((2, 3)));
        assert_eq!(ds.length_range(2), None);
    }

    #[test]
    fn test_missing_values_are_counted_not_zeroed() {
        let ds = two_instances();
        assert_eq!(ds.missing_count(), 1);
        assert_eq!(ds.instances()[0].channel(0), Some(&[Some(1.0), None][..]));
    }

    #[test]
    fn test_directives_canonical_order_and_lookup() {
        let meta = Metadata {
            problem_name: Some("Demo".into()),
            univariate: Some(false),
            class_label: Some(true),
            class_names: vec!["a".into(), "b".into()],
            extra: vec![Directive::new("source", "synthetic")],
            ..Default::default()
        };
        let keys: Vec<String> = meta.directives().into_iter().map(|d| d.key).collect();
        assert_eq!(keys, vec!["problemName", "univariate", "classLabel", "source"]);
        assert_eq!(meta.get("CLASSLABEL").as_deref(), Some("true a b"));
        assert_eq!(meta.get("missing"), None);
        assert_eq!(meta.label_kind(), LabelKind::Class(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_label_accessors() {
        assert_eq!(Label::Numeric(0.25).as_f64(), Some(0.25));
        assert_eq!(Label::Class("up".into()).as_class(), Some("up"));
        assert_eq!(Label::Class("up".into()).to_string(), "up");
    }
}
