use crate::cli::InfoArgs;
use crate::exit_codes;
use crate::output;
use serde::Serialize;
use std::path::Path;
use tsfile::{load_file_with_options, Dataset, Directive, LabelKind, ParseOptions};

#[derive(Serialize)]
struct ChannelSummary {
    channel: usize,
    min_length: usize,
    max_length: usize,
}

#[derive(Serialize)]
struct InfoOutput {
    file: String,
    problem_name: Option<String>,
    instances: usize,
    channels: usize,
    label_kind: &'static str,
    classes: Vec<String>,
    missing_values: usize,
    channel_lengths: Vec<ChannelSummary>,
    directives: Vec<Directive>,
}

impl InfoOutput {
    fn from_dataset(file: &str, ds: &Dataset) -> Self {
        let label_kind = ds.label_kind();
        let classes = match label_kind {
            LabelKind::Class(ref names) => names.clone(),
            _ => Vec::new(),
        };
        let channel_lengths = (0..ds.n_channels())
            .filter_map(|channel| {
                ds.length_range(channel)
                    .map(|(min_length, max_length)| ChannelSummary {
                        channel,
                        min_length,
                        max_length,
                    })
            })
            .collect();

        Self {
            file: file.to_string(),
            problem_name: ds.metadata().problem_name.clone(),
            instances: ds.len(),
            channels: ds.n_channels(),
            label_kind: label_kind.name(),
            classes,
            missing_values: ds.missing_count(),
            channel_lengths,
            directives: ds.metadata().directives(),
        }
    }
}

pub fn execute(args: InfoArgs, options: &ParseOptions) -> i32 {
    let ds = match load_file_with_options(Path::new(&args.file), options) {
        Ok(ds) => ds,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };

    let info = InfoOutput::from_dataset(&args.file, &ds);

    if args.json {
        if let Err(code) = output::emit_json(&info, false, None) {
            return code;
        }
    } else {
        println!(
            "Problem: {}",
            info.problem_name.as_deref().unwrap_or("<unnamed>")
        );
        println!("Instances: {}", info.instances);
        println!("Channels: {}", info.channels);
        if info.classes.is_empty() {
            println!("Labels: {}", info.label_kind);
        } else {
            println!("Labels: {} ({})", info.label_kind, info.classes.join(", "));
        }
        println!("Missing values: {}", info.missing_values);
        for summary in &info.channel_lengths {
            println!(
                "  channel {}: length {}..={}",
                summary.channel, summary.min_length, summary.max_length
            );
        }
        println!();
        for directive in &info.directives {
            println!("@{} {}", directive.key, directive.value);
        }
    }

    exit_codes::SUCCESS
}
