//! Command line tool for inference

use anyhow::Result;
use burn_textcnn::{
    cli::{models::Model, pipelines::Pipeline},
    datasets::toxic,
    models::textcnn,
    pipelines::multi_label_classification::{self, metric::DEFAULT_THRESHOLD},
    utils::{
        backend::{default_device, DefaultBackend},
        files::read_file,
    },
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: infer PIPELINE [OPTIONS] [TEXT...]

Arguments:
  PIPELINE             The pipeline to use (e.g., 'multi-label-classification')
  TEXT                 Texts to classify. Without any, random comments from the training set are used

Options:
  -h, --help           Print help
  -m, --model          The model to use (e.g., 'textcnn')
  -d, --data-dir       The path to the top-level data directory (defaults to '.')
  -i, --input          A file with one text to classify per line
";

/// The number of random samples to classify when no input is given
const SAMPLE_COUNT: usize = 10;

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The model to use
    model: Option<String>,

    /// The top-level data directory
    data_dir: String,

    /// A file with one input per line
    input: Option<String>,

    /// The pipeline to use
    pipeline: String,

    /// Texts given directly on the command line
    texts: Vec<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let help = pargs.contains(["-h", "--help"]);
    let model = pargs.opt_value_from_str(["-m", "--model"])?;
    let data_dir = pargs
        .opt_value_from_str(["-d", "--data-dir"])?
        .unwrap_or_else(|| ".".to_string());
    let input = pargs.opt_value_from_str(["-i", "--input"])?;

    if help {
        return Ok(Args {
            help,
            model,
            data_dir,
            input,
            pipeline: String::new(),
            texts: vec![],
        });
    }

    let pipeline = pargs.free_from_str()?;

    let texts = pargs
        .finish()
        .into_iter()
        .map(|text| text.to_string_lossy().to_string())
        .collect();

    Ok(Args {
        help,
        model,
        data_dir,
        input,
        pipeline,
        texts,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    let pipeline = Pipeline::try_from(args.pipeline.as_str())?;
    let model = pipeline.resolve_model(args.model.as_deref())?;

    // Inputs paired with the expected labels, when known
    let samples: Vec<(String, Option<Vec<&str>>)> = if let Some(input) = &args.input {
        read_file(input)
            .await?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| (line, None))
            .collect()
    } else if !args.texts.is_empty() {
        args.texts.iter().map(|text| (text.clone(), None)).collect()
    } else {
        toxic::Dataset::get_samples(&args.data_dir, SAMPLE_COUNT)
            .await?
            .into_iter()
            .map(|(text, labels)| (text, Some(labels)))
            .collect()
    };

    let input: Vec<String> = samples.iter().map(|(text, _)| text.clone()).collect();

    // Get model predictions
    let (predictions, config) = match (pipeline, &model) {
        (Pipeline::MultiLabelClassification, Model::TextCnn(name)) => {
            multi_label_classification::infer::<DefaultBackend, textcnn::Model<DefaultBackend>>(
                default_device(),
                &args.data_dir,
                name,
                input,
            )?
        }
    };

    let [_, n_labels] = predictions.dims();
    let probabilities = predictions.into_data().convert::<f32>().value;

    // Print out predictions for each sample
    for (i, (text, expected)) in samples.into_iter().enumerate() {
        let row = &probabilities[i * n_labels..(i + 1) * n_labels];

        println!("\n=== Item {i} ===\n- Text: {text}");

        for (label_id, probability) in row.iter().enumerate() {
            let label = config
                .id2label
                .get(&label_id)
                .map(String::as_str)
                .unwrap_or("unknown");
            let marker = if f64::from(*probability) >= DEFAULT_THRESHOLD {
                "*"
            } else {
                " "
            };

            println!("  {marker} {label:<14} {probability:.4}");
        }

        if let Some(expected) = expected {
            println!("- Expected: {}", expected.join(", "));
        }

        println!("================");
    }

    Ok(())
}
