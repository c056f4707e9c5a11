//! Command line tool for training

use anyhow::anyhow;
use burn::config::Config as _;
use burn_textcnn::{
    cli::{datasets::Dataset, models::Model, pipelines::Pipeline},
    datasets::{toxic, LoadableDataset},
    models::textcnn,
    pipelines::multi_label_classification,
    utils::backend::{default_device, DefaultBackend},
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: train PIPELINE DATASET [OPTIONS]

Arguments:
  PIPELINE             The pipeline to use (e.g., 'multi-label-classification')
  DATASET              The dataset to use (e.g., 'toxic')

Options:
  -h, --help           Print help
  -m, --model          The model to use (e.g., 'textcnn')
  -c, --config         A saved training config to start from
  -n, --num-epochs     Number of epochs to train for
  -b, --batch-size     Batch size
  -d, --data-dir       The path to the top-level data directory (defaults to '.')
  -e, --embeddings     File name of the pretrained word vectors inside 'DATA_DIR/datasets'
  -o, --optimizer      The optimizer to use (adam, adamw, sgd, rmsprop, adagrad)
  --no-tui             Disable TUI

Data:
  DATA_DIR/datasets/toxic/{train,test}.csv need the label columns. Kaggle's test.csv must
  first be joined with test_labels.csv on 'id'. Rows marked -1 (unscored) are skipped.
";

#[derive(Debug)]
struct Args {
    pipeline: String,
    dataset: String,
    model: Option<String>,
    config: Option<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    data_dir: Option<String>,
    embeddings: Option<String>,
    optimizer: Option<String>,
    use_tui: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            model: pargs.opt_value_from_str(["-m", "--model"])?,
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            embeddings: pargs.opt_value_from_str(["-e", "--embeddings"])?,
            optimizer: pargs.opt_value_from_str(["-o", "--optimizer"])?,
            use_tui: !(pargs.contains("--no-tui")),
            pipeline: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: PIPELINE"),
                _ => anyhow!("{}", e),
            })?,
            dataset: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: DATASET"),
                _ => anyhow!("{}", e),
            })?,
        };

        Ok(Some(args))
    }

    /// Build the experiment config, applying command line overrides
    fn training_config(
        &self,
        model: &Model,
        dataset: &Dataset,
    ) -> anyhow::Result<multi_label_classification::Training> {
        let mut config = match &self.config {
            Some(path) => multi_label_classification::Training::load(path)
                .map_err(|e| anyhow!("Unable to load training config {}: {}", path, e))?,
            None => multi_label_classification::Training::new(
                model.to_string(),
                dataset.to_string(),
                dataset.labels(),
            ),
        };

        config.model_name = model.to_string();
        config.dataset_name = dataset.to_string();
        config.labels = dataset.labels();

        if let Some(num_epochs) = self.num_epochs {
            config.num_epochs = num_epochs;
        }

        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.to_string();
        }

        if let Some(embeddings) = &self.embeddings {
            config.embedding_model_name = embeddings.to_string();
        }

        if let Some(optimizer) = &self.optimizer {
            config.optimizer = optimizer.to_string();
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let pipeline = Pipeline::try_from(args.pipeline.as_str())?;
    let model = pipeline.resolve_model(args.model.as_deref())?;
    let dataset = Dataset::try_from(args.dataset.as_str())?;

    match pipeline {
        Pipeline::MultiLabelClassification => {
            handle_multi_label_classification(&dataset, &model, &args).await
        }
    }
}

async fn handle_multi_label_classification(
    dataset: &Dataset,
    model: &Model,
    args: &Args,
) -> anyhow::Result<()> {
    let config = args.training_config(model, dataset)?;

    log::info!(
        "Training {} on {} for {} epochs",
        model,
        dataset,
        config.num_epochs
    );

    match (model, dataset) {
        (Model::TextCnn(_), Dataset::Toxic) => {
            let train = toxic::Dataset::load(&config.data_dir, "train").await?;
            let test = toxic::Dataset::load(&config.data_dir, "test").await?;

            multi_label_classification::train::<
                DefaultBackend,
                textcnn::Model<DefaultBackend>,
                toxic::Item,
                toxic::Dataset,
            >(vec![default_device()], train, test, config, args.use_tui)
            .await?;
        }
    }

    Ok(())
}
