#![allow(clippy::too_many_arguments)]

use std::sync::Arc;

use burn::{
    config::Config as _,
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    module::Module,
    optim::{AdaGradConfig, AdamConfig, AdamWConfig, Optimizer, RmsPropConfig, SgdConfig},
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
    train::{
        metric::{LearningRateMetric, LossMetric},
        LearnerBuilder, ValidStep,
    },
    LearningRate,
};

use crate::{
    models::textcnn::embedding::EmbeddingMatrix, utils::renderer::Simple, vocabulary::Vocabulary,
};

use super::{
    batcher::Train, metric::BinaryAccuracyMetric, optimizer::OptimizerKind, Batcher, Item, Model,
    ModelConfig, Output, Training,
};

/// Training Config
pub type Config = Training;

/// Define train function
pub async fn train<B, M, I, D>(
    devices: Vec<B::Device>, // Device on which to perform computation (e.g., CPU or CUDA device)
    dataset_train: D,        // Training dataset
    dataset_test: D,         // Testing dataset
    config: Config,          // Experiment configuration
    use_tui: bool,           // Show the terminal dashboard instead of logging progress
) -> anyhow::Result<()>
where
    B: AutodiffBackend,
    M: Model<B> + 'static,
    I: Item + 'static,
    D: Dataset<I> + 'static,
    M::Record: 'static,

    M::InnerModule: ValidStep<
        Train<<B as AutodiffBackend>::InnerBackend>,
        Output<<B as AutodiffBackend>::InnerBackend>,
    >,
{
    let device = devices
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("At least one device is required for training"))?;

    let artifact_dir = config.artifact_dir();
    tokio::fs::create_dir_all(&artifact_dir).await?;

    // Fail on a bad identifier before any expensive work
    let optimizer = OptimizerKind::try_from(config.optimizer.as_str())?;

    B::seed(config.seed);

    let texts: Vec<String> = dataset_train
        .iter()
        .map(|item| item.input().to_string())
        .collect();

    let vocabulary = Vocabulary::fit(texts.iter().map(String::as_str), config.vocab_size);
    let vocab_size = config.vocab_size.unwrap_or(vocabulary.len());

    log::info!(
        "Fitted a vocabulary of {} words on {} training items",
        vocabulary.len(),
        texts.len()
    );

    let model_config = M::Config::new_for_training(&config, vocab_size)?;

    let embeddings = EmbeddingMatrix::load(
        config.embeddings_path(),
        &vocabulary,
        vocab_size,
        config.embedding_dim,
    )
    .await?;

    let model = M::from_embeddings(&device, &embeddings, &model_config)?;

    log::info!("Built model: {}", model);

    let vocabulary = Arc::new(vocabulary);

    // Initialize batchers for training and testing data
    let batcher_train =
        Batcher::<B>::new(vocabulary.clone(), model_config.get_config(), device.clone());
    let batcher_test = Batcher::<B::InnerBackend>::new(
        vocabulary.clone(),
        model_config.get_config(),
        device.clone(),
    );

    let workers = std::thread::available_parallelism()?;

    // Initialize data loaders for training and testing data
    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .shuffle(config.seed)
        .num_workers(workers.into())
        .build(dataset_train);

    let dataloader_test = DataLoaderBuilder::new(batcher_test)
        .batch_size(config.batch_size * 2)
        .num_workers(workers.into())
        .build(dataset_test);

    log::info!("Training with the {} optimizer", optimizer);

    let model_trained = match optimizer {
        OptimizerKind::Adam => fit(
            model,
            AdamConfig::new().init(),
            config.learning_rate,
            config.num_epochs,
            &artifact_dir,
            devices,
            use_tui,
            dataloader_train,
            dataloader_test,
        ),
        OptimizerKind::AdamW => fit(
            model,
            AdamWConfig::new().init(),
            config.learning_rate,
            config.num_epochs,
            &artifact_dir,
            devices,
            use_tui,
            dataloader_train,
            dataloader_test,
        ),
        OptimizerKind::Sgd => fit(
            model,
            SgdConfig::new().init(),
            config.learning_rate,
            config.num_epochs,
            &artifact_dir,
            devices,
            use_tui,
            dataloader_train,
            dataloader_test,
        ),
        OptimizerKind::RmsProp => fit(
            model,
            RmsPropConfig::new().init(),
            config.learning_rate,
            config.num_epochs,
            &artifact_dir,
            devices,
            use_tui,
            dataloader_train,
            dataloader_test,
        ),
        OptimizerKind::AdaGrad => fit(
            model,
            AdaGradConfig::new().init(),
            config.learning_rate,
            config.num_epochs,
            &artifact_dir,
            devices,
            use_tui,
            dataloader_train,
            dataloader_test,
        ),
    };

    // Save the configurations, the vocabulary and the trained model
    model_config.save(format!("{artifact_dir}/config.json"))?;
    config.save(format!("{artifact_dir}/training.json"))?;
    vocabulary.save(format!("{artifact_dir}/vocabulary.json"))?;

    CompactRecorder::new()
        .record(
            model_trained.into_record(),
            format!("{artifact_dir}/model").into(),
        )
        .map_err(|e| anyhow!("Unable to save trained model weights: {}", e))?;

    log::info!("Saved the trained model to {}", artifact_dir);

    Ok(())
}

/// Run the Learner with a specific optimizer
fn fit<B, M, O>(
    model: M,
    optimizer: O,
    learning_rate: LearningRate,
    num_epochs: usize,
    artifact_dir: &str,
    devices: Vec<B::Device>,
    use_tui: bool,
    dataloader_train: Arc<dyn DataLoader<Train<B>>>,
    dataloader_test: Arc<dyn DataLoader<Train<B::InnerBackend>>>,
) -> M
where
    B: AutodiffBackend,
    M: Model<B> + 'static,
    M::Record: 'static,
    M::InnerModule: ValidStep<
        Train<<B as AutodiffBackend>::InnerBackend>,
        Output<<B as AutodiffBackend>::InnerBackend>,
    >,
    O: Optimizer<M, B> + 'static,
    O::Record: 'static,
{
    let mut builder = LearnerBuilder::new(artifact_dir)
        .metric_train_numeric(BinaryAccuracyMetric::<B>::new())
        .metric_valid_numeric(BinaryAccuracyMetric::<B::InnerBackend>::new())
        .metric_train_numeric(LossMetric::<B>::new())
        .metric_valid_numeric(LossMetric::<B::InnerBackend>::new())
        .metric_train_numeric(LearningRateMetric::new())
        .with_file_checkpointer(CompactRecorder::new())
        .devices(devices)
        .num_epochs(num_epochs)
        .summary();

    if !use_tui {
        builder = builder.renderer(Simple::new());
    }

    let learner = builder.build(model, optimizer, learning_rate);

    learner.fit(dataloader_train, dataloader_test)
}
