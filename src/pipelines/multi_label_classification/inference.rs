use std::sync::Arc;

use burn::{
    config::Config as _,
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::{backend::AutodiffBackend, Tensor},
};

use crate::vocabulary::Vocabulary;

use super::{config::artifact_dir, Batcher, Model, ModelConfig};

/// Define inference function
pub fn infer<B: AutodiffBackend, M: Model<B> + 'static>(
    device: B::Device,    // Device on which to perform computation (e.g., CPU or CUDA device)
    data_dir: &str,       // The location of the top-level data directory
    model_name: &str,     // The name of the model (e.g., "textcnn")
    samples: Vec<String>, // Text samples for inference
) -> anyhow::Result<(Tensor<B, 2>, M::Config)> {
    let artifact_dir = artifact_dir(data_dir, model_name);

    // Load experiment configuration
    let model_config = M::Config::load(format!("{artifact_dir}/config.json").as_str())
        .map_err(|e| anyhow!("Unable to load config file: {}", e))?;

    let vocabulary = Vocabulary::load(format!("{artifact_dir}/vocabulary.json"))?;

    // Initialize batcher for batching samples
    let batcher = Batcher::<B>::new(
        Arc::new(vocabulary),
        model_config.get_config(),
        device.clone(),
    );

    // Load trained model weights
    log::info!("Loading weights from {}...", artifact_dir);

    let record = CompactRecorder::new()
        .load(format!("{artifact_dir}/model").into(), &device)
        .map_err(|e| anyhow!("Unable to load trained model weights: {}", e))?;

    // Create model using loaded weights
    let model = M::init(&device, &model_config)?.load_record(record);

    log::info!("Running inference on {} samples...", samples.len());

    let item = batcher.encode(samples);
    let predictions = model.infer(item);

    // Return the config along with the predictions for label names
    Ok((predictions, model_config))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use burn::backend::{Autodiff, NdArray};
    use pretty_assertions::assert_eq;

    use crate::models::textcnn::{self, EmbeddingMatrix};

    use super::*;

    type TestBackend = Autodiff<NdArray>;

    // Records are stored in half precision
    const TOLERANCE: f32 = 1e-2;

    fn vocabulary() -> Vocabulary {
        Vocabulary::fit(["the cat sat on the mat", "a dog barked at the cat"], None)
    }

    fn embeddings(vocabulary: &Vocabulary) -> EmbeddingMatrix {
        let vectors: HashMap<String, Vec<f32>> = vocabulary
            .iter()
            .map(|(word, index)| {
                let i = index as f32;
                (word.to_string(), vec![0.1 * i, -0.2, 0.05 * i, 1.0 - 0.1 * i])
            })
            .collect();

        EmbeddingMatrix::from_vectors(&vectors, vocabulary, vocabulary.len(), 4).unwrap()
    }

    /// Write a freshly built model into the artifact directory, the way training does
    fn save_artifacts(
        data_dir: &str,
        vocabulary: &Vocabulary,
        matrix: &EmbeddingMatrix,
    ) -> (textcnn::Config, textcnn::Model<TestBackend>) {
        let artifact_dir = artifact_dir(data_dir, "textcnn");
        std::fs::create_dir_all(&artifact_dir).unwrap();

        let labels = vec!["toxic".to_string(), "insult".to_string()];
        let config = textcnn::Config::new_with_labels(
            8,
            4,
            vocabulary.len(),
            "vectors.txt".to_string(),
            &labels,
        );

        let model = config
            .init_with_embeddings::<TestBackend>(matrix, &Default::default())
            .unwrap();

        config.save(format!("{artifact_dir}/config.json")).unwrap();
        vocabulary
            .save(format!("{artifact_dir}/vocabulary.json"))
            .unwrap();
        CompactRecorder::new()
            .record(
                model.clone().into_record(),
                format!("{artifact_dir}/model").into(),
            )
            .unwrap();

        (config, model)
    }

    #[test]
    fn test_infer_reloads_the_saved_model() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();
        let device: <TestBackend as burn::tensor::backend::Backend>::Device = Default::default();

        let vocabulary = vocabulary();
        let (config, model) = save_artifacts(data_dir, &vocabulary, &embeddings(&vocabulary));

        let texts = vec![
            "the cat sat".to_string(),
            "a dog on the mat barked".to_string(),
            "nothing known here".to_string(),
        ];

        let batcher = Batcher::<TestBackend>::new(
            Arc::new(vocabulary),
            config.get_config(),
            device.clone(),
        );
        let expected = model
            .infer(batcher.encode(texts.clone()).tokens)
            .into_data()
            .convert::<f32>()
            .value;

        let (predictions, loaded) = infer::<TestBackend, textcnn::Model<TestBackend>>(
            device, data_dir, "textcnn", texts,
        )
        .unwrap();

        assert_eq!(predictions.dims(), [3, 2]);
        assert_eq!(loaded.id2label, config.id2label);
        assert_eq!(loaded.max_seq_length, 8);

        let values = predictions.into_data().convert::<f32>().value;
        for (value, expected) in values.iter().zip(expected.iter()) {
            assert!(
                (value - expected).abs() < TOLERANCE,
                "{} != {}",
                value,
                expected
            );
        }
    }

    #[test]
    fn test_saved_record_restores_the_pretrained_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();
        let device = Default::default();

        let vocabulary = vocabulary();
        let matrix = embeddings(&vocabulary);
        let (config, _) = save_artifacts(data_dir, &vocabulary, &matrix);

        let record = CompactRecorder::new()
            .load(
                format!("{}/model", artifact_dir(data_dir, "textcnn")).into(),
                &device,
            )
            .unwrap();
        let model = <textcnn::Model<TestBackend> as Model<TestBackend>>::init(&device, &config)
            .unwrap()
            .load_record(record);

        let weights = model
            .embedding
            .weight
            .val()
            .into_data()
            .convert::<f32>()
            .value;
        let expected = matrix.rows().flatten().copied().collect::<Vec<_>>();

        assert_eq!(weights.len(), expected.len());
        for (value, expected) in weights.iter().zip(expected.iter()) {
            assert!((value - expected).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_infer_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();

        let result = infer::<TestBackend, textcnn::Model<TestBackend>>(
            Default::default(),
            dir.path().to_str().unwrap(),
            "textcnn",
            vec!["hello".to_string()],
        );

        assert!(result.is_err());
    }
}
