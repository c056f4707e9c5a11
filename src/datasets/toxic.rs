use async_trait::async_trait;
use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pipelines::multi_label_classification;

use super::LoadableDataset;

/// The name of the toxic comment dataset
pub static DATASET: &str = "toxic";

/// The label names, in the column order of the dataset
pub static LABELS: &[&str; 6] = &[
    "toxic",
    "severe_toxic",
    "obscene",
    "threat",
    "insult",
    "identity_hate",
];

/// A comment with one flag per label. Flags above zero are positive and `0` is negative. Rows
/// marked `-1` were never scored and are skipped when loading.
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Item {
    /// The comment id
    pub id: String,

    /// The text for classification
    pub comment_text: String,

    /// Toxic
    pub toxic: i8,

    /// Severely toxic
    pub severe_toxic: i8,

    /// Obscene
    pub obscene: i8,

    /// Threat
    pub threat: i8,

    /// Insult
    pub insult: i8,

    /// Identity hate
    pub identity_hate: i8,
}

impl Item {
    /// Whether any label carries the `-1` marker for unscored rows
    pub fn is_unscored(&self) -> bool {
        [
            self.toxic,
            self.severe_toxic,
            self.obscene,
            self.threat,
            self.insult,
            self.identity_hate,
        ]
        .into_iter()
        .any(|flag| flag < 0)
    }

    /// The names of the positive labels
    pub fn label_names(&self) -> Vec<&'static str> {
        multi_label_classification::Item::labels(self)
            .into_iter()
            .zip(LABELS.iter())
            .filter_map(|(flag, name)| flag.then_some(*name))
            .collect()
    }
}

impl multi_label_classification::Item for Item {
    fn input(&self) -> &str {
        &self.comment_text
    }

    fn labels(&self) -> Vec<bool> {
        [
            self.toxic,
            self.severe_toxic,
            self.obscene,
            self.threat,
            self.insult,
            self.identity_hate,
        ]
        .into_iter()
        .map(|flag| flag > 0)
        .collect()
    }
}

/// Struct for the toxic comment dataset
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

/// Implement the Dataset trait for the toxic comment dataset
impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

#[async_trait]
impl LoadableDataset<Item> for Dataset {
    /// Constructs the dataset for a mode (either "train" or "test"). Every split needs the label
    /// columns, so Kaggle's `test.csv` must first be joined with `test_labels.csv` on `id`.
    async fn load(data_dir: &str, mode: &str) -> std::io::Result<Self> {
        let dataset_dir = format!("{}/datasets/{}", data_dir, DATASET);
        let reader = csv::ReaderBuilder::new();

        let rows: InMemDataset<Item> =
            InMemDataset::from_csv(format!("{}/{}.csv", dataset_dir, mode), &reader)?;

        let total = rows.len();
        let items: Vec<Item> = rows.iter().filter(|item| !item.is_unscored()).collect();

        if items.len() < total {
            log::info!("Skipped {} unscored {} items", total - items.len(), mode);
        }

        log::info!("Loaded {} {} items from {}", items.len(), mode, dataset_dir);

        Ok(Self {
            dataset: InMemDataset::new(items),
        })
    }
}

impl Dataset {
    /// The label names, in target order
    pub fn labels() -> Vec<String> {
        LABELS.iter().map(|label| label.to_string()).collect()
    }

    /// Returns random comments from the training split, along with their positive labels
    pub async fn get_samples(
        data_dir: &str,
        count: usize,
    ) -> std::io::Result<Vec<(String, Vec<&'static str>)>> {
        let mut rng = rand::thread_rng();

        let data = Self::load(data_dir, "train").await?;

        if data.is_empty() {
            return Ok(vec![]);
        }

        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            let i = rng.gen_range(0..data.len());

            if let Some(item) = data.get(i) {
                let labels = item.label_names();
                samples.push((item.comment_text, labels));
            }
        }

        Ok(samples)
    }
}
