/// Multi-channel convolutional network over pretrained word embeddings
pub mod textcnn;
