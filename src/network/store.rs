use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::layers::{ActivationLayer, DenseLayer, Layer};
use crate::loss::LossType;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

const DENSE_TAG: &str = "Dense";
const TANH_TAG: &str = "Tanh";

/// One serialized layer. Dense records carry base64-wrapped binary matrices;
/// tanh records are bare tags.
#[derive(Debug, Serialize, Deserialize)]
struct LayerRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weights: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    biases: Option<String>,
}

/// Top-level document written by `Network::save`.
#[derive(Debug, Serialize, Deserialize)]
struct ModelDocument {
    #[serde(rename = "Layers")]
    layers: Vec<LayerRecord>,
    #[serde(rename = "Loss")]
    loss: String,
}

impl Network {
    /// Writes the network topology and trained parameters to a
    /// pretty-printed JSON document at `path`.
    pub fn save(&self, path: &str) -> Result<()> {
        let document = ModelDocument {
            layers: self.layers.iter().map(layer_record).collect(),
            loss: self.loss.tag().to_string(),
        };
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a document written by `save` and rebuilds the network.
    ///
    /// Any unrecognized layer or loss tag fails with
    /// `UnsupportedModelFormat`; records are never skipped.
    pub fn load(path: &str) -> Result<Network> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let document: ModelDocument = serde_json::from_reader(reader)?;

        let mut layers = Vec::with_capacity(document.layers.len());
        for record in &document.layers {
            layers.push(restore_layer(record)?);
        }
        let loss = LossType::from_tag(&document.loss)?;

        Ok(Network::new(layers, loss))
    }
}

fn layer_record(layer: &Layer) -> LayerRecord {
    match layer {
        Layer::Dense(dense) => LayerRecord {
            kind: DENSE_TAG.to_string(),
            weights: Some(STANDARD.encode(dense.weights.to_bytes())),
            biases: Some(STANDARD.encode(dense.biases.to_bytes())),
        },
        Layer::Activation(_) => LayerRecord {
            kind: TANH_TAG.to_string(),
            weights: None,
            biases: None,
        },
    }
}

fn restore_layer(record: &LayerRecord) -> Result<Layer> {
    match record.kind.as_str() {
        DENSE_TAG => {
            let weights = decode_matrix(record.weights.as_deref(), "weights")?;
            let biases = decode_matrix(record.biases.as_deref(), "biases")?;
            if biases.rows != 1 || biases.cols != weights.cols {
                return Err(EngineError::UnsupportedModelFormat(format!(
                    "dense parameter shapes disagree: {}x{} weights with {}x{} biases",
                    weights.rows, weights.cols, biases.rows, biases.cols
                )));
            }
            Ok(Layer::Dense(DenseLayer::with_parameters(weights, biases)))
        }
        TANH_TAG => Ok(Layer::Activation(ActivationLayer::default())),
        other => Err(EngineError::UnsupportedModelFormat(format!(
            "unknown layer tag {:?}",
            other
        ))),
    }
}

fn decode_matrix(field: Option<&str>, name: &str) -> Result<Matrix> {
    let encoded = field.ok_or_else(|| {
        EngineError::UnsupportedModelFormat(format!("dense layer record is missing {}", name))
    })?;
    let bytes = STANDARD.decode(encoded).map_err(|e| {
        EngineError::UnsupportedModelFormat(format!("{} are not valid base64: {}", name, e))
    })?;
    Matrix::from_bytes(&bytes).map_err(EngineError::UnsupportedModelFormat)
}
