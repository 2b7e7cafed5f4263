//! Input loading: read example pairs and the target document from disk.
//!
//! Every file is read and parsed before a transport is even resolved, so a
//! missing or malformed fixture never costs an API call.

use crate::config::{ConversionConfig, ExamplePairPaths};
use crate::error::ConvertError;
use crate::pipeline::transcript::ExamplePair;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Everything the transcript is built from.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub pairs: Vec<ExamplePair>,
    pub target: Value,
}

/// Read and parse one JSON document.
pub async fn load_document(path: &Path) -> Result<Value, ConvertError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConvertError::InputNotFound {
                path: path.to_path_buf(),
            },
            ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ConvertError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

    let value = serde_json::from_str(&text).map_err(|e| ConvertError::InvalidJson {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!("Loaded {} ({} bytes)", path.display(), text.len());
    Ok(value)
}

/// Load one example pair, input first.
pub async fn load_pair(paths: &ExamplePairPaths) -> Result<ExamplePair, ConvertError> {
    let input = load_document(&paths.input).await?;
    let output = load_document(&paths.output).await?;
    Ok(ExamplePair { input, output })
}

/// Load every example pair (in configured order) and the target document.
///
/// Fails on the first missing or invalid file.
pub async fn load_inputs(config: &ConversionConfig) -> Result<LoadedInputs, ConvertError> {
    let mut pairs = Vec::with_capacity(config.examples.len());
    for paths in &config.examples {
        pairs.push(load_pair(paths).await?);
    }
    let target = load_document(&config.input_path).await?;
    Ok(LoadedInputs { pairs, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn load_valid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"elType":"container"}"#).unwrap();
        let v = load_document(&path).await.unwrap();
        assert_eq!(v, json!({"elType": "container"}));
    }

    #[tokio::test]
    async fn missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_document(&path).await.unwrap_err();
        match err {
            ConvertError::InvalidJson { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_inputs_keeps_pair_order() {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=2 {
            std::fs::write(
                dir.path().join(format!("container-v3-{n}.json")),
                format!(r#"{{"in":{n}}}"#),
            )
            .unwrap();
            std::fs::write(
                dir.path().join(format!("container-v4-{n}.json")),
                format!(r#"{{"out":{n}}}"#),
            )
            .unwrap();
        }
        std::fs::write(dir.path().join("container-user.json"), r#"{"target":true}"#).unwrap();

        let config = ConversionConfig::builder()
            .examples_dir(dir.path(), 2)
            .input_path(dir.path().join("container-user.json"))
            .build()
            .unwrap();
        let inputs = load_inputs(&config).await.unwrap();
        assert_eq!(inputs.pairs.len(), 2);
        assert_eq!(inputs.pairs[0].input, json!({"in": 1}));
        assert_eq!(inputs.pairs[1].output, json!({"out": 2}));
        assert_eq!(inputs.target, json!({"target": true}));
    }
}
