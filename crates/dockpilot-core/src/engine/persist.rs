use super::error::EngineError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Serializes `value` as JSON indented by four spaces.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T, context: &str) -> Result<Vec<u8>, EngineError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser).map_err(|source| EngineError::Json {
        context: context.to_string(),
        source,
    })?;
    buf.push(b'\n');
    Ok(buf)
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), EngineError> {
    let bytes = to_pretty_json(value, &path.display().to_string())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(EngineError::io(parent))?;
    }
    fs::write(path, bytes).map_err(EngineError::io(path))
}

/// Reads a JSON document, reporting an absent file as [`EngineError::MissingFile`].
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(EngineError::MissingFile(path.to_path_buf()));
        }
        Err(e) => return Err(EngineError::io(path)(e)),
    };
    serde_json::from_slice(&bytes).map_err(EngineError::json(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: f64,
    }

    #[test]
    fn writes_four_space_indented_json_and_reads_it_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");
        let sample = Sample {
            name: "grid".into(),
            value: 0.1,
        };

        write_json(&path, &sample).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"name\": \"grid\",\n    \"value\": 0.1\n}\n");
        assert_eq!(read_json::<Sample>(&path).unwrap(), sample);
    }

    #[test]
    fn absent_file_is_reported_as_missing() {
        let dir = tempdir().unwrap();
        let err = read_json::<Sample>(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, EngineError::MissingFile(_)));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_json::<Sample>(&path).unwrap_err(),
            EngineError::Json { .. }
        ));
    }
}
