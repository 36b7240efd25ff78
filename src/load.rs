use serde_json::{Value, from_str, from_value};
use serde::Deserialize;

use std::fs::read_to_string;
use std::path::Path;

use thiserror::Error;

#[cfg(feature="trace")]
use tracing::{instrument, trace, debug, error};

use crate::load::LoadError::{JSONLoadConversionError, ValueConversionError, ReadError, LoadIDError, DeserializationError};

/// Envelope every JSON asset is wrapped in. `load_type_id` names what
/// `actual_value` is expected to deserialize into.
#[derive(Deserialize, Debug, Clone)]
pub struct JSONLoad {
    pub load_type_id: String,
    pub actual_value: Value
}

/// Reads the full text of a shader source (or any other text asset).
///
/// An unreadable path is not an error here: it yields an empty string,
/// which a compiler will reject on its own.
#[cfg_attr(feature="trace", instrument(skip(path), fields(file = ?path.as_ref())))]
pub fn read_source_text<P: AsRef<Path>>(path: P) -> String {
    match read_to_string(path.as_ref()) {
        Ok(text) => {
            #[cfg(feature="trace")]
            debug!("Read {} bytes from: {:?}", text.len(), path.as_ref());

            text
        },
        Err(_e) => {
            #[cfg(feature="trace")]
            error!("Failed to read text from: {:?} ({}). Using empty source.", path.as_ref(), _e);

            String::new()
        }
    }
}

#[cfg_attr(feature="trace", instrument)]
pub fn load_json(file_path: &str) -> Result<JSONLoad, LoadError> {
    #[cfg(feature="trace")]
    trace!("ENTER: load_json");

    let json_string = read_to_string(file_path)
        .map_err(|e| {
            ReadError {
                path: file_path.to_string(), source: e
            }
        })?;

    #[cfg(feature="trace")]
    debug!("Successfully loaded file into string from: {}", file_path);

    let json_value = from_str::<Value>(json_string.as_str())
        .map_err(|e| {
            ValueConversionError {
                string_value: json_string,
                source: e
            }
        })?;

    let load_json = from_value(json_value.clone())
        .map_err(|e| {
            JSONLoadConversionError {
                value: json_value,
                source: e
            }
        });

    #[cfg(feature="trace")]
    trace!("EXIT: load_json");

    load_json
}

#[cfg_attr(feature="trace", instrument)]
pub fn load_deserializable_from_file<T: for<'de> Deserialize<'de>>(file_path: &str, file_id: &str) -> Result<T, LoadError> {
    #[cfg(feature="trace")]
    trace!("ENTER: load_deserializable_from_file");

    let json_value = load_json(file_path)?;

    #[cfg(feature="trace")]
    trace!("Successfully loaded JSONLoad: {:#?} from: {:#?}", json_value, file_path.to_string());

    load_deserializable_from_json(json_value, file_id)
}

#[cfg_attr(feature="trace", instrument)]
pub fn load_deserializable_from_json<T: for<'de> Deserialize<'de>>(json: JSONLoad, load_id: &str) -> Result<T, LoadError> {
    if json.load_type_id != load_id {
        #[cfg(feature="trace")]
        error!("Load ID: {} did not match expected ID: {}", json.load_type_id, load_id);

        return Err(LoadIDError {
            actual: json.load_type_id,
            expected: load_id.to_string()
        })
    }

    T::deserialize(&json.actual_value)
        .map_err(|e| {
            DeserializationError {
                value: json.actual_value,
                source: e
            }
        })
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error loading file at path: {path}")]
    ReadError {
        path: String,
        source: std::io::Error
    },
    #[error("Error creating serde_json::Value at (line: {:#?}, column: {:#?}) of type: {:#?} from file string: {string_value}", .source.line(), .source.column(), source.classify())]
    ValueConversionError {
        string_value: String,
        source: serde_json::error::Error
    },
    #[error("Error creating load::JSONLoad from serde_json::value::Value. \nExpected: {{\"load_type_id\": String, \"actual_value\": Object}} \nGot: {value}")]
    JSONLoadConversionError {
        value: Value,
        source: serde_json::error::Error
    },
    #[error("Error matching given load ID to type expected.\nExpected: {expected}\nActual: {actual}")]
    LoadIDError {
        actual: String,
        expected: String,
    },
    #[error("Error deserializing serde_json::Value: {value}")]
    DeserializationError {
        value: Value,
        source: serde_json::error::Error
    }
}
