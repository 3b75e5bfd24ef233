//! Request target construction.
//!
//! The generation endpoint receives the three form values as an
//! `application/x-www-form-urlencoded` query under the keys `name`, `ver`
//! and `count`, the same serialisation a browser applies to URL search
//! parameters.

use url::form_urlencoded;

use crate::config::EndpointConfig;
use crate::errors::ValidationError;
use crate::form::{FormField, FormState, SeatBounds};

/// Default relative path of the generation endpoint.
pub const DEFAULT_ENDPOINT_PATH: &str = "./gen";

/// Default suggested file name for the downloaded artifact.
pub const DEFAULT_FILENAME: &str = "Custom.mxtpro";

/// A validated, ready-to-send submission. Built per submit call and dropped
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    name: String,
    version: String,
    seat_count: String,
    endpoint_path: String,
    filename: String,
}

impl SubmissionRequest {
    /// Validate `state` and capture it as a request against the default endpoint.
    pub fn from_state(state: &FormState, bounds: SeatBounds) -> Result<Self, ValidationError> {
        Self::for_endpoint(state, bounds, &EndpointConfig::default())
    }

    /// Validate `state` and capture it as a request against `endpoint`.
    ///
    /// No request is produced for a snapshot that fails validation.
    pub fn for_endpoint(
        state: &FormState,
        bounds: SeatBounds,
        endpoint: &EndpointConfig,
    ) -> Result<Self, ValidationError> {
        state.validate(bounds)?;
        Ok(Self {
            name: state.name.clone(),
            version: state.version.clone(),
            seat_count: state.seat_count.clone(),
            endpoint_path: endpoint.path.clone(),
            filename: endpoint.filename.clone(),
        })
    }

    /// Encoded query string, without the leading `?`.
    pub fn query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(FormField::Name.id(), &self.name)
            .append_pair(FormField::Version.id(), &self.version)
            .append_pair(FormField::Count.id(), &self.seat_count)
            .finish()
    }

    /// Relative request target, e.g. `./gen?name=alice&ver=25.2&count=5`.
    pub fn target(&self) -> String {
        format!("{}?{}", self.endpoint_path, self.query())
    }

    /// File name the downloaded artifact should be saved under.
    pub fn suggested_filename(&self) -> &str {
        &self.filename
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn seat_count(&self) -> &str {
        &self.seat_count
    }
}

/// Decode the query part of a request target into `(key, value)` pairs.
///
/// Accepts either a full target (`./gen?...`) or a bare query.
pub fn decode_query(target: &str) -> Vec<(String, String)> {
    let query = match target.split_once('?') {
        Some((_, query)) => query,
        None => target,
    };
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
