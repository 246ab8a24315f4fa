use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use url::Url;

use crate::time::TimeFormat;

use super::{LayerKind, TemporalLayer};

/// Query parameter carrying the temporal filter.
pub const TIME_PARAM: &str = "TIME";

/// In-process layer source: a base URL plus a live query parameter set.
///
/// Every parameter update bumps `revision`, which is what a map toolkit
/// would observe to re-fetch the layer image.
pub struct WmsLayer {
    name: String,
    kind: LayerKind,
    url: Url,
    time_format: TimeFormat,
    params: Mutex<BTreeMap<String, String>>,
    revision: AtomicU64,
}

impl WmsLayer {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: LayerKind, url: Url, time_format: TimeFormat) -> Self {
        Self {
            name: name.into(),
            kind,
            url,
            time_format,
            params: Mutex::new(BTreeMap::new()),
            revision: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        *self
            .params
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner) = params;
        self
    }

    #[must_use]
    pub fn params(&self) -> BTreeMap<String, String> {
        self.params
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn time_parameter(&self) -> Option<String> {
        self.params
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(TIME_PARAM)
            .cloned()
    }

    /// Number of parameter updates applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Base URL with the current parameters appended as the query string.
    #[must_use]
    pub fn request_url(&self) -> Url {
        let params = self.params();
        let mut url = self.url.clone();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

impl TemporalLayer for WmsLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn time_format(&self) -> &TimeFormat {
        &self.time_format
    }

    fn set_time_parameter(&self, value: &str) {
        let mut params = self.params.lock().unwrap_or_else(PoisonError::into_inner);
        // WMS keys are case-insensitive; drop a differently cased TIME first.
        params.retain(|key, _| !key.eq_ignore_ascii_case(TIME_PARAM));
        params.insert(TIME_PARAM.to_owned(), value.to_owned());
        self.revision.fetch_add(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for WmsLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WmsLayer")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("url", &self.url.as_str())
            .field("time_format", &self.time_format.pattern())
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}
