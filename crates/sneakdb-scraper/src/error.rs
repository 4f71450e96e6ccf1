use thiserror::Error;

/// Hard failures of the extraction pipeline. Everything else (missing fields,
/// bad candidates, template drift) is absorbed and never reaches the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("unusable page content for {brand}: {reason}")]
    UnusableContent { brand: String, reason: String },

    #[error("extraction result for {brand} violates invariant: {reason}")]
    InvariantViolation { brand: String, reason: String },
}

/// Field-local normalization failures. Callers drop the offending candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("malformed url \"{candidate}\": {reason}")]
    MalformedUrl { candidate: String, reason: String },

    #[error("unparsable price \"{raw}\"")]
    UnparsablePrice { raw: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlCheckError {
    #[error("invalid url \"{url}\": {reason}")]
    Invalid { url: String, reason: String },

    #[error("url \"{url}\" is not a {brand} product page")]
    BrandMismatch { url: String, brand: String },

    #[error("url \"{url}\" does not belong to any supported brand")]
    UnknownBrand { url: String },
}
