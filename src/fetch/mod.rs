//! Access to the design document API.

mod batch;
mod client;
mod error;

pub use batch::{AssetFetcher, FailedBatch, FetchOutcome, FetchSettings};
pub use client::{DocumentApi, FigmaClient, ImageExport};
pub use error::FetchError;
