//! Synchronous client SDK for the OSDU File, Policy, Schema, Search and
//! Wellbore services.
//!
//! # Overview
//! Every service client turns one typed method call into exactly one HTTP
//! request and returns the decoded JSON body. Requests are assembled and
//! responses interpreted without touching the network; the round trip
//! itself goes through a [`Transport`], so hosts can bring their own HTTP
//! stack. [`UreqTransport`] is provided behind the default `ureq` feature.
//!
//! # Design
//! - Service clients hold only immutable configuration plus shared
//!   [`AuthProvider`] and [`Transport`] handles, and are cheap to clone.
//! - Endpoints describe themselves as a [`Call`]; [`ServiceClient`] resolves
//!   headers, validates the body when required and maps non-2xx responses
//!   to the service's [`Error`] variant.
//! - Path parameters are substituted verbatim.
//! - Request bodies can be checked locally before sending (see
//!   [`validation`]); the policy client always does so.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod models;
mod osdu;
pub mod services;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod url;
pub mod validation;

#[cfg(test)]
mod testing;

pub use auth::{AuthProvider, BearerToken, StaticHeaders};
pub use client::{Call, ServiceClient, Validation};
pub use config::{ClientConfig, ServicePaths};
pub use error::{ConfigError, Error, ErrorMessage, Service, ServiceError, TransportError};
pub use headers::{PolicyOptions, RequestOptions};
pub use http::{Body, Headers, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use models::{Acl, Legal, Record};
pub use osdu::OsduClient;
pub use services::{
    FileClient, PolicyClient, SchemaClient, SearchClient, WellboreClient, WellboreCommon, WellboreV2Client,
    WellboreV3Client, WellboreVersion,
};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
