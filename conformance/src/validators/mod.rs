//! Artifact validators.
//!
//! - [`xml`]: well-formedness of the schema and both stylesheets
//! - [`schema`]: reference closure and root elements of the XML Schema
//! - [`sparql`]: prefix closure and template/pattern agreement of the query
//! - [`consistency`]: agreement between the artifacts of one model

pub mod consistency;
pub mod schema;
pub mod sparql;
pub mod xml;
