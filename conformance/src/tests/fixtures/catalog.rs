//! Catalog: a single root with literals, a codelist and nested classes.
//!
//! Covers: language-tagged text, primitive mapping, optional and repeated
//! associations, codelist references without expansion.

/// Structure Model of a dataset catalog record.
pub const CATALOG: &str = r#"{
  "psmIri": "https://ex.org/psm/catalog",
  "humanLabel": { "en": "Catalog record" },
  "owningSpecification": "https://ex.org/spec/catalog",
  "namespace": "https://ex.org/schema/catalog",
  "namespacePrefix": "cat",
  "roots": [["https://ex.org/psm/catalog/Dataset"]],
  "classes": [
    {
      "psmIri": "https://ex.org/psm/catalog/Dataset",
      "cimIri": "http://www.w3.org/ns/dcat#Dataset",
      "humanLabel": { "en": "Dataset", "cs": "Datová sada" },
      "technicalLabel": "Dataset",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/catalog/Dataset/title",
          "cimIri": "http://purl.org/dc/terms/title",
          "technicalLabel": "title",
          "humanLabel": { "en": "Title" },
          "cardinalityMin": 1,
          "cardinalityMax": null,
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/catalog/Dataset/issued",
          "cimIri": "http://purl.org/dc/terms/issued",
          "technicalLabel": "issued",
          "cardinalityMin": 0,
          "cardinalityMax": 1,
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#date" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/catalog/Dataset/theme",
          "cimIri": "http://www.w3.org/ns/dcat#theme",
          "technicalLabel": "theme",
          "cardinalityMin": 0,
          "cardinalityMax": null,
          "dataTypes": [
            { "kind": "association", "class": "https://ex.org/psm/catalog/Theme" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/catalog/Dataset/publisher",
          "cimIri": "http://purl.org/dc/terms/publisher",
          "technicalLabel": "publisher",
          "cardinalityMin": 0,
          "cardinalityMax": 1,
          "dataTypes": [
            { "kind": "association", "class": "https://ex.org/psm/catalog/Agent" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/catalog/Dataset/distribution",
          "cimIri": "http://www.w3.org/ns/dcat#distribution",
          "technicalLabel": "distribution",
          "cardinalityMin": 0,
          "cardinalityMax": null,
          "dataTypes": [
            { "kind": "association", "class": "https://ex.org/psm/catalog/Distribution" }
          ]
        }
      ]
    },
    {
      "psmIri": "https://ex.org/psm/catalog/Theme",
      "cimIri": "http://www.w3.org/2004/02/skos/core#Concept",
      "technicalLabel": "Theme",
      "isCodelist": true
    },
    {
      "psmIri": "https://ex.org/psm/catalog/Agent",
      "cimIri": "http://xmlns.com/foaf/0.1/Agent",
      "technicalLabel": "Agent",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/catalog/Agent/name",
          "cimIri": "http://xmlns.com/foaf/0.1/name",
          "technicalLabel": "name",
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#string" }
          ]
        }
      ]
    },
    {
      "psmIri": "https://ex.org/psm/catalog/Distribution",
      "cimIri": "http://www.w3.org/ns/dcat#Distribution",
      "technicalLabel": "Distribution",
      "properties": [
        {
          "psmIri": "https://ex.org/psm/catalog/Distribution/downloadURL",
          "cimIri": "http://www.w3.org/ns/dcat#downloadURL",
          "technicalLabel": "downloadURL",
          "cardinalityMin": 0,
          "cardinalityMax": 1,
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#anyURI" }
          ]
        },
        {
          "psmIri": "https://ex.org/psm/catalog/Distribution/byteSize",
          "cimIri": "http://www.w3.org/ns/dcat#byteSize",
          "technicalLabel": "byteSize",
          "cardinalityMin": 0,
          "cardinalityMax": 1,
          "dataTypes": [
            { "kind": "primitive", "iri": "http://www.w3.org/2001/XMLSchema#nonNegativeInteger" }
          ]
        }
      ]
    }
  ]
}"#;
